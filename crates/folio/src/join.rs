//! All-or-nothing join over two fallible futures.

use std::fmt::Display;
use std::future::Future;

/// Run two fallible futures concurrently and wait for both.
///
/// Succeeds only when both succeed. Unlike `tokio::try_join!`, a failure does
/// not drop the other future: both outcomes are always observed, and when
/// both fail the first future's error is returned while the second is logged.
pub async fn join_all_or_nothing<A, B, E, FA, FB>(first: FA, second: FB) -> Result<(A, B), E>
where
    FA: Future<Output = Result<A, E>>,
    FB: Future<Output = Result<B, E>>,
    E: Display,
{
    let (first, second) = tokio::join!(first, second);

    match (first, second) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
        (Err(e), Err(other)) => {
            tracing::debug!(error = %other, "Second join branch also failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn returns_both_values_in_argument_order() {
        let result: Result<_, String> =
            join_all_or_nothing(async { Ok(1) }, async { Ok("two") }).await;
        assert_eq!(result, Ok((1, "two")));
    }

    #[tokio::test]
    async fn fails_when_either_side_fails() {
        let left: Result<((), ()), String> =
            join_all_or_nothing(async { Err("left".to_string()) }, async { Ok(()) }).await;
        assert_eq!(left, Err("left".to_string()));

        let right: Result<((), ()), String> =
            join_all_or_nothing(async { Ok(()) }, async { Err("right".to_string()) }).await;
        assert_eq!(right, Err("right".to_string()));
    }

    #[tokio::test]
    async fn prefers_first_error_when_both_fail() {
        let result: Result<((), ()), String> = join_all_or_nothing(
            async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Err("first".to_string())
            },
            async { Err("second".to_string()) },
        )
        .await;
        assert_eq!(result, Err("first".to_string()));
    }

    #[tokio::test]
    async fn waits_for_slow_branch_after_fast_failure() {
        let slow_finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&slow_finished);

        let result: Result<((), ()), String> = join_all_or_nothing(
            async { Err("fast".to_string()) },
            async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                flag.store(true, Ordering::SeqCst);
                Ok(())
            },
        )
        .await;

        assert_eq!(result, Err("fast".to_string()));
        assert!(slow_finished.load(Ordering::SeqCst));
    }
}
