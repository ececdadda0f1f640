//! Transport boundary for the profile-data service.
//!
//! Everything that touches the network goes through [`HttpTransport`], so the
//! client and orchestrator can be exercised without sockets.

use async_trait::async_trait;
use thiserror::Error;

/// HTTP headers represented as key/value pairs.
///
/// Header names are treated case-insensitively by helper functions.
pub type HttpHeaders = Vec<(String, String)>;

/// A minimal GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: HttpHeaders,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A minimal HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// A response with the given status and body and no headers.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_get(&self.headers, name)
    }

    /// Whether the status is in the 2xx range.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("http transport error: {0}")]
    Transport(String),

    #[error("no mock response registered for GET {url}")]
    NoMockResponse { url: String },
}

/// Transport boundary for all HTTP I/O.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// Get the first header value matching `name` (case-insensitive).
#[must_use]
pub fn header_get<'a>(headers: &'a HttpHeaders, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[cfg(feature = "reqwest")]
pub mod reqwest_transport {
    use super::*;

    use std::time::Duration as StdDuration;

    /// A real HTTP transport backed by reqwest.
    ///
    /// No timeout is applied unless one is configured with [`with_timeout`].
    ///
    /// [`with_timeout`]: ReqwestTransport::with_timeout
    #[derive(Clone, Default)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new(client: reqwest::Client) -> Self {
            Self { client }
        }

        pub fn with_timeout(timeout: StdDuration) -> Result<Self, HttpError> {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| HttpError::Transport(e.to_string()))?;
            Ok(Self { client })
        }
    }

    #[async_trait]
    impl HttpTransport for ReqwestTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            let mut builder = self.client.get(&request.url);
            for (k, v) in request.headers {
                builder = builder.header(&k, &v);
            }

            let resp = builder
                .send()
                .await
                .map_err(|e| HttpError::Transport(e.to_string()))?;

            let status = resp.status().as_u16();
            let mut headers: HttpHeaders = Vec::new();
            for (name, value) in resp.headers().iter() {
                headers.push((
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                ));
            }

            let body = resp
                .bytes()
                .await
                .map_err(|e| HttpError::Transport(e.to_string()))?
                .to_vec();

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}

// ---------- Test-only mock transport ----------

#[cfg(test)]
use std::collections::{HashMap, VecDeque};
#[cfg(test)]
use std::sync::{Arc, Mutex};
#[cfg(test)]
use tokio::sync::oneshot;

#[cfg(test)]
enum MockReply {
    Ready(Result<HttpResponse, HttpError>),
    Deferred(oneshot::Receiver<Result<HttpResponse, HttpError>>),
}

/// Sending half of a deferred mock response.
///
/// The request registered with [`MockTransport::push_deferred`] stays pending
/// until [`respond`](Self::respond) or [`fail`](Self::fail) is called.
#[cfg(test)]
pub struct DeferredResponse {
    tx: oneshot::Sender<Result<HttpResponse, HttpError>>,
}

#[cfg(test)]
impl DeferredResponse {
    pub fn respond(self, response: HttpResponse) {
        // The receiver is gone when the request future was dropped.
        let _ = self.tx.send(Ok(response));
    }

    pub fn fail(self, message: impl Into<String>) {
        let _ = self.tx.send(Err(HttpError::Transport(message.into())));
    }
}

/// In-memory mock transport.
///
/// This is designed for unit tests: no sockets, no loopback HTTP servers.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[cfg(test)]
#[derive(Default)]
struct MockTransportInner {
    routes: HashMap<String, VecDeque<MockReply>>,
    requests: Vec<HttpRequest>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, url: impl Into<String>, reply: MockReply) {
        let mut inner = self
            .inner
            .lock()
            .expect("mock transport lock should not be poisoned");
        inner.routes.entry(url.into()).or_default().push_back(reply);
    }

    /// Register a response for a URL.
    ///
    /// If multiple responses are registered for the same URL, they are returned
    /// in FIFO order.
    pub fn push_response(&self, url: impl Into<String>, response: HttpResponse) {
        self.push(url, MockReply::Ready(Ok(response)));
    }

    /// Register a transport-level failure for a URL.
    pub fn push_error(&self, url: impl Into<String>, message: impl Into<String>) {
        self.push(
            url,
            MockReply::Ready(Err(HttpError::Transport(message.into()))),
        );
    }

    /// Register a response that is released later by the returned handle.
    pub fn push_deferred(&self, url: impl Into<String>) -> DeferredResponse {
        let (tx, rx) = oneshot::channel();
        self.push(url, MockReply::Deferred(rx));
        DeferredResponse { tx }
    }

    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        let inner = self
            .inner
            .lock()
            .expect("mock transport lock should not be poisoned");
        inner.requests.clone()
    }
}

#[cfg(test)]
#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let reply = {
            let mut inner = self
                .inner
                .lock()
                .expect("mock transport lock should not be poisoned");

            let url = request.url.clone();
            inner.requests.push(request);

            match inner.routes.get_mut(&url).and_then(|q| q.pop_front()) {
                Some(reply) => reply,
                None => return Err(HttpError::NoMockResponse { url }),
            }
        };

        match reply {
            MockReply::Ready(result) => result,
            MockReply::Deferred(rx) => rx.await.unwrap_or_else(|_| {
                Err(HttpError::Transport(
                    "deferred response was dropped".to_string(),
                ))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_get_is_case_insensitive_and_returns_first_match() {
        let headers: HttpHeaders = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("content-type".to_string(), "text/plain".to_string()),
        ];
        assert_eq!(header_get(&headers, "content-type"), Some("application/json"));
        assert_eq!(header_get(&headers, "CONTENT-TYPE"), Some("application/json"));
        assert_eq!(header_get(&headers, "missing"), None);
    }

    #[test]
    fn http_response_success_covers_2xx_only() {
        assert!(HttpResponse::new(200, Vec::new()).is_success());
        assert!(HttpResponse::new(204, Vec::new()).is_success());
        assert!(!HttpResponse::new(199, Vec::new()).is_success());
        assert!(!HttpResponse::new(304, Vec::new()).is_success());
        assert!(!HttpResponse::new(404, Vec::new()).is_success());
        assert!(!HttpResponse::new(500, Vec::new()).is_success());
    }

    #[test]
    fn http_request_builder_collects_headers() {
        let req = HttpRequest::get("https://example.com")
            .header("Accept", "application/json")
            .header("User-Agent", "folio");
        assert_eq!(req.url, "https://example.com");
        assert_eq!(header_get(&req.headers, "accept"), Some("application/json"));
        assert_eq!(req.headers.len(), 2);
    }

    #[tokio::test]
    async fn mock_transport_returns_registered_response_and_records_request() {
        let transport = MockTransport::new();
        let url = "https://example.com/api";

        transport.push_response(
            url,
            HttpResponse {
                status: 200,
                headers: vec![("X-Test".to_string(), "ok".to_string())],
                body: b"hello".to_vec(),
            },
        );

        let req = HttpRequest::get(url).header("Accept", "application/json");
        let resp = transport.send(req.clone()).await.expect("mock response");
        assert_eq!(resp.status, 200);
        assert_eq!(resp.header("x-test"), Some("ok"));
        assert_eq!(resp.body, b"hello".to_vec());

        assert_eq!(transport.requests(), vec![req]);
    }

    #[tokio::test]
    async fn mock_transport_errors_when_no_response_is_registered() {
        let transport = MockTransport::new();

        let err = transport
            .send(HttpRequest::get("https://example.com/missing"))
            .await
            .expect_err("missing mock should error");
        match err {
            HttpError::NoMockResponse { url } => {
                assert_eq!(url, "https://example.com/missing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn mock_transport_deferred_response_waits_for_release() {
        let transport = MockTransport::new();
        let gate = transport.push_deferred("https://example.com/slow");

        let pending = tokio::spawn({
            let transport = transport.clone();
            async move {
                transport
                    .send(HttpRequest::get("https://example.com/slow"))
                    .await
            }
        });

        tokio::task::yield_now().await;
        assert!(!pending.is_finished());

        gate.respond(HttpResponse::new(201, b"late".to_vec()));
        let resp = pending
            .await
            .expect("task should not panic")
            .expect("deferred response");
        assert_eq!(resp.status, 201);
        assert_eq!(resp.body, b"late".to_vec());
    }

    #[tokio::test]
    async fn mock_transport_deferred_failure_surfaces_as_transport_error() {
        let transport = MockTransport::new();
        let gate = transport.push_deferred("https://example.com/down");
        gate.fail("connection reset");

        let err = transport
            .send(HttpRequest::get("https://example.com/down"))
            .await
            .expect_err("deferred failure");
        assert!(matches!(err, HttpError::Transport(msg) if msg == "connection reset"));
    }

    #[tokio::test]
    #[cfg(feature = "reqwest")]
    async fn reqwest_transport_forwards_headers_and_reads_response() {
        use wiremock::matchers::{header, method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/github/profile"))
            .and(query_param("username", "alice"))
            .and(header("accept", "application/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-served-by", "profile-data")
                    .set_body_string(r#"{"name":"Alice"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = reqwest_transport::ReqwestTransport::default();
        let req = HttpRequest::get(format!("{}/api/github/profile?username=alice", server.uri()))
            .header("Accept", "application/json");

        let resp = transport.send(req).await.expect("transport should succeed");
        assert!(resp.is_success());
        assert_eq!(resp.header("X-Served-By"), Some("profile-data"));
        assert_eq!(resp.body, br#"{"name":"Alice"}"#.to_vec());
    }

    #[tokio::test]
    #[cfg(feature = "reqwest")]
    async fn reqwest_transport_timeout_surfaces_as_transport_error() {
        use std::time::Duration;

        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let transport =
            reqwest_transport::ReqwestTransport::with_timeout(Duration::from_millis(50))
                .expect("reqwest transport should build");

        let err = transport
            .send(HttpRequest::get(server.uri()))
            .await
            .expect_err("slow response should time out");
        assert!(matches!(err, HttpError::Transport(_)));
    }

    #[tokio::test]
    #[cfg(feature = "reqwest")]
    async fn reqwest_transport_send_returns_transport_error_for_invalid_url() {
        let transport = reqwest_transport::ReqwestTransport::default();

        let err = transport
            .send(HttpRequest::get("not a url"))
            .await
            .expect_err("expected error");
        assert!(matches!(err, HttpError::Transport(_)));
    }
}
