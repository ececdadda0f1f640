//! Projection of fetch state into what the rendering layer draws.
//!
//! [`project`] is pure and total: every [`FetchState`] maps to a complete
//! [`DisplayModel`], with placeholders wherever data is missing.
//! [`project_snapshot`] additionally knows the requested subject, so links
//! derived from the username survive a failed or pending fetch.

use serde::Serialize;
use url::Url;

use crate::model::{Profile, Repository, Subject};
use crate::state::{FetchState, Snapshot};

/// Shown for counters the profile does not carry.
pub const PLACEHOLDER: &str = "—";

/// Heading used when the profile has no display name.
pub const DEFAULT_HEADING: &str = "Developer Portfolio";

/// Short title (navigation, footer) used when the profile has no display name.
pub const DEFAULT_BRAND: &str = "Portfolio";

/// Tagline used when the profile has no biography.
pub const DEFAULT_TAGLINE: &str = "Building playful, modern experiences with code.";

/// Topics shown per repository card.
pub const MAX_TOPICS: usize = 3;

/// Where user pages live; subject-derived links are built under it.
pub const GITHUB_URL: &str = "https://github.com";

/// Everything the rendering layer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayModel {
    /// A blocking overlay should be shown.
    pub loading: bool,
    /// Banner text; the rest of the page still renders with placeholders.
    pub error: Option<String>,
    pub profile: ProfileView,
    pub stats: Stats,
    pub links: Links,
    /// False when there is nothing to put in the projects section.
    pub show_projects: bool,
    pub repositories: Vec<RepositoryCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileView {
    pub heading: String,
    pub brand: String,
    pub tagline: String,
    pub avatar_url: Option<String>,
    pub github_url: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
}

/// Links built from the username rather than from fetched data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Links {
    /// Footer link to the user's GitHub page.
    pub github_url: Option<String>,
    /// "View all" link of the projects section.
    pub all_repositories_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub followers: String,
    pub public_repos: String,
    pub following: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryCard {
    /// Stable identity of the card (`owner/name`).
    pub key: String,
    pub name: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub stars: u64,
    pub language: Option<String>,
    pub homepage: Option<String>,
    pub has_live_demo: bool,
    pub topics: Vec<String>,
}

/// Map a fetch state to its display model.
///
/// Username links come from the loaded profile only.
#[must_use]
pub fn project(state: &FetchState) -> DisplayModel {
    build(state, None)
}

/// Map a published snapshot to its display model.
///
/// Username links fall back to the snapshot's subject when no profile loaded.
#[must_use]
pub fn project_snapshot(snapshot: &Snapshot) -> DisplayModel {
    build(&snapshot.state, snapshot.subject.as_ref())
}

fn build(state: &FetchState, subject: Option<&Subject>) -> DisplayModel {
    let repositories: Vec<RepositoryCard> = state.repositories().iter().map(card).collect();
    let login = state
        .profile()
        .map(|p| p.login.trim())
        .filter(|login| !login.is_empty())
        .or_else(|| subject.map(Subject::as_str));

    DisplayModel {
        loading: state.is_loading(),
        error: state.error_message().map(str::to_string),
        profile: profile_view(state.profile()),
        stats: stats(state.profile()),
        links: login.map(links).unwrap_or_default(),
        show_projects: !repositories.is_empty(),
        repositories,
    }
}

fn links(login: &str) -> Links {
    let Ok(mut github) = Url::parse(GITHUB_URL) else {
        return Links::default();
    };
    if let Ok(mut segments) = github.path_segments_mut() {
        segments.pop_if_empty().push(login);
    }

    let mut all_repositories = github.clone();
    all_repositories
        .query_pairs_mut()
        .append_pair("tab", "repositories");

    Links {
        github_url: Some(github.into()),
        all_repositories_url: Some(all_repositories.into()),
    }
}

/// Non-empty text, or `None`.
fn present(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn counter(value: Option<u64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |n| n.to_string())
}

fn profile_view(profile: Option<&Profile>) -> ProfileView {
    let name = profile.and_then(|p| present(p.name.as_ref()));

    ProfileView {
        heading: name.clone().unwrap_or_else(|| DEFAULT_HEADING.to_string()),
        brand: name.unwrap_or_else(|| DEFAULT_BRAND.to_string()),
        tagline: profile
            .and_then(|p| present(p.bio.as_ref()))
            .unwrap_or_else(|| DEFAULT_TAGLINE.to_string()),
        avatar_url: profile.and_then(|p| present(p.avatar_url.as_ref())),
        github_url: profile.and_then(|p| present(p.html_url.as_ref())),
        website: profile.and_then(|p| present(p.blog.as_ref())),
        location: profile.and_then(|p| present(p.location.as_ref())),
    }
}

fn stats(profile: Option<&Profile>) -> Stats {
    Stats {
        followers: counter(profile.and_then(|p| p.followers)),
        public_repos: counter(profile.and_then(|p| p.public_repos)),
        following: counter(profile.and_then(|p| p.following)),
    }
}

fn card(repo: &Repository) -> RepositoryCard {
    let homepage = present(repo.homepage.as_ref());

    RepositoryCard {
        key: repo.full_name.clone(),
        name: repo.name.clone(),
        url: present(Some(&repo.html_url)),
        description: present(repo.description.as_ref()),
        stars: repo.stargazers_count,
        language: present(repo.language.as_ref()),
        has_live_demo: homepage.is_some(),
        homepage,
        topics: repo.topics.iter().take(MAX_TOPICS).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_with_topics(topics: &[&str]) -> Repository {
        Repository {
            full_name: "alice/x".to_string(),
            name: "x".to_string(),
            topics: topics.iter().map(|t| t.to_string()).collect(),
            ..Repository::default()
        }
    }

    fn success(profile: Profile, repositories: Vec<Repository>) -> FetchState {
        FetchState::Success {
            profile,
            repositories,
        }
    }

    #[test]
    fn every_status_projects_to_a_model() {
        for state in [
            FetchState::Idle,
            FetchState::Loading,
            FetchState::Error {
                message: "Failed to load profile".to_string(),
            },
            success(Profile::default(), Vec::new()),
        ] {
            let model = project(&state);
            assert_eq!(model.loading, state.is_loading());
            assert_eq!(model.error.as_deref(), state.error_message());
            assert!(!model.show_projects);
        }
    }

    #[test]
    fn missing_profile_uses_placeholders() {
        let model = project(&FetchState::Error {
            message: "Failed to load repositories".to_string(),
        });

        assert_eq!(model.error.as_deref(), Some("Failed to load repositories"));
        assert_eq!(model.profile.heading, DEFAULT_HEADING);
        assert_eq!(model.profile.brand, DEFAULT_BRAND);
        assert_eq!(model.profile.tagline, DEFAULT_TAGLINE);
        assert_eq!(model.profile.github_url, None);
        assert_eq!(model.stats.followers, PLACEHOLDER);
        assert_eq!(model.stats.public_repos, PLACEHOLDER);
        assert_eq!(model.stats.following, PLACEHOLDER);
        assert!(model.repositories.is_empty());
        assert_eq!(model.links, Links::default());
    }

    #[test]
    fn links_come_from_loaded_login() {
        let profile = Profile {
            login: "alice".to_string(),
            ..Profile::default()
        };
        let model = project(&success(profile, Vec::new()));

        assert_eq!(model.links.github_url.as_deref(), Some("https://github.com/alice"));
        assert_eq!(
            model.links.all_repositories_url.as_deref(),
            Some("https://github.com/alice?tab=repositories")
        );
        // Not taken from the profile's own page URL.
        assert_eq!(model.profile.github_url, None);
    }

    #[test]
    fn failed_snapshot_still_links_to_subject() {
        let snapshot = Snapshot {
            activation: Some(crate::state::ActivationId(1)),
            subject: Some(Subject::new("bob").unwrap()),
            state: FetchState::Error {
                message: "Failed to load profile".to_string(),
            },
        };
        let model = project_snapshot(&snapshot);

        assert_eq!(model.error.as_deref(), Some("Failed to load profile"));
        assert_eq!(model.links.github_url.as_deref(), Some("https://github.com/bob"));
        assert_eq!(
            model.links.all_repositories_url.as_deref(),
            Some("https://github.com/bob?tab=repositories")
        );
        assert_eq!(project_snapshot(&Snapshot::idle()).links, Links::default());
    }

    #[test]
    fn loaded_login_wins_over_snapshot_subject() {
        let snapshot = Snapshot {
            activation: Some(crate::state::ActivationId(2)),
            subject: Some(Subject::new("Alice").unwrap()),
            state: success(
                Profile {
                    login: "alice".to_string(),
                    ..Profile::default()
                },
                Vec::new(),
            ),
        };
        assert_eq!(
            project_snapshot(&snapshot).links.github_url.as_deref(),
            Some("https://github.com/alice")
        );
    }

    #[test]
    fn zero_counters_are_shown_not_replaced() {
        let profile = Profile {
            followers: Some(0),
            following: Some(3),
            ..Profile::default()
        };
        let model = project(&success(profile, Vec::new()));
        assert_eq!(model.stats.followers, "0");
        assert_eq!(model.stats.following, "3");
        assert_eq!(model.stats.public_repos, PLACEHOLDER);
    }

    #[test]
    fn blank_text_counts_as_absent() {
        let profile = Profile {
            name: Some("  ".to_string()),
            bio: Some(String::new()),
            blog: Some(String::new()),
            ..Profile::default()
        };
        let model = project(&success(profile, Vec::new()));
        assert_eq!(model.profile.heading, DEFAULT_HEADING);
        assert_eq!(model.profile.tagline, DEFAULT_TAGLINE);
        assert_eq!(model.profile.website, None);
    }

    #[test]
    fn topics_are_truncated_in_order_without_touching_source() {
        let state = success(
            Profile::default(),
            vec![repo_with_topics(&["one", "two", "three", "four", "five"])],
        );
        let model = project(&state);

        assert_eq!(model.repositories[0].topics, vec!["one", "two", "three"]);
        assert_eq!(state.repositories()[0].topics.len(), 5);
    }

    #[test]
    fn short_topic_lists_are_kept_whole() {
        let model = project(&success(
            Profile::default(),
            vec![repo_with_topics(&["solo"]), repo_with_topics(&[])],
        ));
        assert_eq!(model.repositories[0].topics, vec!["solo"]);
        assert!(model.repositories[1].topics.is_empty());
    }

    #[test]
    fn live_demo_follows_homepage() {
        let mut with_demo = repo_with_topics(&[]);
        with_demo.homepage = Some("https://x.dev".to_string());
        let mut blank_demo = repo_with_topics(&[]);
        blank_demo.homepage = Some(String::new());
        let without_demo = repo_with_topics(&[]);

        let model = project(&success(
            Profile::default(),
            vec![with_demo, blank_demo, without_demo],
        ));
        let flags: Vec<_> = model.repositories.iter().map(|c| c.has_live_demo).collect();
        assert_eq!(flags, vec![true, false, false]);
        assert_eq!(model.repositories[0].homepage.as_deref(), Some("https://x.dev"));
    }

    #[test]
    fn projection_is_repeatable() {
        let state = success(
            Profile {
                name: Some("Alice".to_string()),
                followers: Some(10),
                ..Profile::default()
            },
            vec![repo_with_topics(&["a", "b", "c", "d"])],
        );
        assert_eq!(project(&state), project(&state));
    }

    #[test]
    fn full_profile_maps_every_field() {
        let profile = Profile {
            login: "alice".to_string(),
            name: Some("Alice".to_string()),
            bio: Some("Rustacean".to_string()),
            avatar_url: Some("https://avatars.example/alice".to_string()),
            blog: Some("https://alice.dev".to_string()),
            location: Some("Lisbon".to_string()),
            html_url: Some("https://github.com/alice".to_string()),
            followers: Some(10),
            following: Some(2),
            public_repos: Some(31),
        };
        let repo = Repository {
            full_name: "alice/x".to_string(),
            name: "x".to_string(),
            description: Some("A thing".to_string()),
            html_url: "https://github.com/alice/x".to_string(),
            stargazers_count: 42,
            language: Some("Rust".to_string()),
            homepage: None,
            topics: vec!["cli".to_string()],
        };

        let model = project(&success(profile, vec![repo]));
        assert_eq!(model.profile.heading, "Alice");
        assert_eq!(model.profile.brand, "Alice");
        assert_eq!(model.profile.tagline, "Rustacean");
        assert_eq!(model.profile.location.as_deref(), Some("Lisbon"));
        assert_eq!(model.profile.website.as_deref(), Some("https://alice.dev"));
        assert_eq!(model.stats.public_repos, "31");
        assert!(model.show_projects);

        let card = &model.repositories[0];
        assert_eq!(card.key, "alice/x");
        assert_eq!(card.url.as_deref(), Some("https://github.com/alice/x"));
        assert_eq!(card.stars, 42);
        assert_eq!(card.language.as_deref(), Some("Rust"));
        assert!(!card.has_live_demo);
    }
}
