//! Repository feed: the wire entries shared with the server, and the ranked
//! view the client renders from them.

#[cfg(any(target_arch = "wasm32", test))]
use crate::lifecycle::MountScope;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(any(target_arch = "wasm32", test))]
use std::future::Future;

/// Account whose public repositories make up the feed.
pub const FEED_USER: &str = "MarkPagkaliwagan";

#[cfg(any(target_arch = "wasm32", test))]
pub const FEED_ERROR_MESSAGE: &str =
    "Failed to load repositories. The feed may be rate limited; try again later.";

/// One entry as served by the feed endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: i64,
    #[serde(default)]
    pub forks_count: i64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
    pub html_url: String,
}

#[cfg(any(target_arch = "wasm32", test))]
#[derive(Clone, Debug, PartialEq)]
pub struct RankedItem {
    pub id: u64,
    pub display_name: String,
    pub description: Option<String>,
    pub primary_metric: i64,
    pub secondary_metric: Option<DateTime<Utc>>,
    pub fork_count: i64,
    pub category: Option<String>,
    pub external_url: String,
}

#[cfg(any(target_arch = "wasm32", test))]
impl From<FeedEntry> for RankedItem {
    fn from(entry: FeedEntry) -> Self {
        Self {
            id: entry.id,
            display_name: entry.name,
            description: entry
                .description
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            primary_metric: entry.stargazers_count,
            secondary_metric: entry.pushed_at,
            fork_count: entry.forks_count,
            category: entry.language,
            external_url: entry.html_url,
        }
    }
}

#[cfg(any(target_arch = "wasm32", test))]
impl RankedItem {
    pub fn description_or_default(&self) -> &str {
        self.description.as_deref().unwrap_or("No description")
    }

    pub fn updated_label(&self) -> Option<String> {
        self.secondary_metric
            .map(|timestamp| format!("Updated {}", timestamp.format("%b %-d, %Y")))
    }
}

#[cfg(any(target_arch = "wasm32", test))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedError {
    Network,
    Status(u16),
    Malformed,
}

#[cfg(any(target_arch = "wasm32", test))]
impl FeedError {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Status(_) => "status",
            Self::Malformed => "malformed",
        }
    }

    pub fn status_code(self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(code),
            _ => None,
        }
    }
}

#[cfg(any(target_arch = "wasm32", test))]
#[derive(Clone, Debug, PartialEq)]
pub enum FeedState {
    Loading,
    Error(String),
    Ready { items: Vec<RankedItem>, total: usize },
}

#[cfg(any(target_arch = "wasm32", test))]
impl FeedState {
    pub fn from_result(result: Result<Vec<FeedEntry>, FeedError>, cap: usize) -> Self {
        match result {
            Ok(entries) => {
                let total = entries.len();
                let mut items = rank_items(entries.into_iter().map(RankedItem::from).collect());
                items.truncate(cap);
                Self::Ready { items, total }
            }
            Err(_) => Self::Error(FEED_ERROR_MESSAGE.to_string()),
        }
    }

    pub fn total(&self) -> Option<usize> {
        match self {
            Self::Ready { total, .. } => Some(*total),
            _ => None,
        }
    }
}

#[cfg(any(target_arch = "wasm32", test))]
/// Most popular first; equally popular entries by most recent activity.
pub fn rank_items(mut items: Vec<RankedItem>) -> Vec<RankedItem> {
    items.sort_by(|a, b| {
        b.primary_metric
            .cmp(&a.primary_metric)
            .then_with(|| b.secondary_metric.cmp(&a.secondary_metric))
    });
    items
}

pub fn parse_entries(body: &[u8]) -> serde_json::Result<Vec<FeedEntry>> {
    serde_json::from_slice(body)
}

#[cfg(any(target_arch = "wasm32", test))]
/// Resolves to the next state, or `None` when the scope was torn down before
/// the request settled.
pub fn load_feed<F>(
    request: F,
    scope: &MountScope,
    cap: usize,
) -> impl Future<Output = Option<FeedState>> + 'static
where
    F: Future<Output = Result<Vec<FeedEntry>, FeedError>> + 'static,
{
    let ticket = scope.ticket();
    let scope = scope.clone();

    async move {
        let result = request.await;
        if !scope.admit(ticket) {
            return None;
        }
        Some(FeedState::from_result(result, cap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tokio::sync::oneshot;

    fn entry(id: u64, stars: i64, pushed_day: Option<u32>) -> FeedEntry {
        FeedEntry {
            id,
            name: format!("repo-{id}"),
            description: None,
            stargazers_count: stars,
            forks_count: 0,
            language: Some("Rust".to_string()),
            pushed_at: pushed_day.map(|day| {
                Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0)
                    .single()
                    .expect("valid date")
            }),
            html_url: format!("https://github.com/example/repo-{id}"),
        }
    }

    fn ids(state: &FeedState) -> Vec<u64> {
        match state {
            FeedState::Ready { items, .. } => items.iter().map(|item| item.id).collect(),
            other => panic!("expected ready state, got {other:?}"),
        }
    }

    #[test]
    fn ties_on_popularity_break_by_recency() {
        let entries = vec![entry(1, 5, Some(1)), entry(2, 5, Some(2)), entry(3, 3, Some(3))];
        let state = FeedState::from_result(Ok(entries), 8);

        assert_eq!(ids(&state), vec![2, 1, 3]);
    }

    #[test]
    fn entries_without_activity_sort_after_dated_ties() {
        let entries = vec![entry(1, 2, None), entry(2, 2, Some(9))];
        let state = FeedState::from_result(Ok(entries), 8);

        assert_eq!(ids(&state), vec![2, 1]);
    }

    #[test]
    fn ready_state_caps_items_but_keeps_total() {
        let entries = (0..20).map(|id| entry(id, id as i64, Some(1))).collect();
        let state = FeedState::from_result(Ok(entries), 8);

        assert_eq!(ids(&state), (12..20).rev().collect::<Vec<_>>());
        assert_eq!(state.total(), Some(20));
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(parse_entries(b"{\"message\":\"API rate limit\"}").is_err());
        assert!(parse_entries(b"not json").is_err());
    }

    #[test]
    fn payload_with_upstream_extras_parses() {
        let body = br#"[{"id":7,"name":"site","description":"  ","stargazers_count":4,
            "forks_count":1,"language":null,"pushed_at":"2024-05-01T10:00:00Z",
            "html_url":"https://github.com/example/site","private":false}]"#;
        let entries = parse_entries(body).expect("valid payload");
        let item = RankedItem::from(entries[0].clone());

        assert_eq!(item.description_or_default(), "No description");
        assert_eq!(item.updated_label().as_deref(), Some("Updated May 1, 2024"));
        assert_eq!(item.category, None);
    }

    #[tokio::test]
    async fn rejected_fetch_settles_in_error() {
        let scope = MountScope::new();
        let state = load_feed(async { Err(FeedError::Status(403)) }, &scope, 8).await;

        assert_eq!(state, Some(FeedState::Error(FEED_ERROR_MESSAGE.to_string())));
        assert_ne!(state, Some(FeedState::Loading));
    }

    #[tokio::test]
    async fn response_after_teardown_is_discarded() {
        let scope = MountScope::new();
        let (sender, receiver) = oneshot::channel();
        let pending = load_feed(
            async move { receiver.await.unwrap_or(Err(FeedError::Network)) },
            &scope,
            8,
        );

        scope.teardown();
        sender
            .send(Ok(vec![entry(1, 1, Some(1))]))
            .expect("receiver still held");

        assert_eq!(pending.await, None);
    }
}
