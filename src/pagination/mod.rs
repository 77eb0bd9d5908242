//! Continuation-token pagination over the provider's RPC endpoints.
//!
//! A stream starts from a seed document (the bootstrap content tree of the
//! channel or watch page), pulls its first tokens out of it, and then keeps
//! posting tokens until the target entity count is met, the provider stops
//! handing out tokens, or a request fails. Failures end the stream but never
//! discard what was already collected; the caller learns why the stream ended
//! from [`StopReason`].

mod comments;
pub mod service_error;
mod state;
mod videos;

pub use comments::CommentStream;
pub use service_error::{detect, ServiceError};
pub use state::{ContinuationState, ContinuationToken, MAX_EMPTY_PAGES};
pub use videos::VideoStream;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::extract::Session;
use crate::fetcher::Fetcher;

/// Token and entity rules of one kind of stream.
pub trait PaginationKind: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// RPC path, relative to the site base URL.
    fn endpoint(&self) -> &'static str;

    /// Entities already present in the seed document.
    fn seed_entities(&self, _seed: &Value) -> Vec<Value> {
        Vec::new()
    }

    /// Tokens for the first RPC request, read from the seed document.
    fn first_tokens(&self, seed: &Value) -> Vec<ContinuationToken>;

    /// Tokens for the following requests, read from a fetched page.
    fn next_tokens(&self, page: &Value) -> Vec<ContinuationToken>;

    /// Entity subtrees contained in a fetched page.
    fn entities(&self, page: &Value) -> Vec<Value>;

    /// How many tokens of one document are followed. `None` follows all.
    fn max_tokens_per_page(&self) -> Option<usize> {
        None
    }
}

/// Why a stream stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// At least `target` entities were collected.
    TargetReached,
    /// The provider returned no further token.
    Exhausted,
    /// Several pages in a row carried tokens but no entities.
    Stalled,
    /// The provider reported a temporary failure.
    ServiceUnavailable(ServiceError),
    /// The provider answered with a non-transient error envelope.
    Rejected(ServiceError),
    /// The request itself failed (transport, status or decoding).
    FetchFailed(String),
}

impl StopReason {
    /// Whether the stream ended before running its course.
    pub fn is_interrupted(&self) -> bool {
        !matches!(self, StopReason::TargetReached | StopReason::Exhausted)
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::TargetReached => f.write_str("target reached"),
            StopReason::Exhausted => f.write_str("no more pages"),
            StopReason::Stalled => write!(f, "{} pages in a row without entities", MAX_EMPTY_PAGES),
            StopReason::ServiceUnavailable(e) => write!(f, "service unavailable ({})", e),
            StopReason::Rejected(e) => write!(f, "request rejected ({})", e),
            StopReason::FetchFailed(e) => write!(f, "fetch failed ({})", e),
        }
    }
}

/// Result of one pagination stream.
#[derive(Debug)]
pub struct PaginationOutcome {
    /// Entities in page order. Whole pages are kept, so this can exceed the
    /// target.
    pub entities: Vec<Value>,
    /// RPC pages fetched, not counting the seed document.
    pub pages_fetched: usize,
    pub stop: StopReason,
}

/// Run one stream until `target` entities are collected or it ends.
pub async fn paginate<K>(
    fetcher: &dyn Fetcher,
    session: &Session,
    base_url: &str,
    kind: &K,
    seed: &Value,
    target: usize,
) -> PaginationOutcome
where
    K: PaginationKind + ?Sized,
{
    let url = format!("{}{}", base_url.trim_end_matches('/'), kind.endpoint());
    let params = [("key", session.api_key.as_str())];

    let mut state = ContinuationState::new(target);
    state.accumulate(kind.seed_entities(seed));
    state.enqueue(limited(kind.first_tokens(seed), kind.max_tokens_per_page()));

    let mut pages_fetched = 0;
    let stop = loop {
        if state.is_satisfied() {
            break StopReason::TargetReached;
        }
        let Some(token) = state.next_token() else {
            break StopReason::Exhausted;
        };

        debug!(
            "{} page {}: {} collected, {} still wanted",
            kind.name(),
            pages_fetched + 1,
            state.collected(),
            state.remaining_target()
        );

        let body = token.request_body(&session.context);
        let page = match fetcher.post_json(&url, &params, &body).await {
            Ok(page) => page,
            Err(e) => {
                warn!("{} stream stopped, request failed: {}", kind.name(), e);
                break StopReason::FetchFailed(e.to_string());
            }
        };

        if let Some(error) = detect(&page) {
            if error.is_transient() {
                warn!("{} stream stopped, service unavailable: {}", kind.name(), error);
                break StopReason::ServiceUnavailable(error);
            }
            warn!("{} stream stopped, request rejected: {}", kind.name(), error);
            break StopReason::Rejected(error);
        }

        pages_fetched += 1;
        state.record_page(kind.entities(&page));
        if state.is_stalled() {
            warn!(
                "{} stream stopped, {} pages in a row without entities",
                kind.name(),
                MAX_EMPTY_PAGES
            );
            break StopReason::Stalled;
        }
        state.enqueue(limited(kind.next_tokens(&page), kind.max_tokens_per_page()));
    };

    info!(
        "{} stream done after {} page(s): {} entities, {}",
        kind.name(),
        pages_fetched,
        state.collected(),
        stop
    );

    PaginationOutcome {
        entities: state.into_entities(),
        pages_fetched,
        stop,
    }
}

fn limited(mut tokens: Vec<ContinuationToken>, max: Option<usize>) -> Vec<ContinuationToken> {
    if let Some(max) = max {
        tokens.truncate(max);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and records every token it was sent.
    struct Scripted {
        responses: Mutex<VecDeque<Result<Value, FetchError>>>,
        tokens: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<Value, FetchError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                tokens: Mutex::new(Vec::new()),
            }
        }

        fn tokens(&self) -> Vec<String> {
            self.tokens.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for Scripted {
        async fn get_text(&self, url: &str) -> Result<String, FetchError> {
            Err(FetchError::Status {
                status: 404,
                url: url.to_string(),
            })
        }

        async fn post_json(
            &self,
            url: &str,
            params: &[(&str, &str)],
            body: &Value,
        ) -> Result<Value, FetchError> {
            assert!(url.ends_with("/youtubei/v1/test"));
            assert_eq!(params, &[("key", "api-key")]);
            self.tokens
                .lock()
                .unwrap()
                .push(body["continuation"].as_str().unwrap_or_default().to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected request"))
        }
    }

    /// Entities under "item", tokens under "next".
    struct TestKind {
        max_tokens: Option<usize>,
    }

    impl PaginationKind for TestKind {
        fn name(&self) -> &'static str {
            "test"
        }

        fn endpoint(&self) -> &'static str {
            "/youtubei/v1/test"
        }

        fn seed_entities(&self, seed: &Value) -> Vec<Value> {
            self.entities(seed)
        }

        fn first_tokens(&self, seed: &Value) -> Vec<ContinuationToken> {
            self.next_tokens(seed)
        }

        fn next_tokens(&self, page: &Value) -> Vec<ContinuationToken> {
            crate::extract::find_keys(page, "next")
                .into_iter()
                .filter_map(ContinuationToken::from_endpoint)
                .collect()
        }

        fn entities(&self, page: &Value) -> Vec<Value> {
            crate::extract::find_keys(page, "item").into_iter().cloned().collect()
        }

        fn max_tokens_per_page(&self) -> Option<usize> {
            self.max_tokens
        }
    }

    fn session() -> Session {
        Session {
            api_key: "api-key".to_string(),
            context: json!({"client": {"hl": "en"}}),
        }
    }

    fn next(token: &str) -> Value {
        json!({"continuationCommand": {"token": token}})
    }

    fn page(items: usize, tokens: &[&str]) -> Value {
        let items: Vec<Value> = (0..items).map(|i| json!({"item": i})).collect();
        let tokens: Vec<Value> = tokens.iter().map(|t| json!({"next": next(t)})).collect();
        json!({"items": items, "tokens": tokens})
    }

    #[tokio::test]
    async fn test_stops_when_no_token_is_returned() {
        let fetcher = Scripted::new(vec![Ok(page(3, &["b"])), Ok(page(2, &[]))]);
        let kind = TestKind { max_tokens: None };
        let seed = page(1, &["a"]);

        let outcome = paginate(&fetcher, &session(), "https://x.test", &kind, &seed, 100).await;

        assert_eq!(outcome.stop, StopReason::Exhausted);
        assert_eq!(outcome.pages_fetched, 2);
        assert_eq!(outcome.entities.len(), 6);
        assert_eq!(fetcher.tokens(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_keeps_whole_pages_and_stops_at_target() {
        let fetcher = Scripted::new(vec![Ok(page(30, &["b"]))]);
        let kind = TestKind { max_tokens: Some(1) };
        let seed = page(0, &["a"]);

        let outcome = paginate(&fetcher, &session(), "https://x.test/", &kind, &seed, 25).await;

        assert_eq!(outcome.stop, StopReason::TargetReached);
        assert_eq!(outcome.entities.len(), 30);
        assert_eq!(fetcher.tokens(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_seed_entities_can_satisfy_target() {
        let fetcher = Scripted::new(vec![]);
        let kind = TestKind { max_tokens: Some(1) };
        let seed = page(5, &["a"]);

        let outcome = paginate(&fetcher, &session(), "https://x.test", &kind, &seed, 5).await;

        assert_eq!(outcome.stop, StopReason::TargetReached);
        assert_eq!(outcome.pages_fetched, 0);
        assert!(fetcher.tokens().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_token_is_not_refetched() {
        let fetcher = Scripted::new(vec![Ok(page(1, &["a"]))]);
        let kind = TestKind { max_tokens: None };
        let seed = page(0, &["a"]);

        let outcome = paginate(&fetcher, &session(), "https://x.test", &kind, &seed, 10).await;

        assert_eq!(outcome.stop, StopReason::Exhausted);
        assert_eq!(fetcher.tokens(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_fifo_order_across_pages() {
        let fetcher = Scripted::new(vec![
            Ok(page(1, &["c"])),
            Ok(page(1, &[])),
            Ok(page(1, &[])),
        ]);
        let kind = TestKind { max_tokens: None };
        let seed = page(0, &["a", "b"]);

        let outcome = paginate(&fetcher, &session(), "https://x.test", &kind, &seed, 10).await;

        assert_eq!(fetcher.tokens(), vec!["a", "b", "c"]);
        assert_eq!(outcome.entities.len(), 3);
    }

    #[tokio::test]
    async fn test_transient_error_keeps_collected_entities() {
        let unavailable = json!({"error": {"code": 503, "status": "UNAVAILABLE", "message": "busy"}});
        let fetcher = Scripted::new(vec![Ok(page(4, &["b"])), Ok(unavailable)]);
        let kind = TestKind { max_tokens: None };
        let seed = page(0, &["a"]);

        let outcome = paginate(&fetcher, &session(), "https://x.test", &kind, &seed, 100).await;

        assert!(matches!(outcome.stop, StopReason::ServiceUnavailable(_)));
        assert!(outcome.stop.is_interrupted());
        assert_eq!(outcome.entities.len(), 4);
        assert_eq!(outcome.pages_fetched, 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_reported_not_raised() {
        let fetcher = Scripted::new(vec![Err(FetchError::Status {
            status: 500,
            url: "https://x.test".to_string(),
        })]);
        let kind = TestKind { max_tokens: None };
        let seed = page(2, &["a"]);

        let outcome = paginate(&fetcher, &session(), "https://x.test", &kind, &seed, 100).await;

        assert!(matches!(outcome.stop, StopReason::FetchFailed(_)));
        assert_eq!(outcome.entities.len(), 2);
        assert_eq!(outcome.pages_fetched, 0);
    }

    #[tokio::test]
    async fn test_fresh_tokens_without_entities_stall() {
        let responses = (1..=50)
            .map(|i| Ok(page(0, &[format!("t{i}").as_str()])))
            .collect();
        let fetcher = Scripted::new(responses);
        let kind = TestKind { max_tokens: None };
        let seed = page(0, &["t0"]);

        let outcome = paginate(&fetcher, &session(), "https://x.test", &kind, &seed, 10).await;

        assert_eq!(outcome.stop, StopReason::Stalled);
        assert!(outcome.stop.is_interrupted());
        assert_eq!(outcome.pages_fetched, MAX_EMPTY_PAGES);
        assert!(outcome.entities.is_empty());
    }

    #[tokio::test]
    async fn test_empty_page_between_full_pages_does_not_stall() {
        let fetcher = Scripted::new(vec![
            Ok(page(0, &["b"])),
            Ok(page(2, &["c"])),
            Ok(page(0, &[])),
        ]);
        let kind = TestKind { max_tokens: None };
        let seed = page(0, &["a"]);

        let outcome = paginate(&fetcher, &session(), "https://x.test", &kind, &seed, 10).await;

        assert_eq!(outcome.stop, StopReason::Exhausted);
        assert_eq!(outcome.pages_fetched, 3);
        assert_eq!(outcome.entities.len(), 2);
    }

    #[tokio::test]
    async fn test_non_transient_error_is_rejected() {
        let invalid = json!({"error": {"code": 400, "status": "INVALID_ARGUMENT", "message": "bad"}});
        let fetcher = Scripted::new(vec![Ok(invalid)]);
        let kind = TestKind { max_tokens: None };
        let seed = page(0, &["a"]);

        let outcome = paginate(&fetcher, &session(), "https://x.test", &kind, &seed, 100).await;

        assert!(matches!(outcome.stop, StopReason::Rejected(_)));
    }
}
