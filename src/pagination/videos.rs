//! Video listing stream of a channel.

use serde_json::Value;

use super::state::tokens_at;
use super::{ContinuationToken, PaginationKind};
use crate::extract::find_keys;

/// Paginates the channel's video grid through the browse endpoint.
///
/// The channel page itself is the first page, so its `videoRenderer`s count
/// toward the target. Only one continuation is followed per document.
#[derive(Debug, Default, Clone, Copy)]
pub struct VideoStream;

impl PaginationKind for VideoStream {
    fn name(&self) -> &'static str {
        "videos"
    }

    fn endpoint(&self) -> &'static str {
        "/youtubei/v1/browse"
    }

    fn seed_entities(&self, seed: &Value) -> Vec<Value> {
        self.entities(seed)
    }

    fn first_tokens(&self, seed: &Value) -> Vec<ContinuationToken> {
        let tokens = tokens_at(find_keys(seed, "continuationItemRenderer"), "continuationEndpoint");
        if !tokens.is_empty() {
            return tokens;
        }
        tokens_at(find_keys(seed, "continuationEndpoint"), "")
    }

    fn next_tokens(&self, page: &Value) -> Vec<ContinuationToken> {
        for key in ["onResponseReceivedActions", "onResponseReceivedEndpoints"] {
            let tokens: Vec<_> = find_keys(page, key)
                .into_iter()
                .flat_map(|actions| tokens_at(find_keys(actions, "continuationEndpoint"), ""))
                .collect();
            if !tokens.is_empty() {
                return tokens;
            }
        }
        tokens_at(find_keys(page, "continuationEndpoint"), "")
    }

    fn entities(&self, page: &Value) -> Vec<Value> {
        find_keys(page, "videoRenderer").into_iter().cloned().collect()
    }

    fn max_tokens_per_page(&self) -> Option<usize> {
        Some(1)
    }
}
