//! Comment stream of a watch page.

use serde_json::Value;

use super::state::tokens_at;
use super::{ContinuationToken, PaginationKind};
use crate::extract::{extract_path, find_first, find_keys, path_str};

const COMMENT_SECTION: &str = "comment-item-section";

/// Paginates a video's comments through the next endpoint.
///
/// The first request goes through the comment sort menu; afterwards every
/// continuation in a response is queued, reply threads included, and served
/// in arrival order.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommentStream;

impl PaginationKind for CommentStream {
    fn name(&self) -> &'static str {
        "comments"
    }

    fn endpoint(&self) -> &'static str {
        "/youtubei/v1/next"
    }

    fn first_tokens(&self, seed: &Value) -> Vec<ContinuationToken> {
        if let Some(token) = find_first(seed, "subMenuItems")
            .map(|items| extract_path(items, "0.serviceEndpoint"))
            .and_then(ContinuationToken::from_endpoint)
        {
            return vec![token];
        }

        find_keys(seed, "itemSectionRenderer")
            .into_iter()
            .filter(|section| path_str(section, "sectionIdentifier") == Some(COMMENT_SECTION))
            .flat_map(|section| tokens_at(find_first(section, "continuationEndpoint"), ""))
            .take(1)
            .collect()
    }

    fn next_tokens(&self, page: &Value) -> Vec<ContinuationToken> {
        tokens_at(find_keys(page, "continuationEndpoint"), "")
    }

    fn entities(&self, page: &Value) -> Vec<Value> {
        find_keys(page, "commentRenderer").into_iter().cloned().collect()
    }
}
