//! Continuation tokens and per-stream pagination state.

use std::collections::{HashSet, VecDeque};

use serde_json::{json, Value};

use crate::extract::{extract_path, path_str};

/// Opaque cursor for the next page of a stream, with the trace params the
/// provider expects to see echoed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationToken {
    pub token: String,
    pub click_tracking_params: Option<String>,
}

impl ContinuationToken {
    /// Read a token from an endpoint node (`continuationEndpoint` or a
    /// sub-menu `serviceEndpoint`). Endpoints without a command yield `None`.
    pub fn from_endpoint(endpoint: &Value) -> Option<Self> {
        let token = path_str(endpoint, "continuationCommand.token")?;
        if token.is_empty() {
            return None;
        }
        Some(Self {
            token: token.to_string(),
            click_tracking_params: path_str(endpoint, "clickTrackingParams").map(str::to_string),
        })
    }

    /// RPC body carrying this token and the session context.
    pub fn request_body(&self, context: &Value) -> Value {
        let mut context = context.clone();
        if let (Some(params), Some(obj)) = (&self.click_tracking_params, context.as_object_mut()) {
            obj.insert(
                "clickTracking".to_string(),
                json!({ "clickTrackingParams": params }),
            );
        }
        json!({
            "context": context,
            "continuation": self.token,
        })
    }
}

/// State threaded through one pagination stream.
///
/// Tokens are served first-in first-out and a token is never served twice,
/// so a stream that keeps echoing the same cursor still terminates. A stream
/// that keeps handing out fresh cursors on pages without entities is cut off
/// after [`MAX_EMPTY_PAGES`] such pages in a row.
#[derive(Debug)]
pub struct ContinuationState {
    pending: VecDeque<ContinuationToken>,
    seen: HashSet<String>,
    accumulated: Vec<Value>,
    target: usize,
    empty_streak: usize,
}

/// Consecutive pages without entities after which a stream is abandoned.
pub const MAX_EMPTY_PAGES: usize = 3;

impl ContinuationState {
    pub fn new(target: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            seen: HashSet::new(),
            accumulated: Vec::new(),
            target,
            empty_streak: 0,
        }
    }

    /// Queue tokens found in the latest document.
    pub fn enqueue(&mut self, tokens: impl IntoIterator<Item = ContinuationToken>) {
        for token in tokens {
            if !self.seen.contains(&token.token) {
                self.pending.push_back(token);
            }
        }
    }

    /// Next unseen token, marking it seen.
    pub fn next_token(&mut self) -> Option<ContinuationToken> {
        while let Some(token) = self.pending.pop_front() {
            if self.seen.insert(token.token.clone()) {
                return Some(token);
            }
        }
        None
    }

    pub fn accumulate(&mut self, entities: impl IntoIterator<Item = Value>) {
        self.accumulated.extend(entities);
    }

    /// Accumulate the entities of one fetched page and track pages that
    /// brought nothing.
    pub fn record_page(&mut self, entities: Vec<Value>) {
        if entities.is_empty() {
            self.empty_streak += 1;
        } else {
            self.empty_streak = 0;
        }
        self.accumulated.extend(entities);
    }

    /// Whether the last [`MAX_EMPTY_PAGES`] pages brought no entities.
    pub fn is_stalled(&self) -> bool {
        self.empty_streak >= MAX_EMPTY_PAGES
    }

    pub fn collected(&self) -> usize {
        self.accumulated.len()
    }

    /// Entities still wanted before the target is met.
    pub fn remaining_target(&self) -> usize {
        self.target.saturating_sub(self.accumulated.len())
    }

    pub fn is_satisfied(&self) -> bool {
        self.remaining_target() == 0
    }

    pub fn into_entities(self) -> Vec<Value> {
        self.accumulated
    }
}

/// Tokens from every node at `path` relative to each of `nodes`.
pub(crate) fn tokens_at<'a>(
    nodes: impl IntoIterator<Item = &'a Value>,
    path: &str,
) -> Vec<ContinuationToken> {
    nodes
        .into_iter()
        .filter_map(|node| ContinuationToken::from_endpoint(extract_path(node, path)))
        .collect()
}
