//! Transport boundary for page and RPC requests.
//!
//! The crawl core only needs two operations: fetch a page as text and post a
//! JSON body to the RPC endpoint. [`HttpFetcher`] is the reqwest-backed
//! implementation used by the CLI; tests drive the core with scripted
//! fetchers instead.

mod http;
mod user_agent;

pub use http::HttpFetcher;
pub use user_agent::{UserAgent, BROWSER_USER_AGENTS, DEFAULT_USER_AGENT};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by a fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("response from {url} is not JSON: {source}")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid request URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Page and RPC access for one crawl.
///
/// Implementations must keep the same client identity (cookies, user agent)
/// for the lifetime of a crawl.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a page and return its body as text.
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;

    /// POST a JSON body with query parameters and decode the JSON response.
    async fn post_json(
        &self,
        url: &str,
        params: &[(&str, &str)],
        body: &Value,
    ) -> Result<Value, FetchError>;
}
