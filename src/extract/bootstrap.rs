//! Root documents embedded in a provider page.
//!
//! A channel or watch page carries two JSON literals inside inline scripts:
//! the client configuration passed to `ytcfg.set(...)` and the initial
//! content tree assigned to `ytInitialData`. Both are cut out with anchored
//! patterns and decoded; a missing anchor almost always means the markup
//! changed, so there is no retry here.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static CONFIG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ytcfg\.set\((.+?)\); window\.ytcfg").expect("valid config pattern")
});

static INITIAL_DATA_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"var ytInitialData = (.+?);</script><script nonce=""#)
        .expect("valid initial data pattern")
});

/// Errors raised when the root documents cannot be recovered.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("{document} marker not found in page")]
    MarkerNotFound { document: &'static str },

    #[error("{document} is not valid JSON: {source}")]
    InvalidJson {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("session config has no {field}")]
    MissingSessionField { field: &'static str },
}

/// The two root documents of a page.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    /// Client configuration (API key, client context).
    pub config: Value,
    /// Initial content tree rendered into the page.
    pub initial_data: Value,
}

/// Decode both root documents from raw page text.
pub fn parse_bootstrap(page: &str) -> Result<Bootstrap, BootstrapError> {
    let config = capture_json(&CONFIG_PATTERN, page, "ytcfg")?;
    let initial_data = capture_json(&INITIAL_DATA_PATTERN, page, "ytInitialData")?;
    Ok(Bootstrap {
        config,
        initial_data,
    })
}

/// Decode only the content tree. Watch pages reuse the channel's session.
pub fn parse_initial_data(page: &str) -> Result<Value, BootstrapError> {
    capture_json(&INITIAL_DATA_PATTERN, page, "ytInitialData")
}

fn capture_json(
    pattern: &Regex,
    page: &str,
    document: &'static str,
) -> Result<Value, BootstrapError> {
    let literal = pattern
        .captures(page)
        .and_then(|caps| caps.get(1))
        .ok_or(BootstrapError::MarkerNotFound { document })?;

    serde_json::from_str(literal.as_str())
        .map_err(|source| BootstrapError::InvalidJson { document, source })
}

/// Session context sent with every RPC request of one crawl.
#[derive(Debug, Clone)]
pub struct Session {
    pub api_key: String,
    pub context: Value,
}

impl Session {
    /// Build a session from the page config, forcing the interface language
    /// so labels and relative dates come back in a known form.
    pub fn from_config(config: &Value, language: &str) -> Result<Self, BootstrapError> {
        let api_key = config
            .get("INNERTUBE_API_KEY")
            .and_then(Value::as_str)
            .ok_or(BootstrapError::MissingSessionField {
                field: "INNERTUBE_API_KEY",
            })?
            .to_string();

        let mut context = config
            .get("INNERTUBE_CONTEXT")
            .filter(|c| c.is_object())
            .cloned()
            .ok_or(BootstrapError::MissingSessionField {
                field: "INNERTUBE_CONTEXT",
            })?;

        if let Some(client) = context.get_mut("client").and_then(Value::as_object_mut) {
            client.insert("hl".to_string(), Value::String(language.to_string()));
        }

        Ok(Self { api_key, context })
    }
}
