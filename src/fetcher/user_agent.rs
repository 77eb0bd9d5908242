//! User agent selection.
//!
//! The provider serves a reduced page without the embedded documents to
//! unknown clients, so the built-in choices are desktop browser strings.

use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;

/// Sent when no user agent is configured.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Pool for `user_agent = "impersonate"`.
pub const BROWSER_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:132.0) Gecko/20100101 Firefox/132.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Edg/131.0.0.0",
];

/// The user agent one crawl identifies with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAgent {
    /// [`DEFAULT_USER_AGENT`].
    Default,
    /// One entry of [`BROWSER_USER_AGENTS`], fixed for the lifetime of the value.
    Browser(&'static str),
    Custom(String),
}

impl UserAgent {
    /// Interpret the configured value. Unset or blank selects the default,
    /// `"impersonate"` (any case) picks from the browser pool, anything else
    /// is sent as given.
    pub fn from_setting(setting: Option<&str>) -> Self {
        match setting.map(str::trim) {
            None | Some("") => Self::Default,
            Some(s) if s.eq_ignore_ascii_case("impersonate") => Self::Browser(Self::pool_entry(
                RandomState::new().hash_one("impersonate"),
            )),
            Some(custom) => Self::Custom(custom.to_string()),
        }
    }

    fn pool_entry(seed: u64) -> &'static str {
        BROWSER_USER_AGENTS[(seed % BROWSER_USER_AGENTS.len() as u64) as usize]
    }

    /// Header value to send.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Default => DEFAULT_USER_AGENT,
            Self::Browser(ua) => ua,
            Self::Custom(ua) => ua,
        }
    }
}
