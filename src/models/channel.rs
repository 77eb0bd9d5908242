//! Channel model.

use serde::{Deserialize, Serialize};

/// A channel as shown on its video tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel handle as requested (e.g. `@name`). Natural key.
    pub name: String,
    /// Follower count label as displayed ("1.2M subscribers").
    pub follower_count: String,
    /// Public profile URL.
    pub profile_url: String,
    /// Largest avatar thumbnail, empty when the page has none.
    pub avatar_url: String,
}
