//! Comment and comment author models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A comment author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name. Natural key.
    pub display_name: String,
    /// Provider channel id of the author, empty when absent.
    pub profile_ref: String,
    /// Avatar thumbnail, empty when absent.
    pub avatar_url: String,
}

/// A top-level comment or reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    /// Absolute date resolved from the relative published phrase.
    pub published: NaiveDate,
    /// Vote count label, `"0"` when the comment shows none.
    pub like_count: String,
    pub author: User,
}
