//! Video models.

use serde::{Deserialize, Serialize};

/// A video as listed on the channel's video tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStub {
    pub video_id: String,
    /// Duration label from the listing ("12:34").
    pub duration: String,
    pub thumbnail_url: String,
}

/// A video as shown on its watch page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub title: String,
    /// Watch URL. Natural key.
    pub url: String,
    pub view_count: String,
    /// Accessibility label of the like button ("like this video along with 1,234 other people").
    pub like_label: String,
    pub published_label: String,
    pub duration: String,
    pub thumbnail_url: String,
}

impl VideoStub {
    /// Watch URL for this video under `base_url`.
    pub fn watch_url(&self, base_url: &str) -> String {
        format!("{}/watch?v={}", base_url.trim_end_matches('/'), self.video_id)
    }
}
