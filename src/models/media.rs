//! Media file references attached to channels, videos and users.

use serde::{Deserialize, Serialize};

/// File kind recorded for thumbnails and avatars.
pub const IMAGE_KIND: &str = "image";

/// Owner of a media file. Each kind has its own files table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    Channel,
    Video,
    User,
}

impl OwnerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Channel => "channel",
            Self::Video => "video",
            Self::User => "user",
        }
    }

    pub fn owner_column(&self) -> &'static str {
        match self {
            Self::Channel => "channel_id",
            Self::Video => "video_id",
            Self::User => "user_id",
        }
    }
}

/// A media file row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    pub kind: String,
    pub path_or_url: String,
    pub owner_id: i64,
    pub owner_kind: OwnerKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_column_names_the_owner() {
        for kind in [OwnerKind::Channel, OwnerKind::Video, OwnerKind::User] {
            assert!(kind.owner_column().starts_with(kind.as_str()));
        }
    }
}
