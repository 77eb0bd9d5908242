//! Tables of the persisted layout.

use std::fmt;

/// A table the store writes to. Table and column names only ever come from
/// here, never from input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Channels,
    Videos,
    Comments,
    Users,
    ChannelFiles,
    VideoFiles,
    UserFiles,
}

impl Table {
    pub const ALL: [Table; 7] = [
        Table::Channels,
        Table::Videos,
        Table::Comments,
        Table::Users,
        Table::ChannelFiles,
        Table::VideoFiles,
        Table::UserFiles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Channels => "channels",
            Self::Videos => "videos",
            Self::Comments => "comments",
            Self::Users => "users",
            Self::ChannelFiles => "channel_files",
            Self::VideoFiles => "video_files",
            Self::UserFiles => "user_files",
        }
    }

    /// Surrogate key column.
    pub fn id_column(&self) -> &'static str {
        match self {
            Self::Channels => "channel_id",
            Self::Videos => "video_id",
            Self::Comments => "comment_id",
            Self::Users => "user_id",
            Self::ChannelFiles | Self::VideoFiles | Self::UserFiles => "file_id",
        }
    }

    /// Writable columns, surrogate key excluded.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Channels => &["channel_name", "channel_amount_followers", "channel_link"],
            Self::Videos => &[
                "video_name",
                "video_link",
                "video_views",
                "video_likes",
                "video_date",
                "video_duration",
                "channel_id",
            ],
            Self::Comments => &[
                "comment_text",
                "comment_date",
                "comment_likes",
                "user_id",
                "video_id",
            ],
            Self::Users => &["user_name", "user_link"],
            Self::ChannelFiles => &["file_type", "file_path", "channel_id"],
            Self::VideoFiles => &["file_type", "file_path", "video_id"],
            Self::UserFiles => &["file_type", "file_path", "user_id"],
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns().contains(&column)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
