use chrono::NaiveDateTime;
use serde_json::Value;

use super::MapError;
use crate::extract::path::last_thumbnail;
use crate::extract::{extract_path, parse_time_ago, path_str, text_of};
use crate::models::{Comment, User};

/// Map one `commentRenderer` node.
///
/// Only the published phrase is required: it is resolved against `now` and a
/// phrase that cannot be resolved skips the comment.
pub fn map_comment(node: &Value, now: NaiveDateTime) -> Result<Comment, MapError> {
    let published_phrase = text_of(extract_path(node, "publishedTimeText")).ok_or(
        MapError::RequiredFieldMissing {
            entity: "comment",
            field: "publishedTimeText",
        },
    )?;
    let published = parse_time_ago(&published_phrase, now)?;

    let author = User {
        display_name: text_of(extract_path(node, "authorText")).unwrap_or_default(),
        profile_ref: path_str(node, "authorEndpoint.browseEndpoint.browseId")
            .unwrap_or_default()
            .to_string(),
        avatar_url: last_thumbnail(extract_path(node, "authorThumbnail"))
            .unwrap_or_default()
            .to_string(),
    };

    Ok(Comment {
        text: text_of(extract_path(node, "contentText")).unwrap_or_default(),
        published,
        like_count: text_of(extract_path(node, "voteCount")).unwrap_or_else(|| "0".to_string()),
        author,
    })
}
