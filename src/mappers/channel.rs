use serde_json::Value;

use crate::extract::path::last_thumbnail;
use crate::extract::{extract_path, find_first, find_keys, text_of};
use crate::models::Channel;

const HEADER: &str = "header.c4TabbedHeaderRenderer";

/// Map a channel page's content tree. Never fails: the name comes from the
/// requested handle and every other field has an empty default.
pub fn map_channel(handle: &str, initial_data: &Value, base_url: &str) -> Channel {
    let header = extract_path(initial_data, HEADER);

    let follower_count = text_of(extract_path(header, "subscriberCountText"))
        .or_else(|| find_first(initial_data, "subscriberCountText").and_then(text_of))
        .unwrap_or_default();

    let avatar_url = last_thumbnail(extract_path(header, "avatar"))
        .or_else(|| find_keys(initial_data, "avatar").into_iter().find_map(last_thumbnail))
        .unwrap_or_default()
        .to_string();

    Channel {
        name: handle.to_string(),
        follower_count,
        profile_url: format!("{}/{}", base_url.trim_end_matches('/'), handle),
        avatar_url,
    }
}
