use serde_json::Value;
use tracing::warn;

use super::MapError;
use crate::extract::path::last_thumbnail;
use crate::extract::{extract_path, find_first, path_str, text_of};
use crate::models::{Video, VideoStub};

/// Thumbnail index used by the listing view for its mid-size preview.
const PREVIEW_THUMBNAIL: usize = 3;

const LIKE_LABEL: &str = "videoActions.menuRenderer.topLevelButtons.0.\
    segmentedLikeDislikeButtonRenderer.likeButton.toggleButtonRenderer.\
    defaultText.accessibility.accessibilityData.label";

const LIKE_LABEL_VIEW_MODEL: &str = "likeButtonViewModel.likeButtonViewModel.\
    toggleButtonViewModel.toggleButtonViewModel.defaultButtonViewModel.\
    buttonViewModel.accessibilityText";

/// Map one `videoRenderer` node from a channel listing.
pub fn map_video_stub(node: &Value) -> Result<VideoStub, MapError> {
    let video_id = path_str(node, "videoId")
        .filter(|id| !id.is_empty())
        .ok_or(MapError::RequiredFieldMissing {
            entity: "video listing",
            field: "videoId",
        })?
        .to_string();

    let duration = text_of(extract_path(node, "lengthText")).unwrap_or_default();

    let thumbnails = extract_path(node, "thumbnail");
    let thumbnail_url = path_str(thumbnails, &format!("thumbnails.{PREVIEW_THUMBNAIL}.url"))
        .or_else(|| last_thumbnail(thumbnails))
        .unwrap_or_default()
        .to_string();

    Ok(VideoStub {
        video_id,
        duration,
        thumbnail_url,
    })
}

/// Map listing nodes, logging and skipping the ones without an id.
pub fn map_video_stubs<'a>(nodes: impl IntoIterator<Item = &'a Value>) -> Vec<VideoStub> {
    nodes
        .into_iter()
        .filter_map(|node| match map_video_stub(node) {
            Ok(stub) => Some(stub),
            Err(e) => {
                warn!("Skipping video listing entry: {}", e);
                None
            }
        })
        .collect()
}

/// Map a watch page's content tree, completing the listing stub.
///
/// Duration and thumbnail come from the listing; the watch page is only read
/// for its primary info block.
pub fn map_video(stub: &VideoStub, watch_data: &Value, base_url: &str) -> Result<Video, MapError> {
    let missing = |field| MapError::RequiredFieldMissing {
        entity: "video",
        field,
    };

    let primary =
        find_first(watch_data, "videoPrimaryInfoRenderer").ok_or(missing("videoPrimaryInfoRenderer"))?;

    let title = text_of(extract_path(primary, "title"))
        .filter(|t| !t.is_empty())
        .ok_or(missing("title"))?;

    let view_count = text_of(extract_path(primary, "viewCount.videoViewCountRenderer.viewCount"))
        .unwrap_or_default();

    let like_label = path_str(primary, LIKE_LABEL)
        .or_else(|| {
            find_first(primary, "segmentedLikeDislikeButtonViewModel")
                .and_then(|vm| path_str(vm, LIKE_LABEL_VIEW_MODEL))
        })
        .unwrap_or_default()
        .to_string();

    let published_label = text_of(extract_path(primary, "dateText")).unwrap_or_default();

    Ok(Video {
        title,
        url: stub.watch_url(base_url),
        view_count,
        like_label,
        published_label,
        duration: stub.duration.clone(),
        thumbnail_url: stub.thumbnail_url.clone(),
    })
}
