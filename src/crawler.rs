//! Channel crawl pipeline.
//!
//! One crawl runs strictly in sequence: channel page, video stream, then for
//! every selected video its watch page and comment stream. Only failures that
//! make the channel itself unusable (or the database unwritable) abort the
//! run; per-video and per-comment problems are logged, counted and skipped.

use std::collections::HashSet;
use std::fmt;

use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Settings;
use crate::extract::{parse_bootstrap, parse_initial_data, BootstrapError, Session};
use crate::fetcher::{FetchError, Fetcher};
use crate::mappers::{map_channel, map_comment, map_video, map_video_stubs};
use crate::models::VideoStub;
use crate::pagination::{paginate, CommentStream, StopReason, VideoStream};
use crate::progress::ProgressSink;
use crate::repository::{RepositoryError, Store};

/// Default number of videos crawled per channel.
pub const DEFAULT_VIDEO_TARGET: usize = 10;

/// Default number of comments fetched per video.
pub const DEFAULT_COMMENT_TARGET: usize = 1000;

/// What to crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    /// Channel handle as it appears in the channel URL, e.g. `@name`.
    pub handle: String,
    pub video_target: usize,
    pub comment_target: usize,
}

impl CrawlRequest {
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            video_target: DEFAULT_VIDEO_TARGET,
            comment_target: DEFAULT_COMMENT_TARGET,
        }
    }
}

/// Counters of a finished crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    pub channel_id: i64,
    pub videos_saved: usize,
    pub videos_skipped: usize,
    pub comments_saved: usize,
    pub comments_skipped: usize,
    pub comment_streams_interrupted: usize,
    /// Why the video stream stopped.
    pub video_stream: Option<StopReason>,
}

/// Step of the crawl a fatal error happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlStage {
    ChannelPage,
    Session,
    SaveChannel,
    SaveVideo,
    SaveComments,
}

impl CrawlStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChannelPage => "channel page",
            Self::Session => "session",
            Self::SaveChannel => "save channel",
            Self::SaveVideo => "save video",
            Self::SaveComments => "save comments",
        }
    }
}

impl fmt::Display for CrawlStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures that abort a channel crawl.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("{handle}: could not bootstrap ({stage}): {source}")]
    Bootstrap {
        handle: String,
        stage: CrawlStage,
        #[source]
        source: BootstrapError,
    },

    #[error("{handle}: fetch failed ({stage}): {source}")]
    Fetch {
        handle: String,
        stage: CrawlStage,
        #[source]
        source: FetchError,
    },

    #[error("{handle}: storage failed ({stage}): {source}")]
    Storage {
        handle: String,
        stage: CrawlStage,
        #[source]
        source: RepositoryError,
    },
}

/// Crawls channels through a [`Fetcher`] into a [`Store`].
pub struct Crawler<F> {
    fetcher: F,
    store: Store,
    settings: Settings,
    clock: fn() -> NaiveDateTime,
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(fetcher: F, store: Store, settings: Settings) -> Self {
        Self {
            fetcher,
            store,
            settings,
            clock: local_now,
        }
    }

    /// Replace the clock relative comment dates are resolved against.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    fn base_url(&self) -> &str {
        self.settings.base_url.trim_end_matches('/')
    }

    /// Crawl one channel. Progress is reported after every video.
    pub async fn crawl_channel(
        &self,
        request: &CrawlRequest,
        progress: &dyn ProgressSink,
    ) -> Result<CrawlReport, CrawlError> {
        let handle = request.handle.as_str();
        let base_url = self.base_url();
        let channel_url = format!("{}/{}/videos", base_url, handle);

        info!("Crawling channel {}", handle);
        let page = self
            .fetcher
            .get_text(&channel_url)
            .await
            .map_err(|source| CrawlError::Fetch {
                handle: handle.to_string(),
                stage: CrawlStage::ChannelPage,
                source,
            })?;

        let bootstrap = parse_bootstrap(&page).map_err(|source| CrawlError::Bootstrap {
            handle: handle.to_string(),
            stage: CrawlStage::ChannelPage,
            source,
        })?;
        let session = Session::from_config(&bootstrap.config, &self.settings.language).map_err(
            |source| CrawlError::Bootstrap {
                handle: handle.to_string(),
                stage: CrawlStage::Session,
                source,
            },
        )?;

        let channel = map_channel(handle, &bootstrap.initial_data, base_url);
        let channel_id = self
            .store
            .save_channel(&channel)
            .map_err(|source| storage_error(handle, CrawlStage::SaveChannel, source))?;

        let mut report = CrawlReport {
            channel_id,
            ..Default::default()
        };

        let listing = paginate(
            &self.fetcher,
            &session,
            base_url,
            &VideoStream,
            &bootstrap.initial_data,
            request.video_target,
        )
        .await;

        let stubs = distinct_videos(map_video_stubs(&listing.entities));
        report.video_stream = Some(listing.stop);
        info!("{}: crawling {} video(s)", handle, stubs.len());

        let total = stubs.len();
        for (done, stub) in stubs.iter().enumerate() {
            self.crawl_video(handle, &session, channel_id, stub, request.comment_target, &mut report)
                .await?;
            progress.report((done + 1) as f64 / total as f64 * 100.0);
        }
        progress.report(100.0);

        info!(
            "{}: {} video(s) saved, {} skipped, {} comment(s) saved",
            handle, report.videos_saved, report.videos_skipped, report.comments_saved
        );
        Ok(report)
    }

    async fn crawl_video(
        &self,
        handle: &str,
        session: &Session,
        channel_id: i64,
        stub: &VideoStub,
        comment_target: usize,
        report: &mut CrawlReport,
    ) -> Result<(), CrawlError> {
        let base_url = self.base_url();
        let watch_url = stub.watch_url(base_url);

        let page = match self.fetcher.get_text(&watch_url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Skipping video {}: {}", stub.video_id, e);
                report.videos_skipped += 1;
                return Ok(());
            }
        };
        let watch_data = match parse_initial_data(&page) {
            Ok(data) => data,
            Err(e) => {
                warn!("Skipping video {}: {}", stub.video_id, e);
                report.videos_skipped += 1;
                return Ok(());
            }
        };
        let video = match map_video(stub, &watch_data, base_url) {
            Ok(video) => video,
            Err(e) => {
                warn!("Skipping video {}: {}", stub.video_id, e);
                report.videos_skipped += 1;
                return Ok(());
            }
        };

        let video_id = self
            .store
            .save_video(channel_id, &video)
            .map_err(|source| storage_error(handle, CrawlStage::SaveVideo, source))?;
        report.videos_saved += 1;

        if comment_target == 0 {
            return Ok(());
        }

        let stream = paginate(
            &self.fetcher,
            session,
            base_url,
            &CommentStream,
            &watch_data,
            comment_target,
        )
        .await;
        if stream.stop.is_interrupted() {
            warn!(
                "Comments of {} incomplete ({} collected): {}",
                stub.video_id,
                stream.entities.len(),
                stream.stop
            );
            report.comment_streams_interrupted += 1;
        }

        let now = (self.clock)();
        let mut comments = Vec::with_capacity(stream.entities.len());
        for node in &stream.entities {
            match map_comment(node, now) {
                Ok(comment) => comments.push(comment),
                Err(e) => {
                    warn!("Skipping comment on {}: {}", stub.video_id, e);
                    report.comments_skipped += 1;
                }
            }
        }

        report.comments_saved += self
            .store
            .save_comments(video_id, &comments)
            .map_err(|source| storage_error(handle, CrawlStage::SaveComments, source))?;
        Ok(())
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn storage_error(handle: &str, stage: CrawlStage, source: RepositoryError) -> CrawlError {
    CrawlError::Storage {
        handle: handle.to_string(),
        stage,
        source,
    }
}

/// Distinct videos in listing order. Every fetched page is kept whole, so
/// this may return more than the requested target.
fn distinct_videos(stubs: Vec<VideoStub>) -> Vec<VideoStub> {
    let mut seen = HashSet::new();
    stubs
        .into_iter()
        .filter(|stub| seen.insert(stub.video_id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub(id: &str) -> VideoStub {
        VideoStub {
            video_id: id.to_string(),
            duration: String::new(),
            thumbnail_url: String::new(),
        }
    }

    #[test]
    fn test_distinct_videos_keeps_order_without_truncating() {
        let picked = distinct_videos(vec![stub("a"), stub("b"), stub("a"), stub("c"), stub("d")]);
        let ids: Vec<_> = picked.iter().map(|s| s.video_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_request_defaults() {
        let request = CrawlRequest::new("@chan");
        assert_eq!(request.video_target, 10);
        assert_eq!(request.comment_target, 1000);
    }

    #[test]
    fn test_error_names_handle_and_stage() {
        let err = CrawlError::Bootstrap {
            handle: "@chan".to_string(),
            stage: CrawlStage::ChannelPage,
            source: BootstrapError::MarkerNotFound { document: "ytcfg" },
        };
        let msg = err.to_string();
        assert!(msg.contains("@chan"));
        assert!(msg.contains("channel page"));
    }
}
