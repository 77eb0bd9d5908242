//! Crawl command.

use std::time::Duration;

use console::style;

use crate::cli::progress::CrawlProgress;
use crate::config::Settings;
use crate::crawler::{CrawlRequest, Crawler};
use crate::fetcher::HttpFetcher;
use crate::repository::Store;

/// Crawl one channel into the configured database.
pub async fn cmd_crawl(
    settings: &Settings,
    handle: &str,
    videos: usize,
    comments: usize,
) -> anyhow::Result<()> {
    let store = Store::open(&settings.database)?;
    let fetcher = HttpFetcher::new(
        Duration::from_secs(settings.request_timeout),
        Duration::from_millis(settings.request_delay_ms),
        settings.user_agent.as_deref(),
    )?;
    let crawler = Crawler::new(fetcher, store, settings.clone());

    let request = CrawlRequest {
        handle: handle.to_string(),
        video_target: videos,
        comment_target: comments,
    };

    let progress = CrawlProgress::new(handle);
    let result = crawler.crawl_channel(&request, &progress).await;
    progress.finish();
    let report = result?;

    println!(
        "{} {}: {} video(s), {} comment(s) saved to {}",
        style("✓").green(),
        handle,
        report.videos_saved,
        report.comments_saved,
        settings.database.display()
    );
    if report.videos_skipped > 0 {
        println!(
            "  {} {} video(s) skipped",
            style("!").yellow(),
            report.videos_skipped
        );
    }
    if report.comments_skipped > 0 {
        println!(
            "  {} {} comment(s) skipped",
            style("!").yellow(),
            report.comments_skipped
        );
    }
    if report.comment_streams_interrupted > 0 {
        println!(
            "  {} comments incomplete on {} video(s)",
            style("!").yellow(),
            report.comment_streams_interrupted
        );
    }
    Ok(())
}
