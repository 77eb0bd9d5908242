//! Terminal progress bar for crawl runs.

use indicatif::{ProgressBar, ProgressStyle};

use crate::progress::ProgressSink;

/// Percentage bar fed by a crawl.
pub struct CrawlProgress {
    bar: ProgressBar,
}

impl CrawlProgress {
    pub fn new(handle: &str) -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}% ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        bar.set_message(handle.to_string());
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for CrawlProgress {
    fn report(&self, percent: f64) {
        let pos = percent.clamp(0.0, 100.0).round() as u64;
        if pos > self.bar.position() {
            self.bar.set_position(pos);
        }
    }
}
