//! One-way progress notifications for a crawl run.

/// Receives the completed fraction of a crawl as a percentage.
///
/// Values never decrease and the last one of a successful run is `100.0`.
/// Implementations must not block; the crawl never waits on them.
pub trait ProgressSink: Send + Sync {
    fn report(&self, percent: f64);
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _percent: f64) {}
}

impl<F> ProgressSink for F
where
    F: Fn(f64) + Send + Sync,
{
    fn report(&self, percent: f64) {
        self(percent)
    }
}
