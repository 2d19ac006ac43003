//! Progress callbacks for crawl runs.
//!
//! The crawler reports through a [`ProgressSink`]; every method defaults to a
//! no-op so implementors override only what they render.

use crate::download::DownloadOutcome;

/// Receives per-page and per-item progress from the crawler.
pub trait ProgressSink: Send + Sync {
    /// A page was fetched and `links` media URLs were found on it.
    fn page_started(&self, _page: u32, _links: usize) {}

    /// One media URL finished (downloaded, skipped, or failed).
    fn item_finished(&self, _url: &str, _outcome: &DownloadOutcome) {}

    /// Every link on `page` has been processed.
    fn page_finished(&self, _page: u32) {}
}

/// Progress sink that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {}
