//! End-of-run summary text.

use nitter_dl::{CrawlSummary, StopReason};

pub(crate) fn format_summary(summary: &CrawlSummary) -> String {
    let stop = match summary.stop_reason {
        StopReason::MaxPagesReached => "page limit reached".to_string(),
        StopReason::PageUnavailable { page } => format!("page {page} unavailable"),
    };
    format!(
        "{} page(s): {} downloaded, {} already present, {} failed ({stop})",
        summary.pages_fetched, summary.downloaded, summary.skipped, summary.failed
    )
}
