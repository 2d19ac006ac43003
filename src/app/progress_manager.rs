//! Progress bar rendering for crawl runs.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use nitter_dl::{DownloadOutcome, ProgressSink};

/// Draws one progress bar per listing page.
pub(crate) struct ProgressDisplay {
    enabled: bool,
    current: Mutex<Option<ProgressBar>>,
}

impl ProgressDisplay {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            current: Mutex::new(None),
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        let guard = self
            .current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(bar) = guard.as_ref() {
            f(bar);
        }
    }
}

impl ProgressSink for ProgressDisplay {
    fn page_started(&self, page: u32, links: usize) {
        let target = if self.enabled {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        let bar = ProgressBar::with_draw_target(Some(links as u64), target);
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(format!("page {page}"));
        *self
            .current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(bar);
    }

    fn item_finished(&self, _url: &str, _outcome: &DownloadOutcome) {
        self.with_bar(|bar| bar.inc(1));
    }

    fn page_finished(&self, _page: u32) {
        self.with_bar(ProgressBar::finish);
    }
}
