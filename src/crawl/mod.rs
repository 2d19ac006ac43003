//! Crawl orchestration: pages → links → downloads.
//!
//! Pages are processed strictly in order, and so are the links on each page.
//! The crawl stops at the configured page limit or at the first page that
//! cannot be fetched (or is empty); the two are not distinguished beyond the
//! [`StopReason`] reported in the summary.

mod page;

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, instrument};

pub use page::PageFetcher;

use crate::config::{ConfigError, ScraperConfig};
use crate::download::{DownloadError, DownloadOutcome, Downloader, HttpClient};
use crate::parser::LinkExtractor;
use crate::progress::ProgressSink;
use crate::resume::{DownloadLog, LogError};

/// Errors that abort a crawl.
///
/// Per-page and per-image failures are not errors; they end up in the
/// download log and the summary.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error(transparent)]
    Client(#[from] DownloadError),

    /// The user directory could not be created.
    #[error("cannot create output directory {path}: {source}")]
    Io {
        /// Directory that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The download log is corrupt or cannot be written.
    #[error(transparent)]
    Log(#[from] LogError),
}

/// Why the crawl loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every page up to the configured maximum was processed.
    MaxPagesReached,
    /// This page was empty or could not be fetched after retries.
    PageUnavailable {
        /// The page number that ended the crawl.
        page: u32,
    },
}

/// Totals for one crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Pages fetched and processed.
    pub pages_fetched: u32,
    /// Images newly saved.
    pub downloaded: usize,
    /// Links already present in the download log.
    pub skipped: usize,
    /// Links whose attempts were exhausted.
    pub failed: usize,
    /// Why the crawl stopped.
    pub stop_reason: StopReason,
}

impl Default for CrawlSummary {
    fn default() -> Self {
        Self {
            pages_fetched: 0,
            downloaded: 0,
            skipped: 0,
            failed: 0,
            stop_reason: StopReason::MaxPagesReached,
        }
    }
}

impl CrawlSummary {
    fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded { .. } => self.downloaded += 1,
            DownloadOutcome::Skipped => self.skipped += 1,
            DownloadOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Links seen across all pages.
    #[must_use]
    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }
}

/// Drives one profile crawl from a [`ScraperConfig`].
#[derive(Debug, Clone)]
pub struct Crawler {
    config: ScraperConfig,
    fetcher: PageFetcher,
    extractor: LinkExtractor,
    downloader: Downloader,
}

impl Crawler {
    /// Validates `config` and builds the shared HTTP client and components.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Config`] for invalid settings or
    /// [`CrawlError::Client`] if the HTTP client cannot be built.
    pub fn new(config: ScraperConfig) -> Result<Self, CrawlError> {
        config.validate()?;
        let instance = config.instance_url()?;
        let client = HttpClient::new(config.request_timeout)?;

        Ok(Self {
            fetcher: PageFetcher::new(client.clone(), instance.clone(), config.page_retry()),
            extractor: LinkExtractor::new(instance),
            downloader: Downloader::new(client, config.download_retry())
                .with_reserved_names([config.error_log_filename.clone()]),
            config,
        })
    }

    /// The configuration this crawler was built from.
    #[must_use]
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Runs the crawl, creating the user directory and download log as needed.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError`] if the user directory cannot be created or the
    /// download log is corrupt or cannot be persisted.
    #[instrument(skip(self, progress), fields(username = %self.config.username))]
    pub async fn run(&self, progress: &dyn ProgressSink) -> Result<CrawlSummary, CrawlError> {
        let user_dir = self.config.user_dir();
        tokio::fs::create_dir_all(&user_dir)
            .await
            .map_err(|source| CrawlError::Io {
                path: user_dir.clone(),
                source,
            })?;
        let mut log = DownloadLog::open(&self.config.log_path())?;
        let username = self.config.username.trim();

        info!(
            dir = %user_dir.display(),
            max_pages = self.config.max_pages,
            already_downloaded = log.downloaded().len(),
            "crawl starting"
        );

        let mut summary = CrawlSummary::default();
        for page in 1..=self.config.max_pages {
            let Some(html) = self.fetcher.fetch(username, page).await else {
                info!(page, "page unavailable, stopping crawl");
                summary.stop_reason = StopReason::PageUnavailable { page };
                break;
            };
            summary.pages_fetched += 1;

            let links = self.extractor.extract(&html);
            info!(page, links = links.len(), "processing page");
            progress.page_started(page, links.len());

            for url in &links {
                let outcome = self.downloader.download(url, &user_dir, &mut log).await?;
                summary.record(&outcome);
                progress.item_finished(url, &outcome);
            }
            progress.page_finished(page);

            if page < self.config.max_pages {
                tokio::time::sleep(self.config.page_delay).await;
            }
        }

        info!(
            pages = summary.pages_fetched,
            downloaded = summary.downloaded,
            skipped = summary.skipped,
            failed = summary.failed,
            stop_reason = ?summary.stop_reason,
            "crawl finished"
        );
        Ok(summary)
    }
}
