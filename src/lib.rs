//! Nitter media downloader library.
//!
//! Crawls a profile's listing pages on a Nitter instance, extracts
//! original-quality image links, and downloads them into
//! `output_dir/username/` with a resumable download log.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Explicit run configuration
//! - [`crawl`] - Page iteration and orchestration
//! - [`download`] - HTTP client, retries, filenames, and the image worker
//! - [`parser`] - Media link extraction from listing markup
//! - [`progress`] - Optional progress callbacks
//! - [`resume`] - The persisted download log

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod crawl;
pub mod download;
pub mod parser;
pub mod progress;
pub mod resume;
mod user_agent;

// Re-export commonly used types
pub use config::{ConfigError, ScraperConfig};
pub use crawl::{CrawlError, CrawlSummary, Crawler, PageFetcher, StopReason};
pub use download::{
    DEFAULT_MAX_ATTEMPTS, DownloadError, DownloadOutcome, Downloader, HttpClient, RetryPolicy,
    resolve_filename,
};
pub use parser::LinkExtractor;
pub use progress::{NoopProgress, ProgressSink};
pub use resume::{DownloadLog, LogError};
