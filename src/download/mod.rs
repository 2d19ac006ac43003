//! HTTP retrieval and resumable image downloads.
//!
//! # Features
//!
//! - One shared client with a fixed per-request timeout
//! - Streaming image bodies to disk (partial files removed on failure)
//! - Fixed-delay bounded retries
//! - Filenames from the decoded URL basename, extension from Content-Type
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Duration;
//!
//! use nitter_dl::download::{Downloader, HttpClient, RetryPolicy};
//! use nitter_dl::resume::DownloadLog;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new(Duration::from_secs(30))?;
//! let downloader = Downloader::new(client, RetryPolicy::with_delay(Duration::from_millis(100)));
//! let dir = Path::new("./downloads/jack");
//! let mut log = DownloadLog::open(&dir.join("download_log.json"))?;
//! let outcome = downloader
//!     .download("https://nitter.net/pic/media%2Fabc.jpg?name=orig", dir, &mut log)
//!     .await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod filename;
mod retry;
mod worker;

pub use client::{DEFAULT_REQUEST_TIMEOUT, HttpClient};
pub use error::DownloadError;
pub use filename::{extension_from_content_type, resolve_filename};
pub use retry::{DEFAULT_MAX_ATTEMPTS, RetryDecision, RetryPolicy};
pub use worker::{DownloadOutcome, Downloader};
