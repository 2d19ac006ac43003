//! Persisted resume state for download runs.
//!
//! The [`DownloadLog`] is the single source of truth for deciding whether a
//! media URL still needs fetching. Every mutation is written to disk
//! immediately through an atomic write-then-rename, so a killed process loses
//! at most the download that was in flight.
//!
//! # Example
//!
//! ```no_run
//! use nitter_dl::resume::DownloadLog;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), nitter_dl::resume::LogError> {
//! let mut log = DownloadLog::open(Path::new("./downloads/jack/download_log.json"))?;
//! if !log.has("https://nitter.net/pic/media%2Fabc.jpg?name=orig") {
//!     log.record_failure("https://nitter.net/pic/media%2Fabc.jpg?name=orig")?;
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod log;

pub use error::LogError;
pub use log::{DEFAULT_LOG_FILENAME, DownloadLog};
