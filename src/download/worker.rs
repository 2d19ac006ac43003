//! Resumable single-image download with bounded retries.

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use super::client::{HttpClient, content_type, stream_to_file};
use super::error::DownloadError;
use super::filename::resolve_filename;
use super::retry::{RetryDecision, RetryPolicy};
use crate::resume::{DownloadLog, LogError};

/// What happened to one media URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Already in the download log; no request was made.
    Skipped,
    /// Saved to disk and recorded in the log.
    Downloaded {
        /// File name inside the destination directory.
        filename: String,
        /// Bytes written.
        bytes: u64,
    },
    /// Every attempt failed; the failure was recorded in the log.
    Failed {
        /// Attempts made.
        attempts: u32,
        /// Display form of the last attempt's error.
        last_error: String,
    },
}

/// Prefix given to image names that would overwrite a bookkeeping file.
const RESERVED_NAME_PREFIX: &str = "media_";

/// Downloads images into a directory, consulting and updating a [`DownloadLog`].
#[derive(Debug, Clone)]
pub struct Downloader {
    client: HttpClient,
    retry: RetryPolicy,
    reserved: Vec<String>,
}

impl Downloader {
    /// Creates a downloader sharing `client`'s connection pool.
    #[must_use]
    pub fn new(client: HttpClient, retry: RetryPolicy) -> Self {
        Self {
            client,
            retry,
            reserved: Vec::new(),
        }
    }

    /// File names images must never be saved under, such as the diagnostics
    /// file. The download log's own name is always reserved.
    #[must_use]
    pub fn with_reserved_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved.extend(names.into_iter().map(Into::into));
        self
    }

    /// Downloads `url` into `dest_dir` unless the log already has it.
    ///
    /// Attempt failures are retried per the policy and, once exhausted,
    /// recorded with [`DownloadLog::record_failure`]; they never surface as
    /// errors.
    ///
    /// # Errors
    ///
    /// Returns [`LogError`] only if the log cannot be persisted.
    #[instrument(skip(self, log), fields(url = %url))]
    pub async fn download(
        &self,
        url: &str,
        dest_dir: &Path,
        log: &mut DownloadLog,
    ) -> Result<DownloadOutcome, LogError> {
        if log.has(url) {
            debug!("already downloaded, skipping");
            return Ok(DownloadOutcome::Skipped);
        }

        let mut attempt = 1;
        loop {
            match self.attempt(url, dest_dir, log).await {
                Ok((filename, bytes)) => {
                    log.record_success(url, &filename)?;
                    info!(filename = %filename, bytes, attempt, "image downloaded");
                    return Ok(DownloadOutcome::Downloaded { filename, bytes });
                }
                Err(error) => {
                    warn!(attempt, error = %error, "image download attempt failed");
                    match self.retry.should_retry(attempt) {
                        RetryDecision::Retry {
                            delay,
                            attempt: next,
                        } => {
                            tokio::time::sleep(delay).await;
                            attempt = next;
                        }
                        RetryDecision::DoNotRetry { reason } => {
                            log.record_failure(url)?;
                            warn!(
                                attempts = attempt,
                                failures = log.failure_count(url),
                                reason = %reason,
                                error = %error,
                                "image download failed"
                            );
                            return Ok(DownloadOutcome::Failed {
                                attempts: attempt,
                                last_error: error.to_string(),
                            });
                        }
                    }
                }
            }
        }
    }

    async fn attempt(
        &self,
        url: &str,
        dest_dir: &Path,
        log: &DownloadLog,
    ) -> Result<(String, u64), DownloadError> {
        let response = self.client.get(url).await?;
        let declared = content_type(&response);
        if !declared.trim_start().to_ascii_lowercase().starts_with("image") {
            return Err(DownloadError::unexpected_content_type(url, declared));
        }

        let filename = self.unreserved(resolve_filename(url, &declared), log);
        let path = dest_dir.join(&filename);
        let bytes = stream_to_file(response, url, &path).await?;
        Ok((filename, bytes))
    }

    fn unreserved(&self, filename: String, log: &DownloadLog) -> String {
        let log_name = log.path().file_name().and_then(|name| name.to_str());
        if log_name == Some(filename.as_str()) || self.reserved.contains(&filename) {
            let renamed = format!("{RESERVED_NAME_PREFIX}{filename}");
            debug!(original = %filename, renamed = %renamed, "image name is reserved, renaming");
            return renamed;
        }
        filename
    }
}
