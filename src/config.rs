//! Run configuration.
//!
//! A [`ScraperConfig`] is built once (defaults, then any config-file values)
//! and handed to the crawler, which derives every component's settings from it.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::download::{DEFAULT_REQUEST_TIMEOUT, RetryPolicy};
use crate::resume::DEFAULT_LOG_FILENAME;

/// Default Nitter instance.
pub const DEFAULT_INSTANCE: &str = "https://nitter.net";

/// Default profile to crawl.
pub const DEFAULT_USERNAME: &str = "jack";

/// Default number of listing pages to crawl.
pub const DEFAULT_MAX_PAGES: u32 = 5;

/// Default delay between listing pages and between page-fetch attempts.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(1);

/// Default delay between image download attempts.
pub const DEFAULT_DOWNLOAD_DELAY: Duration = Duration::from_millis(100);

/// Default name of the human-readable diagnostics file.
pub const DEFAULT_ERROR_LOG_FILENAME: &str = "errors.log";

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The instance base URL does not parse or is not http(s).
    #[error("invalid instance URL '{value}': {reason}")]
    InvalidInstance {
        /// The configured value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The username is empty or would escape the output directory.
    #[error("invalid username '{0}'")]
    InvalidUsername(String),

    /// A file name option is empty or contains a path separator.
    #[error("invalid file name for `{field}`: '{value}'")]
    InvalidFilename {
        /// Option name.
        field: &'static str,
        /// The configured value.
        value: String,
    },
}

/// All options for one crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScraperConfig {
    /// Profile whose media is downloaded.
    pub username: String,
    /// Base URL of the Nitter instance.
    pub instance: String,
    /// Root output directory; images land in `output_dir/username/`.
    pub output_dir: PathBuf,
    /// Highest listing page number to fetch.
    pub max_pages: u32,
    /// Sleep between pages and between page-fetch attempts.
    pub page_delay: Duration,
    /// Sleep between image download attempts.
    pub download_delay: Duration,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Download log file name inside the user directory.
    pub log_filename: String,
    /// Diagnostics file name inside the user directory.
    pub error_log_filename: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            instance: DEFAULT_INSTANCE.to_string(),
            output_dir: PathBuf::from("./downloads"),
            max_pages: DEFAULT_MAX_PAGES,
            page_delay: DEFAULT_PAGE_DELAY,
            download_delay: DEFAULT_DOWNLOAD_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            log_filename: DEFAULT_LOG_FILENAME.to_string(),
            error_log_filename: DEFAULT_ERROR_LOG_FILENAME.to_string(),
        }
    }
}

impl ScraperConfig {
    /// Checks values that would otherwise fail mid-run.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.instance_url()?;
        let username = self.username.trim();
        if username.is_empty()
            || username.contains(['/', '\\'])
            || username == "."
            || username == ".."
        {
            return Err(ConfigError::InvalidUsername(self.username.clone()));
        }
        validate_filename("log_filename", &self.log_filename)?;
        validate_filename("error_log_filename", &self.error_log_filename)?;
        Ok(())
    }

    /// Parsed instance base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidInstance`] for unparseable or non-http(s) values.
    pub fn instance_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(self.instance.trim()).map_err(|e| ConfigError::InvalidInstance {
            value: self.instance.clone(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ConfigError::InvalidInstance {
                value: self.instance.clone(),
                reason: format!("unsupported scheme '{scheme}'"),
            }),
        }
    }

    /// Directory holding this user's images and logs.
    #[must_use]
    pub fn user_dir(&self) -> PathBuf {
        self.output_dir.join(self.username.trim())
    }

    /// Path of the download log.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.user_dir().join(&self.log_filename)
    }

    /// Path of the diagnostics file.
    #[must_use]
    pub fn error_log_path(&self) -> PathBuf {
        self.user_dir().join(&self.error_log_filename)
    }

    /// Retry policy for listing pages.
    #[must_use]
    pub fn page_retry(&self) -> RetryPolicy {
        RetryPolicy::with_delay(self.page_delay)
    }

    /// Retry policy for images.
    #[must_use]
    pub fn download_retry(&self) -> RetryPolicy {
        RetryPolicy::with_delay(self.download_delay)
    }
}

fn validate_filename(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() || value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(ConfigError::InvalidFilename {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
