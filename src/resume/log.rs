//! The persisted download log.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

use super::LogError;

/// Default file name of the download log inside a user's output directory.
pub const DEFAULT_LOG_FILENAME: &str = "download_log.json";

/// On-disk shape of the download log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct LogData {
    #[serde(deserialize_with = "timestamp::deserialize")]
    created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    updated_at: DateTime<Utc>,
    downloaded: BTreeMap<String, String>,
    errors: BTreeMap<String, u64>,
    /// Top-level keys this tool does not use, written back as found.
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl LogData {
    fn fresh() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            downloaded: BTreeMap::new(),
            errors: BTreeMap::new(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Timestamps are written as RFC 3339 UTC. Offset-less values are read as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, de::Error};

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|e| D::Error::custom(format!("invalid timestamp '{raw}': {e}")))
    }
}

/// Per-URL download outcomes, persisted after every mutation.
///
/// A URL in `downloaded` is never attempted again. Failure counts in `errors`
/// only grow; a later success does not clear them.
#[derive(Debug)]
pub struct DownloadLog {
    path: PathBuf,
    data: LogData,
}

impl DownloadLog {
    /// Opens the log at `path`, creating and persisting an empty one if absent.
    ///
    /// An existing file is returned exactly as parsed.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Corrupt`] if an existing file is not a valid log
    /// (the file is left untouched), or [`LogError::Io`] if reading or the
    /// initial write fails.
    #[instrument(fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self, LogError> {
        match std::fs::read(path) {
            Ok(raw) => {
                let data: LogData = serde_json::from_slice(&raw).map_err(|e| {
                    warn!(error = %e, "download log is not parseable, refusing to continue");
                    LogError::corrupt(path, e)
                })?;
                info!(
                    downloaded = data.downloaded.len(),
                    errors = data.errors.len(),
                    "download log loaded"
                );
                Ok(Self {
                    path: path.to_path_buf(),
                    data,
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if let Some(parent) = non_empty_parent(path) {
                    std::fs::create_dir_all(parent).map_err(|e| LogError::io(parent, e))?;
                }
                let log = Self {
                    path: path.to_path_buf(),
                    data: LogData::fresh(),
                };
                log.persist()?;
                info!("created new download log");
                Ok(log)
            }
            Err(e) => Err(LogError::io(path, e)),
        }
    }

    /// Returns true iff `url` was downloaded successfully in this or a prior run.
    #[must_use]
    pub fn has(&self, url: &str) -> bool {
        self.data.downloaded.contains_key(url)
    }

    /// Records `url` as saved under `filename` and persists the log.
    ///
    /// # Errors
    ///
    /// Returns [`LogError`] if the log cannot be written.
    pub fn record_success(&mut self, url: &str, filename: &str) -> Result<(), LogError> {
        self.data
            .downloaded
            .insert(url.to_string(), filename.to_string());
        self.touch_and_persist()
    }

    /// Increments the failure count for `url` and persists the log.
    ///
    /// # Errors
    ///
    /// Returns [`LogError`] if the log cannot be written.
    pub fn record_failure(&mut self, url: &str) -> Result<(), LogError> {
        let count = self.data.errors.entry(url.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        debug!(url, failures = *count, "recorded download failure");
        self.touch_and_persist()
    }

    /// Filename a URL was saved under, if it has been downloaded.
    #[must_use]
    pub fn filename_for(&self, url: &str) -> Option<&str> {
        self.data.downloaded.get(url).map(String::as_str)
    }

    /// Cumulative failure count for a URL (0 if it never failed).
    #[must_use]
    pub fn failure_count(&self, url: &str) -> u64 {
        self.data.errors.get(url).copied().unwrap_or(0)
    }

    /// All successful downloads, keyed by source URL.
    #[must_use]
    pub fn downloaded(&self) -> &BTreeMap<String, String> {
        &self.data.downloaded
    }

    /// All failure counts, keyed by source URL.
    #[must_use]
    pub fn errors(&self) -> &BTreeMap<String, u64> {
        &self.data.errors
    }

    /// When the log was first created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.data.created_at
    }

    /// When the log was last persisted with a mutation.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.data.updated_at
    }

    /// Location of the log on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn touch_and_persist(&mut self) -> Result<(), LogError> {
        self.data.updated_at = Utc::now();
        self.persist()
    }

    /// Writes the full log to a temp file beside the target, syncs it, then
    /// renames it over the target.
    fn persist(&self) -> Result<(), LogError> {
        let mut json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| LogError::serialize(&self.path, e))?;
        json.push('\n');

        let dir = non_empty_parent(&self.path).unwrap_or_else(|| Path::new("."));
        let mut temp_file = NamedTempFile::new_in(dir).map_err(|e| LogError::io(dir, e))?;
        temp_file
            .write_all(json.as_bytes())
            .map_err(|e| LogError::io(temp_file.path(), e))?;
        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| LogError::io(temp_file.path(), e))?;
        temp_file
            .persist(&self.path)
            .map_err(|e| LogError::io(&self.path, e.error))?;

        debug!(
            path = %self.path.display(),
            downloaded = self.data.downloaded.len(),
            errors = self.data.errors.len(),
            "download log persisted"
        );
        Ok(())
    }
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
