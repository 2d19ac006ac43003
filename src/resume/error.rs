//! Error types for download log persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while opening or persisting the download log.
///
/// Every variant is fatal for a run: continuing without a trustworthy log
/// would either re-download finished work or drop recorded failures.
#[derive(Debug, Error)]
pub enum LogError {
    /// An existing log file could not be parsed as a download log.
    #[error("download log at {path} is corrupt: {source}")]
    Corrupt {
        /// Path of the unreadable log file.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the log file failed.
    #[error("IO error on download log {path}: {source}")]
    Io {
        /// Path of the log file (or its temp sibling).
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The in-memory log could not be serialized.
    #[error("failed to serialize download log {path}: {source}")]
    Serialize {
        /// Path the log was about to be written to.
        path: PathBuf,
        /// The underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}

impl LogError {
    /// Creates a corrupt-log error.
    pub fn corrupt(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Corrupt {
            path: path.into(),
            source,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a serialization error.
    pub fn serialize(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Serialize {
            path: path.into(),
            source,
        }
    }

    /// Returns true when the error means prior progress exists but is unreadable.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}
