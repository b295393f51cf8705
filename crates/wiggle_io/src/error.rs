//! Error types for settings export and import

use std::path::PathBuf;
use thiserror::Error;

/// Settings serialization errors
///
/// Unresolved references and rigs or bones missing from the host are not
/// errors; they are counted in [`crate::MergeReport`].
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File could not be opened, read, written or replaced
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content is not well-formed JSON or has the wrong overall shape
    #[error("Failed to parse settings document: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    /// A known field holds a value of the wrong type
    #[error("Invalid value at {path}: expected {expected}, found {found}")]
    InvalidField {
        path: String,
        expected: &'static str,
        found: String,
    },

    /// Document was written by a newer format and strict versioning is on
    #[error("Settings document version {found} is newer than supported version {supported}")]
    FutureVersion { found: u32, supported: u32 },

    /// Document could not be encoded
    #[error("Failed to serialize settings document: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

impl SettingsError {
    /// File-level failure (open, read, write, rename)
    pub fn is_io_failure(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Document-level failure, always raised before the host is touched
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::InvalidField { .. } | Self::FutureVersion { .. }
        )
    }
}

/// Result type for settings operations
pub type Result<T> = std::result::Result<T, SettingsError>;
