//! Error types for the scene graph

use std::path::PathBuf;
use thiserror::Error;

/// Scene graph errors
#[derive(Debug, Error)]
pub enum SceneError {
    /// Scene file could not be read or written
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Scene file is not a valid scene
    #[error("Failed to parse scene file: {0}")]
    Parse(#[source] serde_json::Error),

    /// Scene could not be encoded
    #[error("Failed to serialize scene: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Named object does not exist
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// Object exists but carries no armature
    #[error("Object is not an armature: {0}")]
    NotAnArmature(String),

    /// Too many objects or collections
    #[error("Scene storage exhausted")]
    Exhausted,
}

impl From<wiggle_core::HandleExhausted> for SceneError {
    fn from(_: wiggle_core::HandleExhausted) -> Self {
        Self::Exhausted
    }
}

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;
