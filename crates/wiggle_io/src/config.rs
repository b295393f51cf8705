//! Export/import configuration

use serde::{Deserialize, Serialize};

/// Settings file configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Spaces per indentation level in written documents
    pub indent: usize,

    /// Refuse documents whose version is newer than this build supports
    pub reject_newer_versions: bool,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            indent: 4,
            reject_newer_versions: false,
        }
    }
}

impl IoConfig {
    /// Configuration that refuses documents from newer versions
    pub fn strict() -> Self {
        Self {
            reject_newer_versions: true,
            ..Default::default()
        }
    }

    /// Set indentation width
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Set version strictness
    pub fn with_reject_newer_versions(mut self, reject: bool) -> Self {
        self.reject_newer_versions = reject;
        self
    }
}
