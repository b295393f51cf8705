//! File-level export and import actions
//!
//! These are the user-facing entry points: each one opens, fully writes or
//! reads, and closes its file within one call, and reports a single
//! [`Outcome`]. A `None` path stands for a file prompt the user dismissed;
//! the core is not run at all in that case.

use crate::config::IoConfig;
use crate::document::Document;
use crate::error::{Result, SettingsError};
use crate::export::export;
use crate::import::{Importer, MergePlan};
use std::fmt;
use std::fs;
use std::path::Path;
use wiggle_core::{persist, Host};

/// Result of one user-triggered action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Action completed; carries a human-readable summary
    Success(String),
    /// The file prompt was dismissed
    Cancelled,
    /// Action failed; carries the error description
    Failure(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(message) => f.write_str(message),
            Self::Cancelled => f.write_str("Cancelled"),
            Self::Failure(message) => write!(f, "Error: {}", message),
        }
    }
}

/// Write `doc` to `path`, replacing it atomically
///
/// The document goes to a hidden sibling temp file which is renamed over
/// `path` once flushed. On failure the temp file is removed and `path` is
/// left as it was.
pub fn write_document(doc: &Document, path: &Path, config: &IoConfig) -> Result<()> {
    let data = doc.to_vec(config.indent)?;
    persist::write_atomic(path, &data).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("Wrote settings to {:?} ({} bytes)", path, data.len());
    Ok(())
}

/// Read and parse the document at `path`
pub fn read_document(path: &Path) -> Result<Document> {
    let bytes = fs::read(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Document::from_slice(&bytes)
}

/// Read `path` and plan its import without touching `host`
pub fn plan_from_path<H: Host + ?Sized>(
    host: &H,
    path: &Path,
    config: &IoConfig,
) -> Result<MergePlan> {
    let doc = read_document(path)?;
    Importer::from_config(config).plan(&doc, host)
}

/// Export action: write the host's settings to `path`
pub fn export_to_path<H: Host + ?Sized>(
    host: &H,
    path: Option<&Path>,
    config: &IoConfig,
) -> Outcome {
    let Some(path) = path else {
        log::debug!("Export cancelled");
        return Outcome::Cancelled;
    };

    let doc = export(host);
    match write_document(&doc, path, config) {
        Ok(()) => {
            log::info!("Exported settings to {:?}", path);
            Outcome::Success(format!(
                "Wiggle settings exported to {} ({} armatures, {} bones)",
                path.display(),
                doc.armatures.len(),
                doc.bone_count()
            ))
        }
        Err(e) => {
            log::error!("Export to {:?} failed: {}", path, e);
            Outcome::Failure(format!("Error exporting settings: {}", e))
        }
    }
}

/// Import action: merge the settings at `path` into `host`
///
/// Nothing in `host` changes unless the whole document was read and
/// validated.
pub fn import_from_path<H: Host + ?Sized>(
    host: &mut H,
    path: Option<&Path>,
    config: &IoConfig,
) -> Outcome {
    let Some(path) = path else {
        log::debug!("Import cancelled");
        return Outcome::Cancelled;
    };

    let plan = match plan_from_path(&*host, path, config) {
        Ok(plan) => plan,
        Err(e) => {
            log::error!("Import from {:?} failed: {}", path, e);
            return Outcome::Failure(format!("Error loading settings: {}", e));
        }
    };

    let report = plan.apply(host);
    log::info!("Imported settings from {:?}: {}", path, report.summary());
    Outcome::Success(format!(
        "Wiggle settings imported from {} ({})",
        path.display(),
        report.summary()
    ))
}
