//! Wiggle IO - Settings Export and Import
//!
//! Copies the spring settings of a host scene to a portable JSON document
//! and merges such a document back into any host.
//!
//! # Features
//!
//! - One schema table per level (scene, armature, bone, bone endpoint)
//!   drives both directions, so a field cannot be exported but not imported
//! - References to colliders, collider collections and wind sources are
//!   stored by name and looked up again on import
//! - Import is a sparse overlay: absent fields keep their live value,
//!   unknown armatures and bones are skipped and reported
//! - Import validates the whole document before it writes anything
//! - Exports are deterministic and written atomically
//!
//! # Architecture
//!
//! ```text
//!             ┌──────────── schema tables ────────────┐
//!             │ SCENE_FIELDS RIG_FIELDS BONE_FIELDS    │
//!             │ ENDPOINT_FIELDS (tail, head + _head)   │
//!             └───────────────────┬───────────────────┘
//!                                 │
//!   Host ──► Exporter ──► Document ──► Importer::plan ──► MergePlan
//!    ▲            │                         │                 │
//!    │            └──── ReferenceResolver ──┘                 │
//!    └───────────────────────── MergePlan::apply ◄────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use wiggle_io::prelude::*;
//!
//! let doc = export(&scene);
//! write_document(&doc, Path::new("rig.json"), &IoConfig::default())?;
//!
//! let doc = read_document(Path::new("rig.json"))?;
//! let report = import(&doc, &mut other_scene)?;
//! println!("{}", report.summary());
//! ```

pub mod action;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod import;
pub mod reference;
pub mod report;
pub mod schema;
pub mod value;

pub use action::{export_to_path, import_from_path, plan_from_path, read_document, write_document, Outcome};
pub use config::IoConfig;
pub use document::{Document, Record, RigRecord, FORMAT_VERSION};
pub use error::{Result, SettingsError};
pub use export::{export, Exporter};
pub use import::{import, Importer, MergePlan};
pub use reference::{HostResolver, Reference, ReferenceResolver};
pub use report::{MergeReport, UnresolvedReference};
pub use schema::{describe, FieldInfo, Level};
pub use value::{FieldKind, FieldValue, Target, TargetKind};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::action::{
        export_to_path, import_from_path, read_document, write_document, Outcome,
    };
    pub use crate::config::IoConfig;
    pub use crate::document::{Document, FORMAT_VERSION};
    pub use crate::error::{Result, SettingsError};
    pub use crate::export::{export, Exporter};
    pub use crate::import::{import, Importer, MergePlan};
    pub use crate::reference::{HostResolver, ReferenceResolver};
    pub use crate::report::MergeReport;
}
