//! The settings document
//!
//! ```text
//! {
//!     "version": 1,
//!     "scene": { "wiggle_enable": true, "iterations": 4, ... },
//!     "armatures": {
//!         "<rig>": {
//!             "wiggle_mute": false,
//!             "wiggle_freeze": false,
//!             "bones": {
//!                 "<bone>": { "wiggle_mass": 1.0, "wiggle_mass_head": 1.0, ... }
//!             }
//!         }
//!     }
//! }
//! ```
//!
//! Records are kept as raw JSON objects: the document only guarantees the
//! shape above. Field types are checked against the schema on import.
//! Armatures and bones are keyed in sorted maps so the encoding of a given
//! document is always byte-identical.

use crate::error::{Result, SettingsError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Current document format version
///
/// Version 0 is the untagged legacy layout; it has the same field set as
/// version 1 and imports unchanged.
pub const FORMAT_VERSION: u32 = 1;

/// Raw field record: document key to JSON value
pub type Record = Map<String, Value>;

/// Root of a settings document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Format version; missing in legacy documents
    #[serde(default)]
    pub version: u32,
    /// Scene-level fields
    #[serde(default)]
    pub scene: Record,
    /// Armature records by armature name
    #[serde(default)]
    pub armatures: BTreeMap<String, RigRecord>,
}

/// One armature's record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RigRecord {
    /// Armature-level fields
    #[serde(flatten)]
    pub fields: Record,
    /// Bone records by bone name
    #[serde(default)]
    pub bones: BTreeMap<String, Record>,
}

impl Document {
    /// Create an empty document at the current format version
    pub fn new() -> Self {
        Self {
            version: FORMAT_VERSION,
            ..Default::default()
        }
    }

    /// Parse a document from JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|source| SettingsError::Parse { source })
    }

    /// Parse a document from a JSON string
    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_slice(text.as_bytes())
    }

    /// Encode as pretty-printed JSON with `indent` spaces, newline-terminated
    pub fn to_vec(&self, indent: usize) -> Result<Vec<u8>> {
        let indent = vec![b' '; indent];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)
            .map_err(|source| SettingsError::Serialize { source })?;
        out.push(b'\n');
        Ok(out)
    }

    /// Look up an armature record
    pub fn rig(&self, name: &str) -> Option<&RigRecord> {
        self.armatures.get(name)
    }

    /// Look up a bone record
    pub fn bone(&self, rig: &str, bone: &str) -> Option<&Record> {
        self.armatures.get(rig)?.bones.get(bone)
    }

    /// Number of bone records across all armatures
    pub fn bone_count(&self) -> usize {
        self.armatures.values().map(|r| r.bones.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_document_has_version_zero() {
        let doc = Document::from_json(r#"{"scene": {"iterations": 2}, "armatures": {}}"#).unwrap();
        assert_eq!(doc.version, 0);
        assert_eq!(doc.scene.get("iterations"), Some(&json!(2)));
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let doc = Document::from_json("{}").unwrap();
        assert!(doc.scene.is_empty());
        assert!(doc.armatures.is_empty());
    }

    #[test]
    fn test_rig_fields_and_bones_split() {
        let doc = Document::from_json(
            r#"{"armatures": {"Rig": {"wiggle_mute": true, "bones": {"Spine": {"wiggle_mass": 2.0}}}}}"#,
        )
        .unwrap();
        let rig = doc.rig("Rig").unwrap();
        assert_eq!(rig.fields.get("wiggle_mute"), Some(&json!(true)));
        assert!(!rig.fields.contains_key("bones"));
        assert_eq!(doc.bone("Rig", "Spine").unwrap().get("wiggle_mass"), Some(&json!(2.0)));
        assert_eq!(doc.bone_count(), 1);
    }

    #[test]
    fn test_malformed_shapes_are_parse_failures() {
        for text in [
            "not json",
            "42",
            r#"{"scene": 3}"#,
            r#"{"armatures": []}"#,
            r#"{"armatures": {"Rig": {"bones": {"Spine": 1}}}}"#,
            r#"{"version": "one"}"#,
        ] {
            let err = Document::from_json(text).unwrap_err();
            assert!(err.is_parse_failure(), "{}", text);
        }
    }

    #[test]
    fn test_encoding_is_sorted_and_indented() {
        let mut doc = Document::new();
        doc.armatures.insert("b".into(), RigRecord::default());
        doc.armatures.insert("a".into(), RigRecord::default());

        let text = String::from_utf8(doc.to_vec(4).unwrap()).unwrap();
        assert!(text.find("\"a\"").unwrap() < text.find("\"b\"").unwrap());
        assert!(text.contains("\n    \"version\": 1"));
        assert!(text.ends_with("}\n"));
    }
}
