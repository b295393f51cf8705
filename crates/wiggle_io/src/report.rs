//! Merge diagnostics

use std::fmt;

/// A reference whose name matched nothing in the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    /// Document path of the field, e.g. `armatures.Rig.bones.Spine.wiggle_collider`
    pub path: String,
    /// Name that could not be found
    pub name: String,
}

/// What an import matched, skipped and applied
///
/// Missing rigs and bones, unresolved references and unknown keys are all
/// tolerated; they are recorded here instead of failing the import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    /// Format version of the imported document (0 = untagged legacy)
    pub document_version: u32,
    /// Armatures present in both document and host
    pub rigs_matched: usize,
    /// Armatures in the document that the host does not have
    pub rigs_skipped: Vec<String>,
    /// Bones present in both document and host
    pub bones_matched: usize,
    /// Bones in the document the host does not have, as `rig/bone`
    pub bones_skipped: Vec<String>,
    /// Field writes performed (or planned, before apply)
    pub fields_applied: usize,
    /// Schema fields absent from matched records; their live values were kept
    pub fields_missing: usize,
    /// Document keys the schema does not know; ignored
    pub unknown_fields: usize,
    /// References that were set to a live target
    pub references_resolved: usize,
    /// References whose target name is not in the host; set to empty
    pub references_unresolved: Vec<UnresolvedReference>,
}

impl MergeReport {
    /// Armatures in the document, matched or not
    pub fn rigs_found(&self) -> usize {
        self.rigs_matched + self.rigs_skipped.len()
    }

    /// Bones in the document, matched or not
    pub fn bones_found(&self) -> usize {
        self.bones_matched + self.bones_skipped.len()
    }

    /// Everything in the document landed somewhere
    pub fn is_clean(&self) -> bool {
        self.rigs_skipped.is_empty()
            && self.bones_skipped.is_empty()
            && self.references_unresolved.is_empty()
            && self.unknown_fields == 0
    }

    /// One-line summary for user-facing messages
    pub fn summary(&self) -> String {
        let mut text = format!(
            "{}/{} armatures, {}/{} bones, {} fields",
            self.rigs_matched,
            self.rigs_found(),
            self.bones_matched,
            self.bones_found(),
            self.fields_applied
        );
        if !self.references_unresolved.is_empty() {
            text.push_str(&format!(
                ", {} unresolved references",
                self.references_unresolved.len()
            ));
        }
        text
    }
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "document version: {}", self.document_version)?;
        writeln!(f, "armatures: {} matched, {} skipped", self.rigs_matched, self.rigs_skipped.len())?;
        for rig in &self.rigs_skipped {
            writeln!(f, "  skipped armature {}", rig)?;
        }
        writeln!(f, "bones: {} matched, {} skipped", self.bones_matched, self.bones_skipped.len())?;
        for bone in &self.bones_skipped {
            writeln!(f, "  skipped bone {}", bone)?;
        }
        writeln!(
            f,
            "fields: {} applied, {} kept (absent), {} unknown",
            self.fields_applied, self.fields_missing, self.unknown_fields
        )?;
        write!(
            f,
            "references: {} resolved, {} unresolved",
            self.references_resolved,
            self.references_unresolved.len()
        )?;
        for r in &self.references_unresolved {
            write!(f, "\n  {} -> {:?} not found", r.path, r.name)?;
        }
        Ok(())
    }
}
