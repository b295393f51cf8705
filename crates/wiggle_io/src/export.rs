//! Live settings to document

use crate::document::{Document, Record, RigRecord};
use crate::reference::{HostResolver, ReferenceResolver};
use crate::schema::{endpoint_key, Field, BONE_FIELDS, ENDPOINT_FIELDS, RIG_FIELDS, SCENE_FIELDS};
use crate::value::FieldValue;
use serde_json::Value;
use wiggle_core::{Endpoint, Host};

/// Walks a host and copies every schema field into a fresh [`Document`]
///
/// Only armatures and bones whose `enabled` flag is set are written, so a
/// document holds active configuration only. Armatures and bones are keyed
/// by name in sorted maps, which makes the output independent of host
/// enumeration order.
#[derive(Default)]
pub struct Exporter<'r> {
    resolver: Option<&'r dyn ReferenceResolver>,
}

impl<'r> Exporter<'r> {
    /// Exporter that resolves references through the host's own name tables
    pub fn new() -> Self {
        Self { resolver: None }
    }

    /// Exporter that resolves references through `resolver`
    pub fn with_resolver(resolver: &'r dyn ReferenceResolver) -> Self {
        Self {
            resolver: Some(resolver),
        }
    }

    /// Build a document from the host's current settings
    pub fn export<H: Host + ?Sized>(&self, host: &H) -> Document {
        match self.resolver {
            Some(resolver) => export_with(host, resolver),
            None => export_with(host, &HostResolver::new(host)),
        }
    }
}

/// Export with the host's own name tables
pub fn export<H: Host + ?Sized>(host: &H) -> Document {
    Exporter::new().export(host)
}

fn export_with<H: Host + ?Sized>(host: &H, resolver: &dyn ReferenceResolver) -> Document {
    let mut doc = Document::new();
    write_fields(SCENE_FIELDS, host.scene(), resolver, &mut doc.scene);

    for rig_name in host.rig_names() {
        let Some(rig) = host.rig(&rig_name) else {
            continue;
        };
        if !rig.enabled {
            log::debug!("Skipping disabled armature {}", rig_name);
            continue;
        }

        let mut record = RigRecord::default();
        write_fields(RIG_FIELDS, rig, resolver, &mut record.fields);

        for bone_name in host.bone_names(&rig_name) {
            let Some(bone) = host.bone(&rig_name, &bone_name) else {
                continue;
            };
            if !bone.enabled {
                continue;
            }

            let mut bone_record = Record::new();
            write_fields(BONE_FIELDS, bone, resolver, &mut bone_record);
            for endpoint in Endpoint::BOTH {
                let settings = bone.endpoint(endpoint);
                for field in ENDPOINT_FIELDS {
                    let key = endpoint_key(field, endpoint).into_owned();
                    write_value(key, field.read(settings), resolver, &mut bone_record);
                }
            }

            if record.bones.insert(bone_name.clone(), bone_record).is_some() {
                log::warn!("Armature {} has duplicate bone {}; keeping the last", rig_name, bone_name);
            }
        }

        if doc.armatures.insert(rig_name.clone(), record).is_some() {
            log::warn!("Duplicate armature name {}; keeping the last", rig_name);
        }
    }

    log::debug!(
        "Exported {} armatures, {} bones",
        doc.armatures.len(),
        doc.bone_count()
    );
    doc
}

fn write_fields<R>(fields: &[Field<R>], record: &R, resolver: &dyn ReferenceResolver, out: &mut Record) {
    for field in fields {
        write_value(field.name.to_string(), field.read(record), resolver, out);
    }
}

fn write_value(key: String, value: FieldValue, resolver: &dyn ReferenceResolver, out: &mut Record) {
    let value = encode(value, resolver);
    if value.is_null() {
        log::warn!("Field {} is not finite; written as null", key);
    }
    out.insert(key, value);
}

/// Document encoding of a live value
fn encode(value: FieldValue, resolver: &dyn ReferenceResolver) -> Value {
    match value {
        FieldValue::Bool(b) => Value::Bool(b),
        FieldValue::Int(i) => Value::from(i),
        // Non-finite floats have no JSON form and become null
        FieldValue::Float(x) => Value::from(x),
        FieldValue::Choice(c) => Value::from(c),
        FieldValue::Target(target) => resolver.encode(&target).to_json(),
    }
}
