//! Document to live settings
//!
//! Import runs in two passes:
//!
//! 1. **Plan** reads the document and the host without touching either.
//!    Every field of every record is type-checked against the schema,
//!    references are looked up by name, and armatures and bones are matched
//!    by name against the host. Any error surfaces here.
//! 2. **Apply** writes the planned values into the host field by field.
//!    It cannot fail.
//!
//! The host is therefore either left untouched (error) or receives the full
//! overlay (success). Fields missing from the document, armatures and bones
//! the host lacks, and references to targets that no longer exist are not
//! errors.

use crate::config::IoConfig;
use crate::document::{Document, Record, FORMAT_VERSION};
use crate::error::{Result, SettingsError};
use crate::reference::{HostResolver, Reference, ReferenceResolver};
use crate::report::{MergeReport, UnresolvedReference};
use crate::schema::{
    endpoint_key, rig_field, scene_field, Field, BONE_FIELDS, ENDPOINT_FIELDS, RIG_FIELDS,
    SCENE_FIELDS,
};
use crate::value::{FieldKind, FieldValue};
use serde_json::Value;
use std::borrow::Cow;
use wiggle_core::{BoneSettings, Endpoint, EndpointSettings, Host, RigSettings, SceneSettings};

/// A document value checked against its field kind, references not yet resolved
enum Decoded {
    Value(FieldValue),
    Reference(Reference),
}

/// One field write
struct Assignment<R: 'static> {
    field: &'static Field<R>,
    value: FieldValue,
}

struct BonePlan {
    name: String,
    fields: Vec<Assignment<BoneSettings>>,
    endpoints: Vec<(Endpoint, Assignment<EndpointSettings>)>,
}

struct RigPlan {
    name: String,
    fields: Vec<Assignment<RigSettings>>,
    bones: Vec<BonePlan>,
}

/// Validated, resolved set of writes produced by [`Importer::plan`]
pub struct MergePlan {
    scene: Vec<Assignment<SceneSettings>>,
    rigs: Vec<RigPlan>,
    report: MergeReport,
}

impl MergePlan {
    /// Report of what applying this plan will do
    pub fn report(&self) -> &MergeReport {
        &self.report
    }

    /// Number of planned field writes
    pub fn len(&self) -> usize {
        self.scene.len()
            + self
                .rigs
                .iter()
                .map(|r| {
                    r.fields.len()
                        + r.bones
                            .iter()
                            .map(|b| b.fields.len() + b.endpoints.len())
                            .sum::<usize>()
                })
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write every planned value into `host`
    ///
    /// Armatures or bones removed from the host since planning are skipped.
    pub fn apply<H: Host + ?Sized>(self, host: &mut H) -> MergeReport {
        let mut report = self.report;
        let mut applied = write_all(&self.scene, host.scene_mut(), "scene");

        for rig in &self.rigs {
            let Some(settings) = host.rig_mut(&rig.name) else {
                log::warn!("Armature {} disappeared before import was applied", rig.name);
                continue;
            };
            applied += write_all(&rig.fields, settings, &rig.name);

            for bone in &rig.bones {
                let Some(settings) = host.bone_mut(&rig.name, &bone.name) else {
                    log::warn!(
                        "Bone {}/{} disappeared before import was applied",
                        rig.name,
                        bone.name
                    );
                    continue;
                };
                applied += write_all(&bone.fields, settings, &bone.name);
                for (endpoint, assignment) in &bone.endpoints {
                    applied += write_all(
                        std::slice::from_ref(assignment),
                        settings.endpoint_mut(*endpoint),
                        &bone.name,
                    );
                }
            }
        }

        report.fields_applied = applied;
        report
    }
}

fn write_all<R>(assignments: &[Assignment<R>], record: &mut R, owner: &str) -> usize {
    let mut applied = 0;
    for assignment in assignments {
        if assignment.field.write(record, assignment.value) {
            applied += 1;
        } else {
            log::warn!(
                "Could not write {} on {}: value {} does not fit {}",
                assignment.field.name,
                owner,
                assignment.value,
                assignment.field.kind
            );
        }
    }
    applied
}

/// Merges a [`Document`] into a host as a sparse overlay
#[derive(Default)]
pub struct Importer<'r> {
    resolver: Option<&'r dyn ReferenceResolver>,
    reject_newer_versions: bool,
}

impl<'r> Importer<'r> {
    /// Importer that resolves references through the host's own name tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Importer configured from `config`
    pub fn from_config(config: &IoConfig) -> Self {
        Self::new().with_reject_newer_versions(config.reject_newer_versions)
    }

    /// Resolve references through `resolver` instead of the host
    pub fn with_resolver(mut self, resolver: &'r dyn ReferenceResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Refuse documents with a version newer than [`FORMAT_VERSION`]
    pub fn with_reject_newer_versions(mut self, reject: bool) -> Self {
        self.reject_newer_versions = reject;
        self
    }

    /// Validate `doc` against the schema and match it against `host`
    pub fn plan<H: Host + ?Sized>(&self, doc: &Document, host: &H) -> Result<MergePlan> {
        match self.resolver {
            Some(resolver) => self.plan_with(doc, host, resolver),
            None => self.plan_with(doc, host, &HostResolver::new(host)),
        }
    }

    /// Plan and apply in one step
    pub fn import<H: Host + ?Sized>(&self, doc: &Document, host: &mut H) -> Result<MergeReport> {
        let plan = self.plan(doc, &*host)?;
        let report = plan.apply(host);
        log::info!("Imported settings: {}", report.summary());
        Ok(report)
    }

    fn plan_with<H: Host + ?Sized>(
        &self,
        doc: &Document,
        host: &H,
        resolver: &dyn ReferenceResolver,
    ) -> Result<MergePlan> {
        if doc.version > FORMAT_VERSION {
            if self.reject_newer_versions {
                return Err(SettingsError::FutureVersion {
                    found: doc.version,
                    supported: FORMAT_VERSION,
                });
            }
            log::warn!(
                "Settings document version {} is newer than {}; unknown fields are ignored",
                doc.version,
                FORMAT_VERSION
            );
        }

        let mut report = MergeReport {
            document_version: doc.version,
            ..Default::default()
        };

        let scene_decoded = decode_record(SCENE_FIELDS, &doc.scene, field_key, "scene")?;
        report.unknown_fields += count_unknown(&doc.scene, "scene", |k| scene_field(k).is_some());
        let scene = resolve(scene_decoded, "scene", resolver, &mut report);

        let mut rigs = Vec::new();
        for (rig_name, rig_record) in &doc.armatures {
            let rig_path = format!("armatures.{}", rig_name);
            let rig_decoded = decode_record(RIG_FIELDS, &rig_record.fields, field_key, &rig_path)?;

            // Decode every bone before matching so a malformed document fails
            // regardless of what the host contains
            let mut bones_decoded = Vec::with_capacity(rig_record.bones.len());
            for (bone_name, bone_record) in &rig_record.bones {
                let bone_path = format!("{}.bones.{}", rig_path, bone_name);
                let fields = decode_record(BONE_FIELDS, bone_record, field_key, &bone_path)?;
                let mut endpoints = Vec::with_capacity(Endpoint::BOTH.len());
                for endpoint in Endpoint::BOTH {
                    let decoded = decode_record(
                        ENDPOINT_FIELDS,
                        bone_record,
                        |field| endpoint_key(field, endpoint),
                        &bone_path,
                    )?;
                    endpoints.push((endpoint, decoded));
                }
                bones_decoded.push((bone_name, bone_record, bone_path, fields, endpoints));
            }

            if host.rig(rig_name).is_none() {
                log::debug!("Armature {} not in scene; skipped", rig_name);
                report.rigs_skipped.push(rig_name.clone());
                continue;
            }
            report.rigs_matched += 1;
            report.unknown_fields +=
                count_unknown(&rig_record.fields, &rig_path, |k| rig_field(k).is_some());

            let mut rig_plan = RigPlan {
                name: rig_name.clone(),
                fields: resolve(rig_decoded, &rig_path, resolver, &mut report),
                bones: Vec::new(),
            };

            for (bone_name, bone_record, bone_path, fields, endpoints) in bones_decoded {
                if host.bone(rig_name, bone_name).is_none() {
                    log::debug!("Bone {}/{} not in armature; skipped", rig_name, bone_name);
                    report.bones_skipped.push(format!("{}/{}", rig_name, bone_name));
                    continue;
                }
                report.bones_matched += 1;
                report.unknown_fields += count_unknown(bone_record, &bone_path, is_bone_key);

                let mut bone_plan = BonePlan {
                    name: bone_name.clone(),
                    fields: resolve(fields, &bone_path, resolver, &mut report),
                    endpoints: Vec::new(),
                };
                for (endpoint, decoded) in endpoints {
                    let assignments = resolve(decoded, &bone_path, resolver, &mut report);
                    bone_plan
                        .endpoints
                        .extend(assignments.into_iter().map(|a| (endpoint, a)));
                }
                rig_plan.bones.push(bone_plan);
            }

            rigs.push(rig_plan);
        }

        let mut plan = MergePlan {
            scene,
            rigs,
            report,
        };
        plan.report.fields_applied = plan.len();
        Ok(plan)
    }
}

/// Plan and apply with the host's own name tables and default configuration
pub fn import<H: Host + ?Sized>(doc: &Document, host: &mut H) -> Result<MergeReport> {
    Importer::new().import(doc, host)
}

fn is_bone_key(key: &str) -> bool {
    BONE_FIELDS.iter().any(|f| f.name == key)
        || Endpoint::BOTH
            .iter()
            .any(|e| ENDPOINT_FIELDS.iter().any(|f| endpoint_key(f, *e) == key))
}

fn count_unknown(record: &Record, path: &str, is_known: impl Fn(&str) -> bool) -> usize {
    record
        .keys()
        .filter(|key| !is_known(key))
        .inspect(|key| log::debug!("Ignoring unknown field {}.{}", path, key))
        .count()
}

/// A schema field with the document key it was read from
type DecodedField<R> = (&'static Field<R>, Cow<'static, str>, Option<Decoded>);

fn field_key<R>(field: &'static Field<R>) -> Cow<'static, str> {
    Cow::Borrowed(field.name)
}

/// Type-check every schema field present in `record`
///
/// `key_of` gives the document key for each field. `None` marks a field
/// that is absent or null and keeps its live value.
fn decode_record<R>(
    fields: &'static [Field<R>],
    record: &Record,
    key_of: impl Fn(&'static Field<R>) -> Cow<'static, str>,
    path: &str,
) -> Result<Vec<DecodedField<R>>> {
    let mut decoded = Vec::with_capacity(fields.len());
    for field in fields {
        let key = key_of(field);
        let value = match record.get(&*key) {
            None | Some(Value::Null) => None,
            Some(value) => match decode_value(field.kind, value) {
                Some(value) => Some(value),
                None => {
                    return Err(SettingsError::InvalidField {
                        path: format!("{}.{}", path, key),
                        expected: field.kind.describe(),
                        found: describe_json(value),
                    })
                }
            },
        };
        decoded.push((field, key, value));
    }
    Ok(decoded)
}

/// Decode one non-null document value, or `None` if it does not fit `kind`
///
/// Integers accept booleans and integral floats, and floats accept any
/// number, mirroring how a scripting host coerces numeric properties.
fn decode_value(kind: FieldKind, value: &Value) -> Option<Decoded> {
    let value = match kind {
        FieldKind::Bool => FieldValue::Bool(value.as_bool()?),
        FieldKind::Int => FieldValue::Int(decode_int(value)?),
        FieldKind::Float => FieldValue::Float(value.as_f64()?),
        FieldKind::Choice(options) => {
            let name = value.as_str()?;
            FieldValue::Choice(options.iter().copied().find(|o| *o == name)?)
        }
        FieldKind::Reference(target) => {
            return Reference::from_json(target, value).map(Decoded::Reference);
        }
    };
    Some(Decoded::Value(value))
}

fn decode_int(value: &Value) -> Option<i64> {
    match value {
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|x| x.fract() == 0.0 && x.abs() < i64::MAX as f64)
                .map(|x| x as i64)
        }),
        _ => None,
    }
}

fn describe_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

/// Turn decoded values into assignments, looking references up by name
fn resolve<R>(
    decoded: Vec<DecodedField<R>>,
    path: &str,
    resolver: &dyn ReferenceResolver,
    report: &mut MergeReport,
) -> Vec<Assignment<R>> {
    let mut assignments = Vec::with_capacity(decoded.len());
    for (field, key, decoded) in decoded {
        let value = match decoded {
            None => {
                report.fields_missing += 1;
                continue;
            }
            Some(Decoded::Value(value)) => value,
            Some(Decoded::Reference(reference)) => {
                let target = resolver.decode(&reference);
                if let Some(name) = reference.name() {
                    if target.is_absent() {
                        let field_path = format!("{}.{}", path, key);
                        log::warn!(
                            "{} {:?} not found for {}; reference cleared",
                            reference.kind,
                            name,
                            field_path
                        );
                        report.references_unresolved.push(UnresolvedReference {
                            path: field_path,
                            name: name.to_string(),
                        });
                    } else {
                        report.references_resolved += 1;
                    }
                }
                FieldValue::Target(target)
            }
        };
        assignments.push(Assignment { field, value });
    }
    assignments
}
