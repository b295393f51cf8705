//! Static description of the settings tree
//!
//! Every level (scene, armature, bone, bone endpoint) has an ordered list of
//! fields. A field knows its document key, its value kind, its default and
//! how to read and write it on the live record. The exporter and the
//! importer both walk these tables, so the two directions cannot drift.
//!
//! Endpoint fields appear twice per bone: unsuffixed for the tail and with
//! a `_head` suffix for the head.

use crate::value::{FieldKind, FieldValue, Target, TargetKind};
use std::borrow::Cow;
use wiggle_core::{
    BoneSettings, ColliderType, Endpoint, EndpointSettings, RigSettings, SceneSettings,
};

/// A single serializable field of a settings record of type `R`
pub struct Field<R: 'static> {
    /// Document key
    pub name: &'static str,
    pub kind: FieldKind,
    /// Value of the field on a default-constructed record
    pub default: FieldValue,
    get: fn(&R) -> FieldValue,
    set: fn(&mut R, FieldValue) -> bool,
}

impl<R> Field<R> {
    /// Read the field from a live record
    pub fn read(&self, record: &R) -> FieldValue {
        (self.get)(record)
    }

    /// Write the field on a live record. Returns false if `value` has the wrong kind.
    pub fn write(&self, record: &mut R, value: FieldValue) -> bool {
        value.matches(self.kind) && (self.set)(record, value)
    }
}

impl<R> std::fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .finish()
    }
}

macro_rules! bool_field {
    ($name:literal, $field:ident, $default:expr) => {
        Field {
            name: $name,
            kind: FieldKind::Bool,
            default: FieldValue::Bool($default),
            get: |r| FieldValue::Bool(r.$field),
            set: |r, v| match v {
                FieldValue::Bool(b) => {
                    r.$field = b;
                    true
                }
                _ => false,
            },
        }
    };
}

macro_rules! int_field {
    ($name:literal, $field:ident, $default:expr) => {
        Field {
            name: $name,
            kind: FieldKind::Int,
            default: FieldValue::Int($default),
            get: |r| FieldValue::Int(r.$field),
            set: |r, v| match v {
                FieldValue::Int(i) => {
                    r.$field = i;
                    true
                }
                _ => false,
            },
        }
    };
}

macro_rules! float_field {
    ($name:literal, $field:ident, $default:expr) => {
        Field {
            name: $name,
            kind: FieldKind::Float,
            default: FieldValue::Float($default),
            get: |r| FieldValue::Float(r.$field),
            set: |r, v| match v {
                FieldValue::Float(x) => {
                    r.$field = x;
                    true
                }
                _ => false,
            },
        }
    };
}

macro_rules! object_field {
    ($name:literal, $field:ident) => {
        Field {
            name: $name,
            kind: FieldKind::Reference(TargetKind::Object),
            default: FieldValue::Target(Target::Object(None)),
            get: |r| FieldValue::Target(Target::Object(r.$field)),
            set: |r, v| match v {
                FieldValue::Target(Target::Object(h)) => {
                    r.$field = h;
                    true
                }
                _ => false,
            },
        }
    };
}

/// Option names accepted by `wiggle_collider_type`
pub const COLLIDER_TYPES: &[&str] = &[
    ColliderType::Object.as_str(),
    ColliderType::Collection.as_str(),
];

/// Scene-level fields, in document order
pub static SCENE_FIELDS: &[Field<SceneSettings>] = &[
    bool_field!("wiggle_enable", enabled, false),
    int_field!("iterations", iterations, 4),
    bool_field!("loop", looping, false),
    int_field!("preroll", preroll, 0),
    bool_field!("bake_overwrite", bake_overwrite, false),
    bool_field!("bake_nla", bake_nla, false),
];

/// Armature-level fields, in document order
pub static RIG_FIELDS: &[Field<RigSettings>] = &[
    bool_field!("wiggle_mute", mute, false),
    bool_field!("wiggle_freeze", freeze, false),
];

/// Bone-level fields that are not per-endpoint, in document order
pub static BONE_FIELDS: &[Field<BoneSettings>] = &[
    bool_field!("wiggle_head", head_enabled, false),
    bool_field!("wiggle_tail", tail_enabled, false),
    bool_field!("wiggle_mute", mute, false),
];

/// Per-endpoint fields; head keys carry [`Endpoint::suffix`]
pub static ENDPOINT_FIELDS: &[Field<EndpointSettings>] = &[
    float_field!("wiggle_mass", mass, 1.0),
    float_field!("wiggle_stiff", stiffness, 400.0),
    float_field!("wiggle_stretch", stretch, 0.0),
    float_field!("wiggle_damp", damping, 1.0),
    float_field!("wiggle_gravity", gravity, 1.0),
    float_field!("wiggle_wind", wind, 1.0),
    int_field!("wiggle_chain", chain, 0),
    object_field!("wiggle_collider", collider),
    Field {
        name: "wiggle_collider_collection",
        kind: FieldKind::Reference(TargetKind::Collection),
        default: FieldValue::Target(Target::Collection(None)),
        get: |r| FieldValue::Target(Target::Collection(r.collider_collection)),
        set: |r, v| match v {
            FieldValue::Target(Target::Collection(h)) => {
                r.collider_collection = h;
                true
            }
            _ => false,
        },
    },
    object_field!("wiggle_wind_ob", wind_source),
    Field {
        name: "wiggle_collider_type",
        kind: FieldKind::Choice(COLLIDER_TYPES),
        default: FieldValue::Choice(ColliderType::Object.as_str()),
        get: |r| FieldValue::Choice(r.collider_type.as_str()),
        set: |r, v| match v {
            FieldValue::Choice(name) => match name.parse() {
                Ok(ty) => {
                    r.collider_type = ty;
                    true
                }
                Err(_) => false,
            },
            _ => false,
        },
    },
    float_field!("wiggle_radius", radius, 0.0),
    float_field!("wiggle_friction", friction, 0.5),
    float_field!("wiggle_bounce", bounce, 0.5),
    float_field!("wiggle_sticky", sticky, 0.0),
];

/// Document key of an endpoint field for one endpoint
pub fn endpoint_key(field: &Field<EndpointSettings>, endpoint: Endpoint) -> Cow<'static, str> {
    match endpoint.suffix() {
        "" => Cow::Borrowed(field.name),
        suffix => Cow::Owned(format!("{}{}", field.name, suffix)),
    }
}

/// Look up a scene field by document key
pub fn scene_field(name: &str) -> Option<&'static Field<SceneSettings>> {
    SCENE_FIELDS.iter().find(|f| f.name == name)
}

/// Look up an armature field by document key
pub fn rig_field(name: &str) -> Option<&'static Field<RigSettings>> {
    RIG_FIELDS.iter().find(|f| f.name == name)
}

/// Level of the settings tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Scene,
    Rig,
    Bone,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Scene, Level::Rig, Level::Bone];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Scene => "scene",
            Self::Rig => "armature",
            Self::Bone => "bone",
        }
    }
}

/// Flattened description of one document key
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub key: Cow<'static, str>,
    pub kind: FieldKind,
    pub default: FieldValue,
}

fn info<R>(field: &Field<R>, key: Cow<'static, str>) -> FieldInfo {
    FieldInfo {
        key,
        kind: field.kind,
        default: field.default,
    }
}

/// Every document key of a level in document order, with kind and default
///
/// For [`Level::Bone`] this is the bone fields followed by the tail
/// endpoint fields and then the head endpoint fields.
pub fn describe(level: Level) -> Vec<FieldInfo> {
    match level {
        Level::Scene => SCENE_FIELDS
            .iter()
            .map(|f| info(f, Cow::Borrowed(f.name)))
            .collect(),
        Level::Rig => RIG_FIELDS
            .iter()
            .map(|f| info(f, Cow::Borrowed(f.name)))
            .collect(),
        Level::Bone => {
            let mut fields: Vec<FieldInfo> = BONE_FIELDS
                .iter()
                .map(|f| info(f, Cow::Borrowed(f.name)))
                .collect();
            for endpoint in Endpoint::BOTH {
                fields.extend(
                    ENDPOINT_FIELDS
                        .iter()
                        .map(|f| info(f, endpoint_key(f, endpoint))),
                );
            }
            fields
        }
    }
}
