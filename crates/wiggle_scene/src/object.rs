//! Scene objects, armatures and collections

use serde::{Deserialize, Serialize};
use wiggle_core::{BoneSettings, Handle, RigSettings, SceneObject};

/// Kind of object to create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Empty,
    Mesh,
    Armature,
}

/// A pose bone and its spring settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseBone {
    pub name: String,
    #[serde(default)]
    pub settings: BoneSettings,
}

impl PoseBone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: BoneSettings::default(),
        }
    }
}

/// Armature data: rig flags plus pose bones in hierarchy order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Armature {
    #[serde(default)]
    pub settings: RigSettings,
    #[serde(default)]
    pub bones: Vec<PoseBone>,
}

impl Armature {
    /// Find a pose bone by name
    pub fn bone(&self, name: &str) -> Option<&PoseBone> {
        self.bones.iter().find(|b| b.name == name)
    }

    /// Find a mutable pose bone by name
    pub fn bone_mut(&mut self, name: &str) -> Option<&mut PoseBone> {
        self.bones.iter_mut().find(|b| b.name == name)
    }
}

/// Object payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectData {
    Empty,
    Mesh,
    Armature(Armature),
}

impl ObjectData {
    /// Fresh payload for an object kind
    pub fn new(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Empty => Self::Empty,
            ObjectKind::Mesh => Self::Mesh,
            ObjectKind::Armature => Self::Armature(Armature::default()),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Empty => ObjectKind::Empty,
            Self::Mesh => ObjectKind::Mesh,
            Self::Armature(_) => ObjectKind::Armature,
        }
    }

    pub fn as_armature(&self) -> Option<&Armature> {
        match self {
            Self::Armature(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_armature_mut(&mut self) -> Option<&mut Armature> {
        match self {
            Self::Armature(a) => Some(a),
            _ => None,
        }
    }
}

/// A named object in the scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub name: String,
    pub data: ObjectData,
}

/// A named collection of objects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub name: String,
    #[serde(default)]
    pub objects: Vec<Handle<SceneObject>>,
}
