//! Live spring-simulation settings
//!
//! These are the records a host keeps per scene, per armature and per pose
//! bone. The simulation reads them; the settings serializer copies them to
//! and from a document. Nothing here validates or clamps values.

use crate::handle::Handle;
use std::fmt;
use std::str::FromStr;

/// Marker for handles to scene objects (collider and wind source targets)
#[derive(Debug)]
pub enum SceneObject {}

/// Marker for handles to object collections (collider group targets)
#[derive(Debug)]
pub enum Collection {}

/// Scene-wide simulation controls
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SceneSettings {
    /// Master switch for the whole simulation
    pub enabled: bool,
    /// Solver iterations per frame
    pub iterations: i64,
    /// Treat the frame range as a loop
    pub looping: bool,
    /// Frames simulated before the start frame
    pub preroll: i64,
    /// Bake replaces existing keys instead of layering
    pub bake_overwrite: bool,
    /// Bake into a new NLA track
    pub bake_nla: bool,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            iterations: 4,
            looping: false,
            preroll: 0,
            bake_overwrite: false,
            bake_nla: false,
        }
    }
}

/// Per-armature flags
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RigSettings {
    /// Armature takes part in the simulation; disabled rigs are not exported
    pub enabled: bool,
    pub mute: bool,
    pub freeze: bool,
}

/// Which collider reference an endpoint collides against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColliderType {
    /// A single collider object
    #[default]
    Object,
    /// Every object in a collection
    Collection,
}

impl ColliderType {
    /// All variants in declaration order
    pub const ALL: [ColliderType; 2] = [ColliderType::Object, ColliderType::Collection];

    /// Stable name used in documents
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "Object",
            Self::Collection => "Collection",
        }
    }
}

impl fmt::Display for ColliderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColliderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown collider type: {}", s))
    }
}

/// One of the two simulated points of a bone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Tail,
    Head,
}

impl Endpoint {
    /// Both endpoints, tail first
    pub const BOTH: [Endpoint; 2] = [Endpoint::Tail, Endpoint::Head];

    /// Suffix appended to endpoint field names in documents
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Tail => "",
            Self::Head => "_head",
        }
    }
}

/// Spring and collision parameters of one bone endpoint
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EndpointSettings {
    pub mass: f64,
    pub stiffness: f64,
    pub stretch: f64,
    pub damping: f64,
    pub gravity: f64,
    pub wind: f64,
    /// Number of connected bones this endpoint pulls along (0 = unchained)
    pub chain: i64,
    pub collider: Option<Handle<SceneObject>>,
    pub collider_collection: Option<Handle<Collection>>,
    pub wind_source: Option<Handle<SceneObject>>,
    pub collider_type: ColliderType,
    pub radius: f64,
    pub friction: f64,
    pub bounce: f64,
    pub sticky: f64,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            mass: 1.0,
            stiffness: 400.0,
            stretch: 0.0,
            damping: 1.0,
            gravity: 1.0,
            wind: 1.0,
            chain: 0,
            collider: None,
            collider_collection: None,
            wind_source: None,
            collider_type: ColliderType::Object,
            radius: 0.0,
            friction: 0.5,
            bounce: 0.5,
            sticky: 0.0,
        }
    }
}

/// Per-pose-bone settings
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoneSettings {
    /// Bone takes part in the simulation; disabled bones are not exported
    pub enabled: bool,
    /// Simulate the head endpoint
    pub head_enabled: bool,
    /// Simulate the tail endpoint
    pub tail_enabled: bool,
    pub mute: bool,
    pub tail: EndpointSettings,
    pub head: EndpointSettings,
}

impl BoneSettings {
    /// Settings of one endpoint
    pub fn endpoint(&self, endpoint: Endpoint) -> &EndpointSettings {
        match endpoint {
            Endpoint::Tail => &self.tail,
            Endpoint::Head => &self.head,
        }
    }

    /// Mutable settings of one endpoint
    pub fn endpoint_mut(&mut self, endpoint: Endpoint) -> &mut EndpointSettings {
        match endpoint {
            Endpoint::Tail => &mut self.tail,
            Endpoint::Head => &mut self.head,
        }
    }
}
