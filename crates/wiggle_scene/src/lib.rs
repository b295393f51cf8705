//! Wiggle Scene - In-Memory Host
//!
//! A small scene graph that implements [`wiggle_core::Host`]: named objects
//! (armatures with pose bones, meshes, empties) and collections, with the
//! naming and deletion semantics of a DCC host:
//!
//! - object and collection names are unique; a taken name gets a `.001`
//!   style suffix
//! - bone names are unique within their armature
//! - deleting an object or collection invalidates every handle to it
//!
//! The whole scene round-trips through JSON so command-line tools can load,
//! modify and save it.
//!
//! # Example
//!
//! ```ignore
//! use wiggle_scene::prelude::*;
//!
//! let mut scene = Scene::new();
//! let rig = scene.add_armature("Rig")?;
//! scene.add_bone(rig, "Spine")?;
//! let sphere = scene.add_object("Sphere", ObjectKind::Mesh)?;
//! scene.bone_mut("Rig", "Spine").unwrap().tail.collider = Some(sphere);
//! ```

pub mod error;
pub mod object;
pub mod scene;

pub mod prelude {
    pub use crate::error::{Result, SceneError};
    pub use crate::object::{Armature, CollectionEntry, ObjectData, ObjectEntry, ObjectKind, PoseBone};
    pub use crate::scene::Scene;
}

pub use prelude::*;
