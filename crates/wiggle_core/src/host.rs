//! The host surface seen by the settings serializer
//!
//! A host owns the scene graph: armatures, their pose bones, and the named
//! objects and collections that bones reference. The serializer never
//! reaches into global state; it is handed something implementing [`Host`]
//! for the duration of one export or import.

use crate::handle::Handle;
use crate::settings::{BoneSettings, Collection, RigSettings, SceneObject, SceneSettings};

/// Name tables for reference targets
///
/// Lookups are by exact name. A stale handle (deleted target) has no name;
/// an unknown name has no handle.
pub trait TargetTable {
    /// Current name of a scene object, if the handle is still live
    fn object_name(&self, handle: Handle<SceneObject>) -> Option<&str>;

    /// Scene object currently carrying `name`
    fn find_object(&self, name: &str) -> Option<Handle<SceneObject>>;

    /// Current name of a collection, if the handle is still live
    fn collection_name(&self, handle: Handle<Collection>) -> Option<&str>;

    /// Collection currently carrying `name`
    fn find_collection(&self, name: &str) -> Option<Handle<Collection>>;
}

/// Read/write access to a host's scene, armatures and pose bones
///
/// Armatures and bones are addressed by name. Enumeration order is the
/// host's own and carries no meaning; callers that need determinism sort.
pub trait Host: TargetTable {
    /// Scene-wide settings
    fn scene(&self) -> &SceneSettings;

    /// Mutable scene-wide settings
    fn scene_mut(&mut self) -> &mut SceneSettings;

    /// Names of all armatures in the scene
    fn rig_names(&self) -> Vec<String>;

    /// Settings of the armature named `rig`
    fn rig(&self, rig: &str) -> Option<&RigSettings>;

    /// Mutable settings of the armature named `rig`
    fn rig_mut(&mut self, rig: &str) -> Option<&mut RigSettings>;

    /// Names of the pose bones of armature `rig` (empty if there is no such armature)
    fn bone_names(&self, rig: &str) -> Vec<String>;

    /// Settings of pose bone `bone` in armature `rig`
    fn bone(&self, rig: &str, bone: &str) -> Option<&BoneSettings>;

    /// Mutable settings of pose bone `bone` in armature `rig`
    fn bone_mut(&mut self, rig: &str, bone: &str) -> Option<&mut BoneSettings>;
}
