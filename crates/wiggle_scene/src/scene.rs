//! The in-memory scene and its [`Host`] implementation

use crate::error::{Result, SceneError};
use crate::object::{Armature, CollectionEntry, ObjectData, ObjectEntry, ObjectKind, PoseBone};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use wiggle_core::{
    persist, BoneSettings, Collection, Endpoint, EndpointSettings, Handle, HandleMap, Host,
    RigSettings, SceneObject, SceneSettings, TargetTable,
};

/// Scene graph holding settings, objects and collections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub settings: SceneSettings,
    #[serde(default)]
    objects: HandleMap<ObjectEntry>,
    #[serde(default)]
    collections: HandleMap<CollectionEntry>,
}

/// Pick `base`, or the first free `base.NNN`
fn unique_name(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{}.{:03}", base, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Objects
    // ------------------------------------------------------------------

    /// Add an object; returns its handle. The name is made unique.
    pub fn add_object(&mut self, name: &str, kind: ObjectKind) -> Result<Handle<SceneObject>> {
        let name = unique_name(name, |n| self.find_object(n).is_some());
        log::debug!("Adding {:?} object {}", kind, name);
        let handle = self.objects.insert(ObjectEntry {
            name,
            data: ObjectData::new(kind),
        })?;
        Ok(handle.cast())
    }

    /// Add an armature object
    pub fn add_armature(&mut self, name: &str) -> Result<Handle<SceneObject>> {
        self.add_object(name, ObjectKind::Armature)
    }

    /// Delete an object. Handles to it go stale, it leaves every collection
    /// and every bone setting that pointed at it is cleared.
    pub fn remove_object(&mut self, handle: Handle<SceneObject>) -> Option<ObjectEntry> {
        let removed = self.objects.remove(handle.cast())?;
        for (_, collection) in self.collections.iter_mut() {
            collection.objects.retain(|h| *h != handle);
        }
        self.for_each_endpoint(|endpoint| {
            if endpoint.collider == Some(handle) {
                endpoint.collider = None;
            }
            if endpoint.wind_source == Some(handle) {
                endpoint.wind_source = None;
            }
        });
        log::debug!("Removed object {}", removed.name);
        Some(removed)
    }

    /// Rename an object; returns the name it actually received
    pub fn rename_object(&mut self, handle: Handle<SceneObject>, name: &str) -> Option<String> {
        if self.objects.get(handle.cast())?.name == name {
            return Some(name.to_string());
        }
        let name = unique_name(name, |n| self.find_object(n).is_some());
        let entry = self.objects.get_mut(handle.cast())?;
        log::debug!("Renamed object {} -> {}", entry.name, name);
        entry.name = name.clone();
        Some(name)
    }

    /// Look up an object entry
    pub fn object(&self, handle: Handle<SceneObject>) -> Option<&ObjectEntry> {
        self.objects.get(handle.cast())
    }

    /// Iterate over all live objects in creation order
    pub fn objects(&self) -> impl Iterator<Item = (Handle<SceneObject>, &ObjectEntry)> {
        self.objects.iter().map(|(h, o)| (h.cast(), o))
    }

    // ------------------------------------------------------------------
    // Armatures and bones
    // ------------------------------------------------------------------

    /// Add a pose bone to an armature; returns the bone's unique name
    pub fn add_bone(&mut self, rig: Handle<SceneObject>, name: &str) -> Result<String> {
        let entry = self
            .objects
            .get_mut(rig.cast())
            .ok_or_else(|| SceneError::ObjectNotFound(format!("{:?}", rig)))?;
        let rig_name = entry.name.clone();
        let armature = entry
            .data
            .as_armature_mut()
            .ok_or(SceneError::NotAnArmature(rig_name))?;

        let name = unique_name(name, |n| armature.bone(n).is_some());
        armature.bones.push(PoseBone::new(name.clone()));
        Ok(name)
    }

    /// Remove a pose bone from the armature named `rig`
    pub fn remove_bone(&mut self, rig: &str, bone: &str) -> Option<PoseBone> {
        let armature = self.armature_mut(rig)?;
        let index = armature.bones.iter().position(|b| b.name == bone)?;
        Some(armature.bones.remove(index))
    }

    /// Armature data of the armature object named `rig`
    pub fn armature(&self, rig: &str) -> Option<&Armature> {
        self.objects
            .iter()
            .find(|(_, o)| o.name == rig)
            .and_then(|(_, o)| o.data.as_armature())
    }

    /// Mutable armature data of the armature object named `rig`
    pub fn armature_mut(&mut self, rig: &str) -> Option<&mut Armature> {
        self.objects
            .iter_mut()
            .find(|(_, o)| o.name == rig)
            .and_then(|(_, o)| o.data.as_armature_mut())
    }

    // ------------------------------------------------------------------
    // Collections
    // ------------------------------------------------------------------

    /// Add a collection; the name is made unique
    pub fn add_collection(&mut self, name: &str) -> Result<Handle<Collection>> {
        let name = unique_name(name, |n| self.find_collection(n).is_some());
        log::debug!("Adding collection {}", name);
        let handle = self.collections.insert(CollectionEntry {
            name,
            objects: Vec::new(),
        })?;
        Ok(handle.cast())
    }

    /// Delete a collection. Handles to it go stale and bone settings that
    /// pointed at it are cleared.
    pub fn remove_collection(&mut self, handle: Handle<Collection>) -> Option<CollectionEntry> {
        let removed = self.collections.remove(handle.cast())?;
        self.for_each_endpoint(|endpoint| {
            if endpoint.collider_collection == Some(handle) {
                endpoint.collider_collection = None;
            }
        });
        Some(removed)
    }

    /// Visit both endpoints of every pose bone in every armature
    ///
    /// Slots are reused once their generation wraps, so a deleted target
    /// must not stay referenced.
    fn for_each_endpoint(&mut self, mut f: impl FnMut(&mut EndpointSettings)) {
        for (_, object) in self.objects.iter_mut() {
            let Some(armature) = object.data.as_armature_mut() else {
                continue;
            };
            for bone in &mut armature.bones {
                for endpoint in Endpoint::BOTH {
                    f(bone.settings.endpoint_mut(endpoint));
                }
            }
        }
    }

    /// Rename a collection; returns the name it actually received
    pub fn rename_collection(&mut self, handle: Handle<Collection>, name: &str) -> Option<String> {
        if self.collections.get(handle.cast())?.name == name {
            return Some(name.to_string());
        }
        let name = unique_name(name, |n| self.find_collection(n).is_some());
        let entry = self.collections.get_mut(handle.cast())?;
        entry.name = name.clone();
        Some(name)
    }

    /// Link an object into a collection
    pub fn link(&mut self, collection: Handle<Collection>, object: Handle<SceneObject>) -> bool {
        if !self.objects.contains(object.cast()) {
            return false;
        }
        match self.collections.get_mut(collection.cast()) {
            Some(entry) => {
                if !entry.objects.contains(&object) {
                    entry.objects.push(object);
                }
                true
            }
            None => false,
        }
    }

    /// Look up a collection entry
    pub fn collection(&self, handle: Handle<Collection>) -> Option<&CollectionEntry> {
        self.collections.get(handle.cast())
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Load a scene from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scene: Scene = serde_json::from_slice(&bytes).map_err(SceneError::Parse)?;
        log::info!(
            "Loaded scene from {:?}: {} objects, {} collections",
            path,
            scene.objects.len(),
            scene.collections.len()
        );
        Ok(scene)
    }

    /// Save the scene as JSON, replacing `path` atomically
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = serde_json::to_vec_pretty(self).map_err(SceneError::Serialize)?;
        persist::write_atomic(path, &data).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("Saved scene to {:?} ({} bytes)", path, data.len());
        Ok(())
    }
}

impl TargetTable for Scene {
    fn object_name(&self, handle: Handle<SceneObject>) -> Option<&str> {
        self.objects.get(handle.cast()).map(|o| o.name.as_str())
    }

    fn find_object(&self, name: &str) -> Option<Handle<SceneObject>> {
        self.objects
            .iter()
            .find(|(_, o)| o.name == name)
            .map(|(h, _)| h.cast())
    }

    fn collection_name(&self, handle: Handle<Collection>) -> Option<&str> {
        self.collections.get(handle.cast()).map(|c| c.name.as_str())
    }

    fn find_collection(&self, name: &str) -> Option<Handle<Collection>> {
        self.collections
            .iter()
            .find(|(_, c)| c.name == name)
            .map(|(h, _)| h.cast())
    }
}

impl Host for Scene {
    fn scene(&self) -> &SceneSettings {
        &self.settings
    }

    fn scene_mut(&mut self) -> &mut SceneSettings {
        &mut self.settings
    }

    fn rig_names(&self) -> Vec<String> {
        self.objects
            .iter()
            .filter(|(_, o)| o.data.kind() == ObjectKind::Armature)
            .map(|(_, o)| o.name.clone())
            .collect()
    }

    fn rig(&self, rig: &str) -> Option<&RigSettings> {
        self.armature(rig).map(|a| &a.settings)
    }

    fn rig_mut(&mut self, rig: &str) -> Option<&mut RigSettings> {
        self.armature_mut(rig).map(|a| &mut a.settings)
    }

    fn bone_names(&self, rig: &str) -> Vec<String> {
        self.armature(rig)
            .map(|a| a.bones.iter().map(|b| b.name.clone()).collect())
            .unwrap_or_default()
    }

    fn bone(&self, rig: &str, bone: &str) -> Option<&BoneSettings> {
        self.armature(rig)?.bone(bone).map(|b| &b.settings)
    }

    fn bone_mut(&mut self, rig: &str, bone: &str) -> Option<&mut BoneSettings> {
        self.armature_mut(rig)?.bone_mut(bone).map(|b| &mut b.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_names() {
        let mut scene = Scene::new();
        let a = scene.add_object("Sphere", ObjectKind::Mesh).unwrap();
        let b = scene.add_object("Sphere", ObjectKind::Mesh).unwrap();
        let c = scene.add_object("Sphere", ObjectKind::Mesh).unwrap();

        assert_eq!(scene.object_name(a), Some("Sphere"));
        assert_eq!(scene.object_name(b), Some("Sphere.001"));
        assert_eq!(scene.object_name(c), Some("Sphere.002"));
    }

    #[test]
    fn test_remove_invalidates_handles() {
        let mut scene = Scene::new();
        let sphere = scene.add_object("Sphere", ObjectKind::Mesh).unwrap();
        let group = scene.add_collection("Colliders").unwrap();
        assert!(scene.link(group, sphere));

        scene.remove_object(sphere).unwrap();
        let cube = scene.add_object("Cube", ObjectKind::Mesh).unwrap();

        assert_eq!(scene.object_name(sphere), None);
        assert_eq!(scene.find_object("Sphere"), None);
        assert_eq!(scene.object_name(cube), Some("Cube"));
        assert!(scene.collection(group).unwrap().objects.is_empty());
    }

    #[test]
    fn test_remove_clears_bone_references() {
        let mut scene = Scene::new();
        let rig = scene.add_armature("Rig").unwrap();
        scene.add_bone(rig, "Spine").unwrap();
        let sphere = scene.add_object("Sphere", ObjectKind::Mesh).unwrap();
        let wind = scene.add_object("Wind", ObjectKind::Empty).unwrap();
        let group = scene.add_collection("Colliders").unwrap();

        let bone = scene.bone_mut("Rig", "Spine").unwrap();
        bone.tail.collider = Some(sphere);
        bone.head.wind_source = Some(sphere);
        bone.head.collider_collection = Some(group);
        bone.tail.wind_source = Some(wind);

        scene.remove_object(sphere).unwrap();
        scene.remove_collection(group).unwrap();

        let bone = scene.bone("Rig", "Spine").unwrap();
        assert_eq!(bone.tail.collider, None);
        assert_eq!(bone.head.wind_source, None);
        assert_eq!(bone.head.collider_collection, None);
        assert_eq!(bone.tail.wind_source, Some(wind));
    }

    #[test]
    fn test_reused_slot_not_referenced() {
        let mut scene = Scene::new();
        let rig = scene.add_armature("Rig").unwrap();
        scene.add_bone(rig, "Spine").unwrap();
        let sphere = scene.add_object("Sphere", ObjectKind::Mesh).unwrap();
        scene.bone_mut("Rig", "Spine").unwrap().tail.collider = Some(sphere);
        scene.remove_object(sphere).unwrap();

        // Cycle the slot until its generation wraps back to the old handle
        for _ in 0..255 {
            let temp = scene.add_object("Temp", ObjectKind::Empty).unwrap();
            scene.remove_object(temp).unwrap();
        }
        let unrelated = scene.add_object("Unrelated", ObjectKind::Mesh).unwrap();

        assert_eq!(unrelated, sphere);
        assert_eq!(scene.bone("Rig", "Spine").unwrap().tail.collider, None);
    }

    #[test]
    fn test_rename_keeps_handle() {
        let mut scene = Scene::new();
        let sphere = scene.add_object("Sphere", ObjectKind::Mesh).unwrap();
        scene.add_object("Ball", ObjectKind::Mesh).unwrap();

        assert_eq!(scene.rename_object(sphere, "Ball").as_deref(), Some("Ball.001"));
        assert_eq!(scene.find_object("Ball.001"), Some(sphere));
        assert_eq!(scene.find_object("Sphere"), None);
    }

    #[test]
    fn test_host_enumeration() {
        let mut scene = Scene::new();
        let rig = scene.add_armature("Rig").unwrap();
        scene.add_object("Mesh", ObjectKind::Mesh).unwrap();
        scene.add_bone(rig, "Spine").unwrap();
        scene.add_bone(rig, "Neck").unwrap();
        assert_eq!(scene.add_bone(rig, "Spine").unwrap(), "Spine.001");

        assert_eq!(scene.rig_names(), vec!["Rig".to_string()]);
        assert_eq!(scene.bone_names("Rig"), vec!["Spine", "Neck", "Spine.001"]);
        assert!(scene.bone_names("Mesh").is_empty());
        assert!(scene.rig("Mesh").is_none());

        scene.bone_mut("Rig", "Neck").unwrap().mute = true;
        assert!(scene.bone("Rig", "Neck").unwrap().mute);
    }

    #[test]
    fn test_add_bone_to_mesh_fails() {
        let mut scene = Scene::new();
        let mesh = scene.add_object("Mesh", ObjectKind::Mesh).unwrap();
        assert!(matches!(
            scene.add_bone(mesh, "Bone"),
            Err(SceneError::NotAnArmature(name)) if name == "Mesh"
        ));
    }
}
