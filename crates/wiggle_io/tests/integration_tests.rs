//! Integration tests for wiggle_io crate
//!
//! Exercises export, file round trips and merge behaviour against the
//! in-memory scene host

use serde_json::json;
use std::cell::RefCell;
use std::fs;
use tempfile::TempDir;
use wiggle_core::{ColliderType, Host, TargetTable};
use wiggle_io::*;
use wiggle_scene::{ObjectKind, Scene};

/// Scene with one enabled armature "Rig" whose bone "Spine" collides with "Sphere"
fn rigged_scene() -> Scene {
    let mut scene = Scene::new();
    scene.settings.enabled = true;

    let rig = scene.add_armature("Rig").unwrap();
    scene.add_bone(rig, "Spine").unwrap();
    scene.add_bone(rig, "Neck").unwrap();
    let sphere = scene.add_object("Sphere", ObjectKind::Mesh).unwrap();
    let wind = scene.add_object("Wind", ObjectKind::Empty).unwrap();
    let colliders = scene.add_collection("Colliders").unwrap();
    scene.link(colliders, sphere);

    scene.rig_mut("Rig").unwrap().enabled = true;
    for name in ["Spine", "Neck"] {
        let bone = scene.bone_mut("Rig", name).unwrap();
        bone.enabled = true;
        bone.tail_enabled = true;
    }

    let spine = scene.bone_mut("Rig", "Spine").unwrap();
    spine.tail.collider = Some(sphere);
    spine.tail.wind_source = Some(wind);
    spine.head_enabled = true;
    spine.head.stiffness = 250.0;
    spine.head.collider_type = ColliderType::Collection;
    spine.head.collider_collection = Some(colliders);

    scene
}

fn snapshot(scene: &Scene) -> serde_json::Value {
    serde_json::to_value(scene).expect("Failed to serialize scene")
}

#[test]
fn test_round_trip_is_idempotent() {
    let mut scene = rigged_scene();
    let before = snapshot(&scene);

    let doc = export(&scene);
    let report = import(&doc, &mut scene).unwrap();

    assert_eq!(snapshot(&scene), before);
    assert!(report.is_clean());
    assert_eq!(report.rigs_matched, 1);
    assert_eq!(report.bones_matched, 2);
    assert_eq!(report.fields_missing, 0);
    assert_eq!(report.references_resolved, 3);
}

#[test]
fn test_round_trip_through_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rig.json");
    let config = IoConfig::default();

    let source = rigged_scene();
    assert!(export_to_path(&source, Some(&path), &config).is_success());

    // A second scene with the same names but default settings
    let mut target = Scene::new();
    let rig = target.add_armature("Rig").unwrap();
    target.add_bone(rig, "Spine").unwrap();
    target.add_bone(rig, "Neck").unwrap();
    let sphere = target.add_object("Sphere", ObjectKind::Mesh).unwrap();
    target.add_object("Wind", ObjectKind::Empty).unwrap();
    target.add_collection("Colliders").unwrap();

    let outcome = import_from_path(&mut target, Some(&path), &config);
    assert!(outcome.is_success(), "{}", outcome);

    assert!(target.settings.enabled);
    let spine = target.bone("Rig", "Spine").unwrap();
    assert_eq!(spine.tail.collider, Some(sphere));
    assert_eq!(spine.head.stiffness, 250.0);
    assert_eq!(spine.head.collider_type, ColliderType::Collection);
    assert!(spine.head.collider_collection.is_some());
}

#[test]
fn test_export_is_deterministic() {
    let scene = rigged_scene();
    let config = IoConfig::default();

    let first = export(&scene).to_vec(config.indent).unwrap();
    let second = export(&scene).to_vec(config.indent).unwrap();
    assert_eq!(first, second);

    // Same content built in a different order
    let mut reordered = Scene::new();
    reordered.settings.enabled = true;
    let wind = reordered.add_object("Wind", ObjectKind::Empty).unwrap();
    let colliders = reordered.add_collection("Colliders").unwrap();
    let sphere = reordered.add_object("Sphere", ObjectKind::Mesh).unwrap();
    reordered.link(colliders, sphere);
    let rig = reordered.add_armature("Rig").unwrap();
    reordered.add_bone(rig, "Neck").unwrap();
    reordered.add_bone(rig, "Spine").unwrap();
    reordered.rig_mut("Rig").unwrap().enabled = true;
    for name in ["Neck", "Spine"] {
        let bone = reordered.bone_mut("Rig", name).unwrap();
        bone.enabled = true;
        bone.tail_enabled = true;
    }
    let spine = reordered.bone_mut("Rig", "Spine").unwrap();
    spine.tail.collider = Some(sphere);
    spine.tail.wind_source = Some(wind);
    spine.head_enabled = true;
    spine.head.stiffness = 250.0;
    spine.head.collider_type = ColliderType::Collection;
    spine.head.collider_collection = Some(colliders);

    assert_eq!(export(&reordered).to_vec(config.indent).unwrap(), first);
}

#[test]
fn test_sparse_document_keeps_other_fields() {
    let mut scene = rigged_scene();
    let before = export(&scene);

    let doc = Document::from_json(
        r#"{"armatures": {"Rig": {"bones": {"Spine": {"wiggle_damp_head": 3.5}}}}}"#,
    )
    .unwrap();
    let report = import(&doc, &mut scene).unwrap();
    assert_eq!(report.fields_applied, 1);

    let after = export(&scene);
    let damp = json!(3.5);
    assert_eq!(after.scene, before.scene);
    assert_eq!(after.bone("Rig", "Neck"), before.bone("Rig", "Neck"));
    for (key, value) in before.bone("Rig", "Spine").unwrap() {
        let expected = if key == "wiggle_damp_head" { &damp } else { value };
        assert_eq!(after.bone("Rig", "Spine").unwrap().get(key), Some(expected), "{}", key);
    }
}

#[test]
fn test_dangling_reference_becomes_absent() {
    let mut scene = rigged_scene();
    let doc = export(&scene);
    assert_eq!(doc.bone("Rig", "Spine").unwrap()["wiggle_collider"], json!("Sphere"));

    let sphere = scene.find_object("Sphere").unwrap();
    scene.remove_object(sphere);
    scene.bone_mut("Rig", "Spine").unwrap().tail.mass = 9.0;

    let report = import(&doc, &mut scene).unwrap();

    let spine = scene.bone("Rig", "Spine").unwrap();
    assert_eq!(spine.tail.collider, None);
    assert_eq!(spine.tail.mass, 1.0);
    assert!(spine.tail.wind_source.is_some());
    assert_eq!(report.references_unresolved.len(), 1);
    assert_eq!(report.references_unresolved[0].name, "Sphere");
}

/// Names every target "Proxy" and finds nothing, recording what it was asked
#[derive(Default)]
struct FixedResolver {
    decoded: RefCell<Vec<(TargetKind, String)>>,
}

impl ReferenceResolver for FixedResolver {
    fn encode(&self, target: &Target) -> Reference {
        Reference::new(target.kind(), "Proxy")
    }

    fn decode(&self, reference: &Reference) -> Target {
        let name = reference.name().unwrap_or_default().to_string();
        self.decoded.borrow_mut().push((reference.kind, name));
        Target::absent(reference.kind)
    }
}

#[test]
fn test_custom_resolver_used_both_ways() {
    let mut scene = rigged_scene();
    let resolver = FixedResolver::default();

    let doc = Exporter::with_resolver(&resolver).export(&scene);
    let spine = doc.bone("Rig", "Spine").unwrap();
    assert_eq!(spine["wiggle_collider"], json!("Proxy"));
    assert_eq!(spine["wiggle_wind_ob"], json!("Proxy"));
    assert_eq!(spine["wiggle_collider_collection_head"], json!("Proxy"));

    let report = Importer::new()
        .with_resolver(&resolver)
        .import(&doc, &mut scene)
        .unwrap();

    let spine = scene.bone("Rig", "Spine").unwrap();
    assert_eq!(spine.tail.collider, None);
    assert_eq!(spine.tail.wind_source, None);
    assert_eq!(spine.head.collider_collection, None);
    assert_eq!(spine.head.stiffness, 250.0);

    // Three reference fields per endpoint, two endpoints, two bones
    assert_eq!(report.references_resolved, 0);
    assert_eq!(report.references_unresolved.len(), 12);
    assert!(report.references_unresolved.iter().all(|r| r.name == "Proxy"));
    assert!(report
        .references_unresolved
        .iter()
        .any(|r| r.path == "armatures.Rig.bones.Spine.wiggle_collider_collection_head"));

    let decoded = resolver.decoded.borrow();
    assert_eq!(decoded.len(), 12);
    assert!(decoded.contains(&(TargetKind::Collection, "Proxy".to_string())));
}

#[test]
fn test_unknown_rig_and_bone_skipped() {
    let mut scene = rigged_scene();
    let doc = Document::from_json(
        r#"{
            "armatures": {
                "Ghost": {"wiggle_mute": true, "bones": {"Spine": {"wiggle_mass": 5.0}}},
                "Rig": {"bones": {
                    "Tail": {"wiggle_mass": 5.0},
                    "Neck": {"wiggle_mass": 2.0}
                }}
            }
        }"#,
    )
    .unwrap();

    let report = import(&doc, &mut scene).unwrap();

    assert_eq!(report.rigs_skipped, vec!["Ghost".to_string()]);
    assert_eq!(report.bones_skipped, vec!["Rig/Tail".to_string()]);
    assert_eq!(scene.bone("Rig", "Neck").unwrap().tail.mass, 2.0);
    assert_eq!(scene.bone("Rig", "Spine").unwrap().tail.mass, 1.0);
    assert!(!scene.rig("Rig").unwrap().mute);
}

#[test]
fn test_parse_failure_leaves_scene_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    let config = IoConfig::default();
    let mut scene = rigged_scene();
    let before = snapshot(&scene);

    fs::write(&path, br#"{"scene": {"iterations": 12}, "armatures": "#).unwrap();
    let outcome = import_from_path(&mut scene, Some(&path), &config);
    assert!(outcome.is_failure());
    assert_eq!(snapshot(&scene), before);

    // Well-formed JSON with a mistyped field deep in the tree
    fs::write(
        &path,
        br#"{"scene": {"iterations": 12}, "armatures": {"Rig": {"bones": {"Spine": {"wiggle_wind_ob": 7}}}}}"#,
    )
    .unwrap();
    let outcome = import_from_path(&mut scene, Some(&path), &config);
    assert!(outcome.is_failure());
    assert!(outcome.to_string().contains("wiggle_wind_ob"));
    assert_eq!(snapshot(&scene), before);
}

#[test]
fn test_cancelled_actions_touch_nothing() {
    let dir = TempDir::new().unwrap();
    let config = IoConfig::default();
    let mut scene = rigged_scene();
    let before = snapshot(&scene);

    assert_eq!(export_to_path(&scene, None, &config), Outcome::Cancelled);
    assert_eq!(import_from_path(&mut scene, None, &config), Outcome::Cancelled);

    assert_eq!(snapshot(&scene), before);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_missing_file_is_io_failure() {
    let dir = TempDir::new().unwrap();
    let mut scene = rigged_scene();

    let outcome = import_from_path(&mut scene, Some(&dir.path().join("nope.json")), &IoConfig::default());
    assert!(outcome.is_failure());

    let err = read_document(&dir.path().join("nope.json")).unwrap_err();
    assert!(err.is_io_failure());
}

#[test]
fn test_legacy_document_imports() {
    // Untagged layout as written before documents carried a version
    let legacy = r#"{
        "scene": {"wiggle_enable": true, "iterations": 2, "loop": true, "preroll": 10,
                  "bake_overwrite": false, "bake_nla": false},
        "armatures": {"Rig": {"wiggle_mute": false, "wiggle_freeze": true,
            "bones": {"Spine": {"wiggle_mass": 0.5, "wiggle_chain": true, "wiggle_collider": ""}}}}
    }"#;
    let mut scene = rigged_scene();

    let report = import(&Document::from_json(legacy).unwrap(), &mut scene).unwrap();

    assert_eq!(report.document_version, 0);
    assert_eq!(scene.settings.preroll, 10);
    assert!(scene.rig("Rig").unwrap().freeze);
    let spine = scene.bone("Rig", "Spine").unwrap();
    assert_eq!(spine.tail.mass, 0.5);
    assert_eq!(spine.tail.chain, 1);
    assert_eq!(spine.tail.collider, None);
}

#[test]
fn test_future_version_policy() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("future.json");
    fs::write(
        &path,
        format!(r#"{{"version": {}, "scene": {{"preroll": 3, "wiggle_new": 1}}}}"#, FORMAT_VERSION + 1),
    )
    .unwrap();

    let mut scene = rigged_scene();
    let outcome = import_from_path(&mut scene, Some(&path), &IoConfig::strict());
    assert!(outcome.is_failure());
    assert_eq!(scene.settings.preroll, 0);

    let plan = plan_from_path(&scene, &path, &IoConfig::default()).unwrap();
    assert_eq!(plan.report().unknown_fields, 1);
    plan.apply(&mut scene);
    assert_eq!(scene.settings.preroll, 3);
}

#[test]
fn test_disabled_entities_not_restored() {
    let mut scene = rigged_scene();
    scene.bone_mut("Rig", "Neck").unwrap().enabled = false;
    let doc = export(&scene);
    assert!(doc.bone("Rig", "Neck").is_none());

    scene.bone_mut("Rig", "Neck").unwrap().tail.mass = 4.0;
    import(&doc, &mut scene).unwrap();
    assert_eq!(scene.bone("Rig", "Neck").unwrap().tail.mass, 4.0);
}

#[test]
fn test_export_overwrites_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rig.json");
    fs::write(&path, "stale").unwrap();

    let scene = rigged_scene();
    assert!(export_to_path(&scene, Some(&path), &IoConfig::default().with_indent(2)).is_success());

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("{\n  \"version\": 1"));
    assert_eq!(read_document(&path).unwrap(), export(&scene));
}
