//! Subcommand implementations
//!
//! Paths arrive already resolved; a `None` settings path means the user
//! dismissed the prompt.

use std::fmt::Write as _;
use std::path::Path;
use wiggle_io::{describe, export_to_path, import_from_path, plan_from_path, IoConfig, Level, Outcome};
use wiggle_scene::Scene;

/// Write the settings of the scene at `scene_path` to `out`
pub fn export_scene(scene_path: &Path, out: Option<&Path>, config: &IoConfig) -> Outcome {
    if out.is_none() {
        return Outcome::Cancelled;
    }
    match Scene::load(scene_path) {
        Ok(scene) => export_to_path(&scene, out, config),
        Err(e) => Outcome::Failure(format!("Error loading scene: {}", e)),
    }
}

/// Merge `settings` into the scene at `scene_path` and save it back
///
/// With `dry_run` the merge is only planned and its report returned.
pub fn import_settings(
    scene_path: &Path,
    settings: Option<&Path>,
    dry_run: bool,
    config: &IoConfig,
) -> Outcome {
    let Some(settings) = settings else {
        return Outcome::Cancelled;
    };
    let mut scene = match Scene::load(scene_path) {
        Ok(scene) => scene,
        Err(e) => return Outcome::Failure(format!("Error loading scene: {}", e)),
    };

    if dry_run {
        return match plan_from_path(&scene, settings, config) {
            Ok(plan) => Outcome::Success(format!(
                "Dry run, {} not modified\n{}",
                scene_path.display(),
                plan.report()
            )),
            Err(e) => Outcome::Failure(format!("Error loading settings: {}", e)),
        };
    }

    let outcome = import_from_path(&mut scene, Some(settings), config);
    if !outcome.is_success() {
        return outcome;
    }
    match scene.save(scene_path) {
        Ok(()) => outcome,
        Err(e) => Outcome::Failure(format!("Error saving scene: {}", e)),
    }
}

/// Table of document keys with kind and default, for one level or all
pub fn schema_table(level: Option<Level>) -> String {
    let levels = match level {
        Some(level) => vec![level],
        None => Level::ALL.to_vec(),
    };

    let mut out = String::new();
    for (i, level) in levels.into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "[{}]", level.name());
        for info in describe(level) {
            let _ = writeln!(out, "{:<36} {:<32} {}", info.key, info.kind.to_string(), info.default);
        }
    }
    out
}
