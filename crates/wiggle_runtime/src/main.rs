//! Wiggle - spring settings export/import for saved scenes
//!
//! ```text
//! wiggle export --scene scene.json --out rig.json
//! wiggle import --scene scene.json --settings rig.json [--dry-run]
//! wiggle schema [scene|armature|bone]
//! ```
//!
//! A missing `--out` or `--settings` path is asked for on stdin. An empty
//! answer cancels the action without touching any file.

mod commands;
mod config;
mod prompt;

use clap::{Parser, Subcommand, ValueEnum};
use config::RuntimeConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use wiggle_io::{Level, Outcome};

#[derive(Parser)]
#[command(name = "wiggle")]
#[command(about = "Export and import Wiggle spring settings", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: $WIGGLE_CONFIG, then ./wiggle.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Spaces per indentation level in written settings files
    #[arg(long, global = true)]
    indent: Option<usize>,

    /// Refuse settings files written by a newer format version
    #[arg(long, global = true)]
    strict_version: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the scene's spring settings to a settings file
    Export {
        /// Scene file to read
        #[arg(long)]
        scene: PathBuf,

        /// Settings file to write
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Merge a settings file into the scene and save it
    Import {
        /// Scene file to update
        #[arg(long)]
        scene: PathBuf,

        /// Settings file to read
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Report what would change without saving the scene
        #[arg(long)]
        dry_run: bool,
    },

    /// List settings document keys with their kinds and defaults
    Schema {
        #[arg(value_enum)]
        level: Option<LevelArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LevelArg {
    Scene,
    Armature,
    Bone,
}

impl From<LevelArg> for Level {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Scene => Level::Scene,
            LevelArg::Armature => Level::Rig,
            LevelArg::Bone => Level::Bone,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match RuntimeConfig::load(cli.config.as_deref()) {
        Ok(config) => config.with_overrides(cli.indent, cli.strict_version),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str())
    ).init();

    if let Some(path) = &config.config_path {
        log::info!("Loaded config from {:?}", path);
    }
    log::debug!("IO config: {:?}", config.io);

    let outcome = match cli.command {
        Commands::Export { scene, out } => {
            let out = out.or_else(|| prompt::prompt_path("Export settings to"));
            commands::export_scene(&scene, out.as_deref(), &config.io)
        }
        Commands::Import {
            scene,
            settings,
            dry_run,
        } => {
            let settings = settings.or_else(|| prompt::prompt_path("Import settings from"));
            commands::import_settings(&scene, settings.as_deref(), dry_run, &config.io)
        }
        Commands::Schema { level } => {
            print!("{}", commands::schema_table(level.map(Level::from)));
            return ExitCode::SUCCESS;
        }
    };

    println!("{}", outcome);
    match outcome {
        Outcome::Failure(_) => ExitCode::FAILURE,
        Outcome::Success(_) | Outcome::Cancelled => ExitCode::SUCCESS,
    }
}
