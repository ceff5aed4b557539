use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mapmeasure_core::units::registry;
use mapmeasure_core::{
    MeasureConfig, MeasurementMode, MemoryPreferenceStore, PreferenceStore, QuantityKind,
    UnitSelection, UnitSpec,
};
use mapmeasure_storage::FileStore;
use mapmeasure_ui::{MapEvent, MeasureTool, MeasurementView, OverlayScene, OverlayStyle, ToolbarButton};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mapmeasure-cli")]
#[command(about = "Map measurement CLI")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a JSON script of tool commands and map events.
    Replay {
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
        /// JSON tool configuration.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Directory for persisted unit preferences.
        #[arg(long, value_name = "DIR", conflicts_with = "persist")]
        prefs_dir: Option<PathBuf>,
        /// Persist unit preferences in the user's data directory.
        #[arg(long)]
        persist: bool,
    },
    /// Print the unit registry as JSON.
    Units {
        /// Only list units of this quantity (distance, length or area).
        #[arg(long, value_name = "KIND")]
        kind: Option<QuantityKind>,
    },
    /// Print CLI version.
    Version,
}

/// One step of a replay script
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ScriptCommand {
    Activate(MeasurementMode),
    Toggle(MeasurementMode),
    SetUnit { kind: QuantityKind, symbol: String },
    Press(ToolbarButton),
    ClearAll,
    Deactivate,
    Event(MapEvent),
}

#[derive(Debug, Serialize)]
struct ReplayReport {
    active_mode: Option<MeasurementMode>,
    point_count: usize,
    finalized_count: usize,
    units: UnitSelection,
    measurements: Vec<MeasurementView>,
    overlay: OverlayReport,
    warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
struct OverlayReport {
    primitives: usize,
    labels: Vec<String>,
}

#[derive(Debug, Serialize)]
struct UnitsOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    distance: Option<Vec<UnitSpec>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    area: Option<Vec<UnitSpec>>,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    init_tracing();

    match cli.command {
        Commands::Replay { script, config, prefs_dir, persist } => {
            let prefs = match (prefs_dir, persist) {
                (Some(dir), _) => Prefs::Dir(dir),
                (None, true) => Prefs::UserData,
                (None, false) => Prefs::Memory,
            };
            run_replay(&script, config.as_deref(), prefs)
        }
        Commands::Units { kind } => run_units(kind),
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // Already installed when `run` is called more than once in-process
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Where replayed unit changes are persisted
#[derive(Debug)]
enum Prefs {
    Memory,
    Dir(PathBuf),
    UserData,
}

fn run_replay(script: &Path, config: Option<&Path>, prefs: Prefs) -> Result<()> {
    ensure_file_exists(script)?;

    let config = match config {
        Some(path) => load_config(path)?,
        None => MeasureConfig::default(),
    };

    let text = fs::read_to_string(script)
        .with_context(|| format!("failed to read script {}", script.display()))?;
    let commands: Vec<ScriptCommand> = serde_json::from_str(&text)
        .with_context(|| format!("invalid replay script {}", script.display()))?;
    tracing::debug!(steps = commands.len(), "replaying script");

    let report = match prefs {
        Prefs::Memory => replay(&config, MemoryPreferenceStore::new(), commands),
        Prefs::Dir(dir) => replay(&config, FileStore::with_root(dir), commands),
        Prefs::UserData => {
            let store = FileStore::from_default_project()
                .context("failed to locate user data directory")?;
            tracing::debug!(root = %store.root().display(), "persisting preferences");
            replay(&config, store, commands)
        }
    };

    let json = serde_json::to_string_pretty(&report)?;
    println!("{json}");

    Ok(())
}

fn load_config(path: &Path) -> Result<MeasureConfig> {
    ensure_file_exists(path)?;
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    MeasureConfig::from_json_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))
}

fn replay<S: PreferenceStore>(
    config: &MeasureConfig,
    store: S,
    commands: Vec<ScriptCommand>,
) -> ReplayReport {
    let mut tool = MeasureTool::new(config, OverlayStyle::default(), OverlayScene::new(), store);
    let mut warnings = Vec::new();

    for command in commands {
        match command {
            ScriptCommand::Activate(mode) => tool.activate(mode),
            ScriptCommand::Toggle(mode) => tool.toggle_button_pressed(mode),
            ScriptCommand::SetUnit { kind, symbol } => {
                if let Err(error) = tool.set_unit(kind, &symbol) {
                    warnings.push(error.to_string());
                }
            }
            ScriptCommand::Press(button) => tool.press(button),
            ScriptCommand::ClearAll => tool.clear_all(),
            ScriptCommand::Deactivate => tool.deactivate(),
            ScriptCommand::Event(event) => tool.handle_event(event),
        }
    }

    let scene = tool.renderer();
    let overlay = OverlayReport {
        primitives: scene.len(),
        labels: scene.label_texts().into_iter().map(str::to_owned).collect(),
    };

    ReplayReport {
        active_mode: tool.active_mode(),
        point_count: tool.point_count(),
        finalized_count: tool.finalized_count(),
        units: tool.unit_selection(),
        measurements: tool.measurements(),
        overlay,
        warnings,
    }
}

fn run_units(kind: Option<QuantityKind>) -> Result<()> {
    let wanted = |k: QuantityKind| (kind.is_none() || kind == Some(k)).then(|| registry(k));
    let payload = UnitsOutput {
        distance: wanted(QuantityKind::Distance),
        area: wanted(QuantityKind::Area),
    };
    let json = serde_json::to_string_pretty(&payload)?;
    println!("{json}");
    Ok(())
}

fn ensure_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("file does not exist: {}", path.display());
    }

    if !path.is_file() {
        anyhow::bail!("path is not a file: {}", path.display());
    }

    Ok(())
}
