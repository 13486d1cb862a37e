//! uptable CLI - replay action scripts through the upload table engine.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, info_span};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use uptable_core::{ColumnKind, Store, SELECTABLE_COLUMNS, STATIC_COLUMNS};

mod config;
mod json_output;
mod replay;

use json_output::ReplayEvent;
use replay::Summary;

/// uptable CLI - Upload table state engine tool
#[derive(Parser)]
#[command(name = "uptable")]
#[command(about = "Replay upload-table action scripts", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a newline-delimited JSON action script
    Replay {
        /// Script file, one action per line
        script: PathBuf,

        /// Engine configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Stream one JSON event per applied action to stdout
        #[arg(long)]
        json: bool,

        /// Print a summary instead of the full final state
        #[arg(short, long)]
        summary: bool,
    },

    /// List column kinds and their layout rules
    Columns,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "uptable={level},uptable_core={level}",
            level = cli.log_level
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    match cli.command {
        Commands::Replay {
            script,
            config,
            json,
            summary,
        } => run_replay(script, config, json, summary)?,
        Commands::Columns => print_columns(),
    }

    Ok(())
}

fn run_replay(
    script: PathBuf,
    config: Option<PathBuf>,
    json: bool,
    summary: bool,
) -> Result<(), Box<dyn Error>> {
    let session_id = Uuid::new_v4().to_string();
    let span = info_span!("replay", session_id = %session_id);
    let _guard = span.enter();

    let engine_config = config::load(config.as_deref())?;
    let text = std::fs::read_to_string(&script).map_err(replay::ReplayError::from)?;
    let steps = replay::parse_script(&text)?;

    if json {
        json_output::enable_json_mode();
    }
    info!(script = %script.display(), steps = steps.len(), "Starting replay");
    let script_name = script.to_string_lossy();
    json_output::emit(&ReplayEvent::ReplayStarted {
        session_id: &session_id,
        script: &script_name,
        actions: steps.len(),
    });

    let mut store = Store::new(&engine_config);
    let applied = replay::replay(&mut store, &steps, |step, state| {
        json_output::emit(&ReplayEvent::applied(step.line, step.action.kind(), state));
    })?;
    json_output::emit(&ReplayEvent::ReplayFinished {
        session_id: &session_id,
        applied,
    });

    if json {
        return Ok(());
    }
    let output = if summary {
        serde_json::to_string_pretty(&Summary::from_store(&store))?
    } else {
        serde_json::to_string_pretty(store.state())?
    };
    println!("{}", output);

    Ok(())
}

fn print_columns() {
    println!("{:<28} {:<10} {:<12} WIDTH", "KIND", "STATIC", "ENUMERATED");
    println!("{}", "-".repeat(62));
    for kind in STATIC_COLUMNS.iter().chain(SELECTABLE_COLUMNS.iter()) {
        print_column(*kind);
    }
}

fn print_column(kind: ColumnKind) {
    let width = kind
        .fixed_width()
        .map(|w| format!("{w}"))
        .unwrap_or_else(|| "flexible".to_string());
    println!(
        "{:<28} {:<10} {:<12} {}",
        kind.as_str(),
        kind.is_static(),
        kind.is_enumerated(),
        width
    );
}
