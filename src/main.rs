use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clip_canvas::draw::replay::ReplayScript;
use clip_canvas::draw::{settings_store, CanvasSession};

#[derive(Parser)]
#[command(name = "clip_canvas")]
#[command(about = "Replay scripted input against a canvas and print the final frame", long_about = None)]
#[command(version)]
struct Cli {
    /// Replay script (JSON). Reads stdin when omitted or `-`.
    #[arg(value_hint = clap::ValueHint::FilePath)]
    script: Option<PathBuf>,

    /// Settings file; defaults to canvas_settings.json next to the executable
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    settings: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    log_file: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG is honoured)
    #[arg(long)]
    debug: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => settings_store::load_from_path(path)?.unwrap_or_default(),
        None => settings_store::load()?,
    };
    clip_canvas::logging::init(cli.debug || settings.debug_logging, cli.log_file.as_deref());

    let script = match cli.script.as_deref() {
        Some(path) if path.as_os_str() != "-" => ReplayScript::load(path)?,
        _ => {
            let mut json = String::new();
            std::io::stdin()
                .read_to_string(&mut json)
                .context("read replay script from stdin")?;
            ReplayScript::from_json(&json)?
        }
    };

    let mut session = CanvasSession::new(settings);
    let outcome = script.run(&mut session);
    tracing::info!(
        steps = script.steps.len(),
        rejected = outcome.rejected.len(),
        draw_commands = outcome.frame.len(),
        "replay finished"
    );

    let json = if cli.pretty {
        serde_json::to_string_pretty(&outcome)
    } else {
        serde_json::to_string(&outcome)
    }
    .context("serialize replay outcome")?;
    println!("{json}");
    Ok(())
}
