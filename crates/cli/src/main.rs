//! Headless driver for the selection engine.
//!
//! Loads a level and tile database, replays a scripted interaction against a
//! `SelectionSession` and reports the resulting grid and selection.

mod commands;
mod render;
mod script;

use anyhow::Result;
use clap::Parser;
use commands::{InspectClipboard, Run};

/// Replay selection scripts against level files
#[derive(Parser)]
#[command(name = "selection-cli")]
#[command(about = "Headless driver for the level selection engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Replay a RON interaction script against a level
    Run(Run),

    /// Decode a saved clipboard payload and summarize it
    InspectClipboard(InspectClipboard),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(cmd) => cmd.execute(),
        Command::InspectClipboard(cmd) => cmd.execute(),
    }
}
