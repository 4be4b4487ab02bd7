//! Replay a script against a level file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use cell_selection::EditEnv;
use clap::Parser;
use console::style;
use level_content::{ConfigLoader, LevelLoader, TileCatalogLoader};
use level_core::{CellGrid, SelectionConfig};
use serde::Serialize;
use tracing::info;

use crate::render::{CountingHistory, CountingRenderer, render_layer};
use crate::script::{Script, ScriptRunner};

/// Replay a RON interaction script against a level
#[derive(Parser)]
pub struct Run {
    /// Level file (RON)
    #[arg(short, long, value_name = "FILE")]
    level: PathBuf,

    /// Tile database (RON)
    #[arg(short, long, value_name = "FILE")]
    tiles: PathBuf,

    /// Interaction script (RON)
    #[arg(short, long, value_name = "FILE")]
    script: PathBuf,

    /// Selection configuration (TOML); defaults apply when omitted
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Layers to draw after the run
    #[arg(long, value_name = "LAYER", default_values_t = [0usize])]
    show: Vec<usize>,

    /// Write the last copied clipboard payload to this file
    #[arg(long, value_name = "FILE")]
    save_clipboard: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Layer drawings plus a short summary
    Summary,
    /// Machine-readable JSON report
    Json,
}

#[derive(Serialize)]
struct LayerReport {
    layer: usize,
    min: (i32, i32),
    max: (i32, i32),
    selected: usize,
}

#[derive(Serialize)]
struct RunReport {
    applied: usize,
    skipped: usize,
    selection: Vec<LayerReport>,
    floating: bool,
    clipboard_bytes: Option<usize>,
    renderer: CountingRenderer,
    history: CountingHistory,
}

impl Run {
    pub fn execute(self) -> Result<()> {
        let tiles = TileCatalogLoader::load(&self.tiles)?;
        let mut grid = LevelLoader::load(&self.level, &tiles)?;
        let config = match &self.config {
            Some(path) => ConfigLoader::load(path)?,
            None => SelectionConfig::default(),
        };
        let script = Script::load(&self.script)?;
        info!(
            width = grid.width(),
            height = grid.height(),
            tiles = tiles.len(),
            steps = script.steps().len(),
            "loaded level"
        );

        if let Some(layer) = self.show.iter().find(|l| **l >= SelectionConfig::LAYER_COUNT) {
            anyhow::bail!("Layer {} does not exist", layer);
        }

        let mut renderer = CountingRenderer::default();
        let mut history = CountingHistory::default();
        let mut runner = ScriptRunner::new(config, &tiles);
        {
            let mut env = EditEnv::new(&mut grid, &tiles, &mut renderer, &mut history);
            runner.run(&script, &mut env)?;
        }

        if let (Some(path), Some(bytes)) = (&self.save_clipboard, runner.clipboard()) {
            std::fs::write(path, bytes)
                .with_context(|| format!("Failed to write clipboard to {}", path.display()))?;
            info!(path = %path.display(), bytes = bytes.len(), "saved clipboard");
        }

        let session = runner.session();
        let report = RunReport {
            applied: runner.applied(),
            skipped: runner.skipped(),
            selection: session
                .selection()
                .layers()
                .iter()
                .enumerate()
                .filter_map(|(layer, selection)| {
                    selection.as_ref().map(|sel| LayerReport {
                        layer,
                        min: (sel.min().x, sel.min().y),
                        max: (sel.max().x, sel.max().y),
                        selected: sel.count(),
                    })
                })
                .collect(),
            floating: session.overlay().is_some(),
            clipboard_bytes: runner.clipboard().map(<[u8]>::len),
            renderer,
            history,
        };

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Summary => {
                for layer in &self.show {
                    println!("{}", style(format!("layer {layer}")).bold());
                    print!("{}", render_layer(&grid, *layer, session.selection()));
                }
                println!(
                    "{} steps applied, {} skipped, {} changes recorded",
                    report.applied, report.skipped, report.history.changes
                );
                for layer in &report.selection {
                    println!(
                        "  layer {}: {} cells in ({}, {})..=({}, {})",
                        layer.layer, layer.selected, layer.min.0, layer.min.1, layer.max.0, layer.max.1
                    );
                }
                if report.floating {
                    println!("{}", style("  geometry is still floating (no Done/Submit)").yellow());
                }
            }
        }
        Ok(())
    }
}
