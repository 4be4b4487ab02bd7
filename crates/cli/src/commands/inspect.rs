//! Inspect a saved clipboard payload.

use std::path::PathBuf;

use anyhow::{Context, Result};
use cell_selection::{BincodeCodec, ClipboardCodec};
use clap::Parser;
use console::style;
use level_content::TileCatalogLoader;
use level_core::{SelectionConfig, TileOracle, TileRef};

/// Decode a clipboard payload and summarize its contents
#[derive(Parser)]
pub struct InspectClipboard {
    /// Clipboard payload written by `run --save-clipboard`
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Tile database (RON) used to resolve tile names
    #[arg(short, long, value_name = "FILE")]
    tiles: PathBuf,
}

impl InspectClipboard {
    pub fn execute(self) -> Result<()> {
        let tiles = TileCatalogLoader::load(&self.tiles)?;
        let bytes = std::fs::read(&self.file)
            .with_context(|| format!("Failed to read clipboard file: {}", self.file.display()))?;

        let buffer = BincodeCodec::new(&tiles)
            .decode(&bytes)
            .with_context(|| format!("Failed to decode clipboard: {}", self.file.display()))?;

        println!("{}", style("Clipboard").bold());
        println!("  origin: {}", buffer.origin());
        println!("  size:   {}x{}", buffer.width(), buffer.height());

        for layer in 0..SelectionConfig::LAYER_COUNT {
            let mut included = 0;
            let mut heads = Vec::new();
            for y in 0..buffer.height() {
                for x in 0..buffer.width() {
                    let masked = buffer.get(layer, x, y);
                    if !masked.included {
                        continue;
                    }
                    included += 1;
                    if let TileRef::Head(id) = masked.cell.tile {
                        let name = tiles.tile(id).map_or("?", |def| def.name.as_str());
                        heads.push(format!("{name}@({x}, {y})"));
                    }
                }
            }
            println!("  layer {layer}: {included} cells");
            if !heads.is_empty() {
                println!("    tiles: {}", heads.join(", "));
            }
        }
        Ok(())
    }
}
