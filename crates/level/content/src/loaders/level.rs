//! Level grid loader.
//!
//! Level files describe geometry as rectangular fills followed by single-cell
//! overrides, then place tiles by name. Everything not mentioned is air.

use std::path::Path;

use level_core::{
    Cell, CellGrid, GeoType, LevelGrid, LevelObject, Position, Rect, SelectionConfig, TileOracle,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LevelRon {
    dimensions: (u32, u32),
    #[serde(default)]
    fills: Vec<FillRon>,
    #[serde(default)]
    cells: Vec<CellRon>,
    #[serde(default)]
    tiles: Vec<TilePlacementRon>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FillRon {
    layer: usize,
    from: (i32, i32),
    to: (i32, i32),
    geo: GeoType,
    #[serde(default)]
    material: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CellRon {
    layer: usize,
    at: (i32, i32),
    geo: GeoType,
    #[serde(default)]
    objects: LevelObject,
    #[serde(default)]
    material: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TilePlacementRon {
    name: String,
    layer: usize,
    head: (i32, i32),
}

/// Loader for level grids from RON files.
pub struct LevelLoader;

impl LevelLoader {
    /// Load a level, resolving tile placements through `tiles`.
    pub fn load(path: &Path, tiles: &dyn TileOracle) -> LoadResult<LevelGrid> {
        let content = read_file(path)?;
        Self::parse(&content, tiles)
    }

    pub fn parse(content: &str, tiles: &dyn TileOracle) -> LoadResult<LevelGrid> {
        let data: LevelRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse level RON: {}", e))?;

        let (width, height) = (data.dimensions.0 as usize, data.dimensions.1 as usize);
        if width == 0 || height == 0 {
            anyhow::bail!("Level dimensions must be non-zero, got {}x{}", width, height);
        }
        let mut grid = LevelGrid::new(width, height);

        for fill in data.fills {
            check_layer(fill.layer)?;
            let rect = Rect::from_corners(
                Position::new(fill.from.0, fill.from.1),
                Position::new(fill.to.0, fill.to.1),
            );
            let cell = Cell {
                geo: fill.geo,
                material: fill.material,
                ..Cell::EMPTY
            };
            for position in rect.positions() {
                grid.set(fill.layer, position, cell)
                    .map_err(|e| anyhow::anyhow!("Invalid fill: {}", e))?;
            }
        }

        for entry in data.cells {
            check_layer(entry.layer)?;
            let cell = Cell {
                geo: entry.geo,
                objects: entry.objects,
                material: entry.material,
                ..Cell::EMPTY
            };
            grid.set(entry.layer, Position::new(entry.at.0, entry.at.1), cell)
                .map_err(|e| anyhow::anyhow!("Invalid cell: {}", e))?;
        }

        for placement in data.tiles {
            check_layer(placement.layer)?;
            let id = tiles
                .find(&placement.name)
                .ok_or_else(|| anyhow::anyhow!("Unknown tile '{}'", placement.name))?;
            let def = tiles
                .tile(id)
                .ok_or_else(|| anyhow::anyhow!("Tile '{}' has no definition", placement.name))?;
            let head = Position::new(placement.head.0, placement.head.1);
            grid.place_tile(placement.layer, head, id, def)
                .map_err(|e| anyhow::anyhow!("Cannot place tile '{}' at {}: {}", placement.name, head, e))?;
        }

        Ok(grid)
    }
}

fn check_layer(layer: usize) -> LoadResult<()> {
    if layer >= SelectionConfig::LAYER_COUNT {
        anyhow::bail!(
            "Layer {} does not exist (levels have {} layers)",
            layer,
            SelectionConfig::LAYER_COUNT
        );
    }
    Ok(())
}
