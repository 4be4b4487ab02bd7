//! Tile database loader.

use std::path::Path;

use level_core::{TileCatalog, TileDef};

use crate::loaders::{LoadResult, read_file};

/// Loader for tile databases from RON files.
///
/// The file holds a list of tile definitions; ids are assigned in file
/// order.
pub struct TileCatalogLoader;

impl TileCatalogLoader {
    pub fn load(path: &Path) -> LoadResult<TileCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<TileCatalog> {
        let defs: Vec<TileDef> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tiles RON: {}", e))?;

        let mut catalog = TileCatalog::new();
        for def in defs {
            validate(&def)?;
            if level_core::TileOracle::find(&catalog, &def.name).is_some() {
                anyhow::bail!("Duplicate tile name '{}'", def.name);
            }
            catalog.insert(def);
        }
        Ok(catalog)
    }
}

fn validate(def: &TileDef) -> LoadResult<()> {
    if def.width == 0 || def.height == 0 {
        anyhow::bail!("Tile '{}' has an empty footprint", def.name);
    }
    let center = def.center;
    if center.x < 0
        || center.y < 0
        || center.x as usize >= def.width
        || center.y as usize >= def.height
    {
        anyhow::bail!(
            "Tile '{}' has its center {} outside its {}x{} footprint",
            def.name,
            center,
            def.width,
            def.height
        );
    }
    Ok(())
}
