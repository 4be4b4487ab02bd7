use level_core::{CellGrid, Position, Rect};

use crate::mask::LayerSelection;
use crate::raster::{FloodFillOverflow, flood_fill};

/// Magic wand: the 4-connected region around `seed` whose cells share the
/// seed's solid-like category on `layer`.
///
/// Returns `Ok(None)` when the seed is outside the grid. Nothing is read
/// past the first `limit + 1` visited cells.
pub fn magic_wand(
    grid: &dyn CellGrid,
    seed: Position,
    layer: usize,
    limit: usize,
) -> Result<Option<LayerSelection>, FloodFillOverflow> {
    let Some(seed_cell) = grid.get(layer, seed) else {
        return Ok(None);
    };
    let select_solid = seed_cell.geo.is_solid_like();

    let region = flood_fill(seed, grid.width(), grid.height(), limit, |position| {
        grid.get(layer, position)
            .is_some_and(|cell| cell.geo.is_solid_like() == select_solid)
    })?;

    let Some(first) = region.first().copied() else {
        return Ok(None);
    };
    let bounds = region.iter().fold(Rect::from_corners(first, first), |rect, p| {
        rect.union(&Rect::from_corners(*p, *p))
    });

    let mut selection = LayerSelection::new(bounds);
    for position in region {
        selection.set(position, true);
    }
    Ok(Some(selection))
}
