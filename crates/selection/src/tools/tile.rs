use level_core::{CellGrid, Position, SelectionConfig, TileOracle, TileRef};

use crate::mask::LayerSelection;
use crate::model::LayerCandidates;

/// Selects the full footprint of the tile under `position` on `layer`.
///
/// The click resolves to the tile's head; the candidate covers the head
/// layer and, for two-layer tiles, the layer below it. Only cells that
/// actually belong to that tile are selected, so overlapping neighbours and
/// detached bodies stay out. Returns `None` when there is no resolvable tile.
pub fn tile_footprint(
    grid: &dyn CellGrid,
    tiles: &dyn TileOracle,
    position: Position,
    layer: usize,
) -> Option<LayerCandidates> {
    let head = grid.resolve_tile_head(layer, position)?;
    let id = grid.get(head.layer, head.position)?.tile.head()?;
    let def = tiles.tile(id)?;
    let bounds = def.footprint(head.position);

    let last_layer = if def.has_second_layer && head.layer + 1 < SelectionConfig::LAYER_COUNT {
        head.layer + 1
    } else {
        head.layer
    };

    let mut candidates = LayerCandidates::default();
    for target in head.layer..=last_layer {
        let mut selection = LayerSelection::new(bounds);
        for cell_position in bounds.positions() {
            let Some(cell) = grid.get(target, cell_position) else {
                continue;
            };
            let belongs = match cell.tile {
                TileRef::Head(_) => target == head.layer && cell_position == head.position,
                TileRef::Body { root, layer } => root == head.position && layer == head.layer,
                TileRef::None => false,
            };
            if belongs {
                selection.set(cell_position, true);
            }
        }
        candidates[target] = Some(selection);
    }

    Some(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use level_core::{LevelGrid, TileCatalog, TileDef, TileId};

    fn setup() -> (LevelGrid, TileCatalog, TileId, TileId) {
        let mut catalog = TileCatalog::new();
        let slab = catalog.insert(TileDef::new("slab", 3, 2, Position::new(1, 0)));
        let pillar = catalog.insert(TileDef::new("pillar", 1, 2, Position::ORIGIN).with_second_layer(true));

        let mut grid = LevelGrid::new(10, 10);
        grid.place_tile(0, Position::new(3, 3), slab, catalog.tile(slab).unwrap())
            .unwrap();
        grid.place_tile(0, Position::new(6, 3), pillar, catalog.tile(pillar).unwrap())
            .unwrap();
        (grid, catalog, slab, pillar)
    }

    #[test]
    fn clicking_a_body_selects_the_whole_tile() {
        let (grid, catalog, ..) = setup();
        let candidates = tile_footprint(&grid, &catalog, Position::new(4, 4), 0).unwrap();

        let layer0 = candidates[0].as_ref().unwrap();
        assert_eq!(layer0.count(), 6);
        assert_eq!(layer0.min(), Position::new(2, 3));
        assert!(candidates[1].is_none());
    }

    #[test]
    fn two_layer_tile_spans_next_layer() {
        let (grid, catalog, ..) = setup();
        let candidates = tile_footprint(&grid, &catalog, Position::new(6, 3), 0).unwrap();

        assert_eq!(candidates[0].as_ref().unwrap().count(), 2);
        assert_eq!(candidates[1].as_ref().unwrap().count(), 2);
        assert!(candidates[2].is_none());
    }

    #[test]
    fn clicking_the_second_layer_resolves_to_head_layer() {
        let (grid, catalog, ..) = setup();
        let candidates = tile_footprint(&grid, &catalog, Position::new(6, 4), 1).unwrap();
        assert!(candidates[0].is_some());
        assert!(candidates[1].is_some());
    }

    #[test]
    fn empty_cell_has_no_footprint() {
        let (grid, catalog, ..) = setup();
        assert!(tile_footprint(&grid, &catalog, Position::new(0, 0), 0).is_none());
    }

    #[test]
    fn detached_body_has_no_footprint() {
        let (mut grid, catalog, ..) = setup();
        let mut head = grid.get(0, Position::new(3, 3)).unwrap();
        head.tile = TileRef::None;
        grid.set(0, Position::new(3, 3), head).unwrap();

        assert!(tile_footprint(&grid, &catalog, Position::new(4, 4), 0).is_none());
    }
}
