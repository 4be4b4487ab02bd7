//! Grid-level guarantees of the transplant engine.

mod support;

use cell_selection::{LayerSelection, SelectionModel, TransplantEngine, transplant};
use level_core::{Cell, CellGrid, GeoType, LevelGrid, LevelObject, Position, Rect, TileOracle};
use support::{RecordingHistory, RecordingRenderer, catalog};

/// Grid with mixed geometry on every layer and two tiles, one of them
/// spanning two layers.
fn busy_grid() -> LevelGrid {
    let tiles = catalog();
    let mut grid = LevelGrid::new(12, 12);
    for layer in 0..3 {
        for y in 0..12 {
            for x in 0..12 {
                let geo = match (x + 2 * y + layer as i32) % 4 {
                    0 => GeoType::Solid,
                    1 => GeoType::SlopeRightUp,
                    2 => GeoType::Air,
                    _ => GeoType::Platform,
                };
                let cell = Cell {
                    geo,
                    objects: if x == y { LevelObject::ROCK } else { LevelObject::empty() },
                    material: (x + y) as u16,
                    ..Cell::EMPTY
                };
                grid.set(layer, Position::new(x, y), cell).unwrap();
            }
        }
    }

    let stone = tiles.find("stone_block").unwrap();
    let pipe = tiles.find("tall_pipe").unwrap();
    grid.place_tile(0, Position::new(4, 4), stone, tiles.tile(stone).unwrap())
        .unwrap();
    grid.place_tile(1, Position::new(7, 2), pipe, tiles.tile(pipe).unwrap())
        .unwrap();
    grid
}

fn boxed(layer: usize, x0: i32, y0: i32, x1: i32, y1: i32) -> SelectionModel {
    let mut model = SelectionModel::new();
    model.set_layer(
        layer,
        Some(LayerSelection::filled(Rect::from_corners(
            Position::new(x0, y0),
            Position::new(x1, y1),
        ))),
    );
    model
}

#[test]
fn extract_and_reinsert_in_place_is_identity() {
    let mut grid = busy_grid();
    let before = grid.clone();

    // Cut through the stone tile so some bodies lose their head.
    let mut selection = boxed(0, 2, 2, 3, 8);
    selection.set_layer(1, boxed(1, 6, 1, 9, 3).layer(1).cloned());
    selection.set_layer(2, boxed(2, 7, 3, 7, 4).layer(2).cloned());

    let buffer = transplant::extract(&grid, &selection).expect("selection is not empty");
    let mut engine = TransplantEngine::new(true);
    let mut renderer = RecordingRenderer::default();
    let mut history = RecordingHistory::default();
    engine.install(buffer, &mut renderer, &mut history);
    engine.submit(&mut grid, &mut renderer, &mut history);

    assert_eq!(grid, before);
    assert_eq!(history.open, 0);
}

#[test]
fn cancel_after_edits_restores_grid_exactly() {
    let mut grid = busy_grid();
    let before = grid.clone();

    let mut selection = boxed(0, 3, 3, 5, 5);
    selection.set_layer(1, boxed(1, 7, 2, 7, 4).layer(1).cloned());

    let mut engine = TransplantEngine::new(true);
    let mut renderer = RecordingRenderer::default();
    let mut history = RecordingHistory::default();
    assert!(engine.begin_move(&mut grid, &selection, &mut renderer, &mut history));
    assert_ne!(grid, before);

    let overlay = engine.overlay_mut().unwrap();
    for y in 0..overlay.height() {
        for x in 0..overlay.width() {
            let masked = overlay.get_mut(0, x, y);
            masked.cell.geo = GeoType::Glass;
            masked.included = !masked.included;
        }
    }
    engine.move_to(Position::new(9, 9), &mut renderer);
    engine.rotate_layers(1, &mut renderer);

    engine.cancel(&mut grid, &mut renderer, &mut history);
    assert_eq!(grid, before);
    assert!(renderer.overlay.is_none());
    assert_eq!(history.pushed, 1);
}

#[test]
fn moving_tile_keeps_bodies_attached_to_head() {
    let tiles = catalog();
    let pipe = tiles.find("tall_pipe").unwrap();
    let mut grid = busy_grid();

    let mut selection = SelectionModel::new();
    for layer in [1, 2] {
        selection.set_layer(layer, boxed(layer, 7, 2, 7, 4).layer(layer).cloned());
    }

    let mut engine = TransplantEngine::new(true);
    let mut renderer = RecordingRenderer::default();
    let mut history = RecordingHistory::default();
    engine.begin_move(&mut grid, &selection, &mut renderer, &mut history);
    engine.move_to(Position::new(1, 8), &mut renderer);
    engine.submit(&mut grid, &mut renderer, &mut history);

    assert_eq!(grid.get(1, Position::new(7, 2)).unwrap().tile, level_core::TileRef::None);
    let head = grid
        .resolve_tile_head(2, Position::new(1, 10))
        .expect("body on the second layer resolves");
    assert_eq!(head.layer, 1);
    assert_eq!(head.position, Position::new(1, 8));
    assert_eq!(
        grid.get(1, Position::new(1, 8)).unwrap().tile,
        level_core::TileRef::Head(pipe)
    );
}

#[test]
fn moving_without_tiles_leaves_tile_references_behind() {
    let mut grid = busy_grid();
    let selection = boxed(0, 3, 3, 4, 4);

    let mut engine = TransplantEngine::new(false);
    let mut renderer = RecordingRenderer::default();
    let mut history = RecordingHistory::default();
    engine.begin_move(&mut grid, &selection, &mut renderer, &mut history);
    assert!(grid.get(0, Position::new(4, 4)).unwrap().tile.is_head());
    assert_eq!(grid.get(0, Position::new(4, 4)).unwrap().geo, GeoType::Air);

    engine.move_to(Position::new(0, 0), &mut renderer);
    engine.submit(&mut grid, &mut renderer, &mut history);
    assert!(grid.get(0, Position::new(1, 1)).unwrap().tile.is_none());
    assert!(renderer.tile_heads.is_empty());
}
