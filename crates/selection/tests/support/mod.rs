//! Shared fixtures for the selection integration tests.
#![allow(dead_code)]

use level_core::{
    Cell, ChangeHistory, GeoType, LevelGrid, MaskedCell, Position, RenderSink, TileCatalog, TileDef,
};

/// Renderer double that records every notification.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub geometry: Vec<(Position, usize)>,
    pub tile_heads: Vec<(Position, usize)>,
    pub overlay: Option<(Position, usize, usize)>,
    pub overlay_moves: Vec<Position>,
    pub overlay_clears: usize,
}

impl RenderSink for RecordingRenderer {
    fn invalidate_geometry(&mut self, position: Position, layer: usize) {
        self.geometry.push((position, layer));
    }

    fn invalidate_tile_head(&mut self, position: Position, layer: usize) {
        self.tile_heads.push((position, layer));
    }

    fn set_overlay(&mut self, origin: Position, width: usize, height: usize, cells: &[MaskedCell]) {
        assert_eq!(cells.len(), 3 * width * height);
        self.overlay = Some((origin, width, height));
    }

    fn move_overlay(&mut self, origin: Position) {
        self.overlay_moves.push(origin);
        if let Some((current, ..)) = self.overlay.as_mut() {
            *current = origin;
        }
    }

    fn clear_overlay(&mut self) {
        self.overlay = None;
        self.overlay_clears += 1;
    }
}

/// History double checking that change brackets are balanced.
#[derive(Debug, Default)]
pub struct RecordingHistory {
    pub open: usize,
    pub pushed: usize,
}

impl ChangeHistory for RecordingHistory {
    fn begin_change(&mut self) {
        assert_eq!(self.open, 0, "nested change bracket");
        self.open += 1;
    }

    fn push_change(&mut self) {
        assert_eq!(self.open, 1, "push without begin");
        self.open -= 1;
        self.pushed += 1;
    }
}

pub fn solid_grid(width: usize, height: usize) -> LevelGrid {
    LevelGrid::filled(width, height, Cell::with_geo(GeoType::Solid))
}

pub fn catalog() -> TileCatalog {
    [
        TileDef::new("stone_block", 2, 2, Position::new(1, 1)),
        TileDef::new("tall_pipe", 1, 3, Position::ORIGIN).with_second_layer(true),
    ]
    .into_iter()
    .collect()
}
