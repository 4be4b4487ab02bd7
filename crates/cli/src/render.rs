//! Terminal output: counting collaborator doubles and grid dumps.

use cell_selection::SelectionModel;
use console::style;
use level_core::{
    Cell, CellGrid, ChangeHistory, GeoType, MaskedCell, Position, RenderSink, TileRef,
};
use serde::Serialize;
use tracing::trace;

/// Renderer that only counts what it is asked to redraw.
#[derive(Debug, Default, Clone, Serialize)]
pub struct CountingRenderer {
    pub geometry_invalidations: usize,
    pub tile_head_invalidations: usize,
    pub overlay_updates: usize,
    pub overlay_visible: bool,
}

impl RenderSink for CountingRenderer {
    fn invalidate_geometry(&mut self, position: Position, layer: usize) {
        trace!(%position, layer, "invalidate geometry");
        self.geometry_invalidations += 1;
    }

    fn invalidate_tile_head(&mut self, position: Position, layer: usize) {
        trace!(%position, layer, "invalidate tile head");
        self.tile_head_invalidations += 1;
    }

    fn set_overlay(&mut self, origin: Position, width: usize, height: usize, _cells: &[MaskedCell]) {
        trace!(%origin, width, height, "set overlay");
        self.overlay_updates += 1;
        self.overlay_visible = true;
    }

    fn move_overlay(&mut self, origin: Position) {
        trace!(%origin, "move overlay");
        self.overlay_updates += 1;
    }

    fn clear_overlay(&mut self) {
        self.overlay_visible = false;
    }
}

/// History that counts committed changes.
#[derive(Debug, Default, Clone, Serialize)]
pub struct CountingHistory {
    pub changes: usize,
    #[serde(skip)]
    open: bool,
}

impl ChangeHistory for CountingHistory {
    fn begin_change(&mut self) {
        debug_assert!(!self.open, "change already open");
        self.open = true;
    }

    fn push_change(&mut self) {
        debug_assert!(self.open, "no change open");
        self.open = false;
        self.changes += 1;
    }
}

fn glyph(cell: &Cell) -> char {
    match (cell.geo, cell.tile) {
        (GeoType::Air, TileRef::Head(_)) => '@',
        (GeoType::Air, TileRef::Body { .. }) => '+',
        (GeoType::Air, TileRef::None) => '.',
        (GeoType::Solid, _) => '#',
        (GeoType::SlopeRightUp | GeoType::SlopeLeftDown, _) => '/',
        (GeoType::SlopeLeftUp | GeoType::SlopeRightDown, _) => '\\',
        (GeoType::Platform, _) => '-',
        (GeoType::Glass, _) => 'o',
        (GeoType::ShortcutEntrance, _) => 'S',
    }
}

/// Draws one layer, one text row per grid row. Selected cells are shown
/// reversed when the terminal supports it.
pub fn render_layer(grid: &dyn CellGrid, layer: usize, selection: &SelectionModel) -> String {
    let mut out = String::with_capacity((grid.width() + 1) * grid.height());
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            let position = Position::new(x, y);
            let ch = grid.get(layer, position).map_or(' ', |cell| glyph(&cell));
            if selection.contains(layer, position) {
                out.push_str(&style(ch).reverse().to_string());
            } else {
                out.push(ch);
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use level_core::{LevelGrid, TileDef, TileId};

    #[test]
    fn renders_geometry_and_tiles() {
        console::set_colors_enabled(false);
        let mut grid = LevelGrid::new(4, 2);
        grid.set(0, Position::new(0, 0), Cell::with_geo(GeoType::Solid)).unwrap();
        grid.set(0, Position::new(1, 0), Cell::with_geo(GeoType::SlopeLeftUp)).unwrap();
        grid.place_tile(
            0,
            Position::new(2, 1),
            TileId(0),
            &TileDef::new("pair", 2, 1, Position::ORIGIN),
        )
        .unwrap();

        let text = render_layer(&grid, 0, &SelectionModel::new());
        assert_eq!(text, "#\\..\n..@+\n");
    }

    #[test]
    fn history_counts_brackets() {
        let mut history = CountingHistory::default();
        history.begin_change();
        history.push_change();
        assert_eq!(history.changes, 1);
    }
}
