//! Geometry transplantation: lifting selected cells off the grid into a
//! floating buffer and writing them back at a new location.

use level_core::{
    Cell, CellGrid, ChangeHistory, GeoType, MaskedCell, Position, Rect, RenderSink, SelectionConfig,
    TileRef,
};
use tracing::{debug, info, warn};

use crate::mask::LayerSelection;
use crate::model::SelectionModel;

const LAYERS: usize = SelectionConfig::LAYER_COUNT;

/// Rectangular block of masked cells spanning every layer.
///
/// Cells are stored layer-major, then row-major: `(layer * height + y) *
/// width + x`, the same layout the renderer overlay expects. Body tile
/// references inside the buffer are rooted relative to `origin`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellBuffer {
    origin: Position,
    width: usize,
    height: usize,
    cells: Vec<MaskedCell>,
}

impl CellBuffer {
    /// Buffer of excluded empty cells.
    pub fn new(origin: Position, width: usize, height: usize) -> Self {
        Self {
            origin,
            width,
            height,
            cells: vec![MaskedCell::default(); LAYERS * width * height],
        }
    }

    /// Wraps pre-laid-out cells. Panics when the length does not match.
    pub fn from_cells(origin: Position, width: usize, height: usize, cells: Vec<MaskedCell>) -> Self {
        assert_eq!(
            cells.len(),
            LAYERS * width * height,
            "cell buffer length must match its dimensions"
        );
        Self {
            origin,
            width,
            height,
            cells,
        }
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Position) {
        self.origin = origin;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.width, self.height)
    }

    pub fn cells(&self) -> &[MaskedCell] {
        &self.cells
    }

    fn index(&self, layer: usize, x: usize, y: usize) -> usize {
        debug_assert!(layer < LAYERS && x < self.width && y < self.height);
        (layer * self.height + y) * self.width + x
    }

    pub fn get(&self, layer: usize, x: usize, y: usize) -> &MaskedCell {
        &self.cells[self.index(layer, x, y)]
    }

    pub fn get_mut(&mut self, layer: usize, x: usize, y: usize) -> &mut MaskedCell {
        let index = self.index(layer, x, y);
        &mut self.cells[index]
    }

    /// Number of included cells across all layers.
    pub fn included_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.included).count()
    }

    /// Inclusion mask of one layer, placed at the buffer origin and cropped.
    pub fn layer_selection(&self, layer: usize) -> Option<LayerSelection> {
        let start = layer * self.width * self.height;
        let mask = self.cells[start..start + self.width * self.height]
            .iter()
            .map(|cell| cell.included)
            .collect();
        LayerSelection::from_mask(self.bounds(), mask).crop()
    }

    /// Moves layer blocks the same way [`SelectionModel::rotate_layers`]
    /// moves selections. Body references follow their root's layer.
    pub fn rotate_layers(&mut self, direction: i32) {
        let plane = self.width * self.height;
        let remap: fn(usize) -> usize = if direction > 0 {
            self.cells.rotate_right(plane);
            |layer| (layer + 1) % LAYERS
        } else if direction < 0 {
            self.cells.rotate_left(plane);
            |layer| (layer + LAYERS - 1) % LAYERS
        } else {
            return;
        };

        for masked in &mut self.cells {
            if let TileRef::Body { layer, .. } = &mut masked.cell.tile {
                *layer = remap(*layer);
            }
        }
    }

    /// Masked positions in grid coordinates, layer by layer.
    fn iter_included(&self) -> impl Iterator<Item = (usize, Position, &MaskedCell)> + '_ {
        (0..LAYERS).flat_map(move |layer| {
            (0..self.height).flat_map(move |y| {
                (0..self.width).filter_map(move |x| {
                    let masked = self.get(layer, x, y);
                    masked.included.then(|| {
                        let position = self.origin + Position::new(x as i32, y as i32);
                        (layer, position, masked)
                    })
                })
            })
        })
    }
}

/// Copies every cell of the selection's union bounds into a buffer.
///
/// A cell is included when its layer's selection contains it. Tile heads and
/// bodies whose head is inside the buffer and itself selected keep their
/// tile reference; body roots are rebased to buffer-local coordinates. Any
/// other tile reference is stripped from the copy. Positions outside the grid
/// stay excluded.
pub fn extract(grid: &dyn CellGrid, selection: &SelectionModel) -> Option<CellBuffer> {
    let bounds = selection.union_bounds()?;
    let mut buffer = CellBuffer::new(bounds.min, bounds.width(), bounds.height());

    for layer in 0..LAYERS {
        for position in bounds.positions() {
            let Some(mut cell) = grid.get(layer, position) else {
                continue;
            };
            cell.tile = rebase_tile(cell.tile, bounds, selection);
            let local = position - bounds.min;
            *buffer.get_mut(layer, local.x as usize, local.y as usize) =
                MaskedCell::new(selection.contains(layer, position), cell);
        }
    }

    Some(buffer)
}

fn rebase_tile(tile: TileRef, bounds: Rect, selection: &SelectionModel) -> TileRef {
    match tile {
        TileRef::Body { root, layer }
            if bounds.contains(root) && selection.contains(layer, root) =>
        {
            TileRef::Body {
                root: root - bounds.min,
                layer,
            }
        }
        TileRef::Body { .. } => TileRef::None,
        other => other,
    }
}

/// Clears every selected in-bounds cell, invalidating the renderer as it goes.
/// Tile references are cleared only when `affect_tiles` is set.
pub fn erase(
    grid: &mut dyn CellGrid,
    selection: &SelectionModel,
    affect_tiles: bool,
    renderer: &mut dyn RenderSink,
) {
    for layer in 0..LAYERS {
        let Some(layer_selection) = selection.layer(layer) else {
            continue;
        };
        for position in layer_selection.selected() {
            let Some(mut cell) = grid.get(layer, position) else {
                continue;
            };
            if affect_tiles && cell.tile.is_head() {
                renderer.invalidate_tile_head(position, layer);
            }
            cell.clear(affect_tiles);
            write_cell(grid, layer, position, cell);
            renderer.invalidate_geometry(position, layer);
        }
    }
}

fn write_cell(grid: &mut dyn CellGrid, layer: usize, position: Position, cell: Cell) {
    if let Err(error) = grid.set(layer, position, cell) {
        warn!(%error, layer, %position, "dropped cell write");
    }
}

/// Owner of the floating overlay and its cancel snapshot.
///
/// While a move is active the extracted cells live only in the overlay; the
/// source region in the grid has already been erased. Submitting writes the
/// overlay back at its current origin, cancelling restores the snapshot.
#[derive(Clone, Debug, Default)]
pub struct TransplantEngine {
    affect_tiles: bool,
    moving: Option<CellBuffer>,
    cancel: Option<CellBuffer>,
}

impl TransplantEngine {
    pub fn new(affect_tiles: bool) -> Self {
        Self {
            affect_tiles,
            moving: None,
            cancel: None,
        }
    }

    pub fn affect_tiles(&self) -> bool {
        self.affect_tiles
    }

    pub fn set_affect_tiles(&mut self, affect_tiles: bool) {
        self.affect_tiles = affect_tiles;
    }

    /// True while an overlay is floating above the grid.
    pub fn is_active(&self) -> bool {
        self.moving.is_some()
    }

    pub fn overlay(&self) -> Option<&CellBuffer> {
        self.moving.as_ref()
    }

    pub fn overlay_mut(&mut self) -> Option<&mut CellBuffer> {
        self.moving.as_mut()
    }

    pub fn has_cancel_snapshot(&self) -> bool {
        self.cancel.is_some()
    }

    /// Copies the selection into a new buffer, clearing the source cells
    /// when `erase_source` is set. The engine's overlay is not touched.
    pub fn extract(
        &self,
        grid: &mut dyn CellGrid,
        selection: &SelectionModel,
        erase_source: bool,
        renderer: &mut dyn RenderSink,
    ) -> Option<CellBuffer> {
        let buffer = extract(&*grid, selection)?;
        if erase_source {
            erase(grid, selection, self.affect_tiles, renderer);
        }
        Some(buffer)
    }

    /// Lifts the selection off the grid into the overlay.
    ///
    /// Opens a history change, snapshots the selection's bounding box
    /// verbatim for cancellation, then extracts with erasure. Returns false (and touches
    /// nothing) when there is no selection. Panics when a move is already
    /// active.
    pub fn begin_move(
        &mut self,
        grid: &mut dyn CellGrid,
        selection: &SelectionModel,
        renderer: &mut dyn RenderSink,
        history: &mut dyn ChangeHistory,
    ) -> bool {
        assert!(!self.is_active(), "begin_move called while a move is active");

        let Some(bounds) = selection.union_bounds() else {
            return false;
        };
        history.begin_change();
        self.cancel = Some(snapshot(grid, selection, bounds));
        let Some(overlay) = self.extract(grid, selection, true, renderer) else {
            return false;
        };

        info!(
            origin = %overlay.origin(),
            width = overlay.width(),
            height = overlay.height(),
            cells = overlay.included_count(),
            "began geometry move"
        );
        renderer.set_overlay(overlay.origin(), overlay.width(), overlay.height(), overlay.cells());
        self.moving = Some(overlay);
        true
    }

    /// Installs decoded clipboard data as the overlay. Pastes carry no cancel
    /// snapshot: cancelling one simply discards it.
    pub fn install(
        &mut self,
        buffer: CellBuffer,
        renderer: &mut dyn RenderSink,
        history: &mut dyn ChangeHistory,
    ) {
        assert!(!self.is_active(), "install called while a move is active");

        history.begin_change();
        renderer.set_overlay(buffer.origin(), buffer.width(), buffer.height(), buffer.cells());
        self.cancel = None;
        self.moving = Some(buffer);
    }

    /// Repositions the overlay. No-op when nothing is moving.
    pub fn move_to(&mut self, origin: Position, renderer: &mut dyn RenderSink) {
        if let Some(overlay) = self.moving.as_mut() {
            overlay.set_origin(origin);
            renderer.move_overlay(origin);
        }
    }

    /// Rotates the overlay's layers and republishes it.
    pub fn rotate_layers(&mut self, direction: i32, renderer: &mut dyn RenderSink) {
        if let Some(overlay) = self.moving.as_mut() {
            overlay.rotate_layers(direction);
            renderer.set_overlay(overlay.origin(), overlay.width(), overlay.height(), overlay.cells());
        }
    }

    /// Writes the overlay into the grid at its current origin and closes the
    /// history change. No-op when nothing is moving.
    ///
    /// Included cells outside the grid are dropped. Geometry, objects and
    /// material always overwrite the destination. With tiles affected, a
    /// head stays a head, a body root is translated back to grid
    /// coordinates, and a cell without a tile leaves the destination's tile
    /// reference alone.
    pub fn submit(
        &mut self,
        grid: &mut dyn CellGrid,
        renderer: &mut dyn RenderSink,
        history: &mut dyn ChangeHistory,
    ) {
        let Some(overlay) = self.moving.take() else {
            return;
        };
        self.cancel = None;

        let mut written = 0usize;
        for (layer, position, masked) in overlay.iter_included() {
            let Some(mut dest) = grid.get(layer, position) else {
                continue;
            };
            let src = masked.cell;
            dest.geo = src.geo;
            dest.objects = src.objects;
            dest.material = src.material;

            if self.affect_tiles {
                match src.tile {
                    TileRef::Head(id) => {
                        dest.tile = TileRef::Head(id);
                        renderer.invalidate_tile_head(position, layer);
                    }
                    TileRef::Body {
                        root,
                        layer: root_layer,
                    } => {
                        dest.tile = TileRef::Body {
                            root: root + overlay.origin(),
                            layer: root_layer,
                        };
                    }
                    TileRef::None => {}
                }
            }

            write_cell(grid, layer, position, dest);
            renderer.invalidate_geometry(position, layer);
            written += 1;
        }

        info!(origin = %overlay.origin(), written, "submitted geometry move");
        renderer.clear_overlay();
        history.push_change();
    }

    /// Discards the overlay and restores the cells captured when the move
    /// began, verbatim at their original positions. No-op when nothing is
    /// moving.
    pub fn cancel(
        &mut self,
        grid: &mut dyn CellGrid,
        renderer: &mut dyn RenderSink,
        history: &mut dyn ChangeHistory,
    ) {
        if self.moving.take().is_none() {
            return;
        }
        renderer.clear_overlay();

        if let Some(snapshot) = self.cancel.take() {
            for (layer, position, masked) in snapshot.iter_included() {
                if !grid.in_bounds(position) {
                    continue;
                }
                write_cell(grid, layer, position, masked.cell);
                renderer.invalidate_geometry(position, layer);
                renderer.invalidate_tile_head(position, layer);
            }
            debug!(origin = %snapshot.origin(), "restored cancel snapshot");
        }

        info!("cancelled geometry move");
        history.push_change();
    }

    /// Replaces the overlay without touching the grid. Used when an undo
    /// step restores a captured session state.
    pub(crate) fn restore_overlay(&mut self, overlay: Option<CellBuffer>, renderer: &mut dyn RenderSink) {
        match &overlay {
            Some(buffer) => {
                renderer.set_overlay(buffer.origin(), buffer.width(), buffer.height(), buffer.cells())
            }
            None => {
                renderer.clear_overlay();
                self.cancel = None;
            }
        }
        self.moving = overlay;
    }
}

/// Verbatim copy of every cell in `bounds`, flagged with its selection
/// state. No tile rebasing.
fn snapshot(grid: &dyn CellGrid, selection: &SelectionModel, bounds: Rect) -> CellBuffer {
    let mut buffer = CellBuffer::new(bounds.min, bounds.width(), bounds.height());
    for layer in 0..LAYERS {
        for position in bounds.positions() {
            let Some(cell) = grid.get(layer, position) else {
                continue;
            };
            let local = position - bounds.min;
            *buffer.get_mut(layer, local.x as usize, local.y as usize) =
                MaskedCell::new(selection.contains(layer, position), cell);
        }
    }
    buffer
}

/// Sets the geometry of every selected in-bounds cell to `geo`, leaving
/// objects, material and tiles alone.
pub fn fill(
    grid: &mut dyn CellGrid,
    selection: &SelectionModel,
    geo: GeoType,
    renderer: &mut dyn RenderSink,
) -> usize {
    let mut filled = 0;
    for layer in 0..LAYERS {
        let Some(layer_selection) = selection.layer(layer) else {
            continue;
        };
        for position in layer_selection.selected() {
            let Some(mut cell) = grid.get(layer, position) else {
                continue;
            };
            cell.geo = geo;
            write_cell(grid, layer, position, cell);
            renderer.invalidate_geometry(position, layer);
            filled += 1;
        }
    }
    filled
}
