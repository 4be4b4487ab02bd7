//! Bounds-checked access to the three-layer cell grid.

use crate::cell::{Cell, TileId, TileRef};
use crate::config::SelectionConfig;
use crate::env::TileDef;
use crate::error::{EditorError, ErrorSeverity};
use crate::geometry::{Position, Rect};

/// Location of a tile head: the layer it lives on and its grid position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileHeadPos {
    pub layer: usize,
    pub position: Position,
}

/// Index-addressed grid accessor consumed by the selection engine.
///
/// Cells are always read and written by value through `get`/`set`; callers
/// never hold references into the grid across a mutation.
pub trait CellGrid {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    fn get(&self, layer: usize, position: Position) -> Option<Cell>;
    fn set(&mut self, layer: usize, position: Position, cell: Cell) -> Result<(), GridError>;

    fn in_bounds(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as usize) < self.width()
            && (position.y as usize) < self.height()
    }

    /// Resolves the cell at `position` to the head of the tile it belongs to.
    ///
    /// Returns `None` for cells without a tile and for detached bodies whose
    /// root does not hold a head.
    fn resolve_tile_head(&self, layer: usize, position: Position) -> Option<TileHeadPos> {
        let cell = self.get(layer, position)?;
        match cell.tile {
            TileRef::None => None,
            TileRef::Head(_) => Some(TileHeadPos { layer, position }),
            TileRef::Body {
                root,
                layer: root_layer,
            } => {
                let head = self.get(root_layer, root)?;
                head.tile.is_head().then_some(TileHeadPos {
                    layer: root_layer,
                    position: root,
                })
            }
        }
    }
}

/// Errors raised by grid writes.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("position {position} is out of bounds (grid size: {width}x{height})")]
    OutOfBounds {
        position: Position,
        width: usize,
        height: usize,
    },

    #[error("layer {layer} does not exist (layer count: {count})")]
    InvalidLayer { layer: usize, count: usize },
}

impl EditorError for GridError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            GridError::OutOfBounds { .. } => "GRID_OUT_OF_BOUNDS",
            GridError::InvalidLayer { .. } => "GRID_INVALID_LAYER",
        }
    }
}

/// Dense in-memory grid of `LAYER_COUNT` layers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl LevelGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Cell::EMPTY)
    }

    pub fn filled(width: usize, height: usize, cell: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![cell; SelectionConfig::LAYER_COUNT * width * height],
        }
    }

    pub fn bounds(&self) -> Option<Rect> {
        (self.width > 0 && self.height > 0)
            .then(|| Rect::from_origin_size(Position::ORIGIN, self.width, self.height))
    }

    fn index(&self, layer: usize, position: Position) -> Option<usize> {
        if layer >= SelectionConfig::LAYER_COUNT || !self.in_bounds(position) {
            return None;
        }
        let (x, y) = (position.x as usize, position.y as usize);
        Some((layer * self.height + y) * self.width + x)
    }

    fn check(&self, layer: usize, position: Position) -> Result<usize, GridError> {
        if layer >= SelectionConfig::LAYER_COUNT {
            return Err(GridError::InvalidLayer {
                layer,
                count: SelectionConfig::LAYER_COUNT,
            });
        }
        self.index(layer, position).ok_or(GridError::OutOfBounds {
            position,
            width: self.width,
            height: self.height,
        })
    }

    /// Places a tile so that its head sits at `head` on `layer`.
    ///
    /// Every other cell of the `width x height` footprint becomes a body
    /// pointing at the head; tiles with a second layer also claim the same
    /// footprint on `layer + 1`. Geometry is left as is. Fails without
    /// writing anything when any part of the footprint is outside the grid.
    pub fn place_tile(
        &mut self,
        layer: usize,
        head: Position,
        id: TileId,
        def: &TileDef,
    ) -> Result<(), GridError> {
        let footprint = def.footprint(head);
        let second_layer = def.has_second_layer && layer + 1 < SelectionConfig::LAYER_COUNT;

        self.check(layer, head)?;
        for position in footprint.positions() {
            self.check(layer, position)?;
        }

        for position in footprint.positions() {
            let index = self.check(layer, position)?;
            self.cells[index].tile = if position == head {
                TileRef::Head(id)
            } else {
                TileRef::Body { root: head, layer }
            };

            if second_layer {
                let index = self.check(layer + 1, position)?;
                self.cells[index].tile = TileRef::Body { root: head, layer };
            }
        }
        Ok(())
    }
}

impl CellGrid for LevelGrid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn get(&self, layer: usize, position: Position) -> Option<Cell> {
        self.index(layer, position).map(|index| self.cells[index])
    }

    fn set(&mut self, layer: usize, position: Position, cell: Cell) -> Result<(), GridError> {
        let index = self.check(layer, position)?;
        self.cells[index] = cell;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::GeoType;

    fn two_by_two() -> TileDef {
        TileDef::new("Big Block", 2, 2, Position::new(1, 1))
    }

    #[test]
    fn get_and_set_are_bounds_checked() {
        let mut grid = LevelGrid::new(4, 3);
        let solid = Cell::with_geo(GeoType::Solid);

        grid.set(2, Position::new(3, 2), solid).unwrap();
        assert_eq!(grid.get(2, Position::new(3, 2)), Some(solid));
        assert_eq!(grid.get(3, Position::new(0, 0)), None);
        assert_eq!(grid.get(0, Position::new(4, 0)), None);
        assert_eq!(grid.get(0, Position::new(-1, 0)), None);

        assert!(matches!(
            grid.set(0, Position::new(0, 3), solid),
            Err(GridError::OutOfBounds { .. })
        ));
        assert!(matches!(
            grid.set(5, Position::new(0, 0), solid),
            Err(GridError::InvalidLayer { layer: 5, .. })
        ));
    }

    #[test]
    fn place_tile_writes_head_and_bodies() {
        let mut grid = LevelGrid::new(8, 8);
        let head = Position::new(4, 4);
        grid.place_tile(0, head, TileId(1), &two_by_two()).unwrap();

        assert_eq!(grid.get(0, head).unwrap().tile, TileRef::Head(TileId(1)));
        for position in [Position::new(3, 3), Position::new(4, 3), Position::new(3, 4)] {
            assert_eq!(
                grid.get(0, position).unwrap().tile,
                TileRef::Body {
                    root: head,
                    layer: 0
                }
            );
        }
        assert!(grid.get(1, head).unwrap().tile.is_none());
    }

    #[test]
    fn place_tile_claims_second_layer() {
        let mut grid = LevelGrid::new(8, 8);
        let def = two_by_two().with_second_layer(true);
        grid.place_tile(1, Position::new(2, 2), TileId(0), &def).unwrap();

        let below = grid.get(2, Position::new(2, 2)).unwrap();
        assert_eq!(
            below.tile,
            TileRef::Body {
                root: Position::new(2, 2),
                layer: 1
            }
        );
    }

    #[test]
    fn place_tile_outside_grid_writes_nothing() {
        let mut grid = LevelGrid::new(4, 4);
        let before = grid.clone();
        let result = grid.place_tile(0, Position::new(0, 0), TileId(0), &two_by_two());
        assert!(matches!(result, Err(GridError::OutOfBounds { .. })));
        assert_eq!(grid, before);
    }

    #[test]
    fn resolve_tile_head_follows_bodies() {
        let mut grid = LevelGrid::new(8, 8);
        let head = Position::new(4, 4);
        grid.place_tile(0, head, TileId(1), &two_by_two()).unwrap();

        let expected = Some(TileHeadPos {
            layer: 0,
            position: head,
        });
        assert_eq!(grid.resolve_tile_head(0, head), expected);
        assert_eq!(grid.resolve_tile_head(0, Position::new(3, 3)), expected);
        assert_eq!(grid.resolve_tile_head(0, Position::new(0, 0)), None);
    }

    #[test]
    fn detached_body_does_not_resolve() {
        let mut grid = LevelGrid::new(8, 8);
        let head = Position::new(4, 4);
        grid.place_tile(0, head, TileId(1), &two_by_two()).unwrap();
        grid.set(0, head, Cell::EMPTY).unwrap();

        assert_eq!(grid.resolve_tile_head(0, Position::new(3, 3)), None);
    }
}
