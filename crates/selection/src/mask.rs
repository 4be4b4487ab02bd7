//! Per-layer selection masks.

use level_core::{Position, Rect};

/// Bounded boolean mask marking the selected cells of one layer.
///
/// Mask indices are relative to `bounds.min`, stored row-major. A selection
/// held by the [`SelectionModel`](crate::SelectionModel) always has at least
/// one selected cell; tool candidates may be empty until they are cropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerSelection {
    bounds: Rect,
    mask: Vec<bool>,
}

/// Unit-length segment on the cell-corner lattice, part of a selection outline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OutlineEdge {
    pub from: Position,
    pub to: Position,
}

impl LayerSelection {
    /// Empty mask covering `bounds`.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            mask: vec![false; bounds.area()],
        }
    }

    /// Mask with every cell of `bounds` selected.
    pub fn filled(bounds: Rect) -> Self {
        Self {
            bounds,
            mask: vec![true; bounds.area()],
        }
    }

    pub fn from_mask(bounds: Rect, mask: Vec<bool>) -> Self {
        assert_eq!(mask.len(), bounds.area(), "mask size must match its bounds");
        Self { bounds, mask }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn min(&self) -> Position {
        self.bounds.min
    }

    pub fn max(&self) -> Position {
        self.bounds.max
    }

    pub fn width(&self) -> usize {
        self.bounds.width()
    }

    pub fn height(&self) -> usize {
        self.bounds.height()
    }

    fn local_index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width() && y < self.height());
        y * self.width() + x
    }

    pub fn get_local(&self, x: usize, y: usize) -> bool {
        self.mask[self.local_index(x, y)]
    }

    pub fn set_local(&mut self, x: usize, y: usize, selected: bool) {
        let index = self.local_index(x, y);
        self.mask[index] = selected;
    }

    /// Looks up a grid position; anything outside the bounds is unselected.
    pub fn contains(&self, position: Position) -> bool {
        if !self.bounds.contains(position) {
            return false;
        }
        let local = position - self.bounds.min;
        self.get_local(local.x as usize, local.y as usize)
    }

    /// Selects or deselects a grid position inside the bounds.
    pub fn set(&mut self, position: Position, selected: bool) {
        debug_assert!(self.bounds.contains(position), "{position} outside selection bounds");
        let local = position - self.bounds.min;
        self.set_local(local.x as usize, local.y as usize, selected);
    }

    /// Moves the bounds so the minimum corner lands on `min`; the mask is unchanged.
    pub fn move_to(&mut self, min: Position) {
        self.bounds = self.bounds.translated(min - self.bounds.min);
    }

    pub fn translate(&mut self, offset: Position) {
        self.bounds = self.bounds.translated(offset);
    }

    pub fn count(&self) -> usize {
        self.mask.iter().filter(|selected| **selected).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.mask.iter().any(|selected| *selected)
    }

    /// Iterates the selected grid positions in row-major order.
    pub fn selected(&self) -> impl Iterator<Item = Position> + '_ {
        self.bounds
            .positions()
            .zip(self.mask.iter())
            .filter_map(|(position, selected)| selected.then_some(position))
    }

    /// Shrinks the bounds to the tight box around the selected cells.
    ///
    /// Returns `None` when nothing is selected.
    pub fn crop(&self) -> Option<LayerSelection> {
        let mut selected = self.selected();
        let first = selected.next()?;
        let tight = selected.fold(Rect::from_corners(first, first), |rect, position| {
            rect.union(&Rect::from_corners(position, position))
        });

        if tight == self.bounds {
            return Some(self.clone());
        }

        let mut cropped = LayerSelection::new(tight);
        for position in tight.positions() {
            if self.contains(position) {
                cropped.set(position, true);
            }
        }
        Some(cropped)
    }

    /// Boundary segments between selected and unselected cells.
    pub fn outline(&self) -> Vec<OutlineEdge> {
        let mut edges = Vec::new();
        for cell in self.selected() {
            let (x, y) = (cell.x, cell.y);
            if !self.contains(Position::new(x - 1, y)) {
                edges.push(OutlineEdge {
                    from: Position::new(x, y),
                    to: Position::new(x, y + 1),
                });
            }
            if !self.contains(Position::new(x + 1, y)) {
                edges.push(OutlineEdge {
                    from: Position::new(x + 1, y),
                    to: Position::new(x + 1, y + 1),
                });
            }
            if !self.contains(Position::new(x, y - 1)) {
                edges.push(OutlineEdge {
                    from: Position::new(x, y),
                    to: Position::new(x + 1, y),
                });
            }
            if !self.contains(Position::new(x, y + 1)) {
                edges.push(OutlineEdge {
                    from: Position::new(x, y + 1),
                    to: Position::new(x + 1, y + 1),
                });
            }
        }
        edges
    }
}
