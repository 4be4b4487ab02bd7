//! The current selection: one optional mask per grid layer.

use level_core::{Position, Rect, SelectionConfig};

use crate::mask::LayerSelection;

const LAYERS: usize = SelectionConfig::LAYER_COUNT;

/// Which layers an interaction targets.
pub type LayerMask = [bool; LAYERS];

/// Per-layer tool output, before it is merged into the model.
pub type LayerCandidates = [Option<LayerSelection>; LAYERS];

/// Currently selected cells, tracked independently per layer.
///
/// Invariant: every present layer selection contains at least one selected
/// cell inside tight bounds. Anything that could leave a layer empty goes
/// through [`SelectionModel::crop`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionModel {
    layers: [Option<LayerSelection>; LAYERS],
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(&self, layer: usize) -> Option<&LayerSelection> {
        self.layers.get(layer).and_then(Option::as_ref)
    }

    pub fn layer_mut(&mut self, layer: usize) -> Option<&mut LayerSelection> {
        self.layers.get_mut(layer).and_then(Option::as_mut)
    }

    pub fn layers(&self) -> &[Option<LayerSelection>; LAYERS] {
        &self.layers
    }

    /// Replaces a layer's selection. Empty selections are stored as absent.
    pub fn set_layer(&mut self, layer: usize, selection: Option<LayerSelection>) {
        self.layers[layer] = selection.and_then(|selection| selection.crop());
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [Option<LayerSelection>; LAYERS] {
        &mut self.layers
    }

    /// True when any layer has a selection.
    pub fn is_active(&self) -> bool {
        self.layers.iter().any(Option::is_some)
    }

    pub fn clear(&mut self) {
        self.layers = Default::default();
    }

    /// Clears only the layers flagged in `mask`.
    pub fn clear_layers(&mut self, mask: &LayerMask) {
        for (slot, targeted) in self.layers.iter_mut().zip(mask) {
            if *targeted {
                *slot = None;
            }
        }
    }

    /// Whether `position` is selected on `layer`.
    pub fn contains(&self, layer: usize, position: Position) -> bool {
        self.layer(layer)
            .is_some_and(|selection| selection.contains(position))
    }

    /// Bounding box over every present layer.
    pub fn union_bounds(&self) -> Option<Rect> {
        self.layers
            .iter()
            .flatten()
            .map(LayerSelection::bounds)
            .reduce(|acc, bounds| acc.union(&bounds))
    }

    /// Recomputes tight bounds on every layer; layers without selected cells
    /// become absent.
    pub fn crop(&mut self) {
        for slot in self.layers.iter_mut() {
            *slot = slot.take().and_then(|selection| selection.crop());
        }
    }

    /// Shifts every layer selection by `offset`.
    pub fn translate(&mut self, offset: Position) {
        for selection in self.layers.iter_mut().flatten() {
            selection.translate(offset);
        }
    }

    /// Rotates selections between layers.
    ///
    /// A positive direction moves every selection one layer back (the last
    /// layer wraps to the front); a negative direction moves them forward.
    pub fn rotate_layers(&mut self, direction: i32) {
        if direction > 0 {
            self.layers.rotate_right(1);
        } else if direction < 0 {
            self.layers.rotate_left(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(x0: i32, y0: i32, x1: i32, y1: i32) -> LayerSelection {
        LayerSelection::filled(Rect::from_corners(Position::new(x0, y0), Position::new(x1, y1)))
    }

    #[test]
    fn empty_layer_is_stored_as_absent() {
        let mut model = SelectionModel::new();
        let empty = LayerSelection::new(Rect::from_corners(Position::ORIGIN, Position::new(2, 2)));
        model.set_layer(1, Some(empty));
        assert!(model.layer(1).is_none());
        assert!(!model.is_active());
    }

    #[test]
    fn union_bounds_spans_layers() {
        let mut model = SelectionModel::new();
        model.set_layer(0, Some(filled(0, 0, 1, 1)));
        model.set_layer(2, Some(filled(5, -2, 6, 0)));

        let bounds = model.union_bounds().unwrap();
        assert_eq!(bounds.min, Position::new(0, -2));
        assert_eq!(bounds.max, Position::new(6, 1));
    }

    #[test]
    fn clear_layers_respects_mask() {
        let mut model = SelectionModel::new();
        for layer in 0..3 {
            model.set_layer(layer, Some(filled(0, 0, 1, 1)));
        }
        model.clear_layers(&[true, false, true]);
        assert!(model.layer(0).is_none());
        assert!(model.layer(1).is_some());
        assert!(model.layer(2).is_none());
    }

    #[test]
    fn rotate_layers_wraps() {
        let mut model = SelectionModel::new();
        model.set_layer(2, Some(filled(3, 3, 3, 3)));

        model.rotate_layers(1);
        assert!(model.layer(0).is_some());
        assert!(model.layer(2).is_none());

        model.rotate_layers(-1);
        assert!(model.layer(2).is_some());
        assert!(model.layer(0).is_none());
    }
}
