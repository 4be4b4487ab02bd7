use level_core::{CellGrid, ChangeHistory, Position, RenderSink, SelectionConfig};

use crate::model::{LayerMask, SelectionModel};
use crate::transplant::TransplantEngine;

const LAYERS: usize = SelectionConfig::LAYER_COUNT;

/// Drags the selection outline of the targeted layers; grid data stays put.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionMoveDrag {
    /// Pointer offset from each targeted layer's selection minimum.
    offsets: [Option<Position>; LAYERS],
}

impl SelectionMoveDrag {
    pub fn begin(start: Position, selection: &SelectionModel, layer_mask: &LayerMask) -> Self {
        let mut offsets = [None; LAYERS];
        for (layer, offset) in offsets.iter_mut().enumerate() {
            if !layer_mask[layer] {
                continue;
            }
            *offset = selection.layer(layer).map(|sel| start - sel.min());
        }
        Self { offsets }
    }

    pub fn sample(&self, position: Position, selection: &mut SelectionModel) {
        for (layer, offset) in self.offsets.iter().enumerate() {
            let (Some(offset), Some(sel)) = (offset, selection.layer_mut(layer)) else {
                continue;
            };
            sel.move_to(position - *offset);
        }
    }
}

/// Drags the selected cells themselves, detaching them into the transplant
/// overlay on the first sample if they are not floating already.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedMoveDrag {
    /// Pointer offset from the overlay origin.
    grab: Position,
    /// Each layer selection's minimum relative to the overlay origin.
    layer_offsets: [Option<Position>; LAYERS],
}

impl SelectedMoveDrag {
    /// Starts the drag, beginning a move when none is active. Returns `None`
    /// when there is nothing to move.
    pub fn begin(
        start: Position,
        selection: &SelectionModel,
        transplant: &mut TransplantEngine,
        grid: &mut dyn CellGrid,
        renderer: &mut dyn RenderSink,
        history: &mut dyn ChangeHistory,
    ) -> Option<Self> {
        if !transplant.is_active() && !transplant.begin_move(grid, selection, renderer, history) {
            return None;
        }
        let origin = transplant.overlay()?.origin();

        let mut layer_offsets = [None; LAYERS];
        for (layer, offset) in layer_offsets.iter_mut().enumerate() {
            *offset = selection.layer(layer).map(|sel| sel.min() - origin);
        }
        Some(Self {
            grab: start - origin,
            layer_offsets,
        })
    }

    pub fn sample(
        &self,
        position: Position,
        selection: &mut SelectionModel,
        transplant: &mut TransplantEngine,
        renderer: &mut dyn RenderSink,
    ) {
        let origin = position - self.grab;
        transplant.move_to(origin, renderer);
        for (layer, offset) in self.layer_offsets.iter().enumerate() {
            let (Some(offset), Some(sel)) = (offset, selection.layer_mut(layer)) else {
                continue;
            };
            sel.move_to(origin + *offset);
        }
    }
}
