use level_core::{Position, Rect};

use crate::mask::LayerSelection;
use crate::model::{LayerCandidates, LayerMask};

/// Rectangle drag: every cell between the drag start and the latest sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RectDrag {
    start: Position,
    end: Position,
}

impl RectDrag {
    pub fn new(start: Position) -> Self {
        Self { start, end: start }
    }

    pub fn sample(&mut self, position: Position) {
        self.end = position;
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_corners(self.start, self.end)
    }

    pub fn candidate(&self, layer_mask: &LayerMask) -> LayerCandidates {
        let selection = LayerSelection::filled(self.bounds());
        layer_mask.map(|targeted| targeted.then(|| selection.clone()))
    }
}
