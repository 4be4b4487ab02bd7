use level_core::Position;

use crate::model::{LayerCandidates, LayerMask};
use crate::raster::rasterize_polygon;

/// Freehand lasso: accumulates a polyline, closed implicitly on release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LassoDrag {
    points: Vec<Position>,
}

impl LassoDrag {
    pub fn new(start: Position) -> Self {
        Self {
            points: vec![start],
        }
    }

    /// Appends the sample unless the pointer is still on the last point.
    pub fn sample(&mut self, position: Position) {
        if self.points.last() != Some(&position) {
            self.points.push(position);
        }
    }

    pub fn points(&self) -> &[Position] {
        &self.points
    }

    pub fn candidate(&self, layer_mask: &LayerMask) -> Option<LayerCandidates> {
        let selection = rasterize_polygon(&self.points)?;
        Some(layer_mask.map(|targeted| targeted.then(|| selection.clone())))
    }
}
