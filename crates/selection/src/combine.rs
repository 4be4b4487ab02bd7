//! Set operators merging a tool candidate into the current selection.

use tracing::debug;

use crate::mask::LayerSelection;
use crate::model::{LayerCandidates, SelectionModel};

/// How a tool's candidate combines with the existing selection.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SelectionOperator {
    #[default]
    Replace,
    Add,
    Subtract,
    Intersect,
}

impl SelectionOperator {
    /// Operators under which a failed or empty tool result clears the
    /// targeted layers instead of leaving them untouched.
    pub const fn clears_on_empty(self) -> bool {
        matches!(self, SelectionOperator::Replace | SelectionOperator::Intersect)
    }
}

/// Combines one layer's existing selection with a candidate.
///
/// The result is not cropped; it may contain no selected cells.
pub fn combine(
    existing: Option<&LayerSelection>,
    candidate: &LayerSelection,
    operator: SelectionOperator,
) -> Option<LayerSelection> {
    match (operator, existing) {
        (SelectionOperator::Replace, _) | (SelectionOperator::Add, None) => {
            Some(candidate.clone())
        }
        (SelectionOperator::Add, Some(existing)) => {
            let bounds = existing.bounds().union(&candidate.bounds());
            let mut merged = LayerSelection::new(bounds);
            for position in existing.selected().chain(candidate.selected()) {
                merged.set(position, true);
            }
            Some(merged)
        }
        (SelectionOperator::Subtract | SelectionOperator::Intersect, None) => None,
        (SelectionOperator::Subtract, Some(existing)) => {
            let mut remaining = existing.clone();
            for position in candidate.selected() {
                if remaining.bounds().contains(position) {
                    remaining.set(position, false);
                }
            }
            Some(remaining)
        }
        (SelectionOperator::Intersect, Some(existing)) => {
            let overlap = existing.bounds().intersection(&candidate.bounds())?;
            let mut common = LayerSelection::new(overlap);
            for position in overlap.positions() {
                if existing.contains(position) && candidate.contains(position) {
                    common.set(position, true);
                }
            }
            Some(common)
        }
    }
}

impl SelectionModel {
    /// Merges per-layer candidates under `operator`, then crops every layer.
    ///
    /// Layers without a candidate keep their current selection.
    pub fn combine(&mut self, candidates: &LayerCandidates, operator: SelectionOperator) {
        for (layer, candidate) in candidates.iter().enumerate() {
            let Some(candidate) = candidate else {
                continue;
            };

            let slot = &mut self.layers_mut()[layer];
            *slot = combine(slot.as_ref(), candidate, operator);
            debug!(
                layer,
                %operator,
                selected = slot.as_ref().map_or(0, LayerSelection::count),
                "combined selection candidate"
            );
        }
        self.crop();
    }
}
