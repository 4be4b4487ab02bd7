//! Selection tools.
//!
//! Drag tools keep their in-progress state in a [`ToolDrag`] variant; click
//! tools are plain functions producing candidates directly from the grid.

mod lasso;
mod moving;
mod rect;
mod tile;
mod wand;

pub use lasso::LassoDrag;
pub use moving::{SelectedMoveDrag, SelectionMoveDrag};
pub use rect::RectDrag;
pub use tile::tile_footprint;
pub use wand::magic_wand;

use level_core::{Position, RenderSink};

use crate::model::{LayerCandidates, LayerMask, SelectionModel};
use crate::transplant::TransplantEngine;

/// The tool the user currently has equipped.
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
pub enum SelectionTool {
    #[default]
    Rectangle,
    Lasso,
    MagicWand,
    TileFootprint,
    MoveSelection,
    MoveSelected,
}

impl SelectionTool {
    /// Tools that act on a single click rather than a drag.
    pub const fn is_click_tool(self) -> bool {
        matches!(self, SelectionTool::MagicWand | SelectionTool::TileFootprint)
    }

    /// Tools whose release merges a candidate into the selection.
    pub const fn produces_selection(self) -> bool {
        !matches!(self, SelectionTool::MoveSelection | SelectionTool::MoveSelected)
    }
}

/// In-progress drag of one of the drag tools.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToolDrag {
    Rectangle(RectDrag),
    Lasso(LassoDrag),
    MoveSelection(SelectionMoveDrag),
    MoveSelected(SelectedMoveDrag),
}

impl ToolDrag {
    pub fn tool(&self) -> SelectionTool {
        match self {
            ToolDrag::Rectangle(_) => SelectionTool::Rectangle,
            ToolDrag::Lasso(_) => SelectionTool::Lasso,
            ToolDrag::MoveSelection(_) => SelectionTool::MoveSelection,
            ToolDrag::MoveSelected(_) => SelectionTool::MoveSelected,
        }
    }

    /// Feeds one pointer sample. Move drags update the selection (and the
    /// overlay) live; selecting drags only accumulate state.
    pub fn sample(
        &mut self,
        position: Position,
        selection: &mut SelectionModel,
        transplant: &mut TransplantEngine,
        renderer: &mut dyn RenderSink,
    ) {
        match self {
            ToolDrag::Rectangle(drag) => drag.sample(position),
            ToolDrag::Lasso(drag) => drag.sample(position),
            ToolDrag::MoveSelection(drag) => drag.sample(position, selection),
            ToolDrag::MoveSelected(drag) => drag.sample(position, selection, transplant, renderer),
        }
    }

    /// Candidate selection produced on release. Move drags produce none.
    pub fn candidate(&self, layer_mask: &LayerMask) -> Option<LayerCandidates> {
        match self {
            ToolDrag::Rectangle(drag) => Some(drag.candidate(layer_mask)),
            ToolDrag::Lasso(drag) => drag.candidate(layer_mask),
            ToolDrag::MoveSelection(_) | ToolDrag::MoveSelected(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn tool_names_round_trip() {
        assert_eq!(SelectionTool::MagicWand.to_string(), "magic_wand");
        assert_eq!(
            SelectionTool::from_str("Tile_Footprint").unwrap(),
            SelectionTool::TileFootprint
        );
    }

    #[test]
    fn move_drags_produce_no_candidate() {
        let drag = ToolDrag::MoveSelection(SelectionMoveDrag::begin(
            Position::ORIGIN,
            &SelectionModel::new(),
            &[true; 3],
        ));
        assert!(drag.candidate(&[true; 3]).is_none());
        assert_eq!(drag.tool(), SelectionTool::MoveSelection);
    }
}
