//! Interaction state machine tying tools, the selection model and the
//! transplant engine together.

use level_core::{
    CellGrid, ChangeHistory, GeoType, Position, RenderSink, SelectionConfig, TileOracle,
};
use tracing::{debug, info, warn};

use crate::clipboard::ClipboardCodec;
use crate::combine::SelectionOperator;
use crate::error::SelectionError;
use crate::model::{LayerCandidates, LayerMask, SelectionModel};
use crate::snapshot::SessionSnapshot;
use crate::tools::{
    LassoDrag, RectDrag, SelectedMoveDrag, SelectionMoveDrag, SelectionTool, ToolDrag, magic_wand,
    tile_footprint,
};
use crate::transplant::{self, CellBuffer, TransplantEngine};

/// Collaborators borrowed for the duration of one session call.
pub struct EditEnv<'a> {
    pub grid: &'a mut dyn CellGrid,
    pub tiles: &'a dyn TileOracle,
    pub renderer: &'a mut dyn RenderSink,
    pub history: &'a mut dyn ChangeHistory,
}

impl<'a> EditEnv<'a> {
    pub fn new(
        grid: &'a mut dyn CellGrid,
        tiles: &'a dyn TileOracle,
        renderer: &'a mut dyn RenderSink,
        history: &'a mut dyn ChangeHistory,
    ) -> Self {
        Self {
            grid,
            tiles,
            renderer,
            history,
        }
    }
}

/// Selection editing session.
///
/// Owns the selection model, the transplant engine and the in-progress
/// drag. All grid access goes through the [`EditEnv`] passed to each call;
/// the session never holds on to its collaborators.
#[derive(Clone, Debug)]
pub struct SelectionSession {
    config: SelectionConfig,
    selection: SelectionModel,
    transplant: TransplantEngine,
    tool: SelectionTool,
    operator: SelectionOperator,
    operator_override: Option<SelectionOperator>,
    drag: Option<ToolDrag>,
    last_click: Option<Position>,
    paste_mode: bool,
    active: bool,
}

impl Default for SelectionSession {
    fn default() -> Self {
        Self::new(SelectionConfig::default())
    }
}

impl SelectionSession {
    pub fn new(config: SelectionConfig) -> Self {
        Self {
            transplant: TransplantEngine::new(config.affect_tiles),
            config,
            selection: SelectionModel::new(),
            tool: SelectionTool::default(),
            operator: SelectionOperator::default(),
            operator_override: None,
            drag: None,
            last_click: None,
            paste_mode: false,
            active: false,
        }
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn transplant(&self) -> &TransplantEngine {
        &self.transplant
    }

    /// Cells currently floating above the grid, if any.
    pub fn overlay(&self) -> Option<&CellBuffer> {
        self.transplant.overlay()
    }

    pub fn tool(&self) -> SelectionTool {
        self.tool
    }

    /// Equips another tool. Any floating move is committed first.
    pub fn set_tool(&mut self, tool: SelectionTool, env: &mut EditEnv<'_>) {
        if tool == self.tool {
            return;
        }
        self.submit_move(env);
        self.drag = None;
        self.paste_mode = false;
        self.tool = tool;
        debug!(%tool, "selection tool changed");
    }

    pub fn operator(&self) -> SelectionOperator {
        self.operator
    }

    pub fn set_operator(&mut self, operator: SelectionOperator) {
        self.operator = operator;
    }

    /// Temporarily overrides the chosen operator, e.g. while a modifier key
    /// is held. `None` restores the chosen one.
    pub fn set_operator_override(&mut self, operator: Option<SelectionOperator>) {
        self.operator_override = operator;
    }

    /// Operator applied to the next candidate.
    pub fn effective_operator(&self) -> SelectionOperator {
        self.operator_override.unwrap_or(self.operator)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_paste_mode(&self) -> bool {
        self.paste_mode
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pointer pressed at `position`.
    ///
    /// Click tools act immediately on `active_layer`; drag tools start a drag
    /// over the layers in `layer_mask`.
    pub fn pointer_down(
        &mut self,
        position: Position,
        layer_mask: &LayerMask,
        active_layer: usize,
        env: &mut EditEnv<'_>,
    ) -> Result<(), SelectionError> {
        self.active = true;
        if self.tool.is_click_tool() {
            self.last_click = Some(position);
            return self.click(position, active_layer, env);
        }

        if self.drag.is_some() {
            warn!("pointer pressed during a drag; finishing the previous one");
            self.pointer_up(layer_mask, env);
        }

        let drag = match self.tool {
            SelectionTool::Rectangle => {
                env.history.begin_change();
                ToolDrag::Rectangle(RectDrag::new(position))
            }
            SelectionTool::Lasso => {
                env.history.begin_change();
                ToolDrag::Lasso(LassoDrag::new(position))
            }
            SelectionTool::MoveSelection => {
                env.history.begin_change();
                ToolDrag::MoveSelection(SelectionMoveDrag::begin(position, &self.selection, layer_mask))
            }
            SelectionTool::MoveSelected => {
                let Some(drag) = SelectedMoveDrag::begin(
                    position,
                    &self.selection,
                    &mut self.transplant,
                    &mut *env.grid,
                    &mut *env.renderer,
                    &mut *env.history,
                ) else {
                    debug!("nothing selected to move");
                    return Ok(());
                };
                ToolDrag::MoveSelected(drag)
            }
            SelectionTool::MagicWand | SelectionTool::TileFootprint => return Ok(()),
        };

        if self.tool.produces_selection() && self.effective_operator() == SelectionOperator::Replace {
            self.selection.clear_layers(layer_mask);
        }
        let mut drag = drag;
        drag.sample(position, &mut self.selection, &mut self.transplant, &mut *env.renderer);
        self.drag = Some(drag);
        Ok(())
    }

    /// Pointer moved while held.
    ///
    /// Drag tools take a sample. Click tools re-trigger when the pointer
    /// enters a new cell that is not already selected on `active_layer`.
    pub fn pointer_move(
        &mut self,
        position: Position,
        active_layer: usize,
        env: &mut EditEnv<'_>,
    ) -> Result<(), SelectionError> {
        if let Some(drag) = self.drag.as_mut() {
            drag.sample(position, &mut self.selection, &mut self.transplant, &mut *env.renderer);
            return Ok(());
        }

        if self.tool.is_click_tool()
            && self.last_click.is_some()
            && self.last_click != Some(position)
            && !self.selection.contains(active_layer, position)
        {
            self.last_click = Some(position);
            return self.click(position, active_layer, env);
        }
        Ok(())
    }

    /// Pointer released: merges the drag's candidate and closes its history
    /// change. A floating move stays floating until submitted.
    pub fn pointer_up(&mut self, layer_mask: &LayerMask, env: &mut EditEnv<'_>) {
        self.last_click = None;
        let Some(drag) = self.drag.take() else {
            return;
        };

        match drag {
            ToolDrag::Rectangle(_) | ToolDrag::Lasso(_) => {
                let operator = self.effective_operator();
                match drag.candidate(layer_mask) {
                    Some(candidates) => self.selection.combine(&candidates, operator),
                    None if operator.clears_on_empty() => self.selection.clear_layers(layer_mask),
                    None => {}
                }
                env.history.push_change();
            }
            ToolDrag::MoveSelection(_) => env.history.push_change(),
            ToolDrag::MoveSelected(_) => {}
        }
    }

    /// Runs a click tool at `position`. A layer past the last one is
    /// ignored, as the grid ignores it.
    ///
    /// Magic-wand overflow is reported without touching anything, including
    /// the history.
    pub fn click(
        &mut self,
        position: Position,
        active_layer: usize,
        env: &mut EditEnv<'_>,
    ) -> Result<(), SelectionError> {
        if active_layer >= SelectionConfig::LAYER_COUNT {
            warn!(active_layer, "click on a layer that does not exist");
            return Ok(());
        }
        let operator = self.effective_operator();
        let mut candidates = LayerCandidates::default();

        match self.tool {
            SelectionTool::MagicWand => {
                let limit = self.config.flood_fill_limit;
                match magic_wand(&*env.grid, position, active_layer, limit) {
                    Ok(Some(region)) => candidates[active_layer] = Some(region),
                    Ok(None) => {}
                    Err(overflow) => {
                        warn!(%position, limit = overflow.limit, "magic wand region too large");
                        return Err(SelectionError::FloodFillTooLarge { limit });
                    }
                }
            }
            SelectionTool::TileFootprint => {
                if !self.config.affect_tiles {
                    return Ok(());
                }
                if let Some(footprint) = tile_footprint(&*env.grid, env.tiles, position, active_layer) {
                    candidates = footprint;
                }
            }
            _ => return Ok(()),
        }

        env.history.begin_change();
        if candidates.iter().any(Option::is_some) {
            self.selection.combine(&candidates, operator);
        } else if operator.clears_on_empty() {
            match self.tool {
                SelectionTool::MagicWand => {
                    let mut mask = [false; SelectionConfig::LAYER_COUNT];
                    mask[active_layer] = true;
                    self.selection.clear_layers(&mask);
                }
                _ => self.selection.clear(),
            }
        }
        env.history.push_change();
        Ok(())
    }

    /// Encodes the current selection for the clipboard. While a move is
    /// floating, the overlay is copied at its current location instead.
    pub fn copy(&self, codec: &dyn ClipboardCodec, env: &EditEnv<'_>) -> Result<Vec<u8>, SelectionError> {
        let bytes = match self.transplant.overlay() {
            Some(overlay) => codec.encode(overlay)?,
            None => {
                let buffer = transplant::extract(&*env.grid, &self.selection).ok_or(SelectionError::NoSelection)?;
                codec.encode(&buffer)?
            }
        };
        info!(bytes = bytes.len(), "copied selection");
        Ok(bytes)
    }

    /// Decodes clipboard bytes into a floating overlay at `at`.
    ///
    /// Any floating move is committed first. On decode failure nothing else
    /// changes. On success the selection is replaced by the pasted inclusion
    /// masks and the move tool is equipped.
    pub fn paste(
        &mut self,
        bytes: &[u8],
        at: Position,
        codec: &dyn ClipboardCodec,
        env: &mut EditEnv<'_>,
    ) -> Result<(), SelectionError> {
        self.submit_move(env);

        let mut buffer = codec.decode(bytes).inspect_err(|error| {
            warn!(%error, "clipboard does not hold geometry");
        })?;
        buffer.set_origin(at);

        for layer in 0..SelectionConfig::LAYER_COUNT {
            self.selection.set_layer(layer, buffer.layer_selection(layer));
        }
        info!(origin = %at, width = buffer.width(), height = buffer.height(), "pasted geometry");
        self.transplant.install(buffer, &mut *env.renderer, &mut *env.history);

        self.drag = None;
        self.tool = SelectionTool::MoveSelected;
        self.paste_mode = true;
        self.active = true;
        Ok(())
    }

    /// Commits any floating move. Safe to call at any time.
    pub fn submit_move(&mut self, env: &mut EditEnv<'_>) {
        self.transplant
            .submit(&mut *env.grid, &mut *env.renderer, &mut *env.history);
    }

    /// Commits the floating move and ends the interaction.
    pub fn done(&mut self, env: &mut EditEnv<'_>) {
        self.submit_move(env);
        self.drag = None;
        self.paste_mode = false;
        self.active = false;
    }

    /// Rolls back the floating move, if any, and clears the selection.
    ///
    /// Cancelling a move lifted from the grid keeps the session active so
    /// a new selection can be drawn right away. Cancelling a paste, or
    /// cancelling with nothing floating, ends the interaction.
    pub fn cancel(&mut self, env: &mut EditEnv<'_>) {
        let was_moving = self.transplant.is_active();
        self.transplant
            .cancel(&mut *env.grid, &mut *env.renderer, &mut *env.history);
        self.selection.clear();
        self.drag = None;
        if !was_moving || self.paste_mode {
            self.active = false;
        }
        self.paste_mode = false;
    }

    /// Called when the editor leaves selection mode: commits the move and
    /// drops the selection.
    pub fn deactivate(&mut self, env: &mut EditEnv<'_>) {
        let record = self.selection.is_active() && !self.transplant.is_active();
        self.submit_move(env);
        if record {
            env.history.begin_change();
        }
        self.selection.clear();
        if record {
            env.history.push_change();
        }
        env.renderer.clear_overlay();
        self.drag = None;
        self.paste_mode = false;
        self.active = false;
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Overwrites the geometry of every selected cell with `geo` as one
    /// history change. Unavailable while a move or paste is floating.
    ///
    /// Returns the number of cells written.
    pub fn fill_selection(&mut self, geo: GeoType, env: &mut EditEnv<'_>) -> usize {
        if !self.selection.is_active() || self.transplant.is_active() {
            return 0;
        }
        env.history.begin_change();
        let filled = transplant::fill(&mut *env.grid, &self.selection, geo, &mut *env.renderer);
        env.history.push_change();
        info!(%geo, filled, "filled selection");
        filled
    }

    /// Moves the selection to the neighbouring layer (wrapping around).
    ///
    /// With `move_geometry`, the selected cells travel along: the selection
    /// is detached into the overlay if it is not floating already.
    pub fn move_selection_layer(&mut self, direction: i32, move_geometry: bool, env: &mut EditEnv<'_>) {
        if !self.selection.is_active() || direction == 0 {
            return;
        }
        if move_geometry {
            if !self.transplant.is_active() {
                self.transplant.begin_move(
                    &mut *env.grid,
                    &self.selection,
                    &mut *env.renderer,
                    &mut *env.history,
                );
            }
            self.transplant.rotate_layers(direction, &mut *env.renderer);
        }
        self.selection.rotate_layers(direction);
        debug!(direction, move_geometry, "moved selection layer");
    }

    /// Captures the selection and overlay for the undo system.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.selection, self.transplant.overlay())
    }

    /// Reinstates a captured selection and overlay. The grid is not touched.
    pub fn restore(&mut self, snapshot: &SessionSnapshot, renderer: &mut dyn RenderSink) {
        self.selection = snapshot.selection().clone();
        self.transplant
            .restore_overlay(snapshot.overlay().cloned(), renderer);
        self.drag = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use level_core::{Cell, LevelGrid, NoopHistory, NoopRenderer, TileCatalog};

    const LAYER0: LayerMask = [true, false, false];

    #[test]
    fn rectangle_drag_replaces_selection() {
        let mut grid = LevelGrid::new(10, 10);
        let tiles = TileCatalog::new();
        let (mut renderer, mut history) = (NoopRenderer, NoopHistory);
        let mut env = EditEnv::new(&mut grid, &tiles, &mut renderer, &mut history);
        let mut session = SelectionSession::default();

        session.pointer_down(Position::new(1, 1), &LAYER0, 0, &mut env).unwrap();
        session.pointer_move(Position::new(3, 2), 0, &mut env).unwrap();
        session.pointer_up(&LAYER0, &mut env);
        assert_eq!(session.selection().layer(0).unwrap().count(), 6);

        session.pointer_down(Position::new(8, 8), &LAYER0, 0, &mut env).unwrap();
        session.pointer_up(&LAYER0, &mut env);
        let layer = session.selection().layer(0).unwrap();
        assert_eq!(layer.count(), 1);
        assert_eq!(layer.min(), Position::new(8, 8));
    }

    #[test]
    fn operator_override_takes_precedence() {
        let mut session = SelectionSession::default();
        session.set_operator(SelectionOperator::Add);
        session.set_operator_override(Some(SelectionOperator::Subtract));
        assert_eq!(session.effective_operator(), SelectionOperator::Subtract);
        session.set_operator_override(None);
        assert_eq!(session.effective_operator(), SelectionOperator::Add);
    }

    #[test]
    fn tile_tool_is_inert_without_tiles() {
        let mut grid = LevelGrid::new(4, 4);
        let tiles = TileCatalog::new();
        let (mut renderer, mut history) = (NoopRenderer, NoopHistory);
        let mut env = EditEnv::new(&mut grid, &tiles, &mut renderer, &mut history);
        let mut session = SelectionSession::new(SelectionConfig::default().with_affect_tiles(false));

        session.set_tool(SelectionTool::TileFootprint, &mut env);
        session.pointer_down(Position::new(1, 1), &LAYER0, 0, &mut env).unwrap();
        assert!(!session.selection().is_active());
    }

    #[test]
    fn wand_retriggers_only_on_unselected_cells() {
        let mut grid = LevelGrid::new(6, 1);
        grid.set(0, Position::new(3, 0), Cell::with_geo(GeoType::Solid)).unwrap();
        let tiles = TileCatalog::new();
        let (mut renderer, mut history) = (NoopRenderer, NoopHistory);
        let mut env = EditEnv::new(&mut grid, &tiles, &mut renderer, &mut history);
        let mut session = SelectionSession::default();
        session.set_tool(SelectionTool::MagicWand, &mut env);
        session.set_operator(SelectionOperator::Add);

        session.pointer_down(Position::new(0, 0), &LAYER0, 0, &mut env).unwrap();
        assert_eq!(session.selection().layer(0).unwrap().count(), 3);

        // Still inside the selected region: nothing new.
        session.pointer_move(Position::new(1, 0), 0, &mut env).unwrap();
        assert_eq!(session.selection().layer(0).unwrap().count(), 3);

        session.pointer_move(Position::new(3, 0), 0, &mut env).unwrap();
        assert_eq!(session.selection().layer(0).unwrap().count(), 4);
        session.pointer_up(&LAYER0, &mut env);
    }

    #[test]
    fn move_layer_rotates_selection_and_geometry() {
        let mut grid = LevelGrid::new(4, 4);
        grid.set(2, Position::new(1, 1), Cell::with_geo(GeoType::Solid)).unwrap();
        let tiles = TileCatalog::new();
        let (mut renderer, mut history) = (NoopRenderer, NoopHistory);
        let mut env = EditEnv::new(&mut grid, &tiles, &mut renderer, &mut history);
        let mut session = SelectionSession::default();

        let mask = [false, false, true];
        session.pointer_down(Position::new(1, 1), &mask, 2, &mut env).unwrap();
        session.pointer_up(&mask, &mut env);

        session.move_selection_layer(1, true, &mut env);
        assert!(session.selection().layer(0).is_some());
        session.done(&mut env);

        assert_eq!(env.grid.get(0, Position::new(1, 1)).unwrap().geo, GeoType::Solid);
        assert_eq!(env.grid.get(2, Position::new(1, 1)).unwrap().geo, GeoType::Air);
    }

    #[test]
    fn cancelling_a_lifted_move_keeps_session_active() {
        let mut grid = LevelGrid::new(4, 4);
        grid.set(0, Position::new(1, 1), Cell::with_geo(GeoType::Solid)).unwrap();
        let tiles = TileCatalog::new();
        let (mut renderer, mut history) = (NoopRenderer, NoopHistory);
        let mut env = EditEnv::new(&mut grid, &tiles, &mut renderer, &mut history);
        let mut session = SelectionSession::default();

        session.pointer_down(Position::new(1, 1), &LAYER0, 0, &mut env).unwrap();
        session.pointer_up(&LAYER0, &mut env);
        session.set_tool(SelectionTool::MoveSelected, &mut env);
        session.pointer_down(Position::new(1, 1), &LAYER0, 0, &mut env).unwrap();
        session.pointer_move(Position::new(3, 3), 0, &mut env).unwrap();
        session.pointer_up(&LAYER0, &mut env);

        session.cancel(&mut env);
        assert!(session.is_active());
        assert!(!session.selection().is_active());
        assert_eq!(env.grid.get(0, Position::new(1, 1)).unwrap().geo, GeoType::Solid);

        session.cancel(&mut env);
        assert!(!session.is_active());
    }

    #[test]
    fn fill_selection_is_refused_while_moving() {
        let mut grid = LevelGrid::new(4, 4);
        let tiles = TileCatalog::new();
        let (mut renderer, mut history) = (NoopRenderer, NoopHistory);
        let mut env = EditEnv::new(&mut grid, &tiles, &mut renderer, &mut history);
        let mut session = SelectionSession::default();

        session.pointer_down(Position::new(0, 0), &LAYER0, 0, &mut env).unwrap();
        session.pointer_move(Position::new(1, 1), 0, &mut env).unwrap();
        session.pointer_up(&LAYER0, &mut env);
        assert_eq!(session.fill_selection(GeoType::Solid, &mut env), 4);
        assert_eq!(env.grid.get(0, Position::new(1, 1)).unwrap().geo, GeoType::Solid);

        session.set_tool(SelectionTool::MoveSelected, &mut env);
        session.pointer_down(Position::new(0, 0), &LAYER0, 0, &mut env).unwrap();
        assert_eq!(session.fill_selection(GeoType::Glass, &mut env), 0);
        session.done(&mut env);
    }

    #[test]
    fn click_on_missing_layer_is_ignored() {
        let mut grid = LevelGrid::new(4, 4);
        let tiles = TileCatalog::new();
        let (mut renderer, mut history) = (NoopRenderer, NoopHistory);
        let mut env = EditEnv::new(&mut grid, &tiles, &mut renderer, &mut history);
        let mut session = SelectionSession::default();

        for tool in [SelectionTool::MagicWand, SelectionTool::TileFootprint] {
            session.set_tool(tool, &mut env);
            session.pointer_down(Position::new(1, 1), &LAYER0, 3, &mut env).unwrap();
            session.pointer_move(Position::new(2, 1), 7, &mut env).unwrap();
            session.pointer_up(&LAYER0, &mut env);
        }
        assert!(!session.selection().is_active());
    }

    #[test]
    fn switching_tools_ends_paste_mode() {
        let mut grid = LevelGrid::new(8, 8);
        grid.set(0, Position::new(1, 1), Cell::with_geo(GeoType::Solid)).unwrap();
        grid.set(0, Position::new(6, 6), Cell::with_geo(GeoType::Glass)).unwrap();
        let tiles = TileCatalog::new();
        let codec = crate::clipboard::BincodeCodec::new(&tiles);
        let (mut renderer, mut history) = (NoopRenderer, NoopHistory);
        let mut env = EditEnv::new(&mut grid, &tiles, &mut renderer, &mut history);
        let mut session = SelectionSession::default();

        session.pointer_down(Position::new(1, 1), &LAYER0, 0, &mut env).unwrap();
        session.pointer_up(&LAYER0, &mut env);
        let bytes = session.copy(&codec, &env).unwrap();
        session.paste(&bytes, Position::new(3, 3), &codec, &mut env).unwrap();
        assert!(session.is_paste_mode());

        session.set_tool(SelectionTool::Rectangle, &mut env);
        assert!(!session.is_paste_mode());
        assert_eq!(env.grid.get(0, Position::new(3, 3)).unwrap().geo, GeoType::Solid);

        // A later move lifted from the grid cancels without ending the session.
        session.pointer_down(Position::new(6, 6), &LAYER0, 0, &mut env).unwrap();
        session.pointer_up(&LAYER0, &mut env);
        session.set_tool(SelectionTool::MoveSelected, &mut env);
        session.pointer_down(Position::new(6, 6), &LAYER0, 0, &mut env).unwrap();
        session.pointer_up(&LAYER0, &mut env);
        session.cancel(&mut env);
        assert!(session.is_active());
        assert_eq!(env.grid.get(0, Position::new(6, 6)).unwrap().geo, GeoType::Glass);
    }
}
