use crate::model::SelectionModel;
use crate::transplant::CellBuffer;

/// Undo-able session state: the selection masks plus the floating overlay.
///
/// Grid contents are not part of the snapshot; the change history diffs
/// those separately.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    selection: SelectionModel,
    overlay: Option<CellBuffer>,
}

impl SessionSnapshot {
    pub fn capture(selection: &SelectionModel, overlay: Option<&CellBuffer>) -> Self {
        Self {
            selection: selection.clone(),
            overlay: overlay.cloned(),
        }
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn overlay(&self) -> Option<&CellBuffer> {
        self.overlay.as_ref()
    }
}
