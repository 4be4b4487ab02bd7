/// Change-bracket notifications for the outer undo/redo system.
///
/// Every committing mutation is wrapped in `begin_change` / `push_change` so
/// the history can diff grid state before and after. The selection engine
/// never records undo data itself.
pub trait ChangeHistory {
    fn begin_change(&mut self);
    fn push_change(&mut self);
}

/// History sink that ignores every bracket.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHistory;

impl ChangeHistory for NoopHistory {
    fn begin_change(&mut self) {}
    fn push_change(&mut self) {}
}
