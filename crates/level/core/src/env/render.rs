use crate::cell::MaskedCell;
use crate::geometry::Position;

/// Notifications consumed by the chunked geometry renderer.
///
/// Cache invalidations only mark chunks dirty; mesh rebuilding happens on the
/// renderer's own schedule. Overlay cells are laid out layer-major, then
/// row-major: index `(layer * height + y) * width + x`.
pub trait RenderSink {
    fn invalidate_geometry(&mut self, position: Position, layer: usize);
    fn invalidate_tile_head(&mut self, position: Position, layer: usize);

    /// Installs (or replaces) the live-preview overlay drawn in place of
    /// committed grid data.
    fn set_overlay(&mut self, origin: Position, width: usize, height: usize, cells: &[MaskedCell]);

    /// Repositions the current overlay without changing its contents.
    fn move_overlay(&mut self, origin: Position);

    fn clear_overlay(&mut self);
}

/// Renderer that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopRenderer;

impl RenderSink for NoopRenderer {
    fn invalidate_geometry(&mut self, _position: Position, _layer: usize) {}
    fn invalidate_tile_head(&mut self, _position: Position, _layer: usize) {}
    fn set_overlay(
        &mut self,
        _origin: Position,
        _width: usize,
        _height: usize,
        _cells: &[MaskedCell],
    ) {
    }
    fn move_overlay(&mut self, _origin: Position) {}
    fn clear_overlay(&mut self) {}
}
