//! Cell grid data model shared by the level editor's selection engine.
//!
//! `level-core` defines the canonical cell representation (geometry, object
//! flags, materials, tile references), an in-memory three-layer
//! [`LevelGrid`], and the collaborator traits through which the selection
//! engine reads tile definitions and notifies the renderer and change
//! history. It never renders or persists anything itself.
pub mod cell;
pub mod config;
pub mod env;
pub mod error;
pub mod geometry;
pub mod grid;

pub use cell::{Cell, GeoType, LevelObject, MaskedCell, TileId, TileRef};
pub use config::SelectionConfig;
pub use env::{
    ChangeHistory, NoopHistory, NoopRenderer, RenderSink, TileCatalog, TileDef, TileOracle,
};
pub use error::{EditorError, ErrorSeverity};
pub use geometry::{Position, Rect};
pub use grid::{CellGrid, GridError, LevelGrid, TileHeadPos};
