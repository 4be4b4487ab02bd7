//! Traits describing the collaborators of the selection engine.
//!
//! The tile database is exposed read-only through [`TileOracle`]. The
//! renderer ([`RenderSink`]) and the outer undo system ([`ChangeHistory`])
//! only receive fire-and-forget notifications; neither may mutate the grid
//! or the moving overlay.
mod history;
mod render;
mod tiles;

pub use history::{ChangeHistory, NoopHistory};
pub use render::{NoopRenderer, RenderSink};
pub use tiles::{TileCatalog, TileDef, TileOracle};
