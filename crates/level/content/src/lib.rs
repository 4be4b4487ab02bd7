//! Data-driven level content and loaders.
//!
//! This crate reads editor data files into `level-core` types:
//! - Tile databases (RON)
//! - Level grids with geometry and tile placements (RON)
//! - Selection engine configuration (TOML)
//!
//! All loaders deserialize through serde and report failures with `anyhow`.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LevelLoader, LoadResult, TileCatalogLoader};
