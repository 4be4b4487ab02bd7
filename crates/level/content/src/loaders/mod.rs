//! Content loaders for reading editor data from files.
//!
//! Each loader exposes `load(path)` for files and `parse(text)` for
//! in-memory content.

pub mod config;
pub mod level;
pub mod tiles;

pub use config::ConfigLoader;
pub use level::LevelLoader;
pub use tiles::TileCatalogLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
