//! Selection configuration loader.

use std::path::Path;

use level_core::SelectionConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for selection engine configuration from TOML files.
///
/// Missing keys fall back to [`SelectionConfig::default`].
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<SelectionConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SelectionConfig> {
        let config: SelectionConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.flood_fill_limit == 0 {
            anyhow::bail!("flood_fill_limit must be at least 1");
        }
        Ok(config)
    }
}
