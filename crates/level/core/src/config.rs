/// Selection engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SelectionConfig {
    /// Maximum number of cells the magic wand may visit before giving up.
    pub flood_fill_limit: usize,
    /// Whether selection operations move tile references along with geometry.
    pub affect_tiles: bool,
}

impl SelectionConfig {
    // ===== compile-time constants =====
    /// Number of independently editable depth planes in a level.
    pub const LAYER_COUNT: usize = 3;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_FLOOD_FILL_LIMIT: usize = 100_000;

    pub fn new() -> Self {
        Self {
            flood_fill_limit: Self::DEFAULT_FLOOD_FILL_LIMIT,
            affect_tiles: true,
        }
    }

    pub fn with_flood_fill_limit(mut self, flood_fill_limit: usize) -> Self {
        self.flood_fill_limit = flood_fill_limit;
        self
    }

    pub fn with_affect_tiles(mut self, affect_tiles: bool) -> Self {
        self.affect_tiles = affect_tiles;
        self
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self::new()
    }
}
