use crate::cell::TileId;
use crate::geometry::{Position, Rect};

/// Read-only tile database.
pub trait TileOracle {
    fn tile(&self, id: TileId) -> Option<&TileDef>;

    /// Looks a tile up by its unique name.
    fn find(&self, name: &str) -> Option<TileId>;
}

/// Static description of a multi-cell tile.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileDef {
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// Offset of the head cell from the footprint's minimum corner.
    pub center: Position,
    /// Whether the tile also occupies the layer behind its head layer.
    #[cfg_attr(feature = "serde", serde(default))]
    pub has_second_layer: bool,
}

impl TileDef {
    pub fn new(name: impl Into<String>, width: usize, height: usize, center: Position) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            center,
            has_second_layer: false,
        }
    }

    pub fn with_second_layer(mut self, has_second_layer: bool) -> Self {
        self.has_second_layer = has_second_layer;
        self
    }

    /// Cells covered by this tile when its head sits at `head`.
    pub fn footprint(&self, head: Position) -> Rect {
        Rect::from_origin_size(head - self.center, self.width, self.height)
    }
}

/// In-memory tile database indexed by insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileCatalog {
    tiles: Vec<TileDef>,
}

impl TileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tile and returns its id. Re-adding a name replaces the
    /// previous definition under the same id.
    pub fn insert(&mut self, def: TileDef) -> TileId {
        if let Some(id) = self.find(&def.name) {
            self.tiles[id.0 as usize] = def;
            return id;
        }
        self.tiles.push(def);
        TileId((self.tiles.len() - 1) as u32)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileId, &TileDef)> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(index, def)| (TileId(index as u32), def))
    }
}

impl FromIterator<TileDef> for TileCatalog {
    fn from_iter<I: IntoIterator<Item = TileDef>>(iter: I) -> Self {
        let mut catalog = TileCatalog::new();
        for def in iter {
            catalog.insert(def);
        }
        catalog
    }
}

impl TileOracle for TileCatalog {
    fn tile(&self, id: TileId) -> Option<&TileDef> {
        self.tiles.get(id.0 as usize)
    }

    fn find(&self, name: &str) -> Option<TileId> {
        self.tiles
            .iter()
            .position(|def| def.name == name)
            .map(|index| TileId(index as u32))
    }
}
