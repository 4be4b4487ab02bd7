//! Single grid cell and its components.
//!
//! A cell carries a geometry kind, an object-flag bitmask, a material id and a
//! tile reference. Multi-cell tiles are owned by exactly one *head* cell; every
//! other cell of the tile is a *body* pointing back at the head.

use bitflags::bitflags;

use crate::geometry::Position;

/// Geometry kind of a cell.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum GeoType {
    #[default]
    Air = 0,
    Solid = 1,
    SlopeRightUp = 2,
    SlopeLeftUp = 3,
    SlopeRightDown = 4,
    SlopeLeftDown = 5,
    Platform = 6,
    ShortcutEntrance = 7,
    Glass = 9,
}

impl GeoType {
    /// Coarse "solid-like" category used by the magic wand: solid blocks,
    /// slopes and platforms group together, everything else is open space.
    pub const fn is_solid_like(self) -> bool {
        matches!(
            self,
            GeoType::Solid
                | GeoType::SlopeRightUp
                | GeoType::SlopeLeftUp
                | GeoType::SlopeRightDown
                | GeoType::SlopeLeftDown
                | GeoType::Platform
        )
    }
}

bitflags! {
    /// Objects placed on a cell. Any combination may be set at once.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct LevelObject: u32 {
        const HORIZONTAL_BEAM   = 1 << 0;
        const VERTICAL_BEAM     = 1 << 1;
        const HIVE              = 1 << 2;
        const SHORTCUT          = 1 << 4;
        const ENTRANCE          = 1 << 5;
        const CREATURE_DEN      = 1 << 6;
        const ROCK              = 1 << 8;
        const SPEAR             = 1 << 9;
        const CRACK             = 1 << 10;
        const FORBID_FLY_CHAIN  = 1 << 11;
        const GARBAGE_WORM      = 1 << 12;
        const WATERFALL         = 1 << 17;
        const WHACK_A_MOLE_HOLE = 1 << 18;
        const WORM_GRASS        = 1 << 19;
        const SCAVENGER_HOLE    = 1 << 20;
    }
}

/// Index of a tile definition in the tile database.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileId(pub u32);

/// Tile reference stored in a cell.
///
/// A head owns the tile definition and implicitly roots the tile at its own
/// position. A body points at the head's position and layer. Inside a moving
/// overlay, body roots are expressed relative to the overlay origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileRef {
    #[default]
    None,
    Head(TileId),
    Body { root: Position, layer: usize },
}

impl TileRef {
    pub const fn is_none(&self) -> bool {
        matches!(self, TileRef::None)
    }

    pub const fn is_head(&self) -> bool {
        matches!(self, TileRef::Head(_))
    }

    pub const fn is_body(&self) -> bool {
        matches!(self, TileRef::Body { .. })
    }

    pub const fn head(&self) -> Option<TileId> {
        match self {
            TileRef::Head(id) => Some(*id),
            _ => None,
        }
    }
}

/// One grid unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub geo: GeoType,
    pub objects: LevelObject,
    pub material: u16,
    pub tile: TileRef,
}

impl Cell {
    pub const EMPTY: Self = Self {
        geo: GeoType::Air,
        objects: LevelObject::empty(),
        material: 0,
        tile: TileRef::None,
    };

    pub fn with_geo(geo: GeoType) -> Self {
        Self {
            geo,
            ..Self::EMPTY
        }
    }

    pub const fn has_tile(&self) -> bool {
        !self.tile.is_none()
    }

    /// Clears geometry, objects and material. Tile references are cleared
    /// only when `tiles` is set.
    pub fn clear(&mut self, tiles: bool) {
        self.geo = GeoType::Air;
        self.objects = LevelObject::empty();
        self.material = 0;
        if tiles {
            self.tile = TileRef::None;
        }
    }
}

/// A cell paired with an inclusion flag, as carried by moving overlays,
/// cancel snapshots and clipboard payloads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaskedCell {
    pub included: bool,
    pub cell: Cell,
}

impl MaskedCell {
    pub const fn new(included: bool, cell: Cell) -> Self {
        Self { included, cell }
    }
}
