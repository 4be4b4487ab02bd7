//! Opaque clipboard encoding of extracted cell buffers.
//!
//! Payloads store tiles by name rather than by id so they survive a
//! reordered tile database. The encoding is versioned; decoders reject any
//! version they do not know instead of guessing.

use bincode::Options;
use level_core::{Cell, GeoType, LevelObject, MaskedCell, Position, SelectionConfig, TileId, TileOracle, TileRef};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CodecError;
use crate::transplant::CellBuffer;

/// Current payload format version.
pub const CLIPBOARD_VERSION: u8 = 0;

/// Upper bound on accepted payload size, so foreign clipboard contents
/// cannot trigger huge allocations.
const CLIPBOARD_BYTE_LIMIT: u64 = 64 * 1024 * 1024;

/// Serializes cell buffers to and from clipboard bytes.
pub trait ClipboardCodec {
    fn encode(&self, buffer: &CellBuffer) -> Result<Vec<u8>, CodecError>;
    fn decode(&self, bytes: &[u8]) -> Result<CellBuffer, CodecError>;
}

/// Bincode clipboard codec resolving tiles through a [`TileOracle`].
pub struct BincodeCodec<'a> {
    tiles: &'a dyn TileOracle,
}

impl<'a> BincodeCodec<'a> {
    pub fn new(tiles: &'a dyn TileOracle) -> Self {
        Self { tiles }
    }
}

#[derive(Serialize, Deserialize)]
struct Payload {
    version: u8,
    origin: Position,
    width: u32,
    height: u32,
    tile_names: Vec<String>,
    cells: Vec<PayloadCell>,
}

#[derive(Serialize, Deserialize)]
struct PayloadCell {
    included: bool,
    geo: GeoType,
    objects: u32,
    material: u16,
    tile: PayloadTile,
}

#[derive(Serialize, Deserialize)]
enum PayloadTile {
    None,
    /// Index into `Payload::tile_names`.
    Head(u32),
    Body { root: Position, layer: u8 },
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(CLIPBOARD_BYTE_LIMIT)
}

/// Cells a `width x height` buffer holds across all layers. `None` when a
/// side does not fit an `i32` coordinate or the product overflows.
fn cell_count(width: u32, height: u32) -> Option<usize> {
    if width > i32::MAX as u32 || height > i32::MAX as u32 {
        return None;
    }
    SelectionConfig::LAYER_COUNT
        .checked_mul(width as usize)?
        .checked_mul(height as usize)
}

impl ClipboardCodec for BincodeCodec<'_> {
    fn encode(&self, buffer: &CellBuffer) -> Result<Vec<u8>, CodecError> {
        let mut tile_names: Vec<String> = Vec::new();
        let mut cells = Vec::with_capacity(buffer.cells().len());

        for masked in buffer.cells() {
            let cell = &masked.cell;
            let tile = match cell.tile {
                TileRef::None => PayloadTile::None,
                TileRef::Head(id) => {
                    let name = &self.tiles.tile(id).ok_or(CodecError::UnknownTileId(id.0))?.name;
                    let index = match tile_names.iter().position(|known| known == name) {
                        Some(index) => index,
                        None => {
                            tile_names.push(name.clone());
                            tile_names.len() - 1
                        }
                    };
                    PayloadTile::Head(index as u32)
                }
                TileRef::Body { root, layer } => PayloadTile::Body {
                    root,
                    layer: layer as u8,
                },
            };
            cells.push(PayloadCell {
                included: masked.included,
                geo: cell.geo,
                objects: cell.objects.bits(),
                material: cell.material,
                tile,
            });
        }

        let payload = Payload {
            version: CLIPBOARD_VERSION,
            origin: buffer.origin(),
            width: buffer.width() as u32,
            height: buffer.height() as u32,
            tile_names,
            cells,
        };
        let bytes = options().serialize(&payload).map_err(CodecError::Encode)?;
        debug!(bytes = bytes.len(), tiles = payload.tile_names.len(), "encoded clipboard payload");
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<CellBuffer, CodecError> {
        let version = bytes.first().copied().ok_or_else(|| {
            CodecError::Decode(Box::new(bincode::ErrorKind::Custom("empty clipboard".into())))
        })?;
        if version != CLIPBOARD_VERSION {
            return Err(CodecError::UnsupportedVersion {
                found: version,
                expected: CLIPBOARD_VERSION,
            });
        }

        let payload: Payload = options().deserialize(bytes).map_err(CodecError::Decode)?;
        let expected = cell_count(payload.width, payload.height).ok_or_else(|| {
            CodecError::Decode(Box::new(bincode::ErrorKind::Custom(format!(
                "clipboard dimensions {}x{} out of range",
                payload.width, payload.height
            ))))
        })?;
        if payload.width == 0 || payload.height == 0 || payload.cells.len() != expected {
            return Err(CodecError::DimensionMismatch {
                width: payload.width,
                height: payload.height,
                expected,
                found: payload.cells.len(),
            });
        }

        let tile_ids = payload
            .tile_names
            .iter()
            .map(|name| {
                self.tiles
                    .find(name)
                    .ok_or_else(|| CodecError::UnknownTileName(name.clone()))
            })
            .collect::<Result<Vec<TileId>, _>>()?;

        let cells = payload
            .cells
            .into_iter()
            .map(|cell| {
                let tile = match cell.tile {
                    PayloadTile::None => TileRef::None,
                    PayloadTile::Head(index) => {
                        let id = tile_ids.get(index as usize).copied().ok_or_else(|| {
                            CodecError::Decode(Box::new(bincode::ErrorKind::Custom(format!(
                                "tile name index {index} out of range"
                            ))))
                        })?;
                        TileRef::Head(id)
                    }
                    PayloadTile::Body { root, layer } => {
                        if layer as usize >= SelectionConfig::LAYER_COUNT {
                            return Err(CodecError::InvalidLayer(layer));
                        }
                        TileRef::Body {
                            root,
                            layer: layer as usize,
                        }
                    }
                };
                Ok(MaskedCell::new(
                    cell.included,
                    Cell {
                        geo: cell.geo,
                        objects: LevelObject::from_bits_retain(cell.objects),
                        material: cell.material,
                        tile,
                    },
                ))
            })
            .collect::<Result<Vec<_>, CodecError>>()?;

        Ok(CellBuffer::from_cells(
            payload.origin,
            payload.width as usize,
            payload.height as usize,
            cells,
        ))
    }
}
