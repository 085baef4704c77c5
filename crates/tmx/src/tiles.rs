//! Tile identifier resolution
//!
//! Turns raw GIDs into [`DecodedTile`]s bound to the tileset that owns them.
//! A tileset owns the half-open range `[first_gid, next.first_gid)`.

use crate::map::Tileset;
use crate::{Result, TmxError};
use serde::Serialize;
use tmxkit_core::{Gid, TileId};

/// A grid cell after resolution
///
/// The tileset is referenced by its index in the map's tileset list, so
/// decoded tiles never own tileset data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DecodedTile {
    /// Tile id relative to the owning tileset
    pub id: TileId,

    /// Index of the owning tileset, `None` for the nil tile
    pub tileset: Option<usize>,

    pub horizontal_flip: bool,
    pub vertical_flip: bool,
    pub diagonal_flip: bool,
}

impl DecodedTile {
    /// The empty cell (GID 0)
    pub const NIL: DecodedTile = DecodedTile {
        id: 0,
        tileset: None,
        horizontal_flip: false,
        vertical_flip: false,
        diagonal_flip: false,
    };

    /// Check if this cell holds no tile
    #[inline]
    pub fn is_nil(&self) -> bool {
        self.tileset.is_none()
    }
}

impl Default for DecodedTile {
    fn default() -> Self {
        Self::NIL
    }
}

/// Resolve one GID against `tilesets`
///
/// `tilesets` must ascend by `first_gid`; the owner is the last tileset whose
/// `first_gid` does not exceed the bare identifier.
pub fn resolve_gid(tilesets: &[Tileset], gid: Gid) -> Result<DecodedTile> {
    if gid.is_nil() {
        return Ok(DecodedTile::NIL);
    }

    let bare = gid.bare();

    let (index, tileset) = tilesets
        .iter()
        .enumerate()
        .rev()
        .find(|(_, tileset)| tileset.first_gid <= bare)
        .ok_or(TmxError::InvalidGid)?;

    Ok(DecodedTile {
        id: bare - tileset.first_gid,
        tileset: Some(index),
        horizontal_flip: gid.horizontal_flip(),
        vertical_flip: gid.vertical_flip(),
        diagonal_flip: gid.diagonal_flip(),
    })
}

/// Resolve every GID of a layer, stopping at the first failure
pub fn resolve_all(tilesets: &[Tileset], gids: &[Gid]) -> Result<Vec<DecodedTile>> {
    gids.iter().map(|&gid| resolve_gid(tilesets, gid)).collect()
}
