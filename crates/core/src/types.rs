//! Core type definitions
//!
//! A global tile identifier (GID) packs three orientation flags into its
//! high bits. The remaining bits select a tile across every tileset of a map.

use serde::{Deserialize, Serialize};

/// Tile is mirrored horizontally
pub const GID_HORIZONTAL_FLIP: u32 = 0x8000_0000;

/// Tile is mirrored vertically
pub const GID_VERTICAL_FLIP: u32 = 0x4000_0000;

/// Tile is mirrored along its anti-diagonal
pub const GID_DIAGONAL_FLIP: u32 = 0x2000_0000;

/// All three flip bits
pub const GID_FLIP: u32 = GID_HORIZONTAL_FLIP | GID_VERTICAL_FLIP | GID_DIAGONAL_FLIP;

/// Bare identifier bits
pub const GID_MASK: u32 = 0x0fff_ffff;

/// Tile id relative to its owning tileset
pub type TileId = u32;

/// Raw global tile identifier (32-bit unsigned), flip bits included
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Gid(pub u32);

impl Gid {
    /// The reserved "no tile" value
    pub const NIL: Gid = Gid(0);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Whether this is the reserved empty-cell value
    #[inline]
    pub fn is_nil(&self) -> bool {
        self.0 == 0
    }

    /// Identifier with the three flip bits cleared
    #[inline]
    pub fn bare(&self) -> u32 {
        self.0 & !GID_FLIP
    }

    #[inline]
    pub fn horizontal_flip(&self) -> bool {
        self.0 & GID_HORIZONTAL_FLIP != 0
    }

    #[inline]
    pub fn vertical_flip(&self) -> bool {
        self.0 & GID_VERTICAL_FLIP != 0
    }

    #[inline]
    pub fn diagonal_flip(&self) -> bool {
        self.0 & GID_DIAGONAL_FLIP != 0
    }
}

impl From<u32> for Gid {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for Gid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the tileset registry is ordered before identifiers are resolved
///
/// Resolution assumes tilesets ascend by `first_gid`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TilesetOrder {
    /// Use tilesets in document order, as written
    #[default]
    Document,
    /// Stable-sort tilesets by `first_gid` first
    Sorted,
}

impl TilesetOrder {
    /// Parse a configuration value (`document` or `sorted`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "document" => Some(Self::Document),
            "sorted" => Some(Self::Sorted),
            _ => None,
        }
    }
}
