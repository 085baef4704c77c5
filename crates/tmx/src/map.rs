//! Map model and whole-document layer decoding
//!
//! The structural model mirrors a TMX document. Layer payloads stay raw until
//! [`Map::decode_layers`] turns them into [`DecodedTile`]s.

use crate::layer::Layer;
use crate::objects::ObjectGroup;
use crate::tiles::{resolve_all, resolve_gid, DecodedTile};
use crate::Result;
use rayon::prelude::*;
use serde::Serialize;
use tmxkit_core::{Gid, TileId, TilesetOrder};

/// A tile map (`<map>` element)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Map {
    pub version: String,
    pub orientation: String,

    /// Map width (in tiles)
    pub width: u32,

    /// Map height (in tiles)
    pub height: u32,

    pub tile_width: u32,
    pub tile_height: u32,
    pub properties: Vec<Property>,

    /// Tilesets in document order, ascending by `first_gid`
    pub tilesets: Vec<Tileset>,

    pub layers: Vec<Layer>,
    pub object_groups: Vec<ObjectGroup>,
}

/// A `<tileset>` element
///
/// Owns global identifiers from `first_gid` up to the next tileset's
/// `first_gid`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tileset {
    pub first_gid: u32,

    /// External `.tsx` file, empty for embedded tilesets
    pub source: String,

    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub spacing: u32,
    pub margin: u32,
    pub properties: Vec<Property>,
    pub image: Image,
    pub tiles: Vec<Tile>,
    pub tile_count: u32,
    pub columns: u32,
}

/// An `<image>` element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Image {
    pub source: String,
    pub trans: String,
    pub width: u32,
    pub height: u32,
}

/// Per-tile data inside a tileset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub id: TileId,
    pub image: Image,
}

/// A `<property>` name/value pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

/// Options for [`Map::decode_layers`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// How tilesets are ordered before identifiers are resolved
    pub tileset_order: TilesetOrder,

    /// Decode layers on the rayon thread pool
    pub parallel_layers: bool,
}

impl Map {
    /// Decode every layer's payload and resolve its tiles
    ///
    /// All layers are decoded before any is updated. On error neither the
    /// layers nor the tileset order are modified. Sequential decoding returns
    /// the first failing layer's error; parallel decoding returns any one.
    pub fn decode_layers(&mut self, options: &DecodeOptions) -> Result<()> {
        let sorted = sorted_tilesets(&self.tilesets, options.tileset_order);

        let width = self.width as usize;
        let height = self.height as usize;
        let tilesets = sorted.as_deref().unwrap_or(self.tilesets.as_slice());

        let decode = |layer: &Layer| -> Result<Vec<DecodedTile>> {
            tracing::debug!(
                layer = %layer.name,
                encoding = %layer.data.encoding,
                compression = %layer.data.compression,
                "decoding layer"
            );
            let gids = layer.data.decode_gids(width, height)?;
            resolve_all(tilesets, &gids)
        };

        let decoded: Vec<Vec<DecodedTile>> = if options.parallel_layers {
            self.layers.par_iter().map(&decode).collect::<Result<_>>()?
        } else {
            self.layers.iter().map(&decode).collect::<Result<_>>()?
        };

        for (layer, tiles) in self.layers.iter_mut().zip(decoded) {
            layer.set_decoded_tiles(tiles);
        }
        if let Some(sorted) = sorted {
            self.tilesets = sorted;
        }

        tracing::debug!(layers = self.layers.len(), width, height, "map layers decoded");
        Ok(())
    }

    /// Resolve a raw GID (e.g. an object's `gid`) against this map's tilesets
    pub fn decode_gid(&self, gid: Gid) -> Result<DecodedTile> {
        resolve_gid(&self.tilesets, gid)
    }

    /// Get the tileset a decoded tile belongs to
    pub fn tileset_of(&self, tile: &DecodedTile) -> Option<&Tileset> {
        self.tilesets.get(tile.tileset?)
    }

    /// Get the single tileset used by a layer, if any
    pub fn layer_tileset(&self, layer: &Layer) -> Option<&Tileset> {
        self.tilesets.get(layer.tileset?)
    }

    /// Get the decoded tile at (x, y) of the layer at `layer_index`
    pub fn tile_at(&self, layer_index: usize, x: u32, y: u32) -> Option<&DecodedTile> {
        if y >= self.height {
            return None;
        }
        self.layers
            .get(layer_index)?
            .tile_at(x as usize, y as usize, self.width as usize)
    }

    /// Find a layer by name
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.name == name)
    }
}

/// A reordered copy of `tilesets`, or `None` when document order is used as is
fn sorted_tilesets(tilesets: &[Tileset], order: TilesetOrder) -> Option<Vec<Tileset>> {
    let ascending = tilesets
        .windows(2)
        .all(|pair| pair[0].first_gid <= pair[1].first_gid);
    if ascending {
        return None;
    }

    match order {
        TilesetOrder::Document => {
            tracing::warn!("tilesets are not ordered by firstgid; tiles may resolve to the wrong tileset");
            None
        }
        TilesetOrder::Sorted => {
            tracing::debug!("sorting tilesets by firstgid");
            let mut sorted = tilesets.to_vec();
            sorted.sort_by_key(|tileset| tileset.first_gid);
            Some(sorted)
        }
    }
}
