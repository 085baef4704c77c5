//! # tmxkit
//!
//! Reads Tiled TMX maps and decodes their tile layers.
//!
//! ## Features
//! - TMX/TSX document parser (maps, tilesets, layers, object groups)
//! - Layer payloads in XML, CSV and base64 (raw, gzip or zlib)
//! - GID resolution to tileset-relative ids with flip flags
//! - Per-layer tileset detection (empty, single tileset, mixed)
//!
//! ## Tile Layout
//!
//! Every layer decodes to `width * height` tiles in row-major order; the tile
//! at (x, y) is `layer.decoded_tiles[y * width + x]`. A decoded tile refers to
//! its tileset by index into [`Map::tilesets`].
//!
//! ```rust,no_run
//! use tmxkit::{DecodeOptions, MapLoader};
//!
//! # fn example() -> tmxkit::Result<()> {
//! let map = MapLoader::load_file("levels/town.tmx", &DecodeOptions::default())?;
//! for layer in &map.layers {
//!     if let Some(tileset) = map.layer_tileset(layer) {
//!         println!("{} uses {}", layer.name, tileset.name);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod compression;
pub mod data;
pub mod tiles;
pub mod layer;
pub mod map;
pub mod objects;
pub mod parser;

pub use error::{TmxError, Result};
pub use compression::Compression;
pub use data::{Data, DataTile, Encoding};
pub use tiles::{resolve_gid, DecodedTile};
pub use layer::{classify_tilesets, Layer, LayerTilesets};
pub use map::{DecodeOptions, Image, Map, Property, Tile, Tileset};
pub use objects::{decode_points, Object, ObjectGroup, PolyLine, Polygon};
pub use parser::MapLoader;

pub use tmxkit_core::{
    Gid, Point, TileId, TilesetOrder, GID_DIAGONAL_FLIP, GID_FLIP, GID_HORIZONTAL_FLIP, GID_MASK,
    GID_VERTICAL_FLIP,
};
