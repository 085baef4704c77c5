//! Tile layers
//!
//! A layer covers the whole map grid. After decoding it holds one
//! [`DecodedTile`] per cell, addressed row-major (`y * width + x`).

use crate::data::Data;
use crate::map::Property;
use crate::tiles::DecodedTile;
use serde::Serialize;

/// A `<layer>` element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub name: String,
    pub opacity: f32,
    pub visible: bool,
    pub properties: Vec<Property>,

    /// Undecoded payload
    pub data: Data,

    /// Decoded cells, `width * height` of them
    #[serde(skip)]
    pub decoded_tiles: Vec<DecodedTile>,

    /// Index of the only tileset this layer uses.
    /// Unset for empty layers and layers mixing tilesets.
    pub tileset: Option<usize>,

    /// Set when every cell is the nil tile
    pub empty: bool,
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            name: String::new(),
            opacity: 1.0,
            visible: true,
            properties: Vec::new(),
            data: Data::default(),
            decoded_tiles: Vec::new(),
            tileset: None,
            empty: false,
        }
    }
}

/// Which tilesets a layer's cells refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerTilesets {
    /// Every cell is nil
    Empty,
    /// All non-nil cells share one tileset
    Single(usize),
    /// At least two tilesets are referenced
    Multiple,
}

/// Classify decoded cells by the tilesets they reference
///
/// Stops scanning at the first cell whose tileset differs from an earlier one.
pub fn classify_tilesets(tiles: &[DecodedTile]) -> LayerTilesets {
    let mut current = None;

    for tileset in tiles.iter().filter_map(|tile| tile.tileset) {
        match current {
            None => current = Some(tileset),
            Some(seen) if seen != tileset => return LayerTilesets::Multiple,
            Some(_) => {}
        }
    }

    match current {
        None => LayerTilesets::Empty,
        Some(tileset) => LayerTilesets::Single(tileset),
    }
}

impl Layer {
    /// Store decoded cells and derive the `empty`/`tileset` annotations
    pub fn set_decoded_tiles(&mut self, tiles: Vec<DecodedTile>) {
        let class = classify_tilesets(&tiles);
        self.decoded_tiles = tiles;
        self.apply(class);
    }

    /// Set annotations from a classification. `Multiple` leaves both unset.
    pub fn apply(&mut self, class: LayerTilesets) {
        match class {
            LayerTilesets::Empty => {
                self.empty = true;
                self.tileset = None;
            }
            LayerTilesets::Single(tileset) => {
                self.empty = false;
                self.tileset = Some(tileset);
            }
            LayerTilesets::Multiple => {
                tracing::trace!(layer = %self.name, "layer uses multiple tilesets");
                self.empty = false;
                self.tileset = None;
            }
        }
    }

    /// Get the decoded cell at (x, y) on a map `width` cells wide
    #[inline]
    pub fn tile_at(&self, x: usize, y: usize, width: usize) -> Option<&DecodedTile> {
        if x >= width {
            return None;
        }
        let index = y.checked_mul(width)?.checked_add(x)?;
        self.decoded_tiles.get(index)
    }

    /// Whether the layer has been decoded
    pub fn is_decoded(&self) -> bool {
        !self.decoded_tiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(tileset: usize) -> DecodedTile {
        DecodedTile {
            tileset: Some(tileset),
            ..DecodedTile::NIL
        }
    }

    const NIL: DecodedTile = DecodedTile::NIL;

    #[test]
    fn test_single_tileset_with_gaps() {
        let tiles = [NIL, tile(0), tile(0), NIL];
        assert_eq!(classify_tilesets(&tiles), LayerTilesets::Single(0));
    }

    #[test]
    fn test_all_nil_is_empty() {
        assert_eq!(classify_tilesets(&[NIL, NIL, NIL]), LayerTilesets::Empty);
        assert_eq!(classify_tilesets(&[]), LayerTilesets::Empty);
    }

    #[test]
    fn test_multiple_tilesets() {
        assert_eq!(classify_tilesets(&[tile(0), tile(1)]), LayerTilesets::Multiple);
        assert_eq!(
            classify_tilesets(&[NIL, tile(2), tile(2), tile(1), tile(2)]),
            LayerTilesets::Multiple
        );
    }

    #[test]
    fn test_annotations() {
        let mut layer = Layer::default();
        layer.set_decoded_tiles(vec![NIL, tile(3), NIL, tile(3)]);
        assert!(!layer.empty);
        assert_eq!(layer.tileset, Some(3));

        let mut layer = Layer::default();
        layer.set_decoded_tiles(vec![NIL; 4]);
        assert!(layer.empty);
        assert_eq!(layer.tileset, None);

        let mut layer = Layer::default();
        layer.set_decoded_tiles(vec![tile(0), tile(1)]);
        assert!(!layer.empty);
        assert_eq!(layer.tileset, None);
        assert_eq!(layer.decoded_tiles.len(), 2);
    }

    #[test]
    fn test_tile_at_row_major() {
        let mut layer = Layer::default();
        let tiles = (0..6)
            .map(|i| DecodedTile { id: i, ..tile(0) })
            .collect();
        layer.set_decoded_tiles(tiles);

        // 3 x 2 grid
        assert_eq!(layer.tile_at(0, 0, 3).map(|t| t.id), Some(0));
        assert_eq!(layer.tile_at(2, 0, 3).map(|t| t.id), Some(2));
        assert_eq!(layer.tile_at(1, 1, 3).map(|t| t.id), Some(4));
        assert!(layer.tile_at(3, 0, 3).is_none());
        assert!(layer.tile_at(0, 2, 3).is_none());
    }

    #[test]
    fn test_tile_at_huge_coordinates() {
        let mut layer = Layer::default();
        layer.set_decoded_tiles(vec![tile(0); 4]);

        assert!(layer.tile_at(0, usize::MAX, 2).is_none());
        assert!(layer.tile_at(usize::MAX - 1, 1, usize::MAX).is_none());
    }
}
