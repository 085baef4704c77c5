//! Layer payload decoding
//!
//! A layer's `<data>` element stores one GID per grid cell in one of three
//! encodings:
//! - **XML**: one `<tile gid="..."/>` child per cell (no `encoding` attribute)
//! - **CSV**: comma separated decimal values
//! - **Base64**: little-endian u32 values, optionally gzip or zlib compressed
//!
//! Whatever the encoding, the decoded sequence must hold exactly
//! `width * height` identifiers in row-major order.

use crate::compression;
use crate::{Result, TmxError};
use serde::Serialize;
use tmxkit_core::Gid;

/// Declared encoding of a layer payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Xml,
    Csv,
    Base64,
}

impl Encoding {
    /// Map an `encoding` attribute to a scheme
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "" => Ok(Self::Xml),
            "csv" => Ok(Self::Csv),
            "base64" => Ok(Self::Base64),
            _ => Err(TmxError::UnknownEncoding),
        }
    }
}

/// Raw `<data>` element of a tile layer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Data {
    /// `encoding` attribute, empty for XML tiles
    pub encoding: String,

    /// `compression` attribute, only meaningful for base64
    pub compression: String,

    /// Text content of the element
    #[serde(skip)]
    pub raw_data: Vec<u8>,

    /// `<tile>` children, only used by the XML encoding
    #[serde(skip)]
    pub tiles: Vec<DataTile>,
}

/// A `<tile>` entry inside XML-encoded layer data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataTile {
    pub gid: Gid,
}

impl Data {
    /// Decode this payload into one GID per cell of a `width` x `height` grid
    pub fn decode_gids(&self, width: usize, height: usize) -> Result<Vec<Gid>> {
        let expected = width
            .checked_mul(height)
            .ok_or(TmxError::InvalidDecodedDataLen)?;

        let gids = match Encoding::from_tag(&self.encoding)? {
            Encoding::Xml => self.decode_xml(),
            Encoding::Csv => self.decode_csv()?,
            Encoding::Base64 => self.decode_base64(expected)?,
        };

        if gids.len() != expected {
            tracing::debug!(
                expected,
                actual = gids.len(),
                encoding = %self.encoding,
                "decoded layer data has wrong length"
            );
            return Err(TmxError::InvalidDecodedDataLen);
        }

        Ok(gids)
    }

    fn decode_xml(&self) -> Vec<Gid> {
        self.tiles.iter().map(|tile| tile.gid).collect()
    }

    /// Parse comma separated values, ignoring anything but digits and commas
    fn decode_csv(&self) -> Result<Vec<Gid>> {
        let cleaned: String = self
            .raw_data
            .iter()
            .filter(|b| b.is_ascii_digit() || **b == b',')
            .map(|&b| b as char)
            .collect();

        cleaned
            .split(',')
            .map(|token| token.parse::<u32>().map(Gid).map_err(TmxError::from))
            .collect()
    }

    /// Decode base64 bytes, four little-endian bytes per cell
    fn decode_base64(&self, expected: usize) -> Result<Vec<Gid>> {
        let bytes = compression::decode_base64(&self.raw_data, &self.compression)?;
        let expected_bytes = expected
            .checked_mul(4)
            .ok_or(TmxError::InvalidDecodedDataLen)?;

        if bytes.len() != expected_bytes {
            tracing::debug!(
                expected_bytes,
                actual_bytes = bytes.len(),
                "base64 layer data has wrong byte length"
            );
            return Err(TmxError::InvalidDecodedDataLen);
        }

        Ok(bytes
            .chunks_exact(4)
            .map(|chunk| Gid(u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])))
            .collect())
    }
}
