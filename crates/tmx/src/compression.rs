//! Base64 payload decoding with optional gzip/zlib decompression

use crate::{Result, TmxError};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use flate2::read::{MultiGzDecoder, ZlibDecoder};
use std::io::Read;

/// Compression applied to a base64 layer payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Zlib,
}

impl Compression {
    /// Map a `compression` attribute to a method
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "" => Ok(Self::None),
            "gzip" => Ok(Self::Gzip),
            "zlib" => Ok(Self::Zlib),
            _ => Err(TmxError::UnknownCompression),
        }
    }
}

/// Decode a base64 blob and decompress it according to `tag`
///
/// Surrounding whitespace is trimmed and line breaks inside the blob are
/// skipped. Codec errors are returned as-is.
pub fn decode_base64(raw: &[u8], tag: &str) -> Result<Vec<u8>> {
    let method = Compression::from_tag(tag)?;

    let text: Vec<u8> = raw
        .trim_ascii()
        .iter()
        .copied()
        .filter(|&b| b != b'\n' && b != b'\r')
        .collect();
    let data = BASE64.decode(&text)?;
    tracing::trace!(encoded = text.len(), decoded = data.len(), ?method, "base64 payload decoded");

    decompress(&data, method)
}

/// Decompress data using the specified method
pub fn decompress(data: &[u8], method: Compression) -> Result<Vec<u8>> {
    match method {
        Compression::None => Ok(data.to_vec()),
        Compression::Gzip => {
            let mut decoder = MultiGzDecoder::new(data);
            let mut decompressed = Vec::new();
            decoder.read_to_end(&mut decompressed)?;
            Ok(decompressed)
        }
        Compression::Zlib => {
            let mut decoder = ZlibDecoder::new(data);
            let mut decompressed = Vec::new();
            decoder.read_to_end(&mut decompressed)?;
            Ok(decompressed)
        }
    }
}
