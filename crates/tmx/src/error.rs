//! Error types for the tmx crate

/// Map decoding errors
///
/// Every variant is terminal for the document being decoded. Codec and
/// number-parsing failures are wrapped transparently so the original cause
/// reaches the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum TmxError {
    /// Layer data declares an encoding we don't know
    #[error("tmx: invalid encoding scheme")]
    UnknownEncoding,

    /// Base64 layer data declares a compression we don't know
    #[error("tmx: invalid compression method")]
    UnknownCompression,

    /// Decoded cell count differs from width * height
    #[error("tmx: invalid decoded data length")]
    InvalidDecodedDataLen,

    /// Identifier precedes every tileset's first GID
    #[error("tmx: invalid GID")]
    InvalidGid,

    /// Polygon or polyline points are not `x,y` pairs
    #[error("tmx: invalid points string")]
    InvalidPointsField,

    /// Attribute holds a value outside its allowed set
    #[error("tmx: invalid value {value:?} for attribute '{name}'")]
    InvalidAttribute { name: String, value: String },

    /// Required attribute is absent
    #[error("tmx: <{element}> is missing attribute '{name}'")]
    MissingAttribute { element: String, name: String },

    /// Document structure is not a map
    #[error("tmx: invalid document: {0}")]
    InvalidDocument(String),

    #[error(transparent)]
    Base64(#[from] base64::DecodeError),

    /// Decompression stream or file error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    ParseInt(#[from] std::num::ParseIntError),

    #[error(transparent)]
    ParseFloat(#[from] std::num::ParseFloatError),

    #[error(transparent)]
    Xml(#[from] roxmltree::Error),

    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),
}

/// Result type for map decoding
pub type Result<T> = std::result::Result<T, TmxError>;
