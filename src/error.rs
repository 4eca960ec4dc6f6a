//! Error types for hwpdec.

use std::io;
use thiserror::Error;

/// Result type alias for hwpdec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for hwpdec.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The file format is recognized but not decoded by this crate (HWPX, HWP 3.x).
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The document is encrypted and cannot be decoded.
    #[error("Document is encrypted")]
    Encrypted,

    /// The document is a distribution document whose body is encrypted.
    #[error("Document is a restricted distribution document")]
    DistributionRestricted,

    /// OLE container error.
    #[error("OLE container error: {0}")]
    OleContainer(String),

    /// Decompression error.
    #[error("Decompression error: {0}")]
    Decompression(String),

    /// The stream cannot be decoded any further.
    #[error("Structural error: {0}")]
    Structural(#[from] StructuralError),

    /// A recognized construct whose decoding is intentionally not modeled.
    #[error("Unsupported construct: {0}")]
    Unsupported(String),

    /// Invalid or malformed data outside the record streams.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Required stream is missing.
    #[error("Missing required component: {0}")]
    MissingComponent(String),

    /// Text encoding error.
    #[error("Text encoding error: {0}")]
    Encoding(String),
}

impl Error {
    /// Returns true for errors that stop decoding of the current stream.
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::Structural(_))
    }

    /// Returns true for recognized-but-unmodeled constructs.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported(_))
    }
}

/// Faults after which a stream cannot be decoded safely.
///
/// Offsets are absolute byte positions within the stream being decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// A field read ran past the end of its record payload.
    #[error("read of {needed} bytes at offset {offset} exceeds payload ({available} left)")]
    UnexpectedEof {
        offset: u64,
        needed: usize,
        available: usize,
    },

    /// A record declares more payload than the stream holds.
    #[error("record at offset {offset} declares {declared} bytes but only {available} remain")]
    TruncatedStream {
        offset: u64,
        declared: u64,
        available: u64,
    },

    /// A bounded control run did not end with its introducer.
    #[error("control 0x{introducer:02X} at unit {position} terminated by 0x{found:04X}")]
    MalformedControl {
        position: usize,
        introducer: u16,
        found: u16,
    },

    /// A bounded control run was cut off by the end of the text.
    #[error("control 0x{introducer:02X} at unit {position} is cut off by end of text")]
    TruncatedControl { position: usize, introducer: u16 },

    /// Paragraph text blob is not a whole number of UTF-16 units.
    #[error("paragraph text at offset {offset} has odd length {len}")]
    OddTextLength { offset: u64, len: usize },

    /// A container's child count runs past its declared region.
    #[error("container at offset {offset} declares {declared} children, region holds {found}")]
    ContainerOverrun {
        offset: u64,
        declared: usize,
        found: usize,
    },

    /// A record that must follow another is absent.
    #[error("{parent} at offset {offset} is missing {expected}")]
    MissingChild {
        offset: u64,
        parent: &'static str,
        expected: &'static str,
    },

    /// Object nesting exceeds the configured limit.
    #[error("nesting depth {depth} at offset {offset} exceeds limit {limit}")]
    NestingTooDeep { offset: u64, depth: usize, limit: usize },

    /// A length or count field is out of range for its payload.
    #[error("{what} at offset {offset} has invalid length {value}")]
    InvalidLength {
        offset: u64,
        what: &'static str,
        value: i64,
    },
}

impl From<std::string::FromUtf16Error> for Error {
    fn from(err: std::string::FromUtf16Error) -> Self {
        Error::Encoding(err.to_string())
    }
}
