//! Format detection by leading magic bytes.
//!
//! Only HWP 5.0 is decoded; the other Hangul formats are recognized so callers
//! get [`Error::UnsupportedFormat`] instead of a container error.

use crate::error::{Error, Result};
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// OLE compound file magic (HWP 5.x)
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// ZIP local file header magic (HWPX)
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// ASCII signature opening an HWP 3.x file
const HWP3_SIGNATURE: &[u8] = b"HWP Document File V";

/// Bytes inspected by detection.
const PROBE_LEN: usize = 32;

/// Hangul document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// HWP 5.0+ binary format (OLE container)
    Hwp5,
    /// HWPX XML-based format (ZIP container)
    Hwpx,
    /// Legacy HWP 3.x format
    Hwp3,
}

impl FormatType {
    /// Returns true if this crate decodes the format.
    pub fn is_supported(self) -> bool {
        self == FormatType::Hwp5
    }

    /// Fails with [`Error::UnsupportedFormat`] unless the format is decoded.
    pub fn ensure_supported(self) -> Result<Self> {
        if self.is_supported() {
            Ok(self)
        } else {
            Err(Error::UnsupportedFormat(self.to_string()))
        }
    }
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Hwp5 => write!(f, "HWP 5.0"),
            FormatType::Hwpx => write!(f, "HWPX"),
            FormatType::Hwp3 => write!(f, "HWP 3.x"),
        }
    }
}

/// Detects the format of a file.
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Result<FormatType> {
    let mut file = std::fs::File::open(path)?;
    detect_format(&mut file)
}

/// Detects the format from a reader and rewinds it.
pub fn detect_format<R: Read + Seek>(reader: &mut R) -> Result<FormatType> {
    let mut probe = Vec::with_capacity(PROBE_LEN);
    reader.seek(SeekFrom::Start(0))?;
    reader.by_ref().take(PROBE_LEN as u64).read_to_end(&mut probe)?;
    reader.seek(SeekFrom::Start(0))?;
    detect_format_from_bytes(&probe)
}

/// Detects the format from the leading bytes of a document.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<FormatType> {
    if data.len() < OLE_MAGIC.len() {
        return Err(Error::InvalidData(format!(
            "{} bytes is too short to identify",
            data.len()
        )));
    }

    if data.starts_with(&OLE_MAGIC) {
        Ok(FormatType::Hwp5)
    } else if data.starts_with(&ZIP_MAGIC) {
        Ok(FormatType::Hwpx)
    } else if data.starts_with(HWP3_SIGNATURE) {
        Ok(FormatType::Hwp3)
    } else {
        Err(Error::UnknownFormat)
    }
}
