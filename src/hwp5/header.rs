//! FileHeader parsing and format versions for HWP 5.0 documents.

use crate::error::{Error, Result};
use serde::Serialize;

/// HWP 5.0 file header signature.
const HWP_SIGNATURE: &[u8] = b"HWP Document File";

/// FileHeader size is always 256 bytes.
const FILE_HEADER_SIZE: usize = 256;

/// Property flags bit positions.
mod flags {
    /// Document streams are deflate-compressed
    pub const COMPRESSED: u32 = 1 << 0;
    /// Document is password encrypted
    pub const ENCRYPTED: u32 = 1 << 1;
    /// Document is a distribution document
    pub const DISTRIBUTION: u32 = 1 << 2;
    /// Script present
    pub const SCRIPT: u32 = 1 << 3;
    /// DRM protected
    pub const DRM: u32 = 1 << 4;
    /// XML template storage
    pub const XML_TEMPLATE: u32 = 1 << 5;
    /// Document history present
    pub const HISTORY: u32 = 1 << 6;
    /// Digital signature present
    pub const SIGNATURE: u32 = 1 << 7;
    /// Change tracking enabled
    pub const TRACK_CHANGES: u32 = 1 << 14;
}

/// HWP 5.0 FileHeader structure.
#[derive(Debug, Clone, Serialize)]
pub struct FileHeader {
    /// Document version (major.minor.build.revision)
    pub version: Version,
    /// Property flags
    pub properties: u32,
    /// License flags (second property word)
    pub license: u32,
}

impl FileHeader {
    /// Parses a FileHeader from raw bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < FILE_HEADER_SIZE {
            return Err(Error::InvalidData(format!(
                "FileHeader too small: {} bytes, expected {}",
                data.len(),
                FILE_HEADER_SIZE
            )));
        }

        // Signature occupies the first 32 bytes, null-padded
        if !data[..17].eq(HWP_SIGNATURE) {
            return Err(Error::InvalidData("Invalid HWP signature".into()));
        }

        // Version at offset 32, stored as [revision, build, minor, major]
        let version = Version::from_u32(u32::from_le_bytes([
            data[32], data[33], data[34], data[35],
        ]));
        if version.major != 5 {
            return Err(Error::UnsupportedFormat(format!("HWP {}", version)));
        }

        let properties = u32::from_le_bytes([data[36], data[37], data[38], data[39]]);
        let license = u32::from_le_bytes([data[40], data[41], data[42], data[43]]);

        Ok(Self {
            version,
            properties,
            license,
        })
    }

    /// Creates a header for an uncompressed document of the given version.
    pub fn new(version: Version) -> Self {
        Self {
            version,
            properties: 0,
            license: 0,
        }
    }

    /// Returns true if the document streams are compressed.
    pub fn is_compressed(&self) -> bool {
        self.properties & flags::COMPRESSED != 0
    }

    /// Returns true if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.properties & flags::ENCRYPTED != 0
    }

    /// Returns true if the document is a distribution document.
    pub fn is_distribution(&self) -> bool {
        self.properties & flags::DISTRIBUTION != 0
    }

    /// Returns true if the document has DRM protection.
    pub fn is_drm_protected(&self) -> bool {
        self.properties & flags::DRM != 0
    }

    /// Returns true if scripts are present.
    pub fn has_scripts(&self) -> bool {
        self.properties & flags::SCRIPT != 0
    }

    /// Returns true if the document stores an XML template.
    pub fn has_xml_template(&self) -> bool {
        self.properties & flags::XML_TEMPLATE != 0
    }

    /// Returns true if document history is stored.
    pub fn has_history(&self) -> bool {
        self.properties & flags::HISTORY != 0
    }

    /// Returns true if the document is digitally signed.
    pub fn has_signature(&self) -> bool {
        self.properties & flags::SIGNATURE != 0
    }

    /// Returns true if change tracking is enabled.
    pub fn has_track_changes(&self) -> bool {
        self.properties & flags::TRACK_CHANGES != 0
    }
}

/// HWP document version.
///
/// Ordering compares major, minor, build, revision in turn, which is how every
/// version gate in the decoders is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub build: u8,
    pub revision: u8,
}

impl Version {
    /// Creates a new version.
    pub const fn new(major: u8, minor: u8, build: u8, revision: u8) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Decodes the 32-bit on-disk form (`0xMMnnPPrr`).
    pub const fn from_u32(value: u32) -> Self {
        Self::new(
            (value >> 24) as u8,
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        )
    }

    /// Returns the 32-bit on-disk form.
    pub const fn to_u32(self) -> u32 {
        (self.major as u32) << 24
            | (self.minor as u32) << 16
            | (self.build as u32) << 8
            | self.revision as u32
    }

    /// Decodes the packed-decimal shorthand, e.g. `5032` for 5.0.3.2.
    pub const fn from_packed(value: u16) -> Self {
        Self::new(
            (value / 1000 % 10) as u8,
            (value / 100 % 10) as u8,
            (value / 10 % 10) as u8,
            (value % 10) as u8,
        )
    }

    /// Returns the packed-decimal shorthand; components above 9 saturate.
    pub fn to_packed(self) -> u16 {
        let digit = |v: u8| v.min(9) as u16;
        digit(self.major) * 1000 + digit(self.minor) * 100 + digit(self.build) * 10
            + digit(self.revision)
    }

    /// Returns true if this version is at least the specified version.
    pub fn at_least(&self, major: u8, minor: u8, build: u8, revision: u8) -> bool {
        *self >= Version::new(major, minor, build, revision)
    }
}

impl Default for Version {
    fn default() -> Self {
        since::BASELINE
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// First versions at which optional trailing fields appear.
///
/// A field listed here is read only when the document version reaches the gate
/// *and* the record still has room for it.
pub mod since {
    use super::Version;

    /// Oldest HWP 5 layout; fields gated here are length-guarded only.
    pub const BASELINE: Version = Version::new(5, 0, 0, 0);
    /// Table zone (valid area) list.
    pub const TABLE_ZONES: Version = Version::new(5, 0, 1, 0);
    /// Section definition default language.
    pub const SECTION_LANGUAGE: Version = Version::new(5, 0, 1, 5);
    /// Paragraph shape second property word.
    pub const PARA_SHAPE_PROPERTY2: Version = Version::new(5, 0, 1, 7);
    /// CharShape border/fill id; IdMappings memo shape count.
    pub const CHAR_SHAPE_BORDER_FILL: Version = Version::new(5, 0, 2, 1);
    /// IdMappings memo shape count.
    pub const MEMO_SHAPES: Version = Version::new(5, 0, 2, 1);
    /// Paragraph shape line spacing (property3 + value); numbering per-level starts.
    pub const PARA_SHAPE_LINE_SPACING: Version = Version::new(5, 0, 2, 5);
    /// Numbering per-level start numbers.
    pub const NUMBERING_LEVEL_STARTS: Version = Version::new(5, 0, 2, 5);
    /// Object description text in common object properties; picture effects.
    pub const OBJECT_DESCRIPTION: Version = Version::new(5, 0, 2, 5);
    /// CharShape strike-out color.
    pub const CHAR_SHAPE_STRIKE_COLOR: Version = Version::new(5, 0, 3, 0);
    /// Change-tracking counts in IdMappings; paragraph merge flag.
    pub const TRACK_CHANGES: Version = Version::new(5, 0, 3, 2);
    /// Numbering levels 8–10.
    pub const NUMBERING_EXTENDED_LEVELS: Version = Version::new(5, 1, 0, 0);

    /// Every gate with its name, oldest first.
    pub const ALL: &[(&str, Version)] = &[
        ("BASELINE", BASELINE),
        ("TABLE_ZONES", TABLE_ZONES),
        ("SECTION_LANGUAGE", SECTION_LANGUAGE),
        ("PARA_SHAPE_PROPERTY2", PARA_SHAPE_PROPERTY2),
        ("CHAR_SHAPE_BORDER_FILL", CHAR_SHAPE_BORDER_FILL),
        ("MEMO_SHAPES", MEMO_SHAPES),
        ("PARA_SHAPE_LINE_SPACING", PARA_SHAPE_LINE_SPACING),
        ("NUMBERING_LEVEL_STARTS", NUMBERING_LEVEL_STARTS),
        ("OBJECT_DESCRIPTION", OBJECT_DESCRIPTION),
        ("CHAR_SHAPE_STRIKE_COLOR", CHAR_SHAPE_STRIKE_COLOR),
        ("TRACK_CHANGES", TRACK_CHANGES),
        ("NUMBERING_EXTENDED_LEVELS", NUMBERING_EXTENDED_LEVELS),
    ];
}
