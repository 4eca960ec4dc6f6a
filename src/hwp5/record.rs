//! Record framing for HWP 5.0 streams.
//!
//! HWP 5.0 uses a TLV (Tag-Length-Value) record format with 4-byte headers.
//! The framer hands out bounded payload slices and always advances by
//! `header + declared size`, whatever a payload decoder later makes of the
//! bytes, so a decoder that misreads one record can never shift the next.

use crate::diagnostic::{DiagnosticKind, Diagnostics};
use crate::error::{Result, StructuralError};
use bytes::Bytes;

/// Tag IDs for HWP 5.0 records.
/// Based on HWPTAG_BEGIN = 0x10 (16)
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagId {
    // DocInfo tags (0x10 - 0x20)
    DocumentProperties = 16,
    IdMappings = 17,
    BinData = 18,
    FaceName = 19,
    BorderFill = 20,
    CharShape = 21,
    TabDef = 22,
    Numbering = 23,
    Bullet = 24,
    ParaShape = 25,
    Style = 26,
    DocData = 27,
    DistributeDocData = 28,
    CompatibleDocument = 30,
    LayoutCompatibility = 31,
    TrackChange = 32,

    // BodyText tags (0x42 = 66+)
    ParaHeader = 66,
    ParaText = 67,
    ParaCharShape = 68,
    ParaLineSeg = 69,
    ParaRangeTag = 70,
    CtrlHeader = 71,
    ListHeader = 72,
    PageDef = 73,
    FootnoteShape = 74,
    PageBorderFill = 75,

    // Extended control tags (0x4C = 76+)
    ShapeComponent = 76,
    Table = 77,
    ShapeComponentLine = 78,
    ShapeComponentRectangle = 79,
    ShapeComponentEllipse = 80,
    ShapeComponentArc = 81,
    ShapeComponentPolygon = 82,
    ShapeComponentCurve = 83,
    ShapeComponentOle = 84,
    ShapeComponentPicture = 85,
    ShapeComponentContainer = 86,
    CtrlData = 87,
    EqEdit = 88,
    ShapeComponentTextArt = 90,
    FormObject = 91,
    MemoShape = 92,
    MemoList = 93,
    ForbiddenChar = 94,
    ChartData = 95,
    TrackChangeContent = 96,
    TrackChangeAuthor = 97,
    VideoData = 98,
    ShapeComponentUnknown = 115,

    // Unknown tag
    Unknown = 0xFFFF,
}

impl From<u16> for TagId {
    fn from(value: u16) -> Self {
        match value {
            // DocInfo tags
            16 => TagId::DocumentProperties,
            17 => TagId::IdMappings,
            18 => TagId::BinData,
            19 => TagId::FaceName,
            20 => TagId::BorderFill,
            21 => TagId::CharShape,
            22 => TagId::TabDef,
            23 => TagId::Numbering,
            24 => TagId::Bullet,
            25 => TagId::ParaShape,
            26 => TagId::Style,
            27 => TagId::DocData,
            28 => TagId::DistributeDocData,
            30 => TagId::CompatibleDocument,
            31 => TagId::LayoutCompatibility,
            32 => TagId::TrackChange,
            // BodyText tags
            66 => TagId::ParaHeader,
            67 => TagId::ParaText,
            68 => TagId::ParaCharShape,
            69 => TagId::ParaLineSeg,
            70 => TagId::ParaRangeTag,
            71 => TagId::CtrlHeader,
            72 => TagId::ListHeader,
            73 => TagId::PageDef,
            74 => TagId::FootnoteShape,
            75 => TagId::PageBorderFill,
            // Extended control tags
            76 => TagId::ShapeComponent,
            77 => TagId::Table,
            78 => TagId::ShapeComponentLine,
            79 => TagId::ShapeComponentRectangle,
            80 => TagId::ShapeComponentEllipse,
            81 => TagId::ShapeComponentArc,
            82 => TagId::ShapeComponentPolygon,
            83 => TagId::ShapeComponentCurve,
            84 => TagId::ShapeComponentOle,
            85 => TagId::ShapeComponentPicture,
            86 => TagId::ShapeComponentContainer,
            87 => TagId::CtrlData,
            88 => TagId::EqEdit,
            90 => TagId::ShapeComponentTextArt,
            91 => TagId::FormObject,
            92 => TagId::MemoShape,
            93 => TagId::MemoList,
            94 => TagId::ForbiddenChar,
            95 => TagId::ChartData,
            96 => TagId::TrackChangeContent,
            97 => TagId::TrackChangeAuthor,
            98 => TagId::VideoData,
            115 => TagId::ShapeComponentUnknown,
            _ => TagId::Unknown,
        }
    }
}

/// Record header structure.
///
/// Layout (32 bits little-endian):
/// - Bits 0-9: Tag ID (0-1023)
/// - Bits 10-19: Level (nesting depth)
/// - Bits 20-31: Size (0-4095, or 0xFFF for extended)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Tag ID identifying the record type
    pub tag_id: u16,
    /// Nesting level
    pub level: u16,
    /// Data size in bytes
    pub size: u32,
}

impl RecordHeader {
    /// Size of a standard record header in bytes.
    pub const SIZE: usize = 4;
    /// Size of a header carrying the extended size word.
    pub const EXTENDED_SIZE: usize = 8;
    /// Extended size sentinel value.
    pub const EXTENDED_SIZE_SENTINEL: u32 = 0xFFF;

    /// Parses a record header from bytes.
    ///
    /// Returns the header and the number of bytes consumed (4 or 8 for extended).
    /// `offset` is only used for error reporting.
    pub fn parse(data: &[u8], offset: u64) -> Result<(Self, usize)> {
        let truncated = |needed: usize| StructuralError::TruncatedStream {
            offset,
            declared: needed as u64,
            available: data.len() as u64,
        };

        if data.len() < Self::SIZE {
            return Err(truncated(Self::SIZE).into());
        }

        let header_value = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);

        let tag_id = (header_value & 0x3FF) as u16;
        let level = ((header_value >> 10) & 0x3FF) as u16;
        let size_field = (header_value >> 20) & 0xFFF;

        let (size, consumed) = if size_field == Self::EXTENDED_SIZE_SENTINEL {
            // Extended size: next 4 bytes contain actual size
            if data.len() < Self::EXTENDED_SIZE {
                return Err(truncated(Self::EXTENDED_SIZE).into());
            }
            let extended_size = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
            (extended_size, Self::EXTENDED_SIZE)
        } else {
            (size_field, Self::SIZE)
        };

        Ok((
            Self {
                tag_id,
                level,
                size,
            },
            consumed,
        ))
    }

    /// Returns the tag ID as an enum.
    pub fn tag(&self) -> TagId {
        TagId::from(self.tag_id)
    }
}

/// One framed record: header plus its bounded payload.
#[derive(Debug, Clone)]
pub struct RawRecord {
    /// Record header
    pub header: RecordHeader,
    /// Offset in the stream where the header starts
    pub offset: u64,
    /// Encoded header length (4 or 8)
    pub header_len: usize,
    /// Record payload, exactly `header.size` bytes
    pub payload: Bytes,
}

impl RawRecord {
    /// Returns the tag ID.
    pub fn tag(&self) -> TagId {
        self.header.tag()
    }

    /// Returns the nesting level.
    pub fn level(&self) -> u16 {
        self.header.level
    }

    /// Returns the declared payload size.
    pub fn size(&self) -> u32 {
        self.header.size
    }

    /// Offset of the first payload byte in the stream.
    pub fn payload_offset(&self) -> u64 {
        self.offset + self.header_len as u64
    }

    /// Offset just past this record.
    pub fn end_offset(&self) -> u64 {
        self.payload_offset() + self.header.size as u64
    }
}

/// Iterator over records in a stream.
///
/// Stops after the first framing error; a stream whose framing is broken has no
/// safe resynchronization point.
pub struct RecordIterator {
    data: Bytes,
    position: usize,
    failed: bool,
}

impl RecordIterator {
    /// Creates a new record iterator.
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            position: 0,
            failed: false,
        }
    }

    /// Returns the current position in the stream.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns true if there are more records to read.
    pub fn has_more(&self) -> bool {
        !self.failed && self.position + RecordHeader::SIZE <= self.data.len()
    }

    /// Bytes after the last record too short to hold a header.
    pub fn trailing_bytes(&self) -> usize {
        if self.failed {
            0
        } else {
            self.data.len().saturating_sub(self.position)
        }
    }
}

impl Iterator for RecordIterator {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_more() {
            return None;
        }

        let offset = self.position as u64;

        let (header, header_len) = match RecordHeader::parse(&self.data[self.position..], offset)
        {
            Ok(h) => h,
            Err(e) => {
                self.failed = true;
                return Some(Err(e));
            }
        };

        let start = self.position + header_len;
        let end = start as u64 + header.size as u64;
        if end > self.data.len() as u64 {
            self.failed = true;
            return Some(Err(StructuralError::TruncatedStream {
                offset,
                declared: header.size as u64,
                available: (self.data.len() - start.min(self.data.len())) as u64,
            }
            .into()));
        }

        let end = end as usize;
        let payload = self.data.slice(start..end);
        self.position = end;

        Some(Ok(RawRecord {
            header,
            offset,
            header_len,
            payload,
        }))
    }
}

/// Frames a whole stream, failing on the first truncated record.
pub fn frame_stream(data: Bytes, diags: &mut Diagnostics) -> Result<Vec<RawRecord>> {
    let mut iter = RecordIterator::new(data);
    let mut records = Vec::new();
    for record in iter.by_ref() {
        records.push(record?);
    }
    let trailing = iter.trailing_bytes();
    if trailing > 0 {
        diags.push(
            DiagnosticKind::SizeMismatch,
            iter.position() as u64,
            format!("{trailing} trailing bytes after last record"),
        );
    }
    Ok(records)
}

/// A record together with the records nested under it by level.
#[derive(Debug, Clone)]
pub struct RecordNode {
    pub record: RawRecord,
    pub children: Vec<RecordNode>,
}

impl RecordNode {
    /// Creates a leaf node.
    pub fn new(record: RawRecord) -> Self {
        Self {
            record,
            children: Vec::new(),
        }
    }

    /// Returns the tag ID.
    pub fn tag(&self) -> TagId {
        self.record.tag()
    }

    /// Offset of the node's header.
    pub fn offset(&self) -> u64 {
        self.record.offset
    }

    /// Offset just past the node and all of its descendants.
    pub fn end_offset(&self) -> u64 {
        self.children
            .last()
            .map(RecordNode::end_offset)
            .unwrap_or_else(|| self.record.end_offset())
    }

    /// Framed length of the node and all of its descendants.
    pub fn framed_len(&self) -> u64 {
        self.end_offset() - self.offset()
    }
}

/// Nests records by level: a record is a child of the closest preceding record
/// one level up.
///
/// A level jump of more than one is attached to the current parent and reported.
pub fn build_tree(records: Vec<RawRecord>, diags: &mut Diagnostics) -> Vec<RecordNode> {
    let mut roots = Vec::new();
    let mut stack: Vec<RecordNode> = Vec::new();

    fn attach(node: RecordNode, stack: &mut [RecordNode], roots: &mut Vec<RecordNode>) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }

    for record in records {
        let level = record.level();
        while stack.last().is_some_and(|top| top.record.level() >= level) {
            if let Some(done) = stack.pop() {
                attach(done, &mut stack, &mut roots);
            }
        }

        let expected = stack.last().map(|top| top.record.level() + 1).unwrap_or(0);
        if level != expected {
            diags.push(
                DiagnosticKind::UnexpectedRecord,
                record.offset,
                format!(
                    "tag {} at level {} where level {} was expected",
                    record.header.tag_id, level, expected
                ),
            );
        }
        stack.push(RecordNode::new(record));
    }

    while let Some(done) = stack.pop() {
        attach(done, &mut stack, &mut roots);
    }
    roots
}
