//! Tag-id dispatch for self-contained records.
//!
//! Every record whose meaning does not depend on its parent is decoded here into
//! a [`Record`]. Records the decoder does not model come back as
//! [`Record::Opaque`] with their bytes intact; the caller never sees an error for
//! an unknown tag.

use super::bodytext::{layout, para_header};
use super::control::{common, param};
use super::cursor::FieldReader;
use super::docinfo::{
    bin_data, border_fill, char_shape, face_name, numbering, para_shape, properties, style,
    tab_def,
};
use super::header::Version;
use super::record::{RawRecord, TagId};
use crate::diagnostic::{DiagnosticKind, Diagnostics};
use crate::error::{Error, Result, StructuralError};
use crate::model::{
    BinDataItem, BorderFill, Bullet, CharShape, CharShapeRange, CompatibleDocument, CtrlId,
    DocumentProperties, FaceName, IdMappings, LayoutCompatibility, LineSeg, ListHeader,
    MemoShape, Numbering, OpaqueRecord, ParaHeader, ParaShape, ParameterSet, RangeTag, Style,
    TabDef,
};
use bytes::Bytes;

/// One decoded record.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    DocumentProperties(DocumentProperties),
    IdMappings(IdMappings),
    BinData(BinDataItem),
    FaceName(FaceName),
    BorderFill(BorderFill),
    CharShape(CharShape),
    TabDef(TabDef),
    Numbering(Numbering),
    Bullet(Bullet),
    ParaShape(ParaShape),
    Style(Style),
    DocData(ParameterSet),
    CompatibleDocument(CompatibleDocument),
    LayoutCompatibility(LayoutCompatibility),
    MemoShape(MemoShape),
    ParaHeader(ParaHeader),
    /// Raw UTF-16 units of the paragraph text.
    ParaText(Vec<u16>),
    ParaCharShape(Vec<CharShapeRange>),
    ParaLineSeg(Vec<LineSeg>),
    ParaRangeTag(Vec<RangeTag>),
    /// Control header with its id split off; the body is decoded per control.
    CtrlHeader { id: CtrlId, body: Bytes },
    ListHeader(ListHeader),
    Opaque(OpaqueRecord),
}

/// Per-stream decoding state threaded through every decoder.
///
/// Holds nothing shared: each stream (and each section decoded on its own thread)
/// gets its own context and diagnostics sink.
#[derive(Debug)]
pub struct DecodeContext<'d> {
    version: Version,
    max_depth: usize,
    diags: &'d mut Diagnostics,
}

impl<'d> DecodeContext<'d> {
    pub fn new(version: Version, max_depth: usize, diags: &'d mut Diagnostics) -> Self {
        Self {
            version,
            max_depth,
            diags,
        }
    }

    /// Document version driving the optional-field gates.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Diagnostics sink of the stream being decoded.
    pub fn diags(&mut self) -> &mut Diagnostics {
        self.diags
    }

    /// Opens a field reader over one record's payload.
    pub fn reader<'r>(&self, record: &'r RawRecord) -> FieldReader<'r> {
        FieldReader::new(&record.payload, record.payload_offset(), self.version)
    }

    /// Records a non-fatal finding.
    pub fn diag(&mut self, kind: DiagnosticKind, offset: u64, message: impl Into<String>) {
        self.diags.push(kind, offset, message);
    }

    /// Reports bytes a decoder left unread in its record.
    pub fn check_consumed(&mut self, record: &RawRecord, reader: &FieldReader<'_>) {
        let consumed = reader.position();
        let declared = record.payload.len();
        if consumed < declared {
            self.diags.push(
                DiagnosticKind::SizeMismatch,
                record.offset,
                format!(
                    "{:?}: consumed {} of {} bytes",
                    record.tag(),
                    consumed,
                    declared
                ),
            );
        }
    }

    /// Fails once recursion goes past the configured nesting limit.
    pub fn check_depth(&self, depth: usize, offset: u64) -> Result<()> {
        if depth > self.max_depth {
            return Err(StructuralError::NestingTooDeep {
                offset,
                depth,
                limit: self.max_depth,
            }
            .into());
        }
        Ok(())
    }
}

/// Wraps a record's bytes as an opaque value.
pub fn opaque_record(record: &RawRecord) -> OpaqueRecord {
    OpaqueRecord {
        tag_id: record.header.tag_id,
        level: record.level(),
        offset: record.offset,
        size: record.size(),
        data: record.payload.clone(),
    }
}

/// Decodes one record by tag id.
///
/// Unknown tags and constructs that are recognized but not modeled become
/// [`Record::Opaque`] plus a diagnostic. Only structural faults are errors.
pub fn decode_record(record: &RawRecord, ctx: &mut DecodeContext<'_>) -> Result<Record> {
    let mut reader = ctx.reader(record);
    match decode_payload(record.tag(), &mut reader) {
        Ok(Some(decoded)) => {
            ctx.check_consumed(record, &reader);
            Ok(decoded)
        }
        Ok(None) => {
            let (kind, what) = match record.tag() {
                TagId::Unknown => (DiagnosticKind::UnknownTag, "unknown tag"),
                _ => (DiagnosticKind::UnexpectedRecord, "record out of context"),
            };
            ctx.diag(
                kind,
                record.offset,
                format!("{} {} skipped", what, record.header.tag_id),
            );
            Ok(Record::Opaque(opaque_record(record)))
        }
        Err(Error::Unsupported(what)) => {
            ctx.diag(DiagnosticKind::Unsupported, record.offset, what);
            Ok(Record::Opaque(opaque_record(record)))
        }
        Err(err) => Err(err),
    }
}

fn decode_payload(tag: TagId, r: &mut FieldReader<'_>) -> Result<Option<Record>> {
    let record = match tag {
        TagId::DocumentProperties => {
            Record::DocumentProperties(properties::decode_document_properties(r)?)
        }
        TagId::IdMappings => Record::IdMappings(properties::decode_id_mappings(r)?),
        TagId::BinData => Record::BinData(bin_data::decode_bin_data(r)?),
        TagId::FaceName => Record::FaceName(face_name::decode_face_name(r)?),
        TagId::BorderFill => Record::BorderFill(border_fill::decode_border_fill(r)?),
        TagId::CharShape => Record::CharShape(char_shape::decode_char_shape(r)?),
        TagId::TabDef => Record::TabDef(tab_def::decode_tab_def(r)?),
        TagId::Numbering => Record::Numbering(numbering::decode_numbering(r)?),
        TagId::Bullet => Record::Bullet(numbering::decode_bullet(r)?),
        TagId::ParaShape => Record::ParaShape(para_shape::decode_para_shape(r)?),
        TagId::Style => Record::Style(style::decode_style(r)?),
        TagId::DocData => Record::DocData(param::read_parameter_set(r, 0)?),
        TagId::CompatibleDocument => {
            Record::CompatibleDocument(properties::decode_compatible_document(r)?)
        }
        TagId::LayoutCompatibility => {
            Record::LayoutCompatibility(properties::decode_layout_compatibility(r)?)
        }
        TagId::MemoShape => Record::MemoShape(style::decode_memo_shape(r)?),
        TagId::ParaHeader => Record::ParaHeader(para_header::decode_para_header(r)?),
        TagId::ParaText => Record::ParaText(layout::decode_para_text(r)?),
        TagId::ParaCharShape => Record::ParaCharShape(layout::decode_char_shape_ranges(r)?),
        TagId::ParaLineSeg => Record::ParaLineSeg(layout::decode_line_segs(r)?),
        TagId::ParaRangeTag => Record::ParaRangeTag(layout::decode_range_tags(r)?),
        TagId::CtrlHeader => Record::CtrlHeader {
            id: CtrlId(r.read_u32()?),
            body: Bytes::copy_from_slice(r.rest()),
        },
        TagId::ListHeader => Record::ListHeader(common::decode_list_header(r)?),
        TagId::DistributeDocData => {
            return Err(Error::Unsupported("distribution document data".into()))
        }
        TagId::TrackChange | TagId::TrackChangeContent | TagId::TrackChangeAuthor => {
            return Err(Error::Unsupported("change tracking record".into()))
        }
        TagId::ForbiddenChar => {
            return Err(Error::Unsupported("forbidden character table".into()))
        }
        TagId::ChartData => return Err(Error::Unsupported("chart data".into())),
        TagId::ShapeComponentUnknown => {
            return Err(Error::Unsupported("unknown shape component".into()))
        }
        _ => return Ok(None),
    };
    Ok(Some(record))
}
