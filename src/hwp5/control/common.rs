//! Pieces shared by several controls: list headers, paragraph lists, common
//! object properties and captions.

use super::children::Children;
use crate::diagnostic::DiagnosticKind;
use crate::error::Result;
use crate::hwp5::bodytext::decode_paragraph;
use crate::hwp5::cursor::FieldReader;
use crate::hwp5::dispatch::DecodeContext;
use crate::hwp5::header::since;
use crate::hwp5::record::TagId;
use crate::model::{
    Caption, CaptionDirection, HorzRelTo, LineWrap, ListHeader, ListVerticalAlign, Margins,
    ObjectCommon, ParaList, TextDirection, TextWrap, VertRelTo,
};

/// LIST_HEADER property word.
pub mod list_layout {
    use crate::hwp5::bits::BitField;

    pub const TEXT_DIRECTION: BitField = BitField::new("text_direction", 0, 3);
    pub const LINE_WRAP: BitField = BitField::new("line_wrap", 3, 2);
    pub const VERTICAL_ALIGN: BitField = BitField::new("vertical_align", 5, 2);

    pub const ALL: &[BitField] = &[TEXT_DIRECTION, LINE_WRAP, VERTICAL_ALIGN];
}

/// Common object property word.
pub mod object_layout {
    use crate::hwp5::bits::BitField;

    pub const TREAT_AS_CHAR: BitField = BitField::new("treat_as_char", 0, 1);
    pub const AFFECT_LINE_SPACING: BitField = BitField::new("affect_line_spacing", 2, 1);
    pub const VERT_REL_TO: BitField = BitField::new("vert_rel_to", 3, 2);
    pub const VERT_ALIGN: BitField = BitField::new("vert_align", 5, 3);
    pub const HORZ_REL_TO: BitField = BitField::new("horz_rel_to", 8, 2);
    pub const HORZ_ALIGN: BitField = BitField::new("horz_align", 10, 3);
    pub const FLOW_WITH_TEXT: BitField = BitField::new("flow_with_text", 13, 1);
    pub const ALLOW_OVERLAP: BitField = BitField::new("allow_overlap", 14, 1);
    pub const TEXT_WRAP: BitField = BitField::new("text_wrap", 21, 3);

    pub const ALL: &[BitField] = &[
        TREAT_AS_CHAR,
        AFFECT_LINE_SPACING,
        VERT_REL_TO,
        VERT_ALIGN,
        HORZ_REL_TO,
        HORZ_ALIGN,
        FLOW_WITH_TEXT,
        ALLOW_OVERLAP,
        TEXT_WRAP,
    ];
}

/// Caption property word.
pub mod caption_layout {
    use crate::hwp5::bits::BitField;

    pub const DIRECTION: BitField = BitField::new("direction", 0, 2);
    pub const INCLUDE_MARGIN: BitField = BitField::new("include_margin", 2, 1);

    pub const ALL: &[BitField] = &[DIRECTION, INCLUDE_MARGIN];
}

/// Reads the 8-byte LIST_HEADER prefix. Owners append their own fields.
pub fn decode_list_header(r: &mut FieldReader<'_>) -> Result<ListHeader> {
    let para_count = r.read_u16()?;
    r.skip(2)?;
    let property = r.read_u32()?;
    Ok(ListHeader {
        para_count,
        property,
        text_direction: TextDirection::from_code(list_layout::TEXT_DIRECTION.get(property)),
        line_wrap: LineWrap::from_code(list_layout::LINE_WRAP.get(property)),
        vertical_align: ListVerticalAlign::from_code(list_layout::VERTICAL_ALIGN.get(property)),
    })
}

pub fn read_margins(r: &mut FieldReader<'_>) -> Result<Margins> {
    Ok(Margins {
        left: r.read_u16()?,
        right: r.read_u16()?,
        top: r.read_u16()?,
        bottom: r.read_u16()?,
    })
}

/// Reads the placement block at the start of table, shape, equation and form
/// control headers.
pub fn read_object_common(r: &mut FieldReader<'_>) -> Result<ObjectCommon> {
    let property = r.read_u32()?;
    let vertical_offset = r.read_i32()?;
    let horizontal_offset = r.read_i32()?;
    let width = r.read_u32()?;
    let height = r.read_u32()?;
    let z_order = r.read_i32()?;
    let margins = read_margins(r)?;
    let instance_id = r.read_u32()?;
    let prevent_page_break = r.optional(since::BASELINE, 4, |r| r.read_i32())?;
    let description = r.optional_string(since::OBJECT_DESCRIPTION)?;

    use object_layout::*;
    Ok(ObjectCommon {
        property,
        treat_as_char: TREAT_AS_CHAR.flag(property),
        affect_line_spacing: AFFECT_LINE_SPACING.flag(property),
        vert_rel_to: VertRelTo::from_code(VERT_REL_TO.get(property)),
        vert_align: VERT_ALIGN.get_u8(property),
        horz_rel_to: HorzRelTo::from_code(HORZ_REL_TO.get(property)),
        horz_align: HORZ_ALIGN.get_u8(property),
        flow_with_text: FLOW_WITH_TEXT.flag(property),
        allow_overlap: ALLOW_OVERLAP.flag(property),
        text_wrap: TextWrap::from_code(TEXT_WRAP.get(property)),
        vertical_offset,
        horizontal_offset,
        width,
        height,
        z_order,
        margins,
        instance_id,
        prevent_page_break,
        description,
    })
}

/// Takes a LIST_HEADER child and the paragraphs that follow it.
///
/// The paragraphs of a list sit at the same level as its header, so they are
/// taken from the sibling cursor up to the declared count. `read_tail` reads
/// the owner-specific fields after the 8-byte prefix. Returns `None` when the
/// next child is not a list header.
pub fn take_para_list<T>(
    children: &mut Children<'_>,
    ctx: &mut DecodeContext<'_>,
    depth: usize,
    read_tail: impl FnOnce(&mut FieldReader<'_>) -> Result<T>,
) -> Result<Option<(ParaList, T)>> {
    let Some(node) = children.next_if(TagId::ListHeader) else {
        return Ok(None);
    };
    ctx.check_depth(depth, node.offset())?;

    let mut r = ctx.reader(&node.record);
    let header = decode_list_header(&mut r)?;
    let tail = read_tail(&mut r)?;
    ctx.check_consumed(&node.record, &r);

    let declared = header.para_count as usize;
    let mut paragraphs = Vec::with_capacity(declared);
    // Some writers nest the paragraphs one level down instead.
    for child in &node.children {
        if child.tag() == TagId::ParaHeader {
            paragraphs.push(decode_paragraph(child, ctx, depth + 1)?);
        } else {
            ctx.diag(
                DiagnosticKind::UnexpectedRecord,
                child.offset(),
                format!("{:?} under LIST_HEADER", child.tag()),
            );
        }
    }
    while paragraphs.len() < declared {
        let Some(para) = children.next_if(TagId::ParaHeader) else {
            break;
        };
        paragraphs.push(decode_paragraph(para, ctx, depth + 1)?);
    }

    if paragraphs.len() != declared {
        ctx.diag(
            DiagnosticKind::Inconsistent,
            node.offset(),
            format!(
                "list declares {} paragraphs, {} present",
                declared,
                paragraphs.len()
            ),
        );
    }
    Ok(Some((ParaList { header, paragraphs }, tail)))
}

/// Reads the caption fields that follow a caption's list header prefix.
///
/// Old writers emit a bare prefix; the fields then keep their defaults.
pub fn read_caption_tail(r: &mut FieldReader<'_>) -> Result<Caption> {
    let mut caption = Caption::default();
    if !r.has(14) {
        return Ok(caption);
    }
    let property = r.read_u32()?;
    caption.property = property;
    caption.direction = CaptionDirection::from_code(caption_layout::DIRECTION.get(property));
    caption.include_margin = caption_layout::INCLUDE_MARGIN.flag(property);
    caption.width = r.read_u32()?;
    caption.gap = r.read_u16()?;
    caption.max_text_width = r.read_u32()?;
    // Reserved trailing bytes.
    r.rest();
    Ok(caption)
}

/// Takes a caption list if one comes next.
pub fn take_caption(
    children: &mut Children<'_>,
    ctx: &mut DecodeContext<'_>,
    depth: usize,
) -> Result<Option<Caption>> {
    Ok(
        take_para_list(children, ctx, depth, read_caption_tail)?.map(|(list, mut caption)| {
            caption.list = list;
            caption
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Diagnostics;
    use crate::hwp5::bits::assert_layout;
    use crate::hwp5::header::Version;
    use crate::hwp5::record::{build_tree, frame_stream};
    use crate::hwp5::test_support::{Payload, RecordWriter};

    #[test]
    fn test_layouts() {
        assert_layout(list_layout::ALL, 32);
        assert_layout(object_layout::ALL, 32);
        assert_layout(caption_layout::ALL, 32);
    }

    #[test]
    fn test_object_common() {
        let property = 1 | (2 << 3) | (3 << 8) | (1 << 14) | (2 << 21);
        let payload = Payload::new()
            .u32(property)
            .i32(-100)
            .i32(200)
            .u32(8000)
            .u32(4000)
            .i32(3)
            .u16(1)
            .u16(2)
            .u16(3)
            .u16(4)
            .u32(77)
            .i32(0)
            .string("그림")
            .build();
        let mut r = FieldReader::new(&payload, 0, Version::new(5, 0, 2, 5));
        let common = read_object_common(&mut r).unwrap();

        assert!(common.treat_as_char);
        assert_eq!(common.vert_rel_to, VertRelTo::Para);
        assert_eq!(common.horz_rel_to, HorzRelTo::Para);
        assert!(common.allow_overlap);
        assert_eq!(common.text_wrap, TextWrap::BehindText);
        assert_eq!(common.vertical_offset, -100);
        assert_eq!(common.margins.bottom, 4);
        assert_eq!(common.instance_id, 77);
        assert_eq!(common.description.as_deref(), Some("그림"));
        assert!(r.is_empty());

        // Before 5.0.2.5 the description is not read.
        let mut r = FieldReader::new(&payload, 0, Version::new(5, 0, 2, 4));
        let common = read_object_common(&mut r).unwrap();
        assert_eq!(common.prevent_page_break, Some(0));
        assert_eq!(common.description, None);
        assert!(!r.is_empty());
    }

    #[test]
    fn test_list_header_property() {
        let payload = Payload::new().list_header(3, 1 | (1 << 3) | (2 << 5)).build();
        let mut r = FieldReader::new(&payload, 0, Version::new(5, 0, 3, 2));
        let header = decode_list_header(&mut r).unwrap();
        assert_eq!(header.para_count, 3);
        assert_eq!(header.text_direction, TextDirection::Vertical);
        assert_eq!(header.line_wrap, LineWrap::Squeeze);
        assert_eq!(header.vertical_align, ListVerticalAlign::Bottom);
    }

    #[test]
    fn test_take_para_list_stops_at_declared_count() {
        let mut writer = RecordWriter::new();
        writer
            .record(TagId::ListHeader, 0, &Payload::new().list_header(2, 0).build())
            .paragraph(0, "one")
            .paragraph(0, "two")
            .paragraph(0, "three");
        let mut diags = Diagnostics::new("test");
        let nodes = build_tree(frame_stream(writer.finish(), &mut diags).unwrap(), &mut diags);

        let mut ctx = DecodeContext::new(Version::new(5, 0, 3, 2), 64, &mut diags);
        let mut children = Children::new(&nodes);
        let (list, ()) = take_para_list(&mut children, &mut ctx, 1, |_| Ok(()))
            .unwrap()
            .unwrap();
        assert_eq!(list.plain_text(), "one\ntwo");
        assert_eq!(children.remaining(), 1);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_short_list_reported() {
        let mut writer = RecordWriter::new();
        writer
            .record(TagId::ListHeader, 0, &Payload::new().list_header(2, 0).build())
            .paragraph(0, "only");
        let mut diags = Diagnostics::new("test");
        let nodes = build_tree(frame_stream(writer.finish(), &mut diags).unwrap(), &mut diags);

        let mut ctx = DecodeContext::new(Version::new(5, 0, 3, 2), 64, &mut diags);
        let mut children = Children::new(&nodes);
        let (list, _) = take_para_list(&mut children, &mut ctx, 1, |_| Ok(()))
            .unwrap()
            .unwrap();
        assert_eq!(list.paragraphs.len(), 1);
        assert_eq!(diags.count(DiagnosticKind::Inconsistent), 1);
    }

    #[test]
    fn test_caption_tail() {
        let payload = Payload::new()
            .list_header(0, 0)
            .u32(3 | 4)
            .u32(5000)
            .u16(850)
            .u32(30000)
            .fill(0, 2)
            .build();
        let mut r = FieldReader::new(&payload, 0, Version::new(5, 0, 3, 2));
        decode_list_header(&mut r).unwrap();
        let caption = read_caption_tail(&mut r).unwrap();
        assert_eq!(caption.direction, CaptionDirection::Bottom);
        assert!(caption.include_margin);
        assert_eq!(caption.gap, 850);
        assert!(r.is_empty());
    }
}
