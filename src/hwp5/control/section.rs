//! Section definition (`secd`) with its page records, and column definition
//! (`cold`).

use super::children::Children;
use crate::diagnostic::DiagnosticKind;
use crate::error::Result;
use crate::hwp5::bits::BitField;
use crate::hwp5::cursor::FieldReader;
use crate::hwp5::dispatch::DecodeContext;
use crate::hwp5::docinfo::border_fill::read_border_line;
use crate::hwp5::header::since;
use crate::hwp5::record::{RecordNode, TagId};
use crate::model::{
    ColumnDef, ColumnDirection, ColumnKind, ColumnWidth, NoteShape, NumberShape, PageBorderFill,
    PageDef, PageMargins, SectionDef, TextDirection,
};

use super::common::read_margins;

pub mod layout {
    use super::BitField;

    pub const HIDE_HEADER: BitField = BitField::new("hide_header", 0, 1);
    pub const HIDE_FOOTER: BitField = BitField::new("hide_footer", 1, 1);
    pub const HIDE_MASTER_PAGE: BitField = BitField::new("hide_master_page", 2, 1);
    pub const HIDE_BORDER: BitField = BitField::new("hide_border", 3, 1);
    pub const HIDE_FILL: BitField = BitField::new("hide_fill", 4, 1);
    pub const HIDE_PAGE_NUMBER: BitField = BitField::new("hide_page_number", 5, 1);
    pub const TEXT_DIRECTION: BitField = BitField::new("text_direction", 16, 3);

    pub const ALL: &[BitField] = &[
        HIDE_HEADER,
        HIDE_FOOTER,
        HIDE_MASTER_PAGE,
        HIDE_BORDER,
        HIDE_FILL,
        HIDE_PAGE_NUMBER,
        TEXT_DIRECTION,
    ];
}

pub mod page_layout {
    use super::BitField;

    pub const LANDSCAPE: BitField = BitField::new("landscape", 0, 1);
    pub const GUTTER_TYPE: BitField = BitField::new("gutter_type", 1, 2);

    pub const ALL: &[BitField] = &[LANDSCAPE, GUTTER_TYPE];
}

pub mod note_layout {
    use super::BitField;

    pub const NUMBER_SHAPE: BitField = BitField::new("number_shape", 0, 8);
    pub const PLACEMENT: BitField = BitField::new("placement", 8, 2);
    pub const NUMBERING: BitField = BitField::new("numbering", 10, 2);
    pub const SUPERSCRIPT: BitField = BitField::new("superscript", 12, 1);
    pub const CONTINUE_TEXT: BitField = BitField::new("continue_text", 13, 1);

    pub const ALL: &[BitField] = &[NUMBER_SHAPE, PLACEMENT, NUMBERING, SUPERSCRIPT, CONTINUE_TEXT];
}

pub mod border_layout {
    use super::BitField;

    pub const RELATIVE_TO_PAPER: BitField = BitField::new("relative_to_paper", 0, 1);
    pub const INCLUDE_HEADER: BitField = BitField::new("include_header", 1, 1);
    pub const INCLUDE_FOOTER: BitField = BitField::new("include_footer", 2, 1);
    pub const FILL_AREA: BitField = BitField::new("fill_area", 3, 2);

    pub const ALL: &[BitField] = &[RELATIVE_TO_PAPER, INCLUDE_HEADER, INCLUDE_FOOTER, FILL_AREA];
}

pub mod column_layout {
    use super::BitField;

    pub const KIND: BitField = BitField::new("kind", 0, 2);
    pub const COUNT: BitField = BitField::new("count", 2, 8);
    pub const DIRECTION: BitField = BitField::new("direction", 10, 2);
    pub const SAME_WIDTH: BitField = BitField::new("same_width", 12, 1);

    pub const ALL: &[BitField] = &[KIND, COUNT, DIRECTION, SAME_WIDTH];
}

/// Reads a `secd` body and takes its page definition, note shape and page
/// border fill children.
pub fn decode_section_def(
    r: &mut FieldReader<'_>,
    children: &mut Children<'_>,
    ctx: &mut DecodeContext<'_>,
) -> Result<SectionDef> {
    let property = r.read_u32()?;
    let mut def = SectionDef {
        property,
        hide_header: layout::HIDE_HEADER.flag(property),
        hide_footer: layout::HIDE_FOOTER.flag(property),
        hide_master_page: layout::HIDE_MASTER_PAGE.flag(property),
        hide_border: layout::HIDE_BORDER.flag(property),
        hide_fill: layout::HIDE_FILL.flag(property),
        hide_page_number: layout::HIDE_PAGE_NUMBER.flag(property),
        text_direction: TextDirection::from_code(layout::TEXT_DIRECTION.get(property)),
        column_gap: r.read_u16()?,
        vertical_grid: r.read_u16()?,
        horizontal_grid: r.read_u16()?,
        default_tab_stop: r.read_u32()?,
        numbering_para_shape_id: r.read_u16()?,
        page_start: r.read_u16()?,
        figure_start: r.read_u16()?,
        table_start: r.read_u16()?,
        equation_start: r.read_u16()?,
        language: r.optional(since::SECTION_LANGUAGE, 2, |r| r.read_u16())?,
        ..Default::default()
    };
    // Reserved bytes written by newer versions.
    r.rest();

    while let Some(tag) = children.peek_tag() {
        let node = match tag {
            TagId::PageDef | TagId::FootnoteShape | TagId::PageBorderFill => children.next(),
            _ => None,
        };
        let Some(node) = node else {
            break;
        };
        read_page_record(node, &mut def, ctx)?;
    }
    Ok(def)
}

fn read_page_record(
    node: &RecordNode,
    def: &mut SectionDef,
    ctx: &mut DecodeContext<'_>,
) -> Result<()> {
    let mut r = ctx.reader(&node.record);
    match node.tag() {
        TagId::PageDef => {
            if def.page_def.is_some() {
                ctx.diag(DiagnosticKind::Inconsistent, node.offset(), "second PAGE_DEF");
            }
            def.page_def = Some(decode_page_def(&mut r)?);
        }
        TagId::FootnoteShape => {
            let shape = decode_note_shape(&mut r)?;
            if def.footnote_shape.is_none() {
                def.footnote_shape = Some(shape);
            } else if def.endnote_shape.is_none() {
                def.endnote_shape = Some(shape);
            } else {
                ctx.diag(DiagnosticKind::Inconsistent, node.offset(), "third FOOTNOTE_SHAPE");
            }
        }
        _ => {
            def.page_border_fills.push(decode_page_border_fill(&mut r)?);
            if def.page_border_fills.len() > 3 {
                ctx.diag(
                    DiagnosticKind::Inconsistent,
                    node.offset(),
                    "more than three PAGE_BORDER_FILL records",
                );
            }
        }
    }
    ctx.check_consumed(&node.record, &r);
    Ok(())
}

pub fn decode_page_def(r: &mut FieldReader<'_>) -> Result<PageDef> {
    let width = r.read_u32()?;
    let height = r.read_u32()?;
    let margins = PageMargins {
        left: r.read_u32()?,
        right: r.read_u32()?,
        top: r.read_u32()?,
        bottom: r.read_u32()?,
        header: r.read_u32()?,
        footer: r.read_u32()?,
        gutter: r.read_u32()?,
    };
    let property = r.read_u32()?;
    Ok(PageDef {
        width,
        height,
        margins,
        property,
        landscape: page_layout::LANDSCAPE.flag(property),
        gutter_type: page_layout::GUTTER_TYPE.get_u8(property),
    })
}

/// Reads FOOTNOTE_SHAPE.
///
/// The divider length is a u16 in the published layout and a u32 in most
/// files; the record length tells them apart.
pub fn decode_note_shape(r: &mut FieldReader<'_>) -> Result<NoteShape> {
    let property = r.read_u32()?;
    let user_symbol = r.read_wchar()?;
    let prefix = r.read_wchar()?;
    let suffix = r.read_wchar()?;
    let start_number = r.read_u16()?;
    let divider_length = if r.has(16) {
        r.read_u32()?
    } else {
        r.read_u16()? as u32
    };

    Ok(NoteShape {
        property,
        number_shape: NumberShape::from_code(note_layout::NUMBER_SHAPE.get(property)),
        placement: note_layout::PLACEMENT.get_u8(property),
        numbering: note_layout::NUMBERING.get_u8(property),
        superscript: note_layout::SUPERSCRIPT.flag(property),
        continue_text: note_layout::CONTINUE_TEXT.flag(property),
        user_symbol,
        prefix,
        suffix,
        start_number,
        divider_length,
        divider_above: r.read_u16()?,
        divider_below: r.read_u16()?,
        note_spacing: r.read_u16()?,
        divider: read_border_line(r)?,
    })
}

pub fn decode_page_border_fill(r: &mut FieldReader<'_>) -> Result<PageBorderFill> {
    let property = r.read_u32()?;
    Ok(PageBorderFill {
        property,
        relative_to_paper: border_layout::RELATIVE_TO_PAPER.flag(property),
        include_header: border_layout::INCLUDE_HEADER.flag(property),
        include_footer: border_layout::INCLUDE_FOOTER.flag(property),
        fill_area: border_layout::FILL_AREA.get_u8(property),
        gaps: read_margins(r)?,
        border_fill_id: r.read_u16()?,
    })
}

/// Reads a `cold` body.
///
/// Equal-width columns store one gap; otherwise each column stores its own
/// width and gap.
pub fn decode_column_def(r: &mut FieldReader<'_>) -> Result<ColumnDef> {
    let property = r.read_u16()?;
    let value = property as u32;
    let count = column_layout::COUNT.get_u8(value);
    let same_width = column_layout::SAME_WIDTH.flag(value);

    let mut def = ColumnDef {
        property,
        kind: ColumnKind::from_code(column_layout::KIND.get(value)),
        count,
        direction: ColumnDirection::from_code(column_layout::DIRECTION.get(value)),
        same_width,
        ..Default::default()
    };

    if same_width || count <= 1 {
        def.gap = r.read_u16()?;
    } else {
        for _ in 0..count {
            def.widths.push(ColumnWidth {
                width: r.read_u16()?,
                gap: r.read_u16()?,
            });
        }
    }
    def.property2 = r
        .optional(since::BASELINE, 2, |r| r.read_u16())?
        .unwrap_or_default();
    def.divider = r
        .optional(since::BASELINE, 6, read_border_line)?
        .unwrap_or_default();
    Ok(def)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Diagnostics;
    use crate::hwp5::bits::assert_layout;
    use crate::hwp5::header::Version;
    use crate::hwp5::record::{build_tree, frame_stream};
    use crate::hwp5::test_support::{Payload, RecordWriter};
    use crate::model::LineType;

    fn reader(payload: &[u8]) -> FieldReader<'_> {
        FieldReader::new(payload, 0, Version::new(5, 0, 3, 2))
    }

    #[test]
    fn test_layouts() {
        assert_layout(layout::ALL, 32);
        assert_layout(page_layout::ALL, 32);
        assert_layout(note_layout::ALL, 32);
        assert_layout(border_layout::ALL, 32);
        assert_layout(column_layout::ALL, 16);
    }

    fn note_shape(wide_divider: bool) -> Vec<u8> {
        let payload = Payload::new()
            .u32(3 | (1 << 12))
            .wchar('*')
            .wchar('(')
            .wchar(')')
            .u16(1);
        let payload = if wide_divider {
            payload.u32(12280)
        } else {
            payload.u16(12280)
        };
        payload
            .u16(850)
            .u16(567)
            .u16(283)
            .u8(1)
            .u8(2)
            .u32(0x00FF0000)
            .build()
    }

    #[test]
    fn test_note_shape_divider_width_by_size() {
        for wide in [true, false] {
            let payload = note_shape(wide);
            let mut r = reader(&payload);
            let shape = decode_note_shape(&mut r).unwrap();
            assert_eq!(shape.number_shape, NumberShape::RomanLower);
            assert!(shape.superscript);
            assert_eq!(shape.prefix, '(');
            assert_eq!(shape.divider_length, 12280);
            assert_eq!(shape.note_spacing, 283);
            assert_eq!(shape.divider.line_type, LineType::LongDash);
            assert!(r.is_empty());
        }
    }

    #[test]
    fn test_section_def_with_children() {
        let body = Payload::new()
            .ctrl_id(b"secd")
            .u32(1 | (1 << 5))
            .u16(1134)
            .u16(0)
            .u16(0)
            .u32(8000)
            .u16(0)
            .u16(1)
            .u16(0)
            .u16(0)
            .u16(0)
            .u16(1042)
            .fill(0, 8)
            .build();
        let page = Payload::new()
            .u32(59528)
            .u32(84188)
            .u32(8504)
            .u32(8504)
            .u32(5668)
            .u32(4252)
            .u32(4252)
            .u32(4252)
            .u32(0)
            .u32(1)
            .build();
        let border = Payload::new().u32(1).fill(0, 8).u16(2).build();

        let mut writer = RecordWriter::new();
        writer
            .record(TagId::CtrlHeader, 0, &body)
            .record(TagId::PageDef, 1, &page)
            .record(TagId::FootnoteShape, 1, &note_shape(true))
            .record(TagId::FootnoteShape, 1, &note_shape(true))
            .record(TagId::PageBorderFill, 1, &border)
            .record(TagId::PageBorderFill, 1, &border)
            .record(TagId::PageBorderFill, 1, &border);
        let mut diags = Diagnostics::new("test");
        let nodes = build_tree(frame_stream(writer.finish(), &mut diags).unwrap(), &mut diags);

        let mut ctx = DecodeContext::new(Version::new(5, 0, 3, 2), 64, &mut diags);
        let node = &nodes[0];
        let mut r = ctx.reader(&node.record);
        r.read_u32().unwrap();
        let mut children = Children::new(&node.children);
        let def = decode_section_def(&mut r, &mut children, &mut ctx).unwrap();

        assert!(def.hide_header);
        assert!(def.hide_page_number);
        assert_eq!(def.default_tab_stop, 8000);
        assert_eq!(def.language, Some(1042));
        let page = def.page_def.unwrap();
        assert_eq!(page.width, 59528);
        assert!(page.landscape);
        assert_eq!(page.margins.header, 4252);
        assert!(def.footnote_shape.is_some());
        assert!(def.endnote_shape.is_some());
        assert_eq!(def.page_border_fills.len(), 3);
        assert_eq!(def.page_border_fills[0].border_fill_id, 2);
        assert!(def.page_border_fills[0].relative_to_paper);
        assert_eq!(children.remaining(), 0);
        assert!(diags.is_empty(), "{:?}", diags.entries());
    }

    #[test]
    fn test_column_defs() {
        // Two equal columns.
        let payload = Payload::new()
            .u16(2 << 2 | 1 << 12)
            .u16(1134)
            .u16(0)
            .u8(0)
            .u8(1)
            .u32(0)
            .build();
        let mut r = reader(&payload);
        let def = decode_column_def(&mut r).unwrap();
        assert_eq!(def.count, 2);
        assert!(def.same_width);
        assert_eq!(def.gap, 1134);
        assert_eq!(def.divider.thickness, 1);
        assert!(r.is_empty());

        // Three columns of their own widths, no trailing divider.
        let payload = Payload::new()
            .u16(3 << 2 | 1 << 10)
            .u16(10000)
            .u16(500)
            .u16(12000)
            .u16(500)
            .u16(9000)
            .u16(0)
            .build();
        let mut r = reader(&payload);
        let def = decode_column_def(&mut r).unwrap();
        assert_eq!(def.direction, ColumnDirection::Right);
        assert_eq!(def.widths.len(), 3);
        assert_eq!(def.widths[1].width, 12000);
        assert_eq!(def.property2, 0);
        assert!(r.is_empty());
    }
}
