//! HWPTAG_PARA_SHAPE: paragraph formatting.

use crate::error::Result;
use crate::hwp5::bits::BitField;
use crate::hwp5::cursor::FieldReader;
use crate::hwp5::header::since;
use crate::model::{
    Alignment, BreakLatinWord, HeadShape, LineSpacingType, ParaAttributes, ParaShape,
    ParaVerticalAlign,
};

/// First property word layout (UINT32).
pub mod layout {
    use super::BitField;

    pub const LINE_SPACING_TYPE: BitField = BitField::new("line_spacing_type", 0, 2);
    pub const ALIGNMENT: BitField = BitField::new("alignment", 2, 3);
    pub const BREAK_LATIN_WORD: BitField = BitField::new("break_latin_word", 5, 2);
    pub const BREAK_NON_LATIN_WORD: BitField = BitField::new("break_non_latin_word", 7, 1);
    pub const SNAP_TO_GRID: BitField = BitField::new("snap_to_grid", 8, 1);
    pub const CONDENSE: BitField = BitField::new("condense", 9, 7);
    pub const WIDOW_ORPHAN: BitField = BitField::new("widow_orphan", 16, 1);
    pub const KEEP_WITH_NEXT: BitField = BitField::new("keep_with_next", 17, 1);
    pub const KEEP_LINES: BitField = BitField::new("keep_lines", 18, 1);
    pub const PAGE_BREAK_BEFORE: BitField = BitField::new("page_break_before", 19, 1);
    pub const VERTICAL_ALIGN: BitField = BitField::new("vertical_align", 20, 2);
    pub const FONT_LINE_HEIGHT: BitField = BitField::new("font_line_height", 22, 1);
    pub const HEAD_SHAPE: BitField = BitField::new("head_shape", 23, 2);
    pub const LEVEL: BitField = BitField::new("level", 25, 3);
    pub const CONNECT_BORDER: BitField = BitField::new("connect_border", 28, 1);
    pub const IGNORE_MARGIN: BitField = BitField::new("ignore_margin", 29, 1);
    pub const TAIL_SHAPE: BitField = BitField::new("tail_shape", 30, 1);

    pub const ALL: &[BitField] = &[
        LINE_SPACING_TYPE,
        ALIGNMENT,
        BREAK_LATIN_WORD,
        BREAK_NON_LATIN_WORD,
        SNAP_TO_GRID,
        CONDENSE,
        WIDOW_ORPHAN,
        KEEP_WITH_NEXT,
        KEEP_LINES,
        PAGE_BREAK_BEFORE,
        VERTICAL_ALIGN,
        FONT_LINE_HEIGHT,
        HEAD_SHAPE,
        LEVEL,
        CONNECT_BORDER,
        IGNORE_MARGIN,
        TAIL_SHAPE,
    ];
}

pub fn decode_para_shape(r: &mut FieldReader<'_>) -> Result<ParaShape> {
    let property1 = r.read_u32()?;
    let left_margin = r.read_i32()?;
    let right_margin = r.read_i32()?;
    let indent = r.read_i32()?;
    let top_spacing = r.read_i32()?;
    let bottom_spacing = r.read_i32()?;
    let line_spacing_old = r.read_i32()?;
    let tab_def_id = r.read_u16()?;
    let numbering_id = r.read_u16()?;
    let border_fill_id = r.read_u16()?;

    let mut border_offsets = [0i16; 4];
    for offset in &mut border_offsets {
        *offset = r.read_i16()?;
    }

    let property2 = r.optional(since::PARA_SHAPE_PROPERTY2, 4, |r| r.read_u32())?;
    // property3 and the line spacing value were added together.
    let (property3, line_spacing) = match r.optional(since::PARA_SHAPE_LINE_SPACING, 8, |r| {
        Ok((r.read_u32()?, r.read_u32()?))
    })? {
        Some((p3, spacing)) => (Some(p3), Some(spacing)),
        None => (None, None),
    };

    Ok(ParaShape {
        property1,
        attributes: decode_attributes(property1),
        left_margin,
        right_margin,
        indent,
        top_spacing,
        bottom_spacing,
        line_spacing_old,
        tab_def_id,
        numbering_id,
        border_fill_id,
        border_offsets,
        property2,
        property3,
        line_spacing,
    })
}

fn decode_attributes(value: u32) -> ParaAttributes {
    ParaAttributes {
        line_spacing_type: LineSpacingType::from_code(layout::LINE_SPACING_TYPE.get(value)),
        alignment: Alignment::from_code(layout::ALIGNMENT.get(value)),
        break_latin_word: BreakLatinWord::from_code(layout::BREAK_LATIN_WORD.get(value)),
        break_non_latin_word: layout::BREAK_NON_LATIN_WORD.flag(value),
        snap_to_grid: layout::SNAP_TO_GRID.flag(value),
        condense: layout::CONDENSE.get_u8(value),
        widow_orphan: layout::WIDOW_ORPHAN.flag(value),
        keep_with_next: layout::KEEP_WITH_NEXT.flag(value),
        keep_lines: layout::KEEP_LINES.flag(value),
        page_break_before: layout::PAGE_BREAK_BEFORE.flag(value),
        vertical_align: ParaVerticalAlign::from_code(layout::VERTICAL_ALIGN.get(value)),
        font_line_height: layout::FONT_LINE_HEIGHT.flag(value),
        head_shape: HeadShape::from_code(layout::HEAD_SHAPE.get(value)),
        level: layout::LEVEL.get_u8(value),
        connect_border: layout::CONNECT_BORDER.flag(value),
        ignore_margin: layout::IGNORE_MARGIN.flag(value),
        tail_shape: layout::TAIL_SHAPE.flag(value),
    }
}
