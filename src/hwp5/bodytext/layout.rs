//! Fixed-size arrays attached to a paragraph: text units, char shape positions,
//! line segments and range tags.

use crate::error::{Result, StructuralError};
use crate::hwp5::cursor::FieldReader;
use crate::model::{CharShapeRange, LineSeg, RangeTag};

const CHAR_SHAPE_RANGE_SIZE: usize = 8;
const LINE_SEG_SIZE: usize = 36;
const RANGE_TAG_SIZE: usize = 12;

/// Reads the paragraph text as raw UTF-16 units.
pub fn decode_para_text(r: &mut FieldReader<'_>) -> Result<Vec<u16>> {
    let len = r.remaining();
    if len % 2 != 0 {
        return Err(StructuralError::OddTextLength {
            offset: r.offset(),
            len,
        }
        .into());
    }
    r.read_units(len / 2)
}

pub fn decode_char_shape_ranges(r: &mut FieldReader<'_>) -> Result<Vec<CharShapeRange>> {
    let mut ranges = Vec::with_capacity(r.remaining() / CHAR_SHAPE_RANGE_SIZE);
    while r.has(CHAR_SHAPE_RANGE_SIZE) {
        ranges.push(CharShapeRange {
            start: r.read_u32()?,
            shape_id: r.read_u32()?,
        });
    }
    Ok(ranges)
}

pub fn decode_line_segs(r: &mut FieldReader<'_>) -> Result<Vec<LineSeg>> {
    let mut segs = Vec::with_capacity(r.remaining() / LINE_SEG_SIZE);
    while r.has(LINE_SEG_SIZE) {
        segs.push(LineSeg {
            text_start: r.read_u32()?,
            vertical_pos: r.read_i32()?,
            line_height: r.read_i32()?,
            text_height: r.read_i32()?,
            baseline_gap: r.read_i32()?,
            line_spacing: r.read_i32()?,
            column_start: r.read_i32()?,
            segment_width: r.read_i32()?,
            flags: r.read_u32()?,
        });
    }
    Ok(segs)
}

pub fn decode_range_tags(r: &mut FieldReader<'_>) -> Result<Vec<RangeTag>> {
    let mut tags = Vec::with_capacity(r.remaining() / RANGE_TAG_SIZE);
    while r.has(RANGE_TAG_SIZE) {
        tags.push(RangeTag {
            start: r.read_u32()?,
            end: r.read_u32()?,
            tag: r.read_u32()?,
        });
    }
    Ok(tags)
}
