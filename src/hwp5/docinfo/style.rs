//! HWPTAG_STYLE and HWPTAG_MEMO_SHAPE.

use crate::error::Result;
use crate::hwp5::bits::BitField;
use crate::hwp5::cursor::FieldReader;
use crate::model::{ColorRef, MemoShape, Style, StyleKind};

const KIND: BitField = BitField::new("kind", 0, 3);

pub fn decode_style(r: &mut FieldReader<'_>) -> Result<Style> {
    let name = r.read_string()?;
    let english_name = r.read_string()?;
    let property = r.read_u8()?;
    let next_style_id = r.read_u8()?;
    let language_id = r.read_i16()?;
    let para_shape_id = r.read_u16()?;
    let char_shape_id = r.read_u16()?;
    let lock_form = if r.has(2) {
        Some(r.read_u16()?)
    } else {
        None
    };

    Ok(Style {
        name,
        english_name,
        property,
        kind: StyleKind::from_code(KIND.get(property as u32)),
        next_style_id,
        language_id,
        para_shape_id,
        char_shape_id,
        lock_form,
    })
}

pub fn decode_memo_shape(r: &mut FieldReader<'_>) -> Result<MemoShape> {
    Ok(MemoShape {
        width: r.read_u32()?,
        line_type: r.read_u8()?,
        line_width: r.read_u8()?,
        line_color: ColorRef(r.read_u32()?),
        fill_color: ColorRef(r.read_u32()?),
        active_color: ColorRef(r.read_u32()?),
        memo_type: if r.has(4) { Some(r.read_u32()?) } else { None },
    })
}
