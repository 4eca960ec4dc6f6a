//! HWPTAG_CHAR_SHAPE: character formatting.
//!
//! Fixed part is 68 bytes; the border/fill id and strike-out color follow in
//! newer files.

use crate::error::Result;
use crate::hwp5::bits::BitField;
use crate::hwp5::cursor::FieldReader;
use crate::hwp5::header::since;
use crate::model::{
    CharAttributes, CharShape, ColorRef, LineType, OutlineType, ShadowType, UnderlineType,
};

/// Property word layout (UINT32).
pub mod layout {
    use super::BitField;

    pub const ITALIC: BitField = BitField::new("italic", 0, 1);
    pub const BOLD: BitField = BitField::new("bold", 1, 1);
    pub const UNDERLINE: BitField = BitField::new("underline", 2, 2);
    pub const UNDERLINE_SHAPE: BitField = BitField::new("underline_shape", 4, 4);
    pub const OUTLINE: BitField = BitField::new("outline", 8, 3);
    pub const SHADOW: BitField = BitField::new("shadow", 11, 2);
    pub const EMBOSS: BitField = BitField::new("emboss", 13, 1);
    pub const ENGRAVE: BitField = BitField::new("engrave", 14, 1);
    pub const SUPERSCRIPT: BitField = BitField::new("superscript", 15, 1);
    pub const SUBSCRIPT: BitField = BitField::new("subscript", 16, 1);
    pub const STRIKE_OUT: BitField = BitField::new("strike_out", 18, 3);
    pub const EMPHASIS: BitField = BitField::new("emphasis", 21, 4);
    pub const USE_FONT_SPACE: BitField = BitField::new("use_font_space", 25, 1);
    pub const STRIKE_SHAPE: BitField = BitField::new("strike_shape", 26, 4);
    pub const KERNING: BitField = BitField::new("kerning", 30, 1);

    pub const ALL: &[BitField] = &[
        ITALIC,
        BOLD,
        UNDERLINE,
        UNDERLINE_SHAPE,
        OUTLINE,
        SHADOW,
        EMBOSS,
        ENGRAVE,
        SUPERSCRIPT,
        SUBSCRIPT,
        STRIKE_OUT,
        EMPHASIS,
        USE_FONT_SPACE,
        STRIKE_SHAPE,
        KERNING,
    ];
}

pub fn decode_char_shape(r: &mut FieldReader<'_>) -> Result<CharShape> {
    let mut shape = CharShape::default();

    for id in &mut shape.face_ids {
        *id = r.read_u16()?;
    }
    for ratio in &mut shape.ratios {
        *ratio = r.read_u8()?;
    }
    for spacing in &mut shape.spacings {
        *spacing = r.read_i8()?;
    }
    for size in &mut shape.relative_sizes {
        *size = r.read_u8()?;
    }
    for offset in &mut shape.offsets {
        *offset = r.read_i8()?;
    }

    shape.base_size = r.read_i32()?;
    shape.property = r.read_u32()?;
    shape.attributes = decode_attributes(shape.property);
    shape.shadow_gap_x = r.read_i8()?;
    shape.shadow_gap_y = r.read_i8()?;
    shape.text_color = ColorRef(r.read_u32()?);
    shape.underline_color = ColorRef(r.read_u32()?);
    shape.shade_color = ColorRef(r.read_u32()?);
    shape.shadow_color = ColorRef(r.read_u32()?);

    shape.border_fill_id = r.optional(since::CHAR_SHAPE_BORDER_FILL, 2, |r| r.read_u16())?;
    shape.strike_color = r
        .optional(since::CHAR_SHAPE_STRIKE_COLOR, 4, |r| r.read_u32())?
        .map(ColorRef);

    Ok(shape)
}

fn decode_attributes(value: u32) -> CharAttributes {
    CharAttributes {
        italic: layout::ITALIC.flag(value),
        bold: layout::BOLD.flag(value),
        underline: UnderlineType::from_code(layout::UNDERLINE.get(value)),
        underline_shape: LineType::from_code(layout::UNDERLINE_SHAPE.get(value)),
        outline: OutlineType::from_code(layout::OUTLINE.get(value)),
        shadow: ShadowType::from_code(layout::SHADOW.get(value)),
        emboss: layout::EMBOSS.flag(value),
        engrave: layout::ENGRAVE.flag(value),
        superscript: layout::SUPERSCRIPT.flag(value),
        subscript: layout::SUBSCRIPT.flag(value),
        strike_out: layout::STRIKE_OUT.flag(value),
        emphasis: layout::EMPHASIS.get_u8(value),
        use_font_space: layout::USE_FONT_SPACE.flag(value),
        strike_shape: LineType::from_code(layout::STRIKE_SHAPE.get(value)),
        kerning: layout::KERNING.flag(value),
    }
}
