//! Fields (`%xxx`), bookmarks, index marks, overlapping letters and dutmal.

use super::children::Children;
use super::param::take_ctrl_data;
use crate::error::{Result, StructuralError};
use crate::hwp5::bits::BitField;
use crate::hwp5::cursor::FieldReader;
use crate::hwp5::dispatch::DecodeContext;
use crate::hwp5::header::since;
use crate::model::{Bookmark, CharOverlap, CtrlId, Dutmal, Field, FieldKind, IndexMark};

const EDITABLE_IN_FORM: BitField = BitField::new("editable_in_form", 0, 1);

/// Reads a field start. Its parameters, if any, sit in a CTRL_DATA child.
pub fn decode_field(
    id: CtrlId,
    r: &mut FieldReader<'_>,
    children: &mut Children<'_>,
    ctx: &mut DecodeContext<'_>,
) -> Result<Field> {
    let property = r.read_u32()?;
    let extra_property = r.read_u8()?;
    let command = r.read_string()?;
    let field_id = r
        .optional(since::BASELINE, 4, |r| r.read_u32())?
        .unwrap_or_default();
    // Memo fields append a memo index.
    r.rest();
    let params = take_ctrl_data(children, ctx)?;

    Ok(Field {
        id,
        kind: FieldKind::from_id(id),
        property,
        editable_in_form: EDITABLE_IN_FORM.flag(property),
        extra_property,
        command,
        field_id,
        params,
    })
}

/// A bookmark stores nothing in its header; the name comes from CTRL_DATA.
pub fn decode_bookmark(
    children: &mut Children<'_>,
    ctx: &mut DecodeContext<'_>,
) -> Result<Bookmark> {
    let params = take_ctrl_data(children, ctx)?;
    Ok(Bookmark {
        name: params
            .as_ref()
            .and_then(|set| set.first_string())
            .map(str::to_owned),
        params,
    })
}

pub fn decode_index_mark(r: &mut FieldReader<'_>) -> Result<IndexMark> {
    Ok(IndexMark {
        first_key: r.read_string()?,
        second_key: r.read_string()?,
        reserved: r
            .optional(since::BASELINE, 2, |r| r.read_u16())?
            .unwrap_or_default(),
    })
}

pub fn decode_overlap(r: &mut FieldReader<'_>) -> Result<CharOverlap> {
    let text = r.read_string()?;
    let border_type = r.read_u8()?;
    let inner_size = r.read_i8()?;
    let expansion = r.read_u8()?;

    let count_offset = r.offset();
    let count = r.read_u8()? as usize;
    if count * 4 > r.remaining() {
        return Err(StructuralError::InvalidLength {
            offset: count_offset,
            what: "overlap char shape count",
            value: count as i64,
        }
        .into());
    }
    let char_shape_ids = (0..count)
        .map(|_| r.read_u32())
        .collect::<Result<Vec<_>>>()?;

    Ok(CharOverlap {
        text,
        border_type,
        inner_size,
        expansion,
        char_shape_ids,
    })
}

pub fn decode_dutmal(r: &mut FieldReader<'_>) -> Result<Dutmal> {
    Ok(Dutmal {
        main_text: r.read_string()?,
        sub_text: r.read_string()?,
        position: r.read_u32()?,
        size_ratio: r.read_u32()?,
        option: r.read_u32()?,
        style_id: r.read_u32()?,
        alignment: r.read_u32()?,
    })
}
