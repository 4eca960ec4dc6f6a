//! HWPTAG_TAB_DEF: tab stop definitions.

use crate::error::{Result, StructuralError};
use crate::hwp5::bits::BitField;
use crate::hwp5::cursor::FieldReader;
use crate::model::{LineType, TabDef, TabKind, TabStop};

/// Size of one tab stop entry.
const TAB_STOP_SIZE: usize = 8;

pub mod layout {
    use super::BitField;

    pub const AUTO_TAB_LEFT: BitField = BitField::new("auto_tab_left", 0, 1);
    pub const AUTO_TAB_RIGHT: BitField = BitField::new("auto_tab_right", 1, 1);

    pub const ALL: &[BitField] = &[AUTO_TAB_LEFT, AUTO_TAB_RIGHT];
}

pub fn decode_tab_def(r: &mut FieldReader<'_>) -> Result<TabDef> {
    let property = r.read_u32()?;
    let offset = r.offset();
    let count = r.read_i32()?;
    if count < 0 || (count as usize).saturating_mul(TAB_STOP_SIZE) > r.remaining() {
        return Err(StructuralError::InvalidLength {
            offset,
            what: "tab stop count",
            value: count as i64,
        }
        .into());
    }

    let mut tabs = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let position = r.read_u32()?;
        let kind = TabKind::from_code(r.read_u8()? as u32);
        let fill = LineType::from_code(r.read_u8()? as u32);
        r.skip(2)?;
        tabs.push(TabStop {
            position,
            kind,
            fill,
        });
    }

    Ok(TabDef {
        property,
        auto_tab_left: layout::AUTO_TAB_LEFT.flag(property),
        auto_tab_right: layout::AUTO_TAB_RIGHT.flag(property),
        tabs,
    })
}
