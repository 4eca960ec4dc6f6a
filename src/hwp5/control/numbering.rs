//! Page and number controls: `atno`, `nwno`, `pgnp`, `pghd`, `pgct`.

use crate::error::Result;
use crate::hwp5::bits::BitField;
use crate::hwp5::cursor::FieldReader;
use crate::model::{
    AutoNumber, AutoNumberKind, NewNumber, NumberShape, PageApply, PageHide, PageNumPos,
    PageNumberPosition, PageOddEven,
};

pub mod auto_number_layout {
    use super::BitField;

    pub const KIND: BitField = BitField::new("kind", 0, 4);
    pub const SHAPE: BitField = BitField::new("shape", 4, 8);
    pub const SUPERSCRIPT: BitField = BitField::new("superscript", 12, 1);

    pub const ALL: &[BitField] = &[KIND, SHAPE, SUPERSCRIPT];
}

pub mod page_num_layout {
    use super::BitField;

    pub const SHAPE: BitField = BitField::new("shape", 0, 8);
    pub const POSITION: BitField = BitField::new("position", 8, 4);

    pub const ALL: &[BitField] = &[SHAPE, POSITION];
}

pub mod page_hide_layout {
    use super::BitField;

    pub const HEADER: BitField = BitField::new("header", 0, 1);
    pub const FOOTER: BitField = BitField::new("footer", 1, 1);
    pub const MASTER_PAGE: BitField = BitField::new("master_page", 2, 1);
    pub const BORDER: BitField = BitField::new("border", 3, 1);
    pub const FILL: BitField = BitField::new("fill", 4, 1);
    pub const PAGE_NUMBER: BitField = BitField::new("page_number", 5, 1);

    pub const ALL: &[BitField] = &[HEADER, FOOTER, MASTER_PAGE, BORDER, FILL, PAGE_NUMBER];
}

const APPLY: BitField = BitField::new("apply", 0, 2);

pub fn decode_auto_number(r: &mut FieldReader<'_>) -> Result<AutoNumber> {
    use auto_number_layout::*;
    let property = r.read_u32()?;
    Ok(AutoNumber {
        property,
        kind: AutoNumberKind::from_code(KIND.get(property)),
        shape: NumberShape::from_code(SHAPE.get(property)),
        superscript: SUPERSCRIPT.flag(property),
        number: r.read_u16()?,
        user_symbol: r.read_wchar()?,
        prefix: r.read_wchar()?,
        suffix: r.read_wchar()?,
    })
}

pub fn decode_new_number(r: &mut FieldReader<'_>) -> Result<NewNumber> {
    let property = r.read_u32()?;
    Ok(NewNumber {
        property,
        kind: AutoNumberKind::from_code(auto_number_layout::KIND.get(property)),
        number: r.read_u16()?,
    })
}

pub fn decode_page_num_pos(r: &mut FieldReader<'_>) -> Result<PageNumPos> {
    let property = r.read_u32()?;
    Ok(PageNumPos {
        property,
        shape: NumberShape::from_code(page_num_layout::SHAPE.get(property)),
        position: PageNumberPosition::from_code(page_num_layout::POSITION.get(property)),
        user_symbol: r.read_wchar()?,
        prefix: r.read_wchar()?,
        suffix: r.read_wchar()?,
        dash: r.read_wchar()?,
    })
}

pub fn decode_page_hide(r: &mut FieldReader<'_>) -> Result<PageHide> {
    use page_hide_layout::*;
    let property = r.read_u32()?;
    Ok(PageHide {
        property,
        header: HEADER.flag(property),
        footer: FOOTER.flag(property),
        master_page: MASTER_PAGE.flag(property),
        border: BORDER.flag(property),
        fill: FILL.flag(property),
        page_number: PAGE_NUMBER.flag(property),
    })
}

pub fn decode_page_odd_even(r: &mut FieldReader<'_>) -> Result<PageOddEven> {
    let property = r.read_u32()?;
    Ok(PageOddEven {
        property,
        apply: PageApply::from_code(APPLY.get(property)),
    })
}
