//! HWPTAG_FACE_NAME: one font entry of a per-language font list.

use crate::error::Result;
use crate::hwp5::bits::BitField;
use crate::hwp5::cursor::FieldReader;
use crate::model::{AlternateFont, FaceName, FontType, FontTypeInfo};

/// Presence flags in the leading property byte.
pub mod layout {
    use super::BitField;

    pub const HAS_DEFAULT_FONT: BitField = BitField::new("has_default_font", 5, 1);
    pub const HAS_TYPE_INFO: BitField = BitField::new("has_type_info", 6, 1);
    pub const HAS_ALTERNATE: BitField = BitField::new("has_alternate", 7, 1);

    pub const ALL: &[BitField] = &[HAS_DEFAULT_FONT, HAS_TYPE_INFO, HAS_ALTERNATE];
}

pub fn decode_face_name(r: &mut FieldReader<'_>) -> Result<FaceName> {
    let property = r.read_u8()?;
    let value = property as u32;
    let name = r.read_string()?;

    let alternate = if layout::HAS_ALTERNATE.flag(value) {
        Some(AlternateFont {
            font_type: FontType::from_code(r.read_u8()? as u32),
            name: r.read_string()?,
        })
    } else {
        None
    };

    let type_info = if layout::HAS_TYPE_INFO.flag(value) {
        let b = r.read_array::<10>()?;
        Some(FontTypeInfo {
            family: b[0],
            serif: b[1],
            weight: b[2],
            proportion: b[3],
            contrast: b[4],
            stroke_variation: b[5],
            arm_style: b[6],
            letterform: b[7],
            midline: b[8],
            x_height: b[9],
        })
    } else {
        None
    };

    let default_font = if layout::HAS_DEFAULT_FONT.flag(value) {
        Some(r.read_string()?)
    } else {
        None
    };

    Ok(FaceName {
        property,
        name,
        alternate,
        type_info,
        default_font,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hwp5::bits::assert_layout;
    use crate::hwp5::header::Version;
    use crate::hwp5::test_support::Payload;

    #[test]
    fn test_layout_table() {
        assert_layout(layout::ALL, 8);
    }

    #[test]
    fn test_plain_face_name() {
        let data = Payload::new().u8(0).string("함초롬바탕").build();
        let mut r = FieldReader::new(&data, 0, Version::new(5, 0, 3, 2));
        let face = decode_face_name(&mut r).unwrap();
        assert_eq!(face.name, "함초롬바탕");
        assert!(face.alternate.is_none());
        assert!(face.type_info.is_none());
        assert!(r.is_empty());
    }

    #[test]
    fn test_face_name_with_all_parts() {
        let data = Payload::new()
            .u8(0xE0)
            .string("Batang")
            .u8(1)
            .string("Times")
            .bytes(&[2, 0, 5, 3, 0, 0, 0, 0, 0, 0])
            .string("Gulim")
            .build();
        let mut r = FieldReader::new(&data, 0, Version::new(5, 0, 3, 2));
        let face = decode_face_name(&mut r).unwrap();

        let alternate = face.alternate.unwrap();
        assert_eq!(alternate.font_type, FontType::TrueType);
        assert_eq!(alternate.name, "Times");
        assert_eq!(face.type_info.unwrap().weight, 5);
        assert_eq!(face.default_font.as_deref(), Some("Gulim"));
        assert!(r.is_empty());
    }
}
