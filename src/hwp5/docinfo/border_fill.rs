//! HWPTAG_BORDER_FILL and the fill block shared with drawing objects.
//!
//! The per-direction border fields are stored interleaved as
//! `(type u8, thickness u8, color u32)` for left, right, top and bottom. The
//! published layout shows three separate arrays; files do not match it.

use crate::error::{Result, StructuralError};
use crate::hwp5::bits::BitField;
use crate::hwp5::cursor::FieldReader;
use crate::model::{
    BorderFill, BorderLine, ColorFill, ColorRef, FillInfo, FillKinds, GradientFill, GradientType,
    ImageEffect, ImageFill, ImageFillMode, LineType, PictureInfo,
};

/// Property word layout (UINT16).
pub mod layout {
    use super::BitField;

    pub const THREE_D: BitField = BitField::new("three_d", 0, 1);
    pub const SHADOW: BitField = BitField::new("shadow", 1, 1);
    pub const SLASH: BitField = BitField::new("slash", 2, 3);
    pub const BACK_SLASH: BitField = BitField::new("back_slash", 5, 3);

    pub const ALL: &[BitField] = &[THREE_D, SHADOW, SLASH, BACK_SLASH];
}

pub fn decode_border_fill(r: &mut FieldReader<'_>) -> Result<BorderFill> {
    let property = r.read_u16()?;
    let value = property as u32;

    let mut borders = [BorderLine::default(); 4];
    for border in &mut borders {
        *border = read_border_line(r)?;
    }
    let diagonal = read_border_line(r)?;
    let fill = read_fill_info(r)?;

    Ok(BorderFill {
        property,
        three_d: layout::THREE_D.flag(value),
        shadow: layout::SHADOW.flag(value),
        slash: layout::SLASH.get_u8(value),
        back_slash: layout::BACK_SLASH.get_u8(value),
        borders,
        diagonal,
        fill,
    })
}

/// Reads one `(type u8, thickness u8, color u32)` border line.
pub fn read_border_line(r: &mut FieldReader<'_>) -> Result<BorderLine> {
    Ok(BorderLine {
        line_type: LineType::from_code(r.read_u8()? as u32),
        thickness: r.read_u8()?,
        color: ColorRef(r.read_u32()?),
    })
}

/// Reads a fill block: kind word, then each present fill, then the
/// length-prefixed additional attributes.
pub fn read_fill_info(r: &mut FieldReader<'_>) -> Result<FillInfo> {
    let kinds = FillKinds::from_bits_retain(r.read_u32()?);
    let mut fill = FillInfo {
        kinds,
        ..Default::default()
    };

    if kinds.contains(FillKinds::COLOR) {
        fill.color = Some(ColorFill {
            background: ColorRef(r.read_u32()?),
            pattern_color: ColorRef(r.read_u32()?),
            pattern_type: r.read_i32()?,
        });
    }

    if kinds.contains(FillKinds::GRADIENT) {
        fill.gradient = Some(read_gradient(r)?);
    }

    if kinds.contains(FillKinds::IMAGE) {
        fill.image = Some(ImageFill {
            mode: ImageFillMode::from_code(r.read_u8()? as u32),
            picture: read_picture_info(r)?,
        });
    }

    if r.has(4) {
        let extra = r.read_u32()? as usize;
        let mut left = extra.min(r.remaining());
        if left > 0 {
            if let Some(gradient) = fill.gradient.as_mut() {
                gradient.blur_center = Some(r.read_u8()?);
                left -= 1;
            }
        }
        r.skip(left)?;
    }

    Ok(fill)
}

fn read_gradient(r: &mut FieldReader<'_>) -> Result<GradientFill> {
    let gradient_type = GradientType::from_code(r.read_u8()? as u32);
    let angle = r.read_i32()?;
    let center_x = r.read_i32()?;
    let center_y = r.read_i32()?;
    let blur = r.read_i32()?;

    let offset = r.offset();
    let count = r.read_i32()?;
    let per_color = if count > 2 { 8 } else { 4 };
    if count < 0 || (count as usize).saturating_mul(per_color) > r.remaining() {
        return Err(StructuralError::InvalidLength {
            offset,
            what: "gradient color count",
            value: count as i64,
        }
        .into());
    }

    let count = count as usize;
    let mut positions = Vec::new();
    if count > 2 {
        for _ in 0..count {
            positions.push(r.read_i32()?);
        }
    }
    let mut colors = Vec::with_capacity(count);
    for _ in 0..count {
        colors.push(ColorRef(r.read_u32()?));
    }

    Ok(GradientFill {
        gradient_type,
        angle,
        center_x,
        center_y,
        blur,
        positions,
        colors,
        blur_center: None,
    })
}

/// Reads the 5-byte picture reference used by image fills and pictures.
pub fn read_picture_info(r: &mut FieldReader<'_>) -> Result<PictureInfo> {
    Ok(PictureInfo {
        brightness: r.read_i8()?,
        contrast: r.read_i8()?,
        effect: ImageEffect::from_code(r.read_u8()? as u32),
        bin_data_id: r.read_u16()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hwp5::bits::assert_layout;
    use crate::hwp5::header::Version;
    use crate::hwp5::test_support::Payload;

    fn reader(data: &[u8]) -> FieldReader<'_> {
        FieldReader::new(data, 0, Version::new(5, 0, 3, 2))
    }

    fn borders(payload: Payload) -> Payload {
        let mut payload = payload;
        for (line_type, thickness) in [(0u8, 1u8), (1, 2), (2, 3), (99, 4)] {
            payload = payload.u8(line_type).u8(thickness).u32(0x00FF_0000);
        }
        payload.u8(0).u8(0).u32(0)
    }

    #[test]
    fn test_layout_table() {
        assert_layout(layout::ALL, 16);
    }

    #[test]
    fn test_interleaved_borders_and_color_fill() {
        let data = borders(Payload::new().u16(0b0000_1001))
            .u32(1)
            .u32(0x00FF_FFFF)
            .u32(0)
            .i32(-1)
            .u32(0)
            .build();
        let mut r = reader(&data);
        let fill = decode_border_fill(&mut r).unwrap();

        assert!(fill.three_d);
        assert!(!fill.shadow);
        assert_eq!(fill.slash, 2);
        assert_eq!(fill.left().thickness, 1);
        assert_eq!(fill.right().line_type, LineType::LongDash);
        assert_eq!(fill.top().line_type, LineType::Dot);
        // Unknown line code decodes to the documented default.
        assert_eq!(fill.bottom().line_type, LineType::Solid);
        assert_eq!(fill.bottom().color.blue(), 0xFF);

        let color = fill.fill.color.unwrap();
        assert_eq!(color.background.to_hex(), "#FFFFFF");
        assert_eq!(color.pattern_type, -1);
        assert!(fill.fill.gradient.is_none());
        assert!(r.is_empty());
    }

    #[test]
    fn test_gradient_fill_with_blur_center() {
        let data = Payload::new()
            .u32(4)
            .u8(2)
            .i32(90)
            .i32(50)
            .i32(50)
            .i32(0)
            .i32(3)
            .i32(0)
            .i32(50)
            .i32(100)
            .u32(0xFF)
            .u32(0xFF00)
            .u32(0xFF_0000)
            .u32(1)
            .u8(7)
            .build();
        let mut r = reader(&data);
        let fill = read_fill_info(&mut r).unwrap();

        let gradient = fill.gradient.unwrap();
        assert_eq!(gradient.gradient_type, GradientType::Radial);
        assert_eq!(gradient.positions, vec![0, 50, 100]);
        assert_eq!(gradient.colors.len(), 3);
        assert_eq!(gradient.blur_center, Some(7));
        assert!(r.is_empty());
    }

    #[test]
    fn test_image_fill() {
        let data = Payload::new()
            .u32(2)
            .u8(15)
            .i8(-10)
            .i8(20)
            .u8(1)
            .u16(4)
            .u32(0)
            .build();
        let mut r = reader(&data);
        let fill = read_fill_info(&mut r).unwrap();

        let image = fill.image.unwrap();
        assert_eq!(image.mode, ImageFillMode::Zoom);
        assert_eq!(image.picture.brightness, -10);
        assert_eq!(image.picture.effect, ImageEffect::GrayScale);
        assert_eq!(image.picture.bin_data_id, 4);
    }

    #[test]
    fn test_gradient_count_past_payload() {
        let data = Payload::new()
            .u32(4)
            .u8(1)
            .i32(0)
            .i32(0)
            .i32(0)
            .i32(0)
            .i32(1000)
            .build();
        let mut r = reader(&data);
        assert!(read_fill_info(&mut r).unwrap_err().is_structural());
    }

    #[test]
    fn test_fill_without_additional_block() {
        let data = Payload::new().u32(0).build();
        let mut r = reader(&data);
        let fill = read_fill_info(&mut r).unwrap();
        assert!(fill.is_empty());
    }
}
