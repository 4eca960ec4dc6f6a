//! HWPTAG_NUMBERING and HWPTAG_BULLET: paragraph head definitions.

use crate::error::Result;
use crate::hwp5::bits::BitField;
use crate::hwp5::cursor::FieldReader;
use crate::hwp5::header::since;
use crate::model::{Bullet, BulletImage, HeadAlignment, Numbering, ParaHeadInfo};

/// Levels every numbering record carries.
const BASE_LEVELS: usize = 7;
/// Levels added by 5.1.0.0.
const EXTENDED_LEVELS: usize = 3;
/// Smallest extended block: three heads with empty formats, then three starts.
const EXTENDED_BLOCK_MIN: usize = EXTENDED_LEVELS * (12 + 2 + 4);

/// Paragraph head property layout (UINT32).
pub mod layout {
    use super::BitField;

    pub const ALIGNMENT: BitField = BitField::new("alignment", 0, 2);
    pub const INSTANCE_WIDTH: BitField = BitField::new("instance_width", 2, 1);
    pub const AUTO_INDENT: BitField = BitField::new("auto_indent", 3, 1);
    pub const DISTANCE_TYPE: BitField = BitField::new("distance_type", 4, 1);

    pub const ALL: &[BitField] = &[ALIGNMENT, INSTANCE_WIDTH, AUTO_INDENT, DISTANCE_TYPE];
}

pub fn decode_numbering(r: &mut FieldReader<'_>) -> Result<Numbering> {
    let mut levels = Vec::with_capacity(BASE_LEVELS + EXTENDED_LEVELS);
    for _ in 0..BASE_LEVELS {
        levels.push(read_level(r)?);
    }
    let start_number = r.read_u16()?;

    let mut level_start_numbers = Vec::new();
    if r.gate(since::NUMBERING_LEVEL_STARTS, BASE_LEVELS * 4) {
        for _ in 0..BASE_LEVELS {
            level_start_numbers.push(r.read_u32()?);
        }
    }

    // Extended levels are written as three heads followed by their starts.
    if !level_start_numbers.is_empty() {
        let extended = r.optional_block(
            since::NUMBERING_EXTENDED_LEVELS,
            EXTENDED_BLOCK_MIN,
            read_extended_levels,
        )?;
        if let Some((heads, starts)) = extended {
            levels.extend(heads);
            level_start_numbers.extend(starts);
        }
    }

    Ok(Numbering {
        levels,
        start_number,
        level_start_numbers,
    })
}

pub fn decode_bullet(r: &mut FieldReader<'_>) -> Result<Bullet> {
    let head = read_head_info(r)?;
    let bullet_char = r.read_wchar()?;
    let image_id = r.read_i32()?;

    let image = if r.has(4) {
        let b = r.read_array::<4>()?;
        (image_id != 0).then_some(BulletImage {
            brightness: b[0] as i8,
            contrast: b[1] as i8,
            effect: b[2],
            bin_data_id: b[3],
        })
    } else {
        None
    };
    let check_char = if r.has(2) {
        Some(r.read_wchar()?)
    } else {
        None
    };

    Ok(Bullet {
        head,
        bullet_char,
        image_id,
        image,
        check_char,
    })
}

fn read_extended_levels(r: &mut FieldReader<'_>) -> Result<(Vec<ParaHeadInfo>, Vec<u32>)> {
    let heads = (0..EXTENDED_LEVELS)
        .map(|_| read_level(r))
        .collect::<Result<Vec<_>>>()?;
    let starts = (0..EXTENDED_LEVELS)
        .map(|_| r.read_u32())
        .collect::<Result<Vec<_>>>()?;
    Ok((heads, starts))
}

fn read_level(r: &mut FieldReader<'_>) -> Result<ParaHeadInfo> {
    let mut head = read_head_info(r)?;
    head.format = r.read_string()?;
    Ok(head)
}

/// Reads the 12-byte head block shared by numbering levels and bullets.
fn read_head_info(r: &mut FieldReader<'_>) -> Result<ParaHeadInfo> {
    let property = r.read_u32()?;
    Ok(ParaHeadInfo {
        property,
        alignment: HeadAlignment::from_code(layout::ALIGNMENT.get(property)),
        use_instance_width: layout::INSTANCE_WIDTH.flag(property),
        auto_indent: layout::AUTO_INDENT.flag(property),
        distance_by_ratio: layout::DISTANCE_TYPE.flag(property),
        width_adjust: r.read_i16()?,
        text_distance: r.read_i16()?,
        char_shape_id: r.read_u32()?,
        format: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hwp5::bits::assert_layout;
    use crate::hwp5::header::Version;
    use crate::hwp5::test_support::Payload;

    fn level(payload: Payload, format: &str) -> Payload {
        payload
            .u32(0b1001)
            .i16(0)
            .i16(50)
            .u32(u32::MAX)
            .string(format)
    }

    fn base_levels() -> Payload {
        let mut payload = Payload::new();
        for depth in 1..=7 {
            payload = level(payload, &format!("^{depth}."));
        }
        payload.u16(1)
    }

    #[test]
    fn test_layout_table() {
        assert_layout(layout::ALL, 32);
    }

    #[test]
    fn test_old_numbering() {
        let data = base_levels().build();
        let mut r = FieldReader::new(&data, 0, Version::new(5, 0, 1, 7));
        let numbering = decode_numbering(&mut r).unwrap();

        assert_eq!(numbering.levels.len(), 7);
        assert_eq!(numbering.levels[2].format, "^3.");
        assert_eq!(numbering.levels[0].alignment, HeadAlignment::Center);
        assert!(numbering.levels[0].auto_indent);
        assert_eq!(numbering.levels[0].text_distance, 50);
        assert_eq!(numbering.start_number, 1);
        assert!(numbering.level_start_numbers.is_empty());
        assert!(r.is_empty());
    }

    #[test]
    fn test_extended_levels() {
        let mut payload = base_levels();
        for _ in 0..7 {
            payload = payload.u32(1);
        }
        for depth in 8..=10 {
            payload = level(payload, &format!("^{depth})"));
        }
        let data = payload.u32(1).u32(1).u32(5).build();
        let mut r = FieldReader::new(&data, 0, Version::new(5, 1, 0, 0));
        let numbering = decode_numbering(&mut r).unwrap();

        assert_eq!(numbering.levels.len(), 10);
        assert_eq!(numbering.levels[9].format, "^10)");
        assert_eq!(numbering.level_start_numbers.len(), 10);
        assert_eq!(numbering.level_start_numbers[9], 5);
        assert!(r.is_empty());
    }

    #[test]
    fn test_extended_levels_short_tail_left_unread() {
        let mut payload = base_levels();
        for _ in 0..7 {
            payload = payload.u32(1);
        }
        let data = payload.fill(0xAB, 16).build();
        let mut r = FieldReader::new(&data, 0, Version::new(5, 1, 0, 0));
        let numbering = decode_numbering(&mut r).unwrap();

        assert_eq!(numbering.levels.len(), 7);
        assert_eq!(numbering.level_start_numbers.len(), 7);
        assert_eq!(r.remaining(), 16);
    }

    #[test]
    fn test_extended_levels_cut_inside_format() {
        let mut payload = base_levels();
        for _ in 0..7 {
            payload = payload.u32(1);
        }
        for depth in 8..=10 {
            payload = level(payload, &format!("^{depth})"));
        }
        // Starts of the extended levels are missing.
        let data = payload.u32(1).build();
        let mut r = FieldReader::new(&data, 0, Version::new(5, 1, 0, 0));
        let numbering = decode_numbering(&mut r).unwrap();

        assert_eq!(numbering.levels.len(), 7);
        assert!(!r.is_empty());
    }

    #[test]
    fn test_bullet_with_check_char() {
        let data = Payload::new()
            .u32(0)
            .i16(0)
            .i16(0)
            .u32(0)
            .wchar('●')
            .i32(0)
            .bytes(&[0, 0, 0, 0])
            .wchar('☑')
            .build();
        let mut r = FieldReader::new(&data, 0, Version::new(5, 0, 3, 2));
        let bullet = decode_bullet(&mut r).unwrap();

        assert_eq!(bullet.bullet_char, '●');
        assert!(bullet.image.is_none());
        assert_eq!(bullet.check_char, Some('☑'));
        assert!(r.is_empty());
    }

    #[test]
    fn test_image_bullet() {
        let data = Payload::new()
            .u32(0)
            .i16(0)
            .i16(0)
            .u32(0)
            .wchar('\u{F000}')
            .i32(1)
            .bytes(&[0xF6, 10, 0, 3])
            .build();
        let mut r = FieldReader::new(&data, 0, Version::new(5, 0, 3, 2));
        let bullet = decode_bullet(&mut r).unwrap();

        let image = bullet.image.unwrap();
        assert_eq!(image.brightness, -10);
        assert_eq!(image.bin_data_id, 3);
        assert_eq!(bullet.check_char, None);
    }
}
