//! HWPTAG_PARA_HEADER.

use crate::error::Result;
use crate::hwp5::bits::BitField;
use crate::hwp5::cursor::FieldReader;
use crate::hwp5::header::since;
use crate::model::{BreakFlags, ParaHeader};

const TEXT_LEN: BitField = BitField::new("text_len", 0, 31);
const LAST_IN_LIST: BitField = BitField::new("last_in_list", 31, 1);

pub fn decode_para_header(r: &mut FieldReader<'_>) -> Result<ParaHeader> {
    let text_word = r.read_u32()?;
    let control_mask = r.read_u32()?;
    let para_shape_id = r.read_u16()?;
    let style_id = r.read_u8()?;
    let breaks = BreakFlags::from_bits_retain(r.read_u8()?);
    let char_shape_count = r.read_u16()?;
    let range_tag_count = r.read_u16()?;
    let line_seg_count = r.read_u16()?;
    let instance_id = r.read_u32()?;
    // Written alongside change tracking.
    let merge_flag = r.optional(since::TRACK_CHANGES, 2, |r| r.read_u16())?;

    Ok(ParaHeader {
        text_len: TEXT_LEN.get(text_word),
        last_in_list: LAST_IN_LIST.flag(text_word),
        control_mask,
        para_shape_id,
        style_id,
        breaks,
        char_shape_count,
        range_tag_count,
        line_seg_count,
        instance_id,
        merge_flag,
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
        assert_layout(&[TEXT_LEN, LAST_IN_LIST], 32);
    }

    #[test]
    fn test_para_header() {
        let data = Payload::new()
            .u32(0x8000_0005)
            .u32(1 << 11)
            .u16(3)
            .u8(1)
            .u8(0x04)
            .u16(2)
            .u16(0)
            .u16(1)
            .u32(0x1234)
            .u16(0)
            .build();
        let mut r = FieldReader::new(&data, 0, Version::new(5, 0, 3, 2));
        let header = decode_para_header(&mut r).unwrap();

        assert_eq!(header.text_len, 5);
        assert!(header.last_in_list);
        assert_eq!(header.para_shape_id, 3);
        assert_eq!(header.style_id, 1);
        assert_eq!(header.breaks, BreakFlags::PAGE);
        assert_eq!(header.char_shape_count, 2);
        assert_eq!(header.line_seg_count, 1);
        assert_eq!(header.merge_flag, Some(0));
        assert!(r.is_empty());
    }

    #[test]
    fn test_old_header_without_merge_flag() {
        let data = Payload::new().u32(1).u32(0).fill(0, 14).build();
        let mut r = FieldReader::new(&data, 0, Version::new(5, 0, 2, 5));
        let header = decode_para_header(&mut r).unwrap();
        assert!(!header.last_in_list);
        assert_eq!(header.merge_flag, None);
    }
}
