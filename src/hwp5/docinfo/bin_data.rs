//! HWPTAG_BIN_DATA: descriptors of linked and embedded binary data.

use crate::error::Result;
use crate::hwp5::bits::BitField;
use crate::hwp5::cursor::FieldReader;
use crate::model::{BinDataCompression, BinDataItem, BinDataLink, BinDataStatus, BinDataType};

/// Property word layout (UINT16).
pub mod layout {
    use super::BitField;

    pub const KIND: BitField = BitField::new("kind", 0, 4);
    pub const COMPRESSION: BitField = BitField::new("compression", 4, 2);
    pub const STATUS: BitField = BitField::new("status", 8, 2);

    pub const ALL: &[BitField] = &[KIND, COMPRESSION, STATUS];
}

pub fn decode_bin_data(r: &mut FieldReader<'_>) -> Result<BinDataItem> {
    let property = r.read_u16()?;
    let value = property as u32;
    let kind = BinDataType::from_code(layout::KIND.get(value));

    let mut item = BinDataItem {
        property,
        kind,
        compression: BinDataCompression::from_code(layout::COMPRESSION.get(value)),
        status: BinDataStatus::from_code(layout::STATUS.get(value)),
        ..Default::default()
    };

    match kind {
        BinDataType::Link => {
            item.link = Some(BinDataLink {
                absolute_path: r.read_string()?,
                relative_path: r.read_string()?,
            });
        }
        BinDataType::Embedding => {
            item.storage_id = Some(r.read_u16()?);
            item.extension = Some(r.read_string()?);
        }
        BinDataType::Storage => {
            item.storage_id = Some(r.read_u16()?);
        }
    }

    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hwp5::bits::assert_layout;
    use crate::hwp5::header::Version;
    use crate::hwp5::test_support::Payload;

    #[test]
    fn test_layout_table() {
        assert_layout(layout::ALL, 16);
    }

    #[test]
    fn test_embedded_item() {
        // Embedding, compressed, accessed
        let data = Payload::new().u16(0x0111).u16(3).string("png").build();
        let mut r = FieldReader::new(&data, 0, Version::new(5, 0, 3, 2));
        let item = decode_bin_data(&mut r).unwrap();

        assert_eq!(item.kind, BinDataType::Embedding);
        assert_eq!(item.compression, BinDataCompression::Compress);
        assert_eq!(item.status, BinDataStatus::Success);
        assert_eq!(item.stream_name().as_deref(), Some("BIN0003.png"));
        assert!(item.is_compressed(false));
        assert!(r.is_empty());
    }

    #[test]
    fn test_linked_item() {
        let data = Payload::new()
            .u16(0x0000)
            .string("C:\\img\\a.bmp")
            .string("a.bmp")
            .build();
        let mut r = FieldReader::new(&data, 0, Version::new(5, 0, 3, 2));
        let item = decode_bin_data(&mut r).unwrap();

        assert_eq!(item.kind, BinDataType::Link);
        assert_eq!(item.link.as_ref().unwrap().relative_path, "a.bmp");
        assert!(item.stream_name().is_none());
    }

    #[test]
    fn test_unknown_kind_falls_back_to_link() {
        let data = Payload::new().u16(0x000F).string("").string("").build();
        let mut r = FieldReader::new(&data, 0, Version::new(5, 0, 3, 2));
        let item = decode_bin_data(&mut r).unwrap();
        assert_eq!(item.kind, BinDataType::Link);
    }
}
