//! Document-level records: properties, id mappings and compatibility settings.

use crate::error::Result;
use crate::hwp5::cursor::FieldReader;
use crate::hwp5::header::since;
use crate::model::{
    CaretPosition, CompatibleDocument, DocumentProperties, IdMappings, LayoutCompatibility,
    StartNumbers, TargetProgram,
};

/// Parses HWPTAG_DOCUMENT_PROPERTIES (26 bytes).
pub fn decode_document_properties(r: &mut FieldReader<'_>) -> Result<DocumentProperties> {
    let section_count = r.read_u16()?;
    let start_numbers = StartNumbers {
        page: r.read_u16()?,
        footnote: r.read_u16()?,
        endnote: r.read_u16()?,
        picture: r.read_u16()?,
        table: r.read_u16()?,
        equation: r.read_u16()?,
    };
    let caret = CaretPosition {
        list_id: r.read_u32()?,
        para_id: r.read_u32()?,
        char_pos: r.read_u32()?,
    };
    Ok(DocumentProperties {
        section_count,
        start_numbers,
        caret,
    })
}

/// Parses HWPTAG_ID_MAPPINGS.
///
/// Counts are read one at a time while a whole INT32 remains. The memo shape and
/// change-tracking counts are additionally gated by version.
pub fn decode_id_mappings(r: &mut FieldReader<'_>) -> Result<IdMappings> {
    let mut counts = Vec::with_capacity(IdMappings::MAX_COUNTS);
    for index in 0..IdMappings::MAX_COUNTS {
        let gate = match index {
            IdMappings::MEMO_SHAPE => since::MEMO_SHAPES,
            IdMappings::TRACK_CHANGE | IdMappings::TRACK_CHANGE_AUTHOR => since::TRACK_CHANGES,
            _ => since::BASELINE,
        };
        match r.optional(gate, 4, |r| r.read_i32())? {
            Some(count) => counts.push(count),
            None => break,
        }
    }
    Ok(IdMappings { counts })
}

/// Parses HWPTAG_COMPATIBLE_DOCUMENT.
pub fn decode_compatible_document(r: &mut FieldReader<'_>) -> Result<CompatibleDocument> {
    Ok(CompatibleDocument {
        target: TargetProgram::from_code(r.read_u32()?),
    })
}

/// Parses HWPTAG_LAYOUT_COMPATIBILITY.
pub fn decode_layout_compatibility(r: &mut FieldReader<'_>) -> Result<LayoutCompatibility> {
    Ok(LayoutCompatibility {
        char_level: r.read_u32()?,
        paragraph_level: r.read_u32()?,
        section_level: r.read_u32()?,
        object_level: r.read_u32()?,
        field_level: r.read_u32()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hwp5::header::Version;
    use crate::hwp5::test_support::Payload;

    #[test]
    fn test_document_properties() {
        let data = Payload::new()
            .u16(2)
            .u16(1)
            .u16(1)
            .u16(1)
            .u16(1)
            .u16(1)
            .u16(1)
            .u32(0)
            .u32(4)
            .u32(17)
            .build();
        assert_eq!(data.len(), 26);
        let mut r = FieldReader::new(&data, 0, Version::new(5, 0, 3, 2));
        let props = decode_document_properties(&mut r).unwrap();
        assert_eq!(props.section_count, 2);
        assert_eq!(props.start_numbers.page, 1);
        assert_eq!(props.caret.para_id, 4);
        assert_eq!(props.caret.char_pos, 17);
        assert!(r.is_empty());
    }

    fn mappings(version: Version, count: usize) -> (IdMappings, usize) {
        let mut payload = Payload::new();
        for i in 0..count {
            payload = payload.i32(i as i32 + 1);
        }
        let data = payload.build();
        let mut r = FieldReader::new(&data, 0, version);
        let decoded = decode_id_mappings(&mut r).unwrap();
        (decoded, r.remaining())
    }

    #[test]
    fn test_id_mappings_version_gates() {
        let (old, left) = mappings(Version::new(5, 0, 1, 7), 18);
        assert_eq!(old.counts.len(), 15);
        assert_eq!(left, 12);

        let (mid, left) = mappings(Version::new(5, 0, 2, 5), 18);
        assert_eq!(mid.counts.len(), 16);
        assert_eq!(mid.count(IdMappings::MEMO_SHAPE), 16);
        assert_eq!(left, 8);

        let (new, left) = mappings(Version::new(5, 0, 3, 2), 18);
        assert_eq!(new.counts.len(), 18);
        assert_eq!(left, 0);
    }

    #[test]
    fn test_id_mappings_short_record() {
        let (short, left) = mappings(Version::new(5, 0, 3, 2), 10);
        assert_eq!(short.counts.len(), 10);
        assert_eq!(short.count(IdMappings::TAB_DEF), 0);
        assert_eq!(short.count(IdMappings::CHAR_SHAPE), 10);
        assert_eq!(left, 0);
    }

    #[test]
    fn test_negative_count_clamps() {
        let mappings = IdMappings {
            counts: vec![-4, 2],
        };
        assert_eq!(mappings.count(IdMappings::BIN_DATA), 0);
        assert_eq!(mappings.count(IdMappings::FACE_NAMES), 2);
    }

    #[test]
    fn test_layout_compatibility() {
        let data = Payload::new().u32(1).u32(2).u32(3).u32(4).u32(5).build();
        let mut r = FieldReader::new(&data, 0, Version::new(5, 0, 3, 2));
        let layout = decode_layout_compatibility(&mut r).unwrap();
        assert_eq!(layout.section_level, 3);
        assert_eq!(layout.field_level, 5);
    }
}
