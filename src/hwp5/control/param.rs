//! Parameter sets, as stored in CTRL_DATA and DOC_DATA records.
//!
//! A set is `id u16, count i16` followed by `count` items of
//! `(id u16, type u16, value)`. Sets and arrays of sets nest.

use super::children::Children;
use crate::error::{Result, StructuralError};
use crate::hwp5::cursor::FieldReader;
use crate::hwp5::dispatch::DecodeContext;
use crate::hwp5::record::TagId;
use crate::model::{ParameterItem, ParameterSet, ParameterValue};

/// Deepest set nesting accepted inside one record.
pub const MAX_SET_DEPTH: usize = 32;

mod value_type {
    pub const NULL: u16 = 0;
    pub const STRING: u16 = 1;
    pub const I8: u16 = 2;
    pub const I16: u16 = 3;
    pub const I32: u16 = 4;
    pub const INT: u16 = 5;
    pub const U8: u16 = 6;
    pub const U16: u16 = 7;
    pub const U32: u16 = 8;
    pub const UINT: u16 = 9;
    pub const SET: u16 = 0x8000;
    pub const ARRAY: u16 = 0x8001;
    pub const BIN_DATA: u16 = 0x8002;
}

/// Reads one parameter set.
///
/// An item of unknown type ends the set: its size is unknown, so nothing after
/// it can be located. The caller's size check reports the unread bytes.
pub fn read_parameter_set(r: &mut FieldReader<'_>, depth: usize) -> Result<ParameterSet> {
    if depth > MAX_SET_DEPTH {
        return Err(StructuralError::NestingTooDeep {
            offset: r.offset(),
            depth,
            limit: MAX_SET_DEPTH,
        }
        .into());
    }

    let id = r.read_u16()?;
    let count_offset = r.offset();
    let count = r.read_i16()?;
    if count < 0 {
        return Err(StructuralError::InvalidLength {
            offset: count_offset,
            what: "parameter item count",
            value: count as i64,
        }
        .into());
    }

    let mut items = Vec::new();
    for _ in 0..count {
        let item_id = r.read_u16()?;
        let kind = r.read_u16()?;
        let Some(value) = read_value(r, kind, depth)? else {
            log::debug!("parameter item {item_id} has unknown type 0x{kind:04X}");
            break;
        };
        items.push(ParameterItem { id: item_id, value });
    }
    Ok(ParameterSet { id, items })
}

fn read_value(r: &mut FieldReader<'_>, kind: u16, depth: usize) -> Result<Option<ParameterValue>> {
    use value_type::*;
    let value = match kind {
        NULL => ParameterValue::Null,
        STRING => ParameterValue::String(r.read_string()?),
        I8 => ParameterValue::I8(r.read_i8()?),
        I16 => ParameterValue::I16(r.read_i16()?),
        I32 | INT => ParameterValue::I32(r.read_i32()?),
        U8 => ParameterValue::U8(r.read_u8()?),
        U16 => ParameterValue::U16(r.read_u16()?),
        U32 | UINT => ParameterValue::U32(r.read_u32()?),
        SET => ParameterValue::Set(read_parameter_set(r, depth + 1)?),
        ARRAY => {
            let count = r.read_u16()?;
            let mut sets = Vec::new();
            for _ in 0..count {
                sets.push(read_parameter_set(r, depth + 1)?);
            }
            ParameterValue::Array(sets)
        }
        BIN_DATA => ParameterValue::BinData(r.read_u16()?),
        _ => return Ok(None),
    };
    Ok(Some(value))
}

/// Takes a CTRL_DATA child if one comes next and reads its parameter set.
pub fn take_ctrl_data(
    children: &mut Children<'_>,
    ctx: &mut DecodeContext<'_>,
) -> Result<Option<ParameterSet>> {
    let Some(node) = children.next_if(TagId::CtrlData) else {
        return Ok(None);
    };
    let mut r = ctx.reader(&node.record);
    let set = read_parameter_set(&mut r, 0)?;
    ctx.check_consumed(&node.record, &r);
    Ok(Some(set))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hwp5::header::Version;
    use crate::hwp5::test_support::Payload;

    fn reader(payload: &[u8]) -> FieldReader<'_> {
        FieldReader::new(payload, 0, Version::new(5, 0, 3, 2))
    }

    #[test]
    fn test_scalar_items() {
        let payload = Payload::new()
            .u16(0x21B)
            .i16(4)
            .u16(1)
            .u16(value_type::STRING)
            .string("책갈피")
            .u16(2)
            .u16(value_type::I8)
            .i8(-3)
            .u16(3)
            .u16(value_type::UINT)
            .u32(9)
            .u16(4)
            .u16(value_type::BIN_DATA)
            .u16(2)
            .build();
        let mut r = reader(&payload);
        let set = read_parameter_set(&mut r, 0).unwrap();

        assert_eq!(set.id, 0x21B);
        assert_eq!(set.first_string(), Some("책갈피"));
        assert_eq!(set.get(2), Some(&ParameterValue::I8(-3)));
        assert_eq!(set.get(3), Some(&ParameterValue::U32(9)));
        assert_eq!(set.get(4), Some(&ParameterValue::BinData(2)));
        assert!(r.is_empty());
    }

    #[test]
    fn test_nested_set_and_array() {
        let inner = Payload::new()
            .u16(7)
            .i16(1)
            .u16(1)
            .u16(value_type::U16)
            .u16(42)
            .build();
        let payload = Payload::new()
            .u16(1)
            .i16(2)
            .u16(10)
            .u16(value_type::SET)
            .bytes(&inner)
            .u16(11)
            .u16(value_type::ARRAY)
            .u16(2)
            .bytes(&inner)
            .bytes(&inner)
            .build();
        let mut r = reader(&payload);
        let set = read_parameter_set(&mut r, 0).unwrap();

        match set.get(10) {
            Some(ParameterValue::Set(nested)) => {
                assert_eq!(nested.get(1), Some(&ParameterValue::U16(42)))
            }
            other => panic!("unexpected value {other:?}"),
        }
        match set.get(11) {
            Some(ParameterValue::Array(sets)) => assert_eq!(sets.len(), 2),
            other => panic!("unexpected value {other:?}"),
        }
        assert!(r.is_empty());
    }

    #[test]
    fn test_unknown_type_stops_set() {
        let payload = Payload::new()
            .u16(1)
            .i16(2)
            .u16(1)
            .u16(0x4444)
            .u32(0xDEAD)
            .build();
        let mut r = reader(&payload);
        let set = read_parameter_set(&mut r, 0).unwrap();
        assert!(set.items.is_empty());
        assert_eq!(r.remaining(), 4);
    }

    #[test]
    fn test_nesting_limit() {
        // Every set holds one nested set, deeper than the limit allows.
        let mut payload = Payload::new();
        for _ in 0..=MAX_SET_DEPTH + 1 {
            payload = payload.u16(0).i16(1).u16(0).u16(value_type::SET);
        }
        let payload = payload.build();
        let mut r = reader(&payload);
        assert!(read_parameter_set(&mut r, 0).unwrap_err().is_structural());
    }

    #[test]
    fn test_negative_count() {
        let payload = Payload::new().u16(1).i16(-1).build();
        let mut r = reader(&payload);
        assert!(read_parameter_set(&mut r, 0).unwrap_err().is_structural());
    }
}
