//! Byte-level fixture builders for decoder tests.

use super::record::{RecordHeader, TagId};
use bytes::Bytes;

/// Writes framed records into a stream buffer.
#[derive(Debug, Default)]
pub(crate) struct RecordWriter {
    buf: Vec<u8>,
}

impl RecordWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record, escaping the size when it does not fit in 12 bits.
    pub fn record(&mut self, tag: TagId, level: u16, payload: &[u8]) -> &mut Self {
        self.raw(tag as u16, level, payload)
    }

    /// Appends a record with an arbitrary tag id.
    pub fn raw(&mut self, tag_id: u16, level: u16, payload: &[u8]) -> &mut Self {
        if payload.len() >= RecordHeader::EXTENDED_SIZE_SENTINEL as usize {
            self.write_extended(tag_id, level, payload)
        } else {
            let value = tag_id as u32 | (level as u32) << 10 | (payload.len() as u32) << 20;
            self.buf.extend_from_slice(&value.to_le_bytes());
            self.buf.extend_from_slice(payload);
            self
        }
    }

    /// Appends a record that always uses the extended size word.
    pub fn record_extended(&mut self, tag: TagId, level: u16, payload: &[u8]) -> &mut Self {
        self.write_extended(tag as u16, level, payload)
    }

    fn write_extended(&mut self, tag_id: u16, level: u16, payload: &[u8]) -> &mut Self {
        let value = tag_id as u32
            | (level as u32) << 10
            | RecordHeader::EXTENDED_SIZE_SENTINEL << 20;
        self.buf.extend_from_slice(&value.to_le_bytes());
        self.buf
            .extend_from_slice(&(payload.len() as u32).to_le_bytes());
        self.buf.extend_from_slice(payload);
        self
    }

    /// Appends a PARA_HEADER with its text (plus the paragraph end mark) one
    /// level below.
    pub fn paragraph(&mut self, level: u16, text: &str) -> &mut Self {
        let mut units: Vec<u16> = text.encode_utf16().collect();
        units.push(13);
        self.record(TagId::ParaHeader, level, &para_header(units.len() as u32, 0))
            .record(TagId::ParaText, level + 1, &Payload::new().units(&units).build())
    }

    pub fn finish(&self) -> Bytes {
        Bytes::copy_from_slice(&self.buf)
    }
}

/// Builds one record payload field by field.
#[derive(Debug, Default, Clone)]
pub(crate) struct Payload {
    buf: Vec<u8>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u8(mut self, v: u8) -> Self {
        self.buf.push(v);
        self
    }

    pub fn i8(self, v: i8) -> Self {
        self.u8(v as u8)
    }

    pub fn u16(mut self, v: u16) -> Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i16(self, v: i16) -> Self {
        self.u16(v as u16)
    }

    pub fn u32(mut self, v: u32) -> Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i32(self, v: i32) -> Self {
        self.u32(v as u32)
    }

    pub fn f64(mut self, v: f64) -> Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    /// Repeats a u8 field.
    pub fn fill(mut self, v: u8, count: usize) -> Self {
        self.buf.extend(std::iter::repeat(v).take(count));
        self
    }

    pub fn bytes(mut self, data: &[u8]) -> Self {
        self.buf.extend_from_slice(data);
        self
    }

    /// A single UTF-16 unit.
    pub fn wchar(self, c: char) -> Self {
        self.u16(c as u16)
    }

    /// A WORD-length-prefixed UTF-16 string.
    pub fn string(self, s: &str) -> Self {
        let units: Vec<u16> = s.encode_utf16().collect();
        let mut out = self.u16(units.len() as u16);
        for unit in units {
            out = out.u16(unit);
        }
        out
    }

    /// Raw UTF-16 units, as paragraph text stores them.
    pub fn units(mut self, units: &[u16]) -> Self {
        for unit in units {
            self.buf.extend_from_slice(&unit.to_le_bytes());
        }
        self
    }

    /// A control id as stored on disk.
    pub fn ctrl_id(self, name: &[u8; 4]) -> Self {
        self.u32(u32::from_be_bytes(*name))
    }

    /// A LIST_HEADER prefix: paragraph count, reserved word, property.
    pub fn list_header(self, para_count: u16, property: u32) -> Self {
        self.u16(para_count).u16(0).u32(property)
    }

    /// Common object properties with zero offsets and margins.
    pub fn object_common(self, property: u32, width: u32, height: u32) -> Self {
        self.u32(property)
            .i32(0)
            .i32(0)
            .u32(width)
            .u32(height)
            .i32(0)
            .fill(0, 8)
            .u32(1)
            .i32(0)
            .string("")
    }

    /// Six f64 values forming one matrix.
    pub fn matrix(mut self, m: [f64; 6]) -> Self {
        for v in m {
            self = self.f64(v);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

/// UTF-16 units of an 8-unit control whose payload starts with `id`.
pub(crate) fn extended_control(code: u16, id: &[u8; 4]) -> Vec<u16> {
    let value = u32::from_be_bytes(*id);
    vec![code, value as u16, (value >> 16) as u16, 0, 0, 0, 0, code]
}

/// A PARA_HEADER payload with no line segments or range tags.
pub(crate) fn para_header(text_len: u32, char_shapes: u16) -> Vec<u8> {
    Payload::new()
        .u32(text_len)
        .u32(0)
        .u16(0)
        .u8(0)
        .u8(0)
        .u16(char_shapes)
        .u16(0)
        .u16(0)
        .u32(0)
        .u16(0)
        .build()
}
