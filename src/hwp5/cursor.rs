//! Bounds-checked readers over record payloads.
//!
//! [`ByteCursor`] is the only way decoders touch payload bytes, so no decoder can
//! read past its own record: every overrun becomes
//! [`StructuralError::UnexpectedEof`]. [`FieldReader`] adds the document version
//! and the version-and-length double guard for optional trailing fields.

use super::header::Version;
use crate::error::{Result, StructuralError};
use std::ops::{Deref, DerefMut};

/// Forward-only little-endian reader over one payload slice.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    base: u64,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor; `base` is the absolute stream offset of `data[0]`.
    pub fn new(data: &'a [u8], base: u64) -> Self {
        Self { data, pos: 0, base }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total payload length.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true when every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns true if at least `n` bytes remain.
    pub fn has(&self, n: usize) -> bool {
        self.remaining() >= n
    }

    /// Absolute stream offset of the next byte.
    pub fn offset(&self) -> u64 {
        self.base + self.pos as u64
    }

    /// Reads `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if !self.has(n) {
            return Err(StructuralError::UnexpectedEof {
                offset: self.offset(),
                needed: n,
                available: self.remaining(),
            }
            .into());
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Reads a fixed-size byte array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Skips `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }

    /// Consumes and returns everything left.
    pub fn rest(&mut self) -> &'a [u8] {
        let slice = &self.data[self.pos..];
        self.pos = self.data.len();
        slice
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }

    /// Reads `count` UTF-16 code units.
    pub fn read_units(&mut self, count: usize) -> Result<Vec<u16>> {
        let bytes = self.read_bytes(count.saturating_mul(2))?;
        Ok(bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect())
    }

    /// Reads a single WCHAR as a char; unpaired surrogates become U+FFFD.
    pub fn read_wchar(&mut self) -> Result<char> {
        let unit = self.read_u16()?;
        Ok(char::from_u32(unit as u32).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    /// Reads a WORD-length-prefixed UTF-16 string.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u16()? as usize;
        let units = self.read_units(len)?;
        Ok(String::from_utf16_lossy(&units))
    }
}

/// A [`ByteCursor`] that knows which format version it is decoding.
#[derive(Debug, Clone)]
pub struct FieldReader<'a> {
    cursor: ByteCursor<'a>,
    version: Version,
}

impl<'a> FieldReader<'a> {
    /// Creates a reader over one record payload.
    pub fn new(data: &'a [u8], base: u64, version: Version) -> Self {
        Self {
            cursor: ByteCursor::new(data, base),
            version,
        }
    }

    /// Document version driving the optional-field gates.
    pub fn version(&self) -> Version {
        self.version
    }

    /// True if a field of `size` bytes introduced at `since` may be read.
    ///
    /// Both conditions must hold: real files are often shorter than their
    /// version implies, and older files never carry newer fields.
    pub fn gate(&self, since: Version, size: usize) -> bool {
        self.version >= since && self.cursor.has(size)
    }

    /// Reads an optional field of `size` bytes if its gate is open.
    pub fn optional<T>(
        &mut self,
        since: Version,
        size: usize,
        read: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<Option<T>> {
        if self.gate(since, size) {
            read(self).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Reads an optional block whose length is only known while reading it.
    ///
    /// The block is read from a copy of the reader and kept only if it reads
    /// completely. A block cut short by the payload end is treated as absent
    /// and nothing is consumed.
    pub fn optional_block<T>(
        &mut self,
        since: Version,
        min_size: usize,
        read: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<Option<T>> {
        if !self.gate(since, min_size) {
            return Ok(None);
        }
        let mut ahead = self.clone();
        match read(&mut ahead) {
            Ok(value) => {
                *self = ahead;
                Ok(Some(value))
            }
            Err(err) if err.is_structural() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Reads an optional WORD-length-prefixed string if its gate is open.
    pub fn optional_string(&mut self, since: Version) -> Result<Option<String>> {
        self.optional(since, 2, |r| r.read_string())
    }
}

impl<'a> Deref for FieldReader<'a> {
    type Target = ByteCursor<'a>;

    fn deref(&self) -> &Self::Target {
        &self.cursor
    }
}

impl DerefMut for FieldReader<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.cursor
    }
}
