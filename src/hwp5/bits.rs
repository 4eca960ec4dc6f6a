//! Bit-field extraction for packed attribute words.
//!
//! Almost every record stores flags and small enums packed into a u8/u16/u32.
//! Each record module declares its layout as a table of [`BitField`] constants so
//! the offsets live in one reviewable place; several published layouts disagree
//! with observed files and the tables record what files actually contain.

/// A named `(offset, width)` slice of an attribute word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub name: &'static str,
    pub offset: u8,
    pub width: u8,
}

impl BitField {
    pub const fn new(name: &'static str, offset: u8, width: u8) -> Self {
        Self {
            name,
            offset,
            width,
        }
    }

    /// Mask of `width` low bits.
    pub const fn mask(self) -> u32 {
        if self.width >= 32 {
            u32::MAX
        } else {
            (1u32 << self.width) - 1
        }
    }

    /// Extracts the field: `(value >> offset) & mask`.
    pub const fn get(self, value: u32) -> u32 {
        (value >> self.offset) & self.mask()
    }

    /// Extracts a one-bit (or any nonzero) field as a flag.
    pub const fn flag(self, value: u32) -> bool {
        self.get(value) != 0
    }

    /// Extracts the field as u8, for small numeric sub-fields.
    pub const fn get_u8(self, value: u32) -> u8 {
        self.get(value) as u8
    }
}

/// Checks that a layout table fits in `bits` bits and has no overlapping fields.
#[cfg(test)]
pub(crate) fn assert_layout(fields: &[BitField], bits: u8) {
    let mut used = 0u64;
    for field in fields {
        assert!(field.width > 0, "{} has zero width", field.name);
        assert!(
            field.offset as u32 + field.width as u32 <= bits as u32,
            "{} exceeds {} bits",
            field.name,
            bits
        );
        let mask = ((1u64 << field.width) - 1) << field.offset;
        assert_eq!(used & mask, 0, "{} overlaps another field", field.name);
        used |= mask;
    }
}
