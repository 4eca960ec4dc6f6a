//! Small value types shared across the document model.

use serde::Serialize;
use std::fmt;

/// A COLORREF value stored as `0x00BBGGRR`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ColorRef(pub u32);

impl ColorRef {
    pub fn red(self) -> u8 {
        self.0 as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Returns the color as `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red(), self.green(), self.blue())
    }
}

impl fmt::Display for ColorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Four-sided inner spacing in HWPUNIT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Margins {
    pub left: u16,
    pub right: u16,
    pub top: u16,
    pub bottom: u16,
}

/// A point in HWPUNIT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Script groups that carry their own font settings.
///
/// Character shapes store one value per language in this order, and the face
/// name list is partitioned in this order as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Language {
    Hangul,
    Latin,
    Hanja,
    Japanese,
    Other,
    Symbol,
    User,
}

impl Language {
    /// All languages in on-disk order.
    pub const ALL: [Language; 7] = [
        Language::Hangul,
        Language::Latin,
        Language::Hanja,
        Language::Japanese,
        Language::Other,
        Language::Symbol,
        Language::User,
    ];

    /// Position of this language in per-language arrays.
    pub fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorref_channels() {
        let color = ColorRef(0x00FF8040);
        assert_eq!(color.red(), 0x40);
        assert_eq!(color.green(), 0x80);
        assert_eq!(color.blue(), 0xFF);
        assert_eq!(color.to_hex(), "#4080FF");
    }

    #[test]
    fn test_language_order() {
        for (i, lang) in Language::ALL.iter().enumerate() {
            assert_eq!(lang.index(), i);
        }
    }
}
