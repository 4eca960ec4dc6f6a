//! Character, paragraph and named style definitions.

use super::{ColorRef, LineType};
use serde::Serialize;

code_enum! {
    pub enum UnderlineType (default = None) {
        None = 0,
        Below = 1,
        Above = 3,
    }
}

code_enum! {
    pub enum OutlineType (default = None) {
        None = 0,
        Solid = 1,
        Dot = 2,
        Thick = 3,
        Dash = 4,
        DashDot = 5,
        DashDotDot = 6,
    }
}

code_enum! {
    pub enum ShadowType (default = None) {
        None = 0,
        Discrete = 1,
        Continuous = 2,
    }
}

/// Flags and small enums packed into the character shape property word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CharAttributes {
    pub italic: bool,
    pub bold: bool,
    pub underline: UnderlineType,
    pub underline_shape: LineType,
    pub outline: OutlineType,
    pub shadow: ShadowType,
    pub emboss: bool,
    pub engrave: bool,
    pub superscript: bool,
    pub subscript: bool,
    pub strike_out: bool,
    pub emphasis: u8,
    pub use_font_space: bool,
    pub strike_shape: LineType,
    pub kerning: bool,
}

/// Character formatting, referenced by paragraph char-shape ranges.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CharShape {
    /// Face name id per language (0-based within that language's list).
    pub face_ids: [u16; 7],
    pub ratios: [u8; 7],
    pub spacings: [i8; 7],
    pub relative_sizes: [u8; 7],
    pub offsets: [i8; 7],
    /// Base size in 1/100 pt.
    pub base_size: i32,
    pub property: u32,
    pub attributes: CharAttributes,
    pub shadow_gap_x: i8,
    pub shadow_gap_y: i8,
    pub text_color: ColorRef,
    pub underline_color: ColorRef,
    pub shade_color: ColorRef,
    pub shadow_color: ColorRef,
    pub border_fill_id: Option<u16>,
    pub strike_color: Option<ColorRef>,
    /// Face names per language, filled in by the resolution pass.
    pub face_names: [Option<String>; 7],
}

impl CharShape {
    /// Font size in points.
    pub fn size_pt(&self) -> f32 {
        self.base_size as f32 / 100.0
    }
}

code_enum! {
    pub enum Alignment (default = Justify) {
        Justify = 0,
        Left = 1,
        Right = 2,
        Center = 3,
        Distribute = 4,
        Divide = 5,
    }
}

code_enum! {
    pub enum LineSpacingType (default = Percent) {
        Percent = 0,
        Fixed = 1,
        BetweenLines = 2,
        AtLeast = 3,
    }
}

code_enum! {
    pub enum BreakLatinWord (default = KeepWord) {
        KeepWord = 0,
        Hyphenation = 1,
        BreakWord = 2,
    }
}

code_enum! {
    pub enum ParaVerticalAlign (default = Baseline) {
        Baseline = 0,
        Top = 1,
        Center = 2,
        Bottom = 3,
    }
}

code_enum! {
    /// Paragraph head kind.
    pub enum HeadShape (default = None) {
        None = 0,
        Outline = 1,
        Numbering = 2,
        Bullet = 3,
    }
}

/// Flags and small enums packed into the first paragraph shape property word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParaAttributes {
    pub line_spacing_type: LineSpacingType,
    pub alignment: Alignment,
    pub break_latin_word: BreakLatinWord,
    pub break_non_latin_word: bool,
    pub snap_to_grid: bool,
    /// Minimum space ratio for condensing (0-75%).
    pub condense: u8,
    pub widow_orphan: bool,
    pub keep_with_next: bool,
    pub keep_lines: bool,
    pub page_break_before: bool,
    pub vertical_align: ParaVerticalAlign,
    pub font_line_height: bool,
    pub head_shape: HeadShape,
    /// Outline level (0-based).
    pub level: u8,
    pub connect_border: bool,
    pub ignore_margin: bool,
    pub tail_shape: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParaShape {
    pub property1: u32,
    pub attributes: ParaAttributes,
    pub left_margin: i32,
    pub right_margin: i32,
    pub indent: i32,
    pub top_spacing: i32,
    pub bottom_spacing: i32,
    /// Line spacing of the pre-5.0.2.5 layout.
    pub line_spacing_old: i32,
    pub tab_def_id: u16,
    /// Numbering or bullet id, depending on the head shape (1-based).
    pub numbering_id: u16,
    pub border_fill_id: u16,
    /// Left, right, top, bottom.
    pub border_offsets: [i16; 4],
    pub property2: Option<u32>,
    pub property3: Option<u32>,
    pub line_spacing: Option<u32>,
}

impl ParaShape {
    /// Effective line spacing kind, preferring the newer property word.
    pub fn line_spacing_type(&self) -> LineSpacingType {
        match self.property3 {
            Some(p3) => LineSpacingType::from_code(p3 & 0x1F),
            None => self.attributes.line_spacing_type,
        }
    }

    /// Effective line spacing value.
    pub fn line_spacing_value(&self) -> i64 {
        match self.line_spacing {
            Some(value) => value as i64,
            None => self.line_spacing_old as i64,
        }
    }
}

code_enum! {
    pub enum TabKind (default = Left) {
        Left = 0,
        Right = 1,
        Center = 2,
        Decimal = 3,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TabStop {
    pub position: u32,
    pub kind: TabKind,
    pub fill: LineType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TabDef {
    pub property: u32,
    pub auto_tab_left: bool,
    pub auto_tab_right: bool,
    pub tabs: Vec<TabStop>,
}

code_enum! {
    pub enum HeadAlignment (default = Left) {
        Left = 0,
        Center = 1,
        Right = 2,
    }
}

/// Per-level paragraph head settings shared by numbering and bullets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParaHeadInfo {
    pub property: u32,
    pub alignment: HeadAlignment,
    pub use_instance_width: bool,
    pub auto_indent: bool,
    pub distance_by_ratio: bool,
    pub width_adjust: i16,
    pub text_distance: i16,
    pub char_shape_id: u32,
    /// Number format string such as `^1.`; empty for bullets.
    pub format: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Numbering {
    /// Level heads, seven for older files and up to ten for newer ones.
    pub levels: Vec<ParaHeadInfo>,
    pub start_number: u16,
    pub level_start_numbers: Vec<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulletImage {
    pub brightness: i8,
    pub contrast: i8,
    pub effect: u8,
    pub bin_data_id: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bullet {
    pub head: ParaHeadInfo,
    pub bullet_char: char,
    pub image_id: i32,
    pub image: Option<BulletImage>,
    pub check_char: Option<char>,
}

code_enum! {
    pub enum StyleKind (default = Paragraph) {
        Paragraph = 0,
        Character = 1,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Style {
    pub name: String,
    pub english_name: String,
    pub property: u8,
    pub kind: StyleKind,
    /// Style applied to the following paragraph (0-based).
    pub next_style_id: u8,
    pub language_id: i16,
    pub para_shape_id: u16,
    pub char_shape_id: u16,
    pub lock_form: Option<u16>,
}

code_enum! {
    pub enum FontType (default = Unknown) {
        Unknown = 0,
        TrueType = 1,
        Hft = 2,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlternateFont {
    pub font_type: FontType,
    pub name: String,
}

/// PANOSE-like font classification bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FontTypeInfo {
    pub family: u8,
    pub serif: u8,
    pub weight: u8,
    pub proportion: u8,
    pub contrast: u8,
    pub stroke_variation: u8,
    pub arm_style: u8,
    pub letterform: u8,
    pub midline: u8,
    pub x_height: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FaceName {
    pub property: u8,
    pub name: String,
    pub alternate: Option<AlternateFont>,
    pub type_info: Option<FontTypeInfo>,
    pub default_font: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_spacing_prefers_new_fields() {
        let mut shape = ParaShape {
            line_spacing_old: 160,
            ..Default::default()
        };
        shape.attributes.line_spacing_type = LineSpacingType::Fixed;
        assert_eq!(shape.line_spacing_type(), LineSpacingType::Fixed);
        assert_eq!(shape.line_spacing_value(), 160);

        shape.property3 = Some(3);
        shape.line_spacing = Some(200);
        assert_eq!(shape.line_spacing_type(), LineSpacingType::AtLeast);
        assert_eq!(shape.line_spacing_value(), 200);
    }

    #[test]
    fn test_alignment_default() {
        assert_eq!(Alignment::from_code(9), Alignment::Justify);
        assert_eq!(Alignment::from_code(3), Alignment::Center);
    }
}
