//! Border lines and area fills.
//!
//! Shared by border/fill definitions in the resource table and by drawing
//! objects, which embed the same fill block after their line settings.

use super::ColorRef;
use bitflags::bitflags;
use serde::Serialize;

code_enum! {
    /// Line dash style of a border, underline or strike-out.
    pub enum LineType (default = Solid) {
        Solid = 0,
        LongDash = 1,
        Dot = 2,
        DashDot = 3,
        DashDotDot = 4,
        LongerDash = 5,
        Circle = 6,
        Double = 7,
        ThinThick = 8,
        ThickThin = 9,
        ThinThickThin = 10,
        Wave = 11,
        DoubleWave = 12,
        Thick3D = 13,
        Thick3DReverse = 14,
        Line3D = 15,
        Line3DReverse = 16,
    }
}

/// Border thickness table in millimetres, indexed by the stored code.
const THICKNESS_MM: [f32; 16] = [
    0.1, 0.12, 0.15, 0.2, 0.25, 0.3, 0.4, 0.5, 0.6, 0.7, 1.0, 1.5, 2.0, 3.0, 4.0, 5.0,
];

/// One side of a border.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BorderLine {
    pub line_type: LineType,
    /// Thickness code; see [`BorderLine::thickness_mm`].
    pub thickness: u8,
    pub color: ColorRef,
}

impl BorderLine {
    /// Thickness in millimetres; out-of-table codes clamp to the thickest entry.
    pub fn thickness_mm(&self) -> f32 {
        THICKNESS_MM[(self.thickness as usize).min(THICKNESS_MM.len() - 1)]
    }
}

bitflags! {
    /// Which fill blocks are present.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
    #[serde(transparent)]
    pub struct FillKinds: u32 {
        const COLOR = 0x0000_0001;
        const IMAGE = 0x0000_0002;
        const GRADIENT = 0x0000_0004;
    }
}

code_enum! {
    pub enum GradientType (default = Linear) {
        Linear = 1,
        Radial = 2,
        Conical = 3,
        Square = 4,
    }
}

code_enum! {
    /// How an image fill is laid out.
    pub enum ImageFillMode (default = TileAll) {
        TileAll = 0,
        TileHorzTop = 1,
        TileHorzBottom = 2,
        TileVertLeft = 3,
        TileVertRight = 4,
        Total = 5,
        Center = 6,
        CenterTop = 7,
        CenterBottom = 8,
        LeftCenter = 9,
        LeftTop = 10,
        LeftBottom = 11,
        RightCenter = 12,
        RightTop = 13,
        RightBottom = 14,
        Zoom = 15,
    }
}

code_enum! {
    pub enum ImageEffect (default = RealPicture) {
        RealPicture = 0,
        GrayScale = 1,
        BlackWhite = 2,
        Pattern = 3,
    }
}

/// Solid color or hatch fill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColorFill {
    pub background: ColorRef,
    pub pattern_color: ColorRef,
    /// Hatch style; negative means no pattern.
    pub pattern_type: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradientFill {
    pub gradient_type: GradientType,
    pub angle: i32,
    pub center_x: i32,
    pub center_y: i32,
    pub blur: i32,
    /// Color stop positions; only stored when there are more than two colors.
    pub positions: Vec<i32>,
    pub colors: Vec<ColorRef>,
    /// Blur center, stored in the fill's trailing block.
    pub blur_center: Option<u8>,
}

/// Picture attributes shared by image fills and picture objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PictureInfo {
    pub brightness: i8,
    pub contrast: i8,
    pub effect: ImageEffect,
    /// 1-based index into the bin data list.
    pub bin_data_id: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImageFill {
    pub mode: ImageFillMode,
    pub picture: PictureInfo,
}

/// A fill block: any combination of color, image and gradient.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FillInfo {
    pub kinds: FillKinds,
    pub color: Option<ColorFill>,
    pub image: Option<ImageFill>,
    pub gradient: Option<GradientFill>,
}

impl FillInfo {
    /// Returns true if no fill block is present.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Border/fill definition referenced by paragraphs, cells and pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BorderFill {
    pub property: u16,
    pub three_d: bool,
    pub shadow: bool,
    /// Slash diagonal shape code.
    pub slash: u8,
    /// Back-slash diagonal shape code.
    pub back_slash: u8,
    /// Left, right, top, bottom.
    pub borders: [BorderLine; 4],
    pub diagonal: BorderLine,
    pub fill: FillInfo,
}

impl BorderFill {
    pub fn left(&self) -> &BorderLine {
        &self.borders[0]
    }

    pub fn right(&self) -> &BorderLine {
        &self.borders[1]
    }

    pub fn top(&self) -> &BorderLine {
        &self.borders[2]
    }

    pub fn bottom(&self) -> &BorderLine {
        &self.borders[3]
    }
}
