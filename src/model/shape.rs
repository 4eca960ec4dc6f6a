//! Drawing objects and their group transforms.

use super::{
    ColorRef, CtrlId, FillInfo, LineType, Margins, ParaList, PictureInfo, Point,
};
use bytes::Bytes;
use serde::Serialize;

code_enum! {
    pub enum VertRelTo (default = Paper) {
        Paper = 0,
        Page = 1,
        Para = 2,
    }
}

code_enum! {
    pub enum HorzRelTo (default = Paper) {
        Paper = 0,
        Page = 1,
        Column = 2,
        Para = 3,
    }
}

code_enum! {
    pub enum TextWrap (default = Square) {
        Square = 0,
        TopAndBottom = 1,
        BehindText = 2,
        InFrontOfText = 3,
    }
}

/// Placement attributes shared by tables, drawing objects, equations and forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObjectCommon {
    pub property: u32,
    pub treat_as_char: bool,
    pub affect_line_spacing: bool,
    pub vert_rel_to: VertRelTo,
    pub vert_align: u8,
    pub horz_rel_to: HorzRelTo,
    pub horz_align: u8,
    pub flow_with_text: bool,
    pub allow_overlap: bool,
    pub text_wrap: TextWrap,
    pub vertical_offset: i32,
    pub horizontal_offset: i32,
    pub width: u32,
    pub height: u32,
    pub z_order: i32,
    pub margins: Margins,
    pub instance_id: u32,
    pub prevent_page_break: Option<i32>,
    pub description: Option<String>,
}

code_enum! {
    pub enum CaptionDirection (default = Left) {
        Left = 0,
        Right = 1,
        Top = 2,
        Bottom = 3,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Caption {
    pub list: ParaList,
    pub property: u32,
    pub direction: CaptionDirection,
    pub include_margin: bool,
    pub width: u32,
    pub gap: u16,
    pub max_text_width: u32,
}

/// Row-major 2x3 affine matrix `[a b tx; c d ty]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Matrix(pub [f64; 6]);

impl Matrix {
    pub const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);

    /// Returns `self * other`, applying `other` first.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        let [a1, b1, t1, c1, d1, u1] = self.0;
        let [a2, b2, t2, c2, d2, u2] = other.0;
        Matrix([
            a1 * a2 + b1 * c2,
            a1 * b2 + b1 * d2,
            a1 * t2 + b1 * u2 + t1,
            c1 * a2 + d1 * c2,
            c1 * b2 + d1 * d2,
            c1 * t2 + d1 * u2 + u1,
        ])
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [a, b, tx, c, d, ty] = self.0;
        (a * x + b * y + tx, c * x + d * y + ty)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix::IDENTITY
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScaleRotation {
    pub scale: Matrix,
    pub rotation: Matrix,
}

/// Translation plus one (scale, rotation) pair per grouping level.
///
/// A shape at group level `n` carries `n + 1` pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShapeTransform {
    pub translation: Matrix,
    pub pairs: Vec<ScaleRotation>,
}

impl ShapeTransform {
    /// Group level implied by the number of stored pairs.
    pub fn implied_level(&self) -> Option<usize> {
        self.pairs.len().checked_sub(1)
    }

    /// Composes translation and every pair into one matrix.
    pub fn combined(&self) -> Matrix {
        self.pairs.iter().fold(self.translation, |acc, pair| {
            acc.multiply(&pair.scale).multiply(&pair.rotation)
        })
    }
}

/// Outline settings of a drawing object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineInfo {
    pub color: ColorRef,
    pub thickness: i32,
    pub property: u32,
    pub line_type: LineType,
    pub end_cap: u8,
    pub arrow_start: u8,
    pub arrow_end: u8,
    pub outline_style: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShadowInfo {
    pub kind: u32,
    pub color: ColorRef,
    pub offset_x: i32,
    pub offset_y: i32,
    pub transparency: Option<u8>,
}

/// Geometry and styling shared by every drawing object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShapeComponent {
    /// Position inside the enclosing group.
    pub offset: Point,
    pub group_level: u16,
    pub local_version: u16,
    pub original_width: u32,
    pub original_height: u32,
    pub current_width: u32,
    pub current_height: u32,
    pub property: u32,
    pub horz_flip: bool,
    pub vert_flip: bool,
    pub rotation: u16,
    pub rotation_center: Point,
    pub transform: ShapeTransform,
    pub line: Option<LineInfo>,
    pub fill: Option<FillInfo>,
    pub shadow: Option<ShadowInfo>,
}

/// Text box inside a drawing object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DrawText {
    pub list: ParaList,
    pub margins: Margins,
    pub max_width: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineShape {
    pub start: Point,
    pub end: Point,
    pub flags: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RectShape {
    /// Corner rounding in percent; 50 makes a semicircle.
    pub round_ratio: u8,
    pub corners: [Point; 4],
}

code_enum! {
    pub enum ArcKind (default = Arc) {
        Arc = 0,
        CircularSector = 1,
        Bow = 2,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EllipseShape {
    pub property: u32,
    pub has_arc: bool,
    pub arc_kind: ArcKind,
    pub center: Point,
    pub axis1: Point,
    pub axis2: Point,
    pub start1: Point,
    pub end1: Point,
    pub start2: Point,
    pub end2: Point,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ArcShape {
    pub kind: ArcKind,
    pub center: Point,
    pub axis1: Point,
    pub axis2: Point,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PolygonShape {
    pub points: Vec<Point>,
}

code_enum! {
    pub enum CurveSegment (default = Line) {
        Line = 0,
        Curve = 1,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CurveShape {
    pub points: Vec<Point>,
    /// One entry per segment, `points.len() - 1` in total.
    pub segments: Vec<CurveSegment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContainerShape {
    /// Child ids as listed by the container.
    pub child_ids: Vec<CtrlId>,
    pub children: Vec<Shape>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Crop {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PictureShape {
    pub border_color: ColorRef,
    pub border_thickness: i32,
    pub border_property: u32,
    pub corners: [Point; 4],
    pub crop: Crop,
    pub padding: Margins,
    pub info: PictureInfo,
    pub border_transparency: u8,
    pub instance_id: u32,
    pub effect_flags: Option<u32>,
    /// Raw effect settings, kept when any effect flag is set.
    pub effects: Bytes,
    pub original_size: Option<(u32, u32)>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OleShape {
    pub property: u32,
    pub extent_x: i32,
    pub extent_y: i32,
    /// 1-based bin data id.
    pub bin_data_id: u16,
    pub border_color: ColorRef,
    pub border_thickness: i32,
    pub border_property: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VideoShape {
    /// 0 for a local file, 1 for a web video.
    pub kind: i32,
    pub bin_data_id: Option<u16>,
    pub web_tag: Option<String>,
    pub thumbnail_id: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextArtShape {
    pub text: String,
    pub font_name: String,
    pub font_style: String,
    /// Shape and layout settings after the strings.
    pub settings: Bytes,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConnectControlPoint {
    pub point: Point,
    pub kind: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectLineShape {
    pub kind: u32,
    pub start: Point,
    pub end: Point,
    pub start_subject_id: u32,
    pub start_subject_index: u32,
    pub end_subject_id: u32,
    pub end_subject_index: u32,
    pub control_points: Vec<ConnectControlPoint>,
}

/// Drawing object kind with its primitive data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ShapeKind {
    Line(LineShape),
    Rectangle(RectShape),
    Ellipse(EllipseShape),
    Arc(ArcShape),
    Polygon(PolygonShape),
    Curve(CurveShape),
    Container(ContainerShape),
    Picture(PictureShape),
    Ole(OleShape),
    Video(VideoShape),
    TextArt(TextArtShape),
    ConnectLine(ConnectLineShape),
    /// Unknown component id, kept with its primitive records undecoded.
    Unknown { child_records: usize },
}

/// One drawing object, possibly a group of further shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    pub id: CtrlId,
    pub component: ShapeComponent,
    pub text: Option<DrawText>,
    pub kind: ShapeKind,
}

impl Shape {
    /// Iterates this shape and every nested child, depth-first.
    pub fn walk(&self) -> Vec<&Shape> {
        let mut out = vec![self];
        if let ShapeKind::Container(container) = &self.kind {
            for child in &container.children {
                out.extend(child.walk());
            }
        }
        out
    }
}

/// General shape object (`gso `): placement plus the shape tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeObject {
    pub common: ObjectCommon,
    pub caption: Option<Caption>,
    pub shape: Shape,
}

impl ShapeObject {
    pub fn para_lists(&self) -> Vec<&ParaList> {
        let mut lists: Vec<&ParaList> = self.caption.iter().map(|c| &c.list).collect();
        for shape in self.shape.walk() {
            if let Some(text) = &shape.text {
                lists.push(&text.list);
            }
        }
        lists
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_compose() {
        let translate = Matrix([1.0, 0.0, 10.0, 0.0, 1.0, 20.0]);
        let scale = Matrix([2.0, 0.0, 0.0, 0.0, 3.0, 0.0]);
        let combined = translate.multiply(&scale);
        assert_eq!(combined.apply(1.0, 1.0), (12.0, 23.0));
        assert_eq!(Matrix::IDENTITY.multiply(&scale), scale);
    }

    #[test]
    fn test_transform_implied_level() {
        let mut transform = ShapeTransform::default();
        assert_eq!(transform.implied_level(), None);
        transform.pairs.push(ScaleRotation::default());
        transform.pairs.push(ScaleRotation::default());
        assert_eq!(transform.implied_level(), Some(1));
        assert_eq!(transform.combined(), Matrix::IDENTITY);
    }
}
