//! Drawing objects (`gso `).
//!
//! The control header holds the common object block. Under it sit an optional
//! caption list and one SHAPE_COMPONENT, which carries the geometry and group
//! transform of the object and owns its primitive record, its text box and, for
//! containers, the child components.

pub mod container;
pub mod picture;
pub mod primitives;

use super::control::children::Children;
use super::control::common::{read_margins, read_object_common, take_caption, take_para_list};
use super::cursor::FieldReader;
use super::dispatch::DecodeContext;
use super::docinfo::border_fill::read_fill_info;
use super::header::since;
use super::record::{RecordNode, TagId};
use crate::diagnostic::DiagnosticKind;
use crate::error::{Result, StructuralError};
use crate::model::{
    ColorRef, CtrlId, DrawText, LineInfo, LineType, Matrix, Point, ScaleRotation, Shape,
    ShapeComponent, ShapeKind, ShapeObject, ShapeTransform, ShadowInfo,
};

pub mod layout {
    use crate::hwp5::bits::BitField;

    pub const HORZ_FLIP: BitField = BitField::new("horz_flip", 0, 1);
    pub const VERT_FLIP: BitField = BitField::new("vert_flip", 1, 1);

    pub const ALL: &[BitField] = &[HORZ_FLIP, VERT_FLIP];
}

/// Outline property word.
pub mod line_layout {
    use crate::hwp5::bits::BitField;

    pub const LINE_TYPE: BitField = BitField::new("line_type", 0, 6);
    pub const END_CAP: BitField = BitField::new("end_cap", 6, 4);
    pub const ARROW_START: BitField = BitField::new("arrow_start", 10, 6);
    pub const ARROW_END: BitField = BitField::new("arrow_end", 16, 6);

    pub const ALL: &[BitField] = &[LINE_TYPE, END_CAP, ARROW_START, ARROW_END];
}

/// Size of the outline block.
const LINE_INFO_LEN: usize = 13;
/// Size of the shadow block without its transparency byte.
const SHADOW_LEN: usize = 16;

/// Reads a `gso ` control.
pub fn decode_shape_object(
    r: &mut FieldReader<'_>,
    children: &mut Children<'_>,
    ctx: &mut DecodeContext<'_>,
    depth: usize,
) -> Result<ShapeObject> {
    let common = read_object_common(r)?;
    let mut caption = take_caption(children, ctx, depth)?;

    let Some(node) = children.next_if(TagId::ShapeComponent) else {
        return Err(StructuralError::MissingChild {
            offset: r.offset(),
            parent: "drawing object",
            expected: "SHAPE_COMPONENT",
        }
        .into());
    };
    let shape = decode_shape(node, ctx, depth, true)?;

    if caption.is_none() {
        caption = take_caption(children, ctx, depth)?;
    }
    Ok(ShapeObject {
        common,
        caption,
        shape,
    })
}

/// Decodes one SHAPE_COMPONENT node and everything under it.
///
/// The component of a top-level object repeats its id; components inside a
/// container store it once.
pub fn decode_shape(
    node: &RecordNode,
    ctx: &mut DecodeContext<'_>,
    depth: usize,
    top_level: bool,
) -> Result<Shape> {
    ctx.check_depth(depth, node.offset())?;
    let mut r = ctx.reader(&node.record);
    let id = CtrlId(r.read_u32()?);
    if top_level {
        let again = CtrlId(r.read_u32()?);
        if again != id {
            ctx.diag(
                DiagnosticKind::Inconsistent,
                node.offset(),
                format!("component ids differ: '{id}' and '{again}'"),
            );
        }
    }

    let mut component = read_component(&mut r)?;
    let expected_pairs = component.group_level as usize + 1;
    if component.transform.pairs.len() != expected_pairs {
        ctx.diag(
            DiagnosticKind::Inconsistent,
            node.offset(),
            format!(
                "group level {} with {} transform pairs",
                component.group_level,
                component.transform.pairs.len()
            ),
        );
    }

    let mut child_ids = None;
    if id == CtrlId::SHAPE_CONTAINER {
        if r.has(2) {
            child_ids = Some(container::read_child_ids(&mut r)?);
        }
    } else {
        read_styles(&mut r, &mut component)?;
    }
    ctx.check_consumed(&node.record, &r);

    let mut children = Children::new(&node.children);
    let mut text = take_draw_text(&mut children, ctx, depth)?;
    let kind = decode_kind(id, child_ids, node, &mut children, ctx, depth)?;
    if text.is_none() {
        text = take_draw_text(&mut children, ctx, depth)?;
    }
    for leftover in children.rest() {
        ctx.diag(
            DiagnosticKind::UnexpectedRecord,
            leftover.offset(),
            format!("{:?} under shape '{}' ignored", leftover.tag(), id),
        );
    }

    Ok(Shape {
        id,
        component,
        text,
        kind,
    })
}

fn decode_kind(
    id: CtrlId,
    child_ids: Option<Vec<CtrlId>>,
    node: &RecordNode,
    children: &mut Children<'_>,
    ctx: &mut DecodeContext<'_>,
    depth: usize,
) -> Result<ShapeKind> {
    use primitives::*;
    let offset = node.offset();
    let kind = match id {
        CtrlId::SHAPE_LINE => ShapeKind::Line(take_primitive(
            children,
            ctx,
            offset,
            TagId::ShapeComponentLine,
            decode_line,
        )?),
        CtrlId::SHAPE_RECTANGLE => ShapeKind::Rectangle(take_primitive(
            children,
            ctx,
            offset,
            TagId::ShapeComponentRectangle,
            decode_rectangle,
        )?),
        CtrlId::SHAPE_ELLIPSE => ShapeKind::Ellipse(take_primitive(
            children,
            ctx,
            offset,
            TagId::ShapeComponentEllipse,
            decode_ellipse,
        )?),
        CtrlId::SHAPE_ARC => ShapeKind::Arc(take_primitive(
            children,
            ctx,
            offset,
            TagId::ShapeComponentArc,
            decode_arc,
        )?),
        CtrlId::SHAPE_POLYGON => ShapeKind::Polygon(take_primitive(
            children,
            ctx,
            offset,
            TagId::ShapeComponentPolygon,
            decode_polygon,
        )?),
        CtrlId::SHAPE_CURVE => ShapeKind::Curve(take_primitive(
            children,
            ctx,
            offset,
            TagId::ShapeComponentCurve,
            decode_curve,
        )?),
        CtrlId::SHAPE_PICTURE => ShapeKind::Picture(take_primitive(
            children,
            ctx,
            offset,
            TagId::ShapeComponentPicture,
            picture::decode_picture,
        )?),
        CtrlId::SHAPE_OLE => ShapeKind::Ole(take_primitive(
            children,
            ctx,
            offset,
            TagId::ShapeComponentOle,
            picture::decode_ole,
        )?),
        CtrlId::SHAPE_VIDEO => ShapeKind::Video(take_primitive(
            children,
            ctx,
            offset,
            TagId::VideoData,
            picture::decode_video,
        )?),
        CtrlId::SHAPE_TEXT_ART => ShapeKind::TextArt(take_primitive(
            children,
            ctx,
            offset,
            TagId::ShapeComponentTextArt,
            picture::decode_text_art,
        )?),
        // Connectors reuse the line record with a longer layout.
        CtrlId::SHAPE_CONNECT_LINE => ShapeKind::ConnectLine(take_primitive(
            children,
            ctx,
            offset,
            TagId::ShapeComponentLine,
            picture::decode_connect_line,
        )?),
        CtrlId::SHAPE_CONTAINER => ShapeKind::Container(container::decode_container(
            node, child_ids, children, ctx, depth,
        )?),
        _ => {
            let rest = children.rest();
            ctx.diag(
                DiagnosticKind::UnknownControl,
                offset,
                format!("shape component '{id}' kept undecoded"),
            );
            ShapeKind::Unknown {
                child_records: rest.len(),
            }
        }
    };
    Ok(kind)
}

/// Takes the primitive record of a component and decodes it.
fn take_primitive<T>(
    children: &mut Children<'_>,
    ctx: &mut DecodeContext<'_>,
    offset: u64,
    tag: TagId,
    decode: impl FnOnce(&mut FieldReader<'_>) -> Result<T>,
) -> Result<T> {
    let Some(node) = children.next_if(tag) else {
        return Err(StructuralError::MissingChild {
            offset,
            parent: "shape component",
            expected: "primitive record",
        }
        .into());
    };
    let mut r = ctx.reader(&node.record);
    let value = decode(&mut r)?;
    ctx.check_consumed(&node.record, &r);
    Ok(value)
}

/// Reads the geometry block and transform shared by every component.
pub fn read_component(r: &mut FieldReader<'_>) -> Result<ShapeComponent> {
    let offset = read_point(r)?;
    let group_level = r.read_u16()?;
    let local_version = r.read_u16()?;
    let original_width = r.read_u32()?;
    let original_height = r.read_u32()?;
    let current_width = r.read_u32()?;
    let current_height = r.read_u32()?;
    let property = r.read_u32()?;
    let rotation = r.read_u16()?;
    let rotation_center = read_point(r)?;
    let transform = read_transform(r)?;

    Ok(ShapeComponent {
        offset,
        group_level,
        local_version,
        original_width,
        original_height,
        current_width,
        current_height,
        property,
        horz_flip: layout::HORZ_FLIP.flag(property),
        vert_flip: layout::VERT_FLIP.flag(property),
        rotation,
        rotation_center,
        transform,
        ..Default::default()
    })
}

/// Reads the pair count, the translation matrix, then each (scale, rotation)
/// pair.
pub fn read_transform(r: &mut FieldReader<'_>) -> Result<ShapeTransform> {
    let count_offset = r.offset();
    let count = r.read_u16()? as usize;
    // Translation plus two matrices per pair, six f64 each.
    if (1 + 2 * count) * 48 > r.remaining() {
        return Err(StructuralError::InvalidLength {
            offset: count_offset,
            what: "transform pair count",
            value: count as i64,
        }
        .into());
    }

    let translation = read_matrix(r)?;
    let mut pairs = Vec::with_capacity(count);
    for _ in 0..count {
        pairs.push(ScaleRotation {
            scale: read_matrix(r)?,
            rotation: read_matrix(r)?,
        });
    }
    Ok(ShapeTransform { translation, pairs })
}

fn read_matrix(r: &mut FieldReader<'_>) -> Result<Matrix> {
    let mut m = [0.0; 6];
    for value in &mut m {
        *value = r.read_f64()?;
    }
    Ok(Matrix(m))
}

pub fn read_point(r: &mut FieldReader<'_>) -> Result<Point> {
    Ok(Point::new(r.read_i32()?, r.read_i32()?))
}

/// Reads outline, fill and shadow, each present only if the record has room.
fn read_styles(r: &mut FieldReader<'_>, component: &mut ShapeComponent) -> Result<()> {
    component.line = r.optional(since::BASELINE, LINE_INFO_LEN, read_line_info)?;
    if component.line.is_none() {
        return Ok(());
    }
    component.fill = r.optional(since::BASELINE, 4, read_fill_info)?;
    component.shadow = r.optional(since::BASELINE, SHADOW_LEN, read_shadow)?;
    Ok(())
}

pub fn read_line_info(r: &mut FieldReader<'_>) -> Result<LineInfo> {
    use line_layout::*;
    let color = ColorRef(r.read_u32()?);
    let thickness = r.read_i32()?;
    let property = r.read_u32()?;
    Ok(LineInfo {
        color,
        thickness,
        property,
        line_type: LineType::from_code(LINE_TYPE.get(property)),
        end_cap: END_CAP.get_u8(property),
        arrow_start: ARROW_START.get_u8(property),
        arrow_end: ARROW_END.get_u8(property),
        outline_style: r.read_u8()?,
    })
}

fn read_shadow(r: &mut FieldReader<'_>) -> Result<ShadowInfo> {
    Ok(ShadowInfo {
        kind: r.read_u32()?,
        color: ColorRef(r.read_u32()?),
        offset_x: r.read_i32()?,
        offset_y: r.read_i32()?,
        transparency: r.optional(since::BASELINE, 1, |r| r.read_u8())?,
    })
}

/// Takes a text box list if one comes next.
fn take_draw_text(
    children: &mut Children<'_>,
    ctx: &mut DecodeContext<'_>,
    depth: usize,
) -> Result<Option<DrawText>> {
    let list = take_para_list(children, ctx, depth, |r| {
        let margins = read_margins(r)?;
        let max_width = r.read_u32()?;
        // Reserved trailing bytes.
        r.rest();
        Ok((margins, max_width))
    })?;
    Ok(list.map(|(list, (margins, max_width))| DrawText {
        list,
        margins,
        max_width,
    }))
}
