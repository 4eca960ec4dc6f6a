//! Geometric primitive records: line, rectangle, ellipse, arc, polygon, curve.

use super::read_point;
use crate::error::{Result, StructuralError};
use crate::hwp5::cursor::FieldReader;
use crate::hwp5::header::since;
use crate::model::{
    ArcKind, ArcShape, CurveSegment, CurveShape, EllipseShape, LineShape, Point, PolygonShape,
    RectShape,
};

pub mod ellipse_layout {
    use crate::hwp5::bits::BitField;

    pub const RECALCULATE: BitField = BitField::new("recalculate", 0, 1);
    pub const HAS_ARC: BitField = BitField::new("has_arc", 1, 1);
    pub const ARC_KIND: BitField = BitField::new("arc_kind", 2, 8);

    pub const ALL: &[BitField] = &[RECALCULATE, HAS_ARC, ARC_KIND];
}

pub fn decode_line(r: &mut FieldReader<'_>) -> Result<LineShape> {
    Ok(LineShape {
        start: read_point(r)?,
        end: read_point(r)?,
        flags: r
            .optional(since::BASELINE, 2, |r| r.read_u16())?
            .unwrap_or_default(),
    })
}

pub fn decode_rectangle(r: &mut FieldReader<'_>) -> Result<RectShape> {
    let round_ratio = r.read_u8()?;
    let mut corners = [Point::default(); 4];
    for corner in &mut corners {
        *corner = read_point(r)?;
    }
    Ok(RectShape {
        round_ratio,
        corners,
    })
}

pub fn decode_ellipse(r: &mut FieldReader<'_>) -> Result<EllipseShape> {
    use ellipse_layout::*;
    let property = r.read_u32()?;
    Ok(EllipseShape {
        property,
        has_arc: HAS_ARC.flag(property),
        arc_kind: ArcKind::from_code(ARC_KIND.get(property)),
        center: read_point(r)?,
        axis1: read_point(r)?,
        axis2: read_point(r)?,
        start1: read_point(r)?,
        end1: read_point(r)?,
        start2: read_point(r)?,
        end2: read_point(r)?,
    })
}

pub fn decode_arc(r: &mut FieldReader<'_>) -> Result<ArcShape> {
    Ok(ArcShape {
        kind: ArcKind::from_code(r.read_u8()? as u32),
        center: read_point(r)?,
        axis1: read_point(r)?,
        axis2: read_point(r)?,
    })
}

pub fn decode_polygon(r: &mut FieldReader<'_>) -> Result<PolygonShape> {
    let count = read_point_count(r, |n| n * 8)?;
    Ok(PolygonShape {
        points: read_points(r, count)?,
    })
}

/// Points, then one segment type byte per segment, then 4 reserved bytes when
/// present.
pub fn decode_curve(r: &mut FieldReader<'_>) -> Result<CurveShape> {
    let count = read_point_count(r, |n| n * 8 + n.saturating_sub(1))?;
    let points = read_points(r, count)?;
    let segments = (0..count.saturating_sub(1))
        .map(|_| Ok(CurveSegment::from_code(r.read_u8()? as u32)))
        .collect::<Result<Vec<_>>>()?;
    if r.remaining() == 4 {
        r.skip(4)?;
    }
    Ok(CurveShape { points, segments })
}

/// Reads a point count whose width differs between writers.
///
/// The count is taken as a u32 when the record length matches the body exactly,
/// or with 4 trailing reserved bytes. Otherwise it is a u16.
fn read_point_count(r: &mut FieldReader<'_>, body_len: impl Fn(usize) -> usize) -> Result<usize> {
    let offset = r.offset();
    let mut peek = r.clone();
    if let Ok(wide) = peek.read_u32() {
        let wide = wide as usize;
        let available = peek.remaining();
        if wide <= available / 8 {
            let body = body_len(wide);
            if body <= available && matches!(available - body, 0 | 4) {
                r.skip(4)?;
                return Ok(wide);
            }
        }
    }

    let narrow = r.read_u16()? as usize;
    if body_len(narrow) > r.remaining() {
        return Err(StructuralError::InvalidLength {
            offset,
            what: "point count",
            value: narrow as i64,
        }
        .into());
    }
    Ok(narrow)
}

fn read_points(r: &mut FieldReader<'_>, count: usize) -> Result<Vec<Point>> {
    (0..count).map(|_| read_point(r)).collect()
}
