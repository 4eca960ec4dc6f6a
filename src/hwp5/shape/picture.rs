//! Pictures, OLE objects, videos, text art and connectors.

use super::read_point;
use crate::error::{Result, StructuralError};
use crate::hwp5::control::common::read_margins;
use crate::hwp5::cursor::FieldReader;
use crate::hwp5::docinfo::border_fill::read_picture_info;
use crate::hwp5::header::since;
use crate::model::{
    ColorRef, ConnectControlPoint, ConnectLineShape, Crop, OleShape, PictureShape, Point,
    TextArtShape, VideoShape,
};
use bytes::Bytes;

/// Size of one connector control point.
const CONTROL_POINT_LEN: usize = 10;

pub fn decode_picture(r: &mut FieldReader<'_>) -> Result<PictureShape> {
    let border_color = ColorRef(r.read_u32()?);
    let border_thickness = r.read_i32()?;
    let border_property = r.read_u32()?;
    let mut corners = [Point::default(); 4];
    for corner in &mut corners {
        *corner = read_point(r)?;
    }
    let crop = Crop {
        left: r.read_i32()?,
        top: r.read_i32()?,
        right: r.read_i32()?,
        bottom: r.read_i32()?,
    };
    let padding = read_margins(r)?;
    let info = read_picture_info(r)?;
    let border_transparency = r.read_u8()?;
    let instance_id = r.read_u32()?;
    let effect_flags = r.optional(since::OBJECT_DESCRIPTION, 4, |r| r.read_u32())?;

    // Effect settings vary in length; the original pixel size closes the record.
    let (effects, original_size) = if r.has(8) {
        let len = r.remaining() - 8;
        let effects = Bytes::copy_from_slice(r.read_bytes(len)?);
        (effects, Some((r.read_u32()?, r.read_u32()?)))
    } else {
        (Bytes::copy_from_slice(r.rest()), None)
    };

    Ok(PictureShape {
        border_color,
        border_thickness,
        border_property,
        corners,
        crop,
        padding,
        info,
        border_transparency,
        instance_id,
        effect_flags,
        effects,
        original_size,
    })
}

pub fn decode_ole(r: &mut FieldReader<'_>) -> Result<OleShape> {
    Ok(OleShape {
        property: r.read_u32()?,
        extent_x: r.read_i32()?,
        extent_y: r.read_i32()?,
        bin_data_id: r.read_u16()?,
        border_color: ColorRef(r.read_u32()?),
        border_thickness: r.read_i32()?,
        border_property: r.read_u32()?,
    })
}

/// Local videos point at a bin data item, web videos carry an embed tag.
pub fn decode_video(r: &mut FieldReader<'_>) -> Result<VideoShape> {
    let kind = r.read_i32()?;
    let mut video = VideoShape {
        kind,
        ..Default::default()
    };
    if kind == 0 {
        video.bin_data_id = Some(r.read_u16()?);
    } else {
        video.web_tag = Some(r.read_string()?);
    }
    video.thumbnail_id = r.optional(since::BASELINE, 2, |r| r.read_u16())?;
    Ok(video)
}

pub fn decode_text_art(r: &mut FieldReader<'_>) -> Result<TextArtShape> {
    Ok(TextArtShape {
        text: r.read_string()?,
        font_name: r.read_string()?,
        font_style: r.read_string()?,
        settings: Bytes::copy_from_slice(r.rest()),
    })
}

pub fn decode_connect_line(r: &mut FieldReader<'_>) -> Result<ConnectLineShape> {
    let mut line = ConnectLineShape {
        kind: r.read_u32()?,
        start: read_point(r)?,
        end: read_point(r)?,
        start_subject_id: r.read_u32()?,
        start_subject_index: r.read_u32()?,
        end_subject_id: r.read_u32()?,
        end_subject_index: r.read_u32()?,
        ..Default::default()
    };

    let offset = r.offset();
    let Some(count) = r.optional(since::BASELINE, 4, |r| r.read_u32())? else {
        return Ok(line);
    };
    let count = count as usize;
    if count > r.remaining() / CONTROL_POINT_LEN {
        return Err(StructuralError::InvalidLength {
            offset,
            what: "connector control point count",
            value: count as i64,
        }
        .into());
    }
    for _ in 0..count {
        line.control_points.push(ConnectControlPoint {
            point: read_point(r)?,
            kind: r.read_u16()?,
        });
    }
    Ok(line)
}
