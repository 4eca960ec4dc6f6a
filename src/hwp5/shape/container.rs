//! Grouped drawing objects (`$con`).
//!
//! A container lists its child ids, then the children follow as nested
//! SHAPE_COMPONENT records. The children are bounded by the framed records
//! under the container, not by how much each child decoder reads.

use super::decode_shape;
use crate::diagnostic::DiagnosticKind;
use crate::error::{Result, StructuralError};
use crate::hwp5::control::children::Children;
use crate::hwp5::cursor::FieldReader;
use crate::hwp5::dispatch::DecodeContext;
use crate::hwp5::record::{RecordNode, TagId};
use crate::model::{ContainerShape, CtrlId};

/// Reads a u16 child count and that many child ids.
pub fn read_child_ids(r: &mut FieldReader<'_>) -> Result<Vec<CtrlId>> {
    let offset = r.offset();
    let count = r.read_u16()? as usize;
    if count * 4 > r.remaining() {
        return Err(StructuralError::InvalidLength {
            offset,
            what: "container child count",
            value: count as i64,
        }
        .into());
    }
    (0..count).map(|_| Ok(CtrlId(r.read_u32()?))).collect()
}

pub fn decode_container(
    node: &RecordNode,
    child_ids: Option<Vec<CtrlId>>,
    children: &mut Children<'_>,
    ctx: &mut DecodeContext<'_>,
    depth: usize,
) -> Result<ContainerShape> {
    let child_ids = match child_ids {
        Some(ids) => ids,
        None => {
            // Some writers put the id list in a record of its own.
            let Some(list) = children.next_if(TagId::ShapeComponentContainer) else {
                return Err(StructuralError::MissingChild {
                    offset: node.offset(),
                    parent: "shape container",
                    expected: "child id list",
                }
                .into());
            };
            let mut r = ctx.reader(&list.record);
            let ids = read_child_ids(&mut r)?;
            ctx.check_consumed(&list.record, &r);
            ids
        }
    };

    let mut region = Vec::new();
    while let Some(child) = children.next_if(TagId::ShapeComponent) {
        region.push(child);
    }
    let declared = child_ids.len();
    if region.len() < declared {
        return Err(StructuralError::ContainerOverrun {
            offset: node.offset(),
            declared,
            found: region.len(),
        }
        .into());
    }
    if region.len() > declared {
        ctx.diag(
            DiagnosticKind::Inconsistent,
            node.offset(),
            format!(
                "container lists {} children, {} present",
                declared,
                region.len()
            ),
        );
    }
    let region_len: u64 = region.iter().map(|child| child.framed_len()).sum();
    log::debug!(
        "container at {} holds {} children in {} bytes",
        node.offset(),
        region.len(),
        region_len
    );

    let mut shapes = Vec::with_capacity(region.len());
    for (index, child) in region.into_iter().enumerate() {
        let shape = decode_shape(child, ctx, depth + 1, false)?;
        if let Some(&listed) = child_ids.get(index) {
            if listed != shape.id {
                ctx.diag(
                    DiagnosticKind::Inconsistent,
                    child.offset(),
                    format!("container lists '{listed}', child is '{}'", shape.id),
                );
            }
        }
        shapes.push(shape);
    }

    Ok(ContainerShape {
        child_ids,
        children: shapes,
    })
}
