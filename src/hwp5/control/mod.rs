//! Control decoding.
//!
//! A CTRL_HEADER starts with a 4-byte control id followed by a body whose layout
//! depends on that id. Most controls also own child records (paragraph lists,
//! table and shape records, CTRL_DATA). The id selects a decoder; decoders pull
//! the children they understand from a [`Children`] cursor.

pub mod children;
pub mod common;
pub mod field;
pub mod form;
pub mod note;
pub mod numbering;
pub mod param;
pub mod section;
pub mod table;

use self::children::Children;
use super::cursor::FieldReader;
use super::dispatch::DecodeContext;
use super::record::RecordNode;
use super::shape;
use crate::diagnostic::DiagnosticKind;
use crate::error::{Error, Result};
use crate::model::{Ctrl, CtrlId, OpaqueCtrl};

/// Decodes a CTRL_HEADER node with everything nested under it.
///
/// Unknown ids and unmodeled controls come back as [`Ctrl::Opaque`] with a
/// diagnostic; structural faults propagate.
pub fn decode_ctrl(node: &RecordNode, ctx: &mut DecodeContext<'_>, depth: usize) -> Result<Ctrl> {
    ctx.check_depth(depth, node.offset())?;
    let record = &node.record;
    let mut r = ctx.reader(record);
    let id = CtrlId(r.read_u32()?);
    let mut children = Children::new(&node.children);

    match decode_body(id, &mut r, &mut children, ctx, depth) {
        Ok(Some(ctrl)) => {
            ctx.check_consumed(record, &r);
            for leftover in children.rest() {
                ctx.diag(
                    DiagnosticKind::UnexpectedRecord,
                    leftover.offset(),
                    format!("{:?} under control '{}' ignored", leftover.tag(), id),
                );
            }
            Ok(ctrl)
        }
        Ok(None) => {
            ctx.diag(
                DiagnosticKind::UnknownControl,
                node.offset(),
                format!("control '{id}' kept opaque"),
            );
            Ok(Ctrl::Opaque(opaque_ctrl(id, node)))
        }
        Err(Error::Unsupported(what)) => {
            ctx.diag(DiagnosticKind::Unsupported, node.offset(), what);
            Ok(Ctrl::Opaque(opaque_ctrl(id, node)))
        }
        Err(err) => Err(err),
    }
}

fn decode_body(
    id: CtrlId,
    r: &mut FieldReader<'_>,
    children: &mut Children<'_>,
    ctx: &mut DecodeContext<'_>,
    depth: usize,
) -> Result<Option<Ctrl>> {
    let ctrl = match id {
        CtrlId::SECTION_DEF => Ctrl::SectionDef(section::decode_section_def(r, children, ctx)?),
        CtrlId::COLUMN_DEF => Ctrl::ColumnDef(section::decode_column_def(r)?),
        CtrlId::HEADER => Ctrl::Header(note::decode_header_footer(r, children, ctx, depth)?),
        CtrlId::FOOTER => Ctrl::Footer(note::decode_header_footer(r, children, ctx, depth)?),
        CtrlId::FOOTNOTE => Ctrl::Footnote(note::decode_note(r, children, ctx, depth)?),
        CtrlId::ENDNOTE => Ctrl::Endnote(note::decode_note(r, children, ctx, depth)?),
        CtrlId::HIDDEN_COMMENT => {
            Ctrl::HiddenComment(note::decode_hidden_comment(r, children, ctx, depth)?)
        }
        CtrlId::TABLE => Ctrl::Table(table::decode_table(r, children, ctx, depth)?),
        CtrlId::GENERAL_SHAPE => {
            Ctrl::Shape(shape::decode_shape_object(r, children, ctx, depth)?)
        }
        CtrlId::AUTO_NUMBER => Ctrl::AutoNumber(numbering::decode_auto_number(r)?),
        CtrlId::NEW_NUMBER => Ctrl::NewNumber(numbering::decode_new_number(r)?),
        CtrlId::PAGE_NUM_POS => Ctrl::PageNumPos(numbering::decode_page_num_pos(r)?),
        CtrlId::PAGE_HIDE => Ctrl::PageHide(numbering::decode_page_hide(r)?),
        CtrlId::PAGE_ODD_EVEN => Ctrl::PageOddEven(numbering::decode_page_odd_even(r)?),
        CtrlId::BOOKMARK => Ctrl::Bookmark(field::decode_bookmark(children, ctx)?),
        CtrlId::INDEX_MARK => Ctrl::IndexMark(field::decode_index_mark(r)?),
        CtrlId::OVERLAP => Ctrl::Overlap(field::decode_overlap(r)?),
        CtrlId::DUTMAL => Ctrl::Dutmal(field::decode_dutmal(r)?),
        CtrlId::FORM => Ctrl::Form(form::decode_form(r, children, ctx)?),
        CtrlId::EQUATION => Ctrl::Equation(form::decode_equation(r, children, ctx)?),
        id if id.is_field() => Ctrl::Field(field::decode_field(id, r, children, ctx)?),
        // Components only have a layout inside a `gso ` control.
        id if id.is_shape_component() => {
            return Err(Error::Unsupported(format!(
                "shape component '{id}' outside a drawing object"
            )))
        }
        _ => return Ok(None),
    };
    Ok(Some(ctrl))
}

/// Wraps a control header and its subtree as an opaque control.
pub fn opaque_ctrl(id: CtrlId, node: &RecordNode) -> OpaqueCtrl {
    OpaqueCtrl {
        id,
        offset: node.offset(),
        size: node.record.size(),
        data: node.record.payload.clone(),
        child_records: count_descendants(node),
    }
}

fn count_descendants(node: &RecordNode) -> usize {
    node.children
        .iter()
        .map(|child| 1 + count_descendants(child))
        .sum()
}
