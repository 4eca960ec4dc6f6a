//! Controls that own one paragraph list: header/footer, footnote/endnote and
//! hidden comment.

use super::children::Children;
use super::common::take_para_list;
use crate::error::{Result, StructuralError};
use crate::hwp5::bits::BitField;
use crate::hwp5::cursor::FieldReader;
use crate::hwp5::dispatch::DecodeContext;
use crate::hwp5::header::since;
use crate::model::{HeaderFooter, HiddenComment, Note, NumberShape, PageApply, ParaList};

const APPLY: BitField = BitField::new("apply", 0, 2);

pub fn decode_header_footer(
    r: &mut FieldReader<'_>,
    children: &mut Children<'_>,
    ctx: &mut DecodeContext<'_>,
    depth: usize,
) -> Result<HeaderFooter> {
    let property = r.read_u32()?;
    // Text area size and reference counters follow the list prefix.
    let list = required_list(r.offset(), "header/footer", children, ctx, depth)?;
    Ok(HeaderFooter {
        apply: PageApply::from_code(APPLY.get(property)),
        list,
    })
}

/// Reads a `fn  `/`en  ` body. Every field is optional: writers differ in
/// how much they store.
pub fn decode_note(
    r: &mut FieldReader<'_>,
    children: &mut Children<'_>,
    ctx: &mut DecodeContext<'_>,
    depth: usize,
) -> Result<Note> {
    let number = r.optional(since::BASELINE, 4, |r| r.read_u32())?;
    let prefix = r.optional(since::BASELINE, 2, |r| r.read_wchar())?;
    let suffix = r.optional(since::BASELINE, 2, |r| r.read_wchar())?;
    let number_shape = r.optional(since::BASELINE, 4, |r| {
        Ok(NumberShape::from_code(r.read_u32()?))
    })?;
    let instance_id = r.optional(since::BASELINE, 4, |r| r.read_u32())?;
    let list = required_list(r.offset(), "note", children, ctx, depth)?;

    Ok(Note {
        number,
        prefix,
        suffix,
        number_shape,
        instance_id,
        list,
    })
}

pub fn decode_hidden_comment(
    r: &mut FieldReader<'_>,
    children: &mut Children<'_>,
    ctx: &mut DecodeContext<'_>,
    depth: usize,
) -> Result<HiddenComment> {
    let list = required_list(r.offset(), "hidden comment", children, ctx, depth)?;
    Ok(HiddenComment { list })
}

fn required_list(
    offset: u64,
    parent: &'static str,
    children: &mut Children<'_>,
    ctx: &mut DecodeContext<'_>,
    depth: usize,
) -> Result<ParaList> {
    let list = take_para_list(children, ctx, depth, |r| {
        r.rest();
        Ok(())
    })?;
    match list {
        Some((list, ())) => Ok(list),
        None => Err(StructuralError::MissingChild {
            offset,
            parent,
            expected: "LIST_HEADER",
        }
        .into()),
    }
}
