//! DocInfo stream decoding.
//!
//! DocInfo is a flat run of records holding every shared resource the body
//! refers to by id. Records are decoded one by one through the tag dispatcher and
//! appended to their lists in stream order; face names are then split into their
//! per-language lists and the cross-reference pass runs over the finished table.

pub mod bin_data;
pub mod border_fill;
pub mod char_shape;
pub mod face_name;
pub mod numbering;
pub mod para_shape;
pub mod properties;
pub mod resolve;
pub mod style;
pub mod tab_def;

use super::dispatch::{decode_record, opaque_record, DecodeContext, Record};
use super::record::frame_stream;
use crate::diagnostic::DiagnosticKind;
use crate::error::Result;
use crate::model::{DocInfo, FaceName, IdMappings, Language};
use bytes::Bytes;

/// Decodes an inflated DocInfo stream into a resolved resource table.
///
/// Any structural error fails the whole stream: the body cannot be interpreted
/// without its resources.
pub fn decode_doc_info(data: Bytes, ctx: &mut DecodeContext<'_>) -> Result<DocInfo> {
    let records = frame_stream(data, ctx.diags())?;
    let mut info = DocInfo::new();
    let mut faces = Vec::new();

    for record in &records {
        match decode_record(record, ctx)? {
            Record::DocumentProperties(properties) => info.properties = properties,
            Record::IdMappings(mappings) => info.id_mappings = mappings,
            Record::BinData(item) => info.bin_data.push(item),
            Record::FaceName(face) => faces.push(face),
            Record::BorderFill(fill) => info.border_fills.push(fill),
            Record::CharShape(shape) => info.char_shapes.push(shape),
            Record::TabDef(def) => info.tab_defs.push(def),
            Record::Numbering(numbering) => info.numberings.push(numbering),
            Record::Bullet(bullet) => info.bullets.push(bullet),
            Record::ParaShape(shape) => info.para_shapes.push(shape),
            Record::Style(style) => info.styles.push(style),
            Record::MemoShape(memo) => info.memo_shapes.push(memo),
            Record::DocData(set) => info.doc_data = Some(set),
            Record::CompatibleDocument(compat) => info.compatible_document = Some(compat),
            Record::LayoutCompatibility(layout) => info.layout_compatibility = Some(layout),
            Record::Opaque(opaque) => info.opaque.push(opaque),
            Record::ParaHeader(_)
            | Record::ParaText(_)
            | Record::ParaCharShape(_)
            | Record::ParaLineSeg(_)
            | Record::ParaRangeTag(_)
            | Record::CtrlHeader { .. }
            | Record::ListHeader(_) => {
                ctx.diag(
                    DiagnosticKind::UnexpectedRecord,
                    record.offset,
                    format!("body record {:?} in DocInfo", record.tag()),
                );
                info.opaque.push(opaque_record(record));
            }
        }
    }

    partition_face_names(&mut info, faces, ctx);
    check_counts(&info, ctx);
    resolve::resolve(&mut info, ctx.diags());

    log::debug!(
        "DocInfo: {} records, {} char shapes, {} para shapes, {} styles",
        records.len(),
        info.char_shapes.len(),
        info.para_shapes.len(),
        info.styles.len()
    );
    Ok(info)
}

/// Splits the flat face name run into per-language lists.
///
/// The stream stores all face names back to back; IdMappings says how many
/// belong to each language. Names beyond the declared total go to the last
/// language.
fn partition_face_names(info: &mut DocInfo, faces: Vec<FaceName>, ctx: &mut DecodeContext<'_>) {
    let declared = info.id_mappings.total_face_names();
    if faces.len() != declared {
        ctx.diag(
            DiagnosticKind::Inconsistent,
            0,
            format!(
                "{} face names declared, {} present",
                declared,
                faces.len()
            ),
        );
    }

    let mut faces = faces.into_iter();
    for language in Language::ALL {
        let count = info.id_mappings.face_names(language);
        let list = info.face_names.list_mut(language);
        for face in faces.by_ref().take(count) {
            list.push(face);
        }
    }
    let overflow = info.face_names.list_mut(Language::User);
    for face in faces {
        overflow.push(face);
    }
}

fn check_counts(info: &DocInfo, ctx: &mut DecodeContext<'_>) {
    let checks = [
        ("bin data", IdMappings::BIN_DATA, info.bin_data.len()),
        ("border fill", IdMappings::BORDER_FILL, info.border_fills.len()),
        ("char shape", IdMappings::CHAR_SHAPE, info.char_shapes.len()),
        ("tab def", IdMappings::TAB_DEF, info.tab_defs.len()),
        ("numbering", IdMappings::NUMBERING, info.numberings.len()),
        ("bullet", IdMappings::BULLET, info.bullets.len()),
        ("para shape", IdMappings::PARA_SHAPE, info.para_shapes.len()),
        ("style", IdMappings::STYLE, info.styles.len()),
        ("memo shape", IdMappings::MEMO_SHAPE, info.memo_shapes.len()),
    ];

    for (what, index, found) in checks {
        // Counts missing from older records are not checked.
        if index >= info.id_mappings.counts.len() {
            continue;
        }
        let declared = info.id_mappings.count(index);
        if declared != found {
            ctx.diag(
                DiagnosticKind::Inconsistent,
                0,
                format!("{what}: {declared} declared, {found} present"),
            );
        }
    }
}
