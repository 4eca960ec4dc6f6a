//! BodyText section decoding.
//!
//! A section stream is framed, nested by level, and walked paragraph by
//! paragraph. Each paragraph's text is lexed into runs and control tokens, the
//! char shape positions are laid over the runs, and the control records found
//! under the paragraph are attached to its extended control tokens in order.

pub mod layout;
pub mod lexer;
pub mod overlay;
pub mod para_header;

use super::control;
use super::dispatch::{decode_record, DecodeContext, Record};
use super::record::{build_tree, frame_stream, RecordNode, TagId};
use crate::diagnostic::DiagnosticKind;
use crate::error::{Result, StructuralError};
use crate::model::{ControlClass, Ctrl, CtrlId, Paragraph, Section, Token};
use crate::parse_options::ErrorMode;
use bytes::Bytes;

/// Decodes one inflated `BodyText/SectionN` stream.
///
/// In lenient mode a top-level paragraph that fails structurally is dropped with
/// a diagnostic; framing errors always fail the section.
pub fn decode_section(
    index: usize,
    data: Bytes,
    ctx: &mut DecodeContext<'_>,
    mode: ErrorMode,
) -> Result<Section> {
    let records = frame_stream(data, ctx.diags())?;
    let roots = build_tree(records, ctx.diags());
    let mut section = Section::new(index);

    for node in &roots {
        if node.tag() != TagId::ParaHeader {
            ctx.diag(
                DiagnosticKind::UnexpectedRecord,
                node.offset(),
                format!("{:?} at section top level", node.tag()),
            );
            continue;
        }
        match decode_paragraph(node, ctx, 0) {
            Ok(paragraph) => section.paragraphs.push(paragraph),
            Err(err) if mode == ErrorMode::Lenient && err.is_structural() => {
                ctx.diag(
                    DiagnosticKind::SkippedParagraph,
                    node.offset(),
                    format!("paragraph dropped: {err}"),
                );
            }
            Err(err) => return Err(err),
        }
    }

    log::debug!(
        "section {}: {} paragraphs from {} top-level records",
        index,
        section.paragraphs.len(),
        roots.len()
    );
    Ok(section)
}

/// Decodes a PARA_HEADER node and the records nested under it.
pub fn decode_paragraph(
    node: &RecordNode,
    ctx: &mut DecodeContext<'_>,
    depth: usize,
) -> Result<Paragraph> {
    ctx.check_depth(depth, node.offset())?;
    let header = match decode_record(&node.record, ctx)? {
        Record::ParaHeader(header) => header,
        _ => {
            return Err(StructuralError::MissingChild {
                offset: node.offset(),
                parent: "paragraph",
                expected: "PARA_HEADER",
            }
            .into())
        }
    };

    let mut paragraph = Paragraph {
        header,
        ..Default::default()
    };
    let mut units = Vec::new();
    let mut ctrls = Vec::new();

    for child in &node.children {
        if child.tag() == TagId::CtrlHeader {
            ctrls.push(control::decode_ctrl(child, ctx, depth + 1)?);
            continue;
        }

        match decode_record(&child.record, ctx)? {
            Record::ParaText(text) => units = text,
            Record::ParaCharShape(ranges) => paragraph.char_shapes = ranges,
            Record::ParaLineSeg(segs) => paragraph.line_segs = segs,
            Record::ParaRangeTag(tags) => paragraph.range_tags = tags,
            // Already reported by the dispatcher.
            Record::Opaque(_) => {}
            _ => ctx.diag(
                DiagnosticKind::UnexpectedRecord,
                child.offset(),
                format!("{:?} inside paragraph", child.tag()),
            ),
        }
        if !child.children.is_empty() {
            ctx.diag(
                DiagnosticKind::UnexpectedRecord,
                child.offset(),
                format!(
                    "{} records nested under {:?} ignored",
                    child.children.len(),
                    child.tag()
                ),
            );
        }
    }

    check_counts(&mut paragraph, units.len(), node.offset(), ctx);
    paragraph.tokens = lexer::lex(&units)?;
    overlay::apply_char_shapes(&mut paragraph.tokens, &paragraph.char_shapes);
    attach_controls(&mut paragraph, ctrls, node.offset(), ctx);
    Ok(paragraph)
}

/// Cross-checks the header counts against the records actually present.
fn check_counts(
    paragraph: &mut Paragraph,
    text_units: usize,
    offset: u64,
    ctx: &mut DecodeContext<'_>,
) {
    let header = &paragraph.header;
    // A paragraph holding only its end mark may omit PARA_TEXT.
    let implicit_end = text_units == 0 && header.text_len <= 1;
    if !implicit_end && header.text_len as usize != text_units {
        ctx.diag(
            DiagnosticKind::Inconsistent,
            offset,
            format!(
                "header declares {} text units, PARA_TEXT holds {}",
                header.text_len, text_units
            ),
        );
    }

    let counts = [
        (
            "char shape",
            header.char_shape_count as usize,
            paragraph.char_shapes.len(),
        ),
        (
            "line segment",
            header.line_seg_count as usize,
            paragraph.line_segs.len(),
        ),
        (
            "range tag",
            header.range_tag_count as usize,
            paragraph.range_tags.len(),
        ),
    ];
    for (what, declared, found) in counts {
        if declared != found {
            ctx.diag(
                DiagnosticKind::Inconsistent,
                offset,
                format!("{what} count: {declared} declared, {found} present"),
            );
        }
    }

    let ascending = paragraph
        .char_shapes
        .windows(2)
        .all(|pair| pair[0].start <= pair[1].start);
    if !ascending {
        ctx.diag(
            DiagnosticKind::Inconsistent,
            offset,
            "char shape positions out of order",
        );
        paragraph.char_shapes.sort_by_key(|range| range.start);
    }
}

/// Pairs extended control tokens with control records in order of appearance.
fn attach_controls(
    paragraph: &mut Paragraph,
    ctrls: Vec<Ctrl>,
    offset: u64,
    ctx: &mut DecodeContext<'_>,
) {
    let mut ctrls = ctrls.into_iter();

    for token in &mut paragraph.tokens {
        let Token::Control(control) = token else {
            continue;
        };
        if control.class() != Some(ControlClass::Extended) {
            continue;
        }
        let Some(ctrl) = ctrls.next() else {
            ctx.diag(
                DiagnosticKind::Inconsistent,
                offset,
                format!(
                    "control 0x{:02X} at unit {} has no control record",
                    control.code, control.position
                ),
            );
            continue;
        };
        if let Some(id) = control.ctrl_id() {
            if id != ctrl.id().0 {
                ctx.diag(
                    DiagnosticKind::Inconsistent,
                    offset,
                    format!(
                        "text names control '{}' at unit {}, record is '{}'",
                        CtrlId(id),
                        control.position,
                        ctrl.id()
                    ),
                );
            }
        }
        control.ctrl = Some(Box::new(ctrl));
    }

    let detached: Vec<Ctrl> = ctrls.collect();
    if !detached.is_empty() {
        ctx.diag(
            DiagnosticKind::Inconsistent,
            offset,
            format!("{} control records without a text position", detached.len()),
        );
        paragraph.detached_controls = detached;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Diagnostics;
    use crate::hwp5::header::Version;
    use crate::hwp5::test_support::{extended_control, para_header, Payload, RecordWriter};
    use crate::model::{ControlKind, PageHide};

    fn text(units: &[u16]) -> Vec<u8> {
        Payload::new().units(units).build()
    }

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    fn decode(stream: Bytes, mode: ErrorMode) -> (Result<Section>, Diagnostics) {
        let mut diags = Diagnostics::new("BodyText/Section0");
        let result = {
            let mut ctx = DecodeContext::new(Version::new(5, 0, 3, 2), 64, &mut diags);
            decode_section(0, stream, &mut ctx, mode)
        };
        (result, diags)
    }

    #[test]
    fn test_paragraph_runs_and_shapes() {
        let mut units = utf16("AB");
        units.push(10);
        units.extend(utf16("CD"));
        units.push(13);

        let ranges = Payload::new().u32(0).u32(1).u32(1).u32(2).build();
        let stream = RecordWriter::new()
            .record(TagId::ParaHeader, 0, &para_header(6, 2))
            .record(TagId::ParaText, 1, &text(&units))
            .record(TagId::ParaCharShape, 1, &ranges)
            .finish();
        let (result, diags) = decode(stream, ErrorMode::Strict);
        let section = result.unwrap();

        assert_eq!(section.paragraphs.len(), 1);
        let para = &section.paragraphs[0];
        assert_eq!(para.plain_text(), "AB\nCD");
        let runs: Vec<_> = para
            .text_runs()
            .map(|run| (run.text.as_str(), run.char_shape_id))
            .collect();
        assert_eq!(runs, vec![("A", Some(1)), ("B", Some(2)), ("CD", Some(2))]);
        assert!(diags.is_empty(), "{:?}", diags.entries());
    }

    #[test]
    fn test_extended_control_attached() {
        let mut units = utf16("x");
        units.extend(extended_control(21, b"pghd"));
        units.push(13);

        let ctrl = Payload::new().ctrl_id(b"pghd").u32(0b11).build();
        let stream = RecordWriter::new()
            .record(TagId::ParaHeader, 0, &para_header(10, 0))
            .record(TagId::ParaText, 1, &text(&units))
            .record(TagId::CtrlHeader, 1, &ctrl)
            .finish();
        let (result, diags) = decode(stream, ErrorMode::Strict);
        let section = result.unwrap();

        let para = &section.paragraphs[0];
        let control = para
            .tokens
            .iter()
            .find_map(|token| match token {
                Token::Control(c) if c.kind == ControlKind::PageControl => Some(c),
                _ => None,
            })
            .unwrap();
        match control.ctrl.as_deref() {
            Some(Ctrl::PageHide(PageHide { header, footer, .. })) => {
                assert!(*header);
                assert!(*footer);
            }
            other => panic!("unexpected control {other:?}"),
        }
        assert!(para.detached_controls.is_empty());
        assert!(diags.is_empty(), "{:?}", diags.entries());
    }

    #[test]
    fn test_mismatched_and_extra_controls() {
        let mut units = extended_control(21, b"pgct");
        units.push(13);

        let stream = RecordWriter::new()
            .record(TagId::ParaHeader, 0, &para_header(9, 0))
            .record(TagId::ParaText, 1, &text(&units))
            .record(TagId::CtrlHeader, 1, &Payload::new().ctrl_id(b"pghd").u32(0).build())
            .record(TagId::CtrlHeader, 1, &Payload::new().ctrl_id(b"pgct").u32(1).build())
            .finish();
        let (result, diags) = decode(stream, ErrorMode::Strict);
        let para = &result.unwrap().paragraphs[0];

        assert_eq!(para.detached_controls.len(), 1);
        assert_eq!(para.detached_controls[0].id(), CtrlId::PAGE_ODD_EVEN);
        assert_eq!(para.controls().count(), 2);
        // Id mismatch plus the leftover record.
        assert_eq!(diags.count(DiagnosticKind::Inconsistent), 2);
    }

    #[test]
    fn test_header_count_mismatches() {
        let units = utf16("abc");
        let ranges = Payload::new().u32(2).u32(1).u32(0).u32(4).build();
        let stream = RecordWriter::new()
            .record(TagId::ParaHeader, 0, &para_header(7, 2))
            .record(TagId::ParaText, 1, &text(&units))
            .record(TagId::ParaCharShape, 1, &ranges)
            .finish();
        let (result, diags) = decode(stream, ErrorMode::Strict);
        let para = &result.unwrap().paragraphs[0];

        // Sorted before the overlay: shape 4 from 0, shape 1 from 2.
        assert_eq!(para.char_shapes[0].shape_id, 4);
        let ids: Vec<_> = para.text_runs().map(|run| run.char_shape_id).collect();
        assert_eq!(ids, vec![Some(4), Some(1)]);
        // Text length and ordering.
        assert_eq!(diags.count(DiagnosticKind::Inconsistent), 2);
    }

    #[test]
    fn test_empty_paragraph_without_text_record() {
        let stream = RecordWriter::new()
            .record(TagId::ParaHeader, 0, &para_header(0x8000_0001, 0))
            .finish();
        let (result, diags) = decode(stream, ErrorMode::Strict);
        let section = result.unwrap();
        assert!(section.paragraphs[0].tokens.is_empty());
        assert!(section.paragraphs[0].header.last_in_list);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_lenient_mode_drops_broken_paragraph() {
        // Extended control without its terminator.
        let broken = vec![0x41, 11, 0, 0, 0, 0, 0, 0, 0x41];
        let stream = RecordWriter::new()
            .record(TagId::ParaHeader, 0, &para_header(9, 0))
            .record(TagId::ParaText, 1, &text(&broken))
            .record(TagId::ParaHeader, 0, &para_header(2, 0))
            .record(TagId::ParaText, 1, &text(&utf16("ok")))
            .finish();

        let (result, _) = decode(stream.clone(), ErrorMode::Strict);
        assert!(result.unwrap_err().is_structural());

        let (result, diags) = decode(stream, ErrorMode::Lenient);
        let section = result.unwrap();
        assert_eq!(section.paragraphs.len(), 1);
        assert_eq!(section.paragraphs[0].plain_text(), "ok");
        assert_eq!(diags.count(DiagnosticKind::SkippedParagraph), 1);
    }

    #[test]
    fn test_stray_top_level_record() {
        let stream = RecordWriter::new()
            .record(TagId::ParaText, 0, &text(&utf16("zz")))
            .record(TagId::ParaHeader, 0, &para_header(0, 0))
            .finish();
        let (result, diags) = decode(stream, ErrorMode::Strict);
        assert_eq!(result.unwrap().paragraphs.len(), 1);
        assert_eq!(diags.count(DiagnosticKind::UnexpectedRecord), 1);
    }
}
