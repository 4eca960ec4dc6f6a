//! Table control (`tbl `).
//!
//! Children in file order: an optional caption list, the TABLE record, then one
//! LIST_HEADER per cell followed by that cell's paragraphs.

use super::children::Children;
use super::common::{read_margins, read_object_common, take_caption, take_para_list};
use crate::diagnostic::DiagnosticKind;
use crate::error::{Result, StructuralError};
use crate::hwp5::bits::BitField;
use crate::hwp5::cursor::FieldReader;
use crate::hwp5::dispatch::DecodeContext;
use crate::hwp5::header::since;
use crate::hwp5::record::TagId;
use crate::model::{Table, TableCell, TableZone};
use bytes::Bytes;

/// Size of one zone entry.
const ZONE_SIZE: usize = 10;

pub mod layout {
    use super::BitField;

    pub const PAGE_BREAK: BitField = BitField::new("page_break", 0, 2);
    pub const REPEAT_HEADER: BitField = BitField::new("repeat_header", 2, 1);

    pub const ALL: &[BitField] = &[PAGE_BREAK, REPEAT_HEADER];
}

pub fn decode_table(
    r: &mut FieldReader<'_>,
    children: &mut Children<'_>,
    ctx: &mut DecodeContext<'_>,
    depth: usize,
) -> Result<Table> {
    let common = read_object_common(r)?;
    let caption = take_caption(children, ctx, depth)?;

    let Some(node) = children.next_if(TagId::Table) else {
        return Err(StructuralError::MissingChild {
            offset: r.offset(),
            parent: "table control",
            expected: "TABLE",
        }
        .into());
    };
    let mut tr = ctx.reader(&node.record);
    let mut table = decode_table_record(&mut tr)?;
    ctx.check_consumed(&node.record, &tr);
    table.common = common;
    table.caption = caption;

    while let Some((list, mut cell)) = take_para_list(children, ctx, depth, read_cell_tail)? {
        cell.list = list;
        if cell.row >= table.row_count || cell.col >= table.col_count {
            ctx.diag(
                DiagnosticKind::Inconsistent,
                node.offset(),
                format!(
                    "cell ({}, {}) outside {}x{} table",
                    cell.row, cell.col, table.row_count, table.col_count
                ),
            );
        }
        table.cells.push(cell);
    }

    let declared = table.declared_cell_count();
    if declared != table.cells.len() {
        ctx.diag(
            DiagnosticKind::Inconsistent,
            node.offset(),
            format!(
                "row sizes declare {} cells, {} present",
                declared,
                table.cells.len()
            ),
        );
    }
    Ok(table)
}

/// Reads the TABLE record itself.
pub fn decode_table_record(r: &mut FieldReader<'_>) -> Result<Table> {
    let property = r.read_u32()?;
    let row_count = r.read_u16()?;
    let col_count = r.read_u16()?;
    let cell_spacing = r.read_u16()?;
    let padding = read_margins(r)?;
    let row_sizes = (0..row_count)
        .map(|_| r.read_u16())
        .collect::<Result<Vec<_>>>()?;
    let border_fill_id = r.read_u16()?;

    let zones = r
        .optional_block(since::TABLE_ZONES, 2, read_zones)?
        .unwrap_or_default();

    Ok(Table {
        property,
        page_break: layout::PAGE_BREAK.get_u8(property),
        repeat_header: layout::REPEAT_HEADER.flag(property),
        row_count,
        col_count,
        cell_spacing,
        padding,
        row_sizes,
        border_fill_id,
        zones,
        ..Default::default()
    })
}

/// Reads the counted zone list; a count the payload cannot hold is rejected
/// before any entry is read.
fn read_zones(r: &mut FieldReader<'_>) -> Result<Vec<TableZone>> {
    let offset = r.offset();
    let count = r.read_u16()?;
    if count as usize * ZONE_SIZE > r.remaining() {
        return Err(StructuralError::InvalidLength {
            offset,
            what: "table zone count",
            value: count as i64,
        }
        .into());
    }
    (0..count)
        .map(|_| -> Result<TableZone> {
            Ok(TableZone {
                start_col: r.read_u16()?,
                start_row: r.read_u16()?,
                end_col: r.read_u16()?,
                end_row: r.read_u16()?,
                border_fill_id: r.read_u16()?,
            })
        })
        .collect()
}

/// Cell fields after the list header prefix. Bytes past the known fields are
/// kept raw.
fn read_cell_tail(r: &mut FieldReader<'_>) -> Result<TableCell> {
    Ok(TableCell {
        col: r.read_u16()?,
        row: r.read_u16()?,
        col_span: r.read_u16()?,
        row_span: r.read_u16()?,
        width: r.read_u32()?,
        height: r.read_u32()?,
        margins: read_margins(r)?,
        border_fill_id: r.read_u16()?,
        text_width: r.optional(since::BASELINE, 4, |r| r.read_u32())?,
        extra: Bytes::copy_from_slice(r.rest()),
        ..Default::default()
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::diagnostic::Diagnostics;
    use crate::hwp5::bits::assert_layout;
    use crate::hwp5::header::Version;
    use crate::hwp5::record::{build_tree, frame_stream, RecordNode};
    use crate::hwp5::test_support::{Payload, RecordWriter};
    use crate::model::CaptionDirection;

    pub(crate) fn table_record(rows: u16, cols: u16) -> Vec<u8> {
        let mut payload = Payload::new()
            .u32(1 << 2)
            .u16(rows)
            .u16(cols)
            .u16(0)
            .fill(0, 8);
        for _ in 0..rows {
            payload = payload.u16(cols);
        }
        payload.u16(1).u16(0).build()
    }

    pub(crate) fn cell(row: u16, col: u16, paras: u16) -> Vec<u8> {
        Payload::new()
            .list_header(paras, 0)
            .u16(col)
            .u16(row)
            .u16(1)
            .u16(1)
            .u32(4000)
            .u32(1000)
            .fill(0, 8)
            .u16(1)
            .u32(4000)
            .build()
    }

    /// Writes a table control at `level` with one paragraph per cell.
    pub(crate) fn write_table(writer: &mut RecordWriter, level: u16, rows: u16, cols: u16) {
        writer
            .record(
                TagId::CtrlHeader,
                level,
                &Payload::new().ctrl_id(b"tbl ").object_common(1, 8000, 2000).build(),
            )
            .record(TagId::Table, level + 1, &table_record(rows, cols));
        for row in 0..rows {
            for col in 0..cols {
                writer
                    .record(TagId::ListHeader, level + 1, &cell(row, col, 1))
                    .paragraph(level + 1, &format!("r{row}c{col}"));
            }
        }
    }

    fn tree(writer: &RecordWriter, diags: &mut Diagnostics) -> Vec<RecordNode> {
        build_tree(frame_stream(writer.finish(), diags).unwrap(), diags)
    }

    fn decode(node: &RecordNode, ctx: &mut DecodeContext<'_>) -> Result<Table> {
        let mut r = ctx.reader(&node.record);
        r.read_u32().unwrap();
        let mut children = Children::new(&node.children);
        decode_table(&mut r, &mut children, ctx, 1)
    }

    #[test]
    fn test_layout() {
        assert_layout(layout::ALL, 32);
    }

    #[test]
    fn test_two_by_two_table() {
        let mut writer = RecordWriter::new();
        write_table(&mut writer, 0, 2, 2);
        let mut diags = Diagnostics::new("test");
        let nodes = tree(&writer, &mut diags);
        let mut ctx = DecodeContext::new(Version::new(5, 0, 3, 2), 64, &mut diags);

        let table = decode(&nodes[0], &mut ctx).unwrap();
        assert!(table.repeat_header);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cells.len(), 4);
        assert_eq!(table.get_cell(1, 0).unwrap().plain_text(), "r1c0");
        assert_eq!(table.cells[3].text_width, Some(4000));
        assert!(table.common.treat_as_char);
        assert!(table.caption.is_none());
        assert!(diags.is_empty(), "{:?}", diags.entries());
    }

    #[test]
    fn test_caption_before_table_record() {
        let caption = Payload::new()
            .list_header(1, 0)
            .u32(3)
            .u32(8000)
            .u16(850)
            .u32(8000)
            .build();
        let mut writer = RecordWriter::new();
        writer
            .record(
                TagId::CtrlHeader,
                0,
                &Payload::new().ctrl_id(b"tbl ").object_common(0, 8000, 2000).build(),
            )
            .record(TagId::ListHeader, 1, &caption)
            .paragraph(1, "표 1")
            .record(TagId::Table, 1, &table_record(1, 1))
            .record(TagId::ListHeader, 1, &cell(0, 0, 1))
            .paragraph(1, "only");
        let mut diags = Diagnostics::new("test");
        let nodes = tree(&writer, &mut diags);
        let mut ctx = DecodeContext::new(Version::new(5, 0, 3, 2), 64, &mut diags);

        let table = decode(&nodes[0], &mut ctx).unwrap();
        let caption = table.caption.unwrap();
        assert_eq!(caption.direction, CaptionDirection::Bottom);
        assert_eq!(caption.list.plain_text(), "표 1");
        assert_eq!(table.cells.len(), 1);
        assert_eq!(table.cells[0].plain_text(), "only");
    }

    #[test]
    fn test_missing_cells_reported() {
        let mut writer = RecordWriter::new();
        writer
            .record(
                TagId::CtrlHeader,
                0,
                &Payload::new().ctrl_id(b"tbl ").object_common(0, 1, 1).build(),
            )
            .record(TagId::Table, 1, &table_record(2, 2))
            .record(TagId::ListHeader, 1, &cell(0, 0, 1))
            .paragraph(1, "a")
            .record(TagId::ListHeader, 1, &cell(5, 0, 1))
            .paragraph(1, "b");
        let mut diags = Diagnostics::new("test");
        let nodes = tree(&writer, &mut diags);
        let mut ctx = DecodeContext::new(Version::new(5, 0, 3, 2), 64, &mut diags);

        let table = decode(&nodes[0], &mut ctx).unwrap();
        assert_eq!(table.cells.len(), 2);
        // Out-of-range address plus the cell count.
        assert_eq!(diags.count(DiagnosticKind::Inconsistent), 2);
    }

    #[test]
    fn test_missing_table_record() {
        let mut writer = RecordWriter::new();
        writer.record(
            TagId::CtrlHeader,
            0,
            &Payload::new().ctrl_id(b"tbl ").object_common(0, 1, 1).build(),
        );
        let mut diags = Diagnostics::new("test");
        let nodes = tree(&writer, &mut diags);
        let mut ctx = DecodeContext::new(Version::new(5, 0, 3, 2), 64, &mut diags);
        assert!(decode(&nodes[0], &mut ctx).unwrap_err().is_structural());
    }

    #[test]
    fn test_zones_gated_by_version() {
        let payload = Payload::new()
            .u32(0)
            .u16(1)
            .u16(1)
            .u16(0)
            .fill(0, 8)
            .u16(1)
            .u16(3)
            .u16(1)
            .u16(0)
            .u16(0)
            .u16(0)
            .u16(0)
            .u16(2)
            .build();
        let mut r = FieldReader::new(&payload, 0, Version::new(5, 0, 1, 0));
        let table = decode_table_record(&mut r).unwrap();
        assert_eq!(table.border_fill_id, 3);
        assert_eq!(table.zones.len(), 1);
        assert_eq!(table.zones[0].border_fill_id, 2);
        assert!(r.is_empty());

        let mut r = FieldReader::new(&payload, 0, Version::new(5, 0, 0, 6));
        assert!(decode_table_record(&mut r).unwrap().zones.is_empty());
    }

    #[test]
    fn test_short_zone_list_left_unread() {
        // Two zones declared, one present.
        let payload = Payload::new()
            .u32(0)
            .u16(1)
            .u16(1)
            .u16(0)
            .fill(0, 8)
            .u16(1)
            .u16(3)
            .u16(2)
            .fill(0, 8)
            .u16(2)
            .build();
        let mut r = FieldReader::new(&payload, 0, Version::new(5, 0, 3, 2));
        let table = decode_table_record(&mut r).unwrap();
        assert_eq!(table.border_fill_id, 3);
        assert!(table.zones.is_empty());
        assert_eq!(r.remaining(), 12);
    }
}
