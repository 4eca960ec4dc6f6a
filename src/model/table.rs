//! Table structures for the document model.

use super::{Caption, Margins, ObjectCommon, ParaList};
use bytes::Bytes;
use serde::Serialize;

/// A region of cells sharing a border fill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableZone {
    pub start_col: u16,
    pub start_row: u16,
    pub end_col: u16,
    pub end_row: u16,
    pub border_fill_id: u16,
}

/// A cell in a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableCell {
    /// Content paragraphs within this cell
    pub list: ParaList,
    pub col: u16,
    pub row: u16,
    /// Number of columns this cell spans
    pub col_span: u16,
    /// Number of rows this cell spans
    pub row_span: u16,
    pub width: u32,
    pub height: u32,
    pub margins: Margins,
    /// 1-based border fill id.
    pub border_fill_id: u16,
    pub text_width: Option<u32>,
    /// Bytes after the known cell fields.
    pub extra: Bytes,
}

impl TableCell {
    /// Returns the plain text content of this cell.
    pub fn plain_text(&self) -> String {
        self.list.plain_text()
    }

    /// Returns true if this cell spans more than one row or column.
    pub fn is_merged(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }
}

/// A table in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub common: ObjectCommon,
    pub caption: Option<Caption>,
    pub property: u32,
    /// 0 = no split, 1 = split by cell, 2 = split.
    pub page_break: u8,
    pub repeat_header: bool,
    pub row_count: u16,
    pub col_count: u16,
    pub cell_spacing: u16,
    pub padding: Margins,
    /// Number of cells in each row.
    pub row_sizes: Vec<u16>,
    pub border_fill_id: u16,
    pub zones: Vec<TableZone>,
    /// Cells in file order (row-major).
    pub cells: Vec<TableCell>,
}

impl Table {
    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count as usize
    }

    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.col_count as usize
    }

    /// Returns true if this table has any merged cells.
    pub fn has_merged_cells(&self) -> bool {
        self.cells.iter().any(TableCell::is_merged)
    }

    /// Gets the cell anchored at the specified position.
    pub fn get_cell(&self, row: u16, col: u16) -> Option<&TableCell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    /// Cells grouped by their row address.
    pub fn rows(&self) -> Vec<Vec<&TableCell>> {
        let mut rows: Vec<Vec<&TableCell>> = vec![Vec::new(); self.row_count()];
        for cell in &self.cells {
            if let Some(row) = rows.get_mut(cell.row as usize) {
                row.push(cell);
            }
        }
        rows
    }

    /// Number of cells the row sizes declare.
    pub fn declared_cell_count(&self) -> usize {
        self.row_sizes.iter().map(|&n| n as usize).sum()
    }
}
