//! Row extraction - materialised sheet → raw text rows

use crate::format::cell_text;
use calamine::{Data, Range};
use serde::Serialize;

/// Text of one populated sheet row, column 0 first, before any type coercion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRow {
    /// Zero-based sheet row the cells were read from
    pub index: u32,
    pub cells: Vec<String>,
}

impl RawRow {
    /// Cell text at `column`; columns past the end of the row read as empty
    pub fn get(&self, column: usize) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Reads row ranges out of a sheet.
///
/// Row and column indices are absolute sheet positions, independent of
/// where calamine's used range happens to start.
pub struct RowExtractor<'a> {
    range: &'a Range<Data>,
}

impl<'a> RowExtractor<'a> {
    pub fn new(range: &'a Range<Data>) -> Self {
        Self { range }
    }

    /// Index of the last row of the sheet, `None` for an empty sheet
    pub fn last_row(&self) -> Option<u32> {
        self.range.end().map(|(row, _)| row)
    }

    /// Index of the last non-blank cell in `row`, `None` when the row is unpopulated
    pub fn last_column(&self, row: u32) -> Option<u32> {
        let (start, end) = (self.range.start()?, self.range.end()?);
        if row < start.0 || row > end.0 {
            return None;
        }
        (start.1..=end.1)
            .rev()
            .find(|&col| !matches!(self.range.get_value((row, col)), None | Some(Data::Empty)))
    }

    /// Inclusive row bounds `[start_row, last_row + end_offset]`, `None` when empty
    pub fn scan_bounds(&self, start_row: u32, end_offset: i64) -> Option<(u32, u32)> {
        let last = self.last_row()?;
        let end = i64::from(last) + end_offset;
        if end < i64::from(start_row) {
            return None;
        }
        // Rows past the last row are never populated
        Some((start_row, end.min(i64::from(last)) as u32))
    }

    /// Read a single row, `None` when it holds no cells
    pub fn read_row(&self, row: u32) -> Option<RawRow> {
        let last_col = self.last_column(row)?;
        let cells = (0..=last_col)
            .map(|col| {
                self.range
                    .get_value((row, col))
                    .map(cell_text)
                    .unwrap_or_default()
            })
            .collect();
        Some(RawRow { index: row, cells })
    }

    /// Every populated row in `[start_row, last_row + end_offset]`
    pub fn extract(&self, start_row: u32, end_offset: i64) -> Vec<RawRow> {
        match self.scan_bounds(start_row, end_offset) {
            Some((first, last)) => (first..=last).filter_map(|row| self.read_row(row)).collect(),
            None => Vec::new(),
        }
    }
}
