//! Excel import/export for typed records
//!
//! This module provides bidirectional record ↔ sheet conversion:
//! - Export: records → styled .xlsx (title row, header row, one row per record)
//! - Import: xls/xlsx/xlsb/ods rows → records, with per-field diagnostics

mod coercer;
mod exporter;
mod extractor;
mod importer;
pub mod style;

pub use coercer::{FieldCoercer, IMPORT_DATE_FORMAT};
pub use exporter::{
    ExportOptions, ExportReport, RecordExporter, FIRST_DATA_ROW, HEADER_ROW, TITLE_ROW,
};
pub use extractor::{RawRow, RowExtractor};
pub use importer::{read_sheet, ImportOptions, ImportReport, RecordImporter, SheetSelector};
pub use style::{SheetTheme, StyleSpec};
