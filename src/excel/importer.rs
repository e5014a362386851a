//! Excel importer implementation - sheet rows → typed records

use super::coercer::FieldCoercer;
use super::extractor::{RawRow, RowExtractor};
use crate::error::{FieldDiagnostic, FieldError, SheetError, SheetResult};
use crate::observe::{Observer, TracingObserver};
use crate::record::{resolve_fields, FieldDescriptor, Record};
use calamine::{open_workbook_auto, Data, Range, Reader, Xlsx};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Which sheet of the workbook to read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetSelector {
    #[default]
    First,
    Named(String),
}

/// Row range and behaviour of an import
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// First sheet row to read (zero-based)
    pub start_row: u32,
    /// Added to the last row index to find the final row read:
    /// `0` reads through the last row, `-n` leaves out the last `n` rows
    pub end_row_offset: i64,
    pub sheet: SheetSelector,
    /// Abort when a row has more cells than the record has fields, or is
    /// missing a column a non-blank field needs, or when a field has no setter
    pub strict: bool,
}

impl ImportOptions {
    pub fn rows(start_row: u32, end_row_offset: i64) -> Self {
        Self {
            start_row,
            end_row_offset,
            ..Self::default()
        }
    }

    pub fn sheet(mut self, name: impl Into<String>) -> Self {
        self.sheet = SheetSelector::Named(name.into());
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Records assembled by an import, with the field assignments that failed
#[derive(Debug)]
pub struct ImportReport<R> {
    /// One record per populated row scanned, in sheet order
    pub records: Vec<R>,
    pub diagnostics: Vec<FieldDiagnostic>,
    pub rows_scanned: usize,
}

impl<R> ImportReport<R> {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Sheet rows with at least one failed field, ascending
    pub fn failed_rows(&self) -> Vec<u32> {
        let mut rows: Vec<u32> = self.diagnostics.iter().map(|d| d.row).collect();
        rows.dedup();
        rows
    }
}

/// Reads sheet rows back into records of a [`Record`] type
pub struct RecordImporter {
    options: ImportOptions,
    observer: Box<dyn Observer>,
}

impl RecordImporter {
    pub fn new(options: ImportOptions) -> Self {
        Self {
            options,
            observer: Box::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: impl Observer + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Import from a workbook file (xls, xlsx, xlsb or ods)
    pub fn import<R: Record + Default>(&self, path: &Path) -> SheetResult<ImportReport<R>> {
        if !path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )
            .into());
        }

        let mut workbook = open_workbook_auto(path).map_err(|e| {
            SheetError::Workbook(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let (sheet, range) = read_sheet(&mut workbook, &self.options.sheet)?;
        drop(workbook);

        self.import_sheet(&sheet, &range)
    }

    /// Import from an in-memory .xlsx document
    pub fn import_bytes<R: Record + Default>(&self, bytes: &[u8]) -> SheetResult<ImportReport<R>> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| SheetError::Workbook(format!("Failed to read workbook: {}", e)))?;
        let (sheet, range) = read_sheet(&mut workbook, &self.options.sheet)?;

        self.import_sheet(&sheet, &range)
    }

    /// Import from an already materialised sheet
    pub fn import_range<R: Record + Default>(
        &self,
        range: &Range<Data>,
    ) -> SheetResult<ImportReport<R>> {
        self.import_sheet("<range>", range)
    }

    fn import_sheet<R: Record + Default>(
        &self,
        sheet: &str,
        range: &Range<Data>,
    ) -> SheetResult<ImportReport<R>> {
        let extractor = RowExtractor::new(range);
        self.observer.sheet_opened(sheet, extractor.last_row());

        let rows = extractor.extract(self.options.start_row, self.options.end_row_offset);
        self.assemble(rows)
    }

    /// Build one record per raw row, binding column `n` to the field with ordinal `n`
    pub fn assemble<R: Record + Default>(&self, rows: Vec<RawRow>) -> SheetResult<ImportReport<R>> {
        let schema = R::schema();
        let fields = resolve_fields::<R>()?;
        if self.options.strict {
            schema.require_setters()?;
        }
        let setters: Vec<_> = fields.iter().map(|field| schema.setter(field)).collect();

        let mut records = Vec::with_capacity(rows.len());
        let mut diagnostics = Vec::new();

        for row in &rows {
            self.observer.row_scanned(row);

            if self.options.strict && !row_fits(row, fields) {
                return Err(SheetError::ColumnMismatch {
                    row: row.index,
                    expected: fields.len(),
                    found: row.len(),
                });
            }

            let mut record = R::default();
            for (field, setter) in fields.iter().zip(&setters) {
                let outcome = match setter {
                    Ok(set) => FieldCoercer::coerce(row.get(field.ordinal), field)
                        .and_then(|value| set(&mut record, value))
                        .map_err(FieldError::from),
                    Err(missing) => Err(missing.clone()),
                };

                if let Err(error) = outcome {
                    let diagnostic = FieldDiagnostic {
                        row: row.index,
                        column: field.ordinal,
                        field: field.name,
                        error,
                    };
                    self.observer.field_failed(&diagnostic);
                    diagnostics.push(diagnostic);
                }
            }
            records.push(record);
        }

        Ok(ImportReport {
            records,
            diagnostics,
            rows_scanned: rows.len(),
        })
    }
}

/// Trailing blank cells are not stored, so a short row is only misaligned
/// when one of its missing columns needs a value
fn row_fits(row: &RawRow, fields: &[FieldDescriptor]) -> bool {
    match fields.get(row.len()..) {
        Some(missing) => missing.iter().all(FieldDescriptor::accepts_blank),
        None => false,
    }
}

impl Default for RecordImporter {
    fn default() -> Self {
        Self::new(ImportOptions::default())
    }
}

/// Materialise the selected sheet, returning its name and cells
pub fn read_sheet<RS, W>(workbook: &mut W, selector: &SheetSelector) -> SheetResult<(String, Range<Data>)>
where
    RS: Read + Seek,
    W: Reader<RS>,
    W::Error: Display,
{
    let name = match selector {
        SheetSelector::First => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| SheetError::Workbook("Workbook has no sheets".to_string()))?,
        SheetSelector::Named(name) => name.clone(),
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| SheetError::Workbook(format!("Failed to read sheet '{}': {}", name, e)))?;
    Ok((name, range))
}
