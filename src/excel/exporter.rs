//! Excel exporter implementation - typed records → styled .xlsx

use super::style::SheetTheme;
use crate::error::{FieldDiagnostic, SheetError, SheetResult};
use crate::format::{classify, CellContent, DatePattern};
use crate::observe::{Observer, TracingObserver};
use crate::record::{resolve_fields, Record};
use rust_xlsxwriter::{Workbook, XlsxError};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

/// Row holding the (merged) title
pub const TITLE_ROW: u32 = 0;
/// Row holding the column headers
pub const HEADER_ROW: u32 = 1;
/// First row holding record data
pub const FIRST_DATA_ROW: u32 = 2;

/// Layout and formatting of an export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub sheet_label: String,
    /// Text of the merged title row; `None` leaves the row empty
    pub title: Option<String>,
    /// One label per column; the count sets the width of the title row
    pub headers: Vec<String>,
    /// Format for date fields (`yyyy-MM-dd HH:mm` style or strftime)
    pub date_pattern: String,
    pub theme: SheetTheme,
    pub column_width: f64,
    /// Refuse to export when header count differs from the record's field count,
    /// or when a field has no getter
    pub strict: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            sheet_label: "Sheet1".to_string(),
            title: None,
            headers: Vec::new(),
            date_pattern: "yyyy-MM-dd".to_string(),
            theme: SheetTheme::default(),
            column_width: 20.0,
            strict: false,
        }
    }
}

impl ExportOptions {
    pub fn new<I, S>(sheet_label: impl Into<String>, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sheet_label: sheet_label.into(),
            headers: headers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn date_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.date_pattern = pattern.into();
        self
    }

    pub fn theme(mut self, theme: SheetTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Outcome of an export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportReport {
    pub rows_written: usize,
    /// Cells left blank because their field could not be read
    pub diagnostics: Vec<FieldDiagnostic>,
}

/// Renders record collections into a styled worksheet
pub struct RecordExporter {
    options: ExportOptions,
    observer: Box<dyn Observer>,
}

fn workbook_error(context: &str) -> impl Fn(XlsxError) -> SheetError + '_ {
    move |e| SheetError::Workbook(format!("Failed to {}: {}", context, e))
}

impl RecordExporter {
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            observer: Box::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: impl Observer + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Build the workbook in memory: title row, header row, one row per record
    pub fn build_workbook<R: Record>(&self, records: &[R]) -> SheetResult<(Workbook, ExportReport)> {
        let options = &self.options;
        let schema = R::schema();
        let fields = resolve_fields::<R>()?;

        if options.headers.is_empty() {
            return Err(SheetError::Schema(
                "at least one header label is required".to_string(),
            ));
        }
        if options.strict && options.headers.len() != fields.len() {
            return Err(SheetError::Schema(format!(
                "{} header labels for {} fields of {}",
                options.headers.len(),
                fields.len(),
                schema.type_name()
            )));
        }
        if options.strict {
            schema.require_getters()?;
        }

        let date_pattern = DatePattern::new(&options.date_pattern)?;
        options.theme.validate()?;
        let title_format = options.theme.title.to_format();
        let header_format = options.theme.header.to_format();
        let data_format = options.theme.data.to_format();

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&options.sheet_label)
            .map_err(workbook_error("set worksheet name"))?;

        let column_count = options.headers.len().max(fields.len());
        for col in 0..column_count {
            worksheet
                .set_column_width(col as u16, options.column_width)
                .map_err(workbook_error("set column width"))?;
        }

        // Title row, merged across every header column
        let title = options.title.as_deref().unwrap_or("");
        let last_header_col = (options.headers.len() - 1) as u16;
        if last_header_col > 0 {
            worksheet
                .merge_range(TITLE_ROW, 0, TITLE_ROW, last_header_col, title, &title_format)
                .map_err(workbook_error("merge title row"))?;
        } else {
            worksheet
                .write_string_with_format(TITLE_ROW, 0, title, &title_format)
                .map_err(workbook_error("write title"))?;
        }

        for (col, label) in options.headers.iter().enumerate() {
            worksheet
                .write_string_with_format(HEADER_ROW, col as u16, label, &header_format)
                .map_err(workbook_error("write header"))?;
        }

        let getters: Vec<_> = fields.iter().map(|field| schema.getter(field)).collect();
        let mut report = ExportReport::default();

        for (idx, record) in records.iter().enumerate() {
            let row = FIRST_DATA_ROW + idx as u32;

            for (field, getter) in fields.iter().zip(&getters) {
                let col = field.ordinal as u16;
                match getter {
                    Ok(get) => {
                        match classify(get(record).render(&date_pattern)) {
                            CellContent::Number(n) => worksheet
                                .write_number_with_format(row, col, n, &data_format)
                                .map_err(workbook_error("write number"))?,
                            CellContent::Text(s) => worksheet
                                .write_string_with_format(row, col, &s, &data_format)
                                .map_err(workbook_error("write text"))?,
                        };
                    }
                    Err(missing) => {
                        worksheet
                            .write_blank(row, col, &data_format)
                            .map_err(workbook_error("write blank"))?;
                        let diagnostic = FieldDiagnostic {
                            row,
                            column: field.ordinal,
                            field: field.name,
                            error: missing.clone(),
                        };
                        self.observer.field_failed(&diagnostic);
                        report.diagnostics.push(diagnostic);
                    }
                }
            }
            report.rows_written += 1;
        }

        Ok((workbook, report))
    }

    /// Serialise the workbook to .xlsx bytes
    pub fn export_to_buffer<R: Record>(&self, records: &[R]) -> SheetResult<(Vec<u8>, ExportReport)> {
        let (mut workbook, report) = self.build_workbook(records)?;
        let buffer = workbook
            .save_to_buffer()
            .map_err(workbook_error("serialise workbook"))?;
        Ok((buffer, report))
    }

    /// Export to `output_path`, replacing any existing file.
    ///
    /// The document is written once, to a temporary file next to the
    /// destination, and renamed into place; a failed export leaves the
    /// destination untouched.
    pub fn export<R: Record>(&self, records: &[R], output_path: &Path) -> SheetResult<ExportReport> {
        let (buffer, report) = self.export_to_buffer(records)?;
        write_atomically(output_path, &buffer)?;
        self.observer.document_written(output_path, buffer.len());
        Ok(report)
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> SheetResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = staging_file(dir)?;
    // A replaced document keeps its permissions
    if let Ok(existing) = std::fs::metadata(path) {
        staged.as_file().set_permissions(existing.permissions())?;
    }
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| SheetError::Io(e.error))?;
    Ok(())
}

/// Temporary file created with the same mode as a regular new file (0666 less umask)
fn staging_file(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".sheetmap-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}
