use crate::error::{FieldDiagnostic, SheetError, SheetResult};
use crate::excel::{
    read_sheet, ExportOptions, ImportOptions, RawRow, RecordExporter, RecordImporter,
    RowExtractor, SheetSelector, SheetTheme,
};
use crate::sheet_record;
use calamine::open_workbook_auto;
use chrono::{Local, NaiveDateTime};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

sheet_record! {
    /// Catalogue entry used by the `sample` and `books` commands
    #[derive(Debug, Clone, Default, PartialEq, Serialize)]
    pub struct Book {
        pub id: i32,
        pub name: String,
        pub price: f64,
        pub time: Option<NaiveDateTime>,
    }
}

/// Column labels of the book catalogue
pub const BOOK_HEADERS: [&str; 4] = ["Book ID", "Title", "Price", "Stocked At"];

fn sample_books() -> Vec<Book> {
    let now = Local::now().naive_local();
    ["Why? Volume 1", "Why? Volume 2", "Why? Volume 3"]
        .iter()
        .enumerate()
        .map(|(idx, name)| Book {
            id: idx as i32 + 1,
            name: name.to_string(),
            price: 7.36,
            time: Some(now),
        })
        .collect()
}

fn print_diagnostics(diagnostics: &[FieldDiagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    println!(
        "{}",
        format!("⚠️  {} field(s) skipped:", diagnostics.len())
            .yellow()
            .bold()
    );
    for diagnostic in diagnostics {
        println!("   {}", diagnostic.to_string().yellow());
    }
}

/// Execute the sample command
pub fn sample(
    output: PathBuf,
    title: Option<String>,
    pattern: String,
    theme: Option<PathBuf>,
) -> SheetResult<()> {
    println!("{}", "📚 Sheetmap - Sample Export".bold().green());
    println!("   Output:  {}", output.display());
    println!("   Pattern: {}\n", pattern);

    let mut options = ExportOptions::new("Books", BOOK_HEADERS).date_pattern(pattern);
    if let Some(title) = title {
        options = options.title(title);
    }
    if let Some(theme_path) = theme {
        options = options.theme(SheetTheme::from_yaml_file(&theme_path)?);
    }

    let books = sample_books();
    let report = RecordExporter::new(options).export(&books, &output)?;
    print_diagnostics(&report.diagnostics);

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   {} rows written to {}\n", report.rows_written, output.display());
    Ok(())
}

/// Execute the inspect command
pub fn inspect(
    file: PathBuf,
    start_row: u32,
    end_row_offset: i64,
    sheet: Option<String>,
    json: bool,
) -> SheetResult<()> {
    let rows = scan(&file, start_row, end_row_offset, sheet)?;

    if json {
        let text = serde_json::to_string_pretty(&rows)
            .map_err(std::io::Error::other)?;
        println!("{}", text);
        return Ok(());
    }

    println!("{}", "🔍 Sheetmap - Inspect".bold().green());
    println!("   File: {}\n", file.display());
    for row in &rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|cell| {
                if cell.is_empty() {
                    "∅".dimmed().to_string()
                } else {
                    cell.clone()
                }
            })
            .collect();
        println!("   {} {}", format!("{:>5}", row.index).cyan(), cells.join(" | "));
    }
    println!("\n   {} populated row(s)", rows.len());
    Ok(())
}

fn scan(
    file: &Path,
    start_row: u32,
    end_row_offset: i64,
    sheet: Option<String>,
) -> SheetResult<Vec<RawRow>> {
    if !file.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", file.display()),
        )
        .into());
    }
    let selector = sheet.map(SheetSelector::Named).unwrap_or_default();
    let mut workbook = open_workbook_auto(file).map_err(|e| {
        SheetError::Workbook(format!("Failed to open {}: {}", file.display(), e))
    })?;
    let (_, range) = read_sheet(&mut workbook, &selector)?;
    Ok(RowExtractor::new(&range).extract(start_row, end_row_offset))
}

/// Execute the books command
pub fn books(file: PathBuf, start_row: u32, end_row_offset: i64, strict: bool) -> SheetResult<()> {
    let options = ImportOptions::rows(start_row, end_row_offset).strict(strict);
    let report = RecordImporter::new(options).import::<Book>(&file)?;

    let text = serde_json::to_string_pretty(&report.records)
        .map_err(std::io::Error::other)?;
    println!("{}", text);

    print_diagnostics(&report.diagnostics);
    Ok(())
}
