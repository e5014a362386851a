//! Sheetmap - typed records to styled spreadsheets and back
//!
//! This library maps collections of plain Rust structs onto worksheet rows
//! and reads such rows back into structs, driven entirely by each type's
//! registered field list.
//!
//! # Features
//!
//! - Field resolution in declaration order, with convention-named accessors
//! - Styled .xlsx export: merged title row, header row, one row per record
//! - Import from xls/xlsx/xlsb/ods with per-field diagnostics
//! - Int, Float, Double, Byte, Boolean, Date and String fields, plus `Option`
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDateTime;
//! use sheetmap::excel::{ExportOptions, ImportOptions, RecordExporter, RecordImporter};
//! use sheetmap::sheet_record;
//! use std::path::Path;
//!
//! sheet_record! {
//!     #[derive(Debug, Default)]
//!     pub struct Book {
//!         pub id: i32,
//!         pub name: String,
//!         pub price: f64,
//!         pub time: Option<NaiveDateTime>,
//!     }
//! }
//!
//! let books = vec![Book { id: 1, name: "Rust".into(), price: 7.5, time: None }];
//! let options = ExportOptions::new("Books", ["id", "name", "price", "time"]);
//! RecordExporter::new(options).export(&books, Path::new("books.xlsx"))?;
//!
//! let report = RecordImporter::new(ImportOptions::rows(2, 0))
//!     .import::<Book>(Path::new("books.xlsx"))?;
//! println!("{} books, {} problems", report.records.len(), report.diagnostics.len());
//! # Ok::<(), sheetmap::error::SheetError>(())
//! ```

pub mod cli;
pub mod error;
pub mod excel;
pub mod format;
pub mod observe;
pub mod record;

// Re-export commonly used types
pub use error::{SheetError, SheetResult};
pub use record::{DeclaredType, FieldDescriptor, FieldType, FieldValue, Record};
