//! Pluggable sink for pipeline events
//!
//! Exporters and importers report what they do through an [`Observer`].
//! The default, [`TracingObserver`], turns every event into a structured
//! `tracing` event; callers can pass their own observer to collect events
//! instead.

use crate::error::FieldDiagnostic;
use crate::excel::RawRow;
use std::path::Path;
use tracing::{debug, info, warn};

pub trait Observer {
    /// A sheet was opened for import
    fn sheet_opened(&self, _sheet: &str, _last_row: Option<u32>) {}

    /// A populated row was read, before any field is assigned
    fn row_scanned(&self, _row: &RawRow) {}

    /// A field could not be read or assigned; processing continues
    fn field_failed(&self, _diagnostic: &FieldDiagnostic) {}

    /// An exported document reached its destination
    fn document_written(&self, _path: &Path, _bytes: usize) {}
}

/// Emits every event through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn sheet_opened(&self, sheet: &str, last_row: Option<u32>) {
        info!(sheet, last_row, "reading sheet");
    }

    fn row_scanned(&self, row: &RawRow) {
        debug!(row = row.index, cells = ?row.cells, "row scanned");
    }

    fn field_failed(&self, diagnostic: &FieldDiagnostic) {
        warn!(
            row = diagnostic.row,
            column = diagnostic.column,
            field = diagnostic.field,
            error = %diagnostic.error,
            "field skipped"
        );
    }

    fn document_written(&self, path: &Path, bytes: usize) {
        info!(path = %path.display(), bytes, "document written");
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl Observer for NullObserver {}
