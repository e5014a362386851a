use crate::record::DeclaredType;
use thiserror::Error;

pub type SheetResult<T> = Result<T, SheetError>;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Reflection error: {type_name} has no accessor named '{accessor}'")]
    Reflection {
        accessor: String,
        type_name: &'static str,
    },

    #[error("Coercion error: {0}")]
    Coercion(#[from] CoercionError),

    #[error("Row {row} has {found} columns, expected {expected}")]
    ColumnMismatch {
        row: u32,
        expected: usize,
        found: usize,
    },

    #[error("Invalid date pattern: {0}")]
    Pattern(String),

    #[error("Theme error: {0}")]
    Theme(String),
}

/// Raw cell text that could not be turned into a field's declared type.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("cannot convert '{value}' to {target}: {reason}")]
pub struct CoercionError {
    pub value: String,
    pub target: DeclaredType,
    pub reason: String,
}

impl CoercionError {
    pub fn new(value: impl Into<String>, target: DeclaredType, reason: impl ToString) -> Self {
        Self {
            value: value.into(),
            target,
            reason: reason.to_string(),
        }
    }
}

/// Failure scoped to a single field of a single row.
///
/// These never abort an import or export; they are collected as
/// diagnostics next to the records that were assembled.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("no accessor named '{0}'")]
    MissingAccessor(String),

    #[error(transparent)]
    Coercion(#[from] CoercionError),
}

/// A field-scoped failure, located by sheet row and column
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDiagnostic {
    /// Zero-based sheet row
    pub row: u32,
    /// Zero-based column, equal to the field's ordinal
    pub column: usize,
    pub field: &'static str,
    pub error: FieldError,
}

impl std::fmt::Display for FieldDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "row {} column {} ({}): {}",
            self.row, self.column, self.field, self.error
        )
    }
}
