//! Field metadata and the typed values that flow between records and cells

use crate::error::CoercionError;
use crate::format::DatePattern;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::fmt;

/// Declared type of a record field, as seen by the coercion rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeclaredType {
    /// 32-bit signed integer
    Int,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    /// 8-bit signed integer
    Byte,
    /// true/false
    Boolean,
    /// Calendar date, optionally with a time of day
    Date,
    /// Text
    String,
    /// Any other type; receives the raw cell text unconverted on import
    Other(&'static str),
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Int => write!(f, "int"),
            DeclaredType::Float => write!(f, "float"),
            DeclaredType::Double => write!(f, "double"),
            DeclaredType::Byte => write!(f, "byte"),
            DeclaredType::Boolean => write!(f, "boolean"),
            DeclaredType::Date => write!(f, "date"),
            DeclaredType::String => write!(f, "string"),
            DeclaredType::Other(name) => write!(f, "{}", name),
        }
    }
}

/// One field of a record type: its name, declared type and column position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub declared_type: DeclaredType,
    /// Declaration order within the record type, contiguous from 0
    pub ordinal: usize,
    /// `Option<T>` fields: an empty cell maps to `None`
    pub optional: bool,
}

impl FieldDescriptor {
    pub fn is_boolean(&self) -> bool {
        self.declared_type == DeclaredType::Boolean
    }

    /// True when an empty cell is a valid value for this field
    pub fn accepts_blank(&self) -> bool {
        self.optional || self.declared_type == DeclaredType::String
    }
}

/// A field's value, detached from the record it was read from or will be written to
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent value (`None`)
    Empty,
    Int(i32),
    Float(f32),
    Double(f64),
    Byte(i8),
    Boolean(bool),
    Date(NaiveDateTime),
    Text(String),
}

impl FieldValue {
    /// Default text form of the value; dates use `pattern`
    pub fn render(&self, pattern: &DatePattern) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Int(v) => v.to_string(),
            FieldValue::Float(v) => v.to_string(),
            FieldValue::Double(v) => v.to_string(),
            FieldValue::Byte(v) => v.to_string(),
            FieldValue::Boolean(v) => v.to_string(),
            FieldValue::Date(v) => pattern.format(v),
            FieldValue::Text(v) => v.clone(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            FieldValue::Empty => "no value",
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::Double(_) => "double",
            FieldValue::Byte(_) => "byte",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Date(_) => "date",
            FieldValue::Text(_) => "text",
        }
    }

    fn debug_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Date(d) => d.to_string(),
            other => other.render(&DatePattern::iso_date()),
        }
    }

    /// Error for a value handed to a field of an incompatible type
    pub fn mismatch(&self, target: DeclaredType) -> CoercionError {
        CoercionError::new(
            self.debug_text(),
            target,
            format!("{} value is not assignable", self.kind()),
        )
    }
}

/// Rust types that can back a record field
///
/// Implemented for the scalar types the coercion rules know about and for
/// `Option<T>` of each. Custom types can implement it with
/// [`DeclaredType::Other`] to receive the raw cell text on import.
pub trait FieldType: Sized {
    const DECLARED: DeclaredType;
    const OPTIONAL: bool = false;

    fn to_field_value(&self) -> FieldValue;

    fn from_field_value(value: FieldValue) -> Result<Self, CoercionError>;
}

macro_rules! scalar_field_type {
    ($ty:ty, $declared:ident, $variant:ident) => {
        impl FieldType for $ty {
            const DECLARED: DeclaredType = DeclaredType::$declared;

            fn to_field_value(&self) -> FieldValue {
                FieldValue::$variant(*self)
            }

            fn from_field_value(value: FieldValue) -> Result<Self, CoercionError> {
                match value {
                    FieldValue::$variant(v) => Ok(v),
                    other => Err(other.mismatch(Self::DECLARED)),
                }
            }
        }
    };
}

scalar_field_type!(i32, Int, Int);
scalar_field_type!(f32, Float, Float);
scalar_field_type!(f64, Double, Double);
scalar_field_type!(i8, Byte, Byte);
scalar_field_type!(bool, Boolean, Boolean);
scalar_field_type!(NaiveDateTime, Date, Date);

impl FieldType for NaiveDate {
    const DECLARED: DeclaredType = DeclaredType::Date;

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Date(self.and_time(NaiveTime::MIN))
    }

    fn from_field_value(value: FieldValue) -> Result<Self, CoercionError> {
        match value {
            FieldValue::Date(v) => Ok(v.date()),
            other => Err(other.mismatch(Self::DECLARED)),
        }
    }
}

impl FieldType for String {
    const DECLARED: DeclaredType = DeclaredType::String;

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }

    fn from_field_value(value: FieldValue) -> Result<Self, CoercionError> {
        match value {
            FieldValue::Text(v) => Ok(v),
            other => Err(other.mismatch(Self::DECLARED)),
        }
    }
}

impl<T: FieldType> FieldType for Option<T> {
    const DECLARED: DeclaredType = T::DECLARED;
    const OPTIONAL: bool = true;

    fn to_field_value(&self) -> FieldValue {
        match self {
            Some(v) => v.to_field_value(),
            None => FieldValue::Empty,
        }
    }

    fn from_field_value(value: FieldValue) -> Result<Self, CoercionError> {
        match value {
            FieldValue::Empty => Ok(None),
            other => T::from_field_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_maps_empty_to_none() {
        assert_eq!(Option::<i32>::from_field_value(FieldValue::Empty), Ok(None));
        assert_eq!(
            Option::<i32>::from_field_value(FieldValue::Int(4)),
            Ok(Some(4))
        );
        assert_eq!(Some(2.5f64).to_field_value(), FieldValue::Double(2.5));
        assert_eq!(None::<String>.to_field_value(), FieldValue::Empty);
    }

    #[test]
    fn test_required_field_rejects_empty() {
        let err = i32::from_field_value(FieldValue::Empty).unwrap_err();
        assert_eq!(err.target, DeclaredType::Int);
        assert!(err.reason.contains("no value"));
    }

    #[test]
    fn test_mismatched_variant_is_coercion_error() {
        let err = String::from_field_value(FieldValue::Int(3)).unwrap_err();
        assert_eq!(err.value, "3");
        assert_eq!(err.target, DeclaredType::String);
    }

    #[test]
    fn test_naive_date_round_trips_through_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 2).unwrap();
        let value = date.to_field_value();
        assert_eq!(
            value,
            FieldValue::Date(date.and_hms_opt(0, 0, 0).unwrap())
        );
        assert_eq!(NaiveDate::from_field_value(value), Ok(date));
    }

    #[test]
    fn test_render_uses_date_pattern() {
        let pattern = DatePattern::new("yyyy/MM/dd HH:mm").unwrap();
        let when = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(FieldValue::Date(when).render(&pattern), "2024/01/05 09:30");
        assert_eq!(FieldValue::Empty.render(&pattern), "");
        assert_eq!(FieldValue::Boolean(true).render(&pattern), "true");
        assert_eq!(FieldValue::Double(7.5).render(&pattern), "7.5");
    }
}
