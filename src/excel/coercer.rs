//! Raw cell text → typed field values

use crate::error::CoercionError;
use crate::record::{DeclaredType, FieldDescriptor, FieldValue};
use chrono::{NaiveDate, NaiveTime};
use std::str::FromStr;

/// Fixed date layout accepted on import
pub const IMPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Converts the raw text of a column into the value of its field
pub struct FieldCoercer;

impl FieldCoercer {
    /// Coerce `raw` according to `field`'s declared type.
    ///
    /// - Int: anything from the first `.` on is dropped before parsing,
    ///   since number cells read back as `"12.0"`
    /// - Float, Double, Byte, Boolean: the type's own parser
    /// - Date: `yyyy-MM-dd`, trailing text (a time of day) ignored
    /// - String and other types: the text itself
    ///
    /// An empty cell for an optional field is always [`FieldValue::Empty`].
    pub fn coerce(raw: &str, field: &FieldDescriptor) -> Result<FieldValue, CoercionError> {
        if field.optional && raw.is_empty() {
            return Ok(FieldValue::Empty);
        }

        let target = field.declared_type;
        match target {
            DeclaredType::Int => {
                let integral = raw.find('.').map_or(raw, |dot| &raw[..dot]);
                parse::<i32>(integral, raw, target).map(FieldValue::Int)
            }
            DeclaredType::Float => parse::<f32>(raw.trim(), raw, target).map(FieldValue::Float),
            DeclaredType::Double => parse::<f64>(raw.trim(), raw, target).map(FieldValue::Double),
            DeclaredType::Byte => parse::<i8>(raw, raw, target).map(FieldValue::Byte),
            DeclaredType::Boolean => parse::<bool>(raw, raw, target).map(FieldValue::Boolean),
            DeclaredType::Date => NaiveDate::parse_and_remainder(raw, IMPORT_DATE_FORMAT)
                .map(|(date, _)| FieldValue::Date(date.and_time(NaiveTime::MIN)))
                .map_err(|e| CoercionError::new(raw, target, e)),
            DeclaredType::String | DeclaredType::Other(_) => Ok(FieldValue::Text(raw.to_string())),
        }
    }
}

fn parse<T>(text: &str, raw: &str, target: DeclaredType) -> Result<T, CoercionError>
where
    T: FromStr,
    T::Err: ToString,
{
    text.parse::<T>()
        .map_err(|e| CoercionError::new(raw, target, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(declared_type: DeclaredType, optional: bool) -> FieldDescriptor {
        FieldDescriptor {
            name: "f",
            declared_type,
            ordinal: 0,
            optional,
        }
    }

    fn coerce(raw: &str, declared: DeclaredType) -> Result<FieldValue, CoercionError> {
        FieldCoercer::coerce(raw, &field(declared, false))
    }

    #[test]
    fn test_int_strips_fraction_only_when_present() {
        assert_eq!(coerce("12.0", DeclaredType::Int), Ok(FieldValue::Int(12)));
        assert_eq!(coerce("12.9", DeclaredType::Int), Ok(FieldValue::Int(12)));
        assert_eq!(coerce("12", DeclaredType::Int), Ok(FieldValue::Int(12)));
        assert_eq!(coerce("-3.0", DeclaredType::Int), Ok(FieldValue::Int(-3)));
        assert!(coerce("abc", DeclaredType::Int).is_err());
        assert!(coerce("1.2.3", DeclaredType::Int).is_ok());
        assert!(coerce(".5", DeclaredType::Int).is_err());
    }

    #[test]
    fn test_direct_parsers() {
        assert_eq!(coerce("7.5", DeclaredType::Float), Ok(FieldValue::Float(7.5)));
        assert_eq!(coerce("7.36", DeclaredType::Double), Ok(FieldValue::Double(7.36)));
        assert_eq!(coerce("-8", DeclaredType::Byte), Ok(FieldValue::Byte(-8)));
        assert_eq!(coerce("true", DeclaredType::Boolean), Ok(FieldValue::Boolean(true)));
        assert_eq!(coerce("false", DeclaredType::Boolean), Ok(FieldValue::Boolean(false)));
    }

    #[test]
    fn test_byte_does_not_strip_fraction() {
        let err = coerce("1.0", DeclaredType::Byte).unwrap_err();
        assert_eq!(err.value, "1.0");
        assert_eq!(err.target, DeclaredType::Byte);
    }

    #[test]
    fn test_empty_text_fails_for_typed_fields() {
        for declared in [
            DeclaredType::Int,
            DeclaredType::Float,
            DeclaredType::Double,
            DeclaredType::Byte,
            DeclaredType::Boolean,
            DeclaredType::Date,
        ] {
            let err = coerce("", declared).unwrap_err();
            assert_eq!(err.target, declared);
        }
        assert_eq!(coerce("", DeclaredType::String), Ok(FieldValue::Text(String::new())));
    }

    #[test]
    fn test_optional_empty_is_absent() {
        let optional = field(DeclaredType::Int, true);
        assert_eq!(FieldCoercer::coerce("", &optional), Ok(FieldValue::Empty));
        assert_eq!(FieldCoercer::coerce("4.0", &optional), Ok(FieldValue::Int(4)));
    }

    #[test]
    fn test_date_is_truncated_to_midnight() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            coerce("2024-01-01", DeclaredType::Date),
            Ok(FieldValue::Date(expected))
        );
        assert_eq!(
            coerce("2024-01-01 18:45", DeclaredType::Date),
            Ok(FieldValue::Date(expected))
        );
        assert!(coerce("01/01/2024", DeclaredType::Date).is_err());
    }

    #[test]
    fn test_other_types_receive_raw_text() {
        assert_eq!(
            coerce(" raw 1.0 ", DeclaredType::Other("Status")),
            Ok(FieldValue::Text(" raw 1.0 ".into()))
        );
    }
}
