//! Record shape: field descriptors, accessor tables and type registration
//!
//! A record type describes itself once through [`Record::schema`]; both the
//! exporter and the importer work exclusively from that description. Column
//! `n` of a sheet is bound to the field with ordinal `n`, and nothing else
//! links the two.
//!
//! The usual way to register a type is the [`sheet_record!`](crate::sheet_record)
//! macro, which declares the struct and derives its schema from the field
//! declaration order:
//!
//! ```
//! use chrono::NaiveDateTime;
//! use sheetmap::sheet_record;
//!
//! sheet_record! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct Book {
//!         pub id: i32,
//!         pub name: String,
//!         pub price: f64,
//!         pub time: Option<NaiveDateTime>,
//!     }
//! }
//! ```

mod field;
pub mod resolver;
mod schema;

pub use field::{DeclaredType, FieldDescriptor, FieldType, FieldValue};
pub use resolver::{accessor_name, resolve_fields};
pub use schema::{Getter, Schema, SchemaBuilder, Setter};

/// A type that can be written to and read from sheet rows
pub trait Record: Sized + 'static {
    /// Schema of the type, built once and shared by every call
    fn schema() -> &'static Schema<Self>;
}

/// Declare a struct and register it as a [`Record`].
///
/// Fields become columns in declaration order. Each field type must
/// implement [`FieldType`].
#[macro_export]
macro_rules! sheet_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $field_ty:ty
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $field_ty,
            )+
        }

        impl $crate::record::Record for $name {
            fn schema() -> &'static $crate::record::Schema<Self> {
                static SCHEMA: ::std::sync::OnceLock<$crate::record::Schema<$name>> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::record::Schema::<$name>::builder()
                        $(
                            .accessors::<$field_ty>(
                                stringify!($field),
                                |record: &$name| {
                                    $crate::record::FieldType::to_field_value(&record.$field)
                                },
                                |record: &mut $name, value: $crate::record::FieldValue| {
                                    record.$field =
                                        $crate::record::FieldType::from_field_value(value)?;
                                    Ok(())
                                },
                            )
                        )+
                        .build()
                })
            }
        }
    };
}
