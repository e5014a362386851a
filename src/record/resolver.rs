//! Field resolution and accessor naming

use super::field::{DeclaredType, FieldDescriptor};
use super::Record;
use crate::error::{SheetError, SheetResult};

/// Ordered field descriptors of `R`; fails when the type declares no fields
pub fn resolve_fields<R: Record>() -> SheetResult<&'static [FieldDescriptor]> {
    let schema = R::schema();
    let fields = schema.fields();
    if fields.is_empty() {
        return Err(SheetError::Schema(format!(
            "{} declares no fields",
            schema.type_name()
        )));
    }
    Ok(fields)
}

/// Conventional accessor name for a field.
///
/// Setters are prefixed `set`, boolean getters `is`, other getters `get`.
/// The first ASCII letter of the name is upper-cased, except for names
/// starting with `_`, which are appended as written (`_id` → `get_id`).
pub fn accessor_name(field_name: &str, is_getter: bool, declared: DeclaredType) -> String {
    let prefix = match (is_getter, declared) {
        (false, _) => "set",
        (true, DeclaredType::Boolean) => "is",
        (true, _) => "get",
    };

    let mut name = String::with_capacity(prefix.len() + field_name.len());
    name.push_str(prefix);

    if field_name.starts_with('_') {
        name.push_str(field_name);
        return name;
    }

    match field_name.find(|c: char| c.is_ascii_alphabetic()) {
        Some(pos) => {
            name.push_str(&field_name[..pos]);
            name.push_str(&field_name[pos..pos + 1].to_ascii_uppercase());
            name.push_str(&field_name[pos + 1..]);
        }
        None => name.push_str(field_name),
    }
    name
}
