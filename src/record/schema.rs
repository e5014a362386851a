//! Per-type field tables with convention-named accessors

use super::field::{FieldDescriptor, FieldType, FieldValue};
use super::resolver::accessor_name;
use crate::error::{CoercionError, FieldError, SheetError, SheetResult};
use std::collections::HashMap;

/// Reads one field out of a record
pub type Getter<R> = fn(&R) -> FieldValue;

/// Assigns one field of a record
pub type Setter<R> = fn(&mut R, FieldValue) -> Result<(), CoercionError>;

/// Ordered field descriptors of a record type plus its accessor table.
///
/// Accessors are keyed by their conventional name (`getName`, `isActive`,
/// `setName`); the pipelines look them up through
/// [`accessor_name`](super::accessor_name), so a schema registered with a
/// non-conventional name surfaces as a reflection failure for that field.
pub struct Schema<R> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
    getters: HashMap<String, Getter<R>>,
    setters: HashMap<String, Setter<R>>,
}

impl<R> Schema<R> {
    pub fn builder() -> SchemaBuilder<R> {
        SchemaBuilder {
            schema: Schema {
                type_name: std::any::type_name::<R>(),
                fields: Vec::new(),
                getters: HashMap::new(),
                setters: HashMap::new(),
            },
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Getter for `field`, found by its conventional accessor name
    pub fn getter(&self, field: &FieldDescriptor) -> Result<Getter<R>, FieldError> {
        let name = accessor_name(field.name, true, field.declared_type);
        self.getters
            .get(&name)
            .copied()
            .ok_or(FieldError::MissingAccessor(name))
    }

    /// Setter for `field`, found by its conventional accessor name
    pub fn setter(&self, field: &FieldDescriptor) -> Result<Setter<R>, FieldError> {
        let name = accessor_name(field.name, false, field.declared_type);
        self.setters
            .get(&name)
            .copied()
            .ok_or(FieldError::MissingAccessor(name))
    }

    /// Fail on the first field without a getter
    pub fn require_getters(&self) -> SheetResult<()> {
        self.require(|field| self.getter(field).map(drop))
    }

    /// Fail on the first field without a setter
    pub fn require_setters(&self) -> SheetResult<()> {
        self.require(|field| self.setter(field).map(drop))
    }

    fn require(&self, lookup: impl Fn(&FieldDescriptor) -> Result<(), FieldError>) -> SheetResult<()> {
        for field in &self.fields {
            if let Err(FieldError::MissingAccessor(accessor)) = lookup(field) {
                return Err(SheetError::Reflection {
                    accessor,
                    type_name: self.type_name,
                });
            }
        }
        Ok(())
    }
}

/// Registration API for [`Schema`]
pub struct SchemaBuilder<R> {
    schema: Schema<R>,
}

impl<R> SchemaBuilder<R> {
    /// Declare the next field; its ordinal is the number of fields declared before it
    pub fn field<T: FieldType>(mut self, name: &'static str) -> Self {
        let ordinal = self.schema.fields.len();
        self.schema.fields.push(FieldDescriptor {
            name,
            declared_type: T::DECLARED,
            ordinal,
            optional: T::OPTIONAL,
        });
        self
    }

    pub fn getter(mut self, accessor: impl Into<String>, getter: Getter<R>) -> Self {
        self.schema.getters.insert(accessor.into(), getter);
        self
    }

    pub fn setter(mut self, accessor: impl Into<String>, setter: Setter<R>) -> Self {
        self.schema.setters.insert(accessor.into(), setter);
        self
    }

    /// Declare a field together with its conventionally named getter and setter
    pub fn accessors<T: FieldType>(
        self,
        name: &'static str,
        getter: Getter<R>,
        setter: Setter<R>,
    ) -> Self {
        self.field::<T>(name)
            .getter(accessor_name(name, true, T::DECLARED), getter)
            .setter(accessor_name(name, false, T::DECLARED), setter)
    }

    pub fn build(self) -> Schema<R> {
        self.schema
    }
}
