//! Struct instances.
//!
//! A [`RuntimeStruct`] maps unique field names to values. There is no schema
//! at this layer: the field set grows as fields are stored.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::RuntimeError;
use crate::value::Value;

/// A struct instance: an unordered field-name to value mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuntimeStruct {
    fields: FxHashMap<String, Value>,
}

impl RuntimeStruct {
    /// Create an empty struct.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field, or `None` if it has never been stored.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Get a field mutably.
    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.fields.get_mut(field)
    }

    /// Get a field, failing with `UndefinedField` if it is unset.
    pub fn field(&self, field: &str) -> Result<&Value, RuntimeError> {
        self.fields
            .get(field)
            .ok_or_else(|| RuntimeError::UndefinedField {
                field: field.to_string(),
            })
    }

    /// Insert or overwrite a field, returning the previous value.
    pub fn set(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    /// Builder-style [`set`](Self::set).
    pub fn with_field(mut self, field: impl Into<String>, value: Value) -> Self {
        self.set(field, value);
        self
    }

    /// Check if a field has been stored.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of stored fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no field has been stored.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over fields in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Display for RuntimeStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Sorted so dumps are stable across runs.
        write!(f, "{{")?;
        for (i, name) in self.field_names().into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, self.fields[name])?;
        }
        write!(f, "}}")
    }
}
