//! Runtime value type for the virtual machine.
//!
//! A [`Value`] is a closed tagged union: the enum discriminant is the tag, so
//! tag and payload can never disagree. Values are owned and copied between
//! operand stack slots and symbol table entries; there is no shared aliasing.

use std::fmt;

use crate::error::RuntimeError;
use crate::runtime_struct::RuntimeStruct;

/// The tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    None,
    Int,
    Float,
    String,
    Bool,
    Struct,
}

impl ValueType {
    /// Parse a type name, ignoring ASCII case.
    ///
    /// Only the five constructible types are recognized; there is no name for
    /// [`ValueType::None`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "int" => Some(ValueType::Int),
            "float" => Some(ValueType::Float),
            "string" => Some(ValueType::String),
            "bool" => Some(ValueType::Bool),
            "struct" => Some(ValueType::Struct),
            _ => None,
        }
    }

    /// Get the display name of this type.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::None => "None",
            ValueType::Int => "Int",
            ValueType::Float => "Float",
            ValueType::String => "String",
            ValueType::Bool => "Bool",
            ValueType::Struct => "Struct",
        }
    }

    /// The zero value for this type.
    pub fn zero_value(self) -> Value {
        match self {
            ValueType::None => Value::None,
            ValueType::Int => Value::Int(0),
            ValueType::Float => Value::Float(0.0),
            ValueType::String => Value::String(String::new()),
            ValueType::Bool => Value::Bool(false),
            ValueType::Struct => Value::Struct(RuntimeStruct::new()),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value manipulated by the VM at execution time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absence of a value
    #[default]
    None,
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Owned string
    String(String),
    /// Boolean
    Bool(bool),
    /// Struct instance with named fields
    Struct(RuntimeStruct),
}

/// Generates the fail-fast getters and the type predicates.
macro_rules! accessors {
    ($($variant:ident => $is:ident, $as:ident, $as_mut:ident, $ty:ty;)*) => {
        impl Value {
            $(
                #[doc = concat!("Check if this value is tagged `", stringify!($variant), "`.")]
                pub fn $is(&self) -> bool {
                    matches!(self, Value::$variant(_))
                }

                #[doc = concat!("Borrow the `", stringify!($variant), "` payload, or fail with `TypeMismatch`.")]
                pub fn $as(&self) -> Result<&$ty, RuntimeError> {
                    match self {
                        Value::$variant(v) => Ok(v),
                        other => Err(RuntimeError::type_mismatch(
                            ValueType::$variant.name(),
                            other.type_name(),
                        )),
                    }
                }

                #[doc = concat!("Mutably borrow the `", stringify!($variant), "` payload, or fail with `TypeMismatch`.")]
                pub fn $as_mut(&mut self) -> Result<&mut $ty, RuntimeError> {
                    match self {
                        Value::$variant(v) => Ok(v),
                        other => Err(RuntimeError::type_mismatch(
                            ValueType::$variant.name(),
                            other.type_name(),
                        )),
                    }
                }
            )*
        }
    };
}

accessors! {
    Int => is_int, as_int, as_int_mut, i64;
    Float => is_float, as_float, as_float_mut, f64;
    String => is_string, as_string, as_string_mut, String;
    Bool => is_bool, as_bool, as_bool_mut, bool;
    Struct => is_struct, as_struct, as_struct_mut, RuntimeStruct;
}

impl Value {
    /// Construct a value from a type name known only as text.
    ///
    /// The name is matched case-insensitively. Without a payload the type's
    /// zero value is produced; a payload must carry the named tag.
    pub fn from_type_name(type_name: &str, payload: Option<Value>) -> Result<Value, RuntimeError> {
        let ty = ValueType::from_name(type_name).ok_or_else(|| RuntimeError::InvalidTypeName {
            name: type_name.to_string(),
        })?;

        match payload {
            None => Ok(ty.zero_value()),
            Some(value) if value.value_type() == ty => Ok(value),
            Some(value) => Err(RuntimeError::type_mismatch(ty.name(), value.type_name())),
        }
    }

    /// Get the tag of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::None => ValueType::None,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::String(_) => ValueType::String,
            Value::Bool(_) => ValueType::Bool,
            Value::Struct(_) => ValueType::Struct,
        }
    }

    /// Get a human-readable name for this value's type.
    pub fn type_name(&self) -> &'static str {
        self.value_type().name()
    }

    /// Check if this value is `None`.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Borrow the string payload as `&str`.
    pub fn as_str(&self) -> Result<&str, RuntimeError> {
        self.as_string().map(String::as_str)
    }

    /// Take the struct payload by value.
    pub fn into_struct(self) -> Result<RuntimeStruct, RuntimeError> {
        match self {
            Value::Struct(s) => Ok(s),
            other => Err(RuntimeError::type_mismatch(
                ValueType::Struct.name(),
                other.type_name(),
            )),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<RuntimeStruct> for Value {
    fn from(v: RuntimeStruct) -> Self {
        Value::Struct(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "none"),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:?}", v),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Struct(s) => write!(f, "{}", s),
        }
    }
}
