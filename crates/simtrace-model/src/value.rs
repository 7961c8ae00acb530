//! Declared value types and the typed values they describe.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of a resource parameter or a result value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// 32-bit signed integer.
    Integer,
    /// 64-bit IEEE-754 real.
    Real,
    /// Boolean stored as a single byte.
    Boolean,
    /// Enumeration ordinal stored as a 16-bit integer.
    Enum,
    /// UTF-8 string (indirect in resource parameter blocks).
    String,
    /// Array parameter. Declared by models but not yet traced.
    Array,
}

impl ValueType {
    /// Size in bytes of a value stored inline, or `None` for types that
    /// are stored indirectly (strings) or not supported on the wire (arrays).
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            Self::Integer => Some(4),
            Self::Real => Some(8),
            Self::Boolean => Some(1),
            Self::Enum => Some(2),
            Self::String | Self::Array => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Boolean => "boolean",
            Self::Enum => "enum",
            Self::String => "string",
            Self::Array => "array",
        };
        f.write_str(name)
    }
}

/// A decoded parameter or result value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Integer value.
    Integer(i32),
    /// Real value.
    Real(f64),
    /// Boolean value.
    Boolean(bool),
    /// Enumeration ordinal.
    Enum(i16),
    /// String value.
    String(String),
}

impl Value {
    /// The declared type this value satisfies.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Integer(_) => ValueType::Integer,
            Self::Real(_) => ValueType::Real,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Enum(_) => ValueType::Enum,
            Self::String(_) => ValueType::String,
        }
    }
}
