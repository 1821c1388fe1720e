//! Column data kinds and typed cell values.
//!
//! Every cell of a table holds a [`Value`]. A value's kind is fixed by its
//! variant, so an `Int32` never silently passes as an `Int64`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The closed set of kinds a column can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    Str,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Double,
}

impl DataKind {
    /// Returns true for kinds that hold numbers.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, DataKind::Str | DataKind::Bool)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Str => "str",
            DataKind::Bool => "bool",
            DataKind::Int8 => "int8",
            DataKind::Int16 => "int16",
            DataKind::Int32 => "int32",
            DataKind::Int64 => "int64",
            DataKind::Float32 => "float32",
            DataKind::Float64 => "float64",
            DataKind::Double => "double",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single typed cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Empty cell.
    #[default]
    Null,
    Str(String),
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Double(f64),
}

impl Value {
    /// Returns the kind of this value, or `None` for an empty cell.
    pub fn kind(&self) -> Option<DataKind> {
        match self {
            Value::Null => None,
            Value::Str(_) => Some(DataKind::Str),
            Value::Bool(_) => Some(DataKind::Bool),
            Value::Int8(_) => Some(DataKind::Int8),
            Value::Int16(_) => Some(DataKind::Int16),
            Value::Int32(_) => Some(DataKind::Int32),
            Value::Int64(_) => Some(DataKind::Int64),
            Value::Float32(_) => Some(DataKind::Float32),
            Value::Float64(_) => Some(DataKind::Float64),
            Value::Double(_) => Some(DataKind::Double),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Orders two values of the same kind.
    ///
    /// Returns `None` across kinds, for booleans compared to anything but
    /// booleans, and for NaN.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Int8(a), Value::Int8(b)) => Some(a.cmp(b)),
            (Value::Int16(a), Value::Int16(b)) => Some(a.cmp(b)),
            (Value::Int32(a), Value::Int32(b)) => Some(a.cmp(b)),
            (Value::Int64(a), Value::Int64(b)) => Some(a.cmp(b)),
            (Value::Float32(a), Value::Float32(b)) => a.partial_cmp(b),
            (Value::Float64(a), Value::Float64(b)) => a.partial_cmp(b),
            (Value::Double(a), Value::Double(b)) => a.partial_cmp(b),
            _ => None,
        }
    }

    /// Infers a value from a CSV cell.
    ///
    /// Empty cells are null; then bool, int64 and float64 are tried before
    /// falling back to a string.
    pub fn infer(raw: &str) -> Value {
        if raw.is_empty() {
            return Value::Null;
        }
        match raw {
            "true" | "True" => return Value::Bool(true),
            "false" | "False" => return Value::Bool(false),
            _ => {}
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Value::Int64(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return Value::Float64(f);
        }
        Value::Str(raw.to_string())
    }

    /// Converts a JSON scalar into a value of the requested kind.
    ///
    /// Returns `None` when the JSON value cannot represent that kind.
    /// JSON `null` always maps to [`Value::Null`].
    pub fn from_json(kind: DataKind, json: &serde_json::Value) -> Option<Value> {
        use serde_json::Value as Json;

        if json.is_null() {
            return Some(Value::Null);
        }
        match (kind, json) {
            (DataKind::Str, Json::String(s)) => Some(Value::Str(s.clone())),
            (DataKind::Bool, Json::Bool(b)) => Some(Value::Bool(*b)),
            (DataKind::Int8, Json::Number(n)) => {
                n.as_i64().and_then(|i| i8::try_from(i).ok()).map(Value::Int8)
            }
            (DataKind::Int16, Json::Number(n)) => {
                n.as_i64().and_then(|i| i16::try_from(i).ok()).map(Value::Int16)
            }
            (DataKind::Int32, Json::Number(n)) => {
                n.as_i64().and_then(|i| i32::try_from(i).ok()).map(Value::Int32)
            }
            (DataKind::Int64, Json::Number(n)) => n.as_i64().map(Value::Int64),
            (DataKind::Float32, Json::Number(n)) => n.as_f64().map(|f| Value::Float32(f as f32)),
            (DataKind::Float64, Json::Number(n)) => n.as_f64().map(Value::Float64),
            (DataKind::Double, Json::Number(n)) => n.as_f64().map(Value::Double),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Str(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int8(i) => write!(f, "{}", i),
            Value::Int16(i) => write!(f, "{}", i),
            Value::Int32(i) => write!(f, "{}", i),
            Value::Int64(i) => write!(f, "{}", i),
            // Debug keeps the trailing ".0" so floats reload as floats.
            Value::Float32(x) => write!(f, "{:?}", x),
            Value::Float64(x) | Value::Double(x) => write!(f, "{:?}", x),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i8> for Value {
    fn from(i: i8) -> Self {
        Value::Int8(i)
    }
}

impl From<i16> for Value {
    fn from(i: i16) -> Self {
        Value::Int16(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int32(i)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int64(i)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float32(x)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float64(x)
    }
}
