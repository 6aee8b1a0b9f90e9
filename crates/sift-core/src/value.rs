use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Int64,
    Float64,
    Boolean,
    String,
    Null,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Int64 => "int64",
            DataType::Float64 => "float64",
            DataType::Boolean => "boolean",
            DataType::String => "string",
            DataType::Null => "null",
        };
        write!(f, "{}", name)
    }
}

/// A single cell value. `Null` represents an empty field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Int64(i64),
    Float64(f64),
    Boolean(bool),
    String(String),
    Null,
}

impl Value {
    /// Infer a typed value from a raw field.
    ///
    /// Inference order: i64, then f64, then boolean (`true`/`false`,
    /// ASCII case-insensitive), otherwise string. The empty field is Null.
    pub fn infer(raw: &str) -> Value {
        if raw.is_empty() {
            return Value::Null;
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Value::Int64(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return Value::Float64(f);
        }
        if raw.eq_ignore_ascii_case("true") {
            return Value::Boolean(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return Value::Boolean(false);
        }
        Value::String(raw.to_string())
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Value::Int64(_) => DataType::Int64,
            Value::Float64(_) => DataType::Float64,
            Value::Boolean(_) => DataType::Boolean,
            Value::String(_) => DataType::String,
            Value::Null => DataType::Null,
        }
    }
}

impl fmt::Display for Value {
    /// Renders the value as a CSV field: Null as the empty field,
    /// booleans as `true`/`false`, numbers in their shortest form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int64(i) => write!(f, "{}", i),
            Value::Float64(x) => write!(f, "{}", x),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{}", s),
            Value::Null => Ok(()),
        }
    }
}
