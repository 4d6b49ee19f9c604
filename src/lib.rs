//! Extraction of values from JSON documents using compact path expressions.
//!
//! Paths are dot separated field names, with optional bracketed numeric indices and a `*`
//! wildcard marker which fans out across the elements of an array:
//!
//! ```
//! use chisel_pluck::{Document, QueryOptions};
//!
//! let doc: Document = r#"{"cities": [{"name": "Leeds"}, {"name": "York"}]}"#.parse().unwrap();
//! let names = doc.value("cities.*.name", &QueryOptions::default()).unwrap();
//! assert_eq!(names, vec!["Leeds", "York"]);
//! ```
use std::fmt::{Display, Formatter};

pub mod coords;
pub mod decoders;
pub mod errors;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod paths;
pub mod query;
pub mod render;
#[cfg(test)]
mod test_macros;

pub use errors::{Error, EvalError, ParserError, Result};
pub use paths::{Path, PathToken};
pub use query::{evaluate_many, Document, QueryOptions};

/// Basic enumeration of different Json values
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    /// Map of values, held in document order
    Object(Vec<(String, JsonValue)>),
    /// Array of values
    Array(Vec<JsonValue>),
    /// Canonical string value
    String(String),
    /// Floating point numeric value
    Float(f64),
    /// Integer numeric value
    Integer(i64),
    /// Canonical boolean value
    Boolean(bool),
    /// Canonical null value
    Null,
}

/// The broad kind of a [JsonValue]. Integers and floats are both numbers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

impl JsonValue {
    /// The [ValueKind] of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            JsonValue::Object(_) => ValueKind::Object,
            JsonValue::Array(_) => ValueKind::Array,
            JsonValue::String(_) => ValueKind::String,
            JsonValue::Float(_) | JsonValue::Integer(_) => ValueKind::Number,
            JsonValue::Boolean(_) => ValueKind::Boolean,
            JsonValue::Null => ValueKind::Null,
        }
    }

    /// Look up a member of an object by key. Returns [None] for absent keys and for anything
    /// which isn't an object.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }
}
