//! Rendering of [JsonValue]s as output text.
//!
//! Values are written as compact JSON, with object members in ascending key order. Terminal
//! strings lose their surrounding quotes on output, so that `"spoon"` prints as `spoon`. The
//! empty string keeps its quotes.
use std::fmt::{Display, Formatter, Write};

use crate::JsonValue;

/// Magnitudes outside of `[1e-6, 1e21)` are written in exponent notation
const EXPONENT_LOWER_BOUND: f64 = 1e-6;
const EXPONENT_UPPER_BOUND: f64 = 1e21;

/// Render a terminal value as a single line of output. Nulls render as the empty string unless
/// `print_nulls` is set.
pub fn render(value: &JsonValue, print_nulls: bool) -> String {
    if value.is_null() && !print_nulls {
        return String::new();
    }
    let text = value.to_string();
    match text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        Some(inner) if !inner.is_empty() => inner.to_string(),
        _ => text,
    }
}

impl Display for JsonValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonValue::Null => f.write_str("null"),
            JsonValue::Boolean(value) => write!(f, "{}", value),
            JsonValue::Integer(value) => write!(f, "{}", value),
            JsonValue::Float(value) => write_float(f, *value),
            JsonValue::String(value) => write_string(f, value),
            JsonValue::Array(values) => {
                f.write_char('[')?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_char(']')
            }
            JsonValue::Object(pairs) => {
                let mut sorted: Vec<&(String, JsonValue)> = pairs.iter().collect();
                sorted.sort_by(|a, b| a.0.cmp(&b.0));
                f.write_char('{')?;
                for (index, (key, value)) in sorted.into_iter().enumerate() {
                    if index > 0 {
                        f.write_char(',')?;
                    }
                    write_string(f, key)?;
                    write!(f, ":{}", value)?;
                }
                f.write_char('}')
            }
        }
    }
}

fn write_float(f: &mut Formatter<'_>, value: f64) -> std::fmt::Result {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(EXPONENT_LOWER_BOUND..EXPONENT_UPPER_BOUND).contains(&magnitude) {
        let text = format!("{:e}", value);
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                write!(f, "{}e+{}", mantissa, exponent)
            }
            _ => f.write_str(&text),
        }
    } else {
        write!(f, "{}", value)
    }
}

fn write_string(f: &mut Formatter<'_>, value: &str) -> std::fmt::Result {
    f.write_char('"')?;
    for c in value.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{0008}' => f.write_str("\\b")?,
            '\u{000C}' => f.write_str("\\f")?,
            c if (c as u32) < 0x20 => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}
