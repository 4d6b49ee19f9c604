//! General error types for the decoder and the path evaluator

use std::fmt::{Display, Formatter};

use crate::coords::Coords;
use crate::ValueKind;

/// Result type used throughout the decoding stages
pub type ParserResult<T> = std::result::Result<T, ParserError>;

/// Result type used by path evaluation
pub type EvalResult<T> = std::result::Result<T, EvalError>;

/// Crate-level result type
pub type Result<T> = std::result::Result<T, Error>;

/// An enumeration of the reasons decoding can fail
#[derive(Debug, Clone, PartialEq)]
pub enum Details {
    EndOfInput,
    InvalidFile,
    StreamFailure,
    InvalidByteSequence(u8),
    MaxDepthExceeded,
    UnexpectedToken(String),
    PairExpected,
    InvalidObject,
    InvalidArray,
    InvalidCharacter(char),
    InvalidNumericRepresentation(String),
    InvalidEscapeSequence(String),
    InvalidUnicodeEscapeSequence(String),
    TrailingContent,
}

impl Display for Details {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Details::EndOfInput => write!(f, "unexpected end of input"),
            Details::InvalidFile => write!(f, "unable to open input file"),
            Details::StreamFailure => write!(f, "failed to read from the input stream"),
            Details::InvalidByteSequence(b) => write!(f, "invalid byte 0x{:02x} in input", b),
            Details::MaxDepthExceeded => write!(f, "maximum nesting depth exceeded"),
            Details::UnexpectedToken(token) => write!(f, "unexpected token {}", token),
            Details::PairExpected => write!(f, "expected a ':' after an object key"),
            Details::InvalidObject => write!(f, "invalid object"),
            Details::InvalidArray => write!(f, "invalid array"),
            Details::InvalidCharacter(c) => write!(f, "invalid character {:?}", c),
            Details::InvalidNumericRepresentation(s) => write!(f, "invalid number '{}'", s),
            Details::InvalidEscapeSequence(s) => write!(f, "invalid escape sequence '{}'", s),
            Details::InvalidUnicodeEscapeSequence(s) => {
                write!(f, "invalid unicode escape sequence '{}'", s)
            }
            Details::TrailingContent => write!(f, "unexpected content after the root value"),
        }
    }
}

/// A decoding error, with optional coordinates into the input
#[derive(Debug, Clone, PartialEq)]
pub struct ParserError {
    /// What went wrong
    pub details: Details,
    /// Optional input coordinates
    pub coords: Option<Coords>,
}

impl Display for ParserError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.coords {
            Some(coords) => write!(f, "{} at {}", self.details, coords),
            None => write!(f, "{}", self.details),
        }
    }
}

impl std::error::Error for ParserError {}

/// Errors raised whilst resolving a path against a document. Parent paths are rendered as the
/// dot-joined tokens consumed so far.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("Cannot access \"{token}\" on nil")]
    NilAccess { token: String },

    #[error("Can't get \"{token}\" on \"{parent}\" because it is a {kind}")]
    TypeMismatch {
        token: String,
        parent: String,
        kind: ValueKind,
    },

    #[error("\"{token}\" is not a valid index for the array at \"{parent}\"")]
    InvalidIndex { token: String, parent: String },

    #[error("{index} is outside the bounds of the {count} elements in \"{parent}\"")]
    OutOfBounds {
        index: usize,
        count: usize,
        parent: String,
    },

    #[error("Cannot access \"{token}\" on the root array object")]
    RootArray { token: String },

    #[error("an empty path cannot be evaluated")]
    EmptyPath,
}

/// Top level error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] ParserError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Build a decoding error result with optional coordinates
#[macro_export]
macro_rules! decode_error {
    ($details: expr, $coords: expr) => {
        Err($crate::errors::ParserError {
            details: $details,
            coords: Some($coords),
        })
    };
    ($details: expr) => {
        Err($crate::errors::ParserError {
            details: $details,
            coords: None,
        })
    };
}

#[cfg(test)]
mod tests {
    use crate::coords::Coords;
    use crate::errors::{Details, EvalError, ParserError};
    use crate::ValueKind;

    #[test]
    fn should_render_type_mismatch_messages() {
        let err = EvalError::TypeMismatch {
            token: "woo".into(),
            parent: "bar.baz".into(),
            kind: ValueKind::Number,
        };
        assert_eq!(
            err.to_string(),
            r#"Can't get "woo" on "bar.baz" because it is a number"#
        );
    }

    #[test]
    fn should_render_out_of_bounds_messages() {
        let err = EvalError::OutOfBounds {
            index: 10,
            count: 1,
            parent: "deep.1.peanuts".into(),
        };
        assert_eq!(
            err.to_string(),
            r#"10 is outside the bounds of the 1 elements in "deep.1.peanuts""#
        );
    }

    #[test]
    fn should_include_coords_in_decode_messages() {
        let err = ParserError {
            details: Details::InvalidCharacter('x'),
            coords: Some(Coords {
                absolute: 3,
                line: 0,
                column: 3,
            }),
        };
        assert_eq!(err.to_string(), "invalid character 'x' at line 1, column 3");
    }
}
