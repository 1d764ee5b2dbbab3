//! Error types for VDF deserialization.
//!
//! Every error is fatal to the decode call that raised it; nothing is retried
//! and no partial result is returned.
//!
//! ## Error Categories
//!
//! - **Syntax Errors**: an unexpected byte for the current grammar state
//! - **Empty Keys**: `""` in key position
//! - **Type Mismatches**: a token that cannot be converted to the destination type
//! - **Unsupported Types**: destinations the format has no way to fill (sequences, bytes)
//! - **Unexpected EOF**: input ended inside an unfinished object
//! - **I/O Errors**: failures of the underlying byte source
//!
//! ## Examples
//!
//! ```rust
//! use serde_vdf::{from_str, Error};
//! use std::collections::HashMap;
//!
//! let result: Result<HashMap<String, String>, Error> = from_str("{ \"key\" value }");
//! assert!(matches!(result, Err(Error::Syntax { .. })));
//! ```

use std::fmt;
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Represents all possible errors that can occur during VDF deserialization.
///
/// Positional variants carry the 1-based line and column of the byte the
/// decoder was looking at.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Failure reported by the byte source
    #[error("IO error: {0}")]
    Io(#[source] Arc<io::Error>),

    /// Unexpected byte for the current grammar state
    #[error("Syntax error at line {line}, column {col}: {msg}\naround: {context}")]
    Syntax {
        line: usize,
        col: usize,
        msg: String,
        context: String,
    },

    /// A key token with no content
    #[error("Empty key at line {line}, column {col}\naround: {context}")]
    EmptyKey {
        line: usize,
        col: usize,
        context: String,
    },

    /// Token text does not fit the destination type
    #[error("Type mismatch at line {line}, column {col}: expected {expected}, found {found}")]
    TypeMismatch {
        line: usize,
        col: usize,
        expected: String,
        found: String,
    },

    /// Destination kind the format cannot represent
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Input ended before the structure was complete
    #[error("Unexpected end of input at line {line}, column {col}: expected {expected}")]
    UnexpectedEof {
        line: usize,
        col: usize,
        expected: String,
    },

    /// Raised by `Deserialize` implementations (missing fields and the like)
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error carrying the bytes around the failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_vdf::Error;
    ///
    /// let err = Error::syntax(3, 7, "unexpected symbol 'x'", "\"key\" x");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str, context: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
            context: context.to_string(),
        }
    }

    /// Creates an empty-key error.
    pub fn empty_key(line: usize, col: usize, context: &str) -> Self {
        Error::EmptyKey {
            line,
            col,
            context: context.to_string(),
        }
    }

    /// Creates a type mismatch error when a token cannot be bound to the destination.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_vdf::Error;
    ///
    /// let err = Error::type_mismatch(1, 12, "i32", "\"abc\"");
    /// assert!(err.to_string().contains("expected i32"));
    /// ```
    pub fn type_mismatch(line: usize, col: usize, expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            line,
            col,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_eof(line: usize, col: usize, expected: &str) -> Self {
        Error::UnexpectedEof {
            line,
            col,
            expected: expected.to_string(),
        }
    }

    /// Creates an unsupported type error for destinations VDF cannot fill.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_vdf::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Wraps an error from the byte source.
    pub fn io(err: io::Error) -> Self {
        Error::Io(Arc::new(err))
    }

    /// Returns the line and column the error points at, if it has one.
    #[must_use]
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Error::Syntax { line, col, .. }
            | Error::EmptyKey { line, col, .. }
            | Error::TypeMismatch { line, col, .. }
            | Error::UnexpectedEof { line, col, .. } => Some((*line, *col)),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::io(err)
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_io_error_keeps_source() {
        let err = Error::from(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        assert!(err.to_string().contains("pipe closed"));

        assert!(err.source().unwrap().to_string().contains("pipe closed"));
        match err {
            Error::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("Expected IO error, got {:?}", other),
        }
    }

    #[test]
    fn test_position() {
        assert_eq!(Error::syntax(2, 5, "bad", "").position(), Some((2, 5)));
        assert_eq!(Error::unexpected_eof(9, 1, "'}'").position(), Some((9, 1)));
        assert_eq!(Error::custom("missing field").position(), None);
    }

    #[test]
    fn test_serde_custom() {
        let err = <Error as serde::de::Error>::missing_field("Name");
        assert!(matches!(err, Error::Custom(ref msg) if msg.contains("Name")));
    }
}
