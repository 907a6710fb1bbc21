//! Error types for multirange construction, I/O and comparison.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::TypeTag;

/// Result type alias for multirange operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Every way a multirange operation can fail.
///
/// All errors are final: an operation either returns a fully valid value or
/// one of these, never a partially built multirange.
#[derive(Debug, Error)]
pub enum Error {
    /// The text literal does not follow the `{iv,iv,...}` grammar.
    #[error("malformed multirange literal: \"{input}\": {reason}")]
    MalformedLiteral { input: String, reason: MalformedReason },

    /// The interval type's own parser or decoder rejected an element.
    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    /// A binary message ended before the declared data was read.
    #[error("insufficient data left in message")]
    InsufficientData,

    /// A binary message carried bytes after the last declared interval.
    #[error("incorrect binary data format: {0} trailing bytes")]
    TrailingData(usize),

    /// A packed multirange buffer failed its structural checks.
    #[error("corrupt multirange value: {0}")]
    CorruptValue(String),

    /// A null element was passed where every interval must be present.
    #[error("multirange values cannot contain null members")]
    NullElement,

    /// Two multiranges of different types were compared or combined.
    #[error("type mismatch: multirange of type {left} used with multirange of type {right}")]
    TypeMismatch { left: TypeTag, right: TypeTag },

    /// A multi-dimensional array was given where a flat list is required.
    #[error("wrong number of array dimensions: expected 1, got {ndim}")]
    MultiDimensional { ndim: usize },

    /// The catalog does not know the tag as a multirange-of-ranges type.
    #[error("type {0} is not a multirange type")]
    NotAMultirange(TypeTag),

    /// The recursion guard tripped.
    #[error("stack depth limit exceeded (limit {limit})")]
    StackDepthExceeded { limit: u32 },

    /// The interval type has no binary send or receive function.
    #[error("no binary {direction} function available for type {type_name}")]
    NoBinaryFunction { type_name: String, direction: Direction },

    /// Writing an encoded value to the caller's sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Returns `true` for caller contract violations, as opposed to bad input.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Error::NullElement
                | Error::TypeMismatch { .. }
                | Error::MultiDimensional { .. }
                | Error::NotAMultirange(_)
        )
    }

    pub(crate) fn malformed(input: &str, reason: MalformedReason) -> Error {
        Error::MalformedLiteral { input: input.to_owned(), reason }
    }
}

/// The specific expectation a malformed text literal failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    MissingLeftBrace,
    UnexpectedEnd,
    ExpectedRangeStart,
    ExpectedCommaOrEnd,
    JunkAfterRightBrace,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MalformedReason::MissingLeftBrace => "Missing left bracket.",
            MalformedReason::UnexpectedEnd => "Unexpected end of input.",
            MalformedReason::ExpectedRangeStart => "Expected range start.",
            MalformedReason::ExpectedCommaOrEnd => "Expected comma or end of multirange.",
            MalformedReason::JunkAfterRightBrace => "Junk after right bracket.",
        })
    }
}

/// Which half of the binary codec was requested.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => f.write_str("input"),
            Direction::Output => f.write_str("output"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn malformed_message_names_input_and_reason() {
        let err = Error::malformed("{[1,2)", MalformedReason::UnexpectedEnd);
        assert_eq!(
            err.to_string(),
            "malformed multirange literal: \"{[1,2)\": Unexpected end of input."
        );
        assert!(!err.is_usage_error());
    }

    #[test]
    fn usage_errors_are_distinct() {
        assert!(Error::NullElement.is_usage_error());
        assert!(Error::MultiDimensional { ndim: 2 }.is_usage_error());
        assert!(!Error::InsufficientData.is_usage_error());
        let err = Error::NoBinaryFunction { type_name: "textrange".into(), direction: Direction::Input };
        assert_eq!(err.to_string(), "no binary input function available for type textrange");
    }
}
