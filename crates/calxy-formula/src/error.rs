//! Formula error types
//!
//! Only parsing can fail with a Rust error. Evaluation problems are reported
//! as [`calxy_core::CellValue::Error`] values instead.

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors raised by the formula layer
#[derive(Debug, Error)]
pub enum FormulaError {
    /// Formula text could not be parsed
    #[error("Invalid formula '{formula}': {source}")]
    Parse {
        /// The complete raw text that was handed to the parser
        formula: String,
        /// What went wrong
        #[source]
        source: ParseError,
    },
}

impl FormulaError {
    /// The root cause of a parse failure
    pub fn parse_error(&self) -> &ParseError {
        match self {
            FormulaError::Parse { source, .. } => source,
        }
    }
}

/// Root cause of a formula parse failure
///
/// Positions are byte offsets into the formula text after the leading `=`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A string literal was opened but never closed
    #[error("Unterminated string literal")]
    UnterminatedString,

    /// A parenthesized expression or argument list was not closed
    #[error("Mismatched parentheses: expected ')' at position {pos}")]
    MissingCloseParen { pos: usize },

    /// A run of digits and dots that is not a number
    #[error("Invalid number literal '{0}'")]
    InvalidNumber(String),

    /// A character that cannot start or continue an expression here
    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    /// Input ended where an operand was expected
    #[error("Unexpected end of formula")]
    UnexpectedEnd,

    /// A `:` range whose endpoints are not both cell references
    #[error("Invalid range expression: both ends must be cell references")]
    InvalidRange,

    /// A complete expression followed by more input
    #[error("Unexpected character at end of formula: '{ch}' at position {pos}")]
    TrailingInput { ch: char, pos: usize },

    /// A cell reference whose row or column is out of range
    #[error("Invalid cell reference '{0}'")]
    InvalidCellReference(String),
}
