//! Cell value types

use std::fmt;

/// The computed value of a cell
///
/// Equality is structural: two numbers are equal when their `f64`s compare
/// equal, two errors are equal when their codes match.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Numeric value
    Number(f64),

    /// Text value
    Text(String),

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Error value (#VALUE!, #REF!, etc.)
    Error(CellError),

    /// No value
    #[default]
    Empty,
}

impl CellValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Check if the value is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the value is an error
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    /// Get the error if this is one
    pub fn error(&self) -> Option<CellError> {
        match self {
            CellValue::Error(e) => Some(*e),
            _ => None,
        }
    }

    /// Get the number if this is one (no coercion)
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean coercion used by logical functions
    ///
    /// Booleans pass through, numbers are true when nonzero. Every other kind
    /// is not coercible.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            CellValue::Number(n) => Some(*n != 0.0),
            _ => None,
        }
    }

    /// Textual rendering used by text functions
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(true) => "TRUE".to_string(),
            CellValue::Boolean(false) => "FALSE".to_string(),
            CellValue::Error(e) => e.as_str().to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Error(e) => write!(f, "{}", e),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<CellError> for CellValue {
    fn from(e: CellError) -> Self {
        CellValue::Error(e)
    }
}

/// Spreadsheet error values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellError {
    /// #DIV/0! - Division by exactly zero, or an average of nothing
    Div0,
    /// #VALUE! - Wrong type of argument or operand
    Value,
    /// #REF! - Circular reference, or lookup index outside the table
    Ref,
    /// #NAME? - Unknown function or unresolved named range
    Name,
    /// #N/A - Wrong arity or lookup value not found
    Na,
    /// #ERROR! - Formula text failed to parse
    Parse,
}

impl CellError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Div0 => "#DIV/0!",
            CellError::Value => "#VALUE!",
            CellError::Ref => "#REF!",
            CellError::Name => "#NAME?",
            CellError::Na => "#N/A",
            CellError::Parse => "#ERROR!",
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        assert_eq!(CellValue::Number(2.5), CellValue::Number(2.5));
        assert_ne!(CellValue::Number(1.0), CellValue::Text("1".into()));
        assert_eq!(
            CellValue::Error(CellError::Ref),
            CellValue::Error(CellError::Ref)
        );
        assert_ne!(
            CellValue::Error(CellError::Ref),
            CellValue::Error(CellError::Na)
        );
        assert_eq!(CellValue::default(), CellValue::Empty);
    }

    #[test]
    fn test_as_bool() {
        assert_eq!(CellValue::Boolean(true).as_bool(), Some(true));
        assert_eq!(CellValue::Number(0.0).as_bool(), Some(false));
        assert_eq!(CellValue::Number(-3.0).as_bool(), Some(true));
        assert_eq!(CellValue::text("TRUE").as_bool(), None);
        assert_eq!(CellValue::Empty.as_bool(), None);
        assert_eq!(CellValue::Error(CellError::Na).as_bool(), None);
    }

    #[test]
    fn test_as_text() {
        assert_eq!(CellValue::Number(10.0).as_text(), "10");
        assert_eq!(CellValue::Number(0.5).as_text(), "0.5");
        assert_eq!(CellValue::Number(-1.25).as_text(), "-1.25");
        assert_eq!(CellValue::Boolean(false).as_text(), "FALSE");
        assert_eq!(CellValue::Error(CellError::Div0).as_text(), "#DIV/0!");
        assert_eq!(CellValue::Empty.as_text(), "");
    }

    #[test]
    fn test_error_codes() {
        let codes: Vec<_> = [
            CellError::Div0,
            CellError::Value,
            CellError::Ref,
            CellError::Name,
            CellError::Na,
            CellError::Parse,
        ]
        .iter()
        .map(|err| err.to_string())
        .collect();
        assert_eq!(
            codes,
            vec!["#DIV/0!", "#VALUE!", "#REF!", "#NAME?", "#N/A", "#ERROR!"]
        );
    }
}
