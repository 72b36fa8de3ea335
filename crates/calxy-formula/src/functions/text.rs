//! Text functions
//!
//! Arguments are rendered with [`CellValue::as_text`]. Lengths and counts
//! are in characters, not bytes.

use calxy_core::{CellError, CellValue};

/// CONCATENATE(text1, ...)
pub fn fn_concatenate(args: &[CellValue]) -> CellValue {
    CellValue::Text(args.iter().map(CellValue::as_text).collect())
}

/// LEFT(text, [num_chars])
pub fn fn_left(args: &[CellValue]) -> CellValue {
    let num_chars = match char_count(args) {
        Ok(n) => n,
        Err(e) => return CellValue::Error(e),
    };

    CellValue::Text(args[0].as_text().chars().take(num_chars).collect())
}

/// RIGHT(text, [num_chars])
pub fn fn_right(args: &[CellValue]) -> CellValue {
    let num_chars = match char_count(args) {
        Ok(n) => n,
        Err(e) => return CellValue::Error(e),
    };

    let text = args[0].as_text();
    let skip = text.chars().count().saturating_sub(num_chars);
    CellValue::Text(text.chars().skip(skip).collect())
}

/// LEN(text)
pub fn fn_len(args: &[CellValue]) -> CellValue {
    CellValue::Number(args[0].as_text().chars().count() as f64)
}

/// The optional second argument of LEFT/RIGHT, truncated, defaulting to 1
fn char_count(args: &[CellValue]) -> Result<usize, CellError> {
    match args.get(1) {
        None => Ok(1),
        Some(CellValue::Number(n)) => {
            let n = n.trunc();
            if n < 0.0 {
                Err(CellError::Value)
            } else {
                // Saturating cast; any count past the text length is clamped anyway
                Ok(n as usize)
            }
        }
        Some(_) => Err(CellError::Value),
    }
}
