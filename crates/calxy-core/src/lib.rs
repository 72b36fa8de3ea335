//! # calxy-core
//!
//! Core data structures for the calxy spreadsheet engine.
//!
//! This crate provides the fundamental types shared by the formula layer and
//! the sheet orchestrator:
//! - [`CellAddress`] and [`CellRange`] - Cell positions and rectangular ranges
//! - [`CellValue`] - The computed value of a cell (number, text, boolean, error, empty)
//! - [`CellError`] - Spreadsheet error codes (`#VALUE!`, `#REF!`, ...)
//! - [`NamedRangeCollection`] - Case-insensitive names for ranges
//!
//! ## Example
//!
//! ```rust
//! use calxy_core::{CellAddress, CellRange, CellValue};
//!
//! let addr = CellAddress::parse("BC23").unwrap();
//! assert_eq!(addr.col, 54);
//! assert_eq!(addr.row, 22);
//!
//! let range = CellRange::parse("B2:A1").unwrap();
//! assert_eq!(range.iter().count(), 4);
//!
//! assert_eq!(CellValue::Number(10.0).as_text(), "10");
//! ```

pub mod cell;
pub mod error;
pub mod named_range;

// Re-exports for convenience
pub use cell::{CellAddress, CellError, CellRange, CellRangeIterator, CellValue};
pub use error::{Error, Result};
pub use named_range::NamedRangeCollection;
