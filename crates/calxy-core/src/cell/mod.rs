//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellAddress`] - A cell's position (e.g., "A1")
//! - [`CellRange`] - A rectangle of cells (e.g., "A1:B10")
//! - [`CellValue`] - The computed value of a cell
//! - [`CellError`] - Error codes carried by error values

mod address;
mod value;

pub use address::{CellAddress, CellRange, CellRangeIterator};
pub use value::{CellError, CellValue};
