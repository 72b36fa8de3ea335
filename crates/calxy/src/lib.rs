//! # calxy
//!
//! The computational core of a spreadsheet.
//!
//! calxy parses cell formulas, evaluates them against other cells, tracks
//! which cells reference which, rejects circular references and recomputes
//! exactly the cells affected by a change.
//!
//! ## Features
//!
//! - Formula language with arithmetic, comparisons, cell references, ranges
//!   and named ranges
//! - SUM, AVERAGE, COUNT, MAX, MIN, IF, AND, OR, NOT, CONCATENATE, LEFT,
//!   RIGHT, LEN, VLOOKUP and HLOOKUP
//! - Errors are values (`#VALUE!`, `#DIV/0!`, `#REF!`, ...), never panics
//! - Breadth-first incremental recalculation that stops where values settle
//!
//! ## Example
//!
//! ```rust
//! use calxy::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! sheet.set_cell("A1", "10").unwrap();
//! sheet.set_cell("A2", "20").unwrap();
//! sheet.set_cell("A3", "=SUM(A1:A2)").unwrap();
//!
//! let a3 = CellAddress::parse("A3").unwrap();
//! assert_eq!(sheet.value(a3), CellValue::Number(30.0));
//!
//! // A formula referring to itself is rejected
//! sheet.set_cell("A4", "=A4+1").unwrap();
//! assert_eq!(sheet.value(CellAddress::parse("A4").unwrap()), CellValue::Error(CellError::Ref));
//! ```

pub mod prelude;
pub mod sheet;

pub use sheet::{CalculationStats, Cell, Sheet, UpdateOutcome};

// Re-export core types
pub use calxy_core::{
    CellAddress, CellError, CellRange, CellValue, Error, NamedRangeCollection, Result,
};

// Re-export formula types
pub use calxy_formula::{
    evaluate, extract_precedents, parse_formula, BinaryOperator, DependencyGraph,
    EvaluationContext, FormulaError, FormulaExpr, FormulaResult, FunctionRegistry, ParseError,
    SheetAccess,
};
