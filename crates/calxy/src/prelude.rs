//! Prelude module - common imports for calxy users
//!
//! ```rust
//! use calxy::prelude::*;
//! ```

pub use crate::{
    // Main types
    Sheet,
    Cell,
    CalculationStats,
    UpdateOutcome,

    // Cell types
    CellAddress,
    CellError,
    CellRange,
    CellValue,

    // Formula types
    FormulaExpr,
    SheetAccess,

    // Error types
    Error,
    Result,
};
