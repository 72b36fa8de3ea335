//! Lookup functions
//!
//! VLOOKUP and HLOOKUP are special forms: the table argument must be written
//! as a literal range, which is inspected rather than evaluated.

use crate::ast::FormulaExpr;
use crate::evaluator::{evaluate, EvaluationContext};
use calxy_core::{CellAddress, CellError, CellRange, CellValue};

/// VLOOKUP(lookup_value, table, col_index, [approximate])
pub fn fn_vlookup(args: &[FormulaExpr], ctx: &EvaluationContext) -> CellValue {
    lookup(args, ctx, Orientation::Vertical)
}

/// HLOOKUP(lookup_value, table, row_index, [approximate])
pub fn fn_hlookup(args: &[FormulaExpr], ctx: &EvaluationContext) -> CellValue {
    lookup(args, ctx, Orientation::Horizontal)
}

/// Which edge of the table holds the keys
#[derive(Debug, Clone, Copy)]
enum Orientation {
    /// Keys in the first column, one entry per row
    Vertical,
    /// Keys in the first row, one entry per column
    Horizontal,
}

/// A normalized table, walked along its key edge
struct Table {
    top_left: CellAddress,
    bottom_right: CellAddress,
    span: u64,
    orientation: Orientation,
}

impl Table {
    fn new(range: &CellRange, orientation: Orientation) -> Self {
        let (top_left, bottom_right) = range.bounds();
        let span = match orientation {
            Orientation::Vertical => range.width(),
            Orientation::Horizontal => range.height(),
        };
        Self {
            top_left,
            bottom_right,
            span,
            orientation,
        }
    }

    /// Number of cells across an entry (columns for VLOOKUP, rows for HLOOKUP)
    fn span(&self) -> u64 {
        self.span
    }

    /// Positions along the key edge, in scan order
    fn entries(&self) -> impl Iterator<Item = u32> {
        match self.orientation {
            Orientation::Vertical => self.top_left.row..=self.bottom_right.row,
            Orientation::Horizontal => self.top_left.col..=self.bottom_right.col,
        }
    }

    /// Address of the key cell of `entry`
    fn key(&self, entry: u32) -> CellAddress {
        self.cell(entry, 0)
    }

    /// Address at zero-based `offset` across `entry`; `offset` is below `span()`
    fn cell(&self, entry: u32, offset: u32) -> CellAddress {
        match self.orientation {
            Orientation::Vertical => CellAddress::new(entry, self.top_left.col + offset),
            Orientation::Horizontal => CellAddress::new(self.top_left.row + offset, entry),
        }
    }
}

fn lookup(args: &[FormulaExpr], ctx: &EvaluationContext, orientation: Orientation) -> CellValue {
    if !(3..=4).contains(&args.len()) {
        return CellValue::Error(CellError::Na);
    }

    let lookup_value = evaluate(&args[0], ctx);
    if lookup_value.is_error() {
        return lookup_value;
    }

    let FormulaExpr::Range(range) = &args[1] else {
        return CellValue::Error(CellError::Ref);
    };

    let index = match evaluate(&args[2], ctx) {
        CellValue::Number(n) if n >= 1.0 => n.trunc() as u64,
        _ => return CellValue::Error(CellError::Value),
    };

    let approximate = match args.get(3).map(|expr| evaluate(expr, ctx)) {
        None => true,
        Some(CellValue::Error(e)) => return CellValue::Error(e),
        Some(value) => match value.as_bool() {
            Some(b) => b,
            None => return CellValue::Error(CellError::Value),
        },
    };

    let table = Table::new(range, orientation);
    if index > table.span() {
        return CellValue::Error(CellError::Ref);
    }
    // Fits in u32: index is at most the span of a u32 range
    let offset = (index - 1) as u32;

    let found = if approximate {
        approximate_match(&table, &lookup_value, ctx)
    } else {
        table
            .entries()
            .find(|&entry| ctx.cell_ref(table.key(entry)) == lookup_value)
    };

    match found {
        Some(entry) => ctx.cell_ref(table.cell(entry, offset)),
        None => CellValue::Error(CellError::Na),
    }
}

/// Last entry whose numeric key is <= the lookup value
///
/// Keys are assumed ascending: scanning stops at the first larger key.
/// Non-numeric keys are skipped.
fn approximate_match(
    table: &Table,
    lookup_value: &CellValue,
    ctx: &EvaluationContext,
) -> Option<u32> {
    let target = lookup_value.as_number()?;

    let mut best = None;
    for entry in table.entries() {
        if let CellValue::Number(key) = ctx.cell_ref(table.key(entry)) {
            if key > target {
                break;
            }
            best = Some(entry);
        }
    }
    best
}
