//! Logical functions
//!
//! IF, AND and OR are special forms so they can skip arguments they do not
//! need. NOT is an ordinary builtin.

use crate::ast::FormulaExpr;
use crate::evaluator::{evaluate, EvaluationContext};
use calxy_core::{CellError, CellValue};

/// IF(condition, then, [else])
///
/// Only the chosen branch is evaluated. A missing else branch yields FALSE.
pub fn fn_if(args: &[FormulaExpr], ctx: &EvaluationContext) -> CellValue {
    if !(2..=3).contains(&args.len()) {
        return CellValue::Error(CellError::Na);
    }

    match evaluate(&args[0], ctx).as_bool() {
        Some(true) => evaluate(&args[1], ctx),
        Some(false) => match args.get(2) {
            Some(else_expr) => evaluate(else_expr, ctx),
            None => CellValue::Boolean(false),
        },
        None => CellValue::Error(CellError::Value),
    }
}

/// AND(logical1, ...)
pub fn fn_and(args: &[FormulaExpr], ctx: &EvaluationContext) -> CellValue {
    short_circuit(args, ctx, false)
}

/// OR(logical1, ...)
pub fn fn_or(args: &[FormulaExpr], ctx: &EvaluationContext) -> CellValue {
    short_circuit(args, ctx, true)
}

/// Evaluate left to right, stopping at the first argument equal to `stop_on`
fn short_circuit(args: &[FormulaExpr], ctx: &EvaluationContext, stop_on: bool) -> CellValue {
    if args.is_empty() {
        return CellValue::Error(CellError::Value);
    }

    for arg in args {
        match evaluate(arg, ctx).as_bool() {
            Some(b) if b == stop_on => return CellValue::Boolean(stop_on),
            Some(_) => {}
            None => return CellValue::Error(CellError::Value),
        }
    }

    CellValue::Boolean(!stop_on)
}

/// NOT(logical)
pub fn fn_not(args: &[CellValue]) -> CellValue {
    match args.first().and_then(CellValue::as_bool) {
        Some(b) => CellValue::Boolean(!b),
        None => CellValue::Error(CellError::Value),
    }
}
