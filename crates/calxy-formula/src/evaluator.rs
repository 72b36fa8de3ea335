//! Formula evaluator
//!
//! Evaluates formula ASTs to produce values. Evaluation never fails: every
//! problem is reported as a [`CellValue::Error`].
//!
//! The evaluator performs no cycle detection. Callers must only hand it
//! expressions whose references are acyclic, which the sheet guarantees at
//! write time.

use crate::ast::{BinaryOperator, FormulaExpr};
use crate::functions::{FunctionKind, FunctionRegistry};
use calxy_core::{CellAddress, CellError, CellRange, CellValue};
use std::sync::OnceLock;

/// Global function registry (lazily initialized)
static FUNCTION_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

/// The process-wide function registry
pub fn function_registry() -> &'static FunctionRegistry {
    FUNCTION_REGISTRY.get_or_init(FunctionRegistry::new)
}

/// Read access to the cells a formula may refer to
pub trait SheetAccess {
    /// The stored value at `addr`, or `None` if no cell was ever set there
    fn cell_value(&self, addr: CellAddress) -> Option<&CellValue>;

    /// Resolve a named range, ignoring case
    fn named_range(&self, name: &str) -> Option<CellRange>;
}

/// A sheet with no cells and no names
struct EmptySheet;

impl SheetAccess for EmptySheet {
    fn cell_value(&self, _addr: CellAddress) -> Option<&CellValue> {
        None
    }

    fn named_range(&self, _name: &str) -> Option<CellRange> {
        None
    }
}

/// Evaluation context
pub struct EvaluationContext<'a> {
    sheet: &'a dyn SheetAccess,
}

impl<'a> EvaluationContext<'a> {
    /// Create a context that reads from `sheet`
    pub fn new(sheet: &'a dyn SheetAccess) -> Self {
        Self { sheet }
    }

    /// Create a context over an empty sheet (for testing)
    pub fn simple() -> EvaluationContext<'static> {
        EvaluationContext { sheet: &EmptySheet }
    }

    /// Value of a cell reference inside an expression
    ///
    /// A cell that was never set reads as `Number(0)`.
    pub fn cell_ref(&self, addr: CellAddress) -> CellValue {
        self.sheet
            .cell_value(addr)
            .cloned()
            .unwrap_or(CellValue::Number(0.0))
    }

    /// Resolve a named range
    pub fn named_range(&self, name: &str) -> Option<CellRange> {
        self.sheet.named_range(name)
    }
}

/// Evaluate a formula expression
pub fn evaluate(expr: &FormulaExpr, ctx: &EvaluationContext) -> CellValue {
    match expr {
        FormulaExpr::Number(n) => CellValue::Number(*n),
        FormulaExpr::String(s) => CellValue::Text(s.clone()),
        FormulaExpr::Boolean(b) => CellValue::Boolean(*b),

        FormulaExpr::CellRef(addr) => ctx.cell_ref(*addr),

        // Ranges and names only mean something as function arguments
        FormulaExpr::Range(_) => CellValue::Error(CellError::Value),
        FormulaExpr::NameRef(_) => CellValue::Error(CellError::Name),

        FormulaExpr::Function { name, args } => evaluate_function(name, args, ctx),

        FormulaExpr::BinaryOp { left, op, right } => evaluate_binary_op(left, *op, right, ctx),
    }
}

/// Evaluate a function argument, expanding ranges
///
/// A range yields one value per covered cell, rows outer and columns inner.
/// A named range is resolved and expanded the same way; an unknown name
/// yields a single `#NAME?`. Anything else yields exactly one value.
pub fn evaluate_argument(expr: &FormulaExpr, ctx: &EvaluationContext) -> Vec<CellValue> {
    match expr {
        FormulaExpr::Range(range) => expand_range(range, ctx),
        FormulaExpr::NameRef(name) => match ctx.named_range(name) {
            Some(range) => expand_range(&range, ctx),
            None => vec![CellValue::Error(CellError::Name)],
        },
        _ => vec![evaluate(expr, ctx)],
    }
}

fn expand_range(range: &CellRange, ctx: &EvaluationContext) -> Vec<CellValue> {
    range.iter().map(|addr| ctx.cell_ref(addr)).collect()
}

fn evaluate_binary_op(
    left: &FormulaExpr,
    op: BinaryOperator,
    right: &FormulaExpr,
    ctx: &EvaluationContext,
) -> CellValue {
    let left = evaluate(left, ctx);
    let right = evaluate(right, ctx);

    match (&left, &right) {
        (CellValue::Number(l), CellValue::Number(r)) => numeric_op(*l, op, *r),
        (CellValue::Text(l), CellValue::Text(r)) => match op {
            BinaryOperator::Equal => CellValue::Boolean(l == r),
            BinaryOperator::NotEqual => CellValue::Boolean(l != r),
            _ => CellValue::Error(CellError::Value),
        },
        _ => CellValue::Error(CellError::Value),
    }
}

fn numeric_op(l: f64, op: BinaryOperator, r: f64) -> CellValue {
    match op {
        BinaryOperator::Add => CellValue::Number(l + r),
        BinaryOperator::Subtract => CellValue::Number(l - r),
        BinaryOperator::Multiply => CellValue::Number(l * r),
        BinaryOperator::Divide => {
            if r == 0.0 {
                CellValue::Error(CellError::Div0)
            } else {
                CellValue::Number(l / r)
            }
        }
        BinaryOperator::GreaterThan => CellValue::Boolean(l > r),
        BinaryOperator::LessThan => CellValue::Boolean(l < r),
        BinaryOperator::GreaterEqual => CellValue::Boolean(l >= r),
        BinaryOperator::LessEqual => CellValue::Boolean(l <= r),
        BinaryOperator::Equal => CellValue::Boolean(l == r),
        BinaryOperator::NotEqual => CellValue::Boolean(l != r),
    }
}

fn evaluate_function(name: &str, args: &[FormulaExpr], ctx: &EvaluationContext) -> CellValue {
    let Some(func) = function_registry().get(name) else {
        return CellValue::Error(CellError::Name);
    };

    match func.kind {
        FunctionKind::SpecialForm(implementation) => implementation(args, ctx),
        FunctionKind::Builtin(implementation) => {
            let values: Vec<CellValue> = args
                .iter()
                .flat_map(|arg| evaluate_argument(arg, ctx))
                .collect();

            let first_error = values.iter().find_map(CellValue::error);
            if !func.arity_first {
                if let Some(err) = first_error {
                    return CellValue::Error(err);
                }
            }
            if !func.accepts(values.len()) {
                return CellValue::Error(CellError::Na);
            }
            if let Some(err) = first_error {
                return CellValue::Error(err);
            }

            implementation(&values)
        }
    }
}
