//! Formula Abstract Syntax Tree types

use calxy_core::{CellAddress, CellRange};
use std::fmt;

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    // === Literals ===
    /// Numeric literal
    Number(f64),
    /// String literal
    String(String),
    /// Boolean literal
    Boolean(bool),

    // === References ===
    /// Single cell reference
    CellRef(CellAddress),
    /// Range reference (only produced inside function arguments)
    Range(CellRange),
    /// Named range, uppercased, resolved at evaluation time
    NameRef(String),

    // === Function call ===
    Function { name: String, args: Vec<FormulaExpr> },

    // === Operators ===
    /// Binary operation
    BinaryOp {
        left: Box<FormulaExpr>,
        op: BinaryOperator,
        right: Box<FormulaExpr>,
    },
}

impl FormulaExpr {
    /// Build a binary operation node
    pub fn binary(left: FormulaExpr, op: BinaryOperator, right: FormulaExpr) -> Self {
        FormulaExpr::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Build a cell reference node from a (col, row) pair
    pub fn cell(col: u32, row: u32) -> Self {
        FormulaExpr::CellRef(CellAddress::new(row, col))
    }

    /// Build a function call node
    pub fn function(name: impl Into<String>, args: Vec<FormulaExpr>) -> Self {
        FormulaExpr::Function {
            name: name.into(),
            args,
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,

    // Comparison
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    Equal,
    NotEqual,
}

impl BinaryOperator {
    /// The operator as written in a formula
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::LessThan => "<",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "<>",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
