//! # calxy-formula
//!
//! Formula parser and evaluator for calxy.
//!
//! This crate provides:
//! - Formula parsing (text → AST)
//! - Formula evaluation (AST → value)
//! - Built-in functions and special forms (IF, AND, OR, VLOOKUP, HLOOKUP, ...)
//! - Dependency tracking for incremental recalculation
//!
//! ## Example
//!
//! ```rust
//! use calxy_formula::{evaluate, parse_formula, EvaluationContext};
//! use calxy_core::CellValue;
//!
//! let ast = parse_formula("=2+3*4").unwrap().unwrap();
//! let ctx = EvaluationContext::simple();
//! assert_eq!(evaluate(&ast, &ctx), CellValue::Number(14.0));
//!
//! // Text that does not start with '=' is not a formula
//! assert!(parse_formula("hello").unwrap().is_none());
//! ```

pub mod ast;
pub mod dependency;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;

pub use ast::{BinaryOperator, FormulaExpr};
pub use dependency::{extract_precedents, DependencyGraph};
pub use error::{FormulaError, FormulaResult, ParseError};
pub use evaluator::{
    evaluate, evaluate_argument, function_registry, EvaluationContext, SheetAccess,
};
pub use functions::{FunctionDef, FunctionKind, FunctionRegistry};
pub use parser::parse_formula;
