//! Built-in spreadsheet functions
//!
//! Functions come in two dispatch classes:
//!
//! - **Builtins** receive their arguments already evaluated, with ranges and
//!   named ranges flattened into one value per cell. The evaluator
//!   propagates the first error and then checks the definition's arity
//!   against the flattened count. Definitions marked `arity_first` (NOT)
//!   reverse that order.
//! - **Special forms** receive the unevaluated argument expressions and
//!   decide themselves what to evaluate and in which order. They check
//!   their own arity, since the error code differs between them.

pub mod logical;
pub mod lookup;
pub mod math;
pub mod text;

use crate::ast::FormulaExpr;
use crate::evaluator::EvaluationContext;
use calxy_core::CellValue;
use std::collections::HashMap;

/// Implementation of a builtin: flattened, error-free argument values
pub type BuiltinImpl = fn(&[CellValue]) -> CellValue;

/// Implementation of a special form: raw argument expressions
pub type SpecialFormImpl = fn(&[FormulaExpr], &EvaluationContext<'_>) -> CellValue;

/// How a function receives its arguments
#[derive(Clone, Copy)]
pub enum FunctionKind {
    Builtin(BuiltinImpl),
    SpecialForm(SpecialFormImpl),
}

/// Function definition
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: &'static str,
    /// Dispatch class and implementation
    pub kind: FunctionKind,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Check arity before propagating argument errors (builtins only)
    pub arity_first: bool,
}

impl FunctionDef {
    /// Whether `count` arguments are within bounds
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min_args && self.max_args.map_or(true, |max| count <= max)
    }
}

/// Function registry
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDef>,
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        registry.register_math_functions();
        registry.register_logical_functions();
        registry.register_text_functions();
        registry.register_lookup_functions();

        registry
    }

    /// Look up a function by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_uppercase())
    }

    /// Register a function, replacing any previous definition
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.to_uppercase(), def);
    }

    /// Names of all registered functions, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.values().map(|def| def.name).collect();
        names.sort_unstable();
        names
    }

    fn builtin(
        &mut self,
        name: &'static str,
        min_args: usize,
        max_args: Option<usize>,
        f: BuiltinImpl,
    ) {
        self.register(FunctionDef {
            name,
            kind: FunctionKind::Builtin(f),
            min_args,
            max_args,
            arity_first: false,
        });
    }

    fn special_form(
        &mut self,
        name: &'static str,
        min_args: usize,
        max_args: Option<usize>,
        f: SpecialFormImpl,
    ) {
        self.register(FunctionDef {
            name,
            kind: FunctionKind::SpecialForm(f),
            min_args,
            max_args,
            arity_first: false,
        });
    }

    fn register_math_functions(&mut self) {
        self.builtin("SUM", 0, None, math::fn_sum);
        self.builtin("AVERAGE", 0, None, math::fn_average);
        self.builtin("COUNT", 0, None, math::fn_count);
        self.builtin("MAX", 0, None, math::fn_max);
        self.builtin("MIN", 0, None, math::fn_min);
    }

    fn register_logical_functions(&mut self) {
        self.special_form("IF", 2, Some(3), logical::fn_if);
        self.special_form("AND", 1, None, logical::fn_and);
        self.special_form("OR", 1, None, logical::fn_or);
        self.register(FunctionDef {
            name: "NOT",
            kind: FunctionKind::Builtin(logical::fn_not),
            min_args: 1,
            max_args: Some(1),
            arity_first: true,
        });
    }

    fn register_text_functions(&mut self) {
        self.builtin("CONCATENATE", 0, None, text::fn_concatenate);
        self.builtin("LEFT", 1, Some(2), text::fn_left);
        self.builtin("RIGHT", 1, Some(2), text::fn_right);
        self.builtin("LEN", 1, Some(1), text::fn_len);
    }

    fn register_lookup_functions(&mut self) {
        self.special_form("VLOOKUP", 3, Some(4), lookup::fn_vlookup);
        self.special_form("HLOOKUP", 3, Some(4), lookup::fn_hlookup);
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
