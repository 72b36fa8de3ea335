//! Sheet with incremental recalculation
//!
//! A [`Sheet`] stores cells sparsely, keeps the dependency graph between
//! formula cells, and recomputes exactly the cells affected by an edit.
//!
//! # Example
//!
//! ```rust
//! use calxy::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! sheet.set_cell("A1", "10").unwrap();
//! sheet.set_cell("B1", "20").unwrap();
//! sheet.set_cell("C1", "=A1+B1").unwrap();
//! assert_eq!(sheet.value(CellAddress::parse("C1").unwrap()), CellValue::Number(30.0));
//!
//! // Dependents are recalculated automatically
//! let stats = sheet.set_cell("A1", "15").unwrap();
//! assert_eq!(stats.cells_changed, 1);
//! assert_eq!(sheet.value(CellAddress::parse("C1").unwrap()), CellValue::Number(35.0));
//! ```

use crate::{
    evaluate, extract_precedents, parse_formula, CellAddress, CellError, CellRange, CellValue,
    DependencyGraph, EvaluationContext, FormulaExpr, FormulaResult, NamedRangeCollection, Result,
    SheetAccess,
};
use lazy_regex::regex_is_match;
use std::collections::{HashMap, HashSet, VecDeque};

/// A stored cell
///
/// Cells are replaced wholesale on update; only recalculation changes the
/// value of an existing cell in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    raw_text: String,
    value: CellValue,
    expression: Option<FormulaExpr>,
}

impl Cell {
    /// The text exactly as entered
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// The computed value
    pub fn value(&self) -> &CellValue {
        &self.value
    }

    /// The parsed formula, if the text was a well-formed formula
    pub fn expression(&self) -> Option<&FormulaExpr> {
        self.expression.as_ref()
    }

    /// Check if this cell holds a parsed formula
    pub fn is_formula(&self) -> bool {
        self.expression.is_some()
    }
}

/// What an update did to the dependency graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// New edges were committed and the value computed
    Committed,
    /// The formula did not parse; the cell's precedents were cleared
    ParseFailed,
    /// The formula would close a cycle; nothing was committed
    CircularReference,
}

/// Statistics from a cell update
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationStats {
    /// How the update was handled
    pub outcome: UpdateOutcome,
    /// Number of dependent cells recomputed
    pub cells_recalculated: usize,
    /// Number of recomputed cells whose value changed
    pub cells_changed: usize,
    /// Recomputed cells, in the order they were visited
    pub recalculated: Vec<CellAddress>,
}

impl CalculationStats {
    fn new(outcome: UpdateOutcome) -> Self {
        Self {
            outcome,
            cells_recalculated: 0,
            cells_changed: 0,
            recalculated: Vec::new(),
        }
    }
}

/// A single sheet of cells
///
/// All mutation goes through [`Sheet::update_cell`], which keeps the
/// precedent and dependent maps in step. Updates are synchronous and run to
/// completion, including the whole recalculation cascade.
#[derive(Debug, Default)]
pub struct Sheet {
    cells: HashMap<CellAddress, Cell>,
    graph: DependencyGraph,
    names: NamedRangeCollection,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell's raw text and recalculate everything that depends on it
    ///
    /// Text starting with `=` is parsed as a formula. Other text is stored as
    /// a number if it parses as one, else as text.
    ///
    /// - A formula that fails to parse stores `#ERROR!` and drops the cell's
    ///   precedents.
    /// - A formula that would create a circular reference stores `#REF!` and
    ///   leaves the graph untouched; no recalculation runs.
    pub fn update_cell(
        &mut self,
        addr: CellAddress,
        raw_text: impl Into<String>,
    ) -> CalculationStats {
        let raw_text = raw_text.into();

        let expression = match parse_formula(&raw_text) {
            Ok(expression) => expression,
            Err(e) => {
                log::debug!("{addr}: {e}");
                self.graph.clear_precedents(addr);
                self.cells.insert(
                    addr,
                    Cell {
                        raw_text,
                        value: CellValue::Error(CellError::Parse),
                        expression: None,
                    },
                );
                return self.recalculate_dependents(addr, UpdateOutcome::ParseFailed);
            }
        };

        let precedents = expression
            .as_ref()
            .map(extract_precedents)
            .unwrap_or_default();

        if self.graph.would_create_cycle(addr, &precedents) {
            log::debug!("{addr}: circular reference in '{raw_text}'");
            self.cells.insert(
                addr,
                Cell {
                    raw_text,
                    value: CellValue::Error(CellError::Ref),
                    expression,
                },
            );
            return CalculationStats::new(UpdateOutcome::CircularReference);
        }

        self.graph.replace_precedents(addr, precedents);

        let value = match &expression {
            Some(expr) => self.evaluate(expr),
            None => literal_value(&raw_text),
        };
        self.cells.insert(
            addr,
            Cell {
                raw_text,
                value,
                expression,
            },
        );

        self.recalculate_dependents(addr, UpdateOutcome::Committed)
    }

    /// Set a cell by A1-style address
    pub fn set_cell(&mut self, a1: &str, raw_text: impl Into<String>) -> Result<CalculationStats> {
        let addr = CellAddress::parse(a1)?;
        Ok(self.update_cell(addr, raw_text))
    }

    /// Breadth-first recalculation of everything downstream of `origin`
    ///
    /// Each cell is recomputed at most once per pass. Propagation stops at
    /// cells whose value did not change.
    fn recalculate_dependents(
        &mut self,
        origin: CellAddress,
        outcome: UpdateOutcome,
    ) -> CalculationStats {
        let mut stats = CalculationStats::new(outcome);
        let mut queue: VecDeque<CellAddress> = self.sorted_dependents(origin).into();
        let mut visited: HashSet<CellAddress> = HashSet::new();

        while let Some(addr) = queue.pop_front() {
            if !visited.insert(addr) {
                continue;
            }

            let new_value = match self.cells.get(&addr) {
                Some(Cell {
                    expression: Some(expr),
                    ..
                }) => self.evaluate(expr),
                _ => continue,
            };
            log::trace!("recalculated {addr} = {new_value}");
            stats.recalculated.push(addr);

            let Some(cell) = self.cells.get_mut(&addr) else {
                continue;
            };
            if cell.value == new_value {
                continue;
            }
            cell.value = new_value;
            stats.cells_changed += 1;

            queue.extend(self.sorted_dependents(addr));
        }

        stats.cells_recalculated = stats.recalculated.len();
        stats
    }

    /// Dependents in row-major order, so passes are deterministic
    fn sorted_dependents(&self, addr: CellAddress) -> Vec<CellAddress> {
        let mut dependents: Vec<_> = self.graph.iter_dependents(addr).collect();
        dependents.sort_unstable();
        dependents
    }

    /// Evaluate an expression against this sheet
    pub fn evaluate(&self, expr: &FormulaExpr) -> CellValue {
        evaluate(expr, &EvaluationContext::new(self))
    }

    /// Evaluate raw cell text without storing it
    ///
    /// Formulas are evaluated against the current cells; other text is
    /// coerced the way [`Sheet::update_cell`] would store it.
    pub fn evaluate_text(&self, raw_text: &str) -> FormulaResult<CellValue> {
        Ok(match parse_formula(raw_text)? {
            Some(expr) => self.evaluate(&expr),
            None => literal_value(raw_text),
        })
    }

    // === Reads ===

    /// Get a stored cell
    pub fn cell(&self, addr: CellAddress) -> Option<&Cell> {
        self.cells.get(&addr)
    }

    /// Get a cell's computed value, `Empty` if no cell was set there
    pub fn value(&self, addr: CellAddress) -> CellValue {
        self.cells
            .get(&addr)
            .map(|cell| cell.value.clone())
            .unwrap_or_default()
    }

    /// Iterate over all stored cells, in no particular order
    pub fn cells(&self) -> impl Iterator<Item = (CellAddress, &Cell)> {
        self.cells.iter().map(|(addr, cell)| (*addr, cell))
    }

    /// Number of stored cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if no cell was ever set
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Smallest range covering every stored cell
    pub fn used_range(&self) -> Option<CellRange> {
        let mut addrs = self.cells.keys();
        let first = *addrs.next()?;
        let (top_left, bottom_right) = addrs.fold((first, first), |(tl, br), a| {
            (
                CellAddress::new(tl.row.min(a.row), tl.col.min(a.col)),
                CellAddress::new(br.row.max(a.row), br.col.max(a.col)),
            )
        });
        Some(CellRange::new(top_left, bottom_right))
    }

    // === Named ranges ===

    /// Register a named range, replacing any range with the same name
    ///
    /// Formulas that already use the name are not recalculated.
    pub fn add_named_range(&mut self, name: &str, range: CellRange) {
        self.names.define(name, range);
    }

    /// Register a named range from A1 notation, validating the name
    pub fn define_name(&mut self, name: &str, range: &str) -> Result<()> {
        NamedRangeCollection::validate_name(name)?;
        let range = CellRange::parse(range)?;
        self.add_named_range(name, range);
        Ok(())
    }

    /// Resolve a named range, ignoring case
    pub fn named_range(&self, name: &str) -> Option<CellRange> {
        self.names.get(name)
    }

    /// All named ranges
    pub fn named_ranges(&self) -> &NamedRangeCollection {
        &self.names
    }

    // === Dependency introspection ===

    /// Cells the formula at `addr` reads from
    pub fn precedents(&self, addr: CellAddress) -> Option<&HashSet<CellAddress>> {
        self.graph.precedents(addr)
    }

    /// Cells whose formulas read from `addr`
    pub fn dependents(&self, addr: CellAddress) -> Option<&HashSet<CellAddress>> {
        self.graph.dependents(addr)
    }
}

impl SheetAccess for Sheet {
    fn cell_value(&self, addr: CellAddress) -> Option<&CellValue> {
        self.cells.get(&addr).map(|cell| &cell.value)
    }

    fn named_range(&self, name: &str) -> Option<CellRange> {
        self.names.get(name)
    }
}

/// Value of non-formula text: a number if the whole text is a finite
/// decimal literal
///
/// `f64::from_str` also accepts `nan` and `inf`, so the shape is checked
/// first.
fn literal_value(raw_text: &str) -> CellValue {
    let is_decimal = regex_is_match!(
        r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$",
        raw_text
    );
    match raw_text.parse::<f64>() {
        Ok(n) if is_decimal && n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(raw_text.to_string()),
    }
}
