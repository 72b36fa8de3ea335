//! Dependency tracking for formula calculation

use crate::ast::FormulaExpr;
use calxy_core::CellAddress;
use std::collections::{HashMap, HashSet, VecDeque};

/// Dependency graph for formula cells
///
/// Tracks which cells depend on which other cells, enabling incremental
/// recalculation. Both directions are stored and always mirror each other:
/// `b` is a dependent of `a` exactly when `a` is a precedent of `b`. Empty
/// sets are never stored.
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    /// Cell → Cells that depend on it (dependents)
    dependents: HashMap<CellAddress, HashSet<CellAddress>>,
    /// Cell → Cells it depends on (precedents)
    precedents: HashMap<CellAddress, HashSet<CellAddress>>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the precedents of `cell` with `new_precedents`
    ///
    /// Callers check [`would_create_cycle`](Self::would_create_cycle) first.
    pub fn replace_precedents(&mut self, cell: CellAddress, new_precedents: HashSet<CellAddress>) {
        self.clear_precedents(cell);

        if new_precedents.is_empty() {
            return;
        }

        for &precedent in &new_precedents {
            self.dependents.entry(precedent).or_default().insert(cell);
        }
        self.precedents.insert(cell, new_precedents);
    }

    /// Remove all precedents of `cell`
    ///
    /// Cells that depend on `cell` keep their edges to it.
    pub fn clear_precedents(&mut self, cell: CellAddress) {
        let Some(old) = self.precedents.remove(&cell) else {
            return;
        };

        for precedent in old {
            if let Some(deps) = self.dependents.get_mut(&precedent) {
                deps.remove(&cell);
                if deps.is_empty() {
                    self.dependents.remove(&precedent);
                }
            }
        }
    }

    /// Would giving `cell` these precedents close a cycle?
    ///
    /// True if `cell` is among them, or if any of them already reaches
    /// `cell` through the committed precedents.
    pub fn would_create_cycle(
        &self,
        cell: CellAddress,
        new_precedents: &HashSet<CellAddress>,
    ) -> bool {
        if new_precedents.contains(&cell) {
            return true;
        }

        let mut visited: HashSet<CellAddress> = HashSet::new();
        let mut queue: VecDeque<CellAddress> = new_precedents.iter().copied().collect();

        while let Some(current) = queue.pop_front() {
            if current == cell {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(precs) = self.precedents.get(&current) {
                queue.extend(precs.iter().copied().filter(|p| !visited.contains(p)));
            }
        }

        false
    }

    /// Cells that the given cell reads from
    pub fn precedents(&self, cell: CellAddress) -> Option<&HashSet<CellAddress>> {
        self.precedents.get(&cell)
    }

    /// Cells that read from the given cell
    pub fn dependents(&self, cell: CellAddress) -> Option<&HashSet<CellAddress>> {
        self.dependents.get(&cell)
    }

    /// Get cells that depend on the given cell
    pub fn iter_dependents(&self, cell: CellAddress) -> impl Iterator<Item = CellAddress> + '_ {
        self.dependents
            .get(&cell)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}

/// Collect every distinct cell an expression references directly
///
/// A range contributes its two corner cells. Named ranges contribute
/// nothing: they are resolved only at evaluation time, so edits inside a
/// named range do not trigger recalculation of formulas that use the name.
pub fn extract_precedents(expr: &FormulaExpr) -> HashSet<CellAddress> {
    let mut refs = HashSet::new();
    collect_precedents(expr, &mut refs);
    refs
}

fn collect_precedents(expr: &FormulaExpr, refs: &mut HashSet<CellAddress>) {
    match expr {
        FormulaExpr::CellRef(addr) => {
            refs.insert(*addr);
        }
        FormulaExpr::Range(range) => {
            refs.insert(range.start);
            refs.insert(range.end);
        }
        FormulaExpr::Function { args, .. } => {
            for arg in args {
                collect_precedents(arg, refs);
            }
        }
        FormulaExpr::BinaryOp { left, right, .. } => {
            collect_precedents(left, refs);
            collect_precedents(right, refs);
        }
        FormulaExpr::Number(_)
        | FormulaExpr::String(_)
        | FormulaExpr::Boolean(_)
        | FormulaExpr::NameRef(_) => {}
    }
}
