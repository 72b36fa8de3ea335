//! Named range definitions
//!
//! Named ranges let formulas refer to a rectangle of cells by name. Names are
//! case-insensitive: `MyRange`, `myrange` and `MYRANGE` are the same name.
//!
//! # Example
//!
//! ```text
//! // Define a named range "Sales" that covers A1:A10
//! sheet.define_name("Sales", "A1:A10")?;
//!
//! // Use it in a formula
//! =SUM(Sales)
//! ```

use crate::cell::CellRange;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Collection of named ranges with case-insensitive lookup
#[derive(Debug, Default, Clone)]
pub struct NamedRangeCollection {
    /// Ranges keyed by uppercased name
    ranges: HashMap<String, CellRange>,
}

impl NamedRangeCollection {
    /// Create a new empty collection
    pub fn new() -> Self {
        Self::default()
    }

    fn make_key(name: &str) -> String {
        name.to_uppercase()
    }

    /// Check that a name could be written in a formula
    ///
    /// A name starts with a letter and continues with letters or digits.
    pub fn validate_name(name: &str) -> Result<()> {
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c.is_alphabetic() => {}
            _ => {
                return Err(Error::InvalidName(format!(
                    "'{}' must start with a letter",
                    name
                )))
            }
        }
        if let Some(c) = chars.find(|c| !c.is_alphanumeric()) {
            return Err(Error::InvalidName(format!(
                "'{}' contains invalid character '{}'",
                name, c
            )));
        }
        Ok(())
    }

    /// Define or replace a named range
    ///
    /// Returns the range previously registered under the same name.
    pub fn define(&mut self, name: &str, range: CellRange) -> Option<CellRange> {
        self.ranges.insert(Self::make_key(name), range)
    }

    /// Look up a named range, ignoring case
    pub fn get(&self, name: &str) -> Option<CellRange> {
        self.ranges.get(&Self::make_key(name)).copied()
    }

    /// Get the number of named ranges
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
