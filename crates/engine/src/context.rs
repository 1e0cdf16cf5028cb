//! The read-only view of cell data a formula evaluates against.
//!
//! The engine only ever reads through `EvalContext`; callers own the data and
//! decide how cells are stored. `CellGrid` is a sparse in-memory
//! implementation for hosts that do not have their own store.

use rustc_hash::FxHashMap;

use crate::address::{CellAddress, CellRange};
use crate::error::FormulaError;

/// Cell and range lookups used during evaluation.
pub trait EvalContext {
    /// Numeric value of a cell, or `None` for blank or non-numeric cells.
    fn cell_value(&self, address: &CellAddress) -> Option<f64>;

    /// Numeric values inside a range. Order follows the range's row-major
    /// expansion; how non-numeric cells are represented is up to the context.
    fn range_values(&self, range: &CellRange) -> Vec<f64>;
}

impl<T: EvalContext + ?Sized> EvalContext for &T {
    fn cell_value(&self, address: &CellAddress) -> Option<f64> {
        (**self).cell_value(address)
    }

    fn range_values(&self, range: &CellRange) -> Vec<f64> {
        (**self).range_values(range)
    }
}

/// Stored content of a grid cell. Blank cells are simply absent.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }
}

/// Sparse grid of cell values.
#[derive(Debug, Clone, Default)]
pub struct CellGrid {
    cells: FxHashMap<CellAddress, CellValue>,
}

impl CellGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, address: CellAddress, value: CellValue) {
        self.cells.insert(address, value);
    }

    pub fn set_number(&mut self, address: CellAddress, value: f64) {
        self.set(address, CellValue::Number(value));
    }

    pub fn set_text(&mut self, address: CellAddress, value: impl Into<String>) {
        self.set(address, CellValue::Text(value.into()));
    }

    /// Store raw user input: numeric text becomes a number, empty input
    /// clears the cell, anything else is kept as text.
    pub fn set_input(&mut self, address: CellAddress, input: &str) {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            self.clear(&address);
        } else if let Ok(n) = trimmed.parse::<f64>() {
            self.set_number(address, n);
        } else {
            self.set_text(address, input);
        }
    }

    /// `set_input` keyed by A1 text.
    pub fn set_a1(&mut self, a1: &str, input: &str) -> Result<(), FormulaError> {
        let address = CellAddress::from_a1(a1).map_err(|reason| FormulaError::InvalidAddress {
            text: a1.to_string(),
            reason,
        })?;
        self.set_input(address, input);
        Ok(())
    }

    /// Numeric values of a range given as A1 text, e.g. "A1:B10".
    pub fn range_values_a1(&self, text: &str) -> Result<Vec<f64>, FormulaError> {
        let range = CellRange::parse(text).map_err(|reason| FormulaError::InvalidRange {
            text: text.to_string(),
            reason,
        })?;
        Ok(self.range_values(&range))
    }

    pub fn clear(&mut self, address: &CellAddress) -> Option<CellValue> {
        self.cells.remove(address)
    }

    pub fn get(&self, address: &CellAddress) -> Option<&CellValue> {
        self.cells.get(address)
    }

    /// Number of non-blank cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl EvalContext for CellGrid {
    fn cell_value(&self, address: &CellAddress) -> Option<f64> {
        self.cells.get(address).and_then(CellValue::as_number)
    }

    /// Blank and text cells are left out of the result.
    fn range_values(&self, range: &CellRange) -> Vec<f64> {
        // Scan whichever is smaller: the rectangle or the stored cells
        if range.cell_count() <= self.cells.len() as u64 {
            return range
                .cells()
                .filter_map(|addr| self.cell_value(&addr))
                .collect();
        }
        let mut hits: Vec<(CellAddress, f64)> = self
            .cells
            .iter()
            .filter(|(addr, _)| range.contains(addr))
            .filter_map(|(addr, value)| value.as_number().map(|n| (*addr, n)))
            .collect();
        hits.sort_unstable_by_key(|(addr, _)| *addr);
        hits.into_iter().map(|(_, n)| n).collect()
    }
}
