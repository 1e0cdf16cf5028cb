//! `plangrid-engine` — spreadsheet formula evaluation.
//!
//! Pure engine crate: takes formula text and a read-only `EvalContext`,
//! returns a number or a `FormulaError`. No IO and no shared state between
//! calls.

pub mod address;
pub mod config;
pub mod context;
pub mod error;
pub mod formula;

pub use address::{AddressError, CellAddress, CellRange};
pub use config::{EngineConfig, NumberParsing};
pub use context::{CellGrid, CellValue, EvalContext};
pub use error::FormulaError;
pub use formula::{evaluate_formula, evaluate_formula_with, CompiledFormula};
