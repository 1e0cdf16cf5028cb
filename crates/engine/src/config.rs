use serde::{Deserialize, Serialize};

use crate::error::FormulaError;

// ---------------------------------------------------------------------------
// Engine options
// ---------------------------------------------------------------------------

/// Evaluation options. Every field has a default, so an empty TOML document
/// is a valid config.
///
/// ```toml
/// number_parsing = "lenient"
/// max_formula_length = 4096
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub number_parsing: NumberParsing,
    /// Reject input longer than this many characters before tokenizing.
    pub max_formula_length: Option<usize>,
}

/// How numeric literals made of digits and dots are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberParsing {
    /// The whole run must be a valid number; "1.2.3" is an error.
    #[default]
    Strict,
    /// Keep the longest valid prefix of the run; "1.2.3" reads as 1.2.
    Lenient,
}

impl EngineConfig {
    pub fn from_toml(input: &str) -> Result<Self, FormulaError> {
        let config: EngineConfig =
            toml::from_str(input).map_err(|e| FormulaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FormulaError> {
        if self.max_formula_length == Some(0) {
            return Err(FormulaError::Config(
                "max_formula_length must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Fails with `FormulaTooLong` when `input` exceeds `max_formula_length`.
    pub fn check_length(&self, input: &str) -> Result<(), FormulaError> {
        if let Some(max) = self.max_formula_length {
            let len = input.chars().count();
            if len > max {
                return Err(FormulaError::FormulaTooLong { len, max });
            }
        }
        Ok(())
    }
}
