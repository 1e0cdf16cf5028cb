use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::address::AddressError;

/// Every way a formula can fail to evaluate.
///
/// Failures abort the evaluation that raised them; nothing is recovered
/// internally.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaError {
    /// A numeric literal (or plain, non-formula input) is not a number.
    InvalidNumber(String),
    /// A character outside every token class.
    UnknownCharacter(char),
    /// An uppercase word that is not a function, range, or cell address.
    UnknownToken(String),
    MismatchedParentheses,
    /// A comma with no enclosing open parenthesis.
    MisplacedComma,
    /// An operator or function ran with too few values on the stack.
    InsufficientOperands,
    DivisionByZero,
    /// Evaluation finished without exactly one scalar on the stack.
    InvalidExpression,
    InvalidAddress { text: String, reason: AddressError },
    InvalidRange { text: String, reason: AddressError },
    /// Input longer than the configured `max_formula_length`.
    FormulaTooLong { len: usize, max: usize },
    /// TOML parse / deserialization error for `EngineConfig`.
    Config(String),
}

impl FormulaError {
    /// Stable kind name, independent of the message text.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidNumber(_) => "InvalidNumber",
            Self::UnknownCharacter(_) => "UnknownCharacter",
            Self::UnknownToken(_) => "UnknownToken",
            Self::MismatchedParentheses => "MismatchedParentheses",
            Self::MisplacedComma => "MisplacedComma",
            Self::InsufficientOperands => "InsufficientOperands",
            Self::DivisionByZero => "DivisionByZero",
            Self::InvalidExpression => "InvalidExpression",
            Self::InvalidAddress { .. } => "InvalidAddress",
            Self::InvalidRange { .. } => "InvalidRange",
            Self::FormulaTooLong { .. } => "FormulaTooLong",
            Self::Config(_) => "Config",
        }
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNumber(text) => write!(f, "invalid number: {text}"),
            Self::UnknownCharacter(c) => write!(f, "unknown character: {c}"),
            Self::UnknownToken(word) => write!(f, "unknown token: {word}"),
            Self::MismatchedParentheses => write!(f, "mismatched parentheses"),
            Self::MisplacedComma => write!(f, "misplaced comma"),
            Self::InsufficientOperands => write!(f, "insufficient operands"),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::InvalidExpression => write!(f, "invalid expression"),
            Self::InvalidAddress { text, reason } => write!(f, "invalid address '{text}': {reason}"),
            Self::InvalidRange { text, reason } => write!(f, "invalid range '{text}': {reason}"),
            Self::FormulaTooLong { len, max } => {
                write!(f, "formula is {len} characters long, limit is {max}")
            }
            Self::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for FormulaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidAddress { reason, .. } | Self::InvalidRange { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Serialized as `{"code": ..., "message": ...}` for display by the host.
impl Serialize for FormulaError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FormulaError", 2)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}
