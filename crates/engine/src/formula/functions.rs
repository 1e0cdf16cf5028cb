// Built-in spreadsheet functions

use super::eval::Operand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionName {
    Sum,
    Average,
}

impl FunctionName {
    /// Function names must be uppercase; there is no case folding.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SUM" => Some(FunctionName::Sum),
            "AVERAGE" => Some(FunctionName::Average),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FunctionName::Sum => "SUM",
            FunctionName::Average => "AVERAGE",
        }
    }

    /// Apply to the single operand that precedes the function in RPN.
    /// A bare scalar passes through unchanged.
    pub fn apply(&self, operand: Operand) -> f64 {
        match operand {
            Operand::Scalar(value) => value,
            Operand::Sequence(values) => match self {
                FunctionName::Sum => sum(&values),
                FunctionName::Average => average(&values),
            },
        }
    }
}

/// NaN members count as non-numeric and are skipped.
pub fn sum(values: &[f64]) -> f64 {
    values.iter().filter(|v| !v.is_nan()).sum()
}

/// Mean of the numeric members, or 0 when there are none.
pub fn average(values: &[f64]) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for v in values.iter().filter(|v| !v.is_nan()) {
        total += v;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}
