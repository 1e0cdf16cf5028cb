// Formula evaluator - walks an RPN stream with an operand stack
// Entry points: evaluate_formula (text in, number out) and CompiledFormula
// (tokenize + parse once, evaluate many times).

use std::fmt;

use crate::address::{CellAddress, CellRange};
use crate::config::EngineConfig;
use crate::context::EvalContext;
use crate::error::FormulaError;

use super::parser::{format_rpn, to_rpn};
use super::tokenizer::{tokenize, Operator, Token};

/// A stack slot: a plain number, or the values of a range waiting for the
/// function that consumes it.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Scalar(f64),
    Sequence(Vec<f64>),
}

/// Evaluate an RPN stream against `ctx`.
///
/// Blank or non-numeric cells read as 0. A range is only valid as the
/// argument of a function; using one where a scalar is needed, or leaving
/// anything other than a single scalar on the stack, is `InvalidExpression`.
pub fn evaluate_rpn<C: EvalContext + ?Sized>(rpn: &[Token], ctx: &C) -> Result<f64, FormulaError> {
    let mut stack: Vec<Operand> = Vec::new();

    for token in rpn {
        match token {
            Token::Number(n) => stack.push(Operand::Scalar(*n)),
            Token::CellReference(addr) => {
                stack.push(Operand::Scalar(ctx.cell_value(addr).unwrap_or(0.0)));
            }
            Token::CellRange(range) => stack.push(Operand::Sequence(ctx.range_values(range))),
            Token::Operator(op) => {
                if !op.is_binary() {
                    return Err(FormulaError::InvalidExpression);
                }
                if stack.len() < 2 {
                    return Err(FormulaError::InsufficientOperands);
                }
                let b = pop_scalar(&mut stack)?;
                let a = pop_scalar(&mut stack)?;
                stack.push(Operand::Scalar(apply_binary(*op, a, b)?));
            }
            Token::Function(func) => {
                let operand = stack.pop().ok_or(FormulaError::InsufficientOperands)?;
                stack.push(Operand::Scalar(func.apply(operand)));
            }
            Token::Comma => return Err(FormulaError::InvalidExpression),
            Token::EndOfInput => break,
        }
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(Operand::Scalar(value)), true) => Ok(value),
        _ => Err(FormulaError::InvalidExpression),
    }
}

fn pop_scalar(stack: &mut Vec<Operand>) -> Result<f64, FormulaError> {
    match stack.pop() {
        Some(Operand::Scalar(v)) => Ok(v),
        Some(Operand::Sequence(_)) => Err(FormulaError::InvalidExpression),
        None => Err(FormulaError::InsufficientOperands),
    }
}

fn apply_binary(op: Operator, a: f64, b: f64) -> Result<f64, FormulaError> {
    match op {
        Operator::Add => Ok(a + b),
        Operator::Sub => Ok(a - b),
        Operator::Mul => Ok(a * b),
        Operator::Div => {
            if b == 0.0 {
                Err(FormulaError::DivisionByZero)
            } else {
                Ok(a / b)
            }
        }
        Operator::LParen | Operator::RParen => Err(FormulaError::InvalidExpression),
    }
}

/// True if `input` is a formula rather than a plain value.
pub fn is_formula(input: &str) -> bool {
    input.starts_with('=')
}

/// Evaluate cell input with default options.
///
/// Input starting with `=` is a formula; anything else must be a plain number.
pub fn evaluate_formula<C: EvalContext + ?Sized>(input: &str, ctx: &C) -> Result<f64, FormulaError> {
    evaluate_formula_with(input, ctx, &EngineConfig::default())
}

pub fn evaluate_formula_with<C: EvalContext + ?Sized>(
    input: &str,
    ctx: &C,
    config: &EngineConfig,
) -> Result<f64, FormulaError> {
    let result = CompiledFormula::compile(input, config).and_then(|formula| formula.evaluate(ctx));
    if let Err(e) = &result {
        log::debug!("Formula {:?} failed: {}", input, e);
    }
    result
}

/// Plain (non-formula) input: the whole trimmed text must be a finite number.
fn parse_plain_number(input: &str) -> Result<f64, FormulaError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| FormulaError::InvalidNumber(input.to_string()))
}

// ============================================================================
// Compiled formulas
// ============================================================================

/// A cell or range a formula reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reference {
    Cell(CellAddress),
    Range(CellRange),
}

impl Reference {
    pub fn covers(&self, addr: &CellAddress) -> bool {
        match self {
            Reference::Cell(cell) => cell == addr,
            Reference::Range(range) => range.contains(addr),
        }
    }
}

/// Input that has been tokenized and converted to RPN once, ready to be
/// evaluated against any number of contexts.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFormula {
    rpn: Vec<Token>,
}

impl CompiledFormula {
    /// Plain numeric input compiles to a single constant.
    pub fn compile(input: &str, config: &EngineConfig) -> Result<Self, FormulaError> {
        config.check_length(input)?;

        let Some(body) = input.strip_prefix('=') else {
            let value = parse_plain_number(input)?;
            return Ok(Self { rpn: vec![Token::Number(value)] });
        };

        let tokens = tokenize(body, config)?;
        log::trace!("Tokens for {:?}: {:?}", input, tokens);
        let rpn = to_rpn(&tokens)?;
        log::trace!("RPN for {:?}: {}", input, format_rpn(&rpn));

        Ok(Self { rpn })
    }

    pub fn evaluate<C: EvalContext + ?Sized>(&self, ctx: &C) -> Result<f64, FormulaError> {
        evaluate_rpn(&self.rpn, ctx)
    }

    pub fn rpn(&self) -> &[Token] {
        &self.rpn
    }

    /// Distinct cells and ranges the formula reads, in order of first use.
    pub fn references(&self) -> Vec<Reference> {
        let mut refs = Vec::new();
        for token in &self.rpn {
            let r = match token {
                Token::CellReference(addr) => Reference::Cell(*addr),
                Token::CellRange(range) => Reference::Range(*range),
                _ => continue,
            };
            if !refs.contains(&r) {
                refs.push(r);
            }
        }
        refs
    }

    /// True if changing `addr` can change this formula's result.
    pub fn depends_on(&self, addr: &CellAddress) -> bool {
        self.references().iter().any(|r| r.covers(addr))
    }
}

impl fmt::Display for CompiledFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_rpn(&self.rpn))
    }
}
