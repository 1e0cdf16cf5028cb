// Formula tokenizer - converts formula text (without the leading '=') into tokens
// Supports: numbers, + - * / ( ), commas, SUM/AVERAGE, cell refs (A1), ranges (A1:B5)

use std::fmt;

use crate::address::{CellAddress, CellRange};
use crate::config::{EngineConfig, NumberParsing};
use crate::error::FormulaError;

use super::functions::FunctionName;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Operator(Operator),
    Function(FunctionName),
    CellRange(CellRange),
    CellReference(CellAddress),
    Comma,
    EndOfInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    LParen,
    RParen,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::LParen => '(',
            Operator::RParen => ')',
        }
    }

    /// Binding strength of a binary operator; `None` for parentheses.
    /// All binary operators are left-associative.
    pub fn precedence(&self) -> Option<u8> {
        match self {
            Operator::Add | Operator::Sub => Some(1),
            Operator::Mul | Operator::Div => Some(2),
            Operator::LParen | Operator::RParen => None,
        }
    }

    pub fn is_binary(&self) -> bool {
        self.precedence().is_some()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Operator(op) => write!(f, "{}", op.symbol()),
            Token::Function(func) => write!(f, "{}", func.name()),
            Token::CellRange(range) => write!(f, "{range}"),
            Token::CellReference(addr) => write!(f, "{addr}"),
            Token::Comma => write!(f, ","),
            Token::EndOfInput => write!(f, "EOF"),
        }
    }
}

/// Split formula text into tokens, always ending with `Token::EndOfInput`.
///
/// The caller strips the leading `=`. Only uppercase words are recognized;
/// a word is matched against the function names first, then as a range, then
/// as a single cell address.
pub fn tokenize(expression: &str, config: &EngineConfig) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars = expression.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => { chars.next(); }
            '+' => { tokens.push(Token::Operator(Operator::Add)); chars.next(); }
            '-' => { tokens.push(Token::Operator(Operator::Sub)); chars.next(); }
            '*' => { tokens.push(Token::Operator(Operator::Mul)); chars.next(); }
            '/' => { tokens.push(Token::Operator(Operator::Div)); chars.next(); }
            '(' => { tokens.push(Token::Operator(Operator::LParen)); chars.next(); }
            ')' => { tokens.push(Token::Operator(Operator::RParen)); chars.next(); }
            ',' => { tokens.push(Token::Comma); chars.next(); }
            '0'..='9' | '.' => {
                let mut run = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        run.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Number(parse_number(&run, config.number_parsing)?));
            }
            'A'..='Z' => {
                let mut word = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_alphanumeric() || ch == ':' || ch == '.' {
                        word.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(classify_word(&word)?);
            }
            _ => return Err(FormulaError::UnknownCharacter(c)),
        }
    }

    tokens.push(Token::EndOfInput);
    Ok(tokens)
}

fn classify_word(word: &str) -> Result<Token, FormulaError> {
    if let Some(func) = FunctionName::from_name(word) {
        return Ok(Token::Function(func));
    }
    if word.contains(':') {
        if let Ok(range) = CellRange::parse(word) {
            return Ok(Token::CellRange(range));
        }
    } else if let Ok(addr) = CellAddress::from_a1(word) {
        return Ok(Token::CellReference(addr));
    }
    Err(FormulaError::UnknownToken(word.to_string()))
}

/// Read a run of digits and dots.
fn parse_number(run: &str, mode: NumberParsing) -> Result<f64, FormulaError> {
    let text = match mode {
        NumberParsing::Strict => run,
        // Everything before the second '.'
        NumberParsing::Lenient => {
            let end = run.match_indices('.').nth(1).map_or(run.len(), |(i, _)| i);
            &run[..end]
        }
    };
    text.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| FormulaError::InvalidNumber(run.to_string()))
}
