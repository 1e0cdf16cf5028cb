// Formula parser - reorders infix tokens into Reverse Polish Notation
// Shunting-yard with function awareness: a function is emitted right after
// its parenthesized argument.

use crate::error::FormulaError;

use super::tokenizer::{Operator, Token};

/// Convert a token stream (as produced by `tokenize`) to RPN.
///
/// Numbers, cell references and ranges go straight to the output. Binary
/// operators pop anything of equal or higher precedence first, so chains of
/// the same precedence evaluate left to right. The output never contains
/// parentheses, commas or `EndOfInput`.
pub fn to_rpn(tokens: &[Token]) -> Result<Vec<Token>, FormulaError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(_) | Token::CellReference(_) | Token::CellRange(_) => {
                output.push(token.clone());
            }
            Token::Function(_) | Token::Operator(Operator::LParen) => {
                stack.push(token.clone());
            }
            Token::Operator(Operator::RParen) => {
                loop {
                    match stack.pop() {
                        Some(Token::Operator(Operator::LParen)) => break,
                        Some(t) => output.push(t),
                        None => return Err(FormulaError::MismatchedParentheses),
                    }
                }
                // Apply the function whose argument list just closed
                if matches!(stack.last(), Some(Token::Function(_))) {
                    output.extend(stack.pop());
                }
            }
            Token::Operator(op) => {
                let prec = op.precedence();
                while let Some(&Token::Operator(top)) = stack.last() {
                    if top.is_binary() && top.precedence() >= prec {
                        stack.pop();
                        output.push(Token::Operator(top));
                    } else {
                        break;
                    }
                }
                stack.push(token.clone());
            }
            Token::Comma => loop {
                match stack.last() {
                    Some(Token::Operator(Operator::LParen)) => break,
                    Some(_) => output.extend(stack.pop()),
                    None => return Err(FormulaError::MisplacedComma),
                }
            },
            Token::EndOfInput => break,
        }
    }

    while let Some(t) = stack.pop() {
        if matches!(t, Token::Operator(Operator::LParen | Operator::RParen)) {
            return Err(FormulaError::MismatchedParentheses);
        }
        output.push(t);
    }

    Ok(output)
}

/// Render an RPN stream as space-separated tokens, e.g. "A1:A3 SUM 2 *".
pub fn format_rpn(rpn: &[Token]) -> String {
    rpn.iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
