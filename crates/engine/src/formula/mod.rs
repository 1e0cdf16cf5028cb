// Formula parsing and evaluation
// string -> tokens (tokenizer) -> RPN (parser) -> number (eval)

pub mod tokenizer;
pub mod parser;
pub mod eval;
pub mod functions;

pub use eval::{evaluate_formula, evaluate_formula_with, evaluate_rpn, is_formula, CompiledFormula, Operand, Reference};
pub use functions::FunctionName;
pub use parser::{format_rpn, to_rpn};
pub use tokenizer::{tokenize, Operator, Token};
