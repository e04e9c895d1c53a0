//! Parser for the OpenQASM 2 subset accepted as circuit input

pub mod ast;
mod grammar;
pub mod lexer;
mod lower;

pub use ast::*;
pub use grammar::parse;
pub use lower::lower;

use crate::circuit::Circuit;
use crate::ParseError;

/// Parse QASM source and lower it into a circuit
pub fn parse_circuit(source: &str, name: &str) -> Result<Circuit, Vec<ParseError>> {
    let program = parse(source)?;
    lower(&program, name).map_err(|e| vec![e])
}
