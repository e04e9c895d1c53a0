//! Syntax tree for the OpenQASM 2 subset

use std::f64::consts::PI;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Register or gate name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Root AST node - a complete QASM program
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `OPENQASM 2.0;`
    Version(f64),
    /// `include "qelib1.inc";`
    Include(String),
    /// `qreg q[8];`
    QReg {
        name: Spanned<Identifier>,
        size: usize,
    },
    /// `creg c[8];`
    CReg {
        name: Spanned<Identifier>,
        size: usize,
    },
    /// `rx(pi/2) q[0];`
    Gate(GateCall),
    /// `barrier q;`
    Barrier(Vec<Spanned<Operand>>),
    /// `measure q[0] -> c[0];`
    Measure {
        qubit: Spanned<Operand>,
        clbit: Spanned<Operand>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GateCall {
    pub name: Spanned<Identifier>,
    pub params: Vec<Spanned<Expr>>,
    pub args: Vec<Spanned<Operand>>,
}

/// A whole register (`q`) or one of its bits (`q[3]`)
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
    pub register: Identifier,
    pub index: Option<usize>,
}

/// Gate parameter expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Pi,
    Neg(Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn eval(&self) -> f64 {
        match self {
            Expr::Number(n) => *n,
            Expr::Pi => PI,
            Expr::Neg(e) => -e.eval(),
            Expr::Mul(a, b) => a.eval() * b.eval(),
            Expr::Div(a, b) => a.eval() / b.eval(),
        }
    }
}
