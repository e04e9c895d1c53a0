//! Lexer for the OpenQASM 2 subset using logos

use logos::Logos;

use crate::ParseError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Header keywords
    #[token("OPENQASM")]
    OpenQasm,
    #[token("include")]
    Include,

    // Declarations
    #[token("qreg")]
    QReg,
    #[token("creg")]
    CReg,

    // Built-in operations
    #[token("measure")]
    Measure,
    #[token("barrier")]
    Barrier,

    #[token("pi")]
    Pi,

    #[token("->")]
    Arrow,

    // Arithmetic for gate parameters
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,

    // Delimiters
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,

    // Literals - identifiers must come after keywords
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    String(String),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<usize>().ok())]
    Int(usize),

    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    // Comments (skip)
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,
}

/// Lex input string into tokens with spans
///
/// Runs of unrecognised input become one syntax error each, as do integer
/// literals too large for `usize`.
pub fn lex(input: &str) -> Result<Vec<(Token, Span)>, Vec<ParseError>> {
    let mut tokens = Vec::new();
    let mut bad: Vec<Span> = Vec::new();

    for (tok, span) in Token::lexer(input).spanned() {
        match tok {
            Ok(t) => tokens.push((t, span)),
            Err(()) => {
                let adjacent = bad.last().is_some_and(|last| last.end == span.start)
                    && !starts_numeric(&input[span.clone()]);
                match bad.last_mut().filter(|_| adjacent) {
                    Some(last) => last.end = span.end,
                    None => bad.push(span),
                }
            }
        }
    }

    if bad.is_empty() {
        Ok(tokens)
    } else {
        Err(bad.into_iter().map(|span| lex_error(input, span)).collect())
    }
}

fn starts_numeric(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_digit())
}

fn lex_error(input: &str, span: Span) -> ParseError {
    let text = &input[span.clone()];
    let message = if starts_numeric(text) {
        format!("Invalid number '{}'", text)
    } else {
        format!("Unrecognized input '{}'", text)
    };
    ParseError::Syntax {
        span,
        message,
        expected: vec![],
    }
}
