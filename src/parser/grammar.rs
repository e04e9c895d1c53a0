//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::parser::ast::*;
use crate::parser::lexer::Token;

/// Parse QASM source into an AST
pub fn parse(input: &str) -> Result<Program, Vec<crate::ParseError>> {
    let len = input.len();

    // Lex up front so unrecognised input is reported before parsing
    let tokens = crate::parser::lexer::lex(input)?;
    let token_iter = tokens.into_iter().map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    program_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn program_parser<'a, I>() -> impl Parser<'a, I, Program, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let identifier = select! {
        Token::Ident(s) => Identifier::new(s),
    }
    .map_with(|id, e| Spanned::new(id, span_range(&e.span())));

    let integer = select! {
        Token::Int(n) => n,
    };

    let semicolon = just(Token::Semicolon);

    let index = integer
        .clone()
        .delimited_by(just(Token::BracketOpen), just(Token::BracketClose));

    // q or q[3]
    let operand = identifier
        .clone()
        .then(index.clone().or_not())
        .map_with(|(register, index), e| {
            Spanned::new(
                Operand {
                    register: register.node,
                    index,
                },
                span_range(&e.span()),
            )
        });

    let operand_list = operand
        .clone()
        .separated_by(just(Token::Comma))
        .at_least(1)
        .collect::<Vec<_>>();

    // Parameter expressions: -? (number | pi) ((* | /) -? (number | pi))*
    let atom = choice((
        select! {
            Token::Int(n) => Expr::Number(n as f64),
            Token::Float(f) => Expr::Number(f),
        },
        just(Token::Pi).to(Expr::Pi),
    ));

    let signed = just(Token::Minus)
        .or_not()
        .then(atom)
        .map(|(neg, atom)| {
            if neg.is_some() {
                Expr::Neg(Box::new(atom))
            } else {
                atom
            }
        });

    let expr = signed
        .clone()
        .foldl(
            choice((just(Token::Star), just(Token::Slash)))
                .then(signed)
                .repeated(),
            |lhs, (op, rhs)| match op {
                Token::Star => Expr::Mul(Box::new(lhs), Box::new(rhs)),
                _ => Expr::Div(Box::new(lhs), Box::new(rhs)),
            },
        )
        .map_with(|expr, e| Spanned::new(expr, span_range(&e.span())));

    let params = expr
        .separated_by(just(Token::Comma))
        .collect::<Vec<_>>()
        .delimited_by(just(Token::ParenOpen), just(Token::ParenClose))
        .or_not()
        .map(|opt| opt.unwrap_or_default());

    // OPENQASM 2.0;
    let version = just(Token::OpenQasm)
        .ignore_then(select! {
            Token::Float(v) => v,
            Token::Int(n) => n as f64,
        })
        .then_ignore(semicolon.clone())
        .map(Statement::Version);

    // include "qelib1.inc";
    let include = just(Token::Include)
        .ignore_then(select! { Token::String(s) => s })
        .then_ignore(semicolon.clone())
        .map(Statement::Include);

    let sized_register = identifier.clone().then(index);

    let qreg = just(Token::QReg)
        .ignore_then(sized_register.clone())
        .then_ignore(semicolon.clone())
        .map(|(name, size)| Statement::QReg { name, size });

    let creg = just(Token::CReg)
        .ignore_then(sized_register)
        .then_ignore(semicolon.clone())
        .map(|(name, size)| Statement::CReg { name, size });

    let barrier = just(Token::Barrier)
        .ignore_then(operand_list.clone())
        .then_ignore(semicolon.clone())
        .map(Statement::Barrier);

    let measure = just(Token::Measure)
        .ignore_then(operand.clone())
        .then_ignore(just(Token::Arrow))
        .then(operand)
        .then_ignore(semicolon.clone())
        .map(|(qubit, clbit)| Statement::Measure { qubit, clbit });

    let gate = identifier
        .then(params)
        .then(operand_list)
        .then_ignore(semicolon)
        .map(|((name, params), args)| Statement::Gate(GateCall { name, params, args }));

    let statement = choice((version, include, qreg, creg, barrier, measure, gate))
        .map_with(|s, e| Spanned::new(s, span_range(&e.span())));

    statement
        .repeated()
        .collect()
        .then_ignore(end())
        .map(|statements| Program { statements })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        let program = parse(r#"OPENQASM 2.0; include "qelib1.inc";"#).expect("Should parse");
        assert_eq!(program.statements.len(), 2);
        assert_eq!(program.statements[0].node, Statement::Version(2.0));
        assert_eq!(
            program.statements[1].node,
            Statement::Include("qelib1.inc".to_string())
        );
    }

    #[test]
    fn test_parse_registers() {
        let program = parse("qreg q[8]; creg c[4];").expect("Should parse");
        match &program.statements[0].node {
            Statement::QReg { name, size } => {
                assert_eq!(name.node.as_str(), "q");
                assert_eq!(*size, 8);
            }
            other => panic!("Expected QReg, got {:?}", other),
        }
        match &program.statements[1].node {
            Statement::CReg { name, size } => {
                assert_eq!(name.node.as_str(), "c");
                assert_eq!(*size, 4);
            }
            other => panic!("Expected CReg, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_gate_call() {
        let program = parse("cx q[0], q[1];").expect("Should parse");
        match &program.statements[0].node {
            Statement::Gate(call) => {
                assert_eq!(call.name.node.as_str(), "cx");
                assert!(call.params.is_empty());
                assert_eq!(call.args.len(), 2);
                assert_eq!(call.args[1].node.index, Some(1));
            }
            other => panic!("Expected Gate, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_parameterized_gate() {
        let program = parse("rx(-pi/2) q[0];").expect("Should parse");
        match &program.statements[0].node {
            Statement::Gate(call) => {
                assert_eq!(call.params.len(), 1);
                let value = call.params[0].node.eval();
                assert!((value + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
            }
            other => panic!("Expected Gate, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_product_expression() {
        let program = parse("p(3*pi/4) q[0];").expect("Should parse");
        match &program.statements[0].node {
            Statement::Gate(call) => {
                let value = call.params[0].node.eval();
                assert!((value - 3.0 * std::f64::consts::PI / 4.0).abs() < 1e-12);
            }
            other => panic!("Expected Gate, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_whole_register_operands() {
        let program = parse("barrier q; measure q -> c;").expect("Should parse");
        match &program.statements[0].node {
            Statement::Barrier(ops) => {
                assert_eq!(ops.len(), 1);
                assert_eq!(ops[0].node.index, None);
            }
            other => panic!("Expected Barrier, got {:?}", other),
        }
        match &program.statements[1].node {
            Statement::Measure { qubit, clbit } => {
                assert_eq!(qubit.node.register.as_str(), "q");
                assert_eq!(clbit.node.register.as_str(), "c");
            }
            other => panic!("Expected Measure, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_missing_semicolon() {
        let errors = parse("h q[0]").unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_parse_error_span() {
        let errors = parse("qreg q[2];\nh q[0] q[1];").unwrap_err();
        let crate::ParseError::Syntax { span, .. } = &errors[0] else {
            panic!("Expected syntax error");
        };
        // error lands on the second line, not on the valid declaration
        assert!(span.start >= 11);
    }

    #[test]
    fn test_stray_characters_rejected() {
        let errors = parse("qreg q[2]; h q[0]; @@@ $$ x q[1]; #").unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors
            .iter()
            .all(|e| matches!(e, crate::ParseError::Syntax { .. })));
    }

    #[test]
    fn test_oversized_index_reported_at_literal() {
        let errors = parse("qreg q[99999999999999999999999];").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), &(7..30));
    }
}
