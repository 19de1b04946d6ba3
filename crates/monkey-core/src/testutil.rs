//! Test utilities for Monkey
//!
//! This module provides common helpers for testing the front end:
//! parsing programs and single expressions, and collecting errors.

use crate::ast::{Expr, Program, StmtKind};
use crate::lexer::{Lexer, TokenKind};
use crate::parser::{ParseError, Parser, ParserOptions};

/// Parse a program, panicking with every error message if it has any
pub fn parse_ok(source: &str) -> Program {
    let (program, errors) = crate::parse(source);
    assert!(
        errors.is_empty(),
        "unexpected parse errors for {source:?}:\n{}",
        render_errors(&errors)
    );
    program
}

/// Parse a program and return its errors, panicking if there are none
pub fn parse_errors(source: &str) -> Vec<ParseError> {
    let (_, errors) = crate::parse(source);
    assert!(!errors.is_empty(), "expected parse errors for {source:?}");
    errors
}

/// Parse a program with custom options, returning the tree and errors
pub fn parse_with_options(source: &str, options: ParserOptions) -> (Program, Vec<ParseError>) {
    Parser::with_options(Lexer::new(source), options).parse_program()
}

/// Parse a source consisting of exactly one expression statement
pub fn parse_expr(source: &str) -> Expr {
    let mut program = parse_ok(source);
    assert_eq!(
        program.stmts.len(),
        1,
        "expected a single statement in {source:?}"
    );
    match program.stmts.remove(0).kind {
        StmtKind::Expr(expr) => expr,
        other => panic!("expected an expression statement in {source:?}, got {other:?}"),
    }
}

/// Canonical rendering of a single expression
pub fn expr_string(source: &str) -> String {
    parse_expr(source).to_string()
}

/// Kinds of all tokens in `source`, EOF included
pub fn token_kinds(source: &str) -> Vec<TokenKind> {
    Lexer::tokenize(source).into_iter().map(|t| t.kind).collect()
}

/// One error per line
pub fn render_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
