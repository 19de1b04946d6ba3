//! Monkey Core - Front end for the Monkey programming language
//!
//! This crate provides the core functionality:
//! - Lexer: Tokenization of source code
//! - AST: Abstract syntax tree definitions
//! - Parser: AST construction from the token stream, with error recovery
//!
//! Evaluation is left to downstream crates, which consume the [`ast::Program`].
//!
//! ```
//! let (program, errors) = monkey_core::parse("let add = fn(a, b) { a + b }; add(1, 2);");
//! assert!(errors.is_empty());
//! assert_eq!(program.to_string(), "let add = fn(a, b) { (a + b); };\nadd(1, 2);");
//! ```

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lexer module - tokenization of Monkey source code
pub mod lexer;

/// Abstract Syntax Tree - parsed representation of Monkey source code
pub mod ast;

/// Parser module - converts tokens into AST
pub mod parser;

/// Test utilities - helpers for testing the lexer and parser
pub mod testutil;

/// Convenience re-export of lexer
pub use lexer::Lexer;

/// Convenience re-export of parser
pub use parser::{ParseError, Parser, ParserOptions};

/// Parse a source string with default options.
///
/// The error list is empty exactly when the source is syntactically valid.
#[must_use]
pub fn parse(source: &str) -> (ast::Program, Vec<ParseError>) {
    Parser::new(Lexer::new(source)).parse_program()
}
