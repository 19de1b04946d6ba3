//! Abstract Syntax Tree (AST) for the Monkey programming language
//!
//! This module defines the data structures that represent parsed Monkey source code.
//! All AST nodes include source location information via [`Span`] for error reporting,
//! and implement `Display` with a fully parenthesized rendering that parses back
//! to the same tree.

mod expr;
mod pretty;
mod stmt;

pub use expr::*;
pub use stmt::*;

// Re-export Span from lexer for convenience
pub use crate::lexer::Span;

/// A trait for AST nodes that have associated source location information
pub trait Spanned {
    /// Returns the source span of this node
    fn span(&self) -> Span;
}

/// An identifier with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    /// The identifier name
    pub name: String,
    /// Source location
    pub span: Span,
}

impl Ident {
    /// Create a new identifier
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

impl Spanned for Ident {
    fn span(&self) -> Span {
        self.span
    }
}

/// A brace-delimited block of statements
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// The statements in the block
    pub stmts: Vec<Stmt>,
    /// Source location of the entire block (including braces)
    pub span: Span,
}

impl Block {
    /// Create a new block
    #[must_use]
    pub fn new(stmts: Vec<Stmt>, span: Span) -> Self {
        Self { stmts, span }
    }
}

impl Spanned for Block {
    fn span(&self) -> Span {
        self.span
    }
}

/// A whole source unit: the root of the AST
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level statements in source order
    pub stmts: Vec<Stmt>,
    /// Source location of the whole input
    pub span: Span,
}

impl Program {
    /// Create a new program
    #[must_use]
    pub fn new(stmts: Vec<Stmt>, span: Span) -> Self {
        Self { stmts, span }
    }

    /// Returns true if the program has no statements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

impl Spanned for Program {
    fn span(&self) -> Span {
        self.span
    }
}
