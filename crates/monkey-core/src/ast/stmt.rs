//! Statement AST nodes for the Monkey programming language

use crate::lexer::Span;

use super::{Expr, Ident, Spanned};

/// A statement with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    /// The kind of statement
    pub kind: StmtKind,
    /// Source location
    pub span: Span,
}

impl Stmt {
    /// Create a new statement
    #[must_use]
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Create an expression statement
    #[must_use]
    pub fn expr(expr: Expr, span: Span) -> Self {
        Self::new(StmtKind::Expr(expr), span)
    }

    /// The expression at the root of this statement, if any
    #[must_use]
    pub fn root_expr(&self) -> Option<&Expr> {
        match &self.kind {
            StmtKind::Let { value, .. } => Some(value),
            StmtKind::Return(value) => value.as_ref(),
            StmtKind::Expr(expr) => Some(expr),
        }
    }
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        self.span
    }
}

/// The kind of statement
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Variable binding (let x = value)
    Let {
        /// Variable name
        name: Ident,
        /// Initial value
        value: Expr,
    },

    /// Return statement (return, return value)
    Return(Option<Expr>),

    /// Expression statement (expr;)
    Expr(Expr),
}
