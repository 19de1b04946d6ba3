//! Parser error types for the Monkey programming language

use crate::lexer::{Position, Span, TokenKind};
use thiserror::Error;

/// A parser error with location information
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The kind of error
    pub kind: ParseErrorKind,
    /// Source location where the error occurred
    pub span: Span,
    /// Line and column of the offending token
    pub position: Position,
    /// Optional hint for fixing the error
    pub hint: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    #[must_use]
    pub fn new(kind: ParseErrorKind, span: Span, position: Position) -> Self {
        Self {
            kind,
            span,
            position,
            hint: None,
        }
    }

    /// Add a hint to this error
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.kind, self.position)?;
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// The kind of parse error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error("no prefix parse function for {0}")]
    NoPrefixParseFn(TokenKind),

    #[error("unexpected token: found {found}, expected {expected}")]
    UnexpectedToken {
        found: TokenKind,
        expected: ExpectedToken,
    },

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("illegal token {0:?}")]
    IllegalToken(String),

    #[error("could not parse {0:?} as integer")]
    InvalidInteger(String),

    #[error("could not parse {0:?} as float")]
    InvalidFloat(String),

    #[error("invalid regexp: {0}")]
    InvalidRegexp(String),

    #[error("invalid assignment target: {0}")]
    InvalidAssignmentTarget(String),

    #[error("nested ternary expressions are illegal")]
    NestedTernary,

    #[error("{0} must follow an identifier, literal, ')' or ']'")]
    InvalidPostfix(TokenKind),

    #[error("unterminated block")]
    UnterminatedBlock,

    #[error("switch has more than one default clause")]
    DuplicateDefault,

    #[error("expression nesting exceeds the maximum depth of {0}")]
    MaxDepthExceeded(usize),
}

/// What token was expected
#[derive(Debug, Clone, PartialEq)]
pub enum ExpectedToken {
    /// A specific token kind
    Token(TokenKind),
    /// One of several possible tokens
    OneOf(Vec<TokenKind>),
    /// A description of what was expected
    Description(String),
}

impl std::fmt::Display for ExpectedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectedToken::Token(kind) => write!(f, "{kind}"),
            ExpectedToken::OneOf(kinds) => {
                let names: Vec<String> = kinds.iter().map(|k| format!("{k}")).collect();
                write!(f, "one of: {}", names.join(", "))
            }
            ExpectedToken::Description(desc) => write!(f, "{desc}"),
        }
    }
}
