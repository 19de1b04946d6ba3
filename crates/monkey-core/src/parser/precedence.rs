//! Operator binding strengths

use crate::lexer::TokenKind;

/// Precedence levels, lowest binding first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Lowest,
    /// `&&`, `||`
    Cond,
    /// `=`, `+=`, `-=`, `*=`, `/=`
    Assign,
    /// `?`
    Ternary,
    /// `==`, `!=`
    Equals,
    /// `=~`, `!~`
    RegexpMatch,
    /// `<`, `<=`, `>`, `>=`
    LessGreater,
    /// `+`, `-`
    Sum,
    /// `*`, `/`
    Product,
    /// `**`
    Power,
    /// `%`
    Mod,
    /// Unary `-`, `!`
    Prefix,
    /// `(`, `.`
    Call,
    /// `..`
    DotDot,
    /// `[`, postfix `++` and `--`
    Index,
}

impl Precedence {
    /// Binding strength of a token in infix or postfix position
    #[must_use]
    pub const fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::And | TokenKind::Or => Self::Cond,
            TokenKind::Assign
            | TokenKind::PlusEquals
            | TokenKind::MinusEquals
            | TokenKind::AsteriskEquals
            | TokenKind::SlashEquals => Self::Assign,
            TokenKind::Question => Self::Ternary,
            TokenKind::Eq | TokenKind::NotEq => Self::Equals,
            TokenKind::Contains | TokenKind::NotContains => Self::RegexpMatch,
            TokenKind::Lt | TokenKind::LtEquals | TokenKind::Gt | TokenKind::GtEquals => {
                Self::LessGreater
            }
            TokenKind::Plus | TokenKind::Minus => Self::Sum,
            TokenKind::Asterisk | TokenKind::Slash => Self::Product,
            TokenKind::Pow => Self::Power,
            TokenKind::Mod => Self::Mod,
            TokenKind::LParen | TokenKind::Period => Self::Call,
            TokenKind::DotDot => Self::DotDot,
            TokenKind::LBracket | TokenKind::PlusPlus | TokenKind::MinusMinus => Self::Index,
            _ => Self::Lowest,
        }
    }

    /// The level just below this one (`Lowest` stays `Lowest`)
    #[must_use]
    pub const fn lower(self) -> Self {
        match self {
            Self::Lowest | Self::Cond => Self::Lowest,
            Self::Assign => Self::Cond,
            Self::Ternary => Self::Assign,
            Self::Equals => Self::Ternary,
            Self::RegexpMatch => Self::Equals,
            Self::LessGreater => Self::RegexpMatch,
            Self::Sum => Self::LessGreater,
            Self::Product => Self::Sum,
            Self::Power => Self::Product,
            Self::Mod => Self::Power,
            Self::Prefix => Self::Mod,
            Self::Call => Self::Prefix,
            Self::DotDot => Self::Call,
            Self::Index => Self::DotDot,
        }
    }
}
