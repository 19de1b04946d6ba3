//! Token types for the Monkey lexer

use logos::Logos;

/// The kind of token produced by the lexer
///
/// Variants without a logos attribute are produced by the hand-written parts
/// of [`super::Lexer`] (regexps, end of input, illegal input).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"#[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum TokenKind {
    // ========== Keywords ==========
    #[token("fn")]
    Fn,
    /// Named function definition: `function name(...) { ... }`
    #[token("function")]
    Function,
    #[token("let")]
    Let,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("foreach")]
    Foreach,
    #[token("switch")]
    Switch,
    #[token("case")]
    Case,
    #[token("default")]
    Default,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // ========== Literals ==========
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"[0-9]+\.[0-9]+")]
    Float,

    /// String literal. Logos only matches the opening quote; the lexer scans
    /// the body and escapes.
    #[token("\"")]
    String,

    /// Backtick literal. Logos only matches the opening backtick.
    #[token("`")]
    Backtick,

    /// Regular expression literal `/pattern/flags`
    Regexp,

    // ========== Operators ==========
    #[token("=")]
    Assign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("!")]
    Bang,
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,
    #[token("%")]
    Mod,
    #[token("**")]
    Pow,

    #[token("+=")]
    PlusEquals,
    #[token("-=")]
    MinusEquals,
    #[token("*=")]
    AsteriskEquals,
    #[token("/=")]
    SlashEquals,

    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    #[token("==")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEquals,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEquals,

    #[token("&&")]
    And,
    #[token("||")]
    Or,

    /// Regexp match `=~`
    #[token("=~")]
    Contains,
    /// Regexp non-match `!~`
    #[token("!~")]
    NotContains,

    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("..")]
    DotDot,
    #[token(".")]
    Period,

    // ========== Delimiters ==========
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // ========== Special ==========
    /// End of input (added by the lexer, not matched by logos)
    Eof,

    /// Unknown character or malformed literal
    Illegal,
}

impl TokenKind {
    /// Returns true if this token can be the last token of an operand:
    /// identifiers, literals and closing `)` / `]`
    #[must_use]
    pub const fn closes_operand(self) -> bool {
        matches!(
            self,
            Self::Ident
                | Self::Int
                | Self::Float
                | Self::String
                | Self::Backtick
                | Self::Regexp
                | Self::True
                | Self::False
                | Self::Null
                | Self::RParen
                | Self::RBracket
        )
    }

    /// Returns true if a `/` following this token is division rather than
    /// the start of a regexp literal
    #[must_use]
    pub const fn ends_value(self) -> bool {
        self.closes_operand() || matches!(self, Self::PlusPlus | Self::MinusMinus)
    }
}

impl std::fmt::Display for TokenKind {
    #[allow(clippy::match_same_arms)] // Each token type is intentionally separate for clarity
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fn => write!(f, "fn"),
            Self::Function => write!(f, "function"),
            Self::Let => write!(f, "let"),
            Self::Return => write!(f, "return"),
            Self::If => write!(f, "if"),
            Self::Else => write!(f, "else"),
            Self::For => write!(f, "for"),
            Self::Foreach => write!(f, "foreach"),
            Self::Switch => write!(f, "switch"),
            Self::Case => write!(f, "case"),
            Self::Default => write!(f, "default"),
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
            Self::Null => write!(f, "null"),
            Self::Ident => write!(f, "identifier"),
            Self::Int => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::Backtick => write!(f, "backtick literal"),
            Self::Regexp => write!(f, "regexp"),
            Self::Assign => write!(f, "="),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Bang => write!(f, "!"),
            Self::Asterisk => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Mod => write!(f, "%"),
            Self::Pow => write!(f, "**"),
            Self::PlusEquals => write!(f, "+="),
            Self::MinusEquals => write!(f, "-="),
            Self::AsteriskEquals => write!(f, "*="),
            Self::SlashEquals => write!(f, "/="),
            Self::PlusPlus => write!(f, "++"),
            Self::MinusMinus => write!(f, "--"),
            Self::Eq => write!(f, "=="),
            Self::NotEq => write!(f, "!="),
            Self::Lt => write!(f, "<"),
            Self::LtEquals => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::GtEquals => write!(f, ">="),
            Self::And => write!(f, "&&"),
            Self::Or => write!(f, "||"),
            Self::Contains => write!(f, "=~"),
            Self::NotContains => write!(f, "!~"),
            Self::Question => write!(f, "?"),
            Self::Colon => write!(f, ":"),
            Self::DotDot => write!(f, ".."),
            Self::Period => write!(f, "."),
            Self::Comma => write!(f, ","),
            Self::Semicolon => write!(f, ";"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::LBrace => write!(f, "{{"),
            Self::RBrace => write!(f, "}}"),
            Self::LBracket => write!(f, "["),
            Self::RBracket => write!(f, "]"),
            Self::Eof => write!(f, "end of input"),
            Self::Illegal => write!(f, "illegal token"),
        }
    }
}
