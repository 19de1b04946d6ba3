//! Expression AST nodes for the Monkey programming language

use crate::lexer::Span;

use super::{Block, Ident, Spanned};

/// Infix (binary) operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfixOp {
    // Arithmetic
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Sub,
    /// Multiplication (*)
    Mul,
    /// Division (/)
    Div,
    /// Modulo (%)
    Mod,
    /// Exponentiation (**)
    Pow,

    // Comparison
    /// Equal (==)
    Eq,
    /// Not equal (!=)
    NotEq,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    LtEq,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    GtEq,

    // Logical
    /// Logical AND (&&)
    And,
    /// Logical OR (||)
    Or,

    // Regexp matching
    /// Matches (=~)
    Contains,
    /// Does not match (!~)
    NotContains,

    /// Range (..)
    Range,
}

impl InfixOp {
    /// Returns the symbol representation of the operator
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Mod => "%",
            InfixOp::Pow => "**",
            InfixOp::Eq => "==",
            InfixOp::NotEq => "!=",
            InfixOp::Lt => "<",
            InfixOp::LtEq => "<=",
            InfixOp::Gt => ">",
            InfixOp::GtEq => ">=",
            InfixOp::And => "&&",
            InfixOp::Or => "||",
            InfixOp::Contains => "=~",
            InfixOp::NotContains => "!~",
            InfixOp::Range => "..",
        }
    }
}

/// Prefix (unary) operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixOp {
    /// Negation (-)
    Neg,
    /// Logical NOT (!)
    Not,
}

impl PrefixOp {
    /// Returns the symbol representation of the operator
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PrefixOp::Neg => "-",
            PrefixOp::Not => "!",
        }
    }
}

/// Postfix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostfixOp {
    /// Increment (++)
    Increment,
    /// Decrement (--)
    Decrement,
}

impl PostfixOp {
    /// Returns the symbol representation of the operator
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PostfixOp::Increment => "++",
            PostfixOp::Decrement => "--",
        }
    }
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    /// =
    Assign,
    /// +=
    Add,
    /// -=
    Sub,
    /// *=
    Mul,
    /// /=
    Div,
}

impl AssignOp {
    /// Returns the symbol representation of the operator
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
        }
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer literal (e.g., 42)
    Int(i64),
    /// Floating-point literal (e.g., 3.14)
    Float(f64),
    /// String literal, escapes already decoded
    String(String),
    /// Boolean literal (true/false)
    Bool(bool),
    /// Null literal
    Null,
}

/// An expression with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// The kind of expression
    pub kind: ExprKind,
    /// Source location
    pub span: Span,
}

impl Expr {
    /// Create a new expression
    #[must_use]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Create a literal expression
    #[must_use]
    pub fn literal(lit: Literal, span: Span) -> Self {
        Self::new(ExprKind::Literal(lit), span)
    }

    /// Create an identifier expression
    #[must_use]
    pub fn ident(name: impl Into<String>, span: Span) -> Self {
        Self::new(ExprKind::Ident(Ident::new(name, span)), span)
    }

    /// Placeholder for an expression that failed to parse
    #[must_use]
    pub fn invalid(span: Span) -> Self {
        Self::new(ExprKind::Invalid, span)
    }

    /// Returns true if this is the error placeholder
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self.kind, ExprKind::Invalid)
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        self.span
    }
}

/// The kind of expression (without source location)
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Literal value (42, 3.14, "hello", true, null)
    Literal(Literal),

    /// Identifier reference
    Ident(Ident),

    /// Regexp literal (/pattern/flags)
    Regexp { pattern: String, flags: String },

    /// Backtick command literal, stored verbatim
    Backtick(String),

    /// Array literal ([1, 2, 3])
    Array(Vec<Expr>),

    /// Hash literal ({"key": value}), pairs in source order
    Hash(Vec<(Expr, Expr)>),

    /// Prefix operation (-x, !flag)
    Prefix { op: PrefixOp, operand: Box<Expr> },

    /// Infix operation (a + b, x == y, etc.)
    Infix {
        left: Box<Expr>,
        op: InfixOp,
        right: Box<Expr>,
    },

    /// Postfix operation (i++, i--)
    Postfix { operand: Box<Expr>, op: PostfixOp },

    /// Assignment (x = v, a[i] += v)
    Assign {
        target: Box<Expr>,
        op: AssignOp,
        value: Box<Expr>,
    },

    /// Ternary conditional (cond ? a : b)
    Ternary {
        condition: Box<Expr>,
        consequence: Box<Expr>,
        alternative: Box<Expr>,
    },

    /// Index access (expr[index])
    Index {
        collection: Box<Expr>,
        index: Box<Expr>,
    },

    /// Function call (callee(args...))
    Call { callee: Box<Expr>, args: Vec<Expr> },

    /// Method call (receiver.method(args) or receiver.method)
    MethodCall {
        receiver: Box<Expr>,
        method: Ident,
        /// `None` when the method name is not followed by an argument list
        args: Option<Vec<Expr>>,
    },

    /// Function literal (fn name(a, b = 1) { body })
    Function(Function),

    /// If expression (if (cond) { then } else { else_ })
    If {
        condition: Box<Expr>,
        consequence: Block,
        alternative: Option<ElseBranch>,
    },

    /// For loop (for (cond) { body })
    For { condition: Box<Expr>, body: Block },

    /// For-each loop (foreach i, v in iterable { body })
    Foreach {
        index: Option<Ident>,
        value: Ident,
        iterable: Box<Expr>,
        body: Block,
    },

    /// Switch expression
    Switch {
        subject: Box<Expr>,
        cases: Vec<CaseClause>,
        default: Option<Block>,
    },

    /// Placeholder left where a recoverable error replaced an expression
    Invalid,
}

/// A function literal
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Function name, present for `fn name(...)` and `function name(...)`
    pub name: Option<Ident>,
    /// Parameters
    pub params: Vec<Param>,
    /// Function body
    pub body: Block,
}

/// A function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name
    pub name: Ident,
    /// Default value used when the argument is omitted
    pub default: Option<Expr>,
    /// Source location
    pub span: Span,
}

impl Param {
    /// Create a new parameter
    #[must_use]
    pub fn new(name: Ident, default: Option<Expr>, span: Span) -> Self {
        Self {
            name,
            default,
            span,
        }
    }
}

impl Spanned for Param {
    fn span(&self) -> Span {
        self.span
    }
}

/// Else branch of an if expression
#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    /// else { block }
    Block(Block),
    /// else if ...
    ElseIf(Box<Expr>),
}

/// One `case` clause of a switch
#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    /// Values matched by this clause, in source order
    pub values: Vec<Expr>,
    /// Body run on match
    pub body: Block,
    /// Source location
    pub span: Span,
}

impl Spanned for CaseClause {
    fn span(&self) -> Span {
        self.span
    }
}
