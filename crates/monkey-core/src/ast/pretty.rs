//! Pretty printing for AST nodes
//!
//! Implements Display for AST nodes. Every compound expression is fully
//! parenthesized, so the output parses back to the same tree.

use std::fmt::{self, Display, Formatter};

use super::{
    AssignOp, Block, CaseClause, ElseBranch, Expr, ExprKind, Function, Ident, InfixOp, Literal,
    Param, PostfixOp, PrefixOp, Program, Stmt, StmtKind,
};

// ============================================================================
// Helpers
// ============================================================================

fn write_comma_separated<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_string_literal(f: &mut Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "\"")?;
    for c in s.chars() {
        match c {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            '\r' => write!(f, "\\r")?,
            _ => write!(f, "{c}")?,
        }
    }
    write!(f, "\"")
}

// ============================================================================
// Basic types
// ============================================================================

impl Display for Ident {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Display for InfixOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Display for PrefixOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Display for PostfixOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Display for AssignOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Float(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{n}.0")
                } else {
                    write!(f, "{n}")
                }
            }
            Literal::String(s) => write_string_literal(f, s),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Null => write!(f, "null"),
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Display for ExprKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ExprKind::Literal(lit) => write!(f, "{lit}"),
            ExprKind::Ident(ident) => write!(f, "{ident}"),
            ExprKind::Regexp { pattern, flags } => {
                write!(f, "/{}/{flags}", pattern.replace('/', "\\/"))
            }
            ExprKind::Backtick(command) => write!(f, "`{command}`"),
            ExprKind::Array(elements) => {
                write!(f, "[")?;
                write_comma_separated(f, elements)?;
                write!(f, "]")
            }
            ExprKind::Hash(pairs) => {
                write!(f, "{{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            ExprKind::Prefix { op, operand } => write!(f, "({op}{operand})"),
            ExprKind::Infix { left, op, right } => write!(f, "({left} {op} {right})"),
            ExprKind::Postfix { operand, op } => write!(f, "({operand}{op})"),
            ExprKind::Assign { target, op, value } => write!(f, "({target} {op} {value})"),
            ExprKind::Ternary {
                condition,
                consequence,
                alternative,
            } => write!(f, "({condition} ? {consequence} : {alternative})"),
            ExprKind::Index { collection, index } => write!(f, "({collection}[{index}])"),
            ExprKind::Call { callee, args } => {
                write!(f, "{callee}(")?;
                write_comma_separated(f, args)?;
                write!(f, ")")
            }
            ExprKind::MethodCall {
                receiver,
                method,
                args,
            } => {
                write!(f, "{receiver}.{method}")?;
                if let Some(args) = args {
                    write!(f, "(")?;
                    write_comma_separated(f, args)?;
                    write!(f, ")")?;
                }
                Ok(())
            }
            ExprKind::Function(func) => write!(f, "{func}"),
            ExprKind::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if ({condition}) {consequence}")?;
                match alternative {
                    Some(ElseBranch::Block(block)) => write!(f, " else {block}"),
                    Some(ElseBranch::ElseIf(expr)) => write!(f, " else {expr}"),
                    None => Ok(()),
                }
            }
            ExprKind::For { condition, body } => write!(f, "for ({condition}) {body}"),
            ExprKind::Foreach {
                index,
                value,
                iterable,
                body,
            } => {
                write!(f, "foreach ")?;
                if let Some(index) = index {
                    write!(f, "{index}, ")?;
                }
                write!(f, "{value} in {iterable} {body}")
            }
            ExprKind::Switch {
                subject,
                cases,
                default,
            } => {
                write!(f, "switch ({subject}) {{")?;
                for case in cases {
                    write!(f, " {case}")?;
                }
                if let Some(default) = default {
                    write!(f, " default {default}")?;
                }
                write!(f, " }}")
            }
            ExprKind::Invalid => write!(f, "<invalid>"),
        }
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "fn")?;
        if let Some(name) = &self.name {
            write!(f, " {name}")?;
        }
        write!(f, "(")?;
        write_comma_separated(f, &self.params)?;
        write!(f, ") {}", self.body)
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(default) = &self.default {
            write!(f, " = {default}")?;
        }
        Ok(())
    }
}

impl Display for CaseClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "case ")?;
        write_comma_separated(f, &self.values)?;
        write!(f, " {}", self.body)
    }
}

// ============================================================================
// Statements
// ============================================================================

impl Display for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.stmts.is_empty() {
            return write!(f, "{{ }}");
        }
        write!(f, "{{")?;
        for stmt in &self.stmts {
            write!(f, " {stmt}")?;
        }
        write!(f, " }}")
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StmtKind::Let { name, value } => write!(f, "let {name} = {value};"),
            StmtKind::Return(Some(value)) => write!(f, "return {value};"),
            StmtKind::Return(None) => write!(f, "return;"),
            StmtKind::Expr(expr) => write!(f, "{expr};"),
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, stmt) in self.stmts.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
