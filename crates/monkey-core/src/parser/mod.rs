//! Parser for the Monkey programming language
//!
//! This module implements a Pratt parser (top-down operator precedence) that pulls
//! tokens from a [`Lexer`] and builds an Abstract Syntax Tree (AST). Syntax errors
//! are recorded and parsing resumes at the next statement boundary, so a single
//! pass reports every problem it can find.
//!
//! # Example
//!
//! ```
//! use monkey_core::lexer::Lexer;
//! use monkey_core::parser::Parser;
//!
//! let parser = Parser::new(Lexer::new("let x = 5; return x + 1;"));
//! let (program, errors) = parser.parse_program();
//! assert!(errors.is_empty());
//! assert_eq!(program.stmts.len(), 2);
//! ```

mod error;
mod expr;
mod precedence;

pub use error::{ExpectedToken, ParseError, ParseErrorKind};
pub use precedence::Precedence;

use log::debug;
use rustc_hash::FxHashMap;

use crate::ast::{Block, Expr, Ident, Program, Span, Stmt, StmtKind};
use crate::lexer::{Lexer, Position, Token, TokenKind};

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Handler for a token in prefix position
type PrefixParseFn<'source> = fn(&mut Parser<'source>) -> ParseResult<Expr>;
/// Handler for a token in infix position, given the left operand
type InfixParseFn<'source> = fn(&mut Parser<'source>, Expr) -> ParseResult<Expr>;
/// Handler for a token in postfix position, given the operand
type PostfixParseFn<'source> = fn(&mut Parser<'source>, Expr) -> ParseResult<Expr>;

/// Default limit on expression nesting
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Maximum expression nesting depth before parsing gives up on a statement
    pub max_depth: usize,
}

impl ParserOptions {
    /// Set the maximum nesting depth
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// The Monkey parser
pub struct Parser<'source> {
    lexer: Lexer<'source>,
    /// Token before `cur_token`, used to validate postfix operators
    prev_token: Token,
    cur_token: Token,
    peek_token: Token,
    /// Collected parse errors
    errors: Vec<ParseError>,
    prefix_fns: FxHashMap<TokenKind, PrefixParseFn<'source>>,
    infix_fns: FxHashMap<TokenKind, InfixParseFn<'source>>,
    postfix_fns: FxHashMap<TokenKind, PostfixParseFn<'source>>,
    /// Set while parsing the branches of a ternary
    in_ternary: bool,
    /// Current expression nesting depth
    depth: usize,
    options: ParserOptions,
}

impl<'source> Parser<'source> {
    /// Create a new parser with default options
    #[must_use]
    pub fn new(lexer: Lexer<'source>) -> Self {
        Self::with_options(lexer, ParserOptions::default())
    }

    /// Create a new parser with the given options
    #[must_use]
    pub fn with_options(mut lexer: Lexer<'source>, options: ParserOptions) -> Self {
        let cur_token = lexer.next_token();
        let peek_token = lexer.next_token();
        let mut parser = Self {
            lexer,
            prev_token: Token::new(TokenKind::Eof, "", Span::default(), Position::new(1, 1)),
            cur_token,
            peek_token,
            errors: Vec::new(),
            prefix_fns: FxHashMap::default(),
            infix_fns: FxHashMap::default(),
            postfix_fns: FxHashMap::default(),
            in_ternary: false,
            depth: 0,
            options,
        };
        parser.register_parse_fns();
        parser
    }

    /// Errors recorded so far
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Parse the whole input.
    ///
    /// The returned error list is empty exactly when the input was valid.
    #[must_use]
    pub fn parse_program(mut self) -> (Program, Vec<ParseError>) {
        let mut stmts = Vec::new();

        while !self.cur_is(TokenKind::Eof) {
            let errors_before = self.errors.len();
            let stmt = self.parse_statement();
            if self.errors.len() > errors_before {
                self.synchronize();
            }
            stmts.extend(stmt);
            self.next_token();
        }

        debug!(
            "parsed {} statements with {} errors",
            stmts.len(),
            self.errors.len()
        );

        let span = Span::from_range(0..self.lexer.source().len());
        (Program::new(stmts, span), self.errors)
    }

    // ==================== Token Management ====================

    /// Advance the token window by one token
    fn next_token(&mut self) {
        let next = self.lexer.next_token();
        let cur = std::mem::replace(&mut self.peek_token, next);
        self.prev_token = std::mem::replace(&mut self.cur_token, cur);
    }

    fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur_token.kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    /// Advance if the peek token has the given kind, or fail without moving
    fn expect_peek(&mut self, kind: TokenKind) -> ParseResult<()> {
        if self.peek_is(kind) {
            self.next_token();
            Ok(())
        } else {
            Err(self.unexpected_peek(ExpectedToken::Token(kind)))
        }
    }

    /// Expect the peek token to be an identifier and advance onto it
    fn expect_ident(&mut self) -> ParseResult<Ident> {
        self.expect_peek(TokenKind::Ident)?;
        Ok(self.cur_ident())
    }

    /// The current token as an identifier node
    fn cur_ident(&self) -> Ident {
        Ident::new(self.cur_token.literal.clone(), self.cur_token.span)
    }

    /// Span from `start` up to and including the current token
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.cur_token.span)
    }

    // ==================== Errors ====================

    fn error_at(token: &Token, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, token.span, token.position)
    }

    fn unexpected_peek(&self, expected: ExpectedToken) -> ParseError {
        Self::error_at(
            &self.peek_token,
            ParseErrorKind::UnexpectedToken {
                found: self.peek_token.kind,
                expected,
            },
        )
    }

    /// Record an error but continue parsing
    fn error(&mut self, error: ParseError) {
        debug!("syntax error: {error}");
        self.errors.push(error);
    }

    /// Skip ahead to a statement boundary after an error.
    ///
    /// Stops with the current token on `;`, or just before EOF, `}`, `let` or
    /// `return`.
    fn synchronize(&mut self) {
        debug!("resynchronizing at {}", self.cur_token.position);
        while !self.cur_is(TokenKind::Semicolon)
            && !matches!(
                self.peek_token.kind,
                TokenKind::Eof | TokenKind::RBrace | TokenKind::Let | TokenKind::Return
            )
        {
            self.next_token();
        }
    }

    /// Run `f` with the ternary flag set to `inside`, restoring it afterwards
    fn with_ternary<T>(&mut self, inside: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.in_ternary, inside);
        let result = f(self);
        self.in_ternary = saved;
        result
    }

    /// Run `f` as a bracketed sub-context, where a ternary may start afresh
    fn without_ternary<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.with_ternary(false, f)
    }

    /// Run `f` one nesting level deeper, failing at the current token once
    /// `max_depth` levels are open
    fn with_depth<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= self.options.max_depth {
            return Err(Self::error_at(
                &self.cur_token,
                ParseErrorKind::MaxDepthExceeded(self.options.max_depth),
            ));
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // ==================== Statement Parsing ====================

    /// Parse one statement starting at the current token, leaving the current
    /// token on its last token. Returns `None` if nothing worth keeping was
    /// parsed.
    fn parse_statement(&mut self) -> Option<Stmt> {
        let result = match self.cur_token.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        };

        match result {
            Ok(stmt) if stmt.root_expr().is_some_and(Expr::is_invalid) => None,
            Ok(stmt) => Some(stmt),
            Err(e) => {
                self.error(e);
                None
            }
        }
    }

    /// Consume an optional `;` ending a statement.
    ///
    /// When the statement failed on the current token, that token was never
    /// consumed and the `;` is left for resynchronization.
    fn skip_semicolon(&mut self) {
        if self.peek_is(TokenKind::Semicolon) && !self.failed_at_cur() {
            self.next_token();
        }
    }

    /// Parse `let IDENT = expr [;]`
    fn parse_let_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.cur_token.span;
        let name = self.expect_ident()?;
        self.expect_peek(TokenKind::Assign)?;
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Ok(Stmt::new(StmtKind::Let { name, value }, self.span_from(start)))
    }

    /// Parse `return [expr] [;]`
    fn parse_return_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.cur_token.span;
        let value = if matches!(
            self.peek_token.kind,
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
        ) {
            None
        } else {
            self.next_token();
            Some(self.parse_expression(Precedence::Lowest)?)
        };
        self.skip_semicolon();

        Ok(Stmt::new(StmtKind::Return(value), self.span_from(start)))
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.cur_token.span;
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Ok(Stmt::expr(expr, self.span_from(start)))
    }

    /// Parse `{ statements }` with the current token on `{`.
    ///
    /// Reaching end of input first records an error and returns what was
    /// parsed so far.
    fn parse_block(&mut self) -> ParseResult<Block> {
        let start = self.cur_token.span;
        self.with_depth(|p| {
            p.without_ternary(|p| -> ParseResult<Block> {
                let mut stmts = Vec::new();
                p.next_token();

                while !p.cur_is(TokenKind::RBrace) {
                    if p.cur_is(TokenKind::Eof) {
                        let error = Self::error_at(&p.cur_token, ParseErrorKind::UnterminatedBlock)
                            .with_hint("add a closing '}'");
                        p.error(error);
                        return Ok(Block::new(stmts, p.span_from(start)));
                    }

                    let errors_before = p.errors.len();
                    let stmt = p.parse_statement();
                    stmts.extend(stmt);
                    if p.errors.len() > errors_before {
                        // The statement failed on this block's own `}`
                        if p.stalled_on_block_end() {
                            continue;
                        }
                        p.synchronize();
                    }
                    p.next_token();
                }

                Ok(Block::new(stmts, p.span_from(start)))
            })
        })
    }

    /// True when the latest error was reported at the current token
    fn failed_at_cur(&self) -> bool {
        self.errors
            .last()
            .is_some_and(|e| e.span == self.cur_token.span)
    }

    /// True when a statement failed on the `}` closing the enclosing block
    fn stalled_on_block_end(&self) -> bool {
        self.cur_is(TokenKind::RBrace) && self.failed_at_cur()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ExprKind, Literal};
    use crate::testutil::{parse_errors, parse_ok};

    #[test]
    fn parse_let_and_return() {
        let program = parse_ok("let x = 5; return x + 1;");
        assert_eq!(program.stmts.len(), 2);

        match &program.stmts[0].kind {
            StmtKind::Let { name, value } => {
                assert_eq!(name.name, "x");
                assert_eq!(value.kind, ExprKind::Literal(Literal::Int(5)));
            }
            other => panic!("expected let, got {other:?}"),
        }
        match &program.stmts[1].kind {
            StmtKind::Return(Some(value)) => assert_eq!(value.to_string(), "(x + 1)"),
            other => panic!("expected return, got {other:?}"),
        }
    }

    #[test]
    fn parse_return_without_value() {
        let program = parse_ok("return; fn() { return }");
        assert!(matches!(program.stmts[0].kind, StmtKind::Return(None)));
        assert_eq!(program.to_string(), "return;\nfn() { return; };");
    }

    #[test]
    fn semicolons_are_optional() {
        let program = parse_ok("let a = 1\nlet b = 2\na + b");
        assert_eq!(program.stmts.len(), 3);
    }

    #[test]
    fn leading_brace_is_a_hash_literal() {
        let program = parse_ok("{\"a\": 1};\n{};");
        assert_eq!(program.stmts.len(), 2);
        match &program.stmts[0].kind {
            StmtKind::Expr(expr) => {
                assert!(matches!(&expr.kind, ExprKind::Hash(pairs) if pairs.len() == 1));
            }
            other => panic!("expected hash expression, got {other:?}"),
        }
        assert_eq!(program.to_string(), "{\"a\": 1};\n{};");
    }

    #[test]
    fn hash_receiver_renders_without_grouping() {
        let program = parse_ok("({\"a\": 1}).keys(); {}.len();");
        let rendered = program.to_string();
        assert_eq!(rendered, "{\"a\": 1}.keys();\n{}.len();");
        assert_eq!(parse_ok(&rendered).to_string(), rendered);
    }

    #[test]
    fn statement_spans_cover_source() {
        let source = "let x = 5;";
        let program = parse_ok(source);
        assert_eq!(program.stmts[0].span, Span::new(0, 10));
        assert_eq!(program.span, Span::new(0, 10));
    }

    #[test]
    fn let_without_name_reports_error() {
        let errors = parse_errors("let = 5;");
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0].kind,
            ParseErrorKind::UnexpectedToken {
                found: TokenKind::Assign,
                ..
            }
        ));
        assert_eq!(errors[0].position, Position::new(1, 5));
    }

    #[test]
    fn recovery_continues_with_next_statement() {
        let (program, errors) = crate::parse("let = 5; let y = 2;");
        assert_eq!(errors.len(), 1);
        assert_eq!(program.to_string(), "let y = 2;");
    }

    #[test]
    fn errors_accumulate() {
        let errors = parse_errors("+ 1; let ;");
        assert!(errors.len() >= 2, "got {errors:?}");
        assert!(matches!(
            errors[0].kind,
            ParseErrorKind::NoPrefixParseFn(TokenKind::Plus)
        ));
    }

    #[test]
    fn invalid_statements_are_dropped() {
        let (program, errors) = crate::parse("+; let a = 1;");
        assert_eq!(errors.len(), 1);
        assert_eq!(program.to_string(), "let a = 1;");
    }

    #[test]
    fn error_inside_block_keeps_closing_brace() {
        let (program, errors) = crate::parse("fn() { let x = } ; let y = 1;");
        assert_eq!(errors.len(), 1, "got {errors:?}");
        assert!(matches!(
            errors[0].kind,
            ParseErrorKind::NoPrefixParseFn(TokenKind::RBrace)
        ));
        assert_eq!(program.to_string(), "fn() { };\nlet y = 1;");
    }

    #[test]
    fn unterminated_block() {
        let (program, errors) = crate::parse("fn(x) { x + 1");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::UnterminatedBlock);
        assert_eq!(program.to_string(), "fn(x) { (x + 1); };");
    }

    #[test]
    fn parser_never_panics_on_garbage() {
        for source in ["}}}", ")", "let", "fn(", "[1, 2", "{1: }", "switch", "a ? b", "@#$", "foreach"] {
            let _ = crate::parse(source);
        }
    }

    #[test]
    fn errors_accessor_starts_empty() {
        let parser = Parser::new(Lexer::new("1"));
        assert!(parser.errors().is_empty());
    }
}
