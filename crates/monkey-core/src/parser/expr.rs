//! Expression parsing: dispatch tables and prefix/infix/postfix handlers
//!
//! Every handler starts with the current token on the first token of its
//! construct (for infix and postfix handlers, the operator) and returns with
//! the current token on the construct's last token.

use regex::Regex;

use super::{ParseErrorKind, ParseResult, Parser, Precedence};
use super::{ExpectedToken, InfixParseFn, PostfixParseFn, PrefixParseFn};
use crate::ast::{
    AssignOp, CaseClause, ElseBranch, Expr, ExprKind, Function, InfixOp, Literal, Param,
    PostfixOp, PrefixOp,
};
use crate::lexer::{decode_regexp, decode_string, TokenKind};

/// Flags accepted after a regexp literal
const REGEXP_FLAGS: &str = "imsxU";

impl<'source> Parser<'source> {
    pub(super) fn register_parse_fns(&mut self) {
        self.register_prefix(TokenKind::Ident, Self::parse_identifier);
        self.register_prefix(TokenKind::Int, Self::parse_integer_literal);
        self.register_prefix(TokenKind::Float, Self::parse_float_literal);
        self.register_prefix(TokenKind::String, Self::parse_string_literal);
        self.register_prefix(TokenKind::Backtick, Self::parse_backtick_literal);
        self.register_prefix(TokenKind::Regexp, Self::parse_regexp_literal);
        self.register_prefix(TokenKind::True, Self::parse_boolean);
        self.register_prefix(TokenKind::False, Self::parse_boolean);
        self.register_prefix(TokenKind::Null, Self::parse_null);
        self.register_prefix(TokenKind::Bang, Self::parse_prefix_expression);
        self.register_prefix(TokenKind::Minus, Self::parse_prefix_expression);
        self.register_prefix(TokenKind::LParen, Self::parse_grouped_expression);
        self.register_prefix(TokenKind::LBracket, Self::parse_array_literal);
        self.register_prefix(TokenKind::LBrace, Self::parse_hash_literal);
        self.register_prefix(TokenKind::Fn, Self::parse_function_literal);
        self.register_prefix(TokenKind::Function, Self::parse_function_literal);
        self.register_prefix(TokenKind::If, Self::parse_if_expression);
        self.register_prefix(TokenKind::For, Self::parse_for_loop);
        self.register_prefix(TokenKind::Foreach, Self::parse_foreach);
        self.register_prefix(TokenKind::Switch, Self::parse_switch);
        self.register_prefix(TokenKind::Eof, Self::parse_broken);
        self.register_prefix(TokenKind::Illegal, Self::parse_broken);

        for kind in [
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Asterisk,
            TokenKind::Slash,
            TokenKind::Mod,
            TokenKind::Pow,
            TokenKind::Eq,
            TokenKind::NotEq,
            TokenKind::Lt,
            TokenKind::LtEquals,
            TokenKind::Gt,
            TokenKind::GtEquals,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Contains,
            TokenKind::NotContains,
            TokenKind::DotDot,
        ] {
            self.register_infix(kind, Self::parse_infix_expression);
        }
        for kind in [
            TokenKind::Assign,
            TokenKind::PlusEquals,
            TokenKind::MinusEquals,
            TokenKind::AsteriskEquals,
            TokenKind::SlashEquals,
        ] {
            self.register_infix(kind, Self::parse_assign_expression);
        }
        self.register_infix(TokenKind::Question, Self::parse_ternary_expression);
        self.register_infix(TokenKind::LParen, Self::parse_call_expression);
        self.register_infix(TokenKind::Period, Self::parse_method_call);
        self.register_infix(TokenKind::LBracket, Self::parse_index_expression);

        self.register_postfix(TokenKind::PlusPlus, Self::parse_postfix_expression);
        self.register_postfix(TokenKind::MinusMinus, Self::parse_postfix_expression);
    }

    fn register_prefix(&mut self, kind: TokenKind, f: PrefixParseFn<'source>) {
        self.prefix_fns.insert(kind, f);
    }

    fn register_infix(&mut self, kind: TokenKind, f: InfixParseFn<'source>) {
        self.infix_fns.insert(kind, f);
    }

    fn register_postfix(&mut self, kind: TokenKind, f: PostfixParseFn<'source>) {
        self.postfix_fns.insert(kind, f);
    }

    // ==================== Pratt Loop ====================

    /// Parse an expression whose operators all bind tighter than `precedence`
    pub(super) fn parse_expression(&mut self, precedence: Precedence) -> ParseResult<Expr> {
        self.with_depth(|p| p.parse_expression_inner(precedence))
    }

    fn parse_expression_inner(&mut self, precedence: Precedence) -> ParseResult<Expr> {
        let Some(prefix) = self.prefix_fns.get(&self.cur_token.kind).copied() else {
            let error = Self::error_at(
                &self.cur_token,
                ParseErrorKind::NoPrefixParseFn(self.cur_token.kind),
            );
            self.error(error);
            return Ok(Expr::invalid(self.cur_token.span));
        };

        let mut left = prefix(self)?;
        if left.is_invalid() {
            return Ok(left);
        }

        while !self.peek_is(TokenKind::Semicolon)
            && precedence < Precedence::of(self.peek_token.kind)
        {
            let kind = self.peek_token.kind;
            if let Some(postfix) = self.postfix_fns.get(&kind).copied() {
                self.next_token();
                left = postfix(self, left)?;
            } else if let Some(infix) = self.infix_fns.get(&kind).copied() {
                self.next_token();
                left = infix(self, left)?;
            } else {
                break;
            }
        }

        Ok(left)
    }

    // ==================== Literals ====================

    fn parse_identifier(&mut self) -> ParseResult<Expr> {
        Ok(Expr::ident(
            self.cur_token.literal.clone(),
            self.cur_token.span,
        ))
    }

    fn parse_integer_literal(&mut self) -> ParseResult<Expr> {
        let span = self.cur_token.span;
        if let Ok(n) = self.cur_token.literal.parse::<i64>() {
            Ok(Expr::literal(Literal::Int(n), span))
        } else {
            let error = Self::error_at(
                &self.cur_token,
                ParseErrorKind::InvalidInteger(self.cur_token.literal.clone()),
            )
            .with_hint("integers must fit in 64 bits");
            self.error(error);
            Ok(Expr::invalid(span))
        }
    }

    fn parse_float_literal(&mut self) -> ParseResult<Expr> {
        let span = self.cur_token.span;
        if let Ok(n) = self.cur_token.literal.parse::<f64>() {
            Ok(Expr::literal(Literal::Float(n), span))
        } else {
            let error = Self::error_at(
                &self.cur_token,
                ParseErrorKind::InvalidFloat(self.cur_token.literal.clone()),
            );
            self.error(error);
            Ok(Expr::invalid(span))
        }
    }

    fn parse_string_literal(&mut self) -> ParseResult<Expr> {
        Ok(Expr::literal(
            Literal::String(decode_string(&self.cur_token.literal)),
            self.cur_token.span,
        ))
    }

    fn parse_backtick_literal(&mut self) -> ParseResult<Expr> {
        let literal = &self.cur_token.literal;
        let command = literal
            .strip_prefix('`')
            .and_then(|s| s.strip_suffix('`'))
            .unwrap_or(literal);
        Ok(Expr::new(
            ExprKind::Backtick(command.to_string()),
            self.cur_token.span,
        ))
    }

    fn parse_regexp_literal(&mut self) -> ParseResult<Expr> {
        let span = self.cur_token.span;
        let (pattern, flags) = decode_regexp(&self.cur_token.literal);

        if let Err(message) = validate_regexp(&pattern, &flags) {
            let error = Self::error_at(&self.cur_token, ParseErrorKind::InvalidRegexp(message));
            self.error(error);
            return Ok(Expr::invalid(span));
        }

        Ok(Expr::new(ExprKind::Regexp { pattern, flags }, span))
    }

    fn parse_boolean(&mut self) -> ParseResult<Expr> {
        Ok(Expr::literal(
            Literal::Bool(self.cur_is(TokenKind::True)),
            self.cur_token.span,
        ))
    }

    fn parse_null(&mut self) -> ParseResult<Expr> {
        Ok(Expr::literal(Literal::Null, self.cur_token.span))
    }

    /// Prefix handler for end of input and illegal tokens
    fn parse_broken(&mut self) -> ParseResult<Expr> {
        let kind = if self.cur_is(TokenKind::Eof) {
            ParseErrorKind::UnexpectedEof
        } else {
            ParseErrorKind::IllegalToken(self.cur_token.literal.clone())
        };
        let error = Self::error_at(&self.cur_token, kind);
        self.error(error);
        Ok(Expr::invalid(self.cur_token.span))
    }

    // ==================== Operators ====================

    fn parse_prefix_expression(&mut self) -> ParseResult<Expr> {
        let start = self.cur_token.span;
        let op = if self.cur_is(TokenKind::Bang) {
            PrefixOp::Not
        } else {
            PrefixOp::Neg
        };
        self.next_token();

        let operand = self.parse_expression(Precedence::Prefix)?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Prefix {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_infix_expression(&mut self, left: Expr) -> ParseResult<Expr> {
        let op_kind = self.cur_token.kind;
        let Some(op) = infix_op(op_kind) else {
            return Err(Self::error_at(
                &self.cur_token,
                ParseErrorKind::UnexpectedToken {
                    found: op_kind,
                    expected: ExpectedToken::Description("an infix operator".to_string()),
                },
            ));
        };
        self.next_token();

        // Parsing the right side at the operator's own level makes it left-associative
        let right = self.parse_expression(Precedence::of(op_kind))?;
        let span = left.span.merge(right.span);
        Ok(Expr::new(
            ExprKind::Infix {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        ))
    }

    fn parse_postfix_expression(&mut self, operand: Expr) -> ParseResult<Expr> {
        let op = if self.cur_is(TokenKind::PlusPlus) {
            PostfixOp::Increment
        } else {
            PostfixOp::Decrement
        };

        if !self.prev_token.kind.closes_operand() {
            let error = Self::error_at(
                &self.cur_token,
                ParseErrorKind::InvalidPostfix(self.cur_token.kind),
            );
            self.error(error);
            return Ok(operand);
        }

        let span = self.span_from(operand.span);
        Ok(Expr::new(
            ExprKind::Postfix {
                operand: Box::new(operand),
                op,
            },
            span,
        ))
    }

    fn parse_assign_expression(&mut self, target: Expr) -> ParseResult<Expr> {
        let op = match self.cur_token.kind {
            TokenKind::PlusEquals => AssignOp::Add,
            TokenKind::MinusEquals => AssignOp::Sub,
            TokenKind::AsteriskEquals => AssignOp::Mul,
            TokenKind::SlashEquals => AssignOp::Div,
            _ => AssignOp::Assign,
        };

        if !matches!(target.kind, ExprKind::Ident(_) | ExprKind::Index { .. }) {
            let error = Self::error_at(
                &self.cur_token,
                ParseErrorKind::InvalidAssignmentTarget(target.to_string()),
            )
            .with_hint("only identifiers and index expressions can be assigned to");
            self.error(error);
        }
        self.next_token();

        // Right-associative: `a = b = c` assigns `b = c` to `a`
        let value = self.parse_expression(Precedence::Lowest)?;
        let span = target.span.merge(value.span);
        Ok(Expr::new(
            ExprKind::Assign {
                target: Box::new(target),
                op,
                value: Box::new(value),
            },
            span,
        ))
    }

    fn parse_ternary_expression(&mut self, condition: Expr) -> ParseResult<Expr> {
        if self.in_ternary {
            let error = Self::error_at(&self.cur_token, ParseErrorKind::NestedTernary)
                .with_hint("wrap the inner ternary in parentheses");
            self.error(error);
        }

        self.with_ternary(true, |p| -> ParseResult<Expr> {
            p.next_token();
            let consequence = p.parse_expression(Precedence::Lowest)?;
            p.expect_peek(TokenKind::Colon)?;
            p.next_token();
            let alternative = p.parse_expression(Precedence::Ternary.lower())?;

            let span = condition.span.merge(alternative.span);
            Ok(Expr::new(
                ExprKind::Ternary {
                    condition: Box::new(condition),
                    consequence: Box::new(consequence),
                    alternative: Box::new(alternative),
                },
                span,
            ))
        })
    }

    // ==================== Grouping and Collections ====================

    /// `( expr )` yields the inner expression itself
    fn parse_grouped_expression(&mut self) -> ParseResult<Expr> {
        self.without_ternary(|p| -> ParseResult<Expr> {
            p.next_token();
            let expr = p.parse_expression(Precedence::Lowest)?;
            p.expect_peek(TokenKind::RParen)?;
            Ok(expr)
        })
    }

    /// Parse a comma-separated list up to `end`, with the current token on the
    /// opening delimiter. A trailing comma is allowed.
    ///
    /// A missing separator or closing delimiter is recorded and the elements
    /// parsed so far are returned.
    fn parse_expression_list(&mut self, end: TokenKind) -> ParseResult<Vec<Expr>> {
        self.without_ternary(|p| -> ParseResult<Vec<Expr>> {
            let mut list = Vec::new();
            if p.peek_is(end) {
                p.next_token();
                return Ok(list);
            }

            p.next_token();
            list.push(p.parse_expression(Precedence::Lowest)?);
            while p.peek_is(TokenKind::Comma) {
                p.next_token();
                if p.peek_is(end) {
                    break;
                }
                p.next_token();
                list.push(p.parse_expression(Precedence::Lowest)?);
            }

            if p.peek_is(end) {
                p.next_token();
            } else if !p.failed_at_cur() {
                let error =
                    p.unexpected_peek(ExpectedToken::OneOf(vec![TokenKind::Comma, end]));
                p.error(error);
            }
            Ok(list)
        })
    }

    fn parse_array_literal(&mut self) -> ParseResult<Expr> {
        let start = self.cur_token.span;
        let elements = self.parse_expression_list(TokenKind::RBracket)?;
        Ok(Expr::new(ExprKind::Array(elements), self.span_from(start)))
    }

    fn parse_hash_literal(&mut self) -> ParseResult<Expr> {
        let start = self.cur_token.span;
        self.without_ternary(|p| -> ParseResult<Expr> {
            let mut pairs = Vec::new();

            while !p.peek_is(TokenKind::RBrace) {
                p.next_token();
                let key = p.parse_expression(Precedence::Lowest)?;
                if !p.peek_is(TokenKind::Colon) {
                    if !p.failed_at_cur() {
                        let error = p.unexpected_peek(ExpectedToken::Token(TokenKind::Colon));
                        p.error(error);
                    }
                    return Ok(Expr::new(ExprKind::Hash(pairs), p.span_from(start)));
                }
                p.next_token();
                p.next_token();
                let value = p.parse_expression(Precedence::Lowest)?;
                pairs.push((key, value));

                if p.peek_is(TokenKind::Comma) {
                    p.next_token();
                } else if !p.peek_is(TokenKind::RBrace) {
                    if !p.failed_at_cur() {
                        let error = p.unexpected_peek(ExpectedToken::OneOf(vec![
                            TokenKind::Comma,
                            TokenKind::RBrace,
                        ]));
                        p.error(error);
                    }
                    return Ok(Expr::new(ExprKind::Hash(pairs), p.span_from(start)));
                }
            }
            p.next_token();

            Ok(Expr::new(ExprKind::Hash(pairs), p.span_from(start)))
        })
    }

    // ==================== Calls and Access ====================

    fn parse_call_expression(&mut self, callee: Expr) -> ParseResult<Expr> {
        let args = self.parse_expression_list(TokenKind::RParen)?;
        let span = self.span_from(callee.span);
        Ok(Expr::new(
            ExprKind::Call {
                callee: Box::new(callee),
                args,
            },
            span,
        ))
    }

    fn parse_method_call(&mut self, receiver: Expr) -> ParseResult<Expr> {
        let method = self.expect_ident()?;
        let args = if self.peek_is(TokenKind::LParen) {
            self.next_token();
            Some(self.parse_expression_list(TokenKind::RParen)?)
        } else {
            None
        };

        let span = self.span_from(receiver.span);
        Ok(Expr::new(
            ExprKind::MethodCall {
                receiver: Box::new(receiver),
                method,
                args,
            },
            span,
        ))
    }

    fn parse_index_expression(&mut self, collection: Expr) -> ParseResult<Expr> {
        let index = self.without_ternary(|p| -> ParseResult<Expr> {
            p.next_token();
            let index = p.parse_expression(Precedence::Lowest)?;
            p.expect_peek(TokenKind::RBracket)?;
            Ok(index)
        })?;

        let span = self.span_from(collection.span);
        Ok(Expr::new(
            ExprKind::Index {
                collection: Box::new(collection),
                index: Box::new(index),
            },
            span,
        ))
    }

    // ==================== Functions ====================

    /// `fn [name](params) { body }` or `function name(params) { body }`
    fn parse_function_literal(&mut self) -> ParseResult<Expr> {
        let start = self.cur_token.span;
        let name = if self.cur_is(TokenKind::Function) {
            Some(self.expect_ident()?)
        } else if self.peek_is(TokenKind::Ident) {
            self.next_token();
            Some(self.cur_ident())
        } else {
            None
        };

        self.expect_peek(TokenKind::LParen)?;
        let params = self.parse_function_params()?;
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block()?;

        Ok(Expr::new(
            ExprKind::Function(Function { name, params, body }),
            self.span_from(start),
        ))
    }

    /// Parse `a, b = default, ...)` with the current token on `(`
    fn parse_function_params(&mut self) -> ParseResult<Vec<Param>> {
        self.without_ternary(|p| -> ParseResult<Vec<Param>> {
            let mut params = Vec::new();
            if p.peek_is(TokenKind::RParen) {
                p.next_token();
                return Ok(params);
            }

            loop {
                let name = p.expect_ident()?;
                let default = if p.peek_is(TokenKind::Assign) {
                    p.next_token();
                    p.next_token();
                    Some(p.parse_expression(Precedence::Lowest)?)
                } else {
                    None
                };
                let span = p.span_from(name.span);
                params.push(Param::new(name, default, span));

                if !p.peek_is(TokenKind::Comma) {
                    break;
                }
                p.next_token();
                if p.peek_is(TokenKind::RParen) {
                    break;
                }
            }

            p.expect_peek(TokenKind::RParen)?;
            Ok(params)
        })
    }

    // ==================== Control Flow ====================

    /// Parse `( expr )` after a keyword, with the current token on the keyword
    fn parse_parenthesized_condition(&mut self) -> ParseResult<Expr> {
        self.expect_peek(TokenKind::LParen)?;
        self.without_ternary(|p| -> ParseResult<Expr> {
            p.next_token();
            let condition = p.parse_expression(Precedence::Lowest)?;
            p.expect_peek(TokenKind::RParen)?;
            Ok(condition)
        })
    }

    /// `if (cond) { ... } [else { ... } | else if ...]`
    fn parse_if_expression(&mut self) -> ParseResult<Expr> {
        let start = self.cur_token.span;
        let condition = self.parse_parenthesized_condition()?;
        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block()?;

        let alternative = if self.peek_is(TokenKind::Else) {
            self.next_token();
            if self.peek_is(TokenKind::If) {
                self.next_token();
                // `else if` chains recurse here without passing through `parse_expression`
                let else_if = self.with_depth(Self::parse_if_expression)?;
                Some(ElseBranch::ElseIf(Box::new(else_if)))
            } else {
                self.expect_peek(TokenKind::LBrace)?;
                Some(ElseBranch::Block(self.parse_block()?))
            }
        } else {
            None
        };

        Ok(Expr::new(
            ExprKind::If {
                condition: Box::new(condition),
                consequence,
                alternative,
            },
            self.span_from(start),
        ))
    }

    /// `for (cond) { body }`
    fn parse_for_loop(&mut self) -> ParseResult<Expr> {
        let start = self.cur_token.span;
        let condition = self.parse_parenthesized_condition()?;
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block()?;

        Ok(Expr::new(
            ExprKind::For {
                condition: Box::new(condition),
                body,
            },
            self.span_from(start),
        ))
    }

    /// `foreach [index,] value in iterable { body }`
    fn parse_foreach(&mut self) -> ParseResult<Expr> {
        let start = self.cur_token.span;
        let first = self.expect_ident()?;
        let (index, value) = if self.peek_is(TokenKind::Comma) {
            self.next_token();
            (Some(first), self.expect_ident()?)
        } else {
            (None, first)
        };

        // `in` is not reserved, so it arrives as an identifier
        if !(self.peek_is(TokenKind::Ident) && self.peek_token.literal == "in") {
            return Err(self.unexpected_peek(ExpectedToken::Description("'in'".to_string())));
        }
        self.next_token();
        self.next_token();

        let iterable = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block()?;

        Ok(Expr::new(
            ExprKind::Foreach {
                index,
                value,
                iterable: Box::new(iterable),
                body,
            },
            self.span_from(start),
        ))
    }

    /// `switch (subject) { case a, b { ... } default { ... } }`
    fn parse_switch(&mut self) -> ParseResult<Expr> {
        let start = self.cur_token.span;
        let subject = self.parse_parenthesized_condition()?;
        self.expect_peek(TokenKind::LBrace)?;

        let mut cases = Vec::new();
        let mut default = None;
        self.next_token();

        while !self.cur_is(TokenKind::RBrace) {
            match self.cur_token.kind {
                TokenKind::Eof => {
                    // A clause body cut off by end of input has already reported it
                    if !self.failed_at_cur() {
                        let error =
                            Self::error_at(&self.cur_token, ParseErrorKind::UnterminatedBlock)
                                .with_hint("add a closing '}' to the switch");
                        self.error(error);
                    }
                    break;
                }
                TokenKind::Case => cases.push(self.parse_case_clause()?),
                TokenKind::Default => {
                    let keyword = self.cur_token.clone();
                    self.expect_peek(TokenKind::LBrace)?;
                    let body = self.parse_block()?;
                    if default.is_some() {
                        self.error(Self::error_at(&keyword, ParseErrorKind::DuplicateDefault));
                    } else {
                        default = Some(body);
                    }
                }
                found => {
                    let error = Self::error_at(
                        &self.cur_token,
                        ParseErrorKind::UnexpectedToken {
                            found,
                            expected: ExpectedToken::OneOf(vec![
                                TokenKind::Case,
                                TokenKind::Default,
                                TokenKind::RBrace,
                            ]),
                        },
                    );
                    self.error(error);
                }
            }
            self.next_token();
        }

        Ok(Expr::new(
            ExprKind::Switch {
                subject: Box::new(subject),
                cases,
                default,
            },
            self.span_from(start),
        ))
    }

    /// `case e1, e2 { ... }` with the current token on `case`
    fn parse_case_clause(&mut self) -> ParseResult<CaseClause> {
        let start = self.cur_token.span;
        let values = self.without_ternary(|p| -> ParseResult<Vec<Expr>> {
            p.next_token();
            let mut values = vec![p.parse_expression(Precedence::Lowest)?];
            while p.peek_is(TokenKind::Comma) {
                p.next_token();
                p.next_token();
                values.push(p.parse_expression(Precedence::Lowest)?);
            }
            Ok(values)
        })?;

        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block()?;
        Ok(CaseClause {
            values,
            body,
            span: self.span_from(start),
        })
    }
}

fn infix_op(kind: TokenKind) -> Option<InfixOp> {
    let op = match kind {
        TokenKind::Plus => InfixOp::Add,
        TokenKind::Minus => InfixOp::Sub,
        TokenKind::Asterisk => InfixOp::Mul,
        TokenKind::Slash => InfixOp::Div,
        TokenKind::Mod => InfixOp::Mod,
        TokenKind::Pow => InfixOp::Pow,
        TokenKind::Eq => InfixOp::Eq,
        TokenKind::NotEq => InfixOp::NotEq,
        TokenKind::Lt => InfixOp::Lt,
        TokenKind::LtEquals => InfixOp::LtEq,
        TokenKind::Gt => InfixOp::Gt,
        TokenKind::GtEquals => InfixOp::GtEq,
        TokenKind::And => InfixOp::And,
        TokenKind::Or => InfixOp::Or,
        TokenKind::Contains => InfixOp::Contains,
        TokenKind::NotContains => InfixOp::NotContains,
        TokenKind::DotDot => InfixOp::Range,
        _ => return None,
    };
    Some(op)
}

/// Check flags and compile the pattern the way the evaluator will
fn validate_regexp(pattern: &str, flags: &str) -> Result<(), String> {
    if let Some(flag) = flags.chars().find(|c| !REGEXP_FLAGS.contains(*c)) {
        return Err(format!("unknown flag '{flag}'"));
    }

    let source = if flags.is_empty() {
        pattern.to_string()
    } else {
        format!("(?{flags}){pattern}")
    };
    Regex::new(&source).map(|_| ()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use crate::ast::{ElseBranch, ExprKind, Literal};
    use crate::lexer::TokenKind;
    use crate::parser::ParseErrorKind;
    use crate::testutil::{expr_string, parse_errors, parse_expr, parse_ok};

    #[test]
    fn operator_precedence() {
        let cases = [
            ("a + b * c", "(a + (b * c))"),
            ("a * b + c", "((a * b) + c)"),
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b - c", "((a + b) - c)"),
            ("a - b - c", "((a - b) - c)"),
            ("a ** b ** c", "((a ** b) ** c)"),
            ("a % b ** c", "((a % b) ** c)"),
            ("a ** b % c", "(a ** (b % c))"),
            ("a + b % c", "(a + (b % c))"),
            ("a < b == c > d", "((a < b) == (c > d))"),
            ("a =~ /x/ == true", "((a =~ /x/) == true)"),
            ("a && b || c", "((a && b) || c)"),
            ("a == b && c != d", "((a == b) && (c != d))"),
            ("1 + 2..5", "(1 + (2 .. 5))"),
            ("a + b(c) * d", "(a + (b(c) * d))"),
            ("a * [1, 2][b]", "(a * ([1, 2][b]))"),
            ("-a[0]", "(-(a[0]))"),
            ("(a + b) * c", "((a + b) * c)"),
        ];
        for (source, expected) in cases {
            assert_eq!(expr_string(source), expected, "source: {source}");
        }
    }

    #[test]
    fn literals() {
        assert_eq!(parse_expr("42").kind, ExprKind::Literal(Literal::Int(42)));
        assert_eq!(parse_expr("2.5").kind, ExprKind::Literal(Literal::Float(2.5)));
        assert_eq!(parse_expr("true").kind, ExprKind::Literal(Literal::Bool(true)));
        assert_eq!(parse_expr("false").kind, ExprKind::Literal(Literal::Bool(false)));
        assert_eq!(parse_expr("null").kind, ExprKind::Literal(Literal::Null));
        assert_eq!(
            parse_expr(r#""a\tb""#).kind,
            ExprKind::Literal(Literal::String("a\tb".into()))
        );
        assert_eq!(
            parse_expr("`uptime`").kind,
            ExprKind::Backtick("uptime".into())
        );
        assert_eq!(
            parse_expr("/a+b/i").kind,
            ExprKind::Regexp {
                pattern: "a+b".into(),
                flags: "i".into()
            }
        );
    }

    #[test]
    fn integer_overflow_is_an_error() {
        let errors = parse_errors("let x = 99999999999999999999;");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0].kind, ParseErrorKind::InvalidInteger(_)));
    }

    #[test]
    fn invalid_regexps() {
        let errors = parse_errors("x =~ /a(/");
        assert!(matches!(errors[0].kind, ParseErrorKind::InvalidRegexp(_)));

        let errors = parse_errors("x =~ /a/q");
        assert_eq!(
            errors[0].kind,
            ParseErrorKind::InvalidRegexp("unknown flag 'q'".into())
        );

        parse_ok("x =~ /^a.b$/imsxU");
    }

    #[test]
    fn postfix_operators() {
        assert_eq!(expr_string("a++ + b"), "((a++) + b)");
        assert_eq!(expr_string("a[0]--"), "((a[0])--)");
        assert_eq!(expr_string("f()++"), "(f()++)");
        assert_eq!(expr_string("-a++"), "(-(a++))");
    }

    #[test]
    fn postfix_must_follow_operand() {
        let (program, errors) = crate::parse("a++++;");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].kind,
            ParseErrorKind::InvalidPostfix(TokenKind::PlusPlus)
        );
        assert_eq!(program.to_string(), "(a++);");
    }

    #[test]
    fn assignment() {
        assert_eq!(expr_string("a = b = c"), "(a = (b = c))");
        assert_eq!(expr_string("x = a || b"), "(x = (a || b))");
        assert_eq!(expr_string("x += 1"), "(x += 1)");
        assert_eq!(expr_string("a[i] *= 2"), "((a[i]) *= 2)");
        assert_eq!(expr_string("x /= y - 1"), "(x /= (y - 1))");
    }

    #[test]
    fn invalid_assignment_target_still_builds_node() {
        let (program, errors) = crate::parse("1 = 2;");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].kind,
            ParseErrorKind::InvalidAssignmentTarget("1".into())
        );
        assert_eq!(program.to_string(), "(1 = 2);");

        let errors = parse_errors("a++ = 1;");
        assert!(matches!(
            errors[0].kind,
            ParseErrorKind::InvalidAssignmentTarget(_)
        ));
    }

    #[test]
    fn ternary() {
        assert_eq!(expr_string("a ? b : c"), "(a ? b : c)");
        assert_eq!(expr_string("a == 1 ? b + 1 : c * 2"), "((a == 1) ? (b + 1) : (c * 2))");
        assert_eq!(expr_string("x = a ? b : c"), "(x = (a ? b : c))");
        assert_eq!(expr_string("a ? (b ? c : d) : e"), "(a ? (b ? c : d) : e)");
        assert_eq!(expr_string("a ? b : (c ? d : e)"), "(a ? b : (c ? d : e))");
        assert_eq!(expr_string("a ? f(b ? c : d) : e"), "(a ? f((b ? c : d)) : e)");
    }

    #[test]
    fn nested_ternary_is_rejected_once() {
        let errors = parse_errors("a ? b ? c : d : e;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::NestedTernary);

        let errors = parse_errors("a ? b : c ? d : e;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::NestedTernary);
    }

    #[test]
    fn ternary_flag_is_restored_after_errors() {
        let (program, errors) = crate::parse("a ? b; x ? y : z;");
        assert_eq!(errors.len(), 1, "got {errors:?}");
        assert_eq!(program.to_string(), "(x ? y : z);");
    }

    #[test]
    fn calls_and_methods() {
        assert_eq!(expr_string("add(1, 2 * 3, f(x))"), "add(1, (2 * 3), f(x))");
        assert_eq!(expr_string("f(1, 2,)"), "f(1, 2)");
        assert_eq!(expr_string("f()"), "f()");
        assert_eq!(expr_string("s.upper()"), "s.upper()");
        assert_eq!(expr_string("s.len"), "s.len");
        assert_eq!(expr_string("a.b(1).c"), "a.b(1).c");
        assert_eq!(expr_string("5.str()"), "5.str()");
        assert_eq!(expr_string("fn(x) { x }(2)"), "fn(x) { x; }(2)");
    }

    #[test]
    fn collections() {
        assert_eq!(expr_string("[1, 2 + 3, \"x\"]"), "[1, (2 + 3), \"x\"]");
        assert_eq!(expr_string("[]"), "[]");
        assert_eq!(expr_string("[1, 2,]"), "[1, 2]");
        // At statement start `{` opens a block, so hashes are grouped here
        assert_eq!(expr_string("({\"a\": 1, b: 2 + 3,})"), "{\"a\": 1, b: (2 + 3)}");
        assert_eq!(expr_string("({})"), "{}");
        assert_eq!(expr_string("a[1 + 1]"), "(a[(1 + 1)])");
    }

    #[test]
    fn partial_collections_are_kept() {
        let (program, errors) = crate::parse("let a = [1, 2; let h = {1: 2 3};");
        assert!(errors.len() >= 2, "got {errors:?}");
        assert_eq!(program.to_string(), "let a = [1, 2];\nlet h = {1: 2};");

        let errors = parse_errors("let h = {1 2};");
        assert!(matches!(
            errors[0].kind,
            ParseErrorKind::UnexpectedToken {
                found: TokenKind::Int,
                ..
            }
        ));
    }

    #[test]
    fn function_literals() {
        assert_eq!(expr_string("fn() { }"), "fn() { }");
        assert_eq!(expr_string("fn(a, b) { a + b }"), "fn(a, b) { (a + b); }");
        assert_eq!(expr_string("fn add(a, b = 2,) { return a + b; }"), "fn add(a, b = 2) { return (a + b); }");
        assert_eq!(expr_string("function greet(name = \"x\") { name }"), "fn greet(name = \"x\") { name; }");

        let ExprKind::Function(func) = parse_expr("fn f(a, b = 1) {}").kind else {
            panic!("expected a function literal");
        };
        assert_eq!(func.name.map(|n| n.name), Some("f".to_string()));
        assert_eq!(func.params.len(), 2);
        assert!(func.params[0].default.is_none());
        assert!(func.params[1].default.is_some());
    }

    #[test]
    fn named_function_requires_name() {
        let errors = parse_errors("function (a) { a }");
        assert!(matches!(
            errors[0].kind,
            ParseErrorKind::UnexpectedToken {
                found: TokenKind::LParen,
                ..
            }
        ));
    }

    #[test]
    fn if_else_chains() {
        assert_eq!(
            expr_string("if (a < b) { a } else { b }"),
            "if ((a < b)) { a; } else { b; }"
        );
        assert_eq!(expr_string("if (x) { 1 }"), "if (x) { 1; }");

        let ExprKind::If { alternative, .. } =
            parse_expr("if (a) { 1 } else if (b) { 2 } else { 3 }").kind
        else {
            panic!("expected an if expression");
        };
        let Some(ElseBranch::ElseIf(inner)) = alternative else {
            panic!("expected an else-if branch");
        };
        assert!(matches!(
            inner.kind,
            ExprKind::If {
                alternative: Some(ElseBranch::Block(_)),
                ..
            }
        ));
    }

    #[test]
    fn loops() {
        assert_eq!(expr_string("for (i < 10) { i++ }"), "for ((i < 10)) { (i++); }");
        assert_eq!(
            expr_string("foreach item in items { puts(item) }"),
            "foreach item in items { puts(item); }"
        );
        assert_eq!(
            expr_string("foreach i, x in [1, 2] { x }"),
            "foreach i, x in [1, 2] { x; }"
        );
        assert_eq!(
            expr_string("foreach x in 1..10 { x }"),
            "foreach x in (1 .. 10) { x; }"
        );
    }

    #[test]
    fn foreach_requires_in() {
        let errors = parse_errors("foreach x of items { }");
        assert!(matches!(
            errors[0].kind,
            ParseErrorKind::UnexpectedToken {
                found: TokenKind::Ident,
                ..
            }
        ));
    }

    #[test]
    fn switch_statements() {
        assert_eq!(
            expr_string("switch (x) { case 1, 2 { a } case \"b\" { b } default { c } }"),
            "switch (x) { case 1, 2 { a; } case \"b\" { b; } default { c; } }"
        );
        assert_eq!(expr_string("switch (x) { }"), "switch (x) { }");
    }

    #[test]
    fn switch_duplicate_default() {
        let (program, errors) = crate::parse("switch (x) { default { 1 } default { 2 } }");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::DuplicateDefault);
        assert_eq!(program.to_string(), "switch (x) { default { 1; } };");
    }

    #[test]
    fn switch_skips_stray_tokens() {
        let (program, errors) = crate::parse("switch (x) { oops case 1 { a } }");
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0].kind,
            ParseErrorKind::UnexpectedToken {
                found: TokenKind::Ident,
                ..
            }
        ));
        assert_eq!(program.to_string(), "switch (x) { case 1 { a; } };");
    }

    #[test]
    fn switch_cut_off_inside_case_reports_once() {
        let errors = parse_errors("switch (x) { case 1 { a ");
        assert_eq!(errors.len(), 1, "got {errors:?}");
        assert_eq!(errors[0].kind, ParseErrorKind::UnterminatedBlock);

        let errors = parse_errors("switch (x) { case 1 { a }");
        assert_eq!(errors.len(), 1, "got {errors:?}");
        assert_eq!(errors[0].kind, ParseErrorKind::UnterminatedBlock);
    }

    #[test]
    fn broken_input_in_prefix_position() {
        let errors = parse_errors("let x = ");
        assert_eq!(errors[0].kind, ParseErrorKind::UnexpectedEof);

        let errors = parse_errors("let x = @;");
        assert_eq!(errors[0].kind, ParseErrorKind::IllegalToken("@".into()));

        let errors = parse_errors("let x = \"open");
        assert_eq!(errors[0].kind, ParseErrorKind::IllegalToken("\"open".into()));
    }

    #[test]
    fn missing_prefix_function() {
        let errors = parse_errors("let x = *;");
        assert_eq!(errors[0].kind, ParseErrorKind::NoPrefixParseFn(TokenKind::Asterisk));
        assert_eq!(
            errors[0].to_string(),
            "no prefix parse function for * at line 1, column 9"
        );
    }
}
