//! Lexer for the Monkey programming language
//!
//! The lexer converts source code into a stream of tokens, one per call to
//! [`Lexer::next_token`], handling:
//! - Keywords, identifiers, and operators (matched by logos)
//! - Integer and float literals, including malformed trailing-dot numbers
//! - String literals with escapes, raw backtick literals
//! - Regexp literals, told apart from division by the previous token
//! - Comments (`//`, `#` and `/* ... */`)
//! - Line/column tracking for every token

#![allow(clippy::cast_possible_truncation)] // We intentionally use u32 for spans; files > 4GB are unsupported

mod span;
mod token;

pub use span::{LineIndex, Position, Span};
pub use token::TokenKind;

use log::trace;
use logos::Logos;

/// A token with its kind, source text and location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The exact source text of the token, delimiters included
    pub literal: String,
    /// Byte range in the source
    pub span: Span,
    /// Line and column of the first character
    pub position: Position,
}

impl Token {
    /// Create a new token
    #[must_use]
    pub fn new(
        kind: TokenKind,
        literal: impl Into<String>,
        span: Span,
        position: Position,
    ) -> Self {
        Self {
            kind,
            literal: literal.into(),
            span,
            position,
        }
    }
}

/// The Monkey lexer
pub struct Lexer<'source> {
    source: &'source str,
    /// Current position in the source (byte offset), never past `source.len()`
    position: usize,
    line_index: LineIndex,
    /// Kind of the last token handed out, used to tell `/` from a regexp
    prev_kind: Option<TokenKind>,
}

impl<'source> Lexer<'source> {
    /// Create a new lexer for the given source code
    #[must_use]
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            position: 0,
            line_index: LineIndex::new(source),
            prev_kind: None,
        }
    }

    /// Tokenize the entire source, returning every token up to and including EOF
    #[must_use]
    pub fn tokenize(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens: Vec<Token> = lexer.by_ref().collect();
        tokens.push(lexer.next_token());
        tokens
    }

    /// The source text being lexed
    #[must_use]
    pub fn source(&self) -> &'source str {
        self.source
    }

    /// Get the next token. Returns EOF forever once the input is exhausted.
    pub fn next_token(&mut self) -> Token {
        let token = self.scan();
        if token.kind == TokenKind::Illegal {
            trace!("illegal token {:?} at {}", token.literal, token.position);
        }
        self.prev_kind = Some(token.kind);
        token
    }

    fn scan(&mut self) -> Token {
        if self.position >= self.source.len() {
            return self.eof();
        }

        let remaining = &self.source[self.position..];
        let mut logos_lexer = TokenKind::lexer(remaining);

        match logos_lexer.next() {
            Some(Ok(kind)) => {
                let span_range = logos_lexer.span();
                // span_range is relative to remaining slice, accounting for skipped trivia
                let start = self.position + span_range.start;
                let end = self.position + span_range.end;

                match kind {
                    TokenKind::String => self.scan_string(start),
                    TokenKind::Backtick => self.scan_backtick(start),
                    TokenKind::Int | TokenKind::Float => self.scan_number(start),
                    TokenKind::Slash | TokenKind::SlashEquals if !self.division_allowed() => {
                        self.scan_regexp(start)
                    }
                    TokenKind::Slash if self.source[end..].starts_with('*') => {
                        self.unterminated_comment(start)
                    }
                    _ => {
                        self.position = end;
                        self.token(kind, start, end)
                    }
                }
            }
            Some(Err(())) => {
                let start = self.position + logos_lexer.span().start;
                let rest = &self.source[start..];
                if rest.starts_with("/*") {
                    return self.unterminated_comment(start);
                }
                if rest.starts_with(|c: char| c.is_ascii_digit()) {
                    return self.scan_number(start);
                }

                // Error recovery: emit the offending character and move past it
                let char_len = rest.chars().next().map_or(1, char::len_utf8);
                let end = start + char_len;
                self.position = end;
                self.token(TokenKind::Illegal, start, end)
            }
            None => {
                // Only trivia was left
                self.position = self.source.len();
                self.eof()
            }
        }
    }

    fn division_allowed(&self) -> bool {
        self.prev_kind.is_some_and(TokenKind::ends_value)
    }

    /// Scan an integer or float starting at `start`.
    ///
    /// `5.` not followed by a digit, a second `.` or an identifier is illegal;
    /// `1..5` and `5.len()` keep the integer intact.
    fn scan_number(&mut self, start: usize) -> Token {
        let bytes = self.source.as_bytes();
        let mut end = start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }

        let mut kind = TokenKind::Int;
        if bytes.get(end) == Some(&b'.') {
            match bytes.get(end + 1) {
                Some(b) if b.is_ascii_digit() => {
                    end += 1;
                    while end < bytes.len() && bytes[end].is_ascii_digit() {
                        end += 1;
                    }
                    kind = TokenKind::Float;
                }
                Some(b) if *b == b'.' || b.is_ascii_alphabetic() || *b == b'_' => {}
                _ => {
                    end += 1;
                    kind = TokenKind::Illegal;
                }
            }
        }

        self.position = end;
        self.token(kind, start, end)
    }

    /// Scan a string literal whose opening quote is at `start`
    fn scan_string(&mut self, start: usize) -> Token {
        let mut chars = self.source[start + 1..].char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    chars.next();
                }
                '"' => {
                    let end = start + 1 + i + 1;
                    self.position = end;
                    return self.token(TokenKind::String, start, end);
                }
                _ => {}
            }
        }
        self.unterminated(start)
    }

    /// Scan a backtick literal whose opening backtick is at `start`
    fn scan_backtick(&mut self, start: usize) -> Token {
        match self.source[start + 1..].find('`') {
            Some(i) => {
                let end = start + 1 + i + 1;
                self.position = end;
                self.token(TokenKind::Backtick, start, end)
            }
            None => self.unterminated(start),
        }
    }

    /// Scan a regexp literal whose opening slash is at `start`.
    ///
    /// A regexp may not span lines; an unterminated one becomes an illegal
    /// token up to the end of the line.
    fn scan_regexp(&mut self, start: usize) -> Token {
        let body = &self.source[start + 1..];
        let mut chars = body.char_indices();
        let mut close = None;
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some((_, '\n')) | None => break,
                    Some(_) => {}
                },
                '\n' => break,
                '/' => {
                    close = Some(start + 1 + i);
                    break;
                }
                _ => {}
            }
        }

        let Some(close) = close else {
            let end = body
                .find('\n')
                .map_or(self.source.len(), |i| start + 1 + i);
            self.position = end;
            return self.token(TokenKind::Illegal, start, end);
        };

        let flags_len = self.source[close + 1..]
            .bytes()
            .take_while(u8::is_ascii_alphabetic)
            .count();
        let end = close + 1 + flags_len;
        self.position = end;
        self.token(TokenKind::Regexp, start, end)
    }

    /// The rest of the input after an opening `/*` that is never closed
    fn unterminated_comment(&mut self, start: usize) -> Token {
        self.unterminated(start)
    }

    fn unterminated(&mut self, start: usize) -> Token {
        self.position = self.source.len();
        self.token(TokenKind::Illegal, start, self.source.len())
    }

    fn eof(&self) -> Token {
        let end = self.source.len();
        self.token(TokenKind::Eof, end, end)
    }

    fn token(&self, kind: TokenKind, start: usize, end: usize) -> Token {
        Token::new(
            kind,
            &self.source[start..end],
            Span::from_range(start..end),
            self.line_index.position(self.source, start as u32),
        )
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

/// Decode the value of a string literal token, given its full source text.
///
/// Supports `\n`, `\t`, `\r`, `\"` and `\\`; any other escape keeps its
/// backslash.
#[must_use]
pub fn decode_string(literal: &str) -> String {
    let body = literal.strip_prefix('"').unwrap_or(literal);
    let body = body.strip_suffix('"').unwrap_or(body);

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Split a regexp literal token (`/pattern/flags`) into its pattern and
/// flags. `\/` in the pattern becomes `/`; other escapes are left for the
/// regexp engine.
#[must_use]
pub fn decode_regexp(literal: &str) -> (String, String) {
    let body = literal.strip_prefix('/').unwrap_or(literal);
    let (raw, flags) = body.rsplit_once('/').unwrap_or((body, ""));

    let mut pattern = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('/') => pattern.push('/'),
                Some(other) => {
                    pattern.push('\\');
                    pattern.push(other);
                }
                None => pattern.push('\\'),
            }
        } else {
            pattern.push(c);
        }
    }
    (pattern, flags.to_string())
}
