//! Core template lexer: converts template text to a token stream.
//!
//! Features:
//! - Literal text outside `${...}` is emitted as [`TokenKind::Text`] runs
//! - `$${` in literal text is an escape for a literal `${`
//! - Inside a span: identifiers, quoted strings, numbers, `true`/`false`,
//!   punctuation and arithmetic operators; whitespace (including newlines)
//!   is skipped
//! - The first `}` outside a string literal closes the span
//! - Fails fast: the first malformed lexeme is returned as a syntax error

use hilt_types::{Result, Span, TemplateError};

use crate::token::{Token, TokenKind};

/// Lexer mode. Tracks whether we're scanning document text or the inside
/// of an expression span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Literal document text.
    Text,
    /// Inside `${...}`. Carries the span of the opening `${` so an
    /// unterminated span can be reported where it started.
    Interpolation { opened: Span },
}

/// The template lexer.
///
/// Converts template text into a vector of [`Token`]s ending with
/// [`TokenKind::Eof`].
pub struct Lexer<'src> {
    /// The full template text.
    source: &'src str,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based, in characters).
    col: u32,
    mode: Mode,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer over template text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            col: 1,
            mode: Mode::Text,
        }
    }

    /// Lex the entire template into a token stream.
    pub fn lex(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            match self.mode {
                Mode::Text => {
                    if self.at_end() {
                        break;
                    }
                    self.scan_text(&mut tokens);
                }
                Mode::Interpolation { opened } => {
                    self.skip_whitespace();
                    if self.at_end() {
                        return Err(TemplateError::syntax(
                            "unclosed '${': expected '}'",
                            opened,
                        ));
                    }
                    let token = self.scan_expression_token()?;
                    if token.kind == TokenKind::InterpolationEnd {
                        self.mode = Mode::Text;
                    }
                    tokens.push(token);
                }
            }
        }

        tokens.push(Token::new(TokenKind::Eof, self.current_span()));
        tracing::trace!(tokens = tokens.len(), "lexed template");
        Ok(tokens)
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn token_from(&self, kind: TokenKind, start_line: u32, start_col: u32) -> Token {
        Token::new(kind, self.span_from(start_line, start_col))
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Document text
    // ─────────────────────────────────────────────────────────────

    /// Scan literal text up to the next `${` or end of input.
    ///
    /// Pushes a `Text` token for any non-empty run, followed by an
    /// `InterpolationStart` if a span was opened.
    fn scan_text(&mut self, tokens: &mut Vec<Token>) {
        let start_line = self.line;
        let start_col = self.col;
        let mut buf = String::new();
        let mut opened = None;

        while let Some(ch) = self.peek() {
            if ch == '$' && self.peek_at(1) == Some('$') && self.peek_at(2) == Some('{') {
                // `$${` → literal `${`
                self.advance();
                self.advance();
                self.advance();
                buf.push_str("${");
            } else if ch == '$' && self.peek_at(1) == Some('{') {
                let line = self.line;
                let col = self.col;
                self.advance(); // consume '$'
                self.advance(); // consume '{'
                opened = Some(self.span_from(line, col));
                break;
            } else {
                self.advance();
                buf.push(ch);
            }
        }

        if !buf.is_empty() {
            tokens.push(Token::new(
                TokenKind::Text(buf),
                Span::new(start_line, start_col, self.line, self.col),
            ));
        }
        if let Some(span) = opened {
            self.mode = Mode::Interpolation { opened: span };
            tokens.push(Token::new(TokenKind::InterpolationStart, span));
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Expression spans
    // ─────────────────────────────────────────────────────────────

    /// Scan one token inside `${...}`. Whitespace has already been skipped.
    fn scan_expression_token(&mut self) -> Result<Token> {
        let start_line = self.line;
        let start_col = self.col;
        let Some(ch) = self.advance() else {
            return Ok(Token::new(TokenKind::Eof, self.current_span()));
        };

        match ch {
            '}' => Ok(self.token_from(TokenKind::InterpolationEnd, start_line, start_col)),
            '(' => Ok(self.token_from(TokenKind::LParen, start_line, start_col)),
            ')' => Ok(self.token_from(TokenKind::RParen, start_line, start_col)),
            ',' => Ok(self.token_from(TokenKind::Comma, start_line, start_col)),
            '+' => Ok(self.token_from(TokenKind::Plus, start_line, start_col)),
            '-' => Ok(self.token_from(TokenKind::Minus, start_line, start_col)),
            '*' => Ok(self.token_from(TokenKind::Star, start_line, start_col)),
            '/' => Ok(self.token_from(TokenKind::Slash, start_line, start_col)),
            '%' => Ok(self.token_from(TokenKind::Percent, start_line, start_col)),

            '\'' | '"' => self.scan_string(ch, start_line, start_col),

            '0'..='9' => self.scan_number(start_line, start_col),

            c if c.is_alphabetic() || c == '_' => {
                Ok(self.scan_identifier(c, start_line, start_col))
            }

            _ => Err(TemplateError::syntax(
                format!("unexpected character '{ch}'"),
                Span::point(start_line, start_col),
            )),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Number literals
    // ─────────────────────────────────────────────────────────────

    fn scan_number(&mut self, start_line: u32, start_col: u32) -> Result<Token> {
        // We already consumed the first (ASCII) digit
        let start = self.pos - 1;
        while let Some('0'..='9') = self.peek() {
            self.advance();
        }

        let mut is_float = false;
        if self.peek() == Some('.') && matches!(self.peek_at(1), Some('0'..='9')) {
            is_float = true;
            self.advance(); // consume '.'
            while let Some('0'..='9') = self.peek() {
                self.advance();
            }
        }

        let span = self.span_from(start_line, start_col);
        let text = &self.source[start..self.pos];
        let kind = if is_float {
            let value = text.parse::<f64>().map_err(|_| {
                TemplateError::syntax(format!("invalid number literal '{text}'"), span)
            })?;
            TokenKind::FloatLiteral(value)
        } else {
            let value = text.parse::<i64>().map_err(|_| {
                TemplateError::syntax(format!("integer literal '{text}' is out of range"), span)
            })?;
            TokenKind::IntLiteral(value)
        };

        Ok(Token::new(kind, span))
    }

    // ─────────────────────────────────────────────────────────────
    // Identifiers & keywords
    // ─────────────────────────────────────────────────────────────

    fn scan_identifier(&mut self, first: char, start_line: u32, start_col: u32) -> Token {
        let start = self.pos - first.len_utf8();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let span = self.span_from(start_line, start_col);
        let text = &self.source[start..self.pos];
        let kind = TokenKind::from_keyword(text)
            .unwrap_or_else(|| TokenKind::Identifier(text.to_string()));

        Token::new(kind, span)
    }

    // ─────────────────────────────────────────────────────────────
    // String literals
    // ─────────────────────────────────────────────────────────────

    /// Scan a string literal after the opening quote.
    fn scan_string(&mut self, quote: char, start_line: u32, start_col: u32) -> Result<Token> {
        let mut buf = String::new();

        loop {
            match self.advance() {
                None => {
                    return Err(TemplateError::syntax(
                        "unterminated string literal",
                        Span::point(start_line, start_col),
                    ));
                }
                Some(ch) if ch == quote => {
                    return Ok(Token::new(
                        TokenKind::StringLiteral(buf),
                        self.span_from(start_line, start_col),
                    ));
                }
                Some('\\') => buf.push(self.scan_escape_sequence(start_line, start_col)?),
                Some(ch) => buf.push(ch),
            }
        }
    }

    /// Scan an escape sequence after consuming the `\`.
    fn scan_escape_sequence(&mut self, string_line: u32, string_col: u32) -> Result<char> {
        let line = self.line;
        let col = self.col.saturating_sub(1);

        match self.advance() {
            Some('\\') => Ok('\\'),
            Some('\'') => Ok('\''),
            Some('"') => Ok('"'),
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some(ch) => Err(TemplateError::syntax(
                format!("invalid escape sequence '\\{ch}'"),
                Span::new(line, col, self.line, self.col.saturating_sub(1)),
            )),
            None => Err(TemplateError::syntax(
                "unterminated string literal",
                Span::point(string_line, string_col),
            )),
        }
    }
}
