//! Core parser infrastructure: token cursor, error helpers, and the
//! document-level loop that splits text segments from expression spans.

use hilt_lexer::token::{Token, TokenKind};
use hilt_types::ast::{Expr, Segment, Template};
use hilt_types::{Result, Span, TemplateError};

/// The template parser.
///
/// Consumes a token stream produced by the lexer and builds a
/// [`Template`]. Stops at the first error.
pub struct Parser {
    /// The token stream, always ending with `Eof`.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Current expression nesting depth.
    pub(crate) expr_depth: u32,
}

impl Parser {
    /// Create a new parser from a token stream.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            let span = tokens.last().map_or(Span::point(1, 1), |t| t.span);
            tokens.push(Token::new(TokenKind::Eof, span));
        }
        Self {
            tokens,
            pos: 0,
            expr_depth: 0,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Check if the current token matches the given kind exactly.
    pub(crate) fn check_exact(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check_exact(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Expect a specific token kind. Returns the token if matched.
    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Result<Token> {
        if self.check_exact(expected) {
            Ok(self.advance())
        } else {
            Err(self.error_at_current(format!(
                "expected '{}', got '{}'",
                expected,
                self.peek_kind()
            )))
        }
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Build a syntax error at the current token position.
    pub(crate) fn error_at_current(&self, message: impl Into<String>) -> TemplateError {
        TemplateError::syntax(message, self.current_span())
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the token stream into a [`Template`].
    pub fn parse(mut self) -> Result<Template> {
        let mut segments = Vec::new();

        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::Text(text) => segments.push(Segment::Text(text)),
                TokenKind::InterpolationStart => {
                    let expr = self.parse_span(token.span)?;
                    segments.push(Segment::Expr(expr));
                }
                TokenKind::Eof => break,
                other => {
                    return Err(TemplateError::syntax(
                        format!("unexpected '{other}' outside an expression"),
                        token.span,
                    ));
                }
            }
        }

        tracing::trace!(segments = segments.len(), "parsed template");
        Ok(Template { segments })
    }

    /// Parse the inside of one `${...}` span, including the closing `}`.
    ///
    /// A span holds exactly one expression; anything left before the `}` is
    /// an error.
    fn parse_span(&mut self, opened: Span) -> Result<Expr> {
        if self.check_exact(&TokenKind::InterpolationEnd) {
            return Err(TemplateError::syntax("empty expression", opened));
        }
        let expr = self.parse_expression()?;
        if !self.eat(&TokenKind::InterpolationEnd) {
            return Err(self.error_at_current(format!(
                "expected '}}' after expression, got '{}'",
                self.peek_kind()
            )));
        }
        Ok(expr)
    }
}
