//! Token types for the template lexer.
//!
//! Defines [`TokenKind`] covering every lexeme a template can contain and
//! [`Token`], which pairs a kind with a source [`Span`].

use hilt_types::Span;
use std::fmt;

/// Words the lexer turns into dedicated tokens instead of identifiers.
pub const ALL_KEYWORDS: &[&str] = &["true", "false"];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Source location.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every token kind in a template.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Document structure ───────────────────────────────────

    /// A run of literal text outside any `${...}` span, already unescaped.
    Text(String),
    /// The `${` that opens an expression span.
    InterpolationStart,
    /// The `}` that closes an expression span.
    InterpolationEnd,

    // ── Literals ─────────────────────────────────────────────

    /// Single- or double-quoted string: `'abc'`, `"abc"`
    StringLiteral(String),
    /// Integer literal: `42`
    IntLiteral(i64),
    /// Decimal literal: `1.5`
    FloatLiteral(f64),
    /// `true`
    True,
    /// `false`
    False,

    // ── Identifiers ──────────────────────────────────────────

    /// Variable or function name: `region`, `env`
    Identifier(String),

    // ── Punctuation ──────────────────────────────────────────

    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,

    // ── Operators ────────────────────────────────────────────

    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,

    /// End of input.
    Eof,
}

impl TokenKind {
    /// Look up a keyword by its source text.
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        match s {
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Text(_) => f.write_str("text"),
            TokenKind::InterpolationStart => f.write_str("${"),
            TokenKind::InterpolationEnd => f.write_str("}"),
            TokenKind::StringLiteral(s) => write!(f, "{s:?}"),
            TokenKind::IntLiteral(n) => write!(f, "{n}"),
            TokenKind::FloatLiteral(n) => write!(f, "{n}"),
            TokenKind::True => f.write_str("true"),
            TokenKind::False => f.write_str("false"),
            TokenKind::Identifier(s) => f.write_str(s),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::Percent => f.write_str("%"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}
