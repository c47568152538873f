//! hilt parser: converts a token stream into a template AST.

mod parse_expr;
mod parser;

pub use parser::Parser;

use hilt_lexer::Lexer;
use hilt_types::{ast::Template, Result};

/// Lex and parse template text in one step.
pub fn parse(source: &str) -> Result<Template> {
    let tokens = Lexer::new(source).lex()?;
    Parser::new(tokens).parse()
}
