//! Shared types for the hilt template engine.
//!
//! This crate defines the runtime value model, the AST produced by the
//! parser, source spans, and the error type used by every stage.

mod error;
mod span;
mod value;
pub mod ast;

pub use error::{Arity, ErrorCategory, TemplateError};
pub use span::Span;
pub use value::{TypeTag, Value};

/// Result type used throughout the template engine.
pub type Result<T> = std::result::Result<T, TemplateError>;
