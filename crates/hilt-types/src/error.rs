use crate::{Span, TypeTag};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error category, derived from the error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// Malformed template text.
    Syntax,
    /// A name missing from the scope.
    Scope,
    /// Call-site arity or type mismatch.
    Argument,
    /// Failure reported by a function's own logic.
    Callback,
    /// A value that cannot be placed in the output, or a broken return contract.
    Result,
    /// Operator applied to unsuitable operands.
    Arithmetic,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Scope => write!(f, "scope"),
            Self::Argument => write!(f, "argument"),
            Self::Callback => write!(f, "callback"),
            Self::Result => write!(f, "result"),
            Self::Arithmetic => write!(f, "arithmetic"),
        }
    }
}

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn admits(self, count: usize) -> bool {
        match self {
            Self::Exact(n) => count == n,
            Self::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Every failure the template engine can report.
///
/// The `Display` output is the user-visible message; tooling that needs
/// structure should serialize the error instead of parsing the string.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TemplateError {
    #[error("{span}: {message}")]
    Syntax { message: String, span: Span },

    #[error("{span}: unknown variable accessed: {name}")]
    UnknownVariable { name: String, span: Span },

    #[error("{span}: unknown function called: {name}")]
    UnknownFunction { name: String, span: Span },

    #[error("{span}: {function}: expected {expected} arguments, got {got}")]
    ArgumentCount {
        function: String,
        expected: Arity,
        got: usize,
        span: Span,
    },

    /// `index` is 0-based; the message counts from 1.
    #[error("{span}: {function}: argument {} should be {expected}, got {got}", .index + 1)]
    ArgumentType {
        function: String,
        index: usize,
        expected: TypeTag,
        got: TypeTag,
        span: Span,
    },

    #[error("{function}: {message}")]
    Callback {
        function: String,
        message: String,
        span: Span,
    },

    #[error("{span}: expression of type {got} cannot be rendered as text")]
    ResultType { got: TypeTag, span: Span },

    #[error("{span}: {function}: declared return type {expected}, callback returned {got}")]
    ReturnType {
        function: String,
        expected: TypeTag,
        got: TypeTag,
        span: Span,
    },

    #[error("{span}: {message}")]
    Arithmetic { message: String, span: Span },

    #[error("invalid value for variable {name}: {reason}")]
    InvalidVariable { name: String, reason: String },
}

impl TemplateError {
    /// Shorthand for a syntax error.
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::Syntax {
            message: message.into(),
            span,
        }
    }

    /// Get the category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Syntax { .. } => ErrorCategory::Syntax,
            Self::UnknownVariable { .. } | Self::UnknownFunction { .. } => ErrorCategory::Scope,
            Self::ArgumentCount { .. } | Self::ArgumentType { .. } => ErrorCategory::Argument,
            Self::Callback { .. } => ErrorCategory::Callback,
            Self::ResultType { .. } | Self::ReturnType { .. } => ErrorCategory::Result,
            Self::Arithmetic { .. } => ErrorCategory::Arithmetic,
            Self::InvalidVariable { .. } => ErrorCategory::Scope,
        }
    }

    /// Source position of the error, if it came from template text.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Syntax { span, .. }
            | Self::UnknownVariable { span, .. }
            | Self::UnknownFunction { span, .. }
            | Self::ArgumentCount { span, .. }
            | Self::ArgumentType { span, .. }
            | Self::Callback { span, .. }
            | Self::ResultType { span, .. }
            | Self::ReturnType { span, .. }
            | Self::Arithmetic { span, .. } => Some(*span),
            Self::InvalidVariable { .. } => None,
        }
    }
}
