//! hilt tree-walking evaluator.
//!
//! Resolves parsed templates against a [`Scope`] of variables and typed
//! functions. The [`builtins`] module provides the `env` and `shell`
//! functions.

pub mod builtins;
mod evaluator;
mod function;
mod scope;

pub use evaluator::{evaluate, Evaluator};
pub use function::{Callback, FunctionSpec};
pub use scope::Scope;
