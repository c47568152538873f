//! hilt: text templates with embedded `${...}` expressions.
//!
//! ```text
//! template text → Lexer → Parser → Evaluator (Scope) → String
//! ```
//!
//! Register variables and functions on a [`Template`], then call
//! [`Template::eval`]:
//!
//! ```no_run
//! use hilt::{builtins, Template};
//!
//! let mut tmpl = Template::new();
//! tmpl.add_variable("bar", "baz");
//! tmpl.add_function("env", builtins::env());
//! let out = tmpl.eval(r#"{ "foo": "${bar}", "home": "${env('HOME', '/')}" }"#)?;
//! println!("{out}");
//! # Ok::<(), hilt::TemplateError>(())
//! ```

mod config;
mod json;
mod template;

pub use config::{ConfigError, TemplateConfig};
pub use json::from_json;
pub use template::Template;

pub use hilt_eval::builtins;
pub use hilt_eval::{Callback, FunctionSpec, Scope};
pub use hilt_parser::parse;
pub use hilt_types::{ast, Arity, ErrorCategory, Result, Span, TemplateError, TypeTag, Value};
