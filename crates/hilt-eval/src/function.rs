//! Typed function signatures with host callbacks.

use hilt_types::{Arity, Result, Span, TemplateError, TypeTag, Value};
use std::fmt;
use std::sync::Arc;

/// Host code behind a template function.
///
/// Receives arguments that already passed the signature check. A returned
/// `Err` is a domain failure; the evaluator prefixes it with the function
/// name.
pub type Callback = Arc<dyn Fn(&[Value]) -> std::result::Result<Value, String> + Send + Sync>;

/// A callable usable inside `${...}` spans: signature plus callback.
#[derive(Clone)]
pub struct FunctionSpec {
    /// Types of the fixed leading arguments.
    pub arg_types: Vec<TypeTag>,
    /// Type of every argument past `arg_types`, if the function is variadic.
    pub variadic: Option<TypeTag>,
    /// Type the callback promises to return.
    pub return_type: TypeTag,
    callback: Callback,
}

impl FunctionSpec {
    /// Create a non-variadic function.
    pub fn new<F>(arg_types: Vec<TypeTag>, return_type: TypeTag, callback: F) -> Self
    where
        F: Fn(&[Value]) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            arg_types,
            variadic: None,
            return_type,
            callback: Arc::new(callback),
        }
    }

    /// Accept any number of extra arguments of type `ty` after the fixed ones.
    pub fn variadic(mut self, ty: TypeTag) -> Self {
        self.variadic = Some(ty);
        self
    }

    pub fn arity(&self) -> Arity {
        match self.variadic {
            Some(_) => Arity::AtLeast(self.arg_types.len()),
            None => Arity::Exact(self.arg_types.len()),
        }
    }

    /// Expected type of the argument at `index`, or `None` past the end of
    /// a non-variadic signature.
    pub fn expected_type(&self, index: usize) -> Option<TypeTag> {
        self.arg_types.get(index).copied().or(self.variadic)
    }

    /// Validate arity and per-position types of resolved arguments.
    pub fn check_args(&self, function: &str, args: &[Value], span: Span) -> Result<()> {
        let arity = self.arity();
        if !arity.admits(args.len()) {
            return Err(TemplateError::ArgumentCount {
                function: function.to_string(),
                expected: arity,
                got: args.len(),
                span,
            });
        }
        for (index, arg) in args.iter().enumerate() {
            let got = arg.type_tag();
            let Some(expected) = self.expected_type(index) else {
                continue;
            };
            if !expected.accepts(got) {
                return Err(TemplateError::ArgumentType {
                    function: function.to_string(),
                    index,
                    expected,
                    got,
                    span,
                });
            }
        }
        Ok(())
    }

    /// Invoke the callback.
    pub fn call(&self, args: &[Value]) -> std::result::Result<Value, String> {
        (self.callback)(args)
    }
}

impl fmt::Debug for FunctionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionSpec")
            .field("arg_types", &self.arg_types)
            .field("variadic", &self.variadic)
            .field("return_type", &self.return_type)
            .finish_non_exhaustive()
    }
}
