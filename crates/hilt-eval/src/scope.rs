//! Variable table and function registry a template is evaluated against.

use crate::FunctionSpec;
use hilt_types::Value;
use std::collections::BTreeMap;

/// Named variables and functions.
///
/// Written during registration, read-only during evaluation. Registering a
/// name that already exists replaces the previous entry.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    variables: BTreeMap<String, Value>,
    functions: BTreeMap<String, FunctionSpec>,
}

impl Scope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or replace a variable.
    pub fn add_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Define or replace a function.
    pub fn add_function(&mut self, name: impl Into<String>, spec: FunctionSpec) {
        self.functions.insert(name.into(), spec);
    }

    /// Look up a variable.
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Look up a function.
    pub fn function(&self, name: &str) -> Option<&FunctionSpec> {
        self.functions.get(name)
    }

    /// Registered variable names, sorted.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Registered function names, sorted.
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}
