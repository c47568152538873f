//! `env(name, default...)`: read an environment variable.

use crate::FunctionSpec;
use hilt_types::{TypeTag, Value};
use std::collections::BTreeMap;

/// Key-value lookup the `env` builtin reads from.
pub trait EnvSource: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A fixed set of variables.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// `env` reading the process environment.
pub fn env() -> FunctionSpec {
    env_with(ProcessEnv)
}

/// `env` reading from `source`.
pub fn env_with(source: impl EnvSource + 'static) -> FunctionSpec {
    FunctionSpec::new(vec![TypeTag::String], TypeTag::String, move |args| {
        lookup(&source, args)
    })
    .variadic(TypeTag::String)
}

/// A set-but-empty variable counts as missing.
fn lookup(source: &dyn EnvSource, args: &[Value]) -> Result<Value, String> {
    let (name, defaults) = match args {
        [Value::String(name), rest @ ..] => (name, rest),
        _ => return Err("expected a variable name".to_string()),
    };

    if let Some(value) = source.get(name).filter(|v| !v.is_empty()) {
        tracing::trace!(name = %name, "env: using environment value");
        return Ok(Value::String(value));
    }
    if let Some(default) = defaults.first() {
        tracing::trace!(name = %name, "env: using default");
        return Ok(default.clone());
    }
    Err(format!("missing {name:?} and no default is provided"))
}
