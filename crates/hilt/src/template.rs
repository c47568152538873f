//! The `Template` façade: register names, then evaluate text.

use crate::config::TemplateConfig;
use crate::json::from_json;
use hilt_eval::builtins::{self, ENV, SHELL};
use hilt_eval::{Evaluator, FunctionSpec, Scope};
use hilt_types::{Result, TemplateError, Value};

/// Variables and functions that `${...}` spans are evaluated against.
///
/// Registration takes `&mut self` and evaluation `&self`, so a template
/// shared across threads is read-only while it is being evaluated.
#[derive(Debug, Clone, Default)]
pub struct Template {
    scope: Scope,
}

impl Template {
    /// A template with no variables and no functions.
    pub fn new() -> Self {
        Self::default()
    }

    /// A template with the builtins `config` enables.
    pub fn from_config(config: &TemplateConfig) -> Self {
        let mut tmpl = Self::new();
        if config.env {
            tmpl.add_function(ENV, builtins::env());
        }
        if config.shell {
            tmpl.add_function(SHELL, builtins::shell_with(config.shell_config.clone()));
        }
        tracing::debug!(env = config.env, shell = config.shell, "template created from config");
        tmpl
    }

    /// Define or replace a variable.
    pub fn add_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.scope.add_variable(name, value);
    }

    /// Define or replace a variable from JSON data.
    ///
    /// Fails with [`TemplateError::InvalidVariable`] for `null` and objects;
    /// the scope is left unchanged in that case.
    pub fn add_json_variable(&mut self, name: impl Into<String>, json: &serde_json::Value) -> Result<()> {
        let name = name.into();
        match from_json(json) {
            Ok(value) => {
                self.scope.add_variable(name, value);
                Ok(())
            }
            Err(reason) => Err(TemplateError::InvalidVariable { name, reason }),
        }
    }

    /// Define or replace a function.
    pub fn add_function(&mut self, name: impl Into<String>, spec: FunctionSpec) {
        self.scope.add_function(name, spec);
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Evaluate `source`, returning the literal text with every `${...}`
    /// span replaced by its value. The first failure aborts evaluation.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn eval(&self, source: &str) -> Result<String> {
        let template = hilt_parser::parse(source)?;
        if template.is_literal() {
            tracing::trace!("no expressions, returning text unchanged");
        }
        Evaluator::new(&self.scope).render(&template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TemplateConfig;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_template_is_send_and_sync() {
        assert_send_sync::<Template>();
    }

    #[test]
    fn test_new_has_no_builtins() {
        let tmpl = Template::new();
        assert_eq!(tmpl.scope().function_names().count(), 0);
    }

    #[test]
    fn test_from_config_registers_enabled_builtins() {
        let tmpl = Template::from_config(&TemplateConfig::default());
        assert_eq!(
            tmpl.scope().function_names().collect::<Vec<_>>(),
            vec!["env", "shell"]
        );

        let tmpl = Template::from_config(&TemplateConfig {
            shell: false,
            ..TemplateConfig::default()
        });
        assert_eq!(tmpl.scope().function_names().collect::<Vec<_>>(), vec!["env"]);
    }

    #[test]
    fn test_invalid_json_variable_leaves_scope_unchanged() {
        let mut tmpl = Template::new();
        tmpl.add_variable("x", "keep");
        let err = tmpl
            .add_json_variable("x", &serde_json::json!({"nested": true}))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for variable x: objects are not supported"
        );
        assert_eq!(tmpl.scope().variable("x"), Some(&Value::from("keep")));
    }
}
