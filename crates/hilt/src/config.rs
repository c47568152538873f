//! Which builtins a [`Template`](crate::Template) starts with.

use hilt_eval::builtins::ShellConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Builtin selection and settings, usually read from JSON.
///
/// ```json
/// { "env": true, "shell": true, "shell_config": { "program": "sh", "args": ["-c"] } }
/// ```
///
/// Every field is optional; unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    /// Register the `env` builtin.
    pub env: bool,
    /// Register the `shell` builtin.
    pub shell: bool,
    /// Launcher used by `shell`.
    pub shell_config: ShellConfig,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            env: true,
            shell: true,
            shell_config: ShellConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid template config: {0}")]
    Json(#[from] serde_json::Error),
}

impl TemplateConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(
            TemplateConfig::from_json_str("{}").unwrap(),
            TemplateConfig::default()
        );
    }

    #[test]
    fn test_partial_config() {
        let cfg = TemplateConfig::from_json_str(
            r#"{ "shell": false, "shell_config": { "program": "bash" } }"#,
        )
        .unwrap();
        assert!(cfg.env);
        assert!(!cfg.shell);
        assert_eq!(cfg.shell_config.program, "bash");
        assert_eq!(cfg.shell_config.args, vec!["-c"]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = TemplateConfig::from_json_str(r#"{ "envs": true }"#).unwrap_err();
        assert!(err.to_string().starts_with("invalid template config: "), "{err}");
        assert!(err.to_string().contains("envs"), "{err}");
    }

    #[test]
    fn test_serialize_roundtrip_shape() {
        let text = serde_json::to_string(&TemplateConfig::default()).unwrap();
        assert_eq!(
            text,
            r#"{"env":true,"shell":true,"shell_config":{"program":"sh","args":["-c"]}}"#
        );
    }
}
