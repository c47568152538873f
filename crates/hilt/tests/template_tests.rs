//! End-to-end tests through the `Template` façade.
//!
//! Tests verify the full pipeline: text → lex → parse → evaluate → text,
//! including the `env` and `shell` builtins against the real process.

use hilt::builtins::{self, MapEnv};
use hilt::{ErrorCategory, FunctionSpec, Template, TemplateConfig, TemplateError, TypeTag, Value};
use serde_json::json;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn lower_case() -> FunctionSpec {
    FunctionSpec::new(vec![TypeTag::String], TypeTag::String, |args| match args {
        [Value::String(s)] => Ok(Value::String(s.to_lowercase())),
        _ => Err("expected one string".to_string()),
    })
}

fn with_env() -> Template {
    let mut tmpl = Template::new();
    tmpl.add_function("env", builtins::env());
    tmpl
}

fn with_shell() -> Template {
    let mut tmpl = Template::new();
    tmpl.add_function("shell", builtins::shell());
    tmpl
}

// ══════════════════════════════════════════════════════════════════════════════
// Variables and functions
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn add_variable() {
    let mut tmpl = Template::new();
    tmpl.add_variable("bar", "baz");
    assert_eq!(
        tmpl.eval(r#"{ "foo": "${bar}" }"#).unwrap(),
        r#"{ "foo": "baz" }"#
    );
}

#[test]
fn add_function() {
    let mut tmpl = Template::new();
    tmpl.add_variable("bar", "BAZ");
    tmpl.add_function("lower", lower_case());
    assert_eq!(
        tmpl.eval(r#"{ "foo": "${lower(bar)}" }"#).unwrap(),
        r#"{ "foo": "baz" }"#
    );
}

#[test]
fn variable_missing() {
    let tmpl = Template::new();
    let err = tmpl
        .eval("{\n    \"foo\": \"${bar}\"\n  }")
        .unwrap_err();
    assert_eq!(err.to_string(), "2:15: unknown variable accessed: bar");
}

#[test]
fn variable_overwrite() {
    let mut tmpl = Template::new();
    tmpl.add_variable("bar", "one");
    tmpl.add_variable("bar", "two");
    assert_eq!(tmpl.eval("${bar}").unwrap(), "two");
}

#[test]
fn json_variables() {
    let mut tmpl = Template::new();
    tmpl.add_json_variable("name", &json!("api")).unwrap();
    tmpl.add_json_variable("port", &json!(8080)).unwrap();
    tmpl.add_json_variable("debug", &json!(false)).unwrap();
    assert_eq!(
        tmpl.eval("${name}:${port + 1} debug=${debug}").unwrap(),
        "api:8081 debug=false"
    );

    let err = tmpl.add_json_variable("n", &json!(null)).unwrap_err();
    assert!(matches!(err, TemplateError::InvalidVariable { ref name, .. } if name == "n"));
    assert_eq!(err.category(), ErrorCategory::Scope);
    assert_eq!(err.span(), None);
}

#[test]
fn json_list_cannot_be_rendered() {
    let mut tmpl = Template::new();
    tmpl.add_json_variable("hosts", &json!(["a", "b"])).unwrap();
    let err = tmpl.eval("${hosts}").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Result);
}

#[test]
fn dollar_without_brace_is_literal() {
    let tmpl = Template::new();
    assert_eq!(tmpl.eval("cost: $5 and $").unwrap(), "cost: $5 and $");
}

#[test]
fn escaped_interpolation_is_literal() {
    let tmpl = Template::new();
    assert_eq!(tmpl.eval("$${bar}").unwrap(), "${bar}");
}

#[test]
fn syntax_errors_surface_with_position() {
    let tmpl = Template::new();
    let err = tmpl.eval("a ${bar").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Syntax);
    assert!(err.to_string().starts_with("1:3: "), "{err}");
}

#[test]
fn idempotent() {
    let mut tmpl = Template::new();
    tmpl.add_variable("bar", "BAZ");
    tmpl.add_function("lower", lower_case());
    let source = r#"{ "a": "${lower(bar)}", "b": "${bar}" }"#;
    assert_eq!(tmpl.eval(source).unwrap(), tmpl.eval(source).unwrap());
}

#[test]
fn deterministic_over_100_evaluations() {
    let mut tmpl = Template::new();
    tmpl.add_variable("bar", "BAZ");
    tmpl.add_function("lower", lower_case());
    let first = tmpl.eval("${lower(bar)}${bar}${1 + 2}").unwrap();
    for _ in 0..100 {
        assert_eq!(tmpl.eval("${lower(bar)}${bar}${1 + 2}").unwrap(), first);
    }
}

#[test]
fn long_operator_chain_is_a_syntax_error() {
    let tmpl = Template::new();
    let err = tmpl
        .eval(&format!("${{{}1}}", "1+".repeat(200_000)))
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Syntax);
    assert!(
        err.to_string().ends_with("maximum expression nesting depth is 64"),
        "{err}"
    );
    assert_eq!(tmpl.eval(&format!("${{{}1}}", "1+".repeat(50))).unwrap(), "51");
}

#[test]
fn shared_across_threads() {
    let mut tmpl = Template::new();
    tmpl.add_variable("bar", "BAZ");
    tmpl.add_function("lower", lower_case());
    let tmpl = std::sync::Arc::new(tmpl);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let tmpl = std::sync::Arc::clone(&tmpl);
            std::thread::spawn(move || tmpl.eval("${lower(bar)}"))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), "baz");
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// env
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn env_present() {
    std::env::set_var("HILT_TEST_ENV_PRESENT", "123");
    let tmpl = with_env();
    assert_eq!(tmpl.eval("${env('HILT_TEST_ENV_PRESENT')}").unwrap(), "123");
}

#[test]
fn env_fallback_when_unset() {
    std::env::remove_var("HILT_TEST_ENV_UNSET");
    let tmpl = with_env();
    assert_eq!(
        tmpl.eval("${env('HILT_TEST_ENV_UNSET', 'oh no')}").unwrap(),
        "oh no"
    );
}

#[test]
fn env_fallback_when_empty() {
    std::env::set_var("HILT_TEST_ENV_EMPTY", "");
    let tmpl = with_env();
    assert_eq!(
        tmpl.eval("${env('HILT_TEST_ENV_EMPTY', 'oh no')}").unwrap(),
        "oh no"
    );
}

#[test]
fn env_missing_without_default() {
    std::env::remove_var("HILT_TEST_ENV_MISSING");
    let tmpl = with_env();
    let err = tmpl.eval("${env('HILT_TEST_ENV_MISSING')}").unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"env: missing "HILT_TEST_ENV_MISSING" and no default is provided"#
    );
    assert_eq!(err.category(), ErrorCategory::Callback);
}

#[test]
fn env_from_injected_source() {
    let mut tmpl = Template::new();
    tmpl.add_function(
        "env",
        builtins::env_with(MapEnv::new().with("LOGGLY_TOKEN", "123")),
    );
    assert_eq!(tmpl.eval("${env('LOGGLY_TOKEN')}").unwrap(), "123");
}

// ══════════════════════════════════════════════════════════════════════════════
// shell
// ══════════════════════════════════════════════════════════════════════════════

#[cfg(unix)]
#[test]
fn shell_ok() {
    assert_eq!(with_shell().eval("${shell('echo hello')}").unwrap(), "hello\n");
}

#[cfg(unix)]
#[test]
fn shell_args() {
    assert_eq!(
        with_shell().eval("${shell('echo %s', 'hello')}").unwrap(),
        "hello\n"
    );
}

#[cfg(unix)]
#[test]
fn shell_error() {
    let err = with_shell().eval("${shell('asdf')}").unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("shell: exit status 127: "), "{message}");
    assert!(message.contains("asdf"), "{message}");
    assert!(!message.ends_with('\n'), "{message}");
}

#[cfg(unix)]
#[test]
fn shell_requires_a_command() {
    let err = with_shell().eval("${shell()}").unwrap_err();
    assert_eq!(err.to_string(), "1:3: shell: expected at least 1 arguments, got 0");
}

#[cfg(unix)]
#[test]
fn from_config_uses_shell_config() {
    let cfg = TemplateConfig::from_json_str(
        r#"{ "env": false, "shell_config": { "program": "sh", "args": ["-e", "-c"] } }"#,
    )
    .unwrap();
    let tmpl = Template::from_config(&cfg);
    assert_eq!(tmpl.eval("${shell('echo %s%s', 'a', 'b')}").unwrap(), "ab\n");
    let err = tmpl.eval("${env('HOME')}").unwrap_err();
    assert!(matches!(err, TemplateError::UnknownFunction { .. }));
}
