//! Property-based tests for template evaluation.
//!
//! These tests use proptest to generate random templates and verify:
//! 1. Literal text without `${` is returned unchanged
//! 2. Evaluation is idempotent against an unchanged scope
//! 3. Variable substitution places values verbatim
//! 4. Integer arithmetic agrees with `i64`

use hilt::{FunctionSpec, Template, TypeTag, Value};
use proptest::prelude::*;

// -- Strategies --

/// Text that never opens an expression span.
fn literal_strategy() -> impl Strategy<Value = String> {
    any::<String>().prop_filter("no interpolation", |s| !s.contains("${"))
}

/// A variable name that is not a keyword.
fn identifier_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z_][a-z0-9_]{0,12}")
        .expect("valid regex")
        .prop_filter("not a keyword", |s| !hilt_keyword(s))
}

fn hilt_keyword(s: &str) -> bool {
    matches!(s, "true" | "false")
}

fn template_with(name: &str, value: &str) -> Template {
    let mut tmpl = Template::new();
    tmpl.add_variable(name, value);
    tmpl.add_function(
        "upper",
        FunctionSpec::new(vec![TypeTag::String], TypeTag::String, |args| match args {
            [Value::String(s)] => Ok(Value::String(s.to_uppercase())),
            _ => Err("expected one string".to_string()),
        }),
    );
    tmpl
}

// -- Properties --

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn literal_text_is_unchanged(text in literal_strategy()) {
        let tmpl = Template::new();
        prop_assert_eq!(tmpl.eval(&text).unwrap(), text);
    }

    #[test]
    fn escaped_span_is_literal(before in literal_strategy(), after in literal_strategy()) {
        // A trailing `$` would join with the escape and change its meaning.
        prop_assume!(!before.ends_with('$'));
        let tmpl = Template::new();
        let source = format!("{before}$${{{after}");
        prop_assert_eq!(tmpl.eval(&source).unwrap(), format!("{before}${{{after}"));
    }

    #[test]
    fn variable_value_is_placed_verbatim(
        name in identifier_strategy(),
        value in any::<String>(),
        prefix in "[a-z {}\":]{0,10}",
    ) {
        let tmpl = template_with(&name, &value);
        let source = format!("{prefix}${{{name}}}");
        prop_assert_eq!(tmpl.eval(&source).unwrap(), format!("{prefix}{value}"));
    }

    #[test]
    fn evaluation_is_idempotent(name in identifier_strategy(), value in "\\PC{0,20}") {
        let tmpl = template_with(&name, &value);
        let source = format!("[${{upper({name})}}] [${{{name}}}]");
        let first = tmpl.eval(&source).unwrap();
        prop_assert_eq!(tmpl.eval(&source).unwrap(), first);
    }

    #[test]
    fn integer_arithmetic_matches_i64(a in -1_000_000i64..1_000_000, b in 1i64..1_000) {
        let tmpl = Template::new();
        let source = format!("${{{a} + {b} * 2}} ${{{a} / {b}}} ${{{a} % {b}}}");
        let expected = format!("{} {} {}", a + b * 2, a / b, a % b);
        prop_assert_eq!(tmpl.eval(&source).unwrap(), expected);
    }
}
