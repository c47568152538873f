//! # hilt
//!
//! Render a template from a file or stdin.
//!
//! ```bash
//! hilt config.json.tmpl --var region=eu-west-1
//! echo '{ "home": "${env("HOME")}" }' | hilt
//! hilt deploy.tmpl --vars vars.json --config hilt.json --no-shell
//! HILT_LOG=debug hilt deploy.tmpl
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use hilt::{Template, TemplateConfig, TemplateError};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hilt")]
#[command(about = "Render text templates with ${...} expressions")]
#[command(version)]
struct Cli {
    /// Template file (default: read stdin)
    file: Option<PathBuf>,

    /// Define a string variable; repeatable, later definitions win
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    vars: Vec<(String, String)>,

    /// JSON object whose keys become variables
    #[arg(long = "vars", value_name = "FILE.json")]
    vars_file: Option<PathBuf>,

    /// Template config (builtins and shell launcher)
    #[arg(long, value_name = "FILE.json")]
    config: Option<PathBuf>,

    /// Do not register the `env` builtin
    #[arg(long)]
    no_env: bool,

    /// Do not register the `shell` builtin
    #[arg(long)]
    no_shell: bool,

    /// Print template errors as JSON
    #[arg(long)]
    json_errors: bool,
}

fn parse_var(arg: &str) -> std::result::Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got {arg:?}")),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(&cli) {
        Ok(output) => match io::stdout().lock().write_all(output.as_bytes()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: writing output: {err}");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            eprintln!("{}", report(&err, cli.json_errors));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("HILT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<String> {
    let source = match &cli.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading template {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading template from stdin")?;
            buf
        }
    };

    let config = load_config(cli)?;
    let mut tmpl = Template::from_config(&config);
    if let Some(path) = &cli.vars_file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading variables {}", path.display()))?;
        let json: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("parsing variables {}", path.display()))?;
        add_json_variables(&mut tmpl, &json)?;
    }
    for (name, value) in &cli.vars {
        tmpl.add_variable(name.as_str(), value.as_str());
    }

    tracing::debug!(bytes = source.len(), "evaluating template");
    Ok(tmpl.eval(&source)?)
}

/// File config with the `--no-*` flags applied on top.
fn load_config(cli: &Cli) -> Result<TemplateConfig> {
    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => TemplateConfig::default(),
    };
    if cli.no_env {
        config.env = false;
    }
    if cli.no_shell {
        config.shell = false;
    }
    Ok(config)
}

fn read_config(path: &Path) -> Result<TemplateConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    TemplateConfig::from_json_str(&text).with_context(|| format!("in {}", path.display()))
}

fn add_json_variables(tmpl: &mut Template, json: &serde_json::Value) -> Result<()> {
    let Some(object) = json.as_object() else {
        bail!("variables file must contain a JSON object");
    };
    for (name, value) in object {
        tmpl.add_json_variable(name.as_str(), value)?;
    }
    Ok(())
}

/// `error: <message>`, or a JSON object with a `message` field and, for
/// template errors, the structured error fields.
fn report(err: &anyhow::Error, json: bool) -> String {
    let message = format!("{err:#}");
    if !json {
        return format!("error: {message}");
    }
    let mut body = err
        .downcast_ref::<TemplateError>()
        .and_then(|e| serde_json::to_value(e).ok())
        .unwrap_or_else(|| serde_json::json!({ "kind": "io" }));
    if let (Some(object), Some(category)) = (
        body.as_object_mut(),
        err.downcast_ref::<TemplateError>().map(TemplateError::category),
    ) {
        object.insert("category".to_string(), category.to_string().into());
    }
    if let Some(object) = body.as_object_mut() {
        object.insert("message".to_string(), message.into());
    }
    body.to_string()
}
