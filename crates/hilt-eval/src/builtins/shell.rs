//! `shell(format, operands...)`: run a command and return its output.

use super::format::sprintf;
use crate::FunctionSpec;
use hilt_types::{TypeTag, Value};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::io::{self, Read};
use std::process::{Command, ExitStatus, Stdio};

/// How `shell` launches commands: `<program> <args...> <command>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: "sh".to_string(),
            args: vec!["-c".to_string()],
        }
    }
}

/// `shell` using `sh -c`.
pub fn shell() -> FunctionSpec {
    shell_with(ShellConfig::default())
}

/// `shell` using the given launcher.
pub fn shell_with(config: ShellConfig) -> FunctionSpec {
    FunctionSpec::new(vec![TypeTag::String], TypeTag::String, move |args| {
        let (format, operands) = match args {
            [Value::String(format), rest @ ..] => (format, rest),
            _ => return Err("expected a command format string".to_string()),
        };
        run_command(&config, &sprintf(format, operands)).map(Value::String)
    })
    .variadic(TypeTag::String)
}

/// Run `command` through the configured shell and wait for it to exit.
///
/// Stdout and stderr share one pipe, so the returned text interleaves them
/// as the child wrote them. The child is always waited on before returning,
/// including when reading its output fails.
pub fn run_command(config: &ShellConfig, command: &str) -> Result<String, String> {
    tracing::debug!(program = %config.program, command, "shell: running command");

    let (mut reader, writer) = io::pipe().map_err(|e| failure(e, b""))?;
    let stderr = writer.try_clone().map_err(|e| failure(e, b""))?;

    let mut cmd = Command::new(&config.program);
    cmd.args(&config.args)
        .arg(command)
        .stdin(Stdio::null())
        .stdout(writer)
        .stderr(stderr);
    let spawned = cmd.spawn();
    // `cmd` still owns the parent's write ends; the read below only sees EOF
    // once they are closed.
    drop(cmd);
    let mut child = spawned.map_err(|e| failure(e, b""))?;

    let mut output = Vec::new();
    let read = reader.read_to_end(&mut output);
    let status = child.wait().map_err(|e| failure(e, &output))?;
    read.map_err(|e| failure(e, &output))?;

    tracing::debug!(status = %describe(status), bytes = output.len(), "shell: command exited");
    if status.success() {
        Ok(String::from_utf8_lossy(&output).into_owned())
    } else {
        Err(failure(describe(status), &output))
    }
}

/// `exit status 127`, or `signal: 9` for a killed child.
fn describe(status: ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("exit status {code}");
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("signal: {signal}");
        }
    }
    status.to_string()
}

/// Only spaces and newlines are trimmed from the captured output.
fn failure(err: impl Display, output: &[u8]) -> String {
    let output = String::from_utf8_lossy(output);
    format!("{err}: {}", output.trim_matches([' ', '\n']))
}
