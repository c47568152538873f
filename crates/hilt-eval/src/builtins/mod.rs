//! Builtin template functions.
//!
//! | name    | signature                           | behaviour                        |
//! |---------|-------------------------------------|----------------------------------|
//! | `env`   | `(string, string...) -> string`     | environment lookup with default  |
//! | `shell` | `(string, string...) -> string`     | run a formatted shell command    |

mod env;
mod format;
mod shell;

pub use env::{env, env_with, EnvSource, MapEnv, ProcessEnv};
pub use format::sprintf;
pub use shell::{run_command, shell, shell_with, ShellConfig};

/// Name the `env` builtin is registered under.
pub const ENV: &str = "env";
/// Name the `shell` builtin is registered under.
pub const SHELL: &str = "shell";
