// src/cli/args.rs
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct MenuArgs {}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct TreeArgs {
    /// Show the identifier of every directory trigger.
    #[arg(long)]
    pub ids: bool,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct FormArgs {
    /// Command path, keys joined with '/' (e.g. "deploy/web/restart").
    pub command: String,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct RunArgs {
    /// Command path, keys joined with '/'.
    pub command: String,

    /// Option values as `name=value`. Unset options keep the form's initial value.
    pub values: Vec<String>,

    /// Prompt for every field instead of submitting the initial values.
    #[arg(long, short)]
    pub interactive: bool,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct LoginArgs {
    /// Username; asked interactively when omitted.
    #[arg(long, short)]
    pub username: Option<String>,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct LogoutArgs {}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct PasswordArgs {}

#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
pub struct ReloadArgs {
    /// What the service should reload.
    #[arg(value_enum)]
    pub target: ReloadTarget,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadTarget {
    Config,
    Commands,
}

/// Splits `name=value`. The value may itself contain '='.
pub fn parse_assignment(raw: &str) -> Option<(&str, &str)> {
    let (name, value) = raw.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some((name, value))
    }
}
