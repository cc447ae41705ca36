//! Command-line argument definitions for hookwise.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Command-line interface for hookwise.
#[derive(Debug, Parser)]
#[command(name = "hookwise")]
#[command(
    author,
    version,
    about = "Inspect tag expressions and hook configuration for BDD test runs"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Default scenario hook timeout in milliseconds.
    #[arg(long, global = true)]
    pub hook_timeout_ms: Option<u64>,

    /// Log registration and hook selection at debug level.
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compile a tag expression and print its canonical form.
    Check(CheckArgs),

    /// Evaluate a tag expression against a set of tags.
    Eval(EvalArgs),

    /// Print the effective configuration.
    Config,
}

/// Arguments for the `check` subcommand.
#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Tag expression, e.g. `@foo and not @bar`.
    #[arg(required = true)]
    pub expression: String,
}

/// Arguments for the `eval` subcommand.
#[derive(Debug, Parser)]
pub struct EvalArgs {
    /// Tag expression, e.g. `@foo and not @bar`.
    #[arg(required = true)]
    pub expression: String,

    /// Tag of the scenario; repeat for several tags.
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}
