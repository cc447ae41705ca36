//! `hookwise` command-line entry point.
//!
//! The binary checks and evaluates tag expressions the same way hook
//! selection does, and prints the effective timeout configuration. It uses
//! `eyre` for opaque error handling at the application boundary, converting
//! domain-specific errors into human-readable reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/hookwise/config.toml` or path from `HOOKWISE_CONFIG_PATH`)
//! 3. Environment variables (`HOOKWISE_*`)
//! 4. Command-line arguments

use std::process::ExitCode;

use clap::Parser;
use eyre::{Report, Result as EyreResult};
use hookwise::config::{AppConfig, CheckArgs, Cli, Commands, EvalArgs, load_config};
use hookwise::error::Result as HookwiseResult;
use hookwise::tags::TagExpression;
use tracing::Level;
use tracing_subscriber::fmt;

/// Application entry point.
fn main() -> EyreResult<ExitCode> {
    let cli = Cli::parse();
    let max_level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    fmt().with_max_level(max_level).with_writer(std::io::stderr).init();

    let config = load_config(&cli).map_err(Report::from)?;

    match &cli.command {
        Commands::Check(args) => check_expression(args).map_err(Report::from),
        Commands::Eval(args) => eval_expression(args).map_err(Report::from),
        Commands::Config => print_config(&config),
    }
}

/// Compile an expression and print its canonical form.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn check_expression(args: &CheckArgs) -> HookwiseResult<ExitCode> {
    let expression = TagExpression::parse(&args.expression)?;
    println!("{expression}");
    Ok(ExitCode::SUCCESS)
}

/// Evaluate an expression against the given tags.
///
/// Exits with status 1 when the tags do not match.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn eval_expression(args: &EvalArgs) -> HookwiseResult<ExitCode> {
    let expression = TagExpression::parse(&args.expression)?;
    if expression.evaluate(&args.tags) {
        println!("match");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("no match");
        Ok(ExitCode::FAILURE)
    }
}

/// Print the merged configuration as TOML.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn print_config(config: &AppConfig) -> EyreResult<ExitCode> {
    let rendered = ortho_config::toml::to_string_pretty(config)?;
    print!("{rendered}");
    Ok(ExitCode::SUCCESS)
}
