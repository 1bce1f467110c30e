//! steparg CLI entry point.
//!
//! Runs the argument transformation pipeline against a JSON manifest:
//! - `steparg transform` - Transform one step argument
//! - `steparg rules` - List a suite's transformations in application order
//! - `steparg regex` - Show the regex a (translated) pattern compiles to

mod commands;
mod manifest;
mod output;

use std::io;
use std::process::exit;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{run_regex, run_rules, run_transform, RegexArgs, RulesArgs, TransformArgs};
use tracing_subscriber::EnvFilter;

/// Step argument transformation tools.
#[derive(Debug, Parser)]
#[command(name = "steparg")]
#[command(about = "Step argument transformation tools", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Color output control
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto, global = true)]
    pub color: ColorWhen,

    /// Log transformation decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// When to use colored output.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Transform a step argument through a suite's transformations
    Transform(TransformArgs),
    /// List a suite's transformations in application order
    Rules(RulesArgs),
    /// Compile a step pattern, translated for a language
    Regex(RegexArgs),
}

/// Set up color output based on user preference.
fn setup_colors(color_when: ColorWhen) {
    match color_when {
        ColorWhen::Auto => {
            // owo-colors automatically checks TTY, NO_COLOR, FORCE_COLOR
        }
        ColorWhen::Always => {
            owo_colors::set_override(true);
        }
        ColorWhen::Never => {
            owo_colors::set_override(false);
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the level.
fn setup_logging(verbose: bool, color_when: ColorWhen) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let ansi = !matches!(color_when, ColorWhen::Never);

    // A subscriber may already be installed when embedded in a harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .compact()
        .try_init();
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    setup_colors(cli.color);
    setup_logging(cli.verbose, cli.color);

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let result = match cli.command {
        Commands::Transform(args) => run_transform(args),
        Commands::Rules(args) => run_rules(args),
        Commands::Regex(args) => run_regex(args),
    };

    match result {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("{:?}", e);
            exit(exitcode::SOFTWARE);
        }
    }
}
