//! Implementation of the `steparg regex` command.

use std::path::PathBuf;

use miette::IntoDiagnostic;
use owo_colors::OwoColorize;
use serde::Serialize;
use steparg::RegexGenerator;

use super::open_project;

/// Arguments for the regex command.
#[derive(Debug, clap::Args)]
pub struct RegexArgs {
    /// Manifest describing suites and translations
    #[arg(long, default_value = "steparg.json")]
    pub manifest: PathBuf,

    /// Suite whose translations apply
    #[arg(long, default_value = "default")]
    pub suite: String,

    /// Language to translate the pattern into
    #[arg(long, default_value = "en")]
    pub lang: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Pattern to compile
    pub pattern: String,
}

/// JSON output for regex results.
#[derive(Serialize)]
struct RegexResult<'a> {
    pattern: &'a str,
    translated: bool,
    regex: &'a str,
}

/// Run the regex command.
pub fn run_regex(args: RegexArgs) -> miette::Result<i32> {
    let project = open_project(&args.manifest, &args.suite)?;

    match project
        .transformer
        .generate_regex(&args.suite, &args.pattern, &args.lang)
    {
        Ok(compiled) => {
            let translated = compiled.source() != args.pattern;
            if args.json {
                let output = RegexResult {
                    pattern: compiled.source(),
                    translated,
                    regex: compiled.regex().as_str(),
                };
                println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                if translated {
                    eprintln!("{} {}", "translated:".dimmed(), compiled.source());
                }
                println!("{}", compiled.regex().as_str());
            }
            Ok(exitcode::OK)
        }
        Err(e) => {
            if args.json {
                let output = serde_json::json!({ "error": e.to_string() });
                eprintln!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                eprintln!("{} {}", "error:".red().bold(), e);
            }
            Ok(exitcode::DATAERR)
        }
    }
}
