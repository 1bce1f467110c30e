//! Implementation of the `steparg transform` command.

use std::fs::read_to_string;
use std::path::PathBuf;

use miette::{miette, IntoDiagnostic};
use owo_colors::OwoColorize;
use serde::Serialize;
use steparg::{ArgumentIndex, Definition, DefinitionCall, Parameter, TableNode, Value};

use super::open_project;

/// Arguments for the transform command.
#[derive(Debug, clap::Args)]
pub struct TransformArgs {
    /// Manifest describing suites and transformations
    #[arg(long, default_value = "steparg.json")]
    pub manifest: PathBuf,

    /// Suite whose transformations apply
    #[arg(long, default_value = "default")]
    pub suite: String,

    /// Language of the feature the argument comes from
    #[arg(long, default_value = "en")]
    pub lang: String,

    /// Pattern of the step definition receiving the argument
    #[arg(long, default_value = "")]
    pub definition: String,

    /// Step definition parameters as NAME or NAME:TYPE (repeatable)
    #[arg(short = 'p', long = "param", value_parser = parse_parameter)]
    pub params: Vec<Parameter>,

    /// Position of the argument
    #[arg(long, default_value_t = 0, conflicts_with = "name")]
    pub index: usize,

    /// Placeholder name of the argument
    #[arg(long)]
    pub name: Option<String>,

    /// Read a Gherkin table argument from a file
    #[arg(long, conflicts_with = "value")]
    pub table: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Raw argument value
    #[arg(required_unless_present = "table")]
    pub value: Option<String>,
}

/// JSON output for transform results.
#[derive(Serialize)]
struct TransformResult<'a> {
    kind: &'static str,
    value: &'a Value,
}

/// Parse a NAME or NAME:TYPE parameter declaration.
fn parse_parameter(s: &str) -> Result<Parameter, String> {
    match s.split_once(':') {
        Some((name, _)) if name.is_empty() => {
            Err(format!("invalid parameter '{s}': expected NAME or NAME:TYPE"))
        }
        Some((name, type_name)) => Ok(Parameter::typed(name, type_name)),
        None if s.is_empty() => Err("parameter name must not be empty".to_string()),
        None => Ok(Parameter::new(s)),
    }
}

/// Run the transform command.
pub fn run_transform(args: TransformArgs) -> miette::Result<i32> {
    let project = open_project(&args.manifest, &args.suite)?;

    let value = match (&args.table, &args.value) {
        (Some(path), _) => {
            let content = read_to_string(path)
                .map_err(|e| miette!("Cannot read table file {}: {}", path.display(), e))?;
            Value::Table(TableNode::parse_pipes(&content))
        }
        (None, Some(raw)) => Value::from(raw.as_str()),
        (None, None) => return Err(miette!("either a value or --table is required")),
    };

    let call = DefinitionCall::builder()
        .environment(project.environment.clone())
        .definition(
            Definition::builder()
                .pattern(args.definition.clone())
                .parameters(args.params.clone())
                .build(),
        )
        .language(args.lang.clone())
        .arguments(vec![value.clone()])
        .build();
    let index = match &args.name {
        Some(name) => ArgumentIndex::Named(name.clone()),
        None => ArgumentIndex::Position(args.index),
    };

    match project.transformer.transform(&call, &index, value) {
        Ok(value) => {
            if args.json {
                let output = TransformResult {
                    kind: value.kind(),
                    value: &value,
                };
                println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
            } else {
                println!("{}", value);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_parameter_declarations() {
        assert_eq!(parse_parameter("count"), Ok(Parameter::new("count")));
        assert_eq!(
            parse_parameter("count:int"),
            Ok(Parameter::typed("count", "int"))
        );
        assert!(parse_parameter(":int").is_err());
        assert!(parse_parameter("").is_err());
    }
}
