//! Implementation of the `steparg rules` command.

use std::path::PathBuf;

use miette::IntoDiagnostic;
use steparg::{Definition, DefinitionCall, PatternTarget, SimpleMatcher, Transformation};

use super::open_project;
use crate::output::table::{format_rules_table, RuleRow};

/// Arguments for the rules command.
#[derive(Debug, clap::Args)]
pub struct RulesArgs {
    /// Manifest describing suites and transformations
    #[arg(long, default_value = "steparg.json")]
    pub manifest: PathBuf,

    /// Suite whose transformations to list
    #[arg(long, default_value = "default")]
    pub suite: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the rules command.
pub fn run_rules(args: RulesArgs) -> miette::Result<i32> {
    let project = open_project(&args.manifest, &args.suite)?;
    let call = DefinitionCall::builder()
        .environment(project.environment.clone())
        .definition(Definition::builder().pattern("").build())
        .build();

    let rows: Vec<RuleRow> = project
        .transformer
        .application_order(&call)
        .into_iter()
        .enumerate()
        .map(|(i, transformation)| RuleRow {
            order: i + 1,
            kind: kind_of(transformation),
            priority: transformation.priority(),
            pattern: transformation.pattern().to_string(),
            callee: transformation.callee().name().to_string(),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows).into_diagnostic()?);
    } else if rows.is_empty() {
        println!("No transformations registered for suite '{}'", args.suite);
    } else {
        let contexts = project.environment.contexts();
        if !contexts.is_empty() {
            println!("Suite '{}' ({})", args.suite, contexts.join(", "));
        }
        println!("{}", format_rules_table(&rows));
    }
    Ok(exitcode::OK)
}

/// Label for what a transformation is keyed on.
fn kind_of(transformation: &Transformation) -> &'static str {
    match transformation {
        Transformation::Simple(simple) => match simple.matcher() {
            SimpleMatcher::ReturnType(_) => "type",
            SimpleMatcher::TokenName(_) => "name",
            SimpleMatcher::TokenNameAndReturnType { .. } => "name+type",
            SimpleMatcher::Custom(_) => "custom",
        },
        Transformation::Pattern(pattern) => match pattern.target() {
            PatternTarget::Text => "text",
            PatternTarget::ColumnTable => "table",
            PatternTarget::RowTable => "rowtable",
            PatternTarget::TableRow => "row",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steparg::{builtin, PatternTransformation, SimpleTransformation};

    #[test]
    fn kinds_name_what_a_rule_is_keyed_on() {
        let trim = builtin::conversion("trim").unwrap();
        let typed: Transformation =
            SimpleTransformation::return_type("int", trim.clone()).into();
        let named: Transformation = SimpleTransformation::token_name("count", trim.clone()).into();
        let rows: Transformation = PatternTransformation::new("row:name", trim.clone()).into();
        let text: Transformation = PatternTransformation::new("/x/", trim).into();

        assert_eq!(kind_of(&typed), "type");
        assert_eq!(kind_of(&named), "name");
        assert_eq!(kind_of(&rows), "row");
        assert_eq!(kind_of(&text), "text");
    }
}
