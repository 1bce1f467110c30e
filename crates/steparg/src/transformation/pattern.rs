//! Transformations triggered by a pattern matching the argument's text.

use std::collections::BTreeMap;

use super::callee::{Callee, Invoker, TransformationCall};
use crate::error::TransformError;
use crate::pattern::{CompiledPattern, PatternError};
use crate::transformer::RegexGenerator;
use crate::types::{DefinitionCall, TableNode, Value};

/// What a trigger pattern is matched against, chosen by its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternTarget {
    /// The value's text form. The callable receives the capture groups.
    Text,
    /// `table:` patterns, matched against the header row. The callable receives the table.
    ColumnTable,
    /// `rowtable:` patterns, matched against the first column. The callable receives the table.
    RowTable,
    /// `row:` patterns, matched against the header row. The callable runs once per data row.
    TableRow,
}

impl PatternTarget {
    fn of(pattern: &str) -> Self {
        if pattern.starts_with("table:") {
            PatternTarget::ColumnTable
        } else if pattern.starts_with("rowtable:") {
            PatternTarget::RowTable
        } else if pattern.starts_with("row:") {
            PatternTarget::TableRow
        } else {
            PatternTarget::Text
        }
    }
}

/// A transformation that applies when its trigger pattern matches.
///
/// The trigger is compiled through a [`RegexGenerator`] on every check, so
/// it is localized for the suite and language of the call at hand.
#[derive(Debug, Clone)]
pub struct PatternTransformation {
    pattern: String,
    target: PatternTarget,
    callee: Callee,
}

impl PatternTransformation {
    pub fn new(pattern: impl Into<String>, callee: Callee) -> Self {
        let pattern = pattern.into();
        Self {
            target: PatternTarget::of(&pattern),
            pattern,
            callee,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn target(&self) -> PatternTarget {
        self.target
    }

    pub fn callee(&self) -> &Callee {
        &self.callee
    }

    /// Whether the trigger matches `value`.
    ///
    /// Values without a subject for this target are rejected without
    /// compiling anything. A trigger that fails to compile is an error, not a
    /// mismatch.
    pub fn supports(
        &self,
        generator: &dyn RegexGenerator,
        call: &DefinitionCall,
        value: &Value,
    ) -> Result<bool, PatternError> {
        let Some(subject) = self.subject(value) else {
            return Ok(false);
        };
        Ok(self.regex(generator, call)?.is_match(&subject))
    }

    /// Invoke the bound callable for `value`.
    ///
    /// Text triggers that do not match leave the value unchanged.
    pub fn apply(
        &self,
        generator: &dyn RegexGenerator,
        invoker: &dyn Invoker,
        call: &DefinitionCall,
        value: Value,
    ) -> Result<Value, TransformError> {
        match (self.target, value) {
            (PatternTarget::Text, value) => {
                let Some(subject) = self.subject(&value) else {
                    return Ok(value);
                };
                let Some(arguments) = self.regex(generator, call)?.captures(&subject) else {
                    return Ok(value);
                };
                self.invoke(invoker, call, arguments.into_iter().map(Value::from).collect())
            }
            (PatternTarget::TableRow, Value::Table(table)) => {
                let mut results = Vec::new();
                for row in table.hash() {
                    let row: BTreeMap<String, Value> = row
                        .into_iter()
                        .map(|(column, cell)| (column, Value::String(cell)))
                        .collect();
                    results.push(self.invoke(invoker, call, vec![Value::Map(row)])?);
                }
                Ok(Value::List(results))
            }
            (_, value) => self.invoke(invoker, call, vec![value]),
        }
    }

    fn invoke(
        &self,
        invoker: &dyn Invoker,
        call: &DefinitionCall,
        arguments: Vec<Value>,
    ) -> Result<Value, TransformError> {
        Ok(invoker.invoke(TransformationCall {
            definition_call: call,
            transformation: &self.pattern,
            callee: &self.callee,
            index: None,
            arguments,
        })?)
    }

    fn regex(
        &self,
        generator: &dyn RegexGenerator,
        call: &DefinitionCall,
    ) -> Result<CompiledPattern, PatternError> {
        generator.generate_regex(call.suite(), &self.pattern, call.language())
    }

    /// The text this transformation's trigger is matched against.
    fn subject(&self, value: &Value) -> Option<String> {
        match self.target {
            PatternTarget::Text => value.text(),
            PatternTarget::ColumnTable => value.as_table().map(TableNode::signature),
            PatternTarget::RowTable => value.as_table().map(TableNode::row_signature),
            PatternTarget::TableRow => value
                .as_table()
                .map(|t| format!("row:{}", t.header().unwrap_or_default().join(","))),
        }
    }
}
