//! Table formatting utilities for CLI output.

use comfy_table::{presets, ContentArrangement, Table};
use serde::Serialize;

/// One transformation as listed by `steparg rules`.
#[derive(Debug, Serialize)]
pub struct RuleRow {
    /// Position in application order, starting at 1.
    pub order: usize,
    pub kind: &'static str,
    pub priority: Option<i32>,
    pub pattern: String,
    pub callee: String,
}

/// Format transformations as an ASCII table.
pub fn format_rules_table(rules: &[RuleRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Kind", "Priority", "Pattern", "Conversion"]);

    for rule in rules {
        table.add_row(vec![
            rule.order.to_string(),
            rule.kind.to_string(),
            rule.priority.map_or_else(|| "-".to_string(), |p| p.to_string()),
            rule.pattern.clone(),
            rule.callee.clone(),
        ]);
    }

    table
}
