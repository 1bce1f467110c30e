use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use winnow::combinator::{alt, preceded, repeat, terminated};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

/// A Gherkin data table passed as a step argument.
///
/// The first row is the header row. Rows are expected to have the same
/// number of cells; ragged rows are kept as-is and missing cells read as
/// empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableNode {
    rows: Vec<Vec<String>>,
}

impl TableNode {
    /// Create a table from its rows, header first.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Create a table from string slices.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// All rows, header included.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// The header row, if the table has any rows.
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Values of the first column, one per row.
    pub fn first_column(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|row| row.first().map(String::as_str))
            .collect()
    }

    /// Data rows keyed by header cell.
    pub fn hash(&self) -> Vec<BTreeMap<String, String>> {
        let Some((header, body)) = self.rows.split_first() else {
            return Vec::new();
        };
        body.iter()
            .map(|row| {
                header
                    .iter()
                    .enumerate()
                    .map(|(i, key)| (key.clone(), row.get(i).cloned().unwrap_or_default()))
                    .collect()
            })
            .collect()
    }

    /// Two-column table read as key/value pairs. Later keys win.
    pub fn rows_hash(&self) -> BTreeMap<String, String> {
        self.rows
            .iter()
            .filter_map(|row| match row.as_slice() {
                [key, value, ..] => Some((key.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }

    /// Header signature matched by `table:` and `row:` trigger patterns.
    pub fn signature(&self) -> String {
        format!("table:{}", self.header().unwrap_or_default().join(","))
    }

    /// First-column signature matched by `rowtable:` trigger patterns.
    pub fn row_signature(&self) -> String {
        format!("rowtable:{}", self.first_column().join(","))
    }

    /// Parse a table written in Gherkin pipe syntax (`| a | b |`).
    ///
    /// Lines not starting with `|` are skipped. Cells are trimmed; `\|`
    /// escapes a pipe, `\n` a newline and `\\` a backslash.
    pub fn parse_pipes(text: &str) -> Self {
        let rows = text
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with('|'))
            .map(|mut line| row(&mut line).unwrap_or_default())
            .collect();
        Self::new(rows)
    }
}

/// A piece of a table cell.
enum CellFragment<'i> {
    Literal(&'i str),
    Escaped(char),
}

/// One `| a | b |` row. A missing closing pipe keeps the trailing cell.
fn row(input: &mut &str) -> ModalResult<Vec<String>> {
    '|'.parse_next(input)?;
    let mut cells: Vec<String> = repeat(0.., terminated(cell, '|')).parse_next(input)?;
    let trailing = cell.parse_next(input)?;
    if !trailing.is_empty() {
        cells.push(trailing);
    }
    Ok(cells)
}

fn cell(input: &mut &str) -> ModalResult<String> {
    repeat(0.., cell_fragment)
        .fold(String::new, |mut text, piece| {
            match piece {
                CellFragment::Literal(s) => text.push_str(s),
                CellFragment::Escaped(c) => text.push(c),
            }
            text
        })
        .map(|text: String| text.trim().to_string())
        .parse_next(input)
}

/// `\|`, `\n` and `\\` are escapes; any other backslash is kept.
fn cell_fragment<'i>(input: &mut &'i str) -> ModalResult<CellFragment<'i>> {
    alt((
        preceded('\\', one_of(['|', 'n', '\\'])).map(|c| match c {
            'n' => CellFragment::Escaped('\n'),
            other => CellFragment::Escaped(other),
        }),
        ('\\', any).take().map(CellFragment::Literal),
        "\\".map(CellFragment::Literal),
        take_while(1.., |c: char| c != '|' && c != '\\').map(CellFragment::Literal),
    ))
    .parse_next(input)
}

impl Display for TableNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "| {} |", row.join(" | "))?;
        }
        Ok(())
    }
}

/// A Gherkin doc-string (`"""` block) passed as a step argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocString {
    lines: Vec<String>,
}

impl DocString {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The doc-string content with lines joined by `\n`.
    pub fn raw(&self) -> String {
        self.lines.join("\n")
    }
}

impl From<&str> for DocString {
    fn from(text: &str) -> Self {
        Self::new(text.lines().map(str::to_string).collect())
    }
}

impl Display for DocString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw())
    }
}
