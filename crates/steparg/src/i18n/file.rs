//! Translation file parser.
//!
//! A translation file maps source patterns to translated patterns:
//!
//! ```text
//! // apples
//! "/^(\d+) apples$/" = "/^(\d+) pommes$/";
//! ```
//!
//! Strings are double-quoted; `\"` and `\\` are the only escapes, every
//! other backslash is kept verbatim so regex escapes survive untouched.

use winnow::combinator::{alt, delimited, preceded, repeat, terminated};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use super::error::ParseError;

/// A single `source = translation` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    pub source: String,
    pub translation: String,
}

/// Parse an entire translation file.
pub fn parse_translations(input: &str) -> Result<Vec<TranslationEntry>, ParseError> {
    let mut remaining = input;
    match file(&mut remaining) {
        Ok(entries) => {
            if remaining.is_empty() {
                Ok(entries)
            } else {
                let (line, column) = calculate_position(input, remaining);
                Err(ParseError::Syntax {
                    line,
                    column,
                    message: format!(
                        "unexpected character: '{}'",
                        remaining.chars().next().unwrap_or('?')
                    ),
                })
            }
        }
        Err(e) => {
            let (line, column) = calculate_position(input, remaining);
            Err(ParseError::Syntax {
                line,
                column,
                message: format!("parse error: {e}"),
            })
        }
    }
}

/// Calculate line and column from original input and remaining input.
fn calculate_position(original: &str, remaining: &str) -> (usize, usize) {
    let consumed = original.len() - remaining.len();
    let consumed_str = &original[..consumed];
    let line = consumed_str.chars().filter(|&c| c == '\n').count() + 1;
    let column = match consumed_str.rfind('\n') {
        Some(pos) => consumed - pos,
        None => consumed + 1,
    };
    (line, column)
}

fn file(input: &mut &str) -> ModalResult<Vec<TranslationEntry>> {
    skip_ws_and_comments(input)?;
    repeat(0.., terminated(entry, skip_ws_and_comments)).parse_next(input)
}

/// Skip whitespace and line comments.
fn skip_ws_and_comments(input: &mut &str) -> ModalResult<()> {
    let _: Vec<()> = repeat(0.., alt((ws_only.void(), line_comment.void()))).parse_next(input)?;
    Ok(())
}

fn ws_only<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., char::is_whitespace).parse_next(input)
}

/// Parse a line comment: // ... newline
fn line_comment<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    preceded("//", take_while(0.., |c| c != '\n')).parse_next(input)
}

/// Parse an entry: "source" = "translation" ;
fn entry(input: &mut &str) -> ModalResult<TranslationEntry> {
    let source = quoted(input)?;
    skip_ws_and_comments(input)?;
    '='.parse_next(input)?;
    skip_ws_and_comments(input)?;
    let translation = quoted(input)?;
    skip_ws_and_comments(input)?;
    ';'.parse_next(input)?;
    Ok(TranslationEntry {
        source,
        translation,
    })
}

enum Fragment<'i> {
    Literal(&'i str),
    Escaped(char),
}

fn quoted(input: &mut &str) -> ModalResult<String> {
    delimited(
        '"',
        repeat(0.., fragment).fold(String::new, |mut text, piece| {
            match piece {
                Fragment::Literal(s) => text.push_str(s),
                Fragment::Escaped(c) => text.push(c),
            }
            text
        }),
        '"',
    )
    .parse_next(input)
}

fn fragment<'i>(input: &mut &'i str) -> ModalResult<Fragment<'i>> {
    alt((
        preceded('\\', one_of(['"', '\\'])).map(Fragment::Escaped),
        ('\\', any).take().map(Fragment::Literal),
        take_while(1.., |c: char| c != '"' && c != '\\').map(Fragment::Literal),
    ))
    .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entries_and_comments() {
        let entries = parse_translations(
            r#"
            // apples
            "I have :count apples" = "J'ai :count pommes";
            "a" = "b"; // trailing
            "#,
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].source, "I have :count apples");
        assert_eq!(entries[0].translation, "J'ai :count pommes");
    }

    #[test]
    fn quote_and_backslash_escapes() {
        let entries = parse_translations(r#""say \"hi\"" = "a\\b";"#).unwrap();
        assert_eq!(entries[0].source, r#"say "hi""#);
        assert_eq!(entries[0].translation, r"a\b");
    }

    #[test]
    fn missing_semicolon_reports_position() {
        let err = parse_translations("\"a\" = \"b\"\n\"c\" = \"d\";").unwrap_err();
        let ParseError::Syntax { line, column, .. } = err;
        assert_eq!((line, column), (1, 1));
    }
}
