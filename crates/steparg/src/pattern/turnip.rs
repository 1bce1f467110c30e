//! Turnip pattern parser.
//!
//! Turnip patterns are the human-friendly step syntax:
//! - `:name` is a placeholder capturing a bare word or a quoted string
//! - `(text)` is optional text
//! - `one/other` is an alternation between words
//! - `\` escapes the next character

use winnow::combinator::{alt, delimited, preceded, repeat};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use super::error::PatternError;

/// Regex fragment a placeholder expands to.
const PLACEHOLDER_BODY: &str = r#""[^"]*"|'[^']*'|[^\s"']+"#;

#[derive(Debug, PartialEq)]
enum Segment<'i> {
    Literal(&'i str),
    Escaped(char),
    Placeholder(&'i str),
    Optional(&'i str),
    Alternation(Vec<&'i str>),
}

/// Translate a turnip pattern into an anchored regex source string.
pub(crate) fn to_regex(pattern: &str) -> Result<String, PatternError> {
    let mut remaining = pattern;
    let segments: Vec<Segment<'_>> = repeat(0.., segment)
        .parse_next(&mut remaining)
        .map_err(|e| PatternError::Syntax {
            pattern: pattern.to_string(),
            position: pattern.len() - remaining.len(),
            message: format!("parse error: {e}"),
        })?;

    if let Some(c) = remaining.chars().next() {
        let message = match c {
            '(' => "unclosed '('".to_string(),
            ')' => "unmatched ')'".to_string(),
            other => format!("unexpected character: '{other}'"),
        };
        return Err(PatternError::Syntax {
            pattern: pattern.to_string(),
            position: pattern.len() - remaining.len(),
            message,
        });
    }

    let mut regex = String::with_capacity(pattern.len() * 2 + 2);
    regex.push('^');
    for segment in &segments {
        render(segment, &mut regex);
    }
    regex.push('$');
    Ok(regex)
}

fn render(segment: &Segment<'_>, out: &mut String) {
    match segment {
        Segment::Literal(text) => out.push_str(&regex::escape(text)),
        Segment::Escaped(c) => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        Segment::Placeholder(name) => {
            out.push_str("(?P<");
            out.push_str(name);
            out.push('>');
            out.push_str(PLACEHOLDER_BODY);
            out.push(')');
        }
        Segment::Optional(text) => {
            out.push_str("(?:");
            out.push_str(&regex::escape(text));
            out.push_str(")?");
        }
        Segment::Alternation(words) => {
            out.push_str("(?:");
            for (i, word) in words.iter().enumerate() {
                if i > 0 {
                    out.push('|');
                }
                out.push_str(&regex::escape(word));
            }
            out.push(')');
        }
    }
}

fn segment<'i>(input: &mut &'i str) -> ModalResult<Segment<'i>> {
    alt((escaped, placeholder, lone_colon, optional, whitespace, word)).parse_next(input)
}

fn escaped<'i>(input: &mut &'i str) -> ModalResult<Segment<'i>> {
    preceded('\\', any).map(Segment::Escaped).parse_next(input)
}

fn placeholder<'i>(input: &mut &'i str) -> ModalResult<Segment<'i>> {
    preceded(':', identifier)
        .map(Segment::Placeholder)
        .parse_next(input)
}

/// A colon that does not start a placeholder, as in `10:30`.
fn lone_colon<'i>(input: &mut &'i str) -> ModalResult<Segment<'i>> {
    ":".map(Segment::Literal).parse_next(input)
}

fn identifier<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

fn optional<'i>(input: &mut &'i str) -> ModalResult<Segment<'i>> {
    delimited('(', take_while(0.., |c: char| c != '(' && c != ')'), ')')
        .map(Segment::Optional)
        .parse_next(input)
}

fn whitespace<'i>(input: &mut &'i str) -> ModalResult<Segment<'i>> {
    take_while(1.., char::is_whitespace)
        .map(Segment::Literal)
        .parse_next(input)
}

fn word<'i>(input: &mut &'i str) -> ModalResult<Segment<'i>> {
    take_while(1.., |c: char| {
        !c.is_whitespace() && !matches!(c, '\\' | ':' | '(' | ')')
    })
    .map(|w: &'i str| {
        let parts: Vec<&str> = w.split('/').collect();
        if parts.len() > 1 && parts.iter().all(|p| !p.is_empty()) {
            Segment::Alternation(parts)
        } else {
            Segment::Literal(w)
        }
    })
    .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_escaped_and_anchored() {
        assert_eq!(to_regex("I pay $5.00").unwrap(), r"^I pay \$5\.00$");
    }

    #[test]
    fn placeholder_becomes_named_group() {
        let regex = to_regex("I have :count apples").unwrap();
        assert_eq!(
            regex,
            format!("^I have (?P<count>{PLACEHOLDER_BODY}) apples$")
        );
    }

    #[test]
    fn optional_and_alternation() {
        assert_eq!(
            to_regex("I eat apple(s) today/tomorrow").unwrap(),
            r"^I eat apple(?:s)? (?:today|tomorrow)$"
        );
    }

    #[test]
    fn colon_without_name_is_literal() {
        assert_eq!(to_regex("at 10:30").unwrap(), "^at 10:30$");
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(to_regex(r"a \:literal \(x\)").unwrap(), r"^a :literal \(x\)$");
    }

    #[test]
    fn unclosed_parenthesis_reports_position() {
        let err = to_regex("apple(s").unwrap_err();
        match err {
            PatternError::Syntax {
                position, message, ..
            } => {
                assert_eq!(position, 5);
                assert_eq!(message, "unclosed '('");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn stray_closing_parenthesis() {
        let err = to_regex("apples)").unwrap_err();
        assert!(err.to_string().contains("unmatched ')'"));
    }
}
