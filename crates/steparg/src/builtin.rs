//! Built-in conversions usable as transformation callables.
//!
//! Conversions read their first argument. Text conversions accept scalars and
//! doc-strings; table conversions require a table.

use std::collections::BTreeMap;

use strsim::levenshtein;

use crate::error::{CalleeError, ConversionError};
use crate::transformation::Callee;
use crate::types::Value;

type Conversion = fn(&Value) -> Result<Value, ConversionError>;

const CONVERSIONS: [(&str, Conversion); 9] = [
    ("boolean", boolean),
    ("float", float),
    ("integer", integer),
    ("lowercase", lowercase),
    ("rows", rows),
    ("rows_hash", rows_hash),
    ("text", text_of),
    ("trim", trim),
    ("uppercase", uppercase),
];

/// Names of all built-in conversions, sorted.
pub fn names() -> Vec<&'static str> {
    CONVERSIONS.iter().map(|(name, _)| *name).collect()
}

/// Look up a built-in conversion by name.
///
/// # Example
///
/// ```
/// use steparg::{Value, builtin};
///
/// let integer = builtin::conversion("integer").unwrap();
/// assert_eq!(integer.call(&["42".into()]).unwrap(), Value::Integer(42));
///
/// let err = builtin::conversion("integr").unwrap_err();
/// assert_eq!(err.to_string(), "unknown conversion 'integr', did you mean: integer?");
/// ```
pub fn conversion(name: &str) -> Result<Callee, ConversionError> {
    let Some(&(conversion, func)) = CONVERSIONS.iter().find(|(n, _)| *n == name) else {
        let available: Vec<String> = names().into_iter().map(str::to_string).collect();
        return Err(ConversionError::Unknown {
            name: name.to_string(),
            suggestions: compute_suggestions(name, &available),
        });
    };
    Ok(Callee::new(conversion, move |args: &[Value]| {
        let value = args
            .first()
            .ok_or(ConversionError::MissingArgument { conversion })?;
        func(value).map_err(CalleeError::from)
    }))
}

/// Names in `available` within edit distance of `key`, closest first.
///
/// Keys of up to three characters allow distance 1, longer keys distance 2.
/// At most three suggestions are returned.
pub fn compute_suggestions(key: &str, available: &[String]) -> Vec<String> {
    let max_distance = if key.chars().count() <= 3 { 1 } else { 2 };
    let mut candidates: Vec<(usize, &String)> = available
        .iter()
        .map(|name| (levenshtein(key, name), name))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();
    candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    candidates
        .into_iter()
        .take(3)
        .map(|(_, name)| name.clone())
        .collect()
}

fn text(conversion: &'static str, value: &Value) -> Result<String, ConversionError> {
    match value {
        Value::DocString(doc) => Ok(doc.raw()),
        _ => value.text().ok_or_else(|| unconvertible(conversion, value)),
    }
}

fn unconvertible(conversion: &'static str, value: &Value) -> ConversionError {
    ConversionError::Unconvertible {
        conversion,
        kind: value.kind(),
        value: value.to_string(),
    }
}

fn integer(value: &Value) -> Result<Value, ConversionError> {
    match value {
        Value::Integer(_) => Ok(value.clone()),
        Value::String(s) => s
            .trim()
            .parse()
            .map(Value::Integer)
            .map_err(|_| unconvertible("integer", value)),
        _ => Err(unconvertible("integer", value)),
    }
}

fn float(value: &Value) -> Result<Value, ConversionError> {
    if let Some(f) = value.as_float() {
        return Ok(Value::Float(f));
    }
    match value {
        Value::String(s) => s
            .trim()
            .parse()
            .map(Value::Float)
            .map_err(|_| unconvertible("float", value)),
        _ => Err(unconvertible("float", value)),
    }
}

fn boolean(value: &Value) -> Result<Value, ConversionError> {
    match value {
        Value::Bool(_) => Ok(value.clone()),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
            _ => Err(unconvertible("boolean", value)),
        },
        _ => Err(unconvertible("boolean", value)),
    }
}

fn text_of(value: &Value) -> Result<Value, ConversionError> {
    text("text", value).map(Value::String)
}

fn trim(value: &Value) -> Result<Value, ConversionError> {
    text("trim", value).map(|s| Value::String(s.trim().to_string()))
}

fn lowercase(value: &Value) -> Result<Value, ConversionError> {
    text("lowercase", value).map(|s| Value::String(s.to_lowercase()))
}

fn uppercase(value: &Value) -> Result<Value, ConversionError> {
    text("uppercase", value).map(|s| Value::String(s.to_uppercase()))
}

fn rows(value: &Value) -> Result<Value, ConversionError> {
    let table = value.as_table().ok_or_else(|| unconvertible("rows", value))?;
    Ok(Value::List(
        table
            .hash()
            .into_iter()
            .map(|row| Value::Map(into_value_map(row)))
            .collect(),
    ))
}

fn rows_hash(value: &Value) -> Result<Value, ConversionError> {
    let table = value
        .as_table()
        .ok_or_else(|| unconvertible("rows_hash", value))?;
    Ok(Value::Map(into_value_map(table.rows_hash())))
}

fn into_value_map(map: BTreeMap<String, String>) -> BTreeMap<String, Value> {
    map.into_iter().map(|(k, v)| (k, Value::String(v))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DocString, TableNode};

    #[test]
    fn compute_suggestions_finds_similar_names() {
        let available: Vec<String> = names().into_iter().map(str::to_string).collect();
        assert_eq!(compute_suggestions("flot", &available), vec!["float"]);
        assert_eq!(compute_suggestions("rows_hsh", &available), vec!["rows_hash"]);
        assert!(compute_suggestions("xyz", &available).is_empty());
    }

    #[test]
    fn boolean_accepts_common_spellings() {
        let convert = conversion("boolean").unwrap();
        assert_eq!(convert.call(&["Yes".into()]).unwrap(), Value::Bool(true));
        assert_eq!(convert.call(&["off".into()]).unwrap(), Value::Bool(false));
        assert!(convert.call(&["maybe".into()]).is_err());
    }

    #[test]
    fn float_widens_integers() {
        let convert = conversion("float").unwrap();
        assert_eq!(convert.call(&[Value::Integer(2)]).unwrap(), Value::Float(2.0));
        assert_eq!(convert.call(&[" 2.5 ".into()]).unwrap(), Value::Float(2.5));
    }

    #[test]
    fn integer_rejects_non_numbers() {
        let err = conversion("integer")
            .unwrap()
            .call(&["five".into()])
            .unwrap_err();
        assert_eq!(err.to_string(), "conversion 'integer' cannot convert string 'five'");
    }

    #[test]
    fn missing_argument() {
        let err = conversion("trim").unwrap().call(&[]).unwrap_err();
        assert_eq!(err.to_string(), "conversion 'trim' expects an argument");
    }

    #[test]
    fn text_conversions_reject_tables() {
        let table = TableNode::from_rows([vec!["name"], vec!["Ann"]]);
        for name in ["text", "trim", "lowercase", "uppercase"] {
            let err = conversion(name)
                .unwrap()
                .call(&[table.clone().into()])
                .unwrap_err();
            assert!(
                err.to_string().starts_with(&format!("conversion '{name}' cannot convert table")),
                "{err}"
            );
        }
    }

    #[test]
    fn text_conversions_read_doc_strings() {
        let doc = DocString::from("  Hello\nWorld  ");
        let value = conversion("uppercase").unwrap().call(&[doc.into()]).unwrap();
        assert_eq!(value, Value::from("  HELLO\nWORLD  "));
    }

    #[test]
    fn rows_hash_reads_key_value_table() {
        let table = TableNode::from_rows([vec!["name", "Ann"], vec!["age", "30"]]);
        let value = conversion("rows_hash").unwrap().call(&[table.into()]).unwrap();
        let Value::Map(map) = value else {
            panic!("expected a map");
        };
        assert_eq!(map["name"], Value::from("Ann"));
        assert_eq!(map["age"], Value::from("30"));
    }

    #[test]
    fn rows_reads_header_keyed_rows() {
        let table = TableNode::from_rows([vec!["name"], vec!["Ann"], vec!["Bob"]]);
        let value = conversion("rows").unwrap().call(&[table.into()]).unwrap();
        assert_eq!(value.to_string(), "[{name: Ann}, {name: Bob}]");
    }
}
