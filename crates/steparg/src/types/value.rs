use std::any::{Any, type_name};
use std::collections::BTreeMap;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::{DocString, TableNode};

/// A runtime value flowing through the transformation pipeline.
///
/// Step arguments start out as strings, tables or doc-strings. Transformations
/// may turn them into any other shape, including opaque [`Object`]s that the
/// engine never hands to another rule.
///
/// # Example
///
/// ```
/// use steparg::Value;
///
/// let count: Value = 42.into();
/// assert_eq!(count.as_integer(), Some(42));
///
/// let name: Value = "Alice".into();
/// assert_eq!(name.text().as_deref(), Some("Alice"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),

    /// A Gherkin data table.
    Table(TableNode),

    /// A Gherkin doc-string.
    DocString(DocString),

    /// An already-materialized domain value.
    Object(Object),
}

impl Value {
    /// Wrap a domain value as an opaque object.
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Value::Object(Object::new(value))
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&TableNode> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Whether this value is a table or doc-string node.
    pub fn is_structured_argument(&self) -> bool {
        matches!(self, Value::Table(_) | Value::DocString(_))
    }

    /// Whether transformation rules may look at this value at all.
    ///
    /// Structured arguments and plain data are; opaque objects are not.
    pub fn is_transformable(&self) -> bool {
        self.is_structured_argument() || self.as_object().is_none()
    }

    /// The text that text-target trigger patterns are matched against.
    ///
    /// Only scalars have a text form. Tables and doc-strings are structured
    /// arguments and are matched through their own trigger prefixes.
    pub fn text(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Integer(n) => Some(n.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null
            | Value::List(_)
            | Value::Map(_)
            | Value::Table(_)
            | Value::DocString(_)
            | Value::Object(_) => None,
        }
    }

    /// Short name of this value's shape, used in logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Table(_) => "table",
            Value::DocString(_) => "docstring",
            Value::Object(_) => "object",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {item}")?;
                }
                f.write_str("}")
            }
            Value::Table(t) => write!(f, "{t}"),
            Value::DocString(d) => write!(f, "{d}"),
            Value::Object(o) => write!(f, "<{}>", o.type_name()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => items.serialize(serializer),
            Value::Map(map) => map.serialize(serializer),
            Value::Table(t) => t.rows().serialize(serializer),
            Value::DocString(d) => serializer.serialize_str(&d.raw()),
            Value::Object(o) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("object", o.type_name())?;
                map.end()
            }
        }
    }
}

/// An opaque, shareable domain value produced by a transformation.
///
/// Equality is identity: two objects are equal only when they share the
/// same allocation.
#[derive(Clone)]
pub struct Object {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Object {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: type_name::<T>(),
            inner: Arc::new(value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Debug for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

// From implementations for common types

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<TableNode> for Value {
    fn from(t: TableNode) -> Self {
        Value::Table(t)
    }
}

impl From<DocString> for Value {
    fn from(d: DocString) -> Self {
        Value::DocString(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_structured_values() {
        let table = TableNode::from_rows(vec![
            vec!["name".to_string(), "age".to_string()],
            vec!["ann".to_string(), "31".to_string()],
        ]);
        let value = Value::List(vec![
            Value::Integer(3),
            Value::Table(table),
            Value::DocString(DocString::from("a\nb")),
            Value::object(7_i32),
        ]);
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!([3, [["name", "age"], ["ann", "31"]], "a\nb", { "object": "i32" }])
        );
    }

    #[test]
    fn only_objects_are_opaque() {
        assert!(!Value::object("done").is_transformable());
        assert!(Value::Map(BTreeMap::new()).is_transformable());
        assert!(Value::Table(TableNode::new(Vec::new())).is_transformable());
    }

    #[test]
    fn objects_compare_by_identity() {
        let a = Value::object(1_u8);
        assert_eq!(a, a.clone());
        assert_ne!(a, Value::object(1_u8));
    }
}
