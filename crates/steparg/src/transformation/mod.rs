//! Transformation rules and the collaborators that run them.
//!
//! A [`Transformation`] is either simple (matched on the argument's index,
//! parameter and value, ordered by priority) or pattern-based (matched by a
//! trigger pattern against the value's text, ordered by registration).

mod callee;
mod pattern;
mod repository;
mod simple;

pub use callee::{CallCenter, Callee, Invoker, TransformationCall};
pub use pattern::{PatternTarget, PatternTransformation};
pub use repository::{RuleStore, TransformationRepository};
pub use simple::{
    RETURN_TYPE_PRIORITY, SimpleMatcher, SimpleTransformation, TOKEN_NAME_AND_RETURN_TYPE_PRIORITY,
    TOKEN_NAME_PRIORITY,
};

/// A registered transformation rule.
#[derive(Debug, Clone)]
pub enum Transformation {
    Simple(SimpleTransformation),
    Pattern(PatternTransformation),
}

impl Transformation {
    pub fn pattern(&self) -> &str {
        match self {
            Transformation::Simple(t) => t.pattern(),
            Transformation::Pattern(t) => t.pattern(),
        }
    }

    /// Priority of simple transformations; pattern transformations have none.
    pub fn priority(&self) -> Option<i32> {
        match self {
            Transformation::Simple(t) => Some(t.priority()),
            Transformation::Pattern(_) => None,
        }
    }

    pub fn callee(&self) -> &Callee {
        match self {
            Transformation::Simple(t) => t.callee(),
            Transformation::Pattern(t) => t.callee(),
        }
    }

    pub fn as_simple(&self) -> Option<&SimpleTransformation> {
        match self {
            Transformation::Simple(t) => Some(t),
            Transformation::Pattern(_) => None,
        }
    }

    pub fn as_pattern(&self) -> Option<&PatternTransformation> {
        match self {
            Transformation::Pattern(t) => Some(t),
            Transformation::Simple(_) => None,
        }
    }
}

impl From<SimpleTransformation> for Transformation {
    fn from(t: SimpleTransformation) -> Self {
        Transformation::Simple(t)
    }
}

impl From<PatternTransformation> for Transformation {
    fn from(t: PatternTransformation) -> Self {
        Transformation::Pattern(t)
    }
}
