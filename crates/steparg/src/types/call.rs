use std::fmt::{self, Display, Formatter};

use bon::Builder;

use super::{Environment, Value};

/// Position of an argument within a step definition call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgumentIndex {
    /// Positional argument, zero-based.
    Position(usize),
    /// Argument bound by placeholder name.
    Named(String),
}

impl From<usize> for ArgumentIndex {
    fn from(i: usize) -> Self {
        ArgumentIndex::Position(i)
    }
}

impl From<&str> for ArgumentIndex {
    fn from(name: &str) -> Self {
        ArgumentIndex::Named(name.to_string())
    }
}

impl Display for ArgumentIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentIndex::Position(i) => write!(f, "#{i}"),
            ArgumentIndex::Named(name) => write!(f, ":{name}"),
        }
    }
}

/// A declared parameter of a step definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    /// Declared type of the parameter, if the definition states one.
    pub type_name: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
        }
    }

    pub fn typed(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
        }
    }
}

/// A step definition: its pattern and declared parameters.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(on(String, into))]
pub struct Definition {
    pattern: String,
    #[builder(default)]
    parameters: Vec<Parameter>,
}

impl Definition {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Look up the parameter an argument index refers to.
    pub fn parameter(&self, index: &ArgumentIndex) -> Option<&Parameter> {
        match index {
            ArgumentIndex::Position(i) => self.parameters.get(*i),
            ArgumentIndex::Named(name) => self.parameters.iter().find(|p| &p.name == name),
        }
    }
}

/// The in-flight invocation of a step definition.
///
/// # Example
///
/// ```
/// use steparg::{DefinitionCall, Definition, Environment};
///
/// let call = DefinitionCall::builder()
///     .environment(Environment::new("default"))
///     .definition(Definition::builder().pattern("I have :count apples").build())
///     .language("fr")
///     .build();
/// assert_eq!(call.suite(), "default");
/// assert_eq!(call.language(), "fr");
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct DefinitionCall {
    environment: Environment,
    definition: Definition,
    /// Language of the feature file the step comes from.
    #[builder(default = "en".to_string())]
    language: String,
    #[builder(default)]
    arguments: Vec<Value>,
}

impl DefinitionCall {
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn suite(&self) -> &str {
        self.environment.suite()
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }
}
