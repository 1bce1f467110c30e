//! Priority-ordered transformations that match on the argument itself.

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use super::callee::{Callee, Invoker, TransformationCall};
use crate::error::CallError;
use crate::types::{ArgumentIndex, DefinitionCall, Value};

/// Priority of transformations keyed on both parameter name and type.
pub const TOKEN_NAME_AND_RETURN_TYPE_PRIORITY: i32 = 100;
/// Priority of transformations keyed on the parameter type.
pub const RETURN_TYPE_PRIORITY: i32 = 80;
/// Priority of transformations keyed on the parameter name.
pub const TOKEN_NAME_PRIORITY: i32 = 50;

type Predicate = dyn Fn(&DefinitionCall, &ArgumentIndex, &Value) -> bool + Send + Sync;

/// Decides whether a simple transformation applies to an argument.
#[derive(Clone)]
pub enum SimpleMatcher {
    /// The parameter is declared with this type.
    ReturnType(String),
    /// The parameter has this name.
    TokenName(String),
    /// The parameter has this name and is declared with this type.
    TokenNameAndReturnType { token: String, type_name: String },
    /// Arbitrary predicate over the call, index and current value.
    Custom(Arc<Predicate>),
}

impl Debug for SimpleMatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SimpleMatcher::ReturnType(t) => f.debug_tuple("ReturnType").field(t).finish(),
            SimpleMatcher::TokenName(n) => f.debug_tuple("TokenName").field(n).finish(),
            SimpleMatcher::TokenNameAndReturnType { token, type_name } => f
                .debug_struct("TokenNameAndReturnType")
                .field("token", token)
                .field("type_name", type_name)
                .finish(),
            SimpleMatcher::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A transformation applied in priority order before any pattern transformation.
#[derive(Debug, Clone)]
pub struct SimpleTransformation {
    pattern: String,
    priority: i32,
    matcher: SimpleMatcher,
    callee: Callee,
}

impl SimpleTransformation {
    /// Applies to parameters declared with `type_name`.
    pub fn return_type(type_name: impl Into<String>, callee: Callee) -> Self {
        let type_name = type_name.into();
        Self {
            pattern: type_name.clone(),
            priority: RETURN_TYPE_PRIORITY,
            matcher: SimpleMatcher::ReturnType(type_name),
            callee,
        }
    }

    /// Applies to parameters named `token`.
    pub fn token_name(token: impl Into<String>, callee: Callee) -> Self {
        let token = token.into();
        Self {
            pattern: format!(":{token}"),
            priority: TOKEN_NAME_PRIORITY,
            matcher: SimpleMatcher::TokenName(token),
            callee,
        }
    }

    /// Applies to parameters named `token` and declared with `type_name`.
    pub fn token_name_and_return_type(
        token: impl Into<String>,
        type_name: impl Into<String>,
        callee: Callee,
    ) -> Self {
        let token = token.into();
        let type_name = type_name.into();
        Self {
            pattern: format!(":{token} {type_name}"),
            priority: TOKEN_NAME_AND_RETURN_TYPE_PRIORITY,
            matcher: SimpleMatcher::TokenNameAndReturnType { token, type_name },
            callee,
        }
    }

    /// Applies wherever `predicate` accepts the current value.
    pub fn custom<P>(pattern: impl Into<String>, priority: i32, predicate: P, callee: Callee) -> Self
    where
        P: Fn(&DefinitionCall, &ArgumentIndex, &Value) -> bool + Send + Sync + 'static,
    {
        Self {
            pattern: pattern.into(),
            priority,
            matcher: SimpleMatcher::Custom(Arc::new(predicate)),
            callee,
        }
    }

    /// Override the default priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn matcher(&self) -> &SimpleMatcher {
        &self.matcher
    }

    pub fn callee(&self) -> &Callee {
        &self.callee
    }

    pub fn supports(&self, call: &DefinitionCall, index: &ArgumentIndex, value: &Value) -> bool {
        match &self.matcher {
            SimpleMatcher::ReturnType(type_name) => {
                parameter_type(call, index) == Some(type_name.as_str())
            }
            SimpleMatcher::TokenName(token) => parameter_name(call, index) == Some(token.as_str()),
            SimpleMatcher::TokenNameAndReturnType { token, type_name } => {
                parameter_name(call, index) == Some(token.as_str())
                    && parameter_type(call, index) == Some(type_name.as_str())
            }
            SimpleMatcher::Custom(predicate) => predicate(call, index, value),
        }
    }

    /// Invoke the bound callable with the current value.
    pub fn apply(
        &self,
        invoker: &dyn Invoker,
        call: &DefinitionCall,
        index: &ArgumentIndex,
        value: Value,
    ) -> Result<Value, CallError> {
        invoker.invoke(TransformationCall {
            definition_call: call,
            transformation: &self.pattern,
            callee: &self.callee,
            index: Some(index),
            arguments: vec![value],
        })
    }
}

fn parameter_name<'a>(call: &'a DefinitionCall, index: &'a ArgumentIndex) -> Option<&'a str> {
    match index {
        ArgumentIndex::Named(name) => Some(name.as_str()),
        ArgumentIndex::Position(_) => call.definition().parameter(index).map(|p| p.name.as_str()),
    }
}

fn parameter_type<'a>(call: &'a DefinitionCall, index: &ArgumentIndex) -> Option<&'a str> {
    call.definition()
        .parameter(index)
        .and_then(|p| p.type_name.as_deref())
}
