//! Bound transformation callables and the invoker that runs them.

use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::warn;

use crate::error::{CallError, CalleeError};
use crate::types::{ArgumentIndex, DefinitionCall, Value};

type CalleeFn = dyn Fn(&[Value]) -> Result<Value, CalleeError> + Send + Sync;

/// A named, shareable transformation callable.
///
/// # Example
///
/// ```
/// use steparg::{Callee, Value};
///
/// let double = Callee::new("double", |args: &[Value]| {
///     let n = args[0].as_integer().ok_or("not an integer")?;
///     Ok(Value::Integer(n * 2))
/// });
/// assert_eq!(double.call(&[Value::Integer(4)]).unwrap(), Value::Integer(8));
/// ```
#[derive(Clone)]
pub struct Callee {
    name: String,
    func: Arc<CalleeFn>,
}

impl Callee {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, CalleeError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the callable directly, outside of any invoker.
    pub fn call(&self, arguments: &[Value]) -> Result<Value, CalleeError> {
        (self.func)(arguments)
    }
}

impl Debug for Callee {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callee")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Everything an [`Invoker`] needs to run one transformation callable.
#[derive(Debug)]
pub struct TransformationCall<'a> {
    /// The step definition call whose argument is being transformed.
    pub definition_call: &'a DefinitionCall,
    /// Pattern of the transformation that owns the callable.
    pub transformation: &'a str,
    pub callee: &'a Callee,
    /// Index of the argument, when the transformation is index-aware.
    pub index: Option<&'a ArgumentIndex>,
    pub arguments: Vec<Value>,
}

/// Executes bound transformation callables.
pub trait Invoker: Send + Sync {
    fn invoke(&self, call: TransformationCall<'_>) -> Result<Value, CallError>;
}

/// The standard invoker.
///
/// Errors returned by the callable become [`CallError::Failed`]; panics are
/// caught and become [`CallError::Panicked`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CallCenter;

impl Invoker for CallCenter {
    fn invoke(&self, call: TransformationCall<'_>) -> Result<Value, CallError> {
        let TransformationCall {
            transformation,
            callee,
            arguments,
            ..
        } = call;
        match catch_unwind(AssertUnwindSafe(|| callee.call(&arguments))) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => Err(CallError::Failed {
                transformation: transformation.to_string(),
                source,
            }),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(transformation, callee = callee.name(), %message, "transformation panicked");
                Err(CallError::Panicked {
                    transformation: transformation.to_string(),
                    message,
                })
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
