mod call;
mod environment;
mod node;
mod value;

pub use call::{ArgumentIndex, Definition, DefinitionCall, Parameter};
pub use environment::{Environment, EnvironmentId};
pub use node::{DocString, TableNode};
pub use value::{Object, Value};
