//! Step-argument transformation for BDD step definitions.
//!
//! Arguments captured from a step are strings, tables or doc-strings. The
//! [`ArgumentTransformer`] converts them into the values step implementations
//! expect, using the [`Transformation`]s registered for the call's
//! environment.

pub mod builtin;
pub mod error;
pub mod i18n;
pub mod pattern;
pub mod transformation;
pub mod transformer;
pub mod types;

pub use error::{CallError, CalleeError, ConversionError, TransformError};
pub use i18n::{Catalog, LoadError, Localizer, NoTranslation, ParseError};
pub use pattern::{CompiledPattern, PatternCompiler, PatternError, StepPatternCompiler};
pub use transformation::{
    CallCenter, Callee, Invoker, PatternTarget, PatternTransformation, RuleStore, SimpleMatcher,
    SimpleTransformation, Transformation, TransformationCall, TransformationRepository,
};
pub use transformer::{ArgumentTransformer, RegexGenerator, application_order};
pub use types::{
    ArgumentIndex, Definition, DefinitionCall, DocString, Environment, EnvironmentId, Object,
    Parameter, TableNode, Value,
};
