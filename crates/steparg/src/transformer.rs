//! The argument transformation engine.

use std::sync::Arc;

use bon::Builder;
use tracing::{debug, trace};

use crate::error::TransformError;
use crate::i18n::{Localizer, NoTranslation};
use crate::pattern::{CompiledPattern, PatternCompiler, PatternError, StepPatternCompiler};
use crate::transformation::{
    CallCenter, Invoker, PatternTransformation, RuleStore, SimpleTransformation, Transformation,
};
use crate::types::{ArgumentIndex, DefinitionCall, Value};

/// Produces compiled matchers for (possibly localized) patterns.
///
/// Pattern transformations receive this capability, not the whole engine,
/// when they need their trigger compiled.
pub trait RegexGenerator {
    /// Compile `pattern` as translated for `suite` and `language`.
    ///
    /// Exactly one pattern is compiled: the translation if there is one,
    /// otherwise the original.
    fn generate_regex(
        &self,
        suite: &str,
        pattern: &str,
        language: &str,
    ) -> Result<CompiledPattern, PatternError>;
}

/// Transforms step arguments using the transformations registered for the
/// call's environment.
///
/// Simple transformations run first, highest priority first, with equal
/// priorities kept in registration order. Pattern transformations run next,
/// in registration order. Each rule sees the value produced by the rule
/// before it. Opaque [`Value::Object`]s are never handed to a rule.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use steparg::{
///     ArgumentIndex, ArgumentTransformer, Callee, Definition, DefinitionCall, Environment,
///     PatternTransformation, TransformationRepository, Value,
/// };
///
/// let environment = Environment::new("default");
/// let mut repository = TransformationRepository::new();
/// repository.register(
///     &environment,
///     PatternTransformation::new(
///         r"/^(\d+)$/",
///         Callee::new("int", |args: &[Value]| {
///             Ok(Value::Integer(args[0].as_str().unwrap_or("0").parse()?))
///         }),
///     ),
/// );
///
/// let transformer = ArgumentTransformer::builder()
///     .repository(Arc::new(repository))
///     .build();
/// let call = DefinitionCall::builder()
///     .environment(environment)
///     .definition(Definition::builder().pattern("I have :count apples").build())
///     .build();
///
/// let value = transformer
///     .transform(&call, &ArgumentIndex::Position(0), "42".into())
///     .unwrap();
/// assert_eq!(value, Value::Integer(42));
/// ```
#[derive(Builder)]
pub struct ArgumentTransformer {
    repository: Arc<dyn RuleStore>,

    #[builder(default = Arc::new(CallCenter) as Arc<dyn Invoker>)]
    invoker: Arc<dyn Invoker>,

    #[builder(default = Arc::new(StepPatternCompiler::new()) as Arc<dyn PatternCompiler>)]
    compiler: Arc<dyn PatternCompiler>,

    #[builder(default = Arc::new(NoTranslation) as Arc<dyn Localizer>)]
    localizer: Arc<dyn Localizer>,
}

impl ArgumentTransformer {
    /// Whether the call's environment has any transformation at all.
    pub fn supports_any_transformation(&self, call: &DefinitionCall) -> bool {
        !self
            .repository
            .transformations(call.environment())
            .is_empty()
    }

    /// Transform an argument value.
    ///
    /// Returns the value unchanged when no transformation applies. Fails only
    /// if a callable fails or a trigger pattern cannot be compiled; the
    /// remaining transformations are then skipped.
    pub fn transform(
        &self,
        call: &DefinitionCall,
        index: &ArgumentIndex,
        value: Value,
    ) -> Result<Value, TransformError> {
        let transformations = self.repository.transformations(call.environment());

        let value = self.apply_simple_transformations(call, transformations, index, value)?;
        self.apply_pattern_transformations(call, transformations, index, value)
    }

    /// Transformations for the call's environment, in application order.
    pub fn application_order<'a>(&'a self, call: &DefinitionCall) -> Vec<&'a Transformation> {
        application_order(self.repository.transformations(call.environment()))
    }

    fn apply_simple_transformations(
        &self,
        call: &DefinitionCall,
        transformations: &[Transformation],
        index: &ArgumentIndex,
        value: Value,
    ) -> Result<Value, TransformError> {
        simple_in_priority_order(transformations)
            .into_iter()
            .filter_map(Transformation::as_simple)
            .try_fold(value, |value, transformation| {
                self.apply_one(call, Rule::Simple(transformation), index, value)
            })
    }

    fn apply_pattern_transformations(
        &self,
        call: &DefinitionCall,
        transformations: &[Transformation],
        index: &ArgumentIndex,
        value: Value,
    ) -> Result<Value, TransformError> {
        transformations
            .iter()
            .filter_map(Transformation::as_pattern)
            .try_fold(value, |value, transformation| {
                self.apply_one(call, Rule::Pattern(transformation), index, value)
            })
    }

    fn apply_one(
        &self,
        call: &DefinitionCall,
        rule: Rule<'_>,
        index: &ArgumentIndex,
        value: Value,
    ) -> Result<Value, TransformError> {
        if !value.is_transformable() {
            trace!(%index, kind = value.kind(), "value is opaque, skipping transformation");
            return Ok(value);
        }

        match rule {
            Rule::Simple(transformation) => {
                if !transformation.supports(call, index, &value) {
                    trace!(pattern = transformation.pattern(), %index, "simple transformation skipped");
                    return Ok(value);
                }
                debug!(
                    pattern = transformation.pattern(),
                    priority = transformation.priority(),
                    %index,
                    "applying simple transformation"
                );
                Ok(transformation.apply(self.invoker.as_ref(), call, index, value)?)
            }
            Rule::Pattern(transformation) => {
                if !transformation.supports(self, call, &value)? {
                    trace!(pattern = transformation.pattern(), %index, "pattern transformation skipped");
                    return Ok(value);
                }
                debug!(pattern = transformation.pattern(), %index, "applying pattern transformation");
                transformation.apply(self, self.invoker.as_ref(), call, value)
            }
        }
    }
}

impl RegexGenerator for ArgumentTransformer {
    fn generate_regex(
        &self,
        suite: &str,
        pattern: &str,
        language: &str,
    ) -> Result<CompiledPattern, PatternError> {
        let translated = self.localizer.translate(pattern, suite, language);
        if translated == pattern {
            return self.compiler.compile(pattern);
        }

        debug!(suite, language, pattern, translated = %translated, "using translated pattern");
        self.compiler.compile(&translated)
    }
}

#[derive(Clone, Copy)]
enum Rule<'a> {
    Simple(&'a SimpleTransformation),
    Pattern(&'a PatternTransformation),
}

/// Simple transformations sorted by descending priority.
///
/// The sort is stable: equal priorities keep their registration order.
pub fn simple_in_priority_order(transformations: &[Transformation]) -> Vec<&Transformation> {
    let mut simple: Vec<&Transformation> = transformations
        .iter()
        .filter(|t| t.as_simple().is_some())
        .collect();
    simple.sort_by(|left, right| right.priority().cmp(&left.priority()));
    simple
}

/// All transformations in the order the engine applies them: simple ones
/// by priority, then pattern ones in registration order.
pub fn application_order(transformations: &[Transformation]) -> Vec<&Transformation> {
    let mut ordered = simple_in_priority_order(transformations);
    ordered.extend(transformations.iter().filter(|t| t.as_pattern().is_some()));
    ordered
}
