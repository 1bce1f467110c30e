//! Storage of registered transformations per environment.

use std::collections::HashMap;

use super::Transformation;
use crate::types::{Environment, EnvironmentId};

/// Provides the transformations registered for an environment.
pub trait RuleStore: Send + Sync {
    /// Transformations for `environment`, in registration order.
    fn transformations(&self, environment: &Environment) -> &[Transformation];
}

/// An in-memory [`RuleStore`].
///
/// Transformations are kept in registration order per environment; nothing
/// is deduplicated.
#[derive(Debug, Default)]
pub struct TransformationRepository {
    by_environment: HashMap<EnvironmentId, Vec<Transformation>>,
}

impl TransformationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transformation for an environment.
    pub fn register(&mut self, environment: &Environment, transformation: impl Into<Transformation>) {
        self.by_environment
            .entry(environment.id())
            .or_default()
            .push(transformation.into());
    }

    /// Register several transformations at once, keeping their order.
    pub fn extend<I, T>(&mut self, environment: &Environment, transformations: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<Transformation>,
    {
        self.by_environment
            .entry(environment.id())
            .or_default()
            .extend(transformations.into_iter().map(Into::into));
    }
}

impl RuleStore for TransformationRepository {
    fn transformations(&self, environment: &Environment) -> &[Transformation] {
        self.by_environment
            .get(&environment.id())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
