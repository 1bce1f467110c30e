use std::fmt::{self, Display, Formatter};

use const_fnv1a_hash::fnv1a_hash_str_64;
use serde::{Deserialize, Serialize};

/// A compact identifier for an execution environment.
///
/// `EnvironmentId` wraps a 64-bit FNV-1a hash of the suite name and the
/// environment's context names, so the same suite/context set always maps
/// to the same id and the id can be used as a rule-store key.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentId(u64);

impl EnvironmentId {
    /// Create an id for a suite with no contexts at compile time.
    ///
    /// ```
    /// use steparg::{Environment, EnvironmentId};
    ///
    /// const DEFAULT: EnvironmentId = EnvironmentId::from_suite("default");
    /// assert_eq!(Environment::new("default").id(), DEFAULT);
    /// ```
    pub const fn from_suite(suite: &str) -> Self {
        Self(fnv1a_hash_str_64(suite))
    }
}

impl Display for EnvironmentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "EnvironmentId({:016x})", self.0)
    }
}

/// The execution environment a step definition runs in.
///
/// An environment belongs to one suite and carries the names of the
/// contexts it was built from. The engine only ever compares environments
/// by [`EnvironmentId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    suite: String,
    contexts: Vec<String>,
    id: EnvironmentId,
}

impl Environment {
    /// Create an environment for a suite with no contexts.
    pub fn new(suite: impl Into<String>) -> Self {
        Self::with_contexts(suite, Vec::<String>::new())
    }

    /// Create an environment for a suite built from the given contexts.
    pub fn with_contexts<I, S>(suite: impl Into<String>, contexts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let suite = suite.into();
        let contexts: Vec<String> = contexts.into_iter().map(Into::into).collect();
        let id = if contexts.is_empty() {
            EnvironmentId::from_suite(&suite)
        } else {
            EnvironmentId(fnv1a_hash_str_64(&format!(
                "{suite}\u{0}{}",
                contexts.join("\u{0}")
            )))
        };
        Self {
            suite,
            contexts,
            id,
        }
    }

    /// Name of the suite this environment belongs to.
    pub fn suite(&self) -> &str {
        &self.suite
    }

    pub fn contexts(&self) -> &[String] {
        &self.contexts
    }

    pub fn id(&self) -> EnvironmentId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contexts_distinguish_environments_of_one_suite() {
        let plain = Environment::new("web");
        let browser = Environment::with_contexts("web", ["BrowserContext"]);
        assert_eq!(plain.id(), EnvironmentId::from_suite("web"));
        assert_ne!(plain.id(), browser.id());
        assert_eq!(browser.suite(), "web");
        assert_eq!(browser.contexts(), ["BrowserContext".to_string()]);
        assert_eq!(
            browser.id(),
            Environment::with_contexts("web", vec!["BrowserContext".to_string()]).id()
        );
    }
}
