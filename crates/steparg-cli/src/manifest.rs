//! JSON manifest describing suites, their translations and transformations.
//!
//! ```json
//! {
//!   "suites": {
//!     "default": {
//!       "translations": { "fr": "i18n/fr.trans" },
//!       "transformations": [
//!         { "kind": "simple", "value": "string", "priority": 10, "convert": "integer" },
//!         { "kind": "pattern", "pattern": "/^(\\d+) apples$/", "convert": "integer" }
//!       ]
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use steparg::{
    ArgumentTransformer, Catalog, ConversionError, Environment, LoadError, PatternTransformation,
    SimpleTransformation, Transformation, TransformationRepository, builtin,
};
use thiserror::Error;

/// Value kinds a simple transformation can be keyed on.
const VALUE_KINDS: [&str; 9] = [
    "boolean",
    "docstring",
    "float",
    "integer",
    "list",
    "map",
    "null",
    "string",
    "table",
];

/// Errors raised while loading a manifest or building a suite from it.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid manifest '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown suite '{name}', available: {}", .available.join(", "))]
    UnknownSuite { name: String, available: Vec<String> },

    #[error("transformation #{position}: {message}")]
    InvalidRule { position: usize, message: String },

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Translations(#[from] LoadError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub suites: BTreeMap<String, SuiteConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    /// Context names that make up the suite's environment.
    #[serde(default)]
    pub contexts: Vec<String>,

    /// Whether patterns are translated at all.
    #[serde(default = "enabled")]
    pub translate: bool,

    /// Translation files by locale, relative to the manifest.
    #[serde(default)]
    pub translations: BTreeMap<String, PathBuf>,

    #[serde(default)]
    pub transformations: Vec<RuleConfig>,
}

fn enabled() -> bool {
    true
}

/// A transformation bound to a built-in conversion.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleConfig {
    Simple {
        /// Parameter name the rule applies to.
        #[serde(default)]
        token: Option<String>,
        /// Declared parameter type the rule applies to.
        #[serde(default, rename = "type")]
        type_name: Option<String>,
        /// Value kind the rule applies to.
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        priority: Option<i32>,
        convert: String,
    },
    Pattern {
        pattern: String,
        convert: String,
    },
}

impl RuleConfig {
    fn build(&self, position: usize) -> Result<Transformation, ManifestError> {
        match self {
            RuleConfig::Pattern { pattern, convert } => Ok(PatternTransformation::new(
                pattern.clone(),
                builtin::conversion(convert)?,
            )
            .into()),
            RuleConfig::Simple {
                token,
                type_name,
                value,
                priority,
                convert,
            } => {
                let callee = builtin::conversion(convert)?;
                let rule = match (token, type_name, value) {
                    (Some(token), Some(type_name), None) => {
                        SimpleTransformation::token_name_and_return_type(
                            token.clone(),
                            type_name.clone(),
                            callee,
                        )
                    }
                    (Some(token), None, None) => {
                        SimpleTransformation::token_name(token.clone(), callee)
                    }
                    (None, Some(type_name), None) => {
                        SimpleTransformation::return_type(type_name.clone(), callee)
                    }
                    (None, None, Some(kind)) => {
                        if !VALUE_KINDS.contains(&kind.as_str()) {
                            return Err(ManifestError::InvalidRule {
                                position,
                                message: format!(
                                    "unknown value kind '{kind}', expected one of: {}",
                                    VALUE_KINDS.join(", ")
                                ),
                            });
                        }
                        let kind = kind.clone();
                        SimpleTransformation::custom(
                            format!("<{kind}>"),
                            0,
                            move |_, _, value| value.kind() == kind,
                            callee,
                        )
                    }
                    _ => {
                        return Err(ManifestError::InvalidRule {
                            position,
                            message: "a simple transformation needs `token` and/or `type`, or `value` alone"
                                .to_string(),
                        });
                    }
                };
                let rule = match priority {
                    Some(priority) => rule.with_priority(*priority),
                    None => rule,
                };
                Ok(rule.into())
            }
        }
    }
}

/// A suite ready to transform arguments.
pub struct Project {
    pub environment: Environment,
    pub transformer: ArgumentTransformer,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ManifestError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn suite(&self, name: &str) -> Result<&SuiteConfig, ManifestError> {
        self.suites
            .get(name)
            .ok_or_else(|| ManifestError::UnknownSuite {
                name: name.to_string(),
                available: self.suites.keys().cloned().collect(),
            })
    }

    /// Build the engine for one suite. Translation paths are resolved
    /// against `base_dir`.
    pub fn build(&self, base_dir: &Path, suite: &str) -> Result<Project, ManifestError> {
        let config = self.suite(suite)?;
        let environment = Environment::with_contexts(suite, config.contexts.iter().cloned());

        let mut catalog = Catalog::builder().enabled(config.translate).build();
        for (locale, path) in &config.translations {
            catalog.load_file(suite, locale, base_dir.join(path))?;
        }

        let mut repository = TransformationRepository::new();
        for (position, rule) in config.transformations.iter().enumerate() {
            repository.register(&environment, rule.build(position)?);
        }

        let transformer = ArgumentTransformer::builder()
            .repository(Arc::new(repository))
            .localizer(Arc::new(catalog))
            .build();
        Ok(Project {
            environment,
            transformer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use steparg::{ArgumentIndex, Definition, DefinitionCall, RegexGenerator, Value};
    use tempfile::tempdir;

    fn manifest(json: &str) -> Manifest {
        serde_json::from_str(json).unwrap()
    }

    fn call(project: &Project, language: &str) -> DefinitionCall {
        DefinitionCall::builder()
            .environment(project.environment.clone())
            .definition(Definition::builder().pattern("").build())
            .language(language)
            .build()
    }

    #[test]
    fn builds_simple_and_pattern_rules() {
        let manifest = manifest(
            r#"{
                "suites": {
                    "default": {
                        "transformations": [
                            { "kind": "pattern", "pattern": "/^(\\d+) apples$/", "convert": "integer" },
                            { "kind": "simple", "value": "string", "priority": 5, "convert": "trim" }
                        ]
                    }
                }
            }"#,
        );
        let project = manifest.build(Path::new("."), "default").unwrap();
        let order: Vec<&str> = project
            .transformer
            .application_order(&call(&project, "en"))
            .iter()
            .map(|t| t.pattern())
            .collect();
        assert_eq!(order, vec!["<string>", r"/^(\d+) apples$/"]);

        let value = project
            .transformer
            .transform(
                &call(&project, "en"),
                &ArgumentIndex::Position(0),
                " 3 apples ".into(),
            )
            .unwrap();
        assert_eq!(value, Value::Integer(3));
    }

    #[test]
    fn loads_translations_relative_to_base_dir() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("fr.trans"),
            r#""/^(\d+) apples$/" = "/^(\d+) pommes$/";"#,
        )
        .unwrap();
        let manifest = manifest(
            r#"{ "suites": { "default": { "translations": { "fr": "fr.trans" } } } }"#,
        );
        let project = manifest.build(dir.path(), "default").unwrap();
        let regex = project
            .transformer
            .generate_regex("default", r"/^(\d+) apples$/", "fr")
            .unwrap();
        assert_eq!(regex.source(), r"/^(\d+) pommes$/");
    }

    #[test]
    fn disabled_translation_keeps_original_pattern() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("fr.trans"), r#""a" = "b";"#).unwrap();
        let manifest = manifest(
            r#"{ "suites": { "default": { "translate": false, "translations": { "fr": "fr.trans" } } } }"#,
        );
        let project = manifest.build(dir.path(), "default").unwrap();
        let regex = project
            .transformer
            .generate_regex("default", "a", "fr")
            .unwrap();
        assert_eq!(regex.source(), "a");
    }

    #[test]
    fn unknown_suite_lists_available() {
        let manifest = manifest(r#"{ "suites": { "web": {}, "api": {} } }"#);
        let err = manifest.build(Path::new("."), "cli").err().unwrap();
        assert_eq!(err.to_string(), "unknown suite 'cli', available: api, web");
    }

    #[test]
    fn unknown_conversion_is_reported() {
        let manifest = manifest(
            r#"{ "suites": { "default": { "transformations": [
                { "kind": "pattern", "pattern": "/x/", "convert": "integr" }
            ] } } }"#,
        );
        let err = manifest.build(Path::new("."), "default").err().unwrap();
        assert_eq!(
            err.to_string(),
            "unknown conversion 'integr', did you mean: integer?"
        );
    }

    #[test]
    fn simple_rule_needs_a_key() {
        let manifest = manifest(
            r#"{ "suites": { "default": { "transformations": [
                { "kind": "simple", "convert": "trim" }
            ] } } }"#,
        );
        let err = manifest.build(Path::new("."), "default").err().unwrap();
        assert!(matches!(err, ManifestError::InvalidRule { position: 0, .. }));
    }
}
