//! CLI command implementations.

mod regex;
mod rules;
mod transform;

use std::fs::read_to_string;
use std::path::Path;

use miette::miette;
use steparg::LoadError;
use tracing::debug;

pub use regex::{run_regex, RegexArgs};
pub use rules::{run_rules, RulesArgs};
pub use transform::{run_transform, TransformArgs};

use crate::manifest::{Manifest, ManifestError, Project};
use crate::output::TranslationDiagnostic;

/// Load a manifest and build one of its suites.
///
/// Translation syntax errors are reported with source context.
fn open_project(manifest_path: &Path, suite: &str) -> miette::Result<Project> {
    let manifest = Manifest::load(manifest_path).map_err(|e| miette!("{e}"))?;
    let base_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));

    match manifest.build(base_dir, suite) {
        Ok(project) => {
            debug!(manifest = %manifest_path.display(), suite, "opened suite");
            Ok(project)
        }
        Err(ManifestError::Translations(LoadError::Parse {
            path,
            line,
            column,
            message,
        })) => {
            let content = read_to_string(&path)
                .map_err(|e| miette!("Cannot read translation file {}: {}", path.display(), e))?;
            Err(TranslationDiagnostic::new(&path, &content, line, column, &message).into())
        }
        Err(e) => Err(miette!("{e}")),
    }
}
