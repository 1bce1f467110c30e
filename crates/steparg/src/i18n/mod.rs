//! Localization of step and transformation patterns.
//!
//! A [`Localizer`] maps a pattern to its translation for a domain (the suite
//! name) and a locale. Lookups that find nothing return the pattern itself.

mod catalog;
mod error;
mod file;

use std::borrow::Cow;

pub use catalog::{Catalog, canonical_locale};
pub use error::{LoadError, ParseError};
pub use file::{TranslationEntry, parse_translations};

/// Translates patterns for a domain and locale.
pub trait Localizer: Send + Sync {
    /// Return the translation of `pattern`, or `pattern` itself when there is
    /// none.
    fn translate<'a>(&'a self, pattern: &'a str, domain: &str, locale: &str) -> Cow<'a, str>;
}

/// A localizer that never translates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTranslation;

impl Localizer for NoTranslation {
    fn translate<'a>(&'a self, pattern: &'a str, _domain: &str, _locale: &str) -> Cow<'a, str> {
        Cow::Borrowed(pattern)
    }
}
