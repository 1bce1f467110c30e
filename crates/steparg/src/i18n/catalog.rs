//! Translation catalog keyed by domain and locale.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use bon::Builder;
use icu_locale_core::LanguageIdentifier;
use tracing::debug;

use super::Localizer;
use super::error::{LoadError, ParseError};
use super::file::parse_translations;

type CatalogKey = (String, String);

/// Pattern translations, grouped by domain (suite name) and locale.
///
/// Locales are canonicalized, so `pt_br`, `pt-BR` and `PT-br` all name the
/// same catalog. With `fallback` enabled a lookup for `fr-CA` that finds
/// nothing falls back to `fr`.
///
/// # Example
///
/// ```
/// use steparg::{Catalog, Localizer};
///
/// let mut catalog = Catalog::builder().build();
/// catalog.insert("default", "fr", "I have :count apples", "J'ai :count pommes");
///
/// assert_eq!(
///     catalog.translate("I have :count apples", "default", "fr-CA"),
///     "J'ai :count pommes"
/// );
/// assert_eq!(catalog.translate("unknown", "default", "fr"), "unknown");
/// ```
#[derive(Debug, Builder)]
pub struct Catalog {
    /// When disabled every lookup is the identity.
    #[builder(default = true)]
    enabled: bool,

    /// Fall back from a regional locale to its bare language.
    #[builder(default = true)]
    fallback: bool,

    #[builder(skip)]
    messages: HashMap<CatalogKey, HashMap<String, String>>,

    /// File paths for reload support. Only populated for file-loaded catalogs.
    #[builder(skip)]
    loaded_paths: HashMap<CatalogKey, PathBuf>,
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::builder().build()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Add a single translation.
    pub fn insert(
        &mut self,
        domain: &str,
        locale: &str,
        source: impl Into<String>,
        translation: impl Into<String>,
    ) {
        self.messages
            .entry(key(domain, locale))
            .or_default()
            .insert(source.into(), translation.into());
    }

    /// Load translations from a string, replacing any previously loaded for
    /// the same domain and locale. Returns the number of entries loaded.
    pub fn load_str(
        &mut self,
        domain: &str,
        locale: &str,
        content: &str,
    ) -> Result<usize, ParseError> {
        let entries = parse_translations(content)?;
        let count = entries.len();
        let messages = entries
            .into_iter()
            .map(|e| (e.source, e.translation))
            .collect();
        let key = key(domain, locale);
        self.loaded_paths.remove(&key);
        self.messages.insert(key, messages);
        Ok(count)
    }

    /// Load translations from a file, remembering the path for [`Catalog::reload`].
    pub fn load_file(
        &mut self,
        domain: &str,
        locale: &str,
        path: impl AsRef<Path>,
    ) -> Result<usize, LoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let count = self
            .load_str(domain, locale, &content)
            .map_err(|err| match err {
                ParseError::Syntax {
                    line,
                    column,
                    message,
                } => LoadError::Parse {
                    path: path.to_path_buf(),
                    line,
                    column,
                    message,
                },
            })?;
        self.loaded_paths.insert(key(domain, locale), path.to_path_buf());
        debug!(domain, locale, count, path = %path.display(), "loaded translations");
        Ok(count)
    }

    /// Re-read a file-loaded catalog from disk.
    pub fn reload(&mut self, domain: &str, locale: &str) -> Result<usize, LoadError> {
        let path = self
            .loaded_paths
            .get(&key(domain, locale))
            .cloned()
            .ok_or_else(|| LoadError::NoPathForReload {
                domain: domain.to_string(),
                locale: locale.to_string(),
            })?;
        self.load_file(domain, locale, path)
    }

    /// Number of translations for a domain and locale.
    pub fn len(&self, domain: &str, locale: &str) -> usize {
        self.messages
            .get(&key(domain, locale))
            .map_or(0, HashMap::len)
    }

    /// Canonical locales that have translations for a domain, sorted.
    pub fn locales(&self, domain: &str) -> Vec<&str> {
        let mut locales: Vec<&str> = self
            .messages
            .keys()
            .filter(|(d, _)| d == domain)
            .map(|(_, l)| l.as_str())
            .collect();
        locales.sort_unstable();
        locales
    }

    fn lookup(&self, pattern: &str, domain: &str, locale: &str) -> Option<&str> {
        let canonical = canonical_locale(locale);
        let exact = self
            .messages
            .get(&(domain.to_string(), canonical.clone()))
            .and_then(|m| m.get(pattern));
        if exact.is_some() || !self.fallback {
            return exact.map(String::as_str);
        }
        let language = base_language(&canonical)?;
        if language == canonical {
            return None;
        }
        self.messages
            .get(&(domain.to_string(), language))
            .and_then(|m| m.get(pattern))
            .map(String::as_str)
    }
}

impl Localizer for Catalog {
    fn translate<'a>(&'a self, pattern: &'a str, domain: &str, locale: &str) -> Cow<'a, str> {
        if !self.enabled {
            return Cow::Borrowed(pattern);
        }
        match self.lookup(pattern, domain, locale) {
            Some(translated) => Cow::Borrowed(translated),
            None => Cow::Borrowed(pattern),
        }
    }
}

fn key(domain: &str, locale: &str) -> CatalogKey {
    (domain.to_string(), canonical_locale(locale))
}

/// Canonical BCP-47 form of a locale, or the lowercased input if it does
/// not parse.
pub fn canonical_locale(locale: &str) -> String {
    LanguageIdentifier::try_from_str(&locale.replace('_', "-"))
        .map_or_else(|_| locale.to_lowercase(), |id| id.to_string())
}

fn base_language(canonical: &str) -> Option<String> {
    let id = LanguageIdentifier::try_from_str(canonical).ok()?;
    Some(id.language.to_string())
}
