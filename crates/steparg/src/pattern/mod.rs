//! Compiling step and transformation patterns into regular expressions.
//!
//! Three pattern syntaxes are understood:
//! - `/body/flags` is a regular expression with optional `imsxu` flags
//! - `table:`, `rowtable:` and `row:` prefixed patterns match table
//!   signatures literally
//! - anything else is a turnip pattern (see [`turnip`](self))

mod error;
mod turnip;

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use regex::Regex;

pub use error::PatternError;

/// Prefixes of trigger patterns that match table signatures.
pub const TABLE_PREFIXES: [&str; 3] = ["table:", "rowtable:", "row:"];

/// Which syntax a pattern was compiled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSyntax {
    Regex,
    Turnip,
    Table,
}

/// A compiled pattern together with the text it was compiled from.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
    syntax: PatternSyntax,
}

impl CompiledPattern {
    /// The pattern text this matcher was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn syntax(&self) -> PatternSyntax {
        self.syntax
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Captured arguments for `text`, or `None` if it does not match.
    ///
    /// Returns the capture groups in order, with non-participating groups as
    /// empty strings. A pattern without groups yields the whole match. Quoted
    /// turnip placeholder captures have their quotes removed.
    pub fn captures(&self, text: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(text)?;
        if caps.len() == 1 {
            return Some(vec![caps[0].to_string()]);
        }
        let values = caps
            .iter()
            .skip(1)
            .map(|m| {
                let value = m.map_or("", |m| m.as_str());
                if self.syntax == PatternSyntax::Turnip {
                    unquote(value).to_string()
                } else {
                    value.to_string()
                }
            })
            .collect();
        Some(values)
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Compiles pattern strings into matchers.
pub trait PatternCompiler: Send + Sync {
    fn compile(&self, pattern: &str) -> Result<CompiledPattern, PatternError>;
}

/// Patterns a [`StepPatternCompiler`] keeps compiled by default.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// The standard pattern compiler.
///
/// Compiled patterns are cached by pattern text, so a trigger pattern checked
/// against many arguments is only compiled once. The cache holds at most
/// `capacity` patterns; inserting into a full cache empties it first.
#[derive(Debug)]
pub struct StepPatternCompiler {
    cache: RwLock<HashMap<String, CompiledPattern>>,
    capacity: usize,
}

impl Default for StepPatternCompiler {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl StepPatternCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A compiler caching at most `capacity` patterns. Zero disables caching.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Number of patterns currently cached.
    pub fn cached(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl PatternCompiler for StepPatternCompiler {
    fn compile(&self, pattern: &str) -> Result<CompiledPattern, PatternError> {
        if let Some(hit) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(pattern)
        {
            return Ok(hit.clone());
        }

        let compiled = compile_uncached(pattern)?;
        if self.capacity > 0 {
            let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
            if cache.len() >= self.capacity {
                cache.clear();
            }
            cache.insert(pattern.to_string(), compiled.clone());
        }
        Ok(compiled)
    }
}

fn compile_uncached(pattern: &str) -> Result<CompiledPattern, PatternError> {
    let (regex_source, syntax) = if pattern.starts_with('/') {
        (delimited_regex(pattern)?, PatternSyntax::Regex)
    } else if TABLE_PREFIXES.iter().any(|p| pattern.starts_with(p)) {
        (format!("^{}$", regex::escape(pattern)), PatternSyntax::Table)
    } else {
        (turnip::to_regex(pattern)?, PatternSyntax::Turnip)
    };

    let regex = Regex::new(&regex_source).map_err(|source| PatternError::Regex {
        pattern: pattern.to_string(),
        source,
    })?;
    Ok(CompiledPattern {
        source: pattern.to_string(),
        regex,
        syntax,
    })
}

/// Convert `/body/flags` into a regex source with an inline flag group.
fn delimited_regex(pattern: &str) -> Result<String, PatternError> {
    let end = pattern
        .rfind('/')
        .filter(|&end| end > 0)
        .ok_or_else(|| PatternError::Syntax {
            pattern: pattern.to_string(),
            position: pattern.len(),
            message: "missing closing '/' delimiter".to_string(),
        })?;
    let body = &pattern[1..end];
    let flags = &pattern[end + 1..];

    let mut inline = String::new();
    for (offset, flag) in flags.char_indices() {
        match flag {
            'i' | 'm' | 's' | 'x' => inline.push(flag),
            // Unicode matching is always on.
            'u' => {}
            other => {
                return Err(PatternError::Syntax {
                    pattern: pattern.to_string(),
                    position: end + 1 + offset,
                    message: format!("unknown regex flag '{other}'"),
                });
            }
        }
    }

    if inline.is_empty() {
        Ok(body.to_string())
    } else {
        Ok(format!("(?{inline}){body}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimited_regex_applies_flags() {
        let compiled = StepPatternCompiler::new().compile("/^hello$/i").unwrap();
        assert_eq!(compiled.regex().as_str(), "(?i)^hello$");
        assert!(compiled.is_match("HELLO"));
        assert_eq!(compiled.syntax(), PatternSyntax::Regex);
    }

    #[test]
    fn delimited_regex_without_closing_slash() {
        let err = StepPatternCompiler::new().compile("/").unwrap_err();
        assert!(matches!(err, PatternError::Syntax { .. }));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let err = StepPatternCompiler::new().compile("/a/q").unwrap_err();
        assert!(err.to_string().contains("unknown regex flag 'q'"));
    }

    #[test]
    fn table_patterns_match_literally() {
        let compiled = StepPatternCompiler::new()
            .compile("table:name,age")
            .unwrap();
        assert!(compiled.is_match("table:name,age"));
        assert!(!compiled.is_match("table:name,age,city"));
    }

    #[test]
    fn captures_without_groups_yield_whole_match() {
        let compiled = StepPatternCompiler::new().compile("/\\d+/").unwrap();
        assert_eq!(compiled.captures("abc 42"), Some(vec!["42".to_string()]));
    }

    #[test]
    fn turnip_captures_are_unquoted() {
        let compiled = StepPatternCompiler::new()
            .compile("user :name is :age")
            .unwrap();
        assert_eq!(
            compiled.captures(r#"user "Ann Lee" is 30"#),
            Some(vec!["Ann Lee".to_string(), "30".to_string()])
        );
    }

    #[test]
    fn compiled_patterns_are_cached() {
        let compiler = StepPatternCompiler::new();
        compiler.compile("/a/").unwrap();
        compiler.compile("/a/").unwrap();
        compiler.compile("b").unwrap();
        assert_eq!(compiler.cached(), 2);
    }

    #[test]
    fn cache_never_exceeds_its_capacity() {
        let compiler = StepPatternCompiler::with_capacity(2);
        for pattern in ["/a/", "/b/", "/c/", "/d/", "/e/"] {
            compiler.compile(pattern).unwrap();
            assert!(compiler.cached() <= 2);
        }
        assert!(compiler.compile("/e/").unwrap().is_match("e"));

        let uncached = StepPatternCompiler::with_capacity(0);
        uncached.compile("/a/").unwrap();
        assert_eq!(uncached.cached(), 0);
    }

    #[test]
    fn invalid_regex_is_reported_with_pattern() {
        let err = StepPatternCompiler::new().compile("/(unclosed/").unwrap_err();
        assert_eq!(err.pattern(), "/(unclosed/");
        assert!(matches!(err, PatternError::Regex { .. }));
    }
}
