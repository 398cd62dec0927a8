//! Pattern Resolution
//!
//! Patterns describe files: a literal path, a glob, a list of patterns or a
//! mapping of names to patterns. Resolving one adds every file it names to a
//! [`FileRegistry`].

use crate::error::{InvalidPatternError, ResourceLoadError};
use crate::registry::FileRegistry;
use glob::MatchOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A file pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum Pattern {
    /// Literal path or glob
    Path(String),
    /// Each element resolved in order
    List(Vec<Pattern>),
    /// Values resolved in key order; keys become entry aliases
    Map(BTreeMap<String, Pattern>),
}

impl TryFrom<Value> for Pattern {
    type Error = InvalidPatternError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Pattern::Path(s)),
            Value::Array(items) => items
                .into_iter()
                .map(Pattern::try_from)
                .collect::<Result<_, _>>()
                .map(Pattern::List),
            Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| Pattern::try_from(v).map(|p| (k, p)))
                .collect::<Result<_, _>>()
                .map(Pattern::Map),
            other => {
                let kind = match other {
                    Value::Null => "null",
                    Value::Bool(_) => "boolean",
                    _ => "number",
                };
                Err(InvalidPatternError::UnsupportedShape {
                    kind,
                    value: other.to_string(),
                })
            }
        }
    }
}

impl From<Pattern> for Value {
    fn from(pattern: Pattern) -> Self {
        match pattern {
            Pattern::Path(s) => Value::String(s),
            Pattern::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Pattern::Map(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Pattern::Path(s.to_string())
    }
}

impl From<String> for Pattern {
    fn from(s: String) -> Self {
        Pattern::Path(s)
    }
}

impl<T: Into<Pattern>> From<Vec<T>> for Pattern {
    fn from(items: Vec<T>) -> Self {
        Pattern::List(items.into_iter().map(Into::into).collect())
    }
}

/// True if `s` contains glob metacharacters
pub fn is_glob(s: &str) -> bool {
    s.contains(['*', '?', '[', '{'])
}

/// Expand `{a,b}` alternations into separate patterns.
///
/// Groups without a top-level comma are left as they are.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    match find_brace_group(pattern) {
        Some((open, close)) => {
            let prefix = &pattern[..open];
            let suffix = &pattern[close + 1..];
            split_top_level(&pattern[open + 1..close])
                .into_iter()
                .flat_map(|alt| expand_braces(&format!("{}{}{}", prefix, alt, suffix)))
                .collect()
        }
        None => vec![pattern.to_string()],
    }
}

fn find_brace_group(pattern: &str) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut open = 0;
    let mut has_comma = false;
    for (i, b) in pattern.bytes().enumerate() {
        match b {
            b'{' => {
                if depth == 0 {
                    open = i;
                    has_comma = false;
                }
                depth += 1;
            }
            b',' if depth == 1 => has_comma = true,
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 && has_comma {
                    return Some((open, i));
                }
            }
            _ => {}
        }
    }
    None
}

fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, b) in body.bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

/// Outcome of resolving one pattern
#[derive(Debug, Default)]
pub struct Resolution {
    /// Absolute paths added or reloaded, in resolution order
    pub added: Vec<PathBuf>,
    /// Files that failed to hydrate; their siblings are unaffected
    pub failed: Vec<ResourceLoadError>,
}

impl Resolution {
    /// True when nothing was added and nothing failed
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.failed.is_empty()
    }
}

/// Expands patterns into registry entries
#[derive(Debug, Clone, Copy)]
pub struct PatternResolver {
    options: MatchOptions,
}

impl Default for PatternResolver {
    fn default() -> Self {
        Self {
            options: MatchOptions {
                case_sensitive: true,
                require_literal_separator: true,
                require_literal_leading_dot: true,
            },
        }
    }
}

impl PatternResolver {
    /// Resolver with case-sensitive, separator-aware matching
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every file `pattern` names to `registry`.
    ///
    /// Glob syntax is checked for the whole pattern before anything is added.
    pub fn resolve(
        &self,
        registry: &mut FileRegistry,
        pattern: &Pattern,
    ) -> Result<Resolution, InvalidPatternError> {
        validate(pattern)?;
        let mut resolution = Resolution::default();
        self.resolve_into(registry, pattern, None, &mut resolution)?;
        tracing::debug!(
            "Resolved {} {} file(s), {} failed",
            resolution.added.len(),
            registry.category(),
            resolution.failed.len()
        );
        Ok(resolution)
    }

    /// Files matched by a glob string, sorted within each brace alternative
    pub fn expand(&self, cwd: &Path, glob: &str) -> Result<Vec<PathBuf>, InvalidPatternError> {
        let mut paths = Vec::new();
        for alternative in expand_braces(glob) {
            let alternative = alternative.trim_start_matches("./");
            let full = if Path::new(alternative).is_absolute() {
                alternative.to_string()
            } else {
                format!(
                    "{}/{}",
                    glob::Pattern::escape(&cwd.to_string_lossy()),
                    alternative
                )
            };

            let matches = glob::glob_with(&full, self.options).map_err(|e| {
                InvalidPatternError::InvalidGlob {
                    pattern: glob.to_string(),
                    message: e.msg.to_string(),
                }
            })?;

            let mut found: Vec<PathBuf> = matches
                .filter_map(|m| match m {
                    Ok(path) => Some(path),
                    Err(e) => {
                        tracing::debug!("Skipping unreadable path: {}", e);
                        None
                    }
                })
                .filter(|p| p.is_file())
                .collect();
            found.sort();

            for path in found {
                if !paths.contains(&path) {
                    paths.push(path);
                }
            }
        }
        Ok(paths)
    }

    fn resolve_into(
        &self,
        registry: &mut FileRegistry,
        pattern: &Pattern,
        alias: Option<&str>,
        resolution: &mut Resolution,
    ) -> Result<(), InvalidPatternError> {
        match pattern {
            Pattern::Path(s) if is_glob(s) => {
                let paths = self.expand(registry.cwd(), s)?;
                if paths.is_empty() {
                    tracing::warn!("Pattern '{}' matched no {} files", s, registry.category());
                }
                for path in paths {
                    add(registry, path, alias, resolution);
                }
            }
            Pattern::Path(s) => add(registry, PathBuf::from(s), alias, resolution),
            Pattern::List(items) => {
                for item in items {
                    self.resolve_into(registry, item, alias, resolution)?;
                }
            }
            Pattern::Map(map) => {
                for (key, value) in map {
                    self.resolve_into(registry, value, Some(key), resolution)?;
                }
            }
        }
        Ok(())
    }
}

fn add(
    registry: &mut FileRegistry,
    path: PathBuf,
    alias: Option<&str>,
    resolution: &mut Resolution,
) {
    match registry.add_with_alias(&path, alias.map(str::to_string)) {
        Ok(entry) => {
            if !resolution.added.contains(&entry.meta.path) {
                resolution.added.push(entry.meta.path.clone());
            }
        }
        Err(e) => {
            tracing::warn!("{}", e);
            resolution.failed.push(e);
        }
    }
}

fn validate(pattern: &Pattern) -> Result<(), InvalidPatternError> {
    match pattern {
        Pattern::Path(s) if is_glob(s) => {
            for alternative in expand_braces(s) {
                glob::Pattern::new(&alternative).map_err(|e| InvalidPatternError::InvalidGlob {
                    pattern: s.clone(),
                    message: e.msg.to_string(),
                })?;
            }
            Ok(())
        }
        Pattern::Path(_) => Ok(()),
        Pattern::List(items) => items.iter().try_for_each(validate),
        Pattern::Map(map) => map.values().try_for_each(validate),
    }
}
