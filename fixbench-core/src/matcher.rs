//! Match Filter
//!
//! Run-time selection of registry entries. A selector is a set of glob
//! alternatives tested against each entry's key, file name, relative path and
//! absolute path.

use crate::entry::{FileEntry, to_slash};
use crate::error::InvalidSelectorError;
use crate::pattern::expand_braces;
use crate::registry::FileRegistry;
use glob::MatchOptions;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Which entries to select
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selector {
    /// Every entry
    #[default]
    All,
    /// Entries matching any of the globs
    Patterns(Vec<String>),
}

impl Selector {
    /// Selector from command-line style arguments; empty means all
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = args.into_iter().map(Into::into).collect();
        if patterns.is_empty() {
            Selector::All
        } else {
            Selector::Patterns(patterns)
        }
    }
}

impl From<&str> for Selector {
    fn from(s: &str) -> Self {
        Selector::Patterns(vec![s.to_string()])
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => write!(f, "*"),
            Selector::Patterns(patterns) => write!(f, "{}", patterns.join(", ")),
        }
    }
}

/// Nothing in the registry matched the selector
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no {category} entries match '{selector}' ({total} registered)")]
pub struct NoMatchWarning {
    /// Selector that matched nothing
    pub selector: Selector,
    /// Category that was searched
    pub category: crate::Category,
    /// Number of entries that were checked
    pub total: usize,
}

/// Compiled selector
#[derive(Debug, Clone)]
pub struct MatchFilter {
    patterns: Option<Vec<glob::Pattern>>,
    options: MatchOptions,
}

impl MatchFilter {
    /// Compile `selector`
    pub fn new(selector: &Selector) -> Result<Self, InvalidSelectorError> {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        let patterns = match selector {
            Selector::All => None,
            Selector::Patterns(raw) => {
                let mut compiled = Vec::new();
                for pattern in raw {
                    for alternative in expand_braces(pattern) {
                        let alternative = alternative.trim_start_matches("./");
                        let glob = glob::Pattern::new(alternative).map_err(|e| {
                            InvalidSelectorError {
                                pattern: pattern.clone(),
                                message: e.msg.to_string(),
                            }
                        })?;
                        compiled.push(glob);
                    }
                }
                Some(compiled)
            }
        };
        Ok(Self { patterns, options })
    }

    /// True if `entry` is selected
    pub fn is_match(&self, entry: &FileEntry) -> bool {
        let Some(patterns) = &self.patterns else {
            return true;
        };
        let identities = [
            entry.key.clone(),
            entry.meta.basename(),
            entry.meta.relative_slash(),
            to_slash(&entry.meta.path),
        ];
        patterns.iter().any(|p| {
            identities
                .iter()
                .any(|id| p.matches_with(id, self.options))
        })
    }

    /// Matching entries of `registry`, in registry order
    pub fn filter(&self, registry: &FileRegistry) -> Vec<Arc<FileEntry>> {
        registry
            .list()
            .iter()
            .filter(|entry| self.is_match(entry))
            .cloned()
            .collect()
    }
}

/// Entries of `registry` selected by `selector`
pub fn filter(
    registry: &FileRegistry,
    selector: &Selector,
) -> Result<Vec<Arc<FileEntry>>, InvalidSelectorError> {
    let matches = MatchFilter::new(selector)?.filter(registry);
    tracing::debug!(
        "Selector '{}' matched {}/{} {} entries",
        selector,
        matches.len(),
        registry.len(),
        registry.category()
    );
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::RenameRule;

    fn fixtures(files: &[&str]) -> (tempfile::TempDir, FileRegistry) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("fixtures")).unwrap();
        let mut registry = FileRegistry::fixtures(dir.path());
        for file in files {
            let path = dir.path().join("fixtures").join(file);
            std::fs::write(&path, *file).unwrap();
            registry.add(&path).unwrap();
        }
        (dir, registry)
    }

    fn keys(entries: &[Arc<FileEntry>]) -> Vec<&str> {
        entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn test_all_keeps_registry_order() {
        let (_dir, registry) = fixtures(&["short.txt", "long.txt", "mid.txt"]);
        let matched = filter(&registry, &Selector::All).unwrap();
        assert_eq!(keys(&matched), ["short", "long", "mid"]);
    }

    #[test]
    fn test_relative_path_selects_by_identity() {
        let (_dir, registry) = fixtures(&["short.txt", "long.txt"]);
        let matched = filter(&registry, &Selector::from("fixtures/short.txt")).unwrap();
        assert_eq!(keys(&matched), ["short"]);

        let dotted = filter(&registry, &Selector::from("./fixtures/long.txt")).unwrap();
        assert_eq!(keys(&dotted), ["long"]);
    }

    #[test]
    fn test_alternation_and_globs() {
        let (_dir, registry) = fixtures(&["short.txt", "long.txt", "mid.txt"]);
        let selector = Selector::from_args(["mid", "s*"]);
        assert_eq!(keys(&filter(&registry, &selector).unwrap()), ["short", "mid"]);

        let braces = Selector::from("{long,mid}");
        assert_eq!(keys(&filter(&registry, &braces).unwrap()), ["long", "mid"]);
    }

    #[test]
    fn test_custom_rename_changes_identity() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("short.txt"), "x").unwrap();
        let mut registry = FileRegistry::fixtures(dir.path())
            .with_rename(RenameRule::custom(|m| format!("fx-{}", m.stem())));
        registry.add("short.txt").unwrap();

        assert_eq!(filter(&registry, &Selector::from("fx-*")).unwrap().len(), 1);
        assert!(filter(&registry, &Selector::from("short")).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_selector() {
        let (_dir, registry) = fixtures(&["short.txt"]);
        let err = filter(&registry, &Selector::from("[oops")).unwrap_err();
        assert_eq!(err.pattern, "[oops");
    }

    #[test]
    fn test_no_match_is_empty() {
        let (_dir, registry) = fixtures(&["short.txt"]);
        assert!(filter(&registry, &Selector::from("nothing")).unwrap().is_empty());
        assert_eq!(Selector::from_args(Vec::<String>::new()), Selector::All);
    }
}
