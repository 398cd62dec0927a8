//! File Registry
//!
//! Per-category store of hydrated entries, keyed by absolute path and kept
//! in insertion order.

use crate::Category;
use crate::entry::{FileEntry, FileMeta, RenameRule};
use crate::error::ResourceLoadError;
use crate::hydrate::{CodeHydrator, CodeResolver, FixtureHydrator, Hydrate};
use fxhash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Ordered, path-unique collection of [`FileEntry`] values
pub struct FileRegistry {
    category: Category,
    cwd: PathBuf,
    rename: RenameRule,
    hydrator: Arc<dyn Hydrate>,
    entries: Vec<Arc<FileEntry>>,
    index: FxHashMap<PathBuf, usize>,
}

impl FileRegistry {
    /// Registry for `category` with an explicit hydrator
    pub fn new(category: Category, cwd: impl AsRef<Path>, hydrator: Arc<dyn Hydrate>) -> Self {
        let cwd = cwd.as_ref();
        Self {
            category,
            cwd: std::path::absolute(cwd).unwrap_or_else(|_| cwd.to_path_buf()),
            rename: RenameRule::default(),
            hydrator,
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Fixture registry reading files from disk
    pub fn fixtures(cwd: impl AsRef<Path>) -> Self {
        Self::new(Category::Fixture, cwd, Arc::new(FixtureHydrator))
    }

    /// Code registry loading candidates through `resolver`
    pub fn code(cwd: impl AsRef<Path>, resolver: Arc<dyn CodeResolver>) -> Self {
        Self::new(Category::Code, cwd, Arc::new(CodeHydrator::new(resolver)))
    }

    /// Use `rule` to derive keys for entries added from now on
    pub fn with_rename(mut self, rule: RenameRule) -> Self {
        self.rename = rule;
        self
    }

    /// Load or reload `path`
    pub fn add(&mut self, path: impl AsRef<Path>) -> Result<Arc<FileEntry>, ResourceLoadError> {
        self.add_with_alias(path, None)
    }

    /// Load or reload `path`, recording the mapping key it came from.
    ///
    /// A path already present keeps its position; its payload is replaced.
    /// On failure the registry is unchanged.
    pub fn add_with_alias(
        &mut self,
        path: impl AsRef<Path>,
        alias: Option<String>,
    ) -> Result<Arc<FileEntry>, ResourceLoadError> {
        let meta = FileMeta::new(self.category, &self.cwd, path);
        let payload = self.hydrator.hydrate(&meta)?;
        let key = self.rename.key_for(&meta);

        let existing = self.index.get(&meta.path).copied();
        match existing {
            Some(slot) => {
                let alias = alias.or_else(|| self.entries[slot].alias.clone());
                let entry = Arc::new(FileEntry {
                    meta,
                    key,
                    alias,
                    payload,
                });
                tracing::debug!("Reloaded {}", entry);
                self.entries[slot] = Arc::clone(&entry);
                Ok(entry)
            }
            None => {
                let entry = Arc::new(FileEntry {
                    meta,
                    key,
                    alias,
                    payload,
                });
                tracing::debug!("Added {}", entry);
                self.index
                    .insert(entry.meta.path.clone(), self.entries.len());
                self.entries.push(Arc::clone(&entry));
                Ok(entry)
            }
        }
    }

    /// Entries in insertion order
    pub fn list(&self) -> &[Arc<FileEntry>] {
        &self.entries
    }

    /// Entry for `path`, resolved against the registry cwd
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&Arc<FileEntry>> {
        let meta = FileMeta::new(self.category, &self.cwd, path);
        self.index.get(&meta.path).map(|&slot| &self.entries[slot])
    }

    /// First entry with `key`
    pub fn get_by_key(&self, key: &str) -> Option<&Arc<FileEntry>> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// First entry registered under mapping key `alias`
    pub fn get_by_alias(&self, alias: &str) -> Option<&Arc<FileEntry>> {
        self.entries
            .iter()
            .find(|e| e.alias.as_deref() == Some(alias))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been added
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Absolute working directory
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Category of every entry
    pub fn category(&self) -> Category {
        self.category
    }
}

impl std::fmt::Debug for FileRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileRegistry")
            .field("category", &self.category)
            .field("cwd", &self.cwd)
            .field("rename", &self.rename)
            .field("entries", &self.entries.len())
            .finish()
    }
}
