//! Error types shared across resolution, matching and measurement.

use crate::Category;
use std::path::PathBuf;
use thiserror::Error;

/// A pattern value could not be interpreted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPatternError {
    /// The value is neither a string, a list nor a mapping
    #[error("cannot load files from a {kind} pattern: {value}")]
    UnsupportedShape {
        /// JSON type name of the value
        kind: &'static str,
        /// The value, serialized
        value: String,
    },

    /// The string is a glob with invalid syntax
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob {
        /// Offending pattern
        pattern: String,
        /// Parser message
        message: String,
    },
}

/// A run-time selector could not be compiled
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid selector '{pattern}': {message}")]
pub struct InvalidSelectorError {
    /// Selector as given
    pub pattern: String,
    /// Parser message
    pub message: String,
}

/// A file could not be hydrated into a registry entry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load {category} '{}': {reason}", .path.display())]
pub struct ResourceLoadError {
    /// Registry the file was added to
    pub category: Category,
    /// Absolute path of the file
    pub path: PathBuf,
    /// What went wrong
    pub reason: String,
}

impl ResourceLoadError {
    /// Build an error for `path` in `category`
    pub fn new(category: Category, path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self {
            category,
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// A candidate invocation failed
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The candidate reported a failure
    #[error("{0}")]
    Failed(String),

    /// The candidate process could not be started
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The candidate process exited unsuccessfully
    #[error("process exited with {}: {stderr}", .code.map_or_else(|| "signal".to_string(), |c| format!("status {c}")))]
    Exit {
        /// Exit status, `None` when killed by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// I/O failure while talking to the candidate
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A measurement did not complete
#[derive(Debug, Error)]
pub enum EngineError {
    /// The routine returned an error
    #[error("aborted: {0}")]
    Aborted(#[from] InvokeError),

    /// The routine panicked
    #[error("panicked: {0}")]
    Panicked(String),

    /// The engine finished without a single sample
    #[error("no samples collected")]
    NoSamples,
}
