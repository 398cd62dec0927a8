#![warn(missing_docs)]
//! FixBench Core - Files, Patterns and Measurement
//!
//! This crate provides the pieces a benchmark session is assembled from:
//! - `FileRegistry`: per-category store of hydrated fixture and code entries
//! - `PatternResolver`: expands literal paths, globs, lists and mappings into registry entries
//! - `MatchFilter`: selects entries by glob against their identity
//! - `TimingEngine`: the measurement boundary, with `SamplingEngine` as the default engine

mod bencher;
mod entry;
mod error;
mod hydrate;
mod matcher;
mod pattern;
mod registry;

pub use bencher::{SamplingConfig, SamplingEngine, Timer};
pub use entry::{
    Candidate, FileEntry, FileMeta, Fixture, FixtureContent, Invoke, InvokeInput, Payload,
    RenameRule, candidate_fn,
};
pub use error::{
    EngineError, InvalidPatternError, InvalidSelectorError, InvokeError, ResourceLoadError,
};
pub use hydrate::{
    CodeHydrator, CodeResolver, CommandResolver, FixtureHydrator, FnResolver, Hydrate,
    default_interpreters,
};
pub use matcher::{MatchFilter, NoMatchWarning, Selector, filter};
pub use pattern::{Pattern, PatternResolver, Resolution, expand_braces, is_glob};
pub use registry::FileRegistry;

use serde::{Deserialize, Serialize};

/// Kind of file a registry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Benchmark input data
    Fixture,
    /// Candidate implementation
    Code,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Fixture => write!(f, "fixture"),
            Category::Code => write!(f, "code"),
        }
    }
}

/// One completed measurement reported by a [`TimingEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Number of samples the engine collected
    pub samples: usize,
    /// Throughput in operations per second
    pub ops_per_second: f64,
    /// Relative margin of error as a percentage
    pub relative_margin_of_error: f64,
}

/// Measurement boundary.
///
/// Engines run one routine at a time and block until the measurement is
/// complete. `on_cycle` is called with interim figures while sampling.
pub trait TimingEngine {
    /// Measure `routine`, identified by `name`
    fn measure(
        &mut self,
        name: &str,
        routine: &mut dyn FnMut() -> Result<(), InvokeError>,
        on_cycle: &mut dyn FnMut(&Measurement),
    ) -> Result<Measurement, EngineError>;
}
