//! Configuration loading from fixbench.toml
//!
//! FixBench configuration can be specified in a `fixbench.toml` file in the
//! project root. The configuration is discovered by walking up from the
//! current directory; command-line flags override file values.

use fixbench_core::{Pattern, SamplingConfig, default_interpreters};
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the configuration file
pub const CONFIG_FILE: &str = "fixbench.toml";

/// FixBench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FixConfig {
    /// Which files make up the suite
    #[serde(default)]
    pub suite: SuiteConfig,
    /// Sampling engine configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// How code files are executed
    #[serde(default)]
    pub code: CodeConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Dry-run configuration
    #[serde(default)]
    pub dry_run: DryRunConfig,
}

/// Suite composition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Base directory, relative to the config file
    #[serde(default)]
    pub cwd: Option<String>,
    /// Fixture pattern: a path, glob, list or table
    #[serde(default = "default_fixtures")]
    pub fixtures: Pattern,
    /// Code pattern: a path, glob, list or table
    #[serde(default = "default_code")]
    pub code: Pattern,
    /// Entry property used as the key: stem, basename, relative, ...
    #[serde(default)]
    pub rename_key: Option<String>,
    /// Fixture selector used when none is given on the command line
    #[serde(default)]
    pub selector: Vec<String>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            cwd: None,
            fixtures: default_fixtures(),
            code: default_code(),
            rename_key: None,
            selector: Vec::new(),
        }
    }
}

fn default_fixtures() -> Pattern {
    Pattern::from("fixtures/*")
}
fn default_code() -> Pattern {
    Pattern::from("code/*")
}

/// Runner configuration for the sampling engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Warmup duration before measurement (e.g., "200ms")
    #[serde(default = "default_warmup")]
    pub warmup_time: String,
    /// Measurement budget per candidate (e.g., "1s")
    #[serde(default = "default_measurement")]
    pub measurement_time: String,
    /// Target sample count
    #[serde(default)]
    pub samples: Option<usize>,
    /// Minimum number of measured invocations
    #[serde(default)]
    pub min_iterations: Option<u64>,
    /// Maximum number of measured invocations
    #[serde(default)]
    pub max_iterations: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            warmup_time: default_warmup(),
            measurement_time: default_measurement(),
            samples: None,
            min_iterations: None,
            max_iterations: None,
        }
    }
}

fn default_warmup() -> String {
    "200ms".to_string()
}
fn default_measurement() -> String {
    "1s".to_string()
}

/// Code execution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeConfig {
    /// Extension → interpreter command
    #[serde(default = "default_interpreter_table")]
    pub interpreters: BTreeMap<String, String>,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            interpreters: default_interpreter_table(),
        }
    }
}

fn default_interpreter_table() -> BTreeMap<String, String> {
    default_interpreters().into_iter().collect()
}

impl CodeConfig {
    /// Interpreter table for `CommandResolver`
    pub fn interpreter_map(&self) -> FxHashMap<String, String> {
        self.interpreters
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human" or "json"
    #[serde(default = "default_format")]
    pub format: String,
    /// Write the report to this file instead of stdout
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            path: None,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

/// Dry-run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DryRunConfig {
    /// Compare each output with the last element of JSON-array fixtures
    #[serde(default)]
    pub verify: bool,
}

impl FixConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Walk up from the current directory looking for `fixbench.toml`
    pub fn discover() -> Option<(PathBuf, Self)> {
        Self::discover_from(&std::env::current_dir().ok()?)
    }

    /// Walk up from `start`; returns the directory holding the file and its contents
    pub fn discover_from(start: &Path) -> Option<(PathBuf, Self)> {
        let mut dir = start.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some((dir, config)),
                    Err(e) => {
                        tracing::warn!("Ignoring {}: {}", config_path.display(), e);
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Sampling engine settings
    pub fn sampling_config(&self) -> anyhow::Result<SamplingConfig> {
        let defaults = SamplingConfig::default();
        Ok(SamplingConfig {
            warmup_time_ns: Self::parse_duration(&self.runner.warmup_time)?,
            measurement_time_ns: Self::parse_duration(&self.runner.measurement_time)?,
            target_samples: self.runner.samples.unwrap_or(defaults.target_samples),
            min_iterations: self.runner.min_iterations,
            max_iterations: self.runner.max_iterations,
            fence: defaults.fence,
        })
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# FixBench Configuration

[suite]
# Base directory (defaults to the directory holding this file;
# a `benchmark/` subdirectory is used when present)
# cwd = "."
# Fixture files: a path, a glob, a list, or a table of named patterns
fixtures = "fixtures/*"
# Candidate implementations
code = "code/*"
# Key entries by: stem, basename, extension, relative, path, dirname
# rename_key = "stem"
# Fixtures to run when no selector is given
# selector = ["*.json"]

[runner]
# Warmup duration before measurement
warmup_time = "200ms"
# Measurement budget per candidate
measurement_time = "1s"
# Target sample count (uncomment to change)
# samples = 50
# Minimum measured invocations (uncomment to enable)
# min_iterations = 10
# Maximum measured invocations (uncomment to enable)
# max_iterations = 100000

[code.interpreters]
# Command used to run code files, by extension
js = "node"
py = "python3"
rb = "ruby"
sh = "sh"

[output]
# Output format: human, json
format = "human"
# Report file (stdout when unset)
# path = "fixbench-report.json"

[dry_run]
# Compare output with the last element of JSON-array fixtures
verify = false
"#
        .to_string()
    }

    /// Parse duration string (e.g., "2s", "500ms", "1m") to nanoseconds
    pub fn parse_duration(s: &str) -> anyhow::Result<u64> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic() || *c == 'µ')
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
        if value < 0.0 {
            return Err(anyhow::anyhow!("Negative duration: {}", s));
        }

        let multiplier: u64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok((value * multiplier as f64) as u64)
    }
}

/// Directory fixtures and code are resolved against.
///
/// `base` wins when given; relative values are taken from `anchor`. A
/// `benchmark/` subdirectory of the result is preferred when it exists.
pub fn resolve_base_dir(anchor: &Path, base: Option<&str>) -> PathBuf {
    let dir = match base {
        Some(base) => anchor.join(base),
        None => anchor.to_path_buf(),
    };
    let nested = dir.join("benchmark");
    if nested.is_dir() { nested } else { dir }
}
