#![warn(missing_docs)]
//! FixBench CLI Library
//!
//! Session assembly and the `fixbench` command. A suite is built from
//! `fixbench.toml` (discovered by walking up from the current directory)
//! with command-line flags taking precedence, then every selected fixture
//! is benchmarked against every code entry.
//!
//! # Example
//!
//! ```ignore
//! use fixbench_cli::{SilentReporter, Suite};
//! use fixbench_core::{FnResolver, Selector};
//! use std::sync::Arc;
//!
//! let resolver = FnResolver::new().register_fn("upper", |args| args[0].clone());
//! let mut suite = Suite::new("bench", Arc::new(resolver));
//! suite.add_fixtures("fixtures/*.txt")?;
//! suite.add_code("code/*")?;
//! let reports = suite.run(&Selector::All, &mut SilentReporter)?;
//! ```

mod config;
mod executor;
mod planner;
mod suite;

pub use config::*;
pub use executor::{
    CandidateExecutionError, ConsoleReporter, DryRunExecutor, Executor, Reporter, SilentReporter,
    build_report, build_report_meta, format_duration, format_human_output, format_listing,
};
pub use planner::{ComparisonPlan, build_plan, build_plans};
pub use suite::{Selection, Suite};

use clap::{Parser, Subcommand};
use fixbench_core::{CommandResolver, Pattern, RenameRule, Resolution, Selector};
use fixbench_report::{
    OutputFormat, generate_json_dry_run, generate_json_report, render_dry_run,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// FixBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "fixbench")]
#[command(author, version, about = "FixBench - compare implementations over fixture files")]
pub struct Cli {
    /// Optional subcommand (Run, List, Init); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Fixture selectors (globs matched against key, file name or path)
    pub selectors: Vec<String>,

    /// Fixture pattern, overrides `suite.fixtures`
    #[arg(long)]
    pub fixtures: Option<String>,

    /// Code pattern, overrides `suite.code`
    #[arg(long)]
    pub code: Option<String>,

    /// Base directory for fixtures and code
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Output format: human, json
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Invoke each candidate once per fixture instead of timing it
    #[arg(long)]
    pub dry_run: bool,

    /// In a dry run, check output against the last element of JSON-array fixtures
    #[arg(long)]
    pub verify: bool,

    /// Warmup time (e.g. "200ms", "1s")
    #[arg(long)]
    pub warmup: Option<String>,

    /// Measurement time per candidate (e.g. "1s")
    #[arg(long)]
    pub measurement: Option<String>,

    /// Target sample count
    #[arg(long, short = 'n')]
    pub samples: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run benchmarks (default)
    Run,
    /// List resolved fixtures and code entries with their keys
    List,
    /// Print a default fixbench.toml
    Init,
}

/// Run the FixBench CLI with process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the FixBench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("fixbench=debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("fixbench=info")
            .with_writer(std::io::stderr)
            .init();
    }

    if matches!(cli.command, Some(Commands::Init)) {
        print!("{}", FixConfig::default_toml());
        return Ok(());
    }

    // Discover fixbench.toml (CLI flags override)
    let (config_dir, mut config) = match FixConfig::discover() {
        Some((dir, config)) => (Some(dir), config),
        None => (None, FixConfig::default()),
    };
    apply_cli_overrides(&cli, &mut config);

    let base_dir = base_dir(&cli, &config, config_dir.as_deref())?;
    tracing::debug!("Base directory: {}", base_dir.display());
    let suite = build_suite(&base_dir, &config)?;

    match cli.command {
        Some(Commands::List) => {
            print!("{}", format_listing(&suite));
            Ok(())
        }
        _ if cli.dry_run => dry_run(&cli, &config, &suite),
        _ => run_benchmarks(&cli, &config, &suite, &base_dir),
    }
}

/// Fold command-line flags into the file configuration
fn apply_cli_overrides(cli: &Cli, config: &mut FixConfig) {
    if let Some(fixtures) = &cli.fixtures {
        config.suite.fixtures = Pattern::from(fixtures.as_str());
    }
    if let Some(code) = &cli.code {
        config.suite.code = Pattern::from(code.as_str());
    }
    if !cli.selectors.is_empty() {
        config.suite.selector = cli.selectors.clone();
    }
    if let Some(format) = &cli.format {
        config.output.format = format.clone();
    }
    if let Some(warmup) = &cli.warmup {
        config.runner.warmup_time = warmup.clone();
    }
    if let Some(measurement) = &cli.measurement {
        config.runner.measurement_time = measurement.clone();
    }
    if cli.samples.is_some() {
        config.runner.samples = cli.samples;
    }
    if cli.verify {
        config.dry_run.verify = true;
    }
}

/// `--cwd` wins, then `suite.cwd` relative to the config file, then the
/// config directory, then the current directory.
fn base_dir(cli: &Cli, config: &FixConfig, config_dir: Option<&Path>) -> anyhow::Result<PathBuf> {
    let current = std::env::current_dir()?;
    let dir = match (&cli.cwd, config_dir) {
        (Some(cwd), _) => resolve_base_dir(&current, cwd.to_str()),
        (None, Some(dir)) => resolve_base_dir(dir, config.suite.cwd.as_deref()),
        (None, None) => resolve_base_dir(&current, None),
    };
    Ok(dir)
}

fn build_suite(base_dir: &Path, config: &FixConfig) -> anyhow::Result<Suite> {
    let rename = match &config.suite.rename_key {
        Some(name) => name.parse::<RenameRule>().map_err(|e| anyhow::anyhow!(e))?,
        None => RenameRule::default(),
    };
    let resolver = CommandResolver::new(config.code.interpreter_map());
    let mut suite = Suite::with_rename_rule(base_dir, Arc::new(resolver), rename)
        .with_sampling(config.sampling_config()?);

    let fixtures = suite.add_fixtures(config.suite.fixtures.clone())?;
    log_failures("fixture", &fixtures);
    let code = suite.add_code(config.suite.code.clone())?;
    log_failures("code", &code);

    tracing::info!(
        "Loaded {} fixture(s) and {} code entries",
        suite.fixtures().len(),
        suite.code().len()
    );
    Ok(suite)
}

fn log_failures(what: &str, resolution: &Resolution) {
    for failure in &resolution.failed {
        tracing::warn!("Skipping {} entry: {}", what, failure);
    }
}

fn output_format(config: &FixConfig) -> OutputFormat {
    config.output.format.parse().unwrap_or_else(|e| {
        tracing::warn!("{}; using human output", e);
        OutputFormat::Human
    })
}

fn write_output(cli: &Cli, config: &FixConfig, output: &str) -> anyhow::Result<()> {
    let path = cli
        .output
        .clone()
        .or_else(|| config.output.path.as_ref().map(PathBuf::from));
    if let Some(path) = path {
        let mut file = std::fs::File::create(&path)?;
        file.write_all(output.as_bytes())?;
        eprintln!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }
    Ok(())
}

fn run_benchmarks(
    cli: &Cli,
    config: &FixConfig,
    suite: &Suite,
    base_dir: &Path,
) -> anyhow::Result<()> {
    let selector = Selector::from_args(config.suite.selector.iter().cloned());
    let start_time = Instant::now();

    let mut reporter = ConsoleReporter::new();
    let fixtures = suite.run(&selector, &mut reporter)?;

    let total_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    let report = build_report(fixtures, suite.sampling(), base_dir, total_duration_ms);

    let output = match output_format(config) {
        OutputFormat::Json => generate_json_report(&report)?,
        OutputFormat::Human => format_human_output(&report),
    };
    write_output(cli, config, &output)?;

    if report.summary.failed > 0 {
        eprintln!("\n{} candidate run(s) failed", report.summary.failed);
        std::process::exit(1);
    }
    Ok(())
}

fn dry_run(cli: &Cli, config: &FixConfig, suite: &Suite) -> anyhow::Result<()> {
    let selector = Selector::from_args(config.suite.selector.iter().cloned());
    let records = suite.dry_run(&selector, config.dry_run.verify, &mut SilentReporter)?;

    let output = match output_format(config) {
        OutputFormat::Json => generate_json_dry_run(&records)?,
        OutputFormat::Human => render_dry_run(&records),
    };
    write_output(cli, config, &output)?;

    let failed = records
        .iter()
        .filter(|r| r.error.is_some() || r.matches == Some(false))
        .count();
    if failed > 0 {
        eprintln!("{} invocation(s) failed or mismatched", failed);
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_selectors_and_flags() {
        let cli = Cli::parse_from([
            "fixbench",
            "short",
            "*.json",
            "--code",
            "impl/*.py",
            "--samples",
            "10",
            "--dry-run",
        ]);
        assert_eq!(cli.selectors, ["short", "*.json"]);
        assert!(cli.dry_run);

        let mut config = FixConfig::default();
        apply_cli_overrides(&cli, &mut config);
        assert_eq!(config.suite.code, Pattern::from("impl/*.py"));
        assert_eq!(config.suite.fixtures, Pattern::from("fixtures/*"));
        assert_eq!(config.runner.samples, Some(10));
        assert_eq!(config.suite.selector, ["short", "*.json"]);
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::parse_from(["fixbench", "list"]);
        assert!(matches!(cli.command, Some(Commands::List)));
        let cli = Cli::parse_from(["fixbench", "init"]);
        assert!(matches!(cli.command, Some(Commands::Init)));
    }

    #[test]
    fn test_build_suite_from_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("fixtures")).unwrap();
        std::fs::create_dir_all(dir.path().join("code")).unwrap();
        std::fs::write(dir.path().join("fixtures/a.txt"), "x").unwrap();
        std::fs::write(dir.path().join("code/impl.sh"), "cat\n").unwrap();
        std::fs::write(dir.path().join("code/notes.zzz"), "").unwrap();

        let mut config = FixConfig::default();
        config.suite.rename_key = Some("basename".into());
        let suite = build_suite(dir.path(), &config).unwrap();

        assert!(suite.fixtures().get_by_key("a.txt").is_some());
        assert!(suite.code().get_by_key("impl.sh").is_some());
    }

    #[test]
    fn test_unknown_rename_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = FixConfig::default();
        config.suite.rename_key = Some("colour".into());
        assert!(build_suite(dir.path(), &config).is_err());
    }
}
