//! System Metadata Collection
//!
//! Run metadata: tool version, timestamp, git revision, host details and
//! the sampling settings in effect.
//!
//! CPU model and memory come from procfs; elsewhere they are reported as
//! "Unknown" and 0.

use chrono::Utc;
use fixbench_core::SamplingConfig;
use fixbench_report::{ReportConfig, ReportMeta, SCHEMA_VERSION, SystemInfo};
use std::path::Path;
use std::process::Command;

/// Build report metadata; git details are read from `repo_dir`
pub fn build_report_meta(repo_dir: &Path, sampling: &SamplingConfig) -> ReportMeta {
    ReportMeta {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        git_commit: git(repo_dir, &["rev-parse", "HEAD"]),
        git_branch: git(repo_dir, &["rev-parse", "--abbrev-ref", "HEAD"]),
        system: system_info(),
        config: ReportConfig {
            warmup_time_ns: sampling.warmup_time_ns,
            measurement_time_ns: sampling.measurement_time_ns,
            target_samples: sampling.target_samples,
            min_iterations: sampling.min_iterations,
            max_iterations: sampling.max_iterations,
            confidence_level: fixbench_stats::CONFIDENCE_LEVEL,
        },
    }
}

fn system_info() -> SystemInfo {
    let cpu = proc_field("/proc/cpuinfo", "model name").unwrap_or_else(|| "Unknown".to_string());
    // MemTotal is reported in kB
    let memory_gb = proc_field("/proc/meminfo", "MemTotal")
        .and_then(|v| v.split_whitespace().next()?.parse::<u64>().ok())
        .map_or(0.0, |kb| kb as f64 / (1024.0 * 1024.0));

    SystemInfo {
        os: std::env::consts::OS.to_string(),
        os_version: std::env::consts::ARCH.to_string(),
        cpu,
        cpu_cores: std::thread::available_parallelism().map_or(1, |n| n.get() as u32),
        memory_gb,
    }
}

/// Trimmed stdout of a git command run in `dir`
fn git(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Value of the first `key: value` line of a procfs file (Linux only)
fn proc_field(file: &str, key: &str) -> Option<String> {
    if !cfg!(target_os = "linux") {
        return None;
    }
    let content = std::fs::read_to_string(file).ok()?;
    content
        .lines()
        .filter(|line| line.starts_with(key))
        .find_map(|line| line.split_once(':'))
        .map(|(_, value)| value.trim().to_string())
}
