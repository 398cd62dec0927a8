//! Sampling Engine - The Default Timing Engine
//!
//! Uses batched sampling: a warmup phase estimates the cost of one
//! invocation, then the measurement phase groups invocations into samples,
//! each sample being the mean time of many invocations. The per-sample means
//! are reduced by `fixbench-stats`.

use crate::error::{EngineError, InvokeError};
use crate::{Measurement, TimingEngine};
use fixbench_stats::{OutlierFence, relative_margin_of_error, summarize};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

/// Default number of samples to collect
pub const DEFAULT_SAMPLE_COUNT: usize = 50;

/// Minimum sample target accepted by the engine
pub const MIN_SAMPLE_COUNT: usize = 5;

/// Wall-clock timer for a single invocation
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start timing
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Nanoseconds since `start`
    #[inline(always)]
    pub fn stop(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }
}

/// Sampling parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    /// Warmup duration in nanoseconds
    pub warmup_time_ns: u64,
    /// Measurement budget in nanoseconds
    pub measurement_time_ns: u64,
    /// Samples to collect before stopping early
    pub target_samples: usize,
    /// Minimum measured invocations before the engine may stop
    pub min_iterations: Option<u64>,
    /// Cap on measured invocations
    pub max_iterations: Option<u64>,
    /// Outlier fence applied to the sample means
    pub fence: OutlierFence,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            warmup_time_ns: 200_000_000,
            measurement_time_ns: 1_000_000_000,
            target_samples: DEFAULT_SAMPLE_COUNT,
            min_iterations: None,
            max_iterations: None,
            fence: OutlierFence::default(),
        }
    }
}

/// Accumulates invocation timings into samples
struct Sampler {
    current_sample_time_ns: u64,
    current_sample_iters: u64,
    /// Completed samples, seconds per invocation
    samples: Vec<f64>,
    target_samples: usize,
    iters_per_sample: u64,
    total_iterations: u64,
    is_warmup: bool,
    warmup_times: Vec<u64>,
}

impl Sampler {
    fn new(target_samples: usize) -> Self {
        let target_samples = target_samples.max(MIN_SAMPLE_COUNT);
        Self {
            current_sample_time_ns: 0,
            current_sample_iters: 0,
            samples: Vec::with_capacity(target_samples),
            target_samples,
            iters_per_sample: 1,
            total_iterations: 0,
            is_warmup: true,
            warmup_times: Vec::new(),
        }
    }

    fn estimated_iter_time_ns(&self) -> Option<u64> {
        if self.warmup_times.is_empty() {
            return None;
        }
        let sum: u64 = self.warmup_times.iter().sum();
        Some(sum / self.warmup_times.len() as u64)
    }

    fn start_measurement(&mut self, measurement_time_ns: u64) {
        self.is_warmup = false;
        self.iters_per_sample = match self.estimated_iter_time_ns() {
            Some(iter_time) => {
                let time_per_sample = measurement_time_ns / self.target_samples as u64;
                (time_per_sample / iter_time.max(1)).max(1)
            }
            None => 1,
        };
        self.warmup_times.clear();
        self.current_sample_time_ns = 0;
        self.current_sample_iters = 0;
    }

    /// Record one invocation; true when it completed a sample
    fn accumulate(&mut self, duration_nanos: u64) -> bool {
        self.total_iterations += 1;

        if self.is_warmup {
            self.warmup_times.push(duration_nanos);
            return false;
        }

        self.current_sample_time_ns += duration_nanos;
        self.current_sample_iters += 1;
        if self.current_sample_iters >= self.iters_per_sample {
            return self.flush_sample();
        }
        false
    }

    fn flush_sample(&mut self) -> bool {
        if self.current_sample_iters == 0 || self.samples.len() >= self.target_samples {
            return false;
        }
        let n = self.current_sample_iters as f64;
        self.samples
            .push(self.current_sample_time_ns as f64 / n / 1_000_000_000.0);
        self.current_sample_time_ns = 0;
        self.current_sample_iters = 0;
        true
    }

    fn has_enough_samples(&self) -> bool {
        self.samples.len() >= self.target_samples
    }

    fn iteration_count(&self) -> u64 {
        self.total_iterations
    }

    fn finish(mut self) -> Vec<f64> {
        self.flush_sample();
        self.samples
    }
}

/// Default [`TimingEngine`]: warmup, then batched sampling
#[derive(Debug, Clone, Default)]
pub struct SamplingEngine {
    config: SamplingConfig,
}

impl SamplingEngine {
    /// Engine with `config`
    pub fn new(config: SamplingConfig) -> Self {
        Self { config }
    }

    /// Current settings
    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    fn reduce(&self, samples: &[f64]) -> Measurement {
        let summary = summarize(samples, self.config.fence);
        Measurement {
            samples: summary.sample_count,
            ops_per_second: summary.ops_per_second(),
            relative_margin_of_error: relative_margin_of_error(&summary),
        }
    }

    /// Warmup, measurement, finish
    fn run_loop(
        &self,
        routine: &mut dyn FnMut() -> Result<(), InvokeError>,
        on_cycle: &mut dyn FnMut(&Measurement),
    ) -> Result<Measurement, EngineError> {
        let config = &self.config;
        let mut sampler = Sampler::new(config.target_samples);

        // Always at least one warmup invocation so the estimate exists
        let warmup_start = Instant::now();
        loop {
            let timer = Timer::start();
            routine()?;
            sampler.accumulate(timer.stop());
            if warmup_start.elapsed().as_nanos() >= config.warmup_time_ns as u128 {
                break;
            }
        }

        sampler.start_measurement(config.measurement_time_ns);

        let measure_start = Instant::now();
        let measurement_start_iterations = sampler.iteration_count();
        let min_iterations = config.min_iterations.unwrap_or(1).max(1);
        let max_iterations = config
            .max_iterations
            .unwrap_or(u64::MAX)
            .max(min_iterations);

        loop {
            let measured = sampler
                .iteration_count()
                .saturating_sub(measurement_start_iterations);
            let min_iterations_met = measured >= min_iterations;
            let time_limit_reached =
                measure_start.elapsed().as_nanos() >= config.measurement_time_ns as u128;

            if measured >= max_iterations {
                break;
            }
            if (sampler.has_enough_samples() || time_limit_reached) && min_iterations_met {
                break;
            }

            let timer = Timer::start();
            routine()?;
            if sampler.accumulate(timer.stop()) {
                on_cycle(&self.reduce(&sampler.samples));
            }
        }

        let samples = sampler.finish();
        if samples.is_empty() {
            return Err(EngineError::NoSamples);
        }
        Ok(self.reduce(&samples))
    }
}

impl TimingEngine for SamplingEngine {
    fn measure(
        &mut self,
        name: &str,
        routine: &mut dyn FnMut() -> Result<(), InvokeError>,
        on_cycle: &mut dyn FnMut(&Measurement),
    ) -> Result<Measurement, EngineError> {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.run_loop(routine, on_cycle)));
        let result = match outcome {
            Ok(result) => result,
            Err(payload) => Err(EngineError::Panicked(panic_message(payload.as_ref()))),
        };

        match &result {
            Ok(m) => tracing::debug!(
                "{}: {:.2} ops/sec ±{:.2}% ({} samples)",
                name,
                m.ops_per_second,
                m.relative_margin_of_error,
                m.samples
            ),
            Err(e) => tracing::debug!("{}: {}", name, e),
        }
        result
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> SamplingConfig {
        SamplingConfig {
            warmup_time_ns: 1_000_000,
            measurement_time_ns: 20_000_000,
            target_samples: 10,
            ..SamplingConfig::default()
        }
    }

    fn busy_work() -> u64 {
        (0..1000u64).fold(0, |acc, i| acc.wrapping_add(std::hint::black_box(i)))
    }

    #[test]
    fn test_sampler_batches_after_warmup() {
        let mut sampler = Sampler::new(10);
        for _ in 0..4 {
            assert!(!sampler.accumulate(100));
        }
        assert_eq!(sampler.estimated_iter_time_ns(), Some(100));

        // 10us budget over 10 samples at 100ns each: ten iterations per sample
        sampler.start_measurement(10_000);
        let flushed = (0..30).filter(|_| sampler.accumulate(100)).count();
        assert_eq!(flushed, 3);
        assert_eq!(sampler.iteration_count(), 34);

        let samples = sampler.finish();
        assert_eq!(samples.len(), 3);
        assert!((samples[0] - 100e-9).abs() < 1e-15);
    }

    #[test]
    fn test_measure_reports_throughput() {
        let mut engine = SamplingEngine::new(quick());
        let mut cycles = 0;
        let m = engine
            .measure(
                "busy",
                &mut || {
                    busy_work();
                    Ok(())
                },
                &mut |_| cycles += 1,
            )
            .unwrap();

        assert!(m.samples >= 1);
        assert!(m.samples <= 10);
        assert!(m.ops_per_second > 0.0);
        assert!(m.relative_margin_of_error >= 0.0);
        assert!(cycles <= 10);
    }

    #[test]
    fn test_max_iterations_caps_measurement() {
        let mut engine = SamplingEngine::new(SamplingConfig {
            warmup_time_ns: 0,
            measurement_time_ns: 1_000_000_000,
            max_iterations: Some(5),
            ..quick()
        });
        let mut calls = 0u64;
        let m = engine
            .measure(
                "capped",
                &mut || {
                    calls += 1;
                    Ok(())
                },
                &mut |_| {},
            )
            .unwrap();

        // one warmup call plus five measured
        assert_eq!(calls, 6);
        assert!(m.samples >= 1);
    }

    #[test]
    fn test_routine_error_aborts() {
        let mut engine = SamplingEngine::new(quick());
        let err = engine
            .measure(
                "broken",
                &mut || Err(InvokeError::Failed("boom".into())),
                &mut |_| {},
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::Aborted(_)));
        assert_eq!(err.to_string(), "aborted: boom");
    }

    #[test]
    fn test_panic_is_caught() {
        let mut engine = SamplingEngine::new(quick());
        let err = engine
            .measure("panics", &mut || panic!("kaboom"), &mut |_| {})
            .unwrap_err();
        match err {
            EngineError::Panicked(message) => assert_eq!(message, "kaboom"),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
