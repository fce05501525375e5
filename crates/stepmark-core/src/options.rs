//! Benchmark run parameters.

use serde::{Deserialize, Serialize};

/// Steps advanced before measurement begins.
pub const DEFAULT_WARMUP_STEPS: u64 = 1000;
/// Steps advanced per measured repetition.
pub const DEFAULT_BENCHMARK_STEPS: u64 = 1000;
/// Measured repetitions per run.
pub const DEFAULT_REPEAT: usize = 1;
/// Default system size.
pub const DEFAULT_PARTICLES: usize = 64_000;
/// Default number density.
pub const DEFAULT_DENSITY: f64 = 1.0;
/// Autotune polling rounds allowed before proceeding unconverged.
pub const DEFAULT_MAX_AUTOTUNE_ROUNDS: u32 = 10;

/// Parameters for one benchmark run.
///
/// Immutable once handed to a benchmark; treat it as a value. `repeat` counts
/// measured repetitions, each `benchmark_steps` long, and each yields one
/// performance sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkOptions {
    /// Particle count of the benchmarked system.
    pub n: usize,
    /// Number density N / V used when generating the initial configuration.
    pub rho: f64,
    /// Spatial dimensionality, 2 or 3.
    pub dimensions: u32,
    pub warmup_steps: u64,
    pub benchmark_steps: u64,
    pub repeat: usize,
    /// Emit per-phase and per-sample progress on rank 0.
    pub verbose: bool,
    /// In comparative benchmarks, build and run only the compare simulation.
    pub skip_reference: bool,
    /// Autotune polling rounds (one warmup-length advance each) before the
    /// harness gives up waiting and records non-convergence.
    pub max_autotune_rounds: u32,
}

impl Default for BenchmarkOptions {
    fn default() -> Self {
        Self {
            n: DEFAULT_PARTICLES,
            rho: DEFAULT_DENSITY,
            dimensions: 3,
            warmup_steps: DEFAULT_WARMUP_STEPS,
            benchmark_steps: DEFAULT_BENCHMARK_STEPS,
            repeat: DEFAULT_REPEAT,
            verbose: false,
            skip_reference: false,
            max_autotune_rounds: DEFAULT_MAX_AUTOTUNE_ROUNDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_protocol() {
        let opts = BenchmarkOptions::default();
        assert_eq!(opts.warmup_steps, 1000);
        assert_eq!(opts.benchmark_steps, 1000);
        assert_eq!(opts.repeat, 1);
        assert_eq!(opts.n, 64_000);
        assert_eq!(opts.dimensions, 3);
        assert!(!opts.verbose);
        assert!(!opts.skip_reference);
    }

    #[test]
    fn serializes_to_json_and_back() {
        let opts = BenchmarkOptions {
            n: 1000,
            rho: 0.5,
            ..Default::default()
        };
        let text = serde_json::to_string(&opts).unwrap();
        let back: BenchmarkOptions = serde_json::from_str(&text).unwrap();
        assert_eq!(back.n, 1000);
        assert_eq!(back.rho, 0.5);
    }
}
