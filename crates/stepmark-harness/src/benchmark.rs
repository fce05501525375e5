//! The benchmark driver: the phase protocol around a kind's workload.

use stepmark_core::{
    BenchmarkOptions, ComputeTarget, Error, PerformanceReport, Phase, PhaseTracker, Result,
};
use stepmark_packing::ConfigCache;

use crate::kind::{BenchmarkKind, BuildContext, Workload};

/// Differential throughput of a compare simulation against a reference.
///
/// Both simulations pay the base stepping cost; subtracting per-step times
/// isolates the feature under test: `1 / (1/compare - 1/reference)`. A dead
/// reference (0.0) yields 0.0 so a broken warmup cannot masquerade as an
/// infinitely fast feature. Near-equal rates legitimately produce huge or
/// infinite values; callers see them as-is.
pub fn differential_throughput(reference: f64, compare: f64) -> f64 {
    if reference == 0.0 {
        return 0.0;
    }
    1.0 / (1.0 / compare - 1.0 / reference)
}

/// Drives one benchmark kind through warmup, autotune, and measurement.
///
/// Construction builds the kind's workload for the chosen target, which may
/// block on configuration generation. [`Benchmark::execute`] then runs the
/// phase protocol exactly once and returns one sample per repetition; the
/// phase machine rejects a second run.
pub struct Benchmark<'a> {
    kind: &'a dyn BenchmarkKind,
    options: BenchmarkOptions,
    target: ComputeTarget,
    workload: Workload,
    phase: PhaseTracker,
}

impl std::fmt::Debug for Benchmark<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Benchmark")
            .field("kind", &self.kind.name())
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl<'a> Benchmark<'a> {
    pub fn new(
        kind: &'a dyn BenchmarkKind,
        options: BenchmarkOptions,
        target: ComputeTarget,
        cache: &ConfigCache,
    ) -> Result<Self> {
        if !kind.supports(target) {
            return Err(Error::UnsupportedTarget {
                kind: kind.name().to_string(),
                target,
            });
        }
        let ctx = BuildContext {
            options: &options,
            target,
            cache,
        };
        let workload = kind.build(&ctx)?;
        Ok(Self {
            kind,
            options,
            target,
            workload,
            phase: PhaseTracker::new(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase.phase()
    }

    pub fn workload(&self) -> &Workload {
        &self.workload
    }

    /// Run the full protocol and report per-repetition samples.
    ///
    /// A zero-length advance settles lazy initialization before the warmup
    /// clock starts. Accelerator runs poll kernel tuning after warmup and
    /// bracket each measured repetition in a profiling scope; engine errors
    /// propagate unretried, after the scope is released.
    pub fn execute(&mut self) -> Result<PerformanceReport> {
        self.workload.advance_all(0)?;

        self.phase.begin_warmup()?;
        let verbose = self.options.verbose && self.workload.primary().rank() == 0;
        if verbose {
            println!(".. warming up for {} steps", self.options.warmup_steps);
        }
        tracing::debug!(steps = self.options.warmup_steps, "warmup");
        self.workload.advance_all(self.options.warmup_steps)?;

        let mut autotune_converged = true;
        if self.target.is_accelerator() {
            self.phase.begin_autotune()?;
            autotune_converged = self.autotune(verbose)?;
        }

        self.phase.begin_measure()?;
        let mut samples = Vec::with_capacity(self.options.repeat);
        for _ in 0..self.options.repeat {
            if self.target.is_accelerator() {
                self.workload
                    .advance_all_profiled(self.options.benchmark_steps)?;
            } else {
                self.workload.advance_all(self.options.benchmark_steps)?;
            }
            let value = self.kind.measure(&self.workload);
            if verbose {
                println!(".. {} {}", value, self.kind.units(&self.workload));
            }
            samples.push(value);
        }

        self.phase.finish()?;
        Ok(PerformanceReport {
            name: self.kind.name().to_string(),
            units: self.kind.units(&self.workload).to_string(),
            samples,
            autotune_converged,
        })
    }

    /// Poll kernel tuning with warmup-length advances, at most
    /// `max_autotune_rounds` of them. Returns whether tuning settled; hitting
    /// the round limit is advisory, not an error.
    fn autotune(&mut self, verbose: bool) -> Result<bool> {
        for round in 0..self.options.max_autotune_rounds {
            if self.workload.is_tuning_complete() {
                tracing::debug!(rounds = round, "kernel tuning settled");
                return Ok(true);
            }
            if verbose {
                println!(".. autotuning for {} steps", self.options.warmup_steps);
            }
            self.workload.advance_all(self.options.warmup_steps)?;
        }
        if self.workload.is_tuning_complete() {
            return Ok(true);
        }
        tracing::warn!(
            rounds = self.options.max_autotune_rounds,
            "kernel tuning did not settle; measuring with untuned kernels"
        );
        Ok(false)
    }
}
