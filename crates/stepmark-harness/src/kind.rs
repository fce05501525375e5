//! The benchmark kind abstraction: what to build and how to read a sample.

use stepmark_core::{BenchmarkOptions, ComputeTarget, ProfilingScope, Result, Simulation};
use stepmark_packing::{ConfigCache, ConfigurationGenerator};

use crate::benchmark::differential_throughput;

/// Everything a kind gets to build its workload.
pub struct BuildContext<'a> {
    pub options: &'a BenchmarkOptions,
    pub target: ComputeTarget,
    pub cache: &'a ConfigCache,
}

impl<'a> BuildContext<'a> {
    /// A configuration generator backed by the run's cache.
    pub fn generator(&self) -> ConfigurationGenerator<'a> {
        ConfigurationGenerator::new(self.cache)
    }
}

/// The simulation(s) one benchmark drives.
///
/// A comparative workload holds a reference and a compare simulation and
/// advances them in lock step, reference first, so both see the same step
/// counts in the same order.
pub enum Workload {
    Single(Box<dyn Simulation>),
    Comparative {
        reference: Box<dyn Simulation>,
        compare: Box<dyn Simulation>,
    },
}

impl Workload {
    /// Advance every simulation by `steps`.
    pub fn advance_all(&mut self, steps: u64) -> Result<()> {
        match self {
            Workload::Single(sim) => sim.advance(steps)?,
            Workload::Comparative { reference, compare } => {
                reference.advance(steps)?;
                compare.advance(steps)?;
            }
        }
        Ok(())
    }

    /// Advance every simulation by `steps` with profiling enabled for the
    /// duration of its own advance. The scope is released even when an
    /// advance fails partway through.
    pub fn advance_all_profiled(&mut self, steps: u64) -> Result<()> {
        match self {
            Workload::Single(sim) => {
                let mut scoped = ProfilingScope::enter(sim.as_mut());
                scoped.advance(steps)?;
            }
            Workload::Comparative { reference, compare } => {
                {
                    let mut scoped = ProfilingScope::enter(reference.as_mut());
                    scoped.advance(steps)?;
                }
                let mut scoped = ProfilingScope::enter(compare.as_mut());
                scoped.advance(steps)?;
            }
        }
        Ok(())
    }

    /// Whether every simulation's kernel tuning has settled.
    pub fn is_tuning_complete(&self) -> bool {
        match self {
            Workload::Single(sim) => sim.is_tuning_complete(),
            Workload::Comparative { reference, compare } => {
                reference.is_tuning_complete() && compare.is_tuning_complete()
            }
        }
    }

    /// The simulation the run reports through: the compare simulation in
    /// comparative workloads.
    pub fn primary(&self) -> &dyn Simulation {
        match self {
            Workload::Single(sim) => sim.as_ref(),
            Workload::Comparative { compare, .. } => compare.as_ref(),
        }
    }
}

/// One benchmark in the registry.
///
/// A kind is a stateless strategy: it knows its name, which targets it runs
/// on, how to build its workload, and how to turn the workload's
/// post-advance state into one performance sample. Everything per-run lives
/// in the [`Workload`] it builds.
pub trait BenchmarkKind: Sync {
    /// Registry name, as accepted on the command line.
    fn name(&self) -> &'static str;

    /// One-line description for listings.
    fn description(&self) -> &'static str;

    /// Whether this kind can run on `target`.
    fn supports(&self, target: ComputeTarget) -> bool {
        let _ = target;
        true
    }

    /// Build the workload. Called once, before the warmup phase; may block
    /// on configuration generation.
    fn build(&self, ctx: &BuildContext<'_>) -> Result<Workload>;

    /// Unit label for the samples `measure` produces.
    fn units(&self, workload: &Workload) -> &'static str {
        let _ = workload;
        "time steps per second"
    }

    /// One performance sample, read strictly after a measured advance.
    fn measure(&self, workload: &Workload) -> f64 {
        match workload {
            Workload::Single(sim) => sim.throughput(),
            Workload::Comparative { reference, compare } => {
                differential_throughput(reference.throughput(), compare.throughput())
            }
        }
    }
}

impl std::fmt::Debug for dyn BenchmarkKind + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchmarkKind")
            .field("name", &self.name())
            .finish()
    }
}
