//! The contract between the harness and a simulation engine.

use std::ops::{Deref, DerefMut};

use crate::error::EngineError;
use crate::snapshot::Snapshot;
use crate::target::ComputeTarget;

/// A stateful, steppable simulation.
///
/// The harness drives engines exclusively through this trait: it advances
/// them in discrete timesteps, reads instantaneous throughput after each
/// advance, polls tuning status on accelerators, and brackets measured
/// repetitions in a profiling scope. Implementations own their state;
/// `advance` blocks until the requested steps complete.
///
/// # Examples
///
/// ```
/// use stepmark_core::{ComputeTarget, EngineError, Simulation, Snapshot};
///
/// struct Counter {
///     steps: u64,
/// }
///
/// impl Simulation for Counter {
///     fn advance(&mut self, steps: u64) -> Result<(), EngineError> {
///         self.steps += steps;
///         Ok(())
///     }
///     fn throughput(&self) -> f64 {
///         0.0
///     }
///     fn timestep(&self) -> u64 {
///         self.steps
///     }
///     fn target(&self) -> ComputeTarget {
///         ComputeTarget::Cpu
///     }
///     fn is_tuning_complete(&self) -> bool {
///         true
///     }
///     fn set_profiling(&mut self, _enabled: bool) {}
///     fn snapshot(&self) -> Result<Snapshot, EngineError> {
///         Err(EngineError::InvalidState("no particles".into()))
///     }
/// }
///
/// let mut sim = Counter { steps: 0 };
/// sim.advance(10).unwrap();
/// assert_eq!(sim.timestep(), 10);
/// ```
pub trait Simulation {
    /// Advance by `steps` timesteps. `advance(0)` is legal and forces any
    /// lazy initialization without moving the timestep.
    fn advance(&mut self, steps: u64) -> Result<(), EngineError>;

    /// Steps per wall-clock second over the most recent `advance` call.
    /// Returns 0.0 before the first nonzero advance.
    fn throughput(&self) -> f64;

    /// Total timesteps advanced since construction. Monotonic.
    fn timestep(&self) -> u64;

    fn target(&self) -> ComputeTarget;

    /// Whether iterative kernel self-tuning has settled. Only consulted on
    /// accelerator targets; CPU engines may return true unconditionally.
    fn is_tuning_complete(&self) -> bool;

    /// Toggle profiling instrumentation. Prefer [`ProfilingScope`] over
    /// calling this directly so the flag cannot leak past an error.
    fn set_profiling(&mut self, enabled: bool);

    /// Current particle arrangement.
    fn snapshot(&self) -> Result<Snapshot, EngineError>;

    /// Reporting rank. Only rank 0 emits output or persists artifacts;
    /// single-process engines are always rank 0.
    fn rank(&self) -> u32 {
        0
    }
}

/// RAII guard that enables profiling on a simulation for its lifetime.
///
/// Dropping the scope disables profiling again, so an `advance` that returns
/// an error through `?` still leaves the engine unprofiled.
///
/// ```
/// # use stepmark_core::{ComputeTarget, EngineError, ProfilingScope, Simulation, Snapshot};
/// # struct S { on: bool }
/// # impl Simulation for S {
/// #     fn advance(&mut self, _steps: u64) -> Result<(), EngineError> { Ok(()) }
/// #     fn throughput(&self) -> f64 { 0.0 }
/// #     fn timestep(&self) -> u64 { 0 }
/// #     fn target(&self) -> ComputeTarget { ComputeTarget::Accelerator }
/// #     fn is_tuning_complete(&self) -> bool { true }
/// #     fn set_profiling(&mut self, enabled: bool) { self.on = enabled; }
/// #     fn snapshot(&self) -> Result<Snapshot, EngineError> {
/// #         Err(EngineError::InvalidState("empty".into()))
/// #     }
/// # }
/// let mut sim = S { on: false };
/// {
///     let mut scoped = ProfilingScope::enter(&mut sim);
///     scoped.advance(100).unwrap();
/// }
/// assert!(!sim.on);
/// ```
pub struct ProfilingScope<'a> {
    sim: &'a mut (dyn Simulation + 'a),
}

impl<'a> ProfilingScope<'a> {
    pub fn enter(sim: &'a mut (dyn Simulation + 'a)) -> Self {
        sim.set_profiling(true);
        Self { sim }
    }
}

impl<'a> Deref for ProfilingScope<'a> {
    type Target = dyn Simulation + 'a;

    fn deref(&self) -> &Self::Target {
        self.sim
    }
}

impl<'a> DerefMut for ProfilingScope<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.sim
    }
}

impl Drop for ProfilingScope<'_> {
    fn drop(&mut self) {
        self.sim.set_profiling(false);
    }
}
