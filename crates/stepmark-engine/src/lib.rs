//! # stepmark-engine
//!
//! Reference engine for the stepmark harness: hard-sphere Monte Carlo with
//! cell-list overlap detection, periodic updaters, and move-size tuning,
//! implementing the [`stepmark_core::Simulation`] contract.
//!
//! The engine computes on the CPU for both targets. Selecting
//! [`stepmark_core::ComputeTarget::Accelerator`] exercises the accelerator
//! protocol (kernel autotune polling, profiling accounting) without changing
//! the numerics, which keeps the full harness path testable on any machine.

mod cells;
mod integrator;
mod probe;
mod sim;
mod state;
mod tuner;
mod updater;

pub use integrator::HardSphereMc;
pub use probe::{DeviceCapabilities, ACCEL_FAKE_ENV, STRICT_MODE_ENV};
pub use sim::{McSimulation, ACCEL_AUTOTUNE_ADVANCES};
pub use state::count_snapshot_overlaps;
pub use tuner::MoveSizeTuner;
pub use updater::{BoxResize, Compressor, NullUpdater, Updater};

/// Hard-sphere diameter shared by every particle the engine simulates.
pub const SPHERE_DIAMETER: f64 = 1.0;
