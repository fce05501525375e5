//! # stepmark-core
//!
//! Shared contracts for the stepmark benchmark harness.
//!
//! This crate defines the pieces every other stepmark crate agrees on:
//!
//! - [`Simulation`]: the object-safe contract a steppable engine implements
//!   (advance, throughput, tuning status, profiling, snapshots).
//! - [`ComputeTarget`]: the CPU/accelerator device tag that drives the
//!   warmup/autotune/measure protocol.
//! - [`PhaseTracker`]: the guarded benchmark phase machine.
//! - [`Snapshot`] and [`SimBox`]: the particle arrangement value type, its
//!   periodic box arithmetic, and the binary artifact codec.
//! - The error taxonomy: [`ConfigurationError`], [`InvalidModeError`],
//!   [`EngineError`], [`PhaseError`], and the crate-level [`Error`] umbrella.
//!
//! It deliberately contains no engine, no I/O beyond the snapshot codec, and
//! no logging, so that engines and harnesses can depend on it from anywhere.

pub mod error;
pub mod options;
pub mod phase;
pub mod report;
pub mod simulation;
pub mod snapshot;
pub mod target;

pub use error::{
    ConfigurationError, EngineError, Error, InvalidModeError, PhaseError, Result, SnapshotError,
};
pub use options::BenchmarkOptions;
pub use phase::{Phase, PhaseTracker};
pub use report::PerformanceReport;
pub use simulation::{ProfilingScope, Simulation};
pub use snapshot::{SimBox, Snapshot, SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
pub use target::ComputeTarget;
