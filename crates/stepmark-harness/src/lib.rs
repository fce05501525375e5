//! # stepmark-harness
//!
//! Drives benchmark kinds through the warmup, autotune, and measurement
//! protocol and reports one performance sample per measured repetition.
//!
//! A [`BenchmarkKind`] is a strategy: it builds a [`Workload`] (one
//! simulation, or a lock-stepped reference/compare pair) and turns the
//! workload's post-advance state into samples. [`Benchmark`] owns the built
//! workload and the guarded phase machine; [`registry`] maps kind names to
//! the kinds this crate ships.

mod benchmark;
mod kind;
pub mod kinds;
pub mod registry;

pub use benchmark::{differential_throughput, Benchmark};
pub use kind::{BenchmarkKind, BuildContext, Workload};
