//! # stepmark-packing
//!
//! Produces the initial particle configurations benchmarks start from and
//! caches them on disk, keyed by `(N, density, dimensions, types)`.
//!
//! Generation lays particles on a loose grid, randomizes them with Monte
//! Carlo sweeps, then compresses the box toward the volume `N / density`
//! while the integrator anneals overlaps away. A run that cannot reach the
//! target within a hard step ceiling fails with
//! [`stepmark_core::ConfigurationError`] and leaves nothing behind; a
//! successful run persists its snapshot atomically so a half-written
//! artifact can never be observed.

mod cache;
mod generate;
mod lattice;

pub use cache::{ConfigCache, ConfigKey, DEFAULT_CACHE_DIR};
pub use generate::{
    ConfigurationGenerator, COMPRESS_POLL_STEPS, DEFAULT_STEP_CEILING, RANDOMIZE_BURSTS,
    RANDOMIZE_BURST_STEPS, RANDOMIZE_SEED,
};
pub use lattice::{grid_snapshot, GRID_SPACING};
