//! Configuration generation: randomize, compress, persist.

use std::path::PathBuf;

use stepmark_core::{ComputeTarget, ConfigurationError, Simulation, Snapshot};
use stepmark_engine::{Compressor, HardSphereMc, McSimulation, MoveSizeTuner};

use crate::cache::{ConfigCache, ConfigKey};
use crate::lattice::grid_snapshot;

/// Seed for the randomization and compression run. Fixed so a given key
/// always generates the same artifact.
pub const RANDOMIZE_SEED: u64 = 10;

/// Monte Carlo bursts used to decorrelate the grid before compression.
pub const RANDOMIZE_BURSTS: u32 = 5;

/// Steps per randomization burst.
pub const RANDOMIZE_BURST_STEPS: u64 = 1000;

/// Steps between compression completion polls.
pub const COMPRESS_POLL_STEPS: u64 = 500;

/// Hard ceiling on total steps before generation gives up.
pub const DEFAULT_STEP_CEILING: u64 = 1_000_000;

const COMPRESS_PERIOD: u64 = 10;
const TUNE_PERIOD: u64 = 10;

/// Produces hard-sphere starting configurations against an explicit cache.
///
/// An existing artifact short-circuits generation entirely; otherwise the
/// generator builds one and persists it atomically. Failure modes are typed:
/// invalid inputs surface before any simulation state exists, and a
/// compression that cannot reach the target volume within the step ceiling
/// reports [`ConfigurationError::CompressionIncomplete`] without writing
/// anything.
#[derive(Debug)]
pub struct ConfigurationGenerator<'a> {
    cache: &'a ConfigCache,
    step_ceiling: u64,
}

impl<'a> ConfigurationGenerator<'a> {
    pub fn new(cache: &'a ConfigCache) -> Self {
        Self {
            cache,
            step_ceiling: DEFAULT_STEP_CEILING,
        }
    }

    /// Lower or raise the compression step ceiling.
    pub fn with_step_ceiling(mut self, ceiling: u64) -> Self {
        self.step_ceiling = ceiling;
        self
    }

    /// Path to the single-type configuration for `(n, rho, dimensions)`,
    /// generating and caching it on first use.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::InvalidDimensions`] unless `dimensions` is 2 or
    /// 3, and [`ConfigurationError::CompressionIncomplete`] when the step
    /// ceiling is exhausted. Both are raised without leaving a partial
    /// artifact in the cache.
    pub fn hard_sphere(
        &self,
        n: usize,
        rho: f64,
        dimensions: u32,
    ) -> Result<PathBuf, ConfigurationError> {
        validate(n, dimensions)?;
        let key = ConfigKey::new(n, rho, dimensions);
        if self.cache.contains(&key) {
            tracing::debug!(file = %key.filename(), "configuration cache hit");
            return Ok(self.cache.path_for(&key));
        }

        let snapshot = self.generate(n, rho, dimensions)?;
        self.cache.store(&key, &snapshot)
    }

    /// Multi-type variant: the single-type arrangement for the same `(n,
    /// rho, dimensions)` relabeled round-robin over `n_types` types.
    ///
    /// Positions are reused as-is; compression never runs a second time for
    /// a type count.
    pub fn hard_sphere_multi_type(
        &self,
        n: usize,
        rho: f64,
        dimensions: u32,
        n_types: usize,
    ) -> Result<PathBuf, ConfigurationError> {
        if n_types == 0 {
            return Err(ConfigurationError::InvalidTypeCount(n_types));
        }
        if n_types == 1 {
            return self.hard_sphere(n, rho, dimensions);
        }
        validate(n, dimensions)?;

        let key = ConfigKey::new(n, rho, dimensions).with_types(n_types);
        if self.cache.contains(&key) {
            tracing::debug!(file = %key.filename(), "configuration cache hit");
            return Ok(self.cache.path_for(&key));
        }

        let base_path = self.hard_sphere(n, rho, dimensions)?;
        let base = Snapshot::from_file(&base_path)?;
        let relabeled = relabel_round_robin(base, n_types);
        self.cache.store(&key, &relabeled)
    }

    /// Run the randomize-then-compress pipeline for one key.
    fn generate(&self, n: usize, rho: f64, dimensions: u32) -> Result<Snapshot, ConfigurationError> {
        let target_volume = n as f64 / rho;
        tracing::info!(n, rho, dimensions, target_volume, "generating configuration");

        let mut sim = McSimulation::new(&grid_snapshot(n, dimensions), ComputeTarget::Cpu)?;
        sim.set_integrator(HardSphereMc::new(RANDOMIZE_SEED));

        // decorrelate the grid arrangement
        for _ in 0..RANDOMIZE_BURSTS {
            sim.advance(RANDOMIZE_BURST_STEPS)?;
            if sim.rank() == 0 {
                tracing::info!(
                    ".. step {} at {:.4e} steps/s",
                    sim.timestep(),
                    sim.throughput()
                );
            }
        }

        sim.attach_updater(Box::new(Compressor::new(target_volume, COMPRESS_PERIOD)));
        sim.attach_tuner(MoveSizeTuner::standard(TUNE_PERIOD));

        while !sim.updaters_complete() && sim.timestep() < self.step_ceiling {
            sim.advance(COMPRESS_POLL_STEPS)?;
            if sim.rank() == 0 {
                tracing::debug!(
                    ".. compressing: step {} volume {:.4} overlaps {}",
                    sim.timestep(),
                    sim.volume(),
                    sim.count_overlaps()
                );
            }
        }

        if !sim.updaters_complete() {
            return Err(ConfigurationError::CompressionIncomplete {
                timestep: sim.timestep(),
                ceiling: self.step_ceiling,
                overlaps: sim.count_overlaps(),
                volume: sim.volume(),
                target_volume,
            });
        }

        tracing::info!(
            steps = sim.timestep(),
            volume = sim.volume(),
            "compression complete"
        );
        Ok(sim.snapshot()?)
    }
}

fn validate(n: usize, dimensions: u32) -> Result<(), ConfigurationError> {
    if dimensions != 2 && dimensions != 3 {
        return Err(ConfigurationError::InvalidDimensions(dimensions));
    }
    if n == 0 {
        return Err(ConfigurationError::InvalidParticleCount(n));
    }
    Ok(())
}

/// Reassign types round-robin: particle `i` gets type `i % n_types`.
fn relabel_round_robin(mut snapshot: Snapshot, n_types: usize) -> Snapshot {
    snapshot.type_names = (0..n_types).map(type_name).collect();
    for (i, id) in snapshot.type_ids.iter_mut().enumerate() {
        *id = (i % n_types) as u32;
    }
    snapshot
}

fn type_name(index: usize) -> String {
    if index < 26 {
        char::from(b'A' + index as u8).to_string()
    } else {
        format!("T{index}")
    }
}
