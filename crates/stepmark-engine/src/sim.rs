//! The engine's [`Simulation`] implementation.

use std::time::{Duration, Instant};

use stepmark_core::{ComputeTarget, EngineError, Simulation, Snapshot};

use crate::integrator::HardSphereMc;
use crate::state::SystemState;
use crate::tuner::MoveSizeTuner;
use crate::updater::Updater;
use crate::SPHERE_DIAMETER;

/// Nonzero advances an accelerator-tagged simulation needs before its kernel
/// autotuning reports settled.
pub const ACCEL_AUTOTUNE_ADVANCES: u32 = 2;

/// A steppable hard-sphere Monte Carlo simulation.
///
/// Construction validates the snapshot and builds the cell structure; the
/// integrator and any updaters or tuners are attached afterwards, so idle
/// simulations (no integrator) are first-class and cheap to step. Each
/// timestep runs one integrator sweep, then every updater whose period
/// divides the step, then every tuner likewise.
pub struct McSimulation {
    state: SystemState,
    integrator: Option<HardSphereMc>,
    updaters: Vec<Box<dyn Updater>>,
    tuners: Vec<MoveSizeTuner>,
    target: ComputeTarget,
    timestep: u64,
    last_steps: u64,
    last_elapsed: Duration,
    profiling: bool,
    profiled_steps: u64,
    autotune_remaining: u32,
}

impl McSimulation {
    pub fn new(snapshot: &Snapshot, target: ComputeTarget) -> Result<Self, EngineError> {
        let state = SystemState::from_snapshot(snapshot, SPHERE_DIAMETER)?;
        let autotune_remaining = if target.is_accelerator() {
            ACCEL_AUTOTUNE_ADVANCES
        } else {
            0
        };
        Ok(Self {
            state,
            integrator: None,
            updaters: Vec::new(),
            tuners: Vec::new(),
            target,
            timestep: 0,
            last_steps: 0,
            last_elapsed: Duration::ZERO,
            profiling: false,
            profiled_steps: 0,
            autotune_remaining,
        })
    }

    pub fn set_integrator(&mut self, mc: HardSphereMc) {
        self.integrator = Some(mc);
    }

    pub fn attach_updater(&mut self, updater: Box<dyn Updater>) {
        self.updaters.push(updater);
    }

    pub fn attach_tuner(&mut self, tuner: MoveSizeTuner) {
        self.tuners.push(tuner);
    }

    /// True when every attached updater reports complete.
    pub fn updaters_complete(&self) -> bool {
        self.updaters.iter().all(|u| u.is_complete())
    }

    pub fn count_overlaps(&self) -> usize {
        self.state.count_overlaps()
    }

    /// Current box volume, exact rectangular-prism arithmetic.
    pub fn volume(&self) -> f64 {
        self.state.sim_box().volume()
    }

    /// Overall trial acceptance of the integrator, if one is attached.
    pub fn acceptance(&self) -> Option<f64> {
        self.integrator.as_ref().map(|mc| mc.acceptance())
    }

    /// Steps advanced while profiling was enabled.
    pub fn profiled_steps(&self) -> u64 {
        self.profiled_steps
    }

    pub fn is_profiling(&self) -> bool {
        self.profiling
    }
}

impl Simulation for McSimulation {
    fn advance(&mut self, steps: u64) -> Result<(), EngineError> {
        let start = Instant::now();
        for _ in 0..steps {
            self.timestep += 1;
            if let Some(mc) = self.integrator.as_mut() {
                mc.sweep(&mut self.state);
            }
            for updater in self.updaters.iter_mut() {
                if self.timestep % updater.period() == 0 {
                    updater.update(&mut self.state, self.timestep);
                }
            }
            if let Some(mc) = self.integrator.as_mut() {
                for tuner in self.tuners.iter_mut() {
                    if self.timestep % tuner.period() == 0 {
                        tuner.tune(mc);
                    }
                }
            }
        }
        self.last_steps = steps;
        self.last_elapsed = start.elapsed();
        if steps > 0 {
            if self.profiling {
                self.profiled_steps += steps;
            }
            if self.autotune_remaining > 0 {
                self.autotune_remaining -= 1;
            }
            tracing::trace!(
                steps,
                timestep = self.timestep,
                elapsed_us = self.last_elapsed.as_micros() as u64,
                "advance complete"
            );
        }
        Ok(())
    }

    fn throughput(&self) -> f64 {
        if self.last_steps == 0 {
            return 0.0;
        }
        let secs = self.last_elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.last_steps as f64 / secs
    }

    fn timestep(&self) -> u64 {
        self.timestep
    }

    fn target(&self) -> ComputeTarget {
        self.target
    }

    fn is_tuning_complete(&self) -> bool {
        self.autotune_remaining == 0 && self.tuners.iter().all(|t| t.is_settled())
    }

    fn set_profiling(&mut self, enabled: bool) {
        self.profiling = enabled;
    }

    fn snapshot(&self) -> Result<Snapshot, EngineError> {
        Ok(self.state.to_snapshot())
    }
}
