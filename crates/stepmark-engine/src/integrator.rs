//! Hard-sphere Monte Carlo trial moves.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::state::SystemState;

/// Default maximum trial displacement.
pub(crate) const DEFAULT_MOVE_SIZE: f64 = 0.1;

/// Floor for the trial displacement, keeps the sampling range nonempty.
pub(crate) const MIN_MOVE_SIZE: f64 = 1e-4;

/// Metropolis hard-sphere integrator.
///
/// One sweep performs N single-particle trial moves: pick a random particle,
/// displace it uniformly within the current move size, and accept when the
/// new position overlaps nothing else. A particle that currently overlaps may
/// still move, which is what anneals overlaps away after a box compression.
#[derive(Debug, Clone)]
pub struct HardSphereMc {
    rng: ChaCha8Rng,
    move_size: f64,
    trials: u64,
    accepts: u64,
    window_trials: u64,
    window_accepts: u64,
}

impl HardSphereMc {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            move_size: DEFAULT_MOVE_SIZE,
            trials: 0,
            accepts: 0,
            window_trials: 0,
            window_accepts: 0,
        }
    }

    pub fn move_size(&self) -> f64 {
        self.move_size
    }

    pub fn set_move_size(&mut self, size: f64) {
        self.move_size = size.max(MIN_MOVE_SIZE);
    }

    /// Trial moves attempted since construction.
    pub fn trial_count(&self) -> u64 {
        self.trials
    }

    /// Overall acceptance fraction, 0.0 before the first trial.
    pub fn acceptance(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.accepts as f64 / self.trials as f64
        }
    }

    /// Acceptance fraction since the last [`Self::reset_window`].
    pub fn window_acceptance(&self) -> Option<f64> {
        if self.window_trials == 0 {
            None
        } else {
            Some(self.window_accepts as f64 / self.window_trials as f64)
        }
    }

    pub fn reset_window(&mut self) {
        self.window_trials = 0;
        self.window_accepts = 0;
    }

    /// One timestep: N trial moves against the given state.
    pub fn sweep(&mut self, state: &mut SystemState) {
        let n = state.n_particles();
        if n == 0 {
            return;
        }
        let half = 0.5 * self.move_size;
        let dims = state.sim_box().dimensions as usize;
        for _ in 0..n {
            self.trials += 1;
            self.window_trials += 1;
            let i = self.rng.gen_range(0..n);
            let mut trial = state.position(i);
            for c in trial.iter_mut().take(dims) {
                *c += self.rng.gen_range(-half..half);
            }
            let trial = state.sim_box().wrap(trial);
            if !state.has_overlap_at(i as u32, trial) {
                state.apply_move(i, trial);
                self.accepts += 1;
                self.window_accepts += 1;
            }
        }
    }
}
