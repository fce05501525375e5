//! Trial move size tuning.

use crate::integrator::{HardSphereMc, MIN_MOVE_SIZE};

/// Acceptance fraction the tuner steers toward.
pub const TUNE_TARGET_ACCEPTANCE: f64 = 0.2;

/// Upper bound on the trial displacement while tuning.
pub const MAX_TRANSLATION_MOVE: f64 = 0.2;

const TUNE_GAMMA: f64 = 2.0;
const TUNE_TOLERANCE: f64 = 0.05;

/// Periodically rescales the integrator's move size so the measured
/// acceptance fraction approaches a target.
///
/// The update is damped: the move size is multiplied by
/// `(acceptance + gamma) / (target + gamma)` and clamped, so a noisy window
/// cannot fling the move size around. The tuner reports itself settled while
/// the window acceptance sits within tolerance of the target.
#[derive(Debug, Clone)]
pub struct MoveSizeTuner {
    target: f64,
    max_move: f64,
    period: u64,
    settled: bool,
}

impl MoveSizeTuner {
    pub fn new(target: f64, max_move: f64, period: u64) -> Self {
        Self {
            target,
            max_move,
            period,
            settled: false,
        }
    }

    /// Tuner with the stock generation-time settings.
    pub fn standard(period: u64) -> Self {
        Self::new(TUNE_TARGET_ACCEPTANCE, MAX_TRANSLATION_MOVE, period)
    }

    pub fn period(&self) -> u64 {
        self.period
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// One tuning step over the acceptance window collected since the last
    /// call. No-op when the window is empty.
    pub fn tune(&mut self, mc: &mut HardSphereMc) {
        let Some(acceptance) = mc.window_acceptance() else {
            return;
        };
        if (acceptance - self.target).abs() <= TUNE_TOLERANCE {
            self.settled = true;
        } else {
            self.settled = false;
            let scale = ((acceptance + TUNE_GAMMA) / (self.target + TUNE_GAMMA)).clamp(0.5, 2.0);
            let next = (mc.move_size() * scale).clamp(MIN_MOVE_SIZE, self.max_move);
            mc.set_move_size(next);
        }
        mc.reset_window();
    }
}
