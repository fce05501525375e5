//! Periodic updaters scheduled by the simulation loop.

use stepmark_core::SimBox;

use crate::state::SystemState;

/// Fraction of the volume kept per compression step. One update moves the
/// box volume by at most this factor toward the target.
pub(crate) const COMPRESS_VOLUME_STEP: f64 = 0.97;

/// Relative volume gap below which the compressor considers itself at target.
pub(crate) const VOLUME_TOLERANCE: f64 = 1e-9;

/// An action the simulation runs every `period` timesteps.
pub trait Updater {
    fn period(&self) -> u64;

    fn update(&mut self, state: &mut SystemState, timestep: u64);

    /// Whether this updater has finished its job. Open-ended updaters report
    /// true so they never hold up completion polling.
    fn is_complete(&self) -> bool {
        true
    }
}

/// Steps the box volume toward a target, waiting out overlaps.
///
/// Each scheduled update first checks for overlapping pairs; while any
/// remain, the box is left alone so the integrator can anneal them away.
/// Once the arrangement is overlap free the volume moves one bounded step
/// toward the target. Complete means at the target volume with zero
/// overlaps.
#[derive(Debug)]
pub struct Compressor {
    target_volume: f64,
    period: u64,
    complete: bool,
}

impl Compressor {
    pub fn new(target_volume: f64, period: u64) -> Self {
        Self {
            target_volume,
            period,
            complete: false,
        }
    }

    pub fn target_volume(&self) -> f64 {
        self.target_volume
    }
}

impl Updater for Compressor {
    fn period(&self) -> u64 {
        self.period
    }

    fn update(&mut self, state: &mut SystemState, _timestep: u64) {
        if self.complete {
            return;
        }
        if state.count_overlaps() > 0 {
            return;
        }
        let current = state.sim_box().volume();
        let gap = (current - self.target_volume).abs() / self.target_volume;
        if gap <= VOLUME_TOLERANCE {
            self.complete = true;
            return;
        }
        let next = if current > self.target_volume {
            (current * COMPRESS_VOLUME_STEP).max(self.target_volume)
        } else {
            (current / COMPRESS_VOLUME_STEP).min(self.target_volume)
        };
        state.rescale_to_volume(next);
    }

    fn is_complete(&self) -> bool {
        self.complete
    }
}

/// Linearly ramps the box edges from their initial values to a final box.
///
/// The interpolation fraction comes from the timestep, clamped to [0, 1]
/// outside the ramp window, matching a linear variant that starts at the
/// beginning of the run.
#[derive(Debug)]
pub struct BoxResize {
    initial: SimBox,
    final_box: SimBox,
    t_start: u64,
    t_ramp: u64,
    period: u64,
}

impl BoxResize {
    pub fn new(initial: SimBox, final_box: SimBox, t_start: u64, t_ramp: u64, period: u64) -> Self {
        Self {
            initial,
            final_box,
            t_start,
            t_ramp,
            period,
        }
    }
}

impl Updater for BoxResize {
    fn period(&self) -> u64 {
        self.period
    }

    fn update(&mut self, state: &mut SystemState, timestep: u64) {
        let frac = if timestep <= self.t_start {
            0.0
        } else if timestep >= self.t_start + self.t_ramp {
            1.0
        } else {
            (timestep - self.t_start) as f64 / self.t_ramp as f64
        };
        let mut lengths = [0.0f64; 3];
        for axis in 0..3 {
            let a = self.initial.lengths[axis];
            let b = self.final_box.lengths[axis];
            lengths[axis] = a + (b - a) * frac;
        }
        state.rescale_to_box(SimBox::new(lengths, self.initial.dimensions));
    }
}

/// Does nothing. Measures the per-step cost of scheduling an updater.
#[derive(Debug)]
pub struct NullUpdater {
    period: u64,
    calls: u64,
}

impl NullUpdater {
    pub fn new(period: u64) -> Self {
        Self { period, calls: 0 }
    }

    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl Updater for NullUpdater {
    fn period(&self) -> u64 {
        self.period
    }

    fn update(&mut self, _state: &mut SystemState, _timestep: u64) {
        self.calls += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepmark_core::Snapshot;

    fn loose_grid(side: usize, spacing: f64) -> SystemState {
        let l = side as f64 * spacing;
        let mut positions = Vec::new();
        for ix in 0..side {
            for iy in 0..side {
                for iz in 0..side {
                    positions.push([
                        (ix as f64 + 0.5) * spacing - l / 2.0,
                        (iy as f64 + 0.5) * spacing - l / 2.0,
                        (iz as f64 + 0.5) * spacing - l / 2.0,
                    ]);
                }
            }
        }
        let n = positions.len();
        SystemState::from_snapshot(
            &Snapshot {
                sim_box: SimBox::cubic(l),
                positions,
                type_ids: vec![0; n],
                type_names: vec!["A".into()],
            },
            1.0,
        )
        .unwrap()
    }

    #[test]
    fn compressor_steps_volume_down() {
        let mut state = loose_grid(4, 2.0);
        let start = state.sim_box().volume();
        let mut compressor = Compressor::new(start / 2.0, 10);
        compressor.update(&mut state, 10);
        let after = state.sim_box().volume();
        assert!(after < start);
        assert!((after - start * COMPRESS_VOLUME_STEP).abs() < 1e-9);
        assert!(!compressor.is_complete());
    }

    #[test]
    fn compressor_waits_while_overlaps_remain() {
        // spacing below the diameter, every neighbor pair overlaps
        let mut state = loose_grid(3, 0.9);
        assert!(state.count_overlaps() > 0);
        let start = state.sim_box().volume();
        let mut compressor = Compressor::new(start / 2.0, 10);
        compressor.update(&mut state, 10);
        assert_eq!(state.sim_box().volume(), start);
    }

    #[test]
    fn compressor_reaches_and_reports_target() {
        let mut state = loose_grid(4, 1.6);
        let target = state.sim_box().volume() * 0.9;
        let mut compressor = Compressor::new(target, 10);
        let mut t = 0;
        while !compressor.is_complete() && t < 1000 {
            t += 10;
            compressor.update(&mut state, t);
        }
        assert!(compressor.is_complete());
        assert!((state.sim_box().volume() - target).abs() / target < 1e-9);
        assert_eq!(state.count_overlaps(), 0);
    }

    #[test]
    fn compressor_expands_toward_larger_target() {
        let mut state = loose_grid(4, 1.6);
        let target = state.sim_box().volume() * 1.3;
        let mut compressor = Compressor::new(target, 10);
        let mut t = 0;
        while !compressor.is_complete() && t < 1000 {
            t += 10;
            compressor.update(&mut state, t);
        }
        assert!(compressor.is_complete());
        assert!((state.sim_box().volume() - target).abs() / target < 1e-9);
    }

    #[test]
    fn box_resize_ramps_linearly_to_final() {
        let mut state = loose_grid(4, 2.0);
        let initial = *state.sim_box();
        let final_box = initial.scale_to_volume(initial.volume() / 2.0);
        let mut resize = BoxResize::new(initial, final_box, 0, 100, 1);

        resize.update(&mut state, 50);
        let mid = state.sim_box().lengths[0];
        let expected = initial.lengths[0] + (final_box.lengths[0] - initial.lengths[0]) * 0.5;
        assert!((mid - expected).abs() < 1e-9);

        resize.update(&mut state, 100);
        assert!((state.sim_box().volume() - initial.volume() / 2.0).abs() < 1e-9);

        // past the ramp the box stays at the final shape
        resize.update(&mut state, 10_000);
        assert!((state.sim_box().volume() - initial.volume() / 2.0).abs() < 1e-9);
        assert!(resize.is_complete());
    }

    #[test]
    fn null_updater_counts_calls_only() {
        let mut state = loose_grid(3, 2.0);
        let before = state.sim_box().volume();
        let mut null = NullUpdater::new(1);
        for t in 1..=5 {
            null.update(&mut state, t);
        }
        assert_eq!(null.calls(), 5);
        assert_eq!(state.sim_box().volume(), before);
    }
}
