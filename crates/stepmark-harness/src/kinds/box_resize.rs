//! Per-step cost of a continuously rescaling box.

use stepmark_core::{Result, Snapshot};
use stepmark_engine::{BoxResize as ResizeUpdater, McSimulation};

use crate::kind::{BenchmarkKind, BuildContext, Workload};

/// Steps an idle simulation whose box ramps linearly toward half its initial
/// volume, rescaling every particle each step. The ramp is sized to ten
/// warmups plus every measured repetition so it never finishes mid-run and
/// every measured step pays the rescale.
pub struct BoxResize;

impl BenchmarkKind for BoxResize {
    fn name(&self) -> &'static str {
        "box-resize"
    }

    fn description(&self) -> &'static str {
        "per-step cost of ramping the box toward half volume"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> Result<Workload> {
        let opts = ctx.options;
        let path = ctx
            .generator()
            .hard_sphere(opts.n, opts.rho, opts.dimensions)?;
        let snapshot = Snapshot::from_file(&path)?;
        let mut sim = McSimulation::new(&snapshot, ctx.target)?;

        let initial = snapshot.sim_box;
        let final_box = initial.scale_to_volume(initial.volume() / 2.0);
        let t_ramp = opts.warmup_steps * 10 + opts.repeat as u64 * opts.benchmark_steps;
        sim.attach_updater(Box::new(ResizeUpdater::new(initial, final_box, 0, t_ramp, 1)));
        Ok(Workload::Single(Box::new(sim)))
    }
}
