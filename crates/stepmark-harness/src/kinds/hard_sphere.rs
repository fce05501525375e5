//! Hard-sphere Monte Carlo trial moves at the configured density.

use stepmark_core::{Result, Snapshot};
use stepmark_engine::{HardSphereMc, McSimulation};

use crate::kind::{BenchmarkKind, BuildContext, Workload};

/// RNG seed for benchmark integrators, distinct from the generation seed so
/// measurement never replays the randomization trajectory.
pub const BENCHMARK_SEED: u64 = 100;

/// The headline benchmark: full trial-move sweeps over the dense
/// configuration. One timestep performs one sweep (N trial moves), so the
/// instantaneous step rate is the sweep rate.
pub struct HardSphere;

impl BenchmarkKind for HardSphere {
    fn name(&self) -> &'static str {
        "hard-sphere"
    }

    fn description(&self) -> &'static str {
        "hard-sphere Monte Carlo trial-move sweeps at the configured density"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> Result<Workload> {
        let opts = ctx.options;
        let path = ctx
            .generator()
            .hard_sphere(opts.n, opts.rho, opts.dimensions)?;
        let snapshot = Snapshot::from_file(&path)?;
        let mut sim = McSimulation::new(&snapshot, ctx.target)?;
        sim.set_integrator(HardSphereMc::new(BENCHMARK_SEED));
        Ok(Workload::Single(Box::new(sim)))
    }

    fn units(&self, _workload: &Workload) -> &'static str {
        "sweeps per second"
    }
}
