//! Baseline cost of stepping a simulation that does no work.

use stepmark_core::{Result, Snapshot};
use stepmark_engine::McSimulation;

use crate::kind::{BenchmarkKind, BuildContext, Workload};

/// Steps the configured system with no integrator, updaters, or tuners
/// attached, exposing the fixed per-step overhead of the simulation loop
/// itself.
pub struct Empty;

impl BenchmarkKind for Empty {
    fn name(&self) -> &'static str {
        "empty"
    }

    fn description(&self) -> &'static str {
        "per-step overhead of an idle simulation loop"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> Result<Workload> {
        let opts = ctx.options;
        let path = ctx
            .generator()
            .hard_sphere(opts.n, opts.rho, opts.dimensions)?;
        let snapshot = Snapshot::from_file(&path)?;
        let sim = McSimulation::new(&snapshot, ctx.target)?;
        Ok(Workload::Single(Box::new(sim)))
    }

    fn units(&self, _workload: &Workload) -> &'static str {
        "nanoseconds per step"
    }

    fn measure(&self, workload: &Workload) -> f64 {
        let tps = workload.primary().throughput();
        if tps <= 0.0 {
            return 0.0;
        }
        1e9 / tps
    }
}
