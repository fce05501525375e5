//! Scheduling overhead of a do-nothing updater, measured differentially.

use stepmark_core::{Result, Snapshot};
use stepmark_engine::{McSimulation, NullUpdater};

use crate::kind::{BenchmarkKind, BuildContext, Workload};

/// Comparative benchmark: two idle simulations of the same configuration,
/// the compare one additionally scheduling a [`NullUpdater`] every step. The
/// differential sample isolates the cost of dispatching one updater call.
///
/// With `skip_reference` only the compare simulation is built and the sample
/// is its raw step rate; since the updater runs once per step, that rate is
/// the updater operation rate.
pub struct CustomUpdater;

impl BenchmarkKind for CustomUpdater {
    fn name(&self) -> &'static str {
        "custom-updater"
    }

    fn description(&self) -> &'static str {
        "dispatch cost of a do-nothing updater scheduled every step"
    }

    fn build(&self, ctx: &BuildContext<'_>) -> Result<Workload> {
        let opts = ctx.options;
        let path = ctx
            .generator()
            .hard_sphere(opts.n, opts.rho, opts.dimensions)?;
        let snapshot = Snapshot::from_file(&path)?;

        let mut compare = McSimulation::new(&snapshot, ctx.target)?;
        compare.attach_updater(Box::new(NullUpdater::new(1)));
        if opts.skip_reference {
            return Ok(Workload::Single(Box::new(compare)));
        }

        let reference = McSimulation::new(&snapshot, ctx.target)?;
        Ok(Workload::Comparative {
            reference: Box::new(reference),
            compare: Box::new(compare),
        })
    }

    fn units(&self, workload: &Workload) -> &'static str {
        match workload {
            Workload::Single(_) => "operations per second",
            Workload::Comparative { .. } => "calls per second",
        }
    }
}
