//! Contract-level tests for stepmark-core.
//!
//! Coverage:
//! 1. Phase machine: every reachable transition, legal and illegal.
//! 2. Profiling scope: release on success, error, and early return.
//! 3. Device parsing: construction-time rejection of unknown modes.
//! 4. Snapshot artifacts: file roundtrip through the public API.

use std::cell::Cell;
use std::rc::Rc;

use stepmark_core::{
    ComputeTarget, EngineError, Phase, PhaseTracker, ProfilingScope, SimBox, Simulation, Snapshot,
};

// ── 1. phase machine ───────────────────────────────────────────────────────

#[test]
fn every_illegal_transition_is_rejected() {
    let mut t = PhaseTracker::new();
    assert!(t.begin_autotune().is_err());
    assert!(t.begin_measure().is_err());
    assert!(t.finish().is_err());
    assert_eq!(t.phase(), Phase::Init);

    t.begin_warmup().unwrap();
    assert!(t.begin_warmup().is_err());
    assert!(t.finish().is_err());

    t.begin_autotune().unwrap();
    assert!(t.begin_warmup().is_err());
    assert!(t.begin_autotune().is_err());
    assert!(t.finish().is_err());

    t.begin_measure().unwrap();
    assert!(t.begin_warmup().is_err());
    assert!(t.begin_autotune().is_err());
    assert!(t.begin_measure().is_err());

    t.finish().unwrap();
    assert_eq!(t.phase(), Phase::Done);
}

// ── 2. profiling scope ─────────────────────────────────────────────────────

struct SharedFlagSim {
    profiling: Rc<Cell<bool>>,
    fail: bool,
}

impl Simulation for SharedFlagSim {
    fn advance(&mut self, _steps: u64) -> Result<(), EngineError> {
        if self.fail {
            Err(EngineError::InvalidState("forced".into()))
        } else {
            Ok(())
        }
    }
    fn throughput(&self) -> f64 {
        1.0
    }
    fn timestep(&self) -> u64 {
        0
    }
    fn target(&self) -> ComputeTarget {
        ComputeTarget::Accelerator
    }
    fn is_tuning_complete(&self) -> bool {
        true
    }
    fn set_profiling(&mut self, enabled: bool) {
        self.profiling.set(enabled);
    }
    fn snapshot(&self) -> Result<Snapshot, EngineError> {
        Ok(Snapshot {
            sim_box: SimBox::cubic(1.0),
            positions: vec![[0.0; 3]],
            type_ids: vec![0],
            type_names: vec!["A".into()],
        })
    }
}

fn run_profiled(sim: &mut dyn Simulation, steps: u64) -> Result<(), EngineError> {
    let mut scoped = ProfilingScope::enter(sim);
    scoped.advance(steps)?;
    // scope drops here, releasing profiling before the caller sees Ok
    Ok(())
}

#[test]
fn profiling_scope_is_released_through_question_mark() {
    let flag = Rc::new(Cell::new(false));
    let mut sim = SharedFlagSim {
        profiling: Rc::clone(&flag),
        fail: true,
    };
    assert!(run_profiled(&mut sim, 10).is_err());
    assert!(!flag.get(), "error path left profiling enabled");

    sim.fail = false;
    run_profiled(&mut sim, 10).unwrap();
    assert!(!flag.get());
}

// ── 3. device parsing ──────────────────────────────────────────────────────

#[test]
fn unknown_device_fails_before_any_work() {
    let err = "fpga".parse::<ComputeTarget>().unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("unknown device 'fpga'"), "got: {msg}");
}

// ── 4. snapshot artifacts ──────────────────────────────────────────────────

#[test]
fn snapshot_decode_roundtrips_through_bytes() {
    let snap = Snapshot {
        sim_box: SimBox::cubic(12.0),
        positions: (0..27)
            .map(|i| {
                let c = f64::from(i % 3) * 4.0 - 4.0;
                [c, c, c]
            })
            .collect(),
        type_ids: vec![0; 27],
        type_names: vec!["A".into()],
    };
    let decoded = Snapshot::decode(&snap.encode()).unwrap();
    assert_eq!(decoded.n_particles(), 27);
    assert_eq!(decoded.sim_box.volume(), 12.0 * 12.0 * 12.0);
    assert_eq!(decoded, snap);
}
