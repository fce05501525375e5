//! Benchmark phase machine.
//!
//! A benchmark moves through `Init -> Warmup -> Autotune -> Measure -> Done`.
//! The autotune phase is optional: CPU runs step from `Warmup` straight to
//! `Measure`. Every transition is guarded; driving the tracker out of order
//! yields a [`PhaseError`] instead of silently reordering the protocol.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PhaseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Init,
    Warmup,
    Autotune,
    Measure,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "init",
            Phase::Warmup => "warmup",
            Phase::Autotune => "autotune",
            Phase::Measure => "measure",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Tracks the current benchmark phase and rejects illegal transitions.
///
/// # Examples
///
/// ```
/// use stepmark_core::phase::{Phase, PhaseTracker};
///
/// let mut tracker = PhaseTracker::new();
/// assert_eq!(tracker.phase(), Phase::Init);
/// tracker.begin_warmup().unwrap();
/// tracker.begin_measure().unwrap(); // CPU path, no autotune
/// tracker.finish().unwrap();
/// assert_eq!(tracker.phase(), Phase::Done);
/// assert!(tracker.begin_warmup().is_err()); // a run cannot restart
/// ```
#[derive(Debug)]
pub struct PhaseTracker {
    phase: Phase,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self { phase: Phase::Init }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// `Init -> Warmup`.
    pub fn begin_warmup(&mut self) -> Result<(), PhaseError> {
        self.transition(Phase::Warmup, matches!(self.phase, Phase::Init))
    }

    /// `Warmup -> Autotune`. Accelerator runs only.
    pub fn begin_autotune(&mut self) -> Result<(), PhaseError> {
        self.transition(Phase::Autotune, matches!(self.phase, Phase::Warmup))
    }

    /// `Warmup | Autotune -> Measure`.
    pub fn begin_measure(&mut self) -> Result<(), PhaseError> {
        self.transition(
            Phase::Measure,
            matches!(self.phase, Phase::Warmup | Phase::Autotune),
        )
    }

    /// `Measure -> Done`.
    pub fn finish(&mut self) -> Result<(), PhaseError> {
        self.transition(Phase::Done, matches!(self.phase, Phase::Measure))
    }

    fn transition(&mut self, to: Phase, legal: bool) -> Result<(), PhaseError> {
        if legal {
            self.phase = to;
            Ok(())
        } else {
            Err(PhaseError {
                from: self.phase,
                to,
            })
        }
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}
