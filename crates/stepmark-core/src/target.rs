//! Compute device selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidModeError;

/// Where a benchmark runs.
///
/// The target changes the execution protocol, not just the backend:
/// accelerator runs poll kernel autotuning to convergence after warmup and
/// bracket measured repetitions in a profiling scope, while CPU runs go
/// straight from warmup to measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeTarget {
    Cpu,
    Accelerator,
}

impl ComputeTarget {
    pub fn is_accelerator(self) -> bool {
        matches!(self, ComputeTarget::Accelerator)
    }

    /// Stable lowercase name used in filenames and CSV rows.
    pub fn as_str(self) -> &'static str {
        match self {
            ComputeTarget::Cpu => "cpu",
            ComputeTarget::Accelerator => "gpu",
        }
    }
}

impl fmt::Display for ComputeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComputeTarget {
    type Err = InvalidModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("cpu") {
            Ok(ComputeTarget::Cpu)
        } else if s.eq_ignore_ascii_case("gpu") {
            Ok(ComputeTarget::Accelerator)
        } else {
            Err(InvalidModeError::new("device", s, "cpu, gpu"))
        }
    }
}
