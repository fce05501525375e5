//! Benchmark results.

use serde::{Deserialize, Serialize};

/// The outcome of one benchmark execution.
///
/// `samples` holds one value per measured repetition in temporal order. The
/// meaning of a sample depends on the benchmark kind, so `units` travels with
/// the numbers; callers must not assume a particular unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Name of the benchmark kind that produced this report.
    pub name: String,
    /// Unit label for `samples`, e.g. "time steps per second".
    pub units: String,
    pub samples: Vec<f64>,
    /// False when the accelerator autotune loop hit its round limit and the
    /// run proceeded anyway. Always true for CPU runs.
    pub autotune_converged: bool,
}

impl PerformanceReport {
    /// Arithmetic mean of the samples, 0.0 when empty.
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }
}
