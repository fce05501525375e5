//! Error taxonomy for the stepmark crates.
//!
//! Library crates return the narrow typed errors defined here; the CLI wraps
//! them in `anyhow` at the boundary. [`Error`] is the umbrella most harness
//! entry points return, with `From` conversions from each narrow type so `?`
//! composes across crates.

use thiserror::Error;

use crate::phase::Phase;
use crate::target::ComputeTarget;

/// Convenience alias used across the stepmark crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Umbrella error for harness entry points.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    InvalidMode(#[from] InvalidModeError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Phase(#[from] PhaseError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// A benchmark kind was asked to build for a device it cannot run on.
    #[error("benchmark '{kind}' does not support device '{target}'")]
    UnsupportedTarget {
        kind: String,
        target: ComputeTarget,
    },
}

/// Failure to produce (or load) an initial configuration.
///
/// Generation fails fast on invalid inputs, before any simulation state is
/// built, and fails without leaving a partial artifact when compression does
/// not converge within the step ceiling.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("invalid dimensions {0}: must be 2 or 3")]
    InvalidDimensions(u32),

    #[error("invalid particle count {0}: must be positive")]
    InvalidParticleCount(usize),

    #[error("invalid type count {0}: must be positive")]
    InvalidTypeCount(usize),

    /// Compression hit the hard step ceiling before reaching the target
    /// volume with zero overlaps. Not retried; nothing is persisted.
    #[error(
        "compression failed to complete: {timestep} of {ceiling} allowed steps run, \
         {overlaps} overlaps remain at volume {volume:.4} (target {target_volume:.4})"
    )]
    CompressionIncomplete {
        timestep: u64,
        ceiling: u64,
        overlaps: usize,
        volume: f64,
        target_volume: f64,
    },

    #[error("engine rejected generated state: {0}")]
    Engine(#[from] EngineError),

    #[error("snapshot artifact: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("cache I/O: {0}")]
    Io(#[from] std::io::Error),
}

/// An unrecognized mode string (device name, benchmark name, output format).
///
/// Raised at construction time, never once measurement has started.
#[derive(Debug, Error)]
#[error("unknown {what} '{given}'. Expected one of: {expected}")]
pub struct InvalidModeError {
    pub what: &'static str,
    pub given: String,
    pub expected: String,
}

impl InvalidModeError {
    pub fn new(what: &'static str, given: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            what,
            given: given.into(),
            expected: expected.into(),
        }
    }
}

/// Failure inside a simulation engine.
///
/// The harness propagates these unchanged after releasing any open profiling
/// scope; it never retries.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid simulation state: {0}")]
    InvalidState(String),
}

/// An illegal benchmark phase transition.
///
/// The public harness API cannot produce one; seeing this error means a
/// caller drove a [`crate::phase::PhaseTracker`] out of order.
#[derive(Debug, Error)]
#[error("invalid phase transition: {from} -> {to}")]
pub struct PhaseError {
    pub from: Phase,
    pub to: Phase,
}

/// Malformed or truncated snapshot artifact bytes.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("bad snapshot magic {found:?}")]
    BadMagic { found: [u8; 4] },

    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    #[error("truncated snapshot while reading {0}")]
    Truncated(&'static str),

    #[error("malformed snapshot: {0}")]
    Malformed(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_nonempty_ascii() {
        let errs: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(ConfigurationError::InvalidDimensions(4)),
            Box::new(ConfigurationError::CompressionIncomplete {
                timestep: 1_000_000,
                ceiling: 1_000_000,
                overlaps: 12,
                volume: 1100.0,
                target_volume: 1000.0,
            }),
            Box::new(InvalidModeError::new("device", "tpu", "cpu, gpu")),
            Box::new(EngineError::InvalidState("no particles".into())),
            Box::new(PhaseError {
                from: Phase::Init,
                to: Phase::Done,
            }),
            Box::new(SnapshotError::Truncated("box lengths")),
        ];
        for err in errs {
            let msg = err.to_string();
            assert!(!msg.is_empty());
            assert!(msg.is_ascii(), "non-ascii message: {msg}");
        }
    }

    #[test]
    fn umbrella_preserves_variant() {
        let err: Error = ConfigurationError::InvalidDimensions(1).into();
        assert!(matches!(err, Error::Configuration(_)));
        let err: Error = InvalidModeError::new("device", "dsp", "cpu, gpu").into();
        assert!(matches!(err, Error::InvalidMode(_)));
    }

    #[test]
    fn invalid_mode_lists_expected_values() {
        let err = InvalidModeError::new("device", "tpu", "cpu, gpu");
        let msg = err.to_string();
        assert!(msg.contains("'tpu'"));
        assert!(msg.contains("cpu, gpu"));
    }
}
