//! Runtime device probing.
//!
//! Accelerator detection shells out to vendor tooling, which makes it
//! unusable in CI. `STEPMARK_ACCEL_FAKE` overrides the probe ("none" or "0"
//! forces no accelerator, any other value forces one); setting
//! `STEPMARK_STRICT_MODE=1` ignores fakes so production runs always see real
//! hardware.

use std::process::Command;

use stepmark_core::ComputeTarget;

/// Forces the accelerator probe result for tests and demos.
pub const ACCEL_FAKE_ENV: &str = "STEPMARK_ACCEL_FAKE";

/// When set to "1", fake overrides are ignored.
pub const STRICT_MODE_ENV: &str = "STEPMARK_STRICT_MODE";

/// What the current host can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCapabilities {
    pub cpu_threads: usize,
    pub accelerator: bool,
}

impl DeviceCapabilities {
    /// Probe the current host.
    pub fn detect() -> Self {
        Self {
            cpu_threads: num_cpus::get(),
            accelerator: detect_accelerator(),
        }
    }

    pub fn supports(&self, target: ComputeTarget) -> bool {
        match target {
            ComputeTarget::Cpu => true,
            ComputeTarget::Accelerator => self.accelerator,
        }
    }
}

fn strict_mode() -> bool {
    std::env::var(STRICT_MODE_ENV).map(|v| v == "1").unwrap_or(false)
}

fn detect_accelerator() -> bool {
    if !strict_mode() {
        if let Ok(fake) = std::env::var(ACCEL_FAKE_ENV) {
            let forced_off = fake.eq_ignore_ascii_case("none") || fake == "0";
            tracing::debug!(fake = %fake, "accelerator probe overridden by {}", ACCEL_FAKE_ENV);
            return !forced_off;
        }
    }
    command_ok("nvidia-smi") || command_ok("rocm-smi")
}

fn command_ok(cmd: &str) -> bool {
    Command::new(cmd)
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}
