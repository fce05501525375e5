//! The info command: host capabilities and cache state.

use anyhow::Result;
use console::style;

use stepmark_engine::{DeviceCapabilities, ACCEL_FAKE_ENV};
use stepmark_packing::ConfigCache;

pub fn execute() -> Result<()> {
    println!("{}", style("stepmark host information").bold().cyan());
    println!();

    println!("{}", style("Version:").bold());
    println!("  stepmark: {}", env!("CARGO_PKG_VERSION"));
    println!();

    let capabilities = DeviceCapabilities::detect();
    println!("{}", style("Host:").bold());
    println!("  OS: {}", std::env::consts::OS);
    println!("  Architecture: {}", std::env::consts::ARCH);
    println!("  CPU threads: {}", capabilities.cpu_threads);
    if capabilities.accelerator {
        println!("  Accelerator: {}", style("available").green());
    } else {
        println!("  Accelerator: {}", style("not detected").red());
    }
    if std::env::var(ACCEL_FAKE_ENV).is_ok() {
        println!("  ({ACCEL_FAKE_ENV} override is active)");
    }
    println!();

    let cache = ConfigCache::from_env();
    println!("{}", style("Configuration cache:").bold());
    println!("  Path: {}", cache.root().display());
    println!("  Entries: {}", cache.len());
    Ok(())
}
