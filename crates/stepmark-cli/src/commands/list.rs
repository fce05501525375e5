//! The list command: show the registered benchmark kinds.

use anyhow::Result;
use console::style;
use stepmark_harness::registry;

pub fn execute() -> Result<()> {
    for kind in registry::all() {
        println!("{:<16} {}", style(kind.name()).bold(), kind.description());
    }
    Ok(())
}
