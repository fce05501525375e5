//! CSV accumulation of benchmark results across runs.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use stepmark_core::{BenchmarkOptions, ComputeTarget, PerformanceReport};

pub const CSV_HEADER: &str =
    "date,name,benchmark,device,num_particles,density,dimensions,mean,units";

/// Appends one row per benchmark result to a CSV file, writing the header
/// when the file does not exist yet. Rows accumulate across runs so one file
/// can hold a whole measurement campaign.
pub struct CsvReporter {
    path: PathBuf,
}

impl CsvReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn append(
        &self,
        name: &str,
        device: ComputeTarget,
        options: &BenchmarkOptions,
        report: &PerformanceReport,
    ) -> Result<()> {
        let write_header = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening results file {}", self.path.display()))?;
        if write_header {
            writeln!(file, "{CSV_HEADER}")?;
        }
        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            name,
            report.name,
            device,
            options.n,
            options.rho,
            options.dimensions,
            report.mean(),
            report.units,
        )?;
        Ok(())
    }
}
