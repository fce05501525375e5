//! The run command: execute benchmarks and report their results.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::ProgressBar;

use stepmark_core::{options, BenchmarkOptions, ComputeTarget, PerformanceReport};
use stepmark_engine::{DeviceCapabilities, ACCEL_FAKE_ENV};
use stepmark_harness::{registry, Benchmark, BenchmarkKind};
use stepmark_packing::ConfigCache;

use crate::output::OutputFormat;
use crate::report::CsvReporter;

/// Run command arguments
#[derive(Args, Debug)]
pub struct RunCommand {
    /// Benchmark kinds to run (default: every registered kind)
    #[arg(value_name = "KIND")]
    pub kinds: Vec<String>,

    /// Device to run on (cpu, gpu)
    #[arg(short, long, default_value = "cpu", value_name = "DEVICE")]
    pub device: String,

    /// Number of particles
    #[arg(
        short = 'N',
        long = "num-particles",
        default_value_t = options::DEFAULT_PARTICLES,
        value_name = "N"
    )]
    pub num_particles: usize,

    /// Number density N / V of the benchmarked system
    #[arg(long, default_value_t = options::DEFAULT_DENSITY, value_name = "RHO")]
    pub rho: f64,

    /// Spatial dimensions (2 or 3)
    #[arg(long, default_value_t = 3, value_name = "D")]
    pub dimensions: u32,

    /// Steps to run before measuring
    #[arg(long, default_value_t = options::DEFAULT_WARMUP_STEPS, value_name = "STEPS")]
    pub warmup_steps: u64,

    /// Steps per measured repetition
    #[arg(long, default_value_t = options::DEFAULT_BENCHMARK_STEPS, value_name = "STEPS")]
    pub benchmark_steps: u64,

    /// Measured repetitions (one sample each)
    #[arg(short, long, default_value_t = options::DEFAULT_REPEAT, value_name = "N")]
    pub repeat: usize,

    /// In comparative benchmarks, run only the compare simulation
    #[arg(long)]
    pub skip_reference: bool,

    /// Autotune polling rounds before proceeding unconverged
    #[arg(long, default_value_t = options::DEFAULT_MAX_AUTOTUNE_ROUNDS, value_name = "N")]
    pub max_autotune_rounds: u32,

    /// Configuration cache directory (default: STEPMARK_CACHE_DIR or
    /// initial_configuration_cache)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: String,

    /// Append results to this CSV file
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Row label used in the results CSV
    #[arg(long, default_value = "run", value_name = "NAME")]
    pub name: String,
}

impl RunCommand {
    pub fn execute(&self, verbose: bool) -> Result<()> {
        let device: ComputeTarget = self.device.parse()?;
        let format: OutputFormat = self.format.parse()?;

        let capabilities = DeviceCapabilities::detect();
        if !capabilities.supports(device) {
            anyhow::bail!(
                "no accelerator detected on this host (set {}=1 to fake one for testing)",
                ACCEL_FAKE_ENV
            );
        }

        // resolve every name up front so a typo fails before generation work
        let kinds = self.resolve_kinds(device)?;

        let cache = match &self.cache_dir {
            Some(dir) => ConfigCache::new(dir),
            None => ConfigCache::from_env(),
        };
        let benchmark_options = BenchmarkOptions {
            n: self.num_particles,
            rho: self.rho,
            dimensions: self.dimensions,
            warmup_steps: self.warmup_steps,
            benchmark_steps: self.benchmark_steps,
            repeat: self.repeat,
            verbose,
            skip_reference: self.skip_reference,
            max_autotune_rounds: self.max_autotune_rounds,
        };

        let mut reports = Vec::with_capacity(kinds.len());
        for kind in kinds {
            let spinner = (!verbose && format == OutputFormat::Text)
                .then(|| progress_spinner(kind.name()));
            let mut benchmark =
                Benchmark::new(kind, benchmark_options.clone(), device, &cache)
                    .with_context(|| format!("building benchmark '{}'", kind.name()))?;
            let report = benchmark
                .execute()
                .with_context(|| format!("running benchmark '{}'", kind.name()))?;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            reports.push(report);
        }

        self.emit(&reports, format)?;
        if let Some(path) = &self.output {
            let reporter = CsvReporter::new(path);
            for report in &reports {
                reporter.append(&self.name, device, &benchmark_options, report)?;
            }
            tracing::info!(path = %path.display(), rows = reports.len(), "results appended");
        }
        Ok(())
    }

    fn resolve_kinds(&self, device: ComputeTarget) -> Result<Vec<&'static dyn BenchmarkKind>> {
        if self.kinds.is_empty() {
            // a full sweep skips kinds the device cannot run
            return Ok(registry::all()
                .iter()
                .copied()
                .filter(|kind| kind.supports(device))
                .collect());
        }
        let mut kinds = Vec::with_capacity(self.kinds.len());
        for name in &self.kinds {
            kinds.push(registry::lookup(name)?);
        }
        Ok(kinds)
    }

    fn emit(&self, reports: &[PerformanceReport], format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(reports)?),
            OutputFormat::Text => {
                for report in reports {
                    println!(
                        "{}: {:.6e} {}",
                        style(&report.name).bold(),
                        report.mean(),
                        report.units
                    );
                    if !report.autotune_converged {
                        println!(
                            "  {}",
                            style("autotune hit its round limit; kernels may be untuned").yellow()
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

fn progress_spinner(name: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_message(format!("running {name}"));
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}
