//! Full-protocol benchmark runs against the reference engine.
//!
//! Coverage:
//! 1. The CPU protocol: zero-length advance, warmup, exactly `repeat`
//!    measured repetitions, exact final step count.
//! 2. Accelerator runs poll kernel tuning and report convergence.
//! 3. Comparative and skip-reference workload shapes with their units.
//! 4. Each shipped kind completes a small run end to end.

use stepmark_core::{BenchmarkOptions, ComputeTarget, Phase};
use stepmark_harness::{registry, Benchmark, Workload};
use stepmark_packing::ConfigCache;

fn small_options() -> BenchmarkOptions {
    BenchmarkOptions {
        n: 64,
        rho: 0.5,
        dimensions: 3,
        warmup_steps: 100,
        benchmark_steps: 100,
        repeat: 3,
        ..Default::default()
    }
}

// ── 1. cpu protocol ────────────────────────────────────────────────────────

#[test]
fn cpu_run_yields_three_samples_and_four_hundred_steps() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ConfigCache::new(dir.path());
    let kind = registry::lookup("empty").unwrap();

    let mut benchmark =
        Benchmark::new(kind, small_options(), ComputeTarget::Cpu, &cache).unwrap();
    let report = benchmark.execute().unwrap();

    assert_eq!(report.samples.len(), 3);
    for sample in &report.samples {
        assert!(sample.is_finite());
        assert!(*sample >= 0.0);
    }
    assert!(report.autotune_converged);
    assert_eq!(report.name, "empty");
    assert_eq!(report.units, "nanoseconds per step");
    assert_eq!(benchmark.phase(), Phase::Done);
    // warmup 100 plus 3 x 100 measured; the zero-length advance adds nothing
    assert_eq!(benchmark.workload().primary().timestep(), 400);
}

// ── 2. accelerator protocol ────────────────────────────────────────────────

#[test]
fn accelerator_run_converges_and_profiles() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ConfigCache::new(dir.path());
    let kind = registry::lookup("empty").unwrap();

    let mut benchmark =
        Benchmark::new(kind, small_options(), ComputeTarget::Accelerator, &cache).unwrap();
    let report = benchmark.execute().unwrap();

    assert!(report.autotune_converged);
    assert_eq!(report.samples.len(), 3);
    // warmup, one settling autotune poll, three measured repetitions
    assert_eq!(benchmark.workload().primary().timestep(), 500);
}

// ── 3. comparative shapes ──────────────────────────────────────────────────

#[test]
fn comparative_updater_run_reports_call_rate_units() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ConfigCache::new(dir.path());
    let kind = registry::lookup("custom-updater").unwrap();

    let mut benchmark =
        Benchmark::new(kind, small_options(), ComputeTarget::Cpu, &cache).unwrap();
    assert!(matches!(benchmark.workload(), Workload::Comparative { .. }));
    let report = benchmark.execute().unwrap();

    assert_eq!(report.units, "calls per second");
    assert_eq!(report.samples.len(), 3);
    // near-equal idle rates legitimately blow the differential up, but it
    // must stay a number
    for sample in &report.samples {
        assert!(!sample.is_nan());
    }
}

#[test]
fn skip_reference_runs_the_compare_simulation_alone() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ConfigCache::new(dir.path());
    let kind = registry::lookup("custom-updater").unwrap();
    let options = BenchmarkOptions {
        skip_reference: true,
        ..small_options()
    };

    let mut benchmark = Benchmark::new(kind, options, ComputeTarget::Cpu, &cache).unwrap();
    assert!(matches!(benchmark.workload(), Workload::Single(_)));
    let report = benchmark.execute().unwrap();

    assert_eq!(report.units, "operations per second");
    assert_eq!(report.samples.len(), 3);
    for sample in &report.samples {
        assert!(sample.is_finite());
        assert!(*sample > 0.0);
    }
}

// ── 4. shipped kinds end to end ────────────────────────────────────────────

#[test]
fn hard_sphere_run_measures_a_positive_sweep_rate() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ConfigCache::new(dir.path());
    let kind = registry::lookup("hard-sphere").unwrap();
    let options = BenchmarkOptions {
        warmup_steps: 50,
        benchmark_steps: 50,
        repeat: 2,
        ..small_options()
    };

    let mut benchmark = Benchmark::new(kind, options, ComputeTarget::Cpu, &cache).unwrap();
    let report = benchmark.execute().unwrap();

    assert_eq!(report.units, "sweeps per second");
    assert_eq!(report.samples.len(), 2);
    for sample in &report.samples {
        assert!(sample.is_finite());
        assert!(*sample > 0.0);
    }
    assert!(report.mean() > 0.0);
}

#[test]
fn box_resize_run_shrinks_the_box_mid_ramp() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ConfigCache::new(dir.path());
    let kind = registry::lookup("box-resize").unwrap();

    let mut benchmark =
        Benchmark::new(kind, small_options(), ComputeTarget::Cpu, &cache).unwrap();
    let before = benchmark
        .workload()
        .primary()
        .snapshot()
        .unwrap()
        .sim_box
        .volume();
    let report = benchmark.execute().unwrap();
    let after = benchmark
        .workload()
        .primary()
        .snapshot()
        .unwrap()
        .sim_box
        .volume();

    assert_eq!(report.samples.len(), 3);
    // the ramp outlives the run: shrunk, but not yet at half volume
    assert!(after < before);
    assert!(after > before / 2.0);
}

#[test]
fn every_registered_kind_completes_a_cpu_run() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ConfigCache::new(dir.path());
    let options = BenchmarkOptions {
        warmup_steps: 20,
        benchmark_steps: 20,
        repeat: 1,
        ..small_options()
    };

    for kind in registry::all() {
        let mut benchmark =
            Benchmark::new(*kind, options.clone(), ComputeTarget::Cpu, &cache).unwrap();
        let report = benchmark.execute().unwrap();
        assert_eq!(report.samples.len(), 1, "kind {}", kind.name());
        assert_eq!(report.name, kind.name());
        assert!(!report.units.is_empty());
    }
}
