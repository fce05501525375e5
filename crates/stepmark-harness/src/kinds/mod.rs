//! The shipped benchmark kinds.
//!
//! Each kind builds its workload from the cached hard-sphere configuration
//! for the run's `(n, rho, dimensions)` and differs only in what it attaches
//! to the simulation and how it reads a sample.

mod box_resize;
mod custom_updater;
mod empty;
mod hard_sphere;

pub use box_resize::BoxResize;
pub use custom_updater::CustomUpdater;
pub use empty::Empty;
pub use hard_sphere::{HardSphere, BENCHMARK_SEED};
