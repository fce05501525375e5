//! The generate command: produce (or locate) a cached configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stepmark_core::options;
use stepmark_packing::{ConfigCache, ConfigurationGenerator};

/// Generate command arguments
#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// Number of particles
    #[arg(
        short = 'N',
        long = "num-particles",
        default_value_t = options::DEFAULT_PARTICLES,
        value_name = "N"
    )]
    pub num_particles: usize,

    /// Number density N / V
    #[arg(long, default_value_t = options::DEFAULT_DENSITY, value_name = "RHO")]
    pub rho: f64,

    /// Spatial dimensions (2 or 3)
    #[arg(long, default_value_t = 3, value_name = "D")]
    pub dimensions: u32,

    /// Particle types assigned round-robin over the arrangement
    #[arg(long, default_value_t = 1, value_name = "COUNT")]
    pub num_types: usize,

    /// Hard ceiling on compression steps before giving up
    #[arg(long, value_name = "STEPS")]
    pub max_steps: Option<u64>,

    /// Configuration cache directory (default: STEPMARK_CACHE_DIR or
    /// initial_configuration_cache)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,
}

impl GenerateCommand {
    pub fn execute(&self) -> Result<()> {
        let cache = match &self.cache_dir {
            Some(dir) => ConfigCache::new(dir),
            None => ConfigCache::from_env(),
        };
        let mut generator = ConfigurationGenerator::new(&cache);
        if let Some(ceiling) = self.max_steps {
            generator = generator.with_step_ceiling(ceiling);
        }
        let path = generator
            .hard_sphere_multi_type(self.num_particles, self.rho, self.dimensions, self.num_types)
            .context("generating initial configuration")?;
        println!("{}", path.display());
        Ok(())
    }
}
