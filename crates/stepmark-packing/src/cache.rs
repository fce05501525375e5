//! The on-disk configuration cache.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use stepmark_core::{ConfigurationError, Snapshot};

/// Cache directory used when none is configured.
pub const DEFAULT_CACHE_DIR: &str = "initial_configuration_cache";

/// Environment override for the cache directory.
pub const CACHE_DIR_ENV: &str = "STEPMARK_CACHE_DIR";

/// Identity of one cached configuration.
///
/// Equal keys always map to the same filename, and distinct keys never
/// collide: the name joins the fields with underscores and the density is
/// the only field containing a dot, so the encoding is injective.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigKey {
    pub n: usize,
    pub rho: f64,
    pub dimensions: u32,
    pub n_types: usize,
}

impl ConfigKey {
    pub fn new(n: usize, rho: f64, dimensions: u32) -> Self {
        Self {
            n,
            rho,
            dimensions,
            n_types: 1,
        }
    }

    pub fn with_types(mut self, n_types: usize) -> Self {
        self.n_types = n_types;
        self
    }

    /// Deterministic artifact filename for this key.
    pub fn filename(&self) -> String {
        let rho = format_density(self.rho);
        if self.n_types > 1 {
            format!(
                "hard_sphere_{}_{}_{}_{}.snap",
                self.n, rho, self.dimensions, self.n_types
            )
        } else {
            format!("hard_sphere_{}_{}_{}.snap", self.n, rho, self.dimensions)
        }
    }
}

/// Format a density with at least one fractional digit, so `1` and `1.0`
/// produce the same name.
fn format_density(rho: f64) -> String {
    if rho.fract() == 0.0 && rho.is_finite() {
        format!("{rho:.1}")
    } else {
        format!("{rho}")
    }
}

/// An explicit handle on the cache directory.
///
/// All lookups and writes go through a value of this type; there is no
/// process-global cache state. The directory itself is shared freely between
/// instances and processes, and entries are never deleted by this crate.
#[derive(Debug, Clone)]
pub struct ConfigCache {
    root: PathBuf,
}

impl ConfigCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache at `STEPMARK_CACHE_DIR`, or [`DEFAULT_CACHE_DIR`] if unset.
    pub fn from_env() -> Self {
        let root = std::env::var(CACHE_DIR_ENV).unwrap_or_else(|_| DEFAULT_CACHE_DIR.to_owned());
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &ConfigKey) -> PathBuf {
        self.root.join(key.filename())
    }

    /// Whether an artifact for `key` already exists.
    pub fn contains(&self, key: &ConfigKey) -> bool {
        self.path_for(key).is_file()
    }

    pub fn load(&self, key: &ConfigKey) -> Result<Snapshot, ConfigurationError> {
        Ok(Snapshot::from_file(&self.path_for(key))?)
    }

    /// Persist a snapshot atomically: the bytes land in a temporary file in
    /// the cache directory which is then renamed over the final path, so
    /// readers either see nothing or the complete artifact.
    pub fn store(&self, key: &ConfigKey, snapshot: &Snapshot) -> Result<PathBuf, ConfigurationError> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.path_for(key);
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(&snapshot.encode())?;
        tmp.persist(&path).map_err(|e| e.error)?;
        tracing::debug!(path = %path.display(), "configuration stored");
        Ok(path)
    }

    /// Number of artifacts currently present, for diagnostics.
    pub fn len(&self) -> usize {
        std::fs::read_dir(&self.root)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.path().extension().is_some_and(|ext| ext == "snap"))
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepmark_core::SimBox;

    fn tiny_snapshot() -> Snapshot {
        Snapshot {
            sim_box: SimBox::cubic(3.0),
            positions: vec![[0.0, 0.0, 0.0]],
            type_ids: vec![0],
            type_names: vec!["A".into()],
        }
    }

    #[test]
    fn filename_matches_scheme() {
        assert_eq!(
            ConfigKey::new(1000, 1.0, 3).filename(),
            "hard_sphere_1000_1.0_3.snap"
        );
        assert_eq!(
            ConfigKey::new(500, 0.25, 2).filename(),
            "hard_sphere_500_0.25_2.snap"
        );
        assert_eq!(
            ConfigKey::new(64, 0.5, 3).with_types(4).filename(),
            "hard_sphere_64_0.5_3_4.snap"
        );
    }

    #[test]
    fn integral_density_keeps_a_fractional_digit() {
        assert_eq!(format_density(1.0), "1.0");
        assert_eq!(format_density(2.0), "2.0");
        assert_eq!(format_density(0.5), "0.5");
    }

    #[test]
    fn store_then_contains_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ConfigCache::new(dir.path());
        let key = ConfigKey::new(1, 1.0, 3);
        assert!(!cache.contains(&key));
        assert!(cache.is_empty());

        let snap = tiny_snapshot();
        let path = cache.store(&key, &snap).unwrap();
        assert!(cache.contains(&key));
        assert_eq!(path, cache.path_for(&key));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.load(&key).unwrap(), snap);
    }

    #[test]
    fn store_leaves_no_temporaries_behind() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ConfigCache::new(dir.path());
        cache.store(&ConfigKey::new(1, 1.0, 3), &tiny_snapshot()).unwrap();
        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["hard_sphere_1_1.0_3.snap".to_owned()]);
    }

    #[test]
    fn missing_entry_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ConfigCache::new(dir.path());
        assert!(cache.load(&ConfigKey::new(9, 1.0, 3)).is_err());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_key() -> impl Strategy<Value = ConfigKey> {
        (1usize..100_000, 0.05f64..5.0, 2u32..=3, 1usize..8).prop_map(|(n, rho, d, t)| {
            ConfigKey::new(n, (rho * 100.0).round() / 100.0, d).with_types(t)
        })
    }

    proptest! {
        #[test]
        fn equal_keys_equal_names(key in arb_key()) {
            let twin = key.clone();
            prop_assert_eq!(key.filename(), twin.filename());
        }

        #[test]
        fn distinct_keys_distinct_names(a in arb_key(), b in arb_key()) {
            prop_assume!(a != b);
            prop_assert_ne!(a.filename(), b.filename());
        }
    }
}
