//! Particle arrangements, periodic box arithmetic, and the artifact codec.
//!
//! Snapshots are the unit of exchange between the configuration generator and
//! the engines: the generator persists one per `(N, density, dimensions,
//! types)` tuple and benchmarks rebuild simulations from it. On disk a
//! snapshot is a little-endian binary record starting with a 4-byte magic and
//! a format version; decoding is fully checked and never panics on malformed
//! input.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;

/// Magic bytes at offset 0 of every snapshot artifact.
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"SMRK";

/// Current (and only) snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// An orthorhombic periodic box.
///
/// `lengths[2]` is 0 for two-dimensional boxes; volume and image arithmetic
/// only touch the first `dimensions` axes. "Volume" means area when
/// `dimensions == 2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimBox {
    pub lengths: [f64; 3],
    pub dimensions: u32,
}

impl SimBox {
    pub fn new(mut lengths: [f64; 3], dimensions: u32) -> Self {
        if dimensions == 2 {
            lengths[2] = 0.0;
        }
        Self {
            lengths,
            dimensions,
        }
    }

    /// Three-dimensional box with equal edges.
    pub fn cubic(l: f64) -> Self {
        Self::new([l, l, l], 3)
    }

    /// Two-dimensional box with equal edges.
    pub fn square(l: f64) -> Self {
        Self::new([l, l, 0.0], 2)
    }

    /// Exact product of the first `dimensions` edge lengths.
    pub fn volume(&self) -> f64 {
        self.lengths
            .iter()
            .take(self.dimensions as usize)
            .product()
    }

    /// A box with the same shape scaled uniformly to `target` volume.
    pub fn scale_to_volume(&self, target: f64) -> SimBox {
        let factor = (target / self.volume()).powf(1.0 / f64::from(self.dimensions));
        let mut lengths = self.lengths;
        for axis in 0..self.dimensions as usize {
            lengths[axis] *= factor;
        }
        SimBox::new(lengths, self.dimensions)
    }

    /// Wrap a position into the primary image centered on the origin.
    pub fn wrap(&self, mut p: [f64; 3]) -> [f64; 3] {
        for axis in 0..self.dimensions as usize {
            let l = self.lengths[axis];
            p[axis] -= (p[axis] / l).round() * l;
        }
        p
    }

    /// Minimum-image separation vector.
    pub fn min_image(&self, mut dr: [f64; 3]) -> [f64; 3] {
        for axis in 0..self.dimensions as usize {
            let l = self.lengths[axis];
            dr[axis] -= (dr[axis] / l).round() * l;
        }
        dr
    }
}

/// A particle arrangement: positions plus type labels inside a periodic box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub sim_box: SimBox,
    pub positions: Vec<[f64; 3]>,
    pub type_ids: Vec<u32>,
    pub type_names: Vec<String>,
}

impl Snapshot {
    pub fn n_particles(&self) -> usize {
        self.positions.len()
    }

    /// Serialize to the on-disk artifact format.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(64 + self.positions.len() * 28);
        out.extend_from_slice(&SNAPSHOT_MAGIC);
        out.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
        out.extend_from_slice(&self.sim_box.dimensions.to_le_bytes());
        out.extend_from_slice(&(self.type_names.len() as u32).to_le_bytes());
        for name in &self.type_names {
            out.extend_from_slice(&(name.len() as u32).to_le_bytes());
            out.extend_from_slice(name.as_bytes());
        }
        for l in self.sim_box.lengths {
            out.extend_from_slice(&l.to_le_bytes());
        }
        out.extend_from_slice(&(self.positions.len() as u64).to_le_bytes());
        for p in &self.positions {
            for c in p {
                out.extend_from_slice(&c.to_le_bytes());
            }
        }
        for id in &self.type_ids {
            out.extend_from_slice(&id.to_le_bytes());
        }
        out
    }

    /// Parse an artifact produced by [`Snapshot::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] on a wrong magic, an unknown version, any
    /// truncation, out-of-range type ids, or trailing bytes. Never panics,
    /// whatever the input.
    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let mut buf = bytes;

        let magic = take(&mut buf, 4, "magic")?;
        if magic != SNAPSHOT_MAGIC {
            let mut found = [0u8; 4];
            found.copy_from_slice(magic);
            return Err(SnapshotError::BadMagic { found });
        }
        let version = read_u32(&mut buf, "version")?;
        if version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(version));
        }

        let dimensions = read_u32(&mut buf, "dimensions")?;
        if dimensions != 2 && dimensions != 3 {
            return Err(SnapshotError::Malformed("dimensions must be 2 or 3"));
        }

        let n_types = read_u32(&mut buf, "type count")? as usize;
        if n_types == 0 {
            return Err(SnapshotError::Malformed("type table is empty"));
        }
        // each name carries at least its 4-byte length field
        if buf.len() < n_types.saturating_mul(4) {
            return Err(SnapshotError::Truncated("type table"));
        }
        let mut type_names = Vec::with_capacity(n_types);
        for _ in 0..n_types {
            let len = read_u32(&mut buf, "type name length")? as usize;
            let raw = take(&mut buf, len, "type name")?;
            let name = std::str::from_utf8(raw)
                .map_err(|_| SnapshotError::Malformed("type name is not utf-8"))?;
            type_names.push(name.to_owned());
        }

        let mut lengths = [0.0f64; 3];
        for l in &mut lengths {
            *l = read_f64(&mut buf, "box length")?;
        }
        for axis in 0..dimensions as usize {
            if !lengths[axis].is_finite() || lengths[axis] <= 0.0 {
                return Err(SnapshotError::Malformed("box length must be positive"));
            }
        }

        let n_raw = read_u64(&mut buf, "particle count")?;
        let n = usize::try_from(n_raw)
            .map_err(|_| SnapshotError::Malformed("particle count too large"))?;
        let need = n
            .checked_mul(28)
            .ok_or(SnapshotError::Malformed("particle count too large"))?;
        if buf.len() < need {
            return Err(SnapshotError::Truncated("particle data"));
        }

        let mut positions = Vec::with_capacity(n);
        for _ in 0..n {
            let mut p = [0.0f64; 3];
            for c in &mut p {
                *c = read_f64(&mut buf, "position")?;
            }
            positions.push(p);
        }
        let mut type_ids = Vec::with_capacity(n);
        for _ in 0..n {
            let id = read_u32(&mut buf, "type id")?;
            if id as usize >= n_types {
                return Err(SnapshotError::Malformed("type id out of range"));
            }
            type_ids.push(id);
        }

        if !buf.is_empty() {
            return Err(SnapshotError::Malformed("trailing bytes"));
        }

        Ok(Self {
            sim_box: SimBox::new(lengths, dimensions),
            positions,
            type_ids,
            type_names,
        })
    }

    /// Read and decode an artifact file.
    pub fn from_file(path: &Path) -> Result<Self, SnapshotError> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes)
    }
}

// ---------------------------------------------------------------------------
// checked little-endian reads
// ---------------------------------------------------------------------------

fn take<'a>(
    buf: &mut &'a [u8],
    n: usize,
    what: &'static str,
) -> Result<&'a [u8], SnapshotError> {
    if buf.len() < n {
        return Err(SnapshotError::Truncated(what));
    }
    let (head, tail) = buf.split_at(n);
    *buf = tail;
    Ok(head)
}

fn read_u32(buf: &mut &[u8], what: &'static str) -> Result<u32, SnapshotError> {
    let raw = take(buf, 4, what)?;
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(raw);
    Ok(u32::from_le_bytes(bytes))
}

fn read_u64(buf: &mut &[u8], what: &'static str) -> Result<u64, SnapshotError> {
    let raw = take(buf, 8, what)?;
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(raw);
    Ok(u64::from_le_bytes(bytes))
}

fn read_f64(buf: &mut &[u8], what: &'static str) -> Result<f64, SnapshotError> {
    let raw = take(buf, 8, what)?;
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(raw);
    Ok(f64::from_le_bytes(bytes))
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
        (2u32..=3, 1usize..24).prop_flat_map(|(dims, n)| {
            let coord = -50.0f64..50.0;
            let pos = prop::collection::vec([coord.clone(), coord.clone(), coord], n);
            let ids = prop::collection::vec(0u32..2, n);
            (Just(dims), pos, ids, 4.0f64..64.0).prop_map(|(dims, pos, ids, l)| {
                let sim_box = if dims == 2 {
                    SimBox::square(l)
                } else {
                    SimBox::cubic(l)
                };
                let positions = pos
                    .into_iter()
                    .map(|p| {
                        let mut p = p;
                        if dims == 2 {
                            p[2] = 0.0;
                        }
                        p
                    })
                    .collect();
                Snapshot {
                    sim_box,
                    positions,
                    type_ids: ids,
                    type_names: vec!["A".into(), "B".into()],
                }
            })
        })
    }

    proptest! {
        #[test]
        fn decode_never_panics_on_arbitrary_bytes(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
            let _ = Snapshot::decode(&bytes);
        }

        #[test]
        fn encode_decode_is_identity(snap in arb_snapshot()) {
            let back = Snapshot::decode(&snap.encode()).unwrap();
            prop_assert_eq!(back, snap);
        }

        #[test]
        fn corrupted_magic_never_decodes(snap in arb_snapshot(), byte in 0usize..4, val in any::<u8>()) {
            let mut bytes = snap.encode();
            prop_assume!(bytes[byte] != val);
            bytes[byte] = val;
            prop_assert!(Snapshot::decode(&bytes).is_err());
        }
    }
}
