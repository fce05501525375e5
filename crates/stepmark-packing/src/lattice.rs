//! Initial grid layout.

use stepmark_core::{SimBox, Snapshot};

/// Grid spacing of the initial layout, in sphere diameters. Loose enough
/// that the starting arrangement never overlaps.
pub const GRID_SPACING: f64 = 1.5;

/// Particles per box edge for `n` particles in `dimensions` dimensions: the
/// smallest `k` with `k^dimensions >= n`.
fn edge_count(n: usize, dimensions: u32) -> usize {
    let mut k = (n as f64).powf(1.0 / f64::from(dimensions)).ceil() as usize;
    k = k.max(1);
    // float powf can land one off in either direction
    while k.pow(dimensions) < n {
        k += 1;
    }
    while k > 1 && (k - 1).pow(dimensions) >= n {
        k -= 1;
    }
    k
}

/// Lay `n` single-type particles on a simple grid, centered on the origin,
/// in a periodic box exactly holding the grid.
///
/// Only the first `n` of the `k^dimensions` grid sites are filled. The
/// caller validates `dimensions`; this function assumes 2 or 3.
pub fn grid_snapshot(n: usize, dimensions: u32) -> Snapshot {
    let k = edge_count(n, dimensions);
    let l = k as f64 * GRID_SPACING;
    let sim_box = if dimensions == 2 {
        SimBox::square(l)
    } else {
        SimBox::cubic(l)
    };

    let mut positions = Vec::with_capacity(n);
    'fill: for iz in 0..if dimensions == 3 { k } else { 1 } {
        for iy in 0..k {
            for ix in 0..k {
                if positions.len() == n {
                    break 'fill;
                }
                let mut p = [
                    (ix as f64 + 0.5) * GRID_SPACING - l / 2.0,
                    (iy as f64 + 0.5) * GRID_SPACING - l / 2.0,
                    0.0,
                ];
                if dimensions == 3 {
                    p[2] = (iz as f64 + 0.5) * GRID_SPACING - l / 2.0;
                }
                positions.push(p);
            }
        }
    }

    Snapshot {
        sim_box,
        positions,
        type_ids: vec![0; n],
        type_names: vec!["A".into()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepmark_engine::count_snapshot_overlaps;

    #[test]
    fn edge_count_is_minimal() {
        assert_eq!(edge_count(1, 3), 1);
        assert_eq!(edge_count(8, 3), 2);
        assert_eq!(edge_count(9, 3), 3);
        assert_eq!(edge_count(27, 3), 3);
        assert_eq!(edge_count(1000, 3), 10);
        assert_eq!(edge_count(1001, 3), 11);
        assert_eq!(edge_count(9, 2), 3);
        assert_eq!(edge_count(10, 2), 4);
    }

    #[test]
    fn grid_fills_exactly_n_sites() {
        for n in [1, 7, 27, 100] {
            let snap = grid_snapshot(n, 3);
            assert_eq!(snap.n_particles(), n);
            assert_eq!(snap.type_ids.len(), n);
            assert_eq!(snap.type_names, vec!["A".to_owned()]);
        }
    }

    #[test]
    fn grid_positions_sit_inside_the_box() {
        let snap = grid_snapshot(64, 3);
        let half = snap.sim_box.lengths[0] / 2.0;
        for p in &snap.positions {
            for c in p {
                assert!(c.abs() <= half, "coordinate {c} outside half-width {half}");
            }
        }
    }

    #[test]
    fn grid_never_overlaps() {
        for (n, d) in [(64, 3), (1000, 3), (49, 2), (100, 2)] {
            let snap = grid_snapshot(n, d);
            assert_eq!(count_snapshot_overlaps(&snap, 1.0).unwrap(), 0);
        }
    }

    #[test]
    fn two_dimensional_grid_is_flat() {
        let snap = grid_snapshot(25, 2);
        assert_eq!(snap.sim_box.dimensions, 2);
        assert_eq!(snap.sim_box.lengths[2], 0.0);
        for p in &snap.positions {
            assert_eq!(p[2], 0.0);
        }
        // 5x5 grid of spacing 1.5
        assert!((snap.sim_box.volume() - 56.25).abs() < 1e-12);
    }
}
