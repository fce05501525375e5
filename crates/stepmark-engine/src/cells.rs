//! Cell list for neighbor lookups.
//!
//! Space is divided into cells at least one interaction range wide, so any
//! pair within range sits in the same or an adjacent cell. Neighbor cell ids
//! are deduplicated, which keeps lookups correct even when the box is so
//! small that the periodic 3x3x3 stencil folds onto itself.

use stepmark_core::SimBox;

#[derive(Debug, Clone)]
pub(crate) struct CellList {
    dims: [usize; 3],
    cell_len: [f64; 3],
    n_dim: u32,
    cells: Vec<Vec<u32>>,
}

impl CellList {
    pub fn build(positions: &[[f64; 3]], sim_box: &SimBox, range: f64) -> Self {
        let mut dims = [1usize; 3];
        let mut cell_len = [0.0f64; 3];
        for axis in 0..sim_box.dimensions as usize {
            let l = sim_box.lengths[axis];
            let count = (l / range).floor().max(1.0) as usize;
            dims[axis] = count;
            cell_len[axis] = l / count as f64;
        }
        let mut list = Self {
            dims,
            cell_len,
            n_dim: sim_box.dimensions,
            cells: vec![Vec::new(); dims[0] * dims[1] * dims[2]],
        };
        for (i, p) in positions.iter().enumerate() {
            let cell = list.cell_of(*p, sim_box);
            list.cells[cell].push(i as u32);
        }
        list
    }

    /// Flat cell index of a wrapped position.
    pub fn cell_of(&self, p: [f64; 3], sim_box: &SimBox) -> usize {
        let mut idx = [0usize; 3];
        for axis in 0..self.n_dim as usize {
            let l = sim_box.lengths[axis];
            // wrapped coordinates lie in [-l/2, l/2]; clamp guards the upper edge
            let shifted = p[axis] + 0.5 * l;
            let mut c = (shifted / self.cell_len[axis]).floor() as isize;
            let max = self.dims[axis] as isize - 1;
            if c < 0 {
                c = 0;
            } else if c > max {
                c = max;
            }
            idx[axis] = c as usize;
        }
        self.flat(idx)
    }

    /// Unique flat ids of the cell and its periodic neighbors. At most 27.
    pub fn neighbor_cells(&self, cell: usize) -> ([usize; 27], usize) {
        let (dx, dy, _) = (self.dims[0], self.dims[1], self.dims[2]);
        let ix = cell % dx;
        let iy = (cell / dx) % dy;
        let iz = cell / (dx * dy);

        let mut out = [0usize; 27];
        let mut count = 0;
        let z_offsets: &[isize] = if self.n_dim == 3 { &[-1, 0, 1] } else { &[0] };
        for &oz in z_offsets {
            for oy in -1isize..=1 {
                for ox in -1isize..=1 {
                    let nx = wrap_index(ix, ox, self.dims[0]);
                    let ny = wrap_index(iy, oy, self.dims[1]);
                    let nz = wrap_index(iz, oz, self.dims[2]);
                    let flat = self.flat([nx, ny, nz]);
                    if !out[..count].contains(&flat) {
                        out[count] = flat;
                        count += 1;
                    }
                }
            }
        }
        (out, count)
    }

    pub fn members(&self, cell: usize) -> &[u32] {
        &self.cells[cell]
    }

    /// Relocate one particle after an accepted move.
    pub fn move_particle(&mut self, idx: u32, old_cell: usize, new_cell: usize) {
        if old_cell == new_cell {
            return;
        }
        let old = &mut self.cells[old_cell];
        if let Some(pos) = old.iter().position(|&m| m == idx) {
            old.swap_remove(pos);
        }
        self.cells[new_cell].push(idx);
    }

    fn flat(&self, idx: [usize; 3]) -> usize {
        (idx[2] * self.dims[1] + idx[1]) * self.dims[0] + idx[0]
    }
}

fn wrap_index(i: usize, offset: isize, n: usize) -> usize {
    (i as isize + offset).rem_euclid(n as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions_on_line(n: usize, spacing: f64) -> Vec<[f64; 3]> {
        (0..n)
            .map(|i| [i as f64 * spacing - (n as f64 * spacing) / 2.0 + spacing / 2.0, 0.0, 0.0])
            .collect()
    }

    #[test]
    fn build_places_every_particle() {
        let b = SimBox::cubic(10.0);
        let positions = positions_on_line(8, 1.2);
        let cells = CellList::build(&positions, &b, 1.0);
        let total: usize = (0..10 * 10 * 10).map(|c| cells.members(c).len()).sum();
        assert_eq!(total, 8);
    }

    #[test]
    fn neighbor_cells_are_unique() {
        let b = SimBox::cubic(2.5);
        // only 2 cells per axis, the stencil folds heavily
        let cells = CellList::build(&[], &b, 1.0);
        let (ids, count) = cells.neighbor_cells(0);
        assert!(count <= 8);
        for i in 0..count {
            for j in (i + 1)..count {
                assert_ne!(ids[i], ids[j]);
            }
        }
    }

    #[test]
    fn move_particle_relocates_membership() {
        let b = SimBox::cubic(10.0);
        let positions = vec![[-4.0, -4.0, -4.0]];
        let mut cells = CellList::build(&positions, &b, 1.0);
        let from = cells.cell_of([-4.0, -4.0, -4.0], &b);
        let to = cells.cell_of([4.0, 4.0, 4.0], &b);
        assert_ne!(from, to);
        cells.move_particle(0, from, to);
        assert!(cells.members(from).is_empty());
        assert_eq!(cells.members(to), &[0]);
    }

    #[test]
    fn two_dimensional_stencil_skips_z() {
        let b = SimBox::square(9.0);
        let cells = CellList::build(&[], &b, 1.0);
        let (_, count) = cells.neighbor_cells(0);
        assert_eq!(count, 9);
    }
}
