//! Mutable particle system state shared by the integrator and updaters.

use stepmark_core::{EngineError, SimBox, Snapshot};

use crate::cells::CellList;

#[derive(Debug, Clone)]
pub(crate) struct SystemState {
    sim_box: SimBox,
    positions: Vec<[f64; 3]>,
    type_ids: Vec<u32>,
    type_names: Vec<String>,
    diameter: f64,
    cells: CellList,
}

impl SystemState {
    /// Validate a snapshot and build the runtime state from it.
    pub fn from_snapshot(snapshot: &Snapshot, diameter: f64) -> Result<Self, EngineError> {
        let n = snapshot.positions.len();
        if n == 0 {
            return Err(EngineError::InvalidState("snapshot has no particles".into()));
        }
        if snapshot.type_ids.len() != n {
            return Err(EngineError::InvalidState(format!(
                "type id count {} does not match particle count {n}",
                snapshot.type_ids.len()
            )));
        }
        if snapshot.type_names.is_empty() {
            return Err(EngineError::InvalidState("snapshot names no types".into()));
        }
        if let Some(&bad) = snapshot
            .type_ids
            .iter()
            .find(|&&id| id as usize >= snapshot.type_names.len())
        {
            return Err(EngineError::InvalidState(format!(
                "type id {bad} exceeds the {} declared types",
                snapshot.type_names.len()
            )));
        }
        let dims = snapshot.sim_box.dimensions;
        if dims != 2 && dims != 3 {
            return Err(EngineError::InvalidState(format!(
                "snapshot dimensions {dims} unsupported"
            )));
        }

        let positions: Vec<[f64; 3]> = snapshot
            .positions
            .iter()
            .map(|&p| snapshot.sim_box.wrap(p))
            .collect();
        let cells = CellList::build(&positions, &snapshot.sim_box, diameter);
        Ok(Self {
            sim_box: snapshot.sim_box,
            positions,
            type_ids: snapshot.type_ids.clone(),
            type_names: snapshot.type_names.clone(),
            diameter,
            cells,
        })
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            sim_box: self.sim_box,
            positions: self.positions.clone(),
            type_ids: self.type_ids.clone(),
            type_names: self.type_names.clone(),
        }
    }

    pub fn sim_box(&self) -> &SimBox {
        &self.sim_box
    }

    pub fn n_particles(&self) -> usize {
        self.positions.len()
    }

    pub fn position(&self, idx: usize) -> [f64; 3] {
        self.positions[idx]
    }

    /// Would a particle placed at `pos` overlap anything other than `idx`?
    pub fn has_overlap_at(&self, idx: u32, pos: [f64; 3]) -> bool {
        let d2 = self.diameter * self.diameter;
        let cell = self.cells.cell_of(pos, &self.sim_box);
        let (neighbors, count) = self.cells.neighbor_cells(cell);
        for &nc in &neighbors[..count] {
            for &j in self.cells.members(nc) {
                if j == idx {
                    continue;
                }
                if self.dist2(pos, self.positions[j as usize]) < d2 {
                    return true;
                }
            }
        }
        false
    }

    /// Total overlapping pairs in the current arrangement.
    pub fn count_overlaps(&self) -> usize {
        let d2 = self.diameter * self.diameter;
        let mut total = 0;
        for i in 0..self.positions.len() {
            let pos = self.positions[i];
            let cell = self.cells.cell_of(pos, &self.sim_box);
            let (neighbors, count) = self.cells.neighbor_cells(cell);
            for &nc in &neighbors[..count] {
                for &j in self.cells.members(nc) {
                    if (j as usize) > i && self.dist2(pos, self.positions[j as usize]) < d2 {
                        total += 1;
                    }
                }
            }
        }
        total
    }

    /// Commit an accepted trial move. `new_pos` must already be wrapped.
    pub fn apply_move(&mut self, idx: usize, new_pos: [f64; 3]) {
        let old_cell = self.cells.cell_of(self.positions[idx], &self.sim_box);
        let new_cell = self.cells.cell_of(new_pos, &self.sim_box);
        self.positions[idx] = new_pos;
        self.cells.move_particle(idx as u32, old_cell, new_cell);
    }

    /// Replace the box, scaling every position by the per-axis edge ratios.
    pub fn rescale_to_box(&mut self, new_box: SimBox) {
        let mut factor = [1.0f64; 3];
        for axis in 0..self.sim_box.dimensions as usize {
            factor[axis] = new_box.lengths[axis] / self.sim_box.lengths[axis];
        }
        for p in &mut self.positions {
            for axis in 0..self.sim_box.dimensions as usize {
                p[axis] *= factor[axis];
            }
        }
        self.sim_box = new_box;
        self.cells = CellList::build(&self.positions, &self.sim_box, self.diameter);
    }

    /// Uniformly scale the box (and positions) to the target volume.
    pub fn rescale_to_volume(&mut self, target: f64) {
        let new_box = self.sim_box.scale_to_volume(target);
        self.rescale_to_box(new_box);
    }

    fn dist2(&self, a: [f64; 3], b: [f64; 3]) -> f64 {
        let dr = self
            .sim_box
            .min_image([a[0] - b[0], a[1] - b[1], a[2] - b[2]]);
        let mut sum = 0.0;
        for axis in 0..self.sim_box.dimensions as usize {
            sum += dr[axis] * dr[axis];
        }
        sum
    }
}

/// Count overlapping pairs in a snapshot without building a simulation.
pub fn count_snapshot_overlaps(snapshot: &Snapshot, diameter: f64) -> Result<usize, EngineError> {
    Ok(SystemState::from_snapshot(snapshot, diameter)?.count_overlaps())
}
