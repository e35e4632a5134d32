// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

// Cell list for radius-bounded neighbor search under periodic boundaries.
//
// The box is tiled by a regular grid of cells at least `radius` wide on every axis, so any two
// atoms closer than `radius` sit in the same cell or in adjacent cells (with wraparound).
// Building the grid is O(N); emitting candidate pairs is O(N * atoms per neighborhood).

use crate::error::{Result, TimestepError};
use crate::simulation_box::SimulationBox;
use glam::f64::DVec3;
use smallvec::SmallVec;
use std::ops::Index;

/// Default padding added to the box length when binning atoms, so that an atom sitting
/// exactly on the upper boundary still maps into the last cell.
pub const DEFAULT_BOUNDARY_EPSILON: f64 = 1e-5;

/// Upper bound on the cells along one axis.
pub const MAX_CELLS_PER_AXIS: usize = 1024;

/// Smallest total cell budget; larger inputs get one cell per binned position.
pub const MIN_CELL_BUDGET: usize = 4096;

/// Parameters of a cell-list build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellListParams {
    pub radius: f64,
    pub boundary_epsilon: f64,
}

impl CellListParams {
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            boundary_epsilon: DEFAULT_BOUNDARY_EPSILON,
        }
    }

    pub fn with_boundary_epsilon(mut self, boundary_epsilon: f64) -> Self {
        self.boundary_epsilon = boundary_epsilon;
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(TimestepError::InvalidRadius(self.radius));
        }
        if !self.boundary_epsilon.is_finite() || self.boundary_epsilon <= 0.0 {
            return Err(TimestepError::InvalidParameter(format!(
                "boundary epsilon {} must be finite and positive",
                self.boundary_epsilon
            )));
        }
        Ok(())
    }
}

/// A regular periodic grid of cells, each holding the indices of the atoms binned into it.
#[derive(Debug, Clone)]
pub struct CellList {
    counts: [usize; 3],
    cell_size: DVec3,
    lengths: DVec3,
    boundary_epsilon: f64,
    cells: Vec<Vec<usize>>,
}

impl CellList {
    /// Bins every position.
    pub fn build(
        positions: &[DVec3],
        simulation_box: &SimulationBox,
        params: CellListParams,
    ) -> Result<Self> {
        Self::build_filtered(positions, simulation_box, params, |_| true)
    }

    /// Bins the positions whose index passes `include`; the others never show up in any cell.
    pub fn build_filtered(
        positions: &[DVec3],
        simulation_box: &SimulationBox,
        params: CellListParams,
        include: impl Fn(usize) -> bool,
    ) -> Result<Self> {
        params.validate()?;
        let lengths = simulation_box.lengths();
        if !lengths.is_finite() || lengths.cmple(DVec3::ZERO).any() {
            return Err(TimestepError::InvalidParameter(format!(
                "box lengths {} must be finite and positive",
                lengths
            )));
        }

        // As close to `radius` as possible while tiling the box exactly.  A radius above the
        // box length would give zero cells; one cell still yields correct (all-pairs) results.
        let mut counts = [1usize; 3];
        for (axis, count) in counts.iter_mut().enumerate() {
            *count = (lengths[axis] / params.radius)
                .floor()
                .clamp(1.0, MAX_CELLS_PER_AXIS as f64) as usize;
        }
        shrink_to_budget(&mut counts, positions.len().max(MIN_CELL_BUDGET));
        let cell_size = lengths / DVec3::new(counts[0] as f64, counts[1] as f64, counts[2] as f64);

        let mut cell_list = Self {
            counts,
            cell_size,
            lengths,
            boundary_epsilon: params.boundary_epsilon,
            cells: vec![Vec::new(); counts[0] * counts[1] * counts[2]],
        };

        for (index, &position) in positions.iter().enumerate() {
            if !include(index) {
                continue;
            }
            let flat = cell_list.flat_index(cell_list.cell_of(position));
            cell_list.cells[flat].push(index);
        }

        log::debug!(
            "built {}x{}x{} cell list (cell size {:.3} {:.3} {:.3})",
            counts[0],
            counts[1],
            counts[2],
            cell_size.x,
            cell_size.y,
            cell_size.z
        );

        Ok(cell_list)
    }

    /// Number of cells along each axis.
    pub fn cell_counts(&self) -> [usize; 3] {
        self.counts
    }

    pub fn cell_size(&self) -> DVec3 {
        self.cell_size
    }

    /// Grid coordinates of the cell a position falls into.  Positions outside the box are
    /// clamped into the edge cells.
    pub fn cell_of(&self, position: DVec3) -> [usize; 3] {
        let mut cell = [0usize; 3];
        for (axis, c) in cell.iter_mut().enumerate() {
            let count = self.counts[axis];
            let scaled =
                (position[axis] / (self.lengths[axis] + self.boundary_epsilon) * count as f64).floor();
            *c = if scaled <= 0.0 {
                0
            } else {
                (scaled as usize).min(count - 1)
            };
        }
        cell
    }

    pub fn atoms_in_cell(&self, cell: [usize; 3]) -> &[usize] {
        &self.cells[self.flat_index(cell)]
    }

    /// Flat indices of the distinct cells adjacent to `cell` under periodic wraparound, never
    /// including `cell` itself.  With fewer than three cells along an axis several offsets wrap
    /// onto the same cell; each cell is listed once.
    pub fn neighbor_cells(&self, cell: [usize; 3]) -> SmallVec<[usize; 26]> {
        let own = self.flat_index(cell);
        let mut neighbors = SmallVec::new();
        for di in -1isize..=1 {
            for dj in -1isize..=1 {
                for dk in -1isize..=1 {
                    if di == 0 && dj == 0 && dk == 0 {
                        continue;
                    }
                    let neighbor = [
                        wrap(cell[0], di, self.counts[0]),
                        wrap(cell[1], dj, self.counts[1]),
                        wrap(cell[2], dk, self.counts[2]),
                    ];
                    let flat = self.flat_index(neighbor);
                    if flat != own && !neighbors.contains(&flat) {
                        neighbors.push(flat);
                    }
                }
            }
        }
        neighbors
    }

    /// Candidate adjacency list for `num_atoms` atoms.
    ///
    /// Atoms sharing a cell are paired once and added to both lists; every atom additionally
    /// receives all atoms of its adjacent cells.  Since adjacency is symmetric, every candidate
    /// pair ends up in both atoms' lists exactly once.  No distance filtering is applied.
    pub fn neighbor_list(&self, num_atoms: usize) -> NeighborList {
        let mut lists = vec![Vec::new(); num_atoms];

        for i in 0..self.counts[0] {
            for j in 0..self.counts[1] {
                for k in 0..self.counts[2] {
                    let cell = [i, j, k];
                    let atoms = self.atoms_in_cell(cell);
                    if atoms.is_empty() {
                        continue;
                    }
                    let neighbor_cells = self.neighbor_cells(cell);

                    for (n, &atom) in atoms.iter().enumerate() {
                        for &other in &atoms[n + 1..] {
                            lists[atom].push(other);
                            lists[other].push(atom);
                        }
                        for &neighbor_cell in &neighbor_cells {
                            lists[atom].extend_from_slice(&self.cells[neighbor_cell]);
                        }
                    }
                }
            }
        }

        NeighborList { lists }
    }

    fn flat_index(&self, cell: [usize; 3]) -> usize {
        (cell[0] * self.counts[1] + cell[1]) * self.counts[2] + cell[2]
    }
}

/// Halves the densest axis until the grid fits in `budget` cells.  Cells only grow, so they
/// stay at least `radius` wide.
fn shrink_to_budget(counts: &mut [usize; 3], budget: usize) {
    while counts.iter().product::<usize>() > budget {
        let mut densest = 0;
        for axis in 1..3 {
            if counts[axis] > counts[densest] {
                densest = axis;
            }
        }
        counts[densest] = counts[densest].div_ceil(2);
    }
}

fn wrap(index: usize, offset: isize, count: usize) -> usize {
    (index as isize + offset).rem_euclid(count as isize) as usize
}

/// Adjacency list mapping each atom index to its neighboring atom indices, in no particular
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeighborList {
    lists: Vec<Vec<usize>>,
}

impl NeighborList {
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&[usize]> {
        self.lists.get(index).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.lists
            .iter()
            .enumerate()
            .map(|(index, list)| (index, list.as_slice()))
    }

    /// Every unordered pair once, as `(i, j)` with `i < j`.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.iter().flat_map(|(i, list)| {
            list.iter()
                .copied()
                .filter(move |&j| i < j)
                .map(move |j| (i, j))
        })
    }

    pub fn pair_count(&self) -> usize {
        self.pairs().count()
    }

    /// Drops every candidate farther than `radius` under the minimum-image convention.
    pub fn retain_within(&mut self, positions: &[DVec3], simulation_box: &SimulationBox, radius: f64) {
        let radius_sq = radius * radius;
        for (i, list) in self.lists.iter_mut().enumerate() {
            list.retain(|&j| simulation_box.squared_distance(positions[i], positions[j]) <= radius_sq);
        }
    }

    pub fn into_inner(self) -> Vec<Vec<usize>> {
        self.lists
    }
}

impl Index<usize> for NeighborList {
    type Output = [usize];

    fn index(&self, index: usize) -> &Self::Output {
        &self.lists[index]
    }
}

// End of File
