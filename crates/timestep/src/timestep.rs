// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use crate::cell_list::{CellList, CellListParams, NeighborList};
use crate::error::{Result, TimestepError};
use crate::simulation_box::SimulationBox;
use glam::f64::DVec3;
use periodic_table::AtomType;

/// One atom's fields, as read from a node file or handed to [`Timestep::push`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomRecord {
    pub atom_type: AtomType,
    pub id: u64,
    pub position: DVec3,
    pub velocity: Option<DVec3>,
}

/// The global atom set of one simulation step.
///
/// Atoms are stored as parallel arrays indexed densely from zero, in the order they were
/// appended (node-traversal order when assembled from `mts0` files).  Removal is logical: an
/// atom is only flagged, and keeps its slot until [`Timestep::compact`] runs.  Ids travel with
/// their atom through compaction; indices do not.
#[derive(Debug, Clone)]
pub struct Timestep {
    positions: Vec<DVec3>,
    velocities: Option<Vec<DVec3>>,
    atom_types: Vec<AtomType>,
    atom_ids: Vec<u64>,
    removed: Vec<bool>,
    has_removed: bool,
    simulation_box: SimulationBox,
    // Next id `add_atom` hands out; computed from the existing ids on first use.
    next_atom_id: Option<u64>,
}

impl Timestep {
    /// Creates an empty atom set that does not track velocities.
    pub fn new(simulation_box: SimulationBox) -> Self {
        Self {
            positions: Vec::new(),
            velocities: None,
            atom_types: Vec::new(),
            atom_ids: Vec::new(),
            removed: Vec::new(),
            has_removed: false,
            simulation_box,
            next_atom_id: None,
        }
    }

    /// Creates an empty atom set that tracks velocities.
    pub fn with_velocities(simulation_box: SimulationBox) -> Self {
        Self {
            velocities: Some(Vec::new()),
            ..Self::new(simulation_box)
        }
    }

    pub fn reserve(&mut self, additional: usize) {
        self.positions.reserve(additional);
        if let Some(velocities) = self.velocities.as_mut() {
            velocities.reserve(additional);
        }
        self.atom_types.reserve(additional);
        self.atom_ids.reserve(additional);
        self.removed.reserve(additional);
    }

    /// Appends an atom keeping its id.  A missing velocity is stored as zero when this set
    /// tracks velocities, and a given velocity is dropped when it does not.
    pub fn push(&mut self, record: AtomRecord) -> usize {
        self.positions.push(record.position);
        if let Some(velocities) = self.velocities.as_mut() {
            velocities.push(record.velocity.unwrap_or(DVec3::ZERO));
        }
        self.atom_types.push(record.atom_type);
        self.atom_ids.push(record.id);
        self.removed.push(false);
        if let Some(next) = self.next_atom_id.as_mut() {
            *next = (*next).max(record.id + 1);
        }
        self.positions.len() - 1
    }

    /// Appends a new atom under a freshly allocated id and returns its index.
    pub fn add_atom(&mut self, atom_type: AtomType, position: DVec3, velocity: DVec3) -> usize {
        let id = self.next_atom_id();
        self.push(AtomRecord {
            atom_type,
            id,
            position,
            velocity: Some(velocity),
        })
    }

    /// Allocates an id larger than every id seen so far.  The maximum over the existing ids is
    /// computed once per atom set and cached.
    pub fn next_atom_id(&mut self) -> u64 {
        let ids = &self.atom_ids;
        let next = self
            .next_atom_id
            .get_or_insert_with(|| ids.iter().max().map_or(0, |&max| max + 1));
        let id = *next;
        *next += 1;
        id
    }

    /// Number of atom slots, including atoms flagged for removal but not yet compacted.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    pub fn velocities(&self) -> Option<&[DVec3]> {
        self.velocities.as_deref()
    }

    pub fn atom_types(&self) -> &[AtomType] {
        &self.atom_types
    }

    pub fn atom_ids(&self) -> &[u64] {
        &self.atom_ids
    }

    /// All fields of the atom at `index`.
    pub fn atom(&self, index: usize) -> Result<AtomRecord> {
        self.check_index(index)?;
        Ok(AtomRecord {
            atom_type: self.atom_types[index],
            id: self.atom_ids[index],
            position: self.positions[index],
            velocity: self.velocities.as_ref().map(|v| v[index]),
        })
    }

    /// Iterates over the atoms that are not flagged for removal, with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, AtomRecord)> + '_ {
        (0..self.len())
            .filter(move |&index| !self.removed[index])
            .map(move |index| {
                (
                    index,
                    AtomRecord {
                        atom_type: self.atom_types[index],
                        id: self.atom_ids[index],
                        position: self.positions[index],
                        velocity: self.velocities.as_ref().map(|v| v[index]),
                    },
                )
            })
    }

    pub fn simulation_box(&self) -> &SimulationBox {
        &self.simulation_box
    }

    /// Box lengths `(Lx, Ly, Lz)` in Ångström.
    pub fn lengths(&self) -> DVec3 {
        self.simulation_box.lengths()
    }

    pub fn volume(&self) -> f64 {
        self.simulation_box.volume()
    }

    /// Squared minimum-image distance between two atoms.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn squared_distance(&self, a: usize, b: usize) -> f64 {
        self.simulation_box
            .squared_distance(self.positions[a], self.positions[b])
    }

    /// Flags an atom for removal without moving any storage.
    pub fn remove(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.removed[index] = true;
        self.has_removed = true;
        Ok(())
    }

    /// Flags every listed atom for removal.  Nothing is flagged if any index is out of range.
    pub fn remove_batch(&mut self, indices: &[usize]) -> Result<()> {
        for &index in indices {
            self.check_index(index)?;
        }
        for &index in indices {
            self.removed[index] = true;
        }
        self.has_removed |= !indices.is_empty();
        Ok(())
    }

    /// Flags every atom whose type is listed, returning how many atoms were newly flagged.
    pub fn remove_types(&mut self, atom_types: &[AtomType]) -> usize {
        let mut count = 0;
        for (removed, atom_type) in self.removed.iter_mut().zip(&self.atom_types) {
            if !*removed && atom_types.contains(atom_type) {
                *removed = true;
                count += 1;
            }
        }
        self.has_removed |= count > 0;
        count
    }

    /// Clears the removal flag of the listed atoms.  Only meaningful before compaction.
    pub fn restore(&mut self, indices: &[usize]) -> Result<()> {
        for &index in indices {
            self.check_index(index)?;
        }
        for &index in indices {
            self.removed[index] = false;
        }
        self.has_removed = self.removed.iter().any(|&removed| removed);
        Ok(())
    }

    pub fn is_removed(&self, index: usize) -> bool {
        self.removed.get(index).copied().unwrap_or(false)
    }

    /// Whether any atom is flagged and waiting for [`Timestep::compact`].
    pub fn has_removed(&self) -> bool {
        self.has_removed
    }

    pub fn removed_count(&self) -> usize {
        self.removed.iter().filter(|&&removed| removed).count()
    }

    /// Number of atoms not flagged for removal.
    pub fn remaining_count(&self) -> usize {
        self.len() - self.removed_count()
    }

    /// Physically drops every flagged atom.
    ///
    /// Walks the atoms in ascending index order, copying each surviving atom into the next
    /// free slot, then truncates every array to the surviving count.  Relative order of the
    /// survivors is preserved.  Returns the number of atoms dropped; with nothing flagged this
    /// is a no-op.
    pub fn compact(&mut self) -> usize {
        if !self.has_removed {
            return 0;
        }

        let total = self.len();
        let mut remaining = 0;
        for n in 0..total {
            if self.removed[n] {
                continue;
            }
            if remaining != n {
                self.positions[remaining] = self.positions[n];
                if let Some(velocities) = self.velocities.as_mut() {
                    velocities[remaining] = velocities[n];
                }
                self.atom_types[remaining] = self.atom_types[n];
                self.atom_ids[remaining] = self.atom_ids[n];
                self.removed[remaining] = false;
            }
            remaining += 1;
        }

        self.positions.truncate(remaining);
        if let Some(velocities) = self.velocities.as_mut() {
            velocities.truncate(remaining);
        }
        self.atom_types.truncate(remaining);
        self.atom_ids.truncate(remaining);
        self.removed.truncate(remaining);
        self.has_removed = false;

        log::debug!("compacted timestep: dropped {} of {} atoms", total - remaining, total);
        total - remaining
    }

    /// Index of the first atom that lies outside `[0, L)` on some axis.
    pub fn first_atom_outside_box(&self) -> Option<usize> {
        self.positions
            .iter()
            .position(|&position| !self.simulation_box.contains(position))
    }

    /// Candidate neighbor pairs at cell granularity for a search radius, using the default
    /// boundary epsilon.  Atoms flagged for removal take no part in the search.
    pub fn neighbors(&self, radius: f64) -> Result<NeighborList> {
        self.neighbors_with(CellListParams::new(radius))
    }

    pub fn neighbors_with(&self, params: CellListParams) -> Result<NeighborList> {
        let cell_list = CellList::build_filtered(
            &self.positions,
            &self.simulation_box,
            params,
            |index| !self.removed[index],
        )?;
        Ok(cell_list.neighbor_list(self.len()))
    }

    /// Neighbor pairs whose minimum-image distance is at most `radius`.
    pub fn neighbors_within(&self, radius: f64) -> Result<NeighborList> {
        let mut neighbor_list = self.neighbors(radius)?;
        neighbor_list.retain_within(&self.positions, &self.simulation_box, radius);
        Ok(neighbor_list)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.len() {
            Ok(())
        } else {
            Err(TimestepError::IndexOutOfRange {
                index,
                len: self.len(),
            })
        }
    }
}

// End of File
