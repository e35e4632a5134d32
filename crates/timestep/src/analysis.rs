// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use crate::error::{Result, TimestepError};
use crate::timestep::Timestep;
use glam::f64::DVec3;
use periodic_table::AtomType;

/// Per-type masses in atomic mass units.  Defaults to the standard masses, which leaves the
/// placeholder types `A` and `X` without a mass until one is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomTypeMasses {
    masses: [Option<f64>; AtomType::ALL.len()],
}

impl AtomTypeMasses {
    pub fn standard() -> Self {
        let mut masses = [None; AtomType::ALL.len()];
        for atom_type in AtomType::ALL {
            masses[atom_type.index()] = atom_type.standard_mass();
        }
        Self { masses }
    }

    /// A table with no masses at all.
    pub fn empty() -> Self {
        Self {
            masses: [None; AtomType::ALL.len()],
        }
    }

    pub fn set(&mut self, atom_type: AtomType, mass: f64) {
        self.masses[atom_type.index()] = Some(mass);
    }

    pub fn get(&self, atom_type: AtomType) -> Option<f64> {
        self.masses[atom_type.index()]
    }
}

impl Default for AtomTypeMasses {
    fn default() -> Self {
        Self::standard()
    }
}

/// Number of atoms of every type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeCounts([usize; AtomType::ALL.len()]);

impl TypeCounts {
    pub fn get(&self, atom_type: AtomType) -> usize {
        self.0[atom_type.index()]
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Types with at least one atom, in file-code order.
    pub fn iter(&self) -> impl Iterator<Item = (AtomType, usize)> + '_ {
        AtomType::ALL
            .into_iter()
            .map(|atom_type| (atom_type, self.get(atom_type)))
            .filter(|&(_, count)| count > 0)
    }
}

impl Timestep {
    /// Counts the atoms of each type, ignoring atoms flagged for removal.
    pub fn count_by_type(&self) -> TypeCounts {
        let mut counts = TypeCounts::default();
        for (_, atom) in self.iter() {
            counts.0[atom.atom_type.index()] += 1;
        }
        counts
    }

    pub fn mass_of_atom(&self, index: usize, masses: &AtomTypeMasses) -> Result<f64> {
        let atom_type = self.atom(index)?.atom_type;
        masses
            .get(atom_type)
            .ok_or(TimestepError::MissingMass(atom_type))
    }

    pub fn momentum_of_atom(&self, index: usize, masses: &AtomTypeMasses) -> Result<DVec3> {
        let atom = self.atom(index)?;
        let velocity = atom.velocity.ok_or(TimestepError::MissingVelocities)?;
        let mass = masses
            .get(atom.atom_type)
            .ok_or(TimestepError::MissingMass(atom.atom_type))?;
        Ok(mass * velocity)
    }

    /// Total momentum of a group of atoms.
    pub fn momentum_of_atoms(&self, indices: &[usize], masses: &AtomTypeMasses) -> Result<DVec3> {
        indices.iter().try_fold(DVec3::ZERO, |total, &index| -> Result<DVec3> {
            Ok(total + self.momentum_of_atom(index, masses)?)
        })
    }

    /// Smallest minimum-image distance between an atom of type `first` and one of type
    /// `second`, considering only pairs no farther apart than `max_distance`.  Returns `None`
    /// when no such pair exists.
    pub fn min_distance_between_types(
        &self,
        first: AtomType,
        second: AtomType,
        max_distance: f64,
    ) -> Result<Option<f64>> {
        let neighbor_list = self.neighbors(max_distance)?;
        let max_distance_sq = max_distance * max_distance;
        let types = self.atom_types();

        let mut min_distance_sq: Option<f64> = None;
        for (i, neighbors) in neighbor_list.iter() {
            if types[i] != first {
                continue;
            }
            for &j in neighbors {
                if types[j] != second {
                    continue;
                }
                let distance_sq = self.squared_distance(i, j);
                if distance_sq <= max_distance_sq
                    && min_distance_sq.map_or(true, |min| distance_sq < min)
                {
                    min_distance_sq = Some(distance_sq);
                }
            }
        }

        Ok(min_distance_sq.map(f64::sqrt))
    }
}

// End of File
