// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use crate::error::{ImportError, Result};
use glam::f64::DVec3;
use std::path::{Path, PathBuf};

/// An `nx × ny × nz` spatial decomposition of the simulation box.
///
/// Nodes are numbered linearly with z varying fastest: node `id` sits at grid coordinates
/// `(id / (ny*nz), (id / nz) % ny, id % nz)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decomposition {
    nx: usize,
    ny: usize,
    nz: usize,
}

impl Decomposition {
    pub fn new(nx: usize, ny: usize, nz: usize) -> Result<Self> {
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(ImportError::configuration(format!(
                "decomposition {}x{}x{} has an empty axis",
                nx, ny, nz
            )));
        }
        Ok(Self { nx, ny, nz })
    }

    pub fn counts(&self) -> [usize; 3] {
        [self.nx, self.ny, self.nz]
    }

    pub fn node_count(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    pub fn node_coords(&self, node_id: usize) -> [usize; 3] {
        [
            node_id / (self.ny * self.nz),
            (node_id / self.nz) % self.ny,
            node_id % self.nz,
        ]
    }

    pub fn node_id(&self, coords: [usize; 3]) -> usize {
        (coords[0] * self.ny + coords[1]) * self.nz + coords[2]
    }

    /// Offset of a node's local frame, in reduced (box-fraction) units.
    pub fn node_origin(&self, node_id: usize) -> DVec3 {
        let coords = self.node_coords(node_id);
        DVec3::new(
            coords[0] as f64 / self.nx as f64,
            coords[1] as f64 / self.ny as f64,
            coords[2] as f64 / self.nz as f64,
        )
    }

    /// Node owning a reduced position, or `None` when the position falls outside the grid.
    pub fn node_of_reduced(&self, reduced: DVec3) -> Option<usize> {
        let mut coords = [0usize; 3];
        for (axis, (coord, count)) in coords.iter_mut().zip(self.counts()).enumerate() {
            let scaled = (reduced[axis] * count as f64).floor();
            if !(0.0..count as f64).contains(&scaled) {
                return None;
            }
            *coord = scaled as usize;
        }
        Some(self.node_id(coords))
    }
}

/// `{directory}/mt{node_id:04}`.
pub fn node_file_path(directory: &Path, node_id: usize) -> PathBuf {
    directory.join(format!("mt{:04}", node_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_ids_round_trip_through_coords() {
        let decomposition = Decomposition::new(2, 3, 4).unwrap();
        assert_eq!(decomposition.node_count(), 24);
        for node_id in 0..decomposition.node_count() {
            let coords = decomposition.node_coords(node_id);
            assert_eq!(decomposition.node_id(coords), node_id);
        }
        assert_eq!(decomposition.node_coords(23), [1, 2, 3]);
        assert_eq!(decomposition.node_coords(5), [0, 1, 1]);
    }

    #[test]
    fn node_origin_is_fractional() {
        let decomposition = Decomposition::new(2, 2, 4).unwrap();
        let origin = decomposition.node_origin(decomposition.node_id([1, 0, 3]));
        assert_eq!(origin, DVec3::new(0.5, 0.0, 0.75));
    }

    #[test]
    fn reduced_position_outside_grid() {
        let decomposition = Decomposition::new(2, 2, 2).unwrap();
        assert_eq!(decomposition.node_of_reduced(DVec3::splat(0.99)), Some(7));
        assert_eq!(decomposition.node_of_reduced(DVec3::new(1.0, 0.2, 0.2)), None);
        assert_eq!(decomposition.node_of_reduced(DVec3::new(-0.01, 0.2, 0.2)), None);
    }

    #[test]
    fn empty_axis_is_rejected() {
        assert!(matches!(
            Decomposition::new(1, 0, 1),
            Err(ImportError::Configuration { .. })
        ));
    }

    #[test]
    fn file_names_are_zero_padded() {
        let path = node_file_path(Path::new("run/000100/mts0"), 7);
        assert_eq!(path, Path::new("run/000100/mts0/mt0007"));
    }
}

// End of File
