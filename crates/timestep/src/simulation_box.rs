// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! Periodic simulation cell.
//!
//! The producing simulation code describes its cell with an "h-matrix" in atomic units (Bohr),
//! stored for two time slices.  Only the diagonal of the first slice is meaningful to us: it
//! gives the orthorhombic box lengths.

use glam::f64::DVec3;

/// Converts the atomic length unit used on disk to Ångström.
pub const BOHR_TO_ANGSTROM: f64 = 0.5291772;

/// The 2×3×3 cell matrix exactly as stored in a node file, indexed `[slice][row][column]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HMatrix(pub [[[f64; 3]; 3]; 2]);

impl HMatrix {
    /// Number of scalars in the on-disk representation.
    pub const LEN: usize = 18;

    /// An orthorhombic cell with the given diagonal (in Bohr) in both slices.
    pub fn diagonal_bohr(lengths: DVec3) -> Self {
        let mut h = [[[0.0; 3]; 3]; 2];
        for slice in &mut h {
            for (axis, length) in lengths.to_array().into_iter().enumerate() {
                slice[axis][axis] = length;
            }
        }
        Self(h)
    }

    /// Reads the flat on-disk block.  The producer writes each slice column by column, so the
    /// flat index of `[slice][row][column]` is `slice*9 + column*3 + row`.
    pub fn from_flat(values: &[f64; Self::LEN]) -> Self {
        let mut h = [[[0.0; 3]; 3]; 2];
        let mut count = 0;
        for slice in &mut h {
            for column in 0..3 {
                for row in slice.iter_mut() {
                    row[column] = values[count];
                    count += 1;
                }
            }
        }
        Self(h)
    }

    /// Inverse of [`HMatrix::from_flat`].
    pub fn to_flat(&self) -> [f64; Self::LEN] {
        let mut values = [0.0; Self::LEN];
        let mut count = 0;
        for slice in &self.0 {
            for column in 0..3 {
                for row in slice {
                    values[count] = row[column];
                    count += 1;
                }
            }
        }
        values
    }

    /// Diagonal of the current slice, in Bohr.
    pub fn diagonal(&self) -> DVec3 {
        let h = &self.0[0];
        DVec3::new(h[0][0], h[1][1], h[2][2])
    }
}

/// An orthorhombic, fully periodic simulation box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationBox {
    h_matrix: HMatrix,
    lengths: DVec3,
}

impl SimulationBox {
    pub fn from_h_matrix(h_matrix: HMatrix) -> Self {
        Self {
            h_matrix,
            lengths: h_matrix.diagonal() * BOHR_TO_ANGSTROM,
        }
    }

    /// Builds a box from lengths in Ångström, synthesizing the matching h-matrix.
    pub fn from_lengths(lengths: DVec3) -> Self {
        Self {
            h_matrix: HMatrix::diagonal_bohr(lengths / BOHR_TO_ANGSTROM),
            lengths,
        }
    }

    pub fn h_matrix(&self) -> &HMatrix {
        &self.h_matrix
    }

    /// Box lengths `(Lx, Ly, Lz)` in Ångström.
    pub fn lengths(&self) -> DVec3 {
        self.lengths
    }

    pub fn volume(&self) -> f64 {
        self.lengths.x * self.lengths.y * self.lengths.z
    }

    /// True when `0 <= position[i] < length[i]` on every axis.
    pub fn contains(&self, position: DVec3) -> bool {
        position.cmpge(DVec3::ZERO).all() && position.cmplt(self.lengths).all()
    }

    /// Position expressed as a fraction of the box lengths.
    pub fn to_reduced(&self, position: DVec3) -> DVec3 {
        position / self.lengths
    }

    /// Applies the minimum-image convention to a separation vector, independently per axis:
    /// a component larger than half the box is shifted by one box length.
    pub fn minimum_image(&self, mut delta: DVec3) -> DVec3 {
        for axis in 0..3 {
            let length = self.lengths[axis];
            if delta[axis] > 0.5 * length {
                delta[axis] -= length;
            }
            if delta[axis] < -0.5 * length {
                delta[axis] += length;
            }
        }
        delta
    }

    /// Squared minimum-image distance between two points.
    pub fn squared_distance(&self, a: DVec3, b: DVec3) -> f64 {
        self.minimum_image(a - b).length_squared()
    }
}


// End of File
