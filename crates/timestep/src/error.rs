// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use periodic_table::AtomType;
use thiserror::Error;

/// Errors raised by operations on an in-memory [`Timestep`](crate::Timestep).
#[derive(Debug, Error, PartialEq)]
pub enum TimestepError {
    /// An atom index past the end of the atom arrays.
    #[error("Atom index {index} out of range (total atoms: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Neighbor searches need a finite, strictly positive radius.
    #[error("Invalid neighbor radius {0}: must be finite and positive")]
    InvalidRadius(f64),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No mass is known for atom type {0}")]
    MissingMass(AtomType),

    /// The timestep was loaded without velocities.
    #[error("Timestep carries no velocities")]
    MissingVelocities,
}

pub type Result<T> = std::result::Result<T, TimestepError>;

// End of File
