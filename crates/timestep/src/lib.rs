// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! # In-memory atom set of one simulation step
//!
//! A [`Timestep`] holds the global atom arrays reassembled from a domain-decomposed snapshot,
//! together with the periodic [`SimulationBox`] they live in.  On top of it this crate offers
//! logical removal with stable compaction, a periodic cell-list neighbor search, and a few
//! analysis helpers.  Renderers and analysis code only ever read through these accessors.

mod analysis;
mod cell_list;
mod error;
mod simulation_box;
mod timestep;
pub mod visibility;

pub use analysis::{AtomTypeMasses, TypeCounts};
pub use cell_list::{
    CellList, CellListParams, NeighborList, DEFAULT_BOUNDARY_EPSILON, MAX_CELLS_PER_AXIS,
    MIN_CELL_BUDGET,
};
pub use error::{Result, TimestepError};
pub use simulation_box::{HMatrix, SimulationBox, BOHR_TO_ANGSTROM};
pub use timestep::{AtomRecord, Timestep};

pub use periodic_table::AtomType;

// End of File
