// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! # Import of domain-decomposed `mts0` snapshots
//!
//! A simulation writes each timestep as one binary file per node of an `nx × ny × nz`
//! decomposition.  This crate reads (and writes) those node files, reassembles them into a
//! global [`Timestep`](timestep::Timestep), and plays a sequence of timesteps back through a
//! [`Trajectory`] cursor.

mod assembler;
mod decomposition;
mod error;
pub mod mts0;
mod timer;
mod trajectory;
mod xyz;

pub use assembler::{load_timestep, save_timestep};
pub use decomposition::{node_file_path, Decomposition};
pub use error::{ImportError, Result};
pub use mts0::{read_node_file, write_node_file, NodeFile, TypeAndId};
pub use timer::Timer;
pub use trajectory::{
    Direction, Frame, Mts0Source, Playback, PlaybackMode, TimestepSource, Trajectory,
};
pub use xyz::save_xyz;

// End of File
