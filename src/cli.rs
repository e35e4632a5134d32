// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "mdview",
    version,
    about = "Inspect and replay domain-decomposed mts0 trajectories"
)]
pub struct Cli {
    /// YAML run configuration.
    #[arg(short, long, default_value = "mdview.yaml")]
    pub config: PathBuf,

    /// Log more; repeat for trace output.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Atom count, box and per-type statistics of one timestep.
    Info {
        #[arg(short, long, default_value_t = 0)]
        timestep: usize,
    },

    /// Step through the trajectory the way a viewer would, one timestep per frame.
    Play {
        /// Number of time indices to visit, skipped ones included; defaults to one full pass.
        #[arg(short, long)]
        frames: Option<usize>,

        #[arg(long, default_value_t = false)]
        backward: bool,

        /// Camera position as x,y,z in Ångström; defaults to the box center.
        #[arg(long, value_delimiter = ',', num_args = 3)]
        camera: Option<Vec<f64>>,

        /// Report broken timesteps and keep playing instead of stopping.
        #[arg(long, default_value_t = false)]
        skip_errors: bool,
    },

    /// Neighbor statistics and closest approach between atom types.
    Neighbors {
        #[arg(short, long, default_value_t = 0)]
        timestep: usize,

        /// Search radius in Ångström; overrides the configured one.
        #[arg(short, long)]
        radius: Option<f64>,
    },

    /// Write one timestep as an XYZ file.
    ExportXyz {
        #[arg(short, long, default_value_t = 0)]
        timestep: usize,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Re-shard one timestep into node files for a different decomposition.
    Repartition {
        #[arg(short, long, default_value_t = 0)]
        timestep: usize,

        #[arg(long)]
        nx: usize,

        #[arg(long)]
        ny: usize,

        #[arg(long)]
        nz: usize,

        /// Directory receiving the `mtNNNN` files.
        #[arg(short, long)]
        output: PathBuf,
    },
}

// End of File
