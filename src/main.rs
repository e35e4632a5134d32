// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

mod cli;
mod commands;

use anyhow::Result;
use app_config::Settings;
use clap::Parser;
use cli::{Cli, Command};
use logging::prelude::*;

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(&cli.config)?;

    match cli.command {
        Command::Info { timestep } => commands::info(&settings, timestep),
        Command::Play {
            frames,
            backward,
            camera,
            skip_errors,
        } => commands::play(&settings, frames, backward, camera.as_deref(), skip_errors),
        Command::Neighbors { timestep, radius } => commands::neighbors(&settings, timestep, radius),
        Command::ExportXyz { timestep, output } => {
            commands::export_xyz(&settings, timestep, &output)
        }
        Command::Repartition {
            timestep,
            nx,
            ny,
            nz,
            output,
        } => commands::repartition(&settings, timestep, [nx, ny, nz], &output),
    }
}

fn main() {
    let cli = Cli::parse();

    let mut logging = Logging::new(vec!["mdview", "simulation_import", "timestep", "app_config"]);
    match cli.verbose {
        0 => {}
        1 => logging = logging.with_level(log::LevelFilter::Debug),
        _ => logging = logging.with_level(log::LevelFilter::Trace),
    }
    logging.init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        for cause in err.chain().skip(1) {
            eprintln!("because: {}", cause);
        }
        std::process::exit(1);
    }
}

// End of File
