// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use anyhow::{anyhow, Context, Result};
use colored::*;
use rand::seq::SliceRandom;
use simulation_import::{load_timestep, Decomposition};
use std::env;
use std::path::Path;
use std::time::Instant;

const USAGE: &str =
    "Usage: mts0_benchmark(.exe) <mts0_directory> <nx> <ny> <nz> [--atoms=atom1,atom2,...] [--radius=r]";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 4 {
        eprintln!("{}", USAGE);
        std::process::exit(1);
    }

    let directory = Path::new(&args[0]);
    let counts = args[1..4]
        .iter()
        .map(|arg| arg.parse::<usize>().with_context(|| format!("invalid node count {:?}", arg)))
        .collect::<Result<Vec<_>>>()?;
    let decomposition = Decomposition::new(counts[0], counts[1], counts[2])?;

    // Fetch optional atom and radius arguments
    let atoms_arg = args.iter().find(|arg| arg.starts_with("--atoms="));
    let radius = args
        .iter()
        .find_map(|arg| arg.strip_prefix("--radius="))
        .map(|value| {
            value
                .parse::<f64>()
                .map_err(|_| anyhow!("invalid radius {:?}", value))
        })
        .transpose()?
        .unwrap_or(3.0);

    println!("{}", format!("Loading: {}...", directory.display()).green());
    println!();

    let start_load = Instant::now();
    let timestep = load_timestep(&decomposition, directory, true)?;
    let duration_load = start_load.elapsed();

    let start_neighbors = Instant::now();
    let neighbor_list = timestep.neighbors(radius)?;
    let duration_neighbors = start_neighbors.elapsed();

    println!(
        "{}",
        format!(
            "Assembled {} atoms from {} node files in: {:?}",
            timestep.len(),
            decomposition.node_count(),
            duration_load
        )
        .yellow()
    );
    println!(
        "{}",
        format!(
            "Built cell list (r = {}, {} candidate pairs) in: {:?}",
            radius,
            neighbor_list.pair_count(),
            duration_neighbors
        )
        .yellow()
    );

    let lengths = timestep.lengths();
    println!();
    println!("Box {:.3} x {:.3} x {:.3} Å", lengths.x, lengths.y, lengths.z);

    let predefined_atoms: Vec<usize> = atoms_arg
        .map(|atoms| {
            atoms[8..]
                .split(',')
                .filter_map(|s| s.parse().ok())
                .collect()
        })
        .unwrap_or_else(|| generate_random_indices(5, 0, timestep.len()));

    for &index in &predefined_atoms {
        match timestep.atom(index) {
            Ok(atom) => println!(
                " - atom {} (id {}): {} {:.3} {:.3} {:.3}, {} neighbor candidates",
                index,
                atom.id,
                atom.atom_type,
                atom.position.x,
                atom.position.y,
                atom.position.z,
                neighbor_list[index].len()
            ),
            Err(e) => println!("{}", format!(" - atom {}: {}", index, e).red()),
        }
    }

    Ok(())
}

fn generate_random_indices(n: usize, min: usize, max: usize) -> Vec<usize> {
    let range: Vec<_> = (min..max).collect();
    let mut rng = rand::thread_rng();
    range.choose_multiple(&mut rng, n).cloned().collect()
}

// End of File
