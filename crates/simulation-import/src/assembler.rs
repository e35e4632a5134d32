// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

// Reassembly of a global atom set from the node files of one timestep, and the inverse
// re-sharding used when saving.

use crate::decomposition::{node_file_path, Decomposition};
use crate::error::{ImportError, Result};
use crate::mts0::{read_node_file, write_node_file, NodeFile, TypeAndId};
use crate::timer::Timer;
use glam::f64::DVec3;
use std::fs;
use std::path::Path;
use timestep::{AtomRecord, SimulationBox, Timestep};

/// Reads every node file of `directory` and stitches them into one [`Timestep`].
///
/// Each node's reduced coordinates are shifted by the node origin and scaled by the box
/// diagonal of node 0, which is taken as authoritative for the whole timestep.  Atoms keep
/// node-traversal order.  Any failing node aborts the load, and so does an atom landing
/// outside `[0, L)` afterwards, since that almost always means the decomposition does not
/// match the one the files were written with.
pub fn load_timestep(
    decomposition: &Decomposition,
    directory: &Path,
    with_velocities: bool,
) -> Result<Timestep> {
    let _timer = Timer::new(format!("assembling {}", directory.display()));

    let first = read_node_file(&node_file_path(directory, 0))?;
    let simulation_box = SimulationBox::from_h_matrix(first.h_matrix);
    let lengths = simulation_box.lengths();
    let diagonal = first.h_matrix.diagonal();

    let mut timestep = if with_velocities {
        Timestep::with_velocities(simulation_box)
    } else {
        Timestep::new(simulation_box)
    };

    append_node(&mut timestep, &first, decomposition.node_origin(0), lengths);
    for node_id in 1..decomposition.node_count() {
        let path = node_file_path(directory, node_id);
        let node = read_node_file(&path)?;
        if node.h_matrix.diagonal() != diagonal {
            log::warn!(
                "{}: box diagonal {} differs from node 0 ({}); using node 0",
                path.display(),
                node.h_matrix.diagonal(),
                diagonal
            );
        }
        append_node(&mut timestep, &node, decomposition.node_origin(node_id), lengths);
    }

    if let Some(index) = timestep.first_atom_outside_box() {
        let atom = timestep.atom(index)?;
        return Err(ImportError::configuration(format!(
            "atom {} at ({:.4}, {:.4}, {:.4}) is outside the system of size ({:.4}, {:.4}, {:.4}); \
             check nx, ny, nz",
            atom.id,
            atom.position.x,
            atom.position.y,
            atom.position.z,
            lengths.x,
            lengths.y,
            lengths.z
        )));
    }

    log::info!(
        "loaded {} atoms from {} node files in {}",
        timestep.len(),
        decomposition.node_count(),
        directory.display()
    );
    Ok(timestep)
}

fn append_node(timestep: &mut Timestep, node: &NodeFile, origin: DVec3, lengths: DVec3) {
    timestep.reserve(node.len());
    for ((atom, &local), &velocity) in node.atoms.iter().zip(&node.positions).zip(&node.velocities) {
        timestep.push(AtomRecord {
            atom_type: atom.atom_type,
            id: atom.id,
            position: (local + origin) * lengths,
            velocity: Some(velocity),
        });
    }
}

/// Writes a timestep back out as `decomposition.node_count()` node files in `directory`.
///
/// Pending removals are compacted first.  Every atom goes to the node containing it, with
/// its position converted back to node-local reduced units; nodes without atoms still get a
/// file carrying the box matrix.  Atoms without stored velocities are written at rest.
pub fn save_timestep(
    timestep: &mut Timestep,
    decomposition: &Decomposition,
    directory: &Path,
) -> Result<()> {
    let _timer = Timer::new(format!("saving {}", directory.display()));
    timestep.compact();

    let simulation_box = *timestep.simulation_box();
    let h_matrix = *simulation_box.h_matrix();
    let mut nodes = vec![NodeFile::new(h_matrix); decomposition.node_count()];

    for (_, atom) in timestep.iter() {
        let reduced = simulation_box.to_reduced(atom.position);
        let node_id = decomposition.node_of_reduced(reduced).ok_or_else(|| {
            ImportError::configuration(format!(
                "atom {} at ({:.4}, {:.4}, {:.4}) maps outside the {}x{}x{} node grid",
                atom.id,
                atom.position.x,
                atom.position.y,
                atom.position.z,
                decomposition.counts()[0],
                decomposition.counts()[1],
                decomposition.counts()[2]
            ))
        })?;
        nodes[node_id].push(
            TypeAndId::new(atom.atom_type, atom.id),
            reduced - decomposition.node_origin(node_id),
            atom.velocity.unwrap_or(DVec3::ZERO),
        );
    }

    fs::create_dir_all(directory).map_err(|e| ImportError::io(directory, e))?;
    for (node_id, node) in nodes.iter().enumerate() {
        write_node_file(&node_file_path(directory, node_id), node)?;
    }

    log::info!(
        "saved {} atoms to {} node files in {}",
        timestep.len(),
        nodes.len(),
        directory.display()
    );
    Ok(())
}

// End of File
