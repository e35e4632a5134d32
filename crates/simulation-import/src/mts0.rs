// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! Reading and writing single `mts0` node files.
//!
//! A node file holds the atoms of one spatial node of a domain decomposition as four
//! records: the atom count, the packed type/id doubles, the phase space (every position
//! followed by every velocity) and the 18-value h-matrix.  Positions are stored in
//! node-local reduced units; turning them into global Ångström coordinates is the job of
//! the [assembler](crate::load_timestep).

mod record;
mod type_id;

pub use type_id::{TypeAndId, ID_SCALE};

use crate::error::{ImportError, Result};
use glam::f64::DVec3;
use record::{write_record, RecordReader};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use timestep::HMatrix;

/// The decoded contents of one node file, as parallel arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeFile {
    pub atoms: Vec<TypeAndId>,
    /// Node-local reduced coordinates.
    pub positions: Vec<DVec3>,
    pub velocities: Vec<DVec3>,
    pub h_matrix: HMatrix,
}

impl NodeFile {
    pub fn new(h_matrix: HMatrix) -> Self {
        Self {
            atoms: Vec::new(),
            positions: Vec::new(),
            velocities: Vec::new(),
            h_matrix,
        }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn push(&mut self, atom: TypeAndId, position: DVec3, velocity: DVec3) {
        self.atoms.push(atom);
        self.positions.push(position);
        self.velocities.push(velocity);
    }
}

/// Reads and decodes one node file.
pub fn read_node_file(path: &Path) -> Result<NodeFile> {
    let bytes = fs::read(path).map_err(|e| ImportError::io(path, e))?;
    let mut reader = RecordReader::new(path, &bytes);

    let count = reader.read_i32()?;
    let count = usize::try_from(count)
        .map_err(|_| ImportError::format(path, format!("negative atom count {}", count)))?;

    let packed = reader.read_f64s(count)?;
    let phase_space = reader.read_f64s(6 * count)?;
    let h_flat = reader.read_f64s(HMatrix::LEN)?;

    if reader.remaining() > 0 {
        log::warn!(
            "{}: ignoring {} bytes after the last record",
            path.display(),
            reader.remaining()
        );
    }

    let atoms = packed
        .iter()
        .enumerate()
        .map(|(index, &encoded)| {
            TypeAndId::decode(encoded).ok_or_else(|| {
                ImportError::format(
                    path,
                    format!("atom {} has invalid packed type/id {}", index, encoded),
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let (positions, velocities) = phase_space.split_at(3 * count);
    let positions = positions.chunks_exact(3).map(DVec3::from_slice).collect();
    let velocities = velocities.chunks_exact(3).map(DVec3::from_slice).collect();

    let mut h = [0.0; HMatrix::LEN];
    h.copy_from_slice(&h_flat);

    log::debug!("read {} atoms from {}", count, path.display());

    Ok(NodeFile {
        atoms,
        positions,
        velocities,
        h_matrix: HMatrix::from_flat(&h),
    })
}

/// Writes one node file in the layout [`read_node_file`] expects.
pub fn write_node_file(path: &Path, node: &NodeFile) -> Result<()> {
    let count = i32::try_from(node.len()).map_err(|_| {
        ImportError::configuration(format!(
            "{} atoms do not fit in one node file",
            node.len()
        ))
    })?;
    if node.positions.len() != node.len() || node.velocities.len() != node.len() {
        return Err(ImportError::configuration(format!(
            "node file {} has {} atoms but {} positions and {} velocities",
            path.display(),
            node.len(),
            node.positions.len(),
            node.velocities.len()
        )));
    }

    let packed: Vec<f64> = node.atoms.iter().map(|atom| atom.encode()).collect();
    let mut phase_space = Vec::with_capacity(6 * node.len());
    for position in &node.positions {
        phase_space.extend_from_slice(&position.to_array());
    }
    for velocity in &node.velocities {
        phase_space.extend_from_slice(&velocity.to_array());
    }
    let h_flat = node.h_matrix.to_flat();

    let file = File::create(path).map_err(|e| ImportError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_record(&mut writer, bytemuck::bytes_of(&count))
        .and_then(|_| write_record(&mut writer, bytemuck::cast_slice(&packed)))
        .and_then(|_| write_record(&mut writer, bytemuck::cast_slice(&phase_space)))
        .and_then(|_| write_record(&mut writer, bytemuck::cast_slice(&h_flat)))
        .and_then(|_| writer.flush())
        .map_err(|e| ImportError::io(path, e))?;

    log::debug!("wrote {} atoms to {}", node.len(), path.display());
    Ok(())
}

// End of File
