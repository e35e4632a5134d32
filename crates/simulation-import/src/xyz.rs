// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use crate::error::{ImportError, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use timestep::Timestep;

/// Saves the atoms of a timestep that are not flagged for removal as an XYZ file.
///
/// The comment line carries the box lengths so the periodic cell is not lost.
pub fn save_xyz(timestep: &Timestep, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| ImportError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_xyz(timestep, &mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| ImportError::io(path, e))?;
    log::info!(
        "exported {} atoms to {}",
        timestep.remaining_count(),
        path.display()
    );
    Ok(())
}

fn write_xyz<W: Write>(timestep: &Timestep, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{}", timestep.remaining_count())?;

    let lengths = timestep.lengths();
    writeln!(
        writer,
        "box {:.6} {:.6} {:.6}",
        lengths.x, lengths.y, lengths.z
    )?;

    for (_, atom) in timestep.iter() {
        writeln!(
            writer,
            "{} {:.6} {:.6} {:.6}",
            atom.atom_type.symbol(),
            atom.position.x,
            atom.position.y,
            atom.position.z
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::f64::DVec3;
    use timestep::{AtomRecord, AtomType, SimulationBox};

    #[test]
    fn writes_header_and_rows() {
        let mut timestep = Timestep::new(SimulationBox::from_lengths(DVec3::new(1.0, 2.0, 3.0)));
        timestep.push(AtomRecord {
            atom_type: AtomType::Oxygen,
            id: 0,
            position: DVec3::new(0.5, 0.25, 0.125),
            velocity: None,
        });
        timestep.push(AtomRecord {
            atom_type: AtomType::Silicon,
            id: 1,
            position: DVec3::ZERO,
            velocity: None,
        });
        timestep.remove(1).unwrap();

        let mut buffer = Vec::new();
        write_xyz(&timestep, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "1\nbox 1.000000 2.000000 3.000000\nO 0.500000 0.250000 0.125000\n"
        );
    }
}

// End of File
