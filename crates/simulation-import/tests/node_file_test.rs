// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

// Tests for reading and writing single node files.

use glam::f64::DVec3;
use periodic_table::AtomType;
use simulation_import::{read_node_file, write_node_file, ImportError, NodeFile, TypeAndId};
use std::fs;
use tempfile::tempdir;
use timestep::HMatrix;

fn push_record(bytes: &mut Vec<u8>, payload: &[u8]) {
    let len = payload.len() as i32;
    bytes.extend_from_slice(&len.to_ne_bytes());
    bytes.extend_from_slice(payload);
    bytes.extend_from_slice(&len.to_ne_bytes());
}

/// A node file assembled by hand, one record at a time.
fn raw_node_file(count: i32, packed: &[f64], phase_space: &[f64], h: &[f64]) -> Vec<u8> {
    let mut bytes = Vec::new();
    push_record(&mut bytes, &count.to_ne_bytes());
    push_record(&mut bytes, bytemuck::cast_slice(packed));
    push_record(&mut bytes, bytemuck::cast_slice(phase_space));
    push_record(&mut bytes, bytemuck::cast_slice(h));
    bytes
}

fn box_h() -> [f64; 18] {
    HMatrix::diagonal_bohr(DVec3::splat(20.0)).to_flat()
}

// ============================================================================
// Reading
// ============================================================================

#[test]
fn reads_hand_written_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mt0000");
    let phase_space = [
        0.1, 0.2, 0.3, // position 0
        0.4, 0.5, 0.6, // position 1
        1.0, 2.0, 3.0, // velocity 0
        -1.0, -2.0, -3.0, // velocity 1
    ];
    let bytes = raw_node_file(2, &[5.00000000123, 1.0], &phase_space, &box_h());
    fs::write(&path, bytes).unwrap();

    let node = read_node_file(&path).unwrap();
    assert_eq!(node.len(), 2);
    assert_eq!(node.atoms[0], TypeAndId::new(AtomType::Sodium, 123));
    assert_eq!(node.atoms[1], TypeAndId::new(AtomType::Silicon, 0));
    assert_eq!(node.positions[1], DVec3::new(0.4, 0.5, 0.6));
    assert_eq!(node.velocities[0], DVec3::new(1.0, 2.0, 3.0));
    assert_eq!(node.velocities[1], DVec3::new(-1.0, -2.0, -3.0));
    assert_eq!(node.h_matrix.diagonal(), DVec3::splat(20.0));
}

#[test]
fn empty_node_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mt0003");
    fs::write(&path, raw_node_file(0, &[], &[], &box_h())).unwrap();

    let node = read_node_file(&path).unwrap();
    assert!(node.is_empty());
    assert_eq!(node.h_matrix.diagonal(), DVec3::splat(20.0));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mt0000");
    match read_node_file(&path) {
        Err(ImportError::Io { path: error_path, .. }) => assert_eq!(error_path, path),
        other => panic!("expected an I/O error, got {:?}", other),
    }
}

#[test]
fn corrupt_trailing_marker_is_format_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mt0000");
    let mut bytes = raw_node_file(1, &[3.0], &[0.0; 6], &box_h());
    // Trailing marker of the count record.
    bytes[8..12].copy_from_slice(&5i32.to_ne_bytes());
    fs::write(&path, bytes).unwrap();

    assert!(matches!(
        read_node_file(&path),
        Err(ImportError::Format { .. })
    ));
}

#[test]
fn truncated_file_is_format_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mt0000");
    let mut bytes = raw_node_file(1, &[3.0], &[0.0; 6], &box_h());
    bytes.truncate(bytes.len() - 20);
    fs::write(&path, bytes).unwrap();

    assert!(matches!(
        read_node_file(&path),
        Err(ImportError::Format { .. })
    ));
}

#[test]
fn count_must_match_record_sizes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mt0000");
    fs::write(&path, raw_node_file(2, &[3.0], &[0.0; 6], &box_h())).unwrap();
    assert!(matches!(
        read_node_file(&path),
        Err(ImportError::Format { .. })
    ));

    fs::write(&path, raw_node_file(-1, &[], &[], &box_h())).unwrap();
    assert!(matches!(
        read_node_file(&path),
        Err(ImportError::Format { .. })
    ));
}

#[test]
fn unknown_atom_type_is_format_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mt0000");
    fs::write(&path, raw_node_file(1, &[8.0], &[0.0; 6], &box_h())).unwrap();
    match read_node_file(&path) {
        Err(ImportError::Format { message, .. }) => assert!(message.contains("atom 0")),
        other => panic!("expected a format error, got {:?}", other),
    }
}

// ============================================================================
// Writing
// ============================================================================

#[test]
fn written_file_reads_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mt0001");
    let mut node = NodeFile::new(HMatrix::diagonal_bohr(DVec3::new(10.0, 20.0, 30.0)));
    node.push(
        TypeAndId::new(AtomType::Oxygen, 98_765_432_100),
        DVec3::new(0.25, 0.5, 0.125),
        DVec3::new(0.01, -0.02, 0.03),
    );
    node.push(
        TypeAndId::new(AtomType::X, 7),
        DVec3::new(0.0, 0.999, 0.5),
        DVec3::ZERO,
    );
    write_node_file(&path, &node).unwrap();

    assert_eq!(read_node_file(&path).unwrap(), node);
}

#[test]
fn written_layout_matches_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mt0000");
    let mut node = NodeFile::new(HMatrix::diagonal_bohr(DVec3::ONE));
    node.push(TypeAndId::new(AtomType::Hydrogen, 0), DVec3::ZERO, DVec3::ZERO);
    write_node_file(&path, &node).unwrap();

    // 4 records, each framed by two markers: 4 + 8 + 48 + 144 payload bytes.
    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 4 * 8 + 4 + 8 + 48 + 144);
    assert_eq!(&bytes[0..4], &4i32.to_ne_bytes());
    assert_eq!(&bytes[4..8], &1i32.to_ne_bytes());
}

#[test]
fn write_to_missing_directory_is_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("mt0000");
    let node = NodeFile::new(HMatrix::default());
    assert!(matches!(
        write_node_file(&path, &node),
        Err(ImportError::Io { .. })
    ));
}

// End of File
