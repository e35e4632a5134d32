// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

// Tests for trajectory playback in both modes.

use glam::f64::DVec3;
use periodic_table::AtomType;
use simulation_import::{
    save_timestep, Decomposition, Direction, Frame, ImportError, Mts0Source, Playback,
    PlaybackMode, TimestepSource, Trajectory,
};
use std::collections::HashSet;
use tempfile::tempdir;
use timestep::{AtomRecord, SimulationBox, Timestep, TimestepError};

/// Builds a one-atom timestep whose atom id is the time index.
#[derive(Default)]
struct CountingSource {
    loads: Vec<usize>,
    failing: HashSet<usize>,
}

impl TimestepSource for CountingSource {
    fn load(&mut self, index: usize) -> simulation_import::Result<Timestep> {
        self.loads.push(index);
        if self.failing.contains(&index) {
            return Err(ImportError::Configuration {
                message: format!("timestep {} is broken", index),
            });
        }
        let mut timestep = Timestep::new(SimulationBox::from_lengths(DVec3::splat(10.0)));
        timestep.push(AtomRecord {
            atom_type: AtomType::Silicon,
            id: index as u64,
            position: DVec3::splat(1.0),
            velocity: None,
        });
        Ok(timestep)
    }
}

fn shown_index(timestep: &Timestep) -> u64 {
    timestep.atom_ids()[0]
}

// ============================================================================
// Cursor movement
// ============================================================================

#[test]
fn forward_wraps_around() {
    for mode in [PlaybackMode::Preload, PlaybackMode::Streaming] {
        let mut trajectory = Trajectory::new(CountingSource::default(), 3, mode).unwrap();
        let mut seen = Vec::new();
        for _ in 0..4 {
            let timestep = trajectory.advance(Direction::Forward).unwrap();
            seen.push(shown_index(timestep));
        }
        assert_eq!(seen, vec![1, 2, 3, 0], "{:?}", mode);
        assert_eq!(trajectory.current_index(), 0);
    }
}

#[test]
fn backward_from_zero_wraps_to_last() {
    for mode in [PlaybackMode::Preload, PlaybackMode::Streaming] {
        let mut trajectory = Trajectory::new(CountingSource::default(), 3, mode).unwrap();
        let timestep = trajectory.advance(Direction::Backward).unwrap();
        assert_eq!(shown_index(timestep), 3);
        assert_eq!(trajectory.current_index(), 3);
        trajectory.advance(Direction::Backward).unwrap();
        assert_eq!(trajectory.current_index(), 2);
    }
}

#[test]
fn direction_from_sign() {
    assert_eq!(Direction::try_from(1), Ok(Direction::Forward));
    assert_eq!(Direction::try_from(-1), Ok(Direction::Backward));
    assert_eq!(Direction::try_from(0), Err(0));
}

#[test]
fn single_timestep_trajectory() {
    let mut trajectory =
        Trajectory::new(CountingSource::default(), 0, PlaybackMode::Streaming).unwrap();
    assert_eq!(trajectory.len(), 1);
    trajectory.advance(Direction::Forward).unwrap();
    trajectory.advance(Direction::Backward).unwrap();
    assert_eq!(trajectory.current_index(), 0);
}

#[test]
fn seek_checks_range() {
    let mut trajectory =
        Trajectory::new(CountingSource::default(), 5, PlaybackMode::Streaming).unwrap();
    assert_eq!(shown_index(trajectory.seek(4).unwrap()), 4);
    assert!(matches!(
        trajectory.seek(6),
        Err(ImportError::Timestep(TimestepError::IndexOutOfRange { index: 6, len: 6 }))
    ));
    assert_eq!(trajectory.current_index(), 4);
}

// ============================================================================
// Loading behavior per mode
// ============================================================================

#[test]
fn preload_loads_everything_once() {
    let mut trajectory =
        Trajectory::new(CountingSource::default(), 3, PlaybackMode::Preload).unwrap();
    for _ in 0..10 {
        trajectory.advance(Direction::Forward).unwrap();
    }
    assert_eq!(trajectory.mode(), PlaybackMode::Preload);
    assert_eq!(trajectory.source().loads, vec![0, 1, 2, 3]);
}

#[test]
fn streaming_loads_on_every_move() {
    let mut trajectory =
        Trajectory::new(CountingSource::default(), 3, PlaybackMode::Streaming).unwrap();
    trajectory.advance(Direction::Forward).unwrap();
    trajectory.advance(Direction::Forward).unwrap();
    trajectory.advance(Direction::Backward).unwrap();
    assert_eq!(trajectory.mode(), PlaybackMode::Streaming);
    assert_eq!(trajectory.source().loads, vec![0, 1, 2, 1]);
}

#[test]
fn preload_fails_on_any_bad_timestep() {
    let source = CountingSource {
        failing: HashSet::from([2]),
        ..Default::default()
    };
    assert!(Trajectory::new(source, 3, PlaybackMode::Preload).is_err());
}

#[test]
fn streaming_error_keeps_cursor() {
    let source = CountingSource {
        failing: HashSet::from([1]),
        ..Default::default()
    };
    let mut trajectory = Trajectory::new(source, 3, PlaybackMode::Streaming).unwrap();

    assert!(matches!(
        trajectory.advance(Direction::Forward),
        Err(ImportError::Configuration { .. })
    ));
    assert_eq!(trajectory.current_index(), 0);
    assert_eq!(shown_index(trajectory.current()), 0);

    // Skipping the broken index recovers playback.
    assert_eq!(shown_index(trajectory.seek(2).unwrap()), 2);
}

// ============================================================================
// Playback over broken timesteps
// ============================================================================

/// Plays `count` frames, recording each visited index and the timestep shown (if any).
fn play_frames<S: TimestepSource>(
    playback: &mut Playback<S>,
    count: usize,
) -> Vec<(usize, Option<u64>)> {
    (0..count)
        .map(|_| match playback.next_frame() {
            Frame::Shown { index, timestep } => (index, Some(shown_index(timestep))),
            Frame::Skipped { index, error } => {
                assert!(matches!(error, ImportError::Configuration { .. }));
                (index, None)
            }
        })
        .collect()
}

#[test]
fn playback_steps_over_consecutive_broken_timesteps() {
    let source = CountingSource {
        failing: HashSet::from([1, 2]),
        ..Default::default()
    };
    let trajectory = Trajectory::new(source, 3, PlaybackMode::Streaming).unwrap();
    let mut playback = Playback::new(trajectory, Direction::Forward);

    assert_eq!(play_frames(&mut playback, 2), vec![(1, None), (2, None)]);
    assert_eq!(playback.trajectory().current_index(), 0);

    assert_eq!(play_frames(&mut playback, 2), vec![(3, Some(3)), (0, Some(0))]);
    assert_eq!(playback.trajectory().source().loads, vec![0, 1, 2, 3, 0]);
}

#[test]
fn playback_backward_skips_in_playback_order() {
    let source = CountingSource {
        failing: HashSet::from([3]),
        ..Default::default()
    };
    let trajectory = Trajectory::new(source, 3, PlaybackMode::Streaming).unwrap();
    let mut playback = Playback::new(trajectory, Direction::Backward);
    assert_eq!(
        play_frames(&mut playback, 4),
        vec![(3, None), (2, Some(2)), (1, Some(1)), (0, Some(0))]
    );
}

#[test]
fn playback_survives_every_other_timestep_broken() {
    let source = CountingSource {
        failing: HashSet::from([1, 2, 3]),
        ..Default::default()
    };
    let trajectory = Trajectory::new(source, 3, PlaybackMode::Streaming).unwrap();
    let mut playback = Playback::new(trajectory, Direction::Forward);

    // Each pass lands back on the good timestep the cursor never left.
    let frames = play_frames(&mut playback, 8);
    assert_eq!(
        frames,
        vec![
            (1, None),
            (2, None),
            (3, None),
            (0, Some(0)),
            (1, None),
            (2, None),
            (3, None),
            (0, Some(0)),
        ]
    );
    assert_eq!(
        playback.into_trajectory().source().loads,
        vec![0, 1, 2, 3, 1, 2, 3]
    );
}

#[test]
fn playback_over_preloaded_trajectory() {
    let trajectory =
        Trajectory::new(CountingSource::default(), 2, PlaybackMode::Preload).unwrap();
    let mut playback = Playback::new(trajectory, Direction::Forward);
    assert_eq!(
        play_frames(&mut playback, 3),
        vec![(1, Some(1)), (2, Some(2)), (0, Some(0))]
    );
    assert_eq!(playback.trajectory().source().loads, vec![0, 1, 2]);
    assert_eq!(playback.direction(), Direction::Forward);
}

#[test]
fn direction_steps_wrap() {
    assert_eq!(Direction::Forward.step(3, 4), 0);
    assert_eq!(Direction::Backward.step(0, 4), 3);
    assert_eq!(Direction::Forward.step(0, 1), 0);
}

#[test]
fn current_mut_edits_the_shown_timestep() {
    let mut trajectory =
        Trajectory::new(CountingSource::default(), 2, PlaybackMode::Preload).unwrap();
    trajectory.current_mut().remove(0).unwrap();
    trajectory.current_mut().compact();
    assert!(trajectory.current().is_empty());

    trajectory.advance(Direction::Forward).unwrap();
    trajectory.advance(Direction::Backward).unwrap();
    assert!(trajectory.current().is_empty());
}

// ============================================================================
// Reading mts0 directories
// ============================================================================

fn water_timestep(extra_id: u64) -> Timestep {
    let mut timestep = Timestep::new(SimulationBox::from_lengths(DVec3::splat(10.0)));
    let atoms = [
        (AtomType::Silicon, extra_id, DVec3::new(1.0, 1.0, 1.0)),
        (AtomType::Oxygen, 100, DVec3::new(6.0, 6.0, 6.0)),
        (AtomType::Hydrogen, 101, DVec3::new(6.5, 6.0, 6.0)),
        (AtomType::Hydrogen, 102, DVec3::new(6.0, 6.5, 6.0)),
    ];
    for (atom_type, id, position) in atoms {
        timestep.push(AtomRecord {
            atom_type,
            id,
            position,
            velocity: None,
        });
    }
    timestep
}

#[test]
fn mts0_source_follows_directory_layout() {
    let dir = tempdir().unwrap();
    let decomposition = Decomposition::new(2, 1, 2).unwrap();
    let source = Mts0Source::new(dir.path(), decomposition).with_step(50);
    assert_eq!(
        source.directory(3),
        dir.path().join("000150").join("mts0")
    );

    for index in 0..3 {
        let mut timestep = water_timestep(index as u64);
        save_timestep(&mut timestep, &decomposition, &source.directory(index)).unwrap();
    }

    let mut trajectory = Trajectory::new(source, 2, PlaybackMode::Streaming).unwrap();
    assert_eq!(trajectory.current().len(), 4);
    let timestep = trajectory.advance(Direction::Backward).unwrap();
    assert!(timestep.atom_ids().contains(&2));
}

#[test]
fn mts0_source_removes_water() {
    let dir = tempdir().unwrap();
    let decomposition = Decomposition::new(1, 1, 1).unwrap();
    let mut source = Mts0Source::new(dir.path(), decomposition).with_water_removal(true);
    save_timestep(&mut water_timestep(9), &decomposition, &source.directory(0)).unwrap();

    let timestep = source.load(0).unwrap();
    assert_eq!(timestep.len(), 1);
    assert!(!timestep.has_removed());
    assert_eq!(timestep.atom_types(), &[AtomType::Silicon]);
    assert_eq!(timestep.atom_ids(), &[9]);
}

#[test]
fn mts0_source_missing_directory() {
    let dir = tempdir().unwrap();
    let decomposition = Decomposition::new(1, 1, 1).unwrap();
    let result = Trajectory::new(
        Mts0Source::new(dir.path(), decomposition),
        1,
        PlaybackMode::Preload,
    );
    assert!(matches!(result, Err(ImportError::Io { .. })));
}

// End of File
