// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! Playback over a sequence of timesteps.
//!
//! A [`Trajectory`] exposes exactly one current timestep and moves a cursor over the time
//! indices `0..=max_timestep`, wrapping at both ends.  In [`PlaybackMode::Preload`] every
//! timestep is assembled up front and moving the cursor is free; in
//! [`PlaybackMode::Streaming`] only the current timestep is resident and every move
//! assembles the next one synchronously on the calling thread.

use crate::assembler::load_timestep;
use crate::decomposition::Decomposition;
use crate::error::{ImportError, Result};
use periodic_table::AtomType;
use std::path::{Path, PathBuf};
use timestep::{Timestep, TimestepError};

/// Produces the timestep for a time index.
pub trait TimestepSource {
    fn load(&mut self, index: usize) -> Result<Timestep>;
}

/// Reads timesteps from `mts0` directories laid out as
/// `{foldername_base}/{index * step:06}/mts0/`.
#[derive(Debug, Clone)]
pub struct Mts0Source {
    foldername_base: PathBuf,
    decomposition: Decomposition,
    step: usize,
    remove_water: bool,
    velocities: bool,
}

impl Mts0Source {
    pub fn new(foldername_base: impl Into<PathBuf>, decomposition: Decomposition) -> Self {
        Self {
            foldername_base: foldername_base.into(),
            decomposition,
            step: 1,
            remove_water: false,
            velocities: false,
        }
    }

    /// Distance between consecutive directory numbers.
    pub fn with_step(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    /// Drop hydrogen and oxygen right after every load.
    pub fn with_water_removal(mut self, remove_water: bool) -> Self {
        self.remove_water = remove_water;
        self
    }

    pub fn with_velocities(mut self, velocities: bool) -> Self {
        self.velocities = velocities;
        self
    }

    pub fn decomposition(&self) -> &Decomposition {
        &self.decomposition
    }

    pub fn foldername_base(&self) -> &Path {
        &self.foldername_base
    }

    /// Directory holding the node files of a time index.
    pub fn directory(&self, index: usize) -> PathBuf {
        self.foldername_base
            .join(format!("{:06}", index * self.step))
            .join("mts0")
    }
}

impl TimestepSource for Mts0Source {
    fn load(&mut self, index: usize) -> Result<Timestep> {
        let mut timestep =
            load_timestep(&self.decomposition, &self.directory(index), self.velocities)?;
        if self.remove_water {
            let removed = timestep.remove_types(&AtomType::WATER);
            timestep.compact();
            log::debug!("removed {} water atoms from timestep {}", removed, index);
        }
        Ok(timestep)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Assemble everything at construction.
    Preload,
    /// Keep one timestep and assemble on every move.
    Streaming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// The index one step from `index` in this direction, wrapping within `0..len`.
    pub fn step(self, index: usize, len: usize) -> usize {
        match self {
            Direction::Forward => (index + 1) % len,
            Direction::Backward => (index + len - 1) % len,
        }
    }
}

impl TryFrom<i32> for Direction {
    type Error = i32;

    /// `1` plays forward and `-1` backward.
    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Direction::Forward),
            -1 => Ok(Direction::Backward),
            other => Err(other),
        }
    }
}

enum Storage {
    Preloaded(Vec<Timestep>),
    Streaming(Timestep),
}

pub struct Trajectory<S: TimestepSource = Mts0Source> {
    source: S,
    max_timestep: usize,
    current_index: usize,
    storage: Storage,
}

impl<S: TimestepSource> Trajectory<S> {
    /// Loads every timestep (preload) or timestep 0 (streaming) and puts the cursor at 0.
    pub fn new(mut source: S, max_timestep: usize, mode: PlaybackMode) -> Result<Self> {
        let storage = match mode {
            PlaybackMode::Preload => {
                let mut timesteps = Vec::with_capacity(max_timestep + 1);
                for index in 0..=max_timestep {
                    timesteps.push(source.load(index)?);
                    log::info!("preloaded timestep {} of {}", index, max_timestep);
                }
                Storage::Preloaded(timesteps)
            }
            PlaybackMode::Streaming => Storage::Streaming(source.load(0)?),
        };

        Ok(Self {
            source,
            max_timestep,
            current_index: 0,
            storage,
        })
    }

    pub fn mode(&self) -> PlaybackMode {
        match self.storage {
            Storage::Preloaded(_) => PlaybackMode::Preload,
            Storage::Streaming(_) => PlaybackMode::Streaming,
        }
    }

    pub fn max_timestep(&self) -> usize {
        self.max_timestep
    }

    /// Number of time indices, `max_timestep + 1`.
    pub fn len(&self) -> usize {
        self.max_timestep + 1
    }

    /// Always false; a trajectory holds at least timestep 0.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> &Timestep {
        match &self.storage {
            Storage::Preloaded(timesteps) => &timesteps[self.current_index],
            Storage::Streaming(timestep) => timestep,
        }
    }

    /// The current timestep, for removal and compaction.  In streaming mode the changes are
    /// lost on the next move.
    pub fn current_mut(&mut self) -> &mut Timestep {
        match &mut self.storage {
            Storage::Preloaded(timesteps) => &mut timesteps[self.current_index],
            Storage::Streaming(timestep) => timestep,
        }
    }

    /// Moves the cursor one step, wrapping at both ends.
    ///
    /// If the next timestep cannot be assembled the cursor stays where it was and the error
    /// is returned; [`Trajectory::seek`] can skip past a bad index.
    pub fn advance(&mut self, direction: Direction) -> Result<&Timestep> {
        let index = direction.step(self.current_index, self.len());
        self.move_to(index)
    }

    /// Moves the cursor to an arbitrary index.
    pub fn seek(&mut self, index: usize) -> Result<&Timestep> {
        if index > self.max_timestep {
            return Err(TimestepError::IndexOutOfRange {
                index,
                len: self.len(),
            }
            .into());
        }
        self.move_to(index)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn move_to(&mut self, index: usize) -> Result<&Timestep> {
        if let Storage::Streaming(current) = &mut self.storage {
            if index != self.current_index {
                *current = self.source.load(index)?;
            }
        }
        self.current_index = index;
        Ok(self.current())
    }
}

/// One visited time index during [`Playback`].
#[derive(Debug)]
pub enum Frame<'a> {
    Shown { index: usize, timestep: &'a Timestep },
    Skipped { index: usize, error: ImportError },
}

impl Frame<'_> {
    pub fn index(&self) -> usize {
        match self {
            Frame::Shown { index, .. } | Frame::Skipped { index, .. } => *index,
        }
    }
}

/// Plays a trajectory in one direction, stepping over timesteps that fail to assemble.
///
/// Every call to [`Playback::next_frame`] visits exactly one time index.  A broken index is
/// reported as [`Frame::Skipped`] and the cursor stays on the last good timestep; the next
/// call moves on to the index after the broken one.  After a full wrap playback arrives back
/// at the cursor, which needs no reload, so a run of broken timesteps never ends playback.
pub struct Playback<S: TimestepSource = Mts0Source> {
    trajectory: Trajectory<S>,
    direction: Direction,
    next_index: usize,
}

impl<S: TimestepSource> Playback<S> {
    pub fn new(trajectory: Trajectory<S>, direction: Direction) -> Self {
        let next_index = direction.step(trajectory.current_index(), trajectory.len());
        Self {
            trajectory,
            direction,
            next_index,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn trajectory(&self) -> &Trajectory<S> {
        &self.trajectory
    }

    pub fn into_trajectory(self) -> Trajectory<S> {
        self.trajectory
    }

    pub fn next_frame(&mut self) -> Frame<'_> {
        let index = self.next_index;
        self.next_index = self.direction.step(index, self.trajectory.len());
        match self.trajectory.seek(index) {
            Ok(timestep) => Frame::Shown { index, timestep },
            Err(error) => {
                log::warn!("skipping timestep {}: {}", index, error);
                Frame::Skipped { index, error }
            }
        }
    }
}

// End of File
