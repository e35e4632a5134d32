// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! Camera-relative selection of the atoms a viewer should draw.
//!
//! Renderers only consume the result: a list of atom indices with the concrete (possibly
//! periodic-image) position to draw at, sorted nearest first.

use crate::timestep::Timestep;
use glam::f64::DVec3;

/// Which atoms are visible from a camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityQuery {
    pub camera: DVec3,
    /// Atoms behind the camera (negative projection onto this direction) are culled.
    pub view_direction: DVec3,
    /// Atoms closer than this are culled, so the camera does not sit inside a sphere.
    pub min_distance: f64,
    pub max_distance: f64,
    /// Squared distance at which shading reaches its floor.
    pub shade_cutoff_sq: f64,
    /// Also consider the 26 periodic images of every atom.
    pub periodic_images: bool,
    pub hide_water: bool,
    /// Keep only this many of the nearest atoms.
    pub max_atoms: Option<usize>,
}

impl Default for VisibilityQuery {
    fn default() -> Self {
        Self {
            camera: DVec3::ZERO,
            view_direction: DVec3::NEG_Z,
            min_distance: 0.0,
            max_distance: f64::INFINITY,
            shade_cutoff_sq: f64::INFINITY,
            periodic_images: true,
            hide_water: false,
            max_atoms: None,
        }
    }
}

/// Lowest shade factor handed out, so distant atoms stay faintly visible.
pub const MIN_SHADE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleAtom {
    pub index: usize,
    /// Where to draw the atom; differs from the stored position for periodic images.
    pub position: DVec3,
    pub distance_sq: f64,
    /// Brightness factor in `[MIN_SHADE, 1]`, falling off with distance.
    pub shade: f64,
}

/// Selects the visible atoms (and periodic images) of a timestep, nearest first.
pub fn visible_atoms(timestep: &Timestep, query: &VisibilityQuery) -> Vec<VisibleAtom> {
    let lengths = timestep.lengths();
    let min_distance_sq = query.min_distance * query.min_distance;
    let max_distance_sq = query.max_distance * query.max_distance;
    let image_range = if query.periodic_images { -1..=1 } else { 0..=0 };

    let mut visible = Vec::new();
    for (index, atom) in timestep.iter() {
        if query.hide_water && atom.atom_type.is_water() {
            continue;
        }
        for dx in image_range.clone() {
            for dy in image_range.clone() {
                for dz in image_range.clone() {
                    let image = DVec3::new(dx as f64, dy as f64, dz as f64);
                    let position = atom.position + image * lengths;
                    let delta = position - query.camera;
                    let distance_sq = delta.length_squared();
                    if distance_sq < min_distance_sq || distance_sq > max_distance_sq {
                        continue;
                    }
                    if delta.dot(query.view_direction) < 0.0 {
                        continue;
                    }
                    visible.push(VisibleAtom {
                        index,
                        position,
                        distance_sq,
                        shade: (1.0 - distance_sq / query.shade_cutoff_sq).max(MIN_SHADE),
                    });
                }
            }
        }
    }

    visible.sort_by(|a, b| a.distance_sq.total_cmp(&b.distance_sq));
    if let Some(max_atoms) = query.max_atoms {
        visible.truncate(max_atoms);
    }
    visible
}

// End of File
