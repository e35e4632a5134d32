// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use serde::{Deserialize, Serialize};

/// How viewers pick the atoms to draw around the camera.  Distances are in Ångström.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisibilitySettings {
    /// Draw at most this many atoms, nearest first.
    pub max_atoms: Option<usize>,
    pub max_distance: f64,
    pub min_distance: f64,
    /// Squared distance at which atom shading bottoms out.
    pub color_cutoff: f64,
    pub periodic_images: bool,
    pub hide_water: bool,
}

impl VisibilitySettings {
    pub const DEFAULT_MAX_DISTANCE: f64 = 60.0;
    pub const DEFAULT_MIN_DISTANCE: f64 = 0.5;
    pub const DEFAULT_COLOR_CUTOFF: f64 = 2500.0;
}

impl Default for VisibilitySettings {
    fn default() -> Self {
        Self {
            max_atoms: None,
            max_distance: Self::DEFAULT_MAX_DISTANCE,
            min_distance: Self::DEFAULT_MIN_DISTANCE,
            color_cutoff: Self::DEFAULT_COLOR_CUTOFF,
            periodic_images: true,
            hide_water: false,
        }
    }
}

// End of File
