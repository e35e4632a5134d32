// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! # Run configuration
//!
//! A YAML file describing where a trajectory lives and how to play it back:
//!
//! ```yaml
//! decomposition: { nx: 4, ny: 4, nz: 2 }
//! foldername_base: /data/run42
//! max_timestep: 99
//! step: 100
//! preload: false
//! remove_water: true
//! neighbor: { radius: 3.0 }
//! masses: { X: 12.0 }
//! visibility: { max_atoms: 100000, max_distance: 60.0 }
//! ```
//!
//! Settings are loaded once and handed around explicitly.

mod error;
mod visibility_settings;

pub use error::{ConfigError, Result};
pub use visibility_settings::VisibilitySettings;

use periodic_table::AtomType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecompositionSettings {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NeighborSettings {
    /// Search radius in Ångström.
    pub radius: f64,
    /// Padding added to the box length when binning atoms into cells.
    pub boundary_epsilon: f64,
}

impl Default for NeighborSettings {
    fn default() -> Self {
        Self {
            radius: 3.0,
            boundary_epsilon: 1e-5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub decomposition: DecompositionSettings,
    /// Parent of the numbered timestep directories.
    pub foldername_base: PathBuf,
    /// Last time index; playback covers `0..=max_timestep`.
    pub max_timestep: usize,
    /// Directory number increment between consecutive time indices.
    #[serde(default = "default_step")]
    pub step: usize,
    #[serde(default)]
    pub preload: bool,
    #[serde(default)]
    pub remove_water: bool,
    #[serde(default)]
    pub velocities: bool,
    #[serde(default)]
    pub neighbor: NeighborSettings,
    /// Per-type masses overriding the standard ones.
    #[serde(default)]
    pub masses: BTreeMap<AtomType, f64>,
    #[serde(default)]
    pub visibility: VisibilitySettings,
}

fn default_step() -> usize {
    1
}

impl Settings {
    /// Reads and validates a YAML settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_yaml_str(&text)?;
        log::info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_yaml::to_string(self)?;
        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<()> {
        let DecompositionSettings { nx, ny, nz } = self.decomposition;
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(ConfigError::Invalid(format!(
                "decomposition {}x{}x{} has an empty axis",
                nx, ny, nz
            )));
        }
        if self.step == 0 {
            return Err(ConfigError::Invalid("step must be at least 1".into()));
        }
        if !(self.neighbor.radius.is_finite() && self.neighbor.radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "neighbor radius {} must be positive",
                self.neighbor.radius
            )));
        }
        if !(self.neighbor.boundary_epsilon.is_finite() && self.neighbor.boundary_epsilon > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "boundary epsilon {} must be positive",
                self.neighbor.boundary_epsilon
            )));
        }
        for (atom_type, &mass) in &self.masses {
            if !(mass.is_finite() && mass > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "mass {} of {} must be positive",
                    mass, atom_type
                )));
            }
        }

        let visibility = &self.visibility;
        if visibility.min_distance < 0.0 || visibility.max_distance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "visibility distances ({}, {}) must not be negative",
                visibility.min_distance, visibility.max_distance
            )));
        }
        if visibility.min_distance > visibility.max_distance {
            return Err(ConfigError::Invalid(format!(
                "min_distance {} exceeds max_distance {}",
                visibility.min_distance, visibility.max_distance
            )));
        }
        if visibility.color_cutoff <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "color_cutoff {} must be positive",
                visibility.color_cutoff
            )));
        }
        Ok(())
    }
}

// End of File
