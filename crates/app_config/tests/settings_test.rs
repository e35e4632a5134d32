// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use app_config::{ConfigError, DecompositionSettings, Settings, VisibilitySettings};
use periodic_table::AtomType;
use std::path::Path;
use tempfile::tempdir;

const MINIMAL: &str = "
decomposition: { nx: 2, ny: 1, nz: 3 }
foldername_base: /data/run
max_timestep: 9
";

#[test]
fn defaults_fill_optional_fields() {
    let settings = Settings::from_yaml_str(MINIMAL).unwrap();
    assert_eq!(
        settings.decomposition,
        DecompositionSettings { nx: 2, ny: 1, nz: 3 }
    );
    assert_eq!(settings.foldername_base, Path::new("/data/run"));
    assert_eq!(settings.max_timestep, 9);
    assert_eq!(settings.step, 1);
    assert!(!settings.preload);
    assert!(!settings.remove_water);
    assert!(!settings.velocities);
    assert_eq!(settings.neighbor.boundary_epsilon, 1e-5);
    assert!(settings.masses.is_empty());
    assert_eq!(settings.visibility, VisibilitySettings::default());
}

#[test]
fn full_file() {
    let text = "
decomposition: { nx: 4, ny: 4, nz: 2 }
foldername_base: run42
max_timestep: 99
step: 100
preload: true
remove_water: true
velocities: true
neighbor:
  radius: 2.5
  boundary_epsilon: 1.0e-4
masses:
  X: 12.0
  Si: 28.0
visibility:
  max_atoms: 1000
  min_distance: 1.0
  periodic_images: false
";
    let settings = Settings::from_yaml_str(text).unwrap();
    assert_eq!(settings.step, 100);
    assert!(settings.preload && settings.remove_water && settings.velocities);
    assert_eq!(settings.neighbor.radius, 2.5);
    assert_eq!(settings.neighbor.boundary_epsilon, 1e-4);
    assert_eq!(settings.masses.get(&AtomType::X), Some(&12.0));
    assert_eq!(settings.masses.get(&AtomType::Silicon), Some(&28.0));
    assert_eq!(settings.visibility.max_atoms, Some(1000));
    assert_eq!(settings.visibility.min_distance, 1.0);
    assert_eq!(
        settings.visibility.max_distance,
        VisibilitySettings::DEFAULT_MAX_DISTANCE
    );
    assert!(!settings.visibility.periodic_images);
}

#[test]
fn rejects_invalid_values() {
    let cases = [
        "decomposition: { nx: 0, ny: 1, nz: 1 }\nfoldername_base: a\nmax_timestep: 0\n",
        "decomposition: { nx: 1, ny: 1, nz: 1 }\nfoldername_base: a\nmax_timestep: 0\nstep: 0\n",
        "decomposition: { nx: 1, ny: 1, nz: 1 }\nfoldername_base: a\nmax_timestep: 0\nneighbor: { radius: -1.0 }\n",
        "decomposition: { nx: 1, ny: 1, nz: 1 }\nfoldername_base: a\nmax_timestep: 0\nneighbor: { boundary_epsilon: 0.0 }\n",
        "decomposition: { nx: 1, ny: 1, nz: 1 }\nfoldername_base: a\nmax_timestep: 0\nmasses: { O: 0.0 }\n",
        "decomposition: { nx: 1, ny: 1, nz: 1 }\nfoldername_base: a\nmax_timestep: 0\nvisibility: { min_distance: 5.0, max_distance: 1.0 }\n",
    ];
    for text in cases {
        assert!(
            matches!(Settings::from_yaml_str(text), Err(ConfigError::Invalid(_))),
            "accepted {:?}",
            text
        );
    }
}

#[test]
fn rejects_malformed_yaml() {
    assert!(matches!(
        Settings::from_yaml_str("decomposition: [1, 2"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        Settings::from_yaml_str(&format!("{}unknown_key: 1\n", MINIMAL)),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        Settings::from_yaml_str(&format!("{}masses: {{ Fe: 55.8 }}\n", MINIMAL)),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn save_then_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mdview.yaml");
    let mut settings = Settings::from_yaml_str(MINIMAL).unwrap();
    settings.masses.insert(AtomType::A, 40.0);
    settings.remove_water = true;

    settings.save(&path).unwrap();
    assert_eq!(Settings::load(&path).unwrap(), settings);
}

#[test]
fn missing_file() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        Settings::load(&dir.path().join("absent.yaml")),
        Err(ConfigError::Io { .. })
    ));
}

// End of File
