// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! # Atom types of the mts0 trajectory format
//!
//! The simulation code that produces `mts0` snapshots only knows a handful of species, each
//! identified by a small positive integer stored in the integer part of the packed per-atom
//! value.  This crate names them, and carries the per-type tables (masses, display colors and
//! radii) that downstream code needs, as plain values rather than process-wide state.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;
use std::{fmt, mem};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AtomType {
    #[serde(rename = "Si")]
    Silicon = 1,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "H")]
    Hydrogen,
    #[serde(rename = "O")]
    Oxygen,
    #[serde(rename = "Na")]
    Sodium,
    #[serde(rename = "Cl")]
    Chlorine,
    #[serde(rename = "X")]
    X,
}

const_assert_eq!(mem::size_of::<AtomType>(), 1);

impl AtomType {
    pub const MIN: Self = AtomType::Silicon;
    pub const MAX: Self = AtomType::X;

    /// Every type, in file-code order.
    pub const ALL: [AtomType; 7] = [
        AtomType::Silicon,
        AtomType::A,
        AtomType::Hydrogen,
        AtomType::Oxygen,
        AtomType::Sodium,
        AtomType::Chlorine,
        AtomType::X,
    ];

    /// The species making up water, which viewers commonly hide.
    pub const WATER: [AtomType; 2] = [AtomType::Hydrogen, AtomType::Oxygen];

    /// Looks up a type by the integer code used in `mts0` files.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(AtomType::Silicon),
            2 => Some(AtomType::A),
            3 => Some(AtomType::Hydrogen),
            4 => Some(AtomType::Oxygen),
            5 => Some(AtomType::Sodium),
            6 => Some(AtomType::Chlorine),
            7 => Some(AtomType::X),
            _ => None,
        }
    }

    /// The integer code used in `mts0` files.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Zero-based position of this type in per-type tables.
    pub fn index(self) -> usize {
        self as usize - Self::MIN as usize
    }

    pub fn symbol(self) -> &'static str {
        match self {
            AtomType::Silicon => "Si",
            AtomType::A => "A",
            AtomType::Hydrogen => "H",
            AtomType::Oxygen => "O",
            AtomType::Sodium => "Na",
            AtomType::Chlorine => "Cl",
            AtomType::X => "X",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.symbol() == symbol)
    }

    /// Standard atomic mass in unified atomic mass units.  The placeholder types `A` and `X`
    /// have no physical mass and return `None`.
    pub fn standard_mass(self) -> Option<f64> {
        match self {
            AtomType::Silicon => Some(28.0855),
            AtomType::Hydrogen => Some(1.00794),
            AtomType::Oxygen => Some(15.9994),
            AtomType::Sodium => Some(22.98977),
            AtomType::Chlorine => Some(35.453),
            AtomType::A | AtomType::X => None,
        }
    }

    pub fn is_water(self) -> bool {
        Self::WATER.contains(&self)
    }
}

impl TryFrom<u8> for AtomType {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(code)
    }
}

impl fmt::Display for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// How an atom type is drawn: its color and billboard radius in Ångström.
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct AtomTypeRepr {
    pub color: Vec3,
    pub radius: f32,
}

const_assert_eq!(mem::size_of::<AtomTypeRepr>(), 16);

/// Display properties for every atom type, handed to renderers as an explicit value.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomTypeTable {
    reprs: [AtomTypeRepr; AtomType::ALL.len()],
}

impl AtomTypeTable {
    pub fn new() -> Self {
        let mut reprs = [AtomTypeRepr {
            color: Vec3::new(0.5, 0.5, 0.5), // grey
            radius: 1.0,
        }; AtomType::ALL.len()];

        reprs[AtomType::Silicon.index()] = AtomTypeRepr {
            color: Vec3::new(230.0 / 255.0, 230.0 / 255.0, 0.0), // yellow
            radius: 1.11,
        };
        reprs[AtomType::A.index()] = AtomTypeRepr {
            color: Vec3::new(0.0, 0.0, 1.0), // blue
            radius: 0.66,
        };
        reprs[AtomType::Hydrogen.index()] = AtomTypeRepr {
            color: Vec3::new(1.0, 1.0, 1.0), // white
            radius: 0.35,
        };
        reprs[AtomType::Oxygen.index()] = AtomTypeRepr {
            color: Vec3::new(1.0, 0.0, 0.0), // red
            radius: 0.66,
        };
        reprs[AtomType::Sodium.index()] = AtomTypeRepr {
            color: Vec3::new(9.0 / 255.0, 92.0 / 255.0, 0.0), // dark green
            radius: 1.86,
        };
        reprs[AtomType::Chlorine.index()] = AtomTypeRepr {
            color: Vec3::new(95.0 / 255.0, 216.0 / 255.0, 250.0 / 255.0), // light blue
            radius: 1.02,
        };

        Self { reprs }
    }

    pub fn get(&self, atom_type: AtomType) -> &AtomTypeRepr {
        &self.reprs[atom_type.index()]
    }

    pub fn set(&mut self, atom_type: AtomType, repr: AtomTypeRepr) {
        self.reprs[atom_type.index()] = repr;
    }

    /// Raw table in file-code order, suitable for uploading to a GPU buffer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.reprs)
    }
}

impl Default for AtomTypeTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for atom_type in AtomType::ALL {
            assert_eq!(AtomType::from_code(atom_type.code()), Some(atom_type));
        }
        assert_eq!(AtomType::from_code(0), None);
        assert_eq!(AtomType::from_code(8), None);
        assert_eq!(AtomType::try_from(9u8), Err(9));
    }

    #[test]
    fn symbols() {
        assert_eq!(AtomType::from_symbol("Na"), Some(AtomType::Sodium));
        assert_eq!(AtomType::from_symbol("Xe"), None);
        assert_eq!(AtomType::Chlorine.to_string(), "Cl");
    }

    #[test]
    fn water_species() {
        assert!(AtomType::Hydrogen.is_water());
        assert!(AtomType::Oxygen.is_water());
        assert!(!AtomType::Silicon.is_water());
    }

    #[test]
    fn table_bytes_cover_every_type() {
        let table = AtomTypeTable::new();
        assert_eq!(table.as_bytes().len(), 16 * AtomType::ALL.len());
        assert_eq!(table.get(AtomType::Hydrogen).radius, 0.35);
    }
}

// End of File
