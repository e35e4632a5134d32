// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use periodic_table::AtomType;

/// Node files pack an atom's type and id into one double as `type + id / ID_SCALE`, leaving
/// eleven decimal digits for the id.
pub const ID_SCALE: f64 = 1e11;

const ID_SCALE_INT: u64 = 100_000_000_000;

/// The decoded form of the packed type/id double.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeAndId {
    pub atom_type: AtomType,
    pub id: u64,
}

impl TypeAndId {
    pub fn new(atom_type: AtomType, id: u64) -> Self {
        Self { atom_type, id }
    }

    /// Splits a packed value into type and id.
    ///
    /// The whole value is scaled to an integer and rounded before splitting, so round-off in
    /// either direction is absorbed: `5.00000000123` gives type 5 and id 123, and a value one
    /// ulp below `2.0` gives type 2 and id 0.  Returns `None` for values that are negative,
    /// non-finite, or carry an unknown type code.
    pub fn decode(encoded: f64) -> Option<Self> {
        if !encoded.is_finite() || encoded < 0.0 {
            return None;
        }
        let packed = (encoded * ID_SCALE).round();
        if packed >= u64::MAX as f64 {
            return None;
        }
        let packed = packed as u64;
        let code = u8::try_from(packed / ID_SCALE_INT).ok()?;
        Some(Self {
            atom_type: AtomType::from_code(code)?,
            id: packed % ID_SCALE_INT,
        })
    }

    pub fn encode(self) -> f64 {
        f64::from(self.atom_type.code()) + self.id as f64 * 1e-11
    }
}


// End of File
