//! Core voxel types.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Integer type code of a voxel.
///
/// Block ID 0 is reserved for air (empty space). Any other value is a
/// material. The space is open-ended: codes without a named constant are
/// still valid and are treated as opaque grouping keys.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Pod,
    Zeroable,
    Serialize,
    Deserialize,
)]
#[repr(transparent)]
#[serde(transparent)]
pub struct BlockId(pub u16);

impl BlockId {
    /// Air block (empty space)
    pub const AIR: Self = Self(0);
    /// Stone block
    pub const STONE: Self = Self(1);
    /// Wood block
    pub const WOOD: Self = Self(2);
    /// Tree leaves block
    pub const LEAVES: Self = Self(3);
    /// Dirt block
    pub const DIRT: Self = Self(4);
    /// Sand block
    pub const SAND: Self = Self(5);
    /// Water block
    pub const WATER: Self = Self(6);
    /// Road surface block
    pub const ROAD: Self = Self(7);
    /// Glass block
    pub const GLASS: Self = Self(8);
    /// Roof tile block
    pub const ROOF: Self = Self(9);

    /// Returns true if this block is air (empty)
    #[inline]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }

    /// Returns true if this block is solid (not air)
    #[inline]
    pub const fn is_solid(self) -> bool {
        self.0 != 0
    }

    /// Human-readable name for the known materials.
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("air"),
            1 => Some("stone"),
            2 => Some("wood"),
            3 => Some("leaves"),
            4 => Some("dirt"),
            5 => Some("sand"),
            6 => Some("water"),
            7 => Some("road"),
            8 => Some("glass"),
            9 => Some("roof"),
            _ => None,
        }
    }
}

impl From<u16> for BlockId {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "block#{}", self.0),
        }
    }
}
