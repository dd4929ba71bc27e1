//! Voxel update feed.

use serde::{Deserialize, Serialize};
use voxelview_core::{BlockId, WorldPos};

/// One voxel edit as published by the world authority.
///
/// Serialized as `{"action":"set","x":..,"y":..,"z":..,"block":..}` or
/// `{"action":"remove","x":..,"y":..,"z":..}`. `type` is accepted in place of
/// `block` when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum VoxelDelta {
    Set {
        x: i32,
        y: i32,
        z: i32,
        #[serde(alias = "type")]
        block: BlockId,
    },
    Remove {
        x: i32,
        y: i32,
        z: i32,
    },
}

impl VoxelDelta {
    pub const fn set(pos: WorldPos, block: BlockId) -> Self {
        Self::Set {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            block,
        }
    }

    pub const fn remove(pos: WorldPos) -> Self {
        Self::Remove {
            x: pos.x,
            y: pos.y,
            z: pos.z,
        }
    }

    /// Position the edit applies to.
    pub const fn pos(&self) -> WorldPos {
        match *self {
            Self::Set { x, y, z, .. } | Self::Remove { x, y, z } => WorldPos::new(x, y, z),
        }
    }

    /// Block left at the position after the edit; air for removals.
    pub const fn block(&self) -> BlockId {
        match *self {
            Self::Set { block, .. } => block,
            Self::Remove { .. } => BlockId::AIR,
        }
    }
}
