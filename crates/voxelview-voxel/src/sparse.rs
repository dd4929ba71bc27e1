//! Sparse world storage.

use hashbrown::HashMap;
use voxelview_core::{BlockId, WorldPos};

/// Unbounded map of world voxel positions to block types.
///
/// Only solid voxels are stored: writing air deletes the key, so iteration
/// cost tracks the number of solid voxels.
#[derive(Clone, Debug, Default)]
pub struct SparseWorld {
    voxels: HashMap<WorldPos, BlockId>,
}

impl SparseWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            voxels: HashMap::with_capacity(capacity),
        }
    }

    /// Block at `pos`; air when absent.
    #[inline]
    pub fn get(&self, pos: WorldPos) -> BlockId {
        self.voxels.get(&pos).copied().unwrap_or(BlockId::AIR)
    }

    #[inline]
    pub fn contains(&self, pos: WorldPos) -> bool {
        self.voxels.contains_key(&pos)
    }

    /// Store `block` at `pos`, returning the previous solid block if any.
    ///
    /// Setting air removes the voxel.
    pub fn set(&mut self, pos: WorldPos, block: BlockId) -> Option<BlockId> {
        if block.is_air() {
            self.voxels.remove(&pos)
        } else {
            self.voxels.insert(pos, block)
        }
    }

    /// Delete the voxel at `pos`, returning it if it was present.
    pub fn remove(&mut self, pos: WorldPos) -> Option<BlockId> {
        self.voxels.remove(&pos)
    }

    /// Number of solid voxels.
    #[inline]
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Iterate all solid voxels in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (WorldPos, BlockId)> + '_ {
        self.voxels.iter().map(|(&pos, &block)| (pos, block))
    }

    pub fn clear(&mut self) {
        self.voxels.clear();
    }
}

impl Extend<(WorldPos, BlockId)> for SparseWorld {
    fn extend<I: IntoIterator<Item = (WorldPos, BlockId)>>(&mut self, iter: I) {
        for (pos, block) in iter {
            self.set(pos, block);
        }
    }
}

impl FromIterator<(WorldPos, BlockId)> for SparseWorld {
    fn from_iter<I: IntoIterator<Item = (WorldPos, BlockId)>>(iter: I) -> Self {
        let mut world = Self::new();
        world.extend(iter);
        world
    }
}
