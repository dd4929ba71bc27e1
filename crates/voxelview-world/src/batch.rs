//! Per-type instance batches.
//!
//! Every visible sparse voxel is drawn as one instance of a shared unit cube.
//! Instances are grouped by block type so a renderer issues one draw per type,
//! and each group carries a bounding sphere for coarse frustum rejection.

use std::sync::Arc;

use glam::Vec3;
use hashbrown::HashMap;
use tracing::trace;
use voxelview_core::{Aabb, BlockId, BoundingSphere, Frustum, WorldPos};
use voxelview_mesh::MeshBuffer;

/// Unit-cube mesh spanning `[0, 1]³`, shared by every batch.
pub type SharedGeometry = Arc<MeshBuffer>;

/// Visible voxels of one block type.
///
/// Instances are kept in a dense vector with a position index beside it, so
/// insertion and removal are O(1). Removing a cube that touches a face of the
/// bounds rescans the remaining instances.
#[derive(Debug, Clone)]
pub struct Batch {
    block: BlockId,
    instances: Vec<WorldPos>,
    slots: HashMap<WorldPos, usize>,
    /// Extents of the full unit cubes; `None` while empty.
    bounds: Option<Aabb>,
}

impl Batch {
    pub fn new(block: BlockId) -> Self {
        Self::with_capacity(block, 0)
    }

    pub fn with_capacity(block: BlockId, capacity: usize) -> Self {
        Self {
            block,
            instances: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
            bounds: None,
        }
    }

    /// Build a batch from distinct instances whose extents were already
    /// gathered by the caller.
    pub(crate) fn from_parts(block: BlockId, instances: Vec<WorldPos>, bounds: Aabb) -> Self {
        let slots = instances
            .iter()
            .enumerate()
            .map(|(slot, &pos)| (pos, slot))
            .collect();
        Self {
            block,
            instances,
            slots,
            bounds: Some(bounds),
        }
    }

    #[inline]
    pub const fn block(&self) -> BlockId {
        self.block
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    #[inline]
    pub fn contains(&self, pos: WorldPos) -> bool {
        self.slots.contains_key(&pos)
    }

    /// Instance positions in unspecified order.
    #[inline]
    pub fn instances(&self) -> &[WorldPos] {
        &self.instances
    }

    /// Per-instance translations for the shared unit cube.
    pub fn translations(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.instances.iter().map(|pos| pos.to_vec3())
    }

    #[inline]
    pub const fn aabb(&self) -> Option<Aabb> {
        self.bounds
    }

    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        self.bounds.map(|aabb| aabb.bounding_sphere())
    }

    /// Add an instance. Returns `false` if it was already present.
    pub fn insert(&mut self, pos: WorldPos) -> bool {
        if self.slots.contains_key(&pos) {
            return false;
        }
        self.slots.insert(pos, self.instances.len());
        self.instances.push(pos);

        let cube = Aabb::unit_cube(pos.to_vec3());
        self.bounds = Some(self.bounds.map_or(cube, |bounds| bounds.merge(&cube)));
        true
    }

    /// Drop an instance. Returns `false` if it was not present.
    ///
    /// Bounds shrink only when the removed cube lay on one of their faces.
    pub fn remove(&mut self, pos: WorldPos) -> bool {
        let Some(slot) = self.slots.remove(&pos) else {
            return false;
        };
        self.instances.swap_remove(slot);
        if let Some(&moved) = self.instances.get(slot) {
            self.slots.insert(moved, slot);
        }

        let cube = Aabb::unit_cube(pos.to_vec3());
        let on_face = match self.bounds {
            Some(bounds) => cube.min.cmpeq(bounds.min).any() || cube.max.cmpeq(bounds.max).any(),
            None => true,
        };
        if on_face {
            self.bounds = instance_bounds(&self.instances);
        }
        true
    }
}

/// Extents of the unit cubes placed at `instances`.
pub fn instance_bounds(instances: &[WorldPos]) -> Option<Aabb> {
    let (first, rest) = instances.split_first()?;
    let mut bounds = Aabb::unit_cube(first.to_vec3());
    for pos in rest {
        bounds.expand_to_include(pos.to_vec3());
        bounds.expand_to_include(pos.to_vec3() + Vec3::ONE);
    }
    Some(bounds)
}

/// Borrowed per-frame view of one non-empty batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchSnapshot<'a> {
    pub block: BlockId,
    pub geometry: &'a SharedGeometry,
    pub instances: &'a [WorldPos],
    pub bounding_sphere: BoundingSphere,
}

impl BatchSnapshot<'_> {
    pub fn translations(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.instances.iter().map(|pos| pos.to_vec3())
    }
}

/// All non-empty batches plus the geometry they share.
#[derive(Debug, Clone)]
pub struct BatchSet {
    geometry: SharedGeometry,
    batches: HashMap<BlockId, Batch>,
}

impl BatchSet {
    pub fn new(geometry: SharedGeometry) -> Self {
        Self {
            geometry,
            batches: HashMap::new(),
        }
    }

    #[inline]
    pub const fn geometry(&self) -> &SharedGeometry {
        &self.geometry
    }

    #[inline]
    pub fn get(&self, block: BlockId) -> Option<&Batch> {
        self.batches.get(&block)
    }

    /// Number of non-empty batches.
    #[inline]
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Total instances across all batches.
    pub fn instance_count(&self) -> usize {
        self.batches.values().map(Batch::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Batch> {
        self.batches.values()
    }

    /// Put `pos` into the batch for `block`, creating the batch on demand.
    pub fn insert(&mut self, pos: WorldPos, block: BlockId) -> bool {
        let inserted = self
            .batches
            .entry(block)
            .or_insert_with(|| Batch::new(block))
            .insert(pos);
        if inserted {
            trace!(?pos, %block, "batch insert");
        }
        inserted
    }

    /// Take `pos` out of the batch for `block`, deleting the batch once empty.
    pub fn remove(&mut self, pos: WorldPos, block: BlockId) -> bool {
        let Some(batch) = self.batches.get_mut(&block) else {
            return false;
        };
        let removed = batch.remove(pos);
        if batch.is_empty() {
            self.batches.remove(&block);
            trace!(%block, "batch emptied");
        }
        if removed {
            trace!(?pos, %block, "batch remove");
        }
        removed
    }

    /// Swap in a freshly built set of batches. Empty batches are dropped.
    pub fn replace(&mut self, batches: impl IntoIterator<Item = Batch>) {
        self.batches = batches
            .into_iter()
            .filter(|batch| !batch.is_empty())
            .map(|batch| (batch.block(), batch))
            .collect();
    }

    pub fn clear(&mut self) {
        self.batches.clear();
    }

    /// Per-frame views of every batch, ordered by block id.
    pub fn snapshot(&self) -> Vec<BatchSnapshot<'_>> {
        let mut snapshots: Vec<BatchSnapshot<'_>> = self
            .batches
            .values()
            .filter_map(|batch| {
                Some(BatchSnapshot {
                    block: batch.block(),
                    geometry: &self.geometry,
                    instances: batch.instances(),
                    bounding_sphere: batch.bounding_sphere()?,
                })
            })
            .collect();
        snapshots.sort_unstable_by_key(|snapshot| snapshot.block);
        snapshots
    }

    /// Snapshots whose bounding sphere touches `frustum`.
    pub fn visible_in(&self, frustum: &Frustum) -> Vec<BatchSnapshot<'_>> {
        let mut snapshots = self.snapshot();
        snapshots.retain(|snapshot| frustum.test_sphere(&snapshot.bounding_sphere));
        snapshots
    }
}
