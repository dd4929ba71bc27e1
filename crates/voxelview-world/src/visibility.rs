//! Radius-based visibility for the sparse world.
//!
//! The manager mirrors the authority's voxel set and keeps a [`BatchSet`]
//! holding exactly the voxels whose planar distance to the last evaluated
//! viewer position is within the configured radius. Single edits are applied
//! incrementally; viewer movement triggers a full re-evaluation, throttled by
//! distance and time.

use std::time::Instant;

use glam::Vec3;
use hashbrown::HashMap;
use tracing::debug;
use voxelview_core::{Aabb, BlockId, Result, WorldPos};
use voxelview_mesh::ChunkMesher;
use voxelview_voxel::SparseWorld;

use crate::batch::{Batch, BatchSet, BatchSnapshot, SharedGeometry};
use crate::config::VisibilityConfig;
use crate::delta::VoxelDelta;

/// Viewer position and time of the last full re-evaluation.
#[derive(Debug, Clone, Copy)]
struct Evaluation {
    viewer: Vec3,
    at: Instant,
}

/// Sparse world plus the batches that are currently in range.
#[derive(Debug)]
pub struct VisibilityManager {
    config: VisibilityConfig,
    world: SparseWorld,
    batches: BatchSet,
    last: Option<Evaluation>,
    force: bool,
    recompute_count: u64,
}

impl VisibilityManager {
    /// Create a manager drawing every batch with `geometry`.
    pub fn new(config: VisibilityConfig, geometry: SharedGeometry) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            world: SparseWorld::new(),
            batches: BatchSet::new(geometry),
            last: None,
            force: false,
            recompute_count: 0,
        })
    }

    /// Create a manager whose shared geometry is the mesher's unit cube.
    pub fn with_mesher(config: VisibilityConfig, mesher: &ChunkMesher) -> Result<Self> {
        Self::new(config, SharedGeometry::new(mesher.unit_cube()))
    }

    #[inline]
    pub const fn config(&self) -> &VisibilityConfig {
        &self.config
    }

    #[inline]
    pub const fn world(&self) -> &SparseWorld {
        &self.world
    }

    #[inline]
    pub const fn batches(&self) -> &BatchSet {
        &self.batches
    }

    #[inline]
    pub fn batch(&self, block: BlockId) -> Option<&Batch> {
        self.batches.get(block)
    }

    /// Per-frame view of all non-empty batches, ordered by block id.
    pub fn snapshot(&self) -> Vec<BatchSnapshot<'_>> {
        self.batches.snapshot()
    }

    /// Number of full re-evaluations performed so far.
    #[inline]
    pub const fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    /// Viewer position used by the last full re-evaluation.
    pub fn last_viewer(&self) -> Option<Vec3> {
        self.last.map(|last| last.viewer)
    }

    /// Whether `pos` lies within the radius of the last evaluated viewer.
    ///
    /// Nothing is in range before the first evaluation.
    pub fn in_range(&self, pos: WorldPos) -> bool {
        self.last.is_some_and(|last| {
            pos.planar_distance_sq(last.viewer) <= self.config.radius * self.config.radius
        })
    }

    /// Record a voxel. Air is treated as removal.
    ///
    /// Returns `true` when the world changed.
    pub fn on_voxel_set(&mut self, pos: WorldPos, block: BlockId) -> bool {
        if block.is_air() {
            return self.on_voxel_remove(pos);
        }
        let previous = self.world.set(pos, block);
        if previous == Some(block) {
            return false;
        }
        if let Some(previous) = previous {
            self.batches.remove(pos, previous);
        }
        if self.in_range(pos) {
            self.batches.insert(pos, block);
        }
        true
    }

    /// Delete a voxel. Returns `true` when something was removed.
    pub fn on_voxel_remove(&mut self, pos: WorldPos) -> bool {
        match self.world.remove(pos) {
            Some(previous) => {
                self.batches.remove(pos, previous);
                true
            }
            None => false,
        }
    }

    /// Viewer moved; re-evaluate if the debounce policy allows.
    ///
    /// Returns `true` when a full re-evaluation ran.
    pub fn on_viewer_moved(&mut self, viewer: Vec3) -> bool {
        self.on_viewer_moved_at(viewer, Instant::now())
    }

    /// [`Self::on_viewer_moved`] with an explicit clock reading.
    pub fn on_viewer_moved_at(&mut self, viewer: Vec3, now: Instant) -> bool {
        if !self.should_recompute(viewer, now) {
            return false;
        }
        self.recompute(viewer, now);
        true
    }

    /// Drop the debounce state and re-evaluate at the last viewer position.
    ///
    /// Before the first evaluation there is no position to use, so the next
    /// viewer move re-evaluates instead. Returns `true` when a re-evaluation ran.
    pub fn force_refresh(&mut self) -> bool {
        self.force = true;
        match self.last {
            Some(last) => {
                self.recompute(last.viewer, Instant::now());
                true
            }
            None => false,
        }
    }

    /// Change the render radius and re-evaluate.
    pub fn set_radius(&mut self, radius: f32) -> Result<()> {
        let config = VisibilityConfig {
            radius,
            ..self.config.clone()
        };
        config.validate()?;
        self.config = config;
        self.force_refresh();
        Ok(())
    }

    /// Replace the world with a full block list and re-evaluate.
    ///
    /// Returns the number of solid voxels loaded.
    pub fn load_snapshot(&mut self, voxels: impl IntoIterator<Item = (WorldPos, BlockId)>) -> usize {
        self.world.clear();
        self.world.extend(voxels);
        self.batches.clear();
        debug!(voxels = self.world.len(), "world snapshot loaded");
        self.force_refresh();
        self.world.len()
    }

    /// Apply a stream of edits.
    ///
    /// Streams longer than `bulk_delta_threshold` are written to the world
    /// first and followed by one full re-evaluation. Returns the number of
    /// edits that changed the world.
    pub fn apply_deltas(&mut self, deltas: impl IntoIterator<Item = VoxelDelta>) -> usize {
        let deltas: Vec<VoxelDelta> = deltas.into_iter().collect();
        if deltas.len() <= self.config.bulk_delta_threshold {
            return deltas
                .iter()
                .filter(|delta| self.on_voxel_set(delta.pos(), delta.block()))
                .count();
        }

        let changed = deltas
            .iter()
            .filter(|delta| {
                let block = delta.block();
                let previous = self.world.set(delta.pos(), block);
                if block.is_air() {
                    previous.is_some()
                } else {
                    previous != Some(block)
                }
            })
            .count();
        debug!(deltas = deltas.len(), changed, "coalesced bulk update");
        if let Some(last) = self.last {
            self.recompute(last.viewer, Instant::now());
        }
        changed
    }

    fn should_recompute(&self, viewer: Vec3, now: Instant) -> bool {
        let Some(last) = self.last else {
            return true;
        };
        if self.force {
            return true;
        }
        let dx = viewer.x - last.viewer.x;
        let dz = viewer.z - last.viewer.z;
        let min_move = self.config.min_move_distance;
        if dx * dx + dz * dz > min_move * min_move {
            return true;
        }
        now.saturating_duration_since(last.at) >= self.config.refresh_interval()
    }

    /// Rebuild every batch from one pass over the world.
    fn recompute(&mut self, viewer: Vec3, now: Instant) {
        let radius_sq = self.config.radius * self.config.radius;
        let mut groups: HashMap<BlockId, (Vec<WorldPos>, Aabb)> = HashMap::new();

        for (pos, block) in self.world.iter() {
            if pos.planar_distance_sq(viewer) > radius_sq {
                continue;
            }
            let cube = Aabb::unit_cube(pos.to_vec3());
            groups
                .entry(block)
                .and_modify(|(instances, bounds)| {
                    instances.push(pos);
                    *bounds = bounds.merge(&cube);
                })
                .or_insert_with(|| (vec![pos], cube));
        }

        let visible: usize = groups.values().map(|(instances, _)| instances.len()).sum();
        self.batches.replace(groups.into_iter().map(|(block, (mut instances, bounds))| {
            instances.shrink_to_fit();
            Batch::from_parts(block, instances, bounds)
        }));

        self.last = Some(Evaluation { viewer, at: now });
        self.force = false;
        self.recompute_count += 1;

        debug!(
            viewer = ?viewer,
            world = self.world.len(),
            visible,
            batches = self.batches.len(),
            "visibility recomputed"
        );
    }
}
