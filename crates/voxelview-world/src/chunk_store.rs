//! Chunk column storage with radius-based streaming.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use glam::Vec3;
use hashbrown::HashMap;
use tracing::{debug, warn};
use voxelview_core::{BlockId, ChunkDataError, ChunkPos, Error, Result, WorldPos};
use voxelview_mesh::{ChunkMesher, MeshBuffer};
use voxelview_voxel::{ChunkGrid, ChunkPayload};

use crate::chunk::Chunk;
use crate::config::VisibilityConfig;

/// Priority entry for the chunk request queue.
#[derive(Debug, Clone, Copy)]
struct LoadPriority {
    pos: ChunkPos,
    /// Squared distance to the viewer's column (lower = higher priority).
    distance_sq: i64,
}

impl PartialEq for LoadPriority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LoadPriority {}

impl PartialOrd for LoadPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LoadPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; ties resolve by position so the order is stable
        other
            .distance_sq
            .cmp(&self.distance_sq)
            .then_with(|| (other.pos.x, other.pos.z).cmp(&(self.pos.x, self.pos.z)))
    }
}

/// Owns every loaded chunk column and its current mesh.
#[derive(Debug)]
pub struct ChunkStore {
    chunk_size: u32,
    /// Planar request radius in chunks.
    load_radius: i32,
    /// Planar eviction radius in chunks.
    unload_radius: i32,
    mesher: ChunkMesher,
    /// World Y range `[y_min, y_max)` fixed by the first accepted payload.
    height_range: Option<(i32, i32)>,
    chunks: HashMap<ChunkPos, Chunk>,
}

impl ChunkStore {
    /// Create an empty store for columns of `chunk_size`.
    pub fn new(chunk_size: u32, config: &VisibilityConfig, mesher: ChunkMesher) -> Result<Self> {
        if chunk_size == 0 {
            return Err(ChunkDataError::ZeroChunkSize.into());
        }
        config.validate()?;
        Ok(Self {
            chunk_size,
            load_radius: config.chunk_load_radius,
            unload_radius: config.chunk_unload_radius,
            mesher,
            height_range: None,
            chunks: HashMap::new(),
        })
    }

    #[inline]
    pub const fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Shared world Y range, once a payload has been accepted.
    #[inline]
    pub const fn height_range(&self) -> Option<(i32, i32)> {
        self.height_range
    }

    #[inline]
    pub const fn mesher(&self) -> &ChunkMesher {
        &self.mesher
    }

    /// Check if a chunk exists at the given position.
    pub fn contains(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    pub fn get(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    /// Get the number of loaded chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Check if no chunks are loaded.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Get all loaded chunk positions.
    pub fn positions(&self) -> Vec<ChunkPos> {
        self.chunks.keys().copied().collect()
    }

    /// Current mesh of a chunk, shared with the store.
    pub fn mesh(&self, pos: ChunkPos) -> Option<Arc<MeshBuffer>> {
        self.chunks.get(&pos).map(|chunk| Arc::clone(chunk.mesh()))
    }

    /// Every loaded chunk's mesh with the translation that places it.
    pub fn meshes(&self) -> impl Iterator<Item = (ChunkPos, Vec3, &Arc<MeshBuffer>)> + '_ {
        let size = self.chunk_size;
        self.chunks
            .iter()
            .map(move |(&pos, chunk)| (pos, pos.mesh_origin(size), chunk.mesh()))
    }

    /// Exposed faces across all loaded chunks.
    pub fn total_faces(&self) -> usize {
        self.chunks.values().map(Chunk::face_count).sum()
    }

    /// Get total memory usage of all chunks.
    pub fn memory_usage(&self) -> usize {
        self.chunks.values().map(Chunk::memory_usage).sum()
    }

    /// Validate a payload, mesh it, and install it at `pos`.
    ///
    /// The chunk is replaced in one step after the new mesh is complete. A
    /// rejected payload leaves any existing chunk at `pos` untouched. All
    /// columns share one Y range; the first accepted payload fixes it.
    pub fn insert_payload(&mut self, pos: ChunkPos, payload: ChunkPayload) -> Result<()> {
        let grid = self
            .check_shape(&payload)
            .and_then(|()| ChunkGrid::from_payload(payload))
            .inspect_err(|err| warn!(%pos, error = %err, "rejected chunk payload"))?;
        self.height_range.get_or_insert((grid.y_min(), grid.y_max()));

        let chunk = Chunk::build(pos, grid, &self.mesher);
        debug!(%pos, faces = chunk.face_count(), "chunk meshed");
        self.chunks.insert(pos, chunk);
        Ok(())
    }

    fn check_shape(&self, payload: &ChunkPayload) -> Result<()> {
        if payload.chunk_size != self.chunk_size {
            return Err(ChunkDataError::ChunkSizeMismatch {
                expected: self.chunk_size,
                actual: payload.chunk_size,
            }
            .into());
        }
        match self.height_range {
            Some((y_min, y_max)) if (payload.y_min, payload.y_max) != (y_min, y_max) => {
                Err(ChunkDataError::HeightRangeMismatch {
                    expected_min: y_min,
                    expected_max: y_max,
                    actual_min: payload.y_min,
                    actual_max: payload.y_max,
                }
                .into())
            }
            _ => Ok(()),
        }
    }

    /// Remove a chunk at the given position.
    pub fn remove(&mut self, pos: ChunkPos) -> Option<Chunk> {
        self.chunks.remove(&pos)
    }

    /// Block at a world position; air when the column is not loaded.
    pub fn block_at(&self, pos: WorldPos) -> BlockId {
        let (x, z) = pos.local_xz(self.chunk_size);
        self.chunks
            .get(&pos.chunk_pos(self.chunk_size))
            .map_or(BlockId::AIR, |chunk| {
                chunk.grid().get_world_y(x as i32, pos.y, z as i32)
            })
    }

    /// Edit one voxel and rebuild the owning chunk's mesh.
    ///
    /// Returns `true` if the block changed.
    pub fn set_voxel(&mut self, pos: WorldPos, block: BlockId) -> Result<bool> {
        let chunk_pos = pos.chunk_pos(self.chunk_size);
        let chunk = self
            .chunks
            .get_mut(&chunk_pos)
            .ok_or(Error::ChunkNotLoaded(chunk_pos))?;
        let (x, z) = pos.local_xz(self.chunk_size);
        let changed = chunk.set_block(x as i32, pos.y, z as i32, block, &self.mesher);
        if changed {
            debug!(
                pos = %chunk_pos,
                revision = chunk.revision(),
                faces = chunk.face_count(),
                "chunk remeshed"
            );
        }
        Ok(changed)
    }

    /// Evict chunks beyond the unload radius of the viewer's column.
    ///
    /// Returns the evicted positions, sorted.
    pub fn update_viewer(&mut self, viewer: Vec3) -> Vec<ChunkPos> {
        let center = ChunkPos::from_world(viewer, self.chunk_size);
        let limit = i64::from(self.unload_radius) * i64::from(self.unload_radius);

        let mut evicted: Vec<ChunkPos> = self
            .chunks
            .keys()
            .filter(|pos| pos.distance_sq(center) > limit)
            .copied()
            .collect();
        for pos in &evicted {
            self.chunks.remove(pos);
        }
        evicted.sort_unstable_by_key(|pos| (pos.x, pos.z));

        if !evicted.is_empty() {
            debug!(%center, evicted = evicted.len(), remaining = self.chunks.len(), "chunks evicted");
        }
        evicted
    }

    /// Unloaded columns within the load radius, nearest first.
    pub fn missing_chunks(&self, viewer: Vec3) -> Vec<ChunkPos> {
        let center = ChunkPos::from_world(viewer, self.chunk_size);
        let r = self.load_radius;
        let limit = i64::from(r) * i64::from(r);

        let mut queue = BinaryHeap::new();
        for dz in -r..=r {
            for dx in -r..=r {
                let pos = ChunkPos::new(center.x + dx, center.z + dz);
                let distance_sq = pos.distance_sq(center);
                if distance_sq <= limit && !self.chunks.contains_key(&pos) {
                    queue.push(LoadPriority { pos, distance_sq });
                }
            }
        }

        let mut missing = Vec::with_capacity(queue.len());
        while let Some(entry) = queue.pop() {
            missing.push(entry.pos);
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: u32 = 4;

    fn store() -> ChunkStore {
        let config = VisibilityConfig {
            chunk_load_radius: 2,
            chunk_unload_radius: 3,
            ..Default::default()
        };
        ChunkStore::new(SIZE, &config, ChunkMesher::default()).unwrap()
    }

    fn payload(solid: &[(usize, BlockId)]) -> ChunkPayload {
        let mut data = vec![BlockId::AIR; (SIZE * SIZE * 4) as usize];
        for &(index, block) in solid {
            data[index] = block;
        }
        ChunkPayload {
            chunk_size: SIZE,
            y_min: 0,
            y_max: 4,
            data,
        }
    }

    #[test]
    fn load_priority_ordering() {
        let mut heap = BinaryHeap::new();
        for (x, distance_sq) in [(10, 100), (1, 1), (5, 25)] {
            heap.push(LoadPriority {
                pos: ChunkPos::new(x, 0),
                distance_sq,
            });
        }

        // Closest should come first
        assert_eq!(heap.pop().unwrap().distance_sq, 1);
        assert_eq!(heap.pop().unwrap().distance_sq, 25);
        assert_eq!(heap.pop().unwrap().distance_sq, 100);
    }

    #[test]
    fn insert_and_retrieve() {
        let mut store = store();
        let pos = ChunkPos::new(1, -2);
        store.insert_payload(pos, payload(&[(0, BlockId::STONE)])).unwrap();

        assert!(store.contains(pos));
        assert_eq!(store.len(), 1);
        assert_eq!(store.total_faces(), 6);
        assert_eq!(store.mesh(pos).unwrap().face_count(), 6);
    }

    #[test]
    fn invalid_payload_keeps_existing_chunk() {
        let mut store = store();
        let pos = ChunkPos::new(0, 0);
        store.insert_payload(pos, payload(&[(5, BlockId::WOOD)])).unwrap();
        let before = store.mesh(pos).unwrap();

        let mut short = payload(&[]);
        short.data.pop();
        assert!(matches!(
            store.insert_payload(pos, short),
            Err(Error::InvalidChunkData(ChunkDataError::LengthMismatch { .. }))
        ));

        let mut resized = payload(&[]);
        resized.chunk_size = 8;
        assert_eq!(
            store.insert_payload(pos, resized),
            Err(Error::InvalidChunkData(ChunkDataError::ChunkSizeMismatch {
                expected: SIZE,
                actual: 8
            }))
        );

        assert!(Arc::ptr_eq(&before, &store.mesh(pos).unwrap()));
    }

    #[test]
    fn columns_share_first_height_range() {
        let mut store = store();
        assert_eq!(store.height_range(), None);
        store.insert_payload(ChunkPos::new(0, 0), payload(&[])).unwrap();
        assert_eq!(store.height_range(), Some((0, 4)));

        // Same voxel count, shifted range
        let mut shifted = payload(&[(0, BlockId::STONE)]);
        shifted.y_min = 10;
        shifted.y_max = 14;
        assert_eq!(
            store.insert_payload(ChunkPos::new(1, 0), shifted),
            Err(Error::InvalidChunkData(ChunkDataError::HeightRangeMismatch {
                expected_min: 0,
                expected_max: 4,
                actual_min: 10,
                actual_max: 14
            }))
        );
        assert!(!store.contains(ChunkPos::new(1, 0)));
    }

    #[test]
    fn replacing_payload_swaps_mesh() {
        let mut store = store();
        let pos = ChunkPos::new(0, 0);
        store.insert_payload(pos, payload(&[(0, BlockId::STONE)])).unwrap();
        let held = store.mesh(pos).unwrap();
        store.insert_payload(pos, payload(&[])).unwrap();
        assert_eq!(held.face_count(), 6);
        assert!(store.mesh(pos).unwrap().is_empty());
    }

    #[test]
    fn set_voxel_remeshes_owning_chunk() {
        let mut store = store();
        store.insert_payload(ChunkPos::new(-1, 0), payload(&[])).unwrap();

        let pos = WorldPos::new(-1, 2, 3);
        assert_eq!(store.set_voxel(pos, BlockId::GLASS), Ok(true));
        assert_eq!(store.set_voxel(pos, BlockId::GLASS), Ok(false));
        assert_eq!(store.block_at(pos), BlockId::GLASS);
        assert_eq!(store.get(ChunkPos::new(-1, 0)).unwrap().grid().get(3, 2, 3), BlockId::GLASS);
        assert_eq!(store.total_faces(), 6);
    }

    #[test]
    fn set_voxel_in_missing_chunk_fails() {
        let mut store = store();
        assert_eq!(
            store.set_voxel(WorldPos::new(9, 0, 0), BlockId::STONE),
            Err(Error::ChunkNotLoaded(ChunkPos::new(2, 0)))
        );
        assert_eq!(store.block_at(WorldPos::new(9, 0, 0)), BlockId::AIR);
    }

    #[test]
    fn missing_chunks_are_nearest_first() {
        let mut store = store();
        store.insert_payload(ChunkPos::new(0, 0), payload(&[])).unwrap();

        let missing = store.missing_chunks(Vec3::new(1.0, 60.0, 1.0));
        assert!(!missing.contains(&ChunkPos::new(0, 0)));
        // Disc of radius 2 has 13 columns, one loaded
        assert_eq!(missing.len(), 12);
        let distances: Vec<i64> = missing
            .iter()
            .map(|pos| pos.distance_sq(ChunkPos::new(0, 0)))
            .collect();
        assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(distances[0], 1);
    }

    #[test]
    fn viewer_moving_away_evicts_distant_chunks() {
        let mut store = store();
        for x in -1..=1 {
            store.insert_payload(ChunkPos::new(x, 0), payload(&[])).unwrap();
        }
        assert!(store.update_viewer(Vec3::new(2.0, 0.0, 2.0)).is_empty());

        // Viewer column (4, 0): (0,0) is 4 away, (1,0) is 3 away
        let evicted = store.update_viewer(Vec3::new(17.0, 0.0, 1.0));
        assert_eq!(evicted, vec![ChunkPos::new(-1, 0), ChunkPos::new(0, 0)]);
        assert_eq!(store.positions(), vec![ChunkPos::new(1, 0)]);
    }

    #[test]
    fn rejects_zero_chunk_size() {
        assert!(ChunkStore::new(0, &VisibilityConfig::default(), ChunkMesher::default()).is_err());
    }
}
