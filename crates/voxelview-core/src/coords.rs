//! Coordinate systems for the voxel world.
//!
//! Chunks are vertical columns: every chunk spans the shared world Y range,
//! so a chunk is addressed by its X/Z column only.

use glam::{IVec3, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// World position in voxel coordinates.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct WorldPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl WorldPos {
    /// Create a new world position
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Position shifted by the given offset, wrapping at the `i32` limits.
    #[inline]
    pub const fn offset(self, delta: IVec3) -> Self {
        Self::new(
            self.x.wrapping_add(delta.x),
            self.y.wrapping_add(delta.y),
            self.z.wrapping_add(delta.z),
        )
    }

    /// Position shifted by the given offset, `None` past the `i32` limits.
    #[inline]
    pub const fn checked_offset(self, delta: IVec3) -> Option<Self> {
        match (
            self.x.checked_add(delta.x),
            self.y.checked_add(delta.y),
            self.z.checked_add(delta.z),
        ) {
            (Some(x), Some(y), Some(z)) => Some(Self::new(x, y, z)),
            _ => None,
        }
    }

    /// Get the chunk column containing this position
    #[inline]
    pub const fn chunk_pos(self, chunk_size: u32) -> ChunkPos {
        let size = chunk_size as i32;
        ChunkPos::new(self.x.div_euclid(size), self.z.div_euclid(size))
    }

    /// Local X/Z within the containing chunk column.
    #[inline]
    pub const fn local_xz(self, chunk_size: u32) -> (u32, u32) {
        let size = chunk_size as i32;
        (
            self.x.rem_euclid(size) as u32,
            self.z.rem_euclid(size) as u32,
        )
    }

    /// Squared distance to `viewer` on the horizontal (X/Z) plane.
    ///
    /// The voxel's integer coordinates are used as its position; Y is ignored.
    #[inline]
    pub fn planar_distance_sq(self, viewer: Vec3) -> f32 {
        let dx = self.x as f32 - viewer.x;
        let dz = self.z as f32 - viewer.z;
        dx * dx + dz * dz
    }

    /// Convert to floating point Vec3
    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }

    /// Convert to glam IVec3
    #[inline]
    pub const fn to_ivec3(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }
}

impl From<IVec3> for WorldPos {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for WorldPos {
    fn from(v: Vec3) -> Self {
        Self::new(v.x.floor() as i32, v.y.floor() as i32, v.z.floor() as i32)
    }
}

/// Chunk column position in chunk coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    /// Create a new chunk position
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk column containing a floating point world position.
    #[inline]
    pub fn from_world(pos: Vec3, chunk_size: u32) -> Self {
        WorldPos::from(pos).chunk_pos(chunk_size)
    }

    /// World X/Z of the column's minimum corner.
    #[inline]
    pub const fn origin_xz(self, chunk_size: u32) -> (i32, i32) {
        let size = chunk_size as i32;
        (self.x * size, self.z * size)
    }

    /// World-space translation that places chunk-local mesh vertices.
    ///
    /// Chunk meshes carry world Y already, so only X/Z are offset.
    #[inline]
    pub fn mesh_origin(self, chunk_size: u32) -> Vec3 {
        let (x, z) = self.origin_xz(chunk_size);
        Vec3::new(x as f32, 0.0, z as f32)
    }

    /// World X/Z of the column centre.
    #[inline]
    pub fn center_xz(self, chunk_size: u32) -> Vec2 {
        let half = chunk_size as f32 * 0.5;
        let (x, z) = self.origin_xz(chunk_size);
        Vec2::new(x as f32 + half, z as f32 + half)
    }

    /// Squared distance in chunk units to another column.
    #[inline]
    pub const fn distance_sq(self, other: Self) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dz = (self.z - other.z) as i64;
        dx * dx + dz * dz
    }

    /// Get the four horizontally neighboring chunk columns
    pub const fn neighbors(self) -> [Self; 4] {
        [
            Self::new(self.x - 1, self.z),
            Self::new(self.x + 1, self.z),
            Self::new(self.x, self.z - 1),
            Self::new(self.x, self.z + 1),
        ]
    }
}

impl std::fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_pos_chunk_local_roundtrip() {
        let world = WorldPos::new(100, -50, 200);
        let chunk = world.chunk_pos(16);
        let (lx, lz) = world.local_xz(16);
        let (ox, oz) = chunk.origin_xz(16);
        assert_eq!(ox + lx as i32, world.x);
        assert_eq!(oz + lz as i32, world.z);
    }

    #[test]
    fn negative_world_pos_chunk() {
        let world = WorldPos::new(-1, 5, -17);
        assert_eq!(world.chunk_pos(16), ChunkPos::new(-1, -2));
        assert_eq!(world.local_xz(16), (15, 15));
    }

    #[test]
    fn offsets_at_coordinate_limits() {
        let edge = WorldPos::new(i32::MAX, 0, i32::MIN);
        assert_eq!(edge.checked_offset(IVec3::X), None);
        assert_eq!(edge.checked_offset(IVec3::NEG_Z), None);
        assert_eq!(
            edge.checked_offset(IVec3::NEG_X),
            Some(WorldPos::new(i32::MAX - 1, 0, i32::MIN))
        );
        assert_eq!(edge.offset(IVec3::X), WorldPos::new(i32::MIN, 0, i32::MIN));
    }

    #[test]
    fn planar_distance_ignores_height() {
        let voxel = WorldPos::new(3, 1000, 4);
        assert_eq!(voxel.planar_distance_sq(Vec3::new(0.0, -20.0, 0.0)), 25.0);
    }

    #[test]
    fn chunk_from_world_floors() {
        assert_eq!(ChunkPos::from_world(Vec3::new(15.9, 0.0, 0.0), 16), ChunkPos::new(0, 0));
        assert_eq!(
            ChunkPos::from_world(Vec3::new(-0.1, 0.0, 16.0), 16),
            ChunkPos::new(-1, 1)
        );
    }

    #[test]
    fn chunk_center_and_origin() {
        let chunk = ChunkPos::new(1, -1);
        assert_eq!(chunk.mesh_origin(16), Vec3::new(16.0, 0.0, -16.0));
        assert_eq!(chunk.center_xz(16), Vec2::new(24.0, -8.0));
    }
}
