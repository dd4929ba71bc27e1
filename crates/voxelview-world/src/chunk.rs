//! A loaded chunk column and its mesh.

use std::sync::Arc;

use voxelview_core::{BlockId, ChunkPos};
use voxelview_mesh::{ChunkMesher, MeshBuffer};
use voxelview_voxel::ChunkGrid;

/// Voxel data of one column plus the mesh last built from it.
///
/// The mesh is replaced whole on every edit. Readers holding the previous
/// `Arc` keep a complete buffer until they drop it.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Position in chunk coordinates.
    pub pos: ChunkPos,
    grid: ChunkGrid,
    mesh: Arc<MeshBuffer>,
    /// Bumped on every mesh rebuild.
    revision: u64,
}

impl Chunk {
    /// Mesh `grid` and wrap both.
    pub fn build(pos: ChunkPos, grid: ChunkGrid, mesher: &ChunkMesher) -> Self {
        let mesh = Arc::new(mesher.build_mesh(&grid));
        Self {
            pos,
            grid,
            mesh,
            revision: 0,
        }
    }

    #[inline]
    pub const fn grid(&self) -> &ChunkGrid {
        &self.grid
    }

    #[inline]
    pub const fn mesh(&self) -> &Arc<MeshBuffer> {
        &self.mesh
    }

    #[inline]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of exposed faces in the current mesh.
    pub fn face_count(&self) -> usize {
        self.mesh.face_count()
    }

    /// Check if this chunk holds no solid voxels.
    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }

    /// Write one voxel at local X/Z and world Y, remeshing on change.
    ///
    /// Returns `true` if the stored block changed. Positions outside the
    /// column's vertical range are ignored.
    pub fn set_block(
        &mut self,
        local_x: i32,
        world_y: i32,
        local_z: i32,
        block: BlockId,
        mesher: &ChunkMesher,
    ) -> bool {
        let y_local = world_y - self.grid.y_min();
        if !self.grid.set(local_x, y_local, local_z, block) {
            return false;
        }
        self.mesh = Arc::new(mesher.build_mesh(&self.grid));
        self.revision += 1;
        true
    }

    /// Approximate heap plus inline size in bytes.
    pub fn memory_usage(&self) -> usize {
        let mesh = &self.mesh;
        std::mem::size_of::<Self>()
            + std::mem::size_of_val(self.grid.data())
            + std::mem::size_of_val(mesh.positions())
            + std::mem::size_of_val(mesh.normals())
            + std::mem::size_of_val(mesh.colors())
            + std::mem::size_of_val(mesh.indices())
    }
}
