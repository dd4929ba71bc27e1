//! Face-culled chunk meshing.

use glam::Vec3;
use tracing::trace;
use voxelview_core::{BlockId, Result};
use voxelview_voxel::{ChunkGrid, Direction, FaceCuller, FaceMask};

use crate::buffer::MeshBuffer;
use crate::shading::FaceShading;

/// Corner offsets from a voxel's minimum corner, per direction.
///
/// Each quad is counter-clockwise seen from outside the voxel. The layout is
/// fixed so the shared plane between two chunks gets identical corners.
const FACE_CORNERS: [[[f32; 3]; 4]; 6] = [
    // -X
    [[0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]],
    // +X
    [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]],
    // -Y
    [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
    // +Y
    [[0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
    // -Z
    [[0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]],
    // +Z
    [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
];

/// Builds flat-shaded meshes containing exactly the exposed faces of a chunk.
///
/// Vertex X/Z are chunk-local and vertex Y is world-space, so a renderer
/// places a chunk mesh by translating it with
/// [`ChunkPos::mesh_origin`](voxelview_core::ChunkPos::mesh_origin).
#[derive(Clone, Debug)]
pub struct ChunkMesher {
    shading: FaceShading,
    palette: [[f32; 3]; 6],
}

impl Default for ChunkMesher {
    fn default() -> Self {
        Self::new(FaceShading::default())
    }
}

impl ChunkMesher {
    pub fn new(shading: FaceShading) -> Self {
        Self {
            palette: shading.palette(),
            shading,
        }
    }

    pub const fn shading(&self) -> &FaceShading {
        &self.shading
    }

    /// Mesh a chunk grid.
    ///
    /// Voxels are visited Y-outer, then Z, then X; faces of one voxel are
    /// emitted in [`Direction::ALL`] order. The result is a pure function of
    /// the grid.
    pub fn build_mesh(&self, grid: &ChunkGrid) -> MeshBuffer {
        let culler = FaceCuller::new(grid);
        let y_min = grid.y_min();

        let exposed: Vec<(i32, i32, i32, FaceMask)> = grid
            .iter_solid()
            .map(|(x, y, z, _)| (x, y, z, culler.exposed_faces(x, y, z)))
            .filter(|(_, _, _, mask)| !mask.is_empty())
            .collect();
        let face_count = exposed.iter().map(|(.., mask)| mask.count() as usize).sum();

        let mut mesh = MeshBuffer::with_face_capacity(face_count);
        for (x, y_local, z, mask) in exposed {
            let corner = Vec3::new(x as f32, (y_local + y_min) as f32, z as f32);
            for direction in mask.directions() {
                self.emit_face(&mut mesh, corner, direction);
            }
        }

        trace!(
            chunk_size = grid.chunk_size(),
            height = grid.height(),
            faces = face_count,
            "built chunk mesh"
        );
        mesh
    }

    /// Validate raw chunk data and mesh it.
    ///
    /// Shape mismatches are rejected with
    /// [`Error::InvalidChunkData`](voxelview_core::Error::InvalidChunkData);
    /// nothing is meshed in that case.
    pub fn build_mesh_from_data(
        &self,
        data: &[BlockId],
        chunk_size: u32,
        y_min: i32,
        y_max: i32,
    ) -> Result<MeshBuffer> {
        let grid = ChunkGrid::from_data(data.to_vec(), chunk_size, y_min, y_max)?;
        Ok(self.build_mesh(&grid))
    }

    /// Mesh of a single unit cube spanning `[0, 1]³`.
    ///
    /// This is the shared instance geometry for batched voxels.
    pub fn unit_cube(&self) -> MeshBuffer {
        let mut mesh = MeshBuffer::with_face_capacity(6);
        for direction in Direction::ALL {
            self.emit_face(&mut mesh, Vec3::ZERO, direction);
        }
        mesh
    }

    fn emit_face(&self, mesh: &mut MeshBuffer, corner: Vec3, direction: Direction) {
        let corners = FACE_CORNERS[direction.index()].map(|offset| corner + Vec3::from(offset));
        mesh.push_quad(corners, direction.normal(), self.palette[direction.index()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use voxelview_core::{ChunkDataError, ChunkPos, Error};
    use voxelview_voxel::count_exposed_faces;

    fn grid_with(chunk_size: u32, y_min: i32, y_max: i32, solid: &[(i32, i32, i32)]) -> ChunkGrid {
        let mut grid = ChunkGrid::new(chunk_size, y_min, y_max).unwrap();
        for &(x, y, z) in solid {
            grid.set(x, y, z, BlockId::STONE);
        }
        grid
    }

    fn normal_of_face(mesh: &MeshBuffer, face: usize) -> Vec3 {
        mesh.normal(face * 4)
    }

    #[test]
    fn single_voxel_chunk_end_to_end() {
        let data = [1, 0, 0, 0].map(BlockId).to_vec();
        let mesh = ChunkMesher::default()
            .build_mesh_from_data(&data, 2, 0, 1)
            .unwrap();

        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.indices().len(), 36);
        assert_eq!(mesh.positions().len(), 72);
        assert_eq!(mesh.normals().len(), 72);
        assert_eq!(mesh.colors().len(), 72);

        for vertex in 0..mesh.vertex_count() {
            let normal = mesh.normal(vertex);
            assert_relative_eq!(normal.length(), 1.0);
            assert_eq!(normal.abs().max_element(), 1.0);
        }

        let shading = FaceShading::default();
        assert!(shading.shade(Direction::PosY) > shading.shade(Direction::NegY));
        let top = mesh.color(Direction::PosY.index() * 4);
        let bottom = mesh.color(Direction::NegY.index() * 4);
        assert!(top.iter().sum::<f32>() > bottom.iter().sum::<f32>());
    }

    #[test]
    fn solid_chunk_emits_only_outer_shell() {
        let n = 4;
        let data = vec![BlockId::STONE; (n * n * n) as usize];
        let mesh = ChunkMesher::default()
            .build_mesh_from_data(&data, n, 0, n as i32)
            .unwrap();
        assert_eq!(mesh.face_count(), 6 * (n * n) as usize);

        // Every quad lies on one of the six outer planes
        for face in 0..mesh.face_count() {
            let normal = normal_of_face(&mesh, face);
            let plane = mesh.position(face * 4).dot(normal.abs());
            assert!(plane == 0.0 || plane == n as f32);
        }
    }

    #[test]
    fn corner_voxel_emits_out_of_bounds_faces() {
        let grid = grid_with(3, 0, 3, &[(0, 0, 0), (1, 0, 0), (0, 1, 0), (0, 0, 1)]);
        let mesh = ChunkMesher::default().build_mesh(&grid);
        let first_voxel_normals: Vec<Vec3> = (0..3).map(|face| normal_of_face(&mesh, face)).collect();
        assert_eq!(first_voxel_normals, vec![Vec3::NEG_X, Vec3::NEG_Y, Vec3::NEG_Z]);
        assert_eq!(mesh.face_count(), count_exposed_faces(&grid));
    }

    #[test]
    fn meshing_is_idempotent() {
        let grid = grid_with(4, -2, 3, &[(0, 0, 0), (1, 1, 1), (3, 4, 3), (2, 0, 3), (2, 1, 3)]);
        let mesher = ChunkMesher::default();
        let a = mesher.build_mesh(&grid);
        let b = mesher.build_mesh(&grid);
        assert_eq!(a, b);
        assert_eq!(a.position_bytes(), b.position_bytes());
        assert_eq!(a.color_bytes(), b.color_bytes());
        assert_eq!(a.index_bytes(), b.index_bytes());
    }

    #[test]
    fn triangles_wind_counter_clockwise_from_outside() {
        let mesh = ChunkMesher::default().unit_cube();
        for triangle in mesh.indices().chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|i| mesh.position(triangle[i] as usize));
            let geometric = (b - a).cross(c - a).normalize();
            let declared = mesh.normal(triangle[0] as usize);
            assert_relative_eq!(geometric.dot(declared), 1.0);
            // Normal points away from the cube centre
            let centroid = (a + b + c) / 3.0;
            assert!((centroid - Vec3::splat(0.5)).dot(declared) > 0.0);
        }
    }

    #[test]
    fn y_uses_world_space() {
        let grid = grid_with(2, 64, 66, &[(0, 1, 0)]);
        let aabb = ChunkMesher::default().build_mesh(&grid).aabb().unwrap();
        assert_eq!(aabb.min, Vec3::new(0.0, 65.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 66.0, 1.0));
    }

    #[test]
    fn adjacent_chunks_share_boundary_quads() {
        let size = 4;
        let left = grid_with(size, 0, 2, &[(3, 1, 2)]);
        let right = grid_with(size, 0, 2, &[(0, 1, 2)]);
        let mesher = ChunkMesher::default();
        let left_origin = ChunkPos::new(0, 0).mesh_origin(size);
        let right_origin = ChunkPos::new(1, 0).mesh_origin(size);

        let world_quad = |mesh: &MeshBuffer, origin: Vec3, normal: Vec3| {
            let face = (0..mesh.face_count())
                .find(|&face| normal_of_face(mesh, face) == normal)
                .unwrap();
            let mut corners: Vec<[i32; 3]> = (0..4)
                .map(|i| (mesh.position(face * 4 + i) + origin).as_ivec3().to_array())
                .collect();
            corners.sort_unstable();
            corners
        };

        let left_face = world_quad(&mesher.build_mesh(&left), left_origin, Vec3::X);
        let right_face = world_quad(&mesher.build_mesh(&right), right_origin, Vec3::NEG_X);
        assert_eq!(left_face, right_face);
    }

    #[test]
    fn rejects_size_mismatch_without_meshing() {
        let mesher = ChunkMesher::default();
        let err = mesher
            .build_mesh_from_data(&[BlockId::STONE; 5], 2, 0, 1)
            .unwrap_err();
        assert_eq!(
            err,
            Error::InvalidChunkData(ChunkDataError::LengthMismatch {
                expected: 4,
                actual: 5
            })
        );
        assert!(mesher
            .build_mesh_from_data(&[BlockId::STONE; 4], 2, 1, 1)
            .is_err());
    }

    #[test]
    fn oversized_shape_is_an_error_not_an_empty_mesh() {
        let result = ChunkMesher::default().build_mesh_from_data(&[], 131_072, 0, 1 << 30);
        assert!(matches!(
            result,
            Err(Error::InvalidChunkData(ChunkDataError::TooLarge { .. }))
        ));
    }

    #[test]
    fn empty_chunk_yields_empty_mesh() {
        let grid = ChunkGrid::new(8, 0, 8).unwrap();
        assert!(ChunkMesher::default().build_mesh(&grid).is_empty());
    }
}
