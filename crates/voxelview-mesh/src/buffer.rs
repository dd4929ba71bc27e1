//! Mesh output buffers.

use glam::Vec3;
use voxelview_core::{Aabb, BoundingSphere};

/// Quad triangulation: two counter-clockwise triangles sharing the 0-2 diagonal.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Parallel vertex attribute arrays plus a triangle list.
///
/// Every attribute stores three floats per vertex. Buffers are built once and
/// never patched; a changed chunk gets a new buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffer {
    positions: Vec<f32>,
    normals: Vec<f32>,
    colors: Vec<f32>,
    indices: Vec<u32>,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty buffer with room for `faces` quads.
    pub fn with_face_capacity(faces: usize) -> Self {
        Self {
            positions: Vec::with_capacity(faces * 12),
            normals: Vec::with_capacity(faces * 12),
            colors: Vec::with_capacity(faces * 12),
            indices: Vec::with_capacity(faces * 6),
        }
    }

    /// Append one quad. Corners must be in counter-clockwise order seen
    /// from the side `normal` points to.
    pub fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3, color: [f32; 3]) {
        let base = self.vertex_count() as u32;
        for corner in corners {
            self.positions.extend_from_slice(&corner.to_array());
            self.normals.extend_from_slice(&normal.to_array());
            self.colors.extend_from_slice(&color);
        }
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
    }

    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    #[inline]
    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    #[inline]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Position of vertex `index`.
    #[inline]
    pub fn position(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[index * 3..index * 3 + 3])
    }

    /// Normal of vertex `index`.
    #[inline]
    pub fn normal(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.normals[index * 3..index * 3 + 3])
    }

    /// Color of vertex `index`.
    #[inline]
    pub fn color(&self, index: usize) -> [f32; 3] {
        [
            self.colors[index * 3],
            self.colors[index * 3 + 1],
            self.colors[index * 3 + 2],
        ]
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of quads (four vertices each).
    #[inline]
    pub fn face_count(&self) -> usize {
        self.vertex_count() / 4
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Raw bytes of the position stream for GPU upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw bytes of the normal stream for GPU upload.
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Raw bytes of the color stream for GPU upload.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Raw bytes of the index stream for GPU upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Bounds of all vertices, `None` for an empty mesh.
    pub fn aabb(&self) -> Option<Aabb> {
        let mut points = self.positions.chunks_exact(3).map(Vec3::from_slice);
        let first = points.next()?;
        let mut aabb = Aabb::new(first, first);
        for point in points {
            aabb.expand_to_include(point);
        }
        Some(aabb)
    }

    /// Sphere around [`Self::aabb`], `None` for an empty mesh.
    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        self.aabb().map(|aabb| aabb.bounding_sphere())
    }
}
