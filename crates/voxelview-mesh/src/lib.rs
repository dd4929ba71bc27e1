//! Chunk surface extraction for voxelview.
//!
//! Converts a dense [`ChunkGrid`](voxelview_voxel::ChunkGrid) into a mesh that
//! contains exactly its exposed faces, each flat-shaded by direction.

pub mod buffer;
pub mod mesher;
pub mod shading;

pub use buffer::MeshBuffer;
pub use mesher::ChunkMesher;
pub use shading::{hsl_to_rgb, FaceShading};
