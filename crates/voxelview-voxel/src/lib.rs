//! Voxel storage and face culling for voxelview.
//!
//! Two grid forms share one culling path:
//! - [`ChunkGrid`]: a dense, bounded chunk column addressed in local coordinates
//! - [`SparseWorld`]: an unbounded map of world coordinates to block types

pub mod cull;
pub mod grid;
pub mod sparse;

pub use cull::{count_exposed_faces, Direction, FaceCuller, FaceMask, SolidQuery};
pub use grid::{ChunkGrid, ChunkPayload};
pub use sparse::SparseWorld;
