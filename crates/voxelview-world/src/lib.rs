//! Visibility batching and chunk streaming for voxelview.
//!
//! Two paths keep renderable geometry in sync with the world authority:
//! - the chunk path: dense column payloads meshed by [`ChunkStore`]
//! - the sparse path: individual voxels batched per type by
//!   [`VisibilityManager`]

pub mod batch;
pub mod chunk;
pub mod chunk_store;
pub mod config;
pub mod delta;
pub mod visibility;

pub use batch::{Batch, BatchSet, BatchSnapshot, SharedGeometry};
pub use chunk::Chunk;
pub use chunk_store::ChunkStore;
pub use config::VisibilityConfig;
pub use delta::VoxelDelta;
pub use visibility::VisibilityManager;
