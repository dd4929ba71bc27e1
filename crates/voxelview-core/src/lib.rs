//! Core types, math, and errors for voxelview.
//!
//! This crate provides the foundational types shared by every other crate:
//! - Block type codes
//! - Coordinate systems (world voxel positions, chunk columns)
//! - Bounding volumes and frustum tests
//! - The workspace error type

pub mod coords;
pub mod error;
pub mod math;
pub mod types;

pub use coords::{ChunkPos, WorldPos};
pub use error::{ChunkDataError, Error, Result};
pub use math::{Aabb, BoundingSphere, Frustum};
pub use types::BlockId;

/// World-wide constants shared by the authority and the renderer.
pub mod constants {
    /// Default horizontal size of a chunk column in voxels.
    pub const DEFAULT_CHUNK_SIZE: u32 = 16;
    /// Lowest world-space Y covered by chunk payloads (inclusive).
    pub const WORLD_MIN_Y: i32 = 0;
    /// Highest world-space Y covered by chunk payloads (exclusive).
    pub const WORLD_MAX_Y: i32 = 128;
}
