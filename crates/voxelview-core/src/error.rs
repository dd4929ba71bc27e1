//! Error types for voxelview.

use thiserror::Error;

use crate::coords::ChunkPos;

/// Workspace-wide error type.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// Chunk payload violates its shape contract
    #[error("Invalid chunk data: {0}")]
    InvalidChunkData(#[from] ChunkDataError),

    /// Edit addressed to a chunk column that is not loaded
    #[error("Chunk not loaded: {0}")]
    ChunkNotLoaded(ChunkPos),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Ways a chunk payload can be malformed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkDataError {
    /// Chunk size of zero
    #[error("chunk size must be positive")]
    ZeroChunkSize,

    /// Vertical range is empty or inverted
    #[error("y_max ({y_max}) must be greater than y_min ({y_min})")]
    EmptyHeightRange { y_min: i32, y_max: i32 },

    /// Data length does not match `chunk_size² × height`
    #[error("expected {expected} voxels, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// `chunk_size² × height` does not fit in memory addressing
    #[error("chunk of size {chunk_size} and height {height} is too large")]
    TooLarge { chunk_size: u32, height: u64 },

    /// Payload column size differs from the receiving store's
    #[error("chunk size {actual} does not match store chunk size {expected}")]
    ChunkSizeMismatch { expected: u32, actual: u32 },

    /// Payload vertical range differs from the receiving store's
    #[error("height range [{actual_min}, {actual_max}) does not match store range [{expected_min}, {expected_max})")]
    HeightRangeMismatch {
        expected_min: i32,
        expected_max: i32,
        actual_min: i32,
        actual_max: i32,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
