//! Dense chunk column storage.

use serde::{Deserialize, Serialize};
use voxelview_core::{BlockId, ChunkDataError, Result};

/// Whole-chunk payload as delivered by the world authority.
///
/// `data` is laid out with X fastest, then Z, then Y:
/// `index(x, y_local, z) = (y_local * chunk_size + z) * chunk_size + x`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkPayload {
    pub chunk_size: u32,
    pub y_min: i32,
    pub y_max: i32,
    pub data: Vec<BlockId>,
}

impl ChunkPayload {
    /// Check the payload against its shape contract.
    pub fn validate(&self) -> Result<()> {
        ChunkGrid::expected_len(self.chunk_size, self.y_min, self.y_max).and_then(|expected| {
            if self.data.len() == expected {
                Ok(())
            } else {
                Err(ChunkDataError::LengthMismatch {
                    expected,
                    actual: self.data.len(),
                }
                .into())
            }
        })
    }
}

/// A dense chunk column of `chunk_size × height × chunk_size` voxels.
///
/// Every chunk spans the same world Y range `[y_min, y_max)`. Queries outside
/// the bounds resolve to air; they never wrap and never fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkGrid {
    chunk_size: u32,
    y_min: i32,
    y_max: i32,
    data: Vec<BlockId>,
}

impl ChunkGrid {
    /// Create an all-air grid.
    pub fn new(chunk_size: u32, y_min: i32, y_max: i32) -> Result<Self> {
        let len = Self::expected_len(chunk_size, y_min, y_max)?;
        Ok(Self {
            chunk_size,
            y_min,
            y_max,
            data: vec![BlockId::AIR; len],
        })
    }

    /// Wrap existing voxel data, rejecting any shape mismatch.
    pub fn from_data(data: Vec<BlockId>, chunk_size: u32, y_min: i32, y_max: i32) -> Result<Self> {
        let expected = Self::expected_len(chunk_size, y_min, y_max)?;
        if data.len() != expected {
            return Err(ChunkDataError::LengthMismatch {
                expected,
                actual: data.len(),
            }
            .into());
        }
        Ok(Self {
            chunk_size,
            y_min,
            y_max,
            data,
        })
    }

    /// Build a grid from an authority payload.
    pub fn from_payload(payload: ChunkPayload) -> Result<Self> {
        Self::from_data(payload.data, payload.chunk_size, payload.y_min, payload.y_max)
    }

    /// Number of voxels a chunk of this shape must contain.
    pub fn expected_len(chunk_size: u32, y_min: i32, y_max: i32) -> Result<usize> {
        if chunk_size == 0 {
            return Err(ChunkDataError::ZeroChunkSize.into());
        }
        if y_max <= y_min {
            return Err(ChunkDataError::EmptyHeightRange { y_min, y_max }.into());
        }
        let height = (i64::from(y_max) - i64::from(y_min)) as u64;
        usize::try_from(chunk_size)
            .ok()
            .and_then(|size| size.checked_mul(size))
            .zip(usize::try_from(height).ok())
            .and_then(|(area, height)| area.checked_mul(height))
            .ok_or_else(|| ChunkDataError::TooLarge { chunk_size, height }.into())
    }

    #[inline]
    pub const fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    #[inline]
    pub const fn y_min(&self) -> i32 {
        self.y_min
    }

    #[inline]
    pub const fn y_max(&self) -> i32 {
        self.y_max
    }

    /// Vertical extent in voxels.
    #[inline]
    pub const fn height(&self) -> u32 {
        (self.y_max as i64 - self.y_min as i64) as u32
    }

    /// Raw voxel data in payload order.
    #[inline]
    pub fn data(&self) -> &[BlockId] {
        &self.data
    }

    /// Linear index of a local position, `None` when out of bounds.
    #[inline]
    pub fn index(&self, x: i32, y_local: i32, z: i32) -> Option<usize> {
        let size = self.chunk_size as i64;
        let (x, y, z) = (i64::from(x), i64::from(y_local), i64::from(z));
        if x < 0 || z < 0 || y < 0 || x >= size || z >= size || y >= i64::from(self.height()) {
            return None;
        }
        Some(((y * size + z) * size + x) as usize)
    }

    /// Block at a local position; air outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y_local: i32, z: i32) -> BlockId {
        self.index(x, y_local, z)
            .map_or(BlockId::AIR, |index| self.data[index])
    }

    /// Block at local X/Z and world Y; air outside the grid.
    #[inline]
    pub fn get_world_y(&self, x: i32, y_world: i32, z: i32) -> BlockId {
        self.get(x, y_world - self.y_min, z)
    }

    /// Set the block at a local position.
    ///
    /// Returns `true` when the stored value changed. Writes outside the grid
    /// are ignored and return `false`.
    pub fn set(&mut self, x: i32, y_local: i32, z: i32, block: BlockId) -> bool {
        match self.index(x, y_local, z) {
            Some(index) if self.data[index] != block => {
                self.data[index] = block;
                true
            }
            _ => false,
        }
    }

    /// Number of non-air voxels.
    pub fn solid_count(&self) -> usize {
        self.data.iter().filter(|block| block.is_solid()).count()
    }

    /// Solid voxels as `(x, y_local, z, block)` in raster order (Y, then Z, then X).
    pub fn iter_solid(&self) -> impl Iterator<Item = (i32, i32, i32, BlockId)> + '_ {
        let size = self.chunk_size as usize;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, block)| block.is_solid())
            .map(move |(index, &block)| {
                let x = index % size;
                let z = (index / size) % size;
                let y = index / (size * size);
                (x as i32, y as i32, z as i32, block)
            })
    }
}
