//! Visibility and streaming configuration.

use std::time::Duration;

use voxelview_core::{Error, Result};

/// Tuning for the sparse visibility manager and the chunk store.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityConfig {
    /// Planar render radius in voxels around the viewer.
    pub radius: f32,
    /// Planar viewer displacement that triggers a re-evaluation.
    pub min_move_distance: f32,
    /// Maximum time between re-evaluations while the viewer keeps moving.
    pub min_refresh_interval_ms: u64,
    /// Delta batches larger than this are applied with one full re-evaluation.
    pub bulk_delta_threshold: usize,
    /// Chunk columns within this planar radius (in chunks) are requested.
    pub chunk_load_radius: i32,
    /// Chunk columns beyond this planar radius (in chunks) are evicted.
    pub chunk_unload_radius: i32,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            radius: 64.0,
            min_move_distance: 4.0,
            min_refresh_interval_ms: 250,
            bulk_delta_threshold: 256,
            chunk_load_radius: 4,
            chunk_unload_radius: 6,
        }
    }
}

impl VisibilityConfig {
    /// Config with a different render radius.
    pub fn with_radius(radius: f32) -> Self {
        Self {
            radius,
            ..Default::default()
        }
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "radius must be positive, got {}",
                self.radius
            )));
        }
        if !(self.min_move_distance.is_finite() && self.min_move_distance >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "min_move_distance must be non-negative, got {}",
                self.min_move_distance
            )));
        }
        if self.bulk_delta_threshold == 0 {
            return Err(Error::InvalidConfig(
                "bulk_delta_threshold must be at least 1".to_string(),
            ));
        }
        if self.chunk_load_radius < 0 {
            return Err(Error::InvalidConfig(format!(
                "chunk_load_radius must be non-negative, got {}",
                self.chunk_load_radius
            )));
        }
        if self.chunk_unload_radius < self.chunk_load_radius {
            return Err(Error::InvalidConfig(format!(
                "chunk_unload_radius ({}) must not be smaller than chunk_load_radius ({})",
                self.chunk_unload_radius, self.chunk_load_radius
            )));
        }
        Ok(())
    }

    #[inline]
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.min_refresh_interval_ms)
    }
}
