//! Procedural terrain and structures for the demo world.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use voxelview_core::constants::{DEFAULT_CHUNK_SIZE, WORLD_MAX_Y, WORLD_MIN_Y};
use voxelview_core::{BlockId, ChunkPos, WorldPos};
use voxelview_voxel::ChunkPayload;
use voxelview_world::VoxelDelta;

/// Terrain generator configuration.
#[derive(Debug, Clone)]
pub struct TerrainConfig {
    /// Seed for noise generation.
    pub seed: u32,
    /// Mean surface height.
    pub base_height: f64,
    /// Amplitude of the broad hills.
    pub hill_height: f64,
    /// Amplitude of the small bumps on top.
    pub detail_height: f64,
    /// Frequency of the broad hills.
    pub hill_frequency: f64,
    /// Frequency of the small bumps.
    pub detail_frequency: f64,
    /// Columns lower than this are flooded.
    pub sea_level: i32,
    /// Depth of dirt layer below surface.
    pub dirt_depth: i32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            base_height: 40.0,
            hill_height: 20.0,
            detail_height: 5.0,
            hill_frequency: 0.02,
            detail_frequency: 0.1,
            sea_level: 30,
            dirt_depth: 3,
        }
    }
}

/// Heightfield terrain sampled from two fractal noise layers.
pub struct TerrainGenerator {
    config: TerrainConfig,
    hills: Fbm<Perlin>,
    detail: Fbm<Perlin>,
}

impl TerrainGenerator {
    pub fn new(config: TerrainConfig) -> Self {
        let hills = Fbm::<Perlin>::new(config.seed).set_octaves(4);
        let detail = Fbm::<Perlin>::new(config.seed.wrapping_add(1)).set_octaves(2);
        Self {
            config,
            hills,
            detail,
        }
    }

    /// Surface Y at a world column, clamped into the world's height range.
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        let c = &self.config;
        let (x, z) = (f64::from(x), f64::from(z));
        let hills = self.hills.get([x * c.hill_frequency, z * c.hill_frequency]);
        let detail = self.detail.get([x * c.detail_frequency, z * c.detail_frequency]);
        let height = c.base_height + c.hill_height * hills + c.detail_height * detail;
        (height as i32).clamp(WORLD_MIN_Y, WORLD_MAX_Y - 1)
    }

    fn block_at(&self, y: i32, surface: i32) -> BlockId {
        if y > surface {
            if y <= self.config.sea_level {
                BlockId::WATER
            } else {
                BlockId::AIR
            }
        } else if surface <= self.config.sea_level && y > surface - self.config.dirt_depth {
            BlockId::SAND
        } else if y > surface - self.config.dirt_depth {
            BlockId::DIRT
        } else {
            BlockId::STONE
        }
    }

    /// Dense payload for one chunk column, as the authority would send it.
    pub fn generate_chunk(&self, pos: ChunkPos) -> ChunkPayload {
        let size = DEFAULT_CHUNK_SIZE as i32;
        let (origin_x, origin_z) = pos.origin_xz(DEFAULT_CHUNK_SIZE);

        let mut surface = Vec::with_capacity((size * size) as usize);
        for z in 0..size {
            for x in 0..size {
                surface.push(self.height_at(origin_x + x, origin_z + z));
            }
        }

        let height = (WORLD_MAX_Y - WORLD_MIN_Y) as usize;
        let mut data = Vec::with_capacity(surface.len() * height);
        for y in WORLD_MIN_Y..WORLD_MAX_Y {
            data.extend(surface.iter().map(|&top| self.block_at(y, top)));
        }

        ChunkPayload {
            chunk_size: DEFAULT_CHUNK_SIZE,
            y_min: WORLD_MIN_Y,
            y_max: WORLD_MAX_Y,
            data,
        }
    }

    /// A road through `center` plus a small glass-windowed hut beside it.
    pub fn structures(&self, center: WorldPos) -> Vec<VoxelDelta> {
        let mut deltas = Vec::new();

        // Road running along X, one voxel above the ground
        for dx in -24..=24 {
            for dz in -1..=1 {
                let (x, z) = (center.x + dx, center.z + dz);
                let y = self.height_at(x, z) + 1;
                deltas.push(VoxelDelta::set(WorldPos::new(x, y, z), BlockId::ROAD));
            }
        }

        // Hut: 5×5 footprint, 3 high walls, glass in the middle of each wall
        let (hx, hz) = (center.x + 4, center.z + 4);
        let floor = self.height_at(hx, hz) + 1;
        for dy in 0..3 {
            for dx in 0..5 {
                for dz in 0..5 {
                    let on_wall = dx == 0 || dx == 4 || dz == 0 || dz == 4;
                    if !on_wall {
                        continue;
                    }
                    let window = dy == 1 && (dx == 2 || dz == 2);
                    let block = if window { BlockId::GLASS } else { BlockId::WOOD };
                    deltas.push(VoxelDelta::set(
                        WorldPos::new(hx + dx, floor + dy, hz + dz),
                        block,
                    ));
                }
            }
        }
        for dx in -1..=5 {
            for dz in -1..=5 {
                deltas.push(VoxelDelta::set(
                    WorldPos::new(hx + dx, floor + 3, hz + dz),
                    BlockId::ROOF,
                ));
            }
        }

        deltas
    }
}
