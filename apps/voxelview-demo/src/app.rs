//! Demo host: streams terrain chunks and sparse structures around a walking viewer.

use std::path::PathBuf;

use anyhow::Context;
use glam::{IVec3, Vec3};
use tracing::{debug, info, warn};
use voxelview_core::constants::DEFAULT_CHUNK_SIZE;
use voxelview_core::{BlockId, Error, WorldPos};
use voxelview_mesh::ChunkMesher;
use voxelview_world::{ChunkStore, VisibilityConfig, VisibilityManager, VoxelDelta};

use crate::terrain::{TerrainConfig, TerrainGenerator};

/// Chunk payloads accepted per tick, nearest first.
const MAX_CHUNKS_PER_TICK: usize = 4;

/// Radius of the viewer's circular walk in voxels.
const WALK_RADIUS: f32 = 48.0;

/// Angle advanced per tick in radians.
const WALK_STEP: f32 = 0.05;

/// Eye height above the terrain surface.
const EYE_HEIGHT: f32 = 2.0;

/// Ticks between scripted voxel edits.
const EDIT_INTERVAL: u32 = 20;

/// Ticks between statistics lines at `info` level.
const STATS_INTERVAL: u32 = 10;

/// Demo configuration (from CLI or defaults).
#[derive(Debug, Clone)]
pub struct DemoParams {
    pub radius: f32,
    pub seed: u32,
    pub chunk_radius: i32,
    pub ticks: u32,
    pub deltas: Option<PathBuf>,
}

impl Default for DemoParams {
    fn default() -> Self {
        Self {
            radius: 64.0,
            seed: 42,
            chunk_radius: 4,
            ticks: 120,
            deltas: None,
        }
    }
}

impl DemoParams {
    /// Parse demo parameters from command line arguments.
    pub fn from_args() -> Self {
        Self::parse(std::env::args().skip(1))
    }

    fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut params = Self::default();
        let args: Vec<String> = args.into_iter().collect();

        let mut i = 0;
        while i < args.len() {
            let value = args.get(i + 1);
            let consumed = match (args[i].as_str(), value) {
                ("--radius", Some(v)) => v.parse::<f32>().map(|r| params.radius = r).is_ok(),
                ("--seed", Some(v)) => v.parse::<u32>().map(|s| params.seed = s).is_ok(),
                ("--chunk-radius", Some(v)) => v
                    .parse::<i32>()
                    .map(|r| params.chunk_radius = r)
                    .is_ok(),
                ("--ticks", Some(v)) => v.parse::<u32>().map(|t| params.ticks = t).is_ok(),
                ("--deltas", Some(v)) => {
                    params.deltas = Some(PathBuf::from(v));
                    true
                }
                (other, _) => {
                    warn!(argument = other, "ignoring unrecognized argument");
                    false
                }
            };
            i += if consumed { 2 } else { 1 };
        }

        params
    }

    fn visibility_config(&self) -> VisibilityConfig {
        VisibilityConfig {
            radius: self.radius,
            chunk_load_radius: self.chunk_radius,
            chunk_unload_radius: self.chunk_radius + 2,
            ..Default::default()
        }
    }
}

/// Host state: the chunk path, the sparse path, and the viewer.
pub struct Demo {
    params: DemoParams,
    terrain: TerrainGenerator,
    chunks: ChunkStore,
    visibility: VisibilityManager,
    viewer: Vec3,
}

impl Demo {
    pub fn new(params: DemoParams) -> anyhow::Result<Self> {
        let config = params.visibility_config();
        let mesher = ChunkMesher::default();
        let chunks = ChunkStore::new(DEFAULT_CHUNK_SIZE, &config, mesher.clone())
            .context("invalid chunk store configuration")?;
        let visibility = VisibilityManager::with_mesher(config, &mesher)
            .context("invalid visibility configuration")?;
        let terrain = TerrainGenerator::new(TerrainConfig {
            seed: params.seed,
            ..Default::default()
        });

        Ok(Self {
            params,
            terrain,
            chunks,
            visibility,
            viewer: Vec3::ZERO,
        })
    }

    /// Run the scripted session.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let structures = self.terrain.structures(WorldPos::new(0, 0, 0));
        let loaded = self
            .visibility
            .load_snapshot(structures.iter().map(|delta| (delta.pos(), delta.block())));
        info!(voxels = loaded, "sparse world loaded");

        if let Some(path) = self.params.deltas.clone() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading delta log {}", path.display()))?;
            let deltas: Vec<VoxelDelta> = serde_json::from_str(&text)
                .with_context(|| format!("parsing delta log {}", path.display()))?;
            let count = deltas.len();
            let changed = self.visibility.apply_deltas(deltas);
            info!(path = %path.display(), deltas = count, changed, "delta log applied");
        }

        for tick in 0..self.params.ticks {
            self.tick(tick)?;
        }

        info!(
            chunks = self.chunks.len(),
            chunk_faces = self.chunks.total_faces(),
            chunk_bytes = self.chunks.memory_usage(),
            batches = self.visibility.batches().len(),
            instances = self.visibility.batches().instance_count(),
            recomputes = self.visibility.recompute_count(),
            "session finished"
        );
        Ok(())
    }

    fn tick(&mut self, tick: u32) -> anyhow::Result<()> {
        let angle = tick as f32 * WALK_STEP;
        let (x, z) = (WALK_RADIUS * angle.cos(), WALK_RADIUS * angle.sin());
        let ground = self.terrain.height_at(x.floor() as i32, z.floor() as i32);
        self.viewer = Vec3::new(x, ground as f32 + EYE_HEIGHT, z);

        let evicted = self.chunks.update_viewer(self.viewer);
        let missing = self.chunks.missing_chunks(self.viewer);
        for pos in missing.iter().take(MAX_CHUNKS_PER_TICK) {
            self.chunks.insert_payload(*pos, self.terrain.generate_chunk(*pos))?;
        }

        let recomputed = self.visibility.on_viewer_moved(self.viewer);

        if tick > 0 && tick % EDIT_INTERVAL == 0 {
            self.edit_near_viewer(tick)?;
        }

        debug!(
            tick,
            viewer = ?self.viewer,
            evicted = evicted.len(),
            pending = missing.len().saturating_sub(MAX_CHUNKS_PER_TICK),
            recomputed,
            "tick"
        );
        if tick % STATS_INTERVAL == 0 {
            let snapshot = self.visibility.snapshot();
            info!(
                tick,
                chunks = self.chunks.len(),
                chunk_faces = self.chunks.total_faces(),
                batches = snapshot.len(),
                instances = snapshot.iter().map(|batch| batch.instances.len()).sum::<usize>(),
                "stats"
            );
        }
        Ok(())
    }

    /// Alternately raise a glass pillar beside the viewer or clear the cells there.
    fn edit_near_viewer(&mut self, tick: u32) -> anyhow::Result<()> {
        let base = WorldPos::from(self.viewer).offset(IVec3::new(2, 0, 0));
        let block = if (tick / EDIT_INTERVAL) % 2 == 1 {
            BlockId::GLASS
        } else {
            BlockId::AIR
        };

        let mut sparse_changes = 0;
        let mut chunk_changes = 0;
        for dy in 0..3 {
            let pos = base.offset(IVec3::new(0, dy, 0));
            if self.visibility.on_voxel_set(pos, block) {
                sparse_changes += 1;
            }
            match self.chunks.set_voxel(pos.offset(IVec3::Z * 3), block) {
                Ok(true) => chunk_changes += 1,
                Ok(false) => {}
                Err(Error::ChunkNotLoaded(chunk)) => {
                    warn!(%chunk, "edit skipped, chunk not loaded");
                }
                Err(err) => return Err(err.into()),
            }
        }
        info!(%block, sparse_changes, chunk_changes, "scripted edit");
        Ok(())
    }
}
