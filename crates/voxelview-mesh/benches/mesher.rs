//! Chunk meshing throughput.
//!
//! Run with: cargo bench --package voxelview-mesh --bench mesher

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use voxelview_core::constants::{DEFAULT_CHUNK_SIZE, WORLD_MAX_Y, WORLD_MIN_Y};
use voxelview_core::BlockId;
use voxelview_mesh::ChunkMesher;
use voxelview_voxel::ChunkGrid;

/// Rolling terrain: a sine heightfield around y = 40.
fn terrain_chunk() -> ChunkGrid {
    let mut grid = ChunkGrid::new(DEFAULT_CHUNK_SIZE, WORLD_MIN_Y, WORLD_MAX_Y).unwrap();
    let size = DEFAULT_CHUNK_SIZE as i32;
    for z in 0..size {
        for x in 0..size {
            let height = 40.0 + 6.0 * ((x as f32 * 0.4).sin() + (z as f32 * 0.3).cos());
            for y in 0..height as i32 {
                grid.set(x, y, z, BlockId::STONE);
            }
        }
    }
    grid
}

/// Alternating solid/air: worst case for face count.
fn checkerboard_chunk() -> ChunkGrid {
    let mut grid = ChunkGrid::new(DEFAULT_CHUNK_SIZE, 0, 32).unwrap();
    let size = DEFAULT_CHUNK_SIZE as i32;
    for y in 0..32 {
        for z in 0..size {
            for x in 0..size {
                if (x + y + z) % 2 == 0 {
                    grid.set(x, y, z, BlockId::STONE);
                }
            }
        }
    }
    grid
}

fn bench_build_mesh(c: &mut Criterion) {
    let mesher = ChunkMesher::default();
    let mut group = c.benchmark_group("build_mesh");

    let terrain = terrain_chunk();
    group.throughput(Throughput::Elements(terrain.data().len() as u64));
    group.bench_function("terrain_16x128x16", |b| {
        b.iter(|| black_box(mesher.build_mesh(black_box(&terrain))));
    });

    let checkerboard = checkerboard_chunk();
    group.throughput(Throughput::Elements(checkerboard.data().len() as u64));
    group.bench_function("checkerboard_16x32x16", |b| {
        b.iter(|| black_box(mesher.build_mesh(black_box(&checkerboard))));
    });

    group.finish();
}

criterion_group!(benches, bench_build_mesh);
criterion_main!(benches);
