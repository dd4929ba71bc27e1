//! voxelview headless demo
//!
//! Streams procedurally generated terrain chunks and a handful of sparse
//! structures around a viewer walking in a circle, and logs mesh and batch
//! statistics as it goes. No window is opened; the output is the log.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p voxelview-demo -- [OPTIONS]
//! ```
//!
//! ## Options
//!
//! - `--radius <R>`: Sparse voxel render radius in voxels (default: 64)
//! - `--seed <N>`: Terrain seed (default: 42)
//! - `--chunk-radius <N>`: Chunk load radius in chunks (default: 4)
//! - `--ticks <N>`: Number of simulated frames (default: 120)
//! - `--deltas <FILE>`: JSON array of voxel updates to apply after loading
//! - `-h, --help`: Print help message
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

mod app;
mod terrain;

use tracing_subscriber::EnvFilter;

use crate::app::{Demo, DemoParams};

fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "-h" || arg == "--help") {
        print_help();
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let params = DemoParams::from_args();
    tracing::info!(?params, "starting demo");
    Demo::new(params)?.run()
}

fn print_help() {
    eprintln!(
        "voxelview headless demo

USAGE:
    cargo run -p voxelview-demo -- [OPTIONS]

OPTIONS:
    --radius <R>            Sparse voxel render radius in voxels (default: 64)
    --seed <N>              Terrain seed (default: 42)
    --chunk-radius <N>      Chunk load radius in chunks (default: 4)
    --ticks <N>             Number of simulated frames (default: 120)
    --deltas <FILE>         JSON array of voxel updates, e.g.
                            [{{\"action\":\"set\",\"x\":0,\"y\":50,\"z\":0,\"block\":8}}]
    -h, --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG                Set log level (e.g., info, debug, trace)"
    );
}
