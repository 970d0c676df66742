//! Noise sampling, generation parameters, and terrain generation.
#![forbid(unsafe_code)]

mod chunk_coord;
pub mod generation;
pub mod noise;
mod tile_block;
pub mod worldgen;

pub use chunk_coord::ChunkCoord;
pub use generation::{TerrainGenerator, TilePalette};
pub use tile_block::TileBlock;
pub use worldgen::{ConfigError, GenerationConfig, GenerationType};
