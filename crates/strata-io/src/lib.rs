//! Persisted world state: generation inputs, tiles, and the tile table.
//! Light is derived data and never written.
#![forbid(unsafe_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strata_chunk::{Chunk, ChunkStore, Grid};
use strata_tiles::{TileId, TileRegistry, TilesConfig};
use strata_world::{
    ChunkCoord, ConfigError, GenerationConfig, GenerationType, TerrainGenerator, TileBlock,
};

pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to access world file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse world file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize world: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("unsupported world file version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
    #[error("invalid generation settings in world file: {0}")]
    Config(#[from] ConfigError),
    #[error("malformed world file: {0}")]
    Malformed(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSave {
    pub cx: i32,
    pub cy: i32,
    pub tiles: Vec<TileId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSave {
    pub x: i32,
    pub y: i32,
    pub tile: TileId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SaveMode {
    Finite {
        width: usize,
        height: usize,
        tiles: Vec<TileId>,
    },
    Infinite {
        chunk_size: usize,
        #[serde(default)]
        chunks: Vec<ChunkSave>,
        #[serde(default)]
        edits: Vec<EditSave>,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldSave {
    pub version: u32,
    pub seed: u32,
    pub generation_type: GenerationType,
    pub generation: GenerationConfig,
    pub mode: SaveMode,
    #[serde(default)]
    pub registry: TilesConfig,
}

impl WorldSave {
    pub fn finite(config: &GenerationConfig, registry: &TileRegistry, grid: &Grid) -> Self {
        Self {
            version: SAVE_VERSION,
            seed: config.seed,
            generation_type: config.generation_type,
            generation: config.clone(),
            mode: SaveMode::Finite {
                width: grid.width(),
                height: grid.height(),
                tiles: grid.tiles().to_vec(),
            },
            registry: registry.to_config(),
        }
    }

    /// Cached chunks plus the edit overlay, so edits to evicted chunks
    /// survive the round trip.
    pub fn infinite(config: &GenerationConfig, registry: &TileRegistry, store: &ChunkStore) -> Self {
        let mut chunks: Vec<ChunkSave> = store
            .chunks()
            .map(|c| ChunkSave {
                cx: c.coord.cx,
                cy: c.coord.cy,
                tiles: c.block.tiles.clone(),
            })
            .collect();
        chunks.sort_by_key(|c| (c.cx, c.cy));
        let mut edits: Vec<EditSave> = store
            .edits()
            .iter()
            .map(|((x, y), tile)| EditSave { x, y, tile })
            .collect();
        edits.sort_by_key(|e| (e.y, e.x));
        Self {
            version: SAVE_VERSION,
            seed: config.seed,
            generation_type: config.generation_type,
            generation: config.clone(),
            mode: SaveMode::Infinite {
                chunk_size: store.chunk_size(),
                chunks,
                edits,
            },
            registry: registry.to_config(),
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self.mode, SaveMode::Infinite { .. })
    }

    /// Generation settings with the top-level seed and type applied.
    pub fn generation_config(&self) -> Result<GenerationConfig, SaveError> {
        let cfg = self
            .generation
            .clone()
            .with_seed(self.seed)
            .with_type(self.generation_type);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn tile_registry(&self) -> TileRegistry {
        if self.registry.tiles.is_empty() {
            TileRegistry::builtin()
        } else {
            TileRegistry::from_config(self.registry.clone())
        }
    }

    /// Rebuild the finite grid; `None` for infinite saves.
    pub fn restore_grid(&self) -> Result<Option<Grid>, SaveError> {
        let SaveMode::Finite { width, height, tiles } = &self.mode else {
            return Ok(None);
        };
        if *width == 0 || *height == 0 {
            return Err(SaveError::Malformed("finite world with zero size".into()));
        }
        if tiles.len() != width * height {
            return Err(SaveError::Malformed(format!(
                "expected {} tiles for {}x{}, found {}",
                width * height,
                width,
                height,
                tiles.len()
            )));
        }
        Ok(Some(Grid::from_block(TileBlock::from_tiles(
            *width,
            *height,
            tiles.clone(),
        ))))
    }

    /// Rebuild the chunk store; `None` for finite saves.
    pub fn restore_store(&self, generator: Arc<TerrainGenerator>) -> Result<Option<ChunkStore>, SaveError> {
        let SaveMode::Infinite { chunk_size, chunks, edits } = &self.mode else {
            return Ok(None);
        };
        if *chunk_size == 0 {
            return Err(SaveError::Malformed("chunk size must be positive".into()));
        }
        let mut store = ChunkStore::new(*chunk_size, generator);
        store.restore_edits(edits.iter().map(|e| ((e.x, e.y), e.tile)));
        for c in chunks {
            if c.tiles.len() != chunk_size * chunk_size {
                return Err(SaveError::Malformed(format!(
                    "chunk ({}, {}) has {} tiles, expected {}",
                    c.cx,
                    c.cy,
                    c.tiles.len(),
                    chunk_size * chunk_size
                )));
            }
            let block = TileBlock::from_tiles(*chunk_size, *chunk_size, c.tiles.clone());
            store.insert_generated(Chunk::new(ChunkCoord::new(c.cx, c.cy), block));
        }
        Ok(Some(store))
    }

    pub fn to_toml_string(&self) -> Result<String, SaveError> {
        Ok(toml::to_string(self)?)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, SaveError> {
        let save: WorldSave = toml::from_str(s)?;
        if save.version != SAVE_VERSION {
            return Err(SaveError::Version {
                found: save.version,
                expected: SAVE_VERSION,
            });
        }
        Ok(save)
    }
}

pub fn save_world_to_path(save: &WorldSave, path: &Path) -> Result<(), SaveError> {
    let s = save.to_toml_string()?;
    fs::write(path, s)?;
    log::info!(target: "io", "saved world to {}", path.display());
    Ok(())
}

pub fn load_world_from_path(path: &Path) -> Result<WorldSave, SaveError> {
    let s = fs::read_to_string(path)?;
    let save = WorldSave::from_toml_str(&s)?;
    log::info!(
        target: "io",
        "loaded {} world from {}",
        if save.is_infinite() { "infinite" } else { "finite" },
        path.display()
    );
    Ok(save)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_mismatch_is_rejected() {
        let grid = Grid::new(2, 2);
        let mut save = WorldSave::finite(&GenerationConfig::default(), &TileRegistry::builtin(), &grid);
        save.version = 99;
        let s = save.to_toml_string().unwrap();
        assert!(matches!(
            WorldSave::from_toml_str(&s),
            Err(SaveError::Version { found: 99, .. })
        ));
    }

    #[test]
    fn short_tile_array_is_malformed() {
        let save = WorldSave {
            version: SAVE_VERSION,
            seed: 0,
            generation_type: GenerationType::Flat,
            generation: GenerationConfig::default(),
            mode: SaveMode::Finite {
                width: 3,
                height: 3,
                tiles: vec![0; 4],
            },
            registry: TilesConfig::default(),
        };
        assert!(matches!(save.restore_grid(), Err(SaveError::Malformed(_))));
        assert_eq!(save.tile_registry().len(), 8);
    }

    #[test]
    fn top_level_seed_and_type_win() {
        let grid = Grid::new(1, 1);
        let mut save = WorldSave::finite(&GenerationConfig::default(), &TileRegistry::builtin(), &grid);
        save.seed = 42;
        save.generation_type = GenerationType::Caverns;
        let cfg = save.generation_config().unwrap();
        assert_eq!((cfg.seed, cfg.generation_type), (42, GenerationType::Caverns));
    }
}
