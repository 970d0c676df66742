use std::sync::Arc;

use strata_autotile::AtlasOffset;
use strata_chunk::{ChunkStore, ChunkStoreStats, Grid, TileAccess, TileBounds};
use strata_edit::{EditEngine, EditOutcome, StrokeOp};
use strata_io::{SaveError, WorldSave};
use strata_lighting::LightGrid;
use strata_runtime::ChunkWorkers;
use strata_tiles::{AIR, RegistryError, TileId, TileRegistry};
use strata_world::{ConfigError, GenerationConfig, TerrainGenerator, TilePalette};

use crate::options::{WorldMode, WorldOptions};

#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Save(#[from] SaveError),
}

enum Storage {
    Finite { grid: Grid, light: Option<LightGrid> },
    Infinite { store: ChunkStore, load_radius: i32 },
}

impl Storage {
    fn access(&mut self) -> &mut dyn TileAccess {
        match self {
            Storage::Finite { grid, .. } => grid,
            Storage::Infinite { store, .. } => store,
        }
    }
}

/// The world façade: one entry point for tile queries, edits and lighting
/// over either a finite grid or an infinite chunk store.
pub struct TileWorld {
    options: WorldOptions,
    config: GenerationConfig,
    registry: TileRegistry,
    generator: Arc<TerrainGenerator>,
    editor: EditEngine,
    storage: Storage,
}

impl TileWorld {
    pub fn new(
        options: WorldOptions,
        config: GenerationConfig,
        registry: TileRegistry,
    ) -> Result<Self, WorldError> {
        options.validate()?;
        config.validate()?;
        let generator = Arc::new(TerrainGenerator::new(config.clone(), &registry));
        let storage = match options.mode {
            WorldMode::Finite { width, height } => Storage::Finite {
                grid: Grid::from_block(generator.generate_block(0, 0, width, height)),
                light: None,
            },
            WorldMode::Infinite {
                chunk_size,
                load_radius,
            } => Storage::Infinite {
                store: ChunkStore::new(chunk_size, generator.clone()),
                load_radius,
            },
        };
        let mut world = Self {
            editor: EditEngine::new(options.max_fill_tiles),
            options,
            config,
            registry,
            generator,
            storage,
        };
        log::info!(
            target: "worldgen",
            "created {} world ({}, seed {})",
            if world.is_infinite() { "infinite" } else { "finite" },
            world.config.generation_type.name(),
            world.config.seed
        );
        world.recompute_lighting();
        Ok(world)
    }

    /// Rebuild a world from a save. Mode and size come from the save; the
    /// remaining options from `options`.
    pub fn from_save(save: &WorldSave, options: WorldOptions) -> Result<Self, WorldError> {
        let config = save.generation_config()?;
        let registry = save.tile_registry();
        let generator = Arc::new(TerrainGenerator::new(config.clone(), &registry));
        let (mode, storage) = if let Some(grid) = save.restore_grid()? {
            let mode = WorldMode::Finite {
                width: grid.width(),
                height: grid.height(),
            };
            (mode, Storage::Finite { grid, light: None })
        } else if let Some(store) = save.restore_store(generator.clone())? {
            let load_radius = match options.mode {
                WorldMode::Infinite { load_radius, .. } => load_radius,
                WorldMode::Finite { .. } => 2,
            };
            let mode = WorldMode::Infinite {
                chunk_size: store.chunk_size(),
                load_radius,
            };
            (mode, Storage::Infinite { store, load_radius })
        } else {
            return Err(SaveError::Malformed("world file has no tiles".into()).into());
        };
        let options = WorldOptions { mode, ..options };
        options.validate()?;
        let mut world = Self {
            editor: EditEngine::new(options.max_fill_tiles),
            options,
            config,
            registry,
            generator,
            storage,
        };
        world.recompute_lighting();
        Ok(world)
    }

    pub fn to_save(&self) -> WorldSave {
        match &self.storage {
            Storage::Finite { grid, .. } => WorldSave::finite(&self.config, &self.registry, grid),
            Storage::Infinite { store, .. } => WorldSave::infinite(&self.config, &self.registry, store),
        }
    }

    #[inline]
    pub fn options(&self) -> &WorldOptions {
        &self.options
    }

    #[inline]
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    #[inline]
    pub fn registry(&self) -> &TileRegistry {
        &self.registry
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        matches!(self.storage, Storage::Infinite { .. })
    }

    pub fn grid(&self) -> Option<&Grid> {
        match &self.storage {
            Storage::Finite { grid, .. } => Some(grid),
            Storage::Infinite { .. } => None,
        }
    }

    pub fn light_grid(&self) -> Option<&LightGrid> {
        match &self.storage {
            Storage::Finite { light, .. } => light.as_ref(),
            Storage::Infinite { .. } => None,
        }
    }

    pub fn chunk_store(&self) -> Option<&ChunkStore> {
        match &self.storage {
            Storage::Infinite { store, .. } => Some(store),
            Storage::Finite { .. } => None,
        }
    }

    pub fn chunk_stats(&self) -> Option<ChunkStoreStats> {
        self.chunk_store().map(ChunkStore::stats)
    }

    // Queries

    /// Never fails: outside a finite world, or on unknown ids, reads air.
    pub fn get_tile_at(&mut self, x: i32, y: i32) -> TileId {
        self.storage.access().tile(x, y)
    }

    pub fn is_tile_solid(&mut self, x: i32, y: i32) -> bool {
        let id = self.get_tile_at(x, y);
        self.registry.is_solid(id)
    }

    /// Light in `[0, 1]`. Air, infinite worlds and disabled lighting read 1.
    pub fn get_light_at(&mut self, x: i32, y: i32) -> f32 {
        if self.get_tile_at(x, y) == AIR {
            return 1.0;
        }
        match &self.storage {
            Storage::Finite { light: Some(light), .. } if self.options.lighting_enabled => light.get(x, y),
            _ => 1.0,
        }
    }

    /// Atlas cell for the tile at `(x, y)`; `None` for air.
    pub fn get_autotile_offset(&mut self, x: i32, y: i32) -> Option<AtlasOffset> {
        let access = self.storage.access();
        if access.tile(x, y) == AIR {
            return None;
        }
        Some(strata_autotile::resolve(|nx, ny| access.tile(nx, ny) != AIR, x, y))
    }

    // Mutation

    /// `false`, without mutating, when `(x, y)` is outside a finite world.
    pub fn set_tile_at(&mut self, x: i32, y: i32, id: TileId) -> bool {
        let access = self.storage.access();
        let before = access.tile(x, y);
        if !access.set_tile(x, y, id) {
            return false;
        }
        if before != id {
            self.relight(Some(TileBounds::point(x, y)));
        }
        true
    }

    pub fn paint(&mut self, x: i32, y: i32, brush_radius: f32, id: TileId) -> EditOutcome {
        let out = self.editor.paint(self.storage.access(), x, y, brush_radius, id);
        self.relight(out.bounds);
        out
    }

    pub fn erase(&mut self, x: i32, y: i32, brush_radius: f32) -> EditOutcome {
        let out = self.editor.erase(self.storage.access(), x, y, brush_radius);
        self.relight(out.bounds);
        out
    }

    pub fn fill(&mut self, x: i32, y: i32, id: TileId) -> EditOutcome {
        let out = self.editor.fill(self.storage.access(), x, y, id);
        self.relight(out.bounds);
        out
    }

    /// Eyedropper; keeps `current` when the sampled tile is air.
    pub fn sample(&mut self, x: i32, y: i32, current: TileId) -> TileId {
        self.editor.sample(self.storage.access(), x, y, current)
    }

    pub fn stroke_to(&mut self, last: (i32, i32), to: (i32, i32), op: StrokeOp) -> EditOutcome {
        let out = self.editor.stroke_to(self.storage.access(), last, to, op);
        self.relight(out.bounds);
        out
    }

    // Lighting and invalidation

    fn relight(&mut self, changed: Option<TileBounds>) {
        let Some(bounds) = changed else {
            return;
        };
        if !self.options.lighting_enabled {
            return;
        }
        if let Storage::Finite {
            grid,
            light: Some(light),
        } = &mut self.storage
        {
            light.recompute_region(grid, &self.registry, bounds);
        } else {
            self.recompute_lighting();
        }
    }

    /// Wholesale recomputation. Infinite worlds have no lighting; this only
    /// logs there.
    pub fn recompute_lighting(&mut self) {
        match &mut self.storage {
            Storage::Finite { grid, light } => {
                *light = self
                    .options
                    .lighting_enabled
                    .then(|| LightGrid::compute(grid, &self.registry, self.options.gradient_size));
            }
            Storage::Infinite { .. } => {
                if self.options.lighting_enabled {
                    log::warn!(target: "lighting", "lighting is not available for infinite worlds");
                }
            }
        }
    }

    pub fn set_lighting_enabled(&mut self, enabled: bool) {
        if self.options.lighting_enabled != enabled {
            self.options.lighting_enabled = enabled;
            self.recompute_lighting();
        }
    }

    /// Replace the tile table. Solidity-derived state is recomputed; chunks
    /// generated from now on use the new table's role ids.
    pub fn set_registry(&mut self, registry: TileRegistry) {
        let palette = TilePalette::from_registry(&registry);
        self.registry = registry;
        if palette != *self.generator.palette() {
            self.generator = Arc::new(TerrainGenerator::with_palette(self.config.clone(), palette));
            if let Storage::Infinite { store, .. } = &mut self.storage {
                store.set_generator(self.generator.clone());
            }
        }
        log::info!(target: "worldgen", "tile registry replaced ({} types)", self.registry.len());
        self.recompute_lighting();
    }

    /// Swap generation parameters. A finite world is regenerated in full; an
    /// infinite world drops its cache and keeps recorded edits.
    pub fn set_generation_config(&mut self, config: GenerationConfig) -> Result<(), WorldError> {
        config.validate()?;
        self.generator = Arc::new(TerrainGenerator::new(config.clone(), &self.registry));
        self.config = config;
        match &mut self.storage {
            Storage::Finite { grid, .. } => {
                let (w, h) = (grid.width(), grid.height());
                *grid = Grid::from_block(self.generator.generate_block(0, 0, w, h));
            }
            Storage::Infinite { store, .. } => store.set_generator(self.generator.clone()),
        }
        log::info!(
            target: "worldgen",
            "regenerating with {} (seed {})",
            self.config.generation_type.name(),
            self.config.seed
        );
        self.recompute_lighting();
        Ok(())
    }

    // Infinite-world streaming

    /// Generate chunks around the reference tile within the load radius and
    /// evict the far ones. No-op for finite worlds.
    pub fn preload(&mut self, ref_x: i32, ref_y: i32) -> usize {
        match &mut self.storage {
            Storage::Infinite { store, load_radius } => store.preload(ref_x, ref_y, *load_radius),
            Storage::Finite { .. } => 0,
        }
    }

    /// Queue missing chunks around the reference tile on background workers.
    pub fn request_chunks(&mut self, workers: &mut ChunkWorkers, ref_x: i32, ref_y: i32) -> usize {
        match &self.storage {
            Storage::Infinite { store, load_radius } => {
                workers.request_around(store, ref_x, ref_y, *load_radius)
            }
            Storage::Finite { .. } => 0,
        }
    }

    /// Publish finished background chunks, then evict relative to the
    /// reference tile.
    pub fn publish_chunks(&mut self, workers: &mut ChunkWorkers, ref_x: i32, ref_y: i32) -> usize {
        match &mut self.storage {
            Storage::Infinite { store, load_radius } => {
                let n = workers.drain_into(store);
                store.evict_far(ref_x, ref_y, *load_radius);
                n
            }
            Storage::Finite { .. } => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_world::GenerationType;

    fn flat(width: usize, height: usize) -> TileWorld {
        let mut cfg = GenerationConfig::default().with_type(GenerationType::Flat);
        cfg.terrain.grass_height = 5;
        cfg.terrain.dirt_depth = 3;
        TileWorld::new(
            WorldOptions::finite(width, height).with_gradient_size(4),
            cfg,
            TileRegistry::builtin(),
        )
        .unwrap()
    }

    #[test]
    fn finite_queries_and_bounds() {
        let mut w = flat(16, 20);
        assert_eq!(w.get_tile_at(3, 4), 0);
        assert_eq!(w.get_tile_at(3, 5), 1);
        assert!(w.is_tile_solid(3, 8));
        assert_eq!(w.get_tile_at(-1, 8), 0);
        assert_eq!(w.get_tile_at(3, 1000), 0);
        assert!(!w.set_tile_at(16, 0, 3));
        assert!(w.set_tile_at(0, 0, 3));
    }

    #[test]
    fn light_follows_edits() {
        let mut w = flat(16, 20);
        assert_eq!(w.get_light_at(3, 2), 1.0);
        assert_eq!(w.get_light_at(3, 5), 1.0);
        assert_eq!(w.get_light_at(3, 8), 0.25);
        assert_eq!(w.get_light_at(3, 12), 0.0);
        w.erase(3, 11, 1.0);
        assert_eq!(w.get_light_at(3, 12), 1.0);
        assert_eq!(w.light_grid(), Some(&LightGrid::compute(w.grid().unwrap(), w.registry(), 4)));
        w.set_lighting_enabled(false);
        assert_eq!(w.get_light_at(3, 18), 1.0);
    }

    #[test]
    fn autotile_for_surface_and_air() {
        let mut w = flat(16, 20);
        assert_eq!(w.get_autotile_offset(3, 2), None);
        assert_eq!(w.get_autotile_offset(3, 5), Some(AtlasOffset::new(4, 0)));
        assert_eq!(w.get_autotile_offset(3, 10), Some(AtlasOffset::new(3, 7)));
    }

    #[test]
    fn infinite_world_has_no_lighting() {
        let cfg = GenerationConfig::default().with_type(GenerationType::Flat);
        let mut w = TileWorld::new(
            WorldOptions::infinite(16, 1).with_lighting(true),
            cfg,
            TileRegistry::builtin(),
        )
        .unwrap();
        assert_eq!(w.get_light_at(-40, 60), 1.0);
        assert!(w.light_grid().is_none());
        assert!(w.set_tile_at(-1_000_000, 5, 3));
        assert_eq!(w.get_tile_at(-1_000_000, 5), 3);
    }

    #[test]
    fn config_change_regenerates_but_keeps_infinite_edits() {
        let cfg = GenerationConfig::default().with_type(GenerationType::Flat);
        let mut w = TileWorld::new(WorldOptions::infinite(8, 1), cfg, TileRegistry::builtin()).unwrap();
        w.set_tile_at(0, 0, 6);
        let mut next = GenerationConfig::default().with_type(GenerationType::Flat);
        next.terrain.grass_height = 2;
        w.set_generation_config(next).unwrap();
        assert_eq!(w.get_tile_at(0, 0), 6);
        assert_eq!(w.get_tile_at(1, 2), 1);
    }

    #[test]
    fn invalid_config_is_rejected_before_generation() {
        let mut cfg = GenerationConfig::default();
        cfg.noise.octaves = 0;
        assert!(TileWorld::new(WorldOptions::finite(4, 4), cfg, TileRegistry::builtin()).is_err());
        let mut w = flat(4, 4);
        let mut bad = GenerationConfig::default();
        bad.islands.spacing = 0;
        assert!(w.set_generation_config(bad).is_err());
        assert_eq!(w.config().generation_type, GenerationType::Flat);
    }
}
