//! Terrain generation. Every algorithm walks column by column over world x
//! and derives each tile from world coordinates only, so a chunk produces the
//! same tiles whether it is generated alone, after its neighbours, or as part
//! of a finite grid.

mod caves;
mod islands;
mod ore;
mod surface;
mod threshold;

use strata_tiles::{TileId, TileRegistry, TileRole};

use crate::tile_block::TileBlock;
use crate::worldgen::{GenerationConfig, GenerationType};

pub use ore::{COAL_MAX_RATIO, IRON_MAX_RATIO, depth_ratio, ore_for_depth};
pub use surface::{layered_height, mountain_column};
pub use threshold::threshold_at;

/// Tile ids the generator writes, resolved once from the registry by role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TilePalette {
    pub air: TileId,
    pub grass: TileId,
    pub dirt: TileId,
    pub stone: TileId,
    pub snow: TileId,
    pub coal: TileId,
    pub iron: TileId,
    pub gold: TileId,
}

impl TilePalette {
    pub fn from_registry(reg: &TileRegistry) -> Self {
        let pick = |role: TileRole| reg.id_for_role(role).unwrap_or(role.builtin_id());
        Self {
            air: pick(TileRole::Air),
            grass: pick(TileRole::Grass),
            dirt: pick(TileRole::Dirt),
            stone: pick(TileRole::Stone),
            snow: pick(TileRole::Snow),
            coal: pick(TileRole::Coal),
            iron: pick(TileRole::Iron),
            gold: pick(TileRole::Gold),
        }
    }
}

impl Default for TilePalette {
    fn default() -> Self {
        Self {
            air: TileRole::Air.builtin_id(),
            grass: TileRole::Grass.builtin_id(),
            dirt: TileRole::Dirt.builtin_id(),
            stone: TileRole::Stone.builtin_id(),
            snow: TileRole::Snow.builtin_id(),
            coal: TileRole::Coal.builtin_id(),
            iron: TileRole::Iron.builtin_id(),
            gold: TileRole::Gold.builtin_id(),
        }
    }
}

/// Stateless generator: a validated config plus the palette it writes.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    config: GenerationConfig,
    palette: TilePalette,
}

impl TerrainGenerator {
    /// `config` must already have passed [`GenerationConfig::validate`].
    pub fn new(config: GenerationConfig, reg: &TileRegistry) -> Self {
        Self {
            config,
            palette: TilePalette::from_registry(reg),
        }
    }

    pub fn with_palette(config: GenerationConfig, palette: TilePalette) -> Self {
        Self { config, palette }
    }

    #[inline]
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    #[inline]
    pub fn palette(&self) -> &TilePalette {
        &self.palette
    }

    pub fn generate_block(&self, origin_x: i32, origin_y: i32, width: usize, height: usize) -> TileBlock {
        let mut block = TileBlock::new(width, height);
        self.generate(&mut block, origin_x, origin_y);
        block
    }

    /// Overwrite every tile of `block`, whose top-left tile sits at world
    /// `(origin_x, origin_y)`.
    pub fn generate(&self, block: &mut TileBlock, origin_x: i32, origin_y: i32) {
        let cfg = &self.config;
        let p = &self.palette;
        block.fill(p.air);
        match cfg.generation_type {
            GenerationType::Terraria => {
                for_each_column(block, origin_x, origin_y, |wx, rows| {
                    let h = layered_height(cfg, wx);
                    for (wy, tile) in rows {
                        let mut t = surface::layer_tile(p, wy, h, cfg.terrain.dirt_depth, p.grass);
                        if t == p.stone
                            && wy > cfg.terrain.base_height + 5
                            && caves::layered(cfg, wx, wy)
                        {
                            t = p.air;
                        }
                        *tile = t;
                    }
                });
                ore::apply(cfg, p, block, origin_x, origin_y, |wx| layered_height(cfg, wx));
            }
            GenerationType::Noise => {
                for_each_column(block, origin_x, origin_y, |wx, rows| {
                    for (wy, tile) in rows {
                        *tile = threshold::tile_at(cfg, p, wx, wy);
                    }
                });
                let base = cfg.terrain.base_height;
                ore::apply(cfg, p, block, origin_x, origin_y, |_| base);
            }
            GenerationType::Caverns => {
                for_each_column(block, origin_x, origin_y, |wx, rows| {
                    let h = layered_height(cfg, wx);
                    for (wy, tile) in rows {
                        let mut t = surface::layer_tile(p, wy, h, cfg.terrain.dirt_depth, p.grass);
                        if t != p.air && wy > h + 2 && caves::cavern(cfg, wx, wy) {
                            t = p.air;
                        }
                        *tile = t;
                    }
                });
                ore::apply(cfg, p, block, origin_x, origin_y, |wx| layered_height(cfg, wx));
            }
            GenerationType::Islands => islands::fill(cfg, p, block, origin_x, origin_y),
            GenerationType::Flat => {
                let h = cfg.terrain.grass_height;
                for_each_column(block, origin_x, origin_y, |_, rows| {
                    for (wy, tile) in rows {
                        *tile = surface::layer_tile(p, wy, h, cfg.terrain.dirt_depth, p.grass);
                    }
                });
            }
            GenerationType::Mountains => {
                for_each_column(block, origin_x, origin_y, |wx, rows| {
                    let (h, snow) = mountain_column(cfg, wx);
                    let top = if snow { p.snow } else { p.grass };
                    for (wy, tile) in rows {
                        let mut t = surface::layer_tile(p, wy, h, cfg.terrain.dirt_depth, top);
                        if t == p.stone && caves::mountain(cfg, wx, wy) {
                            t = p.air;
                        }
                        *tile = t;
                    }
                });
                ore::apply(cfg, p, block, origin_x, origin_y, |wx| mountain_column(cfg, wx).0);
            }
        }
        log::trace!(
            target: "worldgen",
            "{} block {}x{} at ({origin_x}, {origin_y})",
            cfg.generation_type.name(),
            block.width,
            block.height
        );
    }
}

/// Calls `f(wx, rows)` once per column, where `rows` yields `(wy, &mut tile)`
/// top to bottom.
fn for_each_column<F>(block: &mut TileBlock, origin_x: i32, origin_y: i32, mut f: F)
where
    F: FnMut(i32, &mut dyn Iterator<Item = (i32, &mut TileId)>),
{
    let width = block.width;
    for lx in 0..width {
        let wx = origin_x.saturating_add(lx as i32);
        let mut rows = block
            .tiles
            .iter_mut()
            .skip(lx)
            .step_by(width.max(1))
            .enumerate()
            .map(|(ly, t)| (origin_y.saturating_add(ly as i32), t));
        f(wx, &mut rows);
    }
}
