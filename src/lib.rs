//! Strata: a 2D tile world with procedural terrain, chunk streaming,
//! distance lighting, autotiling and editing tools.
#![forbid(unsafe_code)]

pub mod collision;
mod options;
pub mod preview;
mod world;

pub use collision::RayHit;
pub use options::{DEFAULT_GRADIENT_SIZE, DEFAULT_MAX_FILL_TILES, WorldMode, WorldOptions};
pub use world::{TileWorld, WorldError};

pub use strata_autotile::AtlasOffset;
pub use strata_chunk::{ChunkStoreStats, TileBounds};
pub use strata_edit::{EditOutcome, StrokeOp};
pub use strata_geom::{Rect, Vec2};
pub use strata_io::{WorldSave, load_world_from_path, save_world_to_path};
pub use strata_runtime::ChunkWorkers;
pub use strata_tiles::{AIR, TileId, TileRegistry};
pub use strata_world::worldgen::load_config_from_path;
pub use strata_world::{GenerationConfig, GenerationType};

impl TileWorld {
    pub fn check_rect_collision(&mut self, rect: Rect) -> bool {
        collision::check_rect_collision(rect, |x, y| self.is_tile_solid(x, y))
    }

    pub fn check_circle_collision(&mut self, center: Vec2, radius: f32) -> bool {
        collision::check_circle_collision(center, radius, |x, y| self.is_tile_solid(x, y))
    }

    pub fn raycast(&mut self, start: Vec2, end: Vec2) -> RayHit {
        collision::raycast(start, end, |x, y| self.is_tile_solid(x, y))
    }

    pub fn get_solid_tiles_in_rect(&mut self, rect: Rect) -> Vec<(i32, i32)> {
        collision::get_solid_tiles_in_rect(rect, |x, y| self.is_tile_solid(x, y))
    }
}
