use strata_tiles::TileId;

use super::TilePalette;
use crate::noise::sample;
use crate::worldgen::GenerationConfig;

/// Surface row of the layered generators: `base + noise(wx, 0) * mountain_height`.
pub fn layered_height(cfg: &GenerationConfig, wx: i32) -> i32 {
    let n = sample(
        f64::from(wx),
        0.0,
        cfg.noise.scale,
        cfg.noise.octaves,
        cfg.noise.persistence,
        cfg.seed,
    );
    cfg.terrain.base_height + (n * cfg.terrain.mountain_height).floor() as i32
}

/// Mountain surface row and whether the column is snow-capped.
///
/// Elevation is a weighted sum of three octave groups at increasing
/// frequency, floored at `mountains.min_elevation`. Rows grow downward, so
/// the surface row is `base + mountain_height - elevation`.
pub fn mountain_column(cfg: &GenerationConfig, wx: i32) -> (i32, bool) {
    let x = f64::from(wx);
    let n = &cfg.noise;
    let broad = sample(x, 0.0, n.scale, n.octaves, n.persistence, cfg.seed);
    let ridge = sample(x, 0.0, n.scale * 2.0, n.octaves, n.persistence, cfg.seed.wrapping_add(100));
    let detail = sample(x, 0.0, n.scale * 4.0, n.octaves, n.persistence, cfg.seed.wrapping_add(200));
    let weighted = 0.6 * broad + 0.3 * ridge + 0.1 * detail;
    let elevation = ((weighted * cfg.terrain.mountain_height * cfg.mountains.amplification).round()
        as i32)
        .max(cfg.mountains.min_elevation);
    let surface = cfg.terrain.base_height + cfg.terrain.mountain_height.round() as i32 - elevation;
    (surface, elevation >= cfg.mountains.snow_elevation)
}

/// Air above the surface, `top` on it, dirt down to `dirt_depth` rows below
/// the surface (the top tile included), stone below.
#[inline]
pub fn layer_tile(p: &TilePalette, wy: i32, surface: i32, dirt_depth: i32, top: TileId) -> TileId {
    if wy < surface {
        p.air
    } else if wy == surface {
        top
    } else if wy < surface.saturating_add(dirt_depth) {
        p.dirt
    } else {
        p.stone
    }
}
