use strata_tiles::TileId;

use super::TilePalette;
use crate::noise::{lattice, sample};
use crate::tile_block::TileBlock;
use crate::worldgen::GenerationConfig;

/// Largest radius multiplier applied to `islands.radius`.
const MAX_RADIUS_FACTOR: f64 = 1.3;
/// Vertical squash of the island ellipse.
const VERTICAL_RATIO: f64 = 0.55;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Island {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
}

/// Island at grid cell `(gx, gy)`, if the seeded coin flip places one there
/// and its jittered center lies in the island band.
pub(crate) fn candidate(cfg: &GenerationConfig, gx: i32, gy: i32) -> Option<Island> {
    let isl = &cfg.islands;
    if lattice(cfg.seed, gx, gy, 0) >= isl.chance {
        return None;
    }
    let s = f64::from(isl.spacing);
    let jitter = |salt| (lattice(cfg.seed, gx, gy, salt) - 0.5) * s * 0.5;
    let cx = f64::from(gx) * s + s * 0.5 + jitter(1);
    let cy = f64::from(gy) * s + s * 0.5 + jitter(2);
    if cy < f64::from(isl.min_y) || cy > f64::from(isl.max_y) {
        return None;
    }
    let factor = 0.7 + (MAX_RADIUS_FACTOR - 0.7) * lattice(cfg.seed, gx, gy, 3);
    let rx = (isl.radius * factor).max(1.0);
    let ry = (rx * VERTICAL_RATIO).max(1.0);
    Some(Island { cx, cy, rx, ry })
}

/// Noise-modulated ellipse test.
pub(crate) fn contains(cfg: &GenerationConfig, island: &Island, wx: i32, wy: i32) -> bool {
    let dx = (f64::from(wx) - island.cx) / island.rx;
    let dy = (f64::from(wy) - island.cy) / island.ry;
    let e = dx * dx + dy * dy;
    if e > 1.0 {
        return false;
    }
    let n = sample(
        f64::from(wx),
        f64::from(wy),
        cfg.noise.scale,
        cfg.noise.octaves,
        cfg.noise.persistence,
        cfg.seed.wrapping_add(6000),
    );
    e <= 0.75 + 0.25 * n
}

fn island_ore(cfg: &GenerationConfig, p: &TilePalette, wx: i32, wy: i32) -> Option<TileId> {
    let n = sample(
        f64::from(wx),
        f64::from(wy),
        cfg.ores.scale,
        2,
        cfg.noise.persistence,
        cfg.seed.wrapping_add(7000),
    );
    if n <= 1.0 - cfg.ores.frequency {
        return None;
    }
    let pick = lattice(cfg.seed, wx, wy, 9);
    Some(if pick < 0.5 {
        p.coal
    } else if pick < 0.8 {
        p.iron
    } else {
        p.gold
    })
}

/// Stamp every island overlapping `block`. Islands are visited in grid order
/// so overlaps resolve the same way for every chunk.
pub(crate) fn fill(cfg: &GenerationConfig, p: &TilePalette, block: &mut TileBlock, origin_x: i32, origin_y: i32) {
    let isl = &cfg.islands;
    let s = isl.spacing;
    let reach = (isl.radius * MAX_RADIUS_FACTOR).ceil() as i32 + s;
    let gx0 = origin_x.saturating_sub(reach).div_euclid(s);
    let gx1 = origin_x
        .saturating_add(block.width as i32)
        .saturating_add(reach)
        .div_euclid(s);
    let gy0 = isl.min_y.div_euclid(s) - 1;
    let gy1 = isl.max_y.div_euclid(s) + 1;
    let bx1 = origin_x.saturating_add(block.width as i32 - 1);
    let by1 = origin_y.saturating_add(block.height as i32 - 1);
    let dirt = cfg.terrain.dirt_depth;

    for gx in gx0..=gx1 {
        for gy in gy0..=gy1 {
            let Some(island) = candidate(cfg, gx, gy) else {
                continue;
            };
            let x0 = ((island.cx - island.rx).floor() as i32).max(origin_x);
            let x1 = ((island.cx + island.rx).ceil() as i32).min(bx1);
            let y0 = ((island.cy - island.ry).floor() as i32).max(origin_y);
            let y1 = ((island.cy + island.ry).ceil() as i32).min(by1);
            for wx in x0..=x1 {
                for wy in y0..=y1 {
                    if !contains(cfg, &island, wx, wy) {
                        continue;
                    }
                    let depth = (1..=dirt)
                        .take_while(|k| contains(cfg, &island, wx, wy.saturating_sub(*k)))
                        .count() as i32;
                    let tile = if depth == 0 {
                        p.grass
                    } else if depth < dirt {
                        p.dirt
                    } else {
                        island_ore(cfg, p, wx, wy).unwrap_or(p.stone)
                    };
                    block.set_local((wx - origin_x) as usize, (wy - origin_y) as usize, tile);
                }
            }
        }
    }
}
