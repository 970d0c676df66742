use strata_tiles::TileId;

use super::TilePalette;
use crate::noise::{coin, sample};
use crate::tile_block::TileBlock;
use crate::worldgen::GenerationConfig;

/// Depth ratios below this get coal.
pub const COAL_MAX_RATIO: f64 = 0.33;
/// Depth ratios below this (and at least [`COAL_MAX_RATIO`]) get iron.
pub const IRON_MAX_RATIO: f64 = 0.66;

/// Normalised depth of row `wy` below `surface`, in `[0, 1]`.
#[inline]
pub fn depth_ratio(cfg: &GenerationConfig, wy: i32, surface: i32) -> f64 {
    (f64::from(wy.saturating_sub(surface)) / f64::from(cfg.ores.depth_range.max(1))).clamp(0.0, 1.0)
}

/// Ore band for a depth ratio; the deepest band flips a seeded coin between
/// gold and iron.
pub fn ore_for_depth(p: &TilePalette, ratio: f64, seed: u32, wx: i32, wy: i32) -> TileId {
    if ratio < COAL_MAX_RATIO {
        p.coal
    } else if ratio < IRON_MAX_RATIO {
        p.iron
    } else if coin(seed, wx, wy, 11) {
        p.gold
    } else {
        p.iron
    }
}

/// Replace stone below the dirt layer with ore where a high-frequency field
/// peaks.
pub fn apply<S>(
    cfg: &GenerationConfig,
    p: &TilePalette,
    block: &mut TileBlock,
    origin_x: i32,
    origin_y: i32,
    surface: S,
) where
    S: Fn(i32) -> i32,
{
    let cutoff = 1.0 - cfg.ores.frequency;
    for lx in 0..block.width {
        let wx = origin_x.saturating_add(lx as i32);
        let s = surface(wx);
        for ly in 0..block.height {
            let wy = origin_y.saturating_add(ly as i32);
            if wy < s.saturating_add(cfg.terrain.dirt_depth) || block.get_local(lx, ly) != p.stone {
                continue;
            }
            let n = sample(
                f64::from(wx),
                f64::from(wy),
                cfg.ores.scale,
                2,
                cfg.noise.persistence,
                cfg.seed.wrapping_add(3000),
            );
            if n > cutoff {
                let ratio = depth_ratio(cfg, wy, s);
                block.set_local(lx, ly, ore_for_depth(p, ratio, cfg.seed, wx, wy));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shallow_ratio_is_coal() {
        let p = TilePalette::default();
        for wx in -50..50 {
            assert_eq!(ore_for_depth(&p, 0.1, 9, wx, 3), p.coal);
        }
    }

    #[test]
    fn deepest_band_is_gold_or_iron() {
        let p = TilePalette::default();
        let picks: Vec<TileId> = (0..200).map(|wx| ore_for_depth(&p, 0.9, 5, wx, 77)).collect();
        assert!(picks.iter().all(|t| *t == p.gold || *t == p.iron));
        assert!(picks.contains(&p.gold));
        assert!(picks.contains(&p.iron));
    }

    #[test]
    fn ore_starts_at_first_stone_row() {
        let mut cfg = GenerationConfig::default();
        cfg.ores.frequency = 1.0;
        cfg.terrain.dirt_depth = 3;
        let p = TilePalette::default();
        let mut block = TileBlock::new(4, 12);
        block.fill(p.stone);
        apply(&cfg, &p, &mut block, 0, 0, |_| 5);
        for x in 0..4 {
            for y in 0..8 {
                assert_eq!(block.get_local(x, y), p.stone);
            }
            assert_ne!(block.get_local(x, 8), p.stone);
        }
    }

    #[test]
    fn depth_ratio_clamps() {
        let cfg = GenerationConfig::default();
        assert_eq!(depth_ratio(&cfg, 0, 10), 0.0);
        assert_eq!(depth_ratio(&cfg, 10 + cfg.ores.depth_range * 2, 10), 1.0);
        assert!((depth_ratio(&cfg, 20, 10) - 0.1).abs() < 1e-12);
    }
}
