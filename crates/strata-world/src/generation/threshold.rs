use strata_tiles::TileId;

use super::TilePalette;
use crate::noise::sample;
use crate::worldgen::GenerationConfig;

/// Solidity threshold for row `wy`; falls with depth below `base_height` and
/// rises above it, clamped to `[threshold.min, 1]`.
pub fn threshold_at(cfg: &GenerationConfig, wy: i32) -> f64 {
    let t = &cfg.threshold;
    let depth = f64::from(wy.saturating_sub(cfg.terrain.base_height));
    (t.surface - depth * t.falloff).clamp(t.min, 1.0)
}

#[inline]
pub fn is_solid(cfg: &GenerationConfig, wx: i32, wy: i32) -> bool {
    let n = sample(
        f64::from(wx),
        f64::from(wy),
        cfg.noise.scale,
        cfg.noise.octaves,
        cfg.noise.persistence,
        cfg.seed,
    );
    n > threshold_at(cfg, wy)
}

/// Solid tiles open to the sky above become grass, the next `dirt_depth - 1`
/// solid rows dirt, the rest stone.
pub fn tile_at(cfg: &GenerationConfig, p: &TilePalette, wx: i32, wy: i32) -> TileId {
    if !is_solid(cfg, wx, wy) {
        return p.air;
    }
    if !is_solid(cfg, wx, wy.saturating_sub(1)) {
        return p.grass;
    }
    let exposed =
        (2..=cfg.terrain.dirt_depth).any(|k| !is_solid(cfg, wx, wy.saturating_sub(k)));
    if exposed { p.dirt } else { p.stone }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_decreases_with_depth() {
        let cfg = GenerationConfig::default();
        let mut prev = threshold_at(&cfg, -100);
        assert_eq!(prev, 1.0);
        for wy in -99..200 {
            let t = threshold_at(&cfg, wy);
            assert!(t <= prev);
            assert!(t >= cfg.threshold.min);
            prev = t;
        }
    }

    #[test]
    fn high_rows_are_air() {
        let cfg = GenerationConfig::default();
        let p = TilePalette::default();
        for wx in -20..20 {
            assert_eq!(tile_at(&cfg, &p, wx, cfg.terrain.base_height - 40), p.air);
        }
    }
}
