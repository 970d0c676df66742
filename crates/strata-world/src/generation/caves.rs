use crate::noise::sample;
use crate::worldgen::GenerationConfig;

/// Two-field cave test of the layered generator.
pub fn layered(cfg: &GenerationConfig, wx: i32, wy: i32) -> bool {
    let (x, y) = (f64::from(wx), f64::from(wy));
    let s = cfg.caves.scale;
    let p = cfg.noise.persistence;
    let c1 = sample(x, y, s, 3, p, cfg.seed.wrapping_add(1000));
    let c2 = sample(x + 1000.0, y + 1000.0, s * 0.5, 2, p, cfg.seed.wrapping_add(2000));
    0.6 * c1 + 0.4 * c2 > 1.0 - cfg.caves.frequency
}

/// Three fields at doubling frequency and shrinking amplitude, OR-ed.
pub fn cavern(cfg: &GenerationConfig, wx: i32, wy: i32) -> bool {
    const AMPLITUDES: [f64; 3] = [1.0, 0.75, 0.5];
    let (x, y) = (f64::from(wx), f64::from(wy));
    let f = cfg.caves.frequency;
    let p = cfg.noise.persistence;
    let mut scale = cfg.caves.scale;
    for (i, amp) in AMPLITUDES.into_iter().enumerate() {
        let salt = 4000 + 1000 * i as u32;
        let n = sample(x, y, scale, 2, p, cfg.seed.wrapping_add(salt)) * amp;
        // higher-frequency fields carve a smaller share
        if n > amp * (1.0 - f * amp) {
            return true;
        }
        scale *= 2.0;
    }
    false
}

/// Single-field cave test used under mountains.
pub fn mountain(cfg: &GenerationConfig, wx: i32, wy: i32) -> bool {
    let n = sample(
        f64::from(wx),
        f64::from(wy),
        cfg.caves.scale * 1.5,
        2,
        cfg.noise.persistence,
        cfg.seed.wrapping_add(8000),
    );
    n > 1.0 - cfg.caves.frequency
}
