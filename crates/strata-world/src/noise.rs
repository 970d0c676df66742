//! Seeded fractal value noise.
//!
//! Despite the name this family is often given, it is not gradient (Perlin)
//! noise: every octave hashes the scaled coordinate straight through a sine
//! hash. Keep the formulas as they are; terrain appearance depends on them.

/// Seed stride between octaves.
const OCTAVE_SEED_STRIDE: f64 = 137.0;

/// `frac(sin(v) * 10000)`.
#[inline]
pub fn hash(v: f64) -> f64 {
    let s = v.sin() * 10_000.0;
    s - s.floor()
}

/// Fractal value noise in `[0, 1]`. Pure function of its arguments.
pub fn sample(x: f64, y: f64, scale: f64, octaves: u32, persistence: f64, seed: u32) -> f64 {
    let mut total = 0.0;
    let mut frequency = scale;
    let mut amplitude = 1.0;
    let mut max_amplitude = 0.0;
    for i in 0..octaves {
        let s = f64::from(seed) + f64::from(i) * OCTAVE_SEED_STRIDE;
        let sx = x * frequency;
        let sy = y * frequency;
        let n1 = hash(sx * 12.9898 + sy * 78.233 + s);
        let n2 = hash(sx * 39.3468 + sy * 11.135 + s * 0.5);
        total += (n1 + n2) * 0.5 * amplitude;
        max_amplitude += amplitude;
        amplitude *= persistence;
        frequency *= 2.0;
    }
    if max_amplitude > 0.0 {
        (total / max_amplitude).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Single hashed value in `[0, 1)` for an integer lattice point; used for
/// seeded coin flips and jitter.
#[inline]
pub fn lattice(seed: u32, x: i32, y: i32, salt: u32) -> f64 {
    let v = f64::from(x) * 127.1 + f64::from(y) * 311.7 + f64::from(seed) * 0.013 + f64::from(salt) * 74.7;
    hash(v).min(0.999_999_999)
}

#[inline]
pub fn coin(seed: u32, x: i32, y: i32, salt: u32) -> bool {
    lattice(seed, x, y, salt) < 0.5
}

/// Noise parameters bundled for repeated sampling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseField {
    pub scale: f64,
    pub octaves: u32,
    pub persistence: f64,
    pub seed: u32,
}

impl NoiseField {
    pub const fn new(scale: f64, octaves: u32, persistence: f64, seed: u32) -> Self {
        Self {
            scale,
            octaves,
            persistence,
            seed,
        }
    }

    #[inline]
    pub fn at(&self, x: f64, y: f64) -> f64 {
        sample(x, y, self.scale, self.octaves, self.persistence, self.seed)
    }

    #[inline]
    pub fn at_tile(&self, x: i32, y: i32) -> f64 {
        self.at(f64::from(x), f64::from(y))
    }
}
