use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read generation config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse generation config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid generation config: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationType {
    /// Layered surface with grass, dirt, stone, caves, and ores.
    #[default]
    Terraria,
    /// Solid wherever noise exceeds a depth-dependent threshold.
    Noise,
    Caverns,
    Islands,
    Flat,
    Mountains,
}

impl GenerationType {
    pub const ALL: [GenerationType; 6] = [
        GenerationType::Terraria,
        GenerationType::Noise,
        GenerationType::Caverns,
        GenerationType::Islands,
        GenerationType::Flat,
        GenerationType::Mountains,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GenerationType::Terraria => "terraria",
            GenerationType::Noise => "noise",
            GenerationType::Caverns => "caverns",
            GenerationType::Islands => "islands",
            GenerationType::Flat => "flat",
            GenerationType::Mountains => "mountains",
        }
    }
}

impl std::str::FromStr for GenerationType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GenerationType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| ConfigError::Invalid {
                field: "generation_type",
                reason: format!("unknown generation type {s:?}"),
            })
    }
}

/// Immutable parameter bundle driving the terrain generator. Changing any
/// field invalidates all generated tiles.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub seed: u32,
    #[serde(default)]
    pub generation_type: GenerationType,
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub noise: NoiseParams,
    #[serde(default)]
    pub caves: Caves,
    #[serde(default)]
    pub ores: Ores,
    #[serde(default)]
    pub islands: Islands,
    #[serde(default)]
    pub mountains: Mountains,
    #[serde(default)]
    pub threshold: Threshold,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Terrain {
    #[serde(default = "default_base_height")]
    pub base_height: i32,
    #[serde(default = "default_mountain_height")]
    pub mountain_height: f64,
    /// Surface row used by the flat generator.
    #[serde(default = "default_grass_height")]
    pub grass_height: i32,
    #[serde(default = "default_dirt_depth")]
    pub dirt_depth: i32,
}
fn default_base_height() -> i32 {
    30
}
fn default_mountain_height() -> f64 {
    20.0
}
fn default_grass_height() -> i32 {
    20
}
fn default_dirt_depth() -> i32 {
    5
}
impl Default for Terrain {
    fn default() -> Self {
        Self {
            base_height: default_base_height(),
            mountain_height: default_mountain_height(),
            grass_height: default_grass_height(),
            dirt_depth: default_dirt_depth(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NoiseParams {
    #[serde(default = "default_noise_scale")]
    pub scale: f64,
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_persistence")]
    pub persistence: f64,
}
fn default_noise_scale() -> f64 {
    0.05
}
fn default_octaves() -> u32 {
    4
}
fn default_persistence() -> f64 {
    0.5
}
impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: default_noise_scale(),
            octaves: default_octaves(),
            persistence: default_persistence(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Caves {
    #[serde(default = "default_cave_frequency")]
    pub frequency: f64,
    #[serde(default = "default_cave_scale")]
    pub scale: f64,
}
fn default_cave_frequency() -> f64 {
    0.3
}
fn default_cave_scale() -> f64 {
    0.08
}
impl Default for Caves {
    fn default() -> Self {
        Self {
            frequency: default_cave_frequency(),
            scale: default_cave_scale(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Ores {
    #[serde(default = "default_ore_frequency")]
    pub frequency: f64,
    #[serde(default = "default_ore_scale")]
    pub scale: f64,
    /// Depth below the surface that maps to depth ratio 1.0.
    #[serde(default = "default_ore_depth_range")]
    pub depth_range: i32,
}
fn default_ore_frequency() -> f64 {
    0.05
}
fn default_ore_scale() -> f64 {
    0.3
}
fn default_ore_depth_range() -> i32 {
    100
}
impl Default for Ores {
    fn default() -> Self {
        Self {
            frequency: default_ore_frequency(),
            scale: default_ore_scale(),
            depth_range: default_ore_depth_range(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Islands {
    #[serde(default = "default_island_spacing")]
    pub spacing: i32,
    #[serde(default = "default_island_radius")]
    pub radius: f64,
    /// Probability that a candidate center holds an island.
    #[serde(default = "default_island_chance")]
    pub chance: f64,
    #[serde(default = "default_island_min_y")]
    pub min_y: i32,
    #[serde(default = "default_island_max_y")]
    pub max_y: i32,
}
fn default_island_spacing() -> i32 {
    32
}
fn default_island_radius() -> f64 {
    10.0
}
fn default_island_chance() -> f64 {
    0.6
}
fn default_island_min_y() -> i32 {
    8
}
fn default_island_max_y() -> i32 {
    72
}
impl Default for Islands {
    fn default() -> Self {
        Self {
            spacing: default_island_spacing(),
            radius: default_island_radius(),
            chance: default_island_chance(),
            min_y: default_island_min_y(),
            max_y: default_island_max_y(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Mountains {
    /// Lowest elevation a column may have.
    #[serde(default = "default_mountain_min")]
    pub min_elevation: i32,
    /// Columns at or above this elevation get snow instead of grass.
    #[serde(default = "default_snow_elevation")]
    pub snow_elevation: i32,
    #[serde(default = "default_amplification")]
    pub amplification: f64,
}
fn default_mountain_min() -> i32 {
    4
}
fn default_snow_elevation() -> i32 {
    22
}
fn default_amplification() -> f64 {
    1.5
}
impl Default for Mountains {
    fn default() -> Self {
        Self {
            min_elevation: default_mountain_min(),
            snow_elevation: default_snow_elevation(),
            amplification: default_amplification(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Threshold {
    /// Threshold at `base_height`.
    #[serde(default = "default_threshold_surface")]
    pub surface: f64,
    /// Threshold decrease per row of depth.
    #[serde(default = "default_threshold_falloff")]
    pub falloff: f64,
    #[serde(default = "default_threshold_min")]
    pub min: f64,
}
fn default_threshold_surface() -> f64 {
    0.55
}
fn default_threshold_falloff() -> f64 {
    0.02
}
fn default_threshold_min() -> f64 {
    0.2
}
impl Default for Threshold {
    fn default() -> Self {
        Self {
            surface: default_threshold_surface(),
            falloff: default_threshold_falloff(),
            min: default_threshold_min(),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn unit(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(invalid(field, format!("must be within [0, 1], got {v}")))
    }
}

fn positive(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {v}")))
    }
}

impl GenerationConfig {
    pub fn with_type(mut self, generation_type: GenerationType) -> Self {
        self.generation_type = generation_type;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Reject parameter sets the generator does not handle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("noise.scale", self.noise.scale)?;
        if self.noise.octaves == 0 {
            return Err(invalid("noise.octaves", "must be at least 1"));
        }
        if !(self.noise.persistence > 0.0 && self.noise.persistence <= 1.0) {
            return Err(invalid(
                "noise.persistence",
                format!("must be within (0, 1], got {}", self.noise.persistence),
            ));
        }
        if !self.terrain.mountain_height.is_finite() || self.terrain.mountain_height < 0.0 {
            return Err(invalid("terrain.mountain_height", "must be non-negative"));
        }
        if self.terrain.dirt_depth < 0 {
            return Err(invalid("terrain.dirt_depth", "must be non-negative"));
        }
        unit("caves.frequency", self.caves.frequency)?;
        positive("caves.scale", self.caves.scale)?;
        unit("ores.frequency", self.ores.frequency)?;
        positive("ores.scale", self.ores.scale)?;
        if self.ores.depth_range <= 0 {
            return Err(invalid("ores.depth_range", "must be positive"));
        }
        if self.islands.spacing <= 0 {
            return Err(invalid("islands.spacing", "must be positive"));
        }
        positive("islands.radius", self.islands.radius)?;
        unit("islands.chance", self.islands.chance)?;
        if self.islands.max_y < self.islands.min_y {
            return Err(invalid("islands.max_y", "must not be above islands.min_y"));
        }
        positive("mountains.amplification", self.mountains.amplification)?;
        unit("threshold.min", self.threshold.min)?;
        if !self.threshold.falloff.is_finite() {
            return Err(invalid("threshold.falloff", "must be finite"));
        }
        Ok(())
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: GenerationConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GenerationConfig, ConfigError> {
    let s = fs::read_to_string(path)?;
    GenerationConfig::from_toml_str(&s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        GenerationConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg = GenerationConfig::from_toml_str(
            r#"
            seed = 42
            generation_type = "flat"
            [terrain]
            grass_height = 5
            dirt_depth = 3
        "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.generation_type, GenerationType::Flat);
        assert_eq!(cfg.terrain.grass_height, 5);
        assert_eq!(cfg.terrain.base_height, default_base_height());
        assert_eq!(cfg.noise, NoiseParams::default());
    }

    #[test]
    fn degenerate_values_are_rejected() {
        let mut cfg = GenerationConfig::default();
        cfg.noise.octaves = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Invalid { field: "noise.octaves", .. })
        ));
        let mut cfg = GenerationConfig::default();
        cfg.islands.spacing = 0;
        assert!(cfg.validate().is_err());
        let mut cfg = GenerationConfig::default();
        cfg.caves.frequency = 1.5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn type_names_parse() {
        for t in GenerationType::ALL {
            assert_eq!(t.name().parse::<GenerationType>().unwrap(), t);
        }
        assert!("perlin".parse::<GenerationType>().is_err());
    }
}
