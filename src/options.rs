use serde::{Deserialize, Serialize};
use strata_world::ConfigError;

pub const DEFAULT_GRADIENT_SIZE: u32 = 8;
pub const DEFAULT_MAX_FILL_TILES: usize = strata_edit::DEFAULT_MAX_FILL_TILES;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WorldMode {
    Finite { width: usize, height: usize },
    Infinite { chunk_size: usize, load_radius: i32 },
}

/// World shape and the knobs that are not part of terrain generation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldOptions {
    pub mode: WorldMode,
    #[serde(default = "default_lighting_enabled")]
    pub lighting_enabled: bool,
    #[serde(default = "default_gradient_size")]
    pub gradient_size: u32,
    #[serde(default = "default_max_fill_tiles")]
    pub max_fill_tiles: usize,
}

fn default_lighting_enabled() -> bool {
    true
}
fn default_gradient_size() -> u32 {
    DEFAULT_GRADIENT_SIZE
}
fn default_max_fill_tiles() -> usize {
    DEFAULT_MAX_FILL_TILES
}

impl Default for WorldOptions {
    fn default() -> Self {
        Self::finite(200, 100)
    }
}

impl WorldOptions {
    pub fn finite(width: usize, height: usize) -> Self {
        Self {
            mode: WorldMode::Finite { width, height },
            lighting_enabled: default_lighting_enabled(),
            gradient_size: default_gradient_size(),
            max_fill_tiles: default_max_fill_tiles(),
        }
    }

    pub fn infinite(chunk_size: usize, load_radius: i32) -> Self {
        Self {
            mode: WorldMode::Infinite {
                chunk_size,
                load_radius,
            },
            lighting_enabled: false,
            gradient_size: default_gradient_size(),
            max_fill_tiles: default_max_fill_tiles(),
        }
    }

    pub fn with_lighting(mut self, enabled: bool) -> Self {
        self.lighting_enabled = enabled;
        self
    }

    pub fn with_gradient_size(mut self, gradient_size: u32) -> Self {
        self.gradient_size = gradient_size;
        self
    }

    pub fn with_max_fill_tiles(mut self, max_fill_tiles: usize) -> Self {
        self.max_fill_tiles = max_fill_tiles;
        self
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        matches!(self.mode, WorldMode::Infinite { .. })
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let options: WorldOptions = toml::from_str(s)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject degenerate worlds before anything is generated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &str| ConfigError::Invalid {
            field,
            reason: reason.to_string(),
        };
        match self.mode {
            WorldMode::Finite { width, height } => {
                if width == 0 {
                    return Err(invalid("world.width", "must be positive"));
                }
                if height == 0 {
                    return Err(invalid("world.height", "must be positive"));
                }
                if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
                    return Err(invalid("world.size", "does not fit tile coordinates"));
                }
            }
            WorldMode::Infinite {
                chunk_size,
                load_radius,
            } => {
                if chunk_size == 0 {
                    return Err(invalid("world.chunk_size", "must be positive"));
                }
                if i32::try_from(chunk_size).is_err() {
                    return Err(invalid("world.chunk_size", "does not fit tile coordinates"));
                }
                if load_radius < 0 {
                    return Err(invalid("world.load_radius", "must be non-negative"));
                }
            }
        }
        if self.gradient_size == 0 {
            return Err(invalid("lighting.gradient_size", "must be positive"));
        }
        if self.max_fill_tiles == 0 {
            return Err(invalid("edit.max_fill_tiles", "must be positive"));
        }
        Ok(())
    }
}
