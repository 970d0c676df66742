//! Tile types, roles, and the tile-type registry.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;
pub mod types;

pub use config::{TileDef, TilesConfig};
pub use registry::{RegistryError, TileRegistry};
pub use types::{AIR, TileId, TileRole, TileType};
