use serde::{Deserialize, Serialize};

pub type TileId = u16;

/// Empty tile. Always non-solid regardless of registry contents.
pub const AIR: TileId = 0;

/// What the terrain generator uses a tile type for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileRole {
    Air,
    Grass,
    Dirt,
    Stone,
    Snow,
    Coal,
    Iron,
    Gold,
}

impl TileRole {
    pub const ALL: [TileRole; 8] = [
        TileRole::Air,
        TileRole::Grass,
        TileRole::Dirt,
        TileRole::Stone,
        TileRole::Snow,
        TileRole::Coal,
        TileRole::Iron,
        TileRole::Gold,
    ];

    /// Id used by the built-in table and as the fallback when a registry
    /// has no tile for this role.
    #[inline]
    pub const fn builtin_id(self) -> TileId {
        match self {
            TileRole::Air => 0,
            TileRole::Grass => 1,
            TileRole::Dirt => 2,
            TileRole::Stone => 3,
            TileRole::Coal => 4,
            TileRole::Iron => 5,
            TileRole::Gold => 6,
            TileRole::Snow => 7,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TileType {
    pub id: TileId,
    pub name: String,
    pub solid: bool,
    pub role: Option<TileRole>,
    /// Renderer-only fields (color, atlas coordinates, ...), carried opaquely.
    pub extra: toml::Table,
}

impl TileType {
    pub fn new(id: TileId, name: impl Into<String>, solid: bool) -> Self {
        Self {
            id,
            name: name.into(),
            solid,
            role: None,
            extra: toml::Table::new(),
        }
    }

    pub fn with_role(mut self, role: TileRole) -> Self {
        self.role = Some(role);
        self
    }
}
