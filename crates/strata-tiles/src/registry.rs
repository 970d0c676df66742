use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::{TileDef, TilesConfig};
use crate::types::{AIR, TileId, TileRole, TileType};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read tile table: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tile table: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize tile table: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Tile id → type table. Read-mostly: built once, entries replaced whole.
#[derive(Clone, Debug, Default)]
pub struct TileRegistry {
    tiles: Vec<Option<TileType>>,
    by_name: HashMap<String, TileId>,
    by_role: HashMap<TileRole, TileId>,
}

impl TileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table: air, grass, dirt, stone, coal, iron, gold, snow.
    pub fn builtin() -> Self {
        let mut reg = Self::new();
        let names = [
            (TileRole::Air, "air", false),
            (TileRole::Grass, "grass", true),
            (TileRole::Dirt, "dirt", true),
            (TileRole::Stone, "stone", true),
            (TileRole::Coal, "coal_ore", true),
            (TileRole::Iron, "iron_ore", true),
            (TileRole::Gold, "gold_ore", true),
            (TileRole::Snow, "snow", true),
        ];
        for (role, name, solid) in names {
            reg.replace(TileType::new(role.builtin_id(), name, solid).with_role(role));
        }
        reg
    }

    #[inline]
    pub fn get(&self, id: TileId) -> Option<&TileType> {
        self.tiles.get(id as usize).and_then(Option::as_ref)
    }

    /// Air and unknown ids are never solid.
    #[inline]
    pub fn is_solid(&self, id: TileId) -> bool {
        id != AIR && self.get(id).is_some_and(|t| t.solid)
    }

    pub fn id_by_name(&self, name: &str) -> Option<TileId> {
        self.by_name.get(name).copied()
    }

    /// Lowest id carrying `role`.
    pub fn id_for_role(&self, role: TileRole) -> Option<TileId> {
        self.by_role.get(&role).copied()
    }

    pub fn len(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileType> {
        self.tiles.iter().flatten()
    }

    /// Insert or atomically replace the entry for `tile.id`.
    pub fn replace(&mut self, mut tile: TileType) {
        if tile.id == AIR && tile.solid {
            log::warn!(target: "tiles", "tile id 0 ({}) forced non-solid", tile.name);
            tile.solid = false;
        }
        let idx = tile.id as usize;
        if self.tiles.len() <= idx {
            self.tiles.resize(idx + 1, None);
        }
        let new_role = tile.role;
        self.by_name.insert(tile.name.clone(), tile.id);
        let old = self.tiles[idx].replace(tile);
        if let Some(old) = old {
            if self.by_name.get(&old.name) == Some(&old.id)
                && self.get(old.id).is_none_or(|t| t.name != old.name)
            {
                self.by_name.remove(&old.name);
            }
            if let Some(role) = old.role {
                self.reindex_role(role);
            }
        }
        if let Some(role) = new_role {
            self.reindex_role(role);
        }
    }

    fn reindex_role(&mut self, role: TileRole) {
        let found = self.iter().find(|t| t.role == Some(role)).map(|t| t.id);
        match found {
            Some(id) => {
                self.by_role.insert(role, id);
            }
            None => {
                self.by_role.remove(&role);
            }
        }
    }

    /// Entries without an `id` are numbered from 1 in table order; id 0 is
    /// only given implicitly to an entry with the air role.
    pub fn from_config(cfg: TilesConfig) -> Self {
        let mut reg = Self::new();
        let mut next_id: TileId = 1;
        for def in cfg.tiles {
            let name = def.name.trim().to_string();
            if name.is_empty() {
                log::warn!(target: "tiles", "skipping tile entry without a name");
                continue;
            }
            let id = match def.id {
                Some(id) => id,
                None if def.role == Some(TileRole::Air) && reg.get(AIR).is_none() => AIR,
                None => next_id,
            };
            if reg.get(id).is_some() {
                log::warn!(target: "tiles", "duplicate tile id {id} ({name}); keeping first entry");
                continue;
            }
            next_id = next_id.max(id.saturating_add(1));
            reg.replace(TileType {
                id,
                name,
                solid: def.solid.unwrap_or(true),
                role: def.role,
                extra: def.extra,
            });
        }
        if reg.get(AIR).is_none() {
            reg.replace(TileType::new(AIR, "air", false).with_role(TileRole::Air));
        }
        reg
    }

    pub fn to_config(&self) -> TilesConfig {
        TilesConfig {
            tiles: self
                .iter()
                .map(|t| TileDef {
                    name: t.name.clone(),
                    id: Some(t.id),
                    solid: Some(t.solid),
                    role: t.role,
                    extra: t.extra.clone(),
                })
                .collect(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, RegistryError> {
        let cfg: TilesConfig = toml::from_str(s)?;
        Ok(Self::from_config(cfg))
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
