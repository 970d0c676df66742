use serde::{Deserialize, Serialize};

use crate::types::TileRole;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TilesConfig {
    #[serde(default)]
    pub tiles: Vec<TileDef>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TileDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<TileRole>,
    #[serde(default, skip_serializing_if = "toml::Table::is_empty")]
    pub extra: toml::Table,
}

impl TileDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            solid: None,
            role: None,
            extra: toml::Table::new(),
        }
    }
}
