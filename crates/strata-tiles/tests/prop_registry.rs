use proptest::prelude::*;
use strata_tiles::{AIR, TileDef, TileRegistry, TileRole, TilesConfig};

#[test]
fn toml_table_assigns_sequential_ids() {
    let reg = TileRegistry::from_toml_str(
        r##"
        [[tiles]]
        name = "air"
        solid = false
        role = "air"

        [[tiles]]
        name = "sandstone"
        role = "stone"

        [[tiles]]
        name = "glass"
        solid = false
        [tiles.extra]
        color = "#aaddff"
    "##,
    )
    .unwrap();
    assert_eq!(reg.id_by_name("sandstone"), Some(1));
    assert_eq!(reg.id_for_role(TileRole::Stone), Some(1));
    let glass = reg.get(2).unwrap();
    assert!(!glass.solid);
    assert_eq!(glass.extra.get("color").and_then(|v| v.as_str()), Some("#aaddff"));
}

#[test]
fn malformed_entries_are_skipped() {
    let cfg = TilesConfig {
        tiles: vec![
            TileDef { id: Some(4), ..TileDef::new("rock") },
            TileDef { id: Some(4), ..TileDef::new("rock_again") },
            TileDef::new("   "),
        ],
    };
    let reg = TileRegistry::from_config(cfg);
    assert_eq!(reg.id_by_name("rock"), Some(4));
    assert_eq!(reg.id_by_name("rock_again"), None);
    // air is always present
    assert!(reg.get(AIR).is_some());
    assert_eq!(reg.len(), 2);
}

#[test]
fn bad_toml_is_an_error() {
    assert!(TileRegistry::from_toml_str("[[tiles]]\nsolid = 3").is_err());
}

proptest! {
    #[test]
    fn config_roundtrip_preserves_solidity(solids in prop::collection::vec(any::<bool>(), 1..24)) {
        let tiles = solids
            .iter()
            .enumerate()
            .map(|(i, s)| TileDef { solid: Some(*s), ..TileDef::new(format!("t{i}")) })
            .collect();
        let reg = TileRegistry::from_config(TilesConfig { tiles });
        let text = toml::to_string(&reg.to_config()).unwrap();
        let back = TileRegistry::from_toml_str(&text).unwrap();
        prop_assert!(!back.is_solid(AIR));
        for (i, solid) in solids.iter().enumerate() {
            let id = i as u16 + 1;
            prop_assert_eq!(reg.is_solid(id), back.is_solid(id));
            prop_assert_eq!(back.is_solid(id), *solid);
        }
    }
}
