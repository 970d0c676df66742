//! ASCII rendering of a tile window, for the command line.

use strata_tiles::{TileId, TileRegistry, TileRole};

use crate::TileWorld;

fn glyph(reg: &TileRegistry, id: TileId) -> char {
    let Some(t) = reg.get(id) else {
        return '?';
    };
    match t.role {
        Some(TileRole::Air) => ' ',
        Some(TileRole::Grass) => '"',
        Some(TileRole::Dirt) => '%',
        Some(TileRole::Stone) => '#',
        Some(TileRole::Snow) => '*',
        Some(TileRole::Coal) => 'c',
        Some(TileRole::Iron) => 'i',
        Some(TileRole::Gold) => 'g',
        None if !t.solid => '.',
        None => t.name.chars().next().unwrap_or('?'),
    }
}

/// Rows of text for the `width × height` window whose top-left tile is `(x0, y0)`.
/// With `shade`, dim solid tiles whose light is below one half.
pub fn render(world: &mut TileWorld, x0: i32, y0: i32, width: usize, height: usize, shade: bool) -> Vec<String> {
    let mut rows = Vec::with_capacity(height);
    for dy in 0..height as i32 {
        let mut row = String::with_capacity(width);
        for dx in 0..width as i32 {
            let (x, y) = (x0 + dx, y0 + dy);
            let id = world.get_tile_at(x, y);
            let c = if shade && id != strata_tiles::AIR && world.get_light_at(x, y) < 0.5 {
                ':'
            } else {
                glyph(world.registry(), id)
            };
            row.push(c);
        }
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GenerationConfig, GenerationType, WorldOptions};

    #[test]
    fn flat_world_preview() {
        let mut cfg = GenerationConfig::default().with_type(GenerationType::Flat);
        cfg.terrain.grass_height = 1;
        cfg.terrain.dirt_depth = 1;
        let mut w = TileWorld::new(WorldOptions::finite(3, 4), cfg, TileRegistry::builtin()).unwrap();
        assert_eq!(render(&mut w, 0, 0, 3, 4, false), vec!["   ", "\"\"\"", "%%%", "###"]);
    }
}
