//! Blob autotiling: neighbor occupancy to tileset atlas offsets.
#![forbid(unsafe_code)]

use strata_chunk::Grid;
use strata_tiles::AIR;

pub const NORTH: u8 = 1;
pub const EAST: u8 = 2;
pub const SOUTH: u8 = 4;
pub const WEST: u8 = 8;

pub const NORTH_EAST: u8 = 1;
pub const SOUTH_EAST: u8 = 2;
pub const SOUTH_WEST: u8 = 4;
pub const NORTH_WEST: u8 = 8;

const ALL_CARDINALS: u8 = NORTH | EAST | SOUTH | WEST;

/// Cell within a tile type's atlas region, in tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AtlasOffset {
    pub x: u32,
    pub y: u32,
}

impl AtlasOffset {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

// Edge and corner pieces, rows 0..4, indexed by the cardinal mask.
const CARDINAL_TABLE: [AtlasOffset; 16] = [
    AtlasOffset::new(0, 0), // isolated
    AtlasOffset::new(1, 0), // N
    AtlasOffset::new(2, 0), // E
    AtlasOffset::new(3, 0), // N E
    AtlasOffset::new(0, 1), // S
    AtlasOffset::new(1, 1), // N S
    AtlasOffset::new(2, 1), // E S
    AtlasOffset::new(3, 1), // N E S
    AtlasOffset::new(0, 2), // W
    AtlasOffset::new(1, 2), // N W
    AtlasOffset::new(2, 2), // E W
    AtlasOffset::new(3, 2), // N E W
    AtlasOffset::new(0, 3), // S W
    AtlasOffset::new(1, 3), // N S W
    AtlasOffset::new(2, 3), // E S W
    AtlasOffset::new(3, 3), // all, unused
];

// Three-sided pieces drawn separately: open to the sky and open below.
const TOP_EDGE: AtlasOffset = AtlasOffset::new(4, 0);
const BOTTOM_EDGE: AtlasOffset = AtlasOffset::new(4, 1);

/// First row of the 4x4 block of fully surrounded cells.
pub const SURROUNDED_ROW: u32 = 4;

// Neighbours whose coordinates overflow `i32` count as empty.
#[inline]
fn occupied_at<F>(occupied: &mut F, x: i32, y: i32, dx: i32, dy: i32) -> bool
where
    F: FnMut(i32, i32) -> bool,
{
    match (x.checked_add(dx), y.checked_add(dy)) {
        (Some(nx), Some(ny)) => occupied(nx, ny),
        _ => false,
    }
}

/// Cardinal occupancy bits of `(x, y)`; y grows downward.
pub fn cardinal_mask<F>(mut occupied: F, x: i32, y: i32) -> u8
where
    F: FnMut(i32, i32) -> bool,
{
    let mut m = 0;
    for (bit, dx, dy) in [(NORTH, 0, -1), (EAST, 1, 0), (SOUTH, 0, 1), (WEST, -1, 0)] {
        if occupied_at(&mut occupied, x, y, dx, dy) {
            m |= bit;
        }
    }
    m
}

pub fn diagonal_mask<F>(mut occupied: F, x: i32, y: i32) -> u8
where
    F: FnMut(i32, i32) -> bool,
{
    let mut m = 0;
    for (bit, dx, dy) in [(NORTH_EAST, 1, -1), (SOUTH_EAST, 1, 1), (SOUTH_WEST, -1, 1), (NORTH_WEST, -1, -1)] {
        if occupied_at(&mut occupied, x, y, dx, dy) {
            m |= bit;
        }
    }
    m
}

/// Offset for a cardinal mask, with the diagonal mask used only when all four
/// cardinals are occupied.
pub fn offset_for_masks(cardinal: u8, diagonal: u8) -> AtlasOffset {
    match cardinal & ALL_CARDINALS {
        ALL_CARDINALS => {
            let d = (diagonal & 0x0f) as u32;
            AtlasOffset::new(d & 3, SURROUNDED_ROW + (d >> 2))
        }
        m if m == EAST | SOUTH | WEST => TOP_EDGE,
        m if m == NORTH | EAST | WEST => BOTTOM_EDGE,
        m => CARDINAL_TABLE[m as usize],
    }
}

/// Pure function of the 8 neighbors' occupancy around `(x, y)`.
pub fn resolve<F>(mut occupied: F, x: i32, y: i32) -> AtlasOffset
where
    F: FnMut(i32, i32) -> bool,
{
    let cardinal = cardinal_mask(&mut occupied, x, y);
    let diagonal = if cardinal == ALL_CARDINALS {
        diagonal_mask(&mut occupied, x, y)
    } else {
        0
    };
    offset_for_masks(cardinal, diagonal)
}

/// Resolve against a finite grid; any non-air tile counts as occupied and
/// cells outside the grid count as empty.
pub fn resolve_grid(grid: &Grid, x: i32, y: i32) -> AtlasOffset {
    resolve(|nx, ny| grid.get(nx, ny) != AIR, x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn isolated_and_surrounded() {
        assert_eq!(resolve(|_, _| false, 0, 0), AtlasOffset::new(0, 0));
        assert_eq!(resolve(|_, _| true, 0, 0), AtlasOffset::new(3, 7));
    }

    #[test]
    fn surface_tile_uses_top_edge() {
        // air above, solid everywhere else
        let off = resolve(|_, y| y >= 0, 5, 0);
        assert_eq!(off, TOP_EDGE);
        let off = resolve(|_, y| y <= 0, 5, 0);
        assert_eq!(off, BOTTOM_EDGE);
    }

    #[test]
    fn every_mask_pair_maps_to_a_distinct_cell_where_expected() {
        let mut seen = HashSet::new();
        for c in 0..16u8 {
            if c == ALL_CARDINALS {
                for d in 0..16u8 {
                    assert!(seen.insert(offset_for_masks(c, d)));
                }
            } else {
                assert!(seen.insert(offset_for_masks(c, 0)));
                // diagonals do not matter unless surrounded
                assert_eq!(offset_for_masks(c, 0), offset_for_masks(c, 0x0f));
            }
        }
        assert_eq!(seen.len(), 31);
    }

    #[test]
    fn inner_corner_picks_surrounded_variant() {
        // everything occupied except the north-west diagonal
        let off = resolve(|x, y| !(x == -1 && y == -1), 0, 0);
        let d = (NORTH_EAST | SOUTH_EAST | SOUTH_WEST) as u32;
        assert_eq!(off, AtlasOffset::new(d & 3, SURROUNDED_ROW + (d >> 2)));
    }
}
