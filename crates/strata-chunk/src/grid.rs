use strata_tiles::{AIR, TileId};
use strata_world::TileBlock;

use crate::TileAccess;

/// Finite `width × height` world addressed from `(0, 0)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    block: TileBlock,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            block: TileBlock::new(width, height),
        }
    }

    pub fn from_block(block: TileBlock) -> Self {
        Self { block }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.block.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.block.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.block.contains(x, y)
    }

    /// Out-of-range reads return air.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> TileId {
        self.block.get(x, y)
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, id: TileId) -> bool {
        self.block.set(x, y, id)
    }

    #[inline]
    pub fn is_air(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == AIR
    }

    #[inline]
    pub fn block(&self) -> &TileBlock {
        &self.block
    }

    #[inline]
    pub fn block_mut(&mut self) -> &mut TileBlock {
        &mut self.block
    }

    #[inline]
    pub fn tiles(&self) -> &[TileId] {
        &self.block.tiles
    }

    pub fn into_block(self) -> TileBlock {
        self.block
    }
}

impl TileAccess for Grid {
    #[inline]
    fn tile(&mut self, x: i32, y: i32) -> TileId {
        self.get(x, y)
    }

    #[inline]
    fn set_tile(&mut self, x: i32, y: i32, id: TileId) -> bool {
        self.set(x, y, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_is_air_and_read_only() {
        let mut g = Grid::new(4, 3);
        assert!(g.set(3, 2, 5));
        assert_eq!(g.get(3, 2), 5);
        assert!(!g.set(4, 0, 5));
        assert!(!g.set(-1, 0, 5));
        assert_eq!(g.get(-1, -1), AIR);
        assert_eq!(g.get(i32::MAX, i32::MIN), AIR);
        assert_eq!(g.block().count(5), 1);
    }
}
