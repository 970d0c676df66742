//! Finite grids, chunks, and the lazily generated chunk store.
#![forbid(unsafe_code)]

mod bounds;
mod edits;
mod grid;
mod store;

use strata_tiles::TileId;
use strata_world::{ChunkCoord, TileBlock};

pub use bounds::TileBounds;
pub use edits::{ChunkEdits, ChunkEditsStats};
pub use grid::Grid;
pub use store::{ChunkStore, ChunkStoreStats};

/// Tile read/write access shared by the finite grid and the chunk store.
/// Reads take `&mut self` because the chunk store generates on first touch.
pub trait TileAccess {
    /// Never fails; anything outside the world reads as air.
    fn tile(&mut self, x: i32, y: i32) -> TileId;
    /// Returns `false`, without mutating, when `(x, y)` is outside the world.
    fn set_tile(&mut self, x: i32, y: i32, id: TileId) -> bool;
}

/// A `chunk_size × chunk_size` block of tiles at chunk coordinate `coord`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub coord: ChunkCoord,
    pub block: TileBlock,
}

impl Chunk {
    pub fn new(coord: ChunkCoord, block: TileBlock) -> Self {
        debug_assert_eq!(block.width, block.height);
        Self { coord, block }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.block.width
    }

    #[inline]
    pub fn origin(&self) -> (i32, i32) {
        self.coord.origin(self.size())
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize) -> TileId {
        self.block.get_local(x, y)
    }

    #[inline]
    pub fn contains_world(&self, wx: i32, wy: i32) -> bool {
        ChunkCoord::containing(wx, wy, self.size()) == self.coord
    }

    #[inline]
    pub fn get_world(&self, wx: i32, wy: i32) -> Option<TileId> {
        if !self.contains_world(wx, wy) {
            return None;
        }
        let (lx, ly) = ChunkCoord::local(wx, wy, self.size());
        Some(self.get_local(lx, ly))
    }

    #[inline]
    pub fn set_world(&mut self, wx: i32, wy: i32, id: TileId) -> bool {
        if !self.contains_world(wx, wy) {
            return false;
        }
        let (lx, ly) = ChunkCoord::local(wx, wy, self.size());
        self.block.set_local(lx, ly, id);
        true
    }
}
