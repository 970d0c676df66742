use strata_tiles::{AIR, TileId};

/// Dense row-major `width × height` block of tile ids. Backing store for both
/// the finite grid and individual chunks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileBlock {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<TileId>,
}

impl TileBlock {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![AIR; width * height],
        }
    }

    /// Wrap existing tiles, padding or truncating to `width * height`.
    pub fn from_tiles(width: usize, height: usize, tiles: Vec<TileId>) -> Self {
        let mut t = tiles;
        let expect = width * height;
        if t.len() != expect {
            t.resize(expect, AIR);
        }
        Self {
            width,
            height,
            tiles: t,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize) -> TileId {
        self.tiles[self.idx(x, y)]
    }

    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, id: TileId) {
        let i = self.idx(x, y);
        self.tiles[i] = id;
    }

    /// Signed read; anything outside the block is air.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> TileId {
        if self.contains(x, y) {
            self.get_local(x as usize, y as usize)
        } else {
            AIR
        }
    }

    /// Signed write; returns `false` without mutating when out of range.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, id: TileId) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        self.set_local(x as usize, y as usize, id);
        true
    }

    pub fn fill(&mut self, id: TileId) {
        self.tiles.fill(id);
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        self.tiles.iter().all(|t| *t == AIR)
    }

    pub fn count(&self, id: TileId) -> usize {
        self.tiles.iter().filter(|t| **t == id).count()
    }
}
