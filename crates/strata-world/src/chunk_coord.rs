use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32) -> Self {
        Self { cx, cy }
    }

    /// Chunk containing world tile `(wx, wy)`; floors toward negative infinity.
    #[inline]
    pub fn containing(wx: i32, wy: i32, chunk_size: usize) -> Self {
        let s = chunk_size as i32;
        Self::new(wx.div_euclid(s), wy.div_euclid(s))
    }

    /// Local index of world tile `(wx, wy)` inside its chunk, always in `0..chunk_size`.
    #[inline]
    pub fn local(wx: i32, wy: i32, chunk_size: usize) -> (usize, usize) {
        let s = chunk_size as i32;
        (wx.rem_euclid(s) as usize, wy.rem_euclid(s) as usize)
    }

    /// World tile coordinate of the chunk's top-left tile.
    #[inline]
    pub fn origin(self, chunk_size: usize) -> (i32, i32) {
        let s = chunk_size as i32;
        (self.cx.saturating_mul(s), self.cy.saturating_mul(s))
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.cx.saturating_add(dx), self.cy.saturating_add(dy))
    }

    #[inline]
    pub fn chebyshev(self, other: ChunkCoord) -> i32 {
        let dx = (i64::from(self.cx) - i64::from(other.cx)).abs();
        let dy = (i64::from(self.cy) - i64::from(other.cy)).abs();
        i32::try_from(dx.max(dy)).unwrap_or(i32::MAX)
    }

    /// Packed 64-bit key: high half `cx`, low half `cy`.
    #[inline]
    pub const fn pack(self) -> u64 {
        ((self.cx as u32 as u64) << 32) | (self.cy as u32 as u64)
    }

    #[inline]
    pub const fn unpack(key: u64) -> Self {
        Self::new((key >> 32) as u32 as i32, key as u32 as i32)
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_coordinates_wrap_into_chunk() {
        assert_eq!(ChunkCoord::containing(-1, -1, 16), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::local(-1, -1, 16), (15, 15));
        assert_eq!(ChunkCoord::containing(-16, 15, 16), ChunkCoord::new(-1, 0));
        assert_eq!(ChunkCoord::local(-16, 15, 16), (0, 15));
    }

    #[test]
    fn pack_roundtrips_extremes() {
        for c in [
            ChunkCoord::new(0, 0),
            ChunkCoord::new(-1, 1),
            ChunkCoord::new(i32::MIN, i32::MAX),
        ] {
            assert_eq!(ChunkCoord::unpack(c.pack()), c);
        }
    }
}
