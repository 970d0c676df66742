//! Per-chunk tile edits that outlive chunk eviction, with change tracking.

use std::collections::HashMap;

use strata_tiles::TileId;
use strata_world::ChunkCoord;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkEditsStats {
    pub chunk_entries: usize,
    pub tile_edits: usize,
    pub rev_entries: usize,
}

/// Chunk-aware edit overlay. Regenerated chunks are pure generator output
/// with these edits replayed on top.
#[derive(Clone, Debug)]
pub struct ChunkEdits {
    chunk_size: usize,
    // key=chunk -> map of world coords -> tile
    inner: HashMap<ChunkCoord, HashMap<(i32, i32), TileId>>,
    // latest change stamp affecting each chunk
    rev: HashMap<ChunkCoord, u64>,
    counter: u64,
}

impl ChunkEdits {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            inner: HashMap::new(),
            rev: HashMap::new(),
            counter: 0,
        }
    }

    pub fn stats(&self) -> ChunkEditsStats {
        ChunkEditsStats {
            chunk_entries: self.inner.len(),
            tile_edits: self.inner.values().map(|m| m.len()).sum(),
            rev_entries: self.rev.len(),
        }
    }

    #[inline]
    fn chunk_key(&self, wx: i32, wy: i32) -> ChunkCoord {
        ChunkCoord::containing(wx, wy, self.chunk_size)
    }

    pub fn get(&self, wx: i32, wy: i32) -> Option<TileId> {
        let k = self.chunk_key(wx, wy);
        self.inner.get(&k).and_then(|m| m.get(&(wx, wy)).copied())
    }

    pub fn set(&mut self, wx: i32, wy: i32, id: TileId) {
        let k = self.chunk_key(wx, wy);
        self.inner.entry(k).or_default().insert((wx, wy), id);
    }

    /// All edits inside one chunk.
    pub fn snapshot_for_chunk(&self, coord: ChunkCoord) -> Vec<((i32, i32), TileId)> {
        self.inner
            .get(&coord)
            .map(|m| m.iter().map(|(k, v)| (*k, *v)).collect())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = ((i32, i32), TileId)> + '_ {
        self.inner
            .values()
            .flat_map(|m| m.iter().map(|(k, v)| (*k, *v)))
    }

    pub fn clear(&mut self) {
        self.inner.clear();
        self.rev.clear();
    }

    /// Chunks whose tiles or autotile neighbourhood change when `(wx, wy)`
    /// changes: the owning chunk plus any chunk across a border the tile
    /// touches (diagonals included).
    pub fn affected_chunks(&self, wx: i32, wy: i32) -> Vec<ChunkCoord> {
        let c = self.chunk_key(wx, wy);
        let (lx, ly) = ChunkCoord::local(wx, wy, self.chunk_size);
        let last = self.chunk_size - 1;
        let mut offsets_x = vec![0];
        let mut offsets_y = vec![0];
        if lx == 0 {
            offsets_x.push(-1);
        }
        if lx == last {
            offsets_x.push(1);
        }
        if ly == 0 {
            offsets_y.push(-1);
        }
        if ly == last {
            offsets_y.push(1);
        }
        let mut out = Vec::with_capacity(offsets_x.len() * offsets_y.len());
        for dx in &offsets_x {
            for dy in &offsets_y {
                let k = c.offset(*dx, *dy);
                if !out.contains(&k) {
                    out.push(k);
                }
            }
        }
        out
    }

    /// Stamp every affected chunk with a new monotonically increasing revision.
    pub fn bump_region_around(&mut self, wx: i32, wy: i32) -> u64 {
        self.counter = self.counter.wrapping_add(1).max(1);
        let stamp = self.counter;
        for k in self.affected_chunks(wx, wy) {
            self.rev.insert(k, stamp);
        }
        stamp
    }

    /// Latest revision touching `coord`; 0 if never edited.
    pub fn rev(&self, coord: ChunkCoord) -> u64 {
        self.rev.get(&coord).copied().unwrap_or(0)
    }
}
