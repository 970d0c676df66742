use std::sync::Arc;

use hashbrown::HashMap;
use strata_tiles::TileId;
use strata_world::{ChunkCoord, TerrainGenerator};

use crate::edits::ChunkEdits;
use crate::{Chunk, TileAccess};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkStoreStats {
    pub cached: usize,
    pub generated_total: u64,
    pub evicted_total: u64,
    pub edited_chunks: usize,
    pub tile_edits: usize,
}

/// Infinite world: chunks generated on first access, cached under a packed
/// 64-bit coordinate key, and evicted by distance from a reference point.
pub struct ChunkStore {
    chunk_size: usize,
    generator: Arc<TerrainGenerator>,
    chunks: HashMap<u64, Chunk>,
    edits: ChunkEdits,
    generated_total: u64,
    evicted_total: u64,
}

impl ChunkStore {
    pub fn new(chunk_size: usize, generator: Arc<TerrainGenerator>) -> Self {
        debug_assert!(chunk_size > 0);
        Self {
            chunk_size,
            generator,
            chunks: HashMap::new(),
            edits: ChunkEdits::new(chunk_size),
            generated_total: 0,
            evicted_total: 0,
        }
    }

    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    #[inline]
    pub fn generator(&self) -> &Arc<TerrainGenerator> {
        &self.generator
    }

    #[inline]
    pub fn edits(&self) -> &ChunkEdits {
        &self.edits
    }

    /// Swap the generator. Cached chunks are dropped and regenerate lazily;
    /// recorded edits are kept and replayed onto the new terrain.
    pub fn set_generator(&mut self, generator: Arc<TerrainGenerator>) {
        self.generator = generator;
        self.evicted_total += self.chunks.len() as u64;
        self.chunks.clear();
        log::info!(target: "chunks", "generator replaced; chunk cache cleared");
    }

    #[inline]
    pub fn world_to_chunk(&self, wx: i32, wy: i32) -> ChunkCoord {
        ChunkCoord::containing(wx, wy, self.chunk_size)
    }

    /// Pure generator output for `coord`, ignoring cache and edits.
    pub fn generate_chunk(&self, coord: ChunkCoord) -> Chunk {
        let (ox, oy) = coord.origin(self.chunk_size);
        let block = self
            .generator
            .generate_block(ox, oy, self.chunk_size, self.chunk_size);
        Chunk::new(coord, block)
    }

    fn replay_edits(&self, chunk: &mut Chunk) {
        for ((wx, wy), id) in self.edits.snapshot_for_chunk(chunk.coord) {
            chunk.set_world(wx, wy, id);
        }
    }

    #[inline]
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord.pack())
    }

    pub fn loaded_coords(&self) -> Vec<ChunkCoord> {
        let mut v: Vec<ChunkCoord> = self.chunks.keys().map(|k| ChunkCoord::unpack(*k)).collect();
        v.sort();
        v
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Cached chunk, generating it first if needed.
    pub fn get_chunk(&mut self, coord: ChunkCoord) -> &Chunk {
        self.ensure(coord);
        &self.chunks[&coord.pack()]
    }

    fn ensure(&mut self, coord: ChunkCoord) -> bool {
        let key = coord.pack();
        if self.chunks.contains_key(&key) {
            return false;
        }
        let mut chunk = self.generate_chunk(coord);
        self.replay_edits(&mut chunk);
        self.chunks.insert(key, chunk);
        self.generated_total += 1;
        log::debug!(target: "chunks", "generated chunk ({}, {})", coord.cx, coord.cy);
        true
    }

    /// Publish a chunk produced elsewhere (a worker or a save file). Edits are
    /// replayed onto it. Returns `false` and drops it if the coordinate is
    /// already cached or the chunk has the wrong size.
    pub fn insert_generated(&mut self, mut chunk: Chunk) -> bool {
        if chunk.size() != self.chunk_size || chunk.block.height != self.chunk_size {
            log::warn!(
                target: "chunks",
                "rejecting chunk ({}, {}) of size {}; store uses {}",
                chunk.coord.cx, chunk.coord.cy, chunk.size(), self.chunk_size
            );
            return false;
        }
        let key = chunk.coord.pack();
        if self.chunks.contains_key(&key) {
            return false;
        }
        self.replay_edits(&mut chunk);
        self.chunks.insert(key, chunk);
        self.generated_total += 1;
        true
    }

    /// Coordinates within Chebyshev `radius` of the reference tile that are
    /// not cached yet, nearest first.
    pub fn missing_around(&self, ref_x: i32, ref_y: i32, radius: i32) -> Vec<ChunkCoord> {
        let center = self.world_to_chunk(ref_x, ref_y);
        let mut out = Vec::new();
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let c = center.offset(dx, dy);
                if !self.is_loaded(c) {
                    out.push(c);
                }
            }
        }
        out.sort_by_key(|c| (c.chebyshev(center), *c));
        out
    }

    /// Drop cached chunks farther than `2 * keep_radius` (Chebyshev) from the
    /// chunk containing the reference tile. Returns how many were dropped.
    pub fn evict_far(&mut self, ref_x: i32, ref_y: i32, keep_radius: i32) -> usize {
        let center = self.world_to_chunk(ref_x, ref_y);
        let limit = keep_radius.saturating_mul(2);
        let before = self.chunks.len();
        self.chunks
            .retain(|k, _| ChunkCoord::unpack(*k).chebyshev(center) <= limit);
        let evicted = before - self.chunks.len();
        if evicted > 0 {
            self.evicted_total += evicted as u64;
            log::debug!(
                target: "chunks",
                "evicted {evicted} chunk(s) beyond {limit} of ({}, {})",
                center.cx, center.cy
            );
        }
        evicted
    }

    /// Generate every chunk within `radius` of the reference tile, then evict
    /// far ones. Returns the number of chunks generated.
    pub fn preload(&mut self, ref_x: i32, ref_y: i32, radius: i32) -> usize {
        let mut generated = 0;
        for c in self.missing_around(ref_x, ref_y, radius) {
            if self.ensure(c) {
                generated += 1;
            }
        }
        self.evict_far(ref_x, ref_y, radius);
        generated
    }

    /// Tile at world `(wx, wy)`, generating its chunk on first access.
    pub fn get_tile(&mut self, wx: i32, wy: i32) -> TileId {
        let coord = self.world_to_chunk(wx, wy);
        let (lx, ly) = ChunkCoord::local(wx, wy, self.chunk_size);
        self.get_chunk(coord).get_local(lx, ly)
    }

    /// Tile at world `(wx, wy)` only if its chunk is cached.
    pub fn peek_tile(&self, wx: i32, wy: i32) -> Option<TileId> {
        let coord = self.world_to_chunk(wx, wy);
        let (lx, ly) = ChunkCoord::local(wx, wy, self.chunk_size);
        self.chunks.get(&coord.pack()).map(|c| c.get_local(lx, ly))
    }

    /// Record an edit and apply it to the cached chunk. Infinite worlds have
    /// no bounds, so this always succeeds.
    pub fn set_tile(&mut self, wx: i32, wy: i32, id: TileId) -> bool {
        let coord = self.world_to_chunk(wx, wy);
        self.ensure(coord);
        self.edits.set(wx, wy, id);
        self.edits.bump_region_around(wx, wy);
        if let Some(chunk) = self.chunks.get_mut(&coord.pack()) {
            chunk.set_world(wx, wy, id);
        }
        true
    }

    /// Restore recorded edits (e.g. from a save) without bumping revisions.
    pub fn restore_edits<I>(&mut self, edits: I)
    where
        I: IntoIterator<Item = ((i32, i32), TileId)>,
    {
        for ((wx, wy), id) in edits {
            self.edits.set(wx, wy, id);
            let coord = self.world_to_chunk(wx, wy);
            if let Some(chunk) = self.chunks.get_mut(&coord.pack()) {
                chunk.set_world(wx, wy, id);
            }
        }
    }

    pub fn stats(&self) -> ChunkStoreStats {
        let e = self.edits.stats();
        ChunkStoreStats {
            cached: self.chunks.len(),
            generated_total: self.generated_total,
            evicted_total: self.evicted_total,
            edited_chunks: e.chunk_entries,
            tile_edits: e.tile_edits,
        }
    }
}

impl TileAccess for ChunkStore {
    #[inline]
    fn tile(&mut self, x: i32, y: i32) -> TileId {
        self.get_tile(x, y)
    }

    #[inline]
    fn set_tile(&mut self, x: i32, y: i32, id: TileId) -> bool {
        ChunkStore::set_tile(self, x, y, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_world::{GenerationConfig, GenerationType, TilePalette};

    fn store(t: GenerationType) -> ChunkStore {
        let cfg = GenerationConfig::default().with_type(t).with_seed(1234);
        ChunkStore::new(16, Arc::new(TerrainGenerator::with_palette(cfg, TilePalette::default())))
    }

    #[test]
    fn negative_tile_maps_to_last_local_cell() {
        let mut s = store(GenerationType::Terraria);
        let t = s.get_tile(-1, -1);
        let chunk = s.get_chunk(ChunkCoord::new(-1, -1));
        assert_eq!(chunk.get_local(15, 15), t);
        assert_eq!(s.loaded_coords(), vec![ChunkCoord::new(-1, -1)]);
    }

    #[test]
    fn preload_then_evict_keeps_radius() {
        let mut s = store(GenerationType::Flat);
        assert_eq!(s.preload(0, 0, 1), 9);
        assert_eq!(s.preload(0, 0, 1), 0);
        // move far away: old chunks are beyond 2 * radius
        s.preload(16 * 10, 0, 1);
        assert!(s.loaded_coords().iter().all(|c| c.cx >= 7));
        let st = s.stats();
        assert_eq!(st.cached, 9);
        assert_eq!(st.generated_total, 18);
        assert_eq!(st.evicted_total, 9);
    }

    #[test]
    fn eviction_keeps_within_twice_radius() {
        let mut s = store(GenerationType::Flat);
        s.get_chunk(ChunkCoord::new(2, 0));
        s.get_chunk(ChunkCoord::new(3, 0));
        assert_eq!(s.evict_far(0, 0, 1), 1);
        assert!(s.is_loaded(ChunkCoord::new(2, 0)));
    }

    #[test]
    fn edits_survive_eviction() {
        let mut s = store(GenerationType::Terraria);
        assert!(s.set_tile(5, 5, 6));
        s.evict_far(16 * 100, 0, 0);
        assert!(!s.is_loaded(ChunkCoord::new(0, 0)));
        assert_eq!(s.get_tile(5, 5), 6);
        // pure generation does not see the edit
        let pure = s.generate_chunk(ChunkCoord::new(0, 0));
        let expected = s.generator().generate_block(0, 0, 16, 16).get(5, 5);
        assert_eq!(pure.get_local(5, 5), expected);
    }

    #[test]
    fn worker_chunks_are_deduplicated() {
        let mut s = store(GenerationType::Flat);
        let c = s.generate_chunk(ChunkCoord::new(4, 4));
        assert!(s.insert_generated(c.clone()));
        assert!(!s.insert_generated(c));
        assert_eq!(s.stats().cached, 1);
    }
}
