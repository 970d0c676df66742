use std::sync::Arc;
use std::time::Duration;

use strata_chunk::ChunkStore;
use strata_runtime::ChunkWorkers;
use strata_world::{ChunkCoord, GenerationConfig, GenerationType, TerrainGenerator, TilePalette};

fn store(seed: u32) -> ChunkStore {
    let cfg = GenerationConfig::default()
        .with_type(GenerationType::Terraria)
        .with_seed(seed);
    ChunkStore::new(16, Arc::new(TerrainGenerator::with_palette(cfg, TilePalette::default())))
}

#[test]
fn background_chunks_match_inline_generation() {
    let mut s = store(5);
    let mut workers = ChunkWorkers::new(2).unwrap();
    assert_eq!(workers.request_around(&s, 0, 0, 1), 9);
    assert!(workers.finish(&mut s, Duration::from_secs(30)));
    assert_eq!(s.stats().cached, 9);
    for c in s.loaded_coords() {
        let inline = s.generate_chunk(c);
        assert_eq!(s.get_chunk(c), &inline);
    }
}

#[test]
fn duplicate_requests_are_ignored() {
    let mut s = store(6);
    let mut workers = ChunkWorkers::new(1).unwrap();
    let c = ChunkCoord::new(3, -2);
    assert!(workers.request(&s, c));
    assert!(!workers.request(&s, c));
    assert!(workers.is_pending(c));
    assert!(workers.finish(&mut s, Duration::from_secs(30)));
    assert!(s.is_loaded(c));
    assert!(!workers.request(&s, c));
    assert_eq!(workers.pending_len(), 0);
}

#[test]
fn results_for_a_replaced_generator_are_dropped() {
    let mut s = store(7);
    let mut workers = ChunkWorkers::new(1).unwrap();
    workers.request(&s, ChunkCoord::new(0, 0));
    let cfg = GenerationConfig::default().with_type(GenerationType::Flat);
    s.set_generator(Arc::new(TerrainGenerator::with_palette(cfg, TilePalette::default())));
    assert!(workers.finish(&mut s, Duration::from_secs(30)));
    assert!(!s.is_loaded(ChunkCoord::new(0, 0)));
}

#[test]
fn edits_apply_to_worker_chunks() {
    let mut s = store(8);
    s.set_tile(2, 2, 6);
    s.evict_far(16 * 100, 0, 0);
    let mut workers = ChunkWorkers::new(1).unwrap();
    workers.request(&s, ChunkCoord::new(0, 0));
    assert!(workers.finish(&mut s, Duration::from_secs(30)));
    assert_eq!(s.peek_tile(2, 2), Some(6));
}
