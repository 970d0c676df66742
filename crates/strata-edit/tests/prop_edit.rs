use std::sync::Arc;

use proptest::prelude::*;
use strata_chunk::{ChunkStore, Grid};
use strata_edit::{EditEngine, StrokeOp, bresenham};
use strata_world::{GenerationConfig, GenerationType, TerrainGenerator, TilePalette};

proptest! {
    #[test]
    fn bresenham_is_contiguous(x0 in -50i32..50, y0 in -50i32..50, x1 in -50i32..50, y1 in -50i32..50) {
        let pts = bresenham(x0, y0, x1, y1);
        prop_assert_eq!(pts[0], (x0, y0));
        prop_assert_eq!(*pts.last().unwrap(), (x1, y1));
        prop_assert_eq!(pts.len() as i32, (x1 - x0).abs().max((y1 - y0).abs()) + 1);
        for w in pts.windows(2) {
            prop_assert!((w[1].0 - w[0].0).abs() <= 1 && (w[1].1 - w[0].1).abs() <= 1);
        }
    }

    #[test]
    fn fill_on_air_grid_is_bounded_and_idempotent(w in 1usize..30, h in 1usize..30, sx in 0i32..30, sy in 0i32..30, tile in 1u16..8) {
        let (sx, sy) = (sx % w as i32, sy % h as i32);
        let mut g = Grid::new(w, h);
        let e = EditEngine::default();
        let out = e.fill(&mut g, sx, sy, tile);
        prop_assert!(out.changed <= w * h);
        prop_assert_eq!(out.changed, w * h);
        prop_assert_eq!(g.block().count(tile), w * h);
        prop_assert!(e.fill(&mut g, sx, sy, tile).is_empty());
    }

    #[test]
    fn erase_undoes_paint_on_air(x in 2i32..18, y in 2i32..18, r in 0.0f32..6.0) {
        let mut g = Grid::new(20, 20);
        let e = EditEngine::default();
        let painted = e.paint(&mut g, x, y, r, 4);
        let erased = e.erase(&mut g, x, y, r);
        prop_assert_eq!(painted.changed, erased.changed);
        prop_assert!(g.block().is_all_air());
    }
}

#[test]
fn fill_in_infinite_world_is_capped() {
    let mut cfg = GenerationConfig::default().with_type(GenerationType::Flat);
    cfg.terrain.grass_height = 40;
    let mut store = ChunkStore::new(16, Arc::new(TerrainGenerator::with_palette(cfg, TilePalette::default())));
    let out = EditEngine::new(500).fill(&mut store, 0, 0, 3);
    assert_eq!(out.changed, 500);
    assert_eq!(store.stats().tile_edits, 500);
}

#[test]
fn stroke_erases_along_line_in_chunk_store() {
    let cfg = GenerationConfig::default().with_type(GenerationType::Flat);
    let generator = TerrainGenerator::with_palette(cfg, TilePalette::default());
    let mut store = ChunkStore::new(8, Arc::new(generator));
    let out = EditEngine::default().stroke_to(&mut store, (-10, 30), (10, 30), StrokeOp::Erase { radius: 1.0 });
    assert_eq!(out.changed, 21);
    for x in -10..=10 {
        assert_eq!(store.get_tile(x, 30), 0);
    }
}
