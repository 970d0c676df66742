use proptest::prelude::*;
use strata_world::generation::{COAL_MAX_RATIO, depth_ratio, layered_height};
use strata_world::{GenerationConfig, GenerationType, TerrainGenerator, TilePalette};

fn generator(t: GenerationType, seed: u32) -> TerrainGenerator {
    TerrainGenerator::with_palette(
        GenerationConfig::default().with_type(t).with_seed(seed),
        TilePalette::default(),
    )
}

#[test]
fn flat_scenario_rows() {
    let mut cfg = GenerationConfig::default().with_type(GenerationType::Flat);
    cfg.terrain.grass_height = 5;
    cfg.terrain.dirt_depth = 3;
    let g = TerrainGenerator::with_palette(cfg, TilePalette::default());
    let b = g.generate_block(-500, 0, 1000, 20);
    for x in 0..1000 {
        assert_eq!(b.get(x, 4), 0);
        assert_eq!(b.get(x, 5), 1);
        assert_eq!(b.get(x, 6), 2);
        assert_eq!(b.get(x, 7), 2);
        assert_eq!(b.get(x, 8), 3);
    }
}

#[test]
fn shallow_ores_are_coal() {
    let mut cfg = GenerationConfig::default().with_seed(17);
    cfg.ores.frequency = 1.0;
    cfg.caves.frequency = 0.0;
    let p = TilePalette::default();
    let g = TerrainGenerator::with_palette(cfg.clone(), p);
    let b = g.generate_block(-40, 0, 80, 160);
    let mut coal = 0;
    for lx in 0..80 {
        let wx = -40 + lx as i32;
        let surface = layered_height(&cfg, wx);
        for wy in 0..160 {
            let t = b.get(lx as i32, wy);
            if t != p.coal && t != p.iron && t != p.gold {
                continue;
            }
            let ratio = depth_ratio(&cfg, wy, surface);
            if ratio < COAL_MAX_RATIO {
                assert_eq!(t, p.coal, "ore at ({wx},{wy}) ratio {ratio}");
                coal += 1;
            } else {
                assert_ne!(t, p.coal);
            }
        }
    }
    assert!(coal > 0);
}

#[test]
fn every_type_generates_something_solid() {
    for t in GenerationType::ALL {
        let b = generator(t, 99).generate_block(-64, 0, 128, 128);
        assert!(!b.is_all_air(), "{t:?} produced an empty world");
    }
}

fn any_type() -> impl Strategy<Value = GenerationType> {
    prop::sample::select(GenerationType::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    // A block split into four quarters generates the same tiles as the whole.
    #[test]
    fn split_blocks_match_whole(t in any_type(), seed in any::<u32>(), ox in -2000i32..2000, oy in -40i32..80) {
        let g = generator(t, seed);
        let whole = g.generate_block(ox, oy, 32, 32);
        for (qx, qy) in [(0, 0), (16, 0), (0, 16), (16, 16)] {
            let q = g.generate_block(ox + qx, oy + qy, 16, 16);
            for y in 0..16 {
                for x in 0..16 {
                    prop_assert_eq!(q.get(x, y), whole.get(x + qx, y + qy));
                }
            }
        }
    }

    // Generating other regions first never changes a region's tiles.
    #[test]
    fn generation_order_is_irrelevant(t in any_type(), seed in any::<u32>()) {
        let g = generator(t, seed);
        let first = g.generate_block(16, 0, 16, 16);
        let _ = g.generate_block(0, 0, 16, 16);
        let _ = g.generate_block(-16, 16, 16, 16);
        let again = g.generate_block(16, 0, 16, 16);
        prop_assert_eq!(first, again);
    }
}
