//! Brush, flood fill, eyedropper and stroke tools over any [`TileAccess`].
#![forbid(unsafe_code)]

mod line;

use strata_chunk::{TileAccess, TileBounds};
use strata_tiles::{AIR, TileId};

pub use line::bresenham;

pub const DEFAULT_MAX_FILL_TILES: usize = 10_000;

/// Tiles actually changed by an edit and the box around them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditOutcome {
    pub changed: usize,
    pub bounds: Option<TileBounds>,
}

impl EditOutcome {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changed == 0
    }

    fn record(&mut self, x: i32, y: i32) {
        self.changed += 1;
        match self.bounds.as_mut() {
            Some(b) => b.include(x, y),
            None => self.bounds = Some(TileBounds::point(x, y)),
        }
    }

    pub fn merge(&mut self, other: EditOutcome) {
        self.changed += other.changed;
        self.bounds = match (self.bounds, other.bounds) {
            (Some(a), Some(b)) => Some(a.union(b)),
            (a, b) => a.or(b),
        };
    }
}

/// Operation applied at each point of a stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StrokeOp {
    Paint { radius: f32, tile: TileId },
    Erase { radius: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditEngine {
    max_fill_tiles: usize,
}

impl Default for EditEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILL_TILES)
    }
}

impl EditEngine {
    pub fn new(max_fill_tiles: usize) -> Self {
        Self { max_fill_tiles }
    }

    #[inline]
    pub fn max_fill_tiles(&self) -> usize {
        self.max_fill_tiles
    }

    /// Write one tile, counting it only when the id actually changes.
    fn put<W: TileAccess + ?Sized>(world: &mut W, x: i32, y: i32, id: TileId, out: &mut EditOutcome) -> bool {
        if world.tile(x, y) == id {
            return false;
        }
        if world.set_tile(x, y, id) {
            out.record(x, y);
            return true;
        }
        false
    }

    /// Set every tile with `sqrt(dx² + dy²) <= radius / 2` around `(x, y)`.
    pub fn paint<W: TileAccess + ?Sized>(&self, world: &mut W, x: i32, y: i32, radius: f32, tile: TileId) -> EditOutcome {
        let mut out = EditOutcome::default();
        let half = (radius.max(0.0)) / 2.0;
        let reach = half.floor() as i32;
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let d = f64::from(dx).hypot(f64::from(dy));
                if d > f64::from(half) {
                    continue;
                }
                if let (Some(tx), Some(ty)) = (x.checked_add(dx), y.checked_add(dy)) {
                    Self::put(world, tx, ty, tile, &mut out);
                }
            }
        }
        if !out.is_empty() {
            log::debug!(target: "edit", "paint {tile} at ({x}, {y}) r={radius}: {} tile(s)", out.changed);
        }
        out
    }

    pub fn erase<W: TileAccess + ?Sized>(&self, world: &mut W, x: i32, y: i32, radius: f32) -> EditOutcome {
        self.paint(world, x, y, radius, AIR)
    }

    /// 4-connected flood fill of the region sharing the seed's tile id.
    /// Stops after `max_fill_tiles` changes.
    pub fn fill<W: TileAccess + ?Sized>(&self, world: &mut W, x: i32, y: i32, tile: TileId) -> EditOutcome {
        let mut out = EditOutcome::default();
        let original = world.tile(x, y);
        if original == tile {
            return out;
        }
        let mut stack = vec![(x, y)];
        while let Some((cx, cy)) = stack.pop() {
            if out.changed >= self.max_fill_tiles {
                log::warn!(
                    target: "edit",
                    "flood fill at ({x}, {y}) truncated after {} tiles",
                    self.max_fill_tiles
                );
                break;
            }
            if world.tile(cx, cy) != original {
                continue;
            }
            // rejected writes mark the world edge; do not grow past them
            if !Self::put(world, cx, cy, tile, &mut out) {
                continue;
            }
            let neighbours = [
                (cx.checked_add(1), Some(cy)),
                (cx.checked_sub(1), Some(cy)),
                (Some(cx), cy.checked_add(1)),
                (Some(cx), cy.checked_sub(1)),
            ];
            stack.extend(neighbours.into_iter().filter_map(|(nx, ny)| Some((nx?, ny?))));
        }
        log::debug!(target: "edit", "fill {original} -> {tile} from ({x}, {y}): {} tile(s)", out.changed);
        out
    }

    /// Eyedropper: the tile under `(x, y)`, or `current` when that is air.
    pub fn sample<W: TileAccess + ?Sized>(&self, world: &mut W, x: i32, y: i32, current: TileId) -> TileId {
        match world.tile(x, y) {
            AIR => current,
            id => id,
        }
    }

    /// Apply `op` at every tile on the line from the previous pointer position
    /// to the current one.
    pub fn stroke_to<W: TileAccess + ?Sized>(
        &self,
        world: &mut W,
        last: (i32, i32),
        to: (i32, i32),
        op: StrokeOp,
    ) -> EditOutcome {
        let mut out = EditOutcome::default();
        for (x, y) in bresenham(last.0, last.1, to.0, to.1) {
            let step = match op {
                StrokeOp::Paint { radius, tile } => self.paint(world, x, y, radius, tile),
                StrokeOp::Erase { radius } => self.erase(world, x, y, radius),
            };
            out.merge(step);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_chunk::Grid;

    #[test]
    fn brush_footprint() {
        let mut g = Grid::new(9, 9);
        let e = EditEngine::default();
        // radius 1 means half 0.5: only the center
        assert_eq!(e.paint(&mut g, 4, 4, 1.0, 3).changed, 1);
        // radius 2 adds the 4 cardinal neighbors
        let out = e.paint(&mut g, 4, 4, 2.0, 3);
        assert_eq!(out.changed, 4);
        assert_eq!(out.bounds, Some(TileBounds::new(3, 3, 5, 5)));
        assert_eq!(g.get(3, 3), 0);
        // radius 3 (half 1.5) adds diagonals
        assert_eq!(e.paint(&mut g, 4, 4, 3.0, 3).changed, 4);
        assert_eq!(e.erase(&mut g, 4, 4, 3.0).changed, 9);
        assert!(g.block().is_all_air());
    }

    #[test]
    fn brush_clips_at_grid_edge() {
        let mut g = Grid::new(4, 4);
        let out = EditEngine::default().paint(&mut g, 0, 0, 3.0, 2);
        assert_eq!(out.changed, 4);
    }

    #[test]
    fn fill_stops_at_other_tiles() {
        let mut g = Grid::new(5, 3);
        for y in 0..3 {
            g.set(2, y, 3);
        }
        let e = EditEngine::default();
        let out = e.fill(&mut g, 0, 0, 1);
        assert_eq!(out.changed, 6);
        assert_eq!(g.get(3, 1), 0);
        assert!(e.fill(&mut g, 0, 0, 1).is_empty());
    }

    #[test]
    fn fill_is_capped() {
        let mut g = Grid::new(50, 50);
        let out = EditEngine::new(100).fill(&mut g, 25, 25, 2);
        assert_eq!(out.changed, 100);
        assert_eq!(g.block().count(2), 100);
    }

    #[test]
    fn sample_keeps_selection_on_air() {
        let mut g = Grid::new(3, 3);
        g.set(1, 1, 5);
        let e = EditEngine::default();
        assert_eq!(e.sample(&mut g, 1, 1, 2), 5);
        assert_eq!(e.sample(&mut g, 0, 0, 2), 2);
        assert_eq!(e.sample(&mut g, -5, 0, 2), 2);
    }

    #[test]
    fn stroke_paints_contiguous_path() {
        let mut g = Grid::new(12, 12);
        let out = EditEngine::default().stroke_to(&mut g, (1, 1), (10, 4), StrokeOp::Paint { radius: 1.0, tile: 3 });
        assert_eq!(out.changed, 10);
        assert_eq!(g.get(1, 1), 3);
        assert_eq!(g.get(10, 4), 3);
        assert_eq!(out.bounds, Some(TileBounds::new(1, 1, 10, 4)));
    }
}
