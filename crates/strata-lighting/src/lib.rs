//! Distance-to-exposure lighting for finite tile grids.
#![forbid(unsafe_code)]

use std::collections::VecDeque;

use strata_chunk::{Grid, TileBounds};
use strata_tiles::{AIR, TileRegistry};

const NEIGHBORS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Per-tile light in `[0, 1]`, same dimensions as the grid it was computed
/// from. Air tiles hold 0 here; consumers treat air as fully lit.
#[derive(Clone, Debug, PartialEq)]
pub struct LightGrid {
    width: usize,
    height: usize,
    gradient_size: u32,
    light: Vec<f32>,
}

impl LightGrid {
    pub fn new(width: usize, height: usize, gradient_size: u32) -> Self {
        Self {
            width,
            height,
            gradient_size: gradient_size.max(1),
            light: vec![0.0; width * height],
        }
    }

    /// Full recomputation over the whole grid.
    pub fn compute(grid: &Grid, reg: &TileRegistry, gradient_size: u32) -> Self {
        let mut lg = Self::new(grid.width(), grid.height(), gradient_size);
        if let Some(all) = TileBounds::new(0, 0, grid.width() as i32 - 1, grid.height() as i32 - 1)
            .clamp_to(grid.width(), grid.height())
        {
            lg.propagate(grid, reg, all, all);
        }
        log::debug!(
            target: "lighting",
            "computed {}x{} light grid (gradient {})",
            lg.width, lg.height, lg.gradient_size
        );
        lg
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn gradient_size(&self) -> u32 {
        self.gradient_size
    }

    #[inline]
    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Stored light; 0 outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> f32 {
        self.idx(x, y).map(|i| self.light[i]).unwrap_or(0.0)
    }

    pub fn values(&self) -> &[f32] {
        &self.light
    }

    /// Re-run the BFS for tiles whose light can change after edits inside
    /// `changed`. Gives the same result as a wholesale [`LightGrid::compute`].
    pub fn recompute_region(&mut self, grid: &Grid, reg: &TileRegistry, changed: TileBounds) {
        if grid.width() != self.width || grid.height() != self.height {
            *self = Self::compute(grid, reg, self.gradient_size);
            return;
        }
        let reach = self.gradient_size as i32 + 1;
        let Some(inner) = changed.expand(reach).clamp_to(self.width, self.height) else {
            return;
        };
        let Some(outer) = inner.expand(reach).clamp_to(self.width, self.height) else {
            return;
        };
        for (x, y) in inner.iter() {
            if let Some(i) = self.idx(x, y) {
                self.light[i] = 0.0;
            }
        }
        self.propagate(grid, reg, outer, inner);
        log::trace!(
            target: "lighting",
            "recomputed region ({}, {})..=({}, {})",
            inner.x0, inner.y0, inner.x1, inner.y1
        );
    }

    /// Multi-source BFS confined to `window`; only tiles in `write` are stored.
    fn propagate(&mut self, grid: &Grid, reg: &TileRegistry, window: TileBounds, write: TileBounds) {
        let w = window.width();
        let local = |x: i32, y: i32| (y - window.y0) as usize * w + (x - window.x0) as usize;
        let mut visited = vec![false; w * window.height()];
        let mut q: VecDeque<(i32, i32, u32)> = VecDeque::new();

        for (x, y) in window.iter() {
            if is_source(grid, reg, x, y) {
                visited[local(x, y)] = true;
                q.push_back((x, y, 0));
            }
        }

        let g = self.gradient_size;
        while let Some((x, y, d)) = q.pop_front() {
            if write.contains(x, y) {
                let v = (1.0 - d as f32 / g as f32).max(0.0);
                if let Some(i) = self.idx(x, y) {
                    self.light[i] = v;
                }
            }
            if d >= g {
                continue;
            }
            for (dx, dy) in NEIGHBORS_8 {
                let (nx, ny) = (x + dx, y + dy);
                if !window.contains(nx, ny) {
                    continue;
                }
                let li = local(nx, ny);
                if visited[li] || !reg.is_solid(grid.get(nx, ny)) {
                    continue;
                }
                visited[li] = true;
                q.push_back((nx, ny, d + 1));
            }
        }
    }
}

/// A solid tile with at least one air tile among its in-bounds 8 neighbors.
/// The world edge does not count as exposure.
pub fn is_source(grid: &Grid, reg: &TileRegistry, x: i32, y: i32) -> bool {
    if !reg.is_solid(grid.get(x, y)) {
        return false;
    }
    NEIGHBORS_8.iter().any(|&(dx, dy)| {
        let (nx, ny) = (x + dx, y + dy);
        grid.in_bounds(nx, ny) && grid.get(nx, ny) == AIR
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_grid(w: usize, h: usize) -> Grid {
        let mut g = Grid::new(w, h);
        g.block_mut().fill(3);
        g
    }

    #[test]
    fn light_falls_off_with_depth() {
        let mut g = solid_grid(5, 12);
        for x in 0..5 {
            g.set(x, 0, AIR);
        }
        let reg = TileRegistry::builtin();
        let lg = LightGrid::compute(&g, &reg, 4);
        assert_eq!(lg.get(2, 0), 0.0);
        assert_eq!(lg.get(2, 1), 1.0);
        assert_eq!(lg.get(2, 2), 0.75);
        assert_eq!(lg.get(2, 3), 0.5);
        assert_eq!(lg.get(2, 4), 0.25);
        assert_eq!(lg.get(2, 5), 0.0);
        assert_eq!(lg.get(2, 11), 0.0);
    }

    #[test]
    fn diagonal_exposure_counts() {
        let mut g = solid_grid(3, 3);
        g.set(0, 0, AIR);
        let reg = TileRegistry::builtin();
        let lg = LightGrid::compute(&g, &reg, 8);
        assert_eq!(lg.get(1, 1), 1.0);
        assert!(lg.get(2, 2) < 1.0);
    }

    #[test]
    fn fully_solid_grid_is_dark() {
        let g = solid_grid(6, 6);
        let lg = LightGrid::compute(&g, &TileRegistry::builtin(), 3);
        assert!(lg.values().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn region_update_after_digging() {
        let mut g = solid_grid(40, 40);
        for x in 0..40 {
            g.set(x, 0, AIR);
        }
        let reg = TileRegistry::builtin();
        let mut lg = LightGrid::compute(&g, &reg, 5);
        g.set(20, 25, AIR);
        lg.recompute_region(&g, &reg, TileBounds::point(20, 25));
        assert_eq!(lg, LightGrid::compute(&g, &reg, 5));
        assert_eq!(lg.get(20, 26), 1.0);
        assert_eq!(lg.get(20, 25), 0.0);
    }
}
