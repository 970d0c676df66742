//! Read-only spatial queries over tile solidity, in tile units
//! (tile `(x, y)` covers `[x, x+1) × [y, y+1)`).

use strata_geom::{Rect, Vec2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub hit: bool,
    pub tile_x: i32,
    pub tile_y: i32,
    /// Distance from the start to where the ray enters the hit tile, or the
    /// full segment length on a miss.
    pub distance: f32,
}

#[inline]
fn span_tiles(r: &Rect) -> impl Iterator<Item = (i32, i32)> {
    let (x0, y0, x1, y1) = r.tile_span();
    (y0..=y1).flat_map(move |y| (x0..=x1).map(move |x| (x, y)))
}

/// True when a solid tile overlaps `rect`. Touching edges do not collide.
pub fn check_rect_collision<F>(rect: Rect, mut is_solid: F) -> bool
where
    F: FnMut(i32, i32) -> bool,
{
    if rect.is_empty() {
        return false;
    }
    span_tiles(&rect).any(|(x, y)| Rect::tile(x, y).intersects(&rect) && is_solid(x, y))
}

pub fn check_circle_collision<F>(center: Vec2, radius: f32, mut is_solid: F) -> bool
where
    F: FnMut(i32, i32) -> bool,
{
    if !(radius > 0.0) {
        return false;
    }
    let bounds = Rect::new(
        Vec2::new(center.x - radius, center.y - radius),
        Vec2::new(center.x + radius, center.y + radius),
    );
    span_tiles(&bounds).any(|(x, y)| Rect::tile(x, y).intersects_circle(center, radius) && is_solid(x, y))
}

/// Solid tiles overlapping `rect`, row-major.
pub fn get_solid_tiles_in_rect<F>(rect: Rect, mut is_solid: F) -> Vec<(i32, i32)>
where
    F: FnMut(i32, i32) -> bool,
{
    if rect.is_empty() {
        return Vec::new();
    }
    span_tiles(&rect)
        .filter(|&(x, y)| Rect::tile(x, y).intersects(&rect) && is_solid(x, y))
        .collect()
}

#[inline]
fn inv_or_max(v: f32) -> f32 {
    if v.abs() < 1e-8 { f32::MAX } else { 1.0 / v.abs() }
}

/// Grid traversal from `start` toward `end`; reports the first solid tile.
pub fn raycast<F>(start: Vec2, end: Vec2, mut is_solid: F) -> RayHit
where
    F: FnMut(i32, i32) -> bool,
{
    let mut vx = start.x.floor() as i32;
    let mut vy = start.y.floor() as i32;
    if is_solid(vx, vy) {
        return RayHit {
            hit: true,
            tile_x: vx,
            tile_y: vy,
            distance: 0.0,
        };
    }
    let delta = end - start;
    let max_dist = delta.length();
    let miss = RayHit {
        hit: false,
        tile_x: end.x.floor() as i32,
        tile_y: end.y.floor() as i32,
        distance: max_dist,
    };
    if max_dist < 1e-6 {
        return miss;
    }
    let d = delta / max_dist;

    let stepx = if d.x > 0.0 { 1 } else if d.x < 0.0 { -1 } else { 0 };
    let stepy = if d.y > 0.0 { 1 } else if d.y < 0.0 { -1 } else { 0 };
    let invx = inv_or_max(d.x);
    let invy = inv_or_max(d.y);
    let tdx = if stepx == 0 { f32::MAX } else { invx };
    let tdy = if stepy == 0 { f32::MAX } else { invy };

    let fx = start.x - start.x.floor();
    let fy = start.y - start.y.floor();
    let mut tmx = if stepx > 0 { (1.0 - fx) * invx } else if stepx < 0 { fx * invx } else { f32::MAX };
    let mut tmy = if stepy > 0 { (1.0 - fy) * invy } else if stepy < 0 { fy * invy } else { f32::MAX };

    // each step crosses one tile boundary; a segment crosses at most this many
    let max_steps = (delta.x.abs().ceil() + delta.y.abs().ceil()) as usize + 2;
    for _ in 0..max_steps {
        let t;
        if tmx < tmy {
            vx = vx.saturating_add(stepx);
            t = tmx;
            tmx += tdx;
        } else {
            vy = vy.saturating_add(stepy);
            t = tmy;
            tmy += tdy;
        }
        if t > max_dist {
            break;
        }
        if is_solid(vx, vy) {
            return RayHit {
                hit: true,
                tile_x: vx,
                tile_y: vy,
                distance: t,
            };
        }
    }
    miss
}
