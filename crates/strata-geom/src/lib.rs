//! Minimal 2D geometry types shared by the world crates.
#![forbid(unsafe_code)]

use core::ops::{Div, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn dot(self, rhs: Vec2) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

/// Axis-aligned rectangle in world units (tile edge = 1.0). `min` is inclusive,
/// `max` exclusive when converted to tile ranges.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(x + w, y + h))
    }

    /// Unit rectangle covering tile `(tx, ty)`.
    #[inline]
    pub fn tile(tx: i32, ty: i32) -> Self {
        Self::from_xywh(tx as f32, ty as f32, 1.0, 1.0)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    /// Strict overlap: rectangles that merely share an edge do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
        )
    }

    #[inline]
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        let d = center - self.closest_point(center);
        d.dot(d) < radius * radius
    }

    /// Inclusive tile range `(x0, y0, x1, y1)` touched by this rectangle.
    #[inline]
    pub fn tile_span(&self) -> (i32, i32, i32, i32) {
        let x0 = self.min.x.floor() as i32;
        let y0 = self.min.y.floor() as i32;
        let x1 = (self.max.x.ceil() as i32).saturating_sub(1).max(x0);
        let y1 = (self.max.y.ceil() as i32).saturating_sub(1).max(y0);
        (x0, y0, x1, y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::tile(0, 0);
        let b = Rect::tile(1, 0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Rect::from_xywh(0.5, 0.5, 1.0, 1.0)));
    }

    #[test]
    fn tile_span_covers_partial_tiles() {
        let r = Rect::from_xywh(0.5, -0.5, 2.0, 1.0);
        assert_eq!(r.tile_span(), (0, -1, 2, 0));
    }

    #[test]
    fn tile_span_saturates_far_out() {
        let far = i32::MIN as f32;
        let r = Rect::new(Vec2::new(far * 2.0, far * 2.0), Vec2::new(far, far));
        assert_eq!(r.tile_span(), (i32::MIN, i32::MIN, i32::MIN, i32::MIN));
        let r = Rect::from_xywh(1e12, 0.0, 1e12, 1.0);
        assert_eq!(r.tile_span(), (i32::MAX, 0, i32::MAX, 0));
    }

    #[test]
    fn circle_inside_rect_intersects() {
        let r = Rect::tile(3, 3);
        assert!(r.intersects_circle(Vec2::new(3.5, 3.5), 0.1));
        assert!(!r.intersects_circle(Vec2::new(6.0, 6.0), 1.0));
    }
}
