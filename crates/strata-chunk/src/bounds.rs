/// Inclusive tile-space rectangle `[x0, x1] × [y0, y1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileBounds {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl TileBounds {
    pub const fn point(x: i32, y: i32) -> Self {
        Self { x0: x, y0: y, x1: x, y1: y }
    }

    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    pub fn include(&mut self, x: i32, y: i32) {
        self.x0 = self.x0.min(x);
        self.y0 = self.y0.min(y);
        self.x1 = self.x1.max(x);
        self.y1 = self.y1.max(y);
    }

    pub fn union(self, other: TileBounds) -> TileBounds {
        TileBounds {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    pub fn expand(self, by: i32) -> TileBounds {
        TileBounds {
            x0: self.x0.saturating_sub(by),
            y0: self.y0.saturating_sub(by),
            x1: self.x1.saturating_add(by),
            y1: self.y1.saturating_add(by),
        }
    }

    /// Clip to `[0, width) × [0, height)`; `None` when nothing is left.
    pub fn clamp_to(self, width: usize, height: usize) -> Option<TileBounds> {
        if width == 0 || height == 0 {
            return None;
        }
        let max_x = i32::try_from(width - 1).unwrap_or(i32::MAX);
        let max_y = i32::try_from(height - 1).unwrap_or(i32::MAX);
        let b = TileBounds {
            x0: self.x0.max(0),
            y0: self.y0.max(0),
            x1: self.x1.min(max_x),
            y1: self.y1.min(max_y),
        };
        (b.x0 <= b.x1 && b.y0 <= b.y1).then_some(b)
    }

    #[inline]
    pub fn width(&self) -> usize {
        (i64::from(self.x1) - i64::from(self.x0)) as usize + 1
    }

    #[inline]
    pub fn height(&self) -> usize {
        (i64::from(self.y1) - i64::from(self.y0)) as usize + 1
    }

    pub fn iter(self) -> impl Iterator<Item = (i32, i32)> {
        (self.y0..=self.y1).flat_map(move |y| (self.x0..=self.x1).map(move |x| (x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_drops_outside_parts() {
        let b = TileBounds::new(-3, 2, 4, 9).clamp_to(3, 5);
        assert_eq!(b, Some(TileBounds::new(0, 2, 2, 4)));
        assert_eq!(TileBounds::point(10, 0).clamp_to(3, 3), None);
    }

    #[test]
    fn include_grows_and_iter_is_row_major() {
        let mut b = TileBounds::point(1, 1);
        b.include(2, 0);
        assert_eq!(b.iter().collect::<Vec<_>>(), vec![(1, 0), (2, 0), (1, 1), (2, 1)]);
        assert_eq!((b.width(), b.height()), (2, 2));
    }
}
