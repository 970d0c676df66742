/// Integer points on the line from `(x0, y0)` to `(x1, y1)`, both ends
/// included, consecutive points 8-adjacent.
pub fn bresenham(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<(i32, i32)> {
    // i64 keeps the error terms exact across the whole i32 range
    let (x0, y0, x1, y1) = (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);
    let mut out = Vec::with_capacity(dx.max(-dy).min(4096) as usize + 1);
    loop {
        // every point lies between the two i32 endpoints
        out.push((x as i32, y as i32));
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_line() {
        assert_eq!(
            bresenham(0, 0, 5, 3),
            vec![(0, 0), (1, 1), (2, 1), (3, 2), (4, 2), (5, 3)]
        );
    }

    #[test]
    fn degenerate_and_reversed() {
        assert_eq!(bresenham(2, -3, 2, -3), vec![(2, -3)]);
        assert_eq!(bresenham(0, 0, 0, -3), vec![(0, 0), (0, -1), (0, -2), (0, -3)]);
        assert_eq!(bresenham(3, 0, 0, 0).len(), 4);
    }

    #[test]
    fn lines_at_the_coordinate_limits() {
        assert_eq!(
            bresenham(i32::MAX - 2, i32::MIN, i32::MAX, i32::MIN + 1),
            vec![(i32::MAX - 2, i32::MIN), (i32::MAX - 1, i32::MIN + 1), (i32::MAX, i32::MIN + 1)]
        );
        let pts = bresenham(i32::MIN, 0, i32::MIN + 3, 0);
        assert_eq!(pts.first(), Some(&(i32::MIN, 0)));
        assert_eq!(pts.last(), Some(&(i32::MIN + 3, 0)));
    }
}
