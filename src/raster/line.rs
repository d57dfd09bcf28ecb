use crate::display::PixelBuffer;
use crate::geometry::Point;
use crate::shapes::Color;

/// Bresenham line from `a` to `b`, both endpoints included.
///
/// Integer-only: the dominant axis advances every step, the minor axis when
/// the decision variable goes non-negative.
pub fn line_points(a: Point, b: Point) -> Vec<Point> {
    // Deltas and the decision variable are widened; only the walk itself,
    // which stays between the endpoints, is in i32.
    let (ax, ay, bx, by) = (a.x as i64, a.y as i64, b.x as i64, b.y as i64);
    let dx = (bx - ax).abs();
    let dy = (by - ay).abs();
    let sx = (bx - ax).signum() as i32;
    let sy = (by - ay).signum() as i32;

    let mut points = Vec::with_capacity(dx.max(dy) as usize + 1);
    let (mut x, mut y) = (a.x, a.y);

    if dx >= dy {
        let mut p = 2 * dy - dx;
        let k1 = 2 * dy;
        let k2 = 2 * (dy - dx);
        while x != b.x {
            points.push(Point::new(x, y));
            x += sx;
            if p < 0 {
                p += k1;
            } else {
                y += sy;
                p += k2;
            }
        }
    } else {
        let mut p = 2 * dx - dy;
        let k1 = 2 * dx;
        let k2 = 2 * (dx - dy);
        while y != b.y {
            points.push(Point::new(x, y));
            y += sy;
            if p < 0 {
                p += k1;
            } else {
                x += sx;
                p += k2;
            }
        }
    }

    points.push(b);
    points
}

/// Rasterize a line. Pixels outside the surface are dropped.
pub fn draw_line(surface: &mut PixelBuffer, a: Point, b: Point, color: Color) {
    for p in line_points(a, b) {
        surface.set_pixel(p.x, p.y, color);
    }
}
