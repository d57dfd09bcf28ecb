use crate::display::PixelBuffer;
use crate::geometry::{Point, Rect};
use crate::shapes::Color;

/// Radius from the center to the edge point, rounded to the nearest pixel.
///
/// Widened to `i64`: two `i32` points can be more than `i32::MAX` apart.
pub fn radius(center: Point, edge: Point) -> i64 {
    center.distance_to(&edge).round() as i64
}

/// Midpoint circle: the (x, y) offsets of one octant, from the top going
/// clockwise until x passes y. Mirror each through all eight octants for the
/// full outline.
pub fn octant(radius: i64) -> Octant {
    let y = radius.max(0);
    Octant { x: 0, y, p: 1 - y }
}

/// Streaming octant walk, see [`octant`]
#[derive(Debug, Clone)]
pub struct Octant {
    x: i64,
    y: i64,
    p: i64,
}

impl Iterator for Octant {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.x > self.y {
            return None;
        }
        let offset = (self.x, self.y);
        self.x += 1;
        if self.p < 0 {
            self.p += 2 * self.x + 1;
        } else {
            self.y -= 1;
            self.p += 2 * (self.x - self.y) + 1;
        }
        Some(offset)
    }
}

/// How much of a circle can reach the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// Bounding box misses the surface
    Outside,
    /// The surface sits strictly inside the ring, clear of every outline pixel
    Enclosed,
    /// The ring may cross the surface
    Crossing,
}

/// Classify a circle against `window`. `Enclosed` keeps a margin of a few
/// pixels so the midpoint rounding can never put an outline pixel there.
pub fn coverage(center: Point, radius: i64, window: &Rect) -> Coverage {
    let (cx, cy) = (center.x as i64, center.y as i64);
    if cx + radius < window.min_x as i64
        || cx - radius > window.max_x as i64
        || cy + radius < window.min_y as i64
        || cy - radius > window.max_y as i64
    {
        return Coverage::Outside;
    }

    const MARGIN: i64 = 3;
    if radius <= MARGIN {
        return Coverage::Crossing;
    }
    let far = window
        .corners()
        .iter()
        .map(|c| {
            let dx = (c.x as i64 - cx) as i128;
            let dy = (c.y as i64 - cy) as i128;
            dx * dx + dy * dy
        })
        .max()
        .unwrap_or(0);
    let inner = (radius - MARGIN) as i128;
    if far < inner * inner {
        Coverage::Enclosed
    } else {
        Coverage::Crossing
    }
}

/// Draw a circle outline, optionally filling the interior first.
///
/// Fill spans for every octant step are laid down before any boundary pixel,
/// so the border is never overdrawn by a wider span on the same row. A circle
/// that encloses the whole surface costs one clear (filled) or nothing.
pub fn draw_circle(
    surface: &mut PixelBuffer,
    center: Point,
    radius: i64,
    border: Color,
    fill: Option<Color>,
) {
    match coverage(center, radius, &surface.bounds()) {
        Coverage::Outside => {
            tracing::debug!("Skipping circle at {:?}: outside surface", center);
            return;
        },
        Coverage::Enclosed => {
            match fill {
                Some(fill) => surface.clear(fill),
                None => tracing::debug!("Skipping circle at {:?}: ring encloses surface", center),
            }
            return;
        },
        Coverage::Crossing => {},
    }

    let (cx, cy) = (center.x as i64, center.y as i64);

    if let Some(fill) = fill {
        for (x, y) in octant(radius) {
            span(surface, cx - x, cx + x, cy + y, fill);
            span(surface, cx - x, cx + x, cy - y, fill);
            span(surface, cx - y, cx + y, cy + x, fill);
            span(surface, cx - y, cx + y, cy - x, fill);
        }
    }

    for (x, y) in octant(radius) {
        for (px, py) in [
            (cx + x, cy + y),
            (cx - x, cy + y),
            (cx + x, cy - y),
            (cx - x, cy - y),
            (cx + y, cy + x),
            (cx - y, cy + x),
            (cx + y, cy - x),
            (cx - y, cy - x),
        ] {
            if let (Ok(px), Ok(py)) = (i32::try_from(px), i32::try_from(py)) {
                surface.set_pixel(px, py, border);
            }
        }
    }
}

/// Horizontal run in widened coordinates; rows off the surface cost nothing
fn span(surface: &mut PixelBuffer, x1: i64, x2: i64, y: i64, color: Color) {
    if y < 0 || y >= surface.height() as i64 {
        return;
    }
    let edge = surface.width() as i64;
    let clamp = |x: i64| x.clamp(-1, edge) as i32;
    surface.hline(clamp(x1), clamp(x2), y as i32, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);

    fn surface() -> PixelBuffer {
        let mut s = PixelBuffer::with_size(41, 41);
        s.clear(Color::WHITE);
        s
    }

    #[test]
    fn test_radius_beyond_i32() {
        let r = radius(Point::new(0, i32::MIN), Point::new(0, i32::MAX));
        assert_eq!(r, u32::MAX as i64);
    }

    #[test]
    fn test_radius_rounds() {
        assert_eq!(radius(Point::new(0, 0), Point::new(3, 4)), 5);
        assert_eq!(radius(Point::new(0, 0), Point::new(1, 1)), 1);
    }

    #[test]
    fn test_octant_starts_at_top_and_ends_on_diagonal() {
        let offsets: Vec<(i64, i64)> = octant(5).collect();
        assert_eq!(offsets[0], (0, 5));
        let (x, y) = *offsets.last().unwrap();
        assert!(x <= y);
        assert!(y - x <= 1);
    }

    #[test]
    fn test_outline_is_symmetric() {
        let mut s = surface();
        draw_circle(&mut s, Point::new(20, 20), 8, Color::BLACK, None);

        for y in 0..41 {
            for x in 0..41 {
                let here = s.get_pixel(x, y);
                assert_eq!(here, s.get_pixel(40 - x, y), "mirror x at ({}, {})", x, y);
                assert_eq!(here, s.get_pixel(x, 40 - y), "mirror y at ({}, {})", x, y);
                assert_eq!(here, s.get_pixel(y, x), "transpose at ({}, {})", x, y);
            }
        }
        for p in [(28, 20), (12, 20), (20, 28), (20, 12)] {
            assert_eq!(s.get_pixel(p.0, p.1), Some(Color::BLACK));
        }
        assert_eq!(s.get_pixel(20, 20), Some(Color::WHITE));
    }

    #[test]
    fn test_filled_circle_keeps_border_color() {
        let mut s = surface();
        draw_circle(&mut s, Point::new(20, 20), 5, Color::BLACK, Some(RED));

        assert_eq!(s.get_pixel(20, 20), Some(RED));
        assert_eq!(s.get_pixel(22, 21), Some(RED));
        for p in [(25, 20), (15, 20), (20, 25), (20, 15)] {
            assert_eq!(s.get_pixel(p.0, p.1), Some(Color::BLACK));
        }
        // Top row: every pixel is boundary
        for x in 18..=22 {
            assert_ne!(s.get_pixel(x, 15), Some(RED));
        }
        assert_eq!(s.get_pixel(26, 20), Some(Color::WHITE));
    }

    #[test]
    fn test_fill_covers_every_boundary_row() {
        let mut s = surface();
        draw_circle(&mut s, Point::new(20, 20), 6, Color::BLACK, Some(RED));
        for y in 15..=25 {
            assert_eq!(s.get_pixel(20, y), Some(RED), "row {}", y);
        }
    }

    #[test]
    fn test_zero_radius_is_one_pixel() {
        let mut s = surface();
        draw_circle(&mut s, Point::new(3, 3), 0, Color::BLACK, None);
        assert_eq!(s.count_color(Color::BLACK), 1);
    }

    #[test]
    fn test_partially_offscreen_circle() {
        let mut s = surface();
        draw_circle(&mut s, Point::new(0, 0), 10, Color::BLACK, Some(RED));
        assert_eq!(s.get_pixel(0, 0), Some(RED));
        assert_eq!(s.get_pixel(10, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_huge_ring_around_surface_draws_nothing() {
        let mut s = surface();
        let center = Point::new(20, 20);
        let r = radius(center, Point::new(20, 300_000_020));
        assert_eq!(coverage(center, r, &s.bounds()), Coverage::Enclosed);

        draw_circle(&mut s, center, r, Color::BLACK, None);
        assert_eq!(s.count_color(Color::WHITE), 41 * 41);
    }

    #[test]
    fn test_huge_filled_circle_floods_surface() {
        let mut s = surface();
        draw_circle(&mut s, Point::new(20, 20), 300_000_000, Color::BLACK, Some(RED));
        assert_eq!(s.count_color(RED), 41 * 41);
    }

    #[test]
    fn test_large_ring_crossing_surface_is_drawn() {
        let mut s = surface();
        // Top of the ring lands on row 10
        let center = Point::new(20, 200_010);
        assert_eq!(coverage(center, 200_000, &s.bounds()), Coverage::Crossing);
        draw_circle(&mut s, center, 200_000, Color::BLACK, None);
        assert_eq!(s.get_pixel(20, 10), Some(Color::BLACK));
        assert_eq!(s.get_pixel(20, 9), Some(Color::WHITE));
        assert_eq!(s.get_pixel(20, 11), Some(Color::WHITE));
    }

    #[test]
    fn test_circle_near_coordinate_limits() {
        let mut s = surface();
        draw_circle(&mut s, Point::new(i32::MAX, i32::MIN), 5, Color::BLACK, Some(RED));
        assert_eq!(s.count_color(Color::WHITE), 41 * 41);
        assert_eq!(
            coverage(Point::new(i32::MIN, 0), i32::MAX as i64, &s.bounds()),
            Coverage::Crossing
        );
    }
}
