//! Integer geometry shared by the clipper, rasterizer and transform engine

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};

/// A pixel-space point. All shape geometry is integer-coordinate.
///
/// Any `i32` is a valid coordinate. Point arithmetic saturates at the `i32`
/// limits, and the clipper and rasterizer widen before subtracting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Round a floating point position to the nearest pixel
    #[inline]
    pub fn from_f64(x: f64, y: f64) -> Self {
        Self::new(x.round() as i32, y.round() as i32)
    }

    #[inline]
    pub fn to_f64(self) -> (f64, f64) {
        (self.x as f64, self.y as f64)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        *self = *self + rhs;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned clip window, inclusive on all four sides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Rect {
    /// The window covering a `width` x `height` surface: (0,0) to (width-1, height-1)
    pub fn from_size(width: u32, height: u32) -> Self {
        Self {
            min_x: 0,
            min_y: 0,
            max_x: width as i32 - 1,
            max_y: height as i32 - 1,
        }
    }

    /// Corners in the order the line clipper walks them: top-left, top-right,
    /// bottom-right, bottom-left
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }

    /// Inclusive containment (points on the border count)
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// Mean of the points, truncated toward zero. None for an empty slice.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as f64;
    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x as f64, sy + p.y as f64));

    Some(Point::new((sum_x / n) as i32, (sum_y / n) as i32))
}

/// Bounding box of a point set
pub fn bounds(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    let mut rect = Rect {
        min_x: first.x,
        min_y: first.y,
        max_x: first.x,
        max_y: first.y,
    };

    for p in &points[1..] {
        rect.min_x = rect.min_x.min(p.x);
        rect.min_y = rect.min_y.min(p.y);
        rect.max_x = rect.max_x.max(p.x);
        rect.max_y = rect.max_y.max(p.y);
    }

    Some(rect)
}

/// Linear interpolation between two float positions
#[inline]
pub fn lerp(a: (f64, f64), b: (f64, f64), t: f64) -> (f64, f64) {
    (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid_truncates() {
        let points = [Point::new(0, 0), Point::new(3, 0), Point::new(0, 4)];
        // (1.0, 1.33) -> (1, 1)
        assert_eq!(centroid(&points), Some(Point::new(1, 1)));
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn test_centroid_of_two_points_is_midpoint() {
        let points = [Point::new(10, 10), Point::new(21, 30)];
        assert_eq!(centroid(&points), Some(Point::new(15, 20)));
    }

    #[test]
    fn test_rect_from_size() {
        let r = Rect::from_size(500, 400);
        assert_eq!(r.max_x, 499);
        assert_eq!(r.max_y, 399);
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(499, 399)));
        assert!(!r.contains(Point::new(500, 0)));
    }

    #[test]
    fn test_bounds() {
        let points = [Point::new(5, -2), Point::new(-1, 7), Point::new(3, 3)];
        let b = bounds(&points).unwrap();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (-1, -2, 5, 7));
        assert!(bounds(&[]).is_none());
    }

    #[test]
    fn test_point_math_saturates_at_limits() {
        let far = Point::new(i32::MAX - 1, i32::MIN + 1);
        assert_eq!(far + Point::new(10, -10), Point::new(i32::MAX, i32::MIN));
        assert_eq!(far - Point::new(-10, 10), Point::new(i32::MAX, i32::MIN));

        let mut p = far;
        p += Point::new(5, -5);
        assert_eq!(p, Point::new(i32::MAX, i32::MIN));
    }

    #[test]
    fn test_distance_across_full_range() {
        let a = Point::new(i32::MIN, 0);
        let b = Point::new(i32::MAX, 0);
        assert_eq!(a.distance_to(&b), u32::MAX as f64);
    }

    #[test]
    fn test_point_rounding() {
        assert_eq!(Point::from_f64(1.5, -1.5), Point::new(2, -2));
        assert_eq!(Point::from_f64(2.49, 7.51), Point::new(2, 8));
    }
}
