//! Move / rotate / scale applied to a shape's control points

use crate::geometry::{centroid, Point};
use crate::shapes::{Geometry, Shape};

/// An affine edit of a shape's control points
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Translate { dx: i32, dy: i32 },
    /// Degrees, counter-clockwise in math orientation (clockwise on screen)
    Rotate { degrees: f64 },
    Scale { sx: f64, sy: f64 },
}

impl Transform {
    pub fn uniform_scale(factor: f64) -> Self {
        Transform::Scale {
            sx: factor,
            sy: factor,
        }
    }

    /// Apply to `points` about `pivot`, rounding results to the nearest pixel
    pub fn apply_points(&self, points: &mut [Point], pivot: Point) {
        match *self {
            Transform::Translate { dx, dy } => {
                let offset = Point::new(dx, dy);
                for p in points.iter_mut() {
                    *p += offset;
                }
            },
            Transform::Rotate { degrees } => {
                let (sin, cos) = degrees.to_radians().sin_cos();
                let (cx, cy) = pivot.to_f64();
                for p in points.iter_mut() {
                    let (x, y) = (p.x as f64 - cx, p.y as f64 - cy);
                    *p = Point::from_f64(cx + x * cos - y * sin, cy + x * sin + y * cos);
                }
            },
            Transform::Scale { sx, sy } => {
                let (cx, cy) = pivot.to_f64();
                for p in points.iter_mut() {
                    let (x, y) = (p.x as f64 - cx, p.y as f64 - cy);
                    *p = Point::from_f64(cx + x * sx, cy + y * sy);
                }
            },
        }
    }

    /// Apply to a shape in place. Variant and point count never change.
    pub fn apply(&self, shape: &mut Shape) {
        let pivot = self.pivot(shape);
        self.apply_points(shape.points_mut(), pivot);
    }

    /// Center of the edit: the truncated mean of the control points (the
    /// midpoint for two-point shapes). Scaling a circle keeps its center put
    /// so only the radius changes.
    pub fn pivot(&self, shape: &Shape) -> Point {
        match (self, shape.geometry()) {
            (Transform::Scale { .. }, Geometry::Circle([center, _])) => *center,
            _ => centroid(shape.points()).unwrap_or_default(),
        }
    }
}
