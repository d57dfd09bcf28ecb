mod persist;
mod scene;

pub use persist::{LoadReport, SceneDocument, ShapeRecord, CSV_HEADER};
pub use scene::{Entry, Scene, ShapeId};

use crate::error::ShapeError;
use crate::geometry::Point;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Color
// ============================================================================

/// RGBA color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from unit-range channels, clamping each to 0..=1
    pub fn from_f64(r: f64, g: f64, b: f64, a: f64) -> Self {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0) as u8;
        Self::rgba(channel(r), channel(g), channel(b), channel(a))
    }

    /// Parse `#rrggbb` (alpha is opaque)
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{}'", s)))
    }
}

// ============================================================================
// Shape kinds
// ============================================================================

/// Variant tag of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Line,
    Rectangle,
    Polygon,
    Circle,
    BezierCurve,
}

/// How many control points a variant accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Line,
        ShapeKind::Rectangle,
        ShapeKind::Polygon,
        ShapeKind::Circle,
        ShapeKind::BezierCurve,
    ];

    /// Name used in persisted records
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Line => "Line",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Polygon => "Polygon",
            ShapeKind::Circle => "Circle",
            ShapeKind::BezierCurve => "BezierCurve",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            ShapeKind::Line | ShapeKind::Circle => Arity::Exactly(2),
            ShapeKind::Rectangle => Arity::Exactly(4),
            ShapeKind::Polygon => Arity::AtLeast(3),
            ShapeKind::BezierCurve => Arity::AtLeast(2),
        }
    }

    /// Arity a persisted record must meet. Stored curves need a real control
    /// point between their endpoints; everything else matches [`Self::arity`].
    pub fn record_arity(&self) -> Arity {
        match self {
            ShapeKind::BezierCurve => Arity::AtLeast(3),
            other => other.arity(),
        }
    }

    /// Check a point count against this variant's arity contract
    pub fn check_arity(&self, found: usize) -> Result<(), ShapeError> {
        self.check_against(self.arity(), found)
    }

    /// Check a point count against the stricter arity used on load
    pub fn check_record_arity(&self, found: usize) -> Result<(), ShapeError> {
        self.check_against(self.record_arity(), found)
    }

    fn check_against(&self, arity: Arity, found: usize) -> Result<(), ShapeError> {
        match arity {
            Arity::Exactly(expected) if found != expected => Err(ShapeError::ArityMismatch {
                kind: *self,
                expected,
                found,
            }),
            Arity::AtLeast(expected) if found < expected => Err(ShapeError::InsufficientPoints {
                kind: *self,
                expected,
                found,
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s.trim())
            .ok_or_else(|| s.trim().to_string())
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// Control points of a shape, one variant per shape kind.
///
/// Fixed-arity variants store arrays so their point count cannot drift;
/// open variants are validated on construction and replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Geometry {
    /// Endpoints
    Line([Point; 2]),
    /// Corners in the winding order chosen at creation
    Rectangle([Point; 4]),
    /// Boundary in insertion order, implicitly closed
    Polygon(Vec<Point>),
    /// `[center, point on the circumference]`
    Circle([Point; 2]),
    /// Control points of a single curve of degree n-1
    BezierCurve(Vec<Point>),
}

impl Geometry {
    /// Build geometry of the given kind, rejecting point lists that break its arity
    pub fn from_points(kind: ShapeKind, points: Vec<Point>) -> Result<Self, ShapeError> {
        kind.check_arity(points.len())?;
        Ok(match kind {
            ShapeKind::Line => Geometry::Line([points[0], points[1]]),
            ShapeKind::Rectangle => {
                Geometry::Rectangle([points[0], points[1], points[2], points[3]])
            },
            ShapeKind::Polygon => Geometry::Polygon(points),
            ShapeKind::Circle => Geometry::Circle([points[0], points[1]]),
            ShapeKind::BezierCurve => Geometry::BezierCurve(points),
        })
    }

    /// Four corners from two opposite drag corners.
    ///
    /// A down-right or up-left drag walks `a -> (b.x, a.y) -> b -> (a.x, b.y)`,
    /// any other drag walks `a -> (a.x, b.y) -> b -> (b.x, a.y)`.
    pub fn rectangle_from_corners(a: Point, b: Point) -> Self {
        let same_direction = (b.y > a.y && b.x > a.x) || (b.y < a.y && a.x > b.x);
        if same_direction {
            Geometry::Rectangle([a, Point::new(b.x, a.y), b, Point::new(a.x, b.y)])
        } else {
            Geometry::Rectangle([a, Point::new(a.x, b.y), b, Point::new(b.x, a.y)])
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Line(_) => ShapeKind::Line,
            Geometry::Rectangle(_) => ShapeKind::Rectangle,
            Geometry::Polygon(_) => ShapeKind::Polygon,
            Geometry::Circle(_) => ShapeKind::Circle,
            Geometry::BezierCurve(_) => ShapeKind::BezierCurve,
        }
    }

    pub fn points(&self) -> &[Point] {
        match self {
            Geometry::Line(p) | Geometry::Circle(p) => &p[..],
            Geometry::Rectangle(p) => &p[..],
            Geometry::Polygon(p) | Geometry::BezierCurve(p) => p.as_slice(),
        }
    }

    /// Mutable view of the control points. The count cannot change through it.
    pub fn points_mut(&mut self) -> &mut [Point] {
        match self {
            Geometry::Line(p) | Geometry::Circle(p) => &mut p[..],
            Geometry::Rectangle(p) => &mut p[..],
            Geometry::Polygon(p) | Geometry::BezierCurve(p) => p.as_mut_slice(),
        }
    }

    /// Replace all control points, keeping the variant
    pub fn set_points(&mut self, points: Vec<Point>) -> Result<(), ShapeError> {
        *self = Geometry::from_points(self.kind(), points)?;
        Ok(())
    }
}

// ============================================================================
// Shape
// ============================================================================

/// Fill flag and colors of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub filled: bool,
    pub border: Color,
    pub fill: Color,
}

impl Style {
    pub fn new(filled: bool, border: Color, fill: Color) -> Self {
        Self {
            filled,
            border,
            fill,
        }
    }

    pub fn outline(border: Color) -> Self {
        Self::new(false, border, border)
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::outline(Color::BLACK)
    }
}

/// A drawable shape: geometry, style and its depth in the scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    geometry: Geometry,
    pub style: Style,
    depth: i32,
}

impl Shape {
    pub fn new(geometry: Geometry, style: Style) -> Self {
        Self {
            geometry,
            style,
            depth: 0,
        }
    }

    pub fn line(a: Point, b: Point, style: Style) -> Self {
        Self::new(Geometry::Line([a, b]), style)
    }

    pub fn circle(center: Point, edge: Point, style: Style) -> Self {
        Self::new(Geometry::Circle([center, edge]), style)
    }

    pub fn rectangle(a: Point, b: Point, style: Style) -> Self {
        Self::new(Geometry::rectangle_from_corners(a, b), style)
    }

    pub fn polygon(points: Vec<Point>, style: Style) -> Result<Self, ShapeError> {
        Ok(Self::new(Geometry::from_points(ShapeKind::Polygon, points)?, style))
    }

    pub fn bezier(points: Vec<Point>, style: Style) -> Result<Self, ShapeError> {
        Ok(Self::new(
            Geometry::from_points(ShapeKind::BezierCurve, points)?,
            style,
        ))
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn points(&self) -> &[Point] {
        self.geometry.points()
    }

    pub fn points_mut(&mut self) -> &mut [Point] {
        self.geometry.points_mut()
    }

    pub fn set_points(&mut self, points: Vec<Point>) -> Result<(), ShapeError> {
        self.geometry.set_points(points)
    }

    /// Draw-order key. Owned by the scene, which keeps it in sync with its entry.
    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub(crate) fn set_depth(&mut self, depth: i32) {
        self.depth = depth;
    }

    pub fn is_filled(&self) -> bool {
        self.style.filled
    }

    pub fn border_color(&self) -> Color {
        self.style.border
    }

    pub fn fill_color(&self) -> Color {
        self.style.fill
    }

    pub fn set_colors(&mut self, border: Color, fill: Color) {
        self.style.border = border;
        self.style.fill = fill;
    }
}
