//! Shape rasterization onto a [`PixelBuffer`]
//!
//! Each shape kind maps onto one of the primitives below. Visibility rules:
//! - Lines and curve segments are clipped parametrically, so a segment lying
//!   along the surface edge is still drawn.
//! - Rectangles and polygons are skipped when none of their points is strictly
//!   inside the surface, and polygon-clipped when only some are.
//! - Circles are skipped when their bounding box misses the surface, or when
//!   an outline-only ring encloses it; stray pixels are dropped by the
//!   surface itself.

pub mod bezier;
pub mod circle;
pub mod fill;
pub mod line;

use crate::clip::{clip_line, clip_polygon};
use crate::display::PixelBuffer;
use crate::geometry::{Point, Rect};
use crate::shapes::{Color, Geometry, Scene, Shape};

/// Tunables for rasterization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Parameter increment used to flatten Bezier curves
    pub bezier_step: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            bezier_step: bezier::DEFAULT_STEP,
        }
    }
}

/// Clear the surface and draw every shape in ascending depth order
pub fn draw_scene(
    surface: &mut PixelBuffer,
    scene: &Scene,
    background: Color,
    options: &RenderOptions,
) {
    surface.clear(background);
    for shape in scene.iter() {
        draw_shape(surface, shape, options);
    }
    tracing::trace!("Redrew {} shapes", scene.len());
}

/// Rasterize one shape with its own style
pub fn draw_shape(surface: &mut PixelBuffer, shape: &Shape, options: &RenderOptions) {
    let style = shape.style;
    let fill = style.filled.then_some(style.fill);
    let window = surface.bounds();

    match shape.geometry() {
        Geometry::Line([a, b]) => draw_clipped_line(surface, *a, *b, &window, style.border),
        Geometry::Rectangle(points) => draw_closed(surface, points, style.border, fill),
        Geometry::Polygon(points) => draw_closed(surface, points, style.border, fill),
        Geometry::Circle([center, edge]) => {
            let r = circle::radius(*center, *edge);
            circle::draw_circle(surface, *center, r, style.border, fill);
        },
        Geometry::BezierCurve(control) => {
            let path = bezier::flatten(control, options.bezier_step);
            for pair in path.windows(2) {
                draw_clipped_line(surface, pair[0], pair[1], &window, style.border);
            }
        },
    }
}

fn draw_clipped_line(surface: &mut PixelBuffer, a: Point, b: Point, window: &Rect, color: Color) {
    if let Some((a, b)) = clip_line(a, b, window) {
        line::draw_line(surface, a, b, color);
    }
}

/// Rectangles and polygons: optional fill, then the closed outline
fn draw_closed(surface: &mut PixelBuffer, points: &[Point], border: Color, fill: Option<Color>) {
    let inside = points.iter().filter(|p| surface.is_inside(**p)).count();
    if inside == 0 {
        tracing::debug!("Skipping {}-point outline: no point inside surface", points.len());
        return;
    }

    let clipped;
    let outline: &[Point] = if inside == points.len() {
        points
    } else {
        clipped = clip_polygon(points, &surface.bounds());
        &clipped
    };
    if outline.len() < 2 {
        return;
    }

    if let Some(fill) = fill {
        fill::fill_polygon(surface, outline, fill);
    }
    for (i, &a) in outline.iter().enumerate() {
        let b = outline[(i + 1) % outline.len()];
        line::draw_line(surface, a, b, border);
    }
}
