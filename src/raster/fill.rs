//! Scanline polygon fill with an edge table and an active edge list

use crate::display::PixelBuffer;
use crate::geometry::Point;
use crate::shapes::Color;

/// One non-horizontal polygon edge, oriented so `start.y < end.y`.
///
/// `end.y` is pulled up by one row so that a vertex shared by two edges is
/// only counted once on its scanline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub start: Point,
    pub end: Point,
    /// dy/dx, infinite for vertical edges
    pub slope: f64,
    /// dx/dy, the x step per scanline
    pub inv_slope: f64,
    /// x at the current scanline
    pub x: f64,
}

impl Edge {
    /// None for horizontal edges, which never cross a scanline
    pub fn new(a: Point, b: Point) -> Option<Self> {
        if a.y == b.y {
            return None;
        }
        let (start, end) = if a.y < b.y { (a, b) } else { (b, a) };
        let dx = end.x as f64 - start.x as f64;
        let dy = end.y as f64 - start.y as f64;

        let slope = if dx == 0.0 { f64::INFINITY } else { dy / dx };
        let inv_slope = if dx == 0.0 { 0.0 } else { dx / dy };

        Some(Self {
            start,
            end: Point::new(end.x, end.y - 1),
            slope,
            inv_slope,
            x: start.x as f64,
        })
    }
}

/// A filled run of pixels on one row, `x_start..=x_end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub y: i32,
    pub x_start: i32,
    pub x_end: i32,
}

/// Edges of a closed polygon sorted by starting row
pub fn build_edges(points: &[Point]) -> Vec<Edge> {
    let mut edges: Vec<Edge> = points
        .iter()
        .enumerate()
        .filter_map(|(i, &a)| Edge::new(a, points[(i + 1) % points.len()]))
        .collect();
    edges.sort_by_key(|e| e.start.y);
    edges
}

/// Compute the interior spans of a polygon, row by row from the top
pub fn scanline_spans(points: &[Point]) -> Vec<Span> {
    let mut spans = Vec::new();
    if points.len() < 3 {
        return spans;
    }

    let edges = build_edges(points);
    let (Some(y_min), Some(y_max)) = (
        edges.iter().map(|e| e.start.y).min(),
        edges.iter().map(|e| e.end.y).max(),
    ) else {
        return spans;
    };
    if y_min > y_max {
        return spans;
    }

    // Edge table: edges bucketed by their first scanline
    let rows = (y_max as i64 - y_min as i64 + 1) as usize;
    let mut table: Vec<Vec<Edge>> = vec![Vec::new(); rows];
    for edge in edges {
        let Some(bucket) = table.get_mut((edge.start.y as i64 - y_min as i64) as usize) else {
            return spans;
        };
        bucket.push(edge);
    }

    let mut active: Vec<Edge> = Vec::new();
    for (row, bucket) in table.into_iter().enumerate() {
        let y = (y_min as i64 + row as i64) as i32;
        active.extend(bucket);
        active.sort_by(|a, b| a.x.total_cmp(&b.x));

        for pair in active.chunks_exact(2) {
            let x_start = pair[0].x.round() as i32;
            let x_end = pair[1].x.round() as i32;
            if x_start <= x_end {
                spans.push(Span { y, x_start, x_end });
            }
        }

        active.retain(|e| e.end.y != y);
        for edge in &mut active {
            edge.x += edge.inv_slope;
        }
    }

    spans
}

/// Fill the interior of a closed polygon
pub fn fill_polygon(surface: &mut PixelBuffer, points: &[Point], color: Color) {
    for span in scanline_spans(points) {
        surface.hline(span.x_start, span.x_end, span.y, color);
    }
}
