//! Clipping against the rectangular viewport
//!
//! Lines use parametric (Liang–Barsky style) clipping against the four window
//! edges; polygons use Sutherland–Hodgman with a single `x >= bound` test and
//! a quarter-turn of the point set between passes.

use crate::geometry::{Point, Rect};

/// Clip the segment `p1 -> p2` to `window`.
///
/// Returns the visible part, or None when nothing of the segment lies inside.
pub fn clip_line(p1: Point, p2: Point, window: &Rect) -> Option<(Point, Point)> {
    let (x1, y1) = p1.to_f64();
    let d = (p2.x as f64 - p1.x as f64, p2.y as f64 - p1.y as f64);

    let corners = window.corners();
    let mut t_min: f64 = 0.0;
    let mut t_max: f64 = 1.0;

    for i in 0..corners.len() {
        let e1 = corners[i];
        let e2 = corners[(i + 1) % corners.len()];
        // Inward normal of the edge e1 -> e2 (corners run clockwise in screen space)
        let n = (e1.y as f64 - e2.y as f64, e2.x as f64 - e1.x as f64);
        let w = (x1 - e1.x as f64, y1 - e1.y as f64);

        let dn = d.0 * n.0 + d.1 * n.1;
        let wn = w.0 * n.0 + w.1 * n.1;

        if dn == 0.0 {
            // Parallel: entirely on one side of this edge
            if wn < 0.0 {
                return None;
            }
            continue;
        }

        let t = -wn / dn;
        if dn > 0.0 {
            if t > 1.0 {
                return None;
            }
            t_min = t_min.max(t);
        } else {
            if t < 0.0 {
                return None;
            }
            t_max = t_max.min(t);
        }
    }

    if t_min >= t_max {
        return None;
    }

    let at = |t: f64| Point::from_f64(x1 + t * d.0, y1 + t * d.1);
    Some((at(t_min), at(t_max)))
}

/// Clip a closed polygon to `window`.
///
/// The result may have fewer than three points (or none) when the polygon is
/// mostly or entirely outside; callers draw nothing in that case.
pub fn clip_polygon(points: &[Point], window: &Rect) -> Vec<Point> {
    // left, top, right, bottom as `x >= bound` in successively rotated frames.
    // Negating and rotating can leave the i32 range, so passes run in i64.
    let bounds = [
        window.min_x as i64,
        window.min_y as i64,
        -(window.max_x as i64),
        -(window.max_y as i64),
    ];

    let mut current: Vec<(i64, i64)> = points.iter().map(|p| (p.x as i64, p.y as i64)).collect();
    for bound in bounds {
        if current.is_empty() {
            break;
        }
        current = clip_pass(&current, bound);
        // Four quarter-turns bring the surviving points back to screen space
        for p in &mut current {
            *p = rotate_quarter(*p);
        }
    }

    // Survivors lie inside the window, so they fit in i32 again
    current
        .into_iter()
        .map(|(x, y)| Point::new(narrow(x), narrow(y)))
        .collect()
}

#[inline]
fn narrow(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// (x, y) -> (y, -x)
#[inline]
fn rotate_quarter((x, y): (i64, i64)) -> (i64, i64) {
    (y, -x)
}

/// One Sutherland–Hodgman pass keeping the half-plane `x >= bound`
fn clip_pass(points: &[(i64, i64)], bound: i64) -> Vec<(i64, i64)> {
    let inside = |p: &(i64, i64)| p.0 >= bound;
    let mut out = Vec::with_capacity(points.len() + 2);

    let mut s = points[points.len() - 1];
    for &e in points {
        match (inside(&s), inside(&e)) {
            (true, true) => out.push(e),
            (true, false) => {
                if let Some(p) = intersect(s, e, bound) {
                    out.push(p);
                }
            },
            (false, true) => {
                if let Some(p) = intersect(s, e, bound) {
                    out.push(p);
                }
                out.push(e);
            },
            (false, false) => {},
        }
        s = e;
    }

    out
}

/// Where the edge `s -> e` crosses the vertical line `x = bound`
fn intersect(s: (i64, i64), e: (i64, i64), bound: i64) -> Option<(i64, i64)> {
    if s.0 == e.0 {
        return None;
    }
    let t = (bound - s.0) as f64 / (e.0 - s.0) as f64;
    let y = s.1 as f64 + t * (e.1 - s.1) as f64;
    Some((bound, y.round() as i64))
}
