use crate::geometry::{lerp, Point};

/// Default parameter increment when flattening a curve
pub const DEFAULT_STEP: f64 = 0.01;

/// Evaluate the curve at `t` by repeated linear interpolation
pub fn de_casteljau(control: &[Point], t: f64) -> Option<(f64, f64)> {
    let mut work: Vec<(f64, f64)> = control.iter().map(|p| p.to_f64()).collect();
    if work.is_empty() {
        return None;
    }

    for level in (1..work.len()).rev() {
        for i in 0..level {
            work[i] = lerp(work[i], work[i + 1], t);
        }
    }
    Some(work[0])
}

/// Sample the curve every `step` of t and return the polyline through the
/// samples. The exact last control point always closes the polyline.
pub fn flatten(control: &[Point], step: f64) -> Vec<Point> {
    let (Some(&first), Some(&last)) = (control.first(), control.last()) else {
        return Vec::new();
    };
    if control.len() == 1 {
        return vec![first];
    }

    let step = if step.is_finite() && step > 0.0 && step <= 1.0 {
        step
    } else {
        DEFAULT_STEP
    };
    // Tolerate float drift so a step of 0.01 yields exactly 100 intervals
    let samples = (1.0 / step + 1e-9).floor() as usize;

    let mut points = Vec::with_capacity(samples + 2);
    for i in 0..=samples {
        let t = i as f64 * step;
        if let Some((x, y)) = de_casteljau(control, t) {
            let p = Point::from_f64(x, y);
            if points.last() != Some(&p) {
                points.push(p);
            }
        }
    }
    if points.last() != Some(&last) {
        points.push(last);
    }
    points
}
