//! Line geometry: value scaling and cubic spline smoothing.

use egui::{Pos2, Rect, Vec2, pos2};

/// Smoothing applied to every attribution line.
pub const LINE_TENSION: f32 = 0.4;

/// Space left around the plot for axes and labels.
pub(crate) const PLOT_MARGIN: Vec2 = Vec2::new(48.0, 20.0);

const SEGMENT_STEPS: usize = 12;

/// Plot area inside a chart of `size`, origin at the top left.
pub(crate) fn plot_rect(size: Vec2) -> Rect {
    let min = pos2(PLOT_MARGIN.x, PLOT_MARGIN.y * 0.5);
    let max = pos2(
        (size.x - PLOT_MARGIN.x * 0.25).max(min.x + 1.0),
        (size.y - PLOT_MARGIN.y).max(min.y + 1.0),
    );
    Rect::from_min_max(min, max)
}

/// Value range padded so a flat series still gets a visible band.
pub(crate) fn value_bounds(range: (f64, f64)) -> (f64, f64) {
    let (lo, hi) = range;
    if (hi - lo).abs() < f64::EPSILON {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
        return (lo - pad, hi + pad);
    }
    (lo, hi)
}

/// Map each value to a pixel position. A single frame sits in the middle.
pub(crate) fn scale_points(values: &[f64], bounds: (f64, f64), plot: Rect) -> Vec<Pos2> {
    let (lo, hi) = bounds;
    let span = (hi - lo).max(f64::EPSILON);
    let last = values.len().saturating_sub(1);
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            let x = if last == 0 {
                plot.center().x
            } else {
                plot.left() + plot.width() * index as f32 / last as f32
            };
            let t = ((value - lo) / span) as f32;
            pos2(x, plot.bottom() - t * plot.height())
        })
        .collect()
}

/// Control points before and after every point, scaled by distance to its
/// neighbours and clamped into the plot.
fn control_points(points: &[Pos2], tension: f32, plot: Rect) -> Vec<(Pos2, Pos2)> {
    (0..points.len())
        .map(|i| {
            let current = points[i];
            let previous = if i == 0 { current } else { points[i - 1] };
            let next = points.get(i + 1).copied().unwrap_or(current);
            let d01 = previous.distance(current);
            let d12 = current.distance(next);
            let total = d01 + d12;
            let (s01, s12) = if total > 0.0 {
                (d01 / total, d12 / total)
            } else {
                (0.0, 0.0)
            };
            let delta = next - previous;
            let before = current - delta * (tension * s01);
            let after = current + delta * (tension * s12);
            (plot.clamp(before), plot.clamp(after))
        })
        .collect()
}

/// Sampled polyline through every point using cubic Bezier segments.
pub(crate) fn smooth_curve(points: &[Pos2], tension: f32, plot: Rect) -> Vec<Pos2> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let controls = control_points(points, tension, plot);
    let mut curve = Vec::with_capacity((points.len() - 1) * SEGMENT_STEPS + 1);
    curve.push(points[0]);
    for i in 0..points.len() - 1 {
        let (p0, p3) = (points[i], points[i + 1]);
        let p1 = controls[i].1;
        let p2 = controls[i + 1].0;
        for step in 1..=SEGMENT_STEPS {
            let t = step as f32 / SEGMENT_STEPS as f32;
            curve.push(cubic(p0, p1, p2, p3, t));
        }
    }
    curve
}

fn cubic(p0: Pos2, p1: Pos2, p2: Pos2, p3: Pos2, t: f32) -> Pos2 {
    let u = 1.0 - t;
    let a = u * u * u;
    let b = 3.0 * u * u * t;
    let c = 3.0 * u * t * t;
    let d = t * t * t;
    pos2(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}
