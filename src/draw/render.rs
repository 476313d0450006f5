//! Cairo-based rendering functions for strokes.

use super::color::Color;
use super::stroke::{Point, Smoothing, Stroke, StrokeStyle};

/// Fills the whole target with `color`, replacing whatever was there.
///
/// A transparent color clears the target to zero alpha.
pub fn render_background(ctx: &cairo::Context, color: Color) {
    let _ = ctx.save();
    ctx.set_operator(cairo::Operator::Source);
    color.apply(ctx);
    let _ = ctx.paint(); // Ignore errors - a failed paint leaves the previous pixels
    let _ = ctx.restore();
}

/// Renders all strokes in order (first stroke = bottom layer).
pub fn render_strokes(ctx: &cairo::Context, strokes: &[Stroke]) {
    for stroke in strokes {
        render_stroke(ctx, stroke);
    }
}

/// Renders a single committed stroke.
pub fn render_stroke(ctx: &cairo::Context, stroke: &Stroke) {
    render_points(ctx, stroke.points(), stroke.style());
}

fn render_points(ctx: &cairo::Context, points: &[Point], style: &StrokeStyle) {
    if points.is_empty() || style.width <= 0.0 || style.color.is_transparent() {
        return;
    }

    let _ = ctx.save();
    ctx.set_antialias(cairo::Antialias::Default);
    ctx.set_operator(cairo::Operator::Over);
    style.color.apply(ctx);
    ctx.set_line_width(style.width);
    ctx.set_line_cap(style.cap.to_cairo());
    ctx.set_line_join(cairo::LineJoin::Round);

    match style.smoothing {
        Smoothing::None => trace_polyline(ctx, points),
        Smoothing::Quadratic { tolerance } => trace_quadratic(ctx, points, tolerance),
    }

    let _ = ctx.stroke();
    let _ = ctx.restore();
}

/// Straight segments through every sample. A lone sample becomes a
/// zero-length segment so round and square caps still mark it.
fn trace_polyline(ctx: &cairo::Context, points: &[Point]) {
    let (x0, y0) = points[0];
    ctx.move_to(x0, y0);

    if points.len() == 1 {
        ctx.line_to(x0, y0);
        return;
    }

    for &(x, y) in &points[1..] {
        ctx.line_to(x, y);
    }
}

/// Quadratic midpoint smoothing.
///
/// Every accepted sample contributes a curve whose control point is the
/// previously accepted sample and whose end point is the midpoint between the
/// two. The path ends with a straight segment to the last accepted sample.
fn trace_quadratic(ctx: &cairo::Context, points: &[Point], tolerance: f64) {
    let (x0, y0) = points[0];
    ctx.move_to(x0, y0);

    let mut current = (x0, y0);
    let mut anchor = (x0, y0);

    for &(x, y) in &points[1..] {
        let dx = (x - anchor.0).abs();
        let dy = (y - anchor.1).abs();
        if dx < tolerance && dy < tolerance {
            continue;
        }

        let end = ((x + anchor.0) / 2.0, (y + anchor.1) / 2.0);
        quad_to(ctx, current, anchor, end);
        current = end;
        anchor = (x, y);
    }

    ctx.line_to(anchor.0, anchor.1);
}

/// Emits a quadratic Bezier as the equivalent cubic.
fn quad_to(ctx: &cairo::Context, from: Point, control: Point, to: Point) {
    let c1 = (
        from.0 + 2.0 / 3.0 * (control.0 - from.0),
        from.1 + 2.0 / 3.0 * (control.1 - from.1),
    );
    let c2 = (
        to.0 + 2.0 / 3.0 * (control.0 - to.0),
        to.1 + 2.0 / 3.0 * (control.1 - to.1),
    );
    ctx.curve_to(c1.0, c1.1, c2.0, c2.1, to.0, to.1);
}
