//! Arcs, ellipses and rounded rectangles.
//!
//! Flattened to line segments at a fixed angular step and filled/stroked
//! through the polygon path uniformly, regardless of radius — no separate
//! small-radius midpoint/Bresenham specialization. Flattening is exact
//! enough for the scanline fill to reproduce the same pixel set at the
//! sizes this server draws UI chrome at.

use super::*;
use crate::geometry::Point;
use std::f64::consts::PI;

/// Degrees → radians, clamped so an arc span always resolves to something
/// between "nothing" and "the full ellipse" rather than wrapping past it.
fn clamp_span(span_degrees: f64) -> f64 {
    span_degrees.clamp(-360.0, 360.0)
}

fn ellipse_points(center: Point, rx: f64, ry: f64, start_deg: f64, span_deg: f64, segments: usize) -> Vec<Point> {
    let span = clamp_span(span_deg);
    let start = start_deg.to_radians();
    let sweep = span.to_radians();
    (0..=segments)
        .map(|i| {
            let t = start + sweep * (i as f64 / segments as f64);
            Point::new(center.x + rx * t.cos(), center.y - ry * t.sin())
        })
        .collect()
}

/// Segment count scales with radius so large ellipses still look round
/// without paying the cost at small ones.
fn segment_count(rx: f64, ry: f64) -> usize {
    let r = rx.max(ry);
    (r * 0.5).clamp(12.0, 256.0) as usize
}

impl<'buf> Painter<'buf> {
    pub fn fill_ellipse(&mut self, center: Point, rx: f64, ry: f64) -> IRect {
        let points = ellipse_points(center, rx, ry, 0.0, 360.0, segment_count(rx, ry));
        self.fill_polygon_even_odd(&points)
    }

    pub fn stroke_ellipse(&mut self, center: Point, rx: f64, ry: f64) -> IRect {
        let points = ellipse_points(center, rx, ry, 0.0, 360.0, segment_count(rx, ry));
        self.stroke_polyline(&points, true)
    }

    /// Arc span is measured in degrees counter-clockwise from `start_deg`;
    /// `|span_deg| >= 360` draws the full ellipse (the clamp in
    /// [`clamp_span`] guarantees this since flattening a >=360 sweep over
    /// the parametrization covers every point on the curve exactly once).
    pub fn stroke_arc(&mut self, center: Point, rx: f64, ry: f64, start_deg: f64, span_deg: f64) -> IRect {
        let points = ellipse_points(center, rx, ry, start_deg, span_deg, segment_count(rx, ry));
        self.stroke_polyline(&points, false)
    }

    pub fn fill_arc(&mut self, center: Point, rx: f64, ry: f64, start_deg: f64, span_deg: f64) -> IRect {
        let mut points = ellipse_points(center, rx, ry, start_deg, span_deg, segment_count(rx, ry));
        points.push(center);
        self.fill_polygon_even_odd(&points)
    }

    /// `rect` is interpreted the same pixel-area way as [`Painter::fill_rect`];
    /// `radius` is clamped to half the shorter side so corners never overlap.
    pub fn fill_round_rect(&mut self, rect: IRect, radius_x: f64, radius_y: f64) -> IRect {
        let points = round_rect_outline(rect, radius_x, radius_y);
        self.fill_polygon_even_odd(&points)
    }

    pub fn stroke_round_rect(&mut self, rect: IRect, radius_x: f64, radius_y: f64) -> IRect {
        let points = round_rect_outline(rect, radius_x, radius_y);
        self.stroke_polyline(&points, true)
    }
}

fn round_rect_outline(rect: IRect, radius_x: f64, radius_y: f64) -> Vec<Point> {
    let rx = radius_x.min(rect.width() as f64 / 2.0).max(0.0);
    let ry = radius_y.min(rect.height() as f64 / 2.0).max(0.0);
    let (l, t, r, b) = (rect.left as f64, rect.top as f64, rect.right as f64, rect.bottom as f64);
    let corner_segments = 8;
    let mut points = Vec::new();
    let corner = |cx: f64, cy: f64, start_deg: f64| -> Vec<Point> {
        (0..=corner_segments)
            .map(|i| {
                let t = (start_deg + 90.0 * (i as f64 / corner_segments as f64)).to_radians();
                Point::new(cx + rx * t.cos(), cy - ry * t.sin())
            })
            .collect()
    };
    points.extend(corner(r - rx, t + ry, 0.0));
    points.extend(corner(r - rx, b - ry, -90.0));
    points.extend(corner(l + rx, b - ry, -180.0));
    points.extend(corner(l + rx, t + ry, -270.0));
    points
}
