//! Polygons and shape op-lists: path construction, even-odd scanline
//! fill, and polyline stroking.

use super::*;
use crate::error::{log_silent, PaintError};
use crate::geometry::Point;

/// A single drawing instruction in a client-supplied shape, interleaved
/// arbitrarily; [`flatten_ops`] materializes the resulting subpaths.
#[derive(Debug, Clone)]
pub enum ShapeOp {
    MoveTo(Point),
    LineTo(Point),
    /// Cubic Bézier: two control points plus an endpoint.
    BezierTo(Point, Point, Point),
    Close,
}

/// De Casteljau subdivision step count; fixed rather than adaptive since
/// shapes in this server are UI-scale, not print-resolution art.
const BEZIER_SEGMENTS: usize = 24;

fn flatten_cubic(p0: Point, p1: Point, p2: Point, p3: Point, out: &mut Vec<Point>) {
    for i in 1..=BEZIER_SEGMENTS {
        let t = i as f64 / BEZIER_SEGMENTS as f64;
        let mt = 1.0 - t;
        let x = mt * mt * mt * p0.x + 3.0 * mt * mt * t * p1.x + 3.0 * mt * t * t * p2.x + t * t * t * p3.x;
        let y = mt * mt * mt * p0.y + 3.0 * mt * mt * t * p1.y + 3.0 * mt * t * t * p2.y + t * t * t * p3.y;
        out.push(Point::new(x, y));
    }
}

/// Materializes a shape's op-list into closed/open subpaths. Each `MoveTo`
/// (after the first) starts a new subpath; `Close` just marks the current
/// subpath closed, it does not start a new one.
pub fn flatten_ops(ops: &[ShapeOp]) -> Vec<(Vec<Point>, bool)> {
    let mut subpaths = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut closed = false;
    let mut cursor = Point::ZERO;

    for op in ops {
        match op {
            ShapeOp::MoveTo(p) => {
                if !current.is_empty() {
                    subpaths.push((std::mem::take(&mut current), closed));
                    closed = false;
                }
                current.push(*p);
                cursor = *p;
            }
            ShapeOp::LineTo(p) => {
                current.push(*p);
                cursor = *p;
            }
            ShapeOp::BezierTo(c1, c2, end) => {
                flatten_cubic(cursor, *c1, *c2, *end, &mut current);
                cursor = *end;
            }
            ShapeOp::Close => {
                closed = true;
            }
        }
    }
    if !current.is_empty() {
        subpaths.push((current, closed));
    }
    subpaths
}

impl<'buf> Painter<'buf> {
    /// Fills a single closed polygon using the even-odd rule. Returns the
    /// touched (clipped) bounding rect; an empty or degenerate polygon
    /// (fewer than 3 vertices) touches nothing.
    pub fn fill_polygon_even_odd(&mut self, vertices: &[Point]) -> IRect {
        self.fill_subpaths_even_odd(&[(vertices.to_vec(), true)])
    }

    /// Fills every subpath in a shape op-list together under one even-odd
    /// rule, so a shape with a hole (an outer and an inner subpath wound
    /// oppositely) punches through correctly.
    pub fn fill_shape(&mut self, ops: &[ShapeOp]) -> IRect {
        let subpaths = flatten_ops(ops);
        self.fill_subpaths_even_odd(&subpaths)
    }

    pub fn stroke_shape(&mut self, ops: &[ShapeOp]) -> IRect {
        let subpaths = flatten_ops(ops);
        let mut touched = IRect::EMPTY;
        for (points, closed) in subpaths {
            touched = touched.union(&self.stroke_polyline(&points, closed));
        }
        touched
    }

    pub fn fill_polygon(&mut self, vertices: &[Point]) -> IRect {
        self.fill_polygon_even_odd(vertices)
    }

    pub fn stroke_polygon(&mut self, vertices: &[Point]) -> IRect {
        self.stroke_polyline(vertices, true)
    }

    fn fill_subpaths_even_odd(&mut self, subpaths: &[(Vec<Point>, bool)]) -> IRect {
        let mut bounds = IRect::EMPTY;
        for (points, _) in subpaths {
            if points.len() < 3 {
                log_silent(&PaintError::InvalidGeometry("degenerate subpath with fewer than 3 vertices".into()));
                continue;
            }
            let rect = points.iter().fold(IRect::EMPTY, |acc, p| {
                let pr = IRect::from_wh(p.x.floor() as i32, p.y.floor() as i32, 1, 1);
                if acc.is_empty() {
                    pr
                } else {
                    acc.union(&pr)
                }
            });
            bounds = bounds.union(&rect);
        }
        let clip = self.clipped_bounds(bounds);
        if clip.is_empty() {
            return clip;
        }

        for y in clip.top..clip.bottom {
            let scan_y = y as f64 + 0.5;
            let mut xs: Vec<f64> = Vec::new();
            for (points, _) in subpaths {
                if points.len() < 3 {
                    continue;
                }
                scanline_intersections(points, scan_y, &mut xs);
            }
            xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let mut i = 0;
            while i + 1 < xs.len() {
                let x0 = (xs[i].ceil() as i32).max(clip.left);
                let x1 = (xs[i + 1].floor() as i32 + 1).min(clip.right);
                for x in x0..x1 {
                    self.blend_pixel_unclipped(x, y);
                }
                i += 2;
            }
        }
        clip
    }

    /// Strokes each segment of `points` through [`Painter::stroke_line`];
    /// when `closed` is true the last vertex connects back to the first.
    pub fn stroke_polyline(&mut self, points: &[Point], closed: bool) -> IRect {
        if points.len() < 2 {
            return IRect::EMPTY;
        }
        let mut touched = IRect::EMPTY;
        for window in points.windows(2) {
            touched = touched.union(&self.stroke_line(window[0], window[1]));
        }
        if closed {
            touched = touched.union(&self.stroke_line(points[points.len() - 1], points[0]));
        }
        touched
    }
}

/// Appends every x where edge `(points[i], points[i+1])` crosses the
/// horizontal line `y = scan_y`, for the even-odd fill rule.
fn scanline_intersections(points: &[Point], scan_y: f64, out: &mut Vec<f64>) {
    let n = points.len();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        if (a.y <= scan_y && b.y > scan_y) || (b.y <= scan_y && a.y > scan_y) {
            let t = (scan_y - a.y) / (b.y - a.y);
            out.push(a.x + t * (b.x - a.x));
        }
    }
}
