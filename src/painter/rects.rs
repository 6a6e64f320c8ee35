//! Rectangle fills and strokes.
//!
//! Fills are interpreted as *pixel-area*: a rect `(l, t, r, b)` covers the
//! inclusive `[l, r] x [t, b]` pixel range (the bottom-right corner is
//! extended by one before converting to the half-open [`IRect`] the rest of
//! the crate uses). Strokes are *pixel-index*: the four edges trace exactly
//! the rect's border at its given coordinates.

use super::*;
use crate::drawing_mode::{AlphaFncMode, AlphaSrcMode};

impl<'buf> Painter<'buf> {
    /// Fills `rect`, interpreted as pixel-area (bottom-right inclusive).
    /// Dispatches to the direct word-write fast path for solid-pattern
    /// `COPY`/`OVER`, the row-blend fast path for solid-pattern
    /// `ALPHA | PIXEL_ALPHA | OVERLAY`, and falls back to per-pixel
    /// compositing otherwise.
    pub fn fill_rect(&mut self, rect: IRect) -> IRect {
        let area = IRect::new(rect.left, rect.top, rect.right + 1, rect.bottom + 1);
        let touched = self.clipped_bounds(area);
        if touched.is_empty() {
            return touched;
        }

        if self.pattern.is_solid_high() && matches!(self.state.drawing_mode, DrawingMode::Copy | DrawingMode::Over) {
            let color = self.state.high_color;
            for y in touched.top..touched.bottom {
                self.fill_row_solid(y, touched.left, touched.right, color);
            }
            return touched;
        }

        if self.pattern.is_solid_high()
            && matches!(
                self.state.drawing_mode,
                DrawingMode::Alpha(AlphaSrcMode::PixelAlpha | AlphaSrcMode::ConstantAlpha, AlphaFncMode::Overlay)
            )
        {
            return self.blend_rows_alpha(touched);
        }

        for y in touched.top..touched.bottom {
            for x in touched.left..touched.right {
                self.blend_pixel_unclipped(x, y);
            }
        }
        touched
    }

    /// The common translucent-window-background path: blends a solid
    /// source color into every row without re-resolving the pattern per
    /// pixel (the pattern is already known solid).
    fn blend_rows_alpha(&mut self, touched: IRect) -> IRect {
        let src = self.state.high_color;
        let mode = self.state.drawing_mode;
        let high = self.state.high_color;
        let low = self.state.low_color;
        let constant_alpha = self.state.constant_alpha;
        let rounding = self.state.rounding;
        for y in touched.top..touched.bottom {
            for x in touched.left..touched.right {
                let dst = self.buffer.get_pixel(x, y);
                let sample = PatternSample::new(src, true);
                let out = mode.blend(sample, dst, high, low, constant_alpha, rounding);
                self.buffer.set_pixel(x, y, out);
            }
        }
        touched
    }

    /// Strokes the rect's border, pixel-index semantics (no bottom-right
    /// extension). Implemented as four line strokes through
    /// [`Painter::stroke_line`] so cap/join/pen-size behavior matches lines.
    pub fn stroke_rect(&mut self, rect: IRect) -> IRect {
        let tl = Point::new(rect.left as f64, rect.top as f64);
        let tr = Point::new(rect.right as f64, rect.top as f64);
        let br = Point::new(rect.right as f64, rect.bottom as f64);
        let bl = Point::new(rect.left as f64, rect.bottom as f64);
        let mut touched = IRect::EMPTY;
        touched = touched.union(&self.stroke_line(tl, tr));
        touched = touched.union(&self.stroke_line(tr, br));
        touched = touched.union(&self.stroke_line(br, bl));
        touched = touched.union(&self.stroke_line(bl, tl));
        touched
    }
}

use crate::geometry::Point;
