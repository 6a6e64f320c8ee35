//! Shapes → scanlines → pixels.
//!
//! `Painter` borrows the frame buffer for one attachment (see the spec's
//! "frame-buffer as borrowed reference" design note) and owns the active
//! `PatternHandler`. Each geometric primitive lives in its own submodule,
//! mirroring the teacher's convention of splitting one large facade's
//! `impl` block across files by concern (`renderer/draw_queue.rs`,
//! `renderer/passes.rs`, and friends); every submodule here does `use
//! super::*;` and adds `impl<'buf> Painter<'buf> { ... }`.

pub mod bitmap;
pub mod curves;
pub mod lines;
pub mod measure;
pub mod polygon;
pub mod rects;
pub mod text;

use crate::color::Color;
use crate::draw_state::{DrawState, LineCapMode, LineJoinMode};
use crate::drawing_mode::{AlphaRounding, DrawingMode, PatternSample};
use crate::geometry::IRect;
use crate::pattern::PatternHandler;
use crate::region::Region;
use crate::rendering_buffer::RenderingBuffer;

/// The subset of [`DrawState`] relevant to rasterization — everything a
/// primitive needs to decide how it writes pixels, independent of the
/// view-stack machinery that produced it.
#[derive(Debug, Clone)]
pub struct PainterState {
    pub drawing_mode: DrawingMode,
    pub pen_size: f64,
    pub line_cap_mode: LineCapMode,
    pub line_join_mode: LineJoinMode,
    pub miter_limit: f64,
    pub high_color: Color,
    pub low_color: Color,
    pub clipping_region: Region,
    pub sub_pixel_precise: bool,
    pub constant_alpha: u8,
    pub rounding: AlphaRounding,
}

impl PainterState {
    pub fn from_draw_state(state: &DrawState, buffer_bounds: IRect, constant_alpha: u8) -> Self {
        let mut clip = Region::single(buffer_bounds);
        if let Some(extra) = &state.clipping_region {
            clip = clip.intersect_region(extra);
        }
        Self {
            drawing_mode: state.drawing_mode,
            pen_size: state.pen_size,
            line_cap_mode: state.line_cap_mode,
            line_join_mode: state.line_join_mode,
            miter_limit: state.miter_limit,
            high_color: state.high_color,
            low_color: state.low_color,
            clipping_region: clip,
            sub_pixel_precise: state.sub_pixel_precise,
            constant_alpha,
            rounding: AlphaRounding::Truncating,
        }
    }
}

/// The geometric rasterizer. Borrows a frame buffer for the duration of one
/// attachment; [`crate::engine::DrawingEngine`] is the only thing that
/// creates, re-attaches or drops one.
pub struct Painter<'buf> {
    buffer: &'buf mut RenderingBuffer,
    pub pattern: PatternHandler,
    pub state: PainterState,
}

impl<'buf> Painter<'buf> {
    pub fn attach(buffer: &'buf mut RenderingBuffer, pattern: PatternHandler, state: PainterState) -> Self {
        Self { buffer, pattern, state }
    }

    pub fn buffer(&self) -> &RenderingBuffer {
        self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut RenderingBuffer {
        self.buffer
    }

    pub fn set_state(&mut self, state: PainterState) {
        self.state = state;
    }

    /// Intersects the painter's active clip with the buffer bounds and an
    /// extra rect, the narrowing every primitive does before touching pixels.
    pub fn clipped_bounds(&self, rect: IRect) -> IRect {
        let buffer_bounds = self.buffer.bounds();
        let region = self.state.clipping_region.intersect(&rect).intersect(&buffer_bounds);
        region.bounds()
    }

    /// Blends one pixel at `(x, y)` according to the active pattern and
    /// drawing mode, honoring the clip. No-op if `(x, y)` is clipped away.
    #[inline]
    pub(crate) fn blend_pixel(&mut self, x: i32, y: i32) {
        if !self.state.clipping_region.contains_point(x, y) {
            return;
        }
        self.blend_pixel_unclipped(x, y);
    }

    /// Same as [`Self::blend_pixel`] but skips the clip test — callers that
    /// already intersected their scan range against the clip rects use this
    /// in the inner loop to avoid a redundant per-pixel membership test.
    #[inline]
    pub(crate) fn blend_pixel_unclipped(&mut self, x: i32, y: i32) {
        let dst = self.buffer.get_pixel(x, y);
        let is_high = self.pattern.is_high_at(x, y);
        let color = self.pattern.color_at(x, y);
        let sample = PatternSample::new(color, is_high);
        let out = self.state.drawing_mode.blend(
            sample,
            dst,
            self.state.high_color,
            self.state.low_color,
            self.state.constant_alpha,
            self.state.rounding,
        );
        self.buffer.set_pixel(x, y, out);
    }

    /// Fills `[x0, x1) x {y}` with solid-pattern `COPY`/`OVER` directly,
    /// skipping the per-pixel pattern lookup. Callers must have already
    /// verified `pattern.is_solid_high()` and an eligible mode.
    pub(crate) fn fill_row_solid(&mut self, y: i32, x0: i32, x1: i32, color: Color) {
        if x1 <= x0 {
            return;
        }
        let word = color.to_bgra_word();
        for px in self.buffer.row_words_mut(y as u32, x0 as u32, x1 as u32) {
            *px = word;
        }
    }

    /// Rounds `(x, y)` to the nearest integer pixel center unless the active
    /// state is sub-pixel precise.
    pub(crate) fn snap(&self, x: f64, y: f64) -> (f64, f64) {
        if self.state.sub_pixel_precise {
            (x, y)
        } else {
            (crate::util::round_to_pixel(x), crate::util::round_to_pixel(y))
        }
    }
}
