//! The drawing-engine facade: the one object a client connection actually
//! holds. Owns the [`DrawStateArena`], the active [`PatternHandler`], and an
//! `Arc<dyn HwInterface>` it locks around every operation, mirroring the
//! teacher's `Renderer` as the single entry point gluing its pipeline,
//! queue and surface together.

pub mod copy_region;
pub mod hw;
pub mod primitives;
pub mod readback;

use crate::draw_state::DrawStateArena;
use crate::drawing_mode::AlphaRounding;
use crate::engine::hw::HwInterface;
use crate::geometry::IRect;
use crate::pattern::PatternHandler;
use crate::painter::{Painter, PainterState};
use std::sync::Arc;

/// Owns view-stack state and the handle to the frame buffer's backing
/// store; produces a short-lived [`Painter`] attachment for each drawing
/// operation in `primitives.rs`.
pub struct DrawingEngine {
    hw: Arc<dyn HwInterface>,
    states: DrawStateArena,
    pattern: PatternHandler,
    rounding: AlphaRounding,
    sync_depth: u32,
}

impl DrawingEngine {
    pub fn new(hw: Arc<dyn HwInterface>) -> Self {
        let states = DrawStateArena::new();
        let pattern = PatternHandler::new(states.top().high_color, states.top().low_color);
        Self { hw, states, pattern, rounding: AlphaRounding::Truncating, sync_depth: 0 }
    }

    pub fn hw(&self) -> &Arc<dyn HwInterface> {
        &self.hw
    }

    pub fn states(&self) -> &DrawStateArena {
        &self.states
    }

    pub fn states_mut(&mut self) -> &mut DrawStateArena {
        &mut self.states
    }

    pub fn set_rounding(&mut self, rounding: AlphaRounding) {
        self.rounding = rounding;
    }

    pub fn push_state(&mut self) -> usize {
        self.states.push()
    }

    pub fn pop_state(&mut self) -> usize {
        self.states.pop()
    }

    /// Applies the top draw state's pattern, colors and scroll offset to
    /// the engine's [`PatternHandler`] ahead of a drawing primitive; called
    /// once per operation rather than kept continuously in sync, since the
    /// active state can change without touching the pattern (e.g. a pure
    /// `set_origin`).
    pub fn sync_pattern(&mut self, x_offset: i32, y_offset: i32) {
        let state = self.states.top();
        self.pattern.set_pattern(state.pattern);
        self.pattern.set_colors(state.high_color, state.low_color);
        self.pattern.set_offsets(x_offset, y_offset);
    }

    /// Marks `rect` as needing repaint; used by clients that maintain their
    /// own invalidation/exposure tracking above the engine.
    pub fn frame_buffer_changed(&self, rect: IRect) {
        self.hw.invalidate(rect);
    }

    /// Increments the repaint-suspension depth; while positive, callers are
    /// expected to batch invalidations and flush them on `sync`. This
    /// crate doesn't enforce the batching itself, only the depth counter
    /// the spec's client protocol relies on.
    pub fn suspend_auto_sync(&mut self) {
        self.sync_depth += 1;
    }

    /// Decrements the suspension depth. A simple depth counter, not a stack
    /// of flags; it must never go negative, so an unmatched `sync()` is a
    /// caller bug rather than a state this silently tolerates.
    pub fn sync(&mut self) {
        debug_assert!(self.sync_depth > 0, "sync() called without a matching suspend_auto_sync()");
        self.sync_depth = self.sync_depth.saturating_sub(1);
    }

    pub fn is_sync_suspended(&self) -> bool {
        self.sync_depth > 0
    }

    /// Builds the short-lived [`Painter`] attachment `primitives.rs` uses
    /// for one drawing call, over an already-locked frame buffer.
    fn attach<'buf>(&mut self, buffer: &'buf mut crate::rendering_buffer::RenderingBuffer) -> Painter<'buf> {
        let top = self.states.top();
        let mut painter_state = PainterState::from_draw_state(top, buffer.bounds(), top.high_color.a);
        painter_state.rounding = self.rounding;
        Painter::attach(buffer, self.pattern.clone(), painter_state)
    }

    /// Screen readback: locks the frame buffer exclusively, hides the
    /// cursor so it isn't baked into the copy, fills `dest` (a flat BGRA32
    /// buffer with its own `dest_stride`) with `src_rect`'s pixels, then
    /// optionally composites the cursor bitmap at its current position
    /// using the cursor's own alpha channel before showing it again.
    pub fn read_bitmap(&mut self, src_rect: IRect, dest: &mut [u8], dest_stride: usize, include_cursor: bool) {
        let hw = self.hw.clone();
        let obscured = hw.hide_software_cursor(src_rect);
        {
            let buffer = hw.lock_exclusive();
            readback::copy_readback_rows(&buffer, src_rect, dest, dest_stride);
        }
        if include_cursor {
            let position = hw.cursor_position();
            readback::composite_cursor_into_readback(hw.cursor(), (position.x, position.y), src_rect, dest, dest_stride);
        }
        if obscured {
            hw.show_software_cursor();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::hw::NullHwInterface;
    use crate::rendering_buffer::RenderingBuffer;

    fn engine(width: u32, height: u32) -> DrawingEngine {
        let hw = Arc::new(NullHwInterface::new(RenderingBuffer::new(width, height)));
        DrawingEngine::new(hw)
    }

    #[test]
    fn push_then_pop_returns_to_the_same_state() {
        let mut e = engine(10, 10);
        let root = e.states().top().clone();
        e.push_state();
        e.states_mut().top_mut().set_origin(crate::geometry::Point::new(5.0, 5.0));
        e.pop_state();
        assert_eq!(e.states().top().origin, root.origin);
    }

    #[test]
    fn sync_suspension_tracks_matched_suspend_sync_pairs() {
        let mut e = engine(10, 10);
        e.suspend_auto_sync();
        e.suspend_auto_sync();
        assert!(e.is_sync_suspended());
        e.sync();
        assert!(e.is_sync_suspended());
        e.sync();
        assert!(!e.is_sync_suspended());
    }

    #[test]
    fn read_bitmap_copies_requested_rect_as_bgra() {
        let mut e = engine(10, 10);
        e.states_mut().top_mut().high_color = crate::color::Color::rgba(9, 8, 7, 255);
        e.fill_rect(0, 0, crate::geometry::IRect::new(0, 0, 1, 1));

        let mut dest = vec![0u8; 2 * 2 * 4];
        e.read_bitmap(crate::geometry::IRect::from_wh(0, 0, 2, 2), &mut dest, 8, false);
        let pixel = crate::color::Color::from_bgra_word(u32::from_ne_bytes(dest[0..4].try_into().unwrap()));
        assert_eq!(pixel, crate::color::Color::rgba(9, 8, 7, 255));
    }

    #[test]
    fn read_bitmap_with_cursor_over_the_rect_does_not_panic() {
        let hw = Arc::new(NullHwInterface::new(RenderingBuffer::new(10, 10)));
        hw.set_cursor_position(crate::engine::hw::CursorPosition { x: 0, y: 0 });
        let mut e = DrawingEngine::new(hw);
        let mut dest = vec![0u8; 4];
        e.read_bitmap(crate::geometry::IRect::from_wh(0, 0, 1, 1), &mut dest, 4, true);
    }
}
