//! The hardware interface: an injectable collaborator that owns the frame
//! buffer and the cursor overlay, and optionally accelerates fills, inverts
//! and region copies.
//!
//! [`NullHwInterface`] is the software-fallback reference implementation —
//! grounded in the original `ViewDriver`/`DisplayDriverImpl` software path —
//! used whenever no accelerated backend is attached.

use crate::geometry::IRect;
use crate::rendering_buffer::RenderingBuffer;
use bitflags::bitflags;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HwAcceleration: u32 {
        const FILL_REGION   = 1 << 0;
        const INVERT_REGION = 1 << 1;
        const COPY_REGION   = 1 << 2;
    }
}

/// Screen-space position of the software cursor overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPosition {
    pub x: i32,
    pub y: i32,
}

/// A minimal cursor bitmap: BGRA32 pixels plus a hot-spot, enough for
/// [`DrawingEngine::read_bitmap`](crate::engine::DrawingEngine::read_bitmap)
/// to composite it back into a screen readback.
pub struct ServerCursor {
    pub width: u32,
    pub height: u32,
    pub bits: Vec<u8>,
}

impl ServerCursor {
    pub fn get_pixel(&self, x: u32, y: u32) -> crate::color::Color {
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        crate::color::Color::from_bgra_word(u32::from_ne_bytes(
            self.bits[offset..offset + 4].try_into().unwrap(),
        ))
    }
}

/// The contract an accelerated backend (or, in this crate, the software
/// fallback) provides to [`crate::engine::DrawingEngine`].
pub trait HwInterface: Send + Sync {
    fn lock_parallel(&self) -> RwLockReadGuard<'_, RenderingBuffer>;
    fn lock_exclusive(&self) -> RwLockWriteGuard<'_, RenderingBuffer>;
    fn invalidate(&self, rect: IRect);
    fn available_hw_acceleration(&self) -> HwAcceleration {
        HwAcceleration::empty()
    }

    /// Hides the cursor if `rect` overlaps its footprint; returns whether it
    /// was actually obscured (and so needs to be folded into invalidation).
    fn hide_software_cursor(&self, rect: IRect) -> bool;
    fn show_software_cursor(&self);
    fn cursor_position(&self) -> CursorPosition;
    fn cursor(&self) -> &ServerCursor;

    fn fill_region(&self, _rects: &[IRect], _color: crate::color::Color) -> bool {
        false
    }
    fn invert_region(&self, _rects: &[IRect]) -> bool {
        false
    }
    /// `rects` are pre-sorted into a safe copy order by the engine; returns
    /// whether the backend actually performed the copy.
    fn copy_region(&self, _rects: &[IRect], _dx: i32, _dy: i32) -> bool {
        false
    }
}

/// Software-only `HwInterface`: no acceleration, a depth-counted cursor
/// latch, and a plain `RwLock<RenderingBuffer>` for the frame buffer.
pub struct NullHwInterface {
    buffer: RwLock<RenderingBuffer>,
    cursor: ServerCursor,
    cursor_position: parking_lot::Mutex<CursorPosition>,
    hide_depth: std::sync::atomic::AtomicU32,
}

impl NullHwInterface {
    pub fn new(buffer: RenderingBuffer) -> Self {
        Self {
            buffer: RwLock::new(buffer),
            cursor: ServerCursor { width: 1, height: 1, bits: vec![0, 0, 0, 0] },
            cursor_position: parking_lot::Mutex::new(CursorPosition::default()),
            hide_depth: std::sync::atomic::AtomicU32::new(0),
        }
    }

    pub fn set_cursor_position(&self, position: CursorPosition) {
        *self.cursor_position.lock() = position;
    }
}

impl HwInterface for NullHwInterface {
    fn lock_parallel(&self) -> RwLockReadGuard<'_, RenderingBuffer> {
        self.buffer.read()
    }

    fn lock_exclusive(&self) -> RwLockWriteGuard<'_, RenderingBuffer> {
        self.buffer.write()
    }

    fn invalidate(&self, _rect: IRect) {}

    fn hide_software_cursor(&self, rect: IRect) -> bool {
        let position = *self.cursor_position.lock();
        let cursor_rect = IRect::from_wh(position.x, position.y, self.cursor.width as i32, self.cursor.height as i32);
        let obscured = !rect.intersect(&cursor_rect).is_empty();
        if obscured {
            self.hide_depth.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }
        obscured
    }

    fn show_software_cursor(&self) {
        let depth = self.hide_depth.load(std::sync::atomic::Ordering::SeqCst);
        if depth > 0 {
            self.hide_depth.fetch_sub(1, std::sync::atomic::Ordering::SeqCst);
        }
    }

    fn cursor_position(&self) -> CursorPosition {
        *self.cursor_position.lock()
    }

    fn cursor(&self) -> &ServerCursor {
        &self.cursor
    }
}
