//! The raw pixel memory underlying a screen or an offscreen bitmap.
//!
//! Exclusively owned by the [`crate::engine::hw::HwInterface`]; the
//! [`crate::painter::Painter`] only ever sees a borrowed `&mut
//! RenderingBuffer` for the lifetime of one attachment.

use crate::color::Color;
use crate::geometry::IRect;

/// A BGRA32 pixel buffer with a possibly-padded row stride.
///
/// Invariant: `bytes_per_row >= width * 4`; `bits` is valid for
/// `height * bytes_per_row` bytes for as long as the buffer is attached.
pub struct RenderingBuffer {
    bits: Vec<u8>,
    width: u32,
    height: u32,
    bytes_per_row: usize,
}

impl RenderingBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let bytes_per_row = width as usize * 4;
        Self {
            bits: vec![0u8; bytes_per_row * height as usize],
            width,
            height,
            bytes_per_row,
        }
    }

    /// Same as [`Self::new`] but with an explicit, possibly-padded stride.
    pub fn with_stride(width: u32, height: u32, bytes_per_row: usize) -> Self {
        assert!(bytes_per_row >= width as usize * 4);
        Self {
            bits: vec![0u8; bytes_per_row * height as usize],
            width,
            height,
            bytes_per_row,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }

    pub fn bounds(&self) -> IRect {
        IRect::from_wh(0, 0, self.width as i32, self.height as i32)
    }

    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    pub fn bits_mut(&mut self) -> &mut [u8] {
        &mut self.bits
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.bytes_per_row + x as usize * 4
    }

    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Color {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return Color::TRANSPARENT;
        }
        let offset = self.offset(x as u32, y as u32);
        Color::from_bgra_word(u32::from_ne_bytes(
            self.bits[offset..offset + 4].try_into().unwrap(),
        ))
    }

    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let offset = self.offset(x as u32, y as u32);
        self.bits[offset..offset + 4].copy_from_slice(&color.to_bgra_word().to_ne_bytes());
    }

    /// Row `y`'s pixel bytes, restricted to columns `[x0, x1)`. Used by the
    /// fast-path row copiers and the region-copy memmove step.
    pub fn row_mut(&mut self, y: u32, x0: u32, x1: u32) -> &mut [u8] {
        let start = self.offset(x0, y);
        let end = self.offset(x1, y);
        &mut self.bits[start..end]
    }

    pub fn row(&self, y: u32, x0: u32, x1: u32) -> &[u8] {
        let start = self.offset(x0, y);
        let end = self.offset(x1, y);
        &self.bits[start..end]
    }

    /// Row `y`'s pixels as native-endian BGRA words, for callers that write
    /// whole pixels at a time (a solid-color fill) instead of raw bytes.
    pub fn row_words_mut(&mut self, y: u32, x0: u32, x1: u32) -> &mut [u32] {
        bytemuck::cast_slice_mut(self.row_mut(y, x0, x1))
    }
}
