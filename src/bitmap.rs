//! Reference-counted pixel containers and the registry that owns them.
//!
//! `ServerBitmap` mirrors `RenderingBuffer`'s attributes but is immutable
//! after creation and identified by an opaque [`BitmapToken`]; `BitmapManager`
//! is the `Arc`-backed registry a `ServerApp` goes through to create and
//! release them, the same shape the teacher used for its GPU texture cache.

use crate::color::Color;
use crate::error::{PaintError, PaintResult};
use crate::geometry::IRect;
use crate::pixel_format::{convert_pixel, ColorSpace, Palette};
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Opaque handle identifying a bitmap across the client/server boundary.
/// Carries no capability of its own; all access goes through
/// [`BitmapManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitmapToken(pub u64);

impl std::fmt::Display for BitmapToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bitmap#{}", self.0)
    }
}

/// The immutable attributes plus pixel storage of a bitmap, already
/// converted to BGRA32. Width, height, format and stride never change after
/// creation; only the reference count (tracked by the owning `Arc`) varies.
pub struct ServerBitmapData {
    pub token: BitmapToken,
    pub width: u32,
    pub height: u32,
    pub bytes_per_row: usize,
    pub source_format: ColorSpace,
    bits: Vec<u8>,
}

impl ServerBitmapData {
    pub fn bounds(&self) -> IRect {
        IRect::from_wh(0, 0, self.width as i32, self.height as i32)
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        let offset = y as usize * self.bytes_per_row + x as usize * 4;
        Color::from_bgra_word(u32::from_ne_bytes(
            self.bits[offset..offset + 4].try_into().unwrap(),
        ))
    }

    pub fn bits(&self) -> &[u8] {
        &self.bits
    }
}

/// A handle to a live bitmap. Cloning increments the `Arc`'s strong count,
/// which is the reference count the spec requires to stay `>= 0` and gate
/// when the bits pointer is released.
pub type ServerBitmap = Arc<ServerBitmapData>;

/// Owns every live bitmap for one `ServerApp`, keyed by token. Bitmaps are
/// released from the registry when the caller explicitly drops them via
/// [`BitmapManager::release`] (modeling "client has acknowledged release");
/// the `Arc` keeps the backing bits alive for any painter still holding one.
pub struct BitmapManager {
    next_token: AtomicU64,
    bitmaps: RwLock<AHashMap<BitmapToken, ServerBitmap>>,
}

impl BitmapManager {
    pub fn new() -> Self {
        Self {
            next_token: AtomicU64::new(1),
            bitmaps: RwLock::new(AHashMap::new()),
        }
    }

    /// Converts `source_bits` (in `source_format`) to a BGRA32-backed
    /// bitmap and registers it under a fresh token.
    pub fn create(
        &self,
        width: u32,
        height: u32,
        source_format: ColorSpace,
        source_bits: &[u8],
        palette: &Palette,
    ) -> PaintResult<ServerBitmap> {
        if width == 0 || height == 0 {
            return Err(PaintError::InvalidGeometry("zero-sized bitmap".into()));
        }
        let src_bpp = source_format.bytes_per_pixel();
        let src_stride = width as usize * src_bpp;
        if source_bits.len() < src_stride * height as usize {
            return Err(PaintError::ResourceUnavailable("bitmap has no backing bits".into()));
        }

        let bytes_per_row = width as usize * 4;
        let mut bits = vec![0u8; bytes_per_row * height as usize];
        for y in 0..height as usize {
            let src_row = &source_bits[y * src_stride..(y + 1) * src_stride];
            let dst_row = &mut bits[y * bytes_per_row..(y + 1) * bytes_per_row];
            for x in 0..width as usize {
                let src_px = &src_row[x * src_bpp..(x + 1) * src_bpp];
                let color = convert_pixel(src_px, source_format, palette);
                dst_row[x * 4..x * 4 + 4].copy_from_slice(&color.to_bgra_word().to_ne_bytes());
            }
        }

        let token = BitmapToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        let bitmap = Arc::new(ServerBitmapData {
            token,
            width,
            height,
            bytes_per_row,
            source_format,
            bits,
        });
        self.bitmaps.write().insert(token, bitmap.clone());
        Ok(bitmap)
    }

    pub fn get(&self, token: BitmapToken) -> Option<ServerBitmap> {
        self.bitmaps.read().get(&token).cloned()
    }

    /// Removes the manager's own strong reference; the bits stay alive for
    /// as long as any other `Arc` clone (e.g. a painter mid-draw) holds one.
    pub fn release(&self, token: BitmapToken) {
        self.bitmaps.write().remove(&token);
    }

    pub fn live_count(&self) -> usize {
        self.bitmaps.read().len()
    }
}

impl Default for BitmapManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_assigns_unique_tokens() {
        let manager = BitmapManager::new();
        let palette = Palette::system_default();
        let a = manager.create(2, 2, ColorSpace::Rgba32, &[0u8; 16], &palette).unwrap();
        let b = manager.create(2, 2, ColorSpace::Rgba32, &[0u8; 16], &palette).unwrap();
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn zero_sized_bitmap_is_rejected() {
        let manager = BitmapManager::new();
        let palette = Palette::system_default();
        let result = manager.create(0, 4, ColorSpace::Rgba32, &[], &palette);
        assert!(matches!(result, Err(PaintError::InvalidGeometry(_))));
    }

    #[test]
    fn truncated_source_bits_are_rejected() {
        let manager = BitmapManager::new();
        let palette = Palette::system_default();
        let result = manager.create(4, 4, ColorSpace::Rgba32, &[0u8; 4], &palette);
        assert!(matches!(result, Err(PaintError::ResourceUnavailable(_))));
    }

    #[test]
    fn release_drops_managers_reference_but_not_outstanding_clones() {
        let manager = BitmapManager::new();
        let palette = Palette::system_default();
        let bitmap = manager.create(1, 1, ColorSpace::Rgba32, &[1, 2, 3, 4], &palette).unwrap();
        let token = bitmap.token;
        let kept_alive = bitmap.clone();
        manager.release(token);
        assert!(manager.get(token).is_none());
        assert_eq!(kept_alive.get_pixel(0, 0), Color::rgba(3, 2, 1, 4));
    }
}
