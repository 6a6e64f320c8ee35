//! Bitmap blits: fast row copiers for the 1:1 unscaled case, a bilinear
//! 4-tap path, and a generic affine sampler for everything else.

use super::*;
use crate::bitmap::ServerBitmapData;
use crate::error::{log_silent, PaintError};
use crate::pixel_format::{is_transparent_magic, ColorSpace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapFilter {
    Nearest,
    Bilinear,
}

/// `draw_bitmap` option flags. Only `BILINEAR` changes behavior here; the
/// rest are accepted so callers mirror the BeOS option bitset, even though
/// this core doesn't special-case them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawBitmapOptions {
    pub filter: Option<BitmapFilter>,
}

impl<'buf> Painter<'buf> {
    pub fn draw_bitmap(
        &mut self,
        bitmap: &ServerBitmapData,
        src_rect: IRect,
        dst_rect: IRect,
        options: DrawBitmapOptions,
    ) -> IRect {
        if src_rect.is_empty() || dst_rect.is_empty() {
            log_silent(&PaintError::InvalidGeometry("draw_bitmap called with an empty source or destination rect".into()));
            return IRect::EMPTY;
        }
        let sx = dst_rect.width() as f64 / src_rect.width() as f64;
        let sy = dst_rect.height() as f64 / src_rect.height() as f64;

        if (sx - 1.0).abs() < f64::EPSILON && (sy - 1.0).abs() < f64::EPSILON {
            if let Some(fast) = self.fast_path_row_copy(bitmap, src_rect, dst_rect) {
                return fast;
            }
        }

        if matches!(options.filter, Some(BitmapFilter::Bilinear)) && matches!(self.state.drawing_mode, DrawingMode::Copy) {
            return self.draw_bitmap_bilinear(bitmap, src_rect, dst_rect);
        }

        self.draw_bitmap_affine(bitmap, src_rect, dst_rect)
    }

    /// CMAP8/BGR32 `COPY`/`OVER` and BGRA32 `OVER`-as-alpha unscaled blits,
    /// walked one destination row at a time with no per-pixel transform math.
    fn fast_path_row_copy(&mut self, bitmap: &ServerBitmapData, src_rect: IRect, dst_rect: IRect) -> Option<IRect> {
        let eligible = matches!(
            (bitmap.source_format, self.state.drawing_mode),
            (ColorSpace::Cmap8, DrawingMode::Copy)
                | (ColorSpace::Cmap8, DrawingMode::Over)
                | (ColorSpace::Rgb32, DrawingMode::Copy)
                | (ColorSpace::Rgb32, DrawingMode::Over)
                | (ColorSpace::Rgba32, DrawingMode::Over)
        );
        if !eligible {
            return None;
        }

        let touched = self.clipped_bounds(dst_rect);
        if touched.is_empty() {
            return Some(touched);
        }
        let has_magic = bitmap.source_format.transparent_magic().is_some();
        for y in touched.top..touched.bottom {
            let src_y = (src_rect.top + (y - dst_rect.top)) as u32;
            for x in touched.left..touched.right {
                let src_x = (src_rect.left + (x - dst_rect.left)) as u32;
                let color = bitmap.get_pixel(src_x, src_y);
                if has_magic && self.state.drawing_mode != DrawingMode::Alpha(crate::drawing_mode::AlphaSrcMode::PixelAlpha, crate::drawing_mode::AlphaFncMode::Overlay) {
                    let bytes = color.to_bytes_bgra();
                    if is_transparent_magic(&bytes, bitmap.source_format) {
                        continue;
                    }
                }
                let dst = self.buffer.get_pixel(x, y);
                let sample = PatternSample::new(color, true);
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
        }
        Some(touched)
    }

    fn draw_bitmap_bilinear(&mut self, bitmap: &ServerBitmapData, src_rect: IRect, dst_rect: IRect) -> IRect {
        let touched = self.clipped_bounds(dst_rect);
        if touched.is_empty() {
            return touched;
        }
        let src_w = src_rect.width() as f64;
        let src_h = src_rect.height() as f64;
        let dst_w = dst_rect.width() as f64;
        let dst_h = dst_rect.height() as f64;

        for y in touched.top..touched.bottom {
            let v = ((y - dst_rect.top) as f64 + 0.5) / dst_h * src_h - 0.5;
            let (y0, wy) = weight_and_index(v, bitmap.height as i32 - 1, src_rect.top);
            for x in touched.left..touched.right {
                let u = ((x - dst_rect.left) as f64 + 0.5) / dst_w * src_w - 0.5;
                let (x0, wx) = weight_and_index(u, bitmap.width as i32 - 1, src_rect.left);

                let c00 = bitmap.get_pixel(x0 as u32, y0 as u32);
                let c10 = bitmap.get_pixel((x0 + 1).min(bitmap.width as i32 - 1) as u32, y0 as u32);
                let c01 = bitmap.get_pixel(x0 as u32, (y0 + 1).min(bitmap.height as i32 - 1) as u32);
                let c11 = bitmap.get_pixel(
                    (x0 + 1).min(bitmap.width as i32 - 1) as u32,
                    (y0 + 1).min(bitmap.height as i32 - 1) as u32,
                );
                let color = bilinear_mix(c00, c10, c01, c11, wx, wy);
                self.buffer.set_pixel(x, y, color);
            }
        }
        touched
    }

    fn draw_bitmap_affine(&mut self, bitmap: &ServerBitmapData, src_rect: IRect, dst_rect: IRect) -> IRect {
        let touched = self.clipped_bounds(dst_rect);
        if touched.is_empty() {
            return touched;
        }
        let sx = src_rect.width() as f64 / dst_rect.width() as f64;
        let sy = src_rect.height() as f64 / dst_rect.height() as f64;
        let has_magic = bitmap.source_format.transparent_magic().is_some();
        let alpha_mode = matches!(self.state.drawing_mode, DrawingMode::Alpha(_, _));

        for y in touched.top..touched.bottom {
            let src_y = (src_rect.top as f64 + (y - dst_rect.top) as f64 * sy) as i32;
            let src_y = src_y.clamp(src_rect.top, src_rect.bottom - 1) as u32;
            for x in touched.left..touched.right {
                let src_x = (src_rect.left as f64 + (x - dst_rect.left) as f64 * sx) as i32;
                let src_x = src_x.clamp(src_rect.left, src_rect.right - 1) as u32;
                let color = bitmap.get_pixel(src_x, src_y);
                if has_magic && !alpha_mode {
                    let bytes = color.to_bytes_bgra();
                    if is_transparent_magic(&bytes, bitmap.source_format) {
                        continue;
                    }
                }
                let dst = self.buffer.get_pixel(x, y);
                let sample = PatternSample::new(color, true);
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
        }
        touched
    }
}

/// Returns the lower sample index (clamped so `index + 1` never reads past
/// the source) and the fractional weight toward the upper sample.
fn weight_and_index(position: f64, max_index: i32, offset: i32) -> (i32, f64) {
    let clamped = position.max(0.0);
    let index = (clamped.floor() as i32).clamp(0, max_index);
    let weight = clamped - index as f64;
    (index + offset, weight.clamp(0.0, 1.0))
}

fn bilinear_mix(c00: Color, c10: Color, c01: Color, c11: Color, wx: f64, wy: f64) -> Color {
    let mix = |a: u8, b: u8, w: f64| -> f64 { a as f64 * (1.0 - w) + b as f64 * w };
    let top = |ch: fn(Color) -> u8| mix(ch(c00), ch(c10), wx);
    let bottom = |ch: fn(Color) -> u8| mix(ch(c01), ch(c11), wx);
    let chan = |ch: fn(Color) -> u8| (top(ch) * (1.0 - wy) + bottom(ch) * wy).round() as u8;
    Color::rgba(
        chan(|c| c.r),
        chan(|c| c.g),
        chan(|c| c.b),
        chan(|c| c.a),
    )
}
