//! Text rendering: shapes a run with `cosmic-text`, rasterizes each glyph
//! through its bundled `swash` cache into an 8-bit coverage bitmap (or
//! thresholds it to 1-bit when the font is aliased), and composites through
//! the active drawing mode.

use super::*;
use crate::font::ServerFont;
use crate::geometry::Point;
use cosmic_text::{Attrs, Buffer, Family, FontSystem, Shaping, SwashCache};

/// Extra horizontal advance applied per space / non-space character in a
/// run, the spec's "escapement delta".
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapementDelta {
    pub space: f32,
    pub non_space: f32,
}

impl<'buf> Painter<'buf> {
    /// Draws `text` starting at `baseline`, returning the bounding rect
    /// touched and the new pen location (`baseline` plus accumulated
    /// advance). `aliasing_threshold` selects 1-bit vs. 8-bit glyph
    /// rasterization per [`ServerFont::should_antialias`].
    pub fn draw_string(
        &mut self,
        font_system: &mut FontSystem,
        swash_cache: &mut SwashCache,
        font: &ServerFont,
        text: &str,
        baseline: Point,
        escapement: EscapementDelta,
        aliasing_threshold: f32,
        force_aliasing: bool,
    ) -> (IRect, Point) {
        if text.is_empty() {
            return (IRect::EMPTY, baseline);
        }
        let metrics = font.metrics();
        let mut buffer = Buffer::new(font_system, metrics);
        let attrs = Attrs::new().family(Family::Name(&font.family.name));
        buffer.set_text(font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(font_system, false);

        let aliased = force_aliasing || !font.should_antialias(aliasing_threshold);
        let mut touched = IRect::EMPTY;
        let mut pen_x = baseline.x;

        for run in buffer.layout_runs() {
            for glyph in run.glyphs {
                let physical = glyph.physical((baseline.x as f32, baseline.y as f32), 1.0);
                if let Some(image) = swash_cache.get_image(font_system, physical.cache_key) {
                    let origin_x = physical.x + image.placement.left;
                    let origin_y = physical.y - image.placement.top;
                    touched = touched.union(&self.composite_glyph_coverage(
                        &image.data,
                        image.placement.width,
                        image.placement.height,
                        origin_x,
                        origin_y,
                        aliased,
                    ));
                }
                let is_space = text
                    .get(glyph.start..glyph.end)
                    .map(|s| s.chars().all(char::is_whitespace))
                    .unwrap_or(false);
                pen_x += (glyph.w + if is_space { escapement.space } else { escapement.non_space }) as f64;
            }
        }

        (touched, Point::new(pen_x as f64, baseline.y))
    }

    /// The pre-computed color-cache table lookup is a narrow shortcut for
    /// text rendered against `lowColor` in `COPY` mode; every other mode
    /// composites each glyph pixel through the real active drawing mode
    /// against the real destination pixel, with coverage standing in for
    /// `constant_alpha`.
    fn composite_glyph_coverage(
        &mut self,
        coverage: &[u8],
        width: u32,
        height: u32,
        origin_x: i32,
        origin_y: i32,
        aliased: bool,
    ) -> IRect {
        let rect = IRect::from_wh(origin_x, origin_y, width as i32, height as i32);
        let touched = self.clipped_bounds(rect);
        if touched.is_empty() {
            return touched;
        }

        let mut cache = if matches!(self.state.drawing_mode, DrawingMode::Copy) {
            let background = self.pattern.low_color();
            Some(*self.pattern.color_cache(background))
        } else {
            None
        };
        if let Some(table) = cache.as_mut() {
            if aliased {
                for value in table.iter_mut() {
                    value.a = if value.a >= 128 { 255 } else { 0 };
                }
            }
        }

        for y in touched.top..touched.bottom {
            let src_y = (y - origin_y) as usize;
            for x in touched.left..touched.right {
                let src_x = (x - origin_x) as usize;
                let idx = src_y * width as usize + src_x;
                let mut level = coverage.get(idx).copied().unwrap_or(0);
                if aliased {
                    level = if level >= 128 { 255 } else { 0 };
                }
                if level == 0 {
                    continue;
                }
                let out = match &cache {
                    Some(table) => table[level as usize],
                    None => {
                        let dst = self.buffer.get_pixel(x, y);
                        let sample = PatternSample::new(self.state.high_color, true);
                        self.state.drawing_mode.blend(
                            sample,
                            dst,
                            self.state.high_color,
                            self.state.low_color,
                            level,
                            self.state.rounding,
                        )
                    }
                };
                self.buffer.set_pixel(x, y, out);
            }
        }
        touched
    }
}
