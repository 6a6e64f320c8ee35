//! The fourteen drawing modes and the ALPHA mode's source/function
//! refinements. Modes are defined against the BeOS `B_OP_*` semantics: most
//! read a plain source color, but `OVER`/`ERASE`/`INVERT`/`SELECT` key off
//! whether the pattern selected the high or low color slot at that pixel,
//! not just the resolved color — so [`DrawingMode::blend`] takes a
//! [`PatternSample`] rather than a bare [`Color`].

use crate::color::Color;
use crate::util::luma;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawingMode {
    Copy,
    Over,
    Erase,
    Invert,
    Add,
    Subtract,
    Blend,
    Min,
    Max,
    Select,
    Alpha(AlphaSrcMode, AlphaFncMode),
}

/// Where ALPHA mode takes its alpha value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaSrcMode {
    /// Use the source pixel's own alpha channel.
    PixelAlpha,
    /// Ignore the source pixel's alpha; use the draw state's constant alpha.
    ConstantAlpha,
}

/// How ALPHA mode combines source and destination once it has an alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaFncMode {
    /// Destination alpha is replaced by the blended result's alpha (an
    /// "overlay" compose: destination alpha is irrelevant to the output).
    Overlay,
    /// Standard source-over compose, accumulating destination alpha too.
    Composite,
}

/// How a mode rounds the `(src * a + dst * (255 - a)) / 255` division.
/// The reference behavior truncates (`>> 8`, i.e. divide by 256); `Rounded`
/// adds the `+127` bias scenario 5 exercises. `Truncating` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaRounding {
    Truncating,
    Rounded,
}

impl Default for AlphaRounding {
    fn default() -> Self {
        AlphaRounding::Truncating
    }
}

/// What the [`crate::pattern::PatternHandler`] (or any other color source
/// honoring the same capability, e.g. a tiled-bitmap fill) produced at a
/// given pixel: the resolved color plus whether it came from the high or
/// low slot. `OVER`/`ERASE`/`INVERT`/`SELECT` only act when `is_high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternSample {
    pub color: Color,
    pub is_high: bool,
}

impl PatternSample {
    pub fn new(color: Color, is_high: bool) -> Self {
        Self { color, is_high }
    }
}

#[inline]
fn mix_channel(src: u8, dst: u8, alpha: u8, rounding: AlphaRounding) -> u8 {
    let s = src as u32;
    let d = dst as u32;
    let a = alpha as u32;
    match rounding {
        AlphaRounding::Truncating => ((s * a + d * (255 - a)) >> 8) as u8,
        AlphaRounding::Rounded => ((s * a + d * (255 - a) + 127) / 255) as u8,
    }
}

impl DrawingMode {
    /// Blends `sample` against `dst`, given the state's `high_color` and
    /// `low_color` (needed by `ERASE` and `SELECT`), a `constant_alpha` for
    /// `ALPHA | CONSTANT_ALPHA`, and the rounding rule for modes that divide
    /// by 255.
    pub fn blend(
        self,
        sample: PatternSample,
        dst: Color,
        high_color: Color,
        low_color: Color,
        constant_alpha: u8,
        rounding: AlphaRounding,
    ) -> Color {
        let src = sample.color;
        match self {
            DrawingMode::Copy => src,
            DrawingMode::Over => {
                if sample.is_high {
                    src
                } else {
                    dst
                }
            }
            DrawingMode::Erase => {
                if sample.is_high {
                    low_color
                } else {
                    dst
                }
            }
            DrawingMode::Invert => {
                if sample.is_high {
                    Color::rgb(255 - dst.r, 255 - dst.g, 255 - dst.b)
                } else {
                    dst
                }
            }
            DrawingMode::Add => Color::rgb(
                src.r.saturating_add(dst.r),
                src.g.saturating_add(dst.g),
                src.b.saturating_add(dst.b),
            ),
            DrawingMode::Subtract => Color::rgb(
                dst.r.saturating_sub(src.r),
                dst.g.saturating_sub(src.g),
                dst.b.saturating_sub(src.b),
            ),
            DrawingMode::Blend => Color::rgb(
                ((src.r as u32 + dst.r as u32) / 2) as u8,
                ((src.g as u32 + dst.g as u32) / 2) as u8,
                ((src.b as u32 + dst.b as u32) / 2) as u8,
            ),
            DrawingMode::Min => {
                if luma(src.r, src.g, src.b) > luma(dst.r, dst.g, dst.b) {
                    dst
                } else {
                    src
                }
            }
            DrawingMode::Max => {
                if luma(src.r, src.g, src.b) > luma(dst.r, dst.g, dst.b) {
                    src
                } else {
                    dst
                }
            }
            DrawingMode::Select => {
                if src == high_color && dst == high_color {
                    low_color
                } else if src == low_color && dst == low_color {
                    high_color
                } else {
                    dst
                }
            }
            DrawingMode::Alpha(src_mode, fn_mode) => {
                let alpha = match src_mode {
                    AlphaSrcMode::PixelAlpha => src.a,
                    AlphaSrcMode::ConstantAlpha => constant_alpha,
                };
                let blended = blend_over(src, dst, alpha, rounding);
                match fn_mode {
                    // OVERLAY blends RGB only; the destination (typically an
                    // opaque frame buffer) keeps its own alpha.
                    AlphaFncMode::Overlay => Color::rgba(blended.r, blended.g, blended.b, dst.a),
                    AlphaFncMode::Composite => {
                        let out_a = alpha as u32 + (dst.a as u32 * (255 - alpha as u32)) / 255;
                        Color::rgba(blended.r, blended.g, blended.b, out_a.min(255) as u8)
                    }
                }
            }
        }
    }
}

#[inline]
fn blend_over(src: Color, dst: Color, alpha: u8, rounding: AlphaRounding) -> Color {
    Color::rgb(
        mix_channel(src.r, dst.r, alpha, rounding),
        mix_channel(src.g, dst.g, alpha, rounding),
        mix_channel(src.b, dst.b, alpha, rounding),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const HIGH: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    const LOW: Color = Color { r: 0, g: 0, b: 0, a: 255 };

    #[test]
    fn copy_ignores_destination() {
        let sample = PatternSample::new(Color::WHITE, true);
        let result = DrawingMode::Copy.blend(sample, Color::BLACK, HIGH, LOW, 255, AlphaRounding::Truncating);
        assert_eq!(result, Color::WHITE);
    }

    #[test]
    fn over_writes_only_on_high_slot() {
        let dst = Color::rgb(10, 20, 30);
        let high_sample = PatternSample::new(HIGH, true);
        let low_sample = PatternSample::new(LOW, false);
        assert_eq!(DrawingMode::Over.blend(high_sample, dst, HIGH, LOW, 255, AlphaRounding::Truncating), HIGH);
        assert_eq!(DrawingMode::Over.blend(low_sample, dst, HIGH, LOW, 255, AlphaRounding::Truncating), dst);
    }

    #[test]
    fn erase_writes_low_color_only_on_high_slot() {
        let dst = Color::rgb(10, 20, 30);
        let high_sample = PatternSample::new(HIGH, true);
        let low_sample = PatternSample::new(LOW, false);
        assert_eq!(DrawingMode::Erase.blend(high_sample, dst, HIGH, LOW, 255, AlphaRounding::Truncating), LOW);
        assert_eq!(DrawingMode::Erase.blend(low_sample, dst, HIGH, LOW, 255, AlphaRounding::Truncating), dst);
    }

    #[test]
    fn invert_flips_destination_only_on_high_slot() {
        let dst = Color::rgb(10, 20, 30);
        let high_sample = PatternSample::new(HIGH, true);
        let result = DrawingMode::Invert.blend(high_sample, dst, HIGH, LOW, 255, AlphaRounding::Truncating);
        assert_eq!(result, Color::rgb(245, 235, 225));
        let low_sample = PatternSample::new(LOW, false);
        assert_eq!(DrawingMode::Invert.blend(low_sample, dst, HIGH, LOW, 255, AlphaRounding::Truncating), dst);
    }

    #[test]
    fn add_saturates_at_white() {
        let sample = PatternSample::new(Color::rgb(200, 0, 0), true);
        let result = DrawingMode::Add.blend(sample, Color::rgb(200, 0, 0), HIGH, LOW, 255, AlphaRounding::Truncating);
        assert_eq!(result.r, 255);
    }

    #[test]
    fn min_picks_darker_pixel() {
        let sample = PatternSample::new(Color::BLACK, true);
        let result = DrawingMode::Min.blend(sample, Color::WHITE, HIGH, LOW, 255, AlphaRounding::Truncating);
        assert_eq!(result, Color::BLACK);
    }

    #[test]
    fn max_picks_brighter_pixel() {
        let sample = PatternSample::new(Color::BLACK, true);
        let result = DrawingMode::Max.blend(sample, Color::WHITE, HIGH, LOW, 255, AlphaRounding::Truncating);
        assert_eq!(result, Color::WHITE);
    }

    #[test]
    fn select_swaps_high_and_low_when_matched() {
        let high_sample = PatternSample::new(HIGH, true);
        let result = DrawingMode::Select.blend(high_sample, HIGH, HIGH, LOW, 255, AlphaRounding::Truncating);
        assert_eq!(result, LOW);
        let low_sample = PatternSample::new(LOW, false);
        let result = DrawingMode::Select.blend(low_sample, LOW, HIGH, LOW, 255, AlphaRounding::Truncating);
        assert_eq!(result, HIGH);
    }

    #[test]
    fn select_leaves_mismatched_destination_alone() {
        let dst = Color::rgb(1, 2, 3);
        let sample = PatternSample::new(HIGH, true);
        let result = DrawingMode::Select.blend(sample, dst, HIGH, LOW, 255, AlphaRounding::Truncating);
        assert_eq!(result, dst);
    }

    #[test]
    fn alpha_pixel_overlay_keeps_destination_alpha() {
        let src = Color::rgba(255, 0, 0, 128);
        let dst = Color::rgba(0, 0, 0, 255);
        let mode = DrawingMode::Alpha(AlphaSrcMode::PixelAlpha, AlphaFncMode::Overlay);
        let sample = PatternSample::new(src, true);
        let result = mode.blend(sample, dst, HIGH, LOW, 255, AlphaRounding::Truncating);
        assert_eq!(result.a, dst.a);
    }

    #[test]
    fn alpha_constant_composite_accumulates_destination_alpha() {
        let src = Color::rgba(255, 0, 0, 0);
        let dst = Color::rgba(0, 0, 0, 128);
        let mode = DrawingMode::Alpha(AlphaSrcMode::ConstantAlpha, AlphaFncMode::Composite);
        let sample = PatternSample::new(src, true);
        let result = mode.blend(sample, dst, HIGH, LOW, 128, AlphaRounding::Truncating);
        assert!(result.a >= dst.a);
    }

    #[test]
    fn scenario_five_alpha_over_rounded() {
        // highColor = (255,0,0,128), dst cleared to (0,0,255,255); expect (128,0,127,255).
        let high = Color::rgba(255, 0, 0, 128);
        let dst = Color::rgba(0, 0, 255, 255);
        let mode = DrawingMode::Alpha(AlphaSrcMode::PixelAlpha, AlphaFncMode::Overlay);
        let sample = PatternSample::new(high, true);
        let result = mode.blend(sample, dst, high, LOW, 255, AlphaRounding::Rounded);
        assert_eq!(result, Color::rgba(128, 0, 127, 255));
    }
}
