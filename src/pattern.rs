//! Pattern handling: the 8x8 stipple pattern plus high/low color pair every
//! draw call carries, and the fast paths that let solid fills skip
//! per-pixel pattern lookups.

use crate::color::Color;

/// An 8x8, 1-bit-per-pixel stipple pattern. Bit `1` in a row selects the
/// high color, `0` selects the low color; row `0` is the top of the tile.
/// `SOLID_HIGH`/`SOLID_LOW` are the two patterns the fast paths special-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    pub rows: [u8; 8],
}

impl Pattern {
    pub const SOLID_HIGH: Pattern = Pattern { rows: [0xFF; 8] };
    pub const SOLID_LOW: Pattern = Pattern { rows: [0x00; 8] };

    pub fn new(rows: [u8; 8]) -> Self {
        Self { rows }
    }

    /// Whether `(x, y)` in tile-relative pixel coordinates selects the high
    /// color. The tile wraps with the frame buffer's absolute coordinates,
    /// not the shape being drawn, so callers pass in screen-space `x`/`y`.
    #[inline]
    pub fn is_high(&self, x: i32, y: i32) -> bool {
        let row = self.rows[(y & 7) as usize];
        let bit = 7 - (x & 7);
        (row >> bit) & 1 != 0
    }

    pub fn is_solid_high(&self) -> bool {
        *self == Pattern::SOLID_HIGH
    }

    pub fn is_solid_low(&self) -> bool {
        *self == Pattern::SOLID_LOW
    }

    pub fn is_solid(&self) -> bool {
        self.is_solid_high() || self.is_solid_low()
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Pattern::SOLID_HIGH
    }
}

/// Bundles a [`Pattern`] with the high/low colors it selects between, and
/// caches the 256-entry text-mode color lookup table ([`Self::color_cache`])
/// lazily, since most draw calls never touch glyph rendering.
#[derive(Debug, Clone)]
pub struct PatternHandler {
    pattern: Pattern,
    high_color: Color,
    low_color: Color,
    offset_x: i32,
    offset_y: i32,
    cache: Option<Box<[Color; 256]>>,
}

impl PatternHandler {
    pub fn new(high_color: Color, low_color: Color) -> Self {
        Self {
            pattern: Pattern::SOLID_HIGH,
            high_color,
            low_color,
            offset_x: 0,
            offset_y: 0,
            cache: None,
        }
    }

    pub fn set_pattern(&mut self, pattern: Pattern) {
        if pattern != self.pattern {
            self.pattern = pattern;
        }
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    pub fn set_colors(&mut self, high: Color, low: Color) {
        if high != self.high_color || low != self.low_color {
            self.high_color = high;
            self.low_color = low;
            self.cache = None;
        }
    }

    pub fn high_color(&self) -> Color {
        self.high_color
    }

    pub fn low_color(&self) -> Color {
        self.low_color
    }

    /// Sets the pattern tile's origin offset: the absolute screen position
    /// that tile cell `(0, 0)` aligns to, so that a view's pattern stays
    /// fixed to the screen rather than sliding with the view's own origin.
    pub fn set_offsets(&mut self, x: i32, y: i32) {
        self.offset_x = x;
        self.offset_y = y;
    }

    pub fn is_solid_high(&self) -> bool {
        self.pattern.is_solid_high()
    }

    pub fn is_solid_low(&self) -> bool {
        self.pattern.is_solid_low()
    }

    /// The color a screen-space pixel resolves to under the current
    /// pattern, ignoring alpha blending (callers combine this with the
    /// active drawing mode separately).
    #[inline]
    pub fn color_at(&self, x: i32, y: i32) -> Color {
        if self.is_high_at(x, y) {
            self.high_color
        } else {
            self.low_color
        }
    }

    /// Whether screen-space `(x, y)` selects the pattern's high slot, after
    /// applying the tile's scroll offset. The single source of truth for
    /// pattern-slot selection; both [`Self::color_at`] and drawing modes
    /// that key off the slot (not just the resolved color) go through this.
    #[inline]
    pub fn is_high_at(&self, x: i32, y: i32) -> bool {
        self.pattern.is_high(x - self.offset_x, y - self.offset_y)
    }

    /// A 256-entry lookup table mapping an 8-bit glyph coverage value to the
    /// color it composites to against `background`, interpolating linearly
    /// between `background` and the handler's high color. Built lazily and
    /// cached per `(high_color, background)` pair; text rendering is the
    /// only caller that needs this, so solid-fill draws never pay for it.
    pub fn color_cache(&mut self, background: Color) -> &[Color; 256] {
        if self.cache.is_none() {
            self.cache = Some(Box::new(build_color_cache(self.high_color, background)));
        }
        self.cache.as_ref().unwrap()
    }
}

fn build_color_cache(high: Color, background: Color) -> [Color; 256] {
    let mut table = [Color::TRANSPARENT; 256];
    for (coverage, slot) in table.iter_mut().enumerate() {
        let a = coverage as u32;
        let inv = 255 - a;
        let lerp = |hi: u8, bg: u8| -> u8 { ((hi as u32 * a + bg as u32 * inv) / 255) as u8 };
        *slot = Color::rgba(
            lerp(high.r, background.r),
            lerp(high.g, background.g),
            lerp(high.b, background.b),
            255,
        );
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_high_always_selects_high() {
        let p = Pattern::SOLID_HIGH;
        assert!(p.is_high(0, 0));
        assert!(p.is_high(7, 7));
        assert!(p.is_solid_high());
    }

    #[test]
    fn solid_low_always_selects_low() {
        let p = Pattern::SOLID_LOW;
        assert!(!p.is_high(3, 3));
        assert!(p.is_solid_low());
    }

    #[test]
    fn pattern_tiles_every_eight_pixels() {
        let checkerboard = Pattern::new([0b10101010; 8]);
        assert_eq!(checkerboard.is_high(0, 0), checkerboard.is_high(8, 0));
        assert_eq!(checkerboard.is_high(1, 0), checkerboard.is_high(9, 8));
    }

    #[test]
    fn offsets_shift_pattern_lookup() {
        let mut handler = PatternHandler::new(Color::WHITE, Color::BLACK);
        handler.set_pattern(Pattern::new([0b10000000; 8]));
        let at_origin = handler.color_at(0, 0);
        handler.set_offsets(1, 0);
        let shifted = handler.color_at(1, 0);
        assert_eq!(at_origin, shifted);
    }

    #[test]
    fn color_cache_endpoints_match_high_and_background() {
        let mut handler = PatternHandler::new(Color::WHITE, Color::BLACK);
        let background = Color::rgb(10, 20, 30);
        let table = handler.color_cache(background);
        assert_eq!(table[0], Color::rgba(10, 20, 30, 255));
        assert_eq!(table[255], Color::rgba(255, 255, 255, 255));
    }
}
