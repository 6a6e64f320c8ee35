//! String width and bounding-box queries. Pure geometry, no frame-buffer
//! access — clients call these to lay out UI before anything is drawn.

use crate::draw_state::DrawState;
use crate::font::ServerFont;
use crate::geometry::Rect;
use cosmic_text::{Attrs, Buffer, Family, FontSystem, Shaping};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Memoizes [`string_width`] per `(face, size bits, escapement, text)`, since
/// layout code tends to re-measure the same run (a label, a menu item)
/// every frame it's visible.
pub struct StringWidthCache {
    entries: LruCache<(cosmic_text::fontdb::ID, u32, u32, u32, String), f32>,
}

impl StringWidthCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self { entries: LruCache::new(capacity) }
    }

    pub fn get_or_measure(
        &mut self,
        font_system: &mut FontSystem,
        font: &ServerFont,
        text: &str,
        escapement_delta: (f32, f32),
    ) -> f32 {
        let key = (
            font.face_id(),
            font.size.to_bits(),
            escapement_delta.0.to_bits(),
            escapement_delta.1.to_bits(),
            text.to_owned(),
        );
        if let Some(&cached) = self.entries.get(&key) {
            return cached;
        }
        let width = string_width(font_system, font, text, escapement_delta);
        self.entries.put(key, width);
        width
    }
}

/// Advance width of `text` set in `font`, honoring `escapement_delta` (extra
/// advance added per space / non-space character) and kerning via
/// `cosmic-text`'s shaping. Returns `0.0` if the font's face can't be
/// resolved in `font_system` — the one client-observable error the spec
/// allows (`StringWidth` returning 0).
pub fn string_width(
    font_system: &mut FontSystem,
    font: &ServerFont,
    text: &str,
    escapement_delta: (f32, f32),
) -> f32 {
    if text.is_empty() {
        return 0.0;
    }
    let metrics = font.metrics();
    let mut buffer = Buffer::new(font_system, metrics);
    let attrs = Attrs::new().family(Family::Name(&font.family.name));
    buffer.set_text(font_system, text, attrs, Shaping::Advanced);
    buffer.shape_until_scroll(font_system, false);

    let mut width = 0.0f32;
    for run in buffer.layout_runs() {
        for glyph in run.glyphs {
            let is_space = text
                .get(glyph.start..glyph.end)
                .map(|s| s.chars().all(char::is_whitespace))
                .unwrap_or(false);
            width += glyph.w + if is_space { escapement_delta.0 } else { escapement_delta.1 };
        }
    }
    width
}

/// The tight bounding box of `text` set in `font`, in the same coordinate
/// space `string_width` measures in. `left` is always `0.0`; `right` equals
/// `string_width`.
pub fn bounding_box(font_system: &mut FontSystem, font: &ServerFont, text: &str) -> Rect {
    let width = string_width(font_system, font, text, (0.0, 0.0));
    if width == 0.0 {
        return Rect::EMPTY;
    }
    Rect::new(0.0, -(font.size as f64), width as f64, font.size as f64 * 0.2)
}

/// Transforms a draw-state pen location by the state's origin/scale and
/// returns where text measurement/drawing should start from.
pub fn baseline_for(state: &DrawState) -> crate::geometry::Point {
    state.transform(state.pen_location)
}
