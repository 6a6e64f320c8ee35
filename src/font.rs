//! Font face handles.
//!
//! Families own styles, styles own faces, and everything is reference
//! counted via `Arc` — the `SharedObject` discipline the spec asks for maps
//! directly onto Rust's own refcounting, so there's no separate
//! intrusive-refcount type to write. Shaping and glyph outlines come from
//! `cosmic-text`'s bundled `swash` rasterizer; this crate only adds the
//! BeOS-shaped face attributes (rotation, shear, spacing mode, B_FONT_FACE)
//! on top.

use bitflags::bitflags;
use cosmic_text::{FontSystem, Metrics};
use parking_lot::Mutex;
use std::sync::Arc;

bitflags! {
    /// The BeOS `B_*_FACE` bitset.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FontFace: u16 {
        const REGULAR    = 0;
        const BOLD       = 1 << 0;
        const ITALIC     = 1 << 1;
        const UNDERSCORE = 1 << 2;
        const NEGATIVE   = 1 << 3;
        const OUTLINED   = 1 << 4;
        const STRIKEOUT  = 1 << 5;
        const BOLDFACE   = 1 << 6;
        const LIGHTFACE  = 1 << 7;
        const HEAVYFACE  = 1 << 8;
        const CONDENSED  = 1 << 9;
        const EXPANDED   = 1 << 10;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacingMode {
    Char,
    String,
    Fixed,
}

/// A family of related styles (e.g. "DejaVu Sans"), identified by the id
/// the wire protocol carries.
pub struct FontFamily {
    pub id: u16,
    pub name: String,
    pub styles: Vec<Arc<FontStyle>>,
}

/// One concrete face within a family (e.g. "Bold Oblique").
pub struct FontStyle {
    pub id: u16,
    pub name: String,
    pub face_flags: FontFace,
    pub is_fixed_width: bool,
    pub is_scalable: bool,
    pub has_kerning: bool,
}

bitflags! {
    /// `B_DISABLE_ANTIALIASING` / `B_FORCE_ANTIALIASING`, stored separately
    /// from `FontFace` because they govern rendering, not glyph shape.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FontFlags: u8 {
        const DISABLE_ANTIALIASING = 1 << 0;
        const FORCE_ANTIALIASING   = 1 << 1;
    }
}

/// Below this point size, glyphs render aliased unless
/// `FontFlags::FORCE_ANTIALIASING` is set. Aesthetic, not semantic — callers
/// may override per [`ServerFont::should_antialias`]'s `threshold` argument.
pub const DEFAULT_ALIASING_THRESHOLD_PT: f32 = 18.0;

/// A live, sized font reference: family + style + the BeOS-specific
/// transform attributes the rasterizer needs.
pub struct ServerFont {
    pub family: Arc<FontFamily>,
    pub style: Arc<FontStyle>,
    pub size: f32,
    /// Degrees, 0 = upright.
    pub rotation: f32,
    /// Degrees, valid range 45..=135, 90 = no shear.
    pub shear: f32,
    pub spacing: SpacingMode,
    pub flags: FontFlags,
    face_id: cosmic_text::fontdb::ID,
}

impl ServerFont {
    pub fn new(
        family: Arc<FontFamily>,
        style: Arc<FontStyle>,
        size: f32,
        face_id: cosmic_text::fontdb::ID,
    ) -> Self {
        Self {
            family,
            style,
            size,
            rotation: 0.0,
            shear: 90.0,
            spacing: SpacingMode::String,
            flags: FontFlags::empty(),
            face_id,
        }
    }

    pub fn face_id(&self) -> cosmic_text::fontdb::ID {
        self.face_id
    }

    pub fn metrics(&self) -> Metrics {
        Metrics::new(self.size, self.size * 1.2)
    }

    pub fn has_kerning(&self) -> bool {
        self.style.has_kerning
    }

    pub fn is_fixed_width(&self) -> bool {
        self.style.is_fixed_width
    }

    /// Whether glyphs should render aliased (1-bit coverage) instead of
    /// antialiased (8-bit coverage) at this font's current size.
    pub fn should_antialias(&self, threshold: f32) -> bool {
        if self.flags.contains(FontFlags::FORCE_ANTIALIASING) {
            return true;
        }
        if self.flags.contains(FontFlags::DISABLE_ANTIALIASING) {
            return false;
        }
        self.size >= threshold
    }

    /// Clamps shear to the BeOS-valid range; out-of-range values collapse
    /// to the nearest bound rather than producing a degenerate transform.
    pub fn set_shear(&mut self, degrees: f32) {
        self.shear = degrees.clamp(45.0, 135.0);
    }
}

/// A face's own face lock: text rendering locks the face for the duration
/// of a single string draw since faces are not internally thread-safe.
/// Wraps the shared `cosmic-text` font system, which is itself the
/// resource multiple `ServerFont`s reference by id.
pub struct FaceLock {
    font_system: Mutex<FontSystem>,
}

impl FaceLock {
    pub fn new(font_system: FontSystem) -> Self {
        Self {
            font_system: Mutex::new(font_system),
        }
    }

    pub fn lock(&self) -> parking_lot::MutexGuard<'_, FontSystem> {
        self.font_system.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_family() -> Arc<FontFamily> {
        Arc::new(FontFamily {
            id: 0,
            name: "Test Sans".into(),
            styles: Vec::new(),
        })
    }

    fn test_style(flags: FontFace) -> Arc<FontStyle> {
        Arc::new(FontStyle {
            id: 0,
            name: "Regular".into(),
            face_flags: flags,
            is_fixed_width: false,
            is_scalable: true,
            has_kerning: true,
        })
    }

    #[test]
    fn small_font_without_force_flag_is_aliased() {
        let font = ServerFont::new(test_family(), test_style(FontFace::REGULAR), 10.0, cosmic_text::fontdb::ID::default());
        assert!(!font.should_antialias(DEFAULT_ALIASING_THRESHOLD_PT));
    }

    #[test]
    fn large_font_is_antialiased() {
        let font = ServerFont::new(test_family(), test_style(FontFace::REGULAR), 24.0, cosmic_text::fontdb::ID::default());
        assert!(font.should_antialias(DEFAULT_ALIASING_THRESHOLD_PT));
    }

    #[test]
    fn force_antialiasing_overrides_small_size() {
        let mut font = ServerFont::new(test_family(), test_style(FontFace::REGULAR), 8.0, cosmic_text::fontdb::ID::default());
        font.flags = FontFlags::FORCE_ANTIALIASING;
        assert!(font.should_antialias(DEFAULT_ALIASING_THRESHOLD_PT));
    }

    #[test]
    fn shear_clamps_to_valid_range() {
        let mut font = ServerFont::new(test_family(), test_style(FontFace::REGULAR), 12.0, cosmic_text::fontdb::ID::default());
        font.set_shear(10.0);
        assert_eq!(font.shear, 45.0);
        font.set_shear(200.0);
        assert_eq!(font.shear, 135.0);
    }

    #[test]
    fn face_flags_combine_as_bits() {
        let bold_italic = FontFace::BOLD | FontFace::ITALIC;
        assert!(bold_italic.contains(FontFace::BOLD));
        assert!(bold_italic.contains(FontFace::ITALIC));
        assert!(!bold_italic.contains(FontFace::UNDERSCORE));
    }
}
