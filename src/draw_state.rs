//! Per-view rendering context and its arena-backed push/pop stack.
//!
//! The original keeps a raw linked list of `DrawState`s via a `previousState`
//! pointer. Here each view owns a [`DrawStateArena`]: states live in a flat
//! `Vec` and `previousState` becomes a parent index, so push/pop never touch
//! an allocator and there is no per-call ownership analysis to get wrong.

use crate::color::Color;
use crate::geometry::Point;
use crate::pattern::Pattern;
use crate::drawing_mode::{AlphaFncMode, AlphaSrcMode, DrawingMode};
use crate::region::Region;
use bitflags::bitflags;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCapMode {
    Butt,
    Square,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineJoinMode {
    Miter,
    Round,
    Bevel,
}

bitflags! {
    /// Which fields of a font assignment `set_font` should actually merge,
    /// mirroring the BeOS `B_FONT_*` field-selector bitset.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FontFieldFlags: u32 {
        const FAMILY_AND_STYLE = 1 << 0;
        const SIZE             = 1 << 1;
        const SHEAR            = 1 << 2;
        const ROTATION         = 1 << 3;
        const SPACING          = 1 << 4;
        const ENCODING         = 1 << 5;
        const FACE             = 1 << 6;
        const FLAGS            = 1 << 7;
        const ALL = Self::FAMILY_AND_STYLE.bits()
            | Self::SIZE.bits()
            | Self::SHEAR.bits()
            | Self::ROTATION.bits()
            | Self::SPACING.bits()
            | Self::ENCODING.bits()
            | Self::FACE.bits()
            | Self::FLAGS.bits();
    }
}

/// A font reference narrow enough for `DrawState` to carry without pulling
/// in the face-loading machinery of [`crate::font::ServerFont`]; the fields
/// line up 1:1 with the wire font stream in the spec.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontState {
    pub family_id: u16,
    pub style_id: u16,
    pub face: u16,
    pub size: f32,
    pub shear: f32,
    pub rotation: f32,
    pub spacing: u8,
    pub encoding: u8,
}

impl FontState {
    pub fn system_plain() -> Self {
        Self {
            family_id: 0,
            style_id: 0,
            face: 0,
            size: 12.0,
            shear: 90.0,
            rotation: 0.0,
            spacing: 0,
            encoding: 0,
        }
    }

    /// Merges `other`'s fields into `self`, limited to those `flags` selects.
    pub fn merge_from(&mut self, other: &FontState, flags: FontFieldFlags) {
        if flags.contains(FontFieldFlags::FAMILY_AND_STYLE) {
            self.family_id = other.family_id;
            self.style_id = other.style_id;
        }
        if flags.contains(FontFieldFlags::SIZE) {
            self.size = other.size;
        }
        if flags.contains(FontFieldFlags::SHEAR) {
            self.shear = other.shear;
        }
        if flags.contains(FontFieldFlags::ROTATION) {
            self.rotation = other.rotation;
        }
        if flags.contains(FontFieldFlags::SPACING) {
            self.spacing = other.spacing;
        }
        if flags.contains(FontFieldFlags::ENCODING) {
            self.encoding = other.encoding;
        }
        if flags.contains(FontFieldFlags::FACE) {
            self.face = other.face;
        }
    }
}

impl Default for FontState {
    fn default() -> Self {
        Self::system_plain()
    }
}

/// The per-view rendering context. Everything a draw call needs to know
/// besides the geometry of the call itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawState {
    pub origin: Point,
    pub scale: f64,
    pub clipping_region: Option<Region>,
    pub high_color: Color,
    pub low_color: Color,
    pub pattern: Pattern,
    pub drawing_mode: DrawingMode,
    pub alpha_src_mode: AlphaSrcMode,
    pub alpha_fnc_mode: AlphaFncMode,
    pub pen_location: Point,
    pub pen_size: f64,
    pub font: FontState,
    pub font_aliasing: bool,
    pub line_cap_mode: LineCapMode,
    pub line_join_mode: LineJoinMode,
    pub miter_limit: f64,
    pub sub_pixel_precise: bool,
    pub unscaled_font_size: f64,
}

impl DrawState {
    pub fn root() -> Self {
        Self {
            origin: Point::ZERO,
            scale: 1.0,
            clipping_region: None,
            high_color: Color::BLACK,
            low_color: Color::WHITE,
            pattern: Pattern::SOLID_HIGH,
            drawing_mode: DrawingMode::Copy,
            alpha_src_mode: AlphaSrcMode::PixelAlpha,
            alpha_fnc_mode: AlphaFncMode::Overlay,
            pen_location: Point::ZERO,
            pen_size: 1.0,
            font: FontState::system_plain(),
            font_aliasing: false,
            line_cap_mode: LineCapMode::Butt,
            line_join_mode: LineJoinMode::Miter,
            miter_limit: 10.0,
            sub_pixel_precise: false,
            unscaled_font_size: 12.0,
        }
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn offset_origin(&mut self, dx: f64, dy: f64) {
        self.origin.x += dx;
        self.origin.y += dy;
    }

    /// Sets the view scale and reconstructs `font.size` from
    /// `unscaled_font_size * scale`, per the spec's transform-composition
    /// rule for scale changes.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
        self.font.size = (self.unscaled_font_size * scale) as f32;
    }

    /// `out = (in + origin) * scale`, bit-exact in IEEE-754 doubles.
    pub fn transform(&self, point: Point) -> Point {
        Point::new(
            (point.x + self.origin.x) * self.scale,
            (point.y + self.origin.y) * self.scale,
        )
    }

    pub fn set_font(&mut self, font: &FontState, flags: FontFieldFlags) {
        self.font.merge_from(font, flags);
        if flags.contains(FontFieldFlags::SIZE) {
            self.unscaled_font_size = (font.size as f64) / self.scale.max(f64::EPSILON);
        }
    }
}

/// An arena of [`DrawState`]s for a single view, replacing the raw
/// `previousState` pointer chain with parent indices into a flat `Vec`.
/// Index 0 is always the root and is never removed.
#[derive(Debug, Clone)]
pub struct DrawStateArena {
    states: Vec<DrawState>,
    parents: Vec<Option<usize>>,
    top: usize,
}

impl DrawStateArena {
    pub fn new() -> Self {
        Self {
            states: vec![DrawState::root()],
            parents: vec![None],
            top: 0,
        }
    }

    pub fn top(&self) -> &DrawState {
        &self.states[self.top]
    }

    pub fn top_mut(&mut self) -> &mut DrawState {
        &mut self.states[self.top]
    }

    pub fn top_index(&self) -> usize {
        self.top
    }

    pub fn is_root(&self) -> bool {
        self.top == 0
    }

    /// Clones the current top state into a new arena slot and makes it the
    /// new top, parented to the previous top. Returns the new state's index.
    pub fn push(&mut self) -> usize {
        let clone = self.states[self.top].clone();
        self.states.push(clone);
        self.parents.push(Some(self.top));
        self.top = self.states.len() - 1;
        self.top
    }

    /// Returns to the parent state. Calling on the root is a no-op that
    /// returns the root's own index — the root is never popped away.
    pub fn pop(&mut self) -> usize {
        if let Some(parent) = self.parents[self.top] {
            self.top = parent;
        }
        self.top
    }
}

impl Default for DrawStateArena {
    fn default() -> Self {
        Self::new()
    }
}
