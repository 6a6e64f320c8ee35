//! # app_server rendering core
//!
//! This crate is the rendering core of an application-level graphics
//! server: a software rasterizer driven by a stack of drawing states, a
//! pattern-and-drawing-mode compositing pipeline, and a facade
//! ([`engine::DrawingEngine`]) that locks a frame buffer and dispatches
//! draw primitives against it.
//!
//! ## Layout
//!
//! - [`pixel_format`] / [`color`]: client pixel formats, palette
//!   resolution, and the internal BGRA32 color type.
//! - [`pattern`] / [`drawing_mode`]: the 8x8 dither pattern and the
//!   fourteen drawing-mode compositing rules built on top of it.
//! - [`draw_state`]: the per-view drawing-state stack (`DrawStateArena`)
//!   and its wire encoding in [`link`].
//! - [`region`]: clip regions as unmerged rect lists.
//! - [`rendering_buffer`] / [`bitmap`]: the pixel backing store and the
//!   server-side bitmap registry.
//! - [`font`]: font family/style/face handles and glyph shaping state.
//! - [`painter`]: the geometric rasterizer — lines, rects, curves,
//!   polygons, bitmaps and text, each in its own submodule.
//! - [`engine`]: the facade gluing an [`engine::hw::HwInterface`], the
//!   draw-state stack and the painter together.

mod bitmap;
mod color;
mod draw_state;
mod drawing_mode;
pub mod engine;
mod error;
mod font;
mod geometry;
mod link;
pub mod painter;
mod pattern;
mod pixel_format;
mod region;
mod rendering_buffer;
mod util;

pub use bitmap::{BitmapManager, BitmapToken, ServerBitmap, ServerBitmapData};
pub use color::Color;
pub use draw_state::{DrawState, DrawStateArena, FontFieldFlags, FontState, LineCapMode, LineJoinMode};
pub use drawing_mode::{AlphaFncMode, AlphaRounding, AlphaSrcMode, DrawingMode, PatternSample};
pub use engine::hw::{CursorPosition, HwAcceleration, HwInterface, NullHwInterface, ServerCursor};
pub use engine::DrawingEngine;
pub use error::{PaintError, PaintResult};
pub use font::{FaceLock, FontFace, FontFamily, FontFlags, FontStyle, ServerFont, SpacingMode, DEFAULT_ALIASING_THRESHOLD_PT};
pub use geometry::{IRect, Point, Rect};
pub use link::{
    read_font_from_link, read_from_link, write_font_to_link, write_to_link, LinkReadError, LinkReader, LinkWriter,
};
pub use painter::{Painter, PainterState};
pub use pattern::{Pattern, PatternHandler};
pub use pixel_format::{ColorSpace, Palette};
pub use region::Region;
pub use rendering_buffer::RenderingBuffer;
