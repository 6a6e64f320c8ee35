//! Client/server wire serialization for [`DrawState`](crate::draw_state::DrawState).
//!
//! A packed, fixed-order byte stream, host-endian (server and client share
//! an address space family, so no network byte order conversion happens
//! here). [`LinkWriter`] and [`LinkReader`] are the minimal cursor pair the
//! rest of the crate needs; they don't know anything about message framing,
//! which is an external collaborator's job.

use crate::color::Color;
use crate::draw_state::{DrawState, FontState, LineCapMode, LineJoinMode};
use crate::drawing_mode::{AlphaFncMode, AlphaSrcMode, DrawingMode};
use crate::geometry::{IRect, Point};
use crate::pattern::Pattern;
use crate::region::Region;

#[derive(Debug, Default)]
pub struct LinkWriter {
    buf: Vec<u8>,
}

impl LinkWriter {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_ne_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_ne_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_ne_bytes());
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_ne_bytes());
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.push(v as u8);
    }

    pub fn write_point(&mut self, p: Point) {
        self.write_f64(p.x);
        self.write_f64(p.y);
    }

    pub fn write_color(&mut self, c: Color) {
        self.buf.extend_from_slice(&c.to_bytes_bgra());
    }

    pub fn write_pattern(&mut self, p: Pattern) {
        self.buf.extend_from_slice(&p.rows);
    }

    pub fn write_rect(&mut self, r: IRect) {
        self.write_u32(r.left as u32);
        self.write_u32(r.top as u32);
        self.write_u32(r.right as u32);
        self.write_u32(r.bottom as u32);
    }
}

#[derive(Debug)]
pub struct LinkReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkReadError;

type LinkResult<T> = Result<T, LinkReadError>;

impl<'a> LinkReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> LinkResult<&'a [u8]> {
        if self.pos + n > self.buf.len() {
            return Err(LinkReadError);
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_f64(&mut self) -> LinkResult<f64> {
        Ok(f64::from_ne_bytes(self.take(8)?.try_into().unwrap()))
    }

    pub fn read_f32(&mut self) -> LinkResult<f32> {
        Ok(f32::from_ne_bytes(self.take(4)?.try_into().unwrap()))
    }

    pub fn read_u32(&mut self) -> LinkResult<u32> {
        Ok(u32::from_ne_bytes(self.take(4)?.try_into().unwrap()))
    }

    pub fn read_u16(&mut self) -> LinkResult<u16> {
        Ok(u16::from_ne_bytes(self.take(2)?.try_into().unwrap()))
    }

    pub fn read_u8(&mut self) -> LinkResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> LinkResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_point(&mut self) -> LinkResult<Point> {
        Ok(Point::new(self.read_f64()?, self.read_f64()?))
    }

    pub fn read_color(&mut self) -> LinkResult<Color> {
        let bytes = self.take(4)?;
        Ok(Color {
            b: bytes[0],
            g: bytes[1],
            r: bytes[2],
            a: bytes[3],
        })
    }

    pub fn read_pattern(&mut self) -> LinkResult<Pattern> {
        let bytes = self.take(8)?;
        let mut rows = [0u8; 8];
        rows.copy_from_slice(bytes);
        Ok(Pattern::new(rows))
    }

    pub fn read_rect(&mut self) -> LinkResult<IRect> {
        Ok(IRect::new(
            self.read_u32()? as i32,
            self.read_u32()? as i32,
            self.read_u32()? as i32,
            self.read_u32()? as i32,
        ))
    }
}

fn drawing_mode_code(mode: DrawingMode) -> u32 {
    match mode {
        DrawingMode::Copy => 0,
        DrawingMode::Over => 1,
        DrawingMode::Erase => 2,
        DrawingMode::Invert => 3,
        DrawingMode::Add => 4,
        DrawingMode::Subtract => 5,
        DrawingMode::Blend => 6,
        DrawingMode::Min => 7,
        DrawingMode::Max => 8,
        DrawingMode::Select => 9,
        DrawingMode::Alpha(_, _) => 10,
    }
}

fn drawing_mode_from_code(code: u32, src: AlphaSrcMode, func: AlphaFncMode) -> DrawingMode {
    match code {
        0 => DrawingMode::Copy,
        1 => DrawingMode::Over,
        2 => DrawingMode::Erase,
        3 => DrawingMode::Invert,
        4 => DrawingMode::Add,
        5 => DrawingMode::Subtract,
        6 => DrawingMode::Blend,
        7 => DrawingMode::Min,
        8 => DrawingMode::Max,
        9 => DrawingMode::Select,
        _ => DrawingMode::Alpha(src, func),
    }
}

fn alpha_src_code(mode: AlphaSrcMode) -> u32 {
    match mode {
        AlphaSrcMode::PixelAlpha => 0,
        AlphaSrcMode::ConstantAlpha => 1,
    }
}

fn alpha_src_from_code(code: u32) -> AlphaSrcMode {
    if code == 1 {
        AlphaSrcMode::ConstantAlpha
    } else {
        AlphaSrcMode::PixelAlpha
    }
}

fn alpha_fnc_code(mode: AlphaFncMode) -> u32 {
    match mode {
        AlphaFncMode::Overlay => 0,
        AlphaFncMode::Composite => 1,
    }
}

fn alpha_fnc_from_code(code: u32) -> AlphaFncMode {
    if code == 1 {
        AlphaFncMode::Composite
    } else {
        AlphaFncMode::Overlay
    }
}

fn cap_code(mode: LineCapMode) -> u32 {
    match mode {
        LineCapMode::Butt => 0,
        LineCapMode::Square => 1,
        LineCapMode::Round => 2,
    }
}

fn cap_from_code(code: u32) -> LineCapMode {
    match code {
        1 => LineCapMode::Square,
        2 => LineCapMode::Round,
        _ => LineCapMode::Butt,
    }
}

fn join_code(mode: LineJoinMode) -> u32 {
    match mode {
        LineJoinMode::Miter => 0,
        LineJoinMode::Round => 1,
        LineJoinMode::Bevel => 2,
    }
}

fn join_from_code(code: u32) -> LineJoinMode {
    match code {
        1 => LineJoinMode::Round,
        2 => LineJoinMode::Bevel,
        _ => LineJoinMode::Miter,
    }
}

/// Writes every field the spec lists for the non-font part of a `DrawState`,
/// in the exact fixed order clients expect.
pub fn write_to_link(state: &DrawState, writer: &mut LinkWriter) {
    writer.write_point(state.origin);
    writer.write_f32(state.scale as f32);
    writer.write_point(state.pen_location);
    writer.write_f32(state.pen_size as f32);
    writer.write_u32(drawing_mode_code(state.drawing_mode));
    writer.write_color(state.high_color);
    writer.write_color(state.low_color);
    writer.write_pattern(state.pattern);
    writer.write_u32(alpha_src_code(state.alpha_src_mode));
    writer.write_u32(alpha_fnc_code(state.alpha_fnc_mode));
    writer.write_u32(cap_code(state.line_cap_mode));
    writer.write_u32(join_code(state.line_join_mode));
    writer.write_f32(state.miter_limit as f32);
    writer.write_bool(state.sub_pixel_precise);
    writer.write_bool(state.font_aliasing);
    let rects = state
        .clipping_region
        .as_ref()
        .map(|r| r.rects())
        .unwrap_or(&[]);
    writer.write_u32(rects.len() as u32);
    for rect in rects {
        writer.write_rect(*rect);
    }
}

/// Inverse of [`write_to_link`]. `unscaled_font_size` and `font` are left at
/// [`DrawState::root`]'s defaults; callers that also serialized the font
/// stream should apply [`read_font_from_link`] afterward.
pub fn read_from_link(reader: &mut LinkReader) -> LinkResult<DrawState> {
    let origin = reader.read_point()?;
    let scale = reader.read_f32()? as f64;
    let pen_location = reader.read_point()?;
    let pen_size = reader.read_f32()? as f64;
    let mode_code = reader.read_u32()?;
    let high_color = reader.read_color()?;
    let low_color = reader.read_color()?;
    let pattern = reader.read_pattern()?;
    let alpha_src = alpha_src_from_code(reader.read_u32()?);
    let alpha_fnc = alpha_fnc_from_code(reader.read_u32()?);
    let line_cap_mode = cap_from_code(reader.read_u32()?);
    let line_join_mode = join_from_code(reader.read_u32()?);
    let miter_limit = reader.read_f32()? as f64;
    let sub_pixel_precise = reader.read_bool()?;
    let font_aliasing = reader.read_bool()?;
    let clip_count = reader.read_u32()?;
    let mut region = Region::empty();
    for _ in 0..clip_count {
        region.union_rect(reader.read_rect()?);
    }
    let clipping_region = if region.is_empty() { None } else { Some(region) };

    let mut state = DrawState::root();
    state.origin = origin;
    state.scale = scale;
    state.pen_location = pen_location;
    state.pen_size = pen_size;
    state.drawing_mode = drawing_mode_from_code(mode_code, alpha_src, alpha_fnc);
    state.high_color = high_color;
    state.low_color = low_color;
    state.pattern = pattern;
    state.alpha_src_mode = alpha_src;
    state.alpha_fnc_mode = alpha_fnc;
    state.line_cap_mode = line_cap_mode;
    state.line_join_mode = line_join_mode;
    state.miter_limit = miter_limit;
    state.sub_pixel_precise = sub_pixel_precise;
    state.font_aliasing = font_aliasing;
    state.clipping_region = clipping_region;
    Ok(state)
}

/// The font stream, serialized separately from the rest of the state to
/// match the wire protocol used by existing clients.
pub fn write_font_to_link(font: &FontState, writer: &mut LinkWriter) {
    writer.write_u16(font.family_id);
    writer.write_u16(font.style_id);
    writer.write_u32(0); // reserved flags word, kept for wire-layout parity
    writer.write_f32(font.size);
    writer.write_f32(font.shear);
    writer.write_f32(font.rotation);
    writer.write_u8(font.spacing);
    writer.write_u8(font.encoding);
    writer.write_u16(font.face);
}

pub fn read_font_from_link(reader: &mut LinkReader) -> LinkResult<FontState> {
    let family_id = reader.read_u16()?;
    let style_id = reader.read_u16()?;
    let _flags = reader.read_u32()?;
    let size = reader.read_f32()?;
    let shear = reader.read_f32()?;
    let rotation = reader.read_f32()?;
    let spacing = reader.read_u8()?;
    let encoding = reader.read_u8()?;
    let face = reader.read_u16()?;
    Ok(FontState {
        family_id,
        style_id,
        face,
        size,
        shear,
        rotation,
        spacing,
        encoding,
    })
}
