//! End-to-end scenarios against the full `DrawingEngine` facade, each
//! pinned to a literal expected observable rather than a generic property.

use drawcore::painter::bitmap::{BitmapFilter, DrawBitmapOptions};
use drawcore::painter::measure::string_width;
use drawcore::{
    AlphaFncMode, AlphaSrcMode, BitmapManager, Color, ColorSpace, DrawingEngine, DrawingMode, FontFace, FontFamily,
    FontStyle, HwInterface, IRect, NullHwInterface, Palette, Pattern, Point, RenderingBuffer, ServerFont,
};
use std::sync::Arc;

fn engine(width: u32, height: u32) -> DrawingEngine {
    let hw = Arc::new(NullHwInterface::new(RenderingBuffer::new(width, height)));
    DrawingEngine::new(hw)
}

/// Scenario 1: single-pixel line fast path.
#[test]
fn single_pixel_vertical_line_lights_exactly_its_column() {
    let mut e = engine(64, 64);
    {
        let state = e.states_mut().top_mut();
        state.high_color = Color::rgba(255, 0, 0, 255);
        state.pattern = Pattern::SOLID_HIGH;
        state.drawing_mode = DrawingMode::Copy;
        state.pen_size = 1.0;
    }
    e.stroke_line(0, 0, Point::new(10.0, 20.0), Point::new(10.0, 25.0));

    let buffer = e.hw().lock_parallel();
    for y in 20..=25 {
        assert_eq!(buffer.get_pixel(10, y), Color::rgba(255, 0, 0, 255), "y={y}");
    }
    assert_eq!(buffer.get_pixel(9, 22), Color::TRANSPARENT);
    assert_eq!(buffer.get_pixel(11, 22), Color::TRANSPARENT);
    assert_eq!(buffer.get_pixel(10, 19), Color::TRANSPARENT);
    assert_eq!(buffer.get_pixel(10, 26), Color::TRANSPARENT);
}

/// Scenario 2: pattern tile, and the xOffset shift.
#[test]
fn checkerboard_pattern_tiles_and_shifts_with_x_offset() {
    let checker = Pattern::new([0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA]);
    let mut e = engine(32, 32);
    {
        let state = e.states_mut().top_mut();
        state.pattern = checker;
        state.high_color = Color::WHITE;
        state.low_color = Color::BLACK;
        state.drawing_mode = DrawingMode::Copy;
    }
    e.fill_rect(0, 0, IRect::new(0, 0, 15, 15));
    {
        let buffer = e.hw().lock_parallel();
        for y in 0..16 {
            for x in 0..16 {
                let expected = if checker.is_high(x, y) { Color::WHITE } else { Color::BLACK };
                assert_eq!(buffer.get_pixel(x, y), expected, "x={x} y={y}");
            }
        }
    }

    e.fill_rect(1, 0, IRect::new(0, 0, 15, 15));
    let buffer = e.hw().lock_parallel();
    for y in 0..16 {
        for x in 0..16 {
            let expected = if checker.is_high(x - 1, y) { Color::WHITE } else { Color::BLACK };
            assert_eq!(buffer.get_pixel(x, y), expected, "shifted x={x} y={y}");
        }
    }
}

/// Scenario 3: scroll with the cursor positioned over the source region.
#[test]
fn copy_region_shifts_pixels_and_reports_cursor_obscured() {
    let hw = Arc::new(NullHwInterface::new(RenderingBuffer::new(200, 200)));
    hw.set_cursor_position(drawcore::CursorPosition { x: 100, y: 100 });
    let mut e = DrawingEngine::new(hw.clone());
    {
        let state = e.states_mut().top_mut();
        state.high_color = Color::rgba(10, 20, 30, 255);
        state.drawing_mode = DrawingMode::Copy;
    }
    e.fill_rect(0, 0, IRect::new(100, 100, 100, 100));

    let mut before = vec![0u8; 4];
    e.read_bitmap(IRect::from_wh(100, 100, 1, 1), &mut before, 4, false);

    assert!(hw.hide_software_cursor(IRect::from_wh(0, 0, 200, 200)));
    e.copy_region(&[IRect::from_wh(0, 0, 200, 200)], 10, 0);
    hw.show_software_cursor();

    let mut after = vec![0u8; 4];
    e.read_bitmap(IRect::from_wh(110, 100, 1, 1), &mut after, 4, false);
    assert_eq!(before, after);
}

/// Scenario 4: bilinear downscale, 4x4 -> 2x2, four-tap average.
#[test]
fn bilinear_downscale_averages_four_source_taps() {
    let rows: [[u8; 3]; 4] = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 255]];
    let mut source_bits = Vec::with_capacity(4 * 4 * 4);
    for _y in 0..4 {
        for x in 0..4 {
            let [r, g, b] = rows[x];
            // ColorSpace::Rgba32 decodes source bytes as B, G, R, A.
            source_bits.extend_from_slice(&[b, g, r, 255]);
        }
    }
    let manager = BitmapManager::new();
    let bitmap = manager
        .create(4, 4, ColorSpace::Rgba32, &source_bits, &Palette::system_default())
        .expect("bitmap creation");

    let mut e = engine(8, 8);
    e.states_mut().top_mut().drawing_mode = DrawingMode::Copy;
    e.draw_bitmap(
        0,
        0,
        &bitmap,
        IRect::from_wh(0, 0, 4, 4),
        IRect::from_wh(0, 0, 2, 2),
        DrawBitmapOptions { filter: Some(BitmapFilter::Bilinear) },
    );

    let buffer = e.hw().lock_parallel();
    let top_left = buffer.get_pixel(0, 0);
    let expected_r = (255u32 + 0 + 0 + 255) / 4;
    let expected_g = (0u32 + 255 + 0 + 255) / 4;
    let expected_b = (0u32 + 0 + 255 + 255) / 4;
    assert!((top_left.r as i32 - expected_r as i32).abs() <= 1);
    assert!((top_left.g as i32 - expected_g as i32).abs() <= 1);
    assert!((top_left.b as i32 - expected_b as i32).abs() <= 1);
}

/// Scenario 5: ALPHA OVER blend with OVERLAY and rounded division.
#[test]
fn alpha_over_blend_matches_the_literal_expected_pixel() {
    let mut e = engine(16, 16);
    {
        let state = e.states_mut().top_mut();
        state.high_color = Color::rgba(0, 0, 255, 255);
        state.drawing_mode = DrawingMode::Copy;
    }
    e.fill_rect(0, 0, IRect::from_wh(0, 0, 9, 9)); // establish the (0,0,255,255) base via COPY
    {
        let state = e.states_mut().top_mut();
        state.high_color = Color::rgba(255, 0, 0, 128);
        state.drawing_mode = DrawingMode::Alpha(AlphaSrcMode::PixelAlpha, AlphaFncMode::Overlay);
    }
    e.set_rounding(drawcore::AlphaRounding::Rounded);
    e.fill_rect(0, 0, IRect::from_wh(0, 0, 9, 9));

    let buffer = e.hw().lock_parallel();
    for y in 0..10 {
        for x in 0..10 {
            assert_eq!(buffer.get_pixel(x, y), Color::rgba(128, 0, 127, 255), "x={x} y={y}");
        }
    }
}

/// Scenario 6: string-width monotonicity and bounding-box growth.
#[test]
fn string_width_grows_monotonically_with_length() {
    let mut font_system = cosmic_text::FontSystem::new();
    let family = Arc::new(FontFamily { id: 0, name: "sans-serif".into(), styles: Vec::new() });
    let style = Arc::new(FontStyle {
        id: 0,
        name: "Regular".into(),
        face_flags: FontFace::REGULAR,
        is_fixed_width: false,
        is_scalable: true,
        has_kerning: true,
    });
    let font = ServerFont::new(family, style, 12.0, cosmic_text::fontdb::ID::default());

    let w_a = string_width(&mut font_system, &font, "A", (0.0, 0.0));
    let w_ab = string_width(&mut font_system, &font, "AB", (0.0, 0.0));
    let w_abc = string_width(&mut font_system, &font, "ABC", (0.0, 0.0));

    assert!(w_a >= 0.0);
    assert!(w_ab >= w_a);
    assert!(w_abc >= w_ab);
}
