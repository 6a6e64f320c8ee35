//! Screen readback: copies a rect of the frame buffer into a caller-provided
//! destination, optionally converting color space and compositing the
//! cursor. Mirrors the teacher's `copy_padded_readback_rows` shape — a pure,
//! colocated-tested row copier underneath the locking/cursor orchestration
//! in [`crate::engine::DrawingEngine::read_bitmap`].

use crate::color::Color;
use crate::engine::hw::ServerCursor;
use crate::geometry::IRect;
use crate::rendering_buffer::RenderingBuffer;

/// Copies `src_rect` from `source` into `dest`, a flat BGRA32 buffer with
/// its own (possibly padded) `dest_stride`. Rows outside `source`'s bounds
/// are left untouched in `dest` (already zeroed by the caller).
pub fn copy_readback_rows(source: &RenderingBuffer, src_rect: IRect, dest: &mut [u8], dest_stride: usize) {
    let clipped = src_rect.intersect(&source.bounds());
    if clipped.is_empty() {
        return;
    }
    for (row_index, y) in (clipped.top..clipped.bottom).enumerate() {
        let src_row = source.row(y as u32, clipped.left as u32, clipped.right as u32);
        let dest_offset = row_index * dest_stride;
        let dest_row = &mut dest[dest_offset..dest_offset + src_row.len()];
        dest_row.copy_from_slice(src_row);
    }
}

/// Composites `cursor` at `position` onto `dest` (a readback already
/// populated by [`copy_readback_rows`]), using the cursor's own alpha
/// channel, clipped to `src_rect`'s footprint within `dest`.
pub fn composite_cursor_into_readback(
    cursor: &ServerCursor,
    position: (i32, i32),
    src_rect: IRect,
    dest: &mut [u8],
    dest_stride: usize,
) {
    let cursor_rect = IRect::from_wh(position.0, position.1, cursor.width as i32, cursor.height as i32);
    let visible = cursor_rect.intersect(&src_rect);
    if visible.is_empty() {
        return;
    }
    for y in visible.top..visible.bottom {
        let dest_row_index = (y - src_rect.top) as usize;
        for x in visible.left..visible.right {
            let cursor_x = (x - cursor_rect.left) as u32;
            let cursor_y = (y - cursor_rect.top) as u32;
            let src = cursor.get_pixel(cursor_x, cursor_y);
            if src.is_transparent() {
                continue;
            }
            let dest_col = (x - src_rect.left) as usize;
            let offset = dest_row_index * dest_stride + dest_col * 4;
            let existing = Color::from_bgra_word(u32::from_ne_bytes(dest[offset..offset + 4].try_into().unwrap()));
            let blended = blend_straight_alpha(src, existing);
            dest[offset..offset + 4].copy_from_slice(&blended.to_bgra_word().to_ne_bytes());
        }
    }
}

fn blend_straight_alpha(src: Color, dst: Color) -> Color {
    let a = src.a as u32;
    let mix = |s: u8, d: u8| -> u8 { ((s as u32 * a + d as u32 * (255 - a)) / 255) as u8 };
    Color::rgb(mix(src.r, dst.r), mix(src.g, dst.g), mix(src.b, dst.b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_readback_rows_strips_to_requested_rect() {
        let mut buffer = RenderingBuffer::new(4, 4);
        buffer.set_pixel(1, 1, Color::rgba(10, 20, 30, 40));
        let mut dest = vec![0u8; 2 * 2 * 4];
        copy_readback_rows(&buffer, IRect::from_wh(1, 1, 2, 2), &mut dest, 8);
        let pixel = Color::from_bgra_word(u32::from_ne_bytes(dest[0..4].try_into().unwrap()));
        assert_eq!(pixel, Color::rgba(10, 20, 30, 40));
    }

    #[test]
    fn copy_readback_rows_clips_to_buffer_bounds() {
        let buffer = RenderingBuffer::new(4, 4);
        let mut dest = vec![0u8; 40 * 40 * 4];
        // Should not panic even though the requested rect extends past bounds.
        copy_readback_rows(&buffer, IRect::from_wh(-10, -10, 50, 50), &mut dest, 40 * 4);
    }

    #[test]
    fn cursor_composite_respects_alpha() {
        let cursor = ServerCursor {
            width: 1,
            height: 1,
            bits: Color::rgba(255, 0, 0, 255).to_bytes_bgra().to_vec(),
        };
        let mut dest = vec![0u8; 4];
        composite_cursor_into_readback(&cursor, (0, 0), IRect::from_wh(0, 0, 1, 1), &mut dest, 4);
        let pixel = Color::from_bgra_word(u32::from_ne_bytes(dest[0..4].try_into().unwrap()));
        assert_eq!(pixel, Color::rgba(255, 0, 0, 255));
    }

    #[test]
    fn transparent_cursor_pixel_leaves_destination_alone() {
        let cursor = ServerCursor { width: 1, height: 1, bits: vec![0, 0, 0, 0] };
        let mut dest = Color::rgba(9, 9, 9, 255).to_bytes_bgra().to_vec();
        composite_cursor_into_readback(&cursor, (0, 0), IRect::from_wh(0, 0, 1, 1), &mut dest, 4);
        let pixel = Color::from_bgra_word(u32::from_ne_bytes(dest[0..4].try_into().unwrap()));
        assert_eq!(pixel, Color::rgba(9, 9, 9, 255));
    }
}
