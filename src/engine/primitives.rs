//! One method per draw primitive, each delegating to [`Painter`] under a
//! locked frame buffer, with the cursor hide/show-around-draw and
//! invalidation bracket the spec requires of every primitive.

use crate::bitmap::ServerBitmap;
use crate::color::Color;
use crate::engine::DrawingEngine;
use crate::geometry::{IRect, Point};
use crate::painter::bitmap::DrawBitmapOptions;
use crate::painter::lines::LineArrayData;
use crate::painter::polygon::ShapeOp;

impl DrawingEngine {
    /// Runs `draw` with an exclusively-locked frame buffer, hiding the
    /// software cursor first if `draw`'s footprint would obscure it and
    /// restoring it afterward, then invalidating the touched rect.
    fn with_locked_buffer(&mut self, footprint: IRect, draw: impl FnOnce(&mut Self, &mut crate::rendering_buffer::RenderingBuffer) -> IRect) -> IRect {
        let hw = self.hw.clone();
        let obscured = hw.hide_software_cursor(footprint);
        let touched = {
            let mut buffer = hw.lock_exclusive();
            draw(self, &mut buffer)
        };
        if obscured {
            hw.show_software_cursor();
        }
        if !touched.is_empty() {
            hw.invalidate(touched);
        }
        touched
    }

    pub fn stroke_line(&mut self, x_offset: i32, y_offset: i32, start: Point, end: Point) -> IRect {
        let footprint = IRect::from_wh(
            start.x.min(end.x) as i32 - 1,
            start.y.min(end.y) as i32 - 1,
            (start.x - end.x).abs() as i32 + 2,
            (start.y - end.y).abs() as i32 + 2,
        );
        self.sync_pattern(x_offset, y_offset);
        self.with_locked_buffer(footprint, |engine, buffer| {
            let mut painter = engine.attach(buffer);
            painter.stroke_line(start, end)
        })
    }

    pub fn stroke_line_array(&mut self, x_offset: i32, y_offset: i32, segments: &[LineArrayData]) -> IRect {
        self.sync_pattern(x_offset, y_offset);
        let bounds = self.hw.lock_parallel().bounds();
        self.with_locked_buffer(bounds, |engine, buffer| {
            let mut painter = engine.attach(buffer);
            painter.stroke_line_array(segments)
        })
    }

    pub fn fill_rect(&mut self, x_offset: i32, y_offset: i32, rect: IRect) -> IRect {
        self.sync_pattern(x_offset, y_offset);
        // fill_rect's rect is pixel-index inclusive; widen by one pixel on
        // the bottom-right edge so the cursor-overlap footprint matches the
        // area actually painted.
        let footprint = IRect::new(rect.left, rect.top, rect.right + 1, rect.bottom + 1);
        self.with_locked_buffer(footprint, |engine, buffer| {
            let mut painter = engine.attach(buffer);
            painter.fill_rect(rect)
        })
    }

    pub fn stroke_rect(&mut self, x_offset: i32, y_offset: i32, rect: IRect) -> IRect {
        self.sync_pattern(x_offset, y_offset);
        self.with_locked_buffer(rect, |engine, buffer| {
            let mut painter = engine.attach(buffer);
            painter.stroke_rect(rect)
        })
    }

    pub fn fill_ellipse(&mut self, x_offset: i32, y_offset: i32, center: Point, rx: f64, ry: f64) -> IRect {
        self.sync_pattern(x_offset, y_offset);
        let footprint = ellipse_footprint(center, rx, ry);
        self.with_locked_buffer(footprint, |engine, buffer| {
            let mut painter = engine.attach(buffer);
            painter.fill_ellipse(center, rx, ry)
        })
    }

    pub fn stroke_ellipse(&mut self, x_offset: i32, y_offset: i32, center: Point, rx: f64, ry: f64) -> IRect {
        self.sync_pattern(x_offset, y_offset);
        let footprint = ellipse_footprint(center, rx, ry);
        self.with_locked_buffer(footprint, |engine, buffer| {
            let mut painter = engine.attach(buffer);
            painter.stroke_ellipse(center, rx, ry)
        })
    }

    pub fn fill_arc(&mut self, x_offset: i32, y_offset: i32, center: Point, rx: f64, ry: f64, start_deg: f64, span_deg: f64) -> IRect {
        self.sync_pattern(x_offset, y_offset);
        let footprint = ellipse_footprint(center, rx, ry);
        self.with_locked_buffer(footprint, |engine, buffer| {
            let mut painter = engine.attach(buffer);
            painter.fill_arc(center, rx, ry, start_deg, span_deg)
        })
    }

    pub fn stroke_arc(&mut self, x_offset: i32, y_offset: i32, center: Point, rx: f64, ry: f64, start_deg: f64, span_deg: f64) -> IRect {
        self.sync_pattern(x_offset, y_offset);
        let footprint = ellipse_footprint(center, rx, ry);
        self.with_locked_buffer(footprint, |engine, buffer| {
            let mut painter = engine.attach(buffer);
            painter.stroke_arc(center, rx, ry, start_deg, span_deg)
        })
    }

    pub fn fill_round_rect(&mut self, x_offset: i32, y_offset: i32, rect: IRect, radius_x: f64, radius_y: f64) -> IRect {
        self.sync_pattern(x_offset, y_offset);
        self.with_locked_buffer(rect, |engine, buffer| {
            let mut painter = engine.attach(buffer);
            painter.fill_round_rect(rect, radius_x, radius_y)
        })
    }

    pub fn stroke_round_rect(&mut self, x_offset: i32, y_offset: i32, rect: IRect, radius_x: f64, radius_y: f64) -> IRect {
        self.sync_pattern(x_offset, y_offset);
        self.with_locked_buffer(rect, |engine, buffer| {
            let mut painter = engine.attach(buffer);
            painter.stroke_round_rect(rect, radius_x, radius_y)
        })
    }

    pub fn fill_shape(&mut self, x_offset: i32, y_offset: i32, ops: &[ShapeOp]) -> IRect {
        self.sync_pattern(x_offset, y_offset);
        let bounds = self.hw.lock_parallel().bounds();
        self.with_locked_buffer(bounds, |engine, buffer| {
            let mut painter = engine.attach(buffer);
            painter.fill_shape(ops)
        })
    }

    pub fn stroke_shape(&mut self, x_offset: i32, y_offset: i32, ops: &[ShapeOp]) -> IRect {
        self.sync_pattern(x_offset, y_offset);
        let bounds = self.hw.lock_parallel().bounds();
        self.with_locked_buffer(bounds, |engine, buffer| {
            let mut painter = engine.attach(buffer);
            painter.stroke_shape(ops)
        })
    }

    pub fn draw_bitmap(&mut self, x_offset: i32, y_offset: i32, bitmap: &ServerBitmap, source: IRect, dest: IRect, options: DrawBitmapOptions) -> IRect {
        self.sync_pattern(x_offset, y_offset);
        self.with_locked_buffer(dest, |engine, buffer| {
            let mut painter = engine.attach(buffer);
            painter.draw_bitmap(bitmap, source, dest, options)
        })
    }

    /// Copies `src_rects` by `(dx, dy)` within the frame buffer itself,
    /// ordering the copy through [`crate::engine::copy_region::safe_copy_order`]
    /// so overlapping source/destination rects don't clobber each other,
    /// then invalidates the union of source and destination footprints.
    pub fn copy_region(&mut self, src_rects: &[IRect], dx: i32, dy: i32) -> IRect {
        if src_rects.is_empty() {
            return IRect::EMPTY;
        }
        let ordered = crate::engine::copy_region::safe_copy_order(src_rects, dx, dy);
        let mut touched = IRect::EMPTY;
        for rect in &ordered {
            let dest = IRect::from_wh(rect.left + dx, rect.top + dy, rect.right - rect.left, rect.bottom - rect.top);
            touched = touched.union(rect).union(&dest);
        }
        let hw = self.hw.clone();
        if hw.available_hw_acceleration().contains(crate::engine::hw::HwAcceleration::COPY_REGION)
            && hw.copy_region(&ordered, dx, dy)
        {
            hw.invalidate(touched);
            return touched;
        }
        let obscured = hw.hide_software_cursor(touched);
        {
            let mut buffer = hw.lock_exclusive();
            for rect in &ordered {
                copy_rect_within(&mut buffer, *rect, dx, dy);
            }
        }
        if obscured {
            hw.show_software_cursor();
        }
        hw.invalidate(touched);
        touched
    }
}

fn ellipse_footprint(center: Point, rx: f64, ry: f64) -> IRect {
    IRect::from_wh(
        (center.x - rx) as i32 - 1,
        (center.y - ry) as i32 - 1,
        (rx * 2.0) as i32 + 3,
        (ry * 2.0) as i32 + 3,
    )
}

fn copy_rect_within(buffer: &mut crate::rendering_buffer::RenderingBuffer, rect: IRect, dx: i32, dy: i32) {
    let clipped = rect.intersect(&buffer.bounds());
    if clipped.is_empty() {
        return;
    }
    let row_bytes = (clipped.right - clipped.left) as usize * 4;
    let y_range: Box<dyn Iterator<Item = i32>> = if dy > 0 {
        Box::new((clipped.top..clipped.bottom).rev())
    } else {
        Box::new(clipped.top..clipped.bottom)
    };
    let mut scratch = vec![0u8; row_bytes];
    for y in y_range {
        scratch.copy_from_slice(buffer.row(y as u32, clipped.left as u32, clipped.right as u32));
        let dest_y = y + dy;
        if dest_y < 0 || dest_y as u32 >= buffer.bounds().bottom as u32 {
            continue;
        }
        let dest_x0 = (clipped.left + dx).max(0) as u32;
        let dest_x1 = (clipped.right + dx).min(buffer.bounds().right) as u32;
        if dest_x1 <= dest_x0 {
            continue;
        }
        let src_skip = (dest_x0 as i32 - (clipped.left + dx)) as usize * 4;
        let dest_row = buffer.row_mut(dest_y as u32, dest_x0, dest_x1);
        dest_row.copy_from_slice(&scratch[src_skip..src_skip + dest_row.len()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::hw::NullHwInterface;
    use crate::rendering_buffer::RenderingBuffer;
    use std::sync::Arc;

    fn engine(width: u32, height: u32) -> DrawingEngine {
        let hw = Arc::new(NullHwInterface::new(RenderingBuffer::new(width, height)));
        DrawingEngine::new(hw)
    }

    #[test]
    fn fill_rect_paints_and_reports_touched_area() {
        let mut e = engine(20, 20);
        e.states_mut().top_mut().high_color = Color::rgb(200, 10, 10);
        // fill_rect takes a pixel-index-inclusive rect; (2,2,5,5) covers
        // the 4x4 pixel area also expressible as IRect::from_wh(2,2,4,4).
        let touched = e.fill_rect(0, 0, IRect::new(2, 2, 5, 5));
        assert_eq!(touched, IRect::from_wh(2, 2, 4, 4));
        let buffer = e.hw().lock_parallel();
        assert_eq!(buffer.get_pixel(3, 3), Color::rgb(200, 10, 10));
    }

    #[test]
    fn copy_region_shifts_pixels_by_the_given_offset() {
        let mut e = engine(10, 10);
        e.states_mut().top_mut().high_color = Color::rgb(1, 2, 3);
        e.fill_rect(0, 0, IRect::new(0, 0, 2, 2));
        e.copy_region(&[IRect::from_wh(0, 0, 3, 3)], 5, 5);
        let buffer = e.hw().lock_parallel();
        assert_eq!(buffer.get_pixel(6, 6), Color::rgb(1, 2, 3));
        assert_eq!(buffer.get_pixel(1, 1), Color::rgb(1, 2, 3));
    }

    #[test]
    fn copy_region_with_no_rects_touches_nothing() {
        let mut e = engine(10, 10);
        assert!(e.copy_region(&[], 1, 1).is_empty());
    }
}
