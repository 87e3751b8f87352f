/// Abstract rendering interface.
use crate::core::types::{Color, Vec2};
use crate::graph::path_measure::PathSegment;

/// Stroke parameters for `stroke_path`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    /// `(on, off, offset)` dash pattern
    pub dash: Option<(f64, f64, f64)>,
}

pub trait Renderer {
    fn begin_frame(&mut self, width: i32, height: i32);
    fn end_frame(&mut self);

    // Primitives
    fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64, color: Color);
    fn fill_rounded_rect(&self, x: f64, y: f64, w: f64, h: f64, radius: f64, color: Color);
    fn stroke_rounded_rect(
        &self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        radius: f64,
        color: Color,
        line_width: f64,
    );
    fn draw_text(&self, x: f64, y: f64, text: &str, size: f64, color: Color);

    // Paths
    fn stroke_path(&self, segments: &[PathSegment], stroke: &Stroke);
    fn fill_polygon(&self, points: &[Vec2], color: Color);

    // Circle
    fn fill_circle(&self, cx: f64, cy: f64, radius: f64, color: Color);

    // Transform (camera)
    fn push_transform(&self, offset: Vec2, scale: f64);
    fn pop_transform(&self);
}

#[cfg(test)]
pub mod recording {
    //! Renderer that records calls, for asserting what got drawn.
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCall {
        Rect(Color),
        RoundedRect { x: f64, y: f64, color: Color },
        Text { x: f64, y: f64, text: String },
        Path(Stroke),
        Polygon(Vec<Vec2>, Color),
        Circle { center: Vec2, radius: f64, color: Color },
        PushTransform(Vec2, f64),
        PopTransform,
    }

    #[derive(Debug, Default)]
    pub struct RecordingRenderer {
        pub calls: RefCell<Vec<DrawCall>>,
    }

    impl RecordingRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn take(&self) -> Vec<DrawCall> {
            std::mem::take(&mut *self.calls.borrow_mut())
        }

        fn push(&self, call: DrawCall) {
            self.calls.borrow_mut().push(call);
        }
    }

    impl Renderer for RecordingRenderer {
        fn begin_frame(&mut self, _width: i32, _height: i32) {
            self.calls.borrow_mut().clear();
        }

        fn end_frame(&mut self) {}

        fn fill_rect(&self, _x: f64, _y: f64, _w: f64, _h: f64, color: Color) {
            self.push(DrawCall::Rect(color));
        }

        fn fill_rounded_rect(&self, x: f64, y: f64, _w: f64, _h: f64, _r: f64, color: Color) {
            self.push(DrawCall::RoundedRect { x, y, color });
        }

        fn stroke_rounded_rect(
            &self,
            x: f64,
            y: f64,
            _w: f64,
            _h: f64,
            _radius: f64,
            color: Color,
            _line_width: f64,
        ) {
            self.push(DrawCall::RoundedRect { x, y, color });
        }

        fn draw_text(&self, x: f64, y: f64, text: &str, _size: f64, _color: Color) {
            self.push(DrawCall::Text {
                x,
                y,
                text: text.to_string(),
            });
        }

        fn stroke_path(&self, _segments: &[PathSegment], stroke: &Stroke) {
            self.push(DrawCall::Path(*stroke));
        }

        fn fill_polygon(&self, points: &[Vec2], color: Color) {
            self.push(DrawCall::Polygon(points.to_vec(), color));
        }

        fn fill_circle(&self, cx: f64, cy: f64, radius: f64, color: Color) {
            self.push(DrawCall::Circle {
                center: Vec2::new(cx, cy),
                radius,
                color,
            });
        }

        fn push_transform(&self, offset: Vec2, scale: f64) {
            self.push(DrawCall::PushTransform(offset, scale));
        }

        fn pop_transform(&self) {
            self.push(DrawCall::PopTransform);
        }
    }
}
