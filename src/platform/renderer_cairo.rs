/// Cairo-based renderer implementation.
use crate::core::types::{Color, Vec2};
use crate::graph::path_measure::PathSegment;
use crate::platform::renderer::{Renderer, Stroke};
use cairo::Context;
use std::f64::consts::PI;

pub struct RendererCairo {
    cr: Context,
}

impl RendererCairo {
    pub fn new(cr: Context) -> Self {
        Self { cr }
    }

    /// Update the Cairo context (e.g., after window resize).
    pub fn set_context(&mut self, cr: Context) {
        self.cr = cr;
    }

    fn set_color(&self, color: Color) {
        self.cr.set_source_rgba(color.r, color.g, color.b, color.a);
    }

    fn rounded_rect_path(&self, x: f64, y: f64, w: f64, h: f64, r: f64) {
        self.cr.new_path();
        self.cr.arc(x + w - r, y + r, r, -PI / 2.0, 0.0);
        self.cr.arc(x + w - r, y + h - r, r, 0.0, PI / 2.0);
        self.cr.arc(x + r, y + h - r, r, PI / 2.0, PI);
        self.cr.arc(x + r, y + r, r, PI, 3.0 * PI / 2.0);
        self.cr.close_path();
    }

    /// Trace segments into the current path. Cairo has no quadratic curve,
    /// so those are raised to cubics.
    fn trace(&self, segments: &[PathSegment]) {
        self.cr.new_path();
        let mut current = Vec2::default();
        let mut start = Vec2::default();

        for segment in segments {
            match *segment {
                PathSegment::MoveTo(p) => {
                    self.cr.move_to(p.x, p.y);
                    current = p;
                    start = p;
                }
                PathSegment::LineTo(p) => {
                    self.cr.line_to(p.x, p.y);
                    current = p;
                }
                PathSegment::QuadTo(c, p) => {
                    let c1 = current + (c - current) * (2.0 / 3.0);
                    let c2 = p + (c - p) * (2.0 / 3.0);
                    self.cr.curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y);
                    current = p;
                }
                PathSegment::CubicTo(c1, c2, p) => {
                    self.cr.curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y);
                    current = p;
                }
                PathSegment::Close => {
                    self.cr.close_path();
                    current = start;
                }
            }
        }
    }
}

impl Renderer for RendererCairo {
    fn begin_frame(&mut self, _width: i32, _height: i32) {
        self.cr.save().ok();
    }

    fn end_frame(&mut self) {
        self.cr.restore().ok();
    }

    fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        self.set_color(color);
        self.cr.rectangle(x, y, w, h);
        self.cr.fill().ok();
    }

    fn fill_rounded_rect(&self, x: f64, y: f64, w: f64, h: f64, radius: f64, color: Color) {
        self.set_color(color);
        self.rounded_rect_path(x, y, w, h, radius);
        self.cr.fill().ok();
    }

    fn stroke_rounded_rect(
        &self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        radius: f64,
        color: Color,
        line_width: f64,
    ) {
        self.set_color(color);
        self.cr.set_line_width(line_width);
        self.rounded_rect_path(x, y, w, h, radius);
        self.cr.stroke().ok();
    }

    fn draw_text(&self, x: f64, y: f64, text: &str, size: f64, color: Color) {
        self.set_color(color);
        self.cr
            .select_font_face("sans-serif", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
        self.cr.set_font_size(size);
        self.cr.move_to(x, y + size);
        self.cr.show_text(text).ok();
    }

    fn stroke_path(&self, segments: &[PathSegment], stroke: &Stroke) {
        self.set_color(stroke.color);
        self.cr.set_line_width(stroke.width);
        self.cr.set_line_cap(cairo::LineCap::Round);
        self.cr.set_line_join(cairo::LineJoin::Round);
        if let Some((on, off, offset)) = stroke.dash {
            self.cr.set_dash(&[on, off], offset);
        }
        self.trace(segments);
        self.cr.stroke().ok();
        if stroke.dash.is_some() {
            self.cr.set_dash(&[], 0.0);
        }
    }

    fn fill_polygon(&self, points: &[Vec2], color: Color) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.set_color(color);
        self.cr.new_path();
        self.cr.move_to(first.x, first.y);
        for p in rest {
            self.cr.line_to(p.x, p.y);
        }
        self.cr.close_path();
        self.cr.fill().ok();
    }

    fn fill_circle(&self, cx: f64, cy: f64, radius: f64, color: Color) {
        self.set_color(color);
        self.cr.new_path();
        self.cr.arc(cx, cy, radius, 0.0, 2.0 * PI);
        self.cr.fill().ok();
    }

    fn push_transform(&self, offset: Vec2, scale: f64) {
        self.cr.save().ok();
        self.cr.translate(offset.x, offset.y);
        self.cr.scale(scale, scale);
    }

    fn pop_transform(&self) {
        self.cr.restore().ok();
    }
}
