/// Node box rendering and hit-testing.
use crate::core::config;
use crate::core::types::*;
use crate::platform::renderer::Renderer;

pub struct GraphNodeRenderer;

impl GraphNodeRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw a node in world coordinates.
    pub fn render(&self, renderer: &dyn Renderer, node: &Node, hovered: bool) {
        let x = node.position.x;
        let y = node.position.y;
        let w = node.width;
        let h = node.height;
        let r = config::NODE_CORNER_RADIUS.min(w / 2.0).min(h / 2.0);

        renderer.fill_rounded_rect(x, y, w, h, r, Color::from_hex(config::NODE_BG, 1.0));

        let (border, line_width) = if hovered {
            (Color::from_hex(config::NODE_BORDER_HOVER, 1.0), 2.0)
        } else {
            (Color::from_hex(config::NODE_BORDER, 1.0), 1.0)
        };
        renderer.stroke_rounded_rect(x, y, w, h, r, border, line_width);

        // Title, clipped to what fits
        let max_chars = ((w - 20.0) / config::LABEL_CHAR_WIDTH).max(4.0) as usize;
        let title = truncate_str(&node.title, max_chars);
        renderer.draw_text(
            x + 10.0,
            y + h / 2.0 - 7.0,
            &title,
            12.0,
            Color::from_hex(config::TEXT_PRIMARY, 1.0),
        );
    }

    /// Hit test in world coordinates.
    pub fn hit_test(&self, node: &Node, point: Vec2) -> bool {
        node.bounds().contains(point)
    }
}

impl Default for GraphNodeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
