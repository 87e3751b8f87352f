/// Screen/world coordinate math for the canvas viewport.
use crate::core::config;
use crate::core::types::Vec2;

/// Pan offset and zoom scale mapping world coordinates to canvas-local screen
/// coordinates: `local = world * zoom + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Viewport {
    pub fn new(x: f64, y: f64, zoom: f64) -> Self {
        Self {
            x,
            y,
            zoom: clamp_zoom(zoom),
        }
    }

    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// `origin` is the canvas element's top-left corner in screen space.
    pub fn screen_to_world(&self, screen: Vec2, origin: Vec2) -> Vec2 {
        Vec2 {
            x: (screen.x - origin.x - self.x) / self.zoom,
            y: (screen.y - origin.y - self.y) / self.zoom,
        }
    }

    pub fn world_to_screen(&self, world: Vec2, origin: Vec2) -> Vec2 {
        Vec2 {
            x: world.x * self.zoom + self.x + origin.x,
            y: world.y * self.zoom + self.y + origin.y,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, config::ZOOM_DEFAULT)
    }
}

pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return config::ZOOM_DEFAULT;
    }
    zoom.clamp(config::ZOOM_MIN, config::ZOOM_MAX)
}
