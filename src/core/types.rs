/// Common type definitions shared by the canvas, router and renderers.
use std::fmt;

/// Identifier of a node in the external graph model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub String);

/// Identifier of a connection in the external graph model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub String);

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&str> for ConnectionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A workflow node. Position and size are in world coordinates.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub position: Vec2,
    pub width: f64,
    pub height: f64,
    pub title: String,
}

impl Node {
    pub fn new(id: &str, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: NodeId::from(id),
            position: Vec2::new(x, y),
            width,
            height,
            title: id.to_string(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }
}

/// Path shape of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionType {
    #[default]
    Bezier,
    Step,
}

/// Optional per-connection stroke overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionStyle {
    pub color: Option<Color>,
    pub width: Option<f64>,
    pub dashed: bool,
    pub animated: bool,
}

/// A directed edge between two nodes
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: NodeId,
    pub to: NodeId,
    pub connection_type: ConnectionType,
    pub style: Option<ConnectionStyle>,
    pub label: Option<String>,
}

impl Connection {
    pub fn new(id: &str, from: &str, to: &str, connection_type: ConnectionType) -> Self {
        Self {
            id: ConnectionId::from(id),
            from: NodeId::from(from),
            to: NodeId::from(to),
            connection_type,
            style: None,
            label: None,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_style(mut self, style: ConnectionStyle) -> Self {
        self.style = Some(style);
        self
    }
}

/// Routed geometry of a connection. Derived, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionPath {
    pub path: String,
    pub from: Vec2,
    pub to: Vec2,
}

/// 2D coordinate vector
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: Vec2) -> f64 {
        (*self - other).length()
    }

    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len < 1e-10 {
            Self::default()
        } else {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
        }
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = (self.x + self.width).max(other.x + other.width);
        let max_y = (self.y + self.height).max(other.y + other.height);
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }
}

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub fn from_hex(hex: u32, alpha: f64) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f64 / 255.0,
            g: ((hex >> 8) & 0xFF) as f64 / 255.0,
            b: (hex & 0xFF) as f64 / 255.0,
            a: alpha,
        }
    }
}

/// Mouse buttons as reported by the windowing layer.
pub const BUTTON_LEFT: u8 = 1;
pub const BUTTON_MIDDLE: u8 = 2;

/// Mouse event data
///
/// `wheel_delta_y` follows the DOM convention: negative when scrolling up.
#[derive(Debug, Clone, Default)]
pub struct MouseEvent {
    pub x: f64,
    pub y: f64,
    pub button: u8,
    pub wheel_delta_y: f64,
    pub pressed: bool,
    pub released: bool,
    pub dragging: bool,
    pub click_count: u8,
}

impl MouseEvent {
    pub fn moved(x: f64, y: f64, dragging: bool, button: u8) -> Self {
        Self {
            x,
            y,
            button,
            dragging,
            ..Default::default()
        }
    }

    pub fn pressed(x: f64, y: f64, button: u8) -> Self {
        Self {
            x,
            y,
            button,
            pressed: true,
            click_count: 1,
            ..Default::default()
        }
    }

    pub fn released(x: f64, y: f64, button: u8) -> Self {
        Self {
            x,
            y,
            button,
            released: true,
            ..Default::default()
        }
    }

    pub fn wheel(x: f64, y: f64, delta_y: f64) -> Self {
        Self {
            x,
            y,
            wheel_delta_y: delta_y,
            ..Default::default()
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Logical keys the canvas reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Key {
    Space,
    Digit0,
    Digit1,
    Equal,
    Plus,
    Minus,
    Delete,
    Backspace,
    Escape,
    /// Any other printable key
    Char(char),
    #[default]
    Other,
}

/// Key event data
#[derive(Debug, Clone, Default)]
pub struct KeyEvent {
    pub key: Key,
    pub pressed: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Cmd on macOS-style keyboards; treated like `ctrl` for shortcuts.
    pub meta: bool,
}

impl KeyEvent {
    pub fn down(key: Key) -> Self {
        Self {
            key,
            pressed: true,
            ..Default::default()
        }
    }

    pub fn up(key: Key) -> Self {
        Self {
            key,
            pressed: false,
            ..Default::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn has_command_modifier(&self) -> bool {
        self.ctrl || self.meta
    }
}
