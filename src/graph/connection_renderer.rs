/// Per-connection drawing, hit-testing and interaction state.
///
/// One `ConnectionRenderer` lives for each connection on the canvas. It keeps
/// the parsed geometry of the last routed path, the label anchor, the
/// hover/selection state machine, and the label-edit request latch.
use crate::core::config;
use crate::core::model::LabelEditRequest;
use crate::core::types::*;
use crate::graph::path_measure::{
    distance_to_lines, flatten, parse_path, PathMeasurer, PathSegment,
};
use crate::platform::renderer::{Renderer, Stroke};

/// Visual interaction state. `Selected` wins over both hover states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    HoveredPath,
    HoveredAction,
    Selected,
}

/// Affordances shown on a hovered or selected connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeAction {
    AddNode,
    Delete,
}

/// What a pointer hit on this connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionHit {
    Path,
    Action(EdgeAction),
}

pub struct ConnectionRenderer {
    connection_id: ConnectionId,

    // Geometry of the last routed path
    path: Option<ConnectionPath>,
    segments: Vec<PathSegment>,
    lines: Vec<(Vec2, Vec2)>,
    arrow_dir: Vec2,
    label_anchor: Vec2,
    remeasure_at_ms: Option<f64>,

    // Interaction
    selected: bool,
    hovered_path: bool,
    hovered_action: bool,
    leave_deadline_ms: Option<f64>,

    // Label editing
    label_edit_pending: bool,
    last_label_edit_ms: Option<f64>,
}

impl ConnectionRenderer {
    pub fn new(connection_id: ConnectionId) -> Self {
        Self {
            connection_id,
            path: None,
            segments: Vec::new(),
            lines: Vec::new(),
            arrow_dir: Vec2::new(1.0, 0.0),
            label_anchor: Vec2::default(),
            remeasure_at_ms: None,
            selected: false,
            hovered_path: false,
            hovered_action: false,
            leave_deadline_ms: None,
            label_edit_pending: false,
            last_label_edit_ms: None,
        }
    }

    pub fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    pub fn path(&self) -> Option<&ConnectionPath> {
        self.path.as_ref()
    }

    /// Where the label and action buttons are centred, in world space.
    pub fn label_anchor(&self) -> Vec2 {
        self.label_anchor
    }

    /// Feed the latest routed path. Geometry and the label anchor are only
    /// recomputed when the path actually changed. Returns whether it did.
    pub fn set_path(&mut self, path: ConnectionPath, measurer: &dyn PathMeasurer, now_ms: f64) -> bool {
        if self.path.as_ref() == Some(&path) {
            return false;
        }

        self.segments = match parse_path(&path.path) {
            Ok(segments) => segments,
            Err(e) => {
                log::warn!("connection {}: unusable path: {}", self.connection_id, e);
                Vec::new()
            }
        };
        self.lines = flatten(&self.segments);
        self.arrow_dir = terminal_direction(&self.lines, &path);
        self.label_anchor = measure_midpoint(&path, measurer);
        self.remeasure_at_ms = Some(now_ms + config::LABEL_REMEASURE_DELAY_MS);
        self.path = Some(path);
        true
    }

    /// Fire expired timers: the hover-leave debounce and the delayed label
    /// re-measure.
    pub fn update(&mut self, now_ms: f64, measurer: &dyn PathMeasurer) {
        if let Some(deadline) = self.leave_deadline_ms {
            if now_ms >= deadline {
                self.leave_deadline_ms = None;
                if !self.hovered_action {
                    self.hovered_path = false;
                }
            }
        }

        if let Some(at) = self.remeasure_at_ms {
            if now_ms >= at {
                self.remeasure_at_ms = None;
                if let Some(path) = &self.path {
                    self.label_anchor = measure_midpoint(path, measurer);
                }
            }
        }
    }

    // ===== Hover / selection state machine =====

    pub fn pointer_enter_path(&mut self) {
        self.hovered_path = true;
        self.leave_deadline_ms = None;
    }

    pub fn pointer_leave_path(&mut self, now_ms: f64) {
        if self.hovered_path {
            self.leave_deadline_ms = Some(now_ms + config::HOVER_LEAVE_DEBOUNCE_MS);
        }
    }

    pub fn pointer_enter_action(&mut self) {
        self.hovered_action = true;
        self.leave_deadline_ms = None;
    }

    pub fn pointer_leave_action(&mut self, now_ms: f64) {
        self.hovered_action = false;
        if self.hovered_path {
            self.leave_deadline_ms = Some(now_ms + config::HOVER_LEAVE_DEBOUNCE_MS);
        }
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_hovered_path(&self) -> bool {
        self.hovered_path
    }

    pub fn is_hovered_action(&self) -> bool {
        self.hovered_action
    }

    pub fn interaction_state(&self) -> InteractionState {
        if self.selected {
            InteractionState::Selected
        } else if self.hovered_action {
            InteractionState::HoveredAction
        } else if self.hovered_path {
            InteractionState::HoveredPath
        } else {
            InteractionState::Idle
        }
    }

    pub fn actions_visible(&self) -> bool {
        self.selected || self.hovered_path || self.hovered_action
    }

    pub fn action_positions(&self) -> [(EdgeAction, Vec2); 2] {
        let base = self.label_anchor + Vec2::new(0.0, config::ACTION_BUTTON_OFFSET_Y);
        let dx = Vec2::new(config::ACTION_BUTTON_SPACING, 0.0);
        [
            (EdgeAction::AddNode, base - dx),
            (EdgeAction::Delete, base + dx),
        ]
    }

    // ===== Hit testing =====

    /// Test a world-space point against the action buttons (only while they
    /// are mounted) and the invisible hit-stroke.
    pub fn hit_test(&self, point: Vec2) -> Option<ConnectionHit> {
        if self.actions_visible() {
            for (action, center) in self.action_positions() {
                if point.distance(center) <= config::ACTION_BUTTON_RADIUS {
                    return Some(ConnectionHit::Action(action));
                }
            }
        }

        if self.lines.is_empty() {
            return None;
        }
        if distance_to_lines(point, &self.lines) <= config::HIT_STROKE_WIDTH / 2.0 {
            Some(ConnectionHit::Path)
        } else {
            None
        }
    }

    // ===== Label editing =====

    /// Ask for the label editor. Returns `None` while a request is still
    /// pending or one was issued within the debounce window.
    pub fn request_label_edit(&mut self, screen_position: Vec2, now_ms: f64) -> Option<LabelEditRequest> {
        if self.label_edit_pending {
            return None;
        }
        if let Some(last) = self.last_label_edit_ms {
            if now_ms - last < config::LABEL_EDIT_DEBOUNCE_MS {
                return None;
            }
        }
        self.label_edit_pending = true;
        self.last_label_edit_ms = Some(now_ms);
        Some(LabelEditRequest {
            connection_id: self.connection_id.clone(),
            screen_position,
        })
    }

    /// The label editor committed or cancelled.
    pub fn finish_label_edit(&mut self) {
        self.label_edit_pending = false;
    }

    pub fn is_label_edit_pending(&self) -> bool {
        self.label_edit_pending
    }

    // ===== Drawing =====

    /// Stroke for the visible path:
    /// selected > hovered > explicit style colour > default.
    pub fn resolve_stroke(&self, style: Option<&ConnectionStyle>, time_sec: f64) -> Stroke {
        let highlighted = self.hovered_path || self.hovered_action;
        let color = if self.selected {
            Color::from_hex(config::EDGE_SELECTED, 1.0)
        } else if highlighted {
            Color::from_hex(config::EDGE_HOVER, 1.0)
        } else if let Some(color) = style.and_then(|s| s.color) {
            color
        } else {
            Color::from_hex(config::EDGE_DEFAULT, 1.0)
        };

        let base_width = style.and_then(|s| s.width).unwrap_or(config::EDGE_WIDTH);
        let width = if self.selected || highlighted {
            base_width + 1.0
        } else {
            base_width
        };

        let dash = style.filter(|s| s.dashed || s.animated).map(|s| {
            let period = config::DASH_ON + config::DASH_OFF;
            let offset = if s.animated {
                -((time_sec * config::DASH_SPEED) % period)
            } else {
                0.0
            };
            (config::DASH_ON, config::DASH_OFF, offset)
        });

        Stroke { color, width, dash }
    }

    /// Draw in world space (the caller has pushed the camera transform).
    pub fn render(&self, renderer: &dyn Renderer, connection: &Connection, time_sec: f64) {
        let Some(path) = &self.path else {
            return;
        };
        if self.segments.is_empty() {
            return;
        }

        let stroke = self.resolve_stroke(connection.style.as_ref(), time_sec);
        renderer.stroke_path(&self.segments, &stroke);

        // Arrowhead at the destination
        renderer.fill_polygon(&self.arrow_points(path.to), stroke.color);

        // Endpoint dots
        renderer.fill_circle(path.from.x, path.from.y, config::ENDPOINT_RADIUS, stroke.color);
        renderer.fill_circle(path.to.x, path.to.y, config::ENDPOINT_RADIUS, stroke.color);

        if let Some(label) = connection.label.as_deref().filter(|l| !l.is_empty()) {
            self.render_label(renderer, label);
        }

        if self.actions_visible() {
            self.render_actions(renderer);
        }
    }

    fn arrow_points(&self, tip: Vec2) -> Vec<Vec2> {
        let dir = self.arrow_dir;
        let perp = Vec2::new(-dir.y, dir.x);
        let base = tip - dir * config::ARROW_LENGTH;
        vec![
            tip,
            base + perp * config::ARROW_HALF_WIDTH,
            base - perp * config::ARROW_HALF_WIDTH,
        ]
    }

    fn render_label(&self, renderer: &dyn Renderer, label: &str) {
        let text_w = label.chars().count() as f64 * config::LABEL_CHAR_WIDTH;
        let w = text_w + config::LABEL_PADDING * 2.0;
        let h = config::LABEL_FONT_SIZE + config::LABEL_PADDING * 2.0;
        let x = self.label_anchor.x - w / 2.0;
        let y = self.label_anchor.y - h / 2.0;

        renderer.fill_rounded_rect(x, y, w, h, 4.0, Color::from_hex(config::LABEL_BG, 0.95));
        renderer.draw_text(
            x + config::LABEL_PADDING,
            y + config::LABEL_PADDING - 1.0,
            label,
            config::LABEL_FONT_SIZE,
            Color::from_hex(config::TEXT_PRIMARY, 1.0),
        );
    }

    fn render_actions(&self, renderer: &dyn Renderer) {
        let r = config::ACTION_BUTTON_RADIUS;
        for (action, c) in self.action_positions() {
            let (hex, glyph) = match action {
                EdgeAction::AddNode => (config::ACTION_ADD, "+"),
                EdgeAction::Delete => (config::ACTION_DELETE, "x"),
            };
            renderer.fill_circle(c.x, c.y, r, Color::from_hex(hex, 1.0));
            renderer.draw_text(
                c.x - 3.5,
                c.y - 7.0,
                glyph,
                12.0,
                Color::from_hex(config::TEXT_PRIMARY, 1.0),
            );
        }
    }
}

/// Label position: halfway along the path, or the linear midpoint of the
/// endpoints when the path cannot be measured.
pub fn measure_midpoint(path: &ConnectionPath, measurer: &dyn PathMeasurer) -> Vec2 {
    let linear = (path.from + path.to) * 0.5;
    let length = measurer.length(&path.path);
    if length > 0.0 && length.is_finite() {
        measurer
            .point_at(&path.path, length / 2.0)
            .filter(Vec2::is_finite)
            .unwrap_or(linear)
    } else {
        linear
    }
}

/// Direction of the last non-degenerate piece of the path.
fn terminal_direction(lines: &[(Vec2, Vec2)], path: &ConnectionPath) -> Vec2 {
    lines
        .iter()
        .rev()
        .map(|&(a, b)| b - a)
        .find(|d| d.length() > 1e-9)
        .or_else(|| Some(path.to - path.from).filter(|d| d.length() > 1e-9))
        .map(|d| d.normalized())
        .unwrap_or(Vec2::new(1.0, 0.0))
}
