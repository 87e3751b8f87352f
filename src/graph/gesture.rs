/// Keyboard/pointer gesture state machine driving the viewport.
use crate::core::types::*;
use crate::graph::viewport::ViewportController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    SpacePanning,
    DragPanning,
    Momentum,
}

/// Whether the handler used an event. `Consumed` key events must not reach
/// the host's default shortcut handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    Consumed,
    Ignored,
}

pub struct InputGestureHandler {
    state: GestureState,
    space_held: bool,
    drag_button: u8,
    last_pointer: Vec2,
}

impl InputGestureHandler {
    pub fn new() -> Self {
        Self {
            state: GestureState::Idle,
            space_held: false,
            drag_button: 0,
            last_pointer: Vec2::default(),
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_space_held(&self) -> bool {
        self.space_held
    }

    pub fn handle_key(
        &mut self,
        e: &KeyEvent,
        viewport: &mut ViewportController,
        now_ms: f64,
    ) -> EventDisposition {
        if e.key == Key::Space {
            self.space_held = e.pressed;
            if e.pressed {
                if matches!(self.state, GestureState::Idle | GestureState::Momentum) {
                    self.transition(GestureState::SpacePanning);
                }
            } else if self.state == GestureState::SpacePanning {
                self.transition(GestureState::Idle);
            }
            return EventDisposition::Consumed;
        }

        if !e.pressed || !e.has_command_modifier() {
            return EventDisposition::Ignored;
        }

        match e.key {
            Key::Digit0 => viewport.reset_zoom(now_ms),
            Key::Equal | Key::Plus => viewport.zoom_in(now_ms),
            Key::Minus => viewport.zoom_out(now_ms),
            _ => return EventDisposition::Ignored,
        }
        EventDisposition::Consumed
    }

    pub fn handle_mouse(
        &mut self,
        e: &MouseEvent,
        viewport: &mut ViewportController,
        now_ms: f64,
    ) -> EventDisposition {
        let pos = e.position();

        // Wheel zoom is orthogonal to the pan states
        if e.wheel_delta_y != 0.0 {
            viewport.zoom_at(e.wheel_delta_y.signum(), pos, true, now_ms);
            return EventDisposition::Consumed;
        }

        if e.pressed {
            let starts_drag = e.button == BUTTON_MIDDLE || (e.button == BUTTON_LEFT && self.space_held);
            if !starts_drag {
                return EventDisposition::Ignored;
            }
            viewport.begin_drag(now_ms);
            self.drag_button = e.button;
            self.last_pointer = pos;
            self.transition(GestureState::DragPanning);
            return EventDisposition::Consumed;
        }

        if self.state != GestureState::DragPanning {
            return EventDisposition::Ignored;
        }

        if e.released {
            if e.button != self.drag_button {
                return EventDisposition::Consumed;
            }
            let next = if viewport.release_momentum(now_ms) {
                GestureState::Momentum
            } else if self.space_held {
                GestureState::SpacePanning
            } else {
                GestureState::Idle
            };
            self.transition(next);
            return EventDisposition::Consumed;
        }

        let delta = pos - self.last_pointer;
        self.last_pointer = pos;
        if delta.x != 0.0 || delta.y != 0.0 {
            viewport.pan(delta.x, delta.y, true, now_ms);
        }
        EventDisposition::Consumed
    }

    /// Per-frame bookkeeping; call after `ViewportController::tick`.
    pub fn update(&mut self, viewport: &ViewportController) {
        if self.state == GestureState::Momentum && !viewport.is_momentum_active() {
            self.transition(GestureState::Idle);
        }
    }

    fn transition(&mut self, next: GestureState) {
        if self.state != next {
            log::debug!("gesture {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}

impl Default for InputGestureHandler {
    fn default() -> Self {
        Self::new()
    }
}
