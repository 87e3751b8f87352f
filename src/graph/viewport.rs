/// Viewport navigation: animated zoom, eased pan transitions and inertial momentum.
///
/// The controller owns the single animation slot for the canvas. The host
/// frame loop drives it through `tick(now_ms)`; starting any new animation
/// replaces whatever occupied the slot, since all of them write `x`/`y`.
use crate::core::config;
use crate::core::types::{Rect, Vec2};
use crate::graph::animation::{lerp, Animation};
use crate::graph::transform::{clamp_zoom, Viewport};

/// What the in-flight animation is doing, for callers that need to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Zoom,
    Pan,
    Momentum,
}

#[derive(Debug, Clone, Copy)]
enum Motion {
    /// Zoom while holding a canvas-local anchor fixed.
    ZoomAt {
        anchor_local: Vec2,
        anchor_world: Vec2,
        from_zoom: f64,
        to_zoom: f64,
    },
    /// Interpolate offset and zoom together.
    Glide { from: Viewport, to: Viewport },
}

#[derive(Debug, Clone)]
struct Transition {
    anim: Animation,
    last_frame_ms: f64,
    motion: Motion,
}

#[derive(Debug, Clone)]
struct MomentumLoop {
    velocity: Vec2,
    started_ms: f64,
    last_frame_ms: f64,
}

#[derive(Debug, Clone)]
enum ActiveAnimation {
    Transition(Transition),
    Momentum(MomentumLoop),
}

impl ActiveAnimation {
    fn kind(&self) -> AnimationKind {
        match self {
            ActiveAnimation::Transition(t) => match t.motion {
                Motion::ZoomAt { .. } => AnimationKind::Zoom,
                Motion::Glide { from, to } if from.zoom != to.zoom => AnimationKind::Zoom,
                Motion::Glide { .. } => AnimationKind::Pan,
            },
            ActiveAnimation::Momentum(_) => AnimationKind::Momentum,
        }
    }
}

pub struct ViewportController {
    viewport: Viewport,

    // Canvas element rect in screen space
    origin: Vec2,
    size: Vec2,

    animation: Option<ActiveAnimation>,

    // Drag velocity tracking
    pending_momentum: Vec2,
    last_pan_sample_ms: Option<f64>,
    sample: PanSample,
}

/// Movement since the previous distinct pan timestamp. Moves delivered in
/// one batch share a timestamp and fold into the same sample.
#[derive(Debug, Clone, Copy, Default)]
struct PanSample {
    delta: Vec2,
    dt_ms: f64,
}

impl ViewportController {
    pub fn new() -> Self {
        Self {
            viewport: Viewport::default(),
            origin: Vec2::default(),
            size: Vec2::default(),
            animation: None,
            pending_momentum: Vec2::default(),
            last_pan_sample_ms: None,
            sample: PanSample::default(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replace the viewport without animating. Cancels any animation.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.cancel_animation("set_viewport");
        self.viewport = Viewport::new(viewport.x, viewport.y, viewport.zoom);
    }

    /// Screen-space rect of the canvas element.
    pub fn set_container(&mut self, origin: Vec2, size: Vec2) {
        self.origin = origin;
        self.size = size;
    }

    pub fn container(&self) -> Rect {
        Rect::new(self.origin.x, self.origin.y, self.size.x, self.size.y)
    }

    /// Zoom as a rounded percentage for display.
    pub fn zoom_level(&self) -> u32 {
        (self.viewport.zoom * 100.0).round() as u32
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.viewport.screen_to_world(screen, self.origin)
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.viewport.world_to_screen(world, self.origin)
    }

    pub fn active_animation(&self) -> Option<AnimationKind> {
        self.animation.as_ref().map(ActiveAnimation::kind)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn is_momentum_active(&self) -> bool {
        matches!(self.animation, Some(ActiveAnimation::Momentum(_)))
    }

    /// Current momentum velocity, if the decay loop is running.
    pub fn momentum(&self) -> Option<Vec2> {
        match &self.animation {
            Some(ActiveAnimation::Momentum(m)) => Some(m.velocity),
            _ => None,
        }
    }

    // ===== Zoom =====

    /// Step the zoom around a screen-space anchor. A positive `delta_sign`
    /// zooms out, anything else zooms in.
    pub fn zoom_at(&mut self, delta_sign: f64, anchor: Vec2, animated: bool, now_ms: f64) {
        let duration = if animated {
            config::ANIM_WHEEL_ZOOM_MS
        } else {
            0.0
        };
        self.zoom_at_over(delta_sign, anchor, duration, now_ms);
    }

    pub fn zoom_in(&mut self, now_ms: f64) {
        let center = self.screen_center();
        self.zoom_at_over(-1.0, center, config::ANIM_PROGRAMMATIC_MS, now_ms);
    }

    pub fn zoom_out(&mut self, now_ms: f64) {
        let center = self.screen_center();
        self.zoom_at_over(1.0, center, config::ANIM_PROGRAMMATIC_MS, now_ms);
    }

    /// Animate back to the default viewport.
    pub fn reset_zoom(&mut self, now_ms: f64) {
        let motion = Motion::Glide {
            from: self.viewport,
            to: Viewport::default(),
        };
        self.start_transition(motion, config::ANIM_PROGRAMMATIC_MS, now_ms);
    }

    /// Fit a world-space rect into the container, centred, with padding.
    pub fn zoom_to_area(&mut self, area: Rect, now_ms: f64) {
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            log::warn!("zoom_to_area ignored: container has no size");
            return;
        }
        let pad = config::ZOOM_TO_AREA_PADDING * 2.0;
        let zoom = (self.size.x / (area.width + pad))
            .min(self.size.y / (area.height + pad))
            .min(config::ZOOM_TO_AREA_MAX);
        let zoom = clamp_zoom(zoom);
        let center = area.center();
        let target = Viewport {
            x: self.size.x / 2.0 - center.x * zoom,
            y: self.size.y / 2.0 - center.y * zoom,
            zoom,
        };
        let motion = Motion::Glide {
            from: self.viewport,
            to: target,
        };
        self.start_transition(motion, config::ANIM_PROGRAMMATIC_MS, now_ms);
    }

    /// Centre a world point in the container, keeping the zoom.
    pub fn pan_to_point(&mut self, world: Vec2, now_ms: f64) {
        let zoom = self.viewport.zoom;
        let target = Viewport {
            x: self.size.x / 2.0 - world.x * zoom,
            y: self.size.y / 2.0 - world.y * zoom,
            zoom,
        };
        let motion = Motion::Glide {
            from: self.viewport,
            to: target,
        };
        self.start_transition(motion, config::ANIM_PROGRAMMATIC_MS, now_ms);
    }

    // ===== Pan =====

    /// Start a drag gesture: stops any animation and seeds velocity sampling.
    pub fn begin_drag(&mut self, now_ms: f64) {
        self.cancel_animation("drag");
        self.pending_momentum = Vec2::default();
        self.last_pan_sample_ms = Some(now_ms);
        self.sample = PanSample::default();
    }

    pub fn pan(&mut self, dx: f64, dy: f64, track_momentum: bool, now_ms: f64) {
        self.cancel_animation("pan");
        self.viewport.x += dx;
        self.viewport.y += dy;

        if !track_momentum {
            return;
        }

        let delta = Vec2::new(dx, dy);
        match self.last_pan_sample_ms {
            Some(last) => {
                let dt = now_ms - last;
                if dt > 0.0 && dt <= config::MOMENTUM_SAMPLE_WINDOW_MS {
                    self.sample = PanSample { delta, dt_ms: dt };
                } else if dt <= 0.0 && self.sample.dt_ms > 0.0 {
                    self.sample.delta += delta;
                } else {
                    self.sample = PanSample::default();
                }
            }
            None => self.sample = PanSample::default(),
        }
        self.pending_momentum = if self.sample.dt_ms > 0.0 {
            let PanSample { delta, dt_ms } = self.sample;
            Vec2::new(velocity(delta.x, dt_ms), velocity(delta.y, dt_ms))
        } else {
            Vec2::default()
        };
        self.last_pan_sample_ms = Some(now_ms);
    }

    /// Hand the tracked drag velocity to the decay loop. Returns whether a
    /// loop was started.
    pub fn release_momentum(&mut self, now_ms: f64) -> bool {
        let last_sample = self.last_pan_sample_ms.take();
        self.sample = PanSample::default();
        let velocity = std::mem::take(&mut self.pending_momentum);

        let stale = match last_sample {
            Some(t) => now_ms - t > config::MOMENTUM_SAMPLE_WINDOW_MS,
            None => true,
        };
        if stale || below_threshold(velocity) {
            return false;
        }

        self.cancel_animation("momentum");
        log::debug!("momentum started at ({:.2}, {:.2})", velocity.x, velocity.y);
        self.animation = Some(ActiveAnimation::Momentum(MomentumLoop {
            velocity,
            started_ms: now_ms,
            last_frame_ms: now_ms,
        }));
        true
    }

    // ===== Frame loop =====

    /// Advance the in-flight animation to `now_ms`. Returns whether the
    /// viewport was touched this frame.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(mut active) = self.animation.take() else {
            return false;
        };

        let keep = match &mut active {
            ActiveAnimation::Transition(tr) => {
                let dt = now_ms - tr.last_frame_ms;
                tr.last_frame_ms = now_ms;
                tr.anim.update(dt);
                self.apply_motion(tr.motion, tr.anim.progress());
                tr.anim.is_active()
            }
            ActiveAnimation::Momentum(m) => self.step_momentum(m, now_ms),
        };

        if keep {
            self.animation = Some(active);
        }
        true
    }

    pub fn cancel_animation(&mut self, reason: &str) {
        if let Some(prev) = self.animation.take() {
            log::debug!("{:?} animation superseded by {}", prev.kind(), reason);
        }
    }

    // ===== Private helpers =====

    fn screen_center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    fn zoom_at_over(&mut self, delta_sign: f64, anchor: Vec2, duration_ms: f64, now_ms: f64) {
        let step = if delta_sign > 0.0 {
            config::ZOOM_STEP_OUT
        } else {
            config::ZOOM_STEP_IN
        };
        let from_zoom = self.viewport.zoom;
        let motion = Motion::ZoomAt {
            anchor_local: anchor - self.origin,
            anchor_world: self.screen_to_world(anchor),
            from_zoom,
            to_zoom: clamp_zoom(from_zoom * step),
        };
        self.start_transition(motion, duration_ms, now_ms);
    }

    fn start_transition(&mut self, motion: Motion, duration_ms: f64, now_ms: f64) {
        self.cancel_animation("transition");
        let mut anim = Animation::new();
        anim.start(duration_ms);
        if !anim.is_active() {
            self.apply_motion(motion, 1.0);
            return;
        }
        self.animation = Some(ActiveAnimation::Transition(Transition {
            anim,
            last_frame_ms: now_ms,
            motion,
        }));
    }

    fn apply_motion(&mut self, motion: Motion, t: f64) {
        match motion {
            Motion::ZoomAt {
                anchor_local,
                anchor_world,
                from_zoom,
                to_zoom,
            } => {
                let zoom = if t >= 1.0 {
                    to_zoom
                } else {
                    clamp_zoom(lerp(from_zoom, to_zoom, t))
                };
                self.viewport = Viewport {
                    x: anchor_local.x - anchor_world.x * zoom,
                    y: anchor_local.y - anchor_world.y * zoom,
                    zoom,
                };
            }
            Motion::Glide { to, .. } if t >= 1.0 => self.viewport = to,
            Motion::Glide { from, to } => {
                self.viewport = Viewport {
                    x: lerp(from.x, to.x, t),
                    y: lerp(from.y, to.y, t),
                    zoom: clamp_zoom(lerp(from.zoom, to.zoom, t)),
                };
            }
        }
    }

    fn step_momentum(&mut self, m: &mut MomentumLoop, now_ms: f64) -> bool {
        if now_ms - m.started_ms >= config::MOMENTUM_MAX_DURATION_MS {
            log::debug!("momentum cut off after {:.0}ms", now_ms - m.started_ms);
            return false;
        }

        let dt = (now_ms - m.last_frame_ms).max(0.0);
        m.last_frame_ms = now_ms;
        let frames = dt / config::FRAME_MS;

        self.viewport.x += m.velocity.x * frames;
        self.viewport.y += m.velocity.y * frames;
        m.velocity = m.velocity * config::MOMENTUM_DECAY.powf(frames);

        !below_threshold(m.velocity)
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new()
    }
}

fn velocity(delta: f64, dt_ms: f64) -> f64 {
    (delta / dt_ms * config::MOMENTUM_VELOCITY_SCALE)
        .clamp(-config::MOMENTUM_MAX_SPEED, config::MOMENTUM_MAX_SPEED)
}

fn below_threshold(v: Vec2) -> bool {
    v.x.abs() < config::MOMENTUM_STOP_THRESHOLD && v.y.abs() < config::MOMENTUM_STOP_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn controller_at(x: f64, y: f64, zoom: f64) -> ViewportController {
        let mut vp = ViewportController::new();
        vp.set_container(Vec2::new(0.0, 0.0), Vec2::new(800.0, 600.0));
        vp.set_viewport(Viewport::new(x, y, zoom));
        vp
    }

    /// Run the frame loop at ~60Hz until idle, returning the last timestamp.
    fn settle(vp: &mut ViewportController, mut now: f64) -> f64 {
        while vp.is_animating() {
            now += config::FRAME_MS;
            vp.tick(now);
        }
        now
    }

    #[test]
    fn test_default_zoom() {
        let vp = ViewportController::new();
        assert_eq!(vp.viewport().zoom, 0.8);
        assert_eq!(vp.zoom_level(), 80);
    }

    #[test]
    fn test_wheel_zoom_in_keeps_anchor() {
        let mut vp = controller_at(0.0, 0.0, 1.0);
        let anchor = Vec2::new(100.0, 100.0);
        let world_before = vp.screen_to_world(anchor);

        vp.zoom_at(-1.0, anchor, true, 0.0);
        assert_eq!(vp.active_animation(), Some(AnimationKind::Zoom));
        settle(&mut vp, 0.0);

        assert!((vp.viewport().zoom - 1.05).abs() < EPS);
        let screen = vp.world_to_screen(world_before);
        assert!((screen.x - 100.0).abs() < 1e-9);
        assert!((screen.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_anchor_fixed_on_every_frame() {
        let mut vp = controller_at(-37.0, 12.5, 0.6);
        vp.set_container(Vec2::new(20.0, 40.0), Vec2::new(800.0, 600.0));
        let anchor = Vec2::new(333.0, 171.0);
        let world = vp.screen_to_world(anchor);

        vp.zoom_at(-1.0, anchor, true, 1000.0);
        let mut now = 1000.0;
        while vp.is_animating() {
            now += 7.0;
            vp.tick(now);
            let back = vp.world_to_screen(world);
            assert!((back.x - anchor.x).abs() < 1e-9, "frame at {now}");
            assert!((back.y - anchor.y).abs() < 1e-9, "frame at {now}");
            let again = vp.screen_to_world(anchor);
            assert!((again.x - world.x).abs() < 1e-9);
        }
    }

    #[test]
    fn test_non_animated_zoom_applies_immediately() {
        let mut vp = controller_at(0.0, 0.0, 1.0);
        vp.zoom_at(1.0, Vec2::new(50.0, 50.0), false, 0.0);
        assert!(!vp.is_animating());
        assert!((vp.viewport().zoom - 0.95).abs() < EPS);
    }

    #[test]
    fn test_zoom_stays_in_bounds() {
        let mut vp = controller_at(0.0, 0.0, 1.0);
        let mut now = 0.0;
        for _ in 0..300 {
            vp.zoom_at(-1.0, Vec2::new(400.0, 300.0), true, now);
            now += 5.0;
            vp.tick(now);
            assert!(vp.viewport().zoom <= config::ZOOM_MAX);
        }
        settle(&mut vp, now);
        assert!((vp.viewport().zoom - config::ZOOM_MAX).abs() < EPS);

        for _ in 0..400 {
            vp.zoom_at(1.0, Vec2::new(10.0, 590.0), false, now);
            assert!(vp.viewport().zoom >= config::ZOOM_MIN);
        }
        assert!((vp.viewport().zoom - config::ZOOM_MIN).abs() < EPS);
    }

    #[test]
    fn test_momentum_scenario() {
        let mut vp = controller_at(0.0, 0.0, 1.0);
        vp.begin_drag(0.0);
        vp.pan(50.0, 20.0, true, 16.0);
        assert_eq!(vp.viewport().offset(), Vec2::new(50.0, 20.0));

        assert!(vp.release_momentum(16.0));
        let initial = vp.momentum().unwrap();
        assert_eq!(initial.x, config::MOMENTUM_MAX_SPEED);
        assert!((initial.y - 18.75).abs() < EPS);

        let mut now = 16.0;
        let mut prev = initial;
        while vp.is_momentum_active() {
            now += config::FRAME_MS;
            vp.tick(now);
            if let Some(m) = vp.momentum() {
                assert!(m.x.abs() <= prev.x.abs() && m.y.abs() <= prev.y.abs());
                assert!((m.x - prev.x * config::MOMENTUM_DECAY).abs() < 1e-9);
                prev = m;
            }
        }
        assert!(now - 16.0 <= config::MOMENTUM_MAX_DURATION_MS + config::FRAME_MS);

        let rest = vp.viewport();
        assert!(rest.x > 50.0);
        vp.tick(now + 100.0);
        assert_eq!(vp.viewport(), rest);
    }

    #[test]
    fn test_momentum_stops_at_threshold_before_cutoff() {
        let mut vp = controller_at(0.0, 0.0, 1.0);
        vp.begin_drag(0.0);
        vp.pan(1.0, 0.0, true, 16.0);
        // 1 / 16 * 15 = 0.94 -> below threshold after a dozen frames
        assert!(vp.release_momentum(20.0));
        let end = settle(&mut vp, 20.0);
        assert!(end - 20.0 < 500.0);
    }

    #[test]
    fn test_same_timestamp_moves_fold_into_one_sample() {
        let mut vp = controller_at(0.0, 0.0, 1.0);
        vp.begin_drag(0.0);
        vp.pan(2.0, 0.0, true, 100.0);
        // Three moves delivered in one frame batch
        vp.pan(2.0, 1.0, true, 200.0);
        vp.pan(2.0, 1.0, true, 200.0);
        vp.pan(2.0, 1.0, true, 200.0);
        assert_eq!(vp.viewport().offset(), Vec2::new(8.0, 3.0));

        assert!(vp.release_momentum(200.0));
        // 6 / 100 * 15 and 3 / 100 * 15
        let m = vp.momentum().unwrap();
        assert!((m.x - 0.9).abs() < EPS && (m.y - 0.45).abs() < EPS);
    }

    #[test]
    fn test_stale_drag_has_no_momentum() {
        let mut vp = controller_at(0.0, 0.0, 1.0);
        vp.begin_drag(0.0);
        vp.pan(40.0, 0.0, true, 16.0);
        assert!(!vp.release_momentum(300.0));
        assert!(!vp.is_animating());

        vp.begin_drag(0.0);
        vp.pan(40.0, 0.0, true, 250.0);
        assert!(!vp.release_momentum(250.0));
    }

    #[test]
    fn test_zoom_cancels_momentum() {
        let mut vp = controller_at(0.0, 0.0, 1.0);
        vp.begin_drag(0.0);
        vp.pan(30.0, 30.0, true, 10.0);
        assert!(vp.release_momentum(10.0));
        vp.tick(26.67);
        assert!(vp.is_momentum_active());

        vp.zoom_at(-1.0, Vec2::new(0.0, 0.0), true, 30.0);
        assert_eq!(vp.active_animation(), Some(AnimationKind::Zoom));
        assert!(vp.momentum().is_none());
    }

    #[test]
    fn test_drag_cancels_transition() {
        let mut vp = controller_at(0.0, 0.0, 1.0);
        vp.pan_to_point(Vec2::new(1000.0, 1000.0), 0.0);
        assert_eq!(vp.active_animation(), Some(AnimationKind::Pan));
        vp.begin_drag(5.0);
        assert!(!vp.is_animating());
    }

    #[test]
    fn test_zoom_to_area_centers_rect() {
        let mut vp = controller_at(0.0, 0.0, 1.0);
        let area = Rect::new(100.0, 100.0, 200.0, 100.0);
        vp.zoom_to_area(area, 0.0);
        settle(&mut vp, 0.0);

        // min(800 / 300, 600 / 200, 2) = 2
        assert!((vp.viewport().zoom - 2.0).abs() < EPS);
        let center = vp.world_to_screen(area.center());
        assert!((center.x - 400.0).abs() < 1e-6);
        assert!((center.y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_to_area_large_rect() {
        let mut vp = controller_at(0.0, 0.0, 1.0);
        vp.zoom_to_area(Rect::new(-2000.0, -1000.0, 3900.0, 1900.0), 0.0);
        settle(&mut vp, 0.0);
        assert!((vp.viewport().zoom - 0.2).abs() < EPS);
    }

    #[test]
    fn test_pan_to_point_keeps_zoom() {
        let mut vp = controller_at(10.0, 10.0, 1.5);
        vp.pan_to_point(Vec2::new(50.0, -20.0), 0.0);
        let end = settle(&mut vp, 0.0);
        assert!(end >= config::ANIM_PROGRAMMATIC_MS);
        assert_eq!(vp.viewport().zoom, 1.5);
        let p = vp.world_to_screen(Vec2::new(50.0, -20.0));
        assert!((p.x - 400.0).abs() < 1e-6 && (p.y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_reset_and_keyboard_zoom() {
        let mut vp = controller_at(300.0, -40.0, 2.5);
        vp.reset_zoom(0.0);
        let now = settle(&mut vp, 0.0);
        assert_eq!(vp.viewport(), Viewport::default());

        let center_world = vp.screen_to_world(Vec2::new(400.0, 300.0));
        vp.zoom_in(now);
        settle(&mut vp, now);
        assert!((vp.viewport().zoom - 0.84).abs() < EPS);
        let center = vp.world_to_screen(center_world);
        assert!((center.x - 400.0).abs() < 1e-9 && (center.y - 300.0).abs() < 1e-9);

        vp.zoom_out(now + 500.0);
        settle(&mut vp, now + 500.0);
        assert!((vp.viewport().zoom - 0.84 * 0.95).abs() < EPS);
    }
}
