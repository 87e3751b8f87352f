/// Eased progress tracking for viewport transitions.

#[derive(Debug, Clone)]
pub struct Animation {
    elapsed: f64,
    duration: f64,
    active: bool,
}

impl Animation {
    pub fn new() -> Self {
        Self {
            elapsed: 0.0,
            duration: 0.0,
            active: false,
        }
    }

    pub fn start(&mut self, duration_ms: f64) {
        self.elapsed = 0.0;
        self.duration = duration_ms.max(0.0);
        self.active = self.duration > 0.0;
    }

    pub fn update(&mut self, dt_ms: f64) {
        if self.active {
            self.elapsed += dt_ms.max(0.0);
            if self.elapsed >= self.duration {
                self.elapsed = self.duration;
                self.active = false;
            }
        }
    }

    /// Returns eased progress (0.0..=1.0) with ease-out cubic.
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        ease_out_cubic(t)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new()
    }
}

/// Ease-out cubic: 1 - (1 - t)^3
pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Linear interpolation between two values.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
