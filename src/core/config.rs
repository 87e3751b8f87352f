/// Visual and behavioral constants.

// --- Visual colors (hex) ---
pub const BG_COLOR: u32 = 0x0D1117;
pub const NODE_BG: u32 = 0x161B22;
pub const NODE_BORDER: u32 = 0x30363D;
pub const NODE_BORDER_HOVER: u32 = 0x4A90D9;
pub const EDGE_DEFAULT: u32 = 0x8E8EA0;
pub const EDGE_HOVER: u32 = 0x4A90D9;
pub const EDGE_SELECTED: u32 = 0xF0A020;
pub const ACTION_ADD: u32 = 0x2ECC71;
pub const ACTION_DELETE: u32 = 0xE94560;
pub const LABEL_BG: u32 = 0x21262D;
pub const TEXT_PRIMARY: u32 = 0xE6EDF3;
pub const TEXT_SECONDARY: u32 = 0x8B949E;

// --- Zoom ---
pub const ZOOM_MIN: f64 = 0.1;
pub const ZOOM_MAX: f64 = 3.0;
pub const ZOOM_DEFAULT: f64 = 0.8;
/// Multiplier applied when zooming out (positive wheel delta).
pub const ZOOM_STEP_OUT: f64 = 0.95;
/// Multiplier applied when zooming in (negative wheel delta).
pub const ZOOM_STEP_IN: f64 = 1.05;
/// Upper bound for `zoom_to_area` so small selections do not blow up.
pub const ZOOM_TO_AREA_MAX: f64 = 2.0;
pub const ZOOM_TO_AREA_PADDING: f64 = 50.0;

// --- Animation ---
pub const ANIM_WHEEL_ZOOM_MS: f64 = 100.0;
pub const ANIM_PROGRAMMATIC_MS: f64 = 300.0;

// --- Momentum ---
/// Pan samples further apart than this carry no velocity.
pub const MOMENTUM_SAMPLE_WINDOW_MS: f64 = 100.0;
pub const MOMENTUM_VELOCITY_SCALE: f64 = 15.0;
pub const MOMENTUM_MAX_SPEED: f64 = 30.0;
pub const MOMENTUM_DECAY: f64 = 0.95;
pub const MOMENTUM_STOP_THRESHOLD: f64 = 0.5;
pub const MOMENTUM_MAX_DURATION_MS: f64 = 1000.0;
/// Nominal frame length the decay constant is tuned for (60 Hz).
pub const FRAME_MS: f64 = 16.67;

// --- Connection routing ---
pub const BEZIER_TENSION: f64 = 0.5;
pub const BEZIER_MIN_OFFSET: f64 = 20.0;
pub const STEP_CORNER_RADIUS: f64 = 8.0;
pub const DEGENERATE_EPSILON: f64 = 1e-6;

// --- Connection rendering ---
pub const EDGE_WIDTH: f64 = 2.0;
pub const HIT_STROKE_WIDTH: f64 = 12.0;
pub const ARROW_LENGTH: f64 = 10.0;
pub const ARROW_HALF_WIDTH: f64 = 5.0;
pub const ENDPOINT_RADIUS: f64 = 3.5;
pub const DASH_ON: f64 = 6.0;
pub const DASH_OFF: f64 = 4.0;
/// Dash offset advance per second for animated connections.
pub const DASH_SPEED: f64 = 30.0;
pub const LABEL_FONT_SIZE: f64 = 11.0;
pub const LABEL_CHAR_WIDTH: f64 = 6.5;
pub const LABEL_PADDING: f64 = 4.0;
pub const ACTION_BUTTON_RADIUS: f64 = 10.0;
pub const ACTION_BUTTON_SPACING: f64 = 14.0;
/// Vertical offset of the action buttons below the label anchor.
pub const ACTION_BUTTON_OFFSET_Y: f64 = 18.0;
pub const PATH_FLATTEN_SEGMENTS: usize = 24;

// --- Interaction timing ---
pub const HOVER_LEAVE_DEBOUNCE_MS: f64 = 100.0;
pub const LABEL_REMEASURE_DELAY_MS: f64 = 50.0;
pub const LABEL_EDIT_DEBOUNCE_MS: f64 = 300.0;
pub const DOUBLE_CLICK_MS: u64 = 400;
pub const DOUBLE_CLICK_SLOP: f64 = 4.0;

// --- Node sizes ---
pub const NODE_DEFAULT_W: f64 = 180.0;
pub const NODE_DEFAULT_H: f64 = 70.0;
pub const NODE_CORNER_RADIUS: f64 = 8.0;

// --- Preferences ---
pub const PREF_NAVIGATION_HINT_SEEN: &str = "navigation_hint_seen";
