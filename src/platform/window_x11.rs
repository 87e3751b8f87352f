/// X11 window implementation with Cairo surface.
use crate::core::config;
use crate::core::error::WindowError;
use crate::core::types::{Key, KeyEvent, MouseEvent};
use std::ffi::CString;
use std::ptr;
use x11::{keysym, xlib};

/// Last button press, for synthesising click counts.
struct LastClick {
    button: u8,
    time: xlib::Time,
    x: i32,
    y: i32,
    count: u8,
}

pub struct WindowX11 {
    display: *mut xlib::Display,
    window: xlib::Window,
    width: i32,
    height: i32,
    wm_delete_window: xlib::Atom,
    should_close: bool,
    screen: i32,

    // Mouse state tracking
    button_pressed: [bool; 4],
    last_click: Option<LastClick>,

    // Pending events for external consumption
    pending_mouse_events: Vec<MouseEvent>,
    pending_key_events: Vec<KeyEvent>,
}

impl WindowX11 {
    pub fn new() -> Self {
        Self {
            display: ptr::null_mut(),
            window: 0,
            width: 0,
            height: 0,
            wm_delete_window: 0,
            should_close: false,
            screen: 0,
            button_pressed: [false; 4],
            last_click: None,
            pending_mouse_events: Vec::new(),
            pending_key_events: Vec::new(),
        }
    }

    pub fn create(&mut self, width: i32, height: i32, title: &str) -> Result<(), WindowError> {
        let title_c = CString::new(title).map_err(|_| WindowError::InvalidTitle)?;

        unsafe {
            self.display = xlib::XOpenDisplay(ptr::null());
            if self.display.is_null() {
                return Err(WindowError::NoDisplay);
            }

            self.screen = xlib::XDefaultScreen(self.display);
            let root = xlib::XRootWindow(self.display, self.screen);

            self.window = xlib::XCreateSimpleWindow(
                self.display,
                root,
                0,
                0,
                width as u32,
                height as u32,
                0,
                xlib::XBlackPixel(self.display, self.screen),
                xlib::XBlackPixel(self.display, self.screen),
            );

            self.width = width;
            self.height = height;

            xlib::XStoreName(self.display, self.window, title_c.as_ptr());

            xlib::XSelectInput(
                self.display,
                self.window,
                xlib::ExposureMask
                    | xlib::ButtonPressMask
                    | xlib::ButtonReleaseMask
                    | xlib::PointerMotionMask
                    | xlib::KeyPressMask
                    | xlib::KeyReleaseMask
                    | xlib::StructureNotifyMask,
            );

            // WM_DELETE_WINDOW protocol
            let wm_delete = c"WM_DELETE_WINDOW";
            self.wm_delete_window =
                xlib::XInternAtom(self.display, wm_delete.as_ptr(), xlib::False);
            xlib::XSetWMProtocols(
                self.display,
                self.window,
                &mut self.wm_delete_window as *mut _,
                1,
            );

            xlib::XMapWindow(self.display, self.window);
            xlib::XFlush(self.display);
        }

        log::info!("opened {}x{} window", width, height);
        Ok(())
    }

    /// Create a Cairo context for the current window using cairo-sys FFI.
    pub fn create_cairo_context(&self) -> Option<cairo::Context> {
        unsafe {
            let visual = xlib::XDefaultVisual(self.display, self.screen);

            let surface_ptr = cairo_sys::cairo_xlib_surface_create(
                self.display,
                self.window,
                visual,
                self.width,
                self.height,
            );

            if surface_ptr.is_null() {
                return None;
            }

            let cr_ptr = cairo_sys::cairo_create(surface_ptr);
            // Surface is now referenced by the context, release our ref
            cairo_sys::cairo_surface_destroy(surface_ptr);

            if cr_ptr.is_null() {
                return None;
            }

            Some(cairo::Context::from_raw_full(cr_ptr))
        }
    }

    /// Process pending X11 events. Returns false if window should close.
    pub fn poll_events(&mut self) -> bool {
        if self.should_close {
            return false;
        }

        self.pending_mouse_events.clear();
        self.pending_key_events.clear();

        unsafe {
            while xlib::XPending(self.display) > 0 {
                let mut event: xlib::XEvent = std::mem::zeroed();
                xlib::XNextEvent(self.display, &mut event);

                match event.get_type() {
                    xlib::ButtonPress => {
                        let btn = event.button;
                        let button = btn.button as u8;

                        // Buttons 4/5 are the wheel; up zooms in (negative delta)
                        if button == 4 || button == 5 {
                            let delta = if button == 4 { -1.0 } else { 1.0 };
                            self.pending_mouse_events
                                .push(MouseEvent::wheel(btn.x as f64, btn.y as f64, delta));
                            continue;
                        }

                        if (button as usize) < self.button_pressed.len() {
                            self.button_pressed[button as usize] = true;
                        }
                        let mut e = MouseEvent::pressed(btn.x as f64, btn.y as f64, button);
                        e.click_count = self.count_click(button, btn.time, btn.x, btn.y);
                        self.pending_mouse_events.push(e);
                    }
                    xlib::ButtonRelease => {
                        let btn = event.button;
                        let button = btn.button as u8;
                        if (button as usize) < self.button_pressed.len() {
                            self.button_pressed[button as usize] = false;
                            self.pending_mouse_events.push(MouseEvent::released(
                                btn.x as f64,
                                btn.y as f64,
                                button,
                            ));
                        }
                    }
                    xlib::MotionNotify => {
                        let motion = event.motion;
                        let active_button = self
                            .button_pressed
                            .iter()
                            .position(|&b| b)
                            .map(|i| i as u8)
                            .unwrap_or(0);

                        self.pending_mouse_events.push(MouseEvent::moved(
                            motion.x as f64,
                            motion.y as f64,
                            active_button != 0,
                            active_button,
                        ));
                    }
                    xlib::KeyPress | xlib::KeyRelease => {
                        let mut key = event.key;
                        let sym = xlib::XLookupKeysym(&mut key, 0);
                        self.pending_key_events.push(KeyEvent {
                            key: map_keysym(sym),
                            pressed: event.get_type() == xlib::KeyPress,
                            ctrl: key.state & xlib::ControlMask != 0,
                            shift: key.state & xlib::ShiftMask != 0,
                            alt: key.state & xlib::Mod1Mask != 0,
                            meta: key.state & xlib::Mod4Mask != 0,
                        });
                    }
                    xlib::ConfigureNotify => {
                        let configure = event.configure;
                        if configure.width != self.width || configure.height != self.height {
                            self.width = configure.width;
                            self.height = configure.height;
                        }
                    }
                    xlib::ClientMessage => {
                        let cm = event.client_message;
                        if cm.data.get_long(0) as xlib::Atom == self.wm_delete_window {
                            self.should_close = true;
                            return false;
                        }
                    }
                    _ => {}
                }
            }
        }

        !self.should_close
    }

    fn count_click(&mut self, button: u8, time: xlib::Time, x: i32, y: i32) -> u8 {
        let count = match &self.last_click {
            Some(last)
                if last.button == button
                    && time.saturating_sub(last.time) <= config::DOUBLE_CLICK_MS
                    && ((x - last.x).abs() as f64) <= config::DOUBLE_CLICK_SLOP
                    && ((y - last.y).abs() as f64) <= config::DOUBLE_CLICK_SLOP =>
            {
                last.count.saturating_add(1)
            }
            _ => 1,
        };
        self.last_click = Some(LastClick {
            button,
            time,
            x,
            y,
            count,
        });
        count
    }

    /// Drain pending mouse events.
    pub fn take_mouse_events(&mut self) -> Vec<MouseEvent> {
        std::mem::take(&mut self.pending_mouse_events)
    }

    /// Drain pending key events.
    pub fn take_key_events(&mut self) -> Vec<KeyEvent> {
        std::mem::take(&mut self.pending_key_events)
    }

    pub fn flush(&self) {
        unsafe {
            xlib::XFlush(self.display);
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }
}

impl Default for WindowX11 {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WindowX11 {
    fn drop(&mut self) {
        unsafe {
            if !self.display.is_null() {
                xlib::XDestroyWindow(self.display, self.window);
                xlib::XCloseDisplay(self.display);
            }
        }
    }
}

fn map_keysym(sym: xlib::KeySym) -> Key {
    let Ok(sym) = u32::try_from(sym) else {
        return Key::Other;
    };
    match sym {
        keysym::XK_space => Key::Space,
        keysym::XK_0 => Key::Digit0,
        keysym::XK_1 => Key::Digit1,
        keysym::XK_equal => Key::Equal,
        keysym::XK_plus | keysym::XK_KP_Add => Key::Plus,
        keysym::XK_minus | keysym::XK_KP_Subtract => Key::Minus,
        keysym::XK_Delete => Key::Delete,
        keysym::XK_BackSpace => Key::Backspace,
        keysym::XK_Escape => Key::Escape,
        // Latin-1 keysyms coincide with their code points
        0x21..=0x7e => char::from_u32(sym).map(Key::Char).unwrap_or(Key::Other),
        _ => Key::Other,
    }
}
