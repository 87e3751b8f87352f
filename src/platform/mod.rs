pub mod renderer;
#[cfg(feature = "gui")]
pub mod renderer_cairo;
#[cfg(feature = "gui")]
pub mod window_x11;
