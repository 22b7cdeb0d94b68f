pub mod config;

pub use config::{WindowConfig, WindowMode};

use winit::dpi::PhysicalSize;
use winit::window::{Fullscreen, Window};

/// Apply `config.mode` to `window`.
///
/// # Windowed
/// Leaves fullscreen, restores decorations and asks for the configured size.
/// The new size arrives later as a `WindowEvent::Resized`.
///
/// # Borderless
/// Borderless fullscreen on the monitor the window is currently on.
pub fn apply_window_settings(window: &Window, config: &WindowConfig) {
    match config.mode {
        WindowMode::Windowed => {
            window.set_fullscreen(None);
            window.set_decorations(true);
            window.set_resizable(true);
            let _ = window.request_inner_size(PhysicalSize::new(config.width, config.height));
        }
        WindowMode::Borderless => {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }
    }
}
