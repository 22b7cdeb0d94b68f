// ── WindowMode ────────────────────────────────────────────────────────────────

/// Controls how the OS window is presented.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WindowMode {
    /// Standard decorated, resizable window.
    Windowed,
    /// Borderless window sized to the monitor's native resolution.
    Borderless,
}

impl WindowMode {
    pub fn toggled(self) -> Self {
        match self {
            WindowMode::Windowed => WindowMode::Borderless,
            WindowMode::Borderless => WindowMode::Windowed,
        }
    }
}

// ── WindowConfig ──────────────────────────────────────────────────────────────

/// Initial window settings.  The canvas follows the window afterwards; every
/// resize reaches the viewport through `WindowEvent::Resized`.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    /// Requested inner width in physical pixels.
    pub width: u32,
    pub height: u32,
    pub mode: WindowMode,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "buildandchill".into(),
            width: 1280,
            height: 720,
            mode: WindowMode::Windowed,
        }
    }
}

impl WindowConfig {
    /// Returns `0.0` when `height` is zero.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f32 / self.height as f32
    }
}
