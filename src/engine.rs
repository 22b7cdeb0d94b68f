use std::sync::Arc;
use std::time::Instant;

use log::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
pub use winit::keyboard::KeyCode;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::chat::ChatMode;
use crate::conference::ConferenceService;
use crate::config::SimConfig;
use crate::error::EngineError;
use crate::frame::{DrawList, FrameBuilder};
use crate::identity::DisplayNameResolver;
use crate::peer::PeerChannel;
use crate::renderer::Renderer;
use crate::sim::{Simulation, TickReport};
use crate::window::{apply_window_settings, WindowConfig};
use crate::world::World;

// ── Color ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);
    pub const GRAY: Self = Self([0.6, 0.6, 0.6, 1.0]);
    pub const RED: Self = Self([1.0, 0.0, 0.0, 1.0]);
    pub const GREEN: Self = Self([0.0, 1.0, 0.0, 1.0]);
    pub const BLUE: Self = Self([0.0, 0.0, 1.0, 1.0]);
    pub const YELLOW: Self = Self([1.0, 1.0, 0.0, 1.0]);
    pub const CYAN: Self = Self([0.0, 1.0, 1.0, 1.0]);
    pub const MAGENTA: Self = Self([1.0, 0.0, 1.0, 1.0]);
    pub const ORANGE: Self = Self([1.0, 0.55, 0.0, 1.0]);
    pub const PURPLE: Self = Self([0.5, 0.0, 0.5, 1.0]);
    pub const PINK: Self = Self([1.0, 0.75, 0.8, 1.0]);

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0])
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        let [r, g, b, _] = self.0;
        Self([r, g, b, alpha])
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or a basic colour name.
    pub fn parse(css: &str) -> Option<Self> {
        let css = css.trim();
        if let Some(hex) = css.strip_prefix('#') {
            return parse_hex(hex);
        }
        Some(match css.to_ascii_lowercase().as_str() {
            "white" => Self::WHITE,
            "black" => Self::BLACK,
            "gray" | "grey" => Self::GRAY,
            "red" => Self::RED,
            "green" => Self::GREEN,
            "blue" => Self::BLUE,
            "yellow" => Self::YELLOW,
            "cyan" => Self::CYAN,
            "magenta" => Self::MAGENTA,
            "orange" => Self::ORANGE,
            "purple" => Self::PURPLE,
            "pink" => Self::PINK,
            _ => return None,
        })
    }

    /// Like [`Color::parse`], falling back to gray for anything unrecognised.
    pub fn from_css(css: &str) -> Self {
        Self::parse(css).unwrap_or(Self::GRAY)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
    match hex.len() {
        3 => Some(Color::from_rgba8(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
        6 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, 255)),
        8 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

// ── FrameSink ───────────────────────────────────────────────────────────────

/// Where finished frames go.  The GPU [`Renderer`] in the app; a recorder in
/// tests.
pub trait FrameSink {
    type Error: std::fmt::Display;

    fn present(&mut self, frame: &DrawList) -> Result<(), Self::Error>;

    fn resize_surface(&mut self, _width: u32, _height: u32) {}
}

// ── RenderLoop ──────────────────────────────────────────────────────────────

enum LoopState<S> {
    /// No surface attached; frames are no-ops.
    Idle,
    Running(S),
}

/// Tick-and-present driver.  Owns the surface while running.
pub struct RenderLoop<S: FrameSink> {
    state: LoopState<S>,
    frames: u64,
}

impl<S: FrameSink> Default for RenderLoop<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: FrameSink> RenderLoop<S> {
    pub fn new() -> Self {
        Self { state: LoopState::Idle, frames: 0 }
    }

    /// Start presenting to `sink`.  Replaces any previous surface.
    pub fn attach(&mut self, sink: S) {
        if self.is_running() {
            warn!("render loop already running; replacing surface");
        }
        self.state = LoopState::Running(sink);
    }

    /// Return to idle and hand back the surface.  Calling it again is a no-op.
    pub fn stop(&mut self) -> Option<S> {
        match std::mem::replace(&mut self.state, LoopState::Idle) {
            LoopState::Running(sink) => {
                info!("render loop stopped after {} frames", self.frames);
                Some(sink)
            }
            LoopState::Idle => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running(_))
    }

    pub fn frames(&self) -> u64 { self.frames }

    pub fn sink(&self) -> Option<&S> {
        match &self.state {
            LoopState::Running(sink) => Some(sink),
            LoopState::Idle => None,
        }
    }

    pub fn sink_mut(&mut self) -> Option<&mut S> {
        match &mut self.state {
            LoopState::Running(sink) => Some(sink),
            LoopState::Idle => None,
        }
    }

    /// One tick, one frame.  Does nothing while idle.  A failed present is
    /// logged; the loop keeps running.
    pub fn frame(&mut self, sim: &mut Simulation, dt: f32) -> Option<TickReport> {
        let LoopState::Running(sink) = &mut self.state else { return None };

        let report = sim.tick(dt);
        let list = FrameBuilder::build(sim);
        if let Err(e) = sink.present(&list) {
            error!("render error: {e}");
        }
        sim.input.clear_frame_state();
        self.frames += 1;
        Some(report)
    }
}

// ── EngineBuilder ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct EngineBuilder {
    window: WindowConfig,
    config: SimConfig,
    world: Option<World>,
    channel: Option<Box<dyn PeerChannel>>,
    conference: Option<Arc<dyn ConferenceService>>,
    resolver: Option<Arc<dyn DisplayNameResolver>>,
    wallet_address: Option<String>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: &str) -> Self { self.window.title = title.into(); self }
    pub fn with_size(mut self, width: u32, height: u32) -> Self { self.window.width = width; self.window.height = height; self }
    pub fn with_config(mut self, config: SimConfig) -> Self { self.config = config; self }
    pub fn with_world(mut self, world: World) -> Self { self.world = Some(world); self }
    pub fn with_peer_channel(mut self, channel: Box<dyn PeerChannel>) -> Self { self.channel = Some(channel); self }
    pub fn with_conference(mut self, service: Arc<dyn ConferenceService>) -> Self { self.conference = Some(service); self }
    pub fn with_resolver(mut self, resolver: Arc<dyn DisplayNameResolver>) -> Self { self.resolver = Some(resolver); self }
    pub fn with_wallet_address(mut self, address: &str) -> Self { self.wallet_address = Some(address.into()); self }

    /// Build the simulation and run the window event loop until the window
    /// closes.
    pub fn run(self) -> Result<(), EngineError> {
        let world = self.world.unwrap_or_else(World::default_layout);
        let mut sim = Simulation::new(world, self.config, self.window.width as f32, self.window.height as f32)?;
        if let Some(resolver) = self.resolver {
            sim.set_resolver(resolver);
        }
        if let Some(address) = &self.wallet_address {
            sim.set_wallet_address(address);
        }
        if let Some(channel) = self.channel {
            sim.connect(channel);
        }

        let event_loop = EventLoop::new()?;
        let mut app = App {
            window_config: self.window,
            sim,
            render_loop: RenderLoop::new(),
            conference: self.conference,
            last_instant: None,
        };
        event_loop.run_app(&mut app)?;
        Ok(())
    }
}

// ── App (winit ApplicationHandler) ──────────────────────────────────────────

struct App {
    window_config: WindowConfig,
    sim: Simulation,
    render_loop: RenderLoop<Renderer>,
    conference: Option<Arc<dyn ConferenceService>>,
    last_instant: Option<Instant>,
}

impl App {
    fn open_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<Renderer, EngineError> {
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title(&self.window_config.title)
                    .with_inner_size(winit::dpi::PhysicalSize::new(
                        self.window_config.width,
                        self.window_config.height,
                    ))
                    .with_resizable(true),
            )
            .map_err(|e| EngineError::SurfaceUnavailable(e.to_string()))?;
        pollster::block_on(Renderer::new(Arc::new(window)))
    }

    fn quit(&mut self, event_loop: &ActiveEventLoop) {
        self.render_loop.stop();
        event_loop.exit();
    }

    /// Keys go to the chat box while it is open, otherwise to the input
    /// tracker.
    fn key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode, state: ElementState, text: Option<&str>) {
        if self.sim.composer.is_open() {
            if state == ElementState::Pressed {
                match code {
                    KeyCode::Enter | KeyCode::NumpadEnter => {
                        self.sim.submit_compose();
                    }
                    KeyCode::Escape => self.sim.composer.cancel(),
                    KeyCode::Backspace => self.sim.composer.backspace(),
                    _ => {
                        if let Some(t) = text {
                            self.sim.composer.type_text(t);
                        }
                    }
                }
            }
            return;
        }

        match state {
            ElementState::Pressed => {
                if code == KeyCode::Escape {
                    self.quit(event_loop);
                    return;
                }
                self.sim.input.on_key_down(code);
            }
            ElementState::Released => self.sim.input.on_key_up(code),
        }
    }

    /// One-shot actions for keys pressed since the last frame.
    fn shortcuts(&mut self) {
        let pressed = |k| self.sim.input.is_key_pressed(k);
        let (enter, tab, video, dismiss, leave, fullscreen) = (
            pressed(KeyCode::Enter),
            pressed(KeyCode::Tab),
            pressed(KeyCode::KeyV),
            pressed(KeyCode::KeyX),
            pressed(KeyCode::KeyL),
            pressed(KeyCode::F11),
        );

        if tab {
            let next = match self.sim.chat_mode() {
                ChatMode::Global => ChatMode::Zone,
                ChatMode::Zone => ChatMode::Global,
            };
            self.sim.set_chat_mode(next);
        }
        if video {
            match &self.conference {
                Some(service) => {
                    self.sim.request_video(Arc::clone(service));
                }
                None => warn!("no conference service configured"),
            }
        }
        if dismiss {
            self.sim.notices_mut().dismiss_oldest();
        }
        if leave {
            if let Some(call) = self.sim.leave_call() {
                info!("left call `{}`", call.conference_id);
            }
        }
        if fullscreen {
            self.window_config.mode = self.window_config.mode.toggled();
            if let Some(renderer) = self.render_loop.sink() {
                apply_window_settings(&renderer.window, &self.window_config);
            }
        }
        if enter {
            self.sim.begin_compose();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.render_loop.is_running() {
            return;
        }
        match self.open_surface(event_loop) {
            Ok(renderer) => {
                let size = renderer.window.inner_size();
                self.sim.resize(size.width as f32, size.height as f32);
                self.render_loop.attach(renderer);
                self.last_instant = None;
            }
            Err(e) => warn!("{e}; render loop stays idle"),
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.render_loop.stop();
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.render_loop.sink() {
            renderer.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.quit(event_loop),

            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.render_loop.sink_mut() {
                    renderer.resize_surface(size.width, size.height);
                }
                if size.width > 0 && size.height > 0 {
                    self.sim.resize(size.width as f32, size.height as f32);
                }
            }

            WindowEvent::Focused(false) => self.sim.input.release_all(),

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let elapsed = match self.last_instant {
                    Some(prev) => now.duration_since(prev).as_secs_f32(),
                    None => self.sim.config().reference_dt(),
                };
                self.last_instant = Some(now);

                self.shortcuts();
                self.render_loop.frame(&mut self.sim, elapsed);
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ref text,
                        ..
                    },
                ..
            } => self.key(event_loop, code, state, text.as_deref()),

            _ => {}
        }
    }
}
