pub mod avatar;
pub mod bots;
pub mod camera;
pub mod chat;
pub mod conference;
pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod identity;
pub mod input;
pub mod motion;
pub mod notice;
pub mod peer;
pub mod renderer;
pub mod sim;
pub mod window;
pub mod world;
pub mod zone;

pub use engine::{EngineBuilder, FrameSink, RenderLoop};
pub use sim::{Simulation, TickReport};
pub use world::World;
