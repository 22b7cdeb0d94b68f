use buildandchill::config::SimConfig;
use buildandchill::frame::DrawList;
use buildandchill::input::KeyCode;
use buildandchill::{FrameSink, RenderLoop, Simulation, World};

#[derive(Default)]
struct RecordingSink {
    frames: Vec<DrawList>,
    resized: Option<(u32, u32)>,
}

impl FrameSink for RecordingSink {
    type Error = String;

    fn present(&mut self, frame: &DrawList) -> Result<(), String> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn resize_surface(&mut self, width: u32, height: u32) {
        self.resized = Some((width, height));
    }
}

struct FailingSink {
    attempts: u32,
}

impl FrameSink for FailingSink {
    type Error = String;

    fn present(&mut self, _: &DrawList) -> Result<(), String> {
        self.attempts += 1;
        Err("surface lost".into())
    }
}

fn sim() -> Simulation {
    Simulation::new(World::default_layout(), SimConfig::default(), 800.0, 600.0).unwrap()
}

#[test]
fn idle_loop_does_not_tick() {
    let mut looper: RenderLoop<RecordingSink> = RenderLoop::new();
    let mut sim = sim();
    assert!(!looper.is_running());
    assert!(looper.frame(&mut sim, 1.0 / 60.0).is_none());
    assert_eq!(sim.tick_count(), 0);
    assert_eq!(looper.frames(), 0);
}

#[test]
fn running_loop_ticks_then_presents() {
    let mut looper = RenderLoop::new();
    looper.attach(RecordingSink::default());
    let mut sim = sim();

    let report = looper.frame(&mut sim, 1.0 / 60.0).unwrap();
    assert_eq!(report.tick, 1);
    looper.frame(&mut sim, 1.0 / 60.0);

    let sink = looper.sink().unwrap();
    assert_eq!(sink.frames.len(), 2);
    assert_eq!(looper.frames(), 2);
    assert_eq!(sink.frames[1].viewport, *sim.viewport());
}

#[test]
fn frame_clears_pressed_keys() {
    let mut looper = RenderLoop::new();
    looper.attach(RecordingSink::default());
    let mut sim = sim();
    sim.input.on_key_down(KeyCode::KeyD);
    looper.frame(&mut sim, 1.0 / 60.0);
    assert!(!sim.input.is_key_pressed(KeyCode::KeyD));
    assert!(sim.input.is_key_held(KeyCode::KeyD));
}

#[test]
fn stop_is_idempotent() {
    let mut looper = RenderLoop::new();
    looper.attach(RecordingSink::default());
    let mut sim = sim();
    looper.frame(&mut sim, 1.0 / 60.0);

    let sink = looper.stop().unwrap();
    assert_eq!(sink.frames.len(), 1);
    assert!(looper.stop().is_none());
    assert!(looper.frame(&mut sim, 1.0 / 60.0).is_none());
    assert_eq!(sim.tick_count(), 1);
}

#[test]
fn present_errors_do_not_stop_the_loop() {
    let mut looper = RenderLoop::new();
    looper.attach(FailingSink { attempts: 0 });
    let mut sim = sim();
    for _ in 0..3 {
        assert!(looper.frame(&mut sim, 1.0 / 60.0).is_some());
    }
    assert!(looper.is_running());
    assert_eq!(looper.sink().unwrap().attempts, 3);
    assert_eq!(sim.tick_count(), 3);
}

#[test]
fn reattach_replaces_the_surface() {
    let mut looper = RenderLoop::new();
    looper.attach(RecordingSink::default());
    let mut sim = sim();
    looper.frame(&mut sim, 1.0 / 60.0);
    looper.attach(RecordingSink::default());
    looper.sink_mut().unwrap().resize_surface(640, 480);

    let sink = looper.sink().unwrap();
    assert!(sink.frames.is_empty());
    assert_eq!(sink.resized, Some((640, 480)));
}
