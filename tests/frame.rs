use buildandchill::conference::OfflineConference;
use buildandchill::config::SimConfig;
use buildandchill::frame::{minimap_origin, minimap_scale, FrameBuilder, Shape};
use buildandchill::peer::{LoopbackHub, PeerChannel};
use buildandchill::peer::protocol::{self, PeerMessage};
use buildandchill::{Simulation, World};
use glam::Vec2;

fn sim_at(x: f32, y: f32) -> Simulation {
    let mut sim = Simulation::new(World::default_layout(), SimConfig::default(), 800.0, 600.0).unwrap();
    sim.place_player(Vec2::new(x, y));
    sim.step(1.0);
    sim
}

fn strokes(shapes: &[Shape]) -> Vec<&Shape> {
    shapes.iter().filter(|s| matches!(s, Shape::Stroke { .. })).collect()
}

#[test]
fn every_room_gets_a_label() {
    let list = FrameBuilder::build(&sim_at(100.0, 100.0));
    let texts: Vec<&str> = list.texts().collect();
    for room in World::default_layout().rooms() {
        assert!(texts.contains(&room.name.as_str()), "missing {}", room.name);
    }
}

#[test]
fn only_the_current_room_is_highlighted() {
    let outside = FrameBuilder::build(&sim_at(100.0, 100.0));
    assert!(strokes(&outside.world).is_empty());

    let sim = sim_at(1500.0, 1000.0);
    let inside = FrameBuilder::build(&sim);
    let highlighted = strokes(&inside.world);
    assert_eq!(highlighted.len(), 1);
    match highlighted[0] {
        Shape::Stroke { rect, width, .. } => {
            assert_eq!(*rect, sim.world().room("main-stage").unwrap().rect);
            assert_eq!(*width, 3.0);
        }
        _ => unreachable!(),
    }
}

#[test]
fn minimap_fits_the_whole_world() {
    assert_eq!(minimap_scale(150.0, 3200.0, 2000.0), 150.0 / 3200.0);
    assert_eq!(minimap_origin(800.0, 150.0), Vec2::new(634.0, 16.0));

    let sim = sim_at(1600.0, 1000.0);
    let list = FrameBuilder::build(&sim);
    let marker = Vec2::new(634.0, 16.0) + Vec2::new(1600.0, 1000.0) * (150.0 / 3200.0);
    assert!(list.screen.iter().any(|s| matches!(
        s,
        Shape::Circle { center, radius, .. } if *radius == 3.0 && (*center - marker).length() < 1e-3
    )));
}

#[test]
fn zone_card_describes_the_current_room() {
    let service = OfflineConference::new();
    let mut sim = sim_at(1500.0, 1000.0);
    let texts: Vec<String> = FrameBuilder::build(&sim).texts().map(String::from).collect();
    assert!(texts.iter().any(|t| t == "EVENT"));
    assert!(texts.iter().any(|t| t == "V: START VIDEO"));

    sim.activate_video(&service).unwrap();
    let texts: Vec<String> = FrameBuilder::build(&sim).texts().map(String::from).collect();
    assert!(texts.iter().any(|t| t == "V: JOIN VIDEO"));
    assert!(texts.iter().any(|t| t == "IN CALL: room-0001"));
    assert!(texts.iter().any(|t| t == "Video ready"));
}

#[test]
fn no_zone_card_outside_rooms() {
    let list = FrameBuilder::build(&sim_at(100.0, 100.0));
    assert!(!list.texts().any(|t| t.starts_with("V: ")));
    assert!(list.texts().any(|t| t == "OFFLINE"));
    assert!(list.texts().any(|t| t == "GLOBAL CHAT"));
}

#[test]
fn remote_avatars_are_drawn_with_their_names() {
    let hub = LoopbackHub::new();
    let mut sim = Simulation::new(World::default_layout(), SimConfig::default(), 800.0, 600.0).unwrap();
    sim.connect(Box::new(hub.join("me")));
    let ghost = hub.join("ghost");
    let payload = protocol::encode(&PeerMessage::PositionUpdate { x: 600.0, y: 600.0, color: "blue".into() }).unwrap();
    ghost.broadcast(&payload, "position").unwrap();
    sim.step(1.0);

    let list = FrameBuilder::build(&sim);
    let circles = list.world.iter().filter(|s| matches!(s, Shape::Circle { .. })).count();
    assert_eq!(circles, 2);
    assert!(list.texts().any(|t| t == "ghost"));
    assert!(list.texts().any(|t| t == "PEERS: 1"));
}

#[test]
fn open_composer_shows_the_draft() {
    let mut sim = sim_at(100.0, 100.0);
    sim.begin_compose();
    sim.composer.type_text("hi");
    let list = FrameBuilder::build(&sim);
    assert!(list.texts().any(|t| t == "> hi_"));
}

fn grid_lines(shapes: &[Shape]) -> usize {
    shapes.iter().filter(|s| matches!(s, Shape::Line { .. })).count()
}

#[test]
fn grid_covers_the_visible_area() {
    // 800 x 600 at the origin with 32 px tiles: x = 0..=800, y = 0..=576.
    let list = FrameBuilder::build(&sim_at(100.0, 100.0));
    assert_eq!(grid_lines(&list.world), 26 + 19);
}

#[test]
fn unit_tiles_far_from_the_origin_still_terminate() {
    let config = SimConfig { tile_size: 1.0, ..SimConfig::default() };
    let mut sim = Simulation::new(World::default_layout(), config, 800.0, 600.0).unwrap();
    sim.place_player(Vec2::new(3200.0, 2000.0));
    sim.step(1.0);
    assert_eq!((sim.viewport().x, sim.viewport().y), (2400.0, 1400.0));

    let list = FrameBuilder::build(&sim);
    assert_eq!(grid_lines(&list.world), 801 + 601);
}

#[test]
fn sub_pixel_tiles_are_refused() {
    let config = SimConfig { tile_size: 1e-4, ..SimConfig::default() };
    assert!(Simulation::new(World::default_layout(), config, 800.0, 600.0).is_err());
}
