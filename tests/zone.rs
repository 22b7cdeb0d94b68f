use buildandchill::geometry::Rect;
use buildandchill::world::{Room, RoomKind, World};
use buildandchill::zone::{ZoneTracker, ZoneTransition};
use glam::Vec2;

fn world() -> World {
    World::new(
        3200.0,
        2000.0,
        vec![
            Room::new("main-stage", "Main Stage", RoomKind::Event, Rect::new(1400.0, 750.0, 700.0, 500.0)),
            Room::new("lounge", "Lounge", RoomKind::Social, Rect::new(2100.0, 750.0, 400.0, 500.0)),
        ],
    )
    .unwrap()
}

#[test]
fn room_at_is_idempotent() {
    let w = world();
    let p = Vec2::new(1500.0, 800.0);
    assert_eq!(w.room_at(p).map(|r| &r.id), w.room_at(p).map(|r| &r.id));
}

#[test]
fn entering_a_room_emits_exactly_one_transition() {
    let w = world();
    let mut zone = ZoneTracker::new();
    let mut events = Vec::new();
    for x in (1300..1500).step_by(5) {
        if let Some(t) = zone.update(&w, Vec2::new(x as f32, 1000.0)) {
            events.push((x, t));
        }
    }
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, 1400);
    assert_eq!(events[0].1, ZoneTransition { from: None, to: Some("main-stage".into()) });
}

#[test]
fn walking_along_the_inside_edge_is_quiet() {
    let w = world();
    let mut zone = ZoneTracker::new();
    assert!(zone.update(&w, Vec2::new(1400.0, 750.0)).is_some());
    for y in 750..=1250 {
        assert_eq!(zone.update(&w, Vec2::new(1400.0, y as f32)), None);
    }
}

#[test]
fn shared_border_belongs_to_the_first_room() {
    let w = world();
    let mut zone = ZoneTracker::new();
    zone.update(&w, Vec2::new(2050.0, 1000.0));
    assert_eq!(zone.update(&w, Vec2::new(2100.0, 1000.0)), None);
    assert_eq!(
        zone.update(&w, Vec2::new(2101.0, 1000.0)),
        Some(ZoneTransition { from: Some("main-stage".into()), to: Some("lounge".into()) })
    );
    assert_eq!(
        zone.update(&w, Vec2::new(2600.0, 1000.0)),
        Some(ZoneTransition { from: Some("lounge".into()), to: None })
    );
    assert_eq!(zone.current(), None);
}
