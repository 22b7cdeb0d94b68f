use buildandchill::error::WorldError;
use buildandchill::geometry::Rect;
use buildandchill::world::*;
use glam::Vec2;

fn two_overlapping() -> World {
    World::new(
        1000.0,
        1000.0,
        vec![
            Room::new("a", "A", RoomKind::Social, Rect::new(100.0, 100.0, 200.0, 200.0)),
            Room::new("b", "B", RoomKind::Event, Rect::new(200.0, 200.0, 200.0, 200.0)),
        ],
    )
    .unwrap()
}

#[test]
fn room_at_includes_edges() {
    let w = two_overlapping();
    assert_eq!(w.room_at(Vec2::new(100.0, 100.0)).map(|r| r.id.as_str()), Some("a"));
    assert_eq!(w.room_at(Vec2::new(400.0, 400.0)).map(|r| r.id.as_str()), Some("b"));
    assert_eq!(w.room_at(Vec2::new(99.9, 150.0)), None);
}

#[test]
fn first_room_in_list_order_wins() {
    let w = two_overlapping();
    assert_eq!(w.room_at(Vec2::new(250.0, 250.0)).map(|r| r.id.as_str()), Some("a"));
}

#[test]
fn rooms_are_clipped_to_the_world() {
    let w = World::new(
        500.0,
        500.0,
        vec![Room::new("edge", "Edge", RoomKind::Chat, Rect::new(400.0, 400.0, 300.0, 300.0))],
    )
    .unwrap();
    assert_eq!(w.room("edge").unwrap().rect, Rect::new(400.0, 400.0, 100.0, 100.0));
}

#[test]
fn invalid_worlds_are_rejected() {
    assert_eq!(
        World::new(0.0, 10.0, vec![]).unwrap_err(),
        WorldError::InvalidSize { width: 0.0, height: 10.0 }
    );

    let dup = vec![
        Room::new("x", "X", RoomKind::Social, Rect::new(0.0, 0.0, 10.0, 10.0)),
        Room::new("x", "X2", RoomKind::Social, Rect::new(20.0, 0.0, 10.0, 10.0)),
    ];
    assert_eq!(World::new(100.0, 100.0, dup).unwrap_err(), WorldError::DuplicateRoomId("x".into()));

    let outside = vec![Room::new("far", "Far", RoomKind::Social, Rect::new(200.0, 0.0, 10.0, 10.0))];
    assert_eq!(World::new(100.0, 100.0, outside).unwrap_err(), WorldError::RoomOutsideWorld("far".into()));
}

#[test]
fn conference_link_is_set_once() {
    let mut w = World::default_layout();
    w.link_conference("main-stage", "room-0001").unwrap();
    assert_eq!(w.room("main-stage").unwrap().linked_conference(), Some("room-0001"));
    assert_eq!(
        w.link_conference("main-stage", "room-0002"),
        Err(WorldError::AlreadyLinked { room: "main-stage".into(), conference: "room-0001".into() })
    );
    assert_eq!(w.room("main-stage").unwrap().linked_conference(), Some("room-0001"));
    assert_eq!(w.link_conference("nowhere", "room-0003"), Err(WorldError::UnknownRoom("nowhere".into())));
}

#[test]
fn clamp_avatar_keeps_the_circle_inside() {
    let w = World::default_layout();
    assert_eq!(w.clamp_avatar(Vec2::new(-50.0, 5000.0), 12.0), Vec2::new(12.0, 1988.0));

    let narrow = World::new(20.0, 100.0, vec![]).unwrap();
    assert_eq!(narrow.clamp_avatar(Vec2::new(0.0, 50.0), 12.0), Vec2::new(10.0, 50.0));
}

#[test]
fn default_layout_has_the_expected_rooms() {
    let w = World::default_layout();
    assert_eq!((w.width(), w.height()), (3200.0, 2000.0));
    for id in ["main-stage", "video-pod", "lounge", "chat-corner", "sponsor-1", "sponsor-4"] {
        assert!(w.room(id).is_some(), "missing {id}");
    }
    assert!(w.room("main-stage").unwrap().kind.hosts_video());
    assert!(!w.room("lounge").unwrap().kind.hosts_video());
}
