use buildandchill::camera::{CameraUniform, Viewport};
use buildandchill::geometry::Rect;
use buildandchill::world::{Room, RoomKind, World};
use glam::Vec2;

fn world() -> World {
    World::new(
        3200.0,
        2000.0,
        vec![Room::new("main-stage", "Main Stage", RoomKind::Event, Rect::new(1400.0, 750.0, 700.0, 500.0))],
    )
    .unwrap()
}

#[test]
fn player_at_origin_pins_viewport_to_origin() {
    let mut vp = Viewport::new(800.0, 600.0);
    vp.follow(Vec2::ZERO, &world());
    assert_eq!((vp.x, vp.y), (0.0, 0.0));
}

#[test]
fn player_at_far_corner_pins_viewport_to_far_edge() {
    let mut vp = Viewport::new(800.0, 600.0);
    vp.follow(Vec2::new(3200.0, 2000.0), &world());
    assert_eq!((vp.x, vp.y), (2400.0, 1400.0));
}

#[test]
fn player_in_the_middle_is_centred() {
    let mut vp = Viewport::new(800.0, 600.0);
    vp.follow(Vec2::new(1600.0, 1000.0), &world());
    assert_eq!((vp.x, vp.y), (1200.0, 700.0));
}

#[test]
fn canvas_larger_than_world_stays_at_zero() {
    let mut vp = Viewport::new(4000.0, 2500.0);
    vp.follow(Vec2::new(3000.0, 1800.0), &world());
    assert_eq!((vp.x, vp.y), (0.0, 0.0));
}

#[test]
fn resize_recomputes_immediately() {
    let mut vp = Viewport::new(800.0, 600.0);
    let player = Vec2::new(3200.0, 2000.0);
    vp.follow(player, &world());
    vp.resize(1600.0, 1000.0, player, &world());
    assert_eq!((vp.x, vp.y), (1600.0, 1000.0));
}

#[test]
fn screen_and_world_conversions_are_inverse() {
    let vp = Viewport { x: 1200.0, y: 700.0, width: 800.0, height: 600.0 };
    let p = Vec2::new(1500.0, 900.0);
    assert_eq!(vp.world_to_screen(p), Vec2::new(300.0, 200.0));
    assert_eq!(vp.screen_to_world(vp.world_to_screen(p)), p);
}

#[test]
fn camera_uniform_maps_viewport_corners_to_clip_corners() {
    let vp = Viewport { x: 1200.0, y: 700.0, width: 800.0, height: 600.0 };
    let m = CameraUniform::for_viewport(&vp).view_proj;
    let clip = |p: Vec2| (m[0][0] * p.x + m[3][0], m[1][1] * p.y + m[3][1]);

    let (x, y) = clip(Vec2::new(1200.0, 700.0));
    assert!((x + 1.0).abs() < 1e-5 && (y - 1.0).abs() < 1e-5);
    let (x, y) = clip(Vec2::new(2000.0, 1300.0));
    assert!((x - 1.0).abs() < 1e-5 && (y + 1.0).abs() < 1e-5);
}

#[test]
fn identity_ortho_ignores_viewport() {
    let at_origin = CameraUniform::for_viewport(&Viewport::new(800.0, 600.0));
    assert_eq!(at_origin, CameraUniform::identity_ortho(800.0, 600.0));
}
