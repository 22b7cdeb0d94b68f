use buildandchill::config::SimConfig;
use buildandchill::input::{HeldDirections, MoveDirection::*};
use buildandchill::motion::*;
use buildandchill::world::World;
use glam::Vec2;

fn world() -> World {
    World::default_layout()
}

fn step(held: HeldDirections, velocity: Vec2, position: Vec2, others: &[(&str, Vec2)]) -> MotionStep {
    integrate(held, velocity, position, 1.0, &world(), others.iter().copied(), &SimConfig::default())
}

#[test]
fn out_of_bounds_positions_are_clamped_inside() {
    let r = SimConfig::default().avatar_radius;
    let w = world();
    let outside = [
        Vec2::new(-100.0, 500.0),
        Vec2::new(5000.0, 500.0),
        Vec2::new(800.0, -1.0),
        Vec2::new(800.0, 2400.0),
        Vec2::new(-1e6, 1e6),
    ];
    for p in outside {
        let out = step(HeldDirections::default(), Vec2::ZERO, p, &[]).position;
        assert!(out.x >= r && out.x <= w.width() - r, "{p} -> {out}");
        assert!(out.y >= r && out.y <= w.height() - r, "{p} -> {out}");
    }
}

#[test]
fn diagonal_speed_equals_axis_speed() {
    let held = HeldDirections::from_slice(&[Up, Right]);
    let out = step(held, Vec2::ZERO, Vec2::new(1000.0, 1000.0), &[]);
    assert!((out.velocity.length() - 5.0).abs() < 1e-5);
    assert!(out.velocity.x > 0.0 && out.velocity.y < 0.0);
}

#[test]
fn idle_velocity_decays_geometrically() {
    let mut v = Vec2::new(10.0, 0.0);
    let mut p = Vec2::new(1000.0, 1000.0);
    for n in 1..=30 {
        let out = step(HeldDirections::default(), v, p, &[]);
        v = out.velocity;
        p = out.position;
        let expected = 10.0 * 0.8f32.powi(n);
        assert!((v.x - expected).abs() < 1e-4, "tick {n}: {} != {expected}", v.x);
        assert!(v.x > 0.0);
        if n == 1 {
            assert!((v.x - 8.0).abs() < 1e-6);
        }
    }
}

#[test]
fn delta_time_matches_fixed_step_for_speed() {
    let held = HeldDirections::from_slice(&[Right]);
    let cfg = SimConfig::default();
    let p = Vec2::new(1000.0, 1000.0);
    let two_halves = {
        let a = integrate(held, Vec2::ZERO, p, 0.5, &world(), std::iter::empty(), &cfg);
        integrate(held, a.velocity, a.position, 0.5, &world(), std::iter::empty(), &cfg)
    };
    let one_full = integrate(held, Vec2::ZERO, p, 1.0, &world(), std::iter::empty(), &cfg);
    assert!((two_halves.position - one_full.position).length() < 1e-4);
}

#[test]
fn approaching_another_avatar_is_rejected() {
    let held = HeldDirections::from_slice(&[Right]);
    let other = ("bot1", Vec2::new(130.0, 100.0));

    // 30 apart -> 25 apart: still clear of 2r = 24.
    let first = step(held, Vec2::ZERO, Vec2::new(100.0, 100.0), &[other]);
    assert_eq!(first.position, Vec2::new(105.0, 100.0));
    assert_eq!(first.blocked_by, None);

    // 25 apart -> 20 apart: rejected, position unchanged, velocity kept.
    let second = step(held, first.velocity, first.position, &[other]);
    assert_eq!(second.position, first.position);
    assert_eq!(second.velocity, Vec2::new(5.0, 0.0));
    assert_eq!(second.blocked_by.as_deref(), Some("bot1"));
}

#[test]
fn overlapping_avatars_can_walk_apart() {
    let held = HeldDirections::from_slice(&[Left]);
    let out = step(held, Vec2::ZERO, Vec2::new(100.0, 100.0), &[("bot1", Vec2::new(110.0, 100.0))]);
    assert_eq!(out.position, Vec2::new(95.0, 100.0));
    assert_eq!(out.blocked_by, None);
}

#[test]
fn rooms_never_block() {
    // Walk straight across the main-stage border.
    let held = HeldDirections::from_slice(&[Right]);
    let out = step(held, Vec2::ZERO, Vec2::new(1398.0, 1000.0), &[]);
    assert_eq!(out.position, Vec2::new(1403.0, 1000.0));
}
