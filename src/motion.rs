// =============================================================================
// MOTION.RS: Velocity integration for the local avatar
//
// Per tick:
//   1. held keys -> cardinal direction vector
//   2. any direction -> velocity of constant speed (diagonals normalised)
//      no direction  -> velocity decays geometrically toward zero
//   3. position += velocity * frame_ratio
//   4. clamp to world bounds
//   5. reject the move if it would overlap another avatar
// =============================================================================

use glam::Vec2;

use crate::config::SimConfig;
use crate::geometry::{circles_overlap, distance_euclidean};
use crate::input::HeldDirections;
use crate::world::World;

/// Result of one integration step.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionStep {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Id of the avatar that rejected the move, if any.
    pub blocked_by: Option<String>,
}

/// Raw cardinal vector: right/down are positive, opposite keys cancel.
pub fn input_vector(held: HeldDirections) -> Vec2 {
    let axis = |neg: bool, pos: bool| (pos as i32 - neg as i32) as f32;
    Vec2::new(axis(held.left, held.right), axis(held.up, held.down))
}

/// Next velocity for the given input.
///
/// With input the velocity snaps to `speed` along the input direction, so
/// Up+Right has the same magnitude as Right alone.  Without input (or with
/// opposite keys cancelling out) the previous velocity is scaled by
/// `decay^frame_ratio`, which coasts to a stop without ever overshooting.
pub fn next_velocity(held: HeldDirections, velocity: Vec2, speed: f32, decay: f32, frame_ratio: f32) -> Vec2 {
    let raw = input_vector(held);
    if raw != Vec2::ZERO {
        raw.normalize() * speed
    } else {
        velocity * decay.powf(frame_ratio)
    }
}

/// Advance the local avatar by one tick.
///
/// `others` are every other known avatar (id, position).  A move is rejected
/// when the clamped candidate lands closer than `2 * avatar_radius` to one of
/// them and is closer to it than before; the avatar then keeps its old
/// position but its velocity is preserved.  The separation exception
/// only matters when two avatars already overlap (e.g. a peer spawned on top
/// of the player) and lets them walk apart.
pub fn integrate<'a>(
    held: HeldDirections,
    velocity: Vec2,
    position: Vec2,
    frame_ratio: f32,
    world: &World,
    others: impl IntoIterator<Item = (&'a str, Vec2)>,
    config: &SimConfig,
) -> MotionStep {
    let velocity = next_velocity(held, velocity, config.move_speed, config.velocity_decay, frame_ratio);
    let r = config.avatar_radius;
    let candidate = world.clamp_avatar(position + velocity * frame_ratio, r);

    for (id, other) in others {
        let approaching = distance_euclidean(candidate, other) < distance_euclidean(position, other);
        if circles_overlap(candidate, other, r) && approaching {
            return MotionStep {
                position,
                velocity,
                blocked_by: Some(id.to_string()),
            };
        }
    }

    MotionStep { position: candidate, velocity, blocked_by: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MoveDirection::*;

    #[test]
    fn opposite_keys_cancel() {
        let held = HeldDirections::from_slice(&[Left, Right, Up]);
        assert_eq!(input_vector(held), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn cancelled_input_decays() {
        let held = HeldDirections::from_slice(&[Left, Right]);
        let v = next_velocity(held, Vec2::new(10.0, 0.0), 5.0, 0.8, 1.0);
        assert!((v.x - 8.0).abs() < 1e-5);
    }

    #[test]
    fn half_frame_decays_by_square_root() {
        let v = next_velocity(HeldDirections::default(), Vec2::new(10.0, 0.0), 5.0, 0.64, 0.5);
        assert!((v.x - 8.0).abs() < 1e-4);
    }
}
