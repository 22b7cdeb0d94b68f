// =============================================================================
// GEOMETRY.RS: Geometric primitives for the event space
//
// Operations shared by the world model, the motion integrator and the
// frame builder:
// - Axis-aligned rectangles (rooms, viewport, minimap)
// - Distance calculations (avatar collision)
// - Range clamping that tolerates degenerate ranges
// =============================================================================

use glam::Vec2;
use serde::{Deserialize, Serialize};

// =============================================================================
// RECTANGLES
// =============================================================================

/// Axis-aligned rectangle in world space: top-left corner plus extent.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 { self.x + self.width }
    pub fn bottom(&self) -> f32 { self.y + self.height }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Inclusive containment on all four edges, so a point exactly on a
    /// shared border belongs to the first room that claims it.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Intersection with `other`, or `None` when the overlap has no area.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 > x0 && y1 > y0 {
            Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
        } else {
            None
        }
    }

    /// Uniformly scale position and extent (used for minimap projection).
    pub fn scaled(&self, s: f32) -> Rect {
        Rect::new(self.x * s, self.y * s, self.width * s, self.height * s)
    }

    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }
}

// =============================================================================
// DISTANCE
// =============================================================================

/// Straight-line distance between two world positions.
#[inline]
pub fn distance_euclidean(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// True when two circles of radius `r` overlap (centres closer than `2r`).
#[inline]
pub fn circles_overlap(a: Vec2, b: Vec2, r: f32) -> bool {
    distance_euclidean(a, b) < 2.0 * r
}

// =============================================================================
// CLAMPING
// =============================================================================

/// Clamp `v` into `[lo, hi]`.  When the range is inverted (the space is
/// narrower than the margin) the midpoint is returned instead of panicking.
#[inline]
pub fn clamp_range(v: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        (lo + hi) * 0.5
    } else {
        v.clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(Vec2::new(10.0, 10.0)));
        assert!(r.contains(Vec2::new(30.0, 30.0)));
        assert!(!r.contains(Vec2::new(30.1, 20.0)));
    }

    #[test]
    fn test_intersect_clips() {
        let world = Rect::new(0.0, 0.0, 100.0, 100.0);
        let room = Rect::new(80.0, -10.0, 40.0, 40.0);
        assert_eq!(room.intersect(&world), Some(Rect::new(80.0, 0.0, 20.0, 30.0)));
    }

    #[test]
    fn test_intersect_disjoint() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersect(&b), None);
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, Vec2::new(23.9, 0.0), 12.0));
        assert!(!circles_overlap(Vec2::ZERO, Vec2::new(24.0, 0.0), 12.0));
    }

    #[test]
    fn test_clamp_range_inverted() {
        assert_eq!(clamp_range(5.0, 12.0, 8.0), 10.0);
        assert_eq!(clamp_range(-3.0, 0.0, 8.0), 0.0);
    }
}
