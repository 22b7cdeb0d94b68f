//! Tracks which room contains the local player and reports transitions.

use glam::Vec2;

use crate::world::World;

/// The player crossed a room boundary.  `None` means "outside every room".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneTransition {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Default)]
pub struct ZoneTracker {
    current: Option<String>,
}

impl ZoneTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the room the player was last seen in.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Re-resolve the zone for `position`.  Returns a transition only when
    /// the room id differs from the previous call; there is no hysteresis.
    pub fn update(&mut self, world: &World, position: Vec2) -> Option<ZoneTransition> {
        let next = world.room_at(position).map(|r| r.id.as_str());
        if next == self.current.as_deref() {
            return None;
        }
        let to = next.map(str::to_string);
        let from = std::mem::replace(&mut self.current, to.clone());
        Some(ZoneTransition { from, to })
    }
}
