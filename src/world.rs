//! Static description of the event space: world bounds and the themed rooms
//! inside them.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::geometry::{clamp_range, Rect};

/// What a room is for.  Drives overlay content and whether video can be
/// opened from inside it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    Event,
    Social,
    Sponsor,
    Workshop,
    Video,
    Chat,
}

impl RoomKind {
    pub fn label(&self) -> &'static str {
        match self {
            RoomKind::Event => "event",
            RoomKind::Social => "social",
            RoomKind::Sponsor => "sponsor",
            RoomKind::Workshop => "workshop",
            RoomKind::Video => "video",
            RoomKind::Chat => "chat",
        }
    }

    /// Rooms that can be bound to a video-conference room.
    pub fn hosts_video(&self) -> bool {
        matches!(self, RoomKind::Event | RoomKind::Video)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// CSS-style colour string (`#rrggbb`, `#rgb` or a basic colour name).
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub rect: Rect,
    pub kind: RoomKind,
    pub theme: Option<Theme>,
    /// Shown on the zone overlay while the player stands inside.
    pub description: Option<String>,
    /// Conference room bound to this room.  Set at most once.
    linked_conference: Option<String>,
}

impl Room {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: RoomKind, rect: Rect) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rect,
            kind,
            theme: None,
            description: None,
            linked_conference: None,
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.theme = Some(Theme { color: color.to_string() });
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn linked_conference(&self) -> Option<&str> {
        self.linked_conference.as_deref()
    }
}

/// The fixed rectangular coordinate space and its rooms.  Only the rooms'
/// conference links change after construction.
#[derive(Clone, Debug)]
pub struct World {
    width: f32,
    height: f32,
    rooms: Vec<Room>,
}

impl World {
    /// Build a world, clipping every room against the bounds.
    pub fn new(width: f32, height: f32, rooms: Vec<Room>) -> Result<Self, WorldError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(WorldError::InvalidSize { width, height });
        }

        let bounds = Rect::new(0.0, 0.0, width, height);
        let mut seen = HashSet::new();
        let mut clipped = Vec::with_capacity(rooms.len());

        for mut room in rooms {
            if !seen.insert(room.id.clone()) {
                return Err(WorldError::DuplicateRoomId(room.id));
            }
            room.rect = room
                .rect
                .intersect(&bounds)
                .ok_or_else(|| WorldError::RoomOutsideWorld(room.id.clone()))?;
            clipped.push(room);
        }

        Ok(Self { width, height, rooms: clipped })
    }

    pub fn width(&self) -> f32 { self.width }
    pub fn height(&self) -> f32 { self.height }
    pub fn rooms(&self) -> &[Room] { &self.rooms }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// First room (in list order) whose rectangle contains `point`.
    pub fn room_at(&self, point: Vec2) -> Option<&Room> {
        self.rooms.iter().find(|r| r.rect.contains(point))
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// Bind a conference room to `room_id`.  A room can be linked only once;
    /// every later caller reads the existing link instead.
    pub fn link_conference(&mut self, room_id: &str, conference_id: &str) -> Result<(), WorldError> {
        let room = self
            .rooms
            .iter_mut()
            .find(|r| r.id == room_id)
            .ok_or_else(|| WorldError::UnknownRoom(room_id.to_string()))?;

        if let Some(existing) = &room.linked_conference {
            return Err(WorldError::AlreadyLinked {
                room: room_id.to_string(),
                conference: existing.clone(),
            });
        }
        room.linked_conference = Some(conference_id.to_string());
        Ok(())
    }

    /// Clamp an avatar centre so a circle of `radius` stays inside the world.
    pub fn clamp_avatar(&self, p: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            clamp_range(p.x, radius, self.width - radius),
            clamp_range(p.y, radius, self.height - radius),
        )
    }

    /// The 3200 × 2000 event-space layout: stage, workshops, a video pod,
    /// lounges, a chat corner and a row of sponsor booths.
    pub fn default_layout() -> Self {
        let mut rooms = vec![
            Room::new("main-stage", "Main Stage", RoomKind::Event, Rect::new(1400.0, 750.0, 700.0, 500.0))
                .with_color("#8b5cf6")
                .with_description("Keynotes and demos. Press V to open video."),
            Room::new("base-workshop", "Base Workshop", RoomKind::Workshop, Rect::new(200.0, 200.0, 500.0, 350.0))
                .with_color("#3b82f6")
                .with_description("Basenames Workshop - Dec 7, 9:00 AM IST"),
            Room::new("huddle-workshop", "Huddle01 Workshop", RoomKind::Workshop, Rect::new(800.0, 200.0, 500.0, 350.0))
                .with_color("#10b981")
                .with_description("Huddle01 Workshop - Dec 7, 10:00 AM IST"),
            Room::new("video-pod", "Video Pod", RoomKind::Video, Rect::new(1400.0, 200.0, 500.0, 300.0))
                .with_color("#ec4899")
                .with_description("Drop-in video calls. Press V to join."),
            Room::new("cdp-workshop", "CDP Workshop", RoomKind::Workshop, Rect::new(2400.0, 200.0, 500.0, 350.0))
                .with_color("#f59e0b")
                .with_description("CDP Workshop - Dec 7, 11:00 AM IST"),
            Room::new("lounge", "Lounge", RoomKind::Social, Rect::new(200.0, 800.0, 600.0, 500.0))
                .with_color("#14b8a6")
                .with_description("Grab a seat and meet people."),
            Room::new("garden", "Garden", RoomKind::Social, Rect::new(2400.0, 800.0, 600.0, 500.0))
                .with_color("#22c55e"),
            Room::new("chat-corner", "Chat Corner", RoomKind::Chat, Rect::new(2300.0, 1500.0, 600.0, 350.0))
                .with_color("#64748b")
                .with_description("Zone chat is scoped to this room."),
        ];

        const BOOTH_COLORS: [&str; 4] = ["#ef4444", "#0ea5e9", "#a855f7", "#eab308"];
        for (i, color) in BOOTH_COLORS.iter().enumerate() {
            let x = 300.0 + i as f32 * 400.0;
            rooms.push(
                Room::new(
                    format!("sponsor-{}", i + 1),
                    format!("Sponsor Booth {}", i + 1),
                    RoomKind::Sponsor,
                    Rect::new(x, 1550.0, 300.0, 250.0),
                )
                .with_color(color),
            );
        }

        // The layout is a compile-time constant; every room lies inside the
        // bounds and every id is unique.
        Self { width: 3200.0, height: 2000.0, rooms }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_passes_validation() {
        let w = World::default_layout();
        let rebuilt = World::new(w.width(), w.height(), w.rooms().to_vec()).unwrap();
        assert_eq!(rebuilt.rooms(), w.rooms());
    }

    #[test]
    fn default_layout_rooms_do_not_overlap() {
        let w = World::default_layout();
        for (i, a) in w.rooms().iter().enumerate() {
            for b in &w.rooms()[i + 1..] {
                assert!(a.rect.intersect(&b.rect).is_none(), "{} overlaps {}", a.id, b.id);
            }
        }
    }
}
