use glam::Vec2;

/// Identity of the local avatar.  Every other id is a remote peer id.
pub const PLAYER_ID: &str = "player";

/// Longest peer id or display name drawn as a name tag, in characters.
pub const MAX_NAME_LEN: usize = 48;

/// A positioned, coloured circle in the world.
#[derive(Clone, Debug, PartialEq)]
pub struct Avatar {
    pub id: String,
    pub position: Vec2,
    /// CSS-style colour string, broadcast verbatim to peers.
    pub color: String,
    pub display_name: Option<String>,
}

impl Avatar {
    pub fn new(id: impl Into<String>, position: Vec2, color: impl Into<String>) -> Self {
        Self { id: id.into(), position, color: color.into(), display_name: None }
    }

    pub fn player(position: Vec2, color: impl Into<String>) -> Self {
        Self::new(PLAYER_ID, position, color)
    }
}
