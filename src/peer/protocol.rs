//! Wire format for everything sent over the peer data channel.
//!
//! Every payload is a JSON object tagged by `"type"` and travels under a
//! routing label:
//!
//! | Label          | Payload `type`    | Scope                      |
//! |----------------|-------------------|----------------------------|
//! | `position`     | `positionUpdate`  | every peer, every tick     |
//! | `chat:global`  | `chat`            | global chat                |
//! | `chat:<zone>`  | `chat`            | peers in room `<zone>`     |

use serde::{Deserialize, Serialize};

use crate::error::PeerMessageError;

pub const POSITION_LABEL: &str = "position";
pub const GLOBAL_CHAT_LABEL: &str = "chat:global";
const CHAT_PREFIX: &str = "chat:";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PeerMessage {
    PositionUpdate { x: f32, y: f32, color: String },
    Chat(ChatPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    pub text: String,
    pub from: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub wallet_address: String,
    pub is_zone_chat: bool,
}

/// Routing label attached to each broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    Position,
    GlobalChat,
    ZoneChat(String),
}

impl Label {
    pub fn parse(label: &str) -> Result<Self, PeerMessageError> {
        match label {
            POSITION_LABEL => Ok(Label::Position),
            GLOBAL_CHAT_LABEL => Ok(Label::GlobalChat),
            _ => match label.strip_prefix(CHAT_PREFIX) {
                Some(zone) if !zone.is_empty() => Ok(Label::ZoneChat(zone.to_string())),
                _ => Err(PeerMessageError::UnknownLabel(label.to_string())),
            },
        }
    }

    pub fn as_string(&self) -> String {
        match self {
            Label::Position => POSITION_LABEL.to_string(),
            Label::GlobalChat => GLOBAL_CHAT_LABEL.to_string(),
            Label::ZoneChat(zone) => format!("{CHAT_PREFIX}{zone}"),
        }
    }
}

/// Serialize a message to its JSON payload string.
pub fn encode(message: &PeerMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(message)
}

/// Parse a labelled payload, rejecting payloads whose type does not belong
/// under their label.
pub fn decode(label: &str, payload: &str) -> Result<(Label, PeerMessage), PeerMessageError> {
    let label = Label::parse(label)?;
    let message: PeerMessage = serde_json::from_str(payload)?;
    let matches = matches!(
        (&label, &message),
        (Label::Position, PeerMessage::PositionUpdate { .. })
            | (Label::GlobalChat | Label::ZoneChat(_), PeerMessage::Chat(_))
    );
    if !matches {
        return Err(PeerMessageError::LabelMismatch(label.as_string()));
    }
    Ok((label, message))
}
