pub mod channel;
pub mod protocol;
pub mod relay;

pub use channel::{LoopbackHub, LoopbackPeer, PeerChannel, PeerEnvelope, ReceiveHandler};
pub use protocol::{ChatPayload, Label, PeerMessage, GLOBAL_CHAT_LABEL, POSITION_LABEL};
pub use relay::{InboundBatch, InboundChat, PositionRelay, RemoteAvatars, INBOUND_CAPACITY};
