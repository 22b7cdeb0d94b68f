use thiserror::Error;

/// Invalid tuning values or an unreadable config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    #[error("world size must be positive, got {width}x{height}")]
    InvalidSize { width: f32, height: f32 },

    #[error("duplicate room id `{0}`")]
    DuplicateRoomId(String),

    #[error("room `{0}` lies entirely outside the world")]
    RoomOutsideWorld(String),

    #[error("unknown room id `{0}`")]
    UnknownRoom(String),

    #[error("room `{room}` is already linked to conference `{conference}`")]
    AlreadyLinked { room: String, conference: String },
}

/// Failures at the video-conference service boundary.  Surfaced to the user
/// as a notice; never fatal to the simulation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConferenceError {
    #[error("failed to provision conference room: {0}")]
    Provisioning(String),

    #[error("failed to obtain join token: {0}")]
    Auth(String),

    #[error("room `{0}` does not host video")]
    NotConferenceRoom(String),
}

/// A peer payload that could not be routed or decoded.  Always dropped.
#[derive(Debug, Error)]
pub enum PeerMessageError {
    #[error("unknown message label `{0}`")]
    UnknownLabel(String),

    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("payload type does not match label `{0}`")]
    LabelMismatch(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum PeerSendError {
    #[error("peer channel is disconnected")]
    Disconnected,
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// No window surface / GPU context could be obtained.  The render loop
    /// simply never starts.
    #[error("render surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}
