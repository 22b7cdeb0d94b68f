//! Video-conference rooms bound to world rooms.
//!
//! The conference service is an external collaborator reached through
//! [`ConferenceService`].  A world room hosting video is linked to exactly
//! one conference room: the first activation provisions and links it, every
//! later activation joins the existing link.  Service calls may block, so
//! [`VideoDesk`] runs them on a worker thread and hands results back to the
//! simulation thread over a channel.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{info, warn};

use crate::error::{ConferenceError, WorldError};
use crate::world::World;

pub trait ConferenceService: Send + Sync {
    /// Provision a new conference room and return its id.
    fn create_room(&self) -> Result<String, ConferenceError>;

    /// Obtain a join token for `conference_id`.
    fn get_token(&self, conference_id: &str) -> Result<String, ConferenceError>;
}

/// Everything a client needs to join a call.
#[derive(Clone, Debug, PartialEq)]
pub struct JoinTicket {
    /// World room the call belongs to; `None` when joined by code.
    pub room_id: Option<String>,
    pub conference_id: String,
    pub token: String,
    /// True when this ticket provisioned the conference room.
    pub provisioned: bool,
}

/// What activating video in a room will do.
#[derive(Clone, Debug, PartialEq)]
pub enum VideoPlan {
    Join { room_id: String, conference_id: String },
    Provision { room_id: String },
}

impl VideoPlan {
    pub fn room_id(&self) -> &str {
        match self {
            VideoPlan::Join { room_id, .. } | VideoPlan::Provision { room_id } => room_id,
        }
    }

    /// Talk to the service.  Does not touch the world; see [`commit`].
    pub fn execute(&self, service: &dyn ConferenceService) -> Result<JoinTicket, ConferenceError> {
        match self {
            VideoPlan::Join { room_id, conference_id } => Ok(JoinTicket {
                room_id: Some(room_id.clone()),
                conference_id: conference_id.clone(),
                token: fetch_token(service, conference_id)?,
                provisioned: false,
            }),
            VideoPlan::Provision { room_id } => {
                let conference_id = service.create_room()?;
                if conference_id.trim().is_empty() {
                    return Err(ConferenceError::Provisioning("service returned an empty room id".into()));
                }
                let token = fetch_token(service, &conference_id)?;
                Ok(JoinTicket { room_id: Some(room_id.clone()), conference_id, token, provisioned: true })
            }
        }
    }
}

/// Decide whether `room_id` needs a new conference room or already has one.
pub fn plan_activation(world: &World, room_id: &str) -> Result<VideoPlan, ConferenceError> {
    let room = world
        .room(room_id)
        .ok_or_else(|| ConferenceError::NotConferenceRoom(room_id.to_string()))?;
    if !room.kind.hosts_video() {
        return Err(ConferenceError::NotConferenceRoom(room_id.to_string()));
    }
    Ok(match room.linked_conference() {
        Some(conference_id) => VideoPlan::Join {
            room_id: room_id.to_string(),
            conference_id: conference_id.to_string(),
        },
        None => VideoPlan::Provision { room_id: room_id.to_string() },
    })
}

/// Record a freshly provisioned link on the world.  Join tickets are a no-op.
pub fn commit(world: &mut World, ticket: &JoinTicket) -> Result<(), ConferenceError> {
    let (true, Some(room_id)) = (ticket.provisioned, ticket.room_id.as_deref()) else {
        return Ok(());
    };
    world.link_conference(room_id, &ticket.conference_id).map_err(|e| match e {
        WorldError::AlreadyLinked { room, conference } => ConferenceError::Provisioning(format!(
            "room `{room}` was linked to `{conference}` while provisioning"
        )),
        other => ConferenceError::Provisioning(other.to_string()),
    })
}

/// Plan, execute and commit in one blocking call.
pub fn activate(world: &mut World, room_id: &str, service: &dyn ConferenceService) -> Result<JoinTicket, ConferenceError> {
    let plan = plan_activation(world, room_id)?;
    let ticket = plan.execute(service)?;
    commit(world, &ticket)?;
    Ok(ticket)
}

/// Join an arbitrary conference room by its id.
pub fn join_by_code(code: &str, service: &dyn ConferenceService) -> Result<JoinTicket, ConferenceError> {
    let code = code.trim();
    let token = fetch_token(service, code)?;
    Ok(JoinTicket { room_id: None, conference_id: code.to_string(), token, provisioned: false })
}

fn fetch_token(service: &dyn ConferenceService, conference_id: &str) -> Result<String, ConferenceError> {
    if conference_id.trim().is_empty() {
        return Err(ConferenceError::Auth("room id is required".into()));
    }
    service.get_token(conference_id)
}

// ── Background activation ───────────────────────────────────────────────────

/// Result of a background activation, delivered on the simulation thread.
#[derive(Debug)]
pub struct VideoOutcome {
    pub room_id: String,
    pub result: Result<JoinTicket, ConferenceError>,
}

/// Runs conference calls off the simulation thread.  At most one request per
/// room is in flight at a time.
pub struct VideoDesk {
    tx: Sender<VideoOutcome>,
    rx: Receiver<VideoOutcome>,
    pending: HashSet<String>,
}

impl Default for VideoDesk {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoDesk {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx, pending: HashSet::new() }
    }

    pub fn is_pending(&self, room_id: &str) -> bool {
        self.pending.contains(room_id)
    }

    /// Start activating video in `room_id`.  Returns false if a request for
    /// the room is already running.
    pub fn request(
        &mut self,
        world: &World,
        room_id: &str,
        service: Arc<dyn ConferenceService>,
    ) -> Result<bool, ConferenceError> {
        if self.pending.contains(room_id) {
            return Ok(false);
        }
        let plan = plan_activation(world, room_id)?;
        self.pending.insert(room_id.to_string());

        let tx = self.tx.clone();
        thread::spawn(move || {
            // A panicking service must still release the room's pending slot.
            let result = panic::catch_unwind(AssertUnwindSafe(|| plan.execute(service.as_ref())))
                .unwrap_or_else(|_| Err(ConferenceError::Provisioning("conference service panicked".into())));
            // The desk may be gone if the app is shutting down.
            let _ = tx.send(VideoOutcome { room_id: plan.room_id().to_string(), result });
        });
        Ok(true)
    }

    /// Collect finished requests and commit new links to `world`.
    pub fn poll(&mut self, world: &mut World) -> Vec<VideoOutcome> {
        let mut done = Vec::new();
        while let Ok(outcome) = self.rx.try_recv() {
            done.push(self.finish(outcome, world));
        }
        done
    }

    /// Block for the next finished request.  Empty when nothing is pending.
    pub fn wait(&mut self, world: &mut World) -> Option<VideoOutcome> {
        if self.pending.is_empty() {
            return None;
        }
        let outcome = self.rx.recv().ok()?;
        Some(self.finish(outcome, world))
    }

    fn finish(&mut self, mut outcome: VideoOutcome, world: &mut World) -> VideoOutcome {
        self.pending.remove(&outcome.room_id);
        if let Ok(ticket) = &outcome.result {
            if let Err(e) = commit(world, ticket) {
                outcome.result = Err(e);
            }
        }
        match &outcome.result {
            Ok(ticket) => info!("video ready in `{}` (conference `{}`)", outcome.room_id, ticket.conference_id),
            Err(e) => warn!("video activation in `{}` failed: {e}", outcome.room_id),
        }
        outcome
    }
}

// ── Offline service ─────────────────────────────────────────────────────────

/// In-process conference service with deterministic ids.  Used when no real
/// service is configured and in tests.
#[derive(Debug, Default)]
pub struct OfflineConference {
    next: AtomicU64,
}

impl OfflineConference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rooms_created(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}

impl ConferenceService for OfflineConference {
    fn create_room(&self) -> Result<String, ConferenceError> {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("room-{n:04}"))
    }

    fn get_token(&self, conference_id: &str) -> Result<String, ConferenceError> {
        Ok(format!("token:{conference_id}"))
    }
}
