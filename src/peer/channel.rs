//! The best-effort broadcast primitive the relay depends on, plus an
//! in-process implementation used by tests and the demo binary.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, info};
use parking_lot::Mutex;

use crate::error::PeerSendError;

/// One message as received from a peer.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerEnvelope {
    pub from: String,
    pub label: String,
    pub payload: String,
}

/// Called by the transport for every inbound message, on whatever thread
/// the transport delivers from.
pub type ReceiveHandler = Box<dyn FnMut(PeerEnvelope) + Send>;

/// Broadcast-to-everyone data channel.  Delivery is best effort and
/// unordered across peers.
pub trait PeerChannel: Send {
    fn local_id(&self) -> &str;
    fn is_connected(&self) -> bool;
    fn broadcast(&self, payload: &str, label: &str) -> Result<(), PeerSendError>;
    /// Install the inbound handler, replacing any previous one.
    fn on_receive(&mut self, handler: ReceiveHandler);
}

// ── Loopback hub ────────────────────────────────────────────────────────────

#[derive(Default)]
struct HubInner {
    members: BTreeMap<String, Option<ReceiveHandler>>,
}

/// In-process peer network: every member receives every other member's
/// broadcasts synchronously on the sender's thread.
#[derive(Clone, Default)]
pub struct LoopbackHub {
    inner: Arc<Mutex<HubInner>>,
}

impl LoopbackHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the hub as `id`.  Ids must be unique within a hub.
    pub fn join(&self, id: impl Into<String>) -> LoopbackPeer {
        let id = id.into();
        self.inner.lock().members.insert(id.clone(), None);
        info!("peer `{id}` joined loopback hub");
        LoopbackPeer { id, inner: Arc::clone(&self.inner) }
    }

    pub fn member_count(&self) -> usize {
        self.inner.lock().members.len()
    }
}

/// A member's handle on the hub.  Dropping it leaves the hub.
pub struct LoopbackPeer {
    id: String,
    inner: Arc<Mutex<HubInner>>,
}

impl LoopbackPeer {
    pub fn leave(&self) {
        if self.inner.lock().members.remove(&self.id).is_some() {
            info!("peer `{}` left loopback hub", self.id);
        }
    }
}

impl PeerChannel for LoopbackPeer {
    fn local_id(&self) -> &str {
        &self.id
    }

    fn is_connected(&self) -> bool {
        self.inner.lock().members.contains_key(&self.id)
    }

    fn broadcast(&self, payload: &str, label: &str) -> Result<(), PeerSendError> {
        let mut inner = self.inner.lock();
        if !inner.members.contains_key(&self.id) {
            return Err(PeerSendError::Disconnected);
        }
        for (id, handler) in inner.members.iter_mut() {
            if *id == self.id {
                continue;
            }
            match handler {
                Some(handler) => handler(PeerEnvelope {
                    from: self.id.clone(),
                    label: label.to_string(),
                    payload: payload.to_string(),
                }),
                None => debug!("peer `{id}` has no receive handler; dropping `{label}`"),
            }
        }
        Ok(())
    }

    fn on_receive(&mut self, handler: ReceiveHandler) {
        if let Some(slot) = self.inner.lock().members.get_mut(&self.id) {
            *slot = Some(handler);
        }
    }
}

impl Drop for LoopbackPeer {
    fn drop(&mut self) {
        self.leave();
    }
}
