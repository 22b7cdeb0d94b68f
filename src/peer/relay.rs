use std::collections::BTreeMap;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use glam::Vec2;
use log::{debug, info, warn};

use crate::avatar::{Avatar, MAX_NAME_LEN, PLAYER_ID};
use crate::chat::MAX_CHAT_LEN;
use crate::peer::channel::{PeerChannel, PeerEnvelope};
use crate::peer::protocol::{self, ChatPayload, Label, PeerMessage};

// ── Remote avatar table ─────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct RemoteEntry {
    avatar: Avatar,
    last_seen_tick: u64,
}

/// Remote peers' avatars keyed by peer id.  Last write wins per peer.
#[derive(Debug, Default)]
pub struct RemoteAvatars {
    entries: BTreeMap<String, RemoteEntry>,
}

impl RemoteAvatars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `peer`'s avatar.  Returns true if the peer is new.
    pub fn upsert(&mut self, peer: &str, position: Vec2, color: &str, tick: u64) -> bool {
        match self.entries.get_mut(peer) {
            Some(entry) => {
                entry.avatar.position = position;
                if entry.avatar.color != color {
                    entry.avatar.color = color.to_string();
                }
                entry.last_seen_tick = tick;
                false
            }
            None => {
                self.entries.insert(
                    peer.to_string(),
                    RemoteEntry { avatar: Avatar::new(peer, position, color), last_seen_tick: tick },
                );
                true
            }
        }
    }

    /// Drop every peer whose last update is more than `max_age` ticks old.
    /// Returns the evicted ids.
    pub fn evict_stale(&mut self, now: u64, max_age: u64) -> Vec<String> {
        let stale: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, e)| now.saturating_sub(e.last_seen_tick) > max_age)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &stale {
            self.entries.remove(id);
        }
        stale
    }

    pub fn get(&self, peer: &str) -> Option<&Avatar> {
        self.entries.get(peer).map(|e| &e.avatar)
    }

    pub fn set_display_name(&mut self, peer: &str, name: Option<String>) {
        if let Some(entry) = self.entries.get_mut(peer) {
            entry.avatar.display_name = name;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Avatar> {
        self.entries.values().map(|e| &e.avatar)
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

// ── Relay ───────────────────────────────────────────────────────────────────

/// Envelopes held between ticks.  Anything past this is dropped on arrival.
pub const INBOUND_CAPACITY: usize = 1024;

/// A chat message received this tick, with the scope it arrived under.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundChat {
    pub peer: String,
    /// `None` for global chat, `Some(zone)` for zone chat.
    pub zone: Option<String>,
    pub message: ChatPayload,
}

/// Outcome of draining the inbound queue.
#[derive(Debug, Default)]
pub struct InboundBatch {
    pub joined: Vec<String>,
    pub chats: Vec<InboundChat>,
    pub dropped: usize,
}

/// Publishes the local avatar every tick and folds inbound position updates
/// into the remote-avatar table.
///
/// The transport's receive handler only enqueues envelopes; they are applied
/// when the simulation thread calls [`PositionRelay::drain`].
pub struct PositionRelay {
    channel: Option<Box<dyn PeerChannel>>,
    inbound_tx: Sender<PeerEnvelope>,
    inbound_rx: Receiver<PeerEnvelope>,
    remotes: RemoteAvatars,
}

impl Default for PositionRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionRelay {
    pub fn new() -> Self {
        let (inbound_tx, inbound_rx) = bounded(INBOUND_CAPACITY);
        Self { channel: None, inbound_tx, inbound_rx, remotes: RemoteAvatars::new() }
    }

    pub fn connect(&mut self, mut channel: Box<dyn PeerChannel>) {
        let tx = self.inbound_tx.clone();
        channel.on_receive(Box::new(move |envelope| match tx.try_send(envelope) {
            Ok(()) => {}
            Err(TrySendError::Full(envelope)) => {
                debug!("inbound queue full; dropping `{}` from `{}`", envelope.label, envelope.from);
            }
            // Relay torn down; nothing left to deliver to.
            Err(TrySendError::Disconnected(_)) => {}
        }));
        info!("peer relay connected as `{}`", channel.local_id());
        self.channel = Some(channel);
    }

    pub fn disconnect(&mut self) {
        if let Some(channel) = self.channel.take() {
            info!("peer relay disconnected from `{}`", channel.local_id());
        }
    }

    pub fn is_connected(&self) -> bool {
        self.channel.as_ref().is_some_and(|c| c.is_connected())
    }

    pub fn local_id(&self) -> Option<&str> {
        self.channel.as_ref().map(|c| c.local_id())
    }

    pub fn remotes(&self) -> &RemoteAvatars {
        &self.remotes
    }

    pub fn remotes_mut(&mut self) -> &mut RemoteAvatars {
        &mut self.remotes
    }

    /// Broadcast `avatar`'s position.  No-op while disconnected.
    pub fn publish(&mut self, avatar: &Avatar) {
        let message = PeerMessage::PositionUpdate {
            x: avatar.position.x,
            y: avatar.position.y,
            color: avatar.color.clone(),
        };
        self.send(&Label::Position, &message);
    }

    /// Broadcast an arbitrary message under `label`.  Returns false if it
    /// could not be sent.
    pub fn send(&mut self, label: &Label, message: &PeerMessage) -> bool {
        let Some(channel) = self.channel.as_ref() else { return false };
        if !channel.is_connected() {
            return false;
        }
        let payload = match protocol::encode(message) {
            Ok(p) => p,
            Err(e) => {
                warn!("failed to encode peer message: {e}");
                return false;
            }
        };
        match channel.broadcast(&payload, &label.as_string()) {
            Ok(()) => true,
            Err(e) => {
                warn!("peer broadcast failed: {e}; dropping channel");
                self.channel = None;
                false
            }
        }
    }

    /// Apply every envelope queued since the last call.  Malformed payloads
    /// are logged and dropped.
    pub fn drain(&mut self, tick: u64) -> InboundBatch {
        let mut batch = InboundBatch::default();
        while let Ok(envelope) = self.inbound_rx.try_recv() {
            if envelope.from == PLAYER_ID || self.local_id() == Some(envelope.from.as_str()) {
                debug!("ignoring peer message claiming the local identity");
                batch.dropped += 1;
                continue;
            }
            if envelope.from.is_empty() || envelope.from.chars().count() > MAX_NAME_LEN {
                debug!("dropping message from a peer id of {} bytes", envelope.from.len());
                batch.dropped += 1;
                continue;
            }
            match protocol::decode(&envelope.label, &envelope.payload) {
                Ok((_, PeerMessage::PositionUpdate { x, y, color })) => {
                    if !(x.is_finite() && y.is_finite()) {
                        debug!("dropping non-finite position from `{}`", envelope.from);
                        batch.dropped += 1;
                        continue;
                    }
                    if self.remotes.upsert(&envelope.from, Vec2::new(x, y), &color, tick) {
                        info!("peer `{}` appeared", envelope.from);
                        batch.joined.push(envelope.from);
                    }
                }
                Ok((_, PeerMessage::Chat(message))) if message.text.chars().count() > MAX_CHAT_LEN => {
                    debug!("dropping {}-byte chat from `{}`", message.text.len(), envelope.from);
                    batch.dropped += 1;
                }
                Ok((label, PeerMessage::Chat(message))) => {
                    let zone = match label {
                        Label::ZoneChat(zone) => Some(zone),
                        _ => None,
                    };
                    batch.chats.push(InboundChat { peer: envelope.from, zone, message });
                }
                Err(e) => {
                    debug!("dropping `{}` message from `{}`: {e}", envelope.label, envelope.from);
                    batch.dropped += 1;
                }
            }
        }
        batch
    }

    /// Evict peers silent for more than `max_age` ticks.
    pub fn evict_stale(&mut self, now: u64, max_age: u64) -> Vec<String> {
        let evicted = self.remotes.evict_stale(now, max_age);
        for id in &evicted {
            info!("peer `{id}` went silent; removed");
        }
        evicted
    }
}
