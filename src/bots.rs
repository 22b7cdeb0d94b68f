//! Wandering mock peers for the demo binary.  Each bot runs on its own
//! thread and talks to the loopback hub in the real wire format.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use glam::Vec2;
use log::{debug, warn};

use crate::peer::protocol::{self, ChatPayload, Label, PeerMessage};
use crate::peer::{LoopbackHub, PeerChannel};
use crate::world::World;

const BOT_COLORS: [&str; 5] = ["blue", "green", "orange", "purple", "cyan"];
const TICK: Duration = Duration::from_millis(16);
const CHAT_EVERY: u64 = 600;

/// An elliptical lap around the centre of one room.
#[derive(Clone, Debug, PartialEq)]
pub struct BotRoute {
    center: Vec2,
    radius: Vec2,
    period_ticks: f32,
    phase: f32,
    room_id: String,
}

impl BotRoute {
    /// Route for bot number `index` (1-based); bots are spread over the rooms
    /// in list order.
    pub fn for_index(index: usize, world: &World) -> Self {
        let phase = index as f32 * 1.3;
        match world.rooms().get(index.saturating_sub(1) % world.rooms().len().max(1)) {
            Some(room) => Self {
                center: room.rect.center(),
                radius: Vec2::new(room.rect.width, room.rect.height) / 3.0,
                period_ticks: 600.0 + 120.0 * index as f32,
                phase,
                room_id: room.id.clone(),
            },
            None => Self {
                center: world.bounds().center(),
                radius: Vec2::splat(100.0),
                period_ticks: 600.0,
                phase,
                room_id: String::new(),
            },
        }
    }

    pub fn position_at(&self, tick: u64) -> Vec2 {
        let t = tick as f32 / self.period_ticks * std::f32::consts::TAU + self.phase;
        self.center + Vec2::new(t.cos(), t.sin()) * self.radius
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }
}

/// Demo wallet address for bot `index`.
pub fn bot_address(index: usize) -> String {
    format!("0x{:040x}", 0xb07_0000 + index)
}

pub fn bot_id(index: usize) -> String {
    format!("bot{index}")
}

/// Running bots.  Dropping the swarm stops them.
pub struct BotSwarm {
    stop: Arc<AtomicBool>,
    handles: Vec<JoinHandle<()>>,
}

impl BotSwarm {
    pub fn spawn(hub: &LoopbackHub, count: usize, world: &World) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let handles = (1..=count)
            .map(|i| {
                let peer = hub.join(bot_id(i));
                let route = BotRoute::for_index(i, world);
                let stop = Arc::clone(&stop);
                thread::spawn(move || run_bot(i, peer, route, stop))
            })
            .collect();
        Self { stop, handles }
    }

    pub fn len(&self) -> usize { self.handles.len() }
    pub fn is_empty(&self) -> bool { self.handles.is_empty() }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                warn!("bot thread panicked");
            }
        }
    }
}

impl Drop for BotSwarm {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_bot(index: usize, peer: impl PeerChannel, route: BotRoute, stop: Arc<AtomicBool>) {
    let color = BOT_COLORS[(index - 1) % BOT_COLORS.len()];
    let mut tick = 0u64;
    while !stop.load(Ordering::Relaxed) && peer.is_connected() {
        let p = route.position_at(tick);
        send(&peer, &Label::Position, &PeerMessage::PositionUpdate { x: p.x, y: p.y, color: color.to_string() });

        if tick % CHAT_EVERY == (index as u64 * 97) % CHAT_EVERY {
            let zone = tick / CHAT_EVERY % 2 == 1 && !route.room_id().is_empty();
            let label = if zone { Label::ZoneChat(route.room_id().to_string()) } else { Label::GlobalChat };
            let text = if zone { "anyone else here?" } else { "gm everyone" };
            send(
                &peer,
                &label,
                &PeerMessage::Chat(ChatPayload {
                    text: text.to_string(),
                    from: peer.local_id().to_string(),
                    timestamp: tick,
                    wallet_address: bot_address(index),
                    is_zone_chat: zone,
                }),
            );
        }

        tick += 1;
        thread::sleep(TICK);
    }
    debug!("{} stopped", peer.local_id());
}

fn send(peer: &impl PeerChannel, label: &Label, message: &PeerMessage) {
    let sent = protocol::encode(message)
        .map_err(|e| e.to_string())
        .and_then(|payload| peer.broadcast(&payload, &label.as_string()).map_err(|e| e.to_string()));
    if let Err(e) = sent {
        debug!("{}: {e}", peer.local_id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_stay_inside_their_room() {
        let world = World::default_layout();
        for i in 1..=world.rooms().len() {
            let route = BotRoute::for_index(i, &world);
            let room = world.room(route.room_id()).unwrap();
            for tick in (0..2000).step_by(37) {
                assert!(room.rect.contains(route.position_at(tick)), "bot{i} left {}", room.id);
            }
        }
    }

    #[test]
    fn addresses_are_forty_hex_digits() {
        let a = bot_address(3);
        assert_eq!(a.len(), 42);
        assert!(a.starts_with("0x"));
    }
}
