//! The per-tick simulation context.  Owns the world, the local avatar and every
//! collaborator the tick touches; the render loop drives it and reads it back
//! to build a frame.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;
use log::{debug, info};

use crate::avatar::Avatar;
use crate::camera::Viewport;
use crate::chat::{ChatComposer, ChatEntry, ChatLog, ChatMode};
use crate::conference::{ConferenceService, JoinTicket, VideoDesk, VideoOutcome};
use crate::config::SimConfig;
use crate::error::{ConferenceError, ConfigError};
use crate::identity::{display_label, DisplayNameResolver};
use crate::input::InputTracker;
use crate::motion;
use crate::notice::{NoticeBoard, NoticeLevel};
use crate::peer::{ChatPayload, InboundChat, Label, PeerChannel, PeerMessage, PositionRelay, RemoteAvatars};
use crate::world::{Room, World};
use crate::zone::{ZoneTracker, ZoneTransition};

/// What happened during one tick.
#[derive(Debug, Default)]
pub struct TickReport {
    pub tick: u64,
    pub transition: Option<ZoneTransition>,
    /// Peer whose avatar stopped the local move this tick.
    pub blocked_by: Option<String>,
    pub joined: Vec<String>,
    pub evicted: Vec<String>,
    pub dropped_messages: usize,
    pub video: Vec<VideoOutcome>,
}

pub struct Simulation {
    world: World,
    config: SimConfig,
    pub input: InputTracker,
    pub composer: ChatComposer,
    player: Avatar,
    velocity: Vec2,
    viewport: Viewport,
    zone: ZoneTracker,
    relay: PositionRelay,
    chat: ChatLog,
    chat_mode: ChatMode,
    notices: NoticeBoard,
    video: VideoDesk,
    active_call: Option<JoinTicket>,
    resolver: Option<Arc<dyn DisplayNameResolver>>,
    wallet_address: Option<String>,
    tick: u64,
}

impl Simulation {
    /// Spawn the player at `config.spawn` (clamped into the world) with a
    /// canvas of `canvas_width` × `canvas_height` pixels.
    pub fn new(world: World, config: SimConfig, canvas_width: f32, canvas_height: f32) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawn = world.clamp_avatar(Vec2::from(config.spawn), config.avatar_radius);
        let player = Avatar::player(spawn, config.player_color.clone());
        let mut viewport = Viewport::new(canvas_width, canvas_height);
        viewport.follow(spawn, &world);

        Ok(Self {
            world,
            config,
            input: InputTracker::new(),
            composer: ChatComposer::default(),
            player,
            velocity: Vec2::ZERO,
            viewport,
            zone: ZoneTracker::new(),
            relay: PositionRelay::new(),
            chat: ChatLog::default(),
            chat_mode: ChatMode::Global,
            notices: NoticeBoard::new(),
            video: VideoDesk::new(),
            active_call: None,
            resolver: None,
            wallet_address: None,
            tick: 0,
        })
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn world(&self) -> &World { &self.world }
    pub fn config(&self) -> &SimConfig { &self.config }
    pub fn player(&self) -> &Avatar { &self.player }
    pub fn velocity(&self) -> Vec2 { self.velocity }
    pub fn viewport(&self) -> &Viewport { &self.viewport }
    pub fn remotes(&self) -> &RemoteAvatars { self.relay.remotes() }
    pub fn chat(&self) -> &ChatLog { &self.chat }
    pub fn chat_mode(&self) -> ChatMode { self.chat_mode }
    pub fn notices(&self) -> &NoticeBoard { &self.notices }
    pub fn notices_mut(&mut self) -> &mut NoticeBoard { &mut self.notices }
    pub fn active_call(&self) -> Option<&JoinTicket> { self.active_call.as_ref() }
    pub fn is_video_pending(&self, room_id: &str) -> bool { self.video.is_pending(room_id) }
    pub fn tick_count(&self) -> u64 { self.tick }

    /// Room the player was in at the end of the last tick.
    pub fn current_zone(&self) -> Option<&Room> {
        self.zone.current().and_then(|id| self.world.room(id))
    }

    pub fn is_connected(&self) -> bool {
        self.relay.is_connected()
    }

    // ── Setup ───────────────────────────────────────────────────────────────

    pub fn connect(&mut self, channel: Box<dyn PeerChannel>) {
        self.relay.connect(channel);
    }

    pub fn disconnect(&mut self) {
        self.relay.disconnect();
    }

    pub fn set_resolver(&mut self, resolver: Arc<dyn DisplayNameResolver>) {
        self.resolver = Some(resolver);
    }

    pub fn set_wallet_address(&mut self, address: &str) {
        self.wallet_address = Some(address.to_string());
        self.player.display_name = Some(display_label(self.resolver.as_deref(), address));
    }

    /// Teleport the player, clamped into the world.  Velocity is reset.
    pub fn place_player(&mut self, position: Vec2) {
        self.player.position = self.world.clamp_avatar(position, self.config.avatar_radius);
        self.velocity = Vec2::ZERO;
        self.viewport.follow(self.player.position, &self.world);
    }

    /// Canvas resized; the viewport is recomputed immediately.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.resize(width, height, self.player.position, &self.world);
    }

    // ── Tick ────────────────────────────────────────────────────────────────

    /// Advance by `dt_seconds` of wall time.
    pub fn tick(&mut self, dt_seconds: f32) -> TickReport {
        let ratio = self.config.frame_ratio(dt_seconds);
        self.step(ratio)
    }

    /// Advance by `frame_ratio` reference frames.
    ///
    /// Order within a tick: apply queued peer messages, integrate motion,
    /// publish the new position, resolve the zone, then move the camera.
    pub fn step(&mut self, frame_ratio: f32) -> TickReport {
        self.tick += 1;
        let mut report = TickReport { tick: self.tick, ..Default::default() };

        let batch = self.relay.drain(self.tick);
        report.joined = batch.joined;
        report.dropped_messages = batch.dropped;
        for chat in batch.chats {
            self.receive_chat(chat);
        }
        report.video = self.collect_video();

        let held = self.input.held_directions();
        let others = self.relay.remotes().iter().map(|a| (a.id.as_str(), a.position));
        let step = motion::integrate(
            held,
            self.velocity,
            self.player.position,
            frame_ratio,
            &self.world,
            others,
            &self.config,
        );
        self.player.position = step.position;
        self.velocity = step.velocity;
        if let Some(id) = &step.blocked_by {
            debug!("move blocked by `{id}`");
        }
        report.blocked_by = step.blocked_by;

        self.relay.publish(&self.player);

        report.transition = self.zone.update(&self.world, self.player.position);
        if let Some(t) = &report.transition {
            info!(
                "zone change: {} -> {}",
                t.from.as_deref().unwrap_or("(none)"),
                t.to.as_deref().unwrap_or("(none)")
            );
            if t.to.is_none() && self.chat_mode == ChatMode::Zone {
                self.chat_mode = ChatMode::Global;
            }
        }

        self.viewport.follow(self.player.position, &self.world);

        report.evicted = self.relay.evict_stale(self.tick, self.config.stale_after_ticks);
        self.notices.expire(self.tick);
        report
    }

    // ── Chat ────────────────────────────────────────────────────────────────

    /// Switch between global and zone chat.  Zone chat needs a current zone.
    pub fn set_chat_mode(&mut self, mode: ChatMode) -> bool {
        if mode == ChatMode::Zone && self.zone.current().is_none() {
            return false;
        }
        self.chat_mode = mode;
        true
    }

    /// Send `text` in the current chat mode and echo it locally.  Blank text
    /// is ignored.
    pub fn send_chat(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let zone = match self.chat_mode {
            ChatMode::Global => None,
            ChatMode::Zone => match self.zone.current() {
                Some(z) => Some(z.to_string()),
                None => return false,
            },
        };
        let label = match &zone {
            Some(z) => Label::ZoneChat(z.clone()),
            None => Label::GlobalChat,
        };
        let timestamp = now_millis();
        let message = PeerMessage::Chat(ChatPayload {
            text: text.to_string(),
            from: self.relay.local_id().unwrap_or("me").to_string(),
            timestamp,
            wallet_address: self.wallet_address.clone().unwrap_or_default(),
            is_zone_chat: zone.is_some(),
        });
        let sent = self.relay.send(&label, &message);
        if !sent {
            debug!("chat not delivered; peer channel unavailable");
        }

        self.chat.push(ChatEntry {
            sender: self.player.display_name.clone().unwrap_or_else(|| "You".to_string()),
            text: text.to_string(),
            timestamp,
            zone,
            mine: true,
        });
        true
    }

    /// Open the chat box.  Held movement keys are released.
    pub fn begin_compose(&mut self) {
        self.input.release_all();
        self.composer.open();
    }

    /// Send whatever is in the chat box and close it.
    pub fn submit_compose(&mut self) -> bool {
        match self.composer.take() {
            Some(text) => self.send_chat(&text),
            None => false,
        }
    }

    fn receive_chat(&mut self, chat: InboundChat) {
        let InboundChat { peer, zone, message } = chat;
        let sender = if message.wallet_address.is_empty() {
            peer.clone()
        } else {
            let name = display_label(self.resolver.as_deref(), &message.wallet_address);
            self.relay.remotes_mut().set_display_name(&peer, Some(name.clone()));
            name
        };
        self.chat.push(ChatEntry {
            sender,
            text: message.text,
            timestamp: message.timestamp,
            zone,
            mine: false,
        });
    }

    // ── Video ───────────────────────────────────────────────────────────────

    /// Start video in the current zone on a worker thread.  The outcome is
    /// applied on a later tick.
    pub fn request_video(&mut self, service: Arc<dyn ConferenceService>) -> bool {
        let Some(room_id) = self.zone.current().map(str::to_string) else {
            self.post_notice("Video", "Walk into a stage or video room first.", NoticeLevel::Info);
            return false;
        };
        match self.video.request(&self.world, &room_id, service) {
            Ok(started) => started,
            Err(e) => {
                self.post_notice("Video", &e.to_string(), NoticeLevel::Info);
                false
            }
        }
    }

    /// Start video in the current zone and wait for the result.
    pub fn activate_video(&mut self, service: &dyn ConferenceService) -> Result<JoinTicket, ConferenceError> {
        let room_id = self
            .zone
            .current()
            .map(str::to_string)
            .ok_or_else(|| ConferenceError::NotConferenceRoom("(none)".into()))?;
        let result = crate::conference::activate(&mut self.world, &room_id, service);
        self.apply_video_result(&room_id, &result);
        result
    }

    /// Block until every in-flight video request has finished.
    pub fn wait_for_video(&mut self) -> Vec<VideoOutcome> {
        let mut done = Vec::new();
        while let Some(outcome) = self.video.wait(&mut self.world) {
            done.push(outcome);
        }
        for outcome in &done {
            self.apply_video_result(&outcome.room_id, &outcome.result);
        }
        done
    }

    fn collect_video(&mut self) -> Vec<VideoOutcome> {
        let done = self.video.poll(&mut self.world);
        for outcome in &done {
            self.apply_video_result(&outcome.room_id, &outcome.result);
        }
        done
    }

    fn apply_video_result(&mut self, room_id: &str, result: &Result<JoinTicket, ConferenceError>) {
        match result {
            Ok(ticket) => {
                let body = format!("Joined {} in {room_id}", ticket.conference_id);
                self.post_notice("Video ready", &body, NoticeLevel::Info);
                self.active_call = Some(ticket.clone());
            }
            Err(e) => self.post_notice("Video failed", &e.to_string(), NoticeLevel::Error),
        }
    }

    pub fn leave_call(&mut self) -> Option<JoinTicket> {
        self.active_call.take()
    }

    fn post_notice(&mut self, title: &str, body: &str, level: NoticeLevel) {
        self.notices.push(title, body, level, self.tick, self.config.notice_ticks);
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
