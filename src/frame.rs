//! Per-frame draw list: everything the renderer needs for one frame, built
//! from a read-only view of the simulation.
//!
//! Two layers are produced.  The world layer is in world coordinates and is
//! drawn through the viewport camera; the screen layer is in canvas pixels
//! and stays fixed (minimap, zone overlay, notices, chat).

use glam::Vec2;

use crate::camera::Viewport;
use crate::chat::ChatMode;
use crate::engine::Color;
use crate::geometry::Rect;
use crate::notice::NoticeLevel;
use crate::renderer::glyphs::{text_height, text_width};
use crate::sim::Simulation;
use crate::world::Room;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextAlign {
    /// `origin` is the top-left corner of the text.
    Left,
    /// `origin` is the centre of the text.
    Center,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Fill { rect: Rect, color: Color },
    /// Outline drawn on the inside of `rect`.
    Stroke { rect: Rect, width: f32, color: Color },
    Line { from: Vec2, to: Vec2, width: f32, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    Text { origin: Vec2, text: String, scale: f32, color: Color, align: TextAlign },
}

#[derive(Clone, Debug)]
pub struct DrawList {
    pub clear: Color,
    pub viewport: Viewport,
    pub world: Vec<Shape>,
    pub screen: Vec<Shape>,
}

impl DrawList {
    /// Every string drawn on either layer, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.world.iter().chain(self.screen.iter()).filter_map(|s| match s {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

// ── Palette ─────────────────────────────────────────────────────────────────

const BACKGROUND: Color = Color([0.09, 0.09, 0.12, 1.0]);
const GRID: Color = Color([0.78, 0.78, 0.78, 0.2]);
const ROOM_FILL_ALPHA: f32 = 0.25;
const HIGHLIGHT: Color = Color([1.0, 0.85, 0.2, 1.0]);
const MINIMAP_BG: Color = Color([0.78, 0.78, 0.78, 0.5]);
const PANEL: Color = Color([0.05, 0.05, 0.08, 0.85]);
const ERROR_PANEL: Color = Color([0.45, 0.0, 0.0, 0.9]);
const MUTED: Color = Color([0.75, 0.75, 0.8, 1.0]);

const MARGIN: f32 = 16.0;
const TEXT_SCALE: f32 = 2.0;
const LINE_GAP: f32 = 6.0;
const CHAT_LINES: usize = 6;

// ── FrameBuilder ────────────────────────────────────────────────────────────

/// Builds the [`DrawList`] for the current simulation state.
pub struct FrameBuilder;

impl FrameBuilder {
    /// Draw order: grid, rooms (fill, label, highlight), local avatar, remote
    /// avatars, then the screen layer (minimap, zone overlay, notices, chat).
    pub fn build(sim: &Simulation) -> DrawList {
        let viewport = *sim.viewport();
        let mut list = DrawList { clear: BACKGROUND, viewport, world: Vec::new(), screen: Vec::new() };

        grid(&mut list.world, sim);
        rooms(&mut list.world, sim);
        avatars(&mut list.world, sim);

        minimap(&mut list.screen, sim);
        status(&mut list.screen, sim);
        if let Some(room) = sim.current_zone() {
            zone_card(&mut list.screen, sim, room);
        }
        notices(&mut list.screen, sim);
        chat(&mut list.screen, sim);
        list
    }
}

fn grid(out: &mut Vec<Shape>, sim: &Simulation) {
    let tile = sim.config().tile_size;
    let vp = sim.viewport();
    let world = sim.world();
    let right = (vp.x + vp.width).min(world.width());
    let bottom = (vp.y + vp.height).min(world.height());

    // Line indices, not an accumulated coordinate.
    let lines = |from: f32, to: f32| (from / tile).floor() as i64..=(to / tile).floor() as i64;
    for i in lines(vp.x, right) {
        let x = i as f32 * tile;
        out.push(Shape::Line { from: Vec2::new(x, vp.y), to: Vec2::new(x, bottom), width: 1.0, color: GRID });
    }
    for i in lines(vp.y, bottom) {
        let y = i as f32 * tile;
        out.push(Shape::Line { from: Vec2::new(vp.x, y), to: Vec2::new(right, y), width: 1.0, color: GRID });
    }
}

fn room_color(room: &Room) -> Color {
    room.theme.as_ref().map_or(Color::GRAY, |t| Color::from_css(&t.color))
}

fn rooms(out: &mut Vec<Shape>, sim: &Simulation) {
    let current = sim.current_zone().map(|r| r.id.as_str());
    for room in sim.world().rooms() {
        let color = room_color(room);
        out.push(Shape::Fill { rect: room.rect, color: color.with_alpha(ROOM_FILL_ALPHA) });
        out.push(Shape::Text {
            origin: room.rect.center(),
            text: room.name.clone(),
            scale: 3.0,
            color: Color::WHITE,
            align: TextAlign::Center,
        });
        if current == Some(room.id.as_str()) {
            out.push(Shape::Stroke { rect: room.rect, width: 3.0, color: HIGHLIGHT });
        }
    }
}

fn avatars(out: &mut Vec<Shape>, sim: &Simulation) {
    let r = sim.config().avatar_radius;
    let player = sim.player();
    out.push(Shape::Circle { center: player.position, radius: r, color: Color::from_css(&player.color) });

    for remote in sim.remotes().iter() {
        out.push(Shape::Circle { center: remote.position, radius: r, color: Color::from_css(&remote.color) });
        let name = remote.display_name.as_deref().unwrap_or(&remote.id);
        out.push(Shape::Text {
            origin: remote.position - Vec2::new(0.0, r + 10.0),
            text: name.to_string(),
            scale: 1.5,
            color: Color::WHITE,
            align: TextAlign::Center,
        });
    }
}

/// Scale that fits the whole world into a `size` × `size` square.
pub fn minimap_scale(size: f32, world_width: f32, world_height: f32) -> f32 {
    (size / world_width).min(size / world_height)
}

/// Top-left corner of the minimap on a canvas `canvas_width` wide.
pub fn minimap_origin(canvas_width: f32, size: f32) -> Vec2 {
    Vec2::new(canvas_width - size - MARGIN, MARGIN)
}

fn minimap(out: &mut Vec<Shape>, sim: &Simulation) {
    let world = sim.world();
    let size = sim.config().minimap_size;
    let scale = minimap_scale(size, world.width(), world.height());
    let origin = minimap_origin(sim.viewport().width, size);
    let to_map = |r: Rect| r.scaled(scale).translated(origin);

    out.push(Shape::Fill { rect: to_map(world.bounds()), color: MINIMAP_BG });
    for room in world.rooms() {
        out.push(Shape::Fill { rect: to_map(room.rect), color: room_color(room).with_alpha(0.6) });
    }

    let vp = sim.viewport();
    let visible = Rect::new(vp.x, vp.y, vp.width.min(world.width()), vp.height.min(world.height()));
    out.push(Shape::Stroke { rect: to_map(visible), width: 1.0, color: Color::WHITE });

    for remote in sim.remotes().iter() {
        out.push(Shape::Circle {
            center: origin + remote.position * scale,
            radius: 2.0,
            color: Color::from_css(&remote.color),
        });
    }
    out.push(Shape::Circle { center: origin + sim.player().position * scale, radius: 3.0, color: Color::YELLOW });
}

fn status(out: &mut Vec<Shape>, sim: &Simulation) {
    let size = sim.config().minimap_size;
    let origin = minimap_origin(sim.viewport().width, size);
    let mut y = origin.y + size + LINE_GAP;

    let peers = if sim.is_connected() {
        format!("PEERS: {}", sim.remotes().len())
    } else {
        "OFFLINE".to_string()
    };
    let mut lines = vec![peers];
    if let Some(call) = sim.active_call() {
        lines.push(format!("IN CALL: {}", call.conference_id));
    }
    for line in lines {
        out.push(Shape::Text {
            origin: Vec2::new(origin.x, y),
            text: line,
            scale: TEXT_SCALE,
            color: MUTED,
            align: TextAlign::Left,
        });
        y += text_height(TEXT_SCALE) + LINE_GAP;
    }
}

/// Name, kind, description and the video hint for the room the player is in.
fn zone_card(out: &mut Vec<Shape>, sim: &Simulation, room: &Room) {
    let mut lines: Vec<(String, f32, Color)> = vec![
        (room.name.clone(), 3.0, Color::WHITE),
        (room.kind.label().to_uppercase(), TEXT_SCALE, room_color(room)),
    ];
    if let Some(desc) = &room.description {
        lines.push((desc.clone(), TEXT_SCALE, MUTED));
    }
    if room.kind.hosts_video() {
        let hint = if sim.is_video_pending(&room.id) {
            "CONNECTING VIDEO..."
        } else if room.linked_conference().is_some() {
            "V: JOIN VIDEO"
        } else {
            "V: START VIDEO"
        };
        lines.push((hint.to_string(), TEXT_SCALE, HIGHLIGHT));
    }

    let width = lines.iter().map(|(t, s, _)| text_width(t, *s)).fold(0.0, f32::max) + 2.0 * MARGIN;
    let height = lines.iter().map(|(_, s, _)| text_height(*s) + LINE_GAP).sum::<f32>() - LINE_GAP + 2.0 * MARGIN;
    let vp = sim.viewport();
    let card = Rect::new((vp.width - width) / 2.0, vp.height - height - MARGIN, width, height);

    out.push(Shape::Fill { rect: card, color: PANEL });
    out.push(Shape::Stroke { rect: card, width: 2.0, color: room_color(room) });
    let mut y = card.y + MARGIN;
    for (text, scale, color) in lines {
        out.push(Shape::Text { origin: Vec2::new(card.x + MARGIN, y), text, scale, color, align: TextAlign::Left });
        y += text_height(scale) + LINE_GAP;
    }
}

fn notices(out: &mut Vec<Shape>, sim: &Simulation) {
    let mut y = MARGIN;
    for notice in sim.notices().iter() {
        let h = 2.0 * text_height(TEXT_SCALE) + LINE_GAP + 16.0;
        let w = text_width(&notice.title, TEXT_SCALE).max(text_width(&notice.body, TEXT_SCALE)) + 16.0;
        let bg = match notice.level {
            NoticeLevel::Info => PANEL,
            NoticeLevel::Error => ERROR_PANEL,
        };
        out.push(Shape::Fill { rect: Rect::new(MARGIN, y, w, h), color: bg });
        out.push(Shape::Text {
            origin: Vec2::new(MARGIN + 8.0, y + 8.0),
            text: notice.title.clone(),
            scale: TEXT_SCALE,
            color: Color::WHITE,
            align: TextAlign::Left,
        });
        out.push(Shape::Text {
            origin: Vec2::new(MARGIN + 8.0, y + 8.0 + text_height(TEXT_SCALE) + LINE_GAP),
            text: notice.body.clone(),
            scale: TEXT_SCALE,
            color: MUTED,
            align: TextAlign::Left,
        });
        y += h + LINE_GAP;
    }
}

fn chat(out: &mut Vec<Shape>, sim: &Simulation) {
    let mode = sim.chat_mode();
    let zone = sim.current_zone().map(|r| r.id.as_str());
    let visible: Vec<_> = sim.chat().visible(mode, zone).collect();
    let start = visible.len().saturating_sub(CHAT_LINES);

    let line_h = text_height(TEXT_SCALE) + LINE_GAP;
    let header = match mode {
        ChatMode::Global => "GLOBAL CHAT",
        ChatMode::Zone => "ZONE CHAT",
    };
    let draft = sim.composer.draft();
    let rows = visible.len() - start + 1 + usize::from(draft.is_some());
    let mut y = sim.viewport().height - MARGIN - line_h * rows as f32;
    out.push(Shape::Text {
        origin: Vec2::new(MARGIN, y),
        text: header.to_string(),
        scale: TEXT_SCALE,
        color: MUTED,
        align: TextAlign::Left,
    });
    for entry in &visible[start..] {
        y += line_h;
        let color = if entry.mine { HIGHLIGHT } else { Color::WHITE };
        out.push(Shape::Text {
            origin: Vec2::new(MARGIN, y),
            text: format!("{}: {}", entry.sender, entry.text),
            scale: TEXT_SCALE,
            color,
            align: TextAlign::Left,
        });
    }
    if let Some(draft) = draft {
        y += line_h;
        out.push(Shape::Text {
            origin: Vec2::new(MARGIN, y),
            text: format!("> {draft}_"),
            scale: TEXT_SCALE,
            color: HIGHLIGHT,
            align: TextAlign::Left,
        });
    }
}
