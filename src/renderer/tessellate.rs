//! Turns [`Shape`]s into flat-coloured triangles.  Pure CPU code; the
//! renderer only uploads the result.

use glam::Vec2;

use crate::engine::Color;
use crate::frame::{Shape, TextAlign};
use crate::renderer::glyphs::{self, ADVANCE};
use crate::renderer::pipeline::ShapeVertex;

pub fn tessellate(shapes: &[Shape], out: &mut Vec<ShapeVertex>) {
    for shape in shapes {
        match shape {
            Shape::Fill { rect, color } => {
                quad(out, rect.x, rect.y, rect.right(), rect.bottom(), *color);
            }
            Shape::Stroke { rect, width, color } => {
                let w = width.min(rect.width / 2.0).min(rect.height / 2.0);
                quad(out, rect.x, rect.y, rect.right(), rect.y + w, *color);
                quad(out, rect.x, rect.bottom() - w, rect.right(), rect.bottom(), *color);
                quad(out, rect.x, rect.y + w, rect.x + w, rect.bottom() - w, *color);
                quad(out, rect.right() - w, rect.y + w, rect.right(), rect.bottom() - w, *color);
            }
            Shape::Line { from, to, width, color } => line(out, *from, *to, *width, *color),
            Shape::Circle { center, radius, color } => circle(out, *center, *radius, *color),
            Shape::Text { origin, text, scale, color, align } => {
                let top_left = match align {
                    TextAlign::Left => *origin,
                    TextAlign::Center => {
                        *origin - Vec2::new(glyphs::text_width(text, *scale), glyphs::text_height(*scale)) / 2.0
                    }
                };
                text_quads(out, top_left, text, *scale, *color);
            }
        }
    }
}

/// Segment count for a circle of `radius` pixels.
pub fn circle_segments(radius: f32) -> u32 {
    ((radius * 1.5) as u32).clamp(12, 64)
}

fn quad(out: &mut Vec<ShapeVertex>, x0: f32, y0: f32, x1: f32, y1: f32, color: Color) {
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    let v = |x: f32, y: f32| ShapeVertex { position: [x, y], color: color.0 };
    let (tl, tr, bl, br) = (v(x0, y0), v(x1, y0), v(x0, y1), v(x1, y1));
    out.extend_from_slice(&[tl, bl, tr, tr, bl, br]);
}

fn line(out: &mut Vec<ShapeVertex>, from: Vec2, to: Vec2, width: f32, color: Color) {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    let n = dir.perp() * (width / 2.0);
    let v = |p: Vec2| ShapeVertex { position: p.to_array(), color: color.0 };
    let (a, b, c, d) = (v(from + n), v(from - n), v(to + n), v(to - n));
    out.extend_from_slice(&[a, b, c, c, b, d]);
}

fn circle(out: &mut Vec<ShapeVertex>, center: Vec2, radius: f32, color: Color) {
    if radius <= 0.0 {
        return;
    }
    let segments = circle_segments(radius);
    let step = std::f32::consts::TAU / segments as f32;
    let v = |p: Vec2| ShapeVertex { position: p.to_array(), color: color.0 };
    for i in 0..segments {
        let a0 = i as f32 * step;
        let a1 = a0 + step;
        let p0 = center + Vec2::new(a0.cos(), a0.sin()) * radius;
        let p1 = center + Vec2::new(a1.cos(), a1.sin()) * radius;
        out.extend_from_slice(&[v(center), v(p0), v(p1)]);
    }
}

fn text_quads(out: &mut Vec<ShapeVertex>, top_left: Vec2, text: &str, scale: f32, color: Color) {
    for (i, ch) in text.chars().enumerate() {
        if ch == ' ' {
            continue;
        }
        let gx = top_left.x + (i as u32 * ADVANCE) as f32 * scale;
        let g = glyphs::glyph(ch);
        for (row, col, len) in glyphs::runs(&g) {
            let x0 = gx + col as f32 * scale;
            let y0 = top_left.y + row as f32 * scale;
            quad(out, x0, y0, x0 + len as f32 * scale, y0 + scale, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    #[test]
    fn fill_is_two_triangles() {
        let mut out = Vec::new();
        tessellate(&[Shape::Fill { rect: Rect::new(0.0, 0.0, 10.0, 5.0), color: Color::RED }], &mut out);
        assert_eq!(out.len(), 6);
        assert_eq!(out[5].position, [10.0, 5.0]);
    }

    #[test]
    fn degenerate_shapes_emit_nothing() {
        let mut out = Vec::new();
        let p = Vec2::new(3.0, 3.0);
        tessellate(
            &[
                Shape::Line { from: p, to: p, width: 2.0, color: Color::RED },
                Shape::Fill { rect: Rect::new(0.0, 0.0, 0.0, 5.0), color: Color::RED },
                Shape::Circle { center: p, radius: 0.0, color: Color::RED },
            ],
            &mut out,
        );
        assert!(out.is_empty());
    }
}
