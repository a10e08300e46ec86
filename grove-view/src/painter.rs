//! [`Canvas`] implementation over an egui painter.

use glam::Vec2;
use grove_core::{Canvas, Rgba};

/// Draws engine output into a screen rectangle.
///
/// Engine coordinates start at the rectangle's top-left corner, with y down
/// like egui's own.
pub struct PainterCanvas<'a> {
    painter: &'a egui::Painter,
    rect: egui::Rect,
}

impl<'a> PainterCanvas<'a> {
    pub fn new(painter: &'a egui::Painter, rect: egui::Rect) -> Self {
        Self { painter, rect }
    }

    fn to_screen(&self, p: Vec2) -> egui::Pos2 {
        to_screen(p, self.rect)
    }
}

impl Canvas for PainterCanvas<'_> {
    fn size(&self) -> Vec2 {
        Vec2::new(self.rect.width(), self.rect.height())
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        let pts: Vec<egui::Pos2> = points.iter().map(|&p| self.to_screen(p)).collect();
        self.painter.add(egui::Shape::convex_polygon(
            pts,
            to_color32(color),
            egui::Stroke::NONE,
        ));
    }

    fn stroke_segment(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let color = to_color32(color);
        let a = self.to_screen(from);
        let b = self.to_screen(to);
        self.painter.line_segment([a, b], egui::Stroke::new(width, color));
        // Round the joint so thick limbs don't show gaps where they meet.
        if width > 2.0 {
            self.painter.circle_filled(b, width * 0.5, color);
        }
    }
}

/// Maps an engine-space point into `rect`.
pub fn to_screen(p: Vec2, rect: egui::Rect) -> egui::Pos2 {
    egui::pos2(rect.min.x + p.x, rect.min.y + p.y)
}

pub fn to_color32(c: Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}
