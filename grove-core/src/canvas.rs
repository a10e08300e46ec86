//! Drawing surface abstraction.
//!
//! The engine only ever fills convex polygons and strokes straight
//! segments. Hosts implement [`Canvas`] on top of whatever 2-D painter
//! they have; [`DrawList`] records commands so a frame can be replayed
//! or inspected.

use std::f32::consts::TAU;

use glam::{Affine2, Vec2};

/// Straight (non-premultiplied) 8-bit RGBA colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with alpha set from `alpha` in `[0, 255]` (clamped).
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: alpha.clamp(0.0, 255.0).round() as u8,
            ..self
        }
    }

    /// Channel-wise linear interpolation, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

/// A 2-D surface the engine draws onto, in pixel coordinates with the
/// origin at the top-left and `y` pointing down.
pub trait Canvas {
    fn size(&self) -> Vec2;

    /// Fills a convex polygon without stroke.
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba);

    /// Draws a straight segment of the given width.
    fn stroke_segment(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Polygon { points: Vec<Vec2>, color: Rgba },
    Segment { from: Vec2, to: Vec2, width: f32, color: Rgba },
}

/// A [`Canvas`] that records everything drawn onto it.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    size: Vec2,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    /// Drops recorded commands and adopts a new surface size.
    pub fn reset(&mut self, size: Vec2) {
        self.size = size;
        self.commands.clear();
    }

    /// Replays every recorded command onto another canvas.
    pub fn replay(&self, target: &mut dyn Canvas) {
        for cmd in &self.commands {
            match cmd {
                DrawCommand::Polygon { points, color } => target.fill_polygon(points, *color),
                DrawCommand::Segment {
                    from,
                    to,
                    width,
                    color,
                } => target.stroke_segment(*from, *to, *width, *color),
            }
        }
    }

    pub fn segment_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Segment { .. }))
            .count()
    }

    pub fn polygon_count(&self) -> usize {
        self.commands.len() - self.segment_count()
    }
}

impl Canvas for DrawList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        if points.len() < 3 || color.a == 0 {
            return;
        }
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn stroke_segment(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        if color.a == 0 {
            return;
        }
        self.commands.push(DrawCommand::Segment {
            from,
            to,
            width,
            color,
        });
    }
}

/// Segment count used when tessellating ellipses.
pub const ELLIPSE_SEGMENTS: usize = 16;

/// Fills an ellipse given in the local frame of `transform`.
///
/// ### Parameters
/// - `canvas` - Target surface.
/// - `transform` - Local-to-canvas transform (may squash or rotate).
/// - `center` - Ellipse center in local coordinates.
/// - `radii` - Half extents along the ellipse's own axes.
/// - `rotation` - Rotation of the ellipse axes in the local frame.
/// - `color` - Fill colour.
pub fn fill_ellipse(
    canvas: &mut dyn Canvas,
    transform: Affine2,
    center: Vec2,
    radii: Vec2,
    rotation: f32,
    color: Rgba,
) {
    let axes = Vec2::from_angle(rotation);
    let mut points = [Vec2::ZERO; ELLIPSE_SEGMENTS];
    for (i, p) in points.iter_mut().enumerate() {
        let t = i as f32 / ELLIPSE_SEGMENTS as f32 * TAU;
        let local = axes.rotate(Vec2::new(t.cos() * radii.x, t.sin() * radii.y));
        *p = transform.transform_point2(center + local);
    }
    canvas.fill_polygon(&points, color);
}

/// Fills a circle given in the local frame of `transform`.
pub fn fill_circle(canvas: &mut dyn Canvas, transform: Affine2, center: Vec2, r: f32, color: Rgba) {
    fill_ellipse(canvas, transform, center, Vec2::splat(r), 0.0, color);
}

/// Fills the whole canvas.
pub fn fill_background(canvas: &mut dyn Canvas, color: Rgba) {
    let s = canvas.size();
    let quad = [Vec2::ZERO, Vec2::new(s.x, 0.0), s, Vec2::new(0.0, s.y)];
    canvas.fill_polygon(&quad, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_hits_endpoints_and_midpoint() {
        let a = Rgba::rgb(0, 100, 200);
        let b = Rgba::rgb(200, 100, 0);

        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgba::rgb(100, 100, 100));
        // Out-of-range t is clamped.
        assert_eq!(a.lerp(b, 3.0), b);
    }

    #[test]
    fn with_alpha_clamps() {
        let c = Rgba::rgb(1, 2, 3);
        assert_eq!(c.with_alpha(-4.0).a, 0);
        assert_eq!(c.with_alpha(127.6).a, 128);
        assert_eq!(c.with_alpha(900.0).a, 255);
    }

    #[test]
    fn ellipse_points_respect_transform() {
        let mut list = DrawList::new(Vec2::new(100.0, 100.0));
        let transform = Affine2::from_translation(Vec2::new(50.0, 50.0));

        fill_ellipse(
            &mut list,
            transform,
            Vec2::ZERO,
            Vec2::new(10.0, 5.0),
            0.0,
            Rgba::rgb(255, 0, 0),
        );

        let DrawCommand::Polygon { points, .. } = &list.commands[0] else {
            panic!("expected a polygon");
        };
        assert_eq!(points.len(), ELLIPSE_SEGMENTS);
        // First point lies on the +x axis at the major radius.
        assert!((points[0] - Vec2::new(60.0, 50.0)).length() < 1e-4);
        for p in points {
            let d = *p - Vec2::new(50.0, 50.0);
            let e = (d.x / 10.0).powi(2) + (d.y / 5.0).powi(2);
            assert!((e - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn invisible_draws_are_skipped_and_replay_copies_commands() {
        let mut list = DrawList::new(Vec2::new(10.0, 10.0));
        list.stroke_segment(Vec2::ZERO, Vec2::ONE, 1.0, Rgba::rgba(0, 0, 0, 0));
        fill_background(&mut list, Rgba::rgb(10, 10, 10));
        list.stroke_segment(Vec2::ZERO, Vec2::ONE, 2.0, Rgba::rgb(0, 0, 0));

        assert_eq!(list.polygon_count(), 1);
        assert_eq!(list.segment_count(), 1);

        let mut copy = DrawList::new(list.size());
        list.replay(&mut copy);
        assert_eq!(copy.commands, list.commands);
    }
}
