//! Leaf and blossom shapes.
//!
//! Every routine draws around the local origin of `transform`, in units
//! of `size` pixels, so the same code serves attached foliage (rotated to
//! the branch) and falling particles (rotated and squashed by tumble).

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Affine2, Vec2};

use crate::canvas::{Canvas, Rgba, fill_circle, fill_ellipse};
use crate::types::FlowerStyle;

pub const LEAF_COLOR: Rgba = Rgba::rgb(112, 168, 84);

/// Petal and center colours of a style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub petal: Rgba,
    pub accent: Rgba,
    pub center: Rgba,
}

pub fn palette(style: FlowerStyle) -> Palette {
    match style {
        FlowerStyle::Peach => Palette {
            petal: Rgba::rgb(246, 154, 176),
            accent: Rgba::rgb(222, 98, 132),
            center: Rgba::rgb(250, 214, 110),
        },
        FlowerStyle::Sakura => Palette {
            petal: Rgba::rgb(255, 206, 222),
            accent: Rgba::rgb(246, 170, 196),
            center: Rgba::rgb(214, 82, 120),
        },
        FlowerStyle::Delonix => Palette {
            petal: Rgba::rgb(226, 58, 34),
            accent: Rgba::rgb(252, 238, 214),
            center: Rgba::rgb(150, 30, 20),
        },
    }
}

/// A single leaf with its base at the local origin and its tip at `(0, -size)`.
pub fn draw_leaf(canvas: &mut dyn Canvas, transform: Affine2, size: f32, color: Rgba) {
    fill_ellipse(
        canvas,
        transform,
        Vec2::new(0.0, -size * 0.5),
        Vec2::new(size * 0.22, size * 0.5),
        0.0,
        color,
    );
}

/// Draws one blossom of `style` centered on the local origin.
///
/// ### Parameters
/// - `canvas` - Target surface.
/// - `transform` - Local-to-canvas transform.
/// - `style` - Which petal layout to use.
/// - `size` - Blossom radius in pixels.
/// - `alpha` - Opacity in `[0, 255]`.
pub fn draw_flower(
    canvas: &mut dyn Canvas,
    transform: Affine2,
    style: FlowerStyle,
    size: f32,
    alpha: f32,
) {
    let p = palette(style);
    match style {
        FlowerStyle::Peach => peach(canvas, transform, &p, size, alpha),
        FlowerStyle::Sakura => sakura(canvas, transform, &p, size, alpha),
        FlowerStyle::Delonix => delonix(canvas, transform, &p, size, alpha),
    }
}

/// Angle of petal `i` out of `n`, starting straight up.
fn petal_angle(i: usize, n: usize) -> f32 {
    -FRAC_PI_2 + i as f32 / n as f32 * TAU
}

/// Five broad rounded petals around a golden center.
fn peach(canvas: &mut dyn Canvas, t: Affine2, p: &Palette, size: f32, alpha: f32) {
    for i in 0..5 {
        let a = petal_angle(i, 5);
        let dir = Vec2::from_angle(a);
        fill_ellipse(
            canvas,
            t,
            dir * size * 0.48,
            Vec2::new(size * 0.5, size * 0.38),
            a,
            p.petal.with_alpha(alpha),
        );
    }
    fill_circle(canvas, t, Vec2::ZERO, size * 0.26, p.accent.with_alpha(alpha));
    fill_circle(canvas, t, Vec2::ZERO, size * 0.13, p.center.with_alpha(alpha));
}

/// Five pale petals, each split into two lobes so the tip reads as notched,
/// with a ring of short stamens.
fn sakura(canvas: &mut dyn Canvas, t: Affine2, p: &Palette, size: f32, alpha: f32) {
    let petal = p.petal.with_alpha(alpha);
    for i in 0..5 {
        let a = petal_angle(i, 5);
        for lobe in [-0.16_f32, 0.16] {
            let la = a + lobe;
            fill_ellipse(
                canvas,
                t,
                Vec2::from_angle(la) * size * 0.5,
                Vec2::new(size * 0.46, size * 0.24),
                la,
                petal,
            );
        }
    }

    fill_circle(canvas, t, Vec2::ZERO, size * 0.2, p.accent.with_alpha(alpha));

    let stamen = p.center.with_alpha(alpha);
    let width = (size * 0.05).max(0.5);
    for i in 0..8 {
        let dir = Vec2::from_angle(petal_angle(i, 8) + 0.2);
        let from = t.transform_point2(dir * size * 0.1);
        let to = t.transform_point2(dir * size * 0.34);
        canvas.stroke_segment(from, to, width, stamen);
        fill_circle(canvas, t, dir * size * 0.36, size * 0.05, stamen);
    }
}

/// Four spoon-shaped scarlet petals and one pale, streaked standard petal,
/// with long stamens sweeping to one side.
fn delonix(canvas: &mut dyn Canvas, t: Affine2, p: &Palette, size: f32, alpha: f32) {
    let petal = p.petal.with_alpha(alpha);
    for i in 0..5 {
        let a = petal_angle(i, 5);
        let dir = Vec2::from_angle(a);
        let color = if i == 0 { p.accent.with_alpha(alpha) } else { petal };

        // Narrow claw plus a round blade.
        fill_ellipse(
            canvas,
            t,
            dir * size * 0.25,
            Vec2::new(size * 0.25, size * 0.08),
            a,
            color,
        );
        fill_circle(canvas, t, dir * size * 0.62, size * 0.3, color);

        if i == 0 {
            // Red streaks on the standard petal.
            let streak = petal.with_alpha(alpha * 0.8);
            let normal = dir.perp();
            for k in [-1.0_f32, 0.0, 1.0] {
                let base = dir * size * 0.4 + normal * k * size * 0.1;
                canvas.stroke_segment(
                    t.transform_point2(base),
                    t.transform_point2(base + dir * size * 0.38),
                    (size * 0.05).max(0.5),
                    streak,
                );
            }
        }
    }

    let stamen = p.center.with_alpha(alpha);
    for k in 0..6 {
        let a = 0.35 + k as f32 * 0.12;
        let tip = Vec2::from_angle(a) * size * 0.95;
        canvas.stroke_segment(
            t.transform_point2(Vec2::ZERO),
            t.transform_point2(tip),
            (size * 0.04).max(0.5),
            stamen,
        );
        fill_circle(canvas, t, tip, size * 0.06, stamen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, DrawList};

    fn draw(style: FlowerStyle) -> DrawList {
        let mut list = DrawList::new(Vec2::new(200.0, 200.0));
        let t = Affine2::from_translation(Vec2::new(100.0, 100.0));
        draw_flower(&mut list, t, style, 10.0, 255.0);
        list
    }

    #[test]
    fn each_style_has_a_distinct_layout() {
        let peach = draw(FlowerStyle::Peach);
        let sakura = draw(FlowerStyle::Sakura);
        let delonix = draw(FlowerStyle::Delonix);

        // Peach is petals only, the others add stamens.
        assert_eq!(peach.segment_count(), 0);
        assert_eq!(peach.polygon_count(), 7);
        assert_eq!(sakura.segment_count(), 8);
        assert!(delonix.segment_count() > 0);
        assert_ne!(sakura.polygon_count(), delonix.polygon_count());
    }

    #[test]
    fn flower_alpha_is_applied_to_every_shape() {
        let mut list = DrawList::new(Vec2::new(50.0, 50.0));
        draw_flower(&mut list, Affine2::IDENTITY, FlowerStyle::Sakura, 8.0, 100.0);

        for cmd in &list.commands {
            let color = match cmd {
                DrawCommand::Polygon { color, .. } => *color,
                DrawCommand::Segment { color, .. } => *color,
            };
            assert_eq!(color.a, 100);
        }
    }

    #[test]
    fn zero_alpha_draws_nothing() {
        let mut list = DrawList::new(Vec2::new(50.0, 50.0));
        draw_flower(&mut list, Affine2::IDENTITY, FlowerStyle::Peach, 8.0, 0.0);
        draw_leaf(&mut list, Affine2::IDENTITY, 8.0, LEAF_COLOR.with_alpha(0.0));
        assert!(list.commands.is_empty());
    }

    #[test]
    fn leaf_extends_from_base_to_tip() {
        let mut list = DrawList::new(Vec2::new(50.0, 50.0));
        draw_leaf(&mut list, Affine2::IDENTITY, 10.0, LEAF_COLOR);

        let DrawCommand::Polygon { points, .. } = &list.commands[0] else {
            panic!("expected a polygon");
        };
        let min_y = points.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        let max_y = points.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        assert!((min_y + 10.0).abs() < 1e-3);
        assert!(max_y.abs() < 1e-3);
    }
}
