//! Falling leaves and petals.
//!
//! The renderer asks for particles at twig tips via
//! [`ParticleSystem::spawn`]; from then on the system alone integrates,
//! draws and retires them.

use std::f32::consts::TAU;

use glam::{Affine2, Vec2};
use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::canvas::{Canvas, Rgba, fill_ellipse};
use crate::config::EngineConfig;
use crate::flowers::{LEAF_COLOR, draw_flower};
use crate::types::FlowerStyle;

/// Life a particle starts with; also its starting alpha.
pub const FULL_LIFE: f32 = 255.0;
/// Unscaled particle size range in pixels.
pub const SIZE_MIN: f32 = 6.0;
pub const SIZE_MAX: f32 = 12.0;
/// Horizontal launch speed per unit of wind.
pub const LAUNCH_WIND: f32 = 1.5;
/// Spatial and temporal scale of the turbulence field.
const TURBULENCE_SCALE: f64 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    /// A leaf with its own shade of green.
    Leaf(Rgba),
    /// A blossom; its colours come from the style active when drawn.
    Flower,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub size: f32,
    /// Counts down from [`FULL_LIFE`]; doubles as alpha.
    pub life: f32,
    pub kind: ParticleKind,
    pub angle: f32,
    pub angle_vel: f32,
    /// Tumble phase; `|cos(flip)|` squashes the particle vertically.
    pub flip: f32,
    pub flip_speed: f32,
    pub sway_phase: f32,
    pub sway_freq: f32,
    pub sway_amp: f32,
}

impl Particle {
    /// Vertical squash factor simulating a flip in 3-D.
    pub fn squash(&self) -> f32 {
        self.flip.cos().abs()
    }

    fn is_dead(&self, floor: f32) -> bool {
        self.life <= 0.0 || self.pos.y > floor
    }
}

/// Physics constants copied out of [`EngineConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleParams {
    pub max_particles: usize,
    pub gravity: f32,
    pub wind_coefficient: f32,
    pub turbulence: f32,
    pub damping: f32,
    pub life_decrement: f32,
    pub offscreen_margin: f32,
}

impl From<&EngineConfig> for ParticleParams {
    fn from(cfg: &EngineConfig) -> Self {
        Self {
            max_particles: cfg.max_particles,
            gravity: cfg.gravity,
            wind_coefficient: cfg.wind_coefficient,
            turbulence: cfg.turbulence,
            damping: cfg.damping,
            life_decrement: cfg.life_decrement,
            offscreen_margin: cfg.offscreen_margin,
        }
    }
}

/// Owns and simulates every live particle.
///
/// Particles are kept in spawn order, so the front of `particles` is always
/// the oldest one.
#[derive(Debug)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    params: ParticleParams,
    rng: StdRng,
    turbulence: Perlin,
    frame: u64,
    /// Latest wind read, used to bias launch velocity.
    wind: f32,
}

impl ParticleSystem {
    pub fn new(params: ParticleParams, seed: u64) -> Self {
        Self {
            particles: Vec::with_capacity(params.max_particles),
            params,
            rng: StdRng::seed_from_u64(seed),
            turbulence: Perlin::new(seed as u32 ^ 0x5EED),
            frame: 0,
            wind: 0.0,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Sets the wind that biases the launch velocity of new particles.
    pub fn set_wind(&mut self, wind: f32) {
        self.wind = wind;
    }

    /// Creates one particle at `pos`.
    ///
    /// ### Parameters
    /// - `pos` - Canvas position of the twig tip it falls from.
    /// - `scale` - Scale of the owning tree; multiplies the particle size.
    pub fn spawn(&mut self, pos: Vec2, scale: f32) {
        let rng = &mut self.rng;
        let kind = if rng.random_bool(0.5) {
            let shade = rng.random_range(-18..=18);
            ParticleKind::Leaf(Rgba::rgb(
                (LEAF_COLOR.r as i32 + shade).clamp(0, 255) as u8,
                (LEAF_COLOR.g as i32 + shade).clamp(0, 255) as u8,
                LEAF_COLOR.b,
            ))
        } else {
            ParticleKind::Flower
        };

        let vel = Vec2::new(
            self.wind * LAUNCH_WIND + rng.random_range(-0.5..=0.5),
            rng.random_range(0.5..=1.5),
        );

        self.particles.push(Particle {
            pos,
            vel,
            acc: Vec2::ZERO,
            size: rng.random_range(SIZE_MIN..=SIZE_MAX) * scale,
            life: FULL_LIFE,
            kind,
            angle: rng.random_range(0.0..TAU),
            angle_vel: rng.random_range(-0.05..=0.05),
            flip: rng.random_range(0.0..TAU),
            flip_speed: rng.random_range(0.05..=0.15),
            sway_phase: rng.random_range(0.0..TAU),
            sway_freq: rng.random_range(0.02..=0.06),
            sway_amp: rng.random_range(0.01..=0.04),
        });
    }

    /// Drops the oldest particles until at most `max_particles` remain.
    fn trim(&mut self) {
        let excess = self.particles.len().saturating_sub(self.params.max_particles);
        if excess > 0 {
            self.particles.drain(..excess);
            debug!(dropped = excess, "particle cap reached");
        }
    }

    /// Advances every particle by one tick and retires the dead ones.
    ///
    /// ### Parameters
    /// - `wind` - Smoothed wind force for this tick.
    /// - `viewport_height` - Particles below `viewport_height + margin` are
    ///   removed.
    pub fn update(&mut self, wind: f32, viewport_height: f32) {
        self.wind = wind;
        self.trim();

        let p = self.params;
        let frame = self.frame as f32;
        let t = self.frame as f64 * TURBULENCE_SCALE;

        for part in &mut self.particles {
            let n = self.turbulence.get([
                part.pos.x as f64 * TURBULENCE_SCALE,
                part.pos.y as f64 * TURBULENCE_SCALE,
                t,
            ]) as f32;
            let turbulence = Vec2::from_angle(n * TAU) * p.turbulence;
            let sway = (frame * part.sway_freq + part.sway_phase).sin() * part.sway_amp;

            part.acc = Vec2::new(wind * p.wind_coefficient + sway, p.gravity) + turbulence;
            part.vel = (part.vel + part.acc) * p.damping;
            part.pos += part.vel;

            part.angle += part.angle_vel;
            part.flip += part.flip_speed;
            part.life -= p.life_decrement;
        }

        let floor = viewport_height + p.offscreen_margin;
        self.particles.retain(|part| !part.is_dead(floor));
        self.frame += 1;
    }

    /// Draws every live particle, faded by its remaining life.
    pub fn draw(&self, canvas: &mut dyn Canvas, style: FlowerStyle) {
        for part in &self.particles {
            let transform = Affine2::from_angle_translation(part.angle, part.pos)
                * Affine2::from_scale(Vec2::new(1.0, part.squash()));
            let alpha = part.life;

            match part.kind {
                ParticleKind::Leaf(color) => fill_ellipse(
                    canvas,
                    transform,
                    Vec2::ZERO,
                    Vec2::new(part.size * 0.5, part.size * 0.25),
                    0.0,
                    color.with_alpha(alpha),
                ),
                ParticleKind::Flower => {
                    draw_flower(canvas, transform, style, part.size * 0.5, alpha)
                }
            }
        }
    }

    /// One full particle tick: integrate, then draw.
    pub fn tick(&mut self, wind: f32, style: FlowerStyle, canvas: &mut dyn Canvas) {
        self.update(wind, canvas.size().y);
        self.draw(canvas, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawList;

    fn params() -> ParticleParams {
        ParticleParams::from(&EngineConfig::default())
    }

    #[test]
    fn spawn_initialises_full_life_and_downward_speed() {
        let mut sys = ParticleSystem::new(params(), 1);
        for _ in 0..50 {
            sys.spawn(Vec2::new(100.0, 100.0), 0.5);
        }

        for p in sys.particles() {
            assert_eq!(p.life, FULL_LIFE);
            assert!(p.vel.y > 0.0, "particles start falling");
            assert!(p.size >= SIZE_MIN * 0.5 && p.size <= SIZE_MAX * 0.5);
        }

        let leaves = sys
            .particles()
            .iter()
            .filter(|p| matches!(p.kind, ParticleKind::Leaf(_)))
            .count();
        assert!(leaves > 10 && leaves < 40, "leaf/flower split was {leaves}/50");
    }

    #[test]
    fn life_decreases_by_fixed_amount_each_tick() {
        let mut sys = ParticleSystem::new(params(), 2);
        sys.spawn(Vec2::new(50.0, 0.0), 1.0);

        let decrement = params().life_decrement;
        let mut last = sys.particles()[0].life;
        for _ in 0..10 {
            sys.update(0.0, 10_000.0);
            let life = sys.particles()[0].life;
            assert!((last - life - decrement).abs() < 1e-4);
            last = life;
        }
    }

    #[test]
    fn particle_dies_exactly_when_life_runs_out() {
        let mut p = params();
        p.life_decrement = 51.0; // 255 / 51 = 5 ticks
        let mut sys = ParticleSystem::new(p, 3);
        sys.spawn(Vec2::new(50.0, 0.0), 1.0);

        for _ in 0..4 {
            sys.update(0.0, 10_000.0);
            assert_eq!(sys.len(), 1);
        }
        sys.update(0.0, 10_000.0);
        assert!(sys.is_empty(), "life hit 0 on the fifth tick");
    }

    #[test]
    fn particle_leaving_the_bottom_is_removed() {
        let mut sys = ParticleSystem::new(params(), 4);
        let height = 100.0;
        let margin = params().offscreen_margin;

        // Just above the floor: survives one tick only if it doesn't cross.
        sys.spawn(Vec2::new(10.0, height + margin + 0.01), 1.0);
        sys.update(0.0, height);
        assert!(sys.is_empty());

        sys.spawn(Vec2::new(10.0, 0.0), 1.0);
        sys.update(0.0, height);
        assert_eq!(sys.len(), 1);
    }

    #[test]
    fn count_never_exceeds_cap_and_oldest_go_first() {
        let mut p = params();
        p.max_particles = 5;
        let mut sys = ParticleSystem::new(p, 5);

        for i in 0..8 {
            sys.spawn(Vec2::new(i as f32 * 100.0, 0.0), 1.0);
        }
        sys.update(0.0, 10_000.0);

        assert_eq!(sys.len(), 5);
        // The three oldest columns (x = 0, 100, 200) were dropped.
        let first_x = sys.particles()[0].pos.x;
        assert!((first_x - 300.0).abs() < 5.0, "oldest survivor at x = {first_x}");
    }

    #[test]
    fn wind_pushes_particles_sideways() {
        let mut calm = ParticleSystem::new(params(), 6);
        let mut windy = ParticleSystem::new(params(), 6);
        calm.spawn(Vec2::new(500.0, 0.0), 1.0);
        windy.spawn(Vec2::new(500.0, 0.0), 1.0);

        for _ in 0..60 {
            calm.update(0.0, 10_000.0);
            windy.update(1.0, 10_000.0);
        }

        assert!(windy.particles()[0].pos.x > calm.particles()[0].pos.x + 10.0);
    }

    #[test]
    fn damping_bounds_fall_speed() {
        let mut sys = ParticleSystem::new(params(), 7);
        sys.spawn(Vec2::new(0.0, 0.0), 1.0);
        for _ in 0..150 {
            sys.update(0.0, 1.0e6);
        }

        // Terminal speed is roughly gravity * damping / (1 - damping).
        let p = params();
        let terminal = (p.gravity + p.turbulence) * p.damping / (1.0 - p.damping);
        assert!(sys.particles()[0].vel.y <= terminal + 0.1);
    }

    #[test]
    fn draw_fades_with_life_and_squashes_with_tumble() {
        let mut sys = ParticleSystem::new(params(), 8);
        sys.spawn(Vec2::new(50.0, 50.0), 1.0);
        {
            let part = &mut sys.particles[0];
            part.kind = ParticleKind::Leaf(LEAF_COLOR);
            part.life = 120.0;
            part.angle = 0.0;
            part.flip = std::f32::consts::FRAC_PI_3; // cos = 0.5
        }

        let mut list = DrawList::new(Vec2::new(100.0, 100.0));
        sys.draw(&mut list, FlowerStyle::Peach);

        assert_eq!(list.commands.len(), 1);
        let crate::canvas::DrawCommand::Polygon { points, color } = &list.commands[0] else {
            panic!("expected a polygon");
        };
        assert_eq!(color.a, 120);

        let max_dy = points.iter().map(|p| (p.y - 50.0).abs()).fold(0.0, f32::max);
        let size = sys.particles()[0].size;
        assert!((max_dy - size * 0.25 * 0.5).abs() < 1e-3);
    }

    #[test]
    fn flower_particles_use_the_active_style() {
        let mut sys = ParticleSystem::new(params(), 9);
        sys.spawn(Vec2::new(50.0, 50.0), 1.0);
        sys.particles[0].kind = ParticleKind::Flower;

        let mut peach = DrawList::new(Vec2::new(100.0, 100.0));
        sys.draw(&mut peach, FlowerStyle::Peach);
        let mut sakura = DrawList::new(Vec2::new(100.0, 100.0));
        sys.draw(&mut sakura, FlowerStyle::Sakura);

        assert_ne!(peach.commands.len(), sakura.commands.len());
    }
}
