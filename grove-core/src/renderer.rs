//! Per-tick branch walk: wind transforms, branch strokes, foliage and
//! spawn requests.
//!
//! The walk for one tick looks like:
//! 1. [`Renderer::background`] - clear and tint by mood.
//! 2. [`Renderer::draw_tree`] for every [`TreeInstance`] - recurse from the
//!    trunk, carrying world rotation and tip position down the tree.
//! 3. The caller hands the collected spawn requests to the particle system.

use glam::{Affine2, Vec2};
use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::canvas::{Canvas, Rgba, fill_background};
use crate::config::EngineConfig;
use crate::flowers::{LEAF_COLOR, draw_flower, draw_leaf};
use crate::forest::TreeInstance;
use crate::skeleton::Branch;
use crate::types::FlowerStyle;
use crate::wind::WindField;

pub const BASE_BACKGROUND: Rgba = Rgba::rgb(240, 236, 226);
pub const WARM_TINT: Rgba = Rgba::rgb(255, 196, 120);
pub const COLD_TINT: Rgba = Rgba::rgb(36, 44, 72);
/// Tint alpha at `|mood| = 1`.
pub const WARM_ALPHA: f32 = 70.0;
pub const COLD_ALPHA: f32 = 140.0;

pub const DORMANT_BRANCH: Rgba = Rgba::rgb(104, 96, 92);
pub const THRIVING_BRANCH: Rgba = Rgba::rgb(96, 62, 40);

/// Unscaled leaf length and blossom radius in pixels.
pub const LEAF_SIZE: f32 = 9.0;
pub const FLOWER_SIZE: f32 = 6.0;
/// Angle between a twig and each of its two mirrored leaves.
pub const LEAF_SPREAD: f32 = 0.7;
/// Relative size swing of the breathing pulse.
pub const BREATH_AMPLITUDE: f32 = 0.08;
pub const BREATH_SPEED: f32 = 2.4;
pub const FOLIAGE_ALPHA: f32 = 235.0;

/// Counters describing what one tick drew.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub branches_drawn: usize,
    /// Branches inside the foliage window that were actually reached.
    pub near_terminal: usize,
    pub foliage_attached: usize,
    pub flowers_drawn: usize,
    pub spawns_requested: usize,
    pub live_particles: usize,
    pub smoothed_mood: f32,
    pub smoothed_wind: f32,
    pub wind_angle: f32,
}

/// Everything the walk reads that is fixed for the duration of a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInputs {
    pub bloom: f32,
    pub wind_angle: f32,
    /// Engine clock in seconds.
    pub time: f32,
    pub style: FlowerStyle,
    /// Per-branch spawn probability for the current scene mode.
    pub spawn_rate: f32,
}

/// A particle the walk wants created at a twig tip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    pub pos: Vec2,
    pub scale: f32,
}

/// Mutable state threaded through one tree walk.
struct Walk<'a> {
    canvas: &'a mut dyn Canvas,
    spawns: &'a mut Vec<SpawnRequest>,
    stats: &'a mut FrameStats,
    inputs: FrameInputs,
    max_depth: u32,
    scale: f32,
}

/// Draws trees and decides bloom, wither and spawning per branch.
#[derive(Debug)]
pub struct Renderer {
    wind: WindField,
    spawn_key: Perlin,
    rng: StdRng,
    flex_root: f32,
    flex_tip: f32,
    foliage_levels: u32,
    flower_threshold: f32,
    spawn_min_bloom: f32,
    min_branch_px: f32,
}

impl Renderer {
    pub fn new(cfg: &EngineConfig) -> Self {
        let seed = cfg.base_seed;
        Self {
            wind: WindField::new(seed as u32),
            spawn_key: Perlin::new((seed as u32).wrapping_add(17)),
            rng: StdRng::seed_from_u64(seed.wrapping_add(0x9E37_79B9)),
            flex_root: cfg.flex_root,
            flex_tip: cfg.flex_tip,
            foliage_levels: cfg.foliage_levels,
            flower_threshold: cfg.flower_threshold,
            spawn_min_bloom: cfg.spawn_min_bloom,
            min_branch_px: cfg.min_branch_px,
        }
    }

    /// Shared wind angle for a tick.
    pub fn wind_angle(&self, time: f32, smoothed_wind: f32) -> f32 {
        self.wind.angle(time, smoothed_wind)
    }

    /// How strongly a branch at `depth` follows the wind.
    ///
    /// Interpolates linearly from `flex_root` at the trunk to `flex_tip` at
    /// `max_depth`.
    pub fn flexibility(&self, depth: u32, max_depth: u32) -> f32 {
        let t = if max_depth == 0 {
            1.0
        } else {
            (depth as f32 / max_depth as f32).min(1.0)
        };
        self.flex_root + (self.flex_tip - self.flex_root) * t
    }

    /// `true` for branches in the last `foliage_levels` depths of a tree.
    pub fn is_near_terminal(&self, depth: u32, max_depth: u32) -> bool {
        max_depth.saturating_sub(depth) < self.foliage_levels
    }

    /// Clears the canvas and tints it warm for positive mood, cold for
    /// negative mood.
    pub fn background(canvas: &mut dyn Canvas, mood: f32) {
        fill_background(canvas, BASE_BACKGROUND);
        if mood > 0.0 {
            fill_background(canvas, WARM_TINT.with_alpha(mood * WARM_ALPHA));
        } else if mood < 0.0 {
            fill_background(canvas, COLD_TINT.with_alpha(-mood * COLD_ALPHA));
        }
    }

    /// Recursively draws one tree.
    ///
    /// ### Parameters
    /// - `canvas` - Target surface.
    /// - `tree` - Tree to draw; its trunk base sits on the bottom edge.
    /// - `inputs` - Smoothed state and shared wind angle for this tick.
    /// - `spawns` - Receives particle requests raised at twig tips.
    /// - `stats` - Counters updated while walking.
    pub fn draw_tree(
        &mut self,
        canvas: &mut dyn Canvas,
        tree: &TreeInstance,
        inputs: FrameInputs,
        spawns: &mut Vec<SpawnRequest>,
        stats: &mut FrameStats,
    ) {
        let base = tree.base(canvas.size());
        let mut walk = Walk {
            canvas,
            spawns,
            stats,
            inputs,
            max_depth: tree.max_depth,
            scale: tree.scale,
        };
        let rotation = tree.root.angle_offset
            + inputs.wind_angle * self.flexibility(tree.root.depth, tree.max_depth);
        self.walk(&mut walk, &tree.root, base, rotation);
    }

    fn walk(&mut self, w: &mut Walk<'_>, branch: &Branch, base: Vec2, rotation: f32) {
        let len = branch.length * w.scale;
        if len < self.min_branch_px {
            return;
        }

        let bloom = w.inputs.bloom;
        // Rotation 0 points straight up; positive leans right.
        let tip = base + Vec2::new(rotation.sin(), -rotation.cos()) * len;
        let color = DORMANT_BRANCH.lerp(THRIVING_BRANCH, bloom);
        w.canvas
            .stroke_segment(base, tip, (branch.thickness * w.scale).max(0.5), color);
        w.stats.branches_drawn += 1;

        if self.is_near_terminal(branch.depth, w.max_depth) {
            w.stats.near_terminal += 1;
            if bloom > branch.noise_threshold {
                self.draw_foliage(w, branch, tip, rotation);
            }
            self.maybe_spawn(w, tip);
        }

        if branch.depth >= w.max_depth {
            return;
        }
        for child in &branch.children {
            let child_rotation = rotation
                + child.angle_offset
                + w.inputs.wind_angle * self.flexibility(child.depth, w.max_depth);
            self.walk(w, child, tip, child_rotation);
        }
    }

    fn draw_foliage(&self, w: &mut Walk<'_>, branch: &Branch, tip: Vec2, rotation: f32) {
        let inputs = w.inputs;
        w.stats.foliage_attached += 1;

        let breath = 1.0
            + BREATH_AMPLITUDE
                * (inputs.time * BREATH_SPEED + branch.depth as f32 + tip.x * 0.05).sin();

        let leaf_size = LEAF_SIZE * w.scale * breath;
        let leaf_color = LEAF_COLOR.with_alpha(FOLIAGE_ALPHA);
        for side in [-1.0_f32, 1.0] {
            let t = Affine2::from_angle_translation(rotation + side * LEAF_SPREAD, tip);
            draw_leaf(w.canvas, t, leaf_size, leaf_color);
        }

        if branch.has_flower && inputs.bloom > self.flower_threshold {
            let t = Affine2::from_angle_translation(rotation, tip);
            draw_flower(
                w.canvas,
                t,
                inputs.style,
                FLOWER_SIZE * w.scale * breath,
                FOLIAGE_ALPHA,
            );
            w.stats.flowers_drawn += 1;
        }
    }

    /// Raises a spawn request with probability `spawn_rate`.
    ///
    /// The uniform draw is offset by a noise sample keyed on the tip
    /// position and the clock, which keeps neighbouring twigs and trees
    /// from shedding in lockstep without changing the distribution.
    fn maybe_spawn(&mut self, w: &mut Walk<'_>, tip: Vec2) {
        let inputs = w.inputs;
        if inputs.bloom <= self.spawn_min_bloom || inputs.spawn_rate <= 0.0 {
            return;
        }

        let key = self.spawn_key.get([
            tip.x as f64 * 0.01,
            tip.y as f64 * 0.01,
            inputs.time as f64 * 0.5,
        ]) as f32;
        let draw = (self.rng.random::<f32>() + (key + 1.0) * 0.5).fract();

        if draw < inputs.spawn_rate {
            w.spawns.push(SpawnRequest {
                pos: tip,
                scale: w.scale,
            });
            w.stats.spawns_requested += 1;
        }
    }
}
