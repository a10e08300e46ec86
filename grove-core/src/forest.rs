use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::config::EngineConfig;
use crate::skeleton::{Branch, SkeletonGenerator, TrunkSize};
use crate::types::SceneMode;

/// One placed tree.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeInstance {
    /// Horizontal placement as a fraction of viewport width.
    pub x_ratio: f32,
    pub scale: f32,
    pub seed: u64,
    pub max_depth: u32,
    pub root: Branch,
}

impl TreeInstance {
    /// Screen position of the trunk base on a viewport of `size`.
    pub fn base(&self, size: Vec2) -> Vec2 {
        Vec2::new(self.x_ratio * size.x, size.y)
    }
}

/// The set of trees drawn for one scene configuration.
///
/// A forest is never edited in place: [`Forest::rebuild`] constructs a
/// fresh one and the caller swaps it in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Forest {
    pub mode: SceneMode,
    pub trees: Vec<TreeInstance>,
}

impl Forest {
    /// Builds every tree for `mode` on a viewport of `viewport` pixels.
    ///
    /// Layout per mode:
    /// - [`SceneMode::Single`] - one centered tree at full scale.
    /// - [`SceneMode::Pair`] - two trees mirrored around the center at
    ///   `cfg.pair_scale`.
    /// - [`SceneMode::Forest`] - `cfg.forest_count` trees evenly spread over
    ///   `[cfg.forest_x_min, cfg.forest_x_max]`. Each tree's seed is
    ///   `base_seed + i * forest_seed_stride` and its scale is drawn from that
    ///   seed, so neighbours do not end up with clustered heights.
    ///
    /// ### Parameters
    /// - `mode` - Scene mode to lay out.
    /// - `viewport` - Canvas size in pixels; sets trunk proportions.
    /// - `cfg` - Layout and depth settings.
    ///
    /// ### Returns
    /// A complete [`Forest`] for the given mode.
    pub fn rebuild(mode: SceneMode, viewport: Vec2, cfg: &EngineConfig) -> Self {
        let trunk = TrunkSize::for_viewport(viewport);
        let depth = cfg.depth_for(mode);
        let mut generator = SkeletonGenerator::new();

        let placements: Vec<(f32, f32, u64)> = match mode {
            SceneMode::Single => vec![(0.5, 1.0, cfg.base_seed)],
            SceneMode::Pair => vec![
                (0.5 - cfg.pair_offset, cfg.pair_scale, cfg.base_seed),
                (0.5 + cfg.pair_offset, cfg.pair_scale, cfg.base_seed.wrapping_add(1)),
            ],
            SceneMode::Forest => forest_placements(cfg),
        };

        let trees: Vec<TreeInstance> = placements
            .into_iter()
            .map(|(x_ratio, scale, seed)| TreeInstance {
                x_ratio,
                scale,
                seed,
                max_depth: depth,
                root: generator.build(seed, depth, trunk),
            })
            .collect();

        let forest = Self { mode, trees };
        info!(
            %mode,
            trees = forest.trees.len(),
            branches = forest.branch_count(),
            width = viewport.x,
            height = viewport.y,
            "forest rebuilt"
        );
        forest
    }

    /// Total number of branches over all trees.
    pub fn branch_count(&self) -> usize {
        self.trees.iter().map(|t| t.root.node_count()).sum()
    }
}

fn forest_placements(cfg: &EngineConfig) -> Vec<(f32, f32, u64)> {
    let n = cfg.forest_count;
    let span = cfg.forest_x_max - cfg.forest_x_min;
    let step = if n > 1 { span / (n - 1) as f32 } else { 0.0 };

    (0..n)
        .map(|i| {
            let x = if n > 1 {
                cfg.forest_x_min + step * i as f32
            } else {
                cfg.forest_x_min + span * 0.5
            };
            let seed = cfg
                .base_seed
                .wrapping_add((i as u64).wrapping_mul(cfg.forest_seed_stride));
            let mut rng = StdRng::seed_from_u64(seed);
            let scale = rng.random_range(cfg.forest_scale_min..=cfg.forest_scale_max);
            (x, scale, seed)
        })
        .collect()
}
