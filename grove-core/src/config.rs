use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::SceneMode;

/// Deepest recursion a tree may be configured with; a depth-`d` tree holds
/// `2^(d+1) - 1` branches.
pub const MAX_DEPTH: u32 = 12;

/// Every tunable of the engine.
///
/// All lengths are in canvas pixels, all rates are per tick. The defaults
/// are tuned for a host ticking at roughly 30 Hz.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Forest layout.
    pub base_seed: u64,
    pub forest_seed_stride: u64,
    pub single_depth: u32,
    pub pair_depth: u32,
    pub forest_depth: u32,
    pub forest_count: usize,
    pub forest_x_min: f32,
    pub forest_x_max: f32,
    pub forest_scale_min: f32,
    pub forest_scale_max: f32,
    pub pair_offset: f32,
    pub pair_scale: f32,

    // Signal smoothing.
    pub mood_rise_rate: f32,
    pub mood_fall_rate: f32,
    pub wind_rate: f32,

    // Branch walk.
    pub flex_root: f32,
    pub flex_tip: f32,
    pub foliage_levels: u32,
    pub flower_threshold: f32,
    pub min_branch_px: f32,

    // Spawning.
    pub spawn_min_bloom: f32,
    pub spawn_rate_single: f32,
    pub spawn_rate_pair: f32,
    pub spawn_rate_forest: f32,

    // Particles.
    pub max_particles: usize,
    pub gravity: f32,
    pub wind_coefficient: f32,
    pub turbulence: f32,
    pub damping: f32,
    pub life_decrement: f32,
    pub offscreen_margin: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_seed: 42,
            forest_seed_stride: 7919,
            single_depth: 9,
            pair_depth: 8,
            forest_depth: 6,
            forest_count: 10,
            forest_x_min: 0.05,
            forest_x_max: 0.95,
            forest_scale_min: 0.55,
            forest_scale_max: 0.95,
            pair_offset: 0.2,
            pair_scale: 0.8,

            mood_rise_rate: 0.10,
            mood_fall_rate: 0.03,
            wind_rate: 0.12,

            flex_root: 0.03,
            flex_tip: 0.45,
            foliage_levels: 4,
            flower_threshold: 0.25,
            min_branch_px: 2.0,

            spawn_min_bloom: 0.3,
            spawn_rate_single: 0.004,
            spawn_rate_pair: 0.003,
            spawn_rate_forest: 0.0015,

            max_particles: 400,
            gravity: 0.05,
            wind_coefficient: 0.08,
            turbulence: 0.04,
            damping: 0.96,
            life_decrement: 1.5,
            offscreen_margin: 50.0,
        }
    }
}

impl EngineConfig {
    /// Maximum recursion depth used for trees in `mode`.
    pub fn depth_for(&self, mode: SceneMode) -> u32 {
        match mode {
            SceneMode::Single => self.single_depth,
            SceneMode::Pair => self.pair_depth,
            SceneMode::Forest => self.forest_depth,
        }
    }

    /// Per-branch, per-tick spawn probability used in `mode`.
    pub fn spawn_rate_for(&self, mode: SceneMode) -> f32 {
        match mode {
            SceneMode::Single => self.spawn_rate_single,
            SceneMode::Pair => self.spawn_rate_pair,
            SceneMode::Forest => self.spawn_rate_forest,
        }
    }

    /// Checks the invariants the engine relies on.
    ///
    /// ### Returns
    /// - `Ok(())` if the configuration is usable.
    /// - `Err(ConfigError)` naming the first offending field otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_particles == 0 {
            return Err(ConfigError::ZeroParticleCap);
        }
        if self.forest_count == 0 {
            return Err(ConfigError::EmptyForest);
        }

        for (name, value) in [
            ("single_depth", self.single_depth),
            ("pair_depth", self.pair_depth),
            ("forest_depth", self.forest_depth),
        ] {
            if !(1..=MAX_DEPTH).contains(&value) {
                return Err(ConfigError::DepthOutOfRange {
                    name,
                    value,
                    max: MAX_DEPTH,
                });
            }
            if self.foliage_levels > value {
                return Err(ConfigError::FoliageTooDeep {
                    name,
                    levels: self.foliage_levels,
                    depth: value,
                });
            }
        }

        for (name, value) in [
            ("mood_rise_rate", self.mood_rise_rate),
            ("mood_fall_rate", self.mood_fall_rate),
            ("wind_rate", self.wind_rate),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::RateOutOfRange { name, value });
            }
        }

        for (name, value) in [
            ("spawn_rate_single", self.spawn_rate_single),
            ("spawn_rate_pair", self.spawn_rate_pair),
            ("spawn_rate_forest", self.spawn_rate_forest),
            ("spawn_min_bloom", self.spawn_min_bloom),
            ("flower_threshold", self.flower_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }

        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(ConfigError::Damping(self.damping));
        }
        if !(self.life_decrement > 0.0) {
            return Err(ConfigError::LifeDecrement(self.life_decrement));
        }
        if self.flex_root > self.flex_tip {
            return Err(ConfigError::InvertedFlexibility {
                root: self.flex_root,
                tip: self.flex_tip,
            });
        }

        // x ratios stay on the canvas; scales stay positive.
        let (x_min, x_max) = (self.forest_x_min, self.forest_x_max);
        if !(x_min < x_max && x_min >= 0.0 && x_max <= 1.0) {
            return Err(ConfigError::InvalidRange {
                name: "forest_x",
                min: x_min,
                max: x_max,
            });
        }
        let (s_min, s_max) = (self.forest_scale_min, self.forest_scale_max);
        if !(s_min < s_max && s_min > 0.0) {
            return Err(ConfigError::InvalidRange {
                name: "forest_scale",
                min: s_min,
                max: s_max,
            });
        }

        if !(0.0..=0.5).contains(&self.pair_offset) {
            return Err(ConfigError::OutOfRange {
                name: "pair_offset",
                value: self.pair_offset,
                min: 0.0,
                max: 0.5,
            });
        }
        if !(self.pair_scale > 0.0 && self.pair_scale.is_finite()) {
            return Err(ConfigError::NonPositive {
                name: "pair_scale",
                value: self.pair_scale,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_broken_values() {
        let mut cfg = EngineConfig::default();
        cfg.max_particles = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroParticleCap));

        let mut cfg = EngineConfig::default();
        cfg.mood_fall_rate = 0.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::RateOutOfRange { name: "mood_fall_rate", .. })
        ));

        let mut cfg = EngineConfig::default();
        cfg.damping = 1.0;
        assert_eq!(cfg.validate(), Err(ConfigError::Damping(1.0)));

        let mut cfg = EngineConfig::default();
        cfg.flex_root = 0.9;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvertedFlexibility { .. })
        ));

        let mut cfg = EngineConfig::default();
        cfg.forest_scale_min = 0.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidRange { name: "forest_scale", .. })
        ));

        // Tree placement must stay on the canvas with a positive scale.
        let mut cfg = EngineConfig::default();
        cfg.pair_scale = -1.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositive { name: "pair_scale", .. })
        ));

        let mut cfg = EngineConfig::default();
        cfg.pair_offset = 0.6;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OutOfRange { name: "pair_offset", .. })
        ));

        let mut cfg = EngineConfig::default();
        cfg.forest_x_max = 3.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidRange { name: "forest_x", .. })
        ));
    }

    #[test]
    fn validate_bounds_depth_and_foliage_window() {
        let mut cfg = EngineConfig::default();
        cfg.single_depth = 40;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DepthOutOfRange {
                name: "single_depth",
                value: 40,
                max: MAX_DEPTH,
            })
        );

        let mut cfg = EngineConfig::default();
        cfg.forest_depth = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::DepthOutOfRange { name: "forest_depth", .. })
        ));

        let mut cfg = EngineConfig::default();
        cfg.foliage_levels = u32::MAX;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::FoliageTooDeep { levels: u32::MAX, .. })
        ));

        // The window may cover a whole tree.
        let mut cfg = EngineConfig::default();
        cfg.foliage_levels = cfg.forest_depth;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{ "max_particles": 120, "base_seed": 7 }"#).unwrap();

        assert_eq!(cfg.max_particles, 120);
        assert_eq!(cfg.base_seed, 7);
        assert_eq!(cfg.forest_count, EngineConfig::default().forest_count);
    }

    #[test]
    fn depth_shrinks_as_tree_count_grows() {
        let cfg = EngineConfig::default();
        assert!(cfg.depth_for(SceneMode::Single) > cfg.depth_for(SceneMode::Pair));
        assert!(cfg.depth_for(SceneMode::Pair) > cfg.depth_for(SceneMode::Forest));
        assert!(cfg.spawn_rate_for(SceneMode::Forest) < cfg.spawn_rate_for(SceneMode::Single));
    }
}
