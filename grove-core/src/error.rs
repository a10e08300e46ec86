//! Error types surfaced by configuration and parsing.
//!
//! Nothing inside a tick returns an error; these only appear when an
//! [`crate::engine::Engine`] is constructed or when host input is parsed.

use thiserror::Error;

/// Rejected [`crate::config::EngineConfig`] values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("particle cap must be at least 1")]
    ZeroParticleCap,

    #[error("{name} must lie in (0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f32 },

    #[error("{name} must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f32 },

    #[error("damping must lie in (0, 1), got {0}")]
    Damping(f32),

    #[error("life decrement must be positive, got {0}")]
    LifeDecrement(f32),

    #[error("flexibility range is inverted: root {root} > tip {tip}")]
    InvertedFlexibility { root: f32, tip: f32 },

    #[error("{name} range is empty or inverted: [{min}, {max}]")]
    InvalidRange { name: &'static str, min: f32, max: f32 },

    #[error("forest needs at least one tree")]
    EmptyForest,

    #[error("{name} must lie in [{min}, {max}], got {value}")]
    OutOfRange { name: &'static str, value: f32, min: f32, max: f32 },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("{name} must lie in [1, {max}], got {value}")]
    DepthOutOfRange { name: &'static str, value: u32, max: u32 },

    #[error("foliage_levels {levels} exceeds {name} {depth}")]
    FoliageTooDeep { name: &'static str, levels: u32, depth: u32 },
}

/// A flower style name that is not one of `peach`, `sakura`, `delonix`.
#[derive(Debug, Error, PartialEq)]
#[error("unknown flower style `{0}` (expected peach, sakura or delonix)")]
pub struct ParseStyleError(pub String);
