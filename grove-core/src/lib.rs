//! Mood-driven procedural tree animation engine.
//!
//! Two host signals, a mood in `[-1, 1]` and a wind force, decide whether
//! the trees stand bare or blossom, how hard they sway, and how many leaves
//! and petals fall.
//!
//! Main components:
//! - [`skeleton`]: seed-deterministic fractal branch trees.
//! - [`forest`]: tree placement per scene mode.
//! - [`smoother`]: asymmetric low-pass filtering of the raw signals.
//! - [`wind`]: the shared per-tick wind angle.
//! - [`renderer`]: the recursive branch walk, foliage and spawn gating.
//! - [`particles`]: falling leaf and flower simulation.
//! - [`flowers`]: leaf and blossom shapes per style.
//! - [`canvas`]: drawing surface abstraction and a recording canvas.
//! - [`engine`]: lifecycle tying everything to a host's tick loop.
//! - [`signals`]: the accessor trait the host implements.
//! - [`config`], [`error`], [`types`]: settings, errors and shared enums.

pub mod canvas;
pub mod config;
pub mod engine;
pub mod error;
pub mod flowers;
pub mod forest;
pub mod particles;
pub mod renderer;
pub mod signals;
pub mod skeleton;
pub mod smoother;
pub mod types;
pub mod wind;

pub use canvas::{Canvas, DrawCommand, DrawList, Rgba};
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{ConfigError, ParseStyleError};
pub use renderer::FrameStats;
pub use signals::{ManualSignals, SignalSource};
pub use types::{FlowerStyle, SceneMode};
