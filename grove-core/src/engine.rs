//! Engine lifecycle: init, resize, tick, dispose.
//!
//! One [`Engine::tick`] performs, in order:
//! 1. Scene-mode check - rebuild the [`Forest`] if the host switched modes.
//! 2. Signal read and smoothing via [`SignalSmoother`].
//! 3. Background tint from the smoothed mood.
//! 4. One shared wind angle for the whole tick.
//! 5. The branch walk of every tree, collecting spawn requests.
//! 6. Particle spawning, integration and drawing.

use glam::Vec2;
use tracing::{debug, info};

use crate::canvas::Canvas;
use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::forest::Forest;
use crate::particles::{ParticleParams, ParticleSystem};
use crate::renderer::{FrameInputs, FrameStats, Renderer, SpawnRequest};
use crate::signals::SignalSource;
use crate::smoother::SignalSmoother;
use crate::types::SceneMode;

/// The animated tree scene, driven by a host-owned frame scheduler.
///
/// Single-threaded: the host calls [`Engine::tick`] from its own loop and
/// mutates the signal source only between ticks.
#[derive(Debug)]
pub struct Engine<S: SignalSource> {
    signals: S,
    cfg: EngineConfig,
    viewport: Vec2,
    forest: Forest,
    smoother: SignalSmoother,
    renderer: Renderer,
    particles: ParticleSystem,
    spawns: Vec<SpawnRequest>,
    time: f32,
    ticks: u64,
    disposed: bool,
}

impl<S: SignalSource> Engine<S> {
    /// Creates an engine for a `width` x `height` canvas.
    ///
    /// The forest is built immediately for the scene mode the source reports.
    ///
    /// ### Returns
    /// - `Ok(Engine)` ready to tick.
    /// - `Err(ConfigError)` if `cfg` fails [`EngineConfig::validate`].
    pub fn new(
        signals: S,
        width: f32,
        height: f32,
        cfg: EngineConfig,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;

        let viewport = sanitize_viewport(width, height);
        let mode = SceneMode::from_raw(signals.scene_mode());
        let forest = Forest::rebuild(mode, viewport, &cfg);

        info!(
            %mode,
            width = viewport.x,
            height = viewport.y,
            max_particles = cfg.max_particles,
            "engine initialised"
        );

        Ok(Self {
            signals,
            smoother: SignalSmoother::new(cfg.mood_rise_rate, cfg.mood_fall_rate, cfg.wind_rate),
            renderer: Renderer::new(&cfg),
            particles: ParticleSystem::new(ParticleParams::from(&cfg), cfg.base_seed),
            spawns: Vec::new(),
            cfg,
            viewport,
            forest,
            time: 0.0,
            ticks: 0,
            disposed: false,
        })
    }

    /// Adopts a new canvas size and rebuilds the forest for it.
    pub fn resize(&mut self, width: f32, height: f32) {
        if self.disposed {
            return;
        }
        self.viewport = sanitize_viewport(width, height);
        info!(width = self.viewport.x, height = self.viewport.y, "viewport resized");
        self.forest = Forest::rebuild(self.forest.mode, self.viewport, &self.cfg);
    }

    /// Advances the scene by one frame and draws it onto `canvas`.
    ///
    /// ### Parameters
    /// - `dt` - Seconds since the previous tick; advances the engine clock.
    /// - `canvas` - Surface to draw on, sized like the last resize.
    ///
    /// ### Returns
    /// Counters for what was drawn; all zero once disposed.
    pub fn tick(&mut self, dt: f32, canvas: &mut dyn Canvas) -> FrameStats {
        if self.disposed {
            return FrameStats::default();
        }

        if dt.is_finite() && dt > 0.0 {
            self.time += dt;
        }
        self.ticks += 1;

        let mode = SceneMode::from_raw(self.signals.scene_mode());
        if mode != self.forest.mode {
            debug!(from = %self.forest.mode, to = %mode, "scene mode changed");
            self.forest = Forest::rebuild(mode, self.viewport, &self.cfg);
        }

        self.smoother
            .advance(self.signals.mood(), self.signals.wind_force());
        let style = self.signals.flower_style();

        Renderer::background(canvas, self.smoother.mood);

        let wind_angle = self.renderer.wind_angle(self.time, self.smoother.wind);
        let inputs = FrameInputs {
            bloom: self.smoother.bloom_factor(),
            wind_angle,
            time: self.time,
            style,
            spawn_rate: self.cfg.spawn_rate_for(self.forest.mode),
        };

        let mut stats = FrameStats {
            smoothed_mood: self.smoother.mood,
            smoothed_wind: self.smoother.wind,
            wind_angle,
            ..FrameStats::default()
        };

        self.spawns.clear();
        for tree in &self.forest.trees {
            self.renderer
                .draw_tree(canvas, tree, inputs, &mut self.spawns, &mut stats);
        }

        self.particles.set_wind(self.smoother.wind);
        for req in &self.spawns {
            self.particles.spawn(req.pos, req.scale);
        }
        self.particles.tick(self.smoother.wind, style, canvas);
        stats.live_particles = self.particles.len();

        stats
    }

    /// Releases the forest and particles; later ticks draw nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.forest = Forest {
            mode: self.forest.mode,
            trees: Vec::new(),
        };
        self.particles.clear();
        self.spawns = Vec::new();
        self.disposed = true;
        info!(ticks = self.ticks, "engine disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn signals(&self) -> &S {
        &self.signals
    }

    pub fn signals_mut(&mut self) -> &mut S {
        &mut self.signals
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn smoother(&self) -> &SignalSmoother {
        &self.smoother
    }

    /// Zeroes the smoothed signals so the scene restarts from neutral.
    pub fn reset_smoothing(&mut self) {
        self.smoother.reset();
    }

    pub fn scene_mode(&self) -> SceneMode {
        self.forest.mode
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Engine clock in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

fn sanitize_viewport(width: f32, height: f32) -> Vec2 {
    let fix = |v: f32| if v.is_finite() { v.max(1.0) } else { 1.0 };
    Vec2::new(fix(width), fix(height))
}
