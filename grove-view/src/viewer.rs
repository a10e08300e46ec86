//! Interactive viewer for the animated grove, built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the [`Engine`] and implements
//! [`eframe::App`]: it drives the engine from a fixed-rate scheduler and
//! exposes the signal sources through an egui side panel.

use eframe::App;
use grove_core::{DrawList, Engine, FlowerStyle, FrameStats, SceneMode};

use crate::painter::PainterCanvas;
use crate::signals::{HostSignals, SourceMode};

/// Default tick interval, in seconds.
pub const TICK_INTERVAL: f64 = 1.0 / 30.0;

/// Main application state for the viewer.
///
/// The per-frame update is:
/// 1. Build the panels and apply control changes to the signal source.
/// 2. Resize the engine if the canvas area changed size.
/// 3. If `running` and `step_interval` has elapsed, call [`Viewer::step_once`].
/// 4. Replay the last recorded frame into the canvas area.
///
/// ### Fields
/// - `engine` - The scene, owning its [`HostSignals`].
/// - `frame` - Commands recorded by the last tick, replayed on every repaint.
/// - `stats` - Counters returned by the last tick.
///
/// - `running` - Whether the scheduler is advancing the engine.
/// - `step_interval` - Target time between ticks (seconds).
/// - `last_step_time` - Time stamp of the last tick (egui time).
/// - `last_step_dt` - Actual time between the last two ticks.
pub struct Viewer {
    engine: Engine<HostSignals>,
    frame: DrawList,
    stats: FrameStats,

    running: bool,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Wraps an initialised engine; the scheduler starts running.
    pub fn new(engine: Engine<HostSignals>) -> Self {
        let frame = DrawList::new(engine.viewport());
        Self {
            engine,
            frame,
            stats: FrameStats::default(),
            running: true,
            step_interval: TICK_INTERVAL,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        }
    }

    /// Advances the engine by one tick and records its output.
    ///
    /// ### Parameters
    /// - `now` - Host time in seconds.
    /// - `pointer_x` - Pointer x relative to the canvas, if hovering.
    fn step_once(&mut self, now: f64, pointer_x: Option<f32>) {
        let dt = if self.last_step_time > 0.0 {
            self.last_step_dt = now - self.last_step_time;
            self.last_step_dt
        } else {
            self.step_interval
        };

        self.engine.signals_mut().update(now, pointer_x);
        self.frame.reset(self.engine.viewport());
        self.stats = self.engine.tick(dt as f32, &mut self.frame);
        self.last_step_time = now;
    }

    /// Resizes the engine when the canvas area changed size.
    ///
    /// ### Returns
    /// `true` if a resize happened.
    fn sync_viewport(&mut self, size: egui::Vec2) -> bool {
        let current = self.engine.viewport();
        if (current.x - size.x).abs() < 0.5 && (current.y - size.y).abs() < 0.5 {
            return false;
        }
        self.engine.resize(size.x, size.y);
        true
    }

    /// Builds the top panel UI (run controls, stepping).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.01..=0.5)
                        .speed(0.005),
                );

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    self.step_once(now, None);
                }

                if ui.button("Reset smoothing").clicked() {
                    self.engine.reset_smoothing();
                }
            });
        });
    }

    /// Builds the bottom status bar.
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.step_interval));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("trees = {}", self.engine.forest().trees.len()));
                ui.label(format!("branches = {}", self.stats.branches_drawn));
                ui.label(format!("foliage = {}", self.stats.foliage_attached));
                ui.label(format!("particles = {}", self.stats.live_particles));
                ui.separator();
                ui.label(format!("mood = {:+.2}", self.stats.smoothed_mood));
                ui.label(format!("wind = {:+.2}", self.stats.smoothed_wind));
            });
        });
    }

    /// Builds the right-hand panel controlling the signal source.
    fn ui_signal_panel(&mut self, ctx: &egui::Context) {
        let max_particles = self.engine.config().max_particles;
        let signals = self.engine.signals_mut();

        egui::SidePanel::right("signal_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Signals");

                ui.separator();
                ui.label("Source");
                for mode in SourceMode::ALL {
                    ui.radio_value(&mut signals.mode, mode, mode.label());
                }

                ui.separator();
                let manual_mood = signals.mode != SourceMode::Demo;
                let manual_wind = signals.mode == SourceMode::Manual;
                ui.add_enabled(
                    manual_mood,
                    egui::Slider::new(&mut signals.slider_mood, -1.0..=1.0).text("Mood"),
                );
                ui.add_enabled(
                    manual_wind,
                    egui::Slider::new(&mut signals.slider_wind, -1.0..=1.0).text("Wind"),
                );
                if signals.mode == SourceMode::Gesture {
                    ui.small("Sweep the pointer across the scene to blow wind.");
                }

                ui.separator();
                egui::ComboBox::from_label("Flower")
                    .selected_text(signals.style.name())
                    .show_ui(ui, |ui| {
                        for style in FlowerStyle::ALL {
                            ui.selectable_value(&mut signals.style, style, style.name());
                        }
                    });

                ui.separator();
                ui.label("Scene");
                for mode in SceneMode::ALL {
                    ui.radio_value(&mut signals.scene_mode, mode.as_raw(), mode.to_string());
                }

                ui.separator();
                ui.label(format!("particle cap = {max_particles}"));
            });
    }

    /// Builds the central panel the scene is drawn into.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new())
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::hover());
                let rect = response.rect;

                self.sync_viewport(rect.size());

                // Auto-run the scheduler if requested.
                if self.running {
                    let now = ctx.input(|i| i.time);
                    if now - self.last_step_time >= self.step_interval {
                        let pointer_x = response.hover_pos().map(|p| p.x - rect.min.x);
                        self.step_once(now, pointer_x);
                    }
                    ctx.request_repaint();
                }

                let painter = ui.painter_at(rect);
                let mut canvas = PainterCanvas::new(&painter, rect);
                self.frame.replay(&mut canvas);
            });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_signal_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        self.engine.dispose();
    }
}
