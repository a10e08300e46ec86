//! Host-side signal sources for the viewer.
//!
//! [`HostSignals`] is what the engine reads each tick. Depending on
//! [`SourceMode`] its mood and wind come from the side-panel sliders, a
//! scripted demo, or the horizontal movement of the pointer over the canvas.

use grove_core::{FlowerStyle, SignalSource};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Pointer pixels per sample that map to full wind.
const GESTURE_GAIN: f32 = 1.0 / 24.0;
/// Per-sample decay of the gesture wind once the pointer stops moving.
const GESTURE_DECAY: f32 = 0.9;

/// Period, in seconds, of the demo mood sweep.
const DEMO_MOOD_PERIOD: f64 = 40.0;
/// Demo gusts change target every `GUST_MIN..GUST_MAX` seconds.
const GUST_MIN: f64 = 2.0;
const GUST_MAX: f64 = 6.0;
/// Fraction of the remaining distance to the gust target covered per update.
const GUST_APPROACH: f32 = 0.05;

/// Where mood and wind come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceMode {
    #[default]
    Manual,
    Demo,
    Gesture,
}

impl SourceMode {
    pub const ALL: [SourceMode; 3] = [SourceMode::Manual, SourceMode::Demo, SourceMode::Gesture];

    pub fn label(self) -> &'static str {
        match self {
            SourceMode::Manual => "Sliders",
            SourceMode::Demo => "Scripted demo",
            SourceMode::Gesture => "Pointer wind",
        }
    }
}

/// Turns horizontal pointer movement into a wind force in `[-1, 1]`.
///
/// Each sample is compared with the previous one. A sample carrying the
/// same timestamp as the last one is treated as "no new frame" and yields 0.
#[derive(Clone, Debug, Default)]
pub struct GestureWind {
    last: Option<(f32, f64)>,
}

impl GestureWind {
    /// Feeds one pointer sample and returns the wind it implies.
    ///
    /// ### Parameters
    /// - `x` - Pointer x in canvas pixels.
    /// - `timestamp` - Host time of the sample, in seconds.
    ///
    /// ### Returns
    /// The amplified horizontal delta clamped to `[-1, 1]`; `0.0` for the
    /// first sample and for a repeated timestamp.
    pub fn sample(&mut self, x: f32, timestamp: f64) -> f32 {
        let score = match self.last {
            Some((_, prev_t)) if prev_t == timestamp => return 0.0,
            Some((prev_x, _)) => ((x - prev_x) * GESTURE_GAIN).clamp(-1.0, 1.0),
            None => 0.0,
        };
        self.last = Some((x, timestamp));
        if score.is_finite() { score } else { 0.0 }
    }

    /// Forgets the previous sample, e.g. when the pointer leaves the canvas.
    pub fn release(&mut self) {
        self.last = None;
    }
}

/// Scripted input: a slow mood sine and random wind gusts.
#[derive(Clone, Debug)]
struct DemoScript {
    rng: StdRng,
    gust_target: f32,
    next_gust_at: f64,
}

impl DemoScript {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            gust_target: 0.0,
            next_gust_at: 0.0,
        }
    }

    fn mood(time: f64) -> f32 {
        (time * std::f64::consts::TAU / DEMO_MOOD_PERIOD).sin() as f32
    }

    /// Moves `wind` toward the current gust target, picking a new target
    /// once the current gust has run its course.
    fn wind(&mut self, time: f64, wind: f32) -> f32 {
        if time >= self.next_gust_at {
            self.gust_target = self.rng.random_range(-0.9..=0.9);
            self.next_gust_at = time + self.rng.random_range(GUST_MIN..GUST_MAX);
        }
        wind + (self.gust_target - wind) * GUST_APPROACH
    }
}

/// The viewer's [`SignalSource`].
///
/// The engine only reads it; the viewer updates it between ticks through
/// [`grove_core::Engine::signals_mut`].
#[derive(Clone, Debug)]
pub struct HostSignals {
    pub mode: SourceMode,
    /// Slider values, used as-is in [`SourceMode::Manual`].
    pub slider_mood: f32,
    pub slider_wind: f32,
    pub style: FlowerStyle,
    pub scene_mode: i32,

    mood: f32,
    wind: f32,
    gesture: GestureWind,
    demo: DemoScript,
}

impl HostSignals {
    pub fn new(style: FlowerStyle, scene_mode: i32, seed: u64) -> Self {
        Self {
            mode: SourceMode::Manual,
            slider_mood: 0.0,
            slider_wind: 0.0,
            style,
            scene_mode,
            mood: 0.0,
            wind: 0.0,
            gesture: GestureWind::default(),
            demo: DemoScript::new(seed),
        }
    }

    /// Refreshes the values the engine will read on its next tick.
    ///
    /// ### Parameters
    /// - `time` - Host time in seconds.
    /// - `pointer_x` - Pointer x over the canvas, if hovering.
    pub fn update(&mut self, time: f64, pointer_x: Option<f32>) {
        match self.mode {
            SourceMode::Manual => {
                self.mood = self.slider_mood;
                self.wind = self.slider_wind;
            }
            SourceMode::Demo => {
                self.mood = DemoScript::mood(time);
                self.wind = self.demo.wind(time, self.wind);
                // Mirror the script onto the sliders so switching back is seamless.
                self.slider_mood = self.mood;
                self.slider_wind = self.wind;
            }
            SourceMode::Gesture => {
                self.mood = self.slider_mood;
                match pointer_x {
                    Some(x) => {
                        let push = self.gesture.sample(x, time);
                        // Keep the strongest of the fresh push and the decaying gust.
                        let decayed = self.wind * GESTURE_DECAY;
                        self.wind = if push.abs() > decayed.abs() { push } else { decayed };
                    }
                    None => {
                        self.gesture.release();
                        self.wind *= GESTURE_DECAY;
                    }
                }
            }
        }
    }
}

impl SignalSource for HostSignals {
    fn mood(&self) -> f32 {
        self.mood
    }

    fn wind_force(&self) -> f32 {
        self.wind
    }

    fn flower_style(&self) -> FlowerStyle {
        self.style
    }

    fn scene_mode(&self) -> i32 {
        self.scene_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gesture_first_sample_is_calm() {
        let mut g = GestureWind::default();
        assert_eq!(g.sample(100.0, 0.0), 0.0);
    }

    #[test]
    fn gesture_delta_is_amplified_and_signed() {
        let mut g = GestureWind::default();
        g.sample(100.0, 0.0);
        let right = g.sample(112.0, 0.1);
        assert!((right - 0.5).abs() < 1e-6, "12 px should be half wind, got {right}");
        let left = g.sample(100.0, 0.2);
        assert!((left + 0.5).abs() < 1e-6);
    }

    #[test]
    fn gesture_is_clamped_to_unit_range() {
        let mut g = GestureWind::default();
        g.sample(0.0, 0.0);
        assert_eq!(g.sample(500.0, 0.1), 1.0);
        assert_eq!(g.sample(-500.0, 0.2), -1.0);
    }

    #[test]
    fn gesture_repeated_timestamp_yields_zero() {
        let mut g = GestureWind::default();
        g.sample(0.0, 1.0);
        assert_eq!(g.sample(40.0, 1.0), 0.0);
        // The repeated sample is ignored, so the next delta is still from x = 0.
        assert_eq!(g.sample(12.0, 1.1), 0.5);
    }

    #[test]
    fn gesture_release_restarts_tracking() {
        let mut g = GestureWind::default();
        g.sample(0.0, 0.0);
        g.release();
        assert_eq!(g.sample(300.0, 0.1), 0.0);
    }

    #[test]
    fn manual_mode_passes_sliders_through() {
        let mut s = HostSignals::new(FlowerStyle::Sakura, 2, 1);
        s.slider_mood = 0.6;
        s.slider_wind = -0.3;
        s.update(0.0, None);
        assert_eq!(s.mood(), 0.6);
        assert_eq!(s.wind_force(), -0.3);
        assert_eq!(s.flower_style(), FlowerStyle::Sakura);
        assert_eq!(s.scene_mode(), 2);
    }

    #[test]
    fn demo_mode_stays_in_range_and_moves() {
        let mut s = HostSignals::new(FlowerStyle::Peach, 1, 7);
        s.mode = SourceMode::Demo;
        let mut moods = Vec::new();
        for i in 0..1200 {
            let t = i as f64 / 30.0;
            s.update(t, None);
            assert!((-1.0..=1.0).contains(&s.mood()));
            assert!((-1.0..=1.0).contains(&s.wind_force()));
            moods.push(s.mood());
        }
        let (lo, hi) = moods
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &m| (lo.min(m), hi.max(m)));
        assert!(hi - lo > 1.5, "demo mood should sweep most of the range");
        assert_eq!(s.slider_mood, s.mood(), "sliders follow the script");
    }

    #[test]
    fn gesture_mode_decays_when_pointer_leaves() {
        let mut s = HostSignals::new(FlowerStyle::Peach, 1, 3);
        s.mode = SourceMode::Gesture;
        s.update(0.0, Some(100.0));
        s.update(0.1, Some(124.0));
        assert_eq!(s.wind_force(), 1.0);

        for i in 0..20 {
            s.update(0.2 + i as f64 * 0.1, None);
        }
        assert!(s.wind_force() > 0.0 && s.wind_force() < 0.2);
    }
}
