use crate::types::{FlowerStyle, SceneMode};

/// Pull-based accessors the engine reads from its host, once per tick.
///
/// The engine owns its source; hosts that need to change the values between
/// ticks reach it through [`crate::engine::Engine::signals_mut`].
pub trait SignalSource {
    /// Raw mood, nominally in `[-1, 1]`.
    fn mood(&self) -> f32;

    /// Raw wind force; positive blows to the right.
    fn wind_force(&self) -> f32;

    fn flower_style(&self) -> FlowerStyle;

    /// Raw scene mode (`1`, `2`, or `3` for the many-tree forest).
    fn scene_mode(&self) -> i32;
}

/// A [`SignalSource`] backed by plain fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ManualSignals {
    pub mood: f32,
    pub wind: f32,
    pub style: FlowerStyle,
    pub scene_mode: i32,
}

impl Default for ManualSignals {
    fn default() -> Self {
        Self {
            mood: 0.0,
            wind: 0.0,
            style: FlowerStyle::default(),
            scene_mode: SceneMode::Single.as_raw(),
        }
    }
}

impl SignalSource for ManualSignals {
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
