use tracing::warn;

/// Low-pass filter turning raw mood/wind reads into animation-stable values.
///
/// Mood converges at `rise_rate` while the raw value is at or above the
/// smoothed one and at the slower `fall_rate` otherwise, so blooming
/// outpaces withering. Wind uses one symmetric rate.
#[derive(Clone, Debug, PartialEq)]
pub struct SignalSmoother {
    pub mood: f32,
    pub wind: f32,
    rise_rate: f32,
    fall_rate: f32,
    wind_rate: f32,
    mood_was_invalid: bool,
    wind_was_invalid: bool,
}

impl SignalSmoother {
    pub fn new(rise_rate: f32, fall_rate: f32, wind_rate: f32) -> Self {
        Self {
            mood: 0.0,
            wind: 0.0,
            rise_rate,
            fall_rate,
            wind_rate,
            mood_was_invalid: false,
            wind_was_invalid: false,
        }
    }

    /// Moves the smoothed values one tick toward the raw reads.
    ///
    /// Raw values are sanitised first: non-finite reads count as `0`, and
    /// both signals are clamped to `[-1, 1]`.
    pub fn advance(&mut self, raw_mood: f32, raw_wind: f32) {
        let mood = sanitize(raw_mood, "mood", &mut self.mood_was_invalid);
        let wind = sanitize(raw_wind, "wind", &mut self.wind_was_invalid);

        let rate = if mood >= self.mood {
            self.rise_rate
        } else {
            self.fall_rate
        };
        self.mood += (mood - self.mood) * rate;
        self.wind += (wind - self.wind) * self.wind_rate;
    }

    /// `mood` clamped to `[0, 1]`.
    pub fn bloom_factor(&self) -> f32 {
        self.mood.clamp(0.0, 1.0)
    }

    pub fn reset(&mut self) {
        self.mood = 0.0;
        self.wind = 0.0;
    }
}

fn sanitize(raw: f32, name: &'static str, was_invalid: &mut bool) -> f32 {
    if raw.is_finite() {
        *was_invalid = false;
        raw.clamp(-1.0, 1.0)
    } else {
        if !*was_invalid {
            warn!(signal = name, value = %raw, "non-finite signal read, using 0");
        }
        *was_invalid = true;
        0.0
    }
}
