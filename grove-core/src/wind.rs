use noise::{NoiseFn, Perlin};

/// Amplitude, in radians, of the slow ambient sway present even in calm air.
pub const AMBIENT_AMPLITUDE: f32 = 0.04;
/// Time scale of the ambient noise field.
pub const AMBIENT_SPEED: f64 = 0.3;
/// Exponent of the sign-preserving wind response curve.
pub const WIND_EXPONENT: f32 = 1.4;
/// Directional lean, in radians, at full wind.
pub const LEAN_GAIN: f32 = 0.25;
/// Oscillation amplitude relative to full wind; kept below `LEAN_GAIN` so
/// the lean never flips sign.
pub const OSCILLATION_GAIN: f32 = 0.06;
/// Oscillation frequency in rad/s is `BASE + PER_WIND * |wind|`.
pub const OSCILLATION_BASE: f32 = 1.5;
pub const OSCILLATION_PER_WIND: f32 = 6.0;

/// Produces the one wind angle shared by every branch in a tick.
#[derive(Clone, Debug)]
pub struct WindField {
    noise: Perlin,
}

impl WindField {
    pub fn new(seed: u32) -> Self {
        Self {
            noise: Perlin::new(seed),
        }
    }

    /// Ambient sway sampled from the noise field at `time` seconds.
    pub fn ambient(&self, time: f32) -> f32 {
        let n = self.noise.get([time as f64 * AMBIENT_SPEED, 0.5]).clamp(-1.0, 1.0) as f32;
        n * AMBIENT_AMPLITUDE
    }

    /// Wind-driven sway: a lean following `sign(w) * |w|^1.4`, modulated by
    /// an oscillation that speeds up as the wind strengthens.
    pub fn active(time: f32, wind: f32) -> f32 {
        let curve = response_curve(wind);
        let freq = OSCILLATION_BASE + OSCILLATION_PER_WIND * wind.abs();
        curve * (LEAN_GAIN + OSCILLATION_GAIN * (time * freq).sin())
    }

    /// Total wind angle for a tick, in radians. Positive leans right.
    pub fn angle(&self, time: f32, wind: f32) -> f32 {
        self.ambient(time) + Self::active(time, wind)
    }
}

/// `sign(w) * |w|^WIND_EXPONENT`.
pub fn response_curve(wind: f32) -> f32 {
    wind.signum() * wind.abs().powf(WIND_EXPONENT)
}
