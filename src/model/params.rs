use crate::foundation::color::Rgba8;
use serde::{Deserialize, Serialize};

/// Oscillation parameters of one part. Every channel follows the same shared sinusoid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationParams {
    /// Peak rotation in degrees.
    pub rotation: f64,
    /// Peak horizontal translation in pixels.
    pub move_x: f64,
    /// Peak vertical translation in pixels.
    pub move_y: f64,
    /// Scale reached at the cycle extremes (1 = no scaling).
    pub scale: f64,
    /// Loops per 2000 ms period.
    pub speed: f64,
    /// Phase offset in degrees.
    pub offset: f64,
    pub tint_color: Rgba8,
    /// Peak tint opacity in `[0, 1]`.
    pub tint_intensity: f64,
}

impl Default for AnimationParams {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            move_x: 0.0,
            move_y: 0.0,
            scale: 1.0,
            speed: 1.0,
            offset: 0.0,
            tint_color: Rgba8::rgb(255, 0, 0),
            tint_intensity: 0.0,
        }
    }
}
