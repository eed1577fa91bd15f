use crate::foundation::core::{Affine, Point, Vec2};
use crate::model::AnimationParams;
use std::f64::consts::PI;

/// Length of one animation loop at `speed = 1`, in milliseconds.
pub const LOOP_DURATION_MS: f64 = 2000.0;

/// Shared periodic driver: `sin(2π · (t / 2000) · speed + offset°)`.
pub fn cycle_at(params: &AnimationParams, time_ms: f64) -> f64 {
    ((time_ms / LOOP_DURATION_MS) * 2.0 * PI * params.speed + params.offset * PI / 180.0).sin()
}

/// A part's transform channels evaluated at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartMotion {
    pub cycle: f64,
    pub rotation_rad: f64,
    pub translation: Vec2,
    pub scale: f64,
}

impl PartMotion {
    /// The untransformed pose.
    pub const REST: Self = Self {
        cycle: 0.0,
        rotation_rad: 0.0,
        translation: Vec2::ZERO,
        scale: 1.0,
    };

    pub fn at(params: &AnimationParams, time_ms: f64) -> Self {
        let cycle = cycle_at(params, time_ms);
        Self {
            cycle,
            rotation_rad: (params.rotation * PI / 180.0) * cycle,
            translation: Vec2::new(params.move_x * cycle, params.move_y * cycle),
            // |cycle|: scale reaches its extreme on both half-cycles and never inverts through 1.
            scale: 1.0 + (params.scale - 1.0) * cycle.abs(),
        }
    }

    /// Image-space transform for a layer pivoting around `anchor`:
    /// translate(anchor + move) · rotate · scale · translate(-anchor).
    pub fn affine(&self, anchor: Point) -> Affine {
        let a = anchor.to_vec2();
        Affine::translate(a + self.translation)
            * Affine::rotate(self.rotation_rad)
            * Affine::scale(self.scale)
            * Affine::translate(-a)
    }

    /// Opacity of the pulsing tint overlay.
    pub fn tint_alpha(&self, params: &AnimationParams) -> f64 {
        (params.tint_intensity * self.cycle.abs()).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/motion.rs"]
mod tests;
