use serde::{Deserialize, Serialize};

/// Easing curve applied to the interpolation fraction inside one segment.
///
/// Every curve maps `0 → 0` and `1 → 1` exactly, so segment boundaries land
/// on the keyframe values regardless of the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    #[default]
    Linear,
    /// Quadratic ease-out, `1 - (1 - x)^2`.
    Power1Out,
    /// Hermite smoothstep, `x^2 (3 - 2x)`.
    SmoothStep,
}

impl Ease {
    #[must_use]
    pub fn apply(self, x: f32) -> f32 {
        let x = x.clamp(0.0, 1.0);
        match self {
            Ease::Linear => x,
            Ease::Power1Out => {
                let inv = 1.0 - x;
                1.0 - inv * inv
            }
            Ease::SmoothStep => x * x * (3.0 - 2.0 * x),
        }
    }
}
