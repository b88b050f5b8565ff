//! Easing functions for animation interpolation.
//!
//! Provides the easing curves used by phase tables and staged entity
//! animation. Every curve maps `0 → 0` and `1 → 1`; only
//! [`EasingFunction::BackOut`] leaves `[0, 1]` in between.
//! All functions are designed for <100ns evaluation time.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Overshoot constant for [`EasingFunction::BackOut`].
const BACK_C1: f32 = 1.70158;
/// `BACK_C1 + 1`.
const BACK_C3: f32 = BACK_C1 + 1.0;

/// Easing function variants for animation curves.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-in (slow start, fast end).
    QuadraticIn,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Quadratic ease-in-out.
    QuadraticInOut,
    /// Cubic ease-in. Used for dissolving elements.
    CubicIn,
    /// Cubic ease-out.
    CubicOut,
    /// Cubic ease-in-out. The usual camera phase curve.
    CubicInOut,
    /// Back ease-out: overshoots past 1 and settles. Used for building
    /// elements.
    BackOut,
    /// Square root ease-out (fast start, gradual slow).
    SqrtOut,
    /// Cubic Hermite interpolation with configurable control points.
    /// Formula: c1·3t(1-t)² + c2·3(1-t)t² + t³
    CubicHermite {
        /// First control point.
        c1: f32,
        /// Second control point.
        c2: f32,
    },
}

impl EasingFunction {
    /// Default easing function for camera phases.
    pub const DEFAULT: EasingFunction = EasingFunction::CubicInOut;

    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0]; NaN is treated as 0. The endpoints
    /// map to exactly 0.0 and 1.0 regardless of rounding in the polynomial.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            EasingFunction::Linear => t,
            EasingFunction::QuadraticIn => t * t,
            EasingFunction::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            EasingFunction::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
            EasingFunction::CubicIn => t * t * t,
            EasingFunction::CubicOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt * omt
            }
            EasingFunction::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
            EasingFunction::BackOut => {
                let u = t - 1.0;
                1.0 + BACK_C3 * u * u * u + BACK_C1 * u * u
            }
            EasingFunction::SqrtOut => t.sqrt(),
            EasingFunction::CubicHermite { c1, c2 } => {
                let omt = 1.0 - t;
                c1 * 3.0 * t * omt * omt + c2 * 3.0 * omt * t * t + t * t * t
            }
        }
    }

    /// Short identifier used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            EasingFunction::Linear => "linear",
            EasingFunction::QuadraticIn => "quadratic_in",
            EasingFunction::QuadraticOut => "quadratic_out",
            EasingFunction::QuadraticInOut => "quadratic_in_out",
            EasingFunction::CubicIn => "cubic_in",
            EasingFunction::CubicOut => "cubic_out",
            EasingFunction::CubicInOut => "cubic_in_out",
            EasingFunction::BackOut => "back_out",
            EasingFunction::SqrtOut => "sqrt_out",
            EasingFunction::CubicHermite { .. } => "cubic_hermite",
        }
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}
