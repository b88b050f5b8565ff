//! Exponential convergence toward a possibly discontinuous target.

use glam::Vec3;

use crate::animation::phase::Lerp;

/// A value that chases its target with exponential (critically damped)
/// smoothing.
///
/// Each update moves `current` a fraction `1 - exp(-rate * dt)` of the
/// remaining distance. The fraction lies in `[0, 1)`, so the distance to a
/// static target shrinks every tick with positive `dt` and the value never
/// overshoots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Damped<T> {
    current: T,
    target: T,
}

impl<T: Lerp> Damped<T> {
    /// Start at rest on `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            current: value,
            target: value,
        }
    }

    /// Move toward `target` by one step of `dt` seconds at `rate` (1/s).
    ///
    /// Callers are responsible for clamping `dt`; non-positive `dt` or
    /// `rate` leaves the value where it is.
    pub fn update(&mut self, target: T, dt: f32, rate: f32) -> T {
        self.target = target;
        let alpha = convergence_fraction(dt, rate);
        self.current = self.current.lerp_to(target, alpha);
        self.current
    }

    /// Jump straight to `value`.
    pub fn snap(&mut self, value: T) {
        self.current = value;
        self.target = value;
    }

    /// Current smoothed value.
    #[must_use]
    pub fn current(&self) -> T {
        self.current
    }

    /// Target from the last update.
    #[must_use]
    pub fn target(&self) -> T {
        self.target
    }
}

impl Damped<Vec3> {
    /// Distance between the current value and the target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.current.distance(self.target)
    }
}

/// Fraction of the remaining distance covered in one step.
#[inline]
pub(crate) fn convergence_fraction(dt: f32, rate: f32) -> f32 {
    let x = dt * rate;
    if x.is_finite() && x > 0.0 {
        1.0 - (-x).exp()
    } else {
        0.0
    }
}
