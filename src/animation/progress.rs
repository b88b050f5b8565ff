//! Progress driver: turns wall-clock time into smoothed transition progress.

use crate::error::{require_positive, ChoreoError};
use crate::util::frame_clock::clamp_frame_delta;

/// Smoothed progress at which a transition counts as complete.
///
/// The low-pass filter approaches 1.0 asymptotically, so an exact 1.0
/// threshold could take arbitrarily long to reach.
pub const COMPLETION_THRESHOLD: f32 = 0.99;

/// Result of advancing a [`ProgressDriver`] by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSample {
    /// Time-derived progress, may jump between ticks.
    pub raw: f32,
    /// Low-pass filtered progress, continuous and non-decreasing.
    pub smoothed: f32,
    /// True on the single tick where the completion threshold was crossed.
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DriverState {
    /// Never started, or reset.
    Idle,
    /// `start()` was called; the time base is taken on the next tick.
    Armed,
    /// Running with time base `t0`.
    Running { t0: f32 },
    /// Skipped to the end; completion fires on the next tick.
    Finishing,
}

/// Produces the smoothed, monotonic progress scalar of one timed transition.
#[derive(Debug, Clone)]
pub struct ProgressDriver {
    duration: f32,
    smoothing_rate: f32,
    max_frame_delta: f32,
    state: DriverState,
    raw: f32,
    smoothed: f32,
    /// Completion already fired in this arm cycle.
    completion_latched: bool,
}

impl ProgressDriver {
    /// Driver for a transition lasting `duration` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreoError::NonPositive`] if any argument is zero,
    /// negative or non-finite.
    pub fn new(
        duration: f32,
        smoothing_rate: f32,
        max_frame_delta: f32,
    ) -> Result<Self, ChoreoError> {
        Ok(Self {
            duration: require_positive("duration", duration)?,
            smoothing_rate: require_positive("smoothing_rate", smoothing_rate)?,
            max_frame_delta: require_positive(
                "max_frame_delta",
                max_frame_delta,
            )?,
            state: DriverState::Idle,
            raw: 0.0,
            smoothed: 0.0,
            completion_latched: false,
        })
    }

    /// Arm the driver. The time base is recorded on the next tick.
    ///
    /// Calling this again mid-flight restarts the transition from 0.
    pub fn start(&mut self) {
        self.state = DriverState::Armed;
        self.raw = 0.0;
        self.smoothed = 0.0;
        self.completion_latched = false;
    }

    /// Jump to the end of the transition.
    ///
    /// Completion fires on the next tick unless it already fired this cycle.
    pub fn finish(&mut self) {
        if self.state == DriverState::Idle {
            return;
        }
        self.state = DriverState::Finishing;
        self.raw = 1.0;
        self.smoothed = 1.0;
    }

    /// Drop back to the idle state without firing completion.
    pub fn reset(&mut self) {
        self.state = DriverState::Idle;
        self.raw = 0.0;
        self.smoothed = 0.0;
        self.completion_latched = false;
    }

    /// Advance by one frame.
    ///
    /// `now` is the monotonic elapsed time in seconds, `dt` the frame delta.
    /// `dt` is clamped to `[0, max_frame_delta]` before smoothing.
    pub fn tick(&mut self, now: f32, dt: f32) -> ProgressSample {
        match self.state {
            DriverState::Idle | DriverState::Finishing => {}
            DriverState::Armed => {
                if now.is_finite() {
                    self.state = DriverState::Running { t0: now };
                    log::debug!("progress driver time base set at {now:.3}s");
                }
            }
            DriverState::Running { t0 } => {
                if now.is_finite() {
                    self.raw = self.raw.max(
                        ((now - t0) / self.duration).clamp(0.0, 1.0),
                    );
                }
                let dt = clamp_frame_delta(dt, self.max_frame_delta);
                let alpha = (dt * self.smoothing_rate).min(1.0);
                let next = self.smoothed + (self.raw - self.smoothed) * alpha;
                self.smoothed = next.clamp(self.smoothed, 1.0);
            }
        }

        let completed = self.state != DriverState::Idle
            && !self.completion_latched
            && self.smoothed >= COMPLETION_THRESHOLD;
        if completed {
            self.completion_latched = true;
        }

        ProgressSample {
            raw: self.raw,
            smoothed: self.smoothed,
            completed,
        }
    }

    /// Smoothed progress after the last tick.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.smoothed
    }

    /// Raw time-derived progress after the last tick.
    #[must_use]
    pub fn raw_progress(&self) -> f32 {
        self.raw
    }

    /// Whether the driver has been started and not reset.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state != DriverState::Idle
    }

    /// Whether the completion signal has fired in this arm cycle.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completion_latched
    }

    /// Configured duration in seconds.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn driver(duration: f32) -> ProgressDriver {
        ProgressDriver::new(duration, 4.0, 0.1).unwrap()
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(ProgressDriver::new(0.0, 4.0, 0.1).is_err());
        assert!(ProgressDriver::new(-1.0, 4.0, 0.1).is_err());
        assert!(ProgressDriver::new(1.0, 0.0, 0.1).is_err());
        assert!(ProgressDriver::new(1.0, 4.0, f32::NAN).is_err());
    }

    #[test]
    fn idle_driver_stays_at_zero() {
        let mut d = driver(1.0);
        let sample = d.tick(5.0, DT);
        assert_eq!(sample.smoothed, 0.0);
        assert!(!sample.completed);
        assert!(!d.is_active());
    }

    #[test]
    fn time_base_is_taken_on_first_tick() {
        let mut d = driver(2.0);
        d.start();
        // Trigger at t=0 but first tick arrives at t=10.
        let first = d.tick(10.0, DT);
        assert_eq!(first.raw, 0.0);
        assert_eq!(first.smoothed, 0.0);

        let second = d.tick(11.0, DT);
        assert!((second.raw - 0.5).abs() < 1e-6);
    }

    #[test]
    fn completes_at_or_after_duration_exactly_once() {
        let mut d = driver(3.5);
        d.start();

        let mut fired_at = Vec::new();
        let mut last = 0.0;
        for i in 0..=600 {
            let now = i as f32 * DT;
            let sample = d.tick(now, DT);
            assert!(sample.smoothed >= last, "smoothed progress decreased");
            last = sample.smoothed;
            if sample.completed {
                fired_at.push(now);
            }
        }

        assert_eq!(fired_at.len(), 1, "completion fired {fired_at:?}");
        assert!(fired_at[0] >= 3.5 - 1e-4, "fired early at {}", fired_at[0]);
        assert!(d.progress() >= COMPLETION_THRESHOLD);
        assert!(d.is_complete());
    }

    #[test]
    fn restart_rearms_completion() {
        let mut d = driver(0.5);
        d.start();
        let mut fired = 0;
        for i in 0..120 {
            if d.tick(i as f32 * DT, DT).completed {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);

        d.start();
        assert_eq!(d.progress(), 0.0);
        assert!(!d.is_complete());
        for i in 120..240 {
            if d.tick(i as f32 * DT, DT).completed {
                fired += 1;
            }
        }
        assert_eq!(fired, 2);
    }

    #[test]
    fn huge_frame_delta_is_clamped() {
        let mut d = driver(10.0);
        d.start();
        let _ = d.tick(0.0, DT);
        // Tab was backgrounded for 5 seconds.
        let sample = d.tick(5.0, 5.0);
        assert!((sample.raw - 0.5).abs() < 1e-6);
        // alpha = min(1, 0.1 * 4) = 0.4
        assert!((sample.smoothed - 0.2).abs() < 1e-5);
    }

    #[test]
    fn garbage_time_does_not_poison_progress() {
        let mut d = driver(1.0);
        d.start();
        let _ = d.tick(0.0, DT);
        let _ = d.tick(0.5, DT);
        let before = d.progress();
        let sample = d.tick(f32::NAN, f32::NAN);
        assert!(sample.smoothed.is_finite());
        assert_eq!(sample.smoothed, before);

        // Time stepping backwards never lowers progress.
        let sample = d.tick(0.1, DT);
        assert!(sample.smoothed >= before);
        assert!((sample.raw - 0.5).abs() < 1e-6);
    }

    #[test]
    fn finish_fires_completion_once() {
        let mut d = driver(10.0);
        d.start();
        let _ = d.tick(0.0, DT);
        d.finish();
        let sample = d.tick(DT, DT);
        assert!(sample.completed);
        assert_eq!(sample.smoothed, 1.0);
        assert!(!d.tick(2.0 * DT, DT).completed);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut d = driver(1.0);
        d.start();
        let _ = d.tick(0.0, DT);
        let _ = d.tick(0.5, DT);
        d.reset();
        assert!(!d.is_active());
        assert_eq!(d.progress(), 0.0);
        d.finish();
        assert!(!d.is_active());
    }
}
