use web_time::Instant;

/// Clamp a frame delta into `[0, max_frame_delta]`.
///
/// Non-finite deltas become 0 so a corrupt timestamp can never push NaN
/// into the animation state. A long pause (backgrounded tab) collapses to a
/// single `max_frame_delta` step.
#[inline]
#[must_use]
pub fn clamp_frame_delta(dt: f32, max_frame_delta: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, max_frame_delta)
    } else {
        0.0
    }
}

/// Monotonic time source for the choreography tick loop.
///
/// Supplies the `(now, dt)` pair that [`Choreographer::tick`] expects, plus a
/// smoothed FPS readout. Renderers that already own a frame clock can skip
/// this and pass their own values.
///
/// [`Choreographer::tick`]: crate::choreographer::Choreographer::tick
pub struct FrameClock {
    /// Time the clock was created; `now` is measured from here.
    origin: Instant,
    /// Last frame timestamp
    last_frame: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

/// One sample of the frame clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the clock was created.
    pub now: f32,
    /// Seconds since the previous sample (unclamped).
    pub dt: f32,
}

impl FrameClock {
    /// Create a clock whose elapsed time starts at zero.
    #[must_use]
    pub fn new() -> Self {
        let origin = Instant::now();
        Self {
            origin,
            last_frame: origin,
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Sample the clock at the start of a frame.
    pub fn advance(&mut self) -> FrameTime {
        self.advance_to(Instant::now())
    }

    /// Sample the clock at an explicit instant.
    pub fn advance_to(&mut self, now: Instant) -> FrameTime {
        let dt = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        if dt > 0.0 {
            let instant_fps = 1.0 / dt;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }

        FrameTime {
            now: now.saturating_duration_since(self.origin).as_secs_f32(),
            dt,
        }
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use web_time::Duration;

    use super::*;

    #[test]
    fn elapsed_time_is_measured_from_creation() {
        let mut clock = FrameClock::new();
        let start = clock.origin;

        let first = clock.advance_to(start + Duration::from_millis(16));
        assert!((first.now - 0.016).abs() < 1e-6);
        assert!((first.dt - 0.016).abs() < 1e-6);

        let second = clock.advance_to(start + Duration::from_millis(50));
        assert!((second.now - 0.050).abs() < 1e-6);
        assert!((second.dt - 0.034).abs() < 1e-6);
    }

    #[test]
    fn frame_delta_is_clamped() {
        assert_eq!(clamp_frame_delta(0.016, 0.1), 0.016);
        assert_eq!(clamp_frame_delta(12.0, 0.1), 0.1);
        assert_eq!(clamp_frame_delta(-0.5, 0.1), 0.0);
        assert_eq!(clamp_frame_delta(f32::NAN, 0.1), 0.0);
        assert_eq!(clamp_frame_delta(f32::INFINITY, 0.1), 0.0);
    }

    #[test]
    fn fps_tracks_steady_frames() {
        let mut clock = FrameClock::new();
        let start = clock.origin;
        for i in 1..=400u64 {
            let _ = clock.advance_to(start + Duration::from_millis(i * 20));
        }
        assert!((clock.fps() - 50.0).abs() < 0.5, "fps {}", clock.fps());
    }
}
