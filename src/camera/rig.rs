//! Damped position / look-at rig and its phase-dependent smoothing.

use glam::Vec3;

use super::damp::Damped;
use crate::error::{require_positive, ChoreoError};
use crate::util::frame_clock::clamp_frame_delta;

/// Camera position and look-at point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Eye position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub look_at: Vec3,
}

impl CameraPose {
    /// Pose from an eye position and a look-at point.
    #[must_use]
    pub const fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }
}

/// Phase-dependent smoothing rates for the rig.
///
/// Brisk while the camera approaches, slower and more cinematic afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothingSchedule {
    /// Phase id that counts as the approach.
    pub approach_phase: String,
    /// Position smoothing rate (1/s) during the approach phase.
    pub approach_rate: f32,
    /// Position smoothing rate (1/s) during every other phase.
    pub cinematic_rate: f32,
}

impl SmoothingSchedule {
    /// Rate for the phase with the given id.
    #[must_use]
    pub fn rate_for(&self, phase_id: &str) -> f32 {
        if phase_id == self.approach_phase {
            self.approach_rate
        } else {
            self.cinematic_rate
        }
    }
}

impl Default for SmoothingSchedule {
    fn default() -> Self {
        Self {
            approach_phase: "approach".to_owned(),
            approach_rate: 4.0,
            cinematic_rate: 2.0,
        }
    }
}

/// Smooths the interpolated camera target into continuous per-tick state.
///
/// Position and look-at converge independently; look-at runs at
/// `look_at_ratio` times the position rate so orientation trails slightly
/// behind position.
#[derive(Debug, Clone)]
pub struct CameraRig {
    position: Damped<Vec3>,
    look_at: Damped<Vec3>,
    look_at_ratio: f32,
    max_frame_delta: f32,
}

impl CameraRig {
    /// Default look-at rate as a fraction of the position rate.
    pub const DEFAULT_LOOK_AT_RATIO: f32 = 0.8;

    /// Rig at rest on `pose`.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreoError::NonPositive`] if `look_at_ratio` or
    /// `max_frame_delta` is not positive and finite.
    pub fn new(
        pose: CameraPose,
        look_at_ratio: f32,
        max_frame_delta: f32,
    ) -> Result<Self, ChoreoError> {
        Ok(Self {
            position: Damped::new(pose.position),
            look_at: Damped::new(pose.look_at),
            look_at_ratio: require_positive("look_at_ratio", look_at_ratio)?,
            max_frame_delta: require_positive(
                "max_frame_delta",
                max_frame_delta,
            )?,
        })
    }

    /// Advance one frame toward `target` with position smoothing `rate`.
    pub fn update(&mut self, target: CameraPose, dt: f32, rate: f32) -> CameraPose {
        let dt = clamp_frame_delta(dt, self.max_frame_delta);
        let position = self.position.update(target.position, dt, rate);
        let look_at =
            self.look_at
                .update(target.look_at, dt, rate * self.look_at_ratio);
        CameraPose { position, look_at }
    }

    /// Teleport without smoothing.
    pub fn snap_to(&mut self, pose: CameraPose) {
        self.position.snap(pose.position);
        self.look_at.snap(pose.look_at);
    }

    /// Current smoothed pose.
    #[must_use]
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position.current(),
            look_at: self.look_at.current(),
        }
    }

    /// Target pose from the last update.
    #[must_use]
    pub fn target(&self) -> CameraPose {
        CameraPose {
            position: self.position.target(),
            look_at: self.look_at.target(),
        }
    }

    /// Whether both channels are within `epsilon` of their targets.
    #[must_use]
    pub fn is_settled(&self, epsilon: f32) -> bool {
        self.position.distance() <= epsilon && self.look_at.distance() <= epsilon
    }
}
