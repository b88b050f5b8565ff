use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::camera::{CameraPose, CameraRig, SmoothingSchedule};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera rig placement and smoothing parameters.
pub struct CameraOptions {
    /// Eye position before any transition runs.
    #[schemars(skip)]
    pub initial_position: [f32; 3],
    /// Look-at point before any transition runs.
    #[schemars(skip)]
    pub initial_look_at: [f32; 3],
    /// Look-at smoothing as a fraction of position smoothing.
    #[schemars(title = "Look-at Lag", range(min = 0.1, max = 1.0), extend("step" = 0.05))]
    pub look_at_ratio: f32,
    /// Phase id that uses the approach rate.
    #[schemars(skip)]
    pub approach_phase: String,
    /// Position smoothing rate (1/s) during the approach phase.
    #[schemars(title = "Approach Rate", range(min = 0.5, max = 20.0), extend("step" = 0.5))]
    pub approach_rate: f32,
    /// Position smoothing rate (1/s) during later phases.
    #[schemars(title = "Cinematic Rate", range(min = 0.5, max = 20.0), extend("step" = 0.5))]
    pub cinematic_rate: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        let schedule = SmoothingSchedule::default();
        Self {
            initial_position: [0.0, 30.0, 80.0],
            initial_look_at: [0.0, 0.0, 0.0],
            look_at_ratio: CameraRig::DEFAULT_LOOK_AT_RATIO,
            approach_phase: schedule.approach_phase,
            approach_rate: schedule.approach_rate,
            cinematic_rate: schedule.cinematic_rate,
        }
    }
}

impl CameraOptions {
    /// Pose the rig starts in.
    #[must_use]
    pub fn initial_pose(&self) -> CameraPose {
        CameraPose::new(
            Vec3::from(self.initial_position),
            Vec3::from(self.initial_look_at),
        )
    }

    /// Phase-dependent smoothing rates.
    #[must_use]
    pub fn schedule(&self) -> SmoothingSchedule {
        SmoothingSchedule {
            approach_phase: self.approach_phase.clone(),
            approach_rate: self.approach_rate,
            cinematic_rate: self.cinematic_rate,
        }
    }
}
