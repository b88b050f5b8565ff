//! Per-tick outputs of the choreographer.

use crate::animation::staged::GroupState;
use crate::camera::CameraPose;

/// Camera state to apply to the render camera this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    /// Smoothed eye position and look-at point.
    pub pose: CameraPose,
    /// Vertical field of view in degrees, when the active transition
    /// animates it.
    pub fovy: Option<f32>,
}

/// What happened during one [`Choreographer::tick`].
///
/// [`Choreographer::tick`]: super::Choreographer::tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Smoothed progress of the active transition, for UI/state observers.
    pub progress: Option<f32>,
    /// Key of the transition whose completion fired on this tick.
    pub completed: Option<String>,
    /// Groups that finished building or dissolving on this tick, with the
    /// state they settled into.
    pub settled: Vec<(String, GroupState)>,
}
