//! Camera choreography.
//!
//! Smooths the keyframed camera target produced by phase tables into
//! continuous camera motion, independent of frame rate.

pub mod damp;
pub mod rig;

pub use damp::Damped;
pub use rig::{CameraPose, CameraRig, SmoothingSchedule};
