//! Timing primitives for choreographed animation.
//!
//! - [`progress::ProgressDriver`] turns wall-clock time into smoothed
//!   transition progress.
//! - [`phase::PhaseTable`] maps progress onto keyframed values.
//! - [`stagger::StaggerScheduler`] offsets element start times within a
//!   group.
//! - [`staged::StagedEntityController`] runs a group's build / dissolve
//!   state machine on top of the scheduler.

pub mod phase;
pub mod progress;
pub mod staged;
pub mod stagger;

pub use phase::{Lerp, PhaseDescriptor, PhaseTable};
pub use progress::{ProgressDriver, ProgressSample, COMPLETION_THRESHOLD};
pub use staged::{
    ElementTransform, GroupState, InterruptionPolicy, StagedEntityController,
    StagedMotion, TransitionOutcome,
};
pub use stagger::{EntityTimeline, StaggerDirection, StaggerScheduler};
