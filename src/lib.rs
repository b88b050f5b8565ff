// -- Lint policy ---------------------------------------------------------
// Lint groups and allowances live in Cargo.toml [lints]. These are the
// extra restriction lints not covered by those groups.

// Import hygiene
#![deny(clippy::wildcard_imports)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
// Tests may unwrap and panic freely.
#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)
)]

//! Frame-rate independent choreography for a 3D gallery scene.
//!
//! Converts elapsed time and discrete external signals into continuous
//! transforms: camera keyframe transitions and staggered build / dissolve
//! sequences for groups of scene elements. Output is identical under
//! frame-rate jitter, resumes cleanly after a long pause, and never drifts
//! between independently timed elements.
//!
//! # Key entry points
//!
//! - [`choreographer::Choreographer`] - owns every timer; one `tick` per
//!   frame
//! - [`options::ChoreoOptions`] - construction-time configuration (TOML
//!   presets)
//! - [`animation`] - progress driver, phase tables, stagger scheduler and
//!   staged entity controller
//! - [`camera`] - damped camera rig
//!
//! # Architecture
//!
//! Everything runs on the caller's frame loop. No component reads the
//! wall clock, blocks, or spawns threads: the caller supplies `now` and
//! `dt` (see [`util::frame_clock::FrameClock`] if it has no clock of its
//! own), submits commands, and pulls outputs after each tick.

pub mod animation;
pub mod camera;
pub mod choreographer;
pub mod error;
pub mod options;
pub mod util;

pub use choreographer::{ChoreoCommand, Choreographer};
pub use error::ChoreoError;
pub use options::ChoreoOptions;
