//! Shared utilities for the choreography core.
//!
//! Easing curves and the monotonic frame clock.

pub mod easing;
/// Monotonic `(now, dt)` source and frame-delta clamping.
pub mod frame_clock;
