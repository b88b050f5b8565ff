//! The choreographer: single owner of every timer, table, rig and group.
//!
//! # Tick order
//!
//! Each call to [`Choreographer::tick`] advances state exactly once before
//! anything reads it:
//!
//! 1. The active transition's [`ProgressDriver`] advances.
//! 2. The position / look-at / fov tables are evaluated at the new
//!    progress.
//! 3. The [`CameraRig`] converges toward that target.
//! 4. Every [`StagedEntityController`] advances and recomputes its element
//!    transforms.
//!
//! Callers never touch the timers directly. Runtime signals go through
//! [`start_transition`](Choreographer::start_transition),
//! [`set_group_state`](Choreographer::set_group_state) or
//! [`execute`](Choreographer::execute); outputs are pulled with the query
//! methods after each tick.

mod command;
mod frame;

pub use command::ChoreoCommand;
pub use frame::{CameraFrame, TickReport};
use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::animation::phase::PhaseTable;
use crate::animation::progress::ProgressDriver;
use crate::animation::staged::{
    ElementTransform, GroupState, StagedEntityController, TransitionOutcome,
};
use crate::camera::{CameraPose, CameraRig, SmoothingSchedule};
use crate::error::{require_positive, ChoreoError};
use crate::options::{ChoreoOptions, TransitionOptions};

/// Distance under which the camera counts as at rest.
const CAMERA_REST_EPSILON: f32 = 1e-3;

/// Callback fired once per transition run when it completes.
pub type CompletionHandler = Box<dyn FnMut(&str)>;

/// One camera transition: its progress driver and keyframe tables.
#[derive(Debug, Clone)]
struct CameraTrack {
    driver: ProgressDriver,
    position: PhaseTable<Vec3>,
    look_at: PhaseTable<Vec3>,
    fov: Option<PhaseTable<f32>>,
}

impl CameraTrack {
    fn from_options(
        opts: &TransitionOptions,
        smoothing: f32,
        max_frame_delta: f32,
    ) -> Result<Self, ChoreoError> {
        Ok(Self {
            driver: ProgressDriver::new(opts.duration, smoothing, max_frame_delta)?,
            position: opts.position_table()?,
            look_at: opts.look_at_table()?,
            fov: opts.fov_table()?,
        })
    }

    fn target(&self, progress: f32) -> CameraPose {
        CameraPose::new(
            self.position.evaluate(progress),
            self.look_at.evaluate(progress),
        )
    }
}

/// Orchestrates camera transitions and staged groups from one tick entry
/// point.
pub struct Choreographer {
    tracks: FxHashMap<String, CameraTrack>,
    active: Option<String>,
    rig: CameraRig,
    schedule: SmoothingSchedule,
    fovy: Option<f32>,
    groups: FxHashMap<String, StagedEntityController>,
    /// Group keys in configuration order, for deterministic ticking.
    group_order: Vec<String>,
    on_complete: Option<CompletionHandler>,
}

impl Choreographer {
    /// Validate `options` and build every component.
    ///
    /// All configuration errors surface here, before any tick runs.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreoError`] for any invalid timing, camera, transition
    /// or group setting, and [`ChoreoError::DuplicateKey`] if a transition
    /// or group key appears twice.
    pub fn new(options: &ChoreoOptions) -> Result<Self, ChoreoError> {
        let timing = &options.timing;
        let max_frame_delta =
            require_positive("max_frame_delta", timing.max_frame_delta)?;
        let smoothing =
            require_positive("progress_smoothing", timing.progress_smoothing)?;

        let schedule = options.camera.schedule();
        let _ = require_positive("approach_rate", schedule.approach_rate)?;
        let _ = require_positive("cinematic_rate", schedule.cinematic_rate)?;
        let rig = CameraRig::new(
            options.camera.initial_pose(),
            options.camera.look_at_ratio,
            max_frame_delta,
        )?;

        let mut tracks = FxHashMap::default();
        for opts in &options.transitions {
            let track = CameraTrack::from_options(opts, smoothing, max_frame_delta)?;
            if tracks.insert(opts.key.clone(), track).is_some() {
                return Err(ChoreoError::DuplicateKey(opts.key.clone()));
            }
        }

        let mut groups = FxHashMap::default();
        let mut group_order = Vec::with_capacity(options.groups.len());
        for opts in &options.groups {
            let controller = opts.build_controller()?;
            if groups.insert(opts.key.clone(), controller).is_some() {
                return Err(ChoreoError::DuplicateKey(opts.key.clone()));
            }
            group_order.push(opts.key.clone());
        }

        log::debug!(
            "choreographer ready: {} transitions, {} groups",
            tracks.len(),
            group_order.len()
        );

        Ok(Self {
            tracks,
            active: None,
            rig,
            schedule,
            fovy: None,
            groups,
            group_order,
            on_complete: None,
        })
    }

    /// Register the callback fired when a transition completes.
    pub fn set_completion_handler(&mut self, handler: impl FnMut(&str) + 'static) {
        self.on_complete = Some(Box::new(handler));
    }

    // ── Commands ────────────────────────────────────────────────────

    /// Start (or restart) the transition `key`.
    ///
    /// Its time base is taken on the next tick. A different transition that
    /// is still running is abandoned without firing completion; the camera
    /// rig carries on smoothly from wherever it is.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreoError::UnknownTransition`] if `key` was never
    /// configured.
    pub fn start_transition(&mut self, key: &str) -> Result<(), ChoreoError> {
        if !self.tracks.contains_key(key) {
            return Err(ChoreoError::UnknownTransition(key.to_owned()));
        }
        if let Some(previous) = self.active.take() {
            if previous != key {
                if let Some(track) = self.tracks.get_mut(&previous) {
                    track.driver.reset();
                }
            }
        }
        if let Some(track) = self.tracks.get_mut(key) {
            track.driver.start();
        }
        log::debug!("transition '{key}' armed");
        self.active = Some(key.to_owned());
        Ok(())
    }

    /// Jump the active transition to its end. Completion fires on the next
    /// tick if it has not fired yet.
    pub fn skip_transition(&mut self) {
        let Some(key) = &self.active else {
            return;
        };
        if let Some(track) = self.tracks.get_mut(key) {
            track.driver.finish();
        }
    }

    /// Request a discrete state for group `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreoError::UnknownGroup`] if `key` was never configured.
    /// A state outside the transition table is not an error; it comes back
    /// as [`TransitionOutcome::Rejected`].
    pub fn set_group_state(
        &mut self,
        key: &str,
        state: GroupState,
    ) -> Result<TransitionOutcome, ChoreoError> {
        let group = self
            .groups
            .get_mut(key)
            .ok_or_else(|| ChoreoError::UnknownGroup(key.to_owned()))?;
        Ok(group.set_state(state))
    }

    /// Change the element count of group `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreoError::UnknownGroup`] if `key` was never configured
    /// and [`ChoreoError::EmptyGroup`] if `count` is zero.
    pub fn set_element_count(
        &mut self,
        key: &str,
        count: usize,
    ) -> Result<(), ChoreoError> {
        let group = self
            .groups
            .get_mut(key)
            .ok_or_else(|| ChoreoError::UnknownGroup(key.to_owned()))?;
        group.set_element_count(count).map_err(|e| e.in_group(key))
    }

    // ── Tick ────────────────────────────────────────────────────────

    /// Advance everything to `now` (seconds, monotonic) by `dt` seconds.
    pub fn tick(&mut self, now: f32, dt: f32) -> TickReport {
        let mut report = TickReport::default();

        let active = self
            .active
            .as_deref()
            .and_then(|key| self.tracks.get_mut(key).map(|t| (key, t)));
        let (target, rate) = match active {
            Some((key, track)) => {
                let sample = track.driver.tick(now, dt);
                let progress = sample.smoothed;
                report.progress = Some(progress);
                if sample.completed {
                    report.completed = Some(key.to_owned());
                }
                self.fovy = track.fov.as_ref().map(|fov| fov.evaluate(progress));
                let phase = &track.position.active_phase(progress).id;
                (track.target(progress), self.schedule.rate_for(phase))
            }
            None => (self.rig.target(), self.schedule.cinematic_rate),
        };
        let _ = self.rig.update(target, dt, rate);

        if let Some(key) = &report.completed {
            log::info!("transition '{key}' complete");
            if let Some(handler) = self.on_complete.as_mut() {
                handler(key.as_str());
            }
        }

        for key in &self.group_order {
            let Some(group) = self.groups.get_mut(key) else {
                continue;
            };
            if let Some(settled) = group.tick(now) {
                report.settled.push((key.clone(), settled));
            }
        }

        report
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Camera state to apply this frame.
    #[must_use]
    pub fn camera_frame(&self) -> CameraFrame {
        CameraFrame {
            pose: self.rig.pose(),
            fovy: self.fovy,
        }
    }

    /// Key of the most recently started transition.
    #[must_use]
    pub fn active_transition(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Smoothed progress of the most recently started transition.
    #[must_use]
    pub fn progress(&self) -> Option<f32> {
        let key = self.active.as_deref()?;
        self.tracks.get(key).map(|t| t.driver.progress())
    }

    /// Whether the transition `key` has completed in its current run.
    #[must_use]
    pub fn is_transition_complete(&self, key: &str) -> bool {
        self.tracks
            .get(key)
            .is_some_and(|t| t.driver.is_complete())
    }

    /// Discrete state of group `key`.
    #[must_use]
    pub fn group_state(&self, key: &str) -> Option<GroupState> {
        self.groups.get(key).map(StagedEntityController::state)
    }

    /// Element transforms of group `key` from the last tick.
    #[must_use]
    pub fn group_transforms(&self, key: &str) -> Option<&[ElementTransform]> {
        self.groups.get(key).map(StagedEntityController::transforms)
    }

    /// Read-only access to a group's controller.
    #[must_use]
    pub fn group(&self, key: &str) -> Option<&StagedEntityController> {
        self.groups.get(key)
    }

    /// Group keys in configuration order.
    pub fn group_keys(&self) -> impl Iterator<Item = &str> {
        self.group_order.iter().map(String::as_str)
    }

    /// Whether anything is still moving: a transition that has not
    /// completed, a group mid build/dissolve, or a camera not yet at rest.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        let transition_running = self
            .active
            .as_deref()
            .and_then(|key| self.tracks.get(key))
            .is_some_and(|t| t.driver.is_active() && !t.driver.is_complete());
        transition_running
            || self.groups.values().any(StagedEntityController::is_animating)
            || !self.rig.is_settled(CAMERA_REST_EPSILON)
    }
}

impl std::fmt::Debug for Choreographer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Choreographer")
            .field("transitions", &self.tracks.len())
            .field("active", &self.active)
            .field("camera", &self.rig.pose())
            .field("groups", &self.group_order)
            .field("has_completion_handler", &self.on_complete.is_some())
            .finish_non_exhaustive()
    }
}
