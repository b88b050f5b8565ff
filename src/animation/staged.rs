//! Staged entity controller: a per-group state machine driving staggered
//! build and dissolve animations.
//!
//! A group (for example the planks of a bridge) moves through
//! [`GroupState::Idle`] → [`GroupState::Building`] → [`GroupState::Complete`]
//! and back out through [`GroupState::Dissolving`]. While building or
//! dissolving, each element follows its own [`EntityTimeline`] from the
//! [`StaggerScheduler`], so elements move one after another rather than all
//! at once.

use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::stagger::{EntityTimeline, StaggerDirection, StaggerScheduler};
use crate::error::ChoreoError;
use crate::util::easing::EasingFunction;

/// Easing for elements moving into place.
const BUILD_EASING: EasingFunction = EasingFunction::BackOut;
/// Easing for elements leaving.
const DISSOLVE_EASING: EasingFunction = EasingFunction::CubicIn;

/// Discrete state of an animated group.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum GroupState {
    /// Hidden, no timers.
    #[default]
    Idle,
    /// Elements moving from hidden to their rest pose.
    Building,
    /// Every element pinned at its rest pose.
    Complete,
    /// Elements moving from their rest pose back to hidden.
    Dissolving,
}

impl GroupState {
    /// Whether `self → next` is in the transition table.
    ///
    /// Any state may be cancelled to `Idle`. Building and Dissolving may
    /// interrupt each other. Self-transitions are not listed; they are
    /// no-ops.
    #[must_use]
    pub fn can_transition_to(self, next: GroupState) -> bool {
        use GroupState::{Building, Complete, Dissolving, Idle};
        matches!(
            (self, next),
            (Idle | Dissolving, Building)
                | (Building, Complete)
                | (Building | Complete, Dissolving)
                | (Building | Complete | Dissolving, Idle)
        )
    }

    /// Stagger direction for states that run a timer.
    #[must_use]
    pub fn direction(self) -> Option<StaggerDirection> {
        match self {
            GroupState::Building => Some(StaggerDirection::Build),
            GroupState::Dissolving => Some(StaggerDirection::Dissolve),
            GroupState::Idle | GroupState::Complete => None,
        }
    }

    /// Short identifier used in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            GroupState::Idle => "idle",
            GroupState::Building => "building",
            GroupState::Complete => "complete",
            GroupState::Dissolving => "dissolving",
        }
    }
}

/// How an element starts when Building and Dissolving interrupt each other.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum InterruptionPolicy {
    /// Start from the rest value of the new direction (hidden when
    /// building, target when dissolving). An element caught mid-flight
    /// visibly jumps.
    #[default]
    Restart,
    /// Start from the element's last evaluated offset.
    BlendFromCurrent,
}

/// Result of a [`StagedEntityController::set_state`] request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The state changed; its timer starts on the next tick.
    Applied,
    /// Already in the requested state.
    Unchanged,
    /// Not in the transition table; nothing changed.
    Rejected,
}

/// Transform of one element, applied by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementTransform {
    /// Position offset from the element's placed position.
    pub offset: Vec3,
    /// Rotation about the secondary axis, in radians.
    pub rotation: f32,
}

impl ElementTransform {
    /// Transform at `offset` with no rotation.
    #[inline]
    #[must_use]
    pub const fn at(offset: Vec3) -> Self {
        Self {
            offset,
            rotation: 0.0,
        }
    }
}

/// Endpoints and wobble shared by every element of a group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StagedMotion {
    /// Offset while hidden.
    pub hidden: Vec3,
    /// Offset at rest once built.
    pub target: Vec3,
    /// Peak secondary-axis rotation while building, in radians.
    pub wobble_amplitude: f32,
    /// Wobble angular frequency, in radians per second.
    pub wobble_frequency: f32,
}

impl Default for StagedMotion {
    fn default() -> Self {
        Self {
            hidden: Vec3::new(0.0, -2.0, 0.0),
            target: Vec3::ZERO,
            wobble_amplitude: 0.15,
            wobble_frequency: 12.0,
        }
    }
}

/// Drives N staggered elements through build and dissolve sequences.
#[derive(Debug, Clone)]
pub struct StagedEntityController {
    scheduler: StaggerScheduler,
    motion: StagedMotion,
    interruption: InterruptionPolicy,
    auto_settle: bool,
    state: GroupState,
    /// Time the current timed state was entered. `None` while no timer
    /// runs or while waiting for the first tick after a transition.
    enter_time: Option<f32>,
    /// Seconds since `enter_time` at the last tick.
    since_enter: Option<f32>,
    /// Per-element start offset for the current direction.
    origins: Vec<Vec3>,
    /// Per-element output of the last tick.
    transforms: Vec<ElementTransform>,
}

impl StagedEntityController {
    /// Idle controller for the scheduler's elements.
    #[must_use]
    pub fn new(scheduler: StaggerScheduler, motion: StagedMotion) -> Self {
        let n = scheduler.element_count();
        Self {
            scheduler,
            motion,
            interruption: InterruptionPolicy::default(),
            auto_settle: true,
            state: GroupState::Idle,
            enter_time: None,
            since_enter: None,
            origins: vec![motion.hidden; n],
            transforms: vec![ElementTransform::at(motion.hidden); n],
        }
    }

    /// Use a different interruption policy.
    #[must_use]
    pub fn with_interruption(mut self, policy: InterruptionPolicy) -> Self {
        self.interruption = policy;
        self
    }

    /// Enable or disable automatic `Building → Complete` and
    /// `Dissolving → Idle` once every element has finished.
    #[must_use]
    pub fn with_auto_settle(mut self, auto_settle: bool) -> Self {
        self.auto_settle = auto_settle;
        self
    }

    /// Request a state change.
    ///
    /// Takes effect on the next [`tick`](Self::tick): timed states sample
    /// their enter time there, so the first evaluated frame always sees
    /// zero elapsed time.
    pub fn set_state(&mut self, next: GroupState) -> TransitionOutcome {
        if next == self.state {
            return TransitionOutcome::Unchanged;
        }
        if !self.state.can_transition_to(next) {
            log::warn!(
                "rejected group transition {} -> {}",
                self.state.name(),
                next.name()
            );
            return TransitionOutcome::Rejected;
        }

        log::debug!("group transition {} -> {}", self.state.name(), next.name());
        self.enter(next);
        TransitionOutcome::Applied
    }

    fn enter(&mut self, next: GroupState) {
        self.enter_time = None;
        self.since_enter = None;
        match next {
            GroupState::Idle => self.pin(self.motion.hidden),
            GroupState::Complete => self.pin(self.motion.target),
            GroupState::Building | GroupState::Dissolving => {
                let rest = self.rest_origin(next);
                match self.interruption {
                    InterruptionPolicy::Restart => self.origins.fill(rest),
                    InterruptionPolicy::BlendFromCurrent => {
                        for (origin, t) in
                            self.origins.iter_mut().zip(&self.transforms)
                        {
                            *origin = t.offset;
                        }
                    }
                }
            }
        }
        self.state = next;
    }

    fn pin(&mut self, offset: Vec3) {
        self.origins.fill(offset);
        self.transforms.fill(ElementTransform::at(offset));
    }

    /// Where an element waits before its stagger delay has elapsed.
    fn rest_origin(&self, state: GroupState) -> Vec3 {
        match state {
            GroupState::Idle | GroupState::Building => self.motion.hidden,
            GroupState::Complete | GroupState::Dissolving => self.motion.target,
        }
    }

    /// Advance to `now` and recompute every element's transform.
    ///
    /// Returns the state the group settled into if it finished building or
    /// dissolving on this tick.
    pub fn tick(&mut self, now: f32) -> Option<GroupState> {
        let direction = self.state.direction()?;
        if !now.is_finite() {
            return None;
        }
        let enter = *self.enter_time.get_or_insert(now);
        let since = now - enter;
        self.since_enter = Some(since);

        let (state, motion) = (self.state, self.motion);
        let mut all_done = true;
        for (i, (out, origin)) in
            self.transforms.iter_mut().zip(&self.origins).enumerate()
        {
            let entry = self.scheduler.entry(direction, i);
            *out = element_transform(state, &motion, *origin, &entry, since);
            all_done &= entry.local_progress(since) >= 1.0;
        }

        if !(self.auto_settle && all_done) {
            return None;
        }
        let settled = match self.state {
            GroupState::Building => GroupState::Complete,
            GroupState::Idle | GroupState::Complete | GroupState::Dissolving => {
                GroupState::Idle
            }
        };
        log::debug!(
            "group settled {} -> {} after {since:.3}s",
            self.state.name(),
            settled.name()
        );
        self.enter(settled);
        Some(settled)
    }

    /// Transform of one element `since_enter` seconds into the current
    /// state. Pure: reads only configuration and per-element origins.
    #[must_use]
    pub fn evaluate(&self, entry: &EntityTimeline, since_enter: f32) -> ElementTransform {
        let origin = self
            .origins
            .get(entry.index)
            .copied()
            .unwrap_or_else(|| self.rest_origin(self.state));
        element_transform(self.state, &self.motion, origin, entry, since_enter)
    }

    /// Change the number of elements, keeping the current state.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreoError::NoElements`] if `count` is zero; the
    /// controller is left unchanged.
    pub fn set_element_count(&mut self, count: usize) -> Result<(), ChoreoError> {
        self.scheduler.set_element_count(count)?;
        let rest = self.rest_origin(self.state);
        self.origins.resize(count, rest);
        self.transforms.resize(count, ElementTransform::at(rest));
        Ok(())
    }

    /// Current discrete state.
    #[must_use]
    pub fn state(&self) -> GroupState {
        self.state
    }

    /// Whether a build or dissolve is in progress.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.state.direction().is_some()
    }

    /// Per-element transforms from the last tick.
    #[must_use]
    pub fn transforms(&self) -> &[ElementTransform] {
        &self.transforms
    }

    /// Seconds since the current timed state was entered, as of the last
    /// tick. `None` before the first tick of a timed state and in Idle or
    /// Complete.
    #[must_use]
    pub fn since_enter(&self) -> Option<f32> {
        self.since_enter
    }

    /// Seconds into element `index`'s own animation as of the last tick;
    /// negative while it waits for its stagger delay.
    #[must_use]
    pub fn element_elapsed(&self, index: usize) -> Option<f32> {
        let direction = self.state.direction()?;
        if index >= self.scheduler.element_count() {
            return None;
        }
        let since = self.since_enter?;
        Some(self.scheduler.entry(direction, index).elapsed(since))
    }

    /// The group's stagger scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &StaggerScheduler {
        &self.scheduler
    }

    /// The group's motion endpoints.
    #[must_use]
    pub fn motion(&self) -> &StagedMotion {
        &self.motion
    }
}

/// Transform of one element given its start offset for the current
/// direction.
fn element_transform(
    state: GroupState,
    motion: &StagedMotion,
    origin: Vec3,
    entry: &EntityTimeline,
    since_enter: f32,
) -> ElementTransform {
    let elapsed = entry.elapsed(since_enter);
    match state {
        GroupState::Idle => ElementTransform::at(motion.hidden),
        GroupState::Complete => ElementTransform::at(motion.target),
        // Not started yet: hold at the origin.
        _ if elapsed.is_nan() || elapsed < 0.0 => ElementTransform::at(origin),
        GroupState::Building => {
            let progress = entry.local_progress(since_enter);
            let eased = BUILD_EASING.evaluate(progress);
            let wobble = (elapsed * motion.wobble_frequency).sin()
                * motion.wobble_amplitude
                * (1.0 - progress);
            ElementTransform {
                offset: origin + (motion.target - origin) * eased,
                rotation: wobble,
            }
        }
        GroupState::Dissolving => {
            let progress = entry.local_progress(since_enter);
            let eased = DISSOLVE_EASING.evaluate(progress);
            ElementTransform::at(origin + (motion.hidden - origin) * eased)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = 6;
    const BUILD: f32 = 2.0;

    fn controller() -> StagedEntityController {
        let scheduler = StaggerScheduler::new(N, BUILD, 0.7, 0.3, 0.5).unwrap();
        StagedEntityController::new(
            scheduler,
            StagedMotion {
                hidden: Vec3::new(0.0, -2.0, 0.0),
                target: Vec3::new(0.0, 0.0, 1.0),
                wobble_amplitude: 0.2,
                wobble_frequency: 10.0,
            },
        )
    }

    fn hidden() -> Vec3 {
        Vec3::new(0.0, -2.0, 0.0)
    }

    fn target() -> Vec3 {
        Vec3::new(0.0, 0.0, 1.0)
    }

    #[test]
    fn transition_table() {
        use GroupState::{Building, Complete, Dissolving, Idle};
        assert!(Idle.can_transition_to(Building));
        assert!(Building.can_transition_to(Complete));
        assert!(Building.can_transition_to(Dissolving));
        assert!(Complete.can_transition_to(Dissolving));
        assert!(Dissolving.can_transition_to(Idle));
        assert!(Dissolving.can_transition_to(Building));
        assert!(Complete.can_transition_to(Idle));
        assert!(Building.can_transition_to(Idle));

        assert!(!Idle.can_transition_to(Complete));
        assert!(!Idle.can_transition_to(Dissolving));
        assert!(!Complete.can_transition_to(Building));
        assert!(!Dissolving.can_transition_to(Complete));
    }

    #[test]
    fn illegal_request_is_a_no_op() {
        let mut c = controller();
        assert_eq!(c.set_state(GroupState::Complete), TransitionOutcome::Rejected);
        assert_eq!(c.state(), GroupState::Idle);
        assert_eq!(c.set_state(GroupState::Idle), TransitionOutcome::Unchanged);
    }

    #[test]
    fn self_transition_keeps_timer() {
        let mut c = controller();
        let _ = c.set_state(GroupState::Building);
        let _ = c.tick(1.0);
        let _ = c.tick(1.5);
        assert_eq!(c.set_state(GroupState::Building), TransitionOutcome::Unchanged);
        let _ = c.tick(1.6);
        assert!((c.since_enter().unwrap() - 0.6).abs() < 1e-5);
    }

    #[test]
    fn first_tick_sees_zero_elapsed() {
        let mut c = controller();
        let _ = c.set_state(GroupState::Building);
        assert_eq!(c.since_enter(), None);
        let _ = c.tick(42.0);
        assert_eq!(c.since_enter(), Some(0.0));
        assert_eq!(c.element_elapsed(0), Some(0.0));
        for t in c.transforms() {
            assert_eq!(t.offset, hidden());
        }
    }

    #[test]
    fn building_endpoints() {
        let c = {
            let mut c = controller();
            let _ = c.set_state(GroupState::Building);
            c
        };
        let entry = c.scheduler().entry(StaggerDirection::Build, 2);

        let start = c.evaluate(&entry, entry.stagger_delay);
        assert_eq!(start.offset, hidden());
        assert_eq!(start.rotation, 0.0);

        let end = c.evaluate(&entry, entry.stagger_delay + entry.local_duration);
        assert!(end.offset.abs_diff_eq(target(), 1e-5));
        assert!(end.rotation.abs() < 1e-6);
    }

    #[test]
    fn building_overshoots_then_settles() {
        let mut c = controller();
        let _ = c.set_state(GroupState::Building);
        let entry = c.scheduler().entry(StaggerDirection::Build, 0);
        let peak = (1..100)
            .map(|i| {
                let since = entry.local_duration * i as f32 / 100.0;
                c.evaluate(&entry, since).offset.y
            })
            .fold(f32::MIN, f32::max);
        assert!(peak > target().y, "expected overshoot, peak {peak}");
    }

    #[test]
    fn waiting_elements_hold_at_rest() {
        let mut c = controller();
        let _ = c.set_state(GroupState::Building);
        let _ = c.tick(0.0);
        let _ = c.tick(0.1);
        // Element N-1 starts at 5/6 * 1.4s.
        assert!(c.element_elapsed(N - 1).unwrap() < 0.0);
        assert_eq!(c.transforms()[N - 1], ElementTransform::at(hidden()));
        assert_ne!(c.transforms()[0].offset, hidden());
    }

    #[test]
    fn build_settles_to_complete() {
        let mut c = controller();
        let _ = c.set_state(GroupState::Building);
        let mut settled = None;
        for i in 0..=200 {
            if let Some(s) = c.tick(i as f32 / 60.0) {
                settled = Some((s, i));
                break;
            }
        }
        let (state, _) = settled.unwrap();
        assert_eq!(state, GroupState::Complete);
        assert_eq!(c.state(), GroupState::Complete);
        for t in c.transforms() {
            assert_eq!(*t, ElementTransform::at(target()));
        }
        // Complete evaluates no timer.
        assert_eq!(c.tick(100.0), None);
        assert_eq!(c.since_enter(), None);
    }

    #[test]
    fn dissolving_reverses_building() {
        let mut c = controller().with_auto_settle(false);
        let _ = c.set_state(GroupState::Building);
        let _ = c.set_state(GroupState::Complete);
        assert_eq!(c.transforms()[0].offset, target());

        assert_eq!(c.set_state(GroupState::Dissolving), TransitionOutcome::Applied);
        let _ = c.tick(10.0);
        for t in c.transforms() {
            assert_eq!(t.offset, target());
        }
        let window = c.scheduler().window(StaggerDirection::Dissolve);
        let _ = c.tick(10.0 + window + 0.01);
        for t in c.transforms() {
            assert!(t.offset.abs_diff_eq(hidden(), 1e-6));
        }
    }

    #[test]
    fn dissolve_runs_back_to_front() {
        let mut c = controller();
        let _ = c.set_state(GroupState::Building);
        let _ = c.set_state(GroupState::Complete);
        let _ = c.set_state(GroupState::Dissolving);
        let _ = c.tick(0.0);
        let _ = c.tick(0.05);
        assert_ne!(c.transforms()[N - 1].offset, target());
        assert_eq!(c.transforms()[0].offset, target());
    }

    #[test]
    fn dissolve_settles_to_idle() {
        let mut c = controller();
        let _ = c.set_state(GroupState::Building);
        let _ = c.set_state(GroupState::Complete);
        let _ = c.set_state(GroupState::Dissolving);
        let _ = c.tick(0.0);
        assert_eq!(c.tick(5.0), Some(GroupState::Idle));
        assert_eq!(c.state(), GroupState::Idle);
        assert_eq!(c.transforms()[0].offset, hidden());
    }

    #[test]
    fn rebuilding_after_dissolve_resets_elapsed() {
        let mut c = controller();
        let _ = c.set_state(GroupState::Building);
        let _ = c.tick(0.0);
        let _ = c.tick(0.8);
        let _ = c.set_state(GroupState::Dissolving);
        let _ = c.tick(1.0);
        let _ = c.tick(1.2);
        assert!(c.since_enter().unwrap() > 0.0);

        let _ = c.set_state(GroupState::Building);
        let _ = c.tick(7.0);
        assert_eq!(c.since_enter(), Some(0.0));
        for i in 0..N {
            let delay = c.scheduler().stagger_delay(StaggerDirection::Build, i);
            assert_eq!(c.element_elapsed(i), Some(-delay));
            assert_eq!(c.transforms()[i].offset, hidden());
        }
    }

    #[test]
    fn restart_policy_jumps_to_rest_value() {
        let mut c = controller();
        let _ = c.set_state(GroupState::Building);
        let _ = c.tick(0.0);
        let _ = c.tick(0.3);
        let mid = c.transforms()[0].offset;
        assert_ne!(mid, target());

        let _ = c.set_state(GroupState::Dissolving);
        let _ = c.tick(0.3 + 1.0 / 60.0);
        // Element 0 dissolves last; it waits at the target, not where it was.
        assert_eq!(c.transforms()[0].offset, target());
    }

    #[test]
    fn blend_policy_starts_from_current_offset() {
        let mut c = controller().with_interruption(InterruptionPolicy::BlendFromCurrent);
        let _ = c.set_state(GroupState::Building);
        let _ = c.tick(0.0);
        let _ = c.tick(0.3);
        let mid = c.transforms()[0].offset;

        let _ = c.set_state(GroupState::Dissolving);
        let _ = c.tick(0.3 + 1.0 / 60.0);
        assert_eq!(c.transforms()[0].offset, mid);
    }

    #[test]
    fn cancel_to_idle_clears_timers() {
        let mut c = controller();
        let _ = c.set_state(GroupState::Building);
        let _ = c.tick(0.0);
        let _ = c.tick(0.5);
        assert_eq!(c.set_state(GroupState::Idle), TransitionOutcome::Applied);
        assert_eq!(c.since_enter(), None);
        assert_eq!(c.element_elapsed(0), None);
        for t in c.transforms() {
            assert_eq!(*t, ElementTransform::at(hidden()));
        }
    }

    #[test]
    fn element_count_change_resizes_outputs() {
        let mut c = controller();
        let _ = c.set_state(GroupState::Building);
        let _ = c.set_state(GroupState::Complete);
        c.set_element_count(9).unwrap();
        assert_eq!(c.transforms().len(), 9);
        assert_eq!(c.transforms()[8].offset, target());
        assert!(c.set_element_count(0).is_err());
        assert_eq!(c.transforms().len(), 9);
    }

    #[test]
    fn non_finite_time_is_ignored() {
        let mut c = controller();
        let _ = c.set_state(GroupState::Building);
        assert_eq!(c.tick(f32::NAN), None);
        assert_eq!(c.since_enter(), None);
        let _ = c.tick(1.0);
        assert_eq!(c.since_enter(), Some(0.0));
    }
}
