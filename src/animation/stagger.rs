//! Per-element timing offsets within a shared animation window.

use crate::error::{require_positive, ChoreoError};

/// Which way a staged group is animating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaggerDirection {
    /// Front-to-back: element 0 starts first.
    Build,
    /// Back-to-front: the last-built element leaves first.
    Dissolve,
}

/// Timing of one element within its group's animation window.
///
/// Derived from the group geometry, never stored persistently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityTimeline {
    /// Element index within the group.
    pub index: usize,
    /// Seconds after the state-enter time before this element starts.
    pub stagger_delay: f32,
    /// Seconds the element's own animation lasts.
    pub local_duration: f32,
}

impl EntityTimeline {
    /// Seconds into this element's own animation, negative while waiting.
    #[inline]
    #[must_use]
    pub fn elapsed(&self, since_enter: f32) -> f32 {
        since_enter - self.stagger_delay
    }

    /// Local progress in `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn local_progress(&self, since_enter: f32) -> f32 {
        let t = self.elapsed(since_enter) / self.local_duration;
        if t.is_nan() {
            0.0
        } else {
            t.clamp(0.0, 1.0)
        }
    }
}

/// Computes staggered delays for a group of `N` elements.
///
/// # Timing
///
/// Building spreads element starts over `stagger_fraction` of `build_time`:
/// - Element i: starts at `(i / N) * build_time * stagger_fraction`
/// - Each element animates for `build_time * (1 - stagger_fraction)`
///
/// so the whole group settles within `build_time`. Dissolving runs in
/// reverse order, spread over `dissolve_spread` seconds, each element
/// lasting `dissolve_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct StaggerScheduler {
    element_count: usize,
    build_time: f32,
    stagger_fraction: f32,
    dissolve_spread: f32,
    dissolve_time: f32,
}

impl StaggerScheduler {
    /// Validate and build a scheduler.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreoError::NoElements`] for an empty group,
    /// [`ChoreoError::StaggerFraction`] outside `[0, 1)`, and
    /// [`ChoreoError::NonPositive`] for a non-positive build or dissolve
    /// time or a negative dissolve spread.
    pub fn new(
        element_count: usize,
        build_time: f32,
        stagger_fraction: f32,
        dissolve_spread: f32,
        dissolve_time: f32,
    ) -> Result<Self, ChoreoError> {
        if element_count == 0 {
            return Err(ChoreoError::NoElements);
        }
        if !(0.0..1.0).contains(&stagger_fraction) {
            return Err(ChoreoError::StaggerFraction(stagger_fraction));
        }
        if !dissolve_spread.is_finite() || dissolve_spread < 0.0 {
            return Err(ChoreoError::NonPositive {
                name: "dissolve_spread",
                value: dissolve_spread,
            });
        }
        Ok(Self {
            element_count,
            build_time: require_positive("build_time", build_time)?,
            stagger_fraction,
            dissolve_spread,
            dissolve_time: require_positive("dissolve_time", dissolve_time)?,
        })
    }

    /// Number of elements in the group.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Change the element count. Timelines are recomputed on demand.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreoError::NoElements`] if `count` is zero.
    pub fn set_element_count(&mut self, count: usize) -> Result<(), ChoreoError> {
        if count == 0 {
            return Err(ChoreoError::NoElements);
        }
        self.element_count = count;
        Ok(())
    }

    /// Start delay of element `index`.
    #[must_use]
    pub fn stagger_delay(&self, direction: StaggerDirection, index: usize) -> f32 {
        let n = self.element_count as f32;
        match direction {
            StaggerDirection::Build => {
                (index as f32 / n) * self.build_time * self.stagger_fraction
            }
            StaggerDirection::Dissolve => {
                let from_back = self.element_count.saturating_sub(index + 1);
                (from_back as f32 / n) * self.dissolve_spread
            }
        }
    }

    /// Duration of each element's own animation.
    #[must_use]
    pub fn local_duration(&self, direction: StaggerDirection) -> f32 {
        match direction {
            StaggerDirection::Build => {
                self.build_time * (1.0 - self.stagger_fraction)
            }
            StaggerDirection::Dissolve => self.dissolve_time,
        }
    }

    /// Timeline entry for one element.
    #[must_use]
    pub fn entry(&self, direction: StaggerDirection, index: usize) -> EntityTimeline {
        EntityTimeline {
            index,
            stagger_delay: self.stagger_delay(direction, index),
            local_duration: self.local_duration(direction),
        }
    }

    /// Timelines for every element, in index order.
    pub fn timeline(
        &self,
        direction: StaggerDirection,
    ) -> impl Iterator<Item = EntityTimeline> + '_ {
        (0..self.element_count).map(move |i| self.entry(direction, i))
    }

    /// Seconds from state entry until the last element finishes.
    #[must_use]
    pub fn window(&self, direction: StaggerDirection) -> f32 {
        self.timeline(direction)
            .map(|e| e.stagger_delay + e.local_duration)
            .fold(0.0, f32::max)
    }
}
