use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::animation::staged::{
    InterruptionPolicy, StagedEntityController, StagedMotion,
};
use crate::animation::stagger::StaggerScheduler;
use crate::error::ChoreoError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Group", inline)]
#[serde(default)]
/// An animated group of elements that build and dissolve together.
pub struct GroupOptions {
    /// Stable key used by `set_group_state`.
    #[schemars(skip)]
    pub key: String,
    /// Number of elements in the group.
    #[schemars(title = "Elements", range(min = 1, max = 256))]
    pub element_count: usize,
    /// Seconds from the start of a build until the last element settles.
    #[schemars(title = "Build Time", range(min = 0.1, max = 10.0), extend("step" = 0.1))]
    pub build_time: f32,
    /// Share of the build time spent staggering element starts.
    #[schemars(title = "Stagger", range(min = 0.0, max = 0.95), extend("step" = 0.05))]
    pub stagger_fraction: f32,
    /// Seconds over which dissolve start times are spread.
    #[schemars(title = "Dissolve Spread", range(min = 0.0, max = 5.0), extend("step" = 0.05))]
    pub dissolve_spread: f32,
    /// Seconds each element takes to dissolve.
    #[schemars(title = "Dissolve Time", range(min = 0.05, max = 5.0), extend("step" = 0.05))]
    pub dissolve_time: f32,
    /// Element offset while hidden.
    #[schemars(skip)]
    pub hidden_offset: [f32; 3],
    /// Element offset once built.
    #[schemars(skip)]
    pub rest_offset: [f32; 3],
    /// Peak wobble rotation while building, in radians.
    #[schemars(title = "Wobble", range(min = 0.0, max = 0.5), extend("step" = 0.01))]
    pub wobble_amplitude: f32,
    /// Wobble angular frequency in radians per second.
    #[schemars(skip)]
    pub wobble_frequency: f32,
    /// Start behavior when build and dissolve interrupt each other.
    #[schemars(skip)]
    pub interruption: InterruptionPolicy,
    /// Advance to Complete / Idle automatically when every element is done.
    #[schemars(title = "Auto Settle")]
    pub auto_settle: bool,
}

impl Default for GroupOptions {
    fn default() -> Self {
        let motion = StagedMotion::default();
        Self {
            key: "bridge".to_owned(),
            element_count: 16,
            build_time: 2.4,
            stagger_fraction: 0.7,
            dissolve_spread: 0.4,
            dissolve_time: 0.6,
            hidden_offset: motion.hidden.to_array(),
            rest_offset: motion.target.to_array(),
            wobble_amplitude: motion.wobble_amplitude,
            wobble_frequency: motion.wobble_frequency,
            interruption: InterruptionPolicy::default(),
            auto_settle: true,
        }
    }
}

impl GroupOptions {
    /// Shared element motion endpoints.
    #[must_use]
    pub fn motion(&self) -> StagedMotion {
        StagedMotion {
            hidden: Vec3::from(self.hidden_offset),
            target: Vec3::from(self.rest_offset),
            wobble_amplitude: self.wobble_amplitude,
            wobble_frequency: self.wobble_frequency,
        }
    }

    /// Validate the group and build its controller.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreoError::EmptyGroup`] naming this group's key if it has
    /// no elements, or the scheduler's error for invalid timing.
    pub fn build_controller(
        &self,
    ) -> Result<StagedEntityController, ChoreoError> {
        let scheduler = StaggerScheduler::new(
            self.element_count,
            self.build_time,
            self.stagger_fraction,
            self.dissolve_spread,
            self.dissolve_time,
        )
        .map_err(|e| e.in_group(&self.key))?;
        Ok(StagedEntityController::new(scheduler, self.motion())
            .with_interruption(self.interruption)
            .with_auto_settle(self.auto_settle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_group_builds() {
        let controller = GroupOptions::default().build_controller().unwrap();
        assert_eq!(controller.transforms().len(), 16);
    }

    #[test]
    fn empty_group_names_its_key() {
        let opts = GroupOptions {
            key: "pier".to_owned(),
            element_count: 0,
            ..GroupOptions::default()
        };
        match opts.build_controller() {
            Err(ChoreoError::EmptyGroup(key)) => assert_eq!(key, "pier"),
            other => panic!("expected EmptyGroup, got {other:?}"),
        }
    }

    #[test]
    fn invalid_timing_keeps_its_own_error() {
        let opts = GroupOptions {
            build_time: -1.0,
            ..GroupOptions::default()
        };
        assert!(matches!(
            opts.build_controller(),
            Err(ChoreoError::NonPositive { name: "build_time", .. })
        ));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let opts: GroupOptions = toml::from_str(
            r#"
key = "stairs"
element_count = 5
interruption = "blend_from_current"
"#,
        )
        .unwrap();
        assert_eq!(opts.key, "stairs");
        assert_eq!(opts.element_count, 5);
        assert_eq!(opts.interruption, InterruptionPolicy::BlendFromCurrent);
        assert_eq!(opts.build_time, 2.4);
    }
}
