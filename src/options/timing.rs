use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Timing", inline)]
#[serde(default)]
/// Frame-delta clamping and progress smoothing shared by every transition.
pub struct TimingOptions {
    /// Longest frame delta fed to any smoother, in seconds. A resumed
    /// background tab advances by at most this much in one tick.
    #[schemars(title = "Max Frame Delta", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub max_frame_delta: f32,
    /// Low-pass rate (1/s) of transition progress.
    #[schemars(title = "Progress Smoothing", range(min = 0.5, max = 30.0), extend("step" = 0.5))]
    pub progress_smoothing: f32,
}

impl Default for TimingOptions {
    fn default() -> Self {
        Self {
            max_frame_delta: 0.1,
            progress_smoothing: 4.0,
        }
    }
}
