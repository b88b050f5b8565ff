//! Choreography configuration with TOML preset support.
//!
//! Everything the [`Choreographer`](crate::choreographer::Choreographer)
//! needs at construction time lives here: frame timing, camera rig
//! smoothing, the keyed camera transitions and the keyed animated groups.
//! Options serialize to/from TOML so scene presets can live next to the
//! other scene assets.

mod camera;
mod group;
mod timing;
mod transition;

use std::path::Path;

pub use camera::CameraOptions;
pub use group::GroupOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use timing::TimingOptions;
pub use transition::{phase_table, PhaseOptions, TransitionOptions};

use crate::error::ChoreoError;

/// Top-level options container. Sections use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[timing]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct ChoreoOptions {
    /// Frame-delta clamping and progress smoothing.
    pub timing: TimingOptions,
    /// Camera rig placement and smoothing.
    pub camera: CameraOptions,
    /// Camera transitions, one per scene mode.
    #[schemars(skip)]
    pub transitions: Vec<TransitionOptions>,
    /// Animated element groups.
    pub groups: Vec<GroupOptions>,
}

impl Default for ChoreoOptions {
    fn default() -> Self {
        Self {
            timing: TimingOptions::default(),
            camera: CameraOptions::default(),
            transitions: vec![
                TransitionOptions::intro(),
                TransitionOptions::gallery(),
            ],
            groups: vec![GroupOptions::default()],
        }
    }
}

impl ChoreoOptions {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(ChoreoOptions)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreoError::OptionsParse`] if the TOML is malformed or
    /// has fields of the wrong type.
    pub fn from_toml(content: &str) -> Result<Self, ChoreoError> {
        toml::from_str(content)
            .map_err(|e| ChoreoError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreoError::Io`] if the file cannot be read and
    /// [`ChoreoError::OptionsParse`] if its contents do not parse.
    pub fn load(path: &Path) -> Result<Self, ChoreoError> {
        let content = std::fs::read_to_string(path).map_err(ChoreoError::Io)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`ChoreoError::OptionsParse`] if serialization fails and
    /// [`ChoreoError::Io`] if the file or its directory cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ChoreoError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ChoreoError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ChoreoError::Io)?;
        }
        std::fs::write(path, content).map_err(ChoreoError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}
