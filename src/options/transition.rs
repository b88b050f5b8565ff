use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::animation::phase::{Lerp, PhaseDescriptor, PhaseTable};
use crate::error::ChoreoError;
use crate::util::easing::EasingFunction;

/// One keyframed phase as written in a preset file.
///
/// `V` is `[f32; 3]` for vector tracks and `f32` for scalar tracks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct PhaseOptions<V> {
    /// Phase identifier, e.g. `"approach"`.
    pub id: String,
    /// Global progress where the phase starts.
    pub start: f32,
    /// Global progress where the phase ends.
    pub end: f32,
    /// Value at the start of the phase.
    pub from: V,
    /// Value at the end of the phase.
    pub to: V,
    /// Easing applied within the phase.
    #[serde(default)]
    pub easing: EasingFunction,
}

impl<V> PhaseOptions<V> {
    /// Phase options from their parts.
    #[must_use]
    pub fn new(
        id: &str,
        start: f32,
        end: f32,
        from: V,
        to: V,
        easing: EasingFunction,
    ) -> Self {
        Self {
            id: id.to_owned(),
            start,
            end,
            from,
            to,
            easing,
        }
    }

    fn to_descriptor<T>(&self) -> PhaseDescriptor<T>
    where
        V: Copy + Into<T>,
        T: Lerp,
    {
        PhaseDescriptor::new(
            self.id.clone(),
            self.start,
            self.end,
            self.from.into(),
            self.to.into(),
            self.easing,
        )
    }
}

/// Build a validated phase table from preset phases.
///
/// # Errors
///
/// Returns the [`PhaseTable::new`] validation error if the phases do not
/// partition `[0, 1]`.
pub fn phase_table<V, T>(
    phases: &[PhaseOptions<V>],
) -> Result<PhaseTable<T>, ChoreoError>
where
    V: Copy + Into<T>,
    T: Lerp,
{
    PhaseTable::new(phases.iter().map(PhaseOptions::to_descriptor).collect())
}

/// A camera transition triggered by a scene-mode change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct TransitionOptions {
    /// Stable key used by `start_transition`.
    pub key: String,
    /// Total duration in seconds.
    pub duration: f32,
    /// Camera eye position track.
    pub position: Vec<PhaseOptions<[f32; 3]>>,
    /// Camera look-at track.
    pub look_at: Vec<PhaseOptions<[f32; 3]>>,
    /// Optional vertical field-of-view track, in degrees.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fov: Vec<PhaseOptions<f32>>,
}

impl TransitionOptions {
    /// Validated eye position table.
    ///
    /// # Errors
    ///
    /// Returns the phase validation error, as [`phase_table`] does.
    pub fn position_table(&self) -> Result<PhaseTable<Vec3>, ChoreoError> {
        phase_table(&self.position)
    }

    /// Validated look-at table.
    ///
    /// # Errors
    ///
    /// Returns the phase validation error, as [`phase_table`] does.
    pub fn look_at_table(&self) -> Result<PhaseTable<Vec3>, ChoreoError> {
        phase_table(&self.look_at)
    }

    /// Validated field-of-view table, if the transition animates it.
    ///
    /// # Errors
    ///
    /// Returns the phase validation error for a non-empty fov track.
    pub fn fov_table(&self) -> Result<Option<PhaseTable<f32>>, ChoreoError> {
        if self.fov.is_empty() {
            Ok(None)
        } else {
            phase_table(&self.fov).map(Some)
        }
    }

    /// The gallery's opening fly-in.
    #[must_use]
    pub fn intro() -> Self {
        use EasingFunction::{CubicInOut, CubicOut, QuadraticInOut};
        Self {
            key: "intro".to_owned(),
            duration: 3.5,
            position: vec![
                PhaseOptions::new(
                    "approach",
                    0.0,
                    0.35,
                    [0.0, 30.0, 80.0],
                    [0.0, 12.0, 35.0],
                    CubicOut,
                ),
                PhaseOptions::new(
                    "orbit",
                    0.35,
                    0.8,
                    [0.0, 12.0, 35.0],
                    [18.0, 8.0, 18.0],
                    CubicInOut,
                ),
                PhaseOptions::new(
                    "settle",
                    0.8,
                    1.0,
                    [18.0, 8.0, 18.0],
                    [12.0, 6.0, 14.0],
                    QuadraticInOut,
                ),
            ],
            look_at: vec![
                PhaseOptions::new(
                    "approach",
                    0.0,
                    0.35,
                    [0.0, 0.0, 0.0],
                    [0.0, 2.0, 0.0],
                    CubicOut,
                ),
                PhaseOptions::new(
                    "frame",
                    0.35,
                    1.0,
                    [0.0, 2.0, 0.0],
                    [0.0, 1.5, -4.0],
                    CubicInOut,
                ),
            ],
            fov: vec![PhaseOptions::new(
                "zoom",
                0.0,
                1.0,
                60.0,
                45.0,
                CubicInOut,
            )],
        }
    }

    /// Move from the overview into the project gallery.
    #[must_use]
    pub fn gallery() -> Self {
        use EasingFunction::{CubicInOut, QuadraticOut};
        Self {
            key: "gallery".to_owned(),
            duration: 2.5,
            position: vec![
                PhaseOptions::new(
                    "approach",
                    0.0,
                    0.4,
                    [12.0, 6.0, 14.0],
                    [4.0, 3.0, -6.0],
                    QuadraticOut,
                ),
                PhaseOptions::new(
                    "glide",
                    0.4,
                    1.0,
                    [4.0, 3.0, -6.0],
                    [0.0, 2.5, -20.0],
                    CubicInOut,
                ),
            ],
            look_at: vec![PhaseOptions::new(
                "track",
                0.0,
                1.0,
                [0.0, 1.5, -4.0],
                [0.0, 2.0, -32.0],
                CubicInOut,
            )],
            fov: Vec::new(),
        }
    }
}
