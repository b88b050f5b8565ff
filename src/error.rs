//! Crate-level error types.

use std::fmt;

/// Errors produced by the choreo crate.
///
/// Every variant except [`ChoreoError::Io`] and
/// [`ChoreoError::OptionsParse`] is a configuration error detected at
/// construction time, before any tick runs.
#[derive(Debug)]
pub enum ChoreoError {
    /// A phase table was built from an empty phase list.
    EmptyPhaseTable,
    /// The first phase does not start at 0 or the last does not end at 1.
    PhaseBounds {
        /// Offending progress value.
        found: f32,
        /// Progress value the table requires at that end.
        expected: f32,
    },
    /// Two neighbouring phases leave a gap or overlap.
    PhaseDiscontinuity {
        /// Index of the later phase of the pair.
        index: usize,
        /// End progress of the previous phase.
        previous_end: f32,
        /// Start progress of this phase.
        start: f32,
    },
    /// A phase whose end does not lie strictly after its start.
    EmptyPhase {
        /// Index of the degenerate phase.
        index: usize,
    },
    /// A duration, rate or time value that must be positive and finite.
    NonPositive {
        /// Name of the offending parameter.
        name: &'static str,
        /// Value supplied.
        value: f32,
    },
    /// A stagger fraction outside `[0, 1)`.
    StaggerFraction(f32),
    /// An element count of zero, before the owning group is known.
    NoElements,
    /// An animated group configured with no elements.
    EmptyGroup(String),
    /// The same group or transition key was configured twice.
    DuplicateKey(String),
    /// A command referenced a group key that was never configured.
    UnknownGroup(String),
    /// A command referenced a transition key that was never configured.
    UnknownTransition(String),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
}

impl fmt::Display for ChoreoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPhaseTable => write!(f, "phase table has no phases"),
            Self::PhaseBounds { found, expected } => write!(
                f,
                "phase table must span [0, 1]: found {found}, expected \
                 {expected}"
            ),
            Self::PhaseDiscontinuity {
                index,
                previous_end,
                start,
            } => write!(
                f,
                "phase {index} starts at {start} but previous phase ends at \
                 {previous_end}"
            ),
            Self::EmptyPhase { index } => {
                write!(f, "phase {index} has an empty progress range")
            }
            Self::NonPositive { name, value } => {
                write!(f, "{name} must be positive and finite, got {value}")
            }
            Self::StaggerFraction(value) => {
                write!(f, "stagger fraction must lie in [0, 1), got {value}")
            }
            Self::NoElements => write!(f, "element count must be at least 1"),
            Self::EmptyGroup(key) => {
                write!(f, "group '{key}' must have at least one element")
            }
            Self::DuplicateKey(key) => write!(f, "duplicate key '{key}'"),
            Self::UnknownGroup(key) => write!(f, "unknown group '{key}'"),
            Self::UnknownTransition(key) => {
                write!(f, "unknown transition '{key}'")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for ChoreoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ChoreoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl ChoreoError {
    /// Attach the owning group's key to a key-less element-count error.
    /// Every other error passes through unchanged.
    #[must_use]
    pub(crate) fn in_group(self, key: &str) -> Self {
        match self {
            Self::NoElements => Self::EmptyGroup(key.to_owned()),
            other => other,
        }
    }
}

/// Reject zero, negative and non-finite configuration values.
pub(crate) fn require_positive(
    name: &'static str,
    value: f32,
) -> Result<f32, ChoreoError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ChoreoError::NonPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_positive_rejects_zero_negative_and_nan() {
        assert!(require_positive("duration", 0.0).is_err());
        assert!(require_positive("duration", -1.0).is_err());
        assert!(require_positive("duration", f32::NAN).is_err());
        assert!(require_positive("duration", f32::INFINITY).is_err());
        assert_eq!(require_positive("duration", 3.5).unwrap(), 3.5);
    }

    #[test]
    fn in_group_names_only_element_count_errors() {
        match ChoreoError::NoElements.in_group("pier") {
            ChoreoError::EmptyGroup(key) => assert_eq!(key, "pier"),
            other => panic!("expected EmptyGroup, got {other:?}"),
        }
        assert!(matches!(
            ChoreoError::StaggerFraction(1.5).in_group("pier"),
            ChoreoError::StaggerFraction(v) if v == 1.5
        ));
        assert!(matches!(
            require_positive("build_time", 0.0).unwrap_err().in_group("pier"),
            ChoreoError::NonPositive { name: "build_time", .. }
        ));
    }

    #[test]
    fn display_names_the_parameter() {
        let err = ChoreoError::NonPositive {
            name: "build_time",
            value: -2.0,
        };
        assert_eq!(
            err.to_string(),
            "build_time must be positive and finite, got -2"
        );
    }
}
