//! Phase tables map a global progress scalar onto keyframed values.
//!
//! A table is an ordered list of [`PhaseDescriptor`]s that partition
//! `[0, 1]` without gaps or overlaps. Evaluating the table at some progress
//! finds the active phase, rescales progress into that phase's local time,
//! applies the phase's easing and lerps between its endpoints.

use glam::Vec3;

use crate::error::ChoreoError;
use crate::util::easing::EasingFunction;

/// Tolerance for phase boundary contiguity checks.
const BOUNDARY_EPSILON: f32 = 1e-6;

/// Values a phase can interpolate between.
pub trait Lerp: Copy {
    /// Linear interpolation from `self` to `other` at `t`.
    #[must_use]
    fn lerp_to(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Vec3 {
    #[inline]
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

/// One interpolation segment of a phase table.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseDescriptor<T> {
    /// Identifier, e.g. `"approach"` or `"orbit"`.
    pub id: String,
    /// Global progress at which the phase begins.
    pub start_progress: f32,
    /// Global progress at which the phase ends.
    pub end_progress: f32,
    /// Value at the start of the phase.
    pub start_value: T,
    /// Value at the end of the phase.
    pub end_value: T,
    /// Curve applied to the phase's local time.
    pub easing: EasingFunction,
}

impl<T: Lerp> PhaseDescriptor<T> {
    /// Phase spanning `[start_progress, end_progress]`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        start_progress: f32,
        end_progress: f32,
        start_value: T,
        end_value: T,
        easing: EasingFunction,
    ) -> Self {
        Self {
            id: id.into(),
            start_progress,
            end_progress,
            start_value,
            end_value,
            easing,
        }
    }

    /// Local time within this phase for a global progress value.
    #[inline]
    #[must_use]
    pub fn local_t(&self, progress: f32) -> f32 {
        let span = self.end_progress - self.start_progress;
        ((progress - self.start_progress) / span).clamp(0.0, 1.0)
    }

    /// Eased, interpolated value at a global progress value.
    #[inline]
    #[must_use]
    pub fn value_at(&self, progress: f32) -> T {
        let eased = self.easing.evaluate(self.local_t(progress));
        self.start_value.lerp_to(self.end_value, eased)
    }
}

/// Ordered, validated list of phases covering `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTable<T> {
    phases: Vec<PhaseDescriptor<T>>,
}

impl<T: Lerp> PhaseTable<T> {
    /// Build a table, rejecting lists that do not partition `[0, 1]`.
    ///
    /// # Errors
    ///
    /// - [`ChoreoError::EmptyPhaseTable`] for an empty list
    /// - [`ChoreoError::PhaseBounds`] if the list does not start at 0 and
    ///   end at 1
    /// - [`ChoreoError::EmptyPhase`] for a phase with a non-finite or empty
    ///   range
    /// - [`ChoreoError::PhaseDiscontinuity`] for a gap or overlap between
    ///   neighbours
    pub fn new(phases: Vec<PhaseDescriptor<T>>) -> Result<Self, ChoreoError> {
        let (Some(first), Some(last)) = (phases.first(), phases.last()) else {
            return Err(ChoreoError::EmptyPhaseTable);
        };
        if first.start_progress.abs() > BOUNDARY_EPSILON {
            return Err(ChoreoError::PhaseBounds {
                found: first.start_progress,
                expected: 0.0,
            });
        }
        if (last.end_progress - 1.0).abs() > BOUNDARY_EPSILON {
            return Err(ChoreoError::PhaseBounds {
                found: last.end_progress,
                expected: 1.0,
            });
        }

        for (index, phase) in phases.iter().enumerate() {
            let finite = phase.start_progress.is_finite()
                && phase.end_progress.is_finite();
            if !finite || phase.end_progress <= phase.start_progress {
                return Err(ChoreoError::EmptyPhase { index });
            }
        }
        for (index, pair) in phases.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if (prev.end_progress - next.start_progress).abs()
                > BOUNDARY_EPSILON
            {
                return Err(ChoreoError::PhaseDiscontinuity {
                    index: index + 1,
                    previous_end: prev.end_progress,
                    start: next.start_progress,
                });
            }
        }

        Ok(Self { phases })
    }

    /// Table holding a single phase over `[0, 1]`.
    #[must_use]
    pub fn single(
        start_value: T,
        end_value: T,
        easing: EasingFunction,
    ) -> Self {
        Self {
            phases: vec![PhaseDescriptor::new(
                "main",
                0.0,
                1.0,
                start_value,
                end_value,
                easing,
            )],
        }
    }

    /// Index of the phase active at `progress`.
    ///
    /// A boundary value belongs to the later phase; `1.0` belongs to the
    /// final phase.
    #[must_use]
    pub fn active_index(&self, progress: f32) -> usize {
        let p = sanitize_progress(progress);
        self.phases
            .partition_point(|phase| phase.start_progress <= p)
            .saturating_sub(1)
    }

    /// Phase active at `progress`.
    #[must_use]
    pub fn active_phase(&self, progress: f32) -> &PhaseDescriptor<T> {
        &self.phases[self.active_index(progress)]
    }

    /// Interpolated value at `progress`.
    #[must_use]
    pub fn evaluate(&self, progress: f32) -> T {
        let p = sanitize_progress(progress);
        self.active_phase(p).value_at(p)
    }

    /// The validated phases, in order.
    #[must_use]
    pub fn phases(&self) -> &[PhaseDescriptor<T>] {
        &self.phases
    }
}

/// Clamp progress into `[0, 1]`, mapping NaN to 0.
#[inline]
pub(crate) fn sanitize_progress(progress: f32) -> f32 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_phase() -> PhaseTable<Vec3> {
        PhaseTable::new(vec![
            PhaseDescriptor::new(
                "approach",
                0.0,
                0.4,
                Vec3::new(0.0, 10.0, 40.0),
                Vec3::new(0.0, 5.0, 20.0),
                EasingFunction::CubicInOut,
            ),
            PhaseDescriptor::new(
                "sweep",
                0.4,
                0.8,
                Vec3::new(0.0, 5.0, 20.0),
                Vec3::new(10.0, 4.0, 10.0),
                EasingFunction::Linear,
            ),
            PhaseDescriptor::new(
                "settle",
                0.8,
                1.0,
                Vec3::new(10.0, 4.0, 10.0),
                Vec3::new(12.0, 3.0, 8.0),
                EasingFunction::QuadraticOut,
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_rejects_empty() {
        let err = PhaseTable::<f32>::new(Vec::new()).unwrap_err();
        assert!(matches!(err, ChoreoError::EmptyPhaseTable));
    }

    #[test]
    fn test_rejects_gap() {
        let err = PhaseTable::new(vec![
            PhaseDescriptor::new("a", 0.0, 0.4, 0.0, 1.0, EasingFunction::Linear),
            PhaseDescriptor::new("b", 0.5, 1.0, 1.0, 2.0, EasingFunction::Linear),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ChoreoError::PhaseDiscontinuity { index: 1, .. }
        ));
    }

    #[test]
    fn test_rejects_overlap() {
        let err = PhaseTable::new(vec![
            PhaseDescriptor::new("a", 0.0, 0.6, 0.0, 1.0, EasingFunction::Linear),
            PhaseDescriptor::new("b", 0.5, 1.0, 1.0, 2.0, EasingFunction::Linear),
        ])
        .unwrap_err();
        assert!(matches!(err, ChoreoError::PhaseDiscontinuity { .. }));
    }

    #[test]
    fn test_rejects_partial_coverage() {
        let short_end = PhaseTable::new(vec![PhaseDescriptor::new(
            "a",
            0.0,
            0.9,
            0.0,
            1.0,
            EasingFunction::Linear,
        )]);
        assert!(matches!(
            short_end,
            Err(ChoreoError::PhaseBounds { expected, .. }) if expected == 1.0
        ));

        let late_start = PhaseTable::new(vec![PhaseDescriptor::new(
            "a",
            0.1,
            1.0,
            0.0,
            1.0,
            EasingFunction::Linear,
        )]);
        assert!(matches!(
            late_start,
            Err(ChoreoError::PhaseBounds { expected, .. }) if expected == 0.0
        ));
    }

    #[test]
    fn test_rejects_zero_width_phase() {
        let err = PhaseTable::new(vec![
            PhaseDescriptor::new("a", 0.0, 0.5, 0.0, 1.0, EasingFunction::Linear),
            PhaseDescriptor::new("b", 0.5, 0.5, 1.0, 1.0, EasingFunction::Linear),
            PhaseDescriptor::new("c", 0.5, 1.0, 1.0, 2.0, EasingFunction::Linear),
        ])
        .unwrap_err();
        assert!(matches!(err, ChoreoError::EmptyPhase { index: 1 }));
    }

    #[test]
    fn test_phases_cover_unit_interval() {
        let table = three_phase();
        let phases = table.phases();
        assert_eq!(phases.first().unwrap().start_progress, 0.0);
        assert_eq!(phases.last().unwrap().end_progress, 1.0);
        for pair in phases.windows(2) {
            assert_eq!(pair[0].end_progress, pair[1].start_progress);
        }
    }

    #[test]
    fn test_boundary_belongs_to_later_phase() {
        let table = three_phase();
        assert_eq!(table.active_index(0.0), 0);
        assert_eq!(table.active_index(0.39), 0);
        assert_eq!(table.active_index(0.4), 1);
        assert_eq!(table.active_index(0.8), 2);
        assert_eq!(table.active_index(1.0), 2);
        assert_eq!(table.active_phase(0.4).id, "sweep");
    }

    #[test]
    fn test_out_of_range_progress_is_clamped() {
        let table = three_phase();
        assert_eq!(table.active_index(-3.0), 0);
        assert_eq!(table.active_index(7.0), 2);
        assert_eq!(table.active_index(f32::NAN), 0);
        assert_eq!(table.evaluate(f32::NAN), Vec3::new(0.0, 10.0, 40.0));
        assert_eq!(table.evaluate(2.0), Vec3::new(12.0, 3.0, 8.0));
    }

    #[test]
    fn test_evaluate_hits_keyframes() {
        let table = three_phase();
        assert_eq!(table.evaluate(0.0), Vec3::new(0.0, 10.0, 40.0));
        assert!(table.evaluate(0.4).abs_diff_eq(Vec3::new(0.0, 5.0, 20.0), 1e-5));
        assert!(table.evaluate(0.8).abs_diff_eq(Vec3::new(10.0, 4.0, 10.0), 1e-5));
        assert!(table.evaluate(1.0).abs_diff_eq(Vec3::new(12.0, 3.0, 8.0), 1e-5));
    }

    #[test]
    fn test_evaluate_applies_phase_easing() {
        let table = three_phase();
        // Halfway through the linear sweep phase.
        let mid = table.evaluate(0.6);
        assert!(mid.abs_diff_eq(Vec3::new(5.0, 4.5, 15.0), 1e-4));

        // Quarter of the way through cubic-in-out approach: eased = 0.0625.
        let early = table.evaluate(0.1);
        let expected = Vec3::new(0.0, 10.0, 40.0)
            + (Vec3::new(0.0, -5.0, -20.0)) * 0.0625;
        assert!(early.abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn test_scalar_table() {
        let table = PhaseTable::single(45.0f32, 60.0, EasingFunction::Linear);
        assert_eq!(table.evaluate(0.0), 45.0);
        assert!((table.evaluate(0.5) - 52.5).abs() < 1e-5);
        assert_eq!(table.evaluate(1.0), 60.0);
    }
}
