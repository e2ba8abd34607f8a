use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Smallest duration the engine will accept for a phase.
pub const MIN_PHASE_SECS: u64 = 1;

/// Smallest duration the presentation layer should offer.
pub const UI_MIN_PHASE_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    SlowWalk,
    FastWalk,
    Run,
}

impl PhaseKind {
    pub fn label(self) -> &'static str {
        match self {
            PhaseKind::SlowWalk => "slow walk",
            PhaseKind::FastWalk => "fast walk",
            PhaseKind::Run => "run",
        }
    }

    /// Treadmill speed hint shown next to the phase, in km/h.
    pub fn default_speed_range(self) -> &'static str {
        match self {
            PhaseKind::SlowWalk => "3~5",
            PhaseKind::FastWalk => "5~6",
            PhaseKind::Run => "9~11",
        }
    }
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub kind: PhaseKind,
    /// Duration in seconds.
    pub duration_secs: u64,
    /// Treadmill speed hint, in km/h.
    pub speed_range: String,
}

impl Phase {
    fn new(kind: PhaseKind, duration_secs: u64) -> Self {
        Self {
            kind,
            duration_secs: duration_secs.max(MIN_PHASE_SECS),
            speed_range: kind.default_speed_range().to_string(),
        }
    }
}

/// The ordered phase list for one pass of the workout.
///
/// Non-empty by construction: the only constructors are the built-in
/// walk/run sequence and per-phase duration overrides of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    phases: Vec<Phase>,
}

impl Routine {
    /// The built-in walk/run routine: 3 min slow walk, 2 min fast walk,
    /// 2 min run.
    pub fn default_walk_run() -> Self {
        Self {
            phases: vec![
                Phase::new(PhaseKind::SlowWalk, 180),
                Phase::new(PhaseKind::FastWalk, 120),
                Phase::new(PhaseKind::Run, 120),
            ],
        }
    }

    /// The built-in routine with per-phase duration overrides.
    ///
    /// Durations below [`MIN_PHASE_SECS`] are clamped up.
    pub fn from_durations(slow_secs: u64, fast_secs: u64, run_secs: u64) -> Self {
        Self {
            phases: vec![
                Phase::new(PhaseKind::SlowWalk, slow_secs),
                Phase::new(PhaseKind::FastWalk, fast_secs),
                Phase::new(PhaseKind::Run, run_secs),
            ],
        }
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn phase(&self, index: usize) -> Result<&Phase> {
        self.phases.get(index).ok_or(CoreError::OutOfRange {
            index,
            len: self.phases.len(),
        })
    }

    /// Replace the duration of the phase at `index`.
    ///
    /// Values below [`MIN_PHASE_SECS`] are clamped up; the clamped value
    /// is returned. Fails with [`CoreError::OutOfRange`] for an index
    /// outside the routine.
    pub fn set_duration(&mut self, index: usize, duration_secs: u64) -> Result<u64> {
        let len = self.phases.len();
        let phase = self
            .phases
            .get_mut(index)
            .ok_or(CoreError::OutOfRange { index, len })?;
        phase.duration_secs = duration_secs.max(MIN_PHASE_SECS);
        Ok(phase.duration_secs)
    }

    pub fn total_duration_secs(&self) -> u64 {
        self.phases.iter().map(|p| p.duration_secs).sum()
    }
}

impl Default for Routine {
    fn default() -> Self {
        Self::default_walk_run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_routine_has_three_phases() {
        let r = Routine::default();
        assert_eq!(r.len(), 3);
        assert_eq!(
            r.phases().iter().map(|p| p.kind).collect::<Vec<_>>(),
            vec![PhaseKind::SlowWalk, PhaseKind::FastWalk, PhaseKind::Run]
        );
    }

    #[test]
    fn default_durations_and_speed_hints() {
        let r = Routine::default();
        assert_eq!(
            r.phases().iter().map(|p| p.duration_secs).collect::<Vec<_>>(),
            vec![180, 120, 120]
        );
        assert_eq!(r.phases()[0].speed_range, "3~5");
        assert_eq!(r.phases()[1].speed_range, "5~6");
        assert_eq!(r.phases()[2].speed_range, "9~11");
    }

    #[test]
    fn total_duration() {
        assert_eq!(Routine::default().total_duration_secs(), 420);
        assert_eq!(Routine::from_durations(30, 20, 10).total_duration_secs(), 60);
    }

    #[test]
    fn set_duration_clamps_to_minimum() {
        let mut r = Routine::default();
        assert_eq!(r.set_duration(1, 0).unwrap(), MIN_PHASE_SECS);
        assert_eq!(r.phases()[1].duration_secs, MIN_PHASE_SECS);
    }

    #[test]
    fn set_duration_rejects_out_of_range_index() {
        let mut r = Routine::default();
        let err = r.set_duration(3, 60).unwrap_err();
        assert!(matches!(err, CoreError::OutOfRange { index: 3, len: 3 }));
        // The routine is untouched.
        assert_eq!(r, Routine::default());
    }

    #[test]
    fn phase_lookup_rejects_out_of_range_index() {
        let r = Routine::default();
        assert!(r.phase(2).is_ok());
        assert!(matches!(
            r.phase(7),
            Err(CoreError::OutOfRange { index: 7, len: 3 })
        ));
    }

    #[test]
    fn from_durations_clamps_each_phase() {
        let r = Routine::from_durations(0, 0, 0);
        assert!(r.phases().iter().all(|p| p.duration_secs == MIN_PHASE_SECS));
    }
}
