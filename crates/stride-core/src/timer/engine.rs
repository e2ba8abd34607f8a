//! Interval timer engine.
//!
//! The engine is a clock-free state machine. It does not own a timer -
//! the driver (or a test) is responsible for calling `tick()` once per
//! elapsed second while the timer is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running(0) -> ... -> Running(n-1) -> Idle
//!            ^  |
//!            |  v
//!           Paused(i)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = IntervalTimer::with_defaults();
//! timer.start();
//! // Once per second:
//! timer.tick(); // Returns Some(Event) when a phase completes
//! ```

use std::collections::BTreeSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::counts::CompletionCounts;
use super::routine::{Phase, Routine};
use crate::error::Result;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Where the timer sits within the routine.
///
/// Idle is a variant rather than a sentinel index so that the engine can
/// never index the phase list out of range; the snapshot boundary still
/// exposes `-1` for display code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Idle,
    Active {
        phase_index: usize,
        remaining_secs: u64,
    },
}

/// Core interval timer.
///
/// Tracks the countdown through one routine pass plus the counters that
/// survive across passes: per-kind completions, full-routine completions,
/// and total running seconds.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    /// The phase list handed to `new()`; `reset()` restores it.
    defaults: Routine,
    routine: Routine,
    position: Position,
    running: bool,
    total_elapsed_secs: u64,
    /// Phase indices fully consumed in the current pass.
    completed_this_pass: BTreeSet<usize>,
    counts: CompletionCounts,
    routines_completed: u64,
}

impl IntervalTimer {
    /// Create a timer over the given phase list.
    ///
    /// The list becomes this instance's reset target, so independent
    /// timers never share configuration.
    pub fn new(routine: Routine) -> Self {
        Self {
            defaults: routine.clone(),
            routine,
            position: Position::Idle,
            running: false,
            total_elapsed_secs: 0,
            completed_this_pass: BTreeSet::new(),
            counts: CompletionCounts::default(),
            routines_completed: 0,
        }
    }

    /// Create a timer over the built-in walk/run routine.
    pub fn with_defaults() -> Self {
        Self::new(Routine::default_walk_run())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        match (self.position, self.running) {
            (Position::Idle, _) => TimerState::Idle,
            (Position::Active { .. }, true) => TimerState::Running,
            (Position::Active { .. }, false) => TimerState::Paused,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase_index(&self) -> Option<usize> {
        match self.position {
            Position::Idle => None,
            Position::Active { phase_index, .. } => Some(phase_index),
        }
    }

    pub fn remaining_secs(&self) -> u64 {
        match self.position {
            Position::Idle => 0,
            Position::Active { remaining_secs, .. } => remaining_secs,
        }
    }

    pub fn current_phase(&self) -> Option<&Phase> {
        self.phase_index()
            .and_then(|i| self.routine.phases().get(i))
    }

    pub fn routine(&self) -> &Routine {
        &self.routine
    }

    pub fn total_elapsed_secs(&self) -> u64 {
        self.total_elapsed_secs
    }

    pub fn counts(&self) -> CompletionCounts {
        self.counts
    }

    pub fn routines_completed(&self) -> u64 {
        self.routines_completed
    }

    /// 0.0 .. 1.0 progress within the current phase; 0.0 when idle.
    pub fn progress(&self) -> f64 {
        match self.position {
            Position::Idle => 0.0,
            Position::Active {
                phase_index,
                remaining_secs,
            } => {
                let duration = self.routine.phases()[phase_index].duration_secs;
                if duration == 0 {
                    return 0.0;
                }
                // saturating_sub: a mid-phase edit may shrink the duration
                // below the remaining time; progress floors at 0 instead
                // of going negative.
                duration.saturating_sub(remaining_secs) as f64 / duration as f64
            }
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let (phase_index, kind, speed_range, remaining_secs, duration_secs) = match self.position {
            Position::Idle => (-1, None, None, 0, 0),
            Position::Active {
                phase_index,
                remaining_secs,
            } => {
                let phase = &self.routine.phases()[phase_index];
                (
                    phase_index as i64,
                    Some(phase.kind),
                    Some(phase.speed_range.clone()),
                    remaining_secs,
                    phase.duration_secs,
                )
            }
        };
        Event::StateSnapshot {
            state: self.state(),
            phase_index,
            kind,
            speed_range,
            remaining_secs,
            duration_secs,
            progress: self.progress(),
            total_elapsed_secs: self.total_elapsed_secs,
            counts: self.counts,
            routines_completed: self.routines_completed,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start, or stop when already running - the single control is a
    /// toggle. From idle, activates the first phase with its full
    /// duration; from paused, resumes with the preserved remaining time.
    pub fn start(&mut self) -> Event {
        if self.running {
            return self.stop_running();
        }
        self.running = true;
        let (phase_index, remaining_secs) = match self.position {
            Position::Idle => {
                let secs = self.routine.phases()[0].duration_secs;
                self.position = Position::Active {
                    phase_index: 0,
                    remaining_secs: secs,
                };
                (0, secs)
            }
            Position::Active {
                phase_index,
                remaining_secs,
            } => (phase_index, remaining_secs),
        };
        Event::TimerStarted {
            phase_index,
            kind: self.routine.phases()[phase_index].kind,
            remaining_secs,
            at: Utc::now(),
        }
    }

    /// Stop ticking; the phase index and remaining time are preserved
    /// for resume. Returns `None` when not running.
    pub fn stop(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        Some(self.stop_running())
    }

    fn stop_running(&mut self) -> Event {
        self.running = false;
        Event::TimerStopped {
            phase_index: self.phase_index().unwrap_or(0),
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        }
    }

    /// Replace the duration of the phase at `index`.
    ///
    /// Effective only for future phase entries: an active phase keeps its
    /// remaining time. Values below the engine minimum are clamped up;
    /// an index outside the routine fails with `OutOfRange`.
    pub fn set_phase_duration(&mut self, index: usize, duration_secs: u64) -> Result<Event> {
        let clamped = self.routine.set_duration(index, duration_secs)?;
        Ok(Event::DurationChanged {
            phase_index: index,
            duration_secs: clamped,
            at: Utc::now(),
        })
    }

    /// Restore the phase list to the defaults injected at construction.
    ///
    /// Counters, total elapsed time, and the running state are untouched;
    /// reset reverts durations only.
    pub fn reset(&mut self) -> Event {
        self.routine = self.defaults.clone();
        Event::RoutineReset { at: Utc::now() }
    }

    /// Advance the timer by exactly one second.
    ///
    /// A no-op unless running. Returns `Some(Event)` when the tick
    /// completes a phase: `PhaseCompleted` mid-routine, or
    /// `RoutineFinished` when the last phase ends and the timer returns
    /// to idle.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        let Position::Active {
            phase_index,
            remaining_secs,
        } = self.position
        else {
            return None;
        };
        self.total_elapsed_secs += 1;

        if remaining_secs > 1 {
            self.position = Position::Active {
                phase_index,
                remaining_secs: remaining_secs - 1,
            };
            return None;
        }

        // Phase completing. Each index is recorded at most once per pass.
        let kind = self.routine.phases()[phase_index].kind;
        if self.completed_this_pass.insert(phase_index) {
            self.counts.record(kind);
        }

        if phase_index + 1 < self.routine.len() {
            let next = phase_index + 1;
            self.position = Position::Active {
                phase_index: next,
                remaining_secs: self.routine.phases()[next].duration_secs,
            };
            Some(Event::PhaseCompleted {
                phase_index,
                kind,
                next_phase: next,
                at: Utc::now(),
            })
        } else {
            // Last phase of the pass: the routine counter moves only if
            // every phase index was recorded in this pass.
            let completed = self.completed_this_pass.len() == self.routine.len();
            if completed {
                self.routines_completed += 1;
            }
            self.completed_this_pass.clear();
            self.running = false;
            self.position = Position::Idle;
            Some(Event::RoutineFinished {
                completed,
                routines_completed: self.routines_completed,
                total_elapsed_secs: self.total_elapsed_secs,
                at: Utc::now(),
            })
        }
    }
}

impl Default for IntervalTimer {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::routine::PhaseKind;

    #[test]
    fn start_stop_resume() {
        let mut timer = IntervalTimer::with_defaults();
        assert_eq!(timer.state(), TimerState::Idle);

        timer.start();
        assert_eq!(timer.state(), TimerState::Running);
        assert_eq!(timer.phase_index(), Some(0));
        assert_eq!(timer.remaining_secs(), 180);

        assert!(timer.stop().is_some());
        assert_eq!(timer.state(), TimerState::Paused);
        assert!(timer.stop().is_none());

        timer.start();
        assert_eq!(timer.state(), TimerState::Running);
        assert_eq!(timer.phase_index(), Some(0));
    }

    #[test]
    fn start_while_running_acts_as_stop() {
        let mut timer = IntervalTimer::with_defaults();
        timer.start();
        let event = timer.start();
        assert!(matches!(event, Event::TimerStopped { .. }));
        assert_eq!(timer.state(), TimerState::Paused);
    }

    #[test]
    fn tick_decrements_and_accumulates_elapsed() {
        let mut timer = IntervalTimer::with_defaults();
        timer.start();
        assert!(timer.tick().is_none());
        assert_eq!(timer.remaining_secs(), 179);
        assert_eq!(timer.total_elapsed_secs(), 1);
    }

    #[test]
    fn tick_is_a_noop_when_not_running() {
        let mut timer = IntervalTimer::with_defaults();
        assert!(timer.tick().is_none());
        assert_eq!(timer.total_elapsed_secs(), 0);

        timer.start();
        timer.tick();
        timer.stop();
        assert!(timer.tick().is_none());
        assert_eq!(timer.total_elapsed_secs(), 1);
    }

    #[test]
    fn one_second_phase_completes_on_first_tick() {
        let mut timer = IntervalTimer::new(Routine::from_durations(1, 1, 1));
        timer.start();
        let event = timer.tick().unwrap();
        assert!(matches!(
            event,
            Event::PhaseCompleted {
                phase_index: 0,
                kind: PhaseKind::SlowWalk,
                next_phase: 1,
                ..
            }
        ));
        assert_eq!(timer.remaining_secs(), 1);
    }

    #[test]
    fn progress_floors_at_zero_after_mid_phase_shrink() {
        let mut timer = IntervalTimer::with_defaults();
        timer.start();
        for _ in 0..20 {
            timer.tick();
        }
        // remaining is 160; shrinking below it must not rescale the
        // countdown or produce a negative fraction.
        timer.set_phase_duration(0, 30).unwrap();
        assert_eq!(timer.remaining_secs(), 160);
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn snapshot_exposes_idle_sentinel() {
        let timer = IntervalTimer::with_defaults();
        match timer.snapshot() {
            Event::StateSnapshot {
                state,
                phase_index,
                kind,
                remaining_secs,
                progress,
                ..
            } => {
                assert_eq!(state, TimerState::Idle);
                assert_eq!(phase_index, -1);
                assert_eq!(kind, None);
                assert_eq!(remaining_secs, 0);
                assert_eq!(progress, 0.0);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }

    #[test]
    fn snapshot_describes_active_phase() {
        let mut timer = IntervalTimer::with_defaults();
        timer.start();
        timer.tick();
        match timer.snapshot() {
            Event::StateSnapshot {
                state,
                phase_index,
                kind,
                speed_range,
                remaining_secs,
                duration_secs,
                ..
            } => {
                assert_eq!(state, TimerState::Running);
                assert_eq!(phase_index, 0);
                assert_eq!(kind, Some(PhaseKind::SlowWalk));
                assert_eq!(speed_range.as_deref(), Some("3~5"));
                assert_eq!(remaining_secs, 179);
                assert_eq!(duration_secs, 180);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }

    #[test]
    fn set_phase_duration_rejects_bad_index() {
        let mut timer = IntervalTimer::with_defaults();
        assert!(timer.set_phase_duration(5, 60).is_err());
    }

    #[test]
    fn reset_restores_injected_defaults_only() {
        let mut timer = IntervalTimer::new(Routine::from_durations(30, 20, 10));
        timer.set_phase_duration(0, 90).unwrap();
        timer.start();
        timer.tick();
        timer.reset();
        // Durations revert to the injected routine, not the built-in one.
        assert_eq!(timer.routine().phases()[0].duration_secs, 30);
        // Running state and elapsed time survive a reset.
        assert_eq!(timer.state(), TimerState::Running);
        assert_eq!(timer.total_elapsed_secs(), 1);
    }
}
