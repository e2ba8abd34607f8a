use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{CompletionCounts, PhaseKind, TimerState};

/// Every state change in the timer produces an Event.
/// The driver forwards them to whatever is displaying the workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase_index: usize,
        kind: PhaseKind,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerStopped {
        phase_index: usize,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A phase mid-routine ran down to zero and the next one activated.
    /// The final phase of a pass reports as `RoutineFinished` instead.
    PhaseCompleted {
        phase_index: usize,
        kind: PhaseKind,
        next_phase: usize,
        at: DateTime<Utc>,
    },
    /// The last phase finished and the timer returned to idle.
    /// `completed` is true only when every phase of the pass ran down.
    RoutineFinished {
        completed: bool,
        routines_completed: u64,
        total_elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    DurationChanged {
        phase_index: usize,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// Phase durations were restored to their defaults.
    RoutineReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        /// Index of the active phase, or -1 when idle.
        phase_index: i64,
        kind: Option<PhaseKind>,
        speed_range: Option<String>,
        remaining_secs: u64,
        duration_secs: u64,
        progress: f64,
        total_elapsed_secs: u64,
        counts: CompletionCounts,
        routines_completed: u64,
        at: DateTime<Utc>,
    },
}
