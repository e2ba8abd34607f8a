mod counts;
mod engine;
mod routine;

pub use counts::CompletionCounts;
pub use engine::{IntervalTimer, TimerState};
pub use routine::{Phase, PhaseKind, Routine, MIN_PHASE_SECS, UI_MIN_PHASE_SECS};
