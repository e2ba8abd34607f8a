use serde::{Deserialize, Serialize};

use super::routine::PhaseKind;

/// How many times each phase kind has been fully completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionCounts {
    pub slow_walk: u64,
    pub fast_walk: u64,
    pub run: u64,
}

impl CompletionCounts {
    pub fn record(&mut self, kind: PhaseKind) {
        match kind {
            PhaseKind::SlowWalk => self.slow_walk += 1,
            PhaseKind::FastWalk => self.fast_walk += 1,
            PhaseKind::Run => self.run += 1,
        }
    }

    pub fn for_kind(&self, kind: PhaseKind) -> u64 {
        match kind {
            PhaseKind::SlowWalk => self.slow_walk,
            PhaseKind::FastWalk => self.fast_walk,
            PhaseKind::Run => self.run,
        }
    }

    pub fn total(&self) -> u64 {
        self.slow_walk + self.fast_walk + self.run
    }
}
