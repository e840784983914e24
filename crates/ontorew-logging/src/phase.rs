//! Query lifecycle as an explicit state machine.
//!
//! A query moves through `Created → Reformulated → ResultSetUnblocked →
//! Completed`; `Errored` is a terminal reachable from any non-terminal state.
//! Transitions return the next phase value; an out-of-order transition is a
//! reportable precondition violation, never an unchecked field access.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Created,
    Reformulated,
    ResultSetUnblocked,
    Completed,
    Errored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal query-phase transition: {from:?} -> {to:?}")]
pub struct PhaseError {
    pub from: Phase,
    pub to: Phase,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Errored)
    }

    /// Attempts the transition to `next`, returning the new phase.
    pub fn advance(self, next: Phase) -> Result<Phase, PhaseError> {
        let legal = matches!(
            (self, next),
            (Phase::Created, Phase::Reformulated)
                | (Phase::Reformulated, Phase::ResultSetUnblocked)
                | (Phase::ResultSetUnblocked, Phase::Completed)
        ) || (next == Phase::Errored && !self.is_terminal());
        if legal {
            Ok(next)
        } else {
            Err(PhaseError { from: self, to: next })
        }
    }
}
