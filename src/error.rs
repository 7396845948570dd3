//! Typed error kinds for the scheduler. Internal code threads
//! `Result<_, SchedulerError>`; the public entry point in `pipeline.rs` is
//! the only place these collapse into the `"impossible"` sentinel the host
//! sees.

use crate::domain::Phase;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("no feasible start-time domain for {course} block {block:?} ({kind:?}), even after fallback to the full search space")]
    NoFeasibleDomain {
        course: String,
        block: char,
        kind: crate::domain::RoomKind,
    },

    #[error("phase {phase:?} has no feasible solution under either the feasibility or optimize attempt")]
    PhaseInfeasible { phase: Phase },

    #[error("phase {phase:?} exceeded its time budget on both solve attempts")]
    PhaseTimeout { phase: Phase },

    #[error("catalog loader failed: {0}")]
    Catalog(#[from] anyhow::Error),

    #[error("internal invariant breach: {0}")]
    InternalInvariantBreach(String),
}
