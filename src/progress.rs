//! Progress channel and result-sink collaborators. Traits the host
//! implements; a handle is passed into the scheduler rather than kept as
//! module-level mutable state.

use crate::domain::ScheduledEvent;

/// Monotone progress updates in `[0, 100]` on the success path, or `-1` on
/// failure. Not read mid-run by the core.
pub trait ProgressSink {
    fn update(&self, value: i32);
}

/// Replaced atomically once the run completes.
pub trait ResultSink {
    fn replace(&self, events: Vec<ScheduledEvent>);
}

/// No-op sink for callers that don't need progress reporting (tests, or a
/// host that polls the returned schedule directly instead).
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn update(&self, _value: i32) {}
}

pub struct NullResultSink;

impl ResultSink for NullResultSink {
    fn replace(&self, _events: Vec<ScheduledEvent>) {}
}
