//! Hierarchical constraint-programming course scheduler.
//!
//! Partitions courses into three difficulty phases, builds a CP-SAT model
//! per phase, solves feasibility-first then optimize-second, and carries
//! occupancy state forward so later phases never collide with earlier
//! decisions. See `DESIGN.md` for how each piece is grounded.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod ledger;
mod model;
pub mod partition;
pub mod pipeline;
pub mod progress;
pub mod solver;
pub mod time;

pub use catalog::{Catalogs, CourseCatalog, DayCatalog, RoomCatalogSource, TimeSettingsSource};
pub use config::SchedulerConfig;
pub use domain::{Course, Phase, RoomCatalog, RoomKind, ScheduledEvent, SessionKind};
pub use error::SchedulerError;
pub use pipeline::{generate_schedule, ScheduleOutcome};
pub use progress::{NullProgressSink, NullResultSink, ProgressSink, ResultSink};
