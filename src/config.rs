//! Tunable constants and configuration for the scheduler: phase timeouts,
//! solver worker count, domain caps and per-day session caps, as a plain
//! struct with a `Default` impl.

/// Phase base timeouts in seconds, indexed `[phase_1, phase_2, phase_3]`.
/// A phase beyond index 3 falls back to `DEFAULT_BASE_TIMEOUT_SECS`.
pub const PHASE_BASE_TIMEOUTS_SECS: [u64; 3] = [150, 200, 700];
pub const DEFAULT_BASE_TIMEOUT_SECS: u64 = 300;

/// Multiplier applied to the feasibility-attempt timeout for the
/// optimize-mode retry.
pub const OPTIMIZE_RETRY_MULTIPLIER: f64 = 1.5;

/// Half-hour granularity: 2 slots per hour.
pub const INC_HR: i64 = 2;

/// Lecture meeting duration, in slots.
pub const LECTURE_DURATION_SLOTS: i64 = 2;
/// Lab meeting duration, in slots.
pub const LAB_DURATION_SLOTS: i64 = 3;

/// Per-day session caps.
pub const MAX_LECTURE_MEETINGS_PER_DAY: i64 = 1;
pub const MAX_LAB_MEETINGS_PER_DAY: i64 = 2;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Parallel solver workers (8-12 is a reasonable range).
    pub num_search_workers: i32,
    /// Candidate starts gathered from the ledger before filtering (cap).
    pub domain_gather_cap: usize,
    /// Candidate starts kept as the variable's actual domain, after
    /// filtering (cap).
    pub domain_filter_cap: usize,
    /// Enable CP-SAT's own search-progress log for diagnostics.
    pub log_search_progress: bool,
    /// Linearization level passed to `SatParameters` (spec recommends 2,
    /// better for optional intervals).
    pub linearization_level: i32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            num_search_workers: 10,
            domain_gather_cap: 1000,
            domain_filter_cap: 200,
            log_search_progress: true,
            linearization_level: 2,
        }
    }
}
