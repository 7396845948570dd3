//! Drives the two-attempt solve for one phase: feasibility-only first,
//! then a retry with soft objectives and a longer timeout if that fails.

use crate::config::{
    SchedulerConfig, DEFAULT_BASE_TIMEOUT_SECS, OPTIMIZE_RETRY_MULTIPLIER, PHASE_BASE_TIMEOUTS_SECS,
};
use crate::domain::{Course, InternalEvent, Phase, RoomCatalog};
use crate::error::SchedulerError;
use crate::ledger::OccupancyLedger;
use crate::model::{add_phase_objectives, PhaseModelBuilder};
use crate::time::TimeParams;
use cp_sat::proto::{CpSolverStatus, SatParameters};
use rand::Rng;
use std::collections::HashSet;

pub struct PhaseSolveResult {
    pub events: Vec<InternalEvent>,
    pub next_schedule_id: u64,
}

/// What one solve attempt concluded, distinguishing a proven-infeasible
/// model from one that simply ran out of time without a verdict.
enum AttemptOutcome {
    Solved(PhaseSolveResult),
    Infeasible,
    TimedOut,
}

fn calculate_phase_difficulty(phase_courses: &[Course]) -> f64 {
    if phase_courses.is_empty() {
        return 0.5;
    }
    let total_units: i64 = phase_courses
        .iter()
        .map(|c| c.units_lecture + c.units_lab * 2)
        .sum();
    let total_blocks: i64 = phase_courses.iter().map(|c| c.blocks).sum();

    let avg_units = total_units as f64 / phase_courses.len() as f64;
    let avg_blocks = total_blocks as f64 / phase_courses.len() as f64;

    let difficulty = (avg_units / 5.0) * (avg_blocks / 1.5);
    difficulty.clamp(0.5, 2.0)
}

fn base_timeout_secs(phase_num: usize) -> u64 {
    PHASE_BASE_TIMEOUTS_SECS
        .get(phase_num - 1)
        .copied()
        .unwrap_or(DEFAULT_BASE_TIMEOUT_SECS)
}

fn phase_timeout_secs(phase_num: usize, difficulty: f64) -> u64 {
    (base_timeout_secs(phase_num) as f64 * difficulty).round() as u64
}

fn base_parameters(config: &SchedulerConfig, timeout_secs: u64) -> SatParameters {
    let mut params = SatParameters::default();
    params.max_time_in_seconds = Some(timeout_secs as f64);
    params.num_search_workers = Some(config.num_search_workers);
    params.log_search_progress = Some(config.log_search_progress);
    params.linearization_level = Some(config.linearization_level);
    params
}

/// Run the two-attempt solve for one phase's courses, carrying forward the
/// cumulative schedule from earlier phases for the room no-overlap
/// constraint. Returns the phase's events, or a `SchedulerError` if both
/// attempts fail.
pub fn solve_phase(
    phase: Phase,
    phase_num: usize,
    total_phases: usize,
    phase_courses: &[Course],
    time: &TimeParams,
    rooms: &RoomCatalog,
    ledger: &OccupancyLedger,
    prior_events: &[InternalEvent],
    config: &SchedulerConfig,
    next_schedule_id: u64,
    is_last_phase: bool,
    days: &[String],
    courses_with_both: &HashSet<String>,
    mut on_course_progress: impl FnMut(usize, usize),
) -> Result<PhaseSolveResult, SchedulerError> {
    if phase_courses.is_empty() {
        return Ok(PhaseSolveResult {
            events: Vec::new(),
            next_schedule_id,
        });
    }

    let difficulty = calculate_phase_difficulty(phase_courses);
    let timeout = phase_timeout_secs(phase_num, difficulty);

    log::info!(
        "phase {:?} ({}/{}): {} courses, difficulty {:.2}, timeout {}s",
        phase,
        phase_num,
        total_phases,
        phase_courses.len(),
        difficulty,
        timeout
    );

    // Attempt 1: feasibility only.
    match attempt_phase(
        phase_courses,
        time,
        rooms,
        ledger,
        prior_events,
        config,
        next_schedule_id,
        timeout,
        false,
        is_last_phase,
        days,
        courses_with_both,
        &mut on_course_progress,
    )? {
        AttemptOutcome::Solved(result) => {
            log::info!("phase {:?} solved in feasibility mode", phase);
            return Ok(result);
        }
        AttemptOutcome::Infeasible | AttemptOutcome::TimedOut => {}
    }

    log::warn!("phase {:?} feasibility attempt failed, retrying with objectives", phase);
    let retry_timeout = (timeout as f64 * OPTIMIZE_RETRY_MULTIPLIER).round() as u64;
    match attempt_phase(
        phase_courses,
        time,
        rooms,
        ledger,
        prior_events,
        config,
        next_schedule_id,
        retry_timeout,
        true,
        is_last_phase,
        days,
        courses_with_both,
        &mut on_course_progress,
    )? {
        AttemptOutcome::Solved(result) => {
            log::info!("phase {:?} solved in optimize mode", phase);
            Ok(result)
        }
        AttemptOutcome::TimedOut => {
            log::error!("phase {:?} exceeded its time budget on both attempts", phase);
            Err(SchedulerError::PhaseTimeout { phase })
        }
        AttemptOutcome::Infeasible => {
            log::error!("phase {:?} failed completely", phase);
            Err(SchedulerError::PhaseInfeasible { phase })
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn attempt_phase(
    phase_courses: &[Course],
    time: &TimeParams,
    rooms: &RoomCatalog,
    ledger: &OccupancyLedger,
    prior_events: &[InternalEvent],
    config: &SchedulerConfig,
    next_schedule_id: u64,
    timeout_secs: u64,
    optimize: bool,
    is_last_phase: bool,
    days: &[String],
    courses_with_both: &HashSet<String>,
    on_course_progress: &mut impl FnMut(usize, usize),
) -> Result<AttemptOutcome, SchedulerError> {
    let mut builder = PhaseModelBuilder::new(time, rooms, ledger, config, next_schedule_id);
    builder.add_carry_forward(prior_events);

    for (idx, course) in phase_courses.iter().enumerate() {
        builder.add_course(course)?;
        on_course_progress(idx + 1, phase_courses.len());
    }

    let next_id = builder.next_schedule_id();
    let outcome = builder.finish();
    let mut model = outcome.model;
    let sessions = outcome.sessions;

    if optimize {
        add_phase_objectives(&mut model, &sessions, time.num_days as i64, time.inc_day);
    }

    let mut params = base_parameters(config, timeout_secs);
    if is_last_phase {
        params.randomize_search = Some(true);
        params.random_seed = Some(rand::thread_rng().gen_range(0..1_000_000));
        params.cp_model_probing_level = Some(2);
    }

    let response = model.solve_with_parameters(&params);
    match response.status() {
        CpSolverStatus::Optimal | CpSolverStatus::Feasible => {
            let events = crate::extract::extract_phase_solution(
                &response,
                &sessions,
                time,
                rooms,
                days,
                courses_with_both,
            );
            Ok(AttemptOutcome::Solved(PhaseSolveResult {
                events,
                next_schedule_id: next_id,
            }))
        }
        CpSolverStatus::Unknown => Ok(AttemptOutcome::TimedOut),
        _ => Ok(AttemptOutcome::Infeasible),
    }
}
