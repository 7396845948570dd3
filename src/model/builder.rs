//! Builds one phase's CP-SAT model: session start/end/day/room variables,
//! section and room intervals, per-day meeting caps and cross-block room
//! consistency, plus fixed intervals carried forward from earlier phases so
//! room no-overlap holds across the whole run.
//!
//! Reified equality (`room == r <=> lit`) and optional-interval gating rely
//! on `Constraint::only_enforce_if` on the constraint handle returned by
//! `add_eq`/`add_ne`, and on scalar multiplication of a single `IntVar` by
//! an `i64` coefficient yielding a `LinearExpr` term.

use crate::config::SchedulerConfig;
use crate::domain::{Course, InternalEvent, RoomCatalog, RoomKind, SectionKey, SessionKind};
use crate::error::SchedulerError;
use crate::ledger::OccupancyLedger;
use crate::time::TimeParams;
use cp_sat::builder::{BoolVar, CpModelBuilder, IntVar, IntervalVar, LinearExpr};
use std::collections::HashMap;

/// One meeting's decision variables, carried from the builder through the
/// objective builder to the solver and the extractor.
#[derive(Clone)]
pub struct SessionVars {
    pub schedule_id: u64,
    pub code: String,
    pub title: String,
    pub program: String,
    pub year: i64,
    pub block: char,
    pub kind: SessionKind,
    pub start: IntVar,
    pub end: IntVar,
    pub day: IntVar,
    pub room: IntVar,
    pub duration: i64,
}

pub struct BuilderOutcome {
    pub model: CpModelBuilder,
    pub sessions: Vec<SessionVars>,
}

pub struct PhaseModelBuilder<'a> {
    time: &'a TimeParams,
    rooms: &'a RoomCatalog,
    ledger: &'a OccupancyLedger,
    config: &'a SchedulerConfig,
    next_schedule_id: u64,
    model: CpModelBuilder,
    section_intervals: HashMap<SectionKey, Vec<IntervalVar>>,
    room_intervals: HashMap<(RoomKind, usize), Vec<IntervalVar>>,
    sessions: Vec<SessionVars>,
}

impl<'a> PhaseModelBuilder<'a> {
    pub fn new(
        time: &'a TimeParams,
        rooms: &'a RoomCatalog,
        ledger: &'a OccupancyLedger,
        config: &'a SchedulerConfig,
        next_schedule_id: u64,
    ) -> Self {
        Self {
            time,
            rooms,
            ledger,
            config,
            next_schedule_id,
            model: CpModelBuilder::new(),
            section_intervals: HashMap::new(),
            room_intervals: HashMap::new(),
            sessions: Vec::new(),
        }
    }

    /// Add fixed (non-optional) intervals for every event already committed
    /// in prior phases, so the room no-overlap constraint added later spans
    /// the whole cumulative schedule, not just this phase.
    pub fn add_carry_forward(&mut self, prior_events: &[InternalEvent]) {
        for event in prior_events {
            if self.rooms.num_rooms(event.room_kind) == 0 {
                continue;
            }
            let end = event.start_slot + event.duration;
            let start_var = self
                .model
                .new_int_var(vec![(event.start_slot, event.start_slot)]);
            let end_var = self.model.new_int_var(vec![(end, end)]);
            let iv = self.model.new_interval_var(start_var, event.duration, end_var);
            self.room_intervals
                .entry((event.room_kind, event.room_idx))
                .or_default()
                .push(iv);
        }
    }

    /// Build every session for one course across all its blocks.
    pub fn add_course(&mut self, course: &Course) -> Result<(), SchedulerError> {
        for b in 0..course.blocks {
            let block = (b'A' + b as u8) as char;
            let section_key: SectionKey = (course.program.clone(), course.year_level, block);

            if course.units_lecture > 0 {
                self.add_session_group(
                    course,
                    block,
                    &section_key,
                    SessionKind::Lecture,
                    course.units_lecture as usize,
                )?;
            }
            if course.units_lab > 0 {
                self.add_session_group(
                    course,
                    block,
                    &section_key,
                    SessionKind::Laboratory,
                    course.units_lab as usize,
                )?;
            }
        }
        Ok(())
    }

    fn add_session_group(
        &mut self,
        course: &Course,
        block: char,
        section_key: &SectionKey,
        kind: SessionKind,
        meeting_count: usize,
    ) -> Result<(), SchedulerError> {
        let duration = kind.duration_slots();
        let is_lab = matches!(kind, SessionKind::Laboratory);
        let num_rooms = self.rooms.num_rooms(kind.room_kind());
        if num_rooms == 0 {
            return Err(SchedulerError::InternalInvariantBreach(format!(
                "course {} needs a {:?} room but none are configured",
                course.code,
                kind.room_kind()
            )));
        }

        let mut day_vars = Vec::with_capacity(meeting_count);

        for _ in 0..meeting_count {
            let domain_values = self.candidate_domain(section_key, duration, is_lab, course, block, kind)?;

            let schedule_id = self.next_schedule_id;
            self.next_schedule_id += 1;

            let domain: Vec<(i64, i64)> = domain_values.iter().map(|&v| (v, v)).collect();
            let start = self.model.new_int_var(domain);
            let end = self.model.new_int_var(vec![(duration, self.time.total_inc)]);
            self.model.add_eq(end.clone(), LinearExpr::from(start.clone()) + duration);

            let day = self.model.new_int_var(vec![(0, self.time.num_days as i64 - 1)]);
            self.model
                .add_ge(LinearExpr::from(start.clone()), day.clone() * self.time.inc_day);
            self.model.add_le(
                LinearExpr::from(start.clone()) - (self.time.inc_day - 1),
                day.clone() * self.time.inc_day,
            );

            let room = self.model.new_int_var(vec![(0, num_rooms as i64 - 1)]);

            let iv = self
                .model
                .new_interval_var(start.clone(), duration, end.clone());
            self.section_intervals
                .entry(section_key.clone())
                .or_default()
                .push(iv);

            for r in 0..num_rooms {
                let lit = self.model.new_bool_var();
                self.model
                    .add_eq(room.clone(), LinearExpr::from(r as i64))
                    .only_enforce_if(lit.clone());
                self.model
                    .add_ne(room.clone(), LinearExpr::from(r as i64))
                    .only_enforce_if(lit.not());

                let opt_iv = self.model.new_optional_interval_var(
                    start.clone(),
                    duration,
                    end.clone(),
                    lit,
                );
                self.room_intervals
                    .entry((kind.room_kind(), r))
                    .or_default()
                    .push(opt_iv);
            }

            day_vars.push(day.clone());

            self.sessions.push(SessionVars {
                schedule_id,
                code: course.code.clone(),
                title: course.title.clone(),
                program: course.program.clone(),
                year: course.year_level,
                block,
                kind,
                start,
                end,
                day,
                room,
                duration,
            });
        }

        if day_vars.len() > 1 {
            self.add_block_day_cap(&day_vars, is_lab);
        }

        Ok(())
    }

    fn candidate_domain(
        &self,
        section_key: &SectionKey,
        duration: i64,
        is_lab: bool,
        course: &Course,
        block: char,
        kind: SessionKind,
    ) -> Result<Vec<i64>, SchedulerError> {
        let gathered = self.ledger.available_section_starts(
            section_key,
            duration,
            self.time,
            is_lab,
            self.config.domain_gather_cap,
        );
        if gathered.truncated {
            log::debug!(
                "domain truncated for {} block {} ({:?}): gathered {} candidates at cap {}",
                course.code,
                block,
                kind,
                gathered.starts.len(),
                self.config.domain_gather_cap
            );
        }

        let mut domain_values = gathered.starts;
        domain_values.truncate(self.config.domain_filter_cap);

        if domain_values.is_empty() {
            log::warn!(
                "no available slots for {} {:?} block {}, falling back to full search space",
                course.code,
                kind,
                block
            );
            domain_values = if is_lab {
                self.time.lab_starts.clone()
            } else {
                (0..=(self.time.total_inc - duration)).collect()
            };
        }

        if domain_values.is_empty() {
            return Err(SchedulerError::NoFeasibleDomain {
                course: course.code.clone(),
                block,
                kind: kind.room_kind(),
            });
        }

        Ok(domain_values)
    }

    fn add_block_day_cap(&mut self, day_vars: &[IntVar], is_lab: bool) {
        let cap = if is_lab {
            crate::config::MAX_LAB_MEETINGS_PER_DAY
        } else {
            crate::config::MAX_LECTURE_MEETINGS_PER_DAY
        };

        for d in 0..self.time.num_days as i64 {
            let mut day_bools: Vec<BoolVar> = Vec::with_capacity(day_vars.len());
            for dv in day_vars {
                let b = self.model.new_bool_var();
                self.model
                    .add_eq(dv.clone(), LinearExpr::from(d))
                    .only_enforce_if(b.clone());
                self.model
                    .add_ne(dv.clone(), LinearExpr::from(d))
                    .only_enforce_if(b.not());
                day_bools.push(b);
            }
            let sum: LinearExpr = day_bools.into_iter().map(|b| (1_i64, b)).collect();
            self.model.add_le(sum, LinearExpr::from(cap));
        }
    }

    /// Group sessions by `(code, program, year, block, kind)` and force
    /// every session in a group to the same room.
    fn add_room_consistency(&mut self) {
        let mut groups: HashMap<(String, String, i64, char, SessionKind), Vec<IntVar>> =
            HashMap::new();
        for s in &self.sessions {
            groups
                .entry((s.code.clone(), s.program.clone(), s.year, s.block, s.kind))
                .or_default()
                .push(s.room.clone());
        }
        for rooms in groups.values() {
            if rooms.len() > 1 {
                for r in &rooms[1..] {
                    self.model.add_eq(r.clone(), rooms[0].clone());
                }
            }
        }
    }

    /// Finalize: add the no-overlap constraints (section and room, the
    /// latter spanning carry-forward intervals) and room consistency, then
    /// hand the model and sessions to the caller.
    pub fn finish(mut self) -> BuilderOutcome {
        self.add_room_consistency();

        for intervals in self.section_intervals.into_values() {
            if !intervals.is_empty() {
                self.model.add_no_overlap(intervals);
            }
        }
        for intervals in self.room_intervals.into_values() {
            if !intervals.is_empty() {
                self.model.add_no_overlap(intervals);
            }
        }

        BuilderOutcome {
            model: self.model,
            sessions: self.sessions,
        }
    }

    pub fn next_schedule_id(&self) -> u64 {
        self.next_schedule_id
    }
}
