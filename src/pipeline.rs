//! Top-level orchestration: load catalogs, partition courses, solve each
//! phase in order, and assemble the final schedule (or the `"impossible"`
//! sentinel) that the host sees.

use crate::catalog::Catalogs;
use crate::config::SchedulerConfig;
use crate::domain::{InternalEvent, Phase, ScheduledEvent};
use crate::error::SchedulerError;
use crate::ledger::OccupancyLedger;
use crate::partition::partition_courses;
use crate::progress::{ProgressSink, ResultSink};
use crate::solver::solve_phase;
use crate::time::TimeParams;

/// The sentinel-or-schedule shape the host sees at the public boundary.
pub enum ScheduleOutcome {
    Schedule(Vec<ScheduledEvent>),
    Impossible,
}

const ALL_PHASES: [Phase; 3] = [Phase::P1Flexible, Phase::P2Regular, Phase::P3Critical];

/// Main entry point, mirroring `generate_schedule(process_id=None)` at the
/// same architectural seam: load, partition, solve each phase in order,
/// emit the final schedule or the `"impossible"` sentinel.
pub fn generate_schedule(
    catalogs: &Catalogs,
    progress: &dyn ProgressSink,
    results: &dyn ResultSink,
    config: &SchedulerConfig,
) -> ScheduleOutcome {
    match run(catalogs, progress, config) {
        Ok(events) => {
            results.replace(events.clone());
            progress.update(100);
            ScheduleOutcome::Schedule(events)
        }
        Err(e) => {
            log::error!("schedule generation failed: {e}");
            progress.update(-1);
            ScheduleOutcome::Impossible
        }
    }
}

fn run(
    catalogs: &Catalogs,
    progress: &dyn ProgressSink,
    config: &SchedulerConfig,
) -> Result<Vec<ScheduledEvent>, SchedulerError> {
    progress.update(5);
    let courses = catalogs.courses.load_courses()?;
    let partitioned = partition_courses(&courses);
    progress.update(15);

    let rooms = catalogs.rooms.load_rooms()?;
    progress.update(25);

    let (start_hour, end_hour) = catalogs.time_settings.load_time_settings()?;
    progress.update(35);

    let days = catalogs.days.load_days()?;
    progress.update(45);

    let time = TimeParams::new(start_hour, end_hour, days.len());
    progress.update(50);

    let mut phases: std::collections::BTreeMap<Phase, Vec<crate::domain::Course>> =
        std::collections::BTreeMap::new();
    for (phase, course) in partitioned.ordered {
        phases.entry(phase).or_default().push(course);
    }

    let total_phases = ALL_PHASES
        .iter()
        .filter(|p| phases.contains_key(*p))
        .count()
        .max(1);

    let mut ledger = OccupancyLedger::new();
    let mut combined: Vec<InternalEvent> = Vec::new();
    let mut next_schedule_id: u64 = 1;

    for (phase_num, phase) in ALL_PHASES
        .iter()
        .filter(|p| phases.contains_key(*p))
        .enumerate()
        .map(|(i, p)| (i + 1, *p))
    {
        let phase_courses = &phases[&phase];
        let is_last = phase_num == total_phases;

        let progress_start = 50 + (phase_num - 1) * 40 / total_phases;
        let progress_end = 50 + phase_num * 40 / total_phases;

        let result = solve_phase(
            phase,
            phase_num,
            total_phases,
            phase_courses,
            &time,
            &rooms,
            &ledger,
            &combined,
            config,
            next_schedule_id,
            is_last,
            &days,
            &partitioned.courses_with_both,
            |done, total| {
                let p = progress_start
                    + ((done as f64 / total as f64) * (progress_end - progress_start) as f64)
                        as usize;
                progress.update(p as i32);
            },
        )?;

        for event in &result.events {
            ledger.commit(event);
        }
        combined.extend(result.events);
        next_schedule_id = result.next_schedule_id;
    }

    combined.sort_by(|a, b| {
        let day_a = days.iter().position(|d| d == &a.day).unwrap_or(usize::MAX);
        let day_b = days.iter().position(|d| d == &b.day).unwrap_or(usize::MAX);
        day_a.cmp(&day_b).then(a.start_slot.cmp(&b.start_slot))
    });

    progress.update(95);

    Ok(combined.into_iter().map(ScheduledEvent::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CourseCatalog, DayCatalog, RoomCatalogSource, TimeSettingsSource};
    use crate::domain::{Course, RoomCatalog};
    use anyhow::Result;
    use std::cell::{Cell, RefCell};

    struct FixedCourses(Vec<Course>);
    impl CourseCatalog for FixedCourses {
        fn load_courses(&self) -> Result<Vec<Course>> {
            Ok(self.0.clone())
        }
    }

    struct FixedRooms(RoomCatalog);
    impl RoomCatalogSource for FixedRooms {
        fn load_rooms(&self) -> Result<RoomCatalog> {
            Ok(self.0.clone())
        }
    }

    struct FixedHours(i64, i64);
    impl TimeSettingsSource for FixedHours {
        fn load_time_settings(&self) -> Result<(i64, i64)> {
            Ok((self.0, self.1))
        }
    }

    struct FixedDays(Vec<String>);
    impl DayCatalog for FixedDays {
        fn load_days(&self) -> Result<Vec<String>> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct RecordingProgress(Cell<Vec<i32>>);
    impl ProgressSink for RecordingProgress {
        fn update(&self, value: i32) {
            let mut v = self.0.take();
            v.push(value);
            self.0.set(v);
        }
    }

    #[derive(Default)]
    struct RecordingResults(RefCell<Option<Vec<ScheduledEvent>>>);
    impl ResultSink for RecordingResults {
        fn replace(&self, events: Vec<ScheduledEvent>) {
            *self.0.borrow_mut() = Some(events);
        }
    }

    fn course(code: &str, year: i64, lec: i64, lab: i64, blocks: i64) -> Course {
        Course {
            code: code.to_string(),
            title: code.to_string(),
            program: "CS".to_string(),
            year_level: year,
            units_lecture: lec,
            units_lab: lab,
            blocks,
        }
    }

    fn one_room_catalog() -> RoomCatalog {
        RoomCatalog::new(vec!["L1".to_string()], vec!["B1".to_string()])
    }

    /// An empty course list returns an empty schedule and final progress
    /// 100.
    #[test]
    fn trivial_empty_course_list_is_empty_schedule_at_full_progress() {
        let courses = FixedCourses(vec![]);
        let rooms = FixedRooms(one_room_catalog());
        let hours = FixedHours(8, 17);
        let days = FixedDays(vec!["Mon".to_string()]);
        let catalogs = Catalogs {
            courses: &courses,
            rooms: &rooms,
            time_settings: &hours,
            days: &days,
        };
        let progress = RecordingProgress::default();
        let results = RecordingResults::default();
        let config = SchedulerConfig::default();

        match generate_schedule(&catalogs, &progress, &results, &config) {
            ScheduleOutcome::Schedule(events) => assert!(events.is_empty()),
            ScheduleOutcome::Impossible => panic!("expected an empty schedule, not impossible"),
        }
        assert_eq!(progress.0.take().last().copied(), Some(100));
        assert_eq!(results.0.borrow().as_ref().map(Vec::len), Some(0));
    }

    /// One lecture-only course against one lecture room and one day
    /// schedules exactly one lecture event in that room. Kept as a
    /// structural check rather than an exact-slot check, since the
    /// feasibility-only first attempt carries no objective and CP-SAT makes
    /// no promise about which feasible slot it returns.
    #[test]
    fn single_lecture_course_schedules_one_event_in_the_only_room() {
        let courses = FixedCourses(vec![course("CS101", 1, 1, 0, 1)]);
        let rooms = FixedRooms(one_room_catalog());
        let hours = FixedHours(8, 17);
        let days = FixedDays(vec!["Mon".to_string()]);
        let catalogs = Catalogs {
            courses: &courses,
            rooms: &rooms,
            time_settings: &hours,
            days: &days,
        };
        let progress = RecordingProgress::default();
        let results = RecordingResults::default();
        let config = SchedulerConfig::default();

        match generate_schedule(&catalogs, &progress, &results, &config) {
            ScheduleOutcome::Schedule(events) => {
                assert_eq!(events.len(), 1);
                let e = &events[0];
                assert_eq!(e.session, "Lecture");
                assert_eq!(e.room, "L1");
                assert_eq!(e.day, "Mon");
                assert_eq!(e.display_code, "CS101");
            }
            ScheduleOutcome::Impossible => panic!("a single lecture course should be feasible"),
        }
    }

    /// A course with both lecture and lab units gets the 'A'/'L'
    /// display-code suffix on its respective events.
    #[test]
    fn course_with_lecture_and_lab_gets_suffixed_display_codes() {
        let courses = FixedCourses(vec![course("CS150", 2, 1, 1, 1)]);
        let rooms = FixedRooms(one_room_catalog());
        let hours = FixedHours(8, 17);
        let days = FixedDays(vec!["Mon".to_string()]);
        let catalogs = Catalogs {
            courses: &courses,
            rooms: &rooms,
            time_settings: &hours,
            days: &days,
        };
        let progress = RecordingProgress::default();
        let results = RecordingResults::default();
        let config = SchedulerConfig::default();

        match generate_schedule(&catalogs, &progress, &results, &config) {
            ScheduleOutcome::Schedule(events) => {
                assert_eq!(events.len(), 2);
                let lecture = events.iter().find(|e| e.session == "Lecture").unwrap();
                let lab = events.iter().find(|e| e.session == "Laboratory").unwrap();
                assert_eq!(lecture.display_code, "CS150A");
                assert_eq!(lab.display_code, "CS150L");
                assert_eq!(lecture.base_code, "CS150");
                assert_eq!(lab.base_code, "CS150");
            }
            ScheduleOutcome::Impossible => {
                panic!("a lecture+lab course with matching rooms should be feasible")
            }
        }
    }

    /// A non-empty lecture course against an empty room catalog is
    /// infeasible; the public boundary reports it as `Impossible` with
    /// final progress -1.
    #[test]
    fn empty_room_catalog_is_impossible() {
        let courses = FixedCourses(vec![course("CS101", 1, 1, 0, 1)]);
        let rooms = FixedRooms(RoomCatalog::new(vec![], vec![]));
        let hours = FixedHours(8, 17);
        let days = FixedDays(vec!["Mon".to_string()]);
        let catalogs = Catalogs {
            courses: &courses,
            rooms: &rooms,
            time_settings: &hours,
            days: &days,
        };
        let progress = RecordingProgress::default();
        let results = RecordingResults::default();
        let config = SchedulerConfig::default();

        match generate_schedule(&catalogs, &progress, &results, &config) {
            ScheduleOutcome::Schedule(_) => panic!("expected impossible with no rooms"),
            ScheduleOutcome::Impossible => {}
        }
        assert_eq!(progress.0.take().last().copied(), Some(-1));
    }

    /// A `units_lab=2` course never produces a third lab meeting, and each
    /// meeting has duration 3.
    #[test]
    fn two_lab_units_produce_exactly_two_lab_meetings() {
        let courses = FixedCourses(vec![course("CS220", 2, 0, 2, 1)]);
        let rooms = FixedRooms(RoomCatalog::new(vec![], vec!["B1".to_string()]));
        let hours = FixedHours(8, 17);
        let days = FixedDays(vec![
            "Mon".to_string(),
            "Tue".to_string(),
            "Wed".to_string(),
            "Thu".to_string(),
            "Fri".to_string(),
        ]);
        let catalogs = Catalogs {
            courses: &courses,
            rooms: &rooms,
            time_settings: &hours,
            days: &days,
        };
        let progress = RecordingProgress::default();
        let results = RecordingResults::default();
        let config = SchedulerConfig::default();

        match generate_schedule(&catalogs, &progress, &results, &config) {
            ScheduleOutcome::Schedule(events) => {
                assert_eq!(events.len(), 2);
                assert!(events.iter().all(|e| e.session == "Laboratory"));
            }
            ScheduleOutcome::Impossible => panic!("two lab meetings across 5 days should be feasible"),
        }
    }
}
