//! Decodes a solved phase's CP-SAT variables into scheduled events,
//! applying the lecture/lab display-code suffix rule.

use crate::domain::{InternalEvent, SessionKind};
use crate::model::SessionVars;
use crate::time::TimeParams;
use cp_sat::proto::CpSolverResponse;
use std::collections::HashSet;

/// 12-hour clock formatting, `12 AM`/`12 PM` rendering in place of `0`.
fn format_hour(hour: f64) -> String {
    let whole = hour.floor() as i64;
    let minutes = ((hour - whole as f64) * 60.0).floor() as i64;
    let display_hour = whole % 12;
    let display_hour = if display_hour == 0 { 12 } else { display_hour };
    let meridiem = if whole < 12 { "AM" } else { "PM" };
    format!("{}:{:02} {}", display_hour, minutes, meridiem)
}

fn format_period(start_hour: f64, end_hour: f64) -> String {
    format!("{} - {}", format_hour(start_hour), format_hour(end_hour))
}

/// Decode one phase's solved session variables into internal events,
/// applying the lecture/lab display-code suffix rule.
pub fn extract_phase_solution(
    response: &CpSolverResponse,
    sessions: &[SessionVars],
    time: &TimeParams,
    rooms: &crate::domain::RoomCatalog,
    days: &[String],
    courses_with_both: &HashSet<String>,
) -> Vec<InternalEvent> {
    sessions
        .iter()
        .map(|s| {
            let start_val = s.start.value(response);
            let day_idx = s.day.value(response);
            let room_idx = s.room.value(response) as usize;

            let start_hour = time.hour_of(start_val);
            let end_hour = start_hour + s.duration as f64 / time.inc_hr as f64;

            let display_code = if courses_with_both.contains(&s.code) {
                match s.kind {
                    SessionKind::Lecture => format!("{}A", s.code),
                    SessionKind::Laboratory => format!("{}L", s.code),
                }
            } else {
                s.code.clone()
            };

            InternalEvent {
                schedule_id: s.schedule_id,
                display_code,
                base_code: s.code.clone(),
                title: s.title.clone(),
                program: s.program.clone(),
                year: s.year,
                session: s.kind,
                block: s.block,
                day: days[day_idx as usize].clone(),
                period: format_period(start_hour, end_hour),
                room: rooms.room_name(s.kind.room_kind(), room_idx).to_string(),
                start_slot: start_val,
                duration: s.duration,
                room_kind: s.kind.room_kind(),
                room_idx,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_hour_boundaries() {
        assert_eq!(format_hour(8.0), "8:00 AM");
        assert_eq!(format_hour(0.0), "12:00 AM");
        assert_eq!(format_hour(12.0), "12:00 PM");
        assert_eq!(format_hour(13.5), "1:30 PM");
        assert_eq!(format_hour(23.75), "11:45 PM");
    }

    #[test]
    fn period_formats_range() {
        assert_eq!(format_period(8.0, 9.0), "8:00 AM - 9:00 AM");
    }
}
