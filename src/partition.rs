//! Assigns each course to a difficulty phase and orders courses within a
//! phase by priority, so harder-to-place courses get first pick of rooms
//! and slots in later phases.

use crate::domain::{Course, Phase};
use std::collections::HashSet;

/// Result of partitioning: phase/course pairs ordered by phase ascending,
/// then priority descending, plus the set of course codes that have both
/// lecture and lab units (consumed by the extractor's display-code rule).
pub struct PartitionResult {
    pub ordered: Vec<(Phase, Course)>,
    pub courses_with_both: HashSet<String>,
}

fn priority_score(course: &Course) -> i64 {
    course.year_level * 1000
        + (course.units_lecture + 2 * course.units_lab) * 100
        + course.units_lab * 50
        + course.blocks * 10
}

fn assign_phase(course: &Course) -> Phase {
    let has_lab = course.units_lab > 0;
    let year_level = course.year_level;

    if year_level <= 1 && !has_lab {
        Phase::P1Flexible
    } else if (year_level >= 2 && year_level < 4 && has_lab) || (!has_lab && year_level >= 2) {
        Phase::P2Regular
    } else {
        Phase::P3Critical
    }
}

pub fn partition_courses(courses: &[Course]) -> PartitionResult {
    let mut courses_with_both = HashSet::new();
    let mut scored: Vec<(Phase, i64, Course)> = Vec::with_capacity(courses.len());

    for course in courses {
        if course.units_lecture > 0 && course.units_lab > 0 {
            courses_with_both.insert(course.code.clone());
        }
        let phase = assign_phase(course);
        let score = priority_score(course);
        scored.push((phase, score, course.clone()));
    }

    scored.sort_by(|a, b| a.0.index().cmp(&b.0.index()).then(b.1.cmp(&a.1)));

    PartitionResult {
        ordered: scored.into_iter().map(|(p, _, c)| (p, c)).collect(),
        courses_with_both,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(
        code: &str,
        year: i64,
        lec: i64,
        lab: i64,
        blocks: i64,
    ) -> Course {
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

    #[test]
    fn phase_assignment_rule() {
        assert_eq!(assign_phase(&course("A", 1, 1, 0, 1)), Phase::P1Flexible);
        assert_eq!(assign_phase(&course("B", 0, 1, 0, 1)), Phase::P1Flexible);
        assert_eq!(assign_phase(&course("C", 2, 1, 1, 1)), Phase::P2Regular);
        assert_eq!(assign_phase(&course("D", 3, 1, 1, 1)), Phase::P2Regular);
        assert_eq!(assign_phase(&course("E", 2, 1, 0, 1)), Phase::P2Regular);
        // Lecture-only courses land in P2 regardless of year level, by design.
        assert_eq!(assign_phase(&course("F", 4, 1, 0, 1)), Phase::P2Regular);
        assert_eq!(assign_phase(&course("G", 4, 1, 1, 1)), Phase::P3Critical);
        assert_eq!(assign_phase(&course("H", 1, 0, 1, 1)), Phase::P3Critical);
    }

    #[test]
    fn courses_with_both_tracked() {
        let courses = vec![course("CS150", 2, 1, 1, 1), course("CS101", 1, 1, 0, 1)];
        let result = partition_courses(&courses);
        assert!(result.courses_with_both.contains("CS150"));
        assert!(!result.courses_with_both.contains("CS101"));
    }

    #[test]
    fn ordered_by_phase_then_priority_desc() {
        let courses = vec![
            course("LOWPRI1", 1, 1, 0, 1),
            course("HIGHPRI3", 4, 3, 2, 2),
            course("MIDPRI2", 2, 2, 1, 1),
        ];
        let result = partition_courses(&courses);
        let phases: Vec<_> = result.ordered.iter().map(|(p, _)| *p).collect();
        assert!(phases.windows(2).all(|w| w[0] <= w[1]));
    }
}
