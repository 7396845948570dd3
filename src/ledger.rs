//! Tracks which room and section slots are already committed, across
//! phases, so each new phase's model only offers genuinely free starts.

use crate::domain::{InternalEvent, RoomKind, SectionKey};
use crate::time::TimeParams;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct OccupancyLedger {
    room_occ: HashMap<(RoomKind, usize), HashSet<i64>>,
    section_occ: HashMap<SectionKey, HashSet<i64>>,
}

/// Result of gathering candidate section starts: the slots themselves, plus
/// whether the search was cut short by `cap`.
pub struct AvailableStarts {
    pub starts: Vec<i64>,
    pub truncated: bool,
}

impl OccupancyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Up to `cap` ascending slot indices in the search space disjoint from
    /// `section_key`'s prior occupancy. Iterated in ascending slot order and
    /// truncated to `cap` with early exit.
    pub fn available_section_starts(
        &self,
        section_key: &SectionKey,
        duration: i64,
        time: &TimeParams,
        is_lab: bool,
        cap: usize,
    ) -> AvailableStarts {
        let occupied = self.section_occ.get(section_key);
        let mut starts = Vec::new();
        let mut truncated = false;

        let search_space: Vec<i64> = if is_lab {
            time.lab_starts.clone()
        } else {
            (0..=(time.total_inc - duration)).collect()
        };

        for start in search_space {
            let free = match occupied {
                None => true,
                Some(slots) => !(start..start + duration).any(|s| slots.contains(&s)),
            };
            if free {
                starts.push(start);
                if starts.len() >= cap {
                    truncated = true;
                    break;
                }
            }
        }

        AvailableStarts { starts, truncated }
    }

    /// Advisory: room indices whose occupancy is disjoint from
    /// `[start, start+duration)`. Used for diagnostics only — the solver
    /// enforces the real room constraint via no-overlap intervals.
    pub fn available_rooms(
        &self,
        kind: RoomKind,
        start: i64,
        duration: i64,
        num_rooms: usize,
    ) -> Vec<usize> {
        (0..num_rooms)
            .filter(|&idx| match self.room_occ.get(&(kind, idx)) {
                None => true,
                Some(slots) => !(start..start + duration).any(|s| slots.contains(&s)),
            })
            .collect()
    }

    pub fn commit(&mut self, event: &InternalEvent) {
        let section_key = (event.program.clone(), event.year, event.block);
        let slots: HashSet<i64> = (event.start_slot..event.start_slot + event.duration).collect();

        self.section_occ
            .entry(section_key)
            .or_default()
            .extend(slots.iter().copied());
        self.room_occ
            .entry((event.room_kind, event.room_idx))
            .or_default()
            .extend(slots);
    }
}
