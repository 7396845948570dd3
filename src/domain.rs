//! Core data model: courses, rooms, phases, sessions and the two event
//! representations (internal, carrying scratch fields the extractor later
//! strips; external, the shape the host sees).

use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct Course {
    pub code: String,
    pub title: String,
    pub program: String,
    pub year_level: i64,
    pub units_lecture: i64,
    pub units_lab: i64,
    #[serde(default = "default_blocks")]
    pub blocks: i64,
}

fn default_blocks() -> i64 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomKind {
    Lecture,
    Lab,
}

/// Ordered room catalog: index position is stable within a run and is what
/// decision variables refer to.
#[derive(Debug, Clone, Default)]
pub struct RoomCatalog {
    rooms: HashMap<RoomKind, Vec<String>>,
}

impl RoomCatalog {
    pub fn new(lecture: Vec<String>, lab: Vec<String>) -> Self {
        let mut rooms = HashMap::new();
        rooms.insert(RoomKind::Lecture, lecture);
        rooms.insert(RoomKind::Lab, lab);
        Self { rooms }
    }

    pub fn rooms_for(&self, kind: RoomKind) -> &[String] {
        self.rooms.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn num_rooms(&self, kind: RoomKind) -> usize {
        self.rooms_for(kind).len()
    }

    pub fn room_name(&self, kind: RoomKind, idx: usize) -> &str {
        &self.rooms_for(kind)[idx]
    }
}

/// Scheduling difficulty tier, ordered P1 (easiest) through P3 (hardest).
/// Processed in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    P1Flexible = 1,
    P2Regular = 2,
    P3Critical = 3,
}

impl Phase {
    pub fn index(self) -> i64 {
        self as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Lecture,
    Laboratory,
}

impl SessionKind {
    pub fn room_kind(self) -> RoomKind {
        match self {
            SessionKind::Lecture => RoomKind::Lecture,
            SessionKind::Laboratory => RoomKind::Lab,
        }
    }

    pub fn duration_slots(self) -> i64 {
        match self {
            SessionKind::Lecture => crate::config::LECTURE_DURATION_SLOTS,
            SessionKind::Laboratory => crate::config::LAB_DURATION_SLOTS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionKind::Lecture => "Lecture",
            SessionKind::Laboratory => "Laboratory",
        }
    }
}

/// A section key identifies one cohort whose sessions cannot overlap.
pub type SectionKey = (String, i64, char);

/// An internal event: the full record the extractor produces, still
/// carrying the scratch fields later phases' carry-forward logic and the
/// ledger need. The public `ScheduledEvent` is derived from this by
/// dropping the scratch fields.
#[derive(Debug, Clone)]
pub struct InternalEvent {
    pub schedule_id: u64,
    pub display_code: String,
    pub base_code: String,
    pub title: String,
    pub program: String,
    pub year: i64,
    pub session: SessionKind,
    pub block: char,
    pub day: String,
    pub period: String,
    pub room: String,
    pub start_slot: i64,
    pub duration: i64,
    pub room_kind: RoomKind,
    pub room_idx: usize,
}

/// The public, emitted event shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEvent {
    pub schedule_id: u64,
    pub display_code: String,
    pub base_code: String,
    pub title: String,
    pub program: String,
    pub year: i64,
    pub session: &'static str,
    pub block: char,
    pub day: String,
    pub period: String,
    pub room: String,
}

impl From<InternalEvent> for ScheduledEvent {
    fn from(e: InternalEvent) -> Self {
        ScheduledEvent {
            schedule_id: e.schedule_id,
            display_code: e.display_code,
            base_code: e.base_code,
            title: e.title,
            program: e.program,
            year: e.year,
            session: e.session.label(),
            block: e.block,
            day: e.day,
            period: e.period,
            room: e.room,
        }
    }
}
