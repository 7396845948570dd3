//! Time discretization: converts opening hours and day count into a flat
//! slot grid. Pure function of the opening hours and the number of days;
//! computed once after catalogs load.

use crate::config::INC_HR;

#[derive(Debug, Clone)]
pub struct TimeParams {
    pub start_hour: i64,
    pub end_hour: i64,
    pub inc_hr: i64,
    pub inc_day: i64,
    pub num_days: usize,
    pub total_inc: i64,
    /// Slot indices from which a 3-slot lab may begin without crossing a
    /// day boundary. Deliberately excludes the last 2 slots of each day;
    /// this still permits a lab to start at `inc_day - 3` and run into
    /// those last 2 slots.
    pub lab_starts: Vec<i64>,
}

impl TimeParams {
    pub fn new(start_hour: i64, end_hour: i64, num_days: usize) -> Self {
        let inc_hr = INC_HR;
        let inc_day = (end_hour - start_hour) * inc_hr;
        let total_inc = inc_day * num_days as i64;

        let mut lab_starts = Vec::new();
        for d in 0..num_days as i64 {
            let base = d * inc_day;
            lab_starts.extend(base..(base + inc_day - 2));
        }

        Self {
            start_hour,
            end_hour,
            inc_hr,
            inc_day,
            num_days,
            total_inc,
            lab_starts,
        }
    }

    pub fn day_of(&self, slot: i64) -> i64 {
        slot / self.inc_day
    }

    pub fn offset_in_day(&self, slot: i64) -> i64 {
        slot % self.inc_day
    }

    /// `hour` a slot's time-of-day offset decomposes to, as a fractional
    /// hour relative to midnight.
    pub fn hour_of(&self, slot: i64) -> f64 {
        self.start_hour as f64 + self.offset_in_day(slot) as f64 / self.inc_hr as f64
    }
}
