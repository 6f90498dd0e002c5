//! Budget cycle arithmetic.
//!
//! A budget cycle runs from the configured "salary day" of one month up to
//! (but not including) the same day of the next month. Everything here is
//! pure date math over [`NaiveDate`]; the caller decides what "today" is.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_CYCLE_DAY: u32 = 15;
/// Cycles never start on the 29th-31st so every month has the start day
pub const MAX_CYCLE_DAY: u32 = 28;

/// Day of month (1-28) on which a new budget cycle begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct CycleDay(u32);

impl CycleDay {
    pub fn new(day: u32) -> Option<Self> {
        (1..=MAX_CYCLE_DAY).contains(&day).then_some(Self(day))
    }

    /// Accept a configured value, falling back to the default when out of range
    pub fn or_default(day: i64) -> Self {
        u32::try_from(day)
            .ok()
            .and_then(Self::new)
            .unwrap_or_else(|| {
                warn!(
                    "Cycle day {} is outside 1-{}, using {}",
                    day, MAX_CYCLE_DAY, DEFAULT_CYCLE_DAY
                );
                Self::default()
            })
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for CycleDay {
    fn default() -> Self {
        Self(DEFAULT_CYCLE_DAY)
    }
}

impl TryFrom<u32> for CycleDay {
    type Error = String;

    fn try_from(day: u32) -> Result<Self, Self::Error> {
        Self::new(day).ok_or_else(|| format!("cycle day must be between 1 and {MAX_CYCLE_DAY}, got {day}"))
    }
}

impl From<CycleDay> for u32 {
    fn from(day: CycleDay) -> Self {
        day.0
    }
}

/// Start (inclusive) and end (exclusive) of the cycle containing `reference`
pub fn cycle_bounds(reference: NaiveDate, cycle_day: CycleDay) -> (NaiveDate, NaiveDate) {
    // with_day and the month shifts only fail at the edges of chrono's range
    let this_month = reference.with_day(cycle_day.get()).unwrap_or(reference);
    let start = if reference.day() >= cycle_day.get() {
        this_month
    } else {
        this_month
            .checked_sub_months(Months::new(1))
            .unwrap_or(this_month)
    };
    let end = start.checked_add_months(Months::new(1)).unwrap_or(start);
    (start, end)
}

/// The active cycle seen from one reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetCycle {
    pub start: NaiveDate,
    /// Exclusive; the next cycle's start
    pub end: NaiveDate,
    /// 1-based position of the reference date
    pub day_index: u32,
    pub days_in_cycle: u32,
}

impl BudgetCycle {
    pub fn containing(reference: NaiveDate, cycle_day: CycleDay) -> Self {
        let (start, end) = cycle_bounds(reference, cycle_day);
        let days_in_cycle = (end - start).num_days().max(1) as u32;
        let day_index = ((reference - start).num_days() + 1).max(1) as u32;

        Self {
            start,
            end,
            day_index,
            days_in_cycle,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Days left in the cycle after `date`; zero or less on the last day
    pub fn remaining_days_after(&self, date: NaiveDate) -> i64 {
        (self.end - date).num_days() - 1
    }
}
