//! Calendar domain logic for the expense tracker.
//!
//! Date boundaries ("today", "this month") depend on the configured timezone,
//! so every caller asks the [`CalendarService`] instead of reading the system
//! clock directly.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::warn;

use super::models::{format_date, parse_date};
use super::series;

/// Parse an IANA timezone name, falling back to UTC
pub fn parse_timezone(name: &str) -> Tz {
    let name = name.trim();
    if name.is_empty() {
        return Tz::UTC;
    }
    name.parse::<Tz>().unwrap_or_else(|_| {
        warn!("Unknown timezone '{}', falling back to UTC", name);
        Tz::UTC
    })
}

/// Calendar service that resolves dates in the configured timezone
#[derive(Debug, Clone, Copy)]
pub struct CalendarService {
    timezone: Tz,
}

impl CalendarService {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Current local date
    pub fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }

    /// Local date of an instant
    pub fn date_at(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.timezone).date_naive()
    }

    /// A user-supplied `YYYY-MM-DD` date, or today when absent or malformed
    pub fn resolve_reference_date(&self, requested: Option<&str>) -> NaiveDate {
        match requested.map(str::trim).filter(|s| !s.is_empty()) {
            None => self.today(),
            Some(value) => parse_date(value).unwrap_or_else(|| {
                warn!("Ignoring invalid date '{}', using today", value);
                self.today()
            }),
        }
    }

    pub fn today_string(&self) -> String {
        format_date(self.today())
    }

    pub fn days_in_month(&self, date: NaiveDate) -> u32 {
        series::days_in_month(date)
    }

    /// Month label such as "Aug 2025"
    pub fn month_label(&self, date: NaiveDate) -> String {
        date.format("%b %Y").to_string()
    }
}

impl Default for CalendarService {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}
