//! Per-day spending series for the graph page.
//!
//! Unlike the saldo engine, the chart tracks calendar months: cumulative spend
//! restarts on the 1st of every month and the budget line climbs from zero to
//! the full monthly budget over each calendar month.

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate};

use super::models::{format_date, Transaction};

/// Default look-back of the graph when no window is requested
pub const DEFAULT_WINDOW_DAYS: u64 = 90;
/// Look-back used when there is no data at all
pub const EMPTY_WINDOW_DAYS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub spend: f64,
    /// Month-to-date spend
    pub cumulative_spend: f64,
    /// Month-to-date share of the monthly budget
    pub cumulative_budget: f64,
    pub saldo: f64,
}

/// Walk every day of `[from, to]` and build one point per day
///
/// Returns an empty series when `from` is after `to`.
pub fn build_series(
    transactions: &[Transaction],
    from: NaiveDate,
    to: NaiveDate,
    monthly_budget: f64,
) -> Vec<SeriesPoint> {
    let mut daily_spend: HashMap<&str, f64> = HashMap::new();
    for transaction in transactions {
        *daily_spend.entry(transaction.date.as_str()).or_insert(0.0) += transaction.amount;
    }

    let mut points = Vec::new();
    let mut cumulative_spend = 0.0;

    for day in from.iter_days().take_while(|d| *d <= to) {
        let key = format_date(day);
        let spend = daily_spend.get(key.as_str()).copied().unwrap_or(0.0);

        if day.day() == 1 {
            cumulative_spend = 0.0;
        }
        cumulative_spend += spend;

        let cumulative_budget =
            monthly_budget * f64::from(day.day()) / f64::from(days_in_month(day));

        points.push(SeriesPoint {
            date: day,
            spend,
            cumulative_spend,
            cumulative_budget,
            saldo: cumulative_budget - cumulative_spend,
        });
    }

    points
}

/// Number of days in the calendar month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).unwrap_or(date);
    first
        .checked_add_months(chrono::Months::new(1))
        .map(|next| (next - first).num_days() as u32)
        .unwrap_or(31)
}

/// Fill in a missing or partial graph window
///
/// - a missing `to` becomes the latest transaction date
/// - a missing `from` becomes 90 days before `today`, or the earliest
///   transaction date when all data is older than that
/// - without any dated data the window is the 30 days ending `today`
/// - a reversed window is swapped
pub fn resolve_window(
    transactions: &[Transaction],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    let data_range = transactions
        .iter()
        .filter_map(Transaction::parsed_date)
        .fold(None, |range: Option<(NaiveDate, NaiveDate)>, d| match range {
            None => Some((d, d)),
            Some((min, max)) => Some((min.min(d), max.max(d))),
        });

    let (from, to) = match (from, to, data_range) {
        (Some(from), Some(to), _) => (from, to),
        (from, to, Some((min, max))) => {
            let default_from = today - Days::new(DEFAULT_WINDOW_DAYS);
            let from = from.unwrap_or(if max < default_from { min } else { default_from });
            (from, to.unwrap_or(max))
        }
        (from, to, None) => (
            from.unwrap_or(today - Days::new(EMPTY_WINDOW_DAYS)),
            to.unwrap_or(today),
        ),
    };

    if from > to {
        (to, from)
    } else {
        (from, to)
    }
}
