//! Saldo and daily allowance calculation.
//!
//! The monthly budget is spread evenly over the active budget cycle. Comparing
//! that pace line with what was actually spent since the cycle started gives
//! the saldo; whatever is left of the budget, divided over the remaining days,
//! gives tomorrow's allowance.
//!
//! The engine is stateless: transactions, reference date, cycle day and budget
//! are all passed in, and nothing is rounded until presentation.

use chrono::NaiveDate;

use super::cycle::{BudgetCycle, CycleDay};
use super::models::{format_date, Transaction};

/// Result of one saldo computation
#[derive(Debug, Clone, PartialEq)]
pub struct SaldoReport {
    pub date: NaiveDate,
    pub cycle: BudgetCycle,
    pub monthly_budget: f64,
    /// Spend recorded on exactly the reference date
    pub spend_today: f64,
    /// Budget earned so far in the cycle
    pub allowed_cumulative: f64,
    /// Spend from the cycle start through the reference date
    pub spent_cumulative: f64,
    /// Negative when spending is ahead of pace
    pub saldo: f64,
    pub remaining_days: i64,
    /// `None` on the last day of the cycle
    pub tomorrow_allowance: Option<f64>,
}

impl SaldoReport {
    pub fn is_on_track(&self) -> bool {
        self.saldo >= 0.0
    }
}

/// Compute the saldo report for `reference_date`
///
/// Rows whose date does not parse are left out of the cycle total but still
/// count towards `spend_today` when their string matches exactly.
pub fn compute_saldo(
    transactions: &[Transaction],
    reference_date: NaiveDate,
    cycle_day: CycleDay,
    monthly_budget: f64,
) -> SaldoReport {
    let cycle = BudgetCycle::containing(reference_date, cycle_day);
    let reference_key = format_date(reference_date);

    // An empty f64 sum is -0.0, which would render as "-0.00"
    let spend_today: f64 = transactions
        .iter()
        .filter(|t| t.date == reference_key)
        .fold(0.0, |acc, t| acc + t.amount);

    let spent_cumulative: f64 = transactions
        .iter()
        .filter(|t| {
            t.parsed_date()
                .is_some_and(|d| cycle.start <= d && d <= reference_date)
        })
        .fold(0.0, |acc, t| acc + t.amount);

    let allowed_cumulative =
        monthly_budget * f64::from(cycle.day_index) / f64::from(cycle.days_in_cycle.max(1));
    let saldo = allowed_cumulative - spent_cumulative;

    let remaining_days = cycle.remaining_days_after(reference_date);
    let tomorrow_allowance = (remaining_days > 0).then(|| {
        let remaining_budget = (monthly_budget - spent_cumulative).max(0.0);
        remaining_budget / remaining_days as f64
    });

    SaldoReport {
        date: reference_date,
        cycle,
        monthly_budget,
        spend_today,
        allowed_cumulative,
        spent_cumulative,
        saldo,
        remaining_days,
        tomorrow_allowance,
    }
}
