//! Saldo reports and spending series over the stored transactions.
//!
//! Wires the pure allowance engine and series builder to the store, the
//! effective budget and the configured calendar.

use std::sync::Arc;

use chrono::NaiveDate;

use super::allowance_engine::{compute_saldo, SaldoReport};
use super::budget_settings::BudgetSettings;
use super::calendar::CalendarService;
use super::cycle::CycleDay;
use super::series::{build_series, resolve_window, SeriesPoint};
use crate::backend::storage::TransactionStorage;

/// A resolved graph window and its points
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingSeries {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub monthly_budget: f64,
    pub points: Vec<SeriesPoint>,
}

#[derive(Clone)]
pub struct ReportService {
    storage: Arc<dyn TransactionStorage>,
    budget: BudgetSettings,
    cycle_day: CycleDay,
    calendar: CalendarService,
}

impl ReportService {
    pub fn new(
        storage: Arc<dyn TransactionStorage>,
        budget: BudgetSettings,
        cycle_day: CycleDay,
        calendar: CalendarService,
    ) -> Self {
        Self {
            storage,
            budget,
            cycle_day,
            calendar,
        }
    }

    pub fn cycle_day(&self) -> CycleDay {
        self.cycle_day
    }

    /// Saldo for `reference_date` against the effective budget
    pub fn saldo(&self, reference_date: NaiveDate) -> SaldoReport {
        let transactions = self.storage.query_all();
        compute_saldo(
            &transactions,
            reference_date,
            self.cycle_day,
            self.budget.monthly_budget(),
        )
    }

    /// Series over the requested window; missing ends are filled from the data
    pub fn series(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> SpendingSeries {
        let transactions = self.storage.query_all();
        let monthly_budget = self.budget.monthly_budget();
        let (from, to) = resolve_window(&transactions, from, to, self.calendar.today());

        SpendingSeries {
            from,
            to,
            monthly_budget,
            points: build_series(&transactions, from, to, monthly_budget),
        }
    }

    /// Even share of the budget per day of the calendar month of `date`
    pub fn daily_allowance(&self, date: NaiveDate) -> f64 {
        self.budget.monthly_budget() / f64::from(self.calendar.days_in_month(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::Transaction;
    use crate::backend::storage::csv::test_utils::TestEnvironment;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn report_service(env: &TestEnvironment, budget: &BudgetSettings) -> ReportService {
        ReportService::new(
            env.store.clone(),
            budget.clone(),
            CycleDay::default(),
            CalendarService::default(),
        )
    }

    #[test]
    fn test_saldo_uses_effective_budget() {
        let env = TestEnvironment::new().unwrap();
        env.store.append(Transaction::new("2025-08-01", "Food", "", 9000.0)).unwrap();
        let budget = BudgetSettings::new(12000.0);
        let service = report_service(&env, &budget);

        let report = service.saldo(date(2025, 8, 9));
        assert!((report.saldo - (12000.0 * 26.0 / 31.0 - 9000.0)).abs() < 1e-6);

        budget.set_override(31000.0).unwrap();
        let report = service.saldo(date(2025, 8, 9));
        assert!((report.allowed_cumulative - 26000.0).abs() < 1e-6);
    }

    #[test]
    fn test_series_over_explicit_window() {
        let env = TestEnvironment::new().unwrap();
        env.store.append(Transaction::new("2025-03-02", "Food", "", 50.0)).unwrap();
        let service = report_service(&env, &BudgetSettings::new(3100.0));

        let series = service.series(Some(date(2025, 3, 1)), Some(date(2025, 3, 3)));
        assert_eq!(series.points.len(), 3);
        assert_eq!(series.monthly_budget, 3100.0);
        assert!((series.points[1].saldo - (200.0 - 50.0)).abs() < 1e-9);
    }

    #[test]
    fn test_daily_allowance() {
        let env = TestEnvironment::new().unwrap();
        let service = report_service(&env, &BudgetSettings::new(3100.0));
        assert!((service.daily_allowance(date(2025, 8, 9)) - 100.0).abs() < 1e-9);
    }
}
