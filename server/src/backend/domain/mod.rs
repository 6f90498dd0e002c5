//! # Domain Module
//!
//! Contains all business logic for the expense tracker.
//!
//! This module encapsulates the budgeting rules: how a budget cycle is laid
//! out, how much of the monthly budget has been "earned" by a given day, and
//! how spending is charted. It operates independently of the HTTP API, the
//! chat bot and the CSV file behind them.
//!
//! ## Module Organization
//!
//! - **models**: the `Transaction` entity and its validation
//! - **cycle**: budget cycle bounds around the configured salary day
//! - **allowance_engine**: saldo and tomorrow's allowance within a cycle
//! - **series**: per-day calendar-month spending series for the graph
//! - **budget_settings**: configured budget plus runtime override
//! - **calendar**: timezone-aware "today" and date helpers
//! - **transaction_service**: validated writes and queries over the store
//! - **report_service**: saldo and series over the stored transactions
//! - **import_service** / **export_service**: bulk CSV in and out
//!
//! ## Business Rules
//!
//! - Amounts are positive spends; categories are required, descriptions are not
//! - Dates are `YYYY-MM-DD`; rows with malformed dates are skipped when summing
//! - The saldo resets at the cycle start, the graph resets on the 1st
//! - Nothing is rounded until presentation

pub mod allowance_engine;
pub mod budget_settings;
pub mod calendar;
pub mod cycle;
pub mod export_service;
pub mod import_service;
pub mod models;
pub mod report_service;
pub mod series;
pub mod transaction_service;

pub use allowance_engine::{compute_saldo, SaldoReport};
pub use budget_settings::BudgetSettings;
pub use calendar::CalendarService;
pub use cycle::{BudgetCycle, CycleDay};
pub use import_service::{ImportError, ImportSummary};
pub use report_service::{ReportService, SpendingSeries};
pub use series::{build_series, SeriesPoint};
pub use transaction_service::{TransactionService, TransactionServiceError};
