use serde::{Deserialize, Serialize};
use std::fmt;

/// A single recorded expense as exchanged with the web form and the graph page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Calendar date in YYYY-MM-DD form
    pub date: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Positive amount in RUB
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub date: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    /// Chat the mini app was opened from, if any
    #[serde(default)]
    pub chat_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionResponse {
    pub message: String,
    pub transaction: Transaction,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionListRequest {
    /// Exact YYYY-MM-DD match; all transactions when absent
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
    pub count: usize,
}

/// Window selection for the graph endpoint (ISO dates)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDataRequest {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// One day of the spending chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphPoint {
    pub date: String,
    pub spend: f64,
    /// Month-to-date spend, reset on the 1st
    pub cumulative: f64,
    /// Month-to-date budget line
    pub budget_cum: f64,
    pub saldo: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDataResponse {
    pub from: String,
    pub to: String,
    #[serde(rename = "monthlyBudget")]
    pub monthly_budget: f64,
    pub points: Vec<GraphPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaldoRequest {
    pub date: Option<String>,
}

/// Saldo report for one reference date within its budget cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaldoResponse {
    pub date: String,
    pub cycle_start: String,
    pub cycle_end: String,
    pub day_index: u32,
    pub days_in_cycle: u32,
    pub monthly_budget: f64,
    pub spend_today: f64,
    pub allowed_cumulative: f64,
    pub spent_cumulative: f64,
    pub saldo: f64,
    /// Absent on the last day of the cycle
    pub tomorrow_allowance: Option<f64>,
}

/// Where the effective monthly budget comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetSource {
    Default,
    RuntimeOverride,
}

impl fmt::Display for BudgetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetSource::Default => write!(f, "configuration default"),
            BudgetSource::RuntimeOverride => write!(f, "runtime override (resets on restart)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetResponse {
    pub monthly_budget: f64,
    pub source: BudgetSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateBudgetRequest {
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResponse {
    pub message: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body returned by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Row-level details for bulk imports
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            errors: Vec::new(),
        }
    }

    pub fn with_details(error: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            error: error.into(),
            errors,
        }
    }
}
