//! Bulk CSV import.
//!
//! Uploaded files use the same layout as the backing file. Unlike the store's
//! loader, the importer does not stop at the first bad row: every row is
//! checked and all problems are reported together, each with its line number.

use std::io::Read;

use csv::ReaderBuilder;
use thiserror::Error;

use super::models::{parse_date, Transaction};
use crate::backend::storage::CSV_HEADER;

/// Rows listed in a chat reply before the rest are summarized
pub const MAX_REPORTED_ROW_ERRORS: usize = 10;

/// One rejected row of an uploaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based physical line; the header is line 1
    pub line: u64,
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("CSV file is empty")]
    Empty,
    #[error("CSV header must be: Date,Category,Description,Amount")]
    Header,
    #[error("Invalid CSV format: {0}")]
    Malformed(#[from] csv::Error),
    #[error("CSV validation failed ({} errors)", .0.len())]
    Rows(Vec<RowError>),
}

impl ImportError {
    /// Row errors rendered as `Line N: message`
    pub fn row_messages(&self) -> Vec<String> {
        match self {
            ImportError::Rows(rows) => rows.iter().map(ToString::to_string).collect(),
            _ => Vec::new(),
        }
    }
}

/// Totals reported back after a successful import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub count: usize,
    pub total_amount: f64,
    /// Date of the first row in file order
    pub first_date: Option<String>,
    /// Date of the last row in file order
    pub last_date: Option<String>,
}

impl ImportSummary {
    pub fn of(transactions: &[Transaction]) -> Self {
        Self {
            count: transactions.len(),
            total_amount: transactions.iter().fold(0.0, |acc, t| acc + t.amount),
            first_date: transactions.first().map(|t| t.date.clone()),
            last_date: transactions.last().map(|t| t.date.clone()),
        }
    }
}

/// Parse and validate an uploaded CSV file
///
/// Returns the rows in file order, or every row error found.
pub fn parse_import<R: Read>(reader: R) -> Result<Vec<Transaction>, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = reader.records();

    let header = records.next().ok_or(ImportError::Empty)??;
    if header.iter().collect::<Vec<_>>() != CSV_HEADER {
        return Err(ImportError::Header);
    }

    let mut transactions = Vec::new();
    let mut errors = Vec::new();

    for (index, result) in records.enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 2);

        match check_row(&record) {
            Ok(transaction) => transactions.push(transaction),
            Err(message) => errors.push(RowError { line, message }),
        }
    }

    if errors.is_empty() {
        Ok(transactions)
    } else {
        Err(ImportError::Rows(errors))
    }
}

fn check_row(record: &csv::StringRecord) -> Result<Transaction, String> {
    if record.len() != CSV_HEADER.len() {
        return Err("Invalid number of fields".to_string());
    }

    let raw_amount = &record[3];
    let amount = raw_amount
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite())
        .ok_or_else(|| format!("Invalid amount '{raw_amount}'"))?;
    if amount <= 0.0 {
        return Err("Amount must be positive".to_string());
    }

    if parse_date(&record[0]).is_none() {
        return Err(format!("Invalid date '{}'", &record[0]));
    }
    if record[1].trim().is_empty() {
        return Err("Category is required".to_string());
    }

    Ok(Transaction::new(&record[0], &record[1], &record[2], amount))
}
