//! Domain model for a recorded expense.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date layout used by the backing file, the bot and the web form
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Stored and compared as a string; see [`Transaction::parsed_date`]
    pub date: String,
    pub category: String,
    pub description: String,
    pub amount: f64,
}

impl Transaction {
    pub fn new(
        date: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            date: date.into(),
            category: category.into(),
            description: description.into(),
            amount,
        }
    }

    /// The calendar date, or `None` for malformed legacy rows
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// Check the shape of a transaction before it reaches the store
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.date.trim().is_empty() {
            return Err(ValidationError::EmptyDate);
        }
        if self.parsed_date().is_none() {
            return Err(ValidationError::InvalidDate(self.date.clone()));
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        if !self.amount.is_finite() {
            return Err(ValidationError::NonFiniteAmount);
        }
        if self.amount <= 0.0 {
            return Err(ValidationError::NonPositiveAmount);
        }
        Ok(())
    }
}

/// Parse a strict `YYYY-MM-DD` date
///
/// Only the canonical spelling is accepted, so a parsed date always formats
/// back to the exact stored string.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    // chrono skips leading whitespace and accepts single-digit fields
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .filter(|date| format_date(*date) == value)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Date is required")]
    EmptyDate,
    #[error("Date '{0}' is not a valid YYYY-MM-DD date")]
    InvalidDate(String),
    #[error("Category is required")]
    EmptyCategory,
    #[error("Amount must be positive")]
    NonPositiveAmount,
    #[error("Amount must be a finite number")]
    NonFiniteAmount,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lunch() -> Transaction {
        Transaction::new("2024-01-01", "Food", "Lunch", 10.5)
    }

    #[test]
    fn test_valid_transaction_passes() {
        assert_eq!(lunch().validate(), Ok(()));
    }

    #[test]
    fn test_empty_description_is_allowed() {
        let tx = Transaction::new("2024-01-01", "Food", "", 10.0);
        assert!(tx.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_dates() {
        let mut tx = lunch();
        tx.date = "".to_string();
        assert_eq!(tx.validate(), Err(ValidationError::EmptyDate));

        tx.date = "2024-02-30".to_string();
        assert_eq!(
            tx.validate(),
            Err(ValidationError::InvalidDate("2024-02-30".to_string()))
        );

        tx.date = "2024-1-5".to_string();
        assert!(matches!(tx.validate(), Err(ValidationError::InvalidDate(_))));
    }

    #[test]
    fn test_rejects_blank_category() {
        let mut tx = lunch();
        tx.category = "   ".to_string();
        assert_eq!(tx.validate(), Err(ValidationError::EmptyCategory));
    }

    #[test]
    fn test_rejects_non_positive_and_non_finite_amounts() {
        let mut tx = lunch();
        tx.amount = 0.0;
        assert_eq!(tx.validate(), Err(ValidationError::NonPositiveAmount));
        tx.amount = -3.0;
        assert_eq!(tx.validate(), Err(ValidationError::NonPositiveAmount));
        tx.amount = f64::NAN;
        assert_eq!(tx.validate(), Err(ValidationError::NonFiniteAmount));
        tx.amount = f64::INFINITY;
        assert_eq!(tx.validate(), Err(ValidationError::NonFiniteAmount));
    }

    #[test]
    fn test_parse_date_requires_canonical_form() {
        assert_eq!(parse_date("2024-01-05"), NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(parse_date(" 2024-1-01"), None);
        assert_eq!(parse_date("2024-1-5 "), None);
        assert_eq!(parse_date(" 2024-01-05"), None);
        assert_eq!(parse_date("2024-01-05 "), None);
        assert_eq!(parse_date("+2024-01-05"), None);

        let tx = Transaction::new(" 2024-1-01", "Food", "", 1.0);
        assert!(matches!(tx.validate(), Err(ValidationError::InvalidDate(_))));
    }

    #[test]
    fn test_parsed_date_tolerates_garbage() {
        let tx = Transaction::new("yesterday", "Food", "", 1.0);
        assert_eq!(tx.parsed_date(), None);
        assert_eq!(
            lunch().parsed_date(),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
    }
}
