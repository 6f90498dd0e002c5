//! Transaction service domain logic for the expense tracker.
//!
//! Every write goes through here so nothing reaches the store without being
//! validated first.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use super::models::{Transaction, ValidationError};
use crate::backend::storage::{StoreError, TransactionStorage};

#[derive(Debug, Error)]
pub enum TransactionServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

#[derive(Clone)]
pub struct TransactionService {
    storage: Arc<dyn TransactionStorage>,
}

impl TransactionService {
    pub fn new(storage: Arc<dyn TransactionStorage>) -> Self {
        Self { storage }
    }

    /// Validate and append a single transaction
    pub fn create_transaction(
        &self,
        transaction: Transaction,
    ) -> Result<Transaction, TransactionServiceError> {
        transaction.validate()?;
        self.storage.append(transaction.clone()).map_err(|e| {
            error!("Failed to save transaction: {}", e);
            e
        })?;
        info!(
            "✅ Added transaction {} {} {:.2}",
            transaction.date, transaction.category, transaction.amount
        );
        Ok(transaction)
    }

    /// All transactions, or only those on an exact date
    pub fn list_transactions(&self, date: Option<&str>) -> Vec<Transaction> {
        match date.filter(|d| !d.is_empty()) {
            Some(date) => self.storage.query_by_date(date),
            None => self.storage.query_all(),
        }
    }

    pub fn all_transactions(&self) -> Vec<Transaction> {
        self.storage.query_all()
    }

    /// Swap the whole table for an already-validated import
    pub fn replace_all(&self, transactions: Vec<Transaction>) -> Result<usize, StoreError> {
        let count = transactions.len();
        self.storage.replace_all(transactions)?;
        Ok(count)
    }

    /// Append an already-validated import after the existing rows
    pub fn append_all(&self, transactions: Vec<Transaction>) -> Result<usize, StoreError> {
        let count = transactions.len();
        for transaction in transactions {
            self.storage.append(transaction)?;
        }
        info!("📥 Appended {} imported transactions", count);
        Ok(count)
    }

    pub fn reset(&self) -> Result<(), StoreError> {
        self.storage.replace_all(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::csv::test_utils::TestEnvironment;

    fn service(env: &TestEnvironment) -> TransactionService {
        TransactionService::new(env.store.clone())
    }

    #[test]
    fn test_create_transaction_validates_before_storing() {
        let env = TestEnvironment::new().unwrap();
        let service = service(&env);

        let err = service
            .create_transaction(Transaction::new("2024-01-01", "Food", "", -1.0))
            .unwrap_err();
        assert!(matches!(
            err,
            TransactionServiceError::Validation(ValidationError::NonPositiveAmount)
        ));
        assert!(service.all_transactions().is_empty());

        service
            .create_transaction(Transaction::new("2024-01-01", "Food", "Lunch", 10.0))
            .unwrap();
        assert_eq!(service.all_transactions().len(), 1);
    }

    #[test]
    fn test_list_transactions_filters_by_date() {
        let env = TestEnvironment::new().unwrap();
        let service = service(&env);
        service.create_transaction(Transaction::new("2024-01-01", "Food", "", 1.0)).unwrap();
        service.create_transaction(Transaction::new("2024-01-02", "Food", "", 2.0)).unwrap();

        assert_eq!(service.list_transactions(None).len(), 2);
        assert_eq!(service.list_transactions(Some("")).len(), 2);
        assert_eq!(service.list_transactions(Some("2024-01-02")).len(), 1);
        assert!(service.list_transactions(Some("2024-01-03")).is_empty());
    }

    #[test]
    fn test_replace_append_and_reset() {
        let env = TestEnvironment::new().unwrap();
        let service = service(&env);
        service.create_transaction(Transaction::new("2024-01-01", "Food", "", 1.0)).unwrap();

        let imported = vec![
            Transaction::new("2024-02-01", "Rent", "", 100.0),
            Transaction::new("2024-02-02", "Food", "", 5.0),
        ];
        assert_eq!(service.append_all(imported.clone()).unwrap(), 2);
        assert_eq!(service.all_transactions().len(), 3);

        assert_eq!(service.replace_all(imported.clone()).unwrap(), 2);
        assert_eq!(service.all_transactions(), imported);

        service.reset().unwrap();
        assert!(service.all_transactions().is_empty());
    }
}
