//! # Storage Traits
//!
//! This module defines the storage abstraction that the domain and IO layers
//! talk to, so the CSV file store can be swapped out (or faked in tests)
//! without touching the callers.

use std::path::Path;

use super::errors::StoreError;
use crate::backend::domain::models::Transaction;

/// Interface of the transaction table
///
/// Implementations keep the table in insertion order and never sort or
/// de-duplicate it. Writes are persisted before they return; reads are served
/// from memory and always hand out copies.
pub trait TransactionStorage: Send + Sync {
    /// Append one already-validated transaction and persist the table
    ///
    /// On a persistence failure the row stays in the in-memory table.
    fn append(&self, transaction: Transaction) -> Result<(), StoreError>;

    /// Swap the whole table (CSV import and reset) and persist it
    ///
    /// On a persistence failure the in-memory table already holds `transactions`.
    fn replace_all(&self, transactions: Vec<Transaction>) -> Result<(), StoreError>;

    /// All rows whose date string equals `date` exactly
    fn query_by_date(&self, date: &str) -> Vec<Transaction>;

    /// A copy of the full table in insertion order
    fn query_all(&self) -> Vec<Transaction>;

    /// Location of the backing file
    fn backing_path(&self) -> &Path;
}
