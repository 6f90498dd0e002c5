//! # Storage Module
//!
//! Handles all data persistence for the expense tracker.
//!
//! This module hides the storage implementation behind the
//! [`TransactionStorage`] trait so the domain and IO layers only ever see
//! in-memory transactions and typed errors.
//!
//! ## Key Responsibilities
//!
//! - **Data Persistence**: Saving the transaction table to disk on every change
//! - **Data Retrieval**: Loading and validating the backing file at startup
//! - **Serialization**: Serializing access to the table behind one lock
//!
//! ## Current Implementation
//!
//! - **Primary Storage**: a single CSV file (`Date,Category,Description,Amount`)
//! - **Writes**: full rewrite through a temp file and an atomic rename

pub mod csv;
pub mod errors;
pub mod traits;

pub use self::csv::{CsvTransactionStore, CSV_HEADER};
pub use errors::{FormatError, StoreError};
pub use traits::TransactionStorage;
