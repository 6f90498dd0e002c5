//! # CSV Storage Module
//!
//! File-based transaction storage. The whole table lives in memory and is
//! mirrored to a single human-editable CSV file that is rewritten on every
//! change.
//!
//! ## File Format
//!
//! ```csv
//! Date,Category,Description,Amount
//! 2024-01-15,Food,Lunch,500.00
//! 2024-01-15,Transport,"Bus, then tram",50.00
//! ```
//!
//! Rows are kept in insertion order, amounts always carry two decimals and
//! fields containing a comma are quoted. The same format is used for bulk
//! import and export.

pub mod transaction_store;

#[cfg(test)]
pub mod test_utils;

pub use transaction_store::{encode_csv, CsvTransactionStore, CSV_HEADER};
