//! Test utilities module for automatic cleanup and consistent test infrastructure
//!
//! This module provides RAII-based cleanup that guarantees test data is removed
//! even if tests panic or fail.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use super::transaction_store::CsvTransactionStore;
use crate::backend::config::AppConfig;
use crate::backend::storage::errors::StoreError;
use crate::backend::AppState;

/// RAII Test Environment that removes its data directory on drop
pub struct TestEnvironment {
    /// The temporary directory - kept alive to prevent auto-cleanup until drop
    _temp_dir: TempDir,
    /// Store loaded from `data_path`
    pub store: Arc<CsvTransactionStore>,
    /// Backing file for manual inspection
    pub data_path: PathBuf,
}

impl TestEnvironment {
    /// Fresh store over a file that does not exist yet
    pub fn new() -> Result<Self, StoreError> {
        let temp_dir = Self::temp_dir();
        let data_path = temp_dir.path().join("data.csv");
        let store = Arc::new(CsvTransactionStore::load(&data_path)?);

        Ok(Self {
            _temp_dir: temp_dir,
            store,
            data_path,
        })
    }

    /// Store loaded from a file pre-filled with `contents`
    pub fn with_contents(contents: &str) -> Result<Self, StoreError> {
        let temp_dir = Self::temp_dir();
        let data_path = temp_dir.path().join("data.csv");
        fs::write(&data_path, contents).expect("failed to seed test data file");
        let store = Arc::new(CsvTransactionStore::load(&data_path)?);

        Ok(Self {
            _temp_dir: temp_dir,
            store,
            data_path,
        })
    }

    /// Application state over this store with default settings
    ///
    /// Monthly budget 12000, cycle day 15, UTC, no mini app.
    pub fn app_state(&self) -> AppState {
        let config = AppConfig {
            data_path: self.data_path.clone(),
            ..AppConfig::default()
        };
        AppState::new(self.store.clone(), &config)
    }

    fn temp_dir() -> TempDir {
        TempDir::with_prefix("expense_tracker_").expect("failed to create temp dir")
    }
}
