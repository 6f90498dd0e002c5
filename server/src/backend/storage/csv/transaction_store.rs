use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use csv::{ReaderBuilder, Terminator, WriterBuilder};
use tracing::{debug, error, info};

use crate::backend::domain::models::Transaction;
use crate::backend::storage::errors::{FormatError, StoreError};
use crate::backend::storage::traits::TransactionStorage;

/// Column set and order of the backing file
pub const CSV_HEADER: [&str; 4] = ["Date", "Category", "Description", "Amount"];

/// Transaction table held in memory and mirrored to one CSV file
///
/// A single mutex guards both the table and every rewrite of the file, so
/// readers wait while a write is being flushed.
pub struct CsvTransactionStore {
    path: PathBuf,
    table: Mutex<Vec<Transaction>>,
}

impl CsvTransactionStore {
    /// Load the backing file, creating it with the canonical header if missing
    ///
    /// Any malformed header, row width or amount aborts the whole load.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let transactions = if path.exists() {
            read_table(&path)?
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|source| StoreError::Persistence {
                    path: path.clone(),
                    source,
                })?;
            }
            write_table(&path, &[])?;
            info!("📄 Created empty transaction file at {}", path.display());
            Vec::new()
        };

        info!("📂 Loaded {} transactions from {}", transactions.len(), path.display());
        Ok(Self {
            path,
            table: Mutex::new(transactions),
        })
    }

    fn table(&self) -> MutexGuard<'_, Vec<Transaction>> {
        // Every mutation is a single push or swap, so a poisoned table is still whole
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, table: &[Transaction]) -> Result<(), StoreError> {
        write_table(&self.path, table).map_err(|e| {
            error!("Failed to rewrite {}: {}", self.path.display(), e);
            e
        })?;
        debug!("Rewrote {} with {} rows", self.path.display(), table.len());
        Ok(())
    }
}

impl TransactionStorage for CsvTransactionStore {
    fn append(&self, transaction: Transaction) -> Result<(), StoreError> {
        let mut table = self.table();
        table.push(transaction);
        self.persist(&table)
    }

    fn replace_all(&self, transactions: Vec<Transaction>) -> Result<(), StoreError> {
        let mut table = self.table();
        *table = transactions;
        info!("🔁 Replaced transaction table with {} rows", table.len());
        self.persist(&table)
    }

    fn query_by_date(&self, date: &str) -> Vec<Transaction> {
        self.table()
            .iter()
            .filter(|t| t.date == date)
            .cloned()
            .collect()
    }

    fn query_all(&self) -> Vec<Transaction> {
        self.table().clone()
    }

    fn backing_path(&self) -> &Path {
        &self.path
    }
}

fn read_table(path: &Path) -> Result<Vec<Transaction>, StoreError> {
    let file = File::open(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));
    let mut records = reader.records();

    let header = match records.next() {
        // A zero-byte file is an empty table
        None => return Ok(Vec::new()),
        Some(result) => result.map_err(FormatError::from)?,
    };
    if header.iter().collect::<Vec<_>>() != CSV_HEADER {
        return Err(FormatError::Header {
            found: header.iter().map(String::from).collect(),
        }
        .into());
    }

    let mut transactions = Vec::new();
    for (index, result) in records.enumerate() {
        let record = result.map_err(FormatError::from)?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 2);

        if record.len() != CSV_HEADER.len() {
            return Err(FormatError::FieldCount {
                line,
                got: record.len(),
            }
            .into());
        }

        let raw_amount = &record[3];
        let amount = raw_amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite())
            .ok_or_else(|| FormatError::Amount {
                line,
                value: raw_amount.to_string(),
            })?;

        transactions.push(Transaction::new(&record[0], &record[1], &record[2], amount));
    }

    Ok(transactions)
}

/// Rewrite the whole file through a temp file and an atomic rename
fn write_table(path: &Path, transactions: &[Transaction]) -> Result<(), StoreError> {
    let persistence = |source| StoreError::Persistence {
        path: path.to_path_buf(),
        source,
    };

    let temp_path = path.with_extension("tmp");
    write_csv(&temp_path, transactions).map_err(persistence)?;
    fs::rename(&temp_path, path).map_err(persistence)?;
    Ok(())
}

/// Encode the canonical table into `writer`
pub fn encode_csv<W: io::Write>(writer: W, transactions: &[Transaction]) -> io::Result<()> {
    let mut csv_writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(CSV_HEADER)?;
    for transaction in transactions {
        let amount = format!("{:.2}", transaction.amount);
        csv_writer.write_record([
            transaction.date.as_str(),
            transaction.category.as_str(),
            transaction.description.as_str(),
            amount.as_str(),
        ])?;
    }

    csv_writer.flush()
}

fn write_csv(path: &Path, transactions: &[Transaction]) -> io::Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    encode_csv(BufWriter::new(file), transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::csv::test_utils::TestEnvironment;
    use std::sync::Arc;
    use std::thread;

    fn read_file(env: &TestEnvironment) -> String {
        fs::read_to_string(&env.data_path).unwrap()
    }

    #[test]
    fn test_load_creates_file_with_header() {
        let env = TestEnvironment::new().unwrap();
        assert!(env.store.query_all().is_empty());
        assert_eq!(read_file(&env), "Date,Category,Description,Amount\n");
    }

    #[test]
    fn test_load_creates_missing_parent_directories() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("deeper").join("data.csv");
        let store = CsvTransactionStore::load(&path).unwrap();
        assert!(path.exists());
        assert!(store.query_all().is_empty());
    }

    #[test]
    fn test_load_existing_valid_file() {
        let env = TestEnvironment::with_contents(
            "Date,Category,Description,Amount\n2023-01-01,Food,Lunch,10.50\n2023-01-02,Transport,Bus,2.00\n",
        )
        .unwrap();

        assert_eq!(
            env.store.query_all(),
            vec![
                Transaction::new("2023-01-01", "Food", "Lunch", 10.50),
                Transaction::new("2023-01-02", "Transport", "Bus", 2.00),
            ]
        );
    }

    #[test]
    fn test_zero_byte_file_is_an_empty_table() {
        let env = TestEnvironment::with_contents("").unwrap();
        assert!(env.store.query_all().is_empty());
    }

    #[test]
    fn test_invalid_header_refuses_to_load() {
        let err = TestEnvironment::with_contents(
            "Date,Category,Description,Invalid\n2023-01-01,Food,Lunch,10.50\n",
        )
        .err()
        .unwrap();

        assert!(err.is_format());
        assert!(matches!(err, StoreError::Format(FormatError::Header { .. })));
    }

    #[test]
    fn test_invalid_amount_reports_line() {
        let err = TestEnvironment::with_contents(
            "Date,Category,Description,Amount\n2023-01-01,Food,Lunch,10.00\n2023-01-01,Food,Dinner,abc\n",
        )
        .err()
        .unwrap();

        match err {
            StoreError::Format(FormatError::Amount { line, value }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_field_count_reports_line() {
        let err = TestEnvironment::with_contents(
            "Date,Category,Description,Amount\n2023-01-01,Food,Lunch\n",
        )
        .err()
        .unwrap();

        match err {
            StoreError::Format(FormatError::FieldCount { line, got }) => {
                assert_eq!(line, 2);
                assert_eq!(got, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_append_writes_exact_bytes() {
        let env = TestEnvironment::new().unwrap();
        env.store
            .append(Transaction::new("2024-01-01", "Food", "Lunch", 10.5))
            .unwrap();

        assert_eq!(
            read_file(&env),
            "Date,Category,Description,Amount\n2024-01-01,Food,Lunch,10.50\n"
        );
    }

    #[test]
    fn test_descriptions_with_delimiter_are_quoted_and_round_trip() {
        let env = TestEnvironment::new().unwrap();
        let tx = Transaction::new("2024-01-01", "Food", "Coffee, croissant", 4.2);
        env.store.append(tx.clone()).unwrap();

        assert!(read_file(&env).contains("\"Coffee, croissant\""));

        let reloaded = CsvTransactionStore::load(&env.data_path).unwrap();
        assert_eq!(reloaded.query_all(), vec![tx]);
    }

    #[test]
    fn test_insertion_order_and_duplicates_are_preserved() {
        let env = TestEnvironment::new().unwrap();
        let rows = vec![
            Transaction::new("2024-03-02", "Food", "Lunch", 12.0),
            Transaction::new("2024-01-01", "Food", "Lunch", 12.0),
            Transaction::new("2024-03-02", "Food", "Lunch", 12.0),
        ];
        for row in &rows {
            env.store.append(row.clone()).unwrap();
        }

        let reloaded = CsvTransactionStore::load(&env.data_path).unwrap();
        assert_eq!(reloaded.query_all(), rows);
    }

    #[test]
    fn test_query_by_date_is_exact_string_match() {
        let env = TestEnvironment::new().unwrap();
        env.store.append(Transaction::new("2024-01-01", "Food", "", 1.0)).unwrap();
        env.store.append(Transaction::new("2024-01-02", "Food", "", 2.0)).unwrap();
        env.store.append(Transaction::new("2024-01-01", "Fun", "", 3.0)).unwrap();

        let found = env.store.query_by_date("2024-01-01");
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|t| t.date == "2024-01-01"));
        assert!(env.store.query_by_date("2024-1-1").is_empty());
    }

    #[test]
    fn test_query_all_returns_a_copy() {
        let env = TestEnvironment::new().unwrap();
        env.store.append(Transaction::new("2024-01-01", "Food", "", 1.0)).unwrap();

        let mut copy = env.store.query_all();
        copy.clear();
        assert_eq!(env.store.query_all().len(), 1);
    }

    #[test]
    fn test_replace_all_swaps_table_and_file() {
        let env = TestEnvironment::new().unwrap();
        env.store.append(Transaction::new("2024-01-01", "Food", "", 1.0)).unwrap();

        let replacement = vec![
            Transaction::new("2025-05-05", "Rent", "May", 500.0),
            Transaction::new("2025-05-06", "Food", "", 7.25),
        ];
        env.store.replace_all(replacement.clone()).unwrap();

        assert_eq!(env.store.query_all(), replacement);
        assert_eq!(
            read_file(&env),
            "Date,Category,Description,Amount\n2025-05-05,Rent,May,500.00\n2025-05-06,Food,,7.25\n"
        );

        env.store.replace_all(Vec::new()).unwrap();
        assert_eq!(read_file(&env), "Date,Category,Description,Amount\n");
    }

    #[test]
    fn test_persistence_failure_keeps_row_in_memory() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");
        let store = CsvTransactionStore::load(data_dir.join("data.csv")).unwrap();
        fs::remove_dir_all(&data_dir).unwrap();

        let err = store
            .append(Transaction::new("2024-01-01", "Food", "Lunch", 10.5))
            .unwrap_err();
        assert!(err.is_persistence());
        assert_eq!(store.query_all().len(), 1);

        let err = store.replace_all(Vec::new()).unwrap_err();
        assert!(err.is_persistence());
        assert!(store.query_all().is_empty());
    }

    #[test]
    fn test_reappending_all_rows_reproduces_file() {
        let env = TestEnvironment::with_contents(
            "Date,Category,Description,Amount\n2024-01-01,Food,\"Lunch, big\",10.50\n2024-01-02,Fun,Cinema,7.00\n2024-01-02,Fun,Cinema,7.00\n",
        )
        .unwrap();
        let original = read_file(&env);

        let copy = TestEnvironment::new().unwrap();
        for row in env.store.query_all() {
            copy.store.append(row).unwrap();
        }
        let reloaded = CsvTransactionStore::load(&copy.data_path).unwrap();

        assert_eq!(read_file(&copy), original);
        assert_eq!(reloaded.query_all(), env.store.query_all());
    }

    #[test]
    fn test_concurrent_appends_are_all_persisted() {
        let env = TestEnvironment::new().unwrap();
        let store: Arc<CsvTransactionStore> = env.store.clone();

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..10 {
                        store
                            .append(Transaction::new(
                                "2024-01-01",
                                format!("worker-{worker}"),
                                format!("#{i}"),
                                1.0,
                            ))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.query_all().len(), 80);
        let reloaded = CsvTransactionStore::load(&env.data_path).unwrap();
        assert_eq!(reloaded.query_all().len(), 80);
    }
}
