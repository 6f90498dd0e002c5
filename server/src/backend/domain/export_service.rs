//! CSV export of the transaction table.

use std::cmp::Ordering;
use std::io;

use super::models::Transaction;
use crate::backend::storage::csv::encode_csv;

/// File name offered for downloads and chat attachments
pub const EXPORT_FILE_NAME: &str = "expenses.csv";

/// Render the table in the backing-file format, newest first
pub fn export_csv(transactions: &[Transaction]) -> io::Result<Vec<u8>> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| newest_first(a, b));

    let mut buffer = Vec::new();
    encode_csv(&mut buffer, &sorted)?;
    Ok(buffer)
}

/// Descending by date, falling back to the raw string for unparseable rows
///
/// `parse_date` only accepts the canonical spelling, so parsed order and
/// string order agree and the mix is still a total order.
fn newest_first(a: &Transaction, b: &Transaction) -> Ordering {
    match (a.parsed_date(), b.parsed_date()) {
        (Some(da), Some(db)) => db.cmp(&da),
        _ => b.date.cmp(&a.date),
    }
}
