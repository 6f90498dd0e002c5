pub mod transaction;

pub use transaction::{
    format_date, parse_date, Transaction, ValidationError, DATE_FORMAT,
};
