//! Conversions between domain types and the DTOs in `shared`.

pub mod report_mapper;
pub mod transaction_mapper;

pub use report_mapper::ReportMapper;
pub use transaction_mapper::TransactionMapper;
