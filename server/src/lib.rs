//! Expense tracker service: a CSV-backed ledger of daily spends, a
//! budget-cycle saldo engine, a Telegram bot and a small web API.

pub mod backend;
