//! Chat replies.
//!
//! Renders the bot's answers from the domain services. Nothing here knows how
//! a reply is delivered; the transport adapter decides that.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{error, info, warn};

use super::commands::{BotCommand, BudgetAction};
use crate::backend::domain::export_service::{export_csv, EXPORT_FILE_NAME};
use crate::backend::domain::import_service::{parse_import, ImportError, ImportSummary, MAX_REPORTED_ROW_ERRORS};
use crate::backend::domain::models::{format_date, Transaction};
use crate::backend::domain::{
    BudgetSettings, CalendarService, ReportService, TransactionService, TransactionServiceError,
};

/// A file sent along with a reply
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BotReply {
    pub text: String,
    pub attachment: Option<Attachment>,
    /// Mini app offered as a button under the message
    pub mini_app_url: Option<String>,
}

impl BotReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachment: None,
            mini_app_url: None,
        }
    }
}

/// Expense submitted from the mini app
#[derive(Debug, Deserialize)]
struct WebAppExpense {
    date: String,
    category: String,
    #[serde(default)]
    description: String,
    amount: f64,
}

#[derive(Clone)]
pub struct BotService {
    transaction_service: TransactionService,
    report_service: ReportService,
    budget_settings: BudgetSettings,
    calendar_service: CalendarService,
    mini_app_url: Option<String>,
}

impl BotService {
    pub fn new(
        transaction_service: TransactionService,
        report_service: ReportService,
        budget_settings: BudgetSettings,
        calendar_service: CalendarService,
        mini_app_url: Option<String>,
    ) -> Self {
        Self {
            transaction_service,
            report_service,
            budget_settings,
            calendar_service,
            mini_app_url,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.calendar_service.today()
    }

    pub fn mini_app_url(&self) -> Option<&str> {
        self.mini_app_url.as_deref()
    }

    pub fn handle(&self, command: &BotCommand, today: NaiveDate) -> BotReply {
        match command {
            BotCommand::Start => self.start(today),
            BotCommand::Report { date } => self.report(date.unwrap_or(today)),
            BotCommand::Saldo { date } => self.saldo(date.unwrap_or(today)),
            BotCommand::Budget(action) => self.budget(action),
            BotCommand::Csv => BotReply::text(CSV_INSTRUCTIONS),
            BotCommand::Export => BotReply {
                attachment: self.export_attachment(),
                ..BotReply::text("")
            },
            BotCommand::Help => BotReply::text(HELP_TEXT),
            BotCommand::Unknown(_) => {
                BotReply::text("❓ Unknown command. Type /help for available commands.")
            }
        }
    }

    fn start(&self, today: NaiveDate) -> BotReply {
        let monthly_budget = self.budget_settings.monthly_budget();
        let text = format!(
            "Welcome to the Expenses Tracker! 🎉\n\
             \n\
             Budget settings:\n\
             • Monthly budget: {:.2} RUB\n\
             • Daily allowance this month ({}): {:.2} RUB\n\
             \n\
             Available commands:\n\
             /start  — Show this message\n\
             /report — Daily spending summary (use /report YYYY-MM-DD for a specific day)\n\
             /saldo  — Today's saldo/allowance (also /saldo YYYY-MM-DD)\n\
             /budget — Show or set monthly budget (e.g. /budget 15000, /budget reset)\n\
             /csv    — Upload your CSV file\n\
             /export — Download full CSV\n\
             /help   — Help\n\
             \n\
             To add expenses, use the mini app by clicking the button below.",
            monthly_budget,
            self.calendar_service.month_label(today),
            self.report_service.daily_allowance(today),
        );

        BotReply {
            mini_app_url: self.mini_app_url.clone(),
            ..BotReply::text(text)
        }
    }

    fn report(&self, date: NaiveDate) -> BotReply {
        let report = self.report_service.saldo(date);

        let mut text = format!(
            "📊 {}\n💰 Today: {:.2} RUB\n🎯 Saldo today: {:.2} RUB\n",
            format_date(date),
            report.spend_today,
            report.saldo
        );
        if let Some(tomorrow) = report.tomorrow_allowance {
            text.push_str(&format!("➡️ Tomorrow: {:.2} RUB\n", tomorrow));
        }
        text.push_str(if report.is_on_track() {
            "✅ On track."
        } else {
            "⚠️ Over track for the month."
        });

        BotReply {
            attachment: self.export_attachment(),
            ..BotReply::text(text)
        }
    }

    fn saldo(&self, date: NaiveDate) -> BotReply {
        let report = self.report_service.saldo(date);

        let mut text = format!(
            "📅 {}\n💳 Spent today: {:.2} RUB\n🎯 Allowed so far (cycle): {:.2} RUB\n💸 Saldo today: {:.2} RUB",
            format_date(date),
            report.spend_today,
            report.allowed_cumulative,
            report.saldo
        );
        if let Some(tomorrow) = report.tomorrow_allowance {
            text.push_str(&format!("\n➡️ Tomorrow allowance: {:.2} RUB", tomorrow));
        }
        BotReply::text(text)
    }

    fn budget(&self, action: &BudgetAction) -> BotReply {
        match action {
            BudgetAction::Show => BotReply::text(format!(
                "Current monthly budget: {:.2} RUB\nSource: {}\n\n\
                 To change: /budget <amount> (e.g., /budget 15000)\n\
                 To reset to the configured value: /budget reset",
                self.budget_settings.monthly_budget(),
                self.budget_settings.source()
            )),
            BudgetAction::Reset => {
                self.budget_settings.reset();
                BotReply::text(format!(
                    "✅ Reset. Using configured monthly budget = {:.2} RUB",
                    self.budget_settings.monthly_budget()
                ))
            }
            BudgetAction::Set(amount) => match self.budget_settings.set_override(*amount) {
                Ok(()) => BotReply::text(format!(
                    "✅ Monthly budget set to {:.2} RUB (runtime override)",
                    amount
                )),
                Err(_) => BotReply::text(INVALID_BUDGET),
            },
            BudgetAction::Invalid => BotReply::text(INVALID_BUDGET),
            BudgetAction::Usage => BotReply::text("Usage: /budget | /budget <amount> | /budget reset"),
        }
    }

    fn export_attachment(&self) -> Option<Attachment> {
        match export_csv(&self.transaction_service.all_transactions()) {
            Ok(bytes) => Some(Attachment {
                file_name: EXPORT_FILE_NAME.to_string(),
                bytes,
            }),
            Err(e) => {
                error!("Failed to render CSV export: {}", e);
                None
            }
        }
    }

    /// Record an expense submitted from the mini app
    pub fn handle_web_app_data(&self, payload: &str) -> BotReply {
        let expense: WebAppExpense = match serde_json::from_str(payload) {
            Ok(expense) => expense,
            Err(e) => {
                warn!("Invalid mini app payload: {}", e);
                return BotReply::text("❌ Invalid expense data");
            }
        };

        let transaction = Transaction::new(
            expense.date,
            expense.category,
            expense.description,
            expense.amount,
        );
        match self.transaction_service.create_transaction(transaction) {
            Ok(tx) => {
                let mut text = format!(
                    "✅ Expense added!\n\n📅 Date: {}\n🏷️ Category: {}",
                    tx.date, tx.category
                );
                if !tx.description.is_empty() {
                    text.push_str(&format!("\n📝 Description: {}", tx.description));
                }
                text.push_str(&format!("\n💰 Amount: {:.2} RUB", tx.amount));
                BotReply::text(text)
            }
            Err(TransactionServiceError::Validation(e)) => BotReply::text(format!("❌ {e}")),
            Err(TransactionServiceError::Storage(_)) => {
                BotReply::text("❌ Failed to save transaction")
            }
        }
    }

    /// Validate an uploaded CSV and append its rows
    pub fn import_document(&self, file_name: &str, bytes: &[u8]) -> BotReply {
        if !file_name.to_lowercase().ends_with(".csv") {
            return BotReply::text("❌ Please upload a CSV file (.csv extension)");
        }

        let transactions = match parse_import(bytes) {
            Ok(transactions) => transactions,
            Err(ImportError::Rows(rows)) => {
                let mut text = String::from("❌ CSV validation failed:\n\n");
                for row in rows.iter().take(MAX_REPORTED_ROW_ERRORS) {
                    text.push_str(&format!("• {row}\n"));
                }
                if rows.len() > MAX_REPORTED_ROW_ERRORS {
                    text.push_str(&format!(
                        "\n... and {} more errors",
                        rows.len() - MAX_REPORTED_ROW_ERRORS
                    ));
                }
                return BotReply::text(text);
            }
            Err(ImportError::Malformed(e)) => {
                warn!("Unreadable CSV upload {}: {}", file_name, e);
                return BotReply::text("❌ Invalid CSV format");
            }
            Err(e) => return BotReply::text(format!("❌ {e}")),
        };

        if transactions.is_empty() {
            return BotReply::text("❌ CSV file has no transactions");
        }

        let summary = ImportSummary::of(&transactions);
        if let Err(e) = self.transaction_service.append_all(transactions) {
            error!("Failed to save imported transactions: {}", e);
            return BotReply::text("❌ Failed to save transactions");
        }
        info!("📥 Imported {} transactions from {}", summary.count, file_name);

        BotReply::text(format!(
            "✅ Successfully imported {} transactions!\n\n💰 Total amount: {:.2} RUB\n📅 Date range: {} to {}",
            summary.count,
            summary.total_amount,
            summary.first_date.unwrap_or_default(),
            summary.last_date.unwrap_or_default()
        ))
    }
}

const INVALID_BUDGET: &str = "❌ Invalid amount. Use: /budget 15000";

const CSV_INSTRUCTIONS: &str = "📁 CSV Upload Instructions:

1. Your CSV file must have this exact header:
   Date,Category,Description,Amount

2. Date format: YYYY-MM-DD
3. Amount should be a number (e.g., 100.50)
4. Description is optional

Example:
Date,Category,Description,Amount
2024-01-15,Food,Lunch,500.00
2024-01-15,Transport,Bus,50.00

Send your CSV file and I'll validate and import it!";

const HELP_TEXT: &str = "🤖 Expenses Tracker Help

Commands:
• /start - Welcome message and mini app
• /report - Get today's spending summary
• /report YYYY-MM-DD - Get spending summary for a specific date
• /saldo - Show today's saldo/allowance
• /saldo YYYY-MM-DD - Saldo for a specific date
• /budget - Show current monthly budget and how it's sourced
• /budget <amount> - Set runtime budget override (resets on restart)
• /budget reset - Reset override to the configured value
• /csv - Upload your expense data
• /export - Download all expenses as CSV
• /help - This help message

Features:
• Track daily expenses
• Calculate daily budget
• Upload CSV files
• Daily spending reports
• Telegram Mini App interface";
