//! Chat command parsing.

use chrono::NaiveDate;

use crate::backend::domain::models::parse_date;

/// What `/budget` was asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetAction {
    Show,
    Reset,
    Set(f64),
    /// An amount that is not a positive number
    Invalid,
    /// Too many arguments
    Usage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BotCommand {
    Start,
    /// `None` means today
    Report { date: Option<NaiveDate> },
    Saldo { date: Option<NaiveDate> },
    Budget(BudgetAction),
    Csv,
    Export,
    Help,
    Unknown(String),
}

impl BotCommand {
    /// Parse a chat message; anything that is not a known command is `Unknown`
    pub fn parse(text: &str) -> Self {
        let mut parts = text.split_whitespace();
        let Some(head) = parts.next() else {
            return BotCommand::Unknown(String::new());
        };
        let args: Vec<&str> = parts.collect();

        let Some(command) = head.strip_prefix('/') else {
            return BotCommand::Unknown(head.to_string());
        };
        // "/saldo@expenses_bot" in group chats
        let command = command.split('@').next().unwrap_or_default();
        let date_arg = || args.first().and_then(|arg| parse_date(arg));

        match command {
            "start" => BotCommand::Start,
            "report" => BotCommand::Report { date: date_arg() },
            "saldo" => BotCommand::Saldo { date: date_arg() },
            "budget" => BotCommand::Budget(parse_budget_args(&args)),
            "csv" => BotCommand::Csv,
            "export" => BotCommand::Export,
            "help" => BotCommand::Help,
            other => BotCommand::Unknown(other.to_string()),
        }
    }
}

fn parse_budget_args(args: &[&str]) -> BudgetAction {
    match args {
        [] | ["show"] => BudgetAction::Show,
        [arg] if arg.eq_ignore_ascii_case("reset") => BudgetAction::Reset,
        [amount] => amount
            .replace(',', ".")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
            .map(BudgetAction::Set)
            .unwrap_or(BudgetAction::Invalid),
        _ => BudgetAction::Usage,
    }
}
