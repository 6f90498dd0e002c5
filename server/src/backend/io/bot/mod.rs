//! # Chat Bot Interface
//!
//! Telegram front end of the expense tracker.
//!
//! ## Key Responsibilities
//!
//! - **Command Parsing**: `/start`, `/report`, `/saldo`, `/budget`, `/csv`,
//!   `/export`, `/help`
//! - **Reply Rendering**: the texts users see, independent of the transport
//! - **Mini App Data**: expenses submitted from the web form inside Telegram
//! - **CSV Upload**: validated bulk import that appends to the table
//! - **Webhook Adapter**: Telegram updates in, inline `sendMessage` calls out

pub mod commands;
pub mod service;
pub mod telegram;

pub use commands::{BotCommand, BudgetAction};
pub use service::{Attachment, BotReply, BotService};
pub use telegram::{SendMessage, Update};
